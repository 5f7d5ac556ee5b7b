//! Run one rover mission on the host against the simulated rover.
//!
//! Usage:
//!   cargo run -p rover_plan_sitl --bin plan_runner -- <plan20|plan24> [OPTIONS]
//!
//! Options:
//!   --config <FILE>      INI configuration (seeded with defaults on first run)
//!   --log-dir <DIR>      Directory for log_<mission>.txt (default: .)
//!   --trace <a,b,c>      Scripted proximity readings in meters
//!   --seed <N>           RNG seed for proximity noise
//!   --noise <M>          Proximity noise standard deviation in meters
//!   --sim                Simulated time (no sleeping)
//!   --max-ticks <N>      Stop a simulated run after N polls

use std::env;
use std::path::PathBuf;
use std::process;

use rover_plan_core::mission::{MissionKind, RunOutcome};
use rover_plan_sitl::{run_host, HostOptions, StopFlag};

fn parse_args() -> HostOptions {
    let raw: Vec<String> = env::args().collect();
    let Some(mission) = raw.get(1).map(String::as_str) else {
        print_usage();
        process::exit(1);
    };
    if mission == "-h" || mission == "--help" {
        print_usage();
        process::exit(0);
    }
    let Some(kind) = MissionKind::from_name(mission) else {
        eprintln!("Unknown mission: {mission}");
        print_usage();
        process::exit(1);
    };

    let mut options = HostOptions::new(kind);
    let mut i = 2;
    while i < raw.len() {
        match raw[i].as_str() {
            "--config" => {
                i += 1;
                options.config_path = Some(PathBuf::from(arg_value(&raw, i, "config")));
            }
            "--log-dir" => {
                i += 1;
                options.log_dir = PathBuf::from(arg_value(&raw, i, "log-dir"));
            }
            "--trace" => {
                i += 1;
                options.trace = parse_trace(arg_value(&raw, i, "trace"));
            }
            "--seed" => {
                i += 1;
                options.rover.seed = Some(parse_number(&raw, i, "seed"));
            }
            "--noise" => {
                i += 1;
                options.rover.proximity_noise_m = parse_number(&raw, i, "noise");
            }
            "--sim" => options.simulated = true,
            "--max-ticks" => {
                i += 1;
                options.max_ticks = Some(parse_number(&raw, i, "max-ticks"));
            }
            "-h" | "--help" => {
                print_usage();
                process::exit(0);
            }
            other => {
                eprintln!("Unknown option: {other}");
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    options
}

fn arg_value<'a>(raw: &'a [String], i: usize, name: &str) -> &'a str {
    raw.get(i).map(String::as_str).unwrap_or_else(|| {
        eprintln!("Error: --{name} requires a value");
        process::exit(1);
    })
}

fn parse_number<T: std::str::FromStr>(raw: &[String], i: usize, name: &str) -> T {
    arg_value(raw, i, name).parse().unwrap_or_else(|_| {
        eprintln!("Error: invalid value for --{name}");
        process::exit(1);
    })
}

fn parse_trace(text: &str) -> Vec<f32> {
    text.split(',')
        .map(|v| {
            v.trim().parse().unwrap_or_else(|_| {
                eprintln!("Error: invalid trace reading: {v}");
                process::exit(1);
            })
        })
        .collect()
}

fn print_usage() {
    eprintln!(
        "Usage: plan_runner <plan20|plan24> [OPTIONS]\n\
         \n\
         Options:\n\
         \x20 --config <FILE>      INI configuration (seeded with defaults on first run)\n\
         \x20 --log-dir <DIR>      Directory for log_<mission>.txt (default: .)\n\
         \x20 --trace <a,b,c>      Scripted proximity readings in meters\n\
         \x20 --seed <N>           RNG seed for proximity noise\n\
         \x20 --noise <M>          Proximity noise standard deviation in meters\n\
         \x20 --sim                Simulated time (no sleeping)\n\
         \x20 --max-ticks <N>      Stop a simulated run after N polls\n\
         \x20 -h, --help           Show this help"
    );
}

fn exit_code(outcome: RunOutcome) -> i32 {
    match outcome {
        RunOutcome::Finished | RunOutcome::Skipped => 0,
        RunOutcome::Lost => 2,
        RunOutcome::Aborted => 3,
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::init();
    let options = parse_args();

    let stop = StopFlag::new();
    let stopper = stop.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\nShutdown requested.");
            stopper.request_stop();
        }
    });

    // The mission loop blocks, keep it off the runtime thread
    let result = tokio::task::spawn_blocking(move || run_host(&options, stop)).await;

    match result {
        Ok(Ok(report)) => {
            println!(
                "{:?}, log: {}{}",
                report.outcome,
                report.log_path.display(),
                if report.config_saved {
                    " (configuration updated)"
                } else {
                    ""
                }
            );
            process::exit(exit_code(report.outcome));
        }
        Ok(Err(e)) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: mission thread failed: {e}");
            process::exit(1);
        }
    }
}
