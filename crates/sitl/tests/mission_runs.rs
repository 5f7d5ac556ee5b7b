use std::fs;
use std::path::Path;

use rover_plan_core::mission::{MissionKind, RunOutcome, LOG_HEADER};
use rover_plan_sitl::{run_host, HostOptions, SimRoverConfig, StopFlag};

fn sim_options(kind: MissionKind, dir: &Path) -> HostOptions {
    let mut options = HostOptions::new(kind);
    options.config_path = Some(dir.join("rover.ini"));
    options.log_dir = dir.join("log");
    options.simulated = true;
    options.max_ticks = Some(200_000);
    options.rover = SimRoverConfig {
        seed: Some(1),
        ..Default::default()
    };
    options
}

fn read_log(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

fn timestamp(line: &str) -> f64 {
    line.split(' ').next().unwrap().parse().unwrap()
}

fn assert_log_shape(lines: &[String]) {
    assert_eq!(&lines[..3], LOG_HEADER);
    assert!(lines[3..].iter().all(|l| !l.starts_with('%')));
    assert!(lines[3..]
        .windows(2)
        .all(|w| timestamp(&w[0]) <= timestamp(&w[1])));
}

#[test]
fn test_obstacle_mission_with_trace() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("rover.ini"), "[plan24]\nprint = false\n").unwrap();
    let mut options = sim_options(MissionKind::ObstacleAdvance, dir.path());
    options.trace = vec![0.3, 0.3, 0.05, 0.05, 0.3];

    let report = run_host(&options, StopFlag::new()).unwrap();
    assert_eq!(report.outcome, RunOutcome::Finished);
    assert_eq!(report.log_path, dir.path().join("log/log_plan24.txt"));

    let lines = read_log(&report.log_path);
    assert_log_shape(&lines);

    let events: Vec<&str> = lines
        .iter()
        .filter_map(|l| l.split(" % ").nth(1))
        .collect();
    assert_eq!(events[0], "plan24 started");
    assert_eq!(events[1], "Checking for obstacles.");
    let gate_events: Vec<&str> = events
        .iter()
        .copied()
        .filter(|e| e.starts_with("obstacle"))
        .collect();
    assert_eq!(gate_events, ["obstacle detected", "obstacle cleared"]);
    assert_eq!(events.last(), Some(&"plan24 finished"));
}

#[test]
fn test_gate_mission_finishes_when_enabled() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("rover.ini"),
        "[plan20]\nrun = true\nprint = false\n",
    )
    .unwrap();
    let options = sim_options(MissionKind::Gate, dir.path());

    let report = run_host(&options, StopFlag::new()).unwrap();
    assert_eq!(report.outcome, RunOutcome::Finished);

    let lines = read_log(&report.log_path);
    assert_log_shape(&lines);
    let states: Vec<&str> = lines
        .iter()
        .filter(|l| l.ends_with("% state start"))
        .map(|l| l.split(' ').nth(1).unwrap())
        .collect();
    assert_eq!(states, ["12", "14", "16", "18", "20", "22", "24"]);
    assert!(lines.last().unwrap().ends_with(" 24 % plan20 finished"));

    // Missing tunables were seeded and written back; the user's values kept
    assert!(report.config_saved);
    let ini = fs::read_to_string(dir.path().join("rover.ini")).unwrap();
    assert!(ini.contains("run = true"));
    assert!(ini.contains("speed = 0.3"));
    assert!(ini.contains("turn_rate = 1.0\n"));
}

#[test]
fn test_first_run_seeds_configuration() {
    let dir = tempfile::tempdir().unwrap();
    let mut options = sim_options(MissionKind::Gate, dir.path());
    options.config_path = Some(dir.path().join("conf/rover.ini"));

    let report = run_host(&options, StopFlag::new()).unwrap();
    // Gate traversal is off until enabled
    assert_eq!(report.outcome, RunOutcome::Skipped);
    assert!(report.config_saved);

    let ini = fs::read_to_string(dir.path().join("conf/rover.ini")).unwrap();
    assert!(ini.starts_with("[plan20]\n"));
    assert!(ini.contains("log = true\nrun = false\nprint = true\n"));
    // Only the selected mission is set up
    assert!(!ini.contains("[plan24]"));

    // Second run: nothing new to seed
    let report = run_host(&options, StopFlag::new()).unwrap();
    assert!(!report.config_saved);
}

#[test]
fn test_stop_request_aborts_run() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("rover.ini"), "[plan24]\nprint = false\n").unwrap();
    let options = sim_options(MissionKind::ObstacleAdvance, dir.path());
    let stop = StopFlag::new();
    stop.request_stop();

    let report = run_host(&options, stop).unwrap();
    assert_eq!(report.outcome, RunOutcome::Aborted);

    let lines = read_log(&report.log_path);
    assert_log_shape(&lines);
    assert!(lines.last().unwrap().ends_with("% plan24 stopped"));
}

#[test]
fn test_tick_limit_aborts_stalled_run() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("rover.ini"), "[plan24]\nprint = false\n").unwrap();
    let mut options = sim_options(MissionKind::ObstacleAdvance, dir.path());
    // Permanently blocked path: the check never passes
    options.rover.clear_distance = 0.01;
    options.max_ticks = Some(50);

    let report = run_host(&options, StopFlag::new()).unwrap();
    assert_eq!(report.outcome, RunOutcome::Aborted);
    let lines = read_log(&report.log_path);
    assert!(!lines.iter().any(|l| l.contains("Path is clear")));
}

#[test]
fn test_unwritable_log_dir_still_runs() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("rover.ini"), "[plan24]\nprint = false\n").unwrap();
    let mut options = sim_options(MissionKind::ObstacleAdvance, dir.path());
    let blocker = dir.path().join("not_a_dir");
    fs::write(&blocker, "").unwrap();
    options.log_dir = blocker;

    let report = run_host(&options, StopFlag::new()).unwrap();
    assert_eq!(report.outcome, RunOutcome::Finished);
    assert!(!report.log_path.exists());
}

#[test]
fn test_malformed_config_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("rover.ini"), "[plan24]\nspeed\n").unwrap();
    let options = sim_options(MissionKind::ObstacleAdvance, dir.path());

    let err = run_host(&options, StopFlag::new()).unwrap_err();
    assert!(err.to_string().contains("line 2"));
}
