//! One mission run on the host: load configuration, run the selected
//! mission against the simulated rover, close the logs and write the
//! configuration back.

use std::path::PathBuf;

use rover_plan_core::mission::{MissionContext, MissionKind, MissionSelector, RunOutcome};
use rover_plan_core::parameters::ParameterStore;
use rover_plan_core::traits::TimeSource;

use crate::clock::{SimClock, SystemClock};
use crate::control::{RealtimeLoop, SimLoop, StopFlag};
use crate::error::SitlError;
use crate::ini;
use crate::rover::{SimRover, SimRoverConfig};
use crate::sink::{HostSink, HostSinks};

/// Options for [`run_host`]
#[derive(Debug, Clone)]
pub struct HostOptions {
    pub mission: MissionKind,
    /// INI file; read before the run and written back if defaults were seeded
    pub config_path: Option<PathBuf>,
    pub log_dir: PathBuf,
    /// Scripted proximity readings
    pub trace: Vec<f32>,
    pub rover: SimRoverConfig,
    /// Simulated time instead of sleeping in real time
    pub simulated: bool,
    /// Stop a simulated run after this many polls
    pub max_ticks: Option<u64>,
}

impl HostOptions {
    pub fn new(mission: MissionKind) -> Self {
        Self {
            mission,
            config_path: None,
            log_dir: PathBuf::from("."),
            trace: Vec::new(),
            rover: SimRoverConfig::default(),
            simulated: false,
            max_ticks: None,
        }
    }
}

/// What a host run produced
#[derive(Debug, Clone)]
pub struct HostReport {
    pub outcome: RunOutcome,
    pub log_path: PathBuf,
    /// Configuration was written back
    pub config_saved: bool,
}

/// Run the selected mission to completion (blocking).
pub fn run_host(options: &HostOptions, stop: StopFlag) -> Result<HostReport, SitlError> {
    let mut store = match &options.config_path {
        Some(path) => ini::load(path)?,
        None => ParameterStore::new(),
    };
    let mut sinks = HostSinks::new(&options.log_dir);
    let mut selector: MissionSelector<HostSink> = MissionSelector::new();

    let outcome = if options.simulated {
        // Start simulated time at the wall clock so log stamps stay meaningful
        let clock = SimClock::starting_at(SystemClock.now_us());
        let mut rover =
            SimRover::new(clock.clone(), options.rover.clone()).with_trace(&options.trace);
        let mut control = SimLoop::new(clock.clone(), stop);
        if let Some(max) = options.max_ticks {
            control = control.with_max_ticks(max);
        }
        selector.run(
            options.mission,
            &mut MissionContext {
                store: &mut store,
                sinks: &mut sinks,
                rover: &mut rover,
                clock: &clock,
                control: &mut control,
            },
        )
    } else {
        let mut rover =
            SimRover::new(SystemClock, options.rover.clone()).with_trace(&options.trace);
        let mut control = RealtimeLoop::new(stop);
        selector.run(
            options.mission,
            &mut MissionContext {
                store: &mut store,
                sinks: &mut sinks,
                rover: &mut rover,
                clock: &SystemClock,
                control: &mut control,
            },
        )
    };
    selector.terminate_all();
    log::info!("{}: {:?}", options.mission.name(), outcome);

    let config_saved = match &options.config_path {
        Some(path) => ini::save_if_dirty(&mut store, path)?,
        None => false,
    };

    Ok(HostReport {
        outcome,
        log_path: sinks.log_path(options.mission.name()),
        config_saved,
    })
}
