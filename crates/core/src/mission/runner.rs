//! Mission Runner
//!
//! Drives one mission through its lifecycle:
//!
//! ```text
//! Uninitialized -> Configured -> Running -> {Finished | Lost | Aborted} -> Terminated
//! ```
//!
//! Each tick reads pose and proximity, lets the obstacle gate react, asks
//! [`evaluate`] for the next step and, only when a new state is entered,
//! runs that state's entry actions. Abnormal conditions never escape the
//! loop as errors; they end the run with a safe stop and a final log line.

use super::logger::TransitionLogger;
use super::messages::LogEvent;
use super::obstacle::{GateEvent, ObstacleGate, DEFAULT_OBSTACLE_DISTANCE};
use super::state::{MissionStatus, MotionCommand, PlanState, PoseDelta, Readings};
use super::table::{evaluate, EdgeMode, EntryAction, Step, TableError, TransitionTable};
use crate::parameters::{MissionFlags, ParameterError, ParameterStore};
use crate::traits::{LogSink, LoopControl, Rover, SinkProvider, TimeSource};

/// Proximity channel and safety threshold of a gated mission
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObstacleConfig {
    /// Proximity sensor channel
    pub channel: usize,
    /// Safety threshold (meters)
    pub threshold: f32,
}

/// A mission definition
///
/// Tunables are loaded with [`Plan::from_store`] each time a run begins;
/// the table is then built from them.
pub trait Plan: Sized {
    /// State tag of this mission
    type State: PlanState;

    /// Mission name (log file `log_<NAME>.txt`, log messages)
    const NAME: &'static str;

    /// Parameter prefix (`<PREFIX>_RUN`, ...)
    const PREFIX: &'static str;

    /// Seeded value of `<PREFIX>_RUN`
    const RUN_BY_DEFAULT: bool;

    /// Seed mission-specific parameters
    fn register_defaults(store: &mut ParameterStore) -> Result<(), ParameterError>;

    /// Load tunables
    fn from_store(store: &ParameterStore) -> Self;

    /// First state of a run
    fn entry_state(&self) -> Self::State;

    /// Build the transition table
    fn table(&self) -> Result<TransitionTable<Self::State>, TableError>;

    /// Status note logged when `state` is entered
    fn entry_note(&self, _state: Self::State) -> Option<&'static str> {
        None
    }

    /// Proximity gating, for missions that watch for obstacles
    fn obstacle(&self) -> Option<ObstacleConfig> {
        None
    }
}

/// Result of one [`MissionRunner::step`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tick<S> {
    /// Runner is not running
    Idle,
    /// Guard not met
    Stayed,
    /// New state entered (entry actions done)
    Entered(S),
    /// Mission finished on this tick
    Finished,
    /// Mission lost on this tick
    Lost,
}

/// How a call to [`MissionRunner::run`] ended
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    /// Run flag off, nothing was commanded
    Skipped,
    /// Terminal guard satisfied
    Finished,
    /// Unknown state reached, rover stopped
    Lost,
    /// External stop observed, rover stopped
    Aborted,
}

/// Collaborators for one blocking run
pub struct MissionContext<'a, T, K> {
    /// Configuration
    pub store: &'a mut ParameterStore,
    /// Log sink factory
    pub sinks: &'a mut dyn SinkProvider<Sink = K>,
    /// Pose, actuation and proximity
    pub rover: &'a mut dyn Rover,
    /// Timestamp source for the transition log
    pub clock: &'a T,
    /// Poll pacing and stop signal
    pub control: &'a mut dyn LoopControl,
}

/// Lifecycle controller for one mission
pub struct MissionRunner<P: Plan, K: LogSink> {
    plan: P,
    table: TransitionTable<P::State>,
    state: P::State,
    status: MissionStatus,
    gate: ObstacleGate,
    /// Gate active in the current state
    gated: bool,
    /// Velocity restored when the gate clears
    resume_velocity: f32,
    command: MotionCommand,
    logger: TransitionLogger<K>,
}

impl<P: Plan + Default, K: LogSink> MissionRunner<P, K> {
    /// Runner with the plan's default tunables
    pub fn new() -> Self {
        Self::with_plan(P::default())
    }
}

impl<P: Plan + Default, K: LogSink> Default for MissionRunner<P, K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Plan, K: LogSink> MissionRunner<P, K> {
    /// Runner for an explicit plan value
    pub fn with_plan(plan: P) -> Self {
        let state = plan.entry_state();
        Self {
            plan,
            table: TransitionTable::new(),
            state,
            status: MissionStatus::Uninitialized,
            gate: ObstacleGate::new(DEFAULT_OBSTACLE_DISTANCE),
            gated: false,
            resume_velocity: 0.0,
            command: MotionCommand::default(),
            logger: TransitionLogger::new(),
        }
    }

    /// Lifecycle status
    pub fn status(&self) -> MissionStatus {
        self.status
    }

    /// Current state
    pub fn state(&self) -> P::State {
        self.state
    }

    /// Last command sent to the actuators
    pub fn command(&self) -> MotionCommand {
        self.command
    }

    /// Obstacle gate
    pub fn gate(&self) -> &ObstacleGate {
        &self.gate
    }

    /// Active plan tunables
    pub fn plan(&self) -> &P {
        &self.plan
    }

    /// Table of the current run
    pub fn table(&self) -> &TransitionTable<P::State> {
        &self.table
    }

    /// Is the persistent log open?
    pub fn is_log_open(&self) -> bool {
        self.logger.is_open()
    }

    /// Seed default parameters and open the sinks.
    ///
    /// Safe to call repeatedly: defaults never overwrite stored values and
    /// an already open log is kept rather than reopened.
    pub fn setup(&mut self, store: &mut ParameterStore, sinks: &mut dyn SinkProvider<Sink = K>) {
        let seeded = MissionFlags::register_defaults(store, P::PREFIX, P::RUN_BY_DEFAULT)
            .and_then(|_| P::register_defaults(store));
        if let Err(e) = seeded {
            crate::log_warn!("{}: cannot seed default parameters: {}", P::NAME, e);
        }

        let flags = MissionFlags::from_store(store, P::PREFIX);
        self.logger
            .set_console(if flags.print { sinks.console() } else { None });

        if self.logger.is_open() {
            crate::log_warn!("{}: setup called again before terminate, keeping log", P::NAME);
        } else if flags.log {
            match sinks.open_log(P::NAME) {
                Some(sink) => {
                    self.logger.open(sink);
                }
                None => crate::log_warn!("{}: log file unavailable, console only", P::NAME),
            }
        }

        if matches!(
            self.status,
            MissionStatus::Uninitialized | MissionStatus::Terminated
        ) {
            self.status = MissionStatus::Configured;
        }
    }

    /// Run the mission to completion (blocking).
    ///
    /// No-op when the run flag is off. Otherwise polls until the mission
    /// finishes, gets lost, or `ctx.control` requests a stop.
    pub fn run<T: TimeSource>(&mut self, ctx: &mut MissionContext<'_, T, K>) -> RunOutcome {
        if matches!(
            self.status,
            MissionStatus::Uninitialized | MissionStatus::Terminated
        ) {
            self.setup(ctx.store, ctx.sinks);
        }

        let flags = MissionFlags::from_store(ctx.store, P::PREFIX);
        if !flags.run {
            crate::log_info!("{}: run flag off, skipping", P::NAME);
            return RunOutcome::Skipped;
        }

        self.begin(ctx.store, ctx.rover, ctx.clock.now_us());
        let interval_us = u64::from(flags.poll_us);

        while self.status == MissionStatus::Running {
            if ctx.control.should_stop() {
                self.abort(ctx.rover, ctx.clock.now_us());
                break;
            }
            self.step(ctx.rover, ctx.clock.now_us());
            if self.status == MissionStatus::Running {
                ctx.control.wait(interval_us);
            }
        }

        self.outcome()
    }

    /// Reload tunables from `store` and start a run
    pub fn begin(&mut self, store: &ParameterStore, rover: &mut dyn Rover, now_us: u64) {
        self.plan = P::from_store(store);
        self.start(rover, now_us);
    }

    /// Start a run with the current plan: build the table and enter the
    /// entry state
    pub fn start(&mut self, rover: &mut dyn Rover, now_us: u64) {
        let entry = self.plan.entry_state();
        let threshold = self
            .plan
            .obstacle()
            .map_or(DEFAULT_OBSTACLE_DISTANCE, |o| o.threshold);

        self.gate = ObstacleGate::new(threshold);
        self.gated = false;
        self.state = entry;
        self.status = MissionStatus::Running;
        self.logger.set_state(entry.id());
        self.logger.log_event(now_us, LogEvent::PlanStarted, P::NAME);
        crate::log_info!("{}: started in {}", P::NAME, entry.name());

        self.table = match self.plan.table() {
            Ok(table) => table,
            Err(e) => {
                // An empty table makes the first tick report Lost
                crate::log_error!("{}: invalid transition table: {:?}", P::NAME, e);
                self.logger.log_event(now_us, LogEvent::InvalidTable, P::NAME);
                TransitionTable::new()
            }
        };

        // Only a gated entry state consumes a proximity reading here
        let proximity = if self.table.spec(entry).is_some_and(|spec| spec.entry.gated) {
            self.read_proximity(rover)
        } else {
            f32::MAX
        };
        self.enter(entry, rover, proximity, now_us);
    }

    /// One poll iteration
    pub fn step(&mut self, rover: &mut dyn Rover, now_us: u64) -> Tick<P::State> {
        if self.status != MissionStatus::Running {
            return Tick::Idle;
        }

        let pose = PoseDelta {
            distance: rover.distance(),
            turned: rover.turned_angle(),
        };
        let proximity = self.read_proximity(rover);

        if self.gated {
            if let Some(event) = self.gate.update(proximity) {
                self.on_gate_event(event, rover, now_us);
            }
        }

        let readings = Readings {
            pose,
            proximity,
            obstacle: self.gate.is_obstacle(proximity),
        };

        match evaluate(&self.table, self.state, &readings) {
            Step::Stay => Tick::Stayed,
            Step::Enter(next) => {
                self.enter(next, rover, proximity, now_us);
                Tick::Entered(next)
            }
            Step::Finish => {
                self.status = MissionStatus::Finished;
                self.gated = false;
                self.safe_stop(rover);
                self.logger.log_event(now_us, LogEvent::Finished, P::NAME);
                crate::log_info!("{}: finished", P::NAME);
                Tick::Finished
            }
            Step::Lost => {
                self.logger.log_event(now_us, LogEvent::UnknownState, P::NAME);
                self.lose(rover, now_us);
                Tick::Lost
            }
        }
    }

    /// Stop a running mission: zero the commands and log the stop
    pub fn abort(&mut self, rover: &mut dyn Rover, now_us: u64) {
        if self.status != MissionStatus::Running {
            return;
        }
        self.status = MissionStatus::Aborted;
        self.safe_stop(rover);
        self.logger.log_event(now_us, LogEvent::Stopped, P::NAME);
        crate::log_info!("{}: stopped", P::NAME);
    }

    /// Close the sinks. Safe to call when already closed.
    pub fn terminate(&mut self) {
        self.logger.close();
        if self.status != MissionStatus::Uninitialized {
            self.status = MissionStatus::Terminated;
        }
    }

    fn outcome(&self) -> RunOutcome {
        match self.status {
            MissionStatus::Finished => RunOutcome::Finished,
            MissionStatus::Lost => RunOutcome::Lost,
            _ => RunOutcome::Aborted,
        }
    }

    fn read_proximity(&self, rover: &mut dyn Rover) -> f32 {
        self.plan
            .obstacle()
            .map_or(f32::MAX, |o| rover.reading(o.channel))
    }

    fn enter(&mut self, next: P::State, rover: &mut dyn Rover, proximity: f32, now_us: u64) {
        let entry = self.table.spec(next).map(|spec| spec.entry);

        // Notes belong to the transition and carry the id of the state left
        if entry.is_some() {
            if let Some(note) = self.plan.entry_note(next) {
                self.logger.log(now_us, note);
            }
        }

        self.state = next;
        self.logger.set_state(next.id());
        self.logger.log_event(now_us, LogEvent::StateStart, P::NAME);
        crate::log_debug!("{}: entered {} ({})", P::NAME, next.name(), next.id());

        match entry {
            Some(entry) => self.apply_entry(&entry, rover, proximity, now_us),
            None => self.gated = false,
        }
    }

    fn apply_entry(
        &mut self,
        entry: &EntryAction,
        rover: &mut dyn Rover,
        proximity: f32,
        now_us: u64,
    ) {
        if entry.reset_pose {
            rover.reset_pose();
        }

        match entry.edge {
            EdgeMode::Keep => {}
            EdgeMode::Off => {
                rover.clear_edge_follow();
                self.command.edge = None;
            }
            EdgeMode::Follow(edge) => {
                rover.set_edge_follow(edge.left, edge.offset);
                self.command.edge = Some(edge);
            }
        }

        // Gated to gated keeps the phase this tick already updated
        let carried = self.gated && entry.gated;
        self.gated = entry.gated;
        self.resume_velocity = entry.velocity.unwrap_or(self.command.velocity);
        if !carried {
            self.gate.reset();
        }

        if carried && self.gate.is_blocked() {
            // Held at zero until the gate reports Cleared
        } else if entry.gated && self.gate.update(proximity) == Some(GateEvent::Detected) {
            self.command_velocity(rover, 0.0);
            self.logger
                .log_event(now_us, LogEvent::ObstacleDetected, P::NAME);
        } else if let Some(velocity) = entry.velocity {
            self.command_velocity(rover, velocity);
        }

        if let Some(turn_rate) = entry.turn_rate {
            self.command_turn_rate(rover, turn_rate);
        }
    }

    fn on_gate_event(&mut self, event: GateEvent, rover: &mut dyn Rover, now_us: u64) {
        match event {
            GateEvent::Detected => {
                self.command_velocity(rover, 0.0);
                self.logger
                    .log_event(now_us, LogEvent::ObstacleDetected, P::NAME);
                crate::log_info!("{}: obstacle detected", P::NAME);
            }
            GateEvent::Cleared => {
                self.command_velocity(rover, self.resume_velocity);
                self.logger
                    .log_event(now_us, LogEvent::ObstacleCleared, P::NAME);
                crate::log_info!("{}: obstacle cleared", P::NAME);
            }
        }
    }

    fn lose(&mut self, rover: &mut dyn Rover, now_us: u64) {
        self.status = MissionStatus::Lost;
        self.gated = false;
        self.safe_stop(rover);
        self.logger.log_event(now_us, LogEvent::GotLost, P::NAME);
        crate::log_warn!(
            "{}: lost in undefined state {} ({})",
            P::NAME,
            self.state.name(),
            self.state.id()
        );
    }

    fn safe_stop(&mut self, rover: &mut dyn Rover) {
        self.command_velocity(rover, 0.0);
        self.command_turn_rate(rover, 0.0);
    }

    fn command_velocity(&mut self, rover: &mut dyn Rover, velocity: f32) {
        rover.set_velocity(velocity);
        self.command.velocity = velocity;
    }

    fn command_turn_rate(&mut self, rover: &mut dyn Rover, turn_rate: f32) {
        rover.set_turn_rate(turn_rate);
        self.command.turn_rate = turn_rate;
    }
}

impl<P: Plan, K: LogSink> Drop for MissionRunner<P, K> {
    fn drop(&mut self) {
        self.logger.close();
    }
}
