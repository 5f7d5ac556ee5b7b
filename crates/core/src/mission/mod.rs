//! Mission Sequencing
//!
//! Table-driven state machines for fixed rover missions.
//!
//! # Layout
//!
//! - [`state`]: state tags, lifecycle status, per-tick readings
//! - [`table`]: transition table and the pure [`evaluate`] step
//! - [`obstacle`]: clear/blocked proximity gate
//! - [`messages`]: transition log message catalogue
//! - [`logger`]: timestamped transition log over a [`LogSink`](crate::traits::LogSink)
//! - [`runner`]: lifecycle controller driving one mission
//! - [`selector`]: owns one runner per mission, runs one at a time
//!
//! # Note
//!
//! This module is pure logic. Sinks, clocks and the rover itself are
//! reached through [`crate::traits`].

pub mod logger;
pub mod messages;
pub mod obstacle;
pub mod runner;
pub mod selector;
pub mod state;
pub mod table;

#[cfg(test)]
pub(crate) mod testing;

pub use logger::{format_line, TransitionLogger, LOG_HEADER};
pub use messages::LogEvent;
pub use obstacle::{GateEvent, GatePhase, ObstacleGate, DEFAULT_OBSTACLE_DISTANCE};
pub use runner::{MissionContext, MissionRunner, ObstacleConfig, Plan, RunOutcome, Tick};
pub use selector::{MissionKind, MissionSelector};
pub use state::{EdgeFollow, MissionStatus, MotionCommand, PlanState, PoseDelta, Readings};
pub use table::{
    evaluate, EdgeMode, EntryAction, Guard, Next, StateSpec, Step, TableError, TransitionTable,
};
