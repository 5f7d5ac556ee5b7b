//! Transition log message lookup
//!
//! Status text lives here, keyed by event, so the transition table stays
//! pure data and tests can assert on log content without tracing control
//! flow.

use core::fmt;

/// Something worth a line in the transition log
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogEvent {
    /// Run loop started
    PlanStarted,
    /// A new state was entered
    StateStart,
    /// Obstacle gate switched to blocked
    ObstacleDetected,
    /// Obstacle gate switched back to clear
    ObstacleCleared,
    /// Current state has no table entry
    UnknownState,
    /// Mission ended lost (after a safe stop)
    GotLost,
    /// Terminal guard satisfied
    Finished,
    /// External stop observed
    Stopped,
    /// Transition table could not be built
    InvalidTable,
}

impl LogEvent {
    /// Write the message text for mission `plan`
    pub fn write_message<W: fmt::Write>(self, plan: &str, out: &mut W) -> fmt::Result {
        match self {
            LogEvent::PlanStarted => write!(out, "{} started", plan),
            LogEvent::StateStart => out.write_str("state start"),
            LogEvent::ObstacleDetected => out.write_str("obstacle detected"),
            LogEvent::ObstacleCleared => out.write_str("obstacle cleared"),
            LogEvent::UnknownState => out.write_str("Unknown state"),
            LogEvent::GotLost => write!(out, "{} got lost", plan),
            LogEvent::Finished => write!(out, "{} finished", plan),
            LogEvent::Stopped => write!(out, "{} stopped", plan),
            LogEvent::InvalidTable => write!(out, "{} has an invalid transition table", plan),
        }
    }
}
