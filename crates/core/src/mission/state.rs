//! Mission State Types
//!
//! Pure data types shared by every mission: the state tag contract, the
//! lifecycle status, and the per-tick readings the evaluator consumes.

use core::fmt::Debug;

/// A mission's discrete maneuver step.
///
/// Implemented by a plain enum per mission. `id()` is the number written to
/// the state column of the transition log.
pub trait PlanState: Copy + PartialEq + Debug {
    /// Numeric id for the transition log
    fn id(self) -> u16;

    /// Human-readable name for diagnostics
    fn name(self) -> &'static str;
}

/// Mission lifecycle status
///
/// `Uninitialized -> Configured -> Running -> {Finished | Lost | Aborted} -> Terminated`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum MissionStatus {
    /// `setup()` has not run
    #[default]
    Uninitialized,
    /// Defaults seeded, sinks open
    Configured,
    /// Run loop active
    Running,
    /// Terminal guard satisfied
    Finished,
    /// Reached a state with no table entry
    Lost,
    /// External stop observed
    Aborted,
    /// `terminate()` closed the sinks
    Terminated,
}

impl MissionStatus {
    /// Is this one of the run-loop exit states?
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            MissionStatus::Finished | MissionStatus::Lost | MissionStatus::Aborted
        )
    }
}

/// Accumulated distance/angle since the last `reset_pose()`.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct PoseDelta {
    /// Distance travelled (meters)
    pub distance: f32,
    /// Signed angle turned (radians)
    pub turned: f32,
}

/// Snapshot of everything a guard may look at during one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Readings {
    /// Pose since the last reset
    pub pose: PoseDelta,
    /// Latest proximity reading (meters), `f32::MAX` when the mission has
    /// no proximity channel
    pub proximity: f32,
    /// True while the proximity reading is at or below the safety threshold
    pub obstacle: bool,
}

impl Default for Readings {
    fn default() -> Self {
        Self {
            pose: PoseDelta::default(),
            proximity: f32::MAX,
            obstacle: false,
        }
    }
}

/// Edge/line following request
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeFollow {
    /// Follow the left edge (false = right)
    pub left: bool,
    /// Lateral offset from the edge (meters)
    pub offset: f32,
}

/// The command most recently sent to the actuation service
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct MotionCommand {
    /// Linear velocity (m/s)
    pub velocity: f32,
    /// Turn rate (rad/s)
    pub turn_rate: f32,
    /// Active edge-following mode
    pub edge: Option<EdgeFollow>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mission_status_default() {
        assert_eq!(MissionStatus::default(), MissionStatus::Uninitialized);
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(MissionStatus::Finished.is_terminal());
        assert!(MissionStatus::Lost.is_terminal());
        assert!(MissionStatus::Aborted.is_terminal());
        assert!(!MissionStatus::Running.is_terminal());
        assert!(!MissionStatus::Terminated.is_terminal());
    }

    #[test]
    fn test_readings_default_has_no_obstacle() {
        let readings = Readings::default();
        assert!(!readings.obstacle);
        assert_eq!(readings.proximity, f32::MAX);
        assert_eq!(readings.pose, PoseDelta::default());
    }
}
