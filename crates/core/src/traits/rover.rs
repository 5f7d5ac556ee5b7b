//! Rover collaborator traits
//!
//! The pose integrator, the wheel mixer and the proximity sensor driver are
//! external services. The mission core only sees the narrow command/query
//! surface below.

/// Accumulated pose since the last reset.
pub trait PoseSource {
    /// Clear accumulated distance and turned angle.
    fn reset_pose(&mut self);

    /// Distance travelled since the last reset (meters).
    fn distance(&mut self) -> f32;

    /// Signed angle turned since the last reset (radians, positive = left).
    fn turned_angle(&mut self) -> f32;
}

/// Motion command sink (wheel mixer).
///
/// Each call supersedes the previous value for the same quantity.
pub trait Actuation {
    /// Set linear velocity (m/s).
    fn set_velocity(&mut self, velocity: f32);

    /// Set turn rate (rad/s, positive = left).
    fn set_turn_rate(&mut self, turn_rate: f32);

    /// Track a line/edge on the given side with a lateral offset (meters).
    fn set_edge_follow(&mut self, left: bool, offset: f32);

    /// Leave edge-following mode.
    fn clear_edge_follow(&mut self);
}

/// Proximity (distance) sensor.
pub trait Proximity {
    /// Latest reading on `channel` in meters; smaller is closer.
    fn reading(&mut self, channel: usize) -> f32;
}

/// Everything a mission drives: pose, actuation and proximity in one handle.
///
/// Blanket-implemented, so a simulator or a hardware facade only implements
/// the three parts.
pub trait Rover: PoseSource + Actuation + Proximity {}

impl<T: PoseSource + Actuation + Proximity> Rover for T {}
