//! Obstacle interruption sub-machine
//!
//! Two phases nested inside any gated mission state:
//!
//! - `Clear`: the commanded velocity is active
//! - `Blocked`: velocity forced to zero until the reading rises above the
//!   safety threshold again
//!
//! The gate only suspends velocity. It never resets or reads the pose, so it
//! can fire any number of times within one outer state without disturbing
//! the distance guard.
//!
//! There is no hysteresis band: a reading oscillating exactly at the
//! threshold switches phase on every tick.

/// Default safety threshold (meters)
pub const DEFAULT_OBSTACLE_DISTANCE: f32 = 0.08;

/// Gate phase
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum GatePhase {
    /// Path clear, commanded velocity active
    #[default]
    Clear,
    /// Obstacle within threshold, velocity held at zero
    Blocked,
}

/// Phase change reported by [`ObstacleGate::update`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateEvent {
    /// Clear -> Blocked
    Detected,
    /// Blocked -> Clear
    Cleared,
}

/// Obstacle gate
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObstacleGate {
    phase: GatePhase,
    threshold: f32,
}

impl ObstacleGate {
    /// Create a gate in the `Clear` phase
    pub const fn new(threshold: f32) -> Self {
        Self {
            phase: GatePhase::Clear,
            threshold,
        }
    }

    /// Current phase
    pub fn phase(&self) -> GatePhase {
        self.phase
    }

    /// Safety threshold (meters)
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// True while blocked (the obstacle flag)
    pub fn is_blocked(&self) -> bool {
        self.phase == GatePhase::Blocked
    }

    /// Is a reading at or below the safety threshold?
    pub fn is_obstacle(&self, proximity: f32) -> bool {
        proximity <= self.threshold
    }

    /// Back to `Clear` without reporting an event
    pub fn reset(&mut self) {
        self.phase = GatePhase::Clear;
    }

    /// Feed one proximity reading; returns the phase change, if any
    pub fn update(&mut self, proximity: f32) -> Option<GateEvent> {
        let obstacle = self.is_obstacle(proximity);
        match (self.phase, obstacle) {
            (GatePhase::Clear, true) => {
                self.phase = GatePhase::Blocked;
                Some(GateEvent::Detected)
            }
            (GatePhase::Blocked, false) => {
                self.phase = GatePhase::Clear;
                Some(GateEvent::Cleared)
            }
            _ => None,
        }
    }
}

impl Default for ObstacleGate {
    fn default() -> Self {
        Self::new(DEFAULT_OBSTACLE_DISTANCE)
    }
}
