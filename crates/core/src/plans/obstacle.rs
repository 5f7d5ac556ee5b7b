//! Obstacle-Gated Advance Mission (`plan24`)
//!
//! Waits for a clear path, then drives forward. While advancing, a
//! proximity reading at or below the safety threshold suspends the
//! velocity until the path clears again; accumulated distance keeps
//! counting across suspensions. The mission finishes after `PLAN24_DIST`.
//!
//! # Parameters
//!
//! - `PLAN24_SPEED` - forward velocity (m/s)
//! - `PLAN24_OBST_DIST` - safety threshold (m)
//! - `PLAN24_OBST_CH` - proximity sensor channel
//! - `PLAN24_DIST` - distance to cover before finishing (m)

use crate::mission::{
    EntryAction, Guard, Next, ObstacleConfig, Plan, PlanState, StateSpec, TableError,
    TransitionTable, DEFAULT_OBSTACLE_DISTANCE,
};
use crate::parameters::{ParamValue, ParameterError, ParameterStore};

const DEFAULT_SPEED: f32 = 0.3;
const DEFAULT_DISTANCE: f32 = 2.0;
const MAX_SPEED: f32 = 2.0;
const MAX_CHANNEL: u32 = 7;

/// States of the obstacle-gated advance
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObstacleState {
    /// Hold until nothing is within the safety threshold
    CheckPath,
    /// Drive forward, gated by the proximity reading
    Advance,
}

impl PlanState for ObstacleState {
    fn id(self) -> u16 {
        match self {
            ObstacleState::CheckPath => 240,
            ObstacleState::Advance => 242,
        }
    }

    fn name(self) -> &'static str {
        match self {
            ObstacleState::CheckPath => "check_path",
            ObstacleState::Advance => "advance",
        }
    }
}

/// Obstacle-gated advance tunables
#[derive(Debug, Clone, PartialEq)]
pub struct ObstaclePlan {
    /// Forward velocity while the path is clear (m/s)
    pub speed: f32,
    /// Proximity at or below which the rover holds (m)
    pub threshold: f32,
    /// Proximity sensor channel watched by the gate
    pub channel: usize,
    /// Distance to cover before finishing (m)
    pub distance: f32,
}

impl Default for ObstaclePlan {
    fn default() -> Self {
        Self {
            speed: DEFAULT_SPEED,
            threshold: DEFAULT_OBSTACLE_DISTANCE,
            channel: 0,
            distance: DEFAULT_DISTANCE,
        }
    }
}

impl Plan for ObstaclePlan {
    type State = ObstacleState;
    const NAME: &'static str = "plan24";
    const PREFIX: &'static str = "PLAN24";
    const RUN_BY_DEFAULT: bool = true;

    fn register_defaults(store: &mut ParameterStore) -> Result<(), ParameterError> {
        store.register("PLAN24_SPEED", ParamValue::Float(DEFAULT_SPEED))?;
        store.register("PLAN24_OBST_DIST", ParamValue::Float(DEFAULT_OBSTACLE_DISTANCE))?;
        store.register("PLAN24_OBST_CH", ParamValue::Int(0))?;
        store.register("PLAN24_DIST", ParamValue::Float(DEFAULT_DISTANCE))?;
        Ok(())
    }

    fn from_store(store: &ParameterStore) -> Self {
        Self {
            speed: store
                .get_f32("PLAN24_SPEED", DEFAULT_SPEED)
                .clamp(0.0, MAX_SPEED),
            threshold: store
                .get_f32("PLAN24_OBST_DIST", DEFAULT_OBSTACLE_DISTANCE)
                .max(0.0),
            channel: store.get_u32("PLAN24_OBST_CH", 0).min(MAX_CHANNEL) as usize,
            distance: store
                .get_f32("PLAN24_DIST", DEFAULT_DISTANCE)
                .max(0.0),
        }
    }

    fn entry_state(&self) -> ObstacleState {
        ObstacleState::CheckPath
    }

    fn table(&self) -> Result<TransitionTable<ObstacleState>, TableError> {
        let check = EntryAction {
            reset_pose: true,
            ..EntryAction::NONE
        };

        TransitionTable::from_specs(&[
            StateSpec::new(
                ObstacleState::CheckPath,
                check,
                Guard::PathClear,
                Next::State(ObstacleState::Advance),
            ),
            StateSpec::new(
                ObstacleState::Advance,
                EntryAction::drive(self.speed).gated(),
                Guard::DistanceAbove(self.distance),
                Next::Finish,
            ),
        ])
    }

    fn entry_note(&self, state: ObstacleState) -> Option<&'static str> {
        match state {
            ObstacleState::CheckPath => Some("Checking for obstacles."),
            ObstacleState::Advance => Some("Path is clear, moving forward."),
        }
    }

    fn obstacle(&self) -> Option<ObstacleConfig> {
        Some(ObstacleConfig {
            channel: self.channel,
            threshold: self.threshold,
        })
    }
}
