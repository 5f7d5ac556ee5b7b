//! Mission Selector
//!
//! Owns one runner per mission. [`MissionSelector::run`] borrows the
//! selector mutably, so only one mission can drive the actuators at a time.

use super::runner::{MissionContext, MissionRunner, RunOutcome};
use super::state::MissionStatus;
use crate::parameters::ParameterStore;
use crate::plans::{GatePlan, ObstaclePlan};
use crate::traits::{LogSink, SinkProvider, TimeSource};

/// Selectable missions
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MissionKind {
    /// Gate traversal (`plan20`)
    Gate,
    /// Obstacle-gated advance (`plan24`)
    ObstacleAdvance,
}

impl MissionKind {
    /// All missions, in selection order
    pub const ALL: [MissionKind; 2] = [MissionKind::Gate, MissionKind::ObstacleAdvance];

    /// Mission name as used for log files and the command line
    pub fn name(self) -> &'static str {
        match self {
            MissionKind::Gate => "plan20",
            MissionKind::ObstacleAdvance => "plan24",
        }
    }

    /// Look up a mission by name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

/// Registry of mission runners
pub struct MissionSelector<K: LogSink> {
    gate: MissionRunner<GatePlan, K>,
    obstacle: MissionRunner<ObstaclePlan, K>,
}

impl<K: LogSink> MissionSelector<K> {
    pub fn new() -> Self {
        Self {
            gate: MissionRunner::new(),
            obstacle: MissionRunner::new(),
        }
    }

    /// Seed defaults and open sinks for every mission
    pub fn setup_all(&mut self, store: &mut ParameterStore, sinks: &mut dyn SinkProvider<Sink = K>) {
        self.gate.setup(store, sinks);
        self.obstacle.setup(store, sinks);
    }

    /// Seed defaults and open sinks for one mission
    pub fn setup(
        &mut self,
        kind: MissionKind,
        store: &mut ParameterStore,
        sinks: &mut dyn SinkProvider<Sink = K>,
    ) {
        match kind {
            MissionKind::Gate => self.gate.setup(store, sinks),
            MissionKind::ObstacleAdvance => self.obstacle.setup(store, sinks),
        }
    }

    /// Run one mission to completion
    pub fn run<T: TimeSource>(
        &mut self,
        kind: MissionKind,
        ctx: &mut MissionContext<'_, T, K>,
    ) -> RunOutcome {
        crate::log_info!("selected mission {}", kind.name());
        match kind {
            MissionKind::Gate => self.gate.run(ctx),
            MissionKind::ObstacleAdvance => self.obstacle.run(ctx),
        }
    }

    /// Lifecycle status of one mission
    pub fn status(&self, kind: MissionKind) -> MissionStatus {
        match kind {
            MissionKind::Gate => self.gate.status(),
            MissionKind::ObstacleAdvance => self.obstacle.status(),
        }
    }

    /// Close every mission's sinks
    pub fn terminate_all(&mut self) {
        self.gate.terminate();
        self.obstacle.terminate();
    }
}

impl<K: LogSink> Default for MissionSelector<K> {
    fn default() -> Self {
        Self::new()
    }
}
