//! State Transition Table
//!
//! A mission is data: for each state, the actions run once on entry, the
//! guard that ends the state, and where to go next. New missions extend a
//! table instead of adding branches to the run loop.
//!
//! [`evaluate`] picks the next step from the table and the current
//! readings. It is pure; commands, pose resets and log lines are issued by
//! the runner only when a state is entered.

use heapless::Vec;

use super::state::{EdgeFollow, PlanState, Readings};

/// Maximum number of states in one mission table
pub const MAX_STATES: usize = 16;

/// Edge-following change requested on entry
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum EdgeMode {
    /// Leave the current mode as is
    #[default]
    Keep,
    /// Stop following
    Off,
    /// Start following
    Follow(EdgeFollow),
}

/// Actions executed exactly once when a state is entered
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct EntryAction {
    /// Reset accumulated distance/angle
    pub reset_pose: bool,
    /// New linear velocity, if any
    pub velocity: Option<f32>,
    /// New turn rate, if any
    pub turn_rate: Option<f32>,
    /// Edge-following change
    pub edge: EdgeMode,
    /// Velocity is gated by the obstacle sub-machine while in this state
    pub gated: bool,
}

impl EntryAction {
    /// No action
    pub const NONE: Self = Self {
        reset_pose: false,
        velocity: None,
        turn_rate: None,
        edge: EdgeMode::Keep,
        gated: false,
    };

    /// Reset pose, then drive straight at `velocity`
    pub const fn drive(velocity: f32) -> Self {
        Self {
            reset_pose: true,
            velocity: Some(velocity),
            turn_rate: Some(0.0),
            edge: EdgeMode::Keep,
            gated: false,
        }
    }

    /// Reset pose, then turn on the spot at `turn_rate`
    pub const fn turn(turn_rate: f32) -> Self {
        Self {
            reset_pose: true,
            velocity: Some(0.0),
            turn_rate: Some(turn_rate),
            edge: EdgeMode::Keep,
            gated: false,
        }
    }

    /// Same action with an edge-following change
    pub const fn with_edge(mut self, edge: EdgeMode) -> Self {
        self.edge = edge;
        self
    }

    /// Same action with obstacle gating enabled
    pub const fn gated(mut self) -> Self {
        self.gated = true;
        self
    }
}

/// Condition that ends a state
///
/// Thresholds are strict: the guard is met once the reading is *above*
/// the threshold, never at it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Guard {
    /// Met on the first evaluation
    Immediately,
    /// Distance since reset exceeds the threshold (meters)
    DistanceAbove(f32),
    /// Absolute turned angle since reset exceeds the threshold (radians)
    TurnedAbove(f32),
    /// No obstacle within the safety threshold
    PathClear,
    /// Never met
    Never,
}

impl Guard {
    /// Evaluate the guard against one tick's readings
    pub fn is_met(&self, readings: &Readings) -> bool {
        match *self {
            Guard::Immediately => true,
            Guard::DistanceAbove(limit) => readings.pose.distance > limit,
            Guard::TurnedAbove(limit) => libm::fabsf(readings.pose.turned) > limit,
            Guard::PathClear => !readings.obstacle,
            Guard::Never => false,
        }
    }
}

/// Where a satisfied guard leads
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Next<S> {
    /// Enter another state
    State(S),
    /// Mission finished
    Finish,
}

/// One row of the transition table
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StateSpec<S> {
    /// State this row describes
    pub state: S,
    /// Actions run once on entry
    pub entry: EntryAction,
    /// Condition that ends the state
    pub guard: Guard,
    /// Successor once the guard is met
    pub next: Next<S>,
}

impl<S> StateSpec<S> {
    /// Create a table row
    pub const fn new(state: S, entry: EntryAction, guard: Guard, next: Next<S>) -> Self {
        Self {
            state,
            entry,
            guard,
            next,
        }
    }
}

/// Table construction errors
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TableError {
    /// More than `MAX_STATES` rows
    Full,
    /// Two rows for the same state
    Duplicate,
}

/// Outcome of one evaluation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step<S> {
    /// Guard not met, remain in the current state
    Stay,
    /// Guard met, enter the given state
    Enter(S),
    /// Guard met on a terminal row
    Finish,
    /// Current state has no row in the table
    Lost,
}

/// Mission transition table
#[derive(Clone, Debug)]
pub struct TransitionTable<S> {
    specs: Vec<StateSpec<S>, MAX_STATES>,
}

impl<S: PlanState> TransitionTable<S> {
    /// Create an empty table
    pub const fn new() -> Self {
        Self { specs: Vec::new() }
    }

    /// Build a table from rows
    pub fn from_specs(specs: &[StateSpec<S>]) -> Result<Self, TableError> {
        let mut table = Self::new();
        for spec in specs {
            table.insert(*spec)?;
        }
        Ok(table)
    }

    /// Add a row
    pub fn insert(&mut self, spec: StateSpec<S>) -> Result<(), TableError> {
        if self.contains(spec.state) {
            return Err(TableError::Duplicate);
        }
        self.specs.push(spec).map_err(|_| TableError::Full)
    }

    /// Row for `state`, if the table defines one
    pub fn spec(&self, state: S) -> Option<&StateSpec<S>> {
        self.specs.iter().find(|spec| spec.state == state)
    }

    /// Does the table define `state`?
    pub fn contains(&self, state: S) -> bool {
        self.spec(state).is_some()
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// Check if the table has no rows
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// All rows in insertion order
    pub fn specs(&self) -> &[StateSpec<S>] {
        &self.specs
    }

    /// States reachable from `entry` by following `next` links, `entry`
    /// included. States referenced but not defined are listed too; they are
    /// where a run would end up lost.
    pub fn reachable_from(&self, entry: S) -> Vec<S, MAX_STATES> {
        let mut reached: Vec<S, MAX_STATES> = Vec::new();
        let mut current = Some(entry);
        while let Some(state) = current {
            if reached.contains(&state) || reached.push(state).is_err() {
                break;
            }
            current = match self.spec(state).map(|spec| spec.next) {
                Some(Next::State(next)) => Some(next),
                _ => None,
            };
        }
        reached
    }
}

impl<S: PlanState> Default for TransitionTable<S> {
    fn default() -> Self {
        Self::new()
    }
}

/// Decide the next step for `current` given this tick's readings.
///
/// Deterministic and side-effect free.
pub fn evaluate<S: PlanState>(table: &TransitionTable<S>, current: S, readings: &Readings) -> Step<S> {
    let Some(spec) = table.spec(current) else {
        return Step::Lost;
    };
    if !spec.guard.is_met(readings) {
        return Step::Stay;
    }
    match spec.next {
        Next::State(next) => Step::Enter(next),
        Next::Finish => Step::Finish,
    }
}
