//! Gate Traversal Mission (`plan20`)
//!
//! Fixed sequence of straight runs and on-the-spot turns that takes the
//! rover through a gate, across the course and onto the goal line. Each
//! segment ends on accumulated distance or absolute turned angle since the
//! segment's own pose reset.
//!
//! # Parameters
//!
//! - `PLAN20_SPEED` - straight-line velocity (m/s)
//! - `PLAN20_TURN_RATE` - turn rate magnitude (rad/s)
//! - `PLAN20_EDGE` - follow the line edge on straight segments
//! - `PLAN20_EDGE_LEFT` - follow the left edge (right otherwise)
//! - `PLAN20_EDGE_OFFSET` - lateral offset from the edge (m)
//!
//! plus the common flags of [`MissionFlags`](crate::parameters::MissionFlags).

use crate::mission::{
    EdgeFollow, EdgeMode, EntryAction, Guard, Next, Plan, PlanState, StateSpec, TableError,
    TransitionTable,
};
use crate::parameters::{ParamValue, ParameterError, ParameterStore};

/// Quarter turn as used by the course layout (radians)
pub const QUARTER_TURN: f32 = 1.5707;

const DEFAULT_SPEED: f32 = 0.3;
const DEFAULT_TURN_RATE: f32 = 1.0;
const MAX_SPEED: f32 = 2.0;
const MAX_TURN_RATE: f32 = 4.0;
const MAX_EDGE_OFFSET: f32 = 0.5;

/// States of the gate traversal
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateState {
    /// Drive up to the first gate
    Advance,
    /// Turn right to face the gate
    AlignFirstGate,
    /// Drive through the gate
    PassFirstGate,
    /// Turn left towards the crossing
    AlignCrossing,
    /// Drive across the course
    CrossingRun,
    /// Turn left to face the goal
    AlignGoal,
    /// Drive onto the goal line
    GoalRun,
}

impl PlanState for GateState {
    fn id(self) -> u16 {
        match self {
            GateState::Advance => 12,
            GateState::AlignFirstGate => 14,
            GateState::PassFirstGate => 16,
            GateState::AlignCrossing => 18,
            GateState::CrossingRun => 20,
            GateState::AlignGoal => 22,
            GateState::GoalRun => 24,
        }
    }

    fn name(self) -> &'static str {
        match self {
            GateState::Advance => "advance",
            GateState::AlignFirstGate => "align_first_gate",
            GateState::PassFirstGate => "pass_first_gate",
            GateState::AlignCrossing => "align_crossing",
            GateState::CrossingRun => "crossing_run",
            GateState::AlignGoal => "align_goal",
            GateState::GoalRun => "goal_run",
        }
    }
}

/// Gate traversal tunables
#[derive(Debug, Clone, PartialEq)]
pub struct GatePlan {
    /// Straight-line velocity (m/s)
    pub speed: f32,
    /// Turn rate magnitude (rad/s)
    pub turn_rate: f32,
    /// Edge following on straight segments, if enabled
    pub edge: Option<EdgeFollow>,
}

impl Default for GatePlan {
    fn default() -> Self {
        Self {
            speed: DEFAULT_SPEED,
            turn_rate: DEFAULT_TURN_RATE,
            edge: None,
        }
    }
}

impl GatePlan {
    fn straight(&self) -> EntryAction {
        let action = EntryAction::drive(self.speed);
        match self.edge {
            Some(edge) => action.with_edge(EdgeMode::Follow(edge)),
            None => action,
        }
    }

    fn turn(&self, turn_rate: f32) -> EntryAction {
        let action = EntryAction::turn(turn_rate);
        if self.edge.is_some() {
            action.with_edge(EdgeMode::Off)
        } else {
            action
        }
    }
}

impl Plan for GatePlan {
    type State = GateState;
    const NAME: &'static str = "plan20";
    const PREFIX: &'static str = "PLAN20";
    const RUN_BY_DEFAULT: bool = false;

    fn register_defaults(store: &mut ParameterStore) -> Result<(), ParameterError> {
        store.register("PLAN20_SPEED", ParamValue::Float(DEFAULT_SPEED))?;
        store.register("PLAN20_TURN_RATE", ParamValue::Float(DEFAULT_TURN_RATE))?;
        store.register("PLAN20_EDGE", ParamValue::Bool(false))?;
        store.register("PLAN20_EDGE_LEFT", ParamValue::Bool(true))?;
        store.register("PLAN20_EDGE_OFFSET", ParamValue::Float(0.0))?;
        Ok(())
    }

    fn from_store(store: &ParameterStore) -> Self {
        let speed = store
            .get_f32("PLAN20_SPEED", DEFAULT_SPEED)
            .clamp(0.0, MAX_SPEED);
        // Sign comes from the table, the parameter is a magnitude
        let turn_rate = libm::fabsf(store.get_f32("PLAN20_TURN_RATE", DEFAULT_TURN_RATE))
            .min(MAX_TURN_RATE);

        let edge = store.get_bool("PLAN20_EDGE", false).then(|| EdgeFollow {
            left: store.get_bool("PLAN20_EDGE_LEFT", true),
            offset: store
                .get_f32("PLAN20_EDGE_OFFSET", 0.0)
                .clamp(-MAX_EDGE_OFFSET, MAX_EDGE_OFFSET),
        });

        Self {
            speed,
            turn_rate,
            edge,
        }
    }

    fn entry_state(&self) -> GateState {
        GateState::Advance
    }

    #[rustfmt::skip]
    fn table(&self) -> Result<TransitionTable<GateState>, TableError> {
        use GateState::*;

        let right = self.turn(-self.turn_rate);
        let left = self.turn(self.turn_rate);

        TransitionTable::from_specs(&[
            StateSpec::new(Advance, self.straight(), Guard::DistanceAbove(0.75), Next::State(AlignFirstGate)),
            StateSpec::new(AlignFirstGate, right, Guard::TurnedAbove(QUARTER_TURN), Next::State(PassFirstGate)),
            StateSpec::new(PassFirstGate, self.straight(), Guard::DistanceAbove(2.5), Next::State(AlignCrossing)),
            StateSpec::new(AlignCrossing, left, Guard::TurnedAbove(0.7), Next::State(CrossingRun)),
            StateSpec::new(CrossingRun, self.straight(), Guard::DistanceAbove(5.0), Next::State(AlignGoal)),
            StateSpec::new(AlignGoal, left, Guard::TurnedAbove(QUARTER_TURN), Next::State(GoalRun)),
            StateSpec::new(GoalRun, self.straight(), Guard::DistanceAbove(3.0), Next::Finish),
        ])
    }

    fn entry_note(&self, state: GateState) -> Option<&'static str> {
        match state {
            GateState::Advance => Some("Backup plan started"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mission::testing::{Command, MemorySink, MemorySinks, MockRover, ScriptedLoop};
    use crate::mission::{MissionContext, MissionRunner, MissionStatus, RunOutcome, Tick};
    use crate::traits::MockTime;

    type Runner = MissionRunner<GatePlan, MemorySink>;

    fn started(store: &mut ParameterStore, rover: &mut MockRover) -> Runner {
        let mut sinks = MemorySinks::default();
        let mut runner = Runner::new();
        runner.setup(store, &mut sinks);
        runner.begin(store, rover, 0);
        runner
    }

    #[test]
    fn test_gate_plan_defaults() {
        let mut store = ParameterStore::new();
        GatePlan::register_defaults(&mut store).unwrap();

        let plan = GatePlan::from_store(&store);
        assert_eq!(plan, GatePlan::default());
        assert!((plan.speed - 0.3).abs() < 0.001);
    }

    #[test]
    fn test_gate_plan_from_store_clamps() {
        let mut store = ParameterStore::new();
        GatePlan::register_defaults(&mut store).unwrap();
        store.set_str("PLAN20_SPEED", "9.0").unwrap();
        store.set_str("PLAN20_TURN_RATE", "-0.5").unwrap();
        store.set_str("PLAN20_EDGE", "true").unwrap();
        store.set_str("PLAN20_EDGE_OFFSET", "0.02").unwrap();

        let plan = GatePlan::from_store(&store);
        assert_eq!(plan.speed, MAX_SPEED);
        assert_eq!(plan.turn_rate, 0.5);
        assert_eq!(
            plan.edge,
            Some(EdgeFollow {
                left: true,
                offset: 0.02
            })
        );
    }

    #[test]
    fn test_gate_table_is_complete() {
        let plan = GatePlan::default();
        let table = plan.table().unwrap();
        let reachable = table.reachable_from(plan.entry_state());

        assert_eq!(table.len(), 7);
        assert_eq!(reachable.len(), 7);
        assert!(reachable.iter().all(|s| table.contains(*s)));
        assert_eq!(table.spec(GateState::GoalRun).unwrap().next, Next::Finish);
    }

    #[test]
    fn test_advance_hands_over_to_right_turn() {
        let mut store = ParameterStore::new();
        store.register("PLAN20_RUN", ParamValue::Bool(true)).unwrap();
        let mut rover = MockRover::default();
        let mut runner = started(&mut store, &mut rover);
        assert_eq!(runner.state(), GateState::Advance);
        rover.commands.clear();

        for d in [0.1, 0.3, 0.5, 0.7, 0.75] {
            rover.distance = d;
            assert_eq!(runner.step(&mut rover, 0), Tick::Stayed);
            assert!(rover.commands.is_empty());
        }

        rover.distance = 0.76;
        assert_eq!(
            runner.step(&mut rover, 0),
            Tick::Entered(GateState::AlignFirstGate)
        );
        assert_eq!(rover.distance, 0.0);
        assert_eq!(
            rover.commands,
            vec![Command::ResetPose, Command::Velocity(0.0), Command::TurnRate(-1.0)]
        );
    }

    #[test]
    fn test_turn_guard_uses_absolute_angle() {
        let mut store = ParameterStore::new();
        let mut rover = MockRover::default();
        let mut runner = started(&mut store, &mut rover);
        rover.distance = 1.0;
        runner.step(&mut rover, 0);

        rover.turned = -1.5707;
        assert_eq!(runner.step(&mut rover, 0), Tick::Stayed);
        rover.turned = -1.6;
        assert_eq!(
            runner.step(&mut rover, 0),
            Tick::Entered(GateState::PassFirstGate)
        );
    }

    #[test]
    fn test_edge_follow_on_straights_only() {
        let mut store = ParameterStore::new();
        GatePlan::register_defaults(&mut store).unwrap();
        store.set_str("PLAN20_EDGE", "true").unwrap();
        store.set_str("PLAN20_EDGE_LEFT", "false").unwrap();
        let mut rover = MockRover::default();
        let mut runner = started(&mut store, &mut rover);

        assert!(rover.commands.contains(&Command::EdgeFollow(false, 0.0)));
        rover.commands.clear();
        rover.distance = 1.0;
        runner.step(&mut rover, 0);
        assert_eq!(rover.commands[1], Command::EdgeOff);
        assert_eq!(runner.command().edge, None);
    }

    #[test]
    fn test_gate_mission_runs_to_finish() {
        let mut store = ParameterStore::new();
        store.register("PLAN20_RUN", ParamValue::Bool(true)).unwrap();
        let mut sinks = MemorySinks::default();
        let mut rover = MockRover::with_kinematics();
        let clock = MockTime::new();
        let mut control = ScriptedLoop::new(&clock);
        let mut runner = Runner::new();

        let outcome = runner.run(&mut MissionContext {
            store: &mut store,
            sinks: &mut sinks,
            rover: &mut rover,
            clock: &clock,
            control: &mut control,
        });

        assert_eq!(outcome, RunOutcome::Finished);
        assert_eq!(runner.state(), GateState::GoalRun);
        assert_eq!(runner.status(), MissionStatus::Finished);

        let lines = sinks.file_lines();
        let starts: Vec<&str> = lines
            .iter()
            .filter(|l| l.ends_with("% state start"))
            .map(|l| l.split(' ').nth(1).unwrap())
            .collect();
        assert_eq!(starts, ["12", "14", "16", "18", "20", "22", "24"]);
        assert_eq!(lines[3], "0.0000 12 % plan20 started");
        assert_eq!(lines[4], "0.0000 12 % Backup plan started");
        assert!(lines.last().unwrap().ends_with("24 % plan20 finished"));
    }

    #[test]
    fn test_gate_mission_off_by_default() {
        let mut store = ParameterStore::new();
        let mut sinks = MemorySinks::default();
        let mut rover = MockRover::default();
        let clock = MockTime::new();
        let mut control = ScriptedLoop::new(&clock);
        let mut runner = Runner::new();

        let outcome = runner.run(&mut MissionContext {
            store: &mut store,
            sinks: &mut sinks,
            rover: &mut rover,
            clock: &clock,
            control: &mut control,
        });

        assert_eq!(outcome, RunOutcome::Skipped);
        assert!(!store.get_bool("PLAN20_RUN", true));
        assert!(rover.commands.is_empty());
    }
}
