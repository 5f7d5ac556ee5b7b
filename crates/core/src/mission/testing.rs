//! Test doubles shared by the mission and plan tests

use crate::traits::{
    Actuation, LogSink, LoopControl, MockTime, PoseSource, Proximity, SinkError, SinkProvider,
};
use std::cell::RefCell;
use std::rc::Rc;
use std::string::{String, ToString};
use std::vec::Vec;

/// One call made on [`MockRover`]
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    ResetPose,
    Velocity(f32),
    TurnRate(f32),
    EdgeFollow(bool, f32),
    EdgeOff,
}

/// Rover double that records every actuator call
///
/// With kinematics enabled each `distance()` read integrates one 0.1 s
/// step of the commanded velocity and turn rate.
#[derive(Default)]
pub struct MockRover {
    pub distance: f32,
    pub turned: f32,
    pub proximity: f32,
    /// Proximity readings consumed one per read; `proximity` once drained
    pub trace: Vec<f32>,
    pub velocity: f32,
    pub turn_rate: f32,
    pub kinematics: bool,
    pub commands: Vec<Command>,
}

impl MockRover {
    pub fn with_kinematics() -> Self {
        Self {
            kinematics: true,
            proximity: f32::MAX,
            ..Self::default()
        }
    }

    pub fn with_trace(trace: &[f32]) -> Self {
        Self {
            proximity: f32::MAX,
            trace: trace.iter().rev().copied().collect(),
            ..Self::default()
        }
    }

    /// Velocities commanded so far
    pub fn velocities(&self) -> Vec<f32> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                Command::Velocity(v) => Some(*v),
                _ => None,
            })
            .collect()
    }
}

impl PoseSource for MockRover {
    fn reset_pose(&mut self) {
        self.distance = 0.0;
        self.turned = 0.0;
        self.commands.push(Command::ResetPose);
    }

    fn distance(&mut self) -> f32 {
        if self.kinematics {
            self.distance += self.velocity.abs() * 0.1;
            self.turned += self.turn_rate * 0.1;
        }
        self.distance
    }

    fn turned_angle(&mut self) -> f32 {
        self.turned
    }
}

impl Actuation for MockRover {
    fn set_velocity(&mut self, velocity: f32) {
        self.velocity = velocity;
        self.commands.push(Command::Velocity(velocity));
    }

    fn set_turn_rate(&mut self, turn_rate: f32) {
        self.turn_rate = turn_rate;
        self.commands.push(Command::TurnRate(turn_rate));
    }

    fn set_edge_follow(&mut self, left: bool, offset: f32) {
        self.commands.push(Command::EdgeFollow(left, offset));
    }

    fn clear_edge_follow(&mut self) {
        self.commands.push(Command::EdgeOff);
    }
}

impl Proximity for MockRover {
    fn reading(&mut self, _channel: usize) -> f32 {
        self.trace.pop().unwrap_or(self.proximity)
    }
}

/// In-memory log sink
#[derive(Clone, Default)]
pub struct MemorySink {
    pub lines: Rc<RefCell<Vec<String>>>,
}

impl LogSink for MemorySink {
    fn write_line(&mut self, line: &str) -> Result<(), SinkError> {
        self.lines.borrow_mut().push(line.to_string());
        Ok(())
    }
}

/// Sink provider handing out [`MemorySink`]s
#[derive(Default)]
pub struct MemorySinks {
    pub file: MemorySink,
    pub console: MemorySink,
    pub opened: usize,
    /// Refuse to open log files
    pub unavailable: bool,
}

impl MemorySinks {
    pub fn file_lines(&self) -> Vec<String> {
        self.file.lines.borrow().clone()
    }

    pub fn console_lines(&self) -> Vec<String> {
        self.console.lines.borrow().clone()
    }
}

impl SinkProvider for MemorySinks {
    type Sink = MemorySink;

    fn open_log(&mut self, _plan: &str) -> Option<MemorySink> {
        if self.unavailable {
            return None;
        }
        self.opened += 1;
        Some(self.file.clone())
    }

    fn console(&mut self) -> Option<MemorySink> {
        Some(self.console.clone())
    }
}

/// Loop control that advances a [`MockTime`] instead of sleeping
pub struct ScriptedLoop<'a> {
    clock: &'a MockTime,
    stop_after: usize,
    pub waits: usize,
}

impl<'a> ScriptedLoop<'a> {
    pub fn new(clock: &'a MockTime) -> Self {
        Self {
            clock,
            stop_after: 10_000,
            waits: 0,
        }
    }

    pub fn stop_after(mut self, waits: usize) -> Self {
        self.stop_after = waits;
        self
    }
}

impl LoopControl for ScriptedLoop<'_> {
    fn should_stop(&mut self) -> bool {
        self.waits >= self.stop_after
    }

    fn wait(&mut self, interval_us: u64) {
        self.waits += 1;
        self.clock.advance(interval_us);
    }
}
