//! Simulated rover for host runs.
//!
//! Unicycle kinematics integrated lazily against a [`TimeSource`]: every
//! pose read or new command first catches the model up to the current
//! time in fixed steps. Proximity comes from a scripted trace (one value
//! per read) and falls back to a clear reading, with optional Gaussian
//! noise from a seeded RNG for reproducible runs.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rover_plan_core::traits::{Actuation, PoseSource, Proximity, TimeSource};

/// Configuration for the simulated rover.
#[derive(Debug, Clone)]
pub struct SimRoverConfig {
    /// Maximum vehicle speed in m/s.
    pub max_speed: f32,
    /// Maximum turn rate in rad/s.
    pub max_turn_rate: f32,
    /// Integration step in microseconds.
    pub step_size_us: u64,
    /// Number of proximity channels.
    pub proximity_channels: usize,
    /// Reading once the trace is exhausted (meters).
    pub clear_distance: f32,
    /// Proximity noise standard deviation in meters.
    pub proximity_noise_m: f32,
    /// RNG seed for deterministic mode. None = random.
    pub seed: Option<u64>,
}

impl Default for SimRoverConfig {
    fn default() -> Self {
        Self {
            max_speed: 1.0,
            max_turn_rate: 2.0,
            step_size_us: 10_000, // 100 Hz
            proximity_channels: 4,
            clear_distance: 2.0,
            proximity_noise_m: 0.0,
            seed: None,
        }
    }
}

/// Command received by the simulated rover
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RoverCommand {
    ResetPose,
    Velocity(f32),
    TurnRate(f32),
    EdgeFollow { left: bool, offset: f32 },
    EdgeOff,
}

/// A command and the simulated time it arrived
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CommandRecord {
    pub at_us: u64,
    pub command: RoverCommand,
}

#[derive(Debug, Clone, Default)]
struct RoverState {
    x: f32,
    y: f32,
    heading: f32,
    velocity: f32,
    turn_rate: f32,
    /// Distance since the last pose reset
    distance: f32,
    /// Signed angle since the last pose reset
    turned: f32,
}

/// Simulated rover implementing the mission collaborator traits
pub struct SimRover<T: TimeSource> {
    config: SimRoverConfig,
    clock: T,
    rng: StdRng,
    state: RoverState,
    last_us: u64,
    trace: VecDeque<f32>,
    edge: Option<(bool, f32)>,
    history: Vec<CommandRecord>,
    /// An unsimulated channel was already reported
    channel_warned: bool,
}

impl<T: TimeSource> SimRover<T> {
    pub fn new(clock: T, config: SimRoverConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let last_us = clock.now_us();
        Self {
            config,
            clock,
            rng,
            state: RoverState::default(),
            last_us,
            trace: VecDeque::new(),
            edge: None,
            history: Vec::new(),
            channel_warned: false,
        }
    }

    /// Queue proximity readings, consumed one per read
    pub fn with_trace(mut self, trace: &[f32]) -> Self {
        self.trace.extend(trace.iter().copied());
        self
    }

    pub fn push_reading(&mut self, reading: f32) {
        self.trace.push_back(reading);
    }

    /// Commands received so far
    pub fn history(&self) -> &[CommandRecord] {
        &self.history
    }

    /// Position in the world frame (meters)
    pub fn position(&self) -> (f32, f32) {
        (self.state.x, self.state.y)
    }

    /// Heading in radians, normalized to [-pi, pi]
    pub fn heading(&self) -> f32 {
        self.state.heading
    }

    pub fn velocity(&self) -> f32 {
        self.state.velocity
    }

    pub fn turn_rate(&self) -> f32 {
        self.state.turn_rate
    }

    /// Active edge-following mode as (left, offset)
    pub fn edge_follow(&self) -> Option<(bool, f32)> {
        self.edge
    }

    /// Catch the model up to the clock.
    fn sync(&mut self) {
        let now = self.clock.now_us();
        let step = self.config.step_size_us.max(1);
        while now.saturating_sub(self.last_us) >= step {
            self.integrate(step as f32 / 1_000_000.0);
            self.last_us += step;
        }
        // Remainder shorter than one step
        let rest = now.saturating_sub(self.last_us);
        if rest > 0 {
            self.integrate(rest as f32 / 1_000_000.0);
            self.last_us = now;
        }
    }

    fn integrate(&mut self, dt: f32) {
        let s = &mut self.state;
        s.heading = normalize_angle(s.heading + s.turn_rate * dt);
        s.x += s.velocity * s.heading.cos() * dt;
        s.y += s.velocity * s.heading.sin() * dt;
        s.distance += s.velocity.abs() * dt;
        s.turned += s.turn_rate * dt;
    }

    fn record(&mut self, command: RoverCommand) {
        self.history.push(CommandRecord {
            at_us: self.last_us,
            command,
        });
    }

    /// Generate Gaussian noise using Box-Muller transform.
    fn gaussian_noise(&mut self, stddev: f32) -> f32 {
        if stddev == 0.0 {
            return 0.0;
        }
        let u1: f32 = self.rng.gen::<f32>().max(f32::EPSILON);
        let u2: f32 = self.rng.gen();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f32::consts::PI * u2).cos();
        z * stddev
    }
}

impl<T: TimeSource> PoseSource for SimRover<T> {
    fn reset_pose(&mut self) {
        self.sync();
        self.state.distance = 0.0;
        self.state.turned = 0.0;
        self.record(RoverCommand::ResetPose);
    }

    fn distance(&mut self) -> f32 {
        self.sync();
        self.state.distance
    }

    fn turned_angle(&mut self) -> f32 {
        self.sync();
        self.state.turned
    }
}

impl<T: TimeSource> Actuation for SimRover<T> {
    fn set_velocity(&mut self, velocity: f32) {
        self.sync();
        self.state.velocity = velocity.clamp(-self.config.max_speed, self.config.max_speed);
        self.record(RoverCommand::Velocity(velocity));
    }

    fn set_turn_rate(&mut self, turn_rate: f32) {
        self.sync();
        self.state.turn_rate =
            turn_rate.clamp(-self.config.max_turn_rate, self.config.max_turn_rate);
        self.record(RoverCommand::TurnRate(turn_rate));
    }

    fn set_edge_follow(&mut self, left: bool, offset: f32) {
        self.edge = Some((left, offset));
        self.record(RoverCommand::EdgeFollow { left, offset });
    }

    fn clear_edge_follow(&mut self) {
        self.edge = None;
        self.record(RoverCommand::EdgeOff);
    }
}

impl<T: TimeSource> Proximity for SimRover<T> {
    fn reading(&mut self, channel: usize) -> f32 {
        if channel >= self.config.proximity_channels {
            if !self.channel_warned {
                log::warn!(
                    "proximity channel {channel} not simulated ({} channels), reading clear",
                    self.config.proximity_channels
                );
                self.channel_warned = true;
            }
            return self.config.clear_distance;
        }
        let base = self.trace.pop_front().unwrap_or(self.config.clear_distance);
        let noise = self.gaussian_noise(self.config.proximity_noise_m);
        (base + noise).max(0.0)
    }
}

/// Normalize angle to [-pi, pi].
fn normalize_angle(angle: f32) -> f32 {
    let mut a = angle % (2.0 * std::f32::consts::PI);
    if a > std::f32::consts::PI {
        a -= 2.0 * std::f32::consts::PI;
    } else if a < -std::f32::consts::PI {
        a += 2.0 * std::f32::consts::PI;
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::SimClock;

    fn create_test_rover(clock: &SimClock) -> SimRover<SimClock> {
        let config = SimRoverConfig {
            seed: Some(42),
            ..Default::default()
        };
        SimRover::new(clock.clone(), config)
    }

    #[test]
    fn test_straight_line_motion() {
        let clock = SimClock::new();
        let mut rover = create_test_rover(&clock);
        rover.set_velocity(0.5);

        clock.advance(1_000_000);
        let distance = rover.distance();

        let (x, y) = rover.position();
        assert!((distance - 0.5).abs() < 1e-3, "Expected 0.5 m, got {}", distance);
        assert!((x - 0.5).abs() < 1e-3, "Expected x ≈ 0.5, got {}", x);
        assert!(y.abs() < 1e-3, "Expected y ≈ 0.0, got {}", y);
    }

    #[test]
    fn test_turn_is_signed_and_clamped() {
        let clock = SimClock::new();
        let mut rover = create_test_rover(&clock);
        rover.set_turn_rate(-5.0);

        clock.advance(500_000);
        // Clamped to max_turn_rate = 2.0 rad/s
        assert!((rover.turned_angle() + 1.0).abs() < 1e-3);
        assert_eq!(rover.distance(), 0.0);
    }

    #[test]
    fn test_reset_pose_keeps_world_position() {
        let clock = SimClock::new();
        let mut rover = create_test_rover(&clock);
        rover.set_velocity(1.0);
        clock.advance(250_000);
        rover.reset_pose();

        assert_eq!(rover.distance(), 0.0);
        assert!((rover.position().0 - 0.25).abs() < 1e-3);
    }

    #[test]
    fn test_command_applies_from_its_arrival() {
        let clock = SimClock::new();
        let mut rover = create_test_rover(&clock);
        clock.advance(1_000_000);
        rover.set_velocity(1.0);
        clock.advance(100_000);

        assert!((rover.distance() - 0.1).abs() < 1e-3);
        assert_eq!(rover.history()[0].at_us, 1_000_000);
    }

    #[test]
    fn test_trace_then_clear() {
        let clock = SimClock::new();
        let mut rover = create_test_rover(&clock).with_trace(&[0.3, 0.05]);

        assert_eq!(rover.reading(0), 0.3);
        assert_eq!(rover.reading(0), 0.05);
        assert_eq!(rover.reading(0), 2.0);
        assert_eq!(rover.reading(9), 2.0);
    }

    #[test]
    fn test_unsimulated_channel_warns_once() {
        let clock = SimClock::new();
        let mut rover = create_test_rover(&clock).with_trace(&[0.05]);

        assert!(!rover.channel_warned);
        for _ in 0..100 {
            assert_eq!(rover.reading(7), 2.0);
        }
        assert!(rover.channel_warned);
        // The trace is left for the simulated channels
        assert_eq!(rover.reading(0), 0.05);
    }

    #[test]
    fn test_noise_is_deterministic_with_seed() {
        let config = SimRoverConfig {
            seed: Some(7),
            proximity_noise_m: 0.01,
            ..Default::default()
        };
        let mut a = SimRover::new(SimClock::new(), config.clone());
        let mut b = SimRover::new(SimClock::new(), config);

        for _ in 0..10 {
            let ra = a.reading(0);
            assert_eq!(ra, b.reading(0));
            assert!(ra >= 0.0);
        }
    }

    #[test]
    fn test_edge_follow_recorded() {
        let clock = SimClock::new();
        let mut rover = create_test_rover(&clock);
        rover.set_edge_follow(true, 0.02);
        assert_eq!(rover.edge_follow(), Some((true, 0.02)));
        rover.clear_edge_follow();
        assert_eq!(rover.edge_follow(), None);
        assert_eq!(rover.history().len(), 2);
    }
}
