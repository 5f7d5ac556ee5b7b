//! Loop pacing and the cooperative stop flag.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use rover_plan_core::traits::LoopControl;

use crate::clock::SimClock;

/// Shared stop request, set from a signal handler or another thread
#[derive(Debug, Clone, Default)]
pub struct StopFlag(Arc<AtomicBool>);

impl StopFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stop_requested(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Sleeps the poll interval on the calling thread
#[derive(Debug, Clone)]
pub struct RealtimeLoop {
    stop: StopFlag,
}

impl RealtimeLoop {
    pub fn new(stop: StopFlag) -> Self {
        Self { stop }
    }
}

impl LoopControl for RealtimeLoop {
    fn should_stop(&mut self) -> bool {
        self.stop.is_stop_requested()
    }

    fn wait(&mut self, interval_us: u64) {
        thread::sleep(Duration::from_micros(interval_us));
    }
}

/// Advances a [`SimClock`] instead of sleeping
///
/// Stops on the shared flag or after `max_ticks` waits, whichever comes first.
#[derive(Debug, Clone)]
pub struct SimLoop {
    clock: SimClock,
    stop: StopFlag,
    max_ticks: Option<u64>,
    ticks: u64,
}

impl SimLoop {
    pub fn new(clock: SimClock, stop: StopFlag) -> Self {
        Self {
            clock,
            stop,
            max_ticks: None,
            ticks: 0,
        }
    }

    pub fn with_max_ticks(mut self, max_ticks: u64) -> Self {
        self.max_ticks = Some(max_ticks);
        self
    }

    /// Waits performed so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

impl LoopControl for SimLoop {
    fn should_stop(&mut self) -> bool {
        self.stop.is_stop_requested() || self.max_ticks.is_some_and(|max| self.ticks >= max)
    }

    fn wait(&mut self, interval_us: u64) {
        self.ticks += 1;
        self.clock.advance(interval_us);
    }
}
