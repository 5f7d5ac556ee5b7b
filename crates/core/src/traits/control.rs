//! Cooperative loop control.
//!
//! The mission run loop is a busy-poll loop with a fixed sleep. Both the
//! sleep and the stop predicate are injected so tests can single-step the
//! loop without real time passing.

/// Poll-loop pacing and cooperative cancellation.
pub trait LoopControl {
    /// Returns true once an external stop has been requested.
    ///
    /// Polled once per loop iteration, before the mission tick.
    fn should_stop(&mut self) -> bool;

    /// Wait for one poll interval.
    fn wait(&mut self, interval_us: u64);
}
