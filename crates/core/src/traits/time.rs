//! Time abstraction traits for platform-agnostic timing operations.
//!
//! The `TimeSource` trait abstracts over wall clocks, simulated clocks and
//! mocks so the transition logger can stamp records without knowing where
//! time comes from.

use core::cell::Cell;

/// Platform-agnostic time source for mission timestamps.
///
/// # Example
///
/// ```
/// use rover_plan_core::traits::{MockTime, TimeSource};
///
/// fn stamp<T: TimeSource>(time: &T, started_us: u64) -> u64 {
///     time.elapsed_since(started_us)
/// }
///
/// let time = MockTime::with_initial(5_000);
/// assert_eq!(stamp(&time, 2_000), 3_000);
/// ```
pub trait TimeSource {
    /// Returns current time in microseconds.
    fn now_us(&self) -> u64;

    /// Returns current time in milliseconds.
    fn now_ms(&self) -> u64 {
        self.now_us() / 1000
    }

    /// Returns elapsed time in microseconds since a reference point.
    ///
    /// Uses saturating subtraction to handle a reference in the future.
    fn elapsed_since(&self, reference_us: u64) -> u64 {
        self.now_us().saturating_sub(reference_us)
    }
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn now_us(&self) -> u64 {
        (**self).now_us()
    }
}

// ============================================================================
// Mock Implementation (always available for testing)
// ============================================================================

/// Mock time source with controllable time advancement.
///
/// # Example
///
/// ```
/// use rover_plan_core::traits::{MockTime, TimeSource};
///
/// let time = MockTime::new();
/// time.advance(2_000); // one 2 ms poll interval
/// assert_eq!(time.now_us(), 2_000);
/// assert_eq!(time.now_ms(), 2);
/// ```
#[derive(Clone, Default)]
pub struct MockTime {
    current_us: Cell<u64>,
}

impl MockTime {
    /// Creates a new `MockTime` starting at time 0.
    pub fn new() -> Self {
        Self {
            current_us: Cell::new(0),
        }
    }

    /// Creates a new `MockTime` starting at the specified time.
    pub fn with_initial(us: u64) -> Self {
        Self {
            current_us: Cell::new(us),
        }
    }

    /// Sets the current time to an absolute value.
    pub fn set(&self, us: u64) {
        self.current_us.set(us);
    }

    /// Advances the current time by the specified amount.
    pub fn advance(&self, us: u64) {
        self.current_us.set(self.current_us.get() + us);
    }
}

impl TimeSource for MockTime {
    fn now_us(&self) -> u64 {
        self.current_us.get()
    }
}
