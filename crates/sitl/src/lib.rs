//! rover_plan_sitl - host collaborators for rover_plan missions
//!
//! Implements the core's collaborator traits on a desktop host: transition
//! log files, INI configuration, wall and simulated clocks, loop pacing
//! with a stop flag, and a simulated rover. [`run_host`] wires them
//! together for the `plan_runner` binary and the integration tests.

pub mod clock;
pub mod control;
pub mod error;
pub mod host;
pub mod ini;
pub mod rover;
pub mod sink;

pub use clock::{SimClock, SystemClock};
pub use control::{RealtimeLoop, SimLoop, StopFlag};
pub use error::SitlError;
pub use host::{run_host, HostOptions, HostReport};
pub use rover::{CommandRecord, RoverCommand, SimRover, SimRoverConfig};
pub use sink::{HostSink, HostSinks};
