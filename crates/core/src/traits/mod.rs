//! Collaborator traits for the mission controller.
//!
//! The mission core never touches hardware, files or process state
//! directly. Everything it consumes is reached through these traits.
//!
//! # Design
//!
//! - Trait definitions are pure and have no feature gates
//! - Mock implementations of time are always available for host testing
//! - Host implementations (files, wall clock, simulated rover) live in the
//!   SITL crate

pub mod control;
pub mod rover;
pub mod sink;
pub mod time;

pub use control::LoopControl;
pub use rover::{Actuation, PoseSource, Proximity, Rover};
pub use sink::{LogSink, SinkError, SinkProvider};
pub use time::{MockTime, TimeSource};
