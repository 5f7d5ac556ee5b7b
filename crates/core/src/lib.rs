//! rover_plan_core - Pure no_std mission sequencing logic for rover_plan
//!
//! This crate contains the mission state machines that drive a ground rover
//! through a fixed sequence of maneuvers. Hardware and host services are
//! reached through the traits in [`traits`] and can be mocked on host.
//!
//! # Design Principles
//!
//! - **Zero cfg**: No `#[cfg(feature = ...)]` directives
//! - **Pure no_std**: No std library dependencies outside of tests
//! - **Trait abstractions**: Pose, actuation, proximity, clock and log sinks
//!   are injected, never referenced as globals
//!
//! # Modules
//!
//! - [`traits`]: Collaborator traits (PoseSource, Actuation, Proximity,
//!   LoopControl, LogSink, TimeSource)
//! - [`parameters`]: Parameter store and per-mission flags
//! - [`mission`]: Transition tables, evaluator, obstacle gate, transition
//!   logger and the mission lifecycle runner
//! - [`plans`]: The concrete missions (gate traversal, obstacle-gated advance)
//! - [`logging`]: Diagnostic logging macros over the `log` facade

#![cfg_attr(not(test), no_std)]

#[doc(hidden)]
pub use log as __log;

pub mod logging;
pub mod mission;
pub mod parameters;
pub mod plans;
pub mod traits;
