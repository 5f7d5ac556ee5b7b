//! Parameter management types and utilities
//!
//! This module provides the parameter store missions read their
//! configuration from, plus the run/log/print flags every mission carries.
//! Persistence lives in the SITL crate.

pub mod error;
pub mod mission;
pub mod storage;

pub use error::ParameterError;
pub use mission::{param_key, MissionFlags};
pub use storage::{ParamName, ParamValue, ParameterStore, MAX_PARAMS, MAX_STRING_LEN, PARAM_NAME_LEN};
