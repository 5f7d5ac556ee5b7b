//! Per-mission flag parameters
//!
//! Every mission carries the same three switches under its own prefix:
//!
//! - `<PREFIX>_LOG` - write the transition log file
//! - `<PREFIX>_RUN` - run the mission when selected (off = `run()` is a no-op)
//! - `<PREFIX>_PRINT` - echo transition log lines to the console
//!
//! plus `<PREFIX>_POLL_US`, the sleep between loop iterations.

use core::fmt::Write;

use super::error::ParameterError;
use super::storage::{ParamName, ParamValue, ParameterStore};

/// Default poll interval in microseconds
pub const DEFAULT_POLL_US: u32 = 2_000;

/// Build a `<PREFIX>_<SUFFIX>` parameter name.
pub fn param_key(prefix: &str, suffix: &str) -> Result<ParamName, ParameterError> {
    let mut name = ParamName::new();
    write!(name, "{}_{}", prefix, suffix).map_err(|_| ParameterError::NameTooLong)?;
    Ok(name)
}

/// Run/log/print switches of one mission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissionFlags {
    /// Write the transition log file
    pub log: bool,
    /// Run the mission when selected
    pub run: bool,
    /// Echo the transition log to the console
    pub print: bool,
    /// Poll interval in microseconds
    pub poll_us: u32,
}

impl MissionFlags {
    /// Seed the flag parameters for `prefix`
    ///
    /// Existing values are kept, so this only writes on first run.
    pub fn register_defaults(
        store: &mut ParameterStore,
        prefix: &str,
        run_default: bool,
    ) -> Result<(), ParameterError> {
        store.register(&param_key(prefix, "LOG")?, ParamValue::Bool(true))?;
        store.register(&param_key(prefix, "RUN")?, ParamValue::Bool(run_default))?;
        store.register(&param_key(prefix, "PRINT")?, ParamValue::Bool(true))?;
        store.register(
            &param_key(prefix, "POLL_US")?,
            ParamValue::Int(DEFAULT_POLL_US as i32),
        )?;
        Ok(())
    }

    /// Load the flags for `prefix`
    ///
    /// Missing or malformed values read as "off" for `run` and as the
    /// seeded defaults for the others.
    pub fn from_store(store: &ParameterStore, prefix: &str) -> Self {
        let flag = |suffix: &str, default: bool| {
            param_key(prefix, suffix)
                .map(|name| store.get_bool(&name, default))
                .unwrap_or(default)
        };
        let poll_us = param_key(prefix, "POLL_US")
            .map(|name| store.get_u32(&name, DEFAULT_POLL_US))
            .unwrap_or(DEFAULT_POLL_US);

        Self {
            log: flag("LOG", true),
            run: flag("RUN", false),
            print: flag("PRINT", true),
            poll_us,
        }
    }
}
