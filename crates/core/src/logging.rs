//! Logging abstraction
//!
//! Unified diagnostic logging macros for every module of the controller.
//! They forward to the `log` facade so the host binary decides where the
//! output goes (`env_logger` on the SITL runner, nothing in unit tests).
//!
//! These macros are for diagnostics only. The per-mission transition log
//! file is written by [`crate::mission::TransitionLogger`].

/// Log informational message
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        $crate::__log::info!($($arg)*)
    };
}

/// Log warning message
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        $crate::__log::warn!($($arg)*)
    };
}

/// Log error message
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        $crate::__log::error!($($arg)*)
    };
}

/// Log debug message
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        $crate::__log::debug!($($arg)*)
    };
}

/// Log trace message
#[macro_export]
macro_rules! log_trace {
    ($($arg:tt)*) => {
        $crate::__log::trace!($($arg)*)
    };
}
