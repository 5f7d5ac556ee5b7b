use rover_plan_core::parameters::ParameterError;

/// Errors from the host layer (configuration files, log directories).
///
/// Mission runs themselves never fail with an error; see `RunOutcome`.
#[derive(Debug, thiserror::Error)]
pub enum SitlError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error at line {line}: {reason}")]
    Config { line: usize, reason: String },

    #[error("Parameter error for {name}: {source_error}")]
    Parameter {
        name: String,
        source_error: ParameterError,
    },
}
