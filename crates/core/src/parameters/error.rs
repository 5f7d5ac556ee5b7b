//! Parameter error types
//!
//! Provides error types for parameter store operations.

/// Errors from parameter store operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterError {
    /// Parameter has not been registered
    UnknownParameter,
    /// Parameter name exceeds `PARAM_NAME_LEN`
    NameTooLong,
    /// String value exceeds `MAX_STRING_LEN`
    ValueTooLong,
    /// Text could not be parsed as the parameter's type
    InvalidValue,
    /// Store is full
    StoreFull,
}

impl core::fmt::Display for ParameterError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ParameterError::UnknownParameter => write!(f, "unknown parameter"),
            ParameterError::NameTooLong => write!(f, "parameter name too long"),
            ParameterError::ValueTooLong => write!(f, "parameter value too long"),
            ParameterError::InvalidValue => write!(f, "invalid parameter value"),
            ParameterError::StoreFull => write!(f, "parameter store full"),
        }
    }
}
