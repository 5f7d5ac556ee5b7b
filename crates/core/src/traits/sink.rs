//! Transition log sink traits
//!
//! The core formats log lines; the host decides where they land.

use core::fmt;

/// Error from a log sink write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkError {
    /// Underlying write failed (disk full, closed pipe, ...)
    WriteFailed,
}

impl fmt::Display for SinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SinkError::WriteFailed => write!(f, "log sink write failed"),
        }
    }
}

/// Line-oriented output for the transition log.
pub trait LogSink {
    /// Write one line. The sink appends the line terminator.
    fn write_line(&mut self, line: &str) -> Result<(), SinkError>;

    /// Flush buffered output. Called when the logger closes the sink.
    fn flush(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Opens sinks for a mission run.
pub trait SinkProvider {
    /// Sink type produced by this provider.
    type Sink: LogSink;

    /// Open the persistent log for `plan`. `None` when it cannot be opened;
    /// the mission then continues with console echo only.
    fn open_log(&mut self, plan: &str) -> Option<Self::Sink>;

    /// Open the live console echo.
    fn console(&mut self) -> Option<Self::Sink>;
}
