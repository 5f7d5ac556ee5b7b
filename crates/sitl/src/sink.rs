//! Host log sinks: `log_<mission>.txt` files and stdout echo.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use rover_plan_core::traits::{LogSink, SinkError, SinkProvider};

/// Transition log destination on the host
pub enum HostSink {
    File(BufWriter<File>),
    Stdout(io::Stdout),
}

impl LogSink for HostSink {
    fn write_line(&mut self, line: &str) -> Result<(), SinkError> {
        let result = match self {
            HostSink::File(w) => writeln!(w, "{line}"),
            HostSink::Stdout(out) => writeln!(out.lock(), "{line}"),
        };
        result.map_err(|_| SinkError::WriteFailed)
    }

    fn flush(&mut self) -> Result<(), SinkError> {
        let result = match self {
            HostSink::File(w) => w.flush(),
            HostSink::Stdout(out) => out.flush(),
        };
        result.map_err(|_| SinkError::WriteFailed)
    }
}

/// Opens transition logs under a log directory
#[derive(Debug, Clone)]
pub struct HostSinks {
    log_dir: PathBuf,
}

impl HostSinks {
    pub fn new(log_dir: impl Into<PathBuf>) -> Self {
        Self {
            log_dir: log_dir.into(),
        }
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    /// Path of the transition log for `plan`
    pub fn log_path(&self, plan: &str) -> PathBuf {
        self.log_dir.join(format!("log_{plan}.txt"))
    }

    fn create(&self, plan: &str) -> io::Result<File> {
        fs::create_dir_all(&self.log_dir)?;
        File::create(self.log_path(plan))
    }
}

impl SinkProvider for HostSinks {
    type Sink = HostSink;

    fn open_log(&mut self, plan: &str) -> Option<HostSink> {
        match self.create(plan) {
            Ok(file) => {
                log::info!("{plan}: logging to {}", self.log_path(plan).display());
                Some(HostSink::File(BufWriter::new(file)))
            }
            Err(e) => {
                log::warn!("{plan}: cannot create {}: {e}", self.log_path(plan).display());
                None
            }
        }
    }

    fn console(&mut self) -> Option<HostSink> {
        Some(HostSink::Stdout(io::stdout()))
    }
}
