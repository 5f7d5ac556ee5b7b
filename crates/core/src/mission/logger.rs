//! Transition Logger
//!
//! Durable record of every state transition plus free-form status notes.
//! Each record is one line:
//!
//! ```text
//! <seconds>.<subsecond 4 digits> <state_id> % <message>
//! ```
//!
//! The persistent sink starts with a 3-line header, one comment line per
//! column. A closed or absent sink makes every call a silent no-op, and a
//! failing sink is dropped; logging never stops the control loop.

use core::fmt::Write;

use heapless::String;

use super::messages::LogEvent;
use crate::traits::LogSink;

/// Maximum length of one log line; longer messages are truncated
pub const LOG_LINE_LEN: usize = 160;

/// One formatted log line
pub type LogLine = String<LOG_LINE_LEN>;

/// Column header written when a sink is opened
pub const LOG_HEADER: [&str; 3] = [
    "% 1 \tTime (sec)",
    "% 2 \tMission state",
    "% 3 \t% Mission status (mostly for debug)",
];

/// Format one record.
///
/// The sub-second field is in units of 100 microseconds.
pub fn format_line(now_us: u64, state_id: u16, message: &str) -> LogLine {
    let mut line = LogLine::new();
    // Prefix is at most ~40 chars, always fits
    let _ = write!(
        line,
        "{}.{:04} {} % ",
        now_us / 1_000_000,
        (now_us % 1_000_000) / 100,
        state_id
    );
    for ch in message.chars() {
        if line.push(ch).is_err() {
            break;
        }
    }
    line
}

/// Writes transition records to a persistent sink and an optional console echo
pub struct TransitionLogger<K> {
    file: Option<K>,
    console: Option<K>,
    /// State id stamped on the next record
    state_id: u16,
    /// Last timestamp written; records never go back in time
    last_us: u64,
}

impl<K: LogSink> TransitionLogger<K> {
    /// Create a logger with no sinks
    pub const fn new() -> Self {
        Self {
            file: None,
            console: None,
            state_id: 0,
            last_us: 0,
        }
    }

    /// Is a persistent sink open?
    pub fn is_open(&self) -> bool {
        self.file.is_some()
    }

    /// Is the console echo enabled?
    pub fn has_console(&self) -> bool {
        self.console.is_some()
    }

    /// Attach the persistent sink and write the header.
    ///
    /// Returns false (and keeps the current sink) if one is already open,
    /// or if the header cannot be written.
    pub fn open(&mut self, mut sink: K) -> bool {
        if self.file.is_some() {
            crate::log_warn!("transition log already open, keeping existing sink");
            return false;
        }
        for line in LOG_HEADER {
            if sink.write_line(line).is_err() {
                crate::log_warn!("transition log header write failed, logging to console only");
                return false;
            }
        }
        self.file = Some(sink);
        true
    }

    /// Replace the console echo (`None` disables it)
    pub fn set_console(&mut self, console: Option<K>) {
        self.console = console;
    }

    /// State id stamped on subsequent records
    pub fn set_state(&mut self, state_id: u16) {
        self.state_id = state_id;
    }

    /// State id currently in effect
    pub fn state_id(&self) -> u16 {
        self.state_id
    }

    /// Write a free-text record
    pub fn log(&mut self, now_us: u64, message: &str) {
        if self.file.is_none() && self.console.is_none() {
            return;
        }
        let now_us = now_us.max(self.last_us);
        self.last_us = now_us;
        let line = format_line(now_us, self.state_id, message);

        if let Some(file) = self.file.as_mut() {
            if file.write_line(&line).is_err() {
                crate::log_warn!("transition log write failed, closing sink");
                self.file = None;
            }
        }
        if let Some(console) = self.console.as_mut() {
            let _ = console.write_line(&line);
        }
    }

    /// Write the text for `event`
    pub fn log_event(&mut self, now_us: u64, event: LogEvent, plan: &str) {
        let mut message: String<96> = String::new();
        let _ = event.write_message(plan, &mut message);
        self.log(now_us, &message);
    }

    /// Flush and drop both sinks. Safe to call when already closed.
    pub fn close(&mut self) {
        if let Some(mut file) = self.file.take() {
            if file.flush().is_err() {
                crate::log_warn!("transition log flush failed");
            }
        }
        self.console = None;
    }
}

impl<K: LogSink> Default for TransitionLogger<K> {
    fn default() -> Self {
        Self::new()
    }
}
