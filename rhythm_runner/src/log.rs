//! Diagnostics for the runner core.
//!
//! Everything the crate reports goes through one `Logger`, installed with
//! `Engine::set_logger`. Until one is installed, `DefaultLogger` prints
//! colored lines to stdout. Errors remember the file and line that raised
//! them; other severities do not.

use colored::*;
use std::time::SystemTime;
use chrono::{DateTime, Local};

/// Sink for log entries.
///
/// ```no_run
/// use std::sync::Mutex;
/// use rhythm_runner::runner::log::{Logger, LogEntry, LogSeverity};
///
/// /// Keeps warnings and errors for an in-game console
/// struct ConsoleLog(Mutex<Vec<String>>);
///
/// impl Logger for ConsoleLog {
///     fn log(&self, entry: &LogEntry) {
///         if entry.severity >= LogSeverity::Warn {
///             self.0.lock().unwrap().push(entry.message.clone());
///         }
///     }
/// }
/// ```
pub trait Logger: Send + Sync {
    fn log(&self, entry: &LogEntry);
}

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub severity: LogSeverity,
    pub timestamp: SystemTime,
    /// Subsystem name, e.g. "runner::SpatialTree"
    pub source: String,
    pub message: String,
    /// Set for errors only
    pub file: Option<&'static str>,
    /// Set for errors only
    pub line: Option<u32>,
}

impl LogEntry {
    /// `file:line` where the entry was raised, if recorded
    pub fn location(&self) -> Option<String> {
        match (self.file, self.line) {
            (Some(file), Some(line)) => Some(format!("{}:{}", file, line)),
            _ => None,
        }
    }
}

/// Ordered from most to least verbose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogSeverity {
    /// Per-tick details (spawns, re-indexing)
    Trace,
    /// Tree statistics and state changes
    Debug,
    /// Level loaded, config fallback
    Info,
    /// Suspicious states that do not stop the simulation
    Warn,
    /// Rejected operations
    Error,
}

impl LogSeverity {
    /// Fixed-width upper-case label
    pub fn label(self) -> &'static str {
        match self {
            LogSeverity::Trace => "TRACE",
            LogSeverity::Debug => "DEBUG",
            LogSeverity::Info => "INFO ",
            LogSeverity::Warn => "WARN ",
            LogSeverity::Error => "ERROR",
        }
    }

    fn colored_label(self) -> ColoredString {
        let label = self.label();
        match self {
            LogSeverity::Trace => label.bright_black(),
            LogSeverity::Debug => label.cyan(),
            LogSeverity::Info => label.green(),
            LogSeverity::Warn => label.yellow(),
            LogSeverity::Error => label.red().bold(),
        }
    }
}

/// Prints `[time] [SEVERITY] [source] message`, plus ` (file:line)` for
/// errors.
pub struct DefaultLogger;

impl Logger for DefaultLogger {
    fn log(&self, entry: &LogEntry) {
        let time: DateTime<Local> = entry.timestamp.into();
        let location = entry
            .location()
            .map(|at| format!(" ({})", at))
            .unwrap_or_default();

        println!(
            "[{}] [{}] [{}] {}{}",
            time.format("%H:%M:%S%.3f"),
            entry.severity.colored_label(),
            entry.source.bright_blue(),
            entry.message,
            location
        );
    }
}

// ===== LOGGING MACROS =====

#[doc(hidden)]
#[macro_export]
macro_rules! __runner_log {
    ($severity:ident, $source:expr, $($arg:tt)*) => {
        $crate::runner::Engine::log(
            $crate::runner::log::LogSeverity::$severity,
            $source,
            format!($($arg)*)
        )
    };
}

#[macro_export]
macro_rules! runner_trace {
    ($source:expr, $($arg:tt)*) => { $crate::__runner_log!(Trace, $source, $($arg)*) };
}

/// `runner_debug!("runner::SpatialTree", "Built {} nodes", count);`
#[macro_export]
macro_rules! runner_debug {
    ($source:expr, $($arg:tt)*) => { $crate::__runner_log!(Debug, $source, $($arg)*) };
}

#[macro_export]
macro_rules! runner_info {
    ($source:expr, $($arg:tt)*) => { $crate::__runner_log!(Info, $source, $($arg)*) };
}

#[macro_export]
macro_rules! runner_warn {
    ($source:expr, $($arg:tt)*) => { $crate::__runner_log!(Warn, $source, $($arg)*) };
}

/// Error entry tagged with the caller's file and line.
#[macro_export]
macro_rules! runner_error {
    ($source:expr, $($arg:tt)*) => {
        $crate::runner::Engine::log_detailed(
            $crate::runner::log::LogSeverity::Error,
            $source,
            format!($($arg)*),
            file!(),
            line!()
        )
    };
}

/// Log an error and evaluate to `Error::$variant(message)`.
///
/// ```ignore
/// return Err(runner_err!("runner::Shape", InvalidGeometry, "empty buffer for '{}'", name));
/// ```
#[macro_export]
macro_rules! runner_err {
    ($source:expr, $variant:ident, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::runner::Engine::log_detailed(
            $crate::runner::log::LogSeverity::Error,
            $source,
            message.clone(),
            file!(),
            line!()
        );
        $crate::runner::Error::$variant(message)
    }};
}

/// `runner_err!` then return it from the enclosing function.
#[macro_export]
macro_rules! runner_bail {
    ($source:expr, $variant:ident, $($arg:tt)*) => {
        return Err($crate::runner_err!($source, $variant, $($arg)*))
    };
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
