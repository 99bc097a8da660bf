// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Terminal output for the CLI commands.
//!
//! Every macro funnels into [`emit`], so prefixes and stream selection live in
//! one place. `verbose!` and `section!` respect the global verbosity flag.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use colored::{ColoredString, Colorize};

/// Global verbosity flag.
static VERBOSE: AtomicBool = AtomicBool::new(true);

/// Set the global verbosity flag.
pub fn set_verbose(verbose: bool) {
    VERBOSE.store(verbose, Ordering::Relaxed);
}

/// Check if verbose output is enabled.
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::Relaxed)
}

/// Milliseconds elapsed since `start`.
#[must_use]
pub fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

/// Message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Plain progress output.
    Info,
    /// Suspicious input that decoding tolerates.
    Warning,
    /// Fatal failure.
    Error,
    /// Completed output step.
    Success,
}

impl Level {
    fn prefix(self) -> Option<ColoredString> {
        match self {
            Self::Info => None,
            Self::Warning => Some("WARNING ⚠️".yellow().bold()),
            Self::Error => Some("Error:".red().bold()),
            Self::Success => Some("✅".green()),
        }
    }

    const fn is_diagnostic(self) -> bool {
        matches!(self, Self::Warning | Self::Error)
    }
}

/// Render a message with its level prefix.
#[must_use]
pub fn format_line(level: Level, message: &str) -> String {
    match level.prefix() {
        Some(prefix) => format!("{prefix} {message}"),
        None => message.to_string(),
    }
}

/// Print a message; warnings and errors go to stderr.
pub fn emit(level: Level, message: &str) {
    let line = format_line(level, message);
    if level.is_diagnostic() {
        eprintln!("{line}");
    } else {
        println!("{line}");
    }
}

/// Print a blank line and a cyan header when verbose.
pub fn emit_section(title: &str) {
    if is_verbose() {
        println!();
        println!("{}", title.cyan().bold());
    }
}

/// Info message.
#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::cli::logging::emit($crate::cli::logging::Level::Info, &format!($($arg)*))
    };
}

/// Warning message on stderr.
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::cli::logging::emit($crate::cli::logging::Level::Warning, &format!($($arg)*))
    };
}

/// Error message on stderr.
#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::cli::logging::emit($crate::cli::logging::Level::Error, &format!($($arg)*))
    };
}

/// Success message.
#[macro_export]
macro_rules! success {
    ($($arg:tt)*) => {
        $crate::cli::logging::emit($crate::cli::logging::Level::Success, &format!($($arg)*))
    };
}

/// Info message shown only in verbose mode.
#[macro_export]
macro_rules! verbose {
    ($($arg:tt)*) => {
        if $crate::cli::logging::is_verbose() {
            $crate::cli::logging::emit($crate::cli::logging::Level::Info, &format!($($arg)*));
        }
    };
}

/// Section header shown only in verbose mode.
#[macro_export]
macro_rules! section {
    ($($arg:tt)*) => {
        $crate::cli::logging::emit_section(&format!($($arg)*))
    };
}
