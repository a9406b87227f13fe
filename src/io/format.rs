//! Nice `aocheck` output formatting.

use std::fmt;

const AOCHECK_BANNER_LENGTH: usize = 79;

/// Logs an error to both the default logger and the `aocheck-output` logger.
macro_rules! aocheck_error {
    ($fmt:expr $(, $($arg:tt)*)?) => {
        log::error!($fmt, $($($arg)*)?);
        log::error!(target: "aocheck-output", $fmt, $($($arg)*)?);
    }
}

/// Logs a main output line to the `aocheck-output` logger.
macro_rules! aocheck_output {
    ($fmt:expr $(, $($arg:tt)*)?) => { log::info!(target: "aocheck-output", $fmt, $($($arg)*)?); }
}

pub(crate) use {aocheck_error, aocheck_output};

/// Logs a nicely formatted section title to the `aocheck-output` logger.
pub(crate) fn log_title(title: &str) {
    let length = title.chars().count().max(AOCHECK_BANNER_LENGTH - 6);
    let bar = "─".repeat(length);
    aocheck_output!("┌──{bar}──┐");
    aocheck_output!("│§ {title:^length$} §│");
    aocheck_output!("└──{bar}──┘");
}

/// Turns a boolean into a string of `yes` or `no`.
pub(crate) fn nice_bool(b: bool) -> String {
    if b {
        "yes".to_string()
    } else {
        "no".to_string()
    }
}

/// A trait for logging `aocheck` outputs nicely.
pub(crate) trait AoCheckOutput: fmt::Display {
    /// Logs display output nicely, one logged record per line.
    fn log_output_display(&self) {
        let lines = self.to_string();
        lines.lines().for_each(|line| {
            aocheck_output!("{line}");
        })
    }
}

// Blanket implementation
impl<T> AoCheckOutput for T where T: fmt::Display {}
