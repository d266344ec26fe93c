//! Shell output and progress management.
//!
//! All human-facing CLI output goes through [`Shell`]:
//! - Status messages with consistent right-aligned formatting
//! - Spinners for long-running external steps (via indicatif)
//!
//! Diagnostic logging stays on `tracing`; the shell only prints what a user
//! running the tool needs to see.

use std::fmt::Display;
use std::io::{self, IsTerminal};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// --quiet: errors only, no progress
    Quiet,
    /// Default: status messages + spinners
    #[default]
    Normal,
    /// --verbose: status lines without spinners (tracing output interleaves)
    Verbose,
}

/// Status types for output messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Fetching,
    Patching,
    Configuring,
    Building,
    Packaging,
    Installing,
    Finished,
    Skipped,
    Warning,
    Error,
}

impl Status {
    fn as_str(&self) -> &'static str {
        match self {
            Status::Fetching => "Fetching",
            Status::Patching => "Patching",
            Status::Configuring => "Configuring",
            Status::Building => "Building",
            Status::Packaging => "Packaging",
            Status::Installing => "Installing",
            Status::Finished => "Finished",
            Status::Skipped => "Skipped",
            Status::Warning => "Warning",
            Status::Error => "error",
        }
    }

    fn color_code(&self) -> &'static str {
        match self {
            Status::Finished => "\x1b[1;32m",
            Status::Fetching
            | Status::Patching
            | Status::Configuring
            | Status::Building
            | Status::Packaging
            | Status::Installing => "\x1b[1;36m",
            Status::Skipped | Status::Warning => "\x1b[1;33m",
            Status::Error => "\x1b[1;31m",
        }
    }
}

/// Central shell for all CLI output.
#[derive(Debug)]
pub struct Shell {
    verbosity: Verbosity,
    use_color: bool,
}

impl Shell {
    /// Create a shell; colors are used only on a terminal and when not disabled.
    pub fn new(verbosity: Verbosity, no_color: bool) -> Self {
        Shell {
            verbosity,
            use_color: !no_color && io::stderr().is_terminal(),
        }
    }

    /// Create a shell from CLI flags. Quiet wins over verbose.
    pub fn from_flags(quiet: bool, verbose: bool, no_color: bool) -> Self {
        let verbosity = if quiet {
            Verbosity::Quiet
        } else if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        };
        Shell::new(verbosity, no_color)
    }

    /// Check if colors are enabled.
    pub fn use_color(&self) -> bool {
        self.use_color
    }

    /// Print a status message.
    ///
    /// Format: `{status:>12} {message}`. In quiet mode only errors are printed.
    pub fn status(&self, status: Status, msg: impl Display) {
        if self.verbosity == Verbosity::Quiet && status != Status::Error {
            return;
        }
        eprintln!("{} {}", self.format_status(status), msg);
    }

    /// Print a warning message.
    pub fn warn(&self, msg: impl Display) {
        self.status(Status::Warning, msg);
    }

    /// Start a spinner for a step with unknown duration.
    ///
    /// Returns a hidden bar outside normal verbosity or when stderr is not a terminal.
    pub fn spinner(&self, status: Status, msg: impl Display) -> ProgressBar {
        if self.verbosity != Verbosity::Normal || !io::stderr().is_terminal() {
            self.status(status, &msg);
            return ProgressBar::hidden();
        }

        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{prefix:>12.cyan.bold} {spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        bar.set_style(style);
        bar.set_prefix(status.as_str());
        bar.set_message(msg.to_string());
        bar.enable_steady_tick(Duration::from_millis(120));
        bar
    }

    fn format_status(&self, status: Status) -> String {
        if self.use_color {
            format!("{}{:>12}\x1b[0m", status.color_code(), status.as_str())
        } else {
            format!("{:>12}", status.as_str())
        }
    }
}

impl Default for Shell {
    fn default() -> Self {
        Shell::new(Verbosity::Normal, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_flags() {
        let quiet = Shell::from_flags(true, true, false);
        assert_eq!(quiet.verbosity, Verbosity::Quiet);

        let verbose = Shell::from_flags(false, true, false);
        assert_eq!(verbose.verbosity, Verbosity::Verbose);
    }

    #[test]
    fn test_status_formatting() {
        let shell = Shell::new(Verbosity::Normal, true);
        assert_eq!(shell.format_status(Status::Fetching), "    Fetching");
        assert_eq!(shell.format_status(Status::Configuring), " Configuring");
    }
}
