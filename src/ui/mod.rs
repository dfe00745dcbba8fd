//! User-facing notices.
//!
//! Separates concerns:
//! - `formatter` - Pure formatting functions
//! - This module - The [Reporter] sink the pipeline writes notices to

use std::cell::RefCell;

use crate::warning::ReleaseWarning;

pub mod formatter;

pub use formatter::format_proposed_tag;

/// Severity of a notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warn,
    Error,
    Success,
    Verbose,
}

/// Leveled sink for console notices
pub trait Reporter {
    fn notify(&self, level: Level, message: &str);

    fn info(&self, message: &str) {
        self.notify(Level::Info, message);
    }

    fn warn(&self, message: &str) {
        self.notify(Level::Warn, message);
    }

    fn error(&self, message: &str) {
        self.notify(Level::Error, message);
    }

    fn success(&self, message: &str) {
        self.notify(Level::Success, message);
    }

    fn verbose(&self, message: &str) {
        self.notify(Level::Verbose, message);
    }

    fn warning(&self, warning: &ReleaseWarning) {
        self.warn(&warning.to_string());
    }
}

/// Prints notices to stdout/stderr.
///
/// Silent mode drops info and success lines; verbose lines only show in verbose mode.
/// Warnings and errors are always printed.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleReporter {
    silent: bool,
    verbose: bool,
}

impl ConsoleReporter {
    pub fn new(silent: bool, verbose: bool) -> Self {
        ConsoleReporter { silent, verbose }
    }
}

impl Reporter for ConsoleReporter {
    fn notify(&self, level: Level, message: &str) {
        match level {
            Level::Error => eprintln!("{}", formatter::format_error(message)),
            Level::Warn => eprintln!("{}", formatter::format_warning(message)),
            Level::Info if !self.silent => println!("{}", formatter::format_status(message)),
            Level::Success if !self.silent => println!("{}", formatter::format_success(message)),
            Level::Verbose if self.verbose && !self.silent => {
                println!("{}", formatter::format_verbose(message))
            }
            _ => {}
        }
    }
}

/// Records notices in memory, for tests and embedding
#[derive(Debug, Default)]
pub struct MemoryReporter {
    notices: RefCell<Vec<(Level, String)>>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<(Level, String)> {
        self.notices.borrow().clone()
    }

    /// Messages recorded at one level
    pub fn messages(&self, level: Level) -> Vec<String> {
        self.notices
            .borrow()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.messages(Level::Warn)
    }
}

impl Reporter for MemoryReporter {
    fn notify(&self, level: Level, message: &str) {
        self.notices.borrow_mut().push((level, message.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_reporter_records_levels() {
        let reporter = MemoryReporter::new();
        reporter.info("starting");
        reporter.warning(&ReleaseWarning::DirtyWorkingTree);
        reporter.success("done");

        assert_eq!(reporter.notices().len(), 3);
        assert_eq!(reporter.warnings().len(), 1);
        assert_eq!(reporter.messages(Level::Success), vec!["done".to_string()]);
    }

    #[test]
    fn test_console_reporter_does_not_panic() {
        let reporter = ConsoleReporter::new(true, true);
        reporter.info("hidden");
        reporter.verbose("hidden");
        reporter.error("shown");
    }
}
