//! Run output for the CLI.
//!
//! Commands never print directly. They log through [`Logger`] so tests can
//! capture what a run would show at each verbosity.

use std::io::{self, Write};
use std::sync::{Arc, Mutex, RwLock};

/// How much a run prints. Messages are tagged with the lowest verbosity at
/// which they appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    /// Only errors that stop part of a run (`-q`)
    Quiet,
    /// Failures with their diagnostics
    Normal,
    /// Every case outcome (`-v`)
    Verbose,
    /// Load details (`-vv`)
    Debug,
}

impl Verbosity {
    /// Verbosity from the `-q` flag and the `-v` count.
    pub fn from_flags(quiet: bool, verbose: u8) -> Self {
        if quiet {
            return Verbosity::Quiet;
        }
        match verbose {
            0 => Verbosity::Normal,
            1 => Verbosity::Verbose,
            _ => Verbosity::Debug,
        }
    }
}

pub trait Logger: Send + Sync {
    fn log(&self, level: Verbosity, message: &str);

    /// A sub-manifest or case could not run. Shown even with `-q`.
    fn error(&self, message: &str) {
        self.log(Verbosity::Quiet, message);
    }

    fn info(&self, message: &str) {
        self.log(Verbosity::Normal, message);
    }

    fn verbose(&self, message: &str) {
        self.log(Verbosity::Verbose, message);
    }

    fn debug(&self, message: &str) {
        self.log(Verbosity::Debug, message);
    }
}

/// Writes every visible message as one line to `W`.
#[derive(Debug)]
pub struct WriterLogger<W> {
    level: Verbosity,
    out: Mutex<W>,
}

/// The logger the binary uses.
pub type StderrLogger = WriterLogger<io::Stderr>;

impl<W: Write + Send> WriterLogger<W> {
    pub fn new(level: Verbosity, out: W) -> Self {
        Self {
            level,
            out: Mutex::new(out),
        }
    }

    /// Take back the writer, e.g. to inspect a buffer.
    pub fn into_inner(self) -> W {
        match self.out.into_inner() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl StderrLogger {
    pub fn stderr(level: Verbosity) -> Self {
        Self::new(level, io::stderr())
    }
}

impl<W: Write + Send> Logger for WriterLogger<W> {
    fn log(&self, level: Verbosity, message: &str) {
        if level > self.level {
            return;
        }
        let Ok(mut out) = self.out.lock() else {
            return;
        };
        // Output errors are not worth failing a run over
        let _ = match level {
            Verbosity::Debug => writeln!(out, "[debug] {}", message),
            _ => writeln!(out, "{}", message),
        };
    }
}

/// A captured log entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub level: Verbosity,
    pub message: String,
}

/// Captures every message regardless of level. Clones share the capture.
#[derive(Debug, Clone, Default)]
pub struct MockLogger {
    entries: Arc<RwLock<Vec<LogEntry>>>,
}

impl MockLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.read().unwrap().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.entries().into_iter().map(|e| e.message).collect()
    }

    /// Messages tagged with exactly `level`.
    pub fn messages_at_level(&self, level: Verbosity) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|e| e.level == level)
            .map(|e| e.message)
            .collect()
    }

    /// Messages a logger configured at `level` would show.
    pub fn visible_at(&self, level: Verbosity) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|e| e.level <= level)
            .map(|e| e.message)
            .collect()
    }

    pub fn contains(&self, substring: &str) -> bool {
        self.entries
            .read()
            .unwrap()
            .iter()
            .any(|e| e.message.contains(substring))
    }
}

impl Logger for MockLogger {
    fn log(&self, level: Verbosity, message: &str) {
        self.entries.write().unwrap().push(LogEntry {
            level,
            message: message.to_string(),
        });
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullLogger;

impl Logger for NullLogger {
    fn log(&self, _level: Verbosity, _message: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn written(level: Verbosity, log: impl Fn(&WriterLogger<Vec<u8>>)) -> String {
        let logger = WriterLogger::new(level, Vec::new());
        log(&logger);
        String::from_utf8(logger.into_inner()).unwrap()
    }

    fn log_every_level(logger: &impl Logger) {
        logger.error("ERROR resolver: Schema not found");
        logger.info("FAIL  format/color-srgb-basic");
        logger.verbose("PASS  format/dimension-px");
        logger.debug("loading schemas from schemas");
    }

    #[test]
    fn test_verbosity_from_flags() {
        assert_eq!(Verbosity::from_flags(false, 0), Verbosity::Normal);
        assert_eq!(Verbosity::from_flags(false, 1), Verbosity::Verbose);
        assert_eq!(Verbosity::from_flags(false, 2), Verbosity::Debug);
        assert_eq!(Verbosity::from_flags(false, 255), Verbosity::Debug);
        assert_eq!(Verbosity::from_flags(true, 0), Verbosity::Quiet);
    }

    #[test]
    fn test_quiet_shows_only_errors() {
        let out = written(Verbosity::Quiet, |l| log_every_level(l));
        assert_eq!(out, "ERROR resolver: Schema not found\n");
    }

    #[test]
    fn test_normal_shows_failures() {
        let out = written(Verbosity::Normal, |l| log_every_level(l));
        assert_eq!(
            out,
            "ERROR resolver: Schema not found\nFAIL  format/color-srgb-basic\n"
        );
    }

    #[test]
    fn test_debug_lines_are_tagged() {
        let out = written(Verbosity::Debug, |l| log_every_level(l));
        assert_eq!(out.lines().count(), 4);
        assert!(out.contains("PASS  format/dimension-px\n"));
        assert!(out.ends_with("[debug] loading schemas from schemas\n"));
    }

    #[test]
    fn test_mock_logger_captures_all_levels() {
        let logger = MockLogger::new();
        log_every_level(&logger);

        assert_eq!(logger.entries().len(), 4);
        assert_eq!(
            logger.messages_at_level(Verbosity::Verbose),
            vec!["PASS  format/dimension-px"]
        );
        assert_eq!(logger.visible_at(Verbosity::Normal).len(), 2);
        assert!(logger.contains("color-srgb"));
        assert!(!logger.contains("cubic"));
    }

    #[test]
    fn test_mock_logger_clones_share_entries() {
        let logger = MockLogger::new();
        logger.clone().info("shared");
        assert_eq!(logger.messages(), vec!["shared"]);
    }

    #[test]
    fn test_null_logger_discards() {
        log_every_level(&NullLogger);
    }
}
