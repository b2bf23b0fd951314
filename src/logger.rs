//! Verbosity-gated logging handle.
//!
//! Components receive a `Logger` at construction and pass each message a
//! level. Messages above the configured verbosity are dropped; the rest are
//! emitted through `tracing`, whose subscriber is installed once by `main`.

use std::fmt;
use tracing::{error, info};

/// Messages every run shows (e.g. the chosen port).
pub const LEVEL_NORMAL: u8 = 1;

/// Per-syscall and per-request chatter, shown with `-v`.
pub const LEVEL_VERBOSE: u8 = 2;

#[derive(Debug, Clone, Copy)]
pub struct Logger {
    verbosity: u8,
}

impl Logger {
    pub fn new(verbosity: u8) -> Self {
        Self { verbosity }
    }

    pub fn verbosity(&self) -> u8 {
        self.verbosity
    }

    /// Whether a message at `level` would be emitted.
    pub fn enabled(&self, level: u8) -> bool {
        level <= self.verbosity
    }

    pub fn info(&self, level: u8, args: fmt::Arguments<'_>) {
        if self.enabled(level) {
            info!(verbosity_level = level, "{}", args);
        }
    }

    pub fn error(&self, level: u8, args: fmt::Arguments<'_>) {
        if self.enabled(level) {
            error!(verbosity_level = level, "{}", args);
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_VERBOSITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold() {
        let logger = Logger::new(LEVEL_NORMAL);
        assert!(logger.enabled(0));
        assert!(logger.enabled(LEVEL_NORMAL));
        assert!(!logger.enabled(LEVEL_VERBOSE));

        let verbose = Logger::new(LEVEL_VERBOSE);
        assert!(verbose.enabled(LEVEL_VERBOSE));
    }

    #[test]
    fn test_default_verbosity() {
        assert_eq!(Logger::default().verbosity(), LEVEL_NORMAL);
    }

    #[test]
    fn test_gated_messages_do_not_panic() {
        let logger = Logger::new(0);
        logger.info(LEVEL_VERBOSE, format_args!("dropped {}", 1));
        logger.error(LEVEL_VERBOSE, format_args!("dropped {}", 2));
        logger.info(0, format_args!("kept"));
    }
}
