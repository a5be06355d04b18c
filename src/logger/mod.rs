//! Structured logging system for holderscan
//!
//! This module provides a small, ergonomic logging API with:
//! - Per-module debug control via --debug-<module> flags
//! - Standard log levels (Error/Warning/Info/Debug/Verbose)
//! - Dual output: colored console + file persistence
//!
//! ## Usage
//!
//! ```rust,ignore
//! use holderscan::logger::{self, LogTag};
//!
//! logger::error(LogTag::Api, "Connection failed");
//! logger::warning(LogTag::Classifier, "Rate limited, backing off");
//! logger::info(LogTag::Holders, "Fetched 120 holders");
//! logger::debug(LogTag::Cache, "Cache hit for wallet ..."); // Only if --debug-cache
//! logger::verbose(LogTag::Api, "Raw response: ..."); // Only if --verbose
//! ```
//!
//! ## Initialization
//!
//! Call once at startup, after the data directories exist:
//! ```rust,ignore
//! logger::init();
//! ```

mod config;
mod core;
mod file;
mod format;
mod levels;
mod tags;

pub use config::{get_logger_config, init_from_args, set_logger_config, LoggerConfig};
pub use levels::LogLevel;
pub use tags::LogTag;

/// Initialize the logger system
///
/// Parses command-line debug flags and opens the log file. Logging before
/// `init()` still works but goes to the console only.
pub fn init() {
    config::init_from_args();
    file::init_file_logging();
}

/// Log at ERROR level (always shown)
pub fn error(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Error, message);
}

/// Log at WARNING level
pub fn warning(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Warning, message);
}

/// Log at INFO level (standard operations, hidden by --quiet)
pub fn info(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Info, message);
}

/// Log at DEBUG level
///
/// Only shown when the matching --debug-<module> flag is present.
///
/// # Example
/// ```rust,ignore
/// // Only shown with --debug-classifier
/// logger::debug(LogTag::Classifier, "Page 3 for wallet ...");
/// ```
pub fn debug(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Debug, message);
}

/// Log at VERBOSE level (only with --verbose or --verbose-<module>)
pub fn verbose(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Verbose, message);
}

/// Force flush all pending log writes
///
/// Call this during shutdown to ensure all logs are written to disk.
pub fn flush() {
    file::flush_file_logging();
}
