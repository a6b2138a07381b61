//! Logging initialization for the portal binaries.
//!
//! Thin wrappers over the observability crate so every binary logs to the same
//! JSONL file with its own service name.

use crate::Paths;

/// Initialize logging for the CLI commands.
///
/// Writes to `~/.toma/logs/portal.jsonl` and mirrors to stderr when
/// `also_stderr` is set.
pub fn init_logging(paths: &Paths, level: &str, also_stderr: bool) {
    init_logging_for_service(paths, "cli", level, also_stderr);
}

/// Initialize logging with a custom service name.
///
/// The terminal UI uses `"tui"` and must pass `also_stderr = false`.
pub fn init_logging_for_service(paths: &Paths, service_name: &str, level: &str, also_stderr: bool) {
    observability::init_with_config(observability::LogConfig {
        service_name: service_name.into(),
        default_level: level.into(),
        log_path: Some(paths.log_file()),
        also_stderr,
    });
}
