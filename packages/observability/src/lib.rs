//! # Observability
//!
//! Centralized logging for the Toma portal tools.
//!
//! Binaries call `observability::init()` (or [`init_with_config`]) once at
//! startup and use standard `tracing` macros everywhere else. Library crates
//! never install subscribers themselves.
//!
//! ## Sink
//!
//! Every process appends structured JSONL to a single file:
//! `~/.toma/logs/portal.jsonl`
//!
//! - `tail -f ~/.toma/logs/portal.jsonl | jq` for pretty JSON
//! - `lnav ~/.toma/logs/portal.jsonl` for interactive exploration
//!
//! The terminal dashboard owns stdout/stderr while it runs, so the file is the
//! only place its logs can go. CLI commands may additionally mirror to stderr.
//!
//! ## Usage
//!
//! ```rust,ignore
//! fn main() {
//!     observability::init_with_config(observability::LogConfig {
//!         service_name: "cli".into(),
//!         default_level: "debug".into(),
//!         ..Default::default()
//!     });
//!
//!     tracing::info!("ready");
//! }
//! ```

mod file_sink;
mod json_layer;

pub use file_sink::default_log_path;
pub use json_layer::LogEntry;

use std::path::PathBuf;

/// Settings for [`init_with_config`].
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Written as `service` on every record ("cli", "tui").
    pub service_name: String,
    /// Filter used when `RUST_LOG` is unset.
    pub default_level: String,
    /// Overrides [`default_log_path`].
    pub log_path: Option<PathBuf>,
    /// Mirror records to stderr in compact form. Off for the dashboard.
    pub also_stderr: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            service_name: "portal".into(),
            default_level: "info".into(),
            log_path: None,
            also_stderr: false,
        }
    }
}

/// Install the subscriber for `service_name` with default settings.
pub fn init(service_name: &str) {
    init_with_config(LogConfig {
        service_name: service_name.into(),
        ..LogConfig::default()
    });
}

/// Install the global subscriber.
///
/// Falls back to stderr when the log file cannot be opened. A second call
/// leaves the first subscriber in place.
pub fn init_with_config(config: LogConfig) {
    file_sink::init_file_subscriber(&config);
}

pub use tracing::{debug, error, info, instrument, trace, warn, Level};
