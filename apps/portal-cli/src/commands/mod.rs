//! CLI command implementations.

mod auth;
mod reset;
mod settings;

pub use auth::{ensure_authenticated, login, logout, status};
pub use reset::{forgot_password, reset_password};
pub use settings::{settings_linkedin, settings_pages, settings_set, settings_show};

use anyhow::Result;
use portal_api::PortalClient;
use portal_config::{Config, Paths};
use portal_storage::{FileStorage, SessionContext};
use std::io::{self, Write};
use std::sync::Arc;

/// Everything a command needs: resolved paths, config, session and client.
#[derive(Clone)]
pub struct Context {
    pub paths: Paths,
    pub config: Config,
    pub session: SessionContext,
    pub client: Arc<PortalClient>,
}

impl Context {
    pub fn new(paths: Paths, config: Config) -> Self {
        let storage = Arc::new(FileStorage::new(paths.storage_file()));
        let session = SessionContext::new(storage);
        let client = Arc::new(PortalClient::new(config.api_root(), session.clone()));
        Self {
            paths,
            config,
            session,
            client,
        }
    }
}

/// Read one trimmed line from stdin after printing `label`.
pub fn prompt_line(label: &str) -> Result<String> {
    print!("{}", label);
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}
