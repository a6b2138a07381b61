//! Client-side persisted state for the Toma portal tools.
//!
//! The web dashboard kept its bearer token and a cached business name in the
//! browser's local storage. This crate provides the same flat key/value
//! store for the terminal tools:
//! - **FileStorage**: a JSON object file (`~/.toma/storage.json`), unencrypted
//! - **MemoryStorage**: process-local, for tests and throwaway sessions
//!
//! [`SessionContext`] wraps a store and is handed to the HTTP client at
//! construction, so no request path reads storage through a global.

mod file;
mod keys;
mod memory;
mod session;
mod traits;

pub use file::FileStorage;
pub use keys::StorageKeys;
pub use memory::MemoryStorage;
pub use session::{SessionContext, SessionUser};
pub use traits::LocalStorage;

use thiserror::Error;

/// Error type for storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Encoding/decoding error
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Encoding(err.to_string())
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
