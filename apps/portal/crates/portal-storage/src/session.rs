//! Session context injected into the HTTP client and UI.

use crate::{LocalStorage, StorageKeys, StorageResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// The signed-in user as returned by the login endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    /// `"customer"` for customer accounts.
    #[serde(default)]
    pub role: Option<String>,
}

impl SessionUser {
    pub fn is_customer(&self) -> bool {
        self.role.as_deref() == Some("customer")
    }
}

/// Cloneable handle over the persisted client state.
///
/// Reads go to storage on every call; there is no in-memory copy that could
/// go stale. Read failures are logged and treated as "absent", the same way a
/// browser without local storage behaves.
#[derive(Clone)]
pub struct SessionContext {
    storage: Arc<dyn LocalStorage>,
}

impl SessionContext {
    pub fn new(storage: Arc<dyn LocalStorage>) -> Self {
        Self { storage }
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.storage.get(key) {
            Ok(value) => value.filter(|v| !v.is_empty()),
            Err(e) => {
                tracing::warn!(key, error = %e, "failed to read persisted state");
                None
            }
        }
    }

    /// Bearer token, if one is stored and non-empty.
    pub fn token(&self) -> Option<String> {
        self.read(StorageKeys::TOKEN)
    }

    pub fn set_token(&self, token: &str) -> StorageResult<()> {
        self.storage.set(StorageKeys::TOKEN, token)
    }

    pub fn has_token(&self) -> bool {
        self.token().is_some()
    }

    /// Cached business name for display.
    pub fn business_name(&self) -> Option<String> {
        self.read(StorageKeys::BUSINESS_NAME)
    }

    pub fn set_business_name(&self, name: &str) -> StorageResult<()> {
        self.storage.set(StorageKeys::BUSINESS_NAME, name)
    }

    /// Signed-in user, if stored. A malformed entry reads as absent.
    pub fn user(&self) -> Option<SessionUser> {
        let raw = self.read(StorageKeys::USER)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::warn!(error = %e, "ignoring malformed stored user");
                None
            }
        }
    }

    pub fn set_user(&self, user: &SessionUser) -> StorageResult<()> {
        self.storage
            .set(StorageKeys::USER, &serde_json::to_string(user)?)
    }

    /// Forget the token, user and cached display values.
    pub fn clear(&self) -> StorageResult<()> {
        self.storage.delete(StorageKeys::TOKEN)?;
        self.storage.delete(StorageKeys::USER)?;
        self.storage.delete(StorageKeys::BUSINESS_NAME)?;
        Ok(())
    }
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("has_token", &self.has_token())
            .finish()
    }
}
