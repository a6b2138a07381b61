//! Storage key constants.

/// Keys used for persisted client state.
pub struct StorageKeys;

impl StorageKeys {
    /// Bearer token sent as `Authorization: Bearer <token>`
    pub const TOKEN: &'static str = "toma_token";

    /// Business name cached for the sidebar footer
    pub const BUSINESS_NAME: &'static str = "business_name";

    /// Signed-in user (JSON)
    pub const USER: &'static str = "toma_user";
}
