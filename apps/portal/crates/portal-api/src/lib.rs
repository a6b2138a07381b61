//! HTTP client for the Toma customer portal API.
//!
//! This crate provides:
//! - [`PortalClient`]: bearer-token JSON client over `reqwest`, with the
//!   base-URL/path normalization and error extraction every screen relies on
//! - [`PortalApi`]: the endpoint surface as a trait, so screen controllers can
//!   run against a fake in tests
//! - Wire models for settings, customer metadata and the password flows,
//!   including the lenient boolean rule applied at the data-model boundary
//!
//! ## Endpoints
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | POST | `/forgot-password` | [`PortalApi::forgot_password`] |
//! | POST | `/reset-password` | [`PortalApi::reset_password`] |
//! | GET | `/customers/me` | [`PortalApi::current_customer_id`] |
//! | GET | `/settings?customer_id=<id>` | [`PortalApi::get_settings`] |
//! | GET | `/customers/<id>` | [`PortalApi::get_customer`] |
//! | PUT | `/settings?customer_id=<id>` | [`PortalApi::update_settings`] |
//! | POST | `/login` | [`PortalApi::login`] |
//! | POST | `/logout` | [`PortalApi::logout`] |

mod api;
mod client;
mod error;
mod models;

pub use api::PortalApi;
pub use client::{normalize_url, PortalClient};
pub use error::{ApiError, ApiResult, ErrorKind};
pub use models::{
    coerce_bool, resolve_customer_id, unwrap_data, CustomerMeta, CustomerUser, LoginResponse,
    MessageResponse, ResetPasswordRequest, Settings, SettingsField,
};
