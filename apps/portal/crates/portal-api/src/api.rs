//! Endpoint surface of the portal API.

use crate::client::PortalClient;
use crate::error::{ApiError, ApiResult};
use crate::models::{
    resolve_customer_id, unwrap_data, CustomerMeta, LoginResponse, MessageResponse,
    ResetPasswordRequest, Settings,
};
use async_trait::async_trait;
use serde_json::{json, Value};

const IDENTITY_ERROR: &str = "Failed to resolve customer_id from /customers/me";

/// Portal operations used by the screen controllers.
///
/// [`PortalClient`] is the HTTP implementation; tests substitute fakes.
#[async_trait]
pub trait PortalApi: Send + Sync {
    /// `POST /forgot-password`
    async fn forgot_password(&self, email: &str) -> ApiResult<MessageResponse>;

    /// `POST /reset-password`
    async fn reset_password(&self, request: &ResetPasswordRequest) -> ApiResult<MessageResponse>;

    /// `GET /customers/me`, reduced to the customer id.
    async fn current_customer_id(&self) -> ApiResult<u64>;

    /// `GET /settings?customer_id=<id>`
    async fn get_settings(&self, customer_id: u64) -> ApiResult<Settings>;

    /// `GET /customers/<id>`
    async fn get_customer(&self, customer_id: u64) -> ApiResult<Option<CustomerMeta>>;

    /// `PUT /settings?customer_id=<id>`
    async fn update_settings(&self, customer_id: u64, settings: &Settings) -> ApiResult<()>;

    /// `POST /login`
    async fn login(&self, email: &str, password: &str) -> ApiResult<LoginResponse>;

    /// `POST /logout`
    async fn logout(&self) -> ApiResult<()>;
}

#[async_trait]
impl PortalApi for PortalClient {
    async fn forgot_password(&self, email: &str) -> ApiResult<MessageResponse> {
        let body = self
            .post_json("/forgot-password", &json!({ "email": email }))
            .await?;
        Ok(MessageResponse::from_value(body.as_ref()))
    }

    async fn reset_password(&self, request: &ResetPasswordRequest) -> ApiResult<MessageResponse> {
        let payload = serde_json::to_value(request)?;
        let body = self.post_json("/reset-password", &payload).await?;
        Ok(MessageResponse::from_value(body.as_ref()))
    }

    async fn current_customer_id(&self) -> ApiResult<u64> {
        let body = self.get_json("/customers/me").await?.unwrap_or(Value::Null);
        match resolve_customer_id(&body) {
            Some(id) => {
                tracing::debug!(customer_id = id, "resolved current customer");
                Ok(id)
            }
            None => {
                tracing::warn!("customers/me returned no usable id");
                Err(ApiError::Identity(IDENTITY_ERROR.to_string()))
            }
        }
    }

    async fn get_settings(&self, customer_id: u64) -> ApiResult<Settings> {
        let body = self
            .get_json(&format!("/settings?customer_id={}", customer_id))
            .await?
            .unwrap_or(Value::Null);
        Ok(Settings::from_value(unwrap_data(&body).clone())?)
    }

    async fn get_customer(&self, customer_id: u64) -> ApiResult<Option<CustomerMeta>> {
        let body = self.get_json(&format!("/customers/{}", customer_id)).await?;
        match body {
            Some(value) => {
                let data = unwrap_data(&value);
                if data.is_null() {
                    return Ok(None);
                }
                Ok(Some(serde_json::from_value(data.clone())?))
            }
            None => Ok(None),
        }
    }

    async fn update_settings(&self, customer_id: u64, settings: &Settings) -> ApiResult<()> {
        let payload = serde_json::to_value(settings)?;
        self.put_json(&format!("/settings?customer_id={}", customer_id), &payload)
            .await?;
        tracing::info!(customer_id, "settings updated");
        Ok(())
    }

    async fn login(&self, email: &str, password: &str) -> ApiResult<LoginResponse> {
        let body = self
            .post_json("/login", &json!({ "email": email, "password": password }))
            .await?
            .unwrap_or(Value::Null);
        LoginResponse::from_value(&body)
            .ok_or_else(|| ApiError::Decode("login response carried no token".to_string()))
    }

    async fn logout(&self) -> ApiResult<()> {
        self.post_json("/logout", &json!({})).await?;
        Ok(())
    }
}
