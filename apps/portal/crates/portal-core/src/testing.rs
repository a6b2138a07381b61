//! Scripted `PortalApi` for controller tests.

use async_trait::async_trait;
use parking_lot::Mutex;
use portal_api::{
    ApiError, ApiResult, CustomerMeta, LoginResponse, MessageResponse, PortalApi,
    ResetPasswordRequest, Settings,
};
use serde_json::Value;
use std::collections::HashMap;

pub(crate) struct FakeApi {
    calls: Mutex<Vec<String>>,
    failures: Mutex<HashMap<&'static str, ApiError>>,
    pub customer_id: Mutex<u64>,
    pub settings: Mutex<Value>,
    pub customer: Mutex<Option<CustomerMeta>>,
    pub message: Mutex<Option<String>>,
    pub saved: Mutex<Vec<(u64, Settings)>>,
    pub reset_requests: Mutex<Vec<ResetPasswordRequest>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            failures: Mutex::new(HashMap::new()),
            customer_id: Mutex::new(42),
            settings: Mutex::new(Value::Null),
            customer: Mutex::new(None),
            message: Mutex::new(None),
            saved: Mutex::new(Vec::new()),
            reset_requests: Mutex::new(Vec::new()),
        }
    }

    /// Make the next call to `op` fail with `err`.
    pub fn fail(&self, op: &'static str, err: ApiError) {
        self.failures.lock().insert(op, err);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    fn record(&self, op: &'static str, detail: Option<String>) -> ApiResult<()> {
        let entry = match detail {
            Some(detail) => format!("{}:{}", op, detail),
            None => op.to_string(),
        };
        self.calls.lock().push(entry);
        match self.failures.lock().remove(op) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn message_response(&self) -> MessageResponse {
        MessageResponse {
            message: self.message.lock().clone(),
        }
    }
}

pub(crate) fn http(status: u16, message: &str) -> ApiError {
    ApiError::Http {
        status,
        message: message.to_string(),
    }
}

#[async_trait]
impl PortalApi for FakeApi {
    async fn forgot_password(&self, email: &str) -> ApiResult<MessageResponse> {
        self.record("forgot_password", Some(email.to_string()))?;
        Ok(self.message_response())
    }

    async fn reset_password(&self, request: &ResetPasswordRequest) -> ApiResult<MessageResponse> {
        self.reset_requests.lock().push(request.clone());
        self.record("reset_password", None)?;
        Ok(self.message_response())
    }

    async fn current_customer_id(&self) -> ApiResult<u64> {
        self.record("current_customer_id", None)?;
        Ok(*self.customer_id.lock())
    }

    async fn get_settings(&self, customer_id: u64) -> ApiResult<Settings> {
        self.record("get_settings", Some(customer_id.to_string()))?;
        let value = self.settings.lock().clone();
        Ok(Settings::from_value(value)?)
    }

    async fn get_customer(&self, customer_id: u64) -> ApiResult<Option<CustomerMeta>> {
        self.record("get_customer", Some(customer_id.to_string()))?;
        Ok(self.customer.lock().clone())
    }

    async fn update_settings(&self, customer_id: u64, settings: &Settings) -> ApiResult<()> {
        self.record("update_settings", Some(customer_id.to_string()))?;
        self.saved.lock().push((customer_id, settings.clone()));
        Ok(())
    }

    async fn login(&self, email: &str, _password: &str) -> ApiResult<LoginResponse> {
        self.record("login", Some(email.to_string()))?;
        Ok(LoginResponse {
            token: "fake-token".into(),
            user: None,
        })
    }

    async fn logout(&self) -> ApiResult<()> {
        self.record("logout", None)
    }
}
