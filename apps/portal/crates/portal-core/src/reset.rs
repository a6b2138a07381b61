//! Password reset: requesting a link and completing the reset.

use crate::nav::Route;
use portal_api::{PortalApi, ResetPasswordRequest};
use std::time::Duration;

/// Pause between a successful reset and the redirect to login.
pub const REDIRECT_DELAY: Duration = Duration::from_millis(1200);

pub const MIN_PASSWORD_LEN: usize = 6;

const EMAIL_REQUIRED: &str = "Email is required.";
const LINK_SENT: &str = "Reset link sent.";
const LINK_FAILED: &str = "Failed to send reset link.";
const INVALID_LINK: &str = "Invalid reset link. Request a new one.";
const PASSWORD_TOO_SHORT: &str = "Password must be at least 6 characters.";
const PASSWORD_MISMATCH: &str = "Passwords do not match.";
const RESET_OK: &str = "Password reset successful. Redirecting…";
const RESET_FAILED: &str = "Reset failed.";

fn non_empty(text: String) -> Option<String> {
    (!text.is_empty()).then_some(text)
}

/// "Forgot password" form.
#[derive(Debug, Clone, Default)]
pub struct ForgotPasswordForm {
    pub email: String,
    pub message: Option<String>,
    pub error: Option<String>,
    pub loading: bool,
}

impl ForgotPasswordForm {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            ..Default::default()
        }
    }

    /// Request a reset link. Returns true when the server accepted it.
    pub async fn submit(&mut self, api: &dyn PortalApi) -> bool {
        self.message = None;
        self.error = None;

        if self.email.trim().is_empty() {
            self.error = Some(EMAIL_REQUIRED.to_string());
            return false;
        }

        self.loading = true;
        let result = api.forgot_password(&self.email).await;
        self.loading = false;

        match result {
            Ok(response) => {
                tracing::info!("reset link requested");
                self.message = Some(response.message.unwrap_or_else(|| LINK_SENT.to_string()));
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "reset link request failed");
                self.error = Some(non_empty(e.server_message()).unwrap_or_else(|| LINK_FAILED.to_string()));
                false
            }
        }
    }
}

/// Token and email carried by a reset link.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResetLink {
    pub token: String,
    pub email: String,
}

impl ResetLink {
    pub fn new(token: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            email: email.into(),
        }
    }

    /// Parse a query string such as `token=abc&email=a%40b.co`. A leading `?`
    /// is ignored; missing parameters read as empty.
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut link = ResetLink::default();
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "token" if link.token.is_empty() => link.token = value.into_owned(),
                "email" if link.email.is_empty() => link.email = value.into_owned(),
                _ => {}
            }
        }
        link
    }

    /// Parse the query part of a full link. Anything after `#` is ignored.
    pub fn from_url(link: &str) -> Self {
        let without_fragment = link.split('#').next().unwrap_or_default();
        match without_fragment.split_once('?') {
            Some((_, query)) => Self::from_query(query),
            None => Self::default(),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.token.is_empty() && !self.email.is_empty()
    }
}

/// "Choose a new password" form.
#[derive(Debug, Clone, Default)]
pub struct ResetPasswordForm {
    pub link: ResetLink,
    pub password: String,
    pub confirm: String,
    pub loading: bool,
    pub error: Option<String>,
    pub ok: Option<String>,
}

impl ResetPasswordForm {
    pub fn new(link: ResetLink) -> Self {
        Self {
            link,
            ..Default::default()
        }
    }

    /// Checks that run before any request, in order.
    pub fn validate(&self) -> Result<(), &'static str> {
        if !self.link.is_complete() {
            return Err(INVALID_LINK);
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(PASSWORD_TOO_SHORT);
        }
        if self.password != self.confirm {
            return Err(PASSWORD_MISMATCH);
        }
        Ok(())
    }

    /// Submit the new password. Returns true on success, after which
    /// [`redirect`](Self::redirect) yields the login route.
    pub async fn submit(&mut self, api: &dyn PortalApi) -> bool {
        self.error = None;
        self.ok = None;

        if let Err(reason) = self.validate() {
            self.error = Some(reason.to_string());
            return false;
        }

        let request = ResetPasswordRequest {
            email: self.link.email.clone(),
            token: self.link.token.clone(),
            password: self.password.clone(),
            password_confirmation: self.confirm.clone(),
        };

        self.loading = true;
        let result = api.reset_password(&request).await;
        self.loading = false;

        match result {
            Ok(response) => {
                tracing::info!("password reset completed");
                self.ok = Some(response.message.unwrap_or_else(|| RESET_OK.to_string()));
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "password reset failed");
                self.error = Some(non_empty(e.server_message()).unwrap_or_else(|| RESET_FAILED.to_string()));
                false
            }
        }
    }

    /// Pending redirect after a successful reset.
    pub fn redirect(&self) -> Option<(Route, Duration)> {
        self.ok.as_ref().map(|_| (Route::Login, REDIRECT_DELAY))
    }
}
