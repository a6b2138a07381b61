//! Bearer-token JSON client for the portal API.

use crate::error::{ApiError, ApiResult};
use portal_storage::SessionContext;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use serde_json::Value;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

fn summarize_response_body(body: &str) -> String {
    let mut hasher = DefaultHasher::new();
    body.hash(&mut hasher);
    format!("len={},digest={:016x}", body.len(), hasher.finish())
}

/// Join `base` and `path`, then collapse duplicate slashes.
///
/// A run of `/` shrinks to one slash, except directly after `:` (or at the
/// very start) where two are kept so `https://` survives.
pub fn normalize_url(base: &str, path: &str) -> String {
    let joined = if path.starts_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    };

    let mut out = String::with_capacity(joined.len());
    let mut run = 0usize;
    let mut allowed = 1usize;
    let mut prev: Option<char> = None;

    for ch in joined.chars() {
        if ch == '/' {
            if run == 0 {
                allowed = match prev {
                    None | Some(':') => 2,
                    Some(_) => 1,
                };
            }
            run += 1;
            if run <= allowed {
                out.push(ch);
            }
        } else {
            run = 0;
            out.push(ch);
        }
        prev = Some(ch);
    }
    out
}

/// Message for a non-2xx response.
///
/// The body's JSON `message` wins, then the raw body, then the reason phrase.
pub(crate) fn extract_error_message(body: &str, reason: Option<&str>) -> String {
    let from_json = serde_json::from_str::<Value>(body).ok().and_then(|json| {
        json.get("message")
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
            .map(str::to_string)
    });

    from_json
        .or_else(|| (!body.is_empty()).then(|| body.to_string()))
        .or_else(|| reason.filter(|r| !r.is_empty()).map(str::to_string))
        .unwrap_or_else(|| "Request failed".to_string())
}

/// HTTP client for the portal API.
///
/// The bearer token is read from the injected [`SessionContext`] on every
/// request, so a login or logout elsewhere takes effect immediately.
#[derive(Clone)]
pub struct PortalClient {
    http_client: reqwest::Client,
    api_root: String,
    session: SessionContext,
}

impl PortalClient {
    /// Create a client.
    ///
    /// # Arguments
    /// * `api_root` - API root including the `/api` prefix (e.g. `http://localhost:8000/api`)
    /// * `session` - Session context providing the bearer token
    pub fn new(api_root: impl Into<String>, session: SessionContext) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            api_root: api_root.into(),
            session,
        }
    }

    pub fn api_root(&self) -> &str {
        &self.api_root
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn url(&self, path: &str) -> String {
        normalize_url(&self.api_root, path)
    }

    /// Send a request and return the decoded JSON body.
    ///
    /// Returns `Ok(None)` for 2xx responses that are not `application/json`.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> ApiResult<Option<Value>> {
        let url = self.url(path);
        tracing::debug!(method = %method, url = %url, "portal request");

        let mut builder = self
            .http_client
            .request(method.clone(), &url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json");

        if let Some(token) = self.session.token() {
            builder = builder.header(AUTHORIZATION, format!("Bearer {}", token));
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let body_summary = summarize_response_body(&text);
            let message = extract_error_message(&text, status.canonical_reason());
            tracing::error!(
                status = %status,
                method = %method,
                path,
                body_summary = %body_summary,
                "portal request failed"
            );
            return Err(ApiError::Http {
                status: status.as_u16(),
                message,
            });
        }

        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.contains("application/json"))
            .unwrap_or(false);

        if !is_json {
            return Ok(None);
        }

        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&text)?))
    }

    pub async fn get_json(&self, path: &str) -> ApiResult<Option<Value>> {
        self.request(Method::GET, path, None).await
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> ApiResult<Option<Value>> {
        self.request(Method::POST, path, Some(body)).await
    }

    pub async fn put_json(&self, path: &str, body: &Value) -> ApiResult<Option<Value>> {
        self.request(Method::PUT, path, Some(body)).await
    }
}
