//! Error types for portal API calls.

use thiserror::Error;

/// How a failed call should be surfaced to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// 401 or 419: the session is gone, ask the user to sign in again.
    Unauthenticated,
    /// 403: signed in but not allowed.
    Forbidden,
    /// Anything else, shown as free text.
    Other,
}

impl ErrorKind {
    pub fn from_status(status: u16) -> Self {
        match status {
            401 | 419 => ErrorKind::Unauthenticated,
            403 => ErrorKind::Forbidden,
            _ => ErrorKind::Other,
        }
    }
}

/// Error type for portal API calls.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Non-2xx response. `message` comes from the body's `message` field,
    /// else the raw body, else the status reason.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// The request never produced a response.
    #[error("Network error: {0}")]
    Network(String),

    /// A 2xx response whose body did not have the expected shape.
    #[error("Invalid response: {0}")]
    Decode(String),

    /// `/customers/me` did not yield a usable customer id.
    #[error("{0}")]
    Identity(String),
}

impl ApiError {
    /// HTTP status, when the failure was an HTTP response.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.status()
            .map(ErrorKind::from_status)
            .unwrap_or(ErrorKind::Other)
    }

    /// The server's own message for HTTP failures, the full description
    /// otherwise. Used where the server text is shown verbatim.
    pub fn server_message(&self) -> String {
        match self {
            ApiError::Http { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

/// Result type for portal API calls.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn http(status: u16) -> ApiError {
        ApiError::Http {
            status,
            message: "nope".into(),
        }
    }

    #[test]
    fn classifies_statuses() {
        assert_eq!(http(401).kind(), ErrorKind::Unauthenticated);
        assert_eq!(http(419).kind(), ErrorKind::Unauthenticated);
        assert_eq!(http(403).kind(), ErrorKind::Forbidden);
        assert_eq!(http(404).kind(), ErrorKind::Other);
        assert_eq!(http(500).kind(), ErrorKind::Other);
        assert_eq!(ApiError::Network("refused".into()).kind(), ErrorKind::Other);
    }

    #[test]
    fn display_includes_status() {
        assert_eq!(http(422).to_string(), "HTTP 422: nope");
        assert_eq!(http(422).server_message(), "nope");
        assert_eq!(http(422).status(), Some(422));
    }

    #[test]
    fn identity_error_displays_bare_message() {
        let err = ApiError::Identity("Failed to resolve customer_id from /customers/me".into());
        assert_eq!(err.to_string(), "Failed to resolve customer_id from /customers/me");
        assert_eq!(err.server_message(), err.to_string());
        assert_eq!(err.status(), None);
    }
}
