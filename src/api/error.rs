use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Session expired")]
    SessionExpired,

    #[error("{0}")]
    RequestFailed(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// Error body shape used by the API (`{"detail": "..."}`)
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<String>,
}

impl ApiError {
    /// Build a `RequestFailed` from an error response body, preferring the
    /// server's `detail` text over the generic fallback message.
    pub fn from_error_body(body: &str, fallback: &str) -> Self {
        let detail = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|e| e.detail)
            .filter(|d| !d.is_empty());
        ApiError::RequestFailed(detail.unwrap_or_else(|| fallback.to_string()))
    }
}
