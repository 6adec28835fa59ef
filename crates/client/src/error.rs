use bugdesk_core::error::CoreError;

/// Shown when the backend rejects a request without saying why.
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong. Please try again.";

/// Errors from the gateway layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend returned a non-2xx status code.
    #[error("API error ({status}): {}", .detail.as_deref().unwrap_or("<no detail>"))]
    Api {
        /// HTTP status code.
        status: u16,
        /// Human-readable reason from the response body, when present.
        detail: Option<String>,
    },

    /// The response body was not the JSON shape expected.
    #[error("Malformed response body: {0}")]
    Decode(String),

    /// An authenticated endpoint was called without a session.
    #[error("Not logged in")]
    NotAuthenticated,

    /// Rejected locally before anything was sent.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl ApiError {
    /// The single message to show the user for this failure.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Request(_) => "Could not reach the server. Please try again.".to_string(),
            ApiError::Api {
                detail: Some(detail),
                ..
            } => detail.clone(),
            ApiError::Api { detail: None, .. } => GENERIC_FAILURE_MESSAGE.to_string(),
            ApiError::Decode(_) => "The server sent an unexpected response.".to_string(),
            ApiError::NotAuthenticated => "Please log in first.".to_string(),
            ApiError::Core(CoreError::Validation(msg)) => msg.clone(),
            ApiError::Core(other) => other.to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Pull a human-readable reason out of an error response body.
///
/// Understands `{"detail": "..."}`, the validation form
/// `{"detail": [{"msg": "..."}]}`, and falls back to a non-JSON body.
pub fn extract_detail(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) => match value.get("detail") {
            Some(serde_json::Value::String(s)) if !s.is_empty() => Some(s.clone()),
            Some(serde_json::Value::Array(items)) => items
                .iter()
                .find_map(|item| item.get("msg").and_then(|m| m.as_str()))
                .map(str::to_string),
            _ => None,
        },
        Err(_) => Some(body.to_string()),
    }
}
