//! Errors raised while talking to the hosted backend.

use serde::Deserialize;
use store::BackendError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Transport-level failure (DNS, TLS, CORS, connection reset, bad JSON).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("{message}")]
    Service {
        status: u16,
        message: String,
        code: Option<String>,
    },

    /// The response parsed but did not contain what we asked for.
    #[error("Unexpected response: {0}")]
    Decode(String),

    /// The call needs a signed-in user and there is none.
    #[error("Not signed in")]
    NotAuthenticated,
}

impl ApiError {
    /// Build a service error from a failed response's status and body.
    ///
    /// Auth endpoints answer `{"msg": ..., "error_code": ...}` (or the older
    /// `{"error": ..., "error_description": ...}`); the REST layer answers
    /// `{"message": ..., "code": ...}`. Anything else falls back to the body
    /// text, then to the status reason.
    pub fn from_response_body(status: u16, reason: Option<&str>, body: &str) -> Self {
        #[derive(Deserialize, Default)]
        struct ErrorBody {
            msg: Option<String>,
            message: Option<String>,
            error_description: Option<String>,
            error: Option<String>,
            error_code: Option<String>,
            code: Option<serde_json::Value>,
        }

        let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
        let code = parsed.error_code.or_else(|| match parsed.code {
            Some(serde_json::Value::String(s)) => Some(s),
            _ => None,
        });
        let message = parsed
            .msg
            .or(parsed.message)
            .or(parsed.error_description)
            .or(parsed.error)
            .or_else(|| {
                let trimmed = body.trim();
                (!trimmed.is_empty() && !trimmed.starts_with('{')).then(|| trimmed.to_string())
            })
            .unwrap_or_else(|| reason.unwrap_or("Request failed").to_string());

        ApiError::Service {
            status,
            message,
            code,
        }
    }
}

impl From<ApiError> for BackendError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Http(e) if e.is_decode() => BackendError::Decode(e.to_string()),
            ApiError::Http(e) => BackendError::Transport(e.to_string()),
            ApiError::Service {
                status,
                message,
                code,
            } => BackendError::Service {
                status,
                message,
                code,
            },
            ApiError::Decode(msg) => BackendError::Decode(msg),
            ApiError::NotAuthenticated => BackendError::NotAuthenticated,
        }
    }
}
