use thiserror::Error;

/// Failure of a call to the remote service, as seen by the domain layer.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum BackendError {
    /// The service answered with a non-success status.
    #[error("{message}")]
    Service {
        status: u16,
        message: String,
        /// Machine-readable code (`error_code` / `code`) when the service sent one.
        code: Option<String>,
    },
    /// The request never produced a response.
    #[error("Network error: {0}")]
    Transport(String),
    /// The response body did not have the expected shape.
    #[error("Unexpected response: {0}")]
    Decode(String),
    #[error("Not signed in")]
    NotAuthenticated,
}

impl BackendError {
    /// Shorthand used by the in-memory backend and tests.
    pub fn service(status: u16, message: impl Into<String>) -> Self {
        Self::Service {
            status,
            message: message.into(),
            code: None,
        }
    }

    /// The machine-readable error code, if any.
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Service { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}
