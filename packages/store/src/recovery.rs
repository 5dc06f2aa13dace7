//! Password-reset dialog rules: validation, the update call, and how
//! service failures are presented.

use std::time::Duration;

use thiserror::Error;

use crate::backend::PasswordUpdater;
use crate::error::BackendError;
use crate::redirect::EXPIRED_LINK_CODE;

pub const MIN_PASSWORD_LEN: usize = 6;

/// How long the success message stays up before the dialog closes itself.
pub const CLOSE_AFTER_SUCCESS: Duration = Duration::from_secs(3);

/// Message fragment the auth service uses when the recovery token is stale.
const EXPIRED_TOKEN_SIGNATURE: &str = "token has expired";

/// Client-side rejection, raised before any network call.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PasswordRejection {
    #[error("Passwords do not match")]
    Mismatch,
    #[error("Password must be at least 6 characters")]
    TooShort,
}

#[derive(Clone, Debug, PartialEq, Error)]
pub enum ResetError {
    #[error("{0}")]
    Rejected(#[from] PasswordRejection),
    #[error("The password reset link has expired, please request a new one")]
    LinkExpired,
    #[error("Failed to reset password: {0}")]
    Service(String),
}

impl ResetError {
    /// Expired links leave nothing to retry; the dialog only offers "close".
    pub fn is_link_expired(&self) -> bool {
        matches!(self, ResetError::LinkExpired)
    }
}

impl From<BackendError> for ResetError {
    fn from(err: BackendError) -> Self {
        if is_expired_token(&err) {
            ResetError::LinkExpired
        } else {
            ResetError::Service(err.to_string())
        }
    }
}

fn is_expired_token(err: &BackendError) -> bool {
    err.code() == Some(EXPIRED_LINK_CODE)
        || err.to_string().to_lowercase().contains(EXPIRED_TOKEN_SIGNATURE)
}

/// Check the two entries: equality first, then length.
pub fn validate_new_password(new_password: &str, confirm: &str) -> Result<(), PasswordRejection> {
    if new_password != confirm {
        return Err(PasswordRejection::Mismatch);
    }
    if new_password.chars().count() < MIN_PASSWORD_LEN {
        return Err(PasswordRejection::TooShort);
    }
    Ok(())
}

/// Validate, then ask the service to change the password exactly once.
pub async fn submit_password_reset<U: PasswordUpdater>(
    updater: &U,
    new_password: &str,
    confirm: &str,
) -> Result<(), ResetError> {
    validate_new_password(new_password, confirm)?;
    updater.update_password(new_password).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryBackend;

    #[tokio::test]
    async fn test_mismatch_never_calls_service() {
        let backend = MemoryBackend::new();
        let err = submit_password_reset(&backend, "secret1", "secret2")
            .await
            .unwrap_err();
        assert_eq!(err, ResetError::Rejected(PasswordRejection::Mismatch));
        assert_eq!(err.to_string(), "Passwords do not match");
        assert!(backend.password_updates().is_empty());
    }

    #[tokio::test]
    async fn test_short_password_never_calls_service() {
        let backend = MemoryBackend::new();
        let err = submit_password_reset(&backend, "abc", "abc").await.unwrap_err();
        assert_eq!(err, ResetError::Rejected(PasswordRejection::TooShort));
        assert_eq!(err.to_string(), "Password must be at least 6 characters");
        assert!(backend.password_updates().is_empty());
    }

    #[tokio::test]
    async fn test_mismatch_is_reported_before_length() {
        let backend = MemoryBackend::new();
        let err = submit_password_reset(&backend, "a", "b").await.unwrap_err();
        assert_eq!(err, ResetError::Rejected(PasswordRejection::Mismatch));
    }

    #[tokio::test]
    async fn test_valid_password_calls_service_once() {
        let backend = MemoryBackend::new();
        submit_password_reset(&backend, "secret1", "secret1")
            .await
            .unwrap();
        assert_eq!(backend.password_updates(), vec!["secret1".to_string()]);
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        assert_eq!(validate_new_password("密码密码密码", "密码密码密码"), Ok(()));
        assert_eq!(
            validate_new_password("密码密码", "密码密码"),
            Err(PasswordRejection::TooShort)
        );
    }

    #[tokio::test]
    async fn test_expired_token_is_remapped() {
        let backend = MemoryBackend::new();
        backend.fail_password_updates(BackendError::service(
            401,
            "Token has expired or is invalid",
        ));
        let err = submit_password_reset(&backend, "secret1", "secret1")
            .await
            .unwrap_err();
        assert!(err.is_link_expired());
        assert!(err.to_string().contains("expired"));
        assert_eq!(backend.password_updates().len(), 1);
    }

    #[test]
    fn test_expired_code_is_remapped() {
        let err = ResetError::from(BackendError::Service {
            status: 403,
            message: "Email link is invalid".into(),
            code: Some("otp_expired".into()),
        });
        assert_eq!(err, ResetError::LinkExpired);
    }

    #[tokio::test]
    async fn test_other_failures_are_verbatim() {
        let backend = MemoryBackend::new();
        backend.fail_password_updates(BackendError::service(
            422,
            "New password should be different from the old password.",
        ));
        let err = submit_password_reset(&backend, "secret1", "secret1")
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to reset password: New password should be different from the old password."
        );
    }
}
