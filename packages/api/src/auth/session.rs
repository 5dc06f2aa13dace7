//! Session data types.

use serde::{Deserialize, Serialize};
use store::RecoveryTokens;

/// Local-storage key holding the serialized [`Session`].
pub const SESSION_STORAGE_KEY: &str = "femos.auth.session";

/// Treat a token as expired this many seconds before it actually is.
const EXPIRY_MARGIN_SECS: i64 = 10;

/// The authenticated user as reported by the auth service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Tokens plus the user they belong to.
///
/// Deserializes straight from the token endpoint's response body; unknown
/// fields are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub expires_at: Option<i64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub user: AuthUser,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

impl Session {
    /// Assemble a session from recovery-link tokens and the user they resolve to.
    pub fn from_recovery(tokens: &RecoveryTokens, user: AuthUser) -> Self {
        Self {
            access_token: tokens.access_token.clone(),
            token_type: default_token_type(),
            expires_in: tokens.expires_in,
            expires_at: tokens.expires_at,
            refresh_token: tokens.refresh_token.clone(),
            user,
        }
    }

    pub fn email(&self) -> Option<&str> {
        self.user.email.as_deref()
    }

    /// Fill `expires_at` from `expires_in` when the service only sent the latter.
    pub fn stamped(mut self, now: i64) -> Self {
        if self.expires_at.is_none() {
            self.expires_at = self.expires_in.map(|secs| now + secs);
        }
        self
    }

    /// Sessions without any expiry information never count as expired.
    pub fn is_expired(&self, now: i64) -> bool {
        self.expires_at
            .is_some_and(|at| at <= now + EXPIRY_MARGIN_SECS)
    }
}

/// What changed about the session. Observers get one of these with the
/// session as it is after the change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEvent {
    /// First resolution of the persisted session on startup.
    InitialSession,
    SignedIn,
    SignedOut,
    TokenRefreshed,
    UserUpdated,
    /// A session was established from a password-recovery link.
    PasswordRecovery,
}

/// Seconds since the Unix epoch.
#[cfg(target_arch = "wasm32")]
pub fn now_unix() -> i64 {
    (js_sys::Date::now() / 1000.0) as i64
}

/// Seconds since the Unix epoch.
#[cfg(not(target_arch = "wasm32"))]
pub fn now_unix() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_response_parses() {
        let body = r#"{
            "access_token": "jwt",
            "token_type": "bearer",
            "expires_in": 3600,
            "expires_at": 1700003600,
            "refresh_token": "r1",
            "user": {"id": "9f3c", "aud": "authenticated", "email": "reader@example.com"}
        }"#;
        let session: Session = serde_json::from_str(body).unwrap();
        assert_eq!(session.email(), Some("reader@example.com"));
        assert_eq!(session.refresh_token.as_deref(), Some("r1"));
        assert!(!session.is_expired(1_700_000_000));
        assert!(session.is_expired(1_700_003_595));
    }

    #[test]
    fn test_stamped_fills_missing_expiry() {
        let session = Session {
            access_token: "a".into(),
            token_type: "bearer".into(),
            expires_in: Some(60),
            expires_at: None,
            refresh_token: None,
            user: AuthUser {
                id: "u".into(),
                email: None,
            },
        }
        .stamped(1000);
        assert_eq!(session.expires_at, Some(1060));
        assert!(!session.clone().stamped(5000).is_expired(1000));
    }

    #[test]
    fn test_no_expiry_never_expires() {
        let tokens = RecoveryTokens {
            access_token: "a".into(),
            refresh_token: None,
            expires_in: None,
            expires_at: None,
        };
        let session = Session::from_recovery(
            &tokens,
            AuthUser {
                id: "u".into(),
                email: Some("x@y.z".into()),
            },
        );
        assert!(!session.is_expired(i64::MAX - 100));
    }
}
