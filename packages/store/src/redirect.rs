//! # Password-recovery redirect parsing
//!
//! When a user follows the reset link from their email, the auth provider
//! sends them back to the app with the outcome encoded in the URL: errors
//! and the recovery session usually arrive in the fragment
//! (`#error=...&error_code=otp_expired` or
//! `#access_token=...&type=recovery`), older links use the query string
//! (`?type=recovery&token=...`).
//!
//! [`parse_redirect_state`] turns the raw query and fragment into a
//! [`RecoveryRedirectState`]; [`RecoveryRedirectState::action`] decides what
//! the app does about it. Priority is fixed:
//!
//! 1. fragment error
//! 2. query error
//! 3. fragment recovery session
//! 4. query recovery token
//!
//! The fragment is checked first because the provider puts the real error
//! there and may leave a stale success parameter in the query.

use serde::{Deserialize, Serialize};

/// `error_code` the provider uses for an expired or already-used link.
pub const EXPIRED_LINK_CODE: &str = "otp_expired";

/// `type` value that marks a password-recovery redirect.
pub const RECOVERY_TYPE: &str = "recovery";

const FAILURE_PREFIX: &str = "Password reset failed: ";

/// Parameters recognised in the query string.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryParams {
    pub kind: Option<String>,
    pub token: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// Parameters recognised in the fragment.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FragmentParams {
    pub kind: Option<String>,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub expires_in: Option<i64>,
    pub expires_at: Option<i64>,
    pub error: Option<String>,
    pub error_code: Option<String>,
    pub error_description: Option<String>,
}

/// Everything the redirect URL said, parsed once per page load.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RecoveryRedirectState {
    pub query: QueryParams,
    pub fragment: FragmentParams,
}

/// The recovery session carried by a fragment redirect.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecoveryTokens {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: Option<i64>,
    pub expires_at: Option<i64>,
}

/// Where a successful recovery came from.
#[derive(Clone, Debug, PartialEq)]
pub enum RecoverySource {
    /// `#type=recovery&access_token=...`
    Fragment(RecoveryTokens),
    /// `?type=recovery&token=...`
    Query { token: String },
}

/// What the app does with the redirect.
#[derive(Clone, Debug, PartialEq)]
pub enum RedirectAction {
    /// Nothing recovery-related in the URL.
    None,
    /// Show `message` as a toast; the reset dialog stays closed.
    ShowError { message: String },
    /// Open the reset dialog.
    OpenResetDialog(RecoverySource),
}

impl RedirectAction {
    /// Whether the URL must be replaced by its bare path right away so a
    /// refresh does not replay the redirect.
    pub fn strips_url(&self) -> bool {
        match self {
            RedirectAction::None => false,
            RedirectAction::ShowError { .. } => true,
            RedirectAction::OpenResetDialog(RecoverySource::Fragment(_)) => true,
            RedirectAction::OpenResetDialog(RecoverySource::Query { .. }) => false,
        }
    }
}

/// Parse `location.search` and `location.hash` (leading `?` / `#` optional).
pub fn parse_redirect_state(query: &str, fragment: &str) -> RecoveryRedirectState {
    let q = parse_params(query.strip_prefix('?').unwrap_or(query));
    let f = parse_params(fragment.strip_prefix('#').unwrap_or(fragment));

    RecoveryRedirectState {
        query: QueryParams {
            kind: lookup(&q, "type"),
            token: lookup(&q, "token"),
            error: lookup(&q, "error"),
            error_description: lookup(&q, "error_description"),
        },
        fragment: FragmentParams {
            kind: lookup(&f, "type"),
            access_token: lookup(&f, "access_token"),
            refresh_token: lookup(&f, "refresh_token"),
            expires_in: lookup(&f, "expires_in").and_then(|v| v.parse().ok()),
            expires_at: lookup(&f, "expires_at").and_then(|v| v.parse().ok()),
            error: lookup(&f, "error"),
            error_code: lookup(&f, "error_code"),
            error_description: lookup(&f, "error_description"),
        },
    }
}

impl RecoveryRedirectState {
    pub fn has_fragment_error(&self) -> bool {
        self.fragment.error.is_some() || self.fragment.error_code.is_some()
    }

    pub fn action(&self) -> RedirectAction {
        if self.has_fragment_error() {
            let f = &self.fragment;
            let detail = if f.error_code.as_deref() == Some(EXPIRED_LINK_CODE) {
                "the link has expired, please request a new one".to_string()
            } else if let Some(desc) = &f.error_description {
                desc.clone()
            } else {
                f.error.clone().unwrap_or_else(|| "unknown error".to_string())
            };
            return RedirectAction::ShowError {
                message: format!("{FAILURE_PREFIX}{detail}"),
            };
        }

        if let Some(error) = &self.query.error {
            let detail = self.query.error_description.as_ref().unwrap_or(error);
            return RedirectAction::ShowError {
                message: format!("{FAILURE_PREFIX}{detail}"),
            };
        }

        if self.fragment.kind.as_deref() == Some(RECOVERY_TYPE) {
            if let Some(access_token) = &self.fragment.access_token {
                return RedirectAction::OpenResetDialog(RecoverySource::Fragment(
                    RecoveryTokens {
                        access_token: access_token.clone(),
                        refresh_token: self.fragment.refresh_token.clone(),
                        expires_in: self.fragment.expires_in,
                        expires_at: self.fragment.expires_at,
                    },
                ));
            }
        }

        if self.query.kind.as_deref() == Some(RECOVERY_TYPE) {
            if let Some(token) = &self.query.token {
                return RedirectAction::OpenResetDialog(RecoverySource::Query {
                    token: token.clone(),
                });
            }
        }

        RedirectAction::None
    }
}

/// Split `a=1&b=2` into decoded pairs, keeping their order.
fn parse_params(raw: &str) -> Vec<(String, String)> {
    raw.split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((k, v)) => (form_decode(k), form_decode(v)),
            None => (form_decode(pair), String::new()),
        })
        .collect()
}

/// First non-empty value for `key`.
fn lookup(params: &[(String, String)], key: &str) -> Option<String> {
    params
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.clone())
        .filter(|v| !v.is_empty())
}

/// `application/x-www-form-urlencoded` decoding; malformed escapes are kept verbatim.
fn form_decode(s: &str) -> String {
    let spaced = s.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => spaced,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn action(query: &str, fragment: &str) -> RedirectAction {
        parse_redirect_state(query, fragment).action()
    }

    #[test]
    fn test_expired_fragment_error() {
        let a = action(
            "",
            "#error=access_denied&error_code=otp_expired&error_description=Email+link+is+invalid+or+has+expired",
        );
        let RedirectAction::ShowError { message } = &a else {
            panic!("expected an error, got {a:?}");
        };
        assert!(message.contains("expired"));
        assert!(message.starts_with("Password reset failed: the link has expired"));
        assert!(a.strips_url());
    }

    #[test]
    fn test_fragment_error_uses_description_then_error() {
        assert_eq!(
            action("", "error=server_error&error_description=Database%20down"),
            RedirectAction::ShowError {
                message: "Password reset failed: Database down".into()
            }
        );
        assert_eq!(
            action("", "error=server_error"),
            RedirectAction::ShowError {
                message: "Password reset failed: server_error".into()
            }
        );
        assert_eq!(
            action("", "error_code=weird"),
            RedirectAction::ShowError {
                message: "Password reset failed: unknown error".into()
            }
        );
    }

    #[test]
    fn test_query_error() {
        assert_eq!(
            action("?error=invalid_request&error_description=Bad+token", ""),
            RedirectAction::ShowError {
                message: "Password reset failed: Bad token".into()
            }
        );
        assert_eq!(
            action("?error=invalid_request", ""),
            RedirectAction::ShowError {
                message: "Password reset failed: invalid_request".into()
            }
        );
        // A description alone is not an error.
        assert_eq!(action("?error_description=hmm", ""), RedirectAction::None);
    }

    #[test]
    fn test_fragment_recovery_opens_dialog_and_strips() {
        let a = action(
            "",
            "#access_token=abc.def&expires_in=3600&refresh_token=r1&token_type=bearer&type=recovery",
        );
        assert_eq!(
            a,
            RedirectAction::OpenResetDialog(RecoverySource::Fragment(RecoveryTokens {
                access_token: "abc.def".into(),
                refresh_token: Some("r1".into()),
                expires_in: Some(3600),
                expires_at: None,
            }))
        );
        assert!(a.strips_url());
    }

    #[test]
    fn test_recovery_without_token_is_ignored() {
        assert_eq!(action("", "#type=recovery&access_token="), RedirectAction::None);
        assert_eq!(action("?type=recovery", ""), RedirectAction::None);
        assert_eq!(action("", "#type=signup&access_token=abc"), RedirectAction::None);
    }

    #[test]
    fn test_query_recovery_opens_dialog_without_stripping() {
        let a = action("?type=recovery&token=t0k3n", "");
        assert_eq!(
            a,
            RedirectAction::OpenResetDialog(RecoverySource::Query {
                token: "t0k3n".into()
            })
        );
        assert!(!a.strips_url());
    }

    #[test]
    fn test_fragment_error_beats_fragment_success() {
        let a = action(
            "",
            "#type=recovery&access_token=abc&error=access_denied&error_code=otp_expired",
        );
        assert!(matches!(a, RedirectAction::ShowError { .. }));
    }

    #[test]
    fn test_priority_order() {
        // fragment error > query error
        let a = action("?error=q", "#error=f");
        assert_eq!(
            a,
            RedirectAction::ShowError {
                message: "Password reset failed: f".into()
            }
        );
        // query error > fragment success
        let a = action("?error=q", "#type=recovery&access_token=abc");
        assert_eq!(
            a,
            RedirectAction::ShowError {
                message: "Password reset failed: q".into()
            }
        );
        // fragment success > query success
        let a = action("?type=recovery&token=q", "#type=recovery&access_token=f");
        assert!(matches!(
            a,
            RedirectAction::OpenResetDialog(RecoverySource::Fragment(_))
        ));
    }

    #[test]
    fn test_plain_url_does_nothing() {
        let a = action("", "");
        assert_eq!(a, RedirectAction::None);
        assert!(!a.strips_url());
        assert_eq!(action("?utm_source=mail", "#section-2"), RedirectAction::None);
    }

    #[test]
    fn test_first_value_wins_and_malformed_escapes_survive() {
        let state = parse_redirect_state("type=recovery&type=other&token=a%zz", "");
        assert_eq!(state.query.kind.as_deref(), Some("recovery"));
        assert_eq!(state.query.token.as_deref(), Some("a%zz"));
    }
}
