//! Acting on a password-recovery redirect once per page load.

use dioxus::prelude::*;
use store::{parse_redirect_state, RecoverySource, RedirectAction};

use crate::browser::{current_location, strip_url_params};
use crate::services::use_services;
use crate::toast::use_toast;

/// Read the page URL after the first render and act on it: error redirects
/// become a toast, recovery redirects set `show_reset` and establish the
/// recovery session so the password update is authorized.
pub fn use_recovery_redirect(show_reset: Signal<bool>) {
    let services = use_services();
    let toaster = use_toast();

    use_effect(move || {
        let (query, fragment) = current_location();
        let action = parse_redirect_state(&query, &fragment).action();
        if action.strips_url() {
            strip_url_params();
        }

        match action {
            RedirectAction::None => {}
            RedirectAction::ShowError { message } => {
                tracing::warn!("{message}");
                toaster.error(message);
            }
            RedirectAction::OpenResetDialog(source) => {
                tracing::info!("Recovery redirect detected, opening the reset dialog");
                let mut show_reset = show_reset;
                show_reset.set(true);

                let auth = services.auth.clone();
                spawn(async move {
                    let result = match &source {
                        RecoverySource::Fragment(tokens) => auth.adopt_recovery_session(tokens).await,
                        RecoverySource::Query { token } => auth.verify_recovery_token(token).await,
                    };
                    if let Err(e) = result {
                        tracing::warn!("Could not establish the recovery session: {e}");
                    }
                });
            }
        }
    });
}
