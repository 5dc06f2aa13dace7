//! Authentication context and hooks for the UI.

use std::cell::RefCell;
use std::rc::Rc;

use api::Session;
use dioxus::prelude::*;

use crate::services::use_services;

/// Authentication state for the application.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthState {
    pub session: Option<Session>,
    /// Set from the `admins` table; false until a lookup says otherwise.
    pub is_admin: bool,
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn email(&self) -> Option<&str> {
        self.session.as_ref().and_then(|s| s.email())
    }
}

/// Get the current authentication state.
/// Returns a signal that updates on every auth event.
pub fn use_auth() -> Signal<AuthState> {
    use_context::<Signal<AuthState>>()
}

/// Provider component that manages authentication state.
/// Holds the app's single auth subscription; it is released on unmount.
#[component]
pub fn AuthProvider(children: Element) -> Element {
    let services = use_services();
    let mut auth_state = use_signal(AuthState::default);

    let subscription = use_hook({
        let auth = services.auth.clone();
        move || {
            let sub = auth.on_auth_state_change(move |event, session| {
                tracing::info!(?event, signed_in = session.is_some(), "auth event");
                let mut auth_state = auth_state;
                auth_state.with_mut(|state| {
                    if session.is_none() {
                        state.is_admin = false;
                    }
                    state.session = session;
                });
            });
            Rc::new(RefCell::new(Some(sub)))
        }
    });
    use_drop(move || {
        subscription.borrow_mut().take();
    });

    // Resolve the persisted session once; it arrives as InitialSession.
    let _ = use_resource({
        let auth = services.auth.clone();
        move || {
            let auth = auth.clone();
            async move { auth.get_session().await }
        }
    });

    // Re-check admin membership whenever the signed-in email changes.
    let email = use_memo(move || auth_state.read().email().map(str::to_string));
    let library = services.library.clone();
    use_effect(move || {
        let requested = email();
        let library = library.clone();
        spawn(async move {
            let is_admin = library.check_admin(requested.as_deref()).await;
            if *email.peek() == requested {
                auth_state.write().is_admin = is_admin;
            } else {
                tracing::debug!("Discarding admin lookup for a stale session");
            }
        });
    });

    use_context_provider(|| auth_state);

    rsx! {
        {children}
    }
}
