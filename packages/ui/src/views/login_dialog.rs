use dioxus::prelude::*;

use crate::components::{Button, ButtonVariant, FormMessage, Input, Label};
use crate::services::use_services;
use crate::views::ModalOverlay;

/// Email + password sign-in. Closes itself on success; the auth provider
/// picks up the new session from the `SignedIn` event.
#[component]
pub fn LoginDialog(on_close: EventHandler<()>) -> Element {
    let services = use_services();
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut loading = use_signal(|| false);
    let mut error = use_signal(String::new);

    let sign_in = move |_| {
        let auth = services.auth.clone();
        spawn(async move {
            loading.set(true);
            error.set(String::new());
            let result = auth.sign_in_with_password(email().trim(), &password()).await;
            loading.set(false);
            match result {
                Ok(_) => on_close.call(()),
                Err(e) => {
                    tracing::warn!("Sign-in failed: {e}");
                    error.set(e.to_string());
                }
            }
        });
    };

    rsx! {
        ModalOverlay {
            title: "Sign in",
            on_close,
            div { class: "field",
                Label { html_for: "login-email", "Email" }
                Input {
                    id: "login-email",
                    r#type: "email",
                    autocomplete: "username",
                    disabled: loading(),
                    value: email(),
                    oninput: move |evt: FormEvent| email.set(evt.value()),
                }
            }
            div { class: "field",
                Label { html_for: "login-password", "Password" }
                Input {
                    id: "login-password",
                    r#type: "password",
                    autocomplete: "current-password",
                    disabled: loading(),
                    value: password(),
                    oninput: move |evt: FormEvent| password.set(evt.value()),
                }
            }
            FormMessage { message: error() }
            div { class: "modal-actions",
                Button {
                    variant: ButtonVariant::Ghost,
                    onclick: move |_| on_close.call(()),
                    "Cancel"
                }
                Button {
                    variant: ButtonVariant::Primary,
                    disabled: loading(),
                    onclick: sign_in,
                    if loading() { "Signing in..." } else { "Sign in" }
                }
            }
        }
    }
}
