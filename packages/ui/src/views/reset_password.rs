use dioxus::core::Task;
use dioxus::prelude::*;
use store::recovery::{submit_password_reset, CLOSE_AFTER_SUCCESS};
use store::ResetError;

use crate::browser::strip_url_params;
use crate::components::{Button, ButtonVariant, FormMessage, Input, Label};
use crate::services::use_services;
use crate::timer::Deadline;
use crate::views::ModalOverlay;

#[derive(Clone, Debug, PartialEq)]
enum Outcome {
    Updated,
    Failed(ResetError),
}

/// Set a new password for the account behind a recovery link.
///
/// After a successful update the dialog shows a confirmation, cleans the
/// URL, and closes itself after a short delay by calling `on_success`.
/// Closing it any other way cancels that timer.
#[component]
pub fn ResetPasswordDialog(on_close: EventHandler<()>, on_success: EventHandler<()>) -> Element {
    let services = use_services();
    let mut new_password = use_signal(String::new);
    let mut confirm = use_signal(String::new);
    let mut loading = use_signal(|| false);
    let mut outcome = use_signal(|| None::<Outcome>);
    let mut close_timer = use_signal(|| None::<Task>);
    let auto_close = use_signal(Deadline::new);

    let mut reset_form = move || {
        new_password.set(String::new());
        confirm.set(String::new());
        outcome.set(None);
    };

    let mut cancel_timer = move || {
        auto_close.peek().cancel();
        if let Some(task) = close_timer.take() {
            task.cancel();
        }
    };

    use_drop(move || {
        auto_close.peek().cancel();
        if let Some(task) = *close_timer.peek() {
            task.cancel();
        }
    });

    let mut close = move || {
        cancel_timer();
        reset_form();
        on_close.call(());
    };

    let submit = move |_| {
        let auth = services.auth.clone();
        spawn(async move {
            loading.set(true);
            outcome.set(None);
            let result = submit_password_reset(&auth, &new_password(), &confirm()).await;
            loading.set(false);
            match result {
                Ok(()) => {
                    tracing::info!("Password updated from recovery link");
                    outcome.set(Some(Outcome::Updated));
                    strip_url_params();
                    let deadline = auto_close.peek().clone();
                    let ticket = deadline.arm();
                    let task = spawn(async move {
                        if !deadline.elapsed(ticket, CLOSE_AFTER_SUCCESS).await {
                            return;
                        }
                        close_timer.set(None);
                        reset_form();
                        on_success.call(());
                    });
                    close_timer.set(Some(task));
                }
                Err(e) => {
                    tracing::warn!("Password reset failed: {e}");
                    outcome.set(Some(Outcome::Failed(e)));
                }
            }
        });
    };

    let current = outcome();
    let link_expired = matches!(&current, Some(Outcome::Failed(e)) if e.is_link_expired());
    let updated = matches!(current, Some(Outcome::Updated));
    let message = match &current {
        Some(Outcome::Updated) => "Password updated".to_string(),
        Some(Outcome::Failed(e)) => e.to_string(),
        None => String::new(),
    };
    let inputs_disabled = loading() || updated;

    rsx! {
        ModalOverlay {
            title: "Reset password",
            on_close: move |_| close(),
            if link_expired {
                FormMessage { message: message.clone() }
                div { class: "modal-actions",
                    Button { variant: ButtonVariant::Primary, onclick: move |_| close(), "Close" }
                }
            } else {
                div { class: "field",
                    Label { html_for: "reset-new-password", "New password" }
                    Input {
                        id: "reset-new-password",
                        r#type: "password",
                        autocomplete: "new-password",
                        disabled: inputs_disabled,
                        value: new_password(),
                        oninput: move |evt: FormEvent| new_password.set(evt.value()),
                    }
                }
                div { class: "field",
                    Label { html_for: "reset-confirm-password", "Confirm password" }
                    Input {
                        id: "reset-confirm-password",
                        r#type: "password",
                        autocomplete: "new-password",
                        disabled: inputs_disabled,
                        value: confirm(),
                        oninput: move |evt: FormEvent| confirm.set(evt.value()),
                    }
                }
                FormMessage { message: message.clone(), success: updated }
                div { class: "modal-actions",
                    Button { variant: ButtonVariant::Ghost, onclick: move |_| close(), "Cancel" }
                    Button {
                        variant: ButtonVariant::Primary,
                        disabled: inputs_disabled,
                        onclick: submit,
                        if loading() { "Updating..." } else { "Update password" }
                    }
                }
            }
        }
    }
}
