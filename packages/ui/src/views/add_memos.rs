use dioxus::prelude::*;

use crate::components::{Button, ButtonVariant, FormMessage, Input, Label, Textarea};
use crate::services::use_services;
use crate::views::ModalOverlay;

/// Paste a block of excerpts from one book; blank lines separate memos.
/// `on_success` receives the number of memos stored.
#[component]
pub fn AddMemosDialog(on_close: EventHandler<()>, on_success: EventHandler<usize>) -> Element {
    let services = use_services();
    let mut title = use_signal(String::new);
    let mut author = use_signal(String::new);
    let mut block = use_signal(String::new);
    let mut loading = use_signal(|| false);
    let mut error = use_signal(String::new);

    let submit = move |_| {
        let library = services.library.clone();
        spawn(async move {
            loading.set(true);
            error.set(String::new());
            let result = library.add_memos(&title(), &author(), &block()).await;
            loading.set(false);
            match result {
                Ok(report) => {
                    if report.failed > 0 {
                        tracing::warn!(
                            failed = report.failed,
                            inserted = report.inserted,
                            "Some memos were not saved"
                        );
                    }
                    tracing::info!(
                        book_id = %report.book_id,
                        created_book = report.created_book,
                        inserted = report.inserted,
                        "Added memos"
                    );
                    on_success.call(report.inserted);
                }
                Err(e) => {
                    tracing::warn!("Adding memos failed: {e}");
                    error.set(e.to_string());
                }
            }
        });
    };

    rsx! {
        ModalOverlay {
            title: "Add memos",
            on_close,
            div { class: "field",
                Label { html_for: "memo-title", "Title" }
                Input {
                    id: "memo-title",
                    disabled: loading(),
                    value: title(),
                    oninput: move |evt: FormEvent| title.set(evt.value()),
                }
            }
            div { class: "field",
                Label { html_for: "memo-author", "Author" }
                Input {
                    id: "memo-author",
                    disabled: loading(),
                    value: author(),
                    oninput: move |evt: FormEvent| author.set(evt.value()),
                }
            }
            div { class: "field",
                Label { html_for: "memo-block", "Text (separate memos with a blank line)" }
                Textarea {
                    id: "memo-block",
                    rows: 10,
                    disabled: loading(),
                    value: block(),
                    oninput: move |evt: FormEvent| block.set(evt.value()),
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
                    onclick: submit,
                    if loading() { "Saving..." } else { "Save" }
                }
            }
        }
    }
}
