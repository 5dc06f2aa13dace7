use dioxus::prelude::*;

use crate::components::{Button, ButtonVariant, Spinner};
use crate::services::use_services;

/// One random memo. Fetches on mount, whenever `reload` changes, and on
/// "Next". Every request replaces the previous result.
#[component]
pub fn RandomMemoCard(reload: Signal<u64>) -> Element {
    let services = use_services();
    let mut memo = use_resource(move || {
        let library = services.library.clone();
        let _ = reload();
        async move { library.random_memo().await }
    });

    rsx! {
        div { class: "memo-stage",
            article { class: "memo-card",
                if !memo.finished() {
                    Spinner {}
                } else {
                    match &*memo.read() {
                        None => rsx! { Spinner {} },
                        Some(Err(e)) => rsx! { p { class: "form-message form-error", "{e}" } },
                        Some(Ok(None)) => rsx! { p { class: "muted empty-state", "No memos yet" } },
                        Some(Ok(Some(m))) => rsx! {
                            blockquote { class: "memo-content", "{m.content}" }
                            p { class: "memo-source", "— {m.author}《{m.title}》" }
                        },
                    }
                }
            }
            Button {
                variant: ButtonVariant::Primary,
                onclick: move |_| memo.restart(),
                "Next"
            }
        }
    }
}
