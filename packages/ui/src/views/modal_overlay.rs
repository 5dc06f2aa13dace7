use dioxus::prelude::*;

use crate::icons::FaXmark;
use crate::Icon;

/// A full-screen overlay that centers its children in a modal card.
/// Clicking outside the card or the close button triggers `on_close`.
#[component]
pub fn ModalOverlay(
    title: String,
    on_close: EventHandler<()>,
    #[props(default)] wide: bool,
    children: Element,
) -> Element {
    rsx! {
        div {
            class: "modal-backdrop",
            onclick: move |_| on_close.call(()),
            div {
                class: if wide { "modal-card modal-wide" } else { "modal-card" },
                role: "dialog",
                aria_modal: "true",
                aria_label: "{title}",
                onclick: move |evt: Event<MouseData>| evt.stop_propagation(),
                div { class: "modal-header",
                    h2 { class: "modal-title", "{title}" }
                    button {
                        class: "icon-button",
                        aria_label: "Close",
                        onclick: move |_| on_close.call(()),
                        Icon { icon: FaXmark, width: 14, height: 14 }
                    }
                }
                div { class: "modal-body", {children} }
            }
        }
    }
}
