use dioxus::prelude::*;

use crate::auth::use_auth;
use crate::icons::{FaBook, FaRightFromBracket, FaRightToBracket};
use crate::theme::ThemeToggle;
use crate::Icon;

#[component]
pub fn Header(
    on_library: EventHandler<()>,
    on_login: EventHandler<()>,
    on_logout: EventHandler<()>,
) -> Element {
    let auth = use_auth();
    let signed_in = auth().is_authenticated();

    rsx! {
        header { class: "app-header",
            div { class: "app-title", "Femos" }
            nav { class: "app-actions",
                button {
                    class: "icon-button",
                    title: "Library",
                    aria_label: "Library",
                    onclick: move |_| on_library.call(()),
                    Icon { icon: FaBook, width: 16, height: 16 }
                }
                ThemeToggle {}
                if signed_in {
                    button {
                        class: "icon-button icon-button-danger",
                        title: "Sign out",
                        aria_label: "Sign out",
                        onclick: move |_| on_logout.call(()),
                        Icon { icon: FaRightFromBracket, width: 16, height: 16 }
                    }
                } else {
                    button {
                        class: "icon-button icon-button-primary",
                        title: "Sign in",
                        aria_label: "Sign in",
                        onclick: move |_| on_login.call(()),
                        Icon { icon: FaRightToBracket, width: 16, height: 16 }
                    }
                }
            }
        }
    }
}
