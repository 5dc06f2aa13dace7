//! Space-bar "next memo" shortcut.

use dioxus::prelude::*;

/// The parts of a `keydown` event the shortcut cares about.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct KeyPress {
    pub key: String,
    pub code: String,
    pub repeat: bool,
    /// Lower-case tag name of the event target, if any.
    pub target_tag: Option<String>,
    pub target_editable: bool,
}

impl KeyPress {
    pub fn is_space(&self) -> bool {
        self.key == " " || self.key == "Spacebar" || self.code == "Space"
    }

    /// Typing into a form control must not trigger shortcuts.
    pub fn in_text_entry(&self) -> bool {
        self.target_editable
            || matches!(
                self.target_tag.as_deref(),
                Some("input") | Some("textarea") | Some("select")
            )
    }
}

/// Whether `press` should reload the memo.
pub fn is_reload_shortcut(press: &KeyPress, dialog_open: bool) -> bool {
    press.is_space() && !press.repeat && !press.in_text_entry() && !dialog_open
}

/// Listen for Space on the window and bump `reload` when it qualifies.
/// `dialog_open` is consulted on every key press. The listener is removed
/// when the calling component unmounts.
#[cfg(target_arch = "wasm32")]
pub fn use_space_shortcut(dialog_open: impl Fn() -> bool + 'static, reload: Signal<u64>) {
    use std::rc::Rc;
    use wasm_bindgen::closure::Closure;
    use wasm_bindgen::JsCast;

    type KeyListener = Closure<dyn FnMut(web_sys::KeyboardEvent)>;

    let listener = use_hook(move || {
        let listener: KeyListener = Closure::new(move |evt: web_sys::KeyboardEvent| {
            let target = evt
                .target()
                .and_then(|t| t.dyn_into::<web_sys::HtmlElement>().ok());
            let press = KeyPress {
                key: evt.key(),
                code: evt.code(),
                repeat: evt.repeat(),
                target_tag: target.as_ref().map(|el| el.tag_name().to_lowercase()),
                target_editable: target.as_ref().is_some_and(|el| el.is_content_editable()),
            };
            if is_reload_shortcut(&press, dialog_open()) {
                evt.prevent_default();
                let mut reload = reload;
                reload += 1;
            }
        });
        if let Some(window) = web_sys::window() {
            if let Err(e) =
                window.add_event_listener_with_callback("keydown", listener.as_ref().unchecked_ref())
            {
                tracing::warn!("Could not install keyboard shortcut: {e:?}");
            }
        }
        Rc::new(listener)
    });

    use_drop(move || {
        if let Some(window) = web_sys::window() {
            let _ = window
                .remove_event_listener_with_callback("keydown", (*listener).as_ref().unchecked_ref());
        }
    });
}

#[cfg(not(target_arch = "wasm32"))]
pub fn use_space_shortcut(_dialog_open: impl Fn() -> bool + 'static, _reload: Signal<u64>) {}
