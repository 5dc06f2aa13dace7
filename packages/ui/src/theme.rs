use dioxus::prelude::*;
use store::{ResolvedTheme, ThemePreference};

use crate::browser::apply_theme_class;
use crate::icons::{FaCircleHalfStroke, FaMoon, FaSun};
use crate::services::use_services;
use crate::Icon;

/// The stored preference and the theme actually on screen.
#[derive(Clone, Copy)]
pub struct ThemeHandle {
    preference: Signal<ThemePreference>,
    os_dark: Signal<bool>,
}

impl ThemeHandle {
    pub fn preference(&self) -> ThemePreference {
        (self.preference)()
    }

    pub fn resolved(&self) -> ResolvedTheme {
        (self.preference)().resolve((self.os_dark)())
    }

    pub fn set(&self, preference: ThemePreference) {
        let mut signal = self.preference;
        signal.set(preference);
    }

    /// system → dark → light → system
    pub fn cycle(&self) {
        self.set(self.preference.peek().next());
    }
}

pub fn use_theme() -> ThemeHandle {
    use_context::<ThemeHandle>()
}

/// Loads the saved preference, tracks the OS colour scheme for as long as
/// it is mounted, and keeps the `<html>` class in sync.
#[component]
pub fn ThemeProvider(children: Element) -> Element {
    let services = use_services();
    let storage = services.storage.clone();
    let preference = use_signal(|| ThemePreference::load(storage.as_ref()));
    let os_dark = use_signal(os_prefers_dark);

    let handle = use_context_provider(|| ThemeHandle {
        preference,
        os_dark,
    });

    use_os_theme_listener(os_dark);

    let mut first_run = use_signal(|| true);
    use_effect(move || {
        let pref = preference();
        apply_theme_class(handle.resolved());
        if *first_run.peek() {
            first_run.set(false);
        } else {
            pref.save(services.storage.as_ref());
        }
    });

    rsx! {
        {children}
    }
}

/// Header button showing the current preference; click cycles it.
#[component]
pub fn ThemeToggle() -> Element {
    let theme = use_theme();
    let pref = theme.preference();
    let label = format!("Theme: {pref}");

    rsx! {
        button {
            class: "icon-button",
            title: "{label}",
            aria_label: "{label}",
            onclick: move |_| theme.cycle(),
            match pref {
                ThemePreference::System => rsx! { Icon { icon: FaCircleHalfStroke, width: 16, height: 16 } },
                ThemePreference::Dark => rsx! { Icon { icon: FaMoon, width: 16, height: 16 } },
                ThemePreference::Light => rsx! { Icon { icon: FaSun, width: 16, height: 16 } },
            }
        }
    }
}

const DARK_QUERY: &str = "(prefers-color-scheme: dark)";

#[cfg(target_arch = "wasm32")]
fn os_prefers_dark() -> bool {
    web_sys::window()
        .and_then(|w| w.match_media(DARK_QUERY).ok().flatten())
        .map(|mql| mql.matches())
        .unwrap_or(false)
}

#[cfg(not(target_arch = "wasm32"))]
fn os_prefers_dark() -> bool {
    false
}

/// Mirror `(prefers-color-scheme: dark)` changes into `os_dark`; the
/// listener is removed when the calling component unmounts.
#[cfg(target_arch = "wasm32")]
fn use_os_theme_listener(os_dark: Signal<bool>) {
    use std::rc::Rc;
    use wasm_bindgen::closure::Closure;
    use wasm_bindgen::JsCast;

    type ChangeListener = Closure<dyn FnMut(web_sys::MediaQueryListEvent)>;

    let registration = use_hook(move || {
        let mql = web_sys::window().and_then(|w| w.match_media(DARK_QUERY).ok().flatten())?;
        let listener: ChangeListener = Closure::new(move |evt: web_sys::MediaQueryListEvent| {
            let mut os_dark = os_dark;
            os_dark.set(evt.matches());
        });
        if let Err(e) =
            mql.add_event_listener_with_callback("change", listener.as_ref().unchecked_ref())
        {
            tracing::warn!("Could not watch the OS theme: {e:?}");
            return None;
        }
        Some(Rc::new((mql, listener)))
    });

    use_drop(move || {
        if let Some(registration) = registration {
            let (mql, listener) = registration.as_ref();
            let _ = mql
                .remove_event_listener_with_callback("change", listener.as_ref().unchecked_ref());
        }
    });
}

#[cfg(not(target_arch = "wasm32"))]
fn use_os_theme_listener(_os_dark: Signal<bool>) {}
