//! Browser glue: the page URL, history, local storage, and the document
//! element's theme class. Native builds get inert stand-ins so the crate
//! still compiles and tests off the browser.

use std::rc::Rc;

use store::{KeyValueStore, ResolvedTheme};

/// `location.search` and `location.hash`, both possibly empty.
#[cfg(target_arch = "wasm32")]
pub fn current_location() -> (String, String) {
    let Some(location) = web_sys::window().map(|w| w.location()) else {
        return (String::new(), String::new());
    };
    (
        location.search().unwrap_or_default(),
        location.hash().unwrap_or_default(),
    )
}

#[cfg(not(target_arch = "wasm32"))]
pub fn current_location() -> (String, String) {
    (String::new(), String::new())
}

/// Replace the URL with its bare path so a refresh cannot replay a redirect.
#[cfg(target_arch = "wasm32")]
pub fn strip_url_params() {
    let Some(window) = web_sys::window() else {
        return;
    };
    let path = window.location().pathname().unwrap_or_else(|_| "/".into());
    let result = window.history().and_then(|history| {
        history.replace_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(&path))
    });
    if let Err(e) = result {
        tracing::warn!("Could not clean up the URL: {e:?}");
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn strip_url_params() {}

/// `window.localStorage`. Every call degrades to a no-op when storage is
/// unavailable (private mode, disabled cookies).
#[cfg(target_arch = "wasm32")]
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalStorage;

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok().flatten()
    }
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) {
        if let Some(storage) = Self::storage() {
            if storage.set_item(key, value).is_err() {
                tracing::warn!(key, "localStorage write failed");
            }
        }
    }

    fn remove(&self, key: &str) {
        if let Some(storage) = Self::storage() {
            let _ = storage.remove_item(key);
        }
    }
}

/// The durable store for this platform.
pub fn browser_storage() -> Rc<dyn KeyValueStore> {
    #[cfg(target_arch = "wasm32")]
    {
        Rc::new(LocalStorage)
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        Rc::new(store::MemoryKv::new())
    }
}

/// Put `dark` or `light` on `<html>`, removing the other.
#[cfg(target_arch = "wasm32")]
pub fn apply_theme_class(theme: ResolvedTheme) {
    let Some(root) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.document_element())
    else {
        return;
    };
    let classes = root.class_list();
    let _ = classes.remove_2(
        ResolvedTheme::Dark.class_name(),
        ResolvedTheme::Light.class_name(),
    );
    let _ = classes.add_1(theme.class_name());
}

#[cfg(not(target_arch = "wasm32"))]
pub fn apply_theme_class(_theme: ResolvedTheme) {}
