//! # Application configuration: `femos.toml`
//!
//! The web build embeds a TOML file describing where the hosted backend
//! lives and a few presentation knobs:
//!
//! ```toml
//! [backend]
//! url = "https://your-project.supabase.co"
//! anon_key = "public-anon-key"
//!
//! [library]
//! page_size = 10        # memos revealed per scroll step
//!
//! [ui]
//! toast_secs = 3        # how long a toast stays up
//! ```
//!
//! | Struct | Purpose |
//! |--------|---------|
//! | [`FemosConfig`] | Top-level config with TOML (de)serialisation and env overrides. |
//! | [`BackendConfig`] | Base URL and public (anon) API key of the service. |
//! | [`LibraryConfig`] | Page size of the book detail view, default **10**. |
//! | [`UiConfig`] | Toast lifetime, default **3 seconds**. |
//!
//! Every section derives `Default`, so a missing or partial file still
//! yields a usable configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::paging::DEFAULT_PAGE_SIZE;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FemosConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub library: LibraryConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Project URL, e.g. `https://abc.supabase.co`. No trailing slash needed.
    #[serde(default)]
    pub url: String,
    /// Public anon key sent as `apikey` on every request.
    #[serde(default)]
    pub anon_key: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LibraryConfig {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_toast_secs")]
    pub toast_secs: u64,
}

fn default_toast_secs() -> u64 {
    3
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            toast_secs: default_toast_secs(),
        }
    }
}

impl FemosConfig {
    /// The well-known filename for the config file.
    pub fn filename() -> &'static str {
        "femos.toml"
    }

    /// Parse from TOML string.
    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Serialize to TOML string.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Replace backend settings with non-empty overrides.
    pub fn with_backend_overrides(mut self, url: Option<&str>, anon_key: Option<&str>) -> Self {
        if let Some(url) = url.filter(|u| !u.is_empty()) {
            self.backend.url = url.to_string();
        }
        if let Some(key) = anon_key.filter(|k| !k.is_empty()) {
            self.backend.anon_key = key.to_string();
        }
        self
    }

    pub fn toast_duration(&self) -> Duration {
        Duration::from_secs(self.ui.toast_secs)
    }

    /// Whether the backend section is usable at all.
    pub fn is_backend_configured(&self) -> bool {
        !self.backend.url.trim().is_empty() && !self.backend.anon_key.trim().is_empty()
    }
}
