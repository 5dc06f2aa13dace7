//! Theme preference: what the user picked, and what actually gets rendered.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::kv::KeyValueStore;

/// Local-storage key holding the preference string.
pub const THEME_STORAGE_KEY: &str = "theme";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    #[default]
    System,
    Dark,
    Light,
}

/// The binary theme actually applied to the page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResolvedTheme {
    Dark,
    Light,
}

impl ThemePreference {
    pub fn as_str(self) -> &'static str {
        match self {
            ThemePreference::System => "system",
            ThemePreference::Dark => "dark",
            ThemePreference::Light => "light",
        }
    }

    /// system → dark → light → system
    pub fn next(self) -> Self {
        match self {
            ThemePreference::System => ThemePreference::Dark,
            ThemePreference::Dark => ThemePreference::Light,
            ThemePreference::Light => ThemePreference::System,
        }
    }

    /// Follow the OS only when the preference is `System`.
    pub fn resolve(self, os_prefers_dark: bool) -> ResolvedTheme {
        match self {
            ThemePreference::Dark => ResolvedTheme::Dark,
            ThemePreference::Light => ResolvedTheme::Light,
            ThemePreference::System if os_prefers_dark => ResolvedTheme::Dark,
            ThemePreference::System => ResolvedTheme::Light,
        }
    }

    /// Read the stored preference; missing or unknown values mean `System`.
    pub fn load(kv: &dyn KeyValueStore) -> Self {
        kv.get(THEME_STORAGE_KEY)
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default()
    }

    pub fn save(self, kv: &dyn KeyValueStore) {
        kv.set(THEME_STORAGE_KEY, self.as_str());
    }
}

impl fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemePreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "system" => Ok(ThemePreference::System),
            "dark" => Ok(ThemePreference::Dark),
            "light" => Ok(ThemePreference::Light),
            other => Err(format!("unknown theme preference: {other}")),
        }
    }
}

impl ResolvedTheme {
    /// Class put on the document element.
    pub fn class_name(self) -> &'static str {
        match self {
            ResolvedTheme::Dark => "dark",
            ResolvedTheme::Light => "light",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryKv;

    #[test]
    fn test_three_cycles_return_to_system() {
        let start = ThemePreference::System;
        assert_eq!(start.next(), ThemePreference::Dark);
        assert_eq!(start.next().next(), ThemePreference::Light);
        assert_eq!(start.next().next().next(), ThemePreference::System);
    }

    #[test]
    fn test_resolve_follows_os_only_for_system() {
        assert_eq!(ThemePreference::System.resolve(true), ResolvedTheme::Dark);
        assert_eq!(ThemePreference::System.resolve(false), ResolvedTheme::Light);
        assert_eq!(ThemePreference::Light.resolve(true), ResolvedTheme::Light);
        assert_eq!(ThemePreference::Dark.resolve(false), ResolvedTheme::Dark);
    }

    #[test]
    fn test_load_and_save() {
        let kv = MemoryKv::new();
        assert_eq!(ThemePreference::load(&kv), ThemePreference::System);

        ThemePreference::Light.save(&kv);
        assert_eq!(kv.get(THEME_STORAGE_KEY).as_deref(), Some("light"));
        assert_eq!(ThemePreference::load(&kv), ThemePreference::Light);

        kv.set(THEME_STORAGE_KEY, "sepia");
        assert_eq!(ThemePreference::load(&kv), ThemePreference::System);
    }
}
