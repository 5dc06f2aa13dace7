//! This crate contains all shared UI for the workspace.
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`auth`] | `AuthProvider` / `use_auth()`: session, admin flag, the single auth subscription |
//! | [`theme`] | `ThemeProvider` / `use_theme()`: stored preference, OS tracking, `<html>` class |
//! | [`toast`] | `ToastProvider` / `use_toast()`: one transient notification at a time |
//! | [`redirect`] | One-shot handling of password-recovery redirects |
//! | [`shortcuts`] | Space-bar reload shortcut |
//! | [`views`] | Dialogs: sign-in, password reset, add memos, library |
//! | [`browser`] | URL, history, local storage and document glue |

pub mod components;

// Re-export icon library
pub use dioxus_free_icons::Icon;
pub mod icons {
    pub use dioxus_free_icons::icons::fa_solid_icons::*;
}

pub mod browser;
pub mod timer;

mod services;
pub use services::{use_services, AppServices};

pub mod auth;
pub use auth::{use_auth, AuthProvider, AuthState};

pub mod theme;
pub use theme::{use_theme, ThemeHandle, ThemeProvider, ThemeToggle};

pub mod toast;
pub use toast::{use_toast, ToastKind, ToastProvider, Toaster};

pub mod redirect;
pub use redirect::use_recovery_redirect;

pub mod shortcuts;
pub use shortcuts::use_space_shortcut;

mod header;
pub use header::Header;

mod memo_card;
pub use memo_card::RandomMemoCard;

pub mod views;
