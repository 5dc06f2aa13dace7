use dioxus::prelude::*;

use store::FemosConfig;
use ui::{AppServices, AuthProvider, ThemeProvider, ToastProvider};
use views::Home;

mod views;

const MAIN_CSS: Asset = asset!("/assets/main.css");

const EMBEDDED_CONFIG: &str = include_str!("../femos.toml");

fn main() {
    dioxus::logger::initialize_default();
    dioxus::launch(App);
}

/// The embedded `femos.toml`, with compile-time backend overrides applied.
/// A malformed file falls back to defaults rather than aborting start-up.
fn load_config() -> FemosConfig {
    let config = match FemosConfig::from_toml(EMBEDDED_CONFIG) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid {}: {e}", FemosConfig::filename());
            FemosConfig::default()
        }
    };
    config.with_backend_overrides(option_env!("FEMOS_BACKEND_URL"), option_env!("FEMOS_ANON_KEY"))
}

#[component]
fn App() -> Element {
    let services = use_context_provider(|| AppServices::new(load_config()));
    let toast_secs = services.config.ui.toast_secs;

    rsx! {
        document::Link { rel: "stylesheet", href: MAIN_CSS }

        AuthProvider {
            ThemeProvider {
                ToastProvider { lifetime_secs: toast_secs,
                    Home {}
                }
            }
        }
    }
}
