//! The clients every screen shares, built once from the configuration and
//! handed down through context.

use std::rc::Rc;

use api::{AuthClient, SupabaseBackend, SupabaseClient};
use dioxus::prelude::*;
use store::{FemosConfig, KeyValueStore, Library};

use crate::browser::browser_storage;

#[derive(Clone)]
pub struct AppServices {
    pub config: Rc<FemosConfig>,
    pub storage: Rc<dyn KeyValueStore>,
    pub auth: AuthClient,
    pub library: Rc<Library<SupabaseBackend>>,
}

impl AppServices {
    pub fn new(config: FemosConfig) -> Self {
        if !config.is_backend_configured() {
            tracing::warn!("Backend URL or anon key missing; remote calls will fail");
        }
        let storage = browser_storage();
        let http = SupabaseClient::new(&config.backend);
        let auth = AuthClient::new(http.clone(), storage.clone());
        let library = Library::new(SupabaseBackend::new(http, auth.clone()));
        Self {
            config: Rc::new(config),
            storage,
            auth,
            library: Rc::new(library),
        }
    }
}

pub fn use_services() -> AppServices {
    use_context::<AppServices>()
}
