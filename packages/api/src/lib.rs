//! # API crate: HTTP clients for the hosted Femos backend
//!
//! Everything that crosses the network lives here. The screens never see a
//! URL: they talk to [`store::MemoBackend`] and [`store::PasswordUpdater`],
//! both implemented on top of the clients below.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`auth`] | Email/password sign-in, session persistence and refresh, recovery sessions, auth-event observers |
//! | [`client`] | Shared `reqwest` client that stamps the `apikey` and bearer headers |
//! | [`error`] | [`ApiError`] and its mapping onto [`store::BackendError`] |
//! | [`gateway`] | [`SupabaseBackend`], the REST implementation of [`store::MemoBackend`] |
//! | [`rest`] | Builder for the REST layer's filter/order/limit query grammar |
//!
//! ## Wiring
//!
//! ```ignore
//! let http = SupabaseClient::new(&config.backend);
//! let auth = AuthClient::new(http.clone(), Rc::new(storage));
//! let backend = SupabaseBackend::new(http, auth.clone());
//! let library = store::Library::new(backend);
//! ```

pub mod auth;
pub mod client;
pub mod error;
pub mod gateway;
pub mod rest;

pub use auth::{AuthClient, AuthEvent, AuthUser, Session, Subscription};
pub use client::SupabaseClient;
pub use error::ApiError;
pub use gateway::SupabaseBackend;
