//! Email/password authentication against the hosted auth service.

mod client;
mod session;

pub use client::{AuthClient, Subscription};
pub use session::{now_unix, AuthEvent, AuthUser, Session, SESSION_STORAGE_KEY};
