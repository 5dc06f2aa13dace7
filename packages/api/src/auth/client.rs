//! Session manager for the hosted auth service.
//!
//! [`AuthClient`] owns the current [`Session`], persists it to a
//! [`KeyValueStore`] so a reload keeps the user signed in, and tells every
//! registered observer about each change. Observers register with
//! [`AuthClient::on_auth_state_change`] and stay registered for as long as
//! the returned [`Subscription`] lives.
//!
//! Endpoints used:
//!
//! | Call | Endpoint |
//! |------|----------|
//! | sign in | `POST /auth/v1/token?grant_type=password` |
//! | refresh | `POST /auth/v1/token?grant_type=refresh_token` |
//! | sign out | `POST /auth/v1/logout` |
//! | current user | `GET /auth/v1/user` |
//! | change password | `PUT /auth/v1/user` |
//! | verify recovery token | `POST /auth/v1/verify` |

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use reqwest::Method;
use serde_json::json;
use store::backend::BackendResult;
use store::redirect::RECOVERY_TYPE;
use store::{KeyValueStore, PasswordUpdater, RecoveryTokens};

use super::session::{now_unix, AuthEvent, AuthUser, Session, SESSION_STORAGE_KEY};
use crate::client::SupabaseClient;
use crate::error::ApiError;

type Listener = Rc<dyn Fn(AuthEvent, Option<Session>)>;

struct AuthState {
    session: Option<Session>,
    /// Bumped on every change; lets a refresh detect that it went stale.
    generation: u64,
    restored: bool,
    next_listener: u64,
    listeners: Vec<(u64, Listener)>,
}

/// Cheap to clone; clones share one session and one set of observers.
#[derive(Clone)]
pub struct AuthClient {
    http: SupabaseClient,
    storage: Rc<dyn KeyValueStore>,
    state: Rc<RefCell<AuthState>>,
}

/// Keeps an observer registered. Dropping it (or calling
/// [`Subscription::unsubscribe`]) removes the observer.
pub struct Subscription {
    id: u64,
    state: Weak<RefCell<AuthState>>,
}

impl Subscription {
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(state) = self.state.upgrade() {
            state
                .borrow_mut()
                .listeners
                .retain(|(id, _)| *id != self.id);
        }
    }
}

impl AuthClient {
    pub fn new(http: SupabaseClient, storage: Rc<dyn KeyValueStore>) -> Self {
        Self {
            http,
            storage,
            state: Rc::new(RefCell::new(AuthState {
                session: None,
                generation: 0,
                restored: false,
                next_listener: 0,
                listeners: Vec::new(),
            })),
        }
    }

    /// Register `listener` for every future auth event.
    pub fn on_auth_state_change(
        &self,
        listener: impl Fn(AuthEvent, Option<Session>) + 'static,
    ) -> Subscription {
        let mut state = self.state.borrow_mut();
        let id = state.next_listener;
        state.next_listener += 1;
        state.listeners.push((id, Rc::new(listener)));
        Subscription {
            id,
            state: Rc::downgrade(&self.state),
        }
    }

    pub fn listener_count(&self) -> usize {
        self.state.borrow().listeners.len()
    }

    /// The in-memory session, without touching storage or the network.
    pub fn current_session(&self) -> Option<Session> {
        self.state.borrow().session.clone()
    }

    pub fn access_token(&self) -> Option<String> {
        self.state
            .borrow()
            .session
            .as_ref()
            .map(|s| s.access_token.clone())
    }

    /// Resolve the session. The first call restores the persisted one
    /// (refreshing it when expired) and emits [`AuthEvent::InitialSession`].
    ///
    /// A sign-in or recovery that lands while the stored session is being
    /// refreshed wins; the refresh outcome is then discarded.
    pub async fn get_session(&self) -> Option<Session> {
        if self.state.borrow().restored {
            return self.current_session();
        }
        self.state.borrow_mut().restored = true;

        let restored = match self.load_persisted() {
            Some(stored) if stored.is_expired(now_unix()) => {
                self.refresh_stored(&stored).await;
                None
            }
            other => other,
        };

        let session = self.current_session().or(restored);
        self.apply(AuthEvent::InitialSession, session.clone());
        session
    }

    /// Access token of a live session, refreshing it first when it expired.
    /// A session that cannot be refreshed is dropped.
    pub async fn valid_access_token(&self) -> Option<String> {
        let session = self.current_session()?;
        if !session.is_expired(now_unix()) {
            return Some(session.access_token);
        }
        self.refresh_stored(&session).await;
        self.current_session()
            .filter(|s| !s.is_expired(now_unix()))
            .map(|s| s.access_token)
    }

    /// Refresh `stale`, applying [`AuthEvent::TokenRefreshed`] or
    /// [`AuthEvent::SignedOut`]. The outcome is dropped when the session
    /// changed while the request was in flight.
    async fn refresh_stored(&self, stale: &Session) {
        let started = self.generation();
        let outcome = match stale.refresh_token.as_deref() {
            Some(refresh_token) => match self.refresh_with(refresh_token).await {
                Ok(fresh) => (AuthEvent::TokenRefreshed, Some(fresh)),
                Err(e) => {
                    tracing::warn!("Session refresh failed: {e}");
                    (AuthEvent::SignedOut, None)
                }
            },
            None => (AuthEvent::SignedOut, None),
        };
        let (event, session) = outcome;
        self.apply_if_unchanged(started, event, session);
    }

    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, ApiError> {
        let request = self
            .http
            .request(
                Method::POST,
                &self.http.auth_url("token?grant_type=password"),
                None,
            )
            .json(&json!({ "email": email, "password": password }));
        let session = self
            .http
            .send_json::<Session>(request)
            .await?
            .stamped(now_unix());
        tracing::info!(email, "signed in");
        self.apply(AuthEvent::SignedIn, Some(session.clone()));
        Ok(session)
    }

    /// Revoke the session remotely and forget it locally. The local state is
    /// cleared even when the remote call fails; that failure is returned.
    pub async fn sign_out(&self) -> Result<(), ApiError> {
        let remote = match self.access_token() {
            Some(token) => {
                let request =
                    self.http
                        .request(Method::POST, &self.http.auth_url("logout"), Some(&token));
                self.http.send_empty(request).await
            }
            None => Ok(()),
        };
        if let Err(e) = &remote {
            tracing::warn!("Remote sign-out failed: {e}");
        }
        self.apply(AuthEvent::SignedOut, None);
        remote
    }

    /// Change the signed-in user's password.
    pub async fn update_user_password(&self, new_password: &str) -> Result<AuthUser, ApiError> {
        let token = self
            .valid_access_token()
            .await
            .ok_or(ApiError::NotAuthenticated)?;
        let request = self
            .http
            .request(Method::PUT, &self.http.auth_url("user"), Some(&token))
            .json(&json!({ "password": new_password }));
        let user: AuthUser = self.http.send_json(request).await?;

        if let Some(mut session) = self.current_session() {
            session.user = user.clone();
            self.apply(AuthEvent::UserUpdated, Some(session));
        }
        Ok(user)
    }

    /// Install the session carried in a recovery link's fragment. The user
    /// is looked up with the link's access token so observers get a full
    /// session.
    pub async fn adopt_recovery_session(
        &self,
        tokens: &RecoveryTokens,
    ) -> Result<Session, ApiError> {
        let request = self.http.request(
            Method::GET,
            &self.http.auth_url("user"),
            Some(&tokens.access_token),
        );
        let user: AuthUser = self.http.send_json(request).await?;
        let session = Session::from_recovery(tokens, user).stamped(now_unix());
        self.apply(AuthEvent::PasswordRecovery, Some(session.clone()));
        Ok(session)
    }

    /// Exchange a recovery `token_hash` from the query string for a session.
    pub async fn verify_recovery_token(&self, token_hash: &str) -> Result<Session, ApiError> {
        let request = self
            .http
            .request(Method::POST, &self.http.auth_url("verify"), None)
            .json(&json!({ "type": RECOVERY_TYPE, "token_hash": token_hash }));
        let session = self
            .http
            .send_json::<Session>(request)
            .await?
            .stamped(now_unix());
        self.apply(AuthEvent::PasswordRecovery, Some(session.clone()));
        Ok(session)
    }

    async fn refresh_with(&self, refresh_token: &str) -> Result<Session, ApiError> {
        let request = self
            .http
            .request(
                Method::POST,
                &self.http.auth_url("token?grant_type=refresh_token"),
                None,
            )
            .json(&json!({ "refresh_token": refresh_token }));
        Ok(self
            .http
            .send_json::<Session>(request)
            .await?
            .stamped(now_unix()))
    }

    fn load_persisted(&self) -> Option<Session> {
        let raw = self.storage.get(SESSION_STORAGE_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(session) => Some(session),
            Err(e) => {
                tracing::warn!("Discarding unreadable stored session: {e}");
                self.storage.remove(SESSION_STORAGE_KEY);
                None
            }
        }
    }

    fn persist(&self, session: Option<&Session>) {
        match session.map(serde_json::to_string) {
            Some(Ok(raw)) => self.storage.set(SESSION_STORAGE_KEY, &raw),
            Some(Err(e)) => tracing::warn!("Could not persist session: {e}"),
            None => self.storage.remove(SESSION_STORAGE_KEY),
        }
    }

    fn generation(&self) -> u64 {
        self.state.borrow().generation
    }

    /// [`apply`](Self::apply) unless another change landed after `started`.
    fn apply_if_unchanged(&self, started: u64, event: AuthEvent, session: Option<Session>) -> bool {
        if self.generation() != started {
            tracing::debug!(?event, "Discarding outcome for a superseded session");
            return false;
        }
        self.apply(event, session);
        true
    }

    /// Replace the session, persist it, then notify observers in
    /// registration order. No borrow is held while observers run.
    fn apply(&self, event: AuthEvent, session: Option<Session>) {
        self.persist(session.as_ref());
        let listeners: Vec<Listener> = {
            let mut state = self.state.borrow_mut();
            state.session = session.clone();
            state.generation += 1;
            state.restored = true;
            state.listeners.iter().map(|(_, l)| l.clone()).collect()
        };
        tracing::debug!(?event, signed_in = session.is_some(), "auth state changed");
        for listener in listeners {
            listener(event, session.clone());
        }
    }
}

impl PasswordUpdater for AuthClient {
    async fn update_password(&self, new_password: &str) -> BackendResult<()> {
        self.update_user_password(new_password)
            .await
            .map(|_| ())
            .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use store::config::BackendConfig;
    use store::MemoryKv;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    fn client_with(kv: &MemoryKv) -> AuthClient {
        client_at("http://localhost:54321", kv)
    }

    fn client_at(url: &str, kv: &MemoryKv) -> AuthClient {
        let http = SupabaseClient::new(&BackendConfig {
            url: url.into(),
            anon_key: "anon".into(),
        });
        AuthClient::new(http, Rc::new(kv.clone()))
    }

    /// Local auth endpoint: the refresh grant answers with `refreshed` after
    /// `refresh_delay`, every other request answers `user` right away.
    async fn serve_auth(refresh_delay: Duration, refreshed: Session, user: AuthUser) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let refreshed = refreshed.clone();
                let user = user.clone();
                tokio::spawn(async move {
                    let head = read_request(&mut socket).await;
                    let body = if head.contains("grant_type=refresh_token") {
                        tokio::time::sleep(refresh_delay).await;
                        serde_json::to_string(&refreshed).unwrap()
                    } else {
                        serde_json::to_string(&user).unwrap()
                    };
                    let response = format!(
                        "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                        body.len()
                    );
                    socket.write_all(response.as_bytes()).await.unwrap();
                    socket.shutdown().await.ok();
                });
            }
        });
        base
    }

    /// Read one request, body included, and return its head.
    async fn read_request(socket: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        let head_end = loop {
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                return String::from_utf8_lossy(&buf).into_owned();
            }
            buf.extend_from_slice(&chunk[..n]);
        };
        let head = String::from_utf8_lossy(&buf[..head_end]).into_owned();
        let body_len = head
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.trim().parse::<usize>().ok())
            .unwrap_or(0);
        while buf.len() < head_end + body_len {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
        }
        head
    }

    fn expired_with_refresh(email: &str) -> Session {
        Session {
            refresh_token: Some(format!("refresh-{email}")),
            ..session(email, Some(now_unix() - 100))
        }
    }

    fn user(id: &str, email: &str) -> AuthUser {
        AuthUser {
            id: id.into(),
            email: Some(email.into()),
        }
    }

    fn session(email: &str, expires_at: Option<i64>) -> Session {
        Session {
            access_token: format!("token-{email}"),
            token_type: "bearer".into(),
            expires_in: None,
            expires_at,
            refresh_token: None,
            user: AuthUser {
                id: "u1".into(),
                email: Some(email.into()),
            },
        }
    }

    fn recorder(client: &AuthClient) -> (Rc<RefCell<Vec<AuthEvent>>>, Subscription) {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        let sub = client.on_auth_state_change(move |event, _| sink.borrow_mut().push(event));
        (events, sub)
    }

    #[tokio::test]
    async fn test_restores_persisted_session_once() {
        let kv = MemoryKv::new();
        let stored = session("a@b.c", Some(now_unix() + 3600));
        kv.set(SESSION_STORAGE_KEY, &serde_json::to_string(&stored).unwrap());

        let client = client_with(&kv);
        let (events, _sub) = recorder(&client);

        assert_eq!(client.get_session().await, Some(stored.clone()));
        assert_eq!(client.get_session().await, Some(stored));
        assert_eq!(*events.borrow(), vec![AuthEvent::InitialSession]);
    }

    #[tokio::test]
    async fn test_expired_session_without_refresh_token_is_dropped() {
        let kv = MemoryKv::new();
        let stored = session("a@b.c", Some(now_unix() - 10));
        kv.set(SESSION_STORAGE_KEY, &serde_json::to_string(&stored).unwrap());

        let client = client_with(&kv);
        let (events, _sub) = recorder(&client);
        assert_eq!(client.get_session().await, None);
        assert!(kv.get(SESSION_STORAGE_KEY).is_none());
        assert_eq!(
            *events.borrow(),
            vec![AuthEvent::SignedOut, AuthEvent::InitialSession]
        );
    }

    #[tokio::test]
    async fn test_garbage_in_storage_is_discarded() {
        let kv = MemoryKv::new();
        kv.set(SESSION_STORAGE_KEY, "{not json");
        let client = client_with(&kv);
        assert_eq!(client.get_session().await, None);
        assert!(kv.get(SESSION_STORAGE_KEY).is_none());
    }

    #[test]
    fn test_observers_run_in_order_and_stop_on_drop() {
        let client = client_with(&MemoryKv::new());
        let order = Rc::new(RefCell::new(Vec::new()));

        let first = {
            let order = order.clone();
            client.on_auth_state_change(move |_, _| order.borrow_mut().push(1))
        };
        let second = {
            let order = order.clone();
            client.on_auth_state_change(move |_, _| order.borrow_mut().push(2))
        };
        assert_eq!(client.listener_count(), 2);

        client.apply(AuthEvent::SignedIn, Some(session("a@b.c", None)));
        assert_eq!(*order.borrow(), vec![1, 2]);

        drop(first);
        second.unsubscribe();
        assert_eq!(client.listener_count(), 0);

        client.apply(AuthEvent::SignedOut, None);
        assert_eq!(*order.borrow(), vec![1, 2]);
    }

    #[test]
    fn test_observer_may_read_client_state() {
        let client = client_with(&MemoryKv::new());
        let seen = Rc::new(RefCell::new(None));
        let _sub = {
            let seen = seen.clone();
            let inner = client.clone();
            client.on_auth_state_change(move |_, _| {
                *seen.borrow_mut() = inner.current_session().and_then(|s| s.user.email);
            })
        };
        client.apply(AuthEvent::SignedIn, Some(session("a@b.c", None)));
        assert_eq!(seen.borrow().as_deref(), Some("a@b.c"));
    }

    #[test]
    fn test_apply_persists_and_clears() {
        let kv = MemoryKv::new();
        let client = client_with(&kv);
        client.apply(AuthEvent::SignedIn, Some(session("a@b.c", None)));
        assert!(kv.get(SESSION_STORAGE_KEY).is_some());
        assert_eq!(client.access_token().as_deref(), Some("token-a@b.c"));

        client.apply(AuthEvent::SignedOut, None);
        assert!(kv.get(SESSION_STORAGE_KEY).is_none());
        assert!(client.current_session().is_none());
    }

    #[tokio::test]
    async fn test_sign_out_without_session_is_local() {
        let client = client_with(&MemoryKv::new());
        let (events, _sub) = recorder(&client);
        client.sign_out().await.unwrap();
        assert_eq!(*events.borrow(), vec![AuthEvent::SignedOut]);
    }

    #[tokio::test]
    async fn test_stored_session_is_refreshed_at_start_up() {
        let kv = MemoryKv::new();
        let stale = expired_with_refresh("alice@example.com");
        kv.set(SESSION_STORAGE_KEY, &serde_json::to_string(&stale).unwrap());
        let fresh = Session {
            access_token: "fresh-alice".into(),
            ..session("alice@example.com", Some(now_unix() + 3600))
        };
        let base = serve_auth(Duration::ZERO, fresh, user("u1", "alice@example.com")).await;

        let client = client_at(&base, &kv);
        let (events, _sub) = recorder(&client);
        let restored = client.get_session().await;

        assert_eq!(restored.map(|s| s.access_token).as_deref(), Some("fresh-alice"));
        assert_eq!(
            *events.borrow(),
            vec![AuthEvent::TokenRefreshed, AuthEvent::InitialSession]
        );
    }

    #[tokio::test]
    async fn test_recovery_during_start_up_refresh_keeps_recovery_user() {
        let kv = MemoryKv::new();
        kv.set(
            SESSION_STORAGE_KEY,
            &serde_json::to_string(&expired_with_refresh("alice@example.com")).unwrap(),
        );
        let alice_fresh = Session {
            access_token: "fresh-alice".into(),
            ..session("alice@example.com", Some(now_unix() + 3600))
        };
        let base = serve_auth(
            Duration::from_millis(300),
            alice_fresh,
            user("u2", "bob@example.com"),
        )
        .await;

        let client = client_at(&base, &kv);
        let (events, _sub) = recorder(&client);
        let bob_link = RecoveryTokens {
            access_token: "recovery-bob".into(),
            refresh_token: None,
            expires_in: Some(3600),
            expires_at: None,
        };

        let (initial, adopted) =
            tokio::join!(client.get_session(), client.adopt_recovery_session(&bob_link));

        assert_eq!(adopted.unwrap().email(), Some("bob@example.com"));
        assert_eq!(initial.as_ref().and_then(|s| s.email()), Some("bob@example.com"));
        assert_eq!(client.access_token().as_deref(), Some("recovery-bob"));
        assert_eq!(
            client.valid_access_token().await.as_deref(),
            Some("recovery-bob")
        );
        let persisted: Session =
            serde_json::from_str(&kv.get(SESSION_STORAGE_KEY).unwrap()).unwrap();
        assert_eq!(persisted.email(), Some("bob@example.com"));
        assert_eq!(
            *events.borrow(),
            vec![AuthEvent::PasswordRecovery, AuthEvent::InitialSession]
        );
    }

    #[test]
    fn test_superseded_outcome_is_dropped() {
        let client = client_with(&MemoryKv::new());
        let (events, _sub) = recorder(&client);
        let started = client.generation();

        client.apply(AuthEvent::SignedIn, Some(session("bob@example.com", None)));
        assert!(!client.apply_if_unchanged(started, AuthEvent::SignedOut, None));
        assert_eq!(
            client.current_session().and_then(|s| s.user.email).as_deref(),
            Some("bob@example.com")
        );

        let started = client.generation();
        assert!(client.apply_if_unchanged(started, AuthEvent::SignedOut, None));
        assert!(client.current_session().is_none());
        assert_eq!(
            *events.borrow(),
            vec![AuthEvent::SignedIn, AuthEvent::SignedOut]
        );
    }

    #[tokio::test]
    async fn test_password_update_requires_session() {
        let client = client_with(&MemoryKv::new());
        let err = client.update_user_password("secret1").await.unwrap_err();
        assert!(matches!(err, ApiError::NotAuthenticated));
    }
}
