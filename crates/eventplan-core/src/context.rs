//! Process-wide session state
//!
//! [`SessionContext`] is hydrated once from the session store and then kept
//! in step with it by its own `login`/`register`/`logout` actions. Listeners
//! subscribe to changes through a `watch` channel.

use serde_json::Value;
use tokio::sync::watch;

use crate::api::auth;
use crate::client::ApiClient;
use crate::error::ApiError;
use crate::session::{Session, UserProfile};

pub struct SessionContext {
    client: ApiClient,
    state: watch::Sender<Session>,
}

impl SessionContext {
    /// Build the context from whatever the store currently holds
    pub fn hydrate(client: ApiClient) -> Self {
        let session = client.store().read_session();
        tracing::debug!(
            "Hydrated session (authenticated: {})",
            session.is_authenticated()
        );
        let (state, _) = watch::channel(session);
        Self { client, state }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn session(&self) -> Session {
        self.state.borrow().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.state.borrow().token.clone()
    }

    pub fn user(&self) -> Option<UserProfile> {
        self.state.borrow().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    /// Receiver that observes every session change
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Value, ApiError> {
        let response = auth::login(&self.client, email, password).await?;
        self.refresh();
        Ok(response)
    }

    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Value, ApiError> {
        let response = auth::register(&self.client, name, email, password).await?;
        self.refresh();
        Ok(response)
    }

    /// Clear the stored session and reset the in-memory state
    pub fn logout(&self) {
        auth::logout(&self.client);
        self.state.send_replace(Session::default());
    }

    /// Re-read the store and publish the result
    pub fn refresh(&self) {
        let session = self.client.store().read_session();
        self.state.send_replace(session);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::storage::{MemorySessionStore, SessionStore, SledSessionStore};
    use httpmock::Method::POST;
    use httpmock::MockServer;
    use serde_json::json;
    use std::sync::Arc;

    fn context(base_url: &str, session: Session) -> SessionContext {
        let config = ClientConfig::new().with_base_url(base_url);
        let store = Arc::new(MemorySessionStore::with_session(&session));
        SessionContext::hydrate(ApiClient::new(&config, store).unwrap())
    }

    #[test]
    fn test_hydrate_reads_store_once() {
        let ctx = context(
            "http://localhost:3001",
            Session::new(Some("abc".to_string()), Some(UserProfile::named("Ann"))),
        );
        assert!(ctx.is_authenticated());
        assert_eq!(ctx.token().as_deref(), Some("abc"));
        assert_eq!(ctx.user().as_ref().and_then(|u| u.name()), Some("Ann"));

        // Changes made behind the context's back are not picked up until refresh
        ctx.client().store().clear_session();
        assert!(ctx.is_authenticated());
        ctx.refresh();
        assert!(!ctx.is_authenticated());
    }

    #[tokio::test]
    async fn test_login_flips_authenticated_flag() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/auth/login");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({"accessToken": "abc", "user": {"name": "Ann"}}));
        });

        let ctx = context(&server.base_url(), Session::default());
        let mut rx = ctx.subscribe();
        assert!(!ctx.is_authenticated());

        ctx.login("ann@example.com", "secret").await.unwrap();

        assert!(ctx.is_authenticated());
        assert_eq!(ctx.token().as_deref(), Some("abc"));
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().token.as_deref(), Some("abc"));
    }

    #[tokio::test]
    async fn test_failed_login_keeps_state() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/auth/login");
            then.status(401)
                .header("content-type", "application/json")
                .json_body(json!({"error": "nope"}));
        });

        let ctx = context(&server.base_url(), Session::default());
        let rx = ctx.subscribe();

        let err = ctx.login("a@b.c", "bad").await.unwrap_err();
        assert_eq!(err.message(), "nope");
        assert!(!ctx.is_authenticated());
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_hydrate_from_reopened_sled_store() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let session = Session::new(Some("abc".to_string()), Some(UserProfile::named("Ann")));

        {
            let store = SledSessionStore::open(temp_dir.path()).unwrap();
            store.write_session(&session);
        }

        let store = Arc::new(SledSessionStore::open(temp_dir.path()).unwrap());
        let client = ApiClient::new(&ClientConfig::new(), store).unwrap();
        let ctx = SessionContext::hydrate(client);

        assert!(ctx.is_authenticated());
        assert_eq!(ctx.session(), session);
    }

    #[test]
    fn test_logout_twice_matches_once() {
        let ctx = context(
            "http://localhost:3001",
            Session::new(Some("abc".to_string()), Some(UserProfile::named("Ann"))),
        );

        ctx.logout();
        let once = (ctx.session(), ctx.client().store().read_session());
        ctx.logout();
        let twice = (ctx.session(), ctx.client().store().read_session());

        assert_eq!(once, twice);
        assert!(once.0.is_empty());
        assert!(once.1.is_empty());
    }
}
