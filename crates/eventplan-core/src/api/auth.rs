//! Authentication endpoints
//!
//! `register` and `login` persist whatever token and user they can find in
//! the response, even when only one of the two is present.

use serde_json::{json, Value};

use crate::client::{ApiClient, RequestOptions};
use crate::error::ApiError;
use crate::normalize::{extract_token, extract_user};
use crate::session::Session;

/// Create an account; `POST /auth/register`
pub async fn register(
    client: &ApiClient,
    name: &str,
    email: &str,
    password: &str,
) -> Result<Value, ApiError> {
    let response = client
        .request(
            "/auth/register",
            RequestOptions::post(json!({ "name": name, "email": email, "password": password })),
        )
        .await?;

    persist_session(client, &response);
    Ok(response)
}

/// Sign in; `POST /auth/login`
pub async fn login(client: &ApiClient, email: &str, password: &str) -> Result<Value, ApiError> {
    let response = client
        .request(
            "/auth/login",
            RequestOptions::post(json!({ "email": email, "password": password })),
        )
        .await?;

    persist_session(client, &response);
    Ok(response)
}

/// Current user as the backend sees it; `GET /auth/me`
pub async fn me(client: &ApiClient) -> Result<Value, ApiError> {
    client.request("/auth/me", RequestOptions::get()).await
}

/// Forget the local session. No network call is made.
pub fn logout(client: &ApiClient) {
    client.store().clear_session();
    tracing::info!("Logged out");
}

/// Session found in an auth response, if it carries a token or a user
pub fn session_from_response(response: &Value) -> Option<Session> {
    let session = Session::new(extract_token(response), extract_user(response));
    (!session.is_empty()).then_some(session)
}

fn persist_session(client: &ApiClient, response: &Value) {
    match session_from_response(response) {
        Some(session) => {
            tracing::info!(
                "Storing session (token: {}, user: {})",
                session.token.is_some(),
                session.user.is_some()
            );
            client.store().write_session(&session);
        }
        None => tracing::warn!("Auth response carried neither a token nor a user"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::session::UserProfile;
    use crate::storage::{MemorySessionStore, SessionStore};
    use httpmock::Method::{GET, POST};
    use httpmock::MockServer;
    use std::sync::Arc;

    fn client_for(server: &MockServer) -> ApiClient {
        let config = ClientConfig::new().with_base_url(server.base_url());
        ApiClient::new(&config, Arc::new(MemorySessionStore::new())).unwrap()
    }

    #[tokio::test]
    async fn test_login_stores_access_token_and_user() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/auth/login")
                .json_body(json!({"email": "ann@example.com", "password": "secret"}));
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({"accessToken": "abc", "user": {"name": "Ann"}}));
        });

        let client = client_for(&server);
        login(&client, "ann@example.com", "secret").await.unwrap();

        mock.assert();
        let session = client.store().read_session();
        assert_eq!(session.token.as_deref(), Some("abc"));
        assert_eq!(session.user, Some(UserProfile::named("Ann")));
        assert!(session.is_authenticated());
    }

    #[tokio::test]
    async fn test_register_persists_partial_session() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST)
                .path("/auth/register")
                .json_body(json!({"name": "Ann", "email": "a@b.c", "password": "secret"}));
            then.status(201)
                .header("content-type", "application/json")
                .json_body(json!({"data": {"user": {"name": "Ann", "email": "a@b.c"}}}));
        });

        let client = client_for(&server);
        register(&client, "Ann", "a@b.c", "secret").await.unwrap();

        let session = client.store().read_session();
        assert!(session.token.is_none());
        assert_eq!(session.user.as_ref().and_then(|u| u.email()), Some("a@b.c"));
    }

    #[tokio::test]
    async fn test_login_keeps_profile_of_any_shape() {
        let server = MockServer::start();
        let user = json!({"id": 7, "name": {"first": "Ann"}, "email": "a@b.c"});
        server.mock(|when, then| {
            when.method(POST).path("/auth/login");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({"token": "t", "user": user.clone()}));
        });

        let client = client_for(&server);
        login(&client, "a@b.c", "secret").await.unwrap();

        let session = client.store().read_session();
        assert_eq!(session.token.as_deref(), Some("t"));
        let stored = session.user.expect("profile should be stored");
        assert_eq!(serde_json::to_value(&stored).unwrap(), user);
    }

    #[tokio::test]
    async fn test_login_without_session_fields_leaves_store_untouched() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/auth/login");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({"ok": true}));
        });

        let client = client_for(&server);
        client
            .store()
            .write_session(&Session::new(Some("old".to_string()), None));
        login(&client, "a@b.c", "secret").await.unwrap();

        assert_eq!(client.store().token().as_deref(), Some("old"));
    }

    #[tokio::test]
    async fn test_failed_login_propagates_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/auth/login");
            then.status(401)
                .header("content-type", "application/json")
                .json_body(json!({"message": "Invalid credentials"}));
        });

        let client = client_for(&server);
        let err = login(&client, "a@b.c", "wrong").await.unwrap_err();

        assert_eq!(err.status(), Some(401));
        assert_eq!(err.message(), "Invalid credentials");
        assert!(client.store().read_session().is_empty());
    }

    #[tokio::test]
    async fn test_me_sends_stored_token() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/auth/me")
                .header("authorization", "Bearer tok");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({"user": {"name": "Ann"}}));
        });

        let client = client_for(&server);
        client
            .store()
            .write_session(&Session::new(Some("tok".to_string()), None));
        let body = me(&client).await.unwrap();

        mock.assert();
        assert_eq!(body, json!({"user": {"name": "Ann"}}));
    }

    #[test]
    fn test_logout_is_idempotent() {
        let config = ClientConfig::new();
        let store = Arc::new(MemorySessionStore::with_session(&Session::new(
            Some("abc".to_string()),
            Some(UserProfile::named("Ann")),
        )));
        let client = ApiClient::new(&config, store).unwrap();

        logout(&client);
        let once = client.store().read_session();
        logout(&client);
        let twice = client.store().read_session();

        assert!(once.is_empty());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_session_from_response() {
        assert!(session_from_response(&json!({})).is_none());
        let session = session_from_response(&json!({"jwt": "j"})).unwrap();
        assert_eq!(session.token.as_deref(), Some("j"));
        assert!(session.user.is_none());
    }
}
