//! Event endpoints
//!
//! Thin pass-throughs: the raw response body is returned and callers pick
//! the envelope apart with [`crate::normalize`].

use serde_json::{json, Value};

use crate::client::{ApiClient, RequestOptions};
use crate::error::ApiError;
use crate::model::{NewEvent, RsvpStatus};

fn event_path(event_id: &str) -> String {
    format!("/events/{}", urlencoding::encode(event_id))
}

/// `GET /events`
pub async fn list_events(client: &ApiClient) -> Result<Value, ApiError> {
    client.request("/events", RequestOptions::get()).await
}

/// `GET /events/:id`
pub async fn get_event(client: &ApiClient, event_id: &str) -> Result<Value, ApiError> {
    client.request(&event_path(event_id), RequestOptions::get()).await
}

/// `POST /events`
pub async fn create_event(client: &ApiClient, payload: &NewEvent) -> Result<Value, ApiError> {
    let body = serde_json::to_value(payload)
        .map_err(|e| ApiError::InvalidRequest(format!("Failed to encode event: {e}")))?;
    client.request("/events", RequestOptions::post(body)).await
}

/// `POST /events/:id/rsvp` with `{"status": ...}`.
///
/// How the status maps onto attendance is left to the backend.
pub async fn rsvp_to_event(
    client: &ApiClient,
    event_id: &str,
    status: RsvpStatus,
) -> Result<Value, ApiError> {
    let path = format!("{}/rsvp", event_path(event_id));
    client
        .request(&path, RequestOptions::post(json!({ "status": status })))
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::normalize::{extract_created_event_id, normalize_event, normalize_events};
    use crate::session::Session;
    use crate::storage::MemorySessionStore;
    use httpmock::Method::{GET, POST};
    use httpmock::MockServer;
    use std::sync::Arc;

    fn client_for(server: &MockServer) -> ApiClient {
        let config = ClientConfig::new().with_base_url(server.base_url());
        let store = MemorySessionStore::with_session(&Session::new(Some("tok".to_string()), None));
        ApiClient::new(&config, Arc::new(store)).unwrap()
    }

    #[tokio::test]
    async fn test_list_events_across_envelopes() {
        let items = json!([{"id": 1, "title": "Party", "dateTime": "2024-01-01T10:00", "location": "Y"}]);
        let mut lists = Vec::new();

        for body in [items.clone(), json!({"events": items.clone()}), json!({"data": items.clone()})] {
            let server = MockServer::start();
            server.mock(|when, then| {
                when.method(GET).path("/events");
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(body.clone());
            });

            let client = client_for(&server);
            let response = list_events(&client).await.unwrap();
            lists.push(normalize_events(&response));
        }

        assert_eq!(lists[0].len(), 1);
        assert_eq!(lists[0], lists[1]);
        assert_eq!(lists[0], lists[2]);
    }

    #[test]
    fn test_event_path_encodes_id() {
        assert_eq!(event_path("42"), "/events/42");
        assert_eq!(event_path("a/b c"), "/events/a%2Fb%20c");
    }

    #[tokio::test]
    async fn test_get_event_unwraps_envelope() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/events/abc");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({"event": {"id": "abc", "title": "Gig"}}));
        });

        let client = client_for(&server);
        let response = get_event(&client, "abc").await.unwrap();

        mock.assert();
        let event = normalize_event(&response).unwrap();
        assert_eq!(event["title"], "Gig");
    }

    #[tokio::test]
    async fn test_create_event_posts_payload() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/events")
                .header("authorization", "Bearer tok")
                .json_body(json!({
                    "title": "X",
                    "dateTime": "2024-01-01T10:00",
                    "location": "Y",
                    "description": ""
                }));
            then.status(201)
                .header("content-type", "application/json")
                .json_body(json!({"id": "42"}));
        });

        let client = client_for(&server);
        let payload = NewEvent {
            title: "X".to_string(),
            date_time: "2024-01-01T10:00".to_string(),
            location: "Y".to_string(),
            description: String::new(),
        };
        let response = create_event(&client, &payload).await.unwrap();

        mock.assert();
        assert_eq!(extract_created_event_id(&response).as_deref(), Some("42"));
    }

    #[tokio::test]
    async fn test_rsvp_sends_status() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/events/7/rsvp")
                .json_body(json!({"status": "maybe"}));
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({"ok": true}));
        });

        let client = client_for(&server);
        rsvp_to_event(&client, "7", RsvpStatus::Maybe).await.unwrap();

        mock.assert();
    }
}
