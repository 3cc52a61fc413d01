//! Screen logic for the CLI
//!
//! Each function here is one user action: it validates input, calls the
//! core API, normalizes the response, and says where to go next. Printing
//! is left to [`crate::render`].

use eventplan_core::api::{auth, events};
use eventplan_core::normalize::{extract_created_event_id, normalize_event, normalize_events};
use eventplan_core::{
    ApiClient, ApiError, CreateEventForm, Event, LoginForm, RegisterForm, RsvpStatus,
    SessionContext,
};
use serde_json::Value;
use std::fmt;

/// A place the user can be sent to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Events,
    EventDetails(String),
    Login { next: String },
    Register,
}

impl Route {
    /// Resolve an app path such as `/events/42`; unknown paths land on home.
    ///
    /// The event id segment is percent-decoded, mirroring how `Display`
    /// encodes it.
    pub fn from_path(path: &str) -> Self {
        let path = path.split('?').next().unwrap_or_default().trim_end_matches('/');
        match path {
            "" => Route::Home,
            "/events" => Route::Events,
            "/register" => Route::Register,
            "/login" => Route::Login {
                next: "/events".to_string(),
            },
            other => match other.strip_prefix("/events/") {
                Some(id) if !id.is_empty() && !id.contains('/') => {
                    let id = urlencoding::decode(id)
                        .map(|decoded| decoded.into_owned())
                        .unwrap_or_else(|_| id.to_string());
                    Route::EventDetails(id)
                }
                _ => Route::Home,
            },
        }
    }

    fn login_then(next: impl Into<String>) -> Self {
        Route::Login { next: next.into() }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Home => write!(f, "/"),
            Route::Events => write!(f, "/events"),
            Route::EventDetails(id) => write!(f, "/events/{}", urlencoding::encode(id)),
            Route::Login { next } => write!(f, "/login?next={}", urlencoding::encode(next)),
            Route::Register => write!(f, "/register"),
        }
    }
}

/// Outcome of an RSVP attempt
#[derive(Debug, Clone, PartialEq)]
pub enum RsvpOutcome {
    /// Not signed in; nothing was sent
    Redirect(Route),
    /// Saved; `event` is the reloaded detail view, or the reload error
    Saved {
        message: String,
        event: Result<Option<Event>, String>,
    },
}

fn message_or(err: &ApiError, fallback: &str) -> String {
    let message = err.message();
    if message.is_empty() {
        fallback.to_string()
    } else {
        message
    }
}

/// Load the event list, accepting any of the known envelopes
pub async fn load_events(client: &ApiClient) -> Result<Vec<Event>, String> {
    let response = events::list_events(client)
        .await
        .map_err(|e| message_or(&e, "Failed to load events."))?;

    Ok(normalize_events(&response)
        .iter()
        .map(Event::from_value)
        .collect())
}

/// Load one event; `None` when the backend answered with an empty body
pub async fn load_event(client: &ApiClient, id: &str) -> Result<Option<Event>, String> {
    let response = events::get_event(client, id)
        .await
        .map_err(|e| message_or(&e, "Failed to load event."))?;

    Ok(normalize_event(&response).as_ref().map(Event::from_value))
}

/// Create an event and decide where to go afterwards.
///
/// Signed-out users are sent to login first. After a create the user lands
/// on the new event when the backend returned its id, else on the list.
pub async fn create_event(ctx: &SessionContext, form: &CreateEventForm) -> Result<Route, String> {
    if !ctx.is_authenticated() {
        return Ok(Route::login_then("/events"));
    }

    let payload = form.to_payload().map_err(|e| e.to_string())?;
    let created = events::create_event(ctx.client(), &payload)
        .await
        .map_err(|e| message_or(&e, "Failed to create event."))?;

    match extract_created_event_id(&created) {
        Some(id) => {
            tracing::info!("Created event {}", id);
            Ok(Route::EventDetails(id))
        }
        None => {
            tracing::info!("Created event without an id in the response");
            Ok(Route::Events)
        }
    }
}

/// RSVP to an event, then reload it
pub async fn rsvp(
    ctx: &SessionContext,
    id: &str,
    status: RsvpStatus,
) -> Result<RsvpOutcome, String> {
    if !ctx.is_authenticated() {
        return Ok(RsvpOutcome::Redirect(Route::login_then(
            Route::EventDetails(id.to_string()).to_string(),
        )));
    }

    events::rsvp_to_event(ctx.client(), id, status)
        .await
        .map_err(|e| message_or(&e, "RSVP failed."))?;

    Ok(RsvpOutcome::Saved {
        message: format!("RSVP saved: {status}"),
        event: load_event(ctx.client(), id).await,
    })
}

/// Sign in and return the route to continue to
pub async fn login(
    ctx: &SessionContext,
    form: &LoginForm,
    next: Option<&str>,
) -> Result<Route, String> {
    form.validate().map_err(|e| e.to_string())?;

    ctx.login(&form.email, &form.password)
        .await
        .map_err(|e| message_or(&e, "Login failed."))?;

    Ok(next.map(Route::from_path).unwrap_or(Route::Events))
}

/// Create an account and continue to the event list
pub async fn register(ctx: &SessionContext, form: &RegisterForm) -> Result<Route, String> {
    form.validate().map_err(|e| e.to_string())?;

    ctx.register(&form.name, &form.email, &form.password)
        .await
        .map_err(|e| message_or(&e, "Registration failed."))?;

    Ok(Route::Events)
}

pub fn logout(ctx: &SessionContext) -> Route {
    ctx.logout();
    Route::Home
}

/// Ask the backend who we are
pub async fn whoami(ctx: &SessionContext) -> Result<Value, String> {
    auth::me(ctx.client())
        .await
        .map_err(|e| message_or(&e, "Failed to load profile."))
}
