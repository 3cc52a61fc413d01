//! Response-shape normalization
//!
//! The backend does not commit to one envelope, so every extraction here
//! walks a fixed, ordered list of candidate fields and takes the first
//! truthy one. `null`, `false`, `0` and `""` count as missing.

use serde_json::Value;

use crate::session::UserProfile;

/// Fields checked, in order, for an auth token
pub const TOKEN_FIELDS: &[&str] = &["token", "accessToken", "jwt"];

/// Paths checked, in order, for the user profile
pub const USER_PATHS: &[&[&str]] = &[&["user"], &["data", "user"]];

/// Fields checked, in order, for the id of a listed or fetched event
pub const EVENT_ID_FIELDS: &[&str] = &["id", "_id", "eventId"];

/// Paths checked, in order, for the id of a freshly created event
pub const CREATED_ID_PATHS: &[&[&str]] = &[&["id"], &["_id"], &["event", "id"], &["event", "_id"]];

/// JavaScript-style truthiness, which is what the backend contract was written against
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn lookup<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter()
        .try_fold(value, |current, key| current.get(key))
        .filter(|found| is_truthy(found))
}

fn first_truthy<'a>(value: &'a Value, paths: &[&[&str]]) -> Option<&'a Value> {
    paths.iter().find_map(|path| lookup(value, path))
}

/// Render an identifier value as a string; numbers keep their decimal form
fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Auth token from `token`, `accessToken`, or `jwt`
pub fn extract_token(response: &Value) -> Option<String> {
    TOKEN_FIELDS
        .iter()
        .find_map(|field| lookup(response, &[*field]))
        .and_then(id_string)
}

/// User profile from `user` or `data.user`; the first object found wins
pub fn extract_user(response: &Value) -> Option<UserProfile> {
    USER_PATHS
        .iter()
        .filter_map(|path| lookup(response, path))
        .find_map(UserProfile::from_value)
}

/// Id of a listed or fetched event (`id`, `_id`, `eventId`)
pub fn extract_event_id(event: &Value) -> Option<String> {
    EVENT_ID_FIELDS
        .iter()
        .find_map(|field| lookup(event, &[*field]))
        .and_then(id_string)
}

/// Id of a created event (`id`, `_id`, `event.id`, `event._id`)
pub fn extract_created_event_id(response: &Value) -> Option<String> {
    first_truthy(response, CREATED_ID_PATHS).and_then(id_string)
}

/// Event list from a bare array, `.events`, or `.data`; anything else is empty
pub fn normalize_events(response: &Value) -> Vec<Value> {
    if let Value::Array(items) = response {
        return items.clone();
    }
    ["events", "data"]
        .iter()
        .find_map(|key| response.get(key).and_then(Value::as_array))
        .cloned()
        .unwrap_or_default()
}

/// Single event from `.event`, `.data`, or the body itself
pub fn normalize_event(response: &Value) -> Option<Value> {
    if !is_truthy(response) {
        return None;
    }
    let event = lookup(response, &["event"])
        .or_else(|| lookup(response, &["data"]))
        .unwrap_or(response);
    Some(event.clone())
}
