//! Session data model

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// User profile as returned by the backend.
///
/// The backend owns the shape, so the profile is kept as the raw JSON object
/// and `name`/`email` are read leniently: a field of another type reads as
/// absent instead of rejecting the whole profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserProfile(Map<String, Value>);

impl UserProfile {
    pub fn named(name: impl Into<String>) -> Self {
        Self::default().with_field("name", Value::String(name.into()))
    }

    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.0.insert(key.into(), value);
        self
    }

    /// Interpret an arbitrary JSON value as a profile; only objects qualify
    pub fn from_value(value: &Value) -> Option<Self> {
        value.as_object().cloned().map(Self)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn name(&self) -> Option<&str> {
        self.get("name").and_then(Value::as_str)
    }

    pub fn email(&self) -> Option<&str> {
        self.get("email").and_then(Value::as_str)
    }

    /// Best label for display: name, then email
    pub fn display_name(&self) -> Option<&str> {
        self.name()
            .filter(|n| !n.is_empty())
            .or(self.email().filter(|e| !e.is_empty()))
    }
}

/// The client-held login state.
///
/// Token and user are independently optional; a present token is the only
/// signal of being authenticated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: Option<String>,
    pub user: Option<UserProfile>,
}

impl Session {
    pub fn new(token: Option<String>, user: Option<UserProfile>) -> Self {
        Self { token, user }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.token.is_none() && self.user.is_none()
    }
}
