//! Event domain types

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::normalize::{extract_event_id, is_truthy};

/// Placeholder shown for events without a title
pub const UNTITLED: &str = "Untitled Event";

/// Placeholder shown for a missing date or location
pub const TBA: &str = "TBA";

/// An event as read back from the backend.
///
/// Built leniently from whatever JSON the backend sent; fields that are
/// missing or not strings are `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: Option<String>,
    pub title: Option<String>,
    #[serde(rename = "dateTime")]
    pub date_time: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
}

impl Event {
    pub fn from_value(value: &Value) -> Self {
        let text = |key: &str| {
            value
                .get(key)
                .filter(|v| is_truthy(v))
                .and_then(Value::as_str)
                .map(str::to_string)
        };

        Self {
            id: extract_event_id(value),
            title: text("title"),
            date_time: text("dateTime"),
            location: text("location"),
            description: text("description"),
        }
    }

    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(UNTITLED)
    }

    pub fn display_location(&self) -> &str {
        self.location.as_deref().unwrap_or(TBA)
    }

    /// Human-readable date, `TBA` when unset
    pub fn display_date(&self) -> String {
        self.date_time
            .as_deref()
            .map(format_date_time)
            .unwrap_or_else(|| TBA.to_string())
    }
}

/// Format an ISO-ish timestamp as `YYYY-MM-DD HH:MM`.
///
/// Accepts RFC 3339 and the `datetime-local` forms `YYYY-MM-DDTHH:MM[:SS]`;
/// anything else is returned unchanged.
pub fn format_date_time(raw: &str) -> String {
    const OUTPUT: &str = "%Y-%m-%d %H:%M";

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format(OUTPUT).to_string();
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, pattern) {
            return dt.format(OUTPUT).to_string();
        }
    }
    raw.to_string()
}

/// Payload for creating an event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEvent {
    pub title: String,
    pub date_time: String,
    pub location: String,
    pub description: String,
}

/// Attendance answer for an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RsvpStatus {
    Yes,
    Maybe,
    No,
}

impl RsvpStatus {
    pub const ALL: [RsvpStatus; 3] = [RsvpStatus::Yes, RsvpStatus::Maybe, RsvpStatus::No];

    pub fn as_str(&self) -> &'static str {
        match self {
            RsvpStatus::Yes => "yes",
            RsvpStatus::Maybe => "maybe",
            RsvpStatus::No => "no",
        }
    }

    /// Button-style label
    pub fn label(&self) -> &'static str {
        match self {
            RsvpStatus::Yes => "Going",
            RsvpStatus::Maybe => "Maybe",
            RsvpStatus::No => "Can't make it",
        }
    }
}

impl fmt::Display for RsvpStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RsvpStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yes" => Ok(RsvpStatus::Yes),
            "maybe" => Ok(RsvpStatus::Maybe),
            "no" => Ok(RsvpStatus::No),
            other => Err(format!("Unknown RSVP status '{other}' (expected yes, maybe or no)")),
        }
    }
}
