//! Terminal output
//!
//! Renders views either as human-readable text or as one JSON document per
//! command, picked by `--format`.

use eventplan_core::{Event, RsvpStatus, Session};
use serde_json::{json, Value};

use crate::views::Route;

/// Prints views to stdout and errors to stderr
#[derive(Debug, Default, Clone)]
pub struct Renderer {
    /// Whether to print in JSON format
    pub json_output: bool,
}

impl Renderer {
    pub fn new(json_output: bool) -> Self {
        Self { json_output }
    }

    pub fn home(&self, session: &Session) {
        if self.json_output {
            self.print_json(&json!({
                "view": "home",
                "authenticated": session.is_authenticated(),
                "user": session.user,
            }));
        } else {
            println!("{}", render_home(session));
        }
    }

    pub fn events(&self, events: &[Event]) {
        if self.json_output {
            self.print_json(&json!({ "view": "events", "events": events }));
        } else {
            println!("{}", render_event_list(events));
        }
    }

    pub fn event(&self, event: Option<&Event>) {
        if self.json_output {
            self.print_json(&json!({ "view": "event", "event": event }));
            return;
        }
        match event {
            Some(event) => println!("{}", render_event_details(event)),
            None => println!("Event not found."),
        }
    }

    pub fn profile(&self, session: &Session, remote: &Value) {
        if self.json_output {
            self.print_json(&json!({ "view": "whoami", "session": session, "me": remote }));
            return;
        }
        let name = session
            .user
            .as_ref()
            .and_then(|u| u.display_name())
            .unwrap_or("(unknown)");
        println!("Signed in as {name}");
        println!("{}", serde_json::to_string_pretty(remote).unwrap_or_default());
    }

    /// One-line status such as "RSVP saved: yes"
    pub fn notice(&self, message: &str) {
        if self.json_output {
            self.print_json(&json!({ "notice": message }));
        } else {
            println!("{message}");
        }
    }

    pub fn navigated(&self, route: &Route) {
        tracing::debug!("Navigating to {}", route);
        if self.json_output {
            self.print_json(&json!({ "navigate": route.to_string() }));
        }
    }

    pub fn error(&self, message: &str) {
        if self.json_output {
            eprintln!("{}", json!({ "error": message }));
        } else {
            eprintln!("Error: {message}");
        }
    }

    fn print_json(&self, value: &Value) {
        println!("{}", serde_json::to_string(value).unwrap_or_default());
    }
}

pub fn render_home(session: &Session) -> String {
    let mut out = String::new();
    out.push_str("Plan events like it's 1989.\n");
    out.push_str("Create events, browse the lineup, and RSVP.\n\n");
    out.push_str("  eventplan events         Browse events\n");
    if session.is_authenticated() {
        out.push_str("  eventplan create ...     Create an event\n");
        if let Some(name) = session.user.as_ref().and_then(|u| u.display_name()) {
            out.push_str(&format!("\nSigned in as {name}"));
        }
    } else {
        out.push_str("  eventplan register ...   Create account\n");
        out.push_str("  eventplan login ...      Sign in");
    }
    out.trim_end().to_string()
}

pub fn render_event_list(events: &[Event]) -> String {
    if events.is_empty() {
        return "No events yet\nBe the first to create a neon-lit gathering: eventplan create"
            .to_string();
    }

    events
        .iter()
        .map(|event| {
            let mut card = format!(
                "[{}] {}\n  When:     {}\n  Location: {}",
                event.id.as_deref().unwrap_or("?"),
                event.display_title(),
                event.display_date(),
                event.display_location()
            );
            if let Some(description) = &event.description {
                card.push_str(&format!("\n  {description}"));
            }
            card
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn render_event_details(event: &Event) -> String {
    let mut out = format!(
        "{}\n  When:  {}\n  Where: {}",
        event.display_title(),
        event.display_date(),
        event.display_location()
    );
    if let Some(description) = &event.description {
        out.push_str(&format!("\n\nAbout\n  {description}"));
    }
    if let Some(id) = &event.id {
        let choices = RsvpStatus::ALL
            .iter()
            .map(|s| format!("{} ({})", s, s.label()))
            .collect::<Vec<_>>()
            .join(", ");
        out.push_str(&format!("\n\nRSVP: eventplan rsvp {id} <{choices}>"));
    }
    out
}
