//! Eventplan Core Library
//!
//! Client-side building blocks for the event planner backend: the HTTP
//! client, session persistence, response normalization, and the named
//! auth/event operations. Nothing here knows about how results are shown.
//!
//! # Modules
//!
//! - [`client`] - HTTP client with auth headers, timeout, and error mapping
//! - [`storage`] - Durable session store (sled) and an in-memory store
//! - [`api`] - Auth and Events operations
//! - [`normalize`] - Ordered fallbacks over loosely specified response shapes
//! - [`context`] - Process-wide session state
//! - [`forms`] - Client-side form validation
//! - [`model`] - Event, RSVP and payload types
//! - [`session`] - Session and user profile types
//! - [`config`] - Client configuration
//! - [`error`] - Error types

pub mod api;
pub mod client;
pub mod config;
pub mod context;
pub mod error;
pub mod forms;
pub mod model;
pub mod normalize;
pub mod session;
pub mod storage;

// Re-export commonly used types
pub use client::{ApiClient, Method, RequestOptions};
pub use config::ClientConfig;
pub use context::SessionContext;
pub use error::{ApiError, AppError, Result};
pub use forms::{CreateEventForm, LoginForm, RegisterForm, ValidationError};
pub use model::{Event, NewEvent, RsvpStatus};
pub use session::{Session, UserProfile};
pub use storage::{MemorySessionStore, SessionStore, SledSessionStore};
