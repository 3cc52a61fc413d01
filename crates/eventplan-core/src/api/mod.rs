//! Named backend operations
//!
//! - [`auth`] - register, login, current user, logout
//! - [`events`] - list, fetch, create, RSVP

pub mod auth;
pub mod events;
