//! Client-side form checks
//!
//! Each form validates before any request is made and short-circuits with
//! a message meant to be shown to the user as-is.

use thiserror::Error;

use crate::model::NewEvent;

/// Minimum accepted password length at registration
pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Email and password are required.")]
    MissingCredentials,

    #[error("Name, email, and password are required.")]
    MissingRegistrationFields,

    #[error("Password must be at least 6 characters.")]
    PasswordTooShort,

    #[error("Title, date/time, and location are required.")]
    MissingEventFields,
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.email.is_empty() || self.password.is_empty() {
            return Err(ValidationError::MissingCredentials);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl RegisterForm {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.is_empty() || self.email.is_empty() || self.password.is_empty() {
            return Err(ValidationError::MissingRegistrationFields);
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ValidationError::PasswordTooShort);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct CreateEventForm {
    pub title: String,
    pub date_time: String,
    pub location: String,
    pub description: String,
}

impl CreateEventForm {
    /// Validate and build the request payload.
    ///
    /// Title, location and description are trimmed; the date is sent as typed.
    pub fn to_payload(&self) -> Result<NewEvent, ValidationError> {
        let title = self.title.trim();
        let location = self.location.trim();
        if title.is_empty() || self.date_time.trim().is_empty() || location.is_empty() {
            return Err(ValidationError::MissingEventFields);
        }

        Ok(NewEvent {
            title: title.to_string(),
            date_time: self.date_time.clone(),
            location: location.to_string(),
            description: self.description.trim().to_string(),
        })
    }
}
