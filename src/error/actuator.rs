use serenity::http::HttpError;
use thiserror::Error;

use crate::error::ErrorClass;

/// Classified failure of a Discord action.
///
/// Built from the HTTP status of the failed request so callers can decide
/// between retrying and giving up without inspecting serenity internals.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActuatorError {
    /// The target member, message, role or ban does not exist (HTTP 404).
    #[error("Discord resource not found: {0}")]
    NotFound(String),

    /// The bot lacks permission or role hierarchy for the action (HTTP 403).
    #[error("Missing permission for Discord action: {0}")]
    Forbidden(String),

    /// Discord throttled the request (HTTP 429).
    #[error("Discord rate limited request: {0}")]
    RateLimited(String),

    /// The user does not accept direct messages from the bot.
    #[error("Direct message could not be delivered to user {0}")]
    Undeliverable(u64),

    /// Network failure, server error, or anything else worth retrying.
    #[error("Discord request failed: {0}")]
    Transient(String),
}

impl ActuatorError {
    /// Classifies a serenity error by the HTTP status Discord returned.
    pub fn classify(err: &serenity::Error) -> Self {
        if let serenity::Error::Http(HttpError::UnsuccessfulRequest(resp)) = err {
            let detail = format!("{} {}", resp.status_code, resp.error.message);
            return match resp.status_code.as_u16() {
                404 => Self::NotFound(detail),
                403 => Self::Forbidden(detail),
                429 => Self::RateLimited(detail),
                _ => Self::Transient(detail),
            };
        }

        Self::Transient(err.to_string())
    }

    pub fn class(&self) -> ErrorClass {
        match self {
            Self::NotFound(_) | Self::Forbidden(_) => ErrorClass::Permanent,
            Self::RateLimited(_) | Self::Transient(_) => ErrorClass::Transient,
            Self::Undeliverable(_) => ErrorClass::Delivery,
        }
    }

    /// True for failures that will never succeed on retry.
    pub fn is_permanent(&self) -> bool {
        self.class() == ErrorClass::Permanent
    }
}

impl From<serenity::Error> for ActuatorError {
    fn from(err: serenity::Error) -> Self {
        Self::classify(&err)
    }
}
