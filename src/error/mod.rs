//! Error types and failure classification.
//!
//! `AppError` is the top-level error returned by repositories, services and
//! scheduled tasks. Every variant maps onto one of four `ErrorClass`es, which
//! decide what a sweep does with the record that failed: leave it for the next
//! run, advance it to a terminal state, abort the sweep, or just log.

pub mod actuator;
pub mod config;
pub mod internal;
pub mod provider;

use thiserror::Error;

use crate::error::{
    actuator::ActuatorError, config::ConfigError, internal::InternalError,
    provider::ProviderError,
};

/// Top-level application error type.
///
/// Most variants use `#[from]` for automatic error conversion so `?` works across
/// repositories, actuators and providers.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error during startup or environment variable loading.
    #[error(transparent)]
    ConfigErr(#[from] ConfigError),

    /// Malformed persisted data or an unexpected internal state.
    #[error(transparent)]
    InternalErr(#[from] InternalError),

    /// Classified failure from a Discord action.
    #[error(transparent)]
    ActuatorErr(#[from] ActuatorError),

    /// Failure from the rank or stream provider.
    #[error(transparent)]
    ProviderErr(#[from] ProviderError),

    /// Database operation error from SeaORM.
    #[error(transparent)]
    DbErr(#[from] sea_orm::DbErr),

    /// JSON column could not be encoded or decoded.
    #[error(transparent)]
    SerdeErr(#[from] serde_json::Error),

    /// Discord client error from Serenity outside of an actuator call.
    ///
    /// Boxed due to large size.
    #[error(transparent)]
    DiscordErr(#[from] Box<serenity::Error>),

    /// Cron scheduler error.
    #[error(transparent)]
    SchedulerErr(#[from] tokio_cron_scheduler::JobSchedulerError),

    /// Resource not found error.
    ///
    /// # Fields
    /// - Message describing what resource was not found
    #[error("{0}")]
    NotFound(String),

    /// Invalid operation error, such as rerolling a giveaway that has not ended.
    ///
    /// # Fields
    /// - Message describing what was invalid about the request
    #[error("{0}")]
    BadRequest(String),

    /// Internal error with custom message.
    #[error("{0}")]
    InternalError(String),
}

/// Manual conversion from serenity::Error to AppError.
///
/// Boxes the error to reduce the size of the AppError enum.
impl From<serenity::Error> for AppError {
    fn from(err: serenity::Error) -> Self {
        AppError::DiscordErr(Box::new(err))
    }
}

/// How a sweep reacts to a failed record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Network, API or rate-limit failure. No mutation; retried next sweep.
    Transient,
    /// The record can never succeed as-is. Logged and advanced to a terminal state.
    Permanent,
    /// The record store failed. The current sweep is aborted.
    Store,
    /// A notification could not be delivered. Logged only.
    Delivery,
}

impl AppError {
    /// Maps the error onto the class that decides how a sweep handles it.
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::ActuatorErr(err) => err.class(),
            Self::ProviderErr(err) => err.class(),
            Self::DiscordErr(err) => ActuatorError::classify(err).class(),
            Self::DbErr(_) => ErrorClass::Store,
            Self::SchedulerErr(_) => ErrorClass::Transient,
            Self::ConfigErr(_)
            | Self::InternalErr(_)
            | Self::SerdeErr(_)
            | Self::NotFound(_)
            | Self::BadRequest(_)
            | Self::InternalError(_) => ErrorClass::Permanent,
        }
    }

    /// Returns true when the current sweep must stop instead of moving on to
    /// the next record.
    pub fn aborts_sweep(&self) -> bool {
        self.class() == ErrorClass::Store
    }
}
