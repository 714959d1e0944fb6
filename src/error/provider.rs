use thiserror::Error;

use crate::error::ErrorClass;

/// Failure from the external rank or stream API.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The player or channel does not exist upstream.
    #[error("No upstream record for '{0}'")]
    NotFound(String),

    /// Credentials were rejected; the token is refreshed on the next call.
    #[error("Provider rejected credentials")]
    Unauthorized,

    /// The provider throttled the request.
    #[error("Provider rate limited request")]
    RateLimited,

    /// Unexpected HTTP status.
    #[error("Provider returned status {0}")]
    Status(u16),

    /// The response body did not have the expected shape.
    #[error("Malformed provider response: {0}")]
    Malformed(String),

    /// Connection, timeout or body read failure.
    #[error(transparent)]
    Request(#[from] reqwest::Error),
}

impl ProviderError {
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::NotFound(_) | Self::Malformed(_) => ErrorClass::Permanent,
            Self::Status(code) if (400..500).contains(code) => ErrorClass::Permanent,
            Self::Unauthorized | Self::RateLimited | Self::Status(_) | Self::Request(_) => {
                ErrorClass::Transient
            }
        }
    }
}
