use std::num::ParseIntError;
use thiserror::Error;

/// Internal issues indicating malformed persisted data or possible bugs
#[derive(Error, Debug)]
pub enum InternalError {
    /// Failure to parse a Discord ID from a stored String
    #[error("Failed to parse ID from String '{value}': {source}")]
    ParseStringId {
        /// The string value that failed to parse
        value: String,
        /// The underlying parse error
        #[source]
        source: ParseIntError,
    },

    /// A stored ID parsed to zero, which Discord never issues
    #[error("Stored ID '{0}' is not a valid Discord snowflake")]
    ZeroId(String),

    /// A stored enum column held an unknown value
    #[error("Unknown {field} value '{value}'")]
    UnknownVariant {
        /// Column the value was read from
        field: &'static str,
        /// The value found
        value: String,
    },

    /// A compare-and-swap write kept losing to concurrent writers
    #[error("Gave up updating {entity} {id} after {attempts} conflicting writes")]
    WriteConflict {
        entity: &'static str,
        id: i32,
        attempts: u32,
    },
}
