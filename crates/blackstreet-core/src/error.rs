//! Error types for the blackstreet-core crate.

use std::fmt;

/// Result type for blackstreet-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in blackstreet-core operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A progress update referenced a resource that was never registered.
    UnknownResource {
        /// Debug rendering of the resource id.
        id: String,
    },
    /// Background audio could not be started.
    AudioUnavailable {
        /// Why playback was refused.
        reason: String,
    },
    /// A configuration value was out of range.
    InvalidConfig {
        /// The offending setting.
        field: &'static str,
        /// Description of what was invalid.
        detail: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnknownResource { id } => write!(f, "unknown resource {id}"),
            Error::AudioUnavailable { reason } => write!(f, "audio unavailable: {reason}"),
            Error::InvalidConfig { field, detail } => write!(f, "invalid {field}: {detail}"),
        }
    }
}

impl std::error::Error for Error {}
