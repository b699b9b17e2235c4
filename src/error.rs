//! Error taxonomy surfaced in the board's error banner

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Every failure the board can show to the user.
///
/// The `Display` output is the banner text, so messages are written for
/// people rather than logs. None of these are fatal: the board stays
/// interactive and the user retries by triggering add again.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub enum BoardError {
    /// Missing or malformed input in the form
    #[error("{0}")]
    Validation(String),

    /// HTTP failure talking to the geocoding or weather provider
    #[error("{0}")]
    Network(String),

    /// Geocoding succeeded but returned no candidates
    #[error("{0}")]
    Lookup(String),

    /// The widget file could not be read or written
    #[error("{0}")]
    Storage(String),
}

impl BoardError {
    pub fn kind(&self) -> &'static str {
        match self {
            BoardError::Validation(_) => "Invalid input",
            BoardError::Network(_) => "Network error",
            BoardError::Lookup(_) => "Not found",
            BoardError::Storage(_) => "Storage error",
        }
    }
}
