//! Error types for Tubelink Core

use thiserror::Error;

/// Result type alias for adapter operations
pub type Result<T> = std::result::Result<T, Error>;

/// Adapter error types
#[derive(Error, Debug)]
pub enum Error {
    // Bootstrap errors
    #[error("Failed to inject SDK script: {0}")]
    ScriptInjection(String),

    #[error("SDK entry point not available")]
    SdkUnavailable,

    // Player errors
    #[error("Failed to construct SDK player: {0}")]
    PlayerConstruction(String),

    // Source errors
    #[error("Source is not playable: {0}")]
    UnplayableSource(String),
}

impl Error {
    /// Returns the short code used in log lines
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::ScriptInjection(_) => "SCRIPT_INJECT",
            Error::SdkUnavailable => "SDK_UNAVAILABLE",
            Error::PlayerConstruction(_) => "PLAYER_CONSTRUCT",
            Error::UnplayableSource(_) => "UNPLAYABLE_SOURCE",
        }
    }
}
