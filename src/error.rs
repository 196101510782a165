use std::path::PathBuf;
use thiserror::Error;

/// Failures of a caption generation request
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("Invalid caption server address: {0}")]
    InvalidEndpoint(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Server error ({status}): {reason}")]
    Status { status: u16, reason: String },

    #[error("Caption server failed: {0}")]
    Backend(String),

    #[error("Invalid response from caption server: {0}")]
    InvalidResponse(String),
}

impl GenerateError {
    /// The server answered, but not with something we can render
    pub fn is_invalid_response(&self) -> bool {
        matches!(self, GenerateError::InvalidResponse(_))
    }
}

/// Failures while taking in a user-selected file
#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("Could not read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Dropped file {0} has neither a path nor contents")]
    NoContent(String),
}

/// Failures while writing to the system clipboard
#[derive(Debug, Error)]
#[error("Clipboard unavailable: {0}")]
pub struct ClipboardError(#[from] pub arboard::Error);
