use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Transport,
    Http,
    Contract,
    Io,
}

/// Failure of a single analysis submission.
///
/// The `Display` text is what the user sees in the error banner.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    #[error("Error analyzing the file: {0}")]
    Transport(String),
    #[error("Error analyzing the file (HTTP {0})")]
    Status(u16),
    #[error("Unexpected analysis response: {0}")]
    Contract(String),
    #[error("Could not read {path}: {message}")]
    Io { path: String, message: String },
}

impl AnalysisError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Transport(_) => ErrorCode::Transport,
            Self::Status(_) => ErrorCode::Http,
            Self::Contract(_) => ErrorCode::Contract,
            Self::Io { .. } => ErrorCode::Io,
        }
    }
}
