//! Workflow events and transition errors.

use shared::{domain::AnalysisResult, protocol::UploadEvent};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowEvent {
    UploadStarted,
    UploadSucceeded(AnalysisResult),
    UploadFailed(String),
    Reset,
}

impl WorkflowEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::UploadStarted => "upload_started",
            Self::UploadSucceeded(_) => "upload_succeeded",
            Self::UploadFailed(_) => "upload_failed",
            Self::Reset => "reset",
        }
    }
}

impl From<UploadEvent> for WorkflowEvent {
    fn from(event: UploadEvent) -> Self {
        match event {
            UploadEvent::Started => Self::UploadStarted,
            UploadEvent::Succeeded(result) => Self::UploadSucceeded(result),
            UploadEvent::Failed(message) => Self::UploadFailed(message),
        }
    }
}

/// A workflow event that is not allowed in the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("an analysis is already in progress")]
    UploadInFlight,
    #[error("a result is on screen; load another study first")]
    ResultShown,
    #[error("no analysis is in progress")]
    NoUploadInFlight,
    #[error("nothing to reset")]
    NothingToReset,
}
