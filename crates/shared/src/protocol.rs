use serde::{Deserialize, Serialize};

use crate::domain::AnalysisResult;

/// Lifecycle notifications emitted by the upload controller for one submission.
///
/// A started submission produces `Started` followed by exactly one of
/// `Succeeded` or `Failed`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum UploadEvent {
    Started,
    Succeeded(AnalysisResult),
    Failed(String),
}

impl UploadEvent {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Started)
    }
}
