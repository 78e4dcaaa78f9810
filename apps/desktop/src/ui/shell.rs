//! Per-state surfaces of the workflow shell.

use crate::controller::reducer::WorkflowState;

use super::dashboard::render_result;

pub const TITLE: &str = "Radimal Insights | Demo MVP v1.0";
const HEADLINE: &str = "AI Radiology Analysis";
const TAGLINE: &str =
    "Upload DICOM files to get instant structured reports validated by our Guardrails system.";
const PROCESSING: &str = "⟳ Processing medical image and generating report...";
const RESET_HINT: &str = "← Load another study (type `reset`)";

fn upload_surface(dragging: bool) -> String {
    let prompt = if dragging {
        "» Release to upload your DICOM file «"
    } else {
        "Drag and drop your DICOM file here"
    };
    format!(
        "{HEADLINE}\n{TAGLINE}\n\n  {prompt}\n  [ Select File ]  upload <path> | drop <path>\n"
    )
}

/// Renders what the shell shows for `state`.
///
/// The upload surface is present only in `Idle` and `Error`; `Loading` shows
/// progress alone and `Success` shows the dashboard alone.
pub fn render_workflow(state: &WorkflowState, dragging: bool) -> String {
    match state {
        WorkflowState::Idle => upload_surface(dragging),
        WorkflowState::Loading => format!("{PROCESSING}\n"),
        WorkflowState::Error(message) => {
            format!("{}\nError: {message}\n", upload_surface(dragging))
        }
        WorkflowState::Success(result) => {
            let dashboard = render_result(Some(result)).unwrap_or_default();
            format!("{RESET_HINT}\n\n{dashboard}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::domain::{AnalysisResult, ReviewStatus, StudyMetadata, StudyReport};

    fn result() -> AnalysisResult {
        AnalysisResult {
            metadata: StudyMetadata {
                modality: "MR".into(),
                body_part_examined: "KNEE".into(),
                extra: Default::default(),
            },
            report: StudyReport {
                findings: "Intact cruciate ligaments.".into(),
                impression: "No internal derangement.".into(),
                recommendations: "Clinical correlation.".into(),
            },
            image: "https://pacs.example/knee.jpg".into(),
            status: ReviewStatus::Validated,
        }
    }

    #[test]
    fn idle_shows_upload_surface() {
        let text = render_workflow(&WorkflowState::Idle, false);
        assert!(text.contains("Drag and drop your DICOM file here"));
        assert!(text.contains("Select File"));
        assert!(!text.contains("Error:"));
    }

    #[test]
    fn dragging_only_changes_the_prompt() {
        let text = render_workflow(&WorkflowState::Idle, true);
        assert!(text.contains("Release to upload"));
        assert!(text.contains("Select File"));
    }

    #[test]
    fn loading_suppresses_upload_surface() {
        let text = render_workflow(&WorkflowState::Loading, false);
        assert!(text.contains("Processing medical image"));
        assert!(!text.contains("Select File"));
    }

    #[test]
    fn error_shows_surface_and_banner() {
        let state = WorkflowState::Error("Error analyzing the file (HTTP 500)".into());
        let text = render_workflow(&state, false);
        assert!(text.contains("Select File"));
        assert!(text.contains("Error: Error analyzing the file (HTTP 500)"));
        assert!(!text.contains("Processing medical image"));
    }

    #[test]
    fn success_shows_dashboard_exclusively() {
        let text = render_workflow(&WorkflowState::Success(result()), false);
        assert!(text.contains("Load another study"));
        assert!(text.contains("Intact cruciate ligaments."));
        assert!(!text.contains("Select File"));
        assert!(!text.contains("Processing medical image"));
    }
}
