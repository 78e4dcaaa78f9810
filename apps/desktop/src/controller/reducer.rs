//! Upload workflow state machine.

use shared::domain::AnalysisResult;

use super::events::{TransitionError, WorkflowEvent};

#[derive(Debug, Clone, PartialEq, Default)]
pub enum WorkflowState {
    #[default]
    Idle,
    Loading,
    Error(String),
    Success(AnalysisResult),
}

impl WorkflowState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Error(_) => "error",
            Self::Success(_) => "success",
        }
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        match self {
            Self::Success(result) => Some(result),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Error(message) => Some(message),
            _ => None,
        }
    }
}

/// Computes the state that follows `event`. Rejected events leave `state` untouched.
pub fn transition(
    state: &WorkflowState,
    event: WorkflowEvent,
) -> Result<WorkflowState, TransitionError> {
    use WorkflowEvent as E;
    use WorkflowState as S;

    match (state, event) {
        (S::Idle | S::Error(_), E::UploadStarted) => Ok(S::Loading),
        (S::Loading, E::UploadStarted) => Err(TransitionError::UploadInFlight),
        (S::Success(_), E::UploadStarted) => Err(TransitionError::ResultShown),

        (S::Loading, E::UploadSucceeded(result)) => Ok(S::Success(result)),
        (S::Loading, E::UploadFailed(message)) => Ok(S::Error(message)),
        (_, E::UploadSucceeded(_) | E::UploadFailed(_)) => Err(TransitionError::NoUploadInFlight),

        (S::Success(_) | S::Error(_), E::Reset) => Ok(S::Idle),
        (S::Loading, E::Reset) => Err(TransitionError::UploadInFlight),
        (S::Idle, E::Reset) => Err(TransitionError::NothingToReset),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::domain::{ReviewStatus, StudyMetadata, StudyReport};

    fn result() -> AnalysisResult {
        AnalysisResult {
            metadata: StudyMetadata {
                modality: "CT".into(),
                body_part_examined: "CHEST".into(),
                extra: Default::default(),
            },
            report: StudyReport {
                findings: "Clear lungs.".into(),
                impression: "Normal.".into(),
                recommendations: "None.".into(),
            },
            image: "data:image/jpeg;base64,AA==".into(),
            status: ReviewStatus::Validated,
        }
    }

    fn all_events() -> Vec<WorkflowEvent> {
        vec![
            WorkflowEvent::UploadStarted,
            WorkflowEvent::UploadSucceeded(result()),
            WorkflowEvent::UploadFailed("boom".into()),
            WorkflowEvent::Reset,
        ]
    }

    fn reachable_from(state: &WorkflowState) -> Vec<&'static str> {
        all_events()
            .into_iter()
            .filter_map(|event| transition(state, event).ok())
            .map(|next| next.name())
            .collect()
    }

    #[test]
    fn initial_state_is_idle() {
        assert_eq!(WorkflowState::default(), WorkflowState::Idle);
    }

    #[test]
    fn idle_only_reaches_loading() {
        assert_eq!(reachable_from(&WorkflowState::Idle), vec!["loading"]);
    }

    #[test]
    fn loading_only_reaches_success_or_error() {
        assert_eq!(
            reachable_from(&WorkflowState::Loading),
            vec!["success", "error"]
        );
    }

    #[test]
    fn success_only_reaches_idle() {
        assert_eq!(
            reachable_from(&WorkflowState::Success(result())),
            vec!["idle"]
        );
    }

    #[test]
    fn error_reaches_loading_or_idle() {
        assert_eq!(
            reachable_from(&WorkflowState::Error("boom".into())),
            vec!["loading", "idle"]
        );
    }

    #[test]
    fn second_upload_while_loading_is_rejected() {
        assert_eq!(
            transition(&WorkflowState::Loading, WorkflowEvent::UploadStarted),
            Err(TransitionError::UploadInFlight)
        );
        assert_eq!(
            transition(&WorkflowState::Loading, WorkflowEvent::Reset),
            Err(TransitionError::UploadInFlight)
        );
    }

    #[test]
    fn outcomes_outside_loading_are_rejected() {
        assert_eq!(
            transition(&WorkflowState::Idle, WorkflowEvent::UploadSucceeded(result())),
            Err(TransitionError::NoUploadInFlight)
        );
        assert_eq!(
            transition(
                &WorkflowState::Success(result()),
                WorkflowEvent::UploadFailed("late".into())
            ),
            Err(TransitionError::NoUploadInFlight)
        );
    }

    #[test]
    fn success_carries_the_received_result() {
        let next = transition(&WorkflowState::Loading, WorkflowEvent::UploadSucceeded(result()))
            .expect("transition");
        assert_eq!(next.result(), Some(&result()));
        assert_eq!(
            transition(&next, WorkflowEvent::UploadStarted),
            Err(TransitionError::ResultShown)
        );
    }

    #[test]
    fn error_keeps_message_and_accepts_retry() {
        let next = transition(
            &WorkflowState::Loading,
            WorkflowEvent::UploadFailed("HTTP 500".into()),
        )
        .expect("transition");
        assert_eq!(next.error_message(), Some("HTTP 500"));
        assert_eq!(
            transition(&next, WorkflowEvent::UploadStarted),
            Ok(WorkflowState::Loading)
        );
    }
}
