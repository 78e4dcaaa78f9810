//! Single-writer holder of the workflow state, driven by upload callbacks and user resets.

use std::path::Path;

use client_core::{AnalysisService, EventSink, SubmitOutcome, UploadController, UploadObserver};
use shared::domain::AnalysisResult;
use tracing::{info, warn};

use super::{
    events::{TransitionError, WorkflowEvent},
    reducer::{transition, WorkflowState},
};

#[derive(Debug, Default)]
pub struct Workflow {
    state: WorkflowState,
}

impl Workflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        self.state.result()
    }

    /// Applies `event`; on rejection the current state is kept and the error returned.
    pub fn apply(&mut self, event: WorkflowEvent) -> Result<&WorkflowState, TransitionError> {
        let event_name = event.name();
        match transition(&self.state, event) {
            Ok(next) => {
                info!(
                    from = self.state.name(),
                    to = next.name(),
                    event = event_name,
                    "workflow transition"
                );
                self.state = next;
                Ok(&self.state)
            }
            Err(err) => {
                warn!(
                    state = self.state.name(),
                    event = event_name,
                    error = %err,
                    "rejected workflow event"
                );
                Err(err)
            }
        }
    }

    /// Returns to idle, discarding any held result or error.
    pub fn reset(&mut self) -> Result<&WorkflowState, TransitionError> {
        self.apply(WorkflowEvent::Reset)
    }

    fn ensure_accepts_upload(&self) -> Result<(), TransitionError> {
        transition(&self.state, WorkflowEvent::UploadStarted).map(|_| ())
    }

    /// Reads the study at `path` and submits it with this workflow as the observer.
    ///
    /// Rejected while an upload is in flight or a result is on screen. The
    /// guard runs before the controller sees the file, so a rejected
    /// submission never reaches the network.
    pub async fn submit_path<S: AnalysisService>(
        &mut self,
        controller: &UploadController<S>,
        path: Option<&Path>,
    ) -> Result<SubmitOutcome, TransitionError> {
        self.ensure_accepts_upload()?;
        Ok(controller.submit_path(path, self).await)
    }

    /// Same as [`Workflow::submit_path`], but consumes the controller's
    /// lifecycle as `UploadEvent`s and calls `on_change` after every
    /// accepted transition, so callers can render `Loading` while the
    /// request is still pending.
    pub async fn submit_path_observed<S, F>(
        &mut self,
        controller: &UploadController<S>,
        path: Option<&Path>,
        mut on_change: F,
    ) -> Result<SubmitOutcome, TransitionError>
    where
        S: AnalysisService,
        F: FnMut(&WorkflowState),
    {
        self.ensure_accepts_upload()?;
        let (sink, mut events) = EventSink::channel();
        let upload = async move {
            let mut sink = sink;
            controller.submit_path(path, &mut sink).await
        };
        let apply = async {
            while let Some(event) = events.recv().await {
                if let Ok(state) = self.apply(WorkflowEvent::from(event)) {
                    on_change(state);
                }
            }
        };
        let (outcome, ()) = tokio::join!(upload, apply);
        Ok(outcome)
    }
}

impl UploadObserver for Workflow {
    fn on_upload_start(&mut self) {
        let _ = self.apply(WorkflowEvent::UploadStarted);
    }

    fn on_upload_success(&mut self, result: AnalysisResult) {
        let _ = self.apply(WorkflowEvent::UploadSucceeded(result));
    }

    fn on_upload_error(&mut self, message: String) {
        let _ = self.apply(WorkflowEvent::UploadFailed(message));
    }
}
