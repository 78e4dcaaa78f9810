use std::{path::Path, time::Duration};

use async_trait::async_trait;
use reqwest::{multipart, Client};
use shared::{domain::AnalysisResult, error::AnalysisError, protocol::UploadEvent};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

mod drop_target;
pub use drop_target::DropTarget;

pub const DEFAULT_ANALYSIS_ENDPOINT: &str = "http://localhost:8000/analyze";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);
/// Multipart field the analysis endpoint reads the study from.
const UPLOAD_FIELD: &str = "file";
const DICOM_MIME_TYPE: &str = "application/dicom";
const FALLBACK_FILENAME: &str = "study.dcm";

fn guess_mime_type(filename: &str) -> String {
    let path = Path::new(filename);
    let is_dicom = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("dcm") || ext.eq_ignore_ascii_case("dicom"));
    if is_dicom {
        return DICOM_MIME_TYPE.to_string();
    }
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

fn classify_reqwest_error(err: reqwest::Error) -> AnalysisError {
    if let Some(status) = err.status() {
        AnalysisError::Status(status.as_u16())
    } else if err.is_timeout() {
        AnalysisError::Transport("request timed out".to_string())
    } else if err.is_connect() {
        AnalysisError::Transport(format!("failed to connect to analysis service: {err}"))
    } else {
        AnalysisError::Transport(err.to_string())
    }
}

/// Decodes a success body into an [`AnalysisResult`].
///
/// Any shape mismatch (missing `report`, missing report sections, non-JSON)
/// is a contract failure; partial results are never produced.
pub fn decode_result(body: &[u8]) -> Result<AnalysisResult, AnalysisError> {
    serde_json::from_slice(body).map_err(|e| AnalysisError::Contract(e.to_string()))
}

/// A single study queued for analysis. Consumed by the submission that sends it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    filename: String,
    mime_type: String,
    bytes: Vec<u8>,
}

impl AnalysisRequest {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        let filename = filename.into();
        let mime_type = guess_mime_type(&filename);
        Self {
            filename,
            mime_type,
            bytes,
        }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = mime_type.into();
        self
    }

    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, AnalysisError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await.map_err(|e| AnalysisError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| FALLBACK_FILENAME.to_string());
        Ok(Self::new(filename, bytes))
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    fn into_form(self) -> Result<multipart::Form, AnalysisError> {
        let part = multipart::Part::bytes(self.bytes)
            .file_name(self.filename)
            .mime_str(&self.mime_type)
            .map_err(|e| AnalysisError::Transport(format!("invalid upload mime type: {e}")))?;
        Ok(multipart::Form::new().part(UPLOAD_FIELD, part))
    }
}

/// Remote side of the analysis exchange.
#[async_trait]
pub trait AnalysisService: Send + Sync {
    async fn analyze(&self, request: AnalysisRequest) -> Result<AnalysisResult, AnalysisError>;
}

/// Posts studies as `multipart/form-data` to a fixed analysis endpoint.
pub struct HttpAnalysisService {
    http: Client,
    endpoint: String,
}

impl HttpAnalysisService {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, AnalysisError> {
        Self::with_timeout(endpoint, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(
        endpoint: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, AnalysisError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AnalysisError::Transport(format!("failed to build http client: {e}")))?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl AnalysisService for HttpAnalysisService {
    async fn analyze(&self, request: AnalysisRequest) -> Result<AnalysisResult, AnalysisError> {
        debug!(
            endpoint = %self.endpoint,
            filename = request.filename(),
            mime_type = request.mime_type(),
            size_bytes = request.len(),
            "posting study for analysis"
        );
        let body = self
            .http
            .post(&self.endpoint)
            .multipart(request.into_form()?)
            .send()
            .await
            .map_err(classify_reqwest_error)?
            .error_for_status()
            .map_err(classify_reqwest_error)?
            .bytes()
            .await
            .map_err(classify_reqwest_error)?;
        decode_result(&body)
    }
}

/// Receives the lifecycle of one submission.
pub trait UploadObserver {
    fn on_upload_start(&mut self);
    fn on_upload_success(&mut self, result: AnalysisResult);
    fn on_upload_error(&mut self, message: String);
}

/// Forwards observer callbacks as [`UploadEvent`]s to a single subscriber.
pub struct EventSink {
    tx: mpsc::UnboundedSender<UploadEvent>,
}

impl EventSink {
    pub fn new(tx: mpsc::UnboundedSender<UploadEvent>) -> Self {
        Self { tx }
    }

    pub fn channel() -> (Self, mpsc::UnboundedReceiver<UploadEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    fn emit(&self, event: UploadEvent) {
        if self.tx.send(event).is_err() {
            debug!("upload event subscriber dropped");
        }
    }
}

impl UploadObserver for EventSink {
    fn on_upload_start(&mut self) {
        self.emit(UploadEvent::Started);
    }

    fn on_upload_success(&mut self, result: AnalysisResult) {
        self.emit(UploadEvent::Succeeded(result));
    }

    fn on_upload_error(&mut self, message: String) {
        self.emit(UploadEvent::Failed(message));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// No file was supplied; no callback fired.
    Ignored,
    Succeeded,
    Failed,
}

/// Sends one study per call and reports its lifecycle. Holds no per-upload state.
pub struct UploadController<S> {
    service: S,
}

impl<S: AnalysisService> UploadController<S> {
    pub fn new(service: S) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Submits `file` for analysis.
    ///
    /// `None` is a no-op. Otherwise `on_upload_start` fires before the request
    /// leaves, followed by exactly one of `on_upload_success`/`on_upload_error`.
    pub async fn submit<O>(&self, file: Option<AnalysisRequest>, observer: &mut O) -> SubmitOutcome
    where
        O: UploadObserver + ?Sized,
    {
        let Some(request) = file else {
            debug!("submit called without a file; ignoring");
            return SubmitOutcome::Ignored;
        };
        observer.on_upload_start();
        self.dispatch(request, observer).await
    }

    /// Like [`UploadController::submit`], reading the study from disk after
    /// `on_upload_start` has fired. Read failures are reported through
    /// `on_upload_error`.
    pub async fn submit_path<O>(&self, path: Option<&Path>, observer: &mut O) -> SubmitOutcome
    where
        O: UploadObserver + ?Sized,
    {
        let Some(path) = path else {
            debug!("submit called without a file; ignoring");
            return SubmitOutcome::Ignored;
        };
        observer.on_upload_start();
        match AnalysisRequest::from_path(path).await {
            Ok(request) => self.dispatch(request, observer).await,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "failed to read study");
                observer.on_upload_error(err.to_string());
                SubmitOutcome::Failed
            }
        }
    }

    async fn dispatch<O>(&self, request: AnalysisRequest, observer: &mut O) -> SubmitOutcome
    where
        O: UploadObserver + ?Sized,
    {
        info!(
            filename = request.filename(),
            size_bytes = request.len(),
            "study upload started"
        );
        match self.service.analyze(request).await {
            Ok(result) => {
                info!(status = result.status.as_wire(), "analysis completed");
                observer.on_upload_success(result);
                SubmitOutcome::Succeeded
            }
            Err(err) => {
                warn!(code = ?err.code(), error = %err, "analysis failed");
                observer.on_upload_error(err.to_string());
                SubmitOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
