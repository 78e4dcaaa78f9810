use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Wire value the analysis service uses to flag a report for a radiologist.
pub const NEEDS_HUMAN_REVIEW: &str = "needs_human_review";
const VALIDATED: &str = "validated";

/// Guardrail verdict attached to an analysis.
///
/// Only the exact string `needs_human_review` maps to [`ReviewStatus::NeedsHumanReview`];
/// anything else on the wire (absent, `null`, empty, unknown tags, non-strings)
/// decodes to [`ReviewStatus::Validated`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ReviewStatus {
    NeedsHumanReview,
    #[default]
    Validated,
}

impl ReviewStatus {
    pub fn from_wire(value: Option<&str>) -> Self {
        match value {
            Some(NEEDS_HUMAN_REVIEW) => Self::NeedsHumanReview,
            _ => Self::Validated,
        }
    }

    pub fn as_wire(self) -> &'static str {
        match self {
            Self::NeedsHumanReview => NEEDS_HUMAN_REVIEW,
            Self::Validated => VALIDATED,
        }
    }

    pub fn needs_review(self) -> bool {
        self == Self::NeedsHumanReview
    }
}

impl Serialize for ReviewStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_wire())
    }
}

impl<'de> Deserialize<'de> for ReviewStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<Value>::deserialize(deserializer)?;
        Ok(Self::from_wire(raw.as_ref().and_then(Value::as_str)))
    }
}

/// Acquisition attributes extracted from the uploaded study.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyMetadata {
    #[serde(rename = "Modality")]
    pub modality: String,
    #[serde(rename = "BodyPartExamined")]
    pub body_part_examined: String,
    /// Remaining attributes (`StudyDate`, `PatientID`, ...) kept as sent.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StudyReport {
    pub findings: String,
    pub impression: String,
    pub recommendations: String,
}

/// Payload returned by the analysis endpoint for one submitted study.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub metadata: StudyMetadata,
    pub report: StudyReport,
    /// Display source for the rendered scan, usually a `data:image/jpeg;base64,...` URL.
    pub image: String,
    #[serde(default)]
    pub status: ReviewStatus,
}
