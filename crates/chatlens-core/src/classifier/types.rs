use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::labels::{ChatType, Intent, LabelError, LabelField, Resolution, Sentiment};

/// Intent detail text recorded when classification failed
pub const FALLBACK_DETAIL: &str = "analysis error";

/// Upper bound on intent-detail length, in characters
pub const MAX_DETAIL_CHARS: usize = 100;

/// Labels assigned to one transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub resolution: Resolution,
    pub sentiment: Sentiment,
    pub chat_type: ChatType,
    pub intent: Intent,
    pub intent_detail: String,
}

impl ClassificationResult {
    pub fn new(
        resolution: Resolution,
        sentiment: Sentiment,
        chat_type: ChatType,
        intent: Intent,
        intent_detail: impl Into<String>,
    ) -> Self {
        Self {
            resolution,
            sentiment,
            chat_type,
            intent,
            intent_detail: bounded_detail(intent_detail.into()),
        }
    }

    /// The degraded result substituted whenever classification fails
    pub fn fallback() -> Self {
        Self::new(
            Resolution::Unresolved,
            Sentiment::Neutral,
            ChatType::Problem,
            Intent::Other,
            FALLBACK_DETAIL,
        )
    }

    /// Wire label of one of the comparable fields
    pub fn label(&self, field: LabelField) -> &'static str {
        match field {
            LabelField::Resolution => self.resolution.as_str(),
            LabelField::Sentiment => self.sentiment.as_str(),
            LabelField::ChatType => self.chat_type.as_str(),
            LabelField::Intent => self.intent.as_str(),
        }
    }
}

fn bounded_detail(detail: String) -> String {
    match detail.char_indices().nth(MAX_DETAIL_CHARS) {
        Some((cut, _)) => detail[..cut].to_string(),
        None => detail,
    }
}

/// Labels as they arrive from the service, before vocabulary checks.
///
/// Both the English schema keys and the Turkish export keys are accepted.
#[derive(Debug, Clone, Deserialize)]
pub struct RawClassification {
    #[serde(alias = "yanıt_durumu", alias = "yanit_durumu")]
    pub resolution: String,
    pub sentiment: String,
    #[serde(alias = "tür", alias = "tur")]
    pub chat_type: String,
    pub intent: String,
    #[serde(alias = "intent_detay", default)]
    pub intent_detail: String,
}

impl RawClassification {
    pub fn into_result(self) -> Result<ClassificationResult, LabelError> {
        Ok(ClassificationResult::new(
            self.resolution.parse()?,
            self.sentiment.parse()?,
            self.chat_type.parse()?,
            self.intent.parse()?,
            self.intent_detail.trim(),
        ))
    }
}

/// What the gateway hands back: a result and whether it is the fallback
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub result: ClassificationResult,
    pub degraded: bool,
}

impl Classification {
    pub fn classified(result: ClassificationResult) -> Self {
        Self {
            result,
            degraded: false,
        }
    }

    pub fn fallback() -> Self {
        Self {
            result: ClassificationResult::fallback(),
            degraded: true,
        }
    }
}

/// Request sent across the classifier service boundary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationRequest {
    pub chat_id: String,
    pub system_prompt: String,
    pub transcript_text: String,
}

/// Failures of the external classifier service
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("API key not set (expected in ${0})")]
    MissingApiKey(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("service returned HTTP {0}")]
    Status(u16),

    #[error("empty response")]
    EmptyResponse,

    #[error("model refused: {0}")]
    Refusal(String),

    #[error("response does not match schema: {0}")]
    Schema(String),

    #[error(transparent)]
    Label(#[from] LabelError),

    #[error("no labels on record for chat {0}")]
    NoLabels(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}
