use std::collections::HashMap;

use crate::labels::LabelField;
use crate::transcript::{GroundTruth, Transcript};

use super::gateway::ClassifierBackend;
use super::types::{ClassificationRequest, ClassificationResult, ClassifierError, RawClassification};

/// Offline backend: answers with the labels already attached to each
/// transcript. Used for dry runs without network access.
#[derive(Debug, Default)]
pub struct EchoBackend {
    labels: HashMap<String, GroundTruth>,
}

impl EchoBackend {
    pub fn from_transcripts(transcripts: &[Transcript]) -> Self {
        let mut labels = HashMap::new();
        for transcript in transcripts {
            labels
                .entry(transcript.chat_id.clone())
                .or_insert_with(|| transcript.ground_truth.clone());
        }
        Self { labels }
    }
}

impl ClassifierBackend for EchoBackend {
    fn name(&self) -> &str {
        "echo"
    }

    fn complete(
        &self,
        request: &ClassificationRequest,
    ) -> Result<ClassificationResult, ClassifierError> {
        let truth = self
            .labels
            .get(&request.chat_id)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ClassifierError::NoLabels(request.chat_id.clone()))?;

        let field = |f: LabelField| truth.get(f).unwrap_or_default().to_string();
        let raw = RawClassification {
            resolution: field(LabelField::Resolution),
            sentiment: field(LabelField::Sentiment),
            chat_type: field(LabelField::ChatType),
            intent: field(LabelField::Intent),
            intent_detail: truth.intent_detail.clone().unwrap_or_default(),
        };
        Ok(raw.into_result()?)
    }
}
