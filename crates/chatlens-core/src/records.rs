//! Analyzed records: one per transcript, the unit every report consumes.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::classifier::{Classification, ClassificationResult};
use crate::error::{ChatlensError, Result};
use crate::labels::LabelField;
use crate::transcript::{format_duration, GroundTruth, GroundTruthRecord, Transcript};

/// Transcript metadata, classifier labels and ground truth side by side
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzedRecord {
    pub chat_id: String,
    #[serde(default)]
    pub started_at: Option<String>,
    #[serde(default)]
    pub ended_at: Option<String>,
    #[serde(default)]
    pub duration_secs: i64,

    #[serde(flatten)]
    pub classification: ClassificationResult,

    /// Labels are the fallback, not a real classification
    #[serde(default)]
    pub degraded: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ground_truth_resolution: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ground_truth_sentiment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ground_truth_chat_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ground_truth_intent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ground_truth_intent_detail: Option<String>,
}

impl AnalyzedRecord {
    /// Combine a transcript with the classification it received
    pub fn merge(transcript: &Transcript, classification: Classification) -> Self {
        let mut record = Self {
            chat_id: transcript.chat_id.clone(),
            started_at: transcript.started_at.clone(),
            ended_at: transcript.ended_at().map(str::to_string),
            duration_secs: transcript.duration_secs(),
            classification: classification.result,
            degraded: classification.degraded,
            ground_truth_resolution: None,
            ground_truth_sentiment: None,
            ground_truth_chat_type: None,
            ground_truth_intent: None,
            ground_truth_intent_detail: None,
        };
        record.set_ground_truth(&transcript.ground_truth);
        record
    }

    /// Replace the embedded ground truth
    pub fn set_ground_truth(&mut self, truth: &GroundTruth) {
        self.ground_truth_resolution = truth.resolution.clone();
        self.ground_truth_sentiment = truth.sentiment.clone();
        self.ground_truth_chat_type = truth.chat_type.clone();
        self.ground_truth_intent = truth.intent.clone();
        self.ground_truth_intent_detail = truth.intent_detail.clone();
    }

    pub fn predicted(&self, field: LabelField) -> &'static str {
        self.classification.label(field)
    }

    pub fn ground_truth(&self, field: LabelField) -> Option<&str> {
        let value = match field {
            LabelField::Resolution => &self.ground_truth_resolution,
            LabelField::Sentiment => &self.ground_truth_sentiment,
            LabelField::ChatType => &self.ground_truth_chat_type,
            LabelField::Intent => &self.ground_truth_intent,
        };
        value.as_deref()
    }

    /// Embedded ground truth as an independent list entry
    pub fn ground_truth_record(&self) -> Option<GroundTruthRecord> {
        let labels = GroundTruth {
            resolution: self.ground_truth_resolution.clone(),
            sentiment: self.ground_truth_sentiment.clone(),
            chat_type: self.ground_truth_chat_type.clone(),
            intent: self.ground_truth_intent.clone(),
            intent_detail: self.ground_truth_intent_detail.clone(),
        };
        if labels.is_empty() {
            return None;
        }
        Some(GroundTruthRecord {
            chat_id: self.chat_id.clone(),
            labels,
        })
    }

    pub fn duration_display(&self) -> String {
        format_duration(self.duration_secs)
    }
}

/// Ground-truth list built from the labels embedded in the records
pub fn embedded_ground_truth(records: &[AnalyzedRecord]) -> Vec<GroundTruthRecord> {
    records
        .iter()
        .filter_map(AnalyzedRecord::ground_truth_record)
        .collect()
}

/// Embed a separately loaded ground-truth list into the records by chat id.
///
/// Matching follows accuracy scoring: the first entry for an id wins, and a
/// record with no entry loses whatever truth it carried.
pub fn attach_ground_truth(records: &mut [AnalyzedRecord], ground_truth: &[GroundTruthRecord]) {
    let mut index: HashMap<&str, &GroundTruth> = HashMap::new();
    for entry in ground_truth {
        index.entry(entry.chat_id.as_str()).or_insert(&entry.labels);
    }

    let empty = GroundTruth::default();
    let mut matched = 0usize;
    for record in records.iter_mut() {
        let truth = match index.get(record.chat_id.as_str()) {
            Some(truth) => {
                matched += 1;
                *truth
            }
            None => &empty,
        };
        record.set_ground_truth(truth);
    }
    tracing::debug!(records = records.len(), matched, "ground_truth_attached");
}

/// A saved run: the records plus when and with what they were produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordSet {
    pub run_id: String,
    pub generated_at: DateTime<Utc>,
    pub model: String,
    pub records: Vec<AnalyzedRecord>,
}

impl RecordSet {
    pub fn new(model: impl Into<String>, records: Vec<AnalyzedRecord>) -> Self {
        let generated_at = Utc::now();
        Self {
            run_id: generated_at.format("run-%Y%m%d-%H%M%S-%3f").to_string(),
            generated_at,
            model: model.into(),
            records,
        }
    }
}

/// Write a record set as pretty JSON, creating parent directories
pub fn save_records(path: &Path, set: &RecordSet) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| ChatlensError::io_operation("create directory", parent.display(), e))?;
    }
    let json = serde_json::to_string_pretty(set)?;
    fs::write(path, json).map_err(|e| ChatlensError::io_operation("write", path.display(), e))?;
    tracing::debug!(path = %path.display(), records = set.records.len(), "records_saved");
    Ok(())
}

/// Read a record set saved by [`save_records`]
pub fn load_records(path: &Path) -> Result<RecordSet> {
    let content = fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ChatlensError::InputNotFound {
            path: path.to_path_buf(),
        },
        _ => ChatlensError::io_operation("read", path.display(), e),
    })?;
    serde_json::from_str(&content).map_err(|e| ChatlensError::invalid_input(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labels::{ChatType, Intent, Resolution, Sentiment};
    use crate::transcript::{Message, Speaker};

    fn transcript() -> Transcript {
        Transcript {
            chat_id: "C-7".to_string(),
            started_at: Some("02.03.2025 09:00:00".to_string()),
            messages: vec![
                Message {
                    sender: Speaker::Customer,
                    text: "Şifremi unuttum".to_string(),
                    timestamp: Some("02.03.2025 09:00:10".to_string()),
                },
                Message {
                    sender: Speaker::Bot,
                    text: "Sıfırlama bağlantısı gönderdim".to_string(),
                    timestamp: Some("02.03.2025 09:01:15".to_string()),
                },
            ],
            ground_truth: GroundTruth {
                resolution: Some("Çözüldü".to_string()),
                intent: Some("Şifre sıfırlama".to_string()),
                ..Default::default()
            },
        }
    }

    fn classification() -> Classification {
        Classification::classified(ClassificationResult::new(
            Resolution::Resolved,
            Sentiment::Neutral,
            ChatType::Request,
            Intent::PasswordReset,
            "Şifre yenileme",
        ))
    }

    #[test]
    fn test_merge_carries_metadata_and_truth() {
        let record = AnalyzedRecord::merge(&transcript(), classification());

        assert_eq!(record.chat_id, "C-7");
        assert_eq!(record.ended_at.as_deref(), Some("02.03.2025 09:01:15"));
        assert_eq!(record.duration_secs, 75);
        assert_eq!(record.duration_display(), "1 min 15 sec");
        assert!(!record.degraded);
        assert_eq!(record.predicted(LabelField::Intent), "Şifre sıfırlama");
        assert_eq!(record.ground_truth(LabelField::Resolution), Some("Çözüldü"));
        assert_eq!(record.ground_truth(LabelField::Sentiment), None);
    }

    #[test]
    fn test_json_keeps_predicted_and_truth_apart() {
        let record = AnalyzedRecord::merge(&transcript(), classification());
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["resolution"], "Çözüldü");
        assert_eq!(json["intent"], "Şifre sıfırlama");
        assert_eq!(json["ground_truth_intent"], "Şifre sıfırlama");
        assert!(json.get("ground_truth_sentiment").is_none());
    }

    #[test]
    fn test_embedded_ground_truth() {
        let mut unlabeled = transcript();
        unlabeled.chat_id = "C-8".to_string();
        unlabeled.ground_truth = GroundTruth::default();
        let records = vec![
            AnalyzedRecord::merge(&transcript(), classification()),
            AnalyzedRecord::merge(&unlabeled, Classification::fallback()),
        ];

        let truth = embedded_ground_truth(&records);
        assert_eq!(truth.len(), 1);
        assert_eq!(truth[0].chat_id, "C-7");
    }

    #[test]
    fn test_attach_ground_truth_by_chat_id() {
        let mut other = transcript();
        other.chat_id = "C-8".to_string();
        let mut records = vec![
            AnalyzedRecord::merge(&transcript(), classification()),
            AnalyzedRecord::merge(&other, classification()),
        ];
        let separate = |resolution: &str| GroundTruthRecord {
            chat_id: "C-7".to_string(),
            labels: GroundTruth {
                resolution: Some(resolution.to_string()),
                sentiment: Some("Nötr".to_string()),
                ..Default::default()
            },
        };

        attach_ground_truth(&mut records, &[separate("Çözülemedi"), separate("Çözüldü")]);

        assert_eq!(records[0].ground_truth(LabelField::Resolution), Some("Çözülemedi"));
        assert_eq!(records[0].ground_truth(LabelField::Sentiment), Some("Nötr"));
        assert_eq!(records[0].ground_truth(LabelField::Intent), None);
        assert!(records[1].ground_truth_record().is_none());
        assert_eq!(embedded_ground_truth(&records).len(), 1);
    }

    #[test]
    fn test_save_and_load_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("records.json");
        let set = RecordSet::new(
            "gpt-5-nano",
            vec![AnalyzedRecord::merge(&transcript(), classification())],
        );

        save_records(&path, &set).unwrap();
        let loaded = load_records(&path).unwrap();
        assert_eq!(loaded, set);
        assert!(loaded.run_id.starts_with("run-"));
    }

    #[test]
    fn test_load_missing_records() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_records(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ChatlensError::InputNotFound { .. }));
    }
}
