use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};

use crate::labels::{normalize_label, LabelField};

/// Timestamp layout used by the chat export (`31.12.2024 14:05:09`)
pub const TIMESTAMP_FORMAT: &str = "%d.%m.%Y %H:%M:%S";

/// Who wrote a message
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    Customer,
    /// Also used when a message names no sender
    #[default]
    Bot,
}

impl Speaker {
    /// Anything that is not the customer is treated as the bot side.
    pub fn from_label(raw: &str) -> Self {
        match normalize_label(raw).as_str() {
            "müşteri" | "customer" | "user" => Speaker::Customer,
            _ => Speaker::Bot,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Speaker::Customer => "Customer",
            Speaker::Bot => "Bot",
        }
    }
}

impl<'de> Deserialize<'de> for Speaker {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Speaker::from_label(&raw))
    }
}

/// One message in a chat
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(alias = "speaker", default)]
    pub sender: Speaker,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Human-assigned labels carried by a transcript.
///
/// Values are kept as raw strings; they are compared under normalization and
/// never parsed into the closed vocabularies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundTruth {
    #[serde(
        rename = "yanit_durumu",
        alias = "yanıt_durumu",
        alias = "resolution",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub resolution: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<String>,

    #[serde(
        rename = "tur",
        alias = "tür",
        alias = "chat_type",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub chat_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<String>,

    #[serde(
        rename = "intent_detay",
        alias = "intent_detail",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub intent_detail: Option<String>,
}

impl GroundTruth {
    /// Label for one of the comparable fields
    pub fn get(&self, field: LabelField) -> Option<&str> {
        let value = match field {
            LabelField::Resolution => &self.resolution,
            LabelField::Sentiment => &self.sentiment,
            LabelField::ChatType => &self.chat_type,
            LabelField::Intent => &self.intent,
        };
        value.as_deref()
    }

    /// True when no label carries any non-blank text
    pub fn is_empty(&self) -> bool {
        [
            &self.resolution,
            &self.sentiment,
            &self.chat_type,
            &self.intent,
            &self.intent_detail,
        ]
        .iter()
        .all(|v| v.as_deref().map_or(true, |s| s.trim().is_empty()))
    }
}

/// Ground truth for one chat, as an independent list entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundTruthRecord {
    #[serde(
        rename = "sohbet_id",
        alias = "chat_id",
        alias = "id",
        deserialize_with = "chat_id_from_json"
    )]
    pub chat_id: String,

    #[serde(flatten)]
    pub labels: GroundTruth,
}

/// One customer-support chat session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    #[serde(
        rename = "sohbet_id",
        alias = "chat_id",
        alias = "id",
        deserialize_with = "chat_id_from_json"
    )]
    pub chat_id: String,

    #[serde(rename = "tarih_saat", alias = "started_at", default)]
    pub started_at: Option<String>,

    #[serde(rename = "mesajlar", alias = "messages", default)]
    pub messages: Vec<Message>,

    #[serde(flatten)]
    pub ground_truth: GroundTruth,
}

impl Transcript {
    /// Timestamp of the last message, taken as the end of the chat
    pub fn ended_at(&self) -> Option<&str> {
        self.messages.last().and_then(|m| m.timestamp.as_deref())
    }

    /// Seconds between the chat start and its last message.
    ///
    /// Missing or unparseable timestamps yield 0, as does a last message that
    /// predates the start.
    pub fn duration_secs(&self) -> i64 {
        let (Some(start), Some(end)) = (self.started_at.as_deref(), self.ended_at()) else {
            return 0;
        };

        match (parse_timestamp(start), parse_timestamp(end)) {
            (Some(start), Some(end)) => (end - start).num_seconds().max(0),
            _ => {
                tracing::debug!(chat_id = %self.chat_id, start, end, "unparseable_timestamps");
                0
            }
        }
    }

    /// Conversation rendered one `Speaker: text` line per message
    pub fn render_text(&self) -> String {
        self.messages
            .iter()
            .map(|m| format!("{}: {}\n", m.sender.display_name(), m.text))
            .collect()
    }

    /// Ground truth as an independent list entry, when the transcript has any
    pub fn ground_truth_record(&self) -> Option<GroundTruthRecord> {
        if self.ground_truth.is_empty() {
            return None;
        }
        Some(GroundTruthRecord {
            chat_id: self.chat_id.clone(),
            labels: self.ground_truth.clone(),
        })
    }
}

/// Parse a timestamp in the chat export layout
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw.trim(), TIMESTAMP_FORMAT).ok()
}

/// Format a duration in seconds as `X min Y sec`
pub fn format_duration(secs: i64) -> String {
    let secs = secs.max(0);
    format!("{} min {} sec", secs / 60, secs % 60)
}

/// Chat identifiers show up as strings or bare numbers in exports.
fn chat_id_from_json<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "chat id must be a string or number, got {}",
            other
        ))),
    }
}
