//! OpenAI-compatible chat-completions backend.
//!
//! The request asks for strict JSON-schema output describing the five label
//! fields, so a well-behaved service can only answer with known labels. The
//! reply is still validated against the closed vocabularies.

use std::time::Duration;

use serde_json::{json, Value};

use crate::config::ClassifierConfig;
use crate::labels::{ChatType, Intent, Resolution, Sentiment};

use super::gateway::ClassifierBackend;
use super::types::{ClassificationRequest, ClassificationResult, ClassifierError, RawClassification};

/// Default base URL of the classifier service
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// Default completion bound
pub const DEFAULT_MAX_COMPLETION_TOKENS: u32 = 200;

/// Default request timeout
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 60;

/// Blocking client for `POST {api_base}/chat/completions`
pub struct OpenAiBackend {
    agent: ureq::Agent,
    api_base: String,
    api_key: String,
    model: String,
    max_completion_tokens: u32,
}

impl OpenAiBackend {
    pub fn new(api_base: &str, api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            agent: build_agent(DEFAULT_TIMEOUT_SECONDS),
            api_base: api_base.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
            max_completion_tokens: DEFAULT_MAX_COMPLETION_TOKENS,
        }
    }

    /// Build from configuration, reading the API key from the configured
    /// environment variable.
    pub fn from_config(config: &ClassifierConfig) -> Result<Self, ClassifierError> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ClassifierError::MissingApiKey(config.api_key_env.clone()))?;

        Ok(Self::new(&config.api_base, api_key, &config.model)
            .with_timeout(config.timeout_secs)
            .with_max_completion_tokens(config.max_completion_tokens))
    }

    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.agent = build_agent(seconds);
        self
    }

    pub fn with_max_completion_tokens(mut self, tokens: u32) -> Self {
        self.max_completion_tokens = tokens;
        self
    }

    fn request_body(&self, request: &ClassificationRequest) -> Value {
        json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": request.system_prompt},
                {"role": "user", "content": request.transcript_text},
            ],
            "response_format": {
                "type": "json_schema",
                "json_schema": {
                    "name": "chat_classification",
                    "strict": true,
                    "schema": response_schema(),
                }
            },
            "max_completion_tokens": self.max_completion_tokens,
        })
    }
}

impl ClassifierBackend for OpenAiBackend {
    fn name(&self) -> &str {
        "openai"
    }

    fn complete(
        &self,
        request: &ClassificationRequest,
    ) -> Result<ClassificationResult, ClassifierError> {
        let payload = serde_json::to_string(&self.request_body(request))
            .map_err(|e| ClassifierError::Serialization(e.to_string()))?;

        tracing::debug!(chat_id = %request.chat_id, model = %self.model, "classifier_request");

        let response = self
            .agent
            .post(format!("{}/chat/completions", self.api_base))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .send(payload.as_str());

        let mut response = match response {
            Ok(res) => res,
            Err(ureq::Error::StatusCode(code)) => return Err(ClassifierError::Status(code)),
            Err(e) => return Err(ClassifierError::Network(e.to_string())),
        };

        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| ClassifierError::Network(e.to_string()))?;
        let body: Value =
            serde_json::from_str(&body).map_err(|e| ClassifierError::Schema(e.to_string()))?;

        let content = extract_content(&body)?;
        let raw: RawClassification =
            serde_json::from_str(content).map_err(|e| ClassifierError::Schema(e.to_string()))?;
        Ok(raw.into_result()?)
    }
}

fn build_agent(timeout_seconds: u64) -> ureq::Agent {
    ureq::Agent::config_builder()
        .timeout_global(Some(Duration::from_secs(timeout_seconds)))
        .build()
        .into()
}

/// Pull the assistant message text out of a chat-completions response
pub fn extract_content(body: &Value) -> Result<&str, ClassifierError> {
    let message = body
        .get("choices")
        .and_then(|c| c.as_array())
        .and_then(|arr| arr.first())
        .and_then(|c| c.get("message"))
        .ok_or(ClassifierError::EmptyResponse)?;

    if let Some(refusal) = message.get("refusal").and_then(|r| r.as_str()) {
        return Err(ClassifierError::Refusal(refusal.to_string()));
    }

    message
        .get("content")
        .and_then(|c| c.as_str())
        .filter(|c| !c.trim().is_empty())
        .ok_or(ClassifierError::EmptyResponse)
}

/// JSON schema for the structured output
pub fn response_schema() -> Value {
    let resolutions: Vec<&str> = Resolution::ALL.iter().map(|l| l.as_str()).collect();
    let sentiments: Vec<&str> = Sentiment::ALL.iter().map(|l| l.as_str()).collect();
    let chat_types: Vec<&str> = ChatType::ALL.iter().map(|l| l.as_str()).collect();
    let intents: Vec<&str> = Intent::classifiable().map(|l| l.as_str()).collect();

    json!({
        "type": "object",
        "properties": {
            "resolution": {"type": "string", "enum": resolutions},
            "sentiment": {"type": "string", "enum": sentiments},
            "chat_type": {"type": "string", "enum": chat_types},
            "intent": {"type": "string", "enum": intents},
            "intent_detail": {
                "type": "string",
                "description": "Short free-text description of the intent (max 100 characters)",
            },
        },
        "required": ["resolution", "sentiment", "chat_type", "intent", "intent_detail"],
        "additionalProperties": false,
    })
}
