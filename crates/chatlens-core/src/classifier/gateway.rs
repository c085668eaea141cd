use crate::transcript::Transcript;

use super::prompt::{build_user_prompt, truncate_prompt, DEFAULT_MAX_PROMPT_CHARS};
use super::types::{Classification, ClassificationRequest, ClassificationResult, ClassifierError};

/// The external classification service boundary
pub trait ClassifierBackend {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Label one transcript. Any failure is reported, never papered over.
    fn complete(
        &self,
        request: &ClassificationRequest,
    ) -> Result<ClassificationResult, ClassifierError>;
}

impl<B: ClassifierBackend + ?Sized> ClassifierBackend for Box<B> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn complete(
        &self,
        request: &ClassificationRequest,
    ) -> Result<ClassificationResult, ClassifierError> {
        (**self).complete(request)
    }
}

/// Capability the batch runner depends on: one transcript in, one
/// classification out, no errors.
pub trait Classify {
    fn classify(&self, transcript: &Transcript) -> Classification;
}

/// Wraps a backend with prompt assembly and the fallback policy
pub struct ClassifierGateway<B> {
    backend: B,
    system_prompt: String,
    max_prompt_chars: usize,
}

impl<B: ClassifierBackend> ClassifierGateway<B> {
    pub fn new(backend: B, system_prompt: impl Into<String>) -> Self {
        Self {
            backend,
            system_prompt: system_prompt.into(),
            max_prompt_chars: DEFAULT_MAX_PROMPT_CHARS,
        }
    }

    pub fn with_max_prompt_chars(mut self, max_chars: usize) -> Self {
        self.max_prompt_chars = max_chars;
        self
    }

    /// Request sent to the backend for a transcript
    pub fn request_for(&self, transcript: &Transcript) -> ClassificationRequest {
        ClassificationRequest {
            chat_id: transcript.chat_id.clone(),
            system_prompt: self.system_prompt.clone(),
            transcript_text: truncate_prompt(
                &build_user_prompt(transcript),
                self.max_prompt_chars,
            ),
        }
    }
}

impl<B: ClassifierBackend> Classify for ClassifierGateway<B> {
    fn classify(&self, transcript: &Transcript) -> Classification {
        let request = self.request_for(transcript);
        match self.backend.complete(&request) {
            Ok(result) => Classification::classified(result),
            Err(e) => {
                tracing::warn!(
                    chat_id = %transcript.chat_id,
                    backend = self.backend.name(),
                    error = %e,
                    "classification failed, using fallback"
                );
                Classification::fallback()
            }
        }
    }
}
