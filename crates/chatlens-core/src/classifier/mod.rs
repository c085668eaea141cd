//! Classifier gateway: prompt assembly, the service boundary and the
//! fallback policy.

mod echo;
mod gateway;
mod openai;
mod prompt;
mod types;

pub use echo::EchoBackend;
pub use gateway::{ClassifierBackend, ClassifierGateway, Classify};
pub use openai::{
    extract_content, response_schema, OpenAiBackend, DEFAULT_API_BASE,
    DEFAULT_MAX_COMPLETION_TOKENS, DEFAULT_TIMEOUT_SECONDS,
};
pub use prompt::{
    build_user_prompt, load_system_prompt, truncate_prompt, DEFAULT_MAX_PROMPT_CHARS,
    DEFAULT_SYSTEM_PROMPT, TRUNCATION_MARKER,
};
pub use types::{
    Classification, ClassificationRequest, ClassificationResult, ClassifierError,
    RawClassification, FALLBACK_DETAIL, MAX_DETAIL_CHARS,
};
