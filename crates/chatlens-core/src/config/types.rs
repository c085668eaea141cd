//! Configuration type definitions

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::classifier::{
    DEFAULT_API_BASE, DEFAULT_MAX_COMPLETION_TOKENS, DEFAULT_MAX_PROMPT_CHARS,
    DEFAULT_TIMEOUT_SECONDS,
};

/// Top-level chatlens configuration (`chatlens.toml`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatlensConfig {
    #[serde(default)]
    pub input: InputConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub classifier: ClassifierConfig,

    #[serde(default)]
    pub batch: BatchConfig,

    #[serde(default)]
    pub report: ReportConfig,
}

/// Where transcripts and ground truth come from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputConfig {
    /// Transcript export (JSON array)
    #[serde(default = "default_transcripts")]
    pub transcripts: PathBuf,

    /// Separate ground-truth list; labels embedded in the transcripts are
    /// used when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ground_truth: Option<PathBuf>,
}

/// Output file locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_spreadsheet")]
    pub spreadsheet: PathBuf,

    #[serde(default = "default_swot")]
    pub swot: PathBuf,

    #[serde(default = "default_recommendations")]
    pub recommendations: PathBuf,

    #[serde(default = "default_demand_summary")]
    pub demand_summary: PathBuf,

    #[serde(default = "default_accuracy_report")]
    pub accuracy_report: PathBuf,

    /// Analyzed record set, reusable by `chatlens report`
    #[serde(default = "default_records")]
    pub records: PathBuf,
}

/// Classifier service settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_system_prompt_path")]
    pub system_prompt_path: PathBuf,

    #[serde(default = "default_max_prompt_chars")]
    pub max_prompt_chars: usize,

    #[serde(default = "default_max_completion_tokens")]
    pub max_completion_tokens: u32,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Rate limiting between classifier calls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Pause length in milliseconds; 0 disables pausing
    #[serde(default = "default_pause_ms")]
    pub pause_ms: u64,

    /// Pause after every N processed transcripts
    #[serde(default = "default_pause_every")]
    pub pause_every: usize,
}

/// Report header settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Name of the support system whose chats are analyzed
    #[serde(default = "default_analyzed_system")]
    pub analyzed_system: String,

    /// Label printed as the analysis model; the classifier model when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_model: Option<String>,
}

fn default_transcripts() -> PathBuf {
    PathBuf::from("data/chats.json")
}

fn default_spreadsheet() -> PathBuf {
    PathBuf::from("outputs/chat_analysis.xlsx")
}

fn default_swot() -> PathBuf {
    PathBuf::from("outputs/swot_analysis.txt")
}

fn default_recommendations() -> PathBuf {
    PathBuf::from("outputs/recommendations.txt")
}

fn default_demand_summary() -> PathBuf {
    PathBuf::from("outputs/demand_summary.txt")
}

fn default_accuracy_report() -> PathBuf {
    PathBuf::from("outputs/accuracy_report.txt")
}

fn default_records() -> PathBuf {
    PathBuf::from("outputs/records.json")
}

fn default_model() -> String {
    "gpt-5-nano".to_string()
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_system_prompt_path() -> PathBuf {
    PathBuf::from("prompts/system_prompt.txt")
}

fn default_max_prompt_chars() -> usize {
    DEFAULT_MAX_PROMPT_CHARS
}

fn default_max_completion_tokens() -> u32 {
    DEFAULT_MAX_COMPLETION_TOKENS
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

fn default_pause_ms() -> u64 {
    500
}

fn default_pause_every() -> usize {
    3
}

fn default_analyzed_system() -> String {
    "Mila".to_string()
}

impl Default for InputConfig {
    fn default() -> Self {
        InputConfig {
            transcripts: default_transcripts(),
            ground_truth: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            spreadsheet: default_spreadsheet(),
            swot: default_swot(),
            recommendations: default_recommendations(),
            demand_summary: default_demand_summary(),
            accuracy_report: default_accuracy_report(),
            records: default_records(),
        }
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        ClassifierConfig {
            model: default_model(),
            api_base: default_api_base(),
            api_key_env: default_api_key_env(),
            system_prompt_path: default_system_prompt_path(),
            max_prompt_chars: default_max_prompt_chars(),
            max_completion_tokens: default_max_completion_tokens(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        BatchConfig {
            pause_ms: default_pause_ms(),
            pause_every: default_pause_every(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        ReportConfig {
            analyzed_system: default_analyzed_system(),
            analysis_model: None,
        }
    }
}
