//! Run configuration for chatlens
//!
//! Looked up in order: an explicit `--config` path, `./chatlens.toml`, then
//! `chatlens/config.toml` under the user config directory
//! (`CHATLENS_CONFIG_DIR` overrides the directory). Defaults apply when no
//! file exists. Environment overrides are applied on top.

pub mod types;

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ChatlensError, Result};

pub use types::{
    BatchConfig, ChatlensConfig, ClassifierConfig, InputConfig, OutputConfig, ReportConfig,
};

const LOCAL_CONFIG_FILE: &str = "chatlens.toml";
const CONFIG_DIR: &str = "chatlens";
const CONFIG_FILE: &str = "config.toml";
const CONFIG_DIR_ENV_VAR: &str = "CHATLENS_CONFIG_DIR";

/// Longest pause accepted from the environment, in milliseconds
const MAX_ENV_PAUSE_MS: u64 = 60_000;

impl ChatlensConfig {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ChatlensError::InputNotFound {
                path: path.to_path_buf(),
            },
            _ => ChatlensError::io_operation("read config", path.display(), e),
        })?;
        let config: ChatlensConfig = toml::from_str(&content)?;
        tracing::debug!(path = %path.display(), "config_loaded");
        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ChatlensError::Other(format!("failed to serialize config: {}", e)))?;
        fs::write(path, content)
            .map_err(|e| ChatlensError::io_operation("write config", path.display(), e))
    }

    /// Find and load the configuration, falling back to defaults.
    ///
    /// An explicit path must exist; the discovered locations are optional.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.is_file() {
            return Self::load(&local);
        }

        if let Some(global) = global_config_path() {
            if global.is_file() {
                return Self::load(&global);
            }
        }

        tracing::debug!("no config file found, using defaults");
        Ok(Self::default())
    }

    /// Apply overrides from the process environment
    pub fn apply_env(&mut self) {
        self.apply_env_from(|name| std::env::var(name).ok());
    }

    /// Apply overrides from an arbitrary variable lookup.
    ///
    /// Empty values are ignored. Unparseable pause values are ignored and
    /// parseable ones are clamped to a minute.
    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(model) = get("MODEL_NAME") {
            self.classifier.model = model;
        }

        if let Some(api_base) = get("CHATLENS_API_BASE") {
            self.classifier.api_base = api_base;
        }

        if let Some(pause) = get("CHATLENS_PAUSE_MS") {
            if let Ok(ms) = pause.trim().parse::<u64>() {
                self.batch.pause_ms = ms.clamp(0, MAX_ENV_PAUSE_MS);
            }
        }
    }

    /// Reject values no run could use
    pub fn validate(&self) -> Result<()> {
        if self.classifier.model.trim().is_empty() {
            return Err(ChatlensError::UsageError(
                "classifier.model must not be empty".to_string(),
            ));
        }

        let must_be_positive = [
            ("classifier.max_prompt_chars", self.classifier.max_prompt_chars as u64),
            (
                "classifier.max_completion_tokens",
                u64::from(self.classifier.max_completion_tokens),
            ),
            ("classifier.timeout_secs", self.classifier.timeout_secs),
            ("batch.pause_every", self.batch.pause_every as u64),
        ];
        match must_be_positive.iter().find(|(_, value)| *value == 0) {
            Some((key, value)) => Err(ChatlensError::invalid_value(key, value)),
            None => Ok(()),
        }
    }

    /// Label printed as the analysis model in report headers: the configured
    /// label, else the model that produced the records
    pub fn analysis_model<'a>(&'a self, run_model: &'a str) -> &'a str {
        self.report.analysis_model.as_deref().unwrap_or(run_model)
    }
}

fn global_config_path() -> Option<PathBuf> {
    let config_dir = match std::env::var(CONFIG_DIR_ENV_VAR) {
        Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => dirs::config_dir()?.join(CONFIG_DIR),
    };
    Some(config_dir.join(CONFIG_FILE))
}
