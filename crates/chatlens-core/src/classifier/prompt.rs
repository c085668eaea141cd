//! Prompt assembly for the classifier service.

use std::fs;
use std::path::Path;

use crate::transcript::Transcript;

/// Used when no system prompt file can be read
pub const DEFAULT_SYSTEM_PROMPT: &str = "Analyze the customer support chat and label its \
resolution status, customer sentiment, chat type, intent and a short intent detail.";

/// Appended when the prompt is cut to its bounded prefix
pub const TRUNCATION_MARKER: &str = "...";

/// Default bound on prompt length, in characters
pub const DEFAULT_MAX_PROMPT_CHARS: usize = 1000;

/// Read the system prompt, falling back to the built-in one.
pub fn load_system_prompt(path: &Path) -> String {
    match fs::read_to_string(path) {
        Ok(content) if !content.trim().is_empty() => content.trim().to_string(),
        Ok(_) => {
            tracing::warn!(path = %path.display(), "system prompt file is empty, using default");
            DEFAULT_SYSTEM_PROMPT.to_string()
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "system prompt unavailable, using default");
            DEFAULT_SYSTEM_PROMPT.to_string()
        }
    }
}

/// User message for one transcript. The labeling rules live in the system prompt.
pub fn build_user_prompt(transcript: &Transcript) -> String {
    format!(
        "Analyze the following chat:\n\n{}",
        transcript.render_text()
    )
}

/// Keep at most `max_chars` characters, marking the cut.
pub fn truncate_prompt(prompt: &str, max_chars: usize) -> String {
    match prompt.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{}", &prompt[..cut], TRUNCATION_MARKER),
        None => prompt.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::{GroundTruth, Message, Speaker};

    fn transcript(texts: &[(&str, Speaker)]) -> Transcript {
        Transcript {
            chat_id: "C-1".to_string(),
            started_at: None,
            messages: texts
                .iter()
                .map(|(text, sender)| Message {
                    sender: *sender,
                    text: text.to_string(),
                    timestamp: None,
                })
                .collect(),
            ground_truth: GroundTruth::default(),
        }
    }

    #[test]
    fn test_build_user_prompt() {
        let t = transcript(&[("Siparişim gelmedi", Speaker::Customer), ("Bakıyorum", Speaker::Bot)]);
        let prompt = build_user_prompt(&t);
        assert_eq!(
            prompt,
            "Analyze the following chat:\n\nCustomer: Siparişim gelmedi\nBot: Bakıyorum\n"
        );
    }

    #[test]
    fn test_truncate_prompt_counts_characters() {
        assert_eq!(truncate_prompt("şşşş", 2), "şş...");
        assert_eq!(truncate_prompt("short", 10), "short");
        assert_eq!(truncate_prompt("exact", 5), "exact");
    }

    #[test]
    fn test_load_system_prompt_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("system_prompt.txt");
        std::fs::write(&path, "  Label the chat.\n").unwrap();
        assert_eq!(load_system_prompt(&path), "Label the chat.");
    }

    #[test]
    fn test_load_system_prompt_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            load_system_prompt(&dir.path().join("missing.txt")),
            DEFAULT_SYSTEM_PROMPT
        );
    }
}
