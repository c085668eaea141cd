use super::*;
use crate::error::ChatlensError;
use crate::labels::LabelField;

const EXPORT: &str = r#"[
  {
    "sohbet_id": "C-001",
    "tarih_saat": "01.03.2025 10:00:00",
    "mesajlar": [
      {"sender": "Müşteri", "text": "Kargom nerede?", "timestamp": "01.03.2025 10:00:00"},
      {"sender": "Mila", "text": "Kontrol ediyorum.", "timestamp": "01.03.2025 10:01:30"},
      {"sender": "Müşteri", "text": "Teşekkürler", "timestamp": "01.03.2025 10:02:45"}
    ],
    "yanit_durumu": "Çözüldü",
    "sentiment": "Pozitif ",
    "tur": "Soru",
    "intent": "Kargo",
    "intent_detay": "Kargo takibi"
  },
  {
    "sohbet_id": 42,
    "tarih_saat": "not a date",
    "mesajlar": []
  }
]"#;

fn write_export(dir: &tempfile::TempDir) -> std::path::PathBuf {
    let path = dir.path().join("chats.json");
    std::fs::write(&path, EXPORT).unwrap();
    path
}

#[test]
fn test_load_transcripts_reads_export_fields() {
    let dir = tempfile::tempdir().unwrap();
    let transcripts = load_transcripts(&write_export(&dir)).unwrap();

    assert_eq!(transcripts.len(), 2);
    let first = &transcripts[0];
    assert_eq!(first.chat_id, "C-001");
    assert_eq!(first.messages.len(), 3);
    assert_eq!(first.messages[0].sender, Speaker::Customer);
    assert_eq!(first.messages[1].sender, Speaker::Bot);
    assert_eq!(first.ground_truth.get(LabelField::Sentiment), Some("Pozitif "));
    assert_eq!(first.ground_truth.intent_detail.as_deref(), Some("Kargo takibi"));
}

#[test]
fn test_numeric_chat_id_becomes_string() {
    let dir = tempfile::tempdir().unwrap();
    let transcripts = load_transcripts(&write_export(&dir)).unwrap();
    assert_eq!(transcripts[1].chat_id, "42");
    assert!(transcripts[1].ground_truth.is_empty());
}

#[test]
fn test_duration_between_start_and_last_message() {
    let dir = tempfile::tempdir().unwrap();
    let transcripts = load_transcripts(&write_export(&dir)).unwrap();

    assert_eq!(transcripts[0].ended_at(), Some("01.03.2025 10:02:45"));
    assert_eq!(transcripts[0].duration_secs(), 165);
    assert_eq!(format_duration(transcripts[0].duration_secs()), "2 min 45 sec");
}

#[test]
fn test_duration_is_zero_without_usable_timestamps() {
    let dir = tempfile::tempdir().unwrap();
    let transcripts = load_transcripts(&write_export(&dir)).unwrap();

    assert_eq!(transcripts[1].ended_at(), None);
    assert_eq!(transcripts[1].duration_secs(), 0);
    assert_eq!(format_duration(0), "0 min 0 sec");
}

#[test]
fn test_render_text_labels_speakers() {
    let dir = tempfile::tempdir().unwrap();
    let transcripts = load_transcripts(&write_export(&dir)).unwrap();

    let text = transcripts[0].render_text();
    assert!(text.starts_with("Customer: Kargom nerede?\nBot: Kontrol ediyorum.\n"));
}

#[test]
fn test_ground_truth_from_transcripts_skips_unlabeled() {
    let dir = tempfile::tempdir().unwrap();
    let transcripts = load_transcripts(&write_export(&dir)).unwrap();

    let truth = ground_truth_from_transcripts(&transcripts);
    assert_eq!(truth.len(), 1);
    assert_eq!(truth[0].chat_id, "C-001");
    assert_eq!(truth[0].labels.get(LabelField::Intent), Some("Kargo"));
}

#[test]
fn test_load_ground_truth_accepts_english_keys() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("truth.json");
    std::fs::write(
        &path,
        r#"[{"chat_id": "C-9", "resolution": "Çözülemedi", "chat_type": "Sorun", "intent": "Ödeme"}]"#,
    )
    .unwrap();

    let truth = load_ground_truth(&path).unwrap();
    assert_eq!(truth[0].chat_id, "C-9");
    assert_eq!(truth[0].labels.get(LabelField::Resolution), Some("Çözülemedi"));
    assert_eq!(truth[0].labels.get(LabelField::ChatType), Some("Sorun"));
    assert_eq!(truth[0].labels.get(LabelField::Sentiment), None);
}

#[test]
fn test_missing_file_is_input_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_transcripts(&dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, ChatlensError::InputNotFound { .. }));
}

#[test]
fn test_malformed_file_is_invalid_input() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ not json").unwrap();

    let err = load_transcripts(&path).unwrap_err();
    assert!(matches!(err, ChatlensError::InvalidInput { .. }));
}

#[test]
fn test_message_without_sender_is_bot() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("chats.json");
    std::fs::write(
        &path,
        r#"[{"sohbet_id": "C-2", "mesajlar": [
            {"text": "Hoş geldiniz", "timestamp": "01.03.2025 10:00:00"},
            {"sender": "Müşteri", "text": "Merhaba", "timestamp": "01.03.2025 10:00:05"}
        ]}]"#,
    )
    .unwrap();

    let transcripts = load_transcripts(&path).unwrap();
    assert_eq!(transcripts[0].messages[0].sender, Speaker::Bot);
    assert_eq!(transcripts[0].messages[1].sender, Speaker::Customer);
    assert!(transcripts[0].render_text().starts_with("Bot: Hoş geldiniz\n"));
}
