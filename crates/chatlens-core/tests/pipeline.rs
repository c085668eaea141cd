//! End-to-end tests of the classification and reporting pipeline

use std::collections::HashSet;
use std::time::Duration;

use chatlens_core::accuracy::compute_accuracy;
use chatlens_core::batch::BatchRunner;
use chatlens_core::classifier::{
    ClassificationRequest, ClassificationResult, ClassifierBackend, ClassifierError,
    ClassifierGateway,
};
use chatlens_core::config::OutputConfig;
use chatlens_core::labels::{ChatType, Intent, LabelField, Resolution, Sentiment};
use chatlens_core::records::{attach_ground_truth, load_records, save_records, RecordSet};
use chatlens_core::report::{generate_all, write_all, ReportContext};
use chatlens_core::spreadsheet::{summarize_rows, write_spreadsheet, SpreadsheetOutput};
use chatlens_core::transcript::{
    ground_truth_from_transcripts, load_ground_truth, load_transcripts,
};

/// Answers `{Resolved, Positive, Question, Shipping}` except for the listed chats
struct FlakyBackend {
    failing: HashSet<String>,
}

impl ClassifierBackend for FlakyBackend {
    fn name(&self) -> &str {
        "flaky"
    }

    fn complete(
        &self,
        request: &ClassificationRequest,
    ) -> Result<ClassificationResult, ClassifierError> {
        if self.failing.contains(&request.chat_id) {
            return Err(ClassifierError::Status(500));
        }
        Ok(ClassificationResult::new(
            Resolution::Resolved,
            Sentiment::Positive,
            ChatType::Question,
            Intent::Shipping,
            "Kargo takibi",
        ))
    }
}

fn export_json(n: usize) -> String {
    let chats: Vec<serde_json::Value> = (1..=n)
        .map(|i| {
            serde_json::json!({
                "sohbet_id": format!("C-{:02}", i),
                "tarih_saat": "05.03.2025 14:00:00",
                "mesajlar": [
                    {"sender": "Müşteri", "text": "Kargom nerede?", "timestamp": "05.03.2025 14:00:00"},
                    {"sender": "Mila", "text": "Takip numaranızı paylaşıyorum.", "timestamp": "05.03.2025 14:03:20"}
                ],
                "yanit_durumu": "Çözüldü",
                "sentiment": "Pozitif",
                "tur": "Soru",
                "intent": "Kargo",
                "intent_detay": "Kargo takibi"
            })
        })
        .collect();
    serde_json::to_string_pretty(&chats).unwrap()
}

#[test]
fn test_partial_classifier_failure_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("chats.json");
    std::fs::write(&input, export_json(10)).unwrap();

    let transcripts = load_transcripts(&input).unwrap();
    assert_eq!(transcripts.len(), 10);

    let failing: HashSet<String> = ["C-02", "C-05", "C-09"].iter().map(|s| s.to_string()).collect();
    let gateway = ClassifierGateway::new(FlakyBackend { failing }, "prompt");
    let outcome = BatchRunner::new(gateway)
        .with_pause(Duration::ZERO, 3)
        .run(&transcripts);

    assert_eq!(outcome.records.len(), 10);
    assert_eq!(outcome.succeeded, 7);
    assert_eq!(outcome.degraded(), 3);
    assert!(outcome.records[1].degraded);
    assert_eq!(outcome.records[1].classification, ClassificationResult::fallback());
    assert_eq!(outcome.records[0].duration_secs, 200);

    let truth = ground_truth_from_transcripts(&transcripts);
    let table = compute_accuracy(&outcome.records, &truth);
    assert_eq!(table.rate(LabelField::Resolution), 70.0);
    assert_eq!(table.rate(LabelField::Sentiment), 70.0);
    assert_eq!(table.rate(LabelField::Intent), 70.0);
}

#[test]
fn test_saved_records_regenerate_identical_reports() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("chats.json");
    std::fs::write(&input, export_json(4)).unwrap();

    let transcripts = load_transcripts(&input).unwrap();
    let gateway = ClassifierGateway::new(
        FlakyBackend {
            failing: HashSet::new(),
        },
        "prompt",
    );
    let outcome = BatchRunner::new(gateway)
        .with_pause(Duration::ZERO, 3)
        .run(&transcripts);

    let records_path = dir.path().join("outputs").join("records.json");
    save_records(&records_path, &RecordSet::new("gpt-5-nano", outcome.records.clone())).unwrap();
    let reloaded = load_records(&records_path).unwrap();

    let ctx = ReportContext::new("Mila", "gpt-5-nano");
    let truth = ground_truth_from_transcripts(&transcripts);
    assert_eq!(
        generate_all(&outcome.records, &truth, &ctx),
        generate_all(&reloaded.records, &truth, &ctx)
    );
}

#[test]
fn test_outputs_are_written() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("chats.json");
    std::fs::write(&input, export_json(3)).unwrap();
    let transcripts = load_transcripts(&input).unwrap();

    let gateway = ClassifierGateway::new(
        FlakyBackend {
            failing: HashSet::new(),
        },
        "prompt",
    );
    let outcome = BatchRunner::new(gateway)
        .with_pause(Duration::ZERO, 3)
        .run(&transcripts);

    let out = dir.path().join("outputs");
    let output = OutputConfig {
        spreadsheet: out.join("chat_analysis.xlsx"),
        swot: out.join("swot.txt"),
        recommendations: out.join("recommendations.txt"),
        demand_summary: out.join("demand.txt"),
        accuracy_report: out.join("accuracy.txt"),
        records: out.join("records.json"),
    };

    let reports = generate_all(
        &outcome.records,
        &ground_truth_from_transcripts(&transcripts),
        &ReportContext::new("Mila", "gpt-5-nano"),
    );
    let written = write_all(&reports, &output).unwrap();
    assert!(written.iter().all(|p| p.is_file()));
    assert!(std::fs::read_to_string(&output.accuracy_report)
        .unwrap()
        .contains("Resolution: 100.0% - EXCELLENT (3/3 comparable)"));

    let sheet = write_spreadsheet(&outcome.records, &output.spreadsheet).unwrap();
    assert_eq!(sheet, SpreadsheetOutput::Xlsx(output.spreadsheet.clone()));
}

#[test]
fn test_separate_ground_truth_reaches_spreadsheet_rows() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("chats.json");
    std::fs::write(
        &input,
        r#"[
          {"sohbet_id": "C-01", "mesajlar": [{"sender": "Müşteri", "text": "Kargom nerede?"}]},
          {"sohbet_id": "C-02", "mesajlar": [{"sender": "Müşteri", "text": "Kargom gelmedi"}]}
        ]"#,
    )
    .unwrap();
    let truth_path = dir.path().join("truth.json");
    std::fs::write(
        &truth_path,
        r#"[
          {"chat_id": "C-01", "resolution": "Çözüldü", "sentiment": "Pozitif", "chat_type": "Soru", "intent": "Kargo"},
          {"chat_id": "C-02", "resolution": "Çözüldü", "sentiment": "Pozitif", "chat_type": "Soru", "intent": "Ödeme"}
        ]"#,
    )
    .unwrap();

    let transcripts = load_transcripts(&input).unwrap();
    assert!(ground_truth_from_transcripts(&transcripts).is_empty());
    let gateway = ClassifierGateway::new(
        FlakyBackend {
            failing: HashSet::new(),
        },
        "prompt",
    );
    let mut records = BatchRunner::new(gateway)
        .with_pause(Duration::ZERO, 3)
        .run(&transcripts)
        .records;

    let truth = load_ground_truth(&truth_path).unwrap();
    attach_ground_truth(&mut records, &truth);

    let table = compute_accuracy(&records, &truth);
    assert_eq!(table.rate(LabelField::Resolution), 100.0);
    assert_eq!(table.rate(LabelField::Intent), 50.0);
    let rows = summarize_rows(&records);
    assert_eq!(rows.total, 2);
    assert_eq!(rows.fully_correct, 1);

    let records_path = dir.path().join("records.json");
    save_records(&records_path, &RecordSet::new("gpt-5-nano", records)).unwrap();
    let reloaded = load_records(&records_path).unwrap();
    assert_eq!(summarize_rows(&reloaded.records).fully_correct, 1);
}
