use chrono::NaiveDate;

use super::ReportContext;
use crate::classifier::{Classification, ClassificationResult};
use crate::labels::{ChatType, Intent, Resolution, Sentiment};
use crate::records::AnalyzedRecord;
use crate::transcript::{GroundTruth, Transcript};

pub fn context() -> ReportContext {
    let at = NaiveDate::from_ymd_opt(2025, 3, 1)
        .and_then(|d| d.and_hms_opt(12, 30, 0))
        .unwrap();
    ReportContext::new("Mila", "gpt-5-nano").at(at)
}

pub fn record(
    chat_id: &str,
    resolution: Resolution,
    sentiment: Sentiment,
    chat_type: ChatType,
    intent: Intent,
    detail: &str,
) -> AnalyzedRecord {
    let transcript = Transcript {
        chat_id: chat_id.to_string(),
        started_at: None,
        messages: vec![],
        ground_truth: GroundTruth {
            resolution: Some(resolution.as_str().to_string()),
            sentiment: Some(sentiment.as_str().to_string()),
            chat_type: Some(chat_type.as_str().to_string()),
            intent: Some(intent.as_str().to_string()),
            intent_detail: Some(detail.to_string()),
        },
    };
    AnalyzedRecord::merge(
        &transcript,
        Classification::classified(ClassificationResult::new(
            resolution, sentiment, chat_type, intent, detail,
        )),
    )
}

/// Ten chats: four shipping, three payment, two refund, one password reset
pub fn mixed_records() -> Vec<AnalyzedRecord> {
    use ChatType::*;
    use Resolution::*;
    use Sentiment::*;

    vec![
        record("C-01", Resolved, Positive, Question, Intent::Shipping, "Kargo takibi"),
        record("C-02", Resolved, Positive, Question, Intent::Shipping, "Kargo takibi"),
        record("C-03", Unresolved, Negative, Complaint, Intent::Shipping, "Geciken kargo"),
        record("C-04", Resolved, Neutral, Question, Intent::Shipping, "Teslimat adresi"),
        record("C-05", Unresolved, Negative, Problem, Intent::Payment, "Ödeme alınamadı"),
        record("C-06", Resolved, Positive, Request, Intent::Payment, "Taksit seçenekleri"),
        record("C-07", Unresolved, Neutral, Problem, Intent::Payment, "Kart reddedildi"),
        record("C-08", Resolved, Positive, Return, Intent::Refund, "İade süreci"),
        record("C-09", Unresolved, Negative, Complaint, Intent::Refund, "İade gecikmesi"),
        record("C-10", Resolved, Positive, Request, Intent::PasswordReset, "Şifre yenileme"),
    ]
}
