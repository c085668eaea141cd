//! Agreement between classifier labels and ground truth.

use std::collections::HashMap;

use serde::Serialize;

use crate::labels::{normalize_label, LabelField};
use crate::records::AnalyzedRecord;
use crate::transcript::{GroundTruth, GroundTruthRecord};

/// Correct and comparable counts for one field
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FieldTally {
    pub correct: usize,
    pub total: usize,
}

impl FieldTally {
    /// Percentage correct rounded to one decimal; 0.0 when nothing was comparable
    pub fn rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        round1(self.correct as f64 * 100.0 / self.total as f64)
    }
}

/// Per-field agreement over a record set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AccuracyTable {
    pub resolution: FieldTally,
    pub sentiment: FieldTally,
    pub chat_type: FieldTally,
    pub intent: FieldTally,
}

impl AccuracyTable {
    pub fn get(&self, field: LabelField) -> FieldTally {
        match field {
            LabelField::Resolution => self.resolution,
            LabelField::Sentiment => self.sentiment,
            LabelField::ChatType => self.chat_type,
            LabelField::Intent => self.intent,
        }
    }

    fn get_mut(&mut self, field: LabelField) -> &mut FieldTally {
        match field {
            LabelField::Resolution => &mut self.resolution,
            LabelField::Sentiment => &mut self.sentiment,
            LabelField::ChatType => &mut self.chat_type,
            LabelField::Intent => &mut self.intent,
        }
    }

    pub fn rate(&self, field: LabelField) -> f64 {
        self.get(field).rate()
    }

    /// Field rates in the fixed field order
    pub fn rates(&self) -> [(LabelField, f64); 4] {
        LabelField::ALL.map(|field| (field, self.rate(field)))
    }

    /// Unweighted mean of the four field rates
    pub fn mean_rate(&self) -> f64 {
        let sum: f64 = LabelField::ALL.iter().map(|f| self.rate(*f)).sum();
        sum / LabelField::ALL.len() as f64
    }

    /// Number of records that had at least one comparable field
    pub fn compared(&self) -> usize {
        LabelField::ALL
            .iter()
            .map(|f| self.get(*f).total)
            .max()
            .unwrap_or(0)
    }
}

/// Compare two labels under trim + case-fold.
///
/// `None` when either side is blank, meaning the pair is not comparable.
pub fn compare_labels(predicted: &str, truth: &str) -> Option<bool> {
    let predicted = normalize_label(predicted);
    let truth = normalize_label(truth);
    if predicted.is_empty() || truth.is_empty() {
        return None;
    }
    Some(predicted == truth)
}

/// True when both labels are present and equal after normalization
pub fn labels_agree(predicted: &str, truth: Option<&str>) -> bool {
    truth
        .and_then(|t| compare_labels(predicted, t))
        .unwrap_or(false)
}

/// Join records against ground truth by chat id and tally agreement.
///
/// Records without a ground-truth entry contribute nothing. When an id
/// appears more than once in `ground_truth`, the first entry is used.
pub fn compute_accuracy(
    records: &[AnalyzedRecord],
    ground_truth: &[GroundTruthRecord],
) -> AccuracyTable {
    let mut index: HashMap<&str, &GroundTruth> = HashMap::new();
    for entry in ground_truth {
        index.entry(entry.chat_id.as_str()).or_insert(&entry.labels);
    }

    let mut table = AccuracyTable::default();
    let mut unmatched = 0usize;

    for record in records {
        let Some(truth) = index.get(record.chat_id.as_str()) else {
            unmatched += 1;
            continue;
        };

        for field in LabelField::ALL {
            let Some(expected) = truth.get(field) else {
                continue;
            };
            if let Some(agree) = compare_labels(record.predicted(field), expected) {
                let tally = table.get_mut(field);
                tally.total += 1;
                if agree {
                    tally.correct += 1;
                }
            }
        }
    }

    tracing::debug!(
        records = records.len(),
        unmatched,
        mean = table.mean_rate(),
        "accuracy_computed"
    );
    table
}

/// Round to one decimal place, as every printed percentage is
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
