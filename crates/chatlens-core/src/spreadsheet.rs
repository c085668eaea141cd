//! Spreadsheet export of analyzed records.
//!
//! The xlsx sheet shades each predicted label green when it agrees with the
//! ground truth and red otherwise, and closes with a summary block and a
//! color legend. If the workbook cannot be written, the same table goes to a
//! CSV file next to the requested path.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use rust_xlsxwriter::{Color, Format, FormatAlign, Workbook, XlsxError};

use crate::accuracy::labels_agree;
use crate::error::{ChatlensError, Result};
use crate::labels::LabelField;
use crate::records::AnalyzedRecord;
use crate::report::percent;

/// Column headers, in output order
pub const COLUMNS: [&str; 14] = [
    "Chat ID",
    "Start",
    "End",
    "Duration",
    "Resolution",
    "Sentiment",
    "Chat type",
    "Intent",
    "Intent detail",
    "Ground truth resolution",
    "Ground truth sentiment",
    "Ground truth chat type",
    "Ground truth intent",
    "Ground truth intent detail",
];

/// Predicted column of each comparable field; its ground truth sits five
/// columns to the right
const COMPARED_COLUMNS: [(LabelField, u16); 4] = [
    (LabelField::Resolution, 4),
    (LabelField::Sentiment, 5),
    (LabelField::ChatType, 6),
    (LabelField::Intent, 7),
];

const MAX_COLUMN_WIDTH: usize = 30;

const HEADER_BLUE: u32 = 0x2E86AB;
const CORRECT_GREEN: u32 = 0xE8F5E8;
const INCORRECT_RED: u32 = 0xFFEBEE;
const SUMMARY_GOLD: u32 = 0xFFD700;
const SUMMARY_TITLE_BG: u32 = 0xF0F8FF;

static ILLEGAL_CHARS: OnceLock<Option<Regex>> = OnceLock::new();

/// Where the table ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpreadsheetOutput {
    Xlsx(PathBuf),
    /// Workbook failed; the table was written as CSV instead
    Csv(PathBuf),
}

impl SpreadsheetOutput {
    pub fn path(&self) -> &Path {
        match self {
            SpreadsheetOutput::Xlsx(path) | SpreadsheetOutput::Csv(path) => path,
        }
    }
}

/// Row-level agreement counts for the summary block
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowSummary {
    pub total: usize,
    /// Rows where all four compared fields agree
    pub fully_correct: usize,
}

impl RowSummary {
    pub fn partially_correct(&self) -> usize {
        self.total - self.fully_correct
    }

    pub fn full_accuracy(&self) -> f64 {
        percent(self.fully_correct, self.total)
    }
}

/// Background of a predicted label cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellShade {
    Correct,
    /// Disagrees with the ground truth, or there is none to compare
    Incorrect,
}

pub fn cell_shade(record: &AnalyzedRecord, field: LabelField) -> CellShade {
    if labels_agree(record.predicted(field), record.ground_truth(field)) {
        CellShade::Correct
    } else {
        CellShade::Incorrect
    }
}

/// Column and shade of every compared label in a row
pub fn compared_shades(record: &AnalyzedRecord) -> [(u16, CellShade); 4] {
    COMPARED_COLUMNS.map(|(field, col)| (col, cell_shade(record, field)))
}

pub fn summarize_rows(records: &[AnalyzedRecord]) -> RowSummary {
    RowSummary {
        total: records.len(),
        fully_correct: records.iter().filter(|r| row_fully_correct(r)).count(),
    }
}

fn row_fully_correct(record: &AnalyzedRecord) -> bool {
    compared_shades(record)
        .iter()
        .all(|(_, shade)| *shade == CellShade::Correct)
}

/// Remove control characters that xlsx cannot store
pub fn strip_illegal_chars(text: &str) -> String {
    let re = ILLEGAL_CHARS.get_or_init(|| match Regex::new(r"[\x00-\x08\x0B\x0C\x0E-\x1F\x7F]") {
        Ok(re) => Some(re),
        Err(e) => {
            tracing::warn!(error = %e, "failed to compile control character regex");
            None
        }
    });
    match re {
        Some(re) => re.replace_all(text, "").into_owned(),
        None => text.to_string(),
    }
}

/// Cell values of one record, in [`COLUMNS`] order
pub fn row_cells(record: &AnalyzedRecord) -> [String; 14] {
    let opt = |value: &Option<String>| strip_illegal_chars(value.as_deref().unwrap_or_default());
    let c = &record.classification;
    [
        strip_illegal_chars(&record.chat_id),
        opt(&record.started_at),
        opt(&record.ended_at),
        record.duration_display(),
        c.resolution.to_string(),
        c.sentiment.to_string(),
        c.chat_type.to_string(),
        c.intent.to_string(),
        strip_illegal_chars(&c.intent_detail),
        opt(&record.ground_truth_resolution),
        opt(&record.ground_truth_sentiment),
        opt(&record.ground_truth_chat_type),
        opt(&record.ground_truth_intent),
        opt(&record.ground_truth_intent_detail),
    ]
}

/// Write the records as xlsx, falling back to CSV at `<path>.csv`
pub fn write_spreadsheet(records: &[AnalyzedRecord], path: &Path) -> Result<SpreadsheetOutput> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| ChatlensError::io_operation("create directory", parent.display(), e))?;
    }

    match write_xlsx(records, path) {
        Ok(()) => {
            tracing::debug!(path = %path.display(), rows = records.len(), "xlsx_written");
            Ok(SpreadsheetOutput::Xlsx(path.to_path_buf()))
        }
        Err(e) => {
            let csv_path = path.with_extension("csv");
            tracing::warn!(
                path = %path.display(),
                fallback = %csv_path.display(),
                error = %e,
                "xlsx write failed, writing CSV instead"
            );
            write_csv(records, &csv_path)?;
            Ok(SpreadsheetOutput::Csv(csv_path))
        }
    }
}

/// Write the records as a plain CSV table
pub fn write_csv(records: &[AnalyzedRecord], path: &Path) -> Result<()> {
    let csv_err = |e: csv::Error| ChatlensError::io_operation("write csv", path.display(), e);

    let mut writer = csv::Writer::from_path(path).map_err(csv_err)?;
    writer.write_record(COLUMNS).map_err(csv_err)?;
    for record in records {
        writer.write_record(row_cells(record)).map_err(csv_err)?;
    }
    writer
        .flush()
        .map_err(|e| ChatlensError::io_operation("write csv", path.display(), e))
}

/// Write the styled workbook
pub fn write_xlsx(records: &[AnalyzedRecord], path: &Path) -> Result<()> {
    build_workbook(records)
        .and_then(|mut workbook| workbook.save(path))
        .map_err(|e| ChatlensError::Spreadsheet(e.to_string()))
}

fn build_workbook(records: &[AnalyzedRecord]) -> std::result::Result<Workbook, XlsxError> {
    let header = Format::new()
        .set_bold()
        .set_font_size(12)
        .set_font_color(Color::White)
        .set_background_color(Color::RGB(HEADER_BLUE))
        .set_align(FormatAlign::Center);
    let correct = Format::new().set_background_color(Color::RGB(CORRECT_GREEN));
    let incorrect = Format::new().set_background_color(Color::RGB(INCORRECT_RED));

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Chat Analysis")?;

    let mut widths: Vec<usize> = COLUMNS.iter().map(|h| h.chars().count()).collect();
    for (col, title) in COLUMNS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *title, &header)?;
    }

    for (i, record) in records.iter().enumerate() {
        let row = i as u32 + 1;
        let cells = row_cells(record);
        for (col, value) in cells.iter().enumerate() {
            widths[col] = widths[col].max(value.chars().count());
            sheet.write_string(row, col as u16, value.as_str())?;
        }
        for (col, shade) in compared_shades(record) {
            let fill = match shade {
                CellShade::Correct => &correct,
                CellShade::Incorrect => &incorrect,
            };
            sheet.write_string_with_format(row, col, cells[col as usize].as_str(), fill)?;
        }
    }

    let summary_row = records.len() as u32 + 3;
    write_summary(sheet, summary_row, summarize_rows(records), &correct, &incorrect)?;

    for (col, width) in widths.iter().enumerate() {
        sheet.set_column_width(col as u16, ((*width + 2).min(MAX_COLUMN_WIDTH)) as f64)?;
    }

    Ok(workbook)
}

fn write_summary(
    sheet: &mut rust_xlsxwriter::Worksheet,
    row: u32,
    summary: RowSummary,
    correct: &Format,
    incorrect: &Format,
) -> std::result::Result<(), XlsxError> {
    let title = Format::new()
        .set_bold()
        .set_font_size(14)
        .set_font_color(Color::RGB(HEADER_BLUE))
        .set_background_color(Color::RGB(SUMMARY_TITLE_BG))
        .set_align(FormatAlign::Center);
    let label = Format::new()
        .set_bold()
        .set_font_size(11)
        .set_background_color(Color::RGB(SUMMARY_GOLD));

    sheet.merge_range(row, 0, row, 1, "PERFORMANCE SUMMARY", &title)?;

    let lines = [
        ("Total chats", summary.total.to_string()),
        ("Fully correct predictions", summary.fully_correct.to_string()),
        ("Partially correct predictions", summary.partially_correct().to_string()),
        ("Full accuracy rate", format!("{:.1}%", summary.full_accuracy())),
    ];
    for (offset, (name, value)) in lines.iter().enumerate() {
        let r = row + 1 + offset as u32;
        sheet.write_string_with_format(r, 0, *name, &label)?;
        sheet.write_string_with_format(r, 1, value.as_str(), &label)?;
    }

    let legend_row = row + lines.len() as u32 + 2;
    let legend_title = Format::new()
        .set_bold()
        .set_font_size(12)
        .set_font_color(Color::RGB(HEADER_BLUE));
    sheet.write_string_with_format(legend_row, 0, "COLOR LEGEND", &legend_title)?;
    sheet.write_string_with_format(legend_row + 1, 0, "Green", correct)?;
    sheet.write_string(legend_row + 1, 1, "Correct prediction")?;
    sheet.write_string_with_format(legend_row + 2, 0, "Red", incorrect)?;
    sheet.write_string(legend_row + 2, 1, "Incorrect prediction")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{Classification, ClassificationResult};
    use crate::labels::{ChatType, Intent, Resolution, Sentiment};
    use crate::transcript::{GroundTruth, Transcript};

    fn record(chat_id: &str, truth_intent: &str) -> AnalyzedRecord {
        let transcript = Transcript {
            chat_id: chat_id.to_string(),
            started_at: Some("01.03.2025 10:00:00".to_string()),
            messages: vec![],
            ground_truth: GroundTruth {
                resolution: Some("çözüldü".to_string()),
                sentiment: Some("Pozitif".to_string()),
                chat_type: Some("Soru".to_string()),
                intent: Some(truth_intent.to_string()),
                intent_detail: Some("Kargo\u{0007} takibi".to_string()),
            },
        };
        AnalyzedRecord::merge(
            &transcript,
            Classification::classified(ClassificationResult::new(
                Resolution::Resolved,
                Sentiment::Positive,
                ChatType::Question,
                Intent::Shipping,
                "Kargo takibi",
            )),
        )
    }

    #[test]
    fn test_strip_illegal_chars() {
        assert_eq!(strip_illegal_chars("a\u{0000}b\u{000B}c\u{007F}"), "abc");
        assert_eq!(strip_illegal_chars("tab\tnew\nline\r"), "tab\tnew\nline\r");
        assert_eq!(strip_illegal_chars("Çözüldü"), "Çözüldü");
    }

    #[test]
    fn test_row_cells_order() {
        let cells = row_cells(&record("C-1", "Kargo"));
        assert_eq!(cells[0], "C-1");
        assert_eq!(cells[1], "01.03.2025 10:00:00");
        assert_eq!(cells[2], "");
        assert_eq!(cells[3], "0 min 0 sec");
        assert_eq!(cells[4], "Çözüldü");
        assert_eq!(cells[7], "Kargo");
        assert_eq!(cells[9], "çözüldü");
        assert_eq!(cells[13], "Kargo takibi");
    }

    #[test]
    fn test_summarize_rows() {
        let records = vec![record("C-1", "Kargo"), record("C-2", "Ödeme")];
        let summary = summarize_rows(&records);
        assert_eq!(summary.total, 2);
        assert_eq!(summary.fully_correct, 1);
        assert_eq!(summary.partially_correct(), 1);
        assert_eq!(summary.full_accuracy(), 50.0);
        assert_eq!(summarize_rows(&[]).full_accuracy(), 0.0);
    }

    #[test]
    fn test_shades_follow_label_agreement() {
        let matching = record("C-1", "kargo ");
        assert_eq!(
            compared_shades(&matching),
            [
                (4, CellShade::Correct),
                (5, CellShade::Correct),
                (6, CellShade::Correct),
                (7, CellShade::Correct)
            ]
        );

        let wrong_intent = record("C-2", "Ödeme");
        assert_eq!(cell_shade(&wrong_intent, LabelField::Resolution), CellShade::Correct);
        assert_eq!(cell_shade(&wrong_intent, LabelField::Intent), CellShade::Incorrect);
        assert_eq!(COLUMNS[compared_shades(&wrong_intent)[3].0 as usize], "Intent");
    }

    #[test]
    fn test_missing_truth_is_shaded_incorrect() {
        let mut unlabeled = record("C-3", "Kargo");
        unlabeled.set_ground_truth(&GroundTruth::default());
        assert!(compared_shades(&unlabeled)
            .iter()
            .all(|(_, shade)| *shade == CellShade::Incorrect));

        let mut partial = record("C-4", "Kargo");
        partial.ground_truth_sentiment = None;
        assert_eq!(cell_shade(&partial, LabelField::Sentiment), CellShade::Incorrect);
        assert_eq!(cell_shade(&partial, LabelField::ChatType), CellShade::Correct);
    }

    #[test]
    fn test_summarize_mixed_rows() {
        let mut unlabeled = record("C-3", "Kargo");
        unlabeled.set_ground_truth(&GroundTruth::default());
        let records = vec![
            record("C-1", "Kargo"),
            record("C-2", "Ödeme"),
            unlabeled,
            record("C-4", "KARGO"),
        ];

        let summary = summarize_rows(&records);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.fully_correct, 2);
        assert_eq!(summary.partially_correct(), 2);
        assert_eq!(summary.full_accuracy(), 50.0);
    }

    #[test]
    fn test_write_xlsx() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("analysis.xlsx");

        let output = write_spreadsheet(&[record("C-1", "Kargo")], &path).unwrap();
        assert_eq!(output, SpreadsheetOutput::Xlsx(path.clone()));
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn test_falls_back_to_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("analysis.xlsx");
        // a directory in the way makes the workbook save fail
        std::fs::create_dir(&path).unwrap();

        let output = write_spreadsheet(&[record("C-1", "Kargo")], &path).unwrap();
        let csv_path = dir.path().join("analysis.csv");
        assert_eq!(output, SpreadsheetOutput::Csv(csv_path.clone()));

        let content = std::fs::read_to_string(&csv_path).unwrap();
        let mut lines = content.lines();
        assert!(lines.next().unwrap().starts_with("Chat ID,Start,End,Duration,Resolution"));
        assert!(lines.next().unwrap().starts_with("C-1,01.03.2025 10:00:00,,0 min 0 sec,Çözüldü"));
    }
}
