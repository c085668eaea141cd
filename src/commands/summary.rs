//! Shared printing for command results

use std::path::{Path, PathBuf};

use serde_json::{json, Value};

use chatlens_core::accuracy::{round1, AccuracyTable};
use chatlens_core::labels::LabelField;
use chatlens_core::spreadsheet::SpreadsheetOutput;

/// Files produced by a command
#[derive(Debug)]
pub struct Artifacts {
    pub spreadsheet: SpreadsheetOutput,
    pub records: Option<PathBuf>,
    pub reports: Vec<PathBuf>,
}

impl Artifacts {
    pub fn to_json(&self) -> Value {
        let format = match self.spreadsheet {
            SpreadsheetOutput::Xlsx(_) => "xlsx",
            SpreadsheetOutput::Csv(_) => "csv",
        };
        json!({
            "spreadsheet": display(self.spreadsheet.path()),
            "spreadsheet_format": format,
            "records": self.records.as_deref().map(display),
            "reports": self.reports.iter().map(|p| display(p)).collect::<Vec<_>>(),
        })
    }

    pub fn print_human(&self) {
        if let SpreadsheetOutput::Csv(path) = &self.spreadsheet {
            println!(
                "note: workbook could not be written, table saved as CSV: {}",
                path.display()
            );
        }
        println!("Wrote:");
        println!("  {}", self.spreadsheet.path().display());
        if let Some(path) = &self.records {
            println!("  {}", path.display());
        }
        for path in &self.reports {
            println!("  {}", path.display());
        }
    }
}

pub fn accuracy_json(table: &AccuracyTable) -> Value {
    let mut fields = serde_json::Map::new();
    for field in LabelField::ALL {
        let tally = table.get(field);
        fields.insert(
            field.key().to_string(),
            json!({
                "correct": tally.correct,
                "total": tally.total,
                "rate": tally.rate(),
            }),
        );
    }
    json!({
        "fields": fields,
        "mean": round1(table.mean_rate()),
        "compared": table.compared(),
    })
}

pub fn print_accuracy(table: &AccuracyTable) {
    if table.compared() == 0 {
        println!("Accuracy: no comparable ground truth");
        return;
    }
    println!("Accuracy:");
    for field in LabelField::ALL {
        let tally = table.get(field);
        println!(
            "  {:<11} {:>5.1}% ({}/{})",
            format!("{}:", field.title()),
            tally.rate(),
            tally.correct,
            tally.total
        );
    }
    println!("  {:<11} {:>5.1}%", "Mean:", round1(table.mean_rate()));
}

fn display(path: &Path) -> String {
    path.display().to_string()
}
