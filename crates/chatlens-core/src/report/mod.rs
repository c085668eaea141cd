//! Aggregation and report generation.
//!
//! Each report is computed into a typed value first and rendered to text
//! second. Everything here is a pure function of the record set and a
//! [`ReportContext`], so rendering twice with the same context yields the
//! same text.

pub mod accuracy;
pub mod demand;
pub mod recommendations;
pub mod swot;
mod tally;
mod writer;

use chrono::{Local, NaiveDateTime};

use crate::accuracy::{compute_accuracy, AccuracyTable};
use crate::config::ChatlensConfig;
use crate::records::AnalyzedRecord;
use crate::transcript::GroundTruthRecord;

pub use accuracy::{generate_accuracy_report, AccuracyReport, AccuracyTier, FieldAccuracy};
pub use demand::{generate_demand_summary, DemandSummary, DemandTier, IntentDemand};
pub use recommendations::{generate_recommendations, IntentPriority, Priority, Recommendations};
pub use swot::{generate_swot, SwotAnalysis, SwotStats};
pub use tally::Tally;
pub use writer::{write_all, write_report};

/// Width of the `=` rule under a report title
const TITLE_RULE_WIDTH: usize = 60;

/// Who and what a report is about, and when it was generated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportContext {
    pub analyzed_system: String,
    pub analysis_model: String,
    pub generated_at: NaiveDateTime,
}

impl ReportContext {
    /// Context stamped with the current local time
    pub fn new(analyzed_system: impl Into<String>, analysis_model: impl Into<String>) -> Self {
        Self {
            analyzed_system: analyzed_system.into(),
            analysis_model: analysis_model.into(),
            generated_at: Local::now().naive_local(),
        }
    }

    /// Pin the generation timestamp
    pub fn at(mut self, generated_at: NaiveDateTime) -> Self {
        self.generated_at = generated_at;
        self
    }

    /// Context for a run whose records came from `run_model`
    pub fn from_config(config: &ChatlensConfig, run_model: &str) -> Self {
        Self::new(
            &config.report.analyzed_system,
            config.analysis_model(run_model),
        )
    }

    /// Title, rule and the generation/model/system lines shared by every report
    pub fn header(&self, title: &str) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "{} {}\n",
            self.analyzed_system.to_uppercase(),
            title
        ));
        out.push_str(&"=".repeat(TITLE_RULE_WIDTH));
        out.push_str("\n\n");
        out.push_str(&format!(
            "Generated: {}\n",
            self.generated_at.format("%Y-%m-%d %H:%M:%S")
        ));
        out.push_str(&format!("Analysis model: {}\n", self.analysis_model));
        out.push_str(&format!("Analyzed system: {}\n\n", self.analyzed_system));
        out
    }
}

/// All four rendered reports of a run
#[derive(Debug, Clone, PartialEq)]
pub struct Reports {
    pub swot: String,
    pub recommendations: String,
    pub demand_summary: String,
    pub accuracy_report: String,
    pub accuracy: AccuracyTable,
}

/// Compute and render every report for a record set
pub fn generate_all(
    records: &[AnalyzedRecord],
    ground_truth: &[GroundTruthRecord],
    ctx: &ReportContext,
) -> Reports {
    let accuracy = compute_accuracy(records, ground_truth);
    Reports {
        swot: generate_swot(records, ctx),
        recommendations: generate_recommendations(records, ctx),
        demand_summary: generate_demand_summary(records, ctx),
        accuracy_report: generate_accuracy_report(&accuracy, ctx),
        accuracy,
    }
}

/// `part / total * 100`, or 0 for an empty whole
pub fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    part as f64 * 100.0 / total as f64
}

/// Section heading followed by a `-` rule
pub(crate) fn section(out: &mut String, title: &str, rule: usize) {
    out.push_str(title);
    out.push('\n');
    out.push_str(&"-".repeat(rule));
    out.push('\n');
}

/// Drop repeated lines, keeping the first occurrence of each
pub(crate) fn dedup_preserving(items: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

#[cfg(test)]
pub(crate) mod fixtures;
