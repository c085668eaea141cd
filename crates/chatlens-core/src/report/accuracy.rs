//! Accuracy report: per-field agreement with tier verdicts.

use std::fmt;

use crate::accuracy::{round1, AccuracyTable, FieldTally};
use crate::labels::LabelField;

use super::{section, ReportContext};

/// Quality band for an accuracy percentage
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum AccuracyTier {
    Critical,
    Weak,
    Fair,
    Good,
    Excellent,
}

impl AccuracyTier {
    pub fn from_rate(rate: f64) -> Self {
        if rate >= 90.0 {
            AccuracyTier::Excellent
        } else if rate >= 80.0 {
            AccuracyTier::Good
        } else if rate >= 70.0 {
            AccuracyTier::Fair
        } else if rate >= 60.0 {
            AccuracyTier::Weak
        } else {
            AccuracyTier::Critical
        }
    }

    /// Overall verdict for a mean rate in this tier
    pub fn verdict(&self) -> &'static str {
        match self {
            AccuracyTier::Excellent => "EXCELLENT PERFORMANCE",
            AccuracyTier::Good => "GOOD PERFORMANCE",
            AccuracyTier::Fair => "FAIR PERFORMANCE",
            AccuracyTier::Weak => "WEAK PERFORMANCE",
            AccuracyTier::Critical => "CRITICAL",
        }
    }

    pub fn recommendation(&self) -> &'static str {
        match self {
            AccuracyTier::Excellent => "The model can be used in production with confidence",
            AccuracyTier::Good => "The model is usable; minor improvements are advised",
            AccuracyTier::Fair => "The model needs further development",
            AccuracyTier::Weak => "The model needs serious improvement",
            AccuracyTier::Critical => "The model should not be used in production",
        }
    }
}

impl fmt::Display for AccuracyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccuracyTier::Excellent => write!(f, "EXCELLENT"),
            AccuracyTier::Good => write!(f, "GOOD"),
            AccuracyTier::Fair => write!(f, "FAIR"),
            AccuracyTier::Weak => write!(f, "WEAK"),
            AccuracyTier::Critical => write!(f, "CRITICAL"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldAccuracy {
    pub field: LabelField,
    pub tally: FieldTally,
    pub rate: f64,
    pub tier: AccuracyTier,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AccuracyReport {
    pub fields: Vec<FieldAccuracy>,
    /// Unweighted mean of the field rates
    pub mean: f64,
    pub overall: AccuracyTier,
}

impl AccuracyReport {
    pub fn compute(table: &AccuracyTable) -> Self {
        let fields = LabelField::ALL
            .iter()
            .map(|&field| {
                let tally = table.get(field);
                let rate = tally.rate();
                FieldAccuracy {
                    field,
                    tally,
                    rate,
                    tier: AccuracyTier::from_rate(rate),
                }
            })
            .collect();
        let mean = table.mean_rate();

        Self {
            fields,
            mean,
            overall: AccuracyTier::from_rate(mean),
        }
    }

    pub fn render(&self, ctx: &ReportContext) -> String {
        let mut out = ctx.header("ACCURACY REPORT");

        section(&mut out, "ACCURACY BY FIELD", 45);
        for f in &self.fields {
            out.push_str(&format!(
                "{}: {:.1}% - {} ({}/{} comparable)\n",
                f.field.title(),
                f.rate,
                f.tier,
                f.tally.correct,
                f.tally.total
            ));
        }

        out.push_str("\nOVERALL ASSESSMENT:\n");
        out.push_str(&format!("- Mean accuracy: {:.1}%\n", round1(self.mean)));
        out.push_str(&format!("- Performance level: {}\n", self.overall.verdict()));
        out.push_str(&format!(
            "- Recommendation: {}\n\n",
            self.overall.recommendation()
        ));

        out.push_str("PERFORMANCE DETAILS:\n");
        for f in &self.fields {
            if f.tally.total == 0 {
                out.push_str(&format!(
                    "- {}: no comparable ground truth\n",
                    f.field.title()
                ));
            } else {
                out.push_str(&format!(
                    "- {}: labels match ground truth in {:.1}% of comparable chats ({})\n",
                    f.field.title(),
                    f.rate,
                    f.tier
                ));
            }
        }
        out
    }
}

/// Render the accuracy report for a computed table
pub fn generate_accuracy_report(table: &AccuracyTable, ctx: &ReportContext) -> String {
    AccuracyReport::compute(table).render(ctx)
}
