//! Customer demand summary: what customers ask for, ranked by share.

use std::fmt;

use crate::accuracy::round1;
use crate::labels::{ChatType, Intent, Resolution, Sentiment};
use crate::records::AnalyzedRecord;

use super::tally::Tally;
use super::{percent, section, ReportContext};

/// Detail examples listed per intent
const DETAIL_EXAMPLES: usize = 3;

/// Medium-demand intents listed in the trend section
const MEDIUM_LISTED: usize = 3;

/// Demand tier of an intent by share
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemandTier {
    High,
    Medium,
    Low,
}

impl DemandTier {
    /// Above 10% is high, 5% up to 10% medium, below 5% low
    pub fn from_share(share: f64) -> Self {
        if share > 10.0 {
            DemandTier::High
        } else if share >= 5.0 {
            DemandTier::Medium
        } else {
            DemandTier::Low
        }
    }
}

/// Resolution health marker shown next to an intent's resolution rate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionHealth {
    Good,
    Watch,
    Poor,
}

impl ResolutionHealth {
    pub fn from_rate(rate: f64) -> Self {
        if rate >= 80.0 {
            ResolutionHealth::Good
        } else if rate >= 60.0 {
            ResolutionHealth::Watch
        } else {
            ResolutionHealth::Poor
        }
    }
}

impl fmt::Display for ResolutionHealth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionHealth::Good => write!(f, "good"),
            ResolutionHealth::Watch => write!(f, "watch"),
            ResolutionHealth::Poor => write!(f, "poor"),
        }
    }
}

/// Demand profile of one intent
#[derive(Debug, Clone, PartialEq)]
pub struct IntentDemand {
    pub intent: Intent,
    pub count: usize,
    /// Share of all chats as a percentage, unrounded so tiers see the exact value
    pub share: f64,
    /// Resolved chats within this intent, as a percentage
    pub resolution_rate: f64,
    pub chat_types: Vec<(ChatType, usize)>,
    pub sentiments: Vec<(Sentiment, usize)>,
    /// Distinct non-blank intent details in first-seen order
    pub details: Vec<String>,
}

impl IntentDemand {
    pub fn tier(&self) -> DemandTier {
        DemandTier::from_share(self.share)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DemandSummary {
    pub total: usize,
    /// Ranked by share, ties in first-seen order
    pub intents: Vec<IntentDemand>,
}

impl DemandSummary {
    pub fn compute(records: &[AnalyzedRecord]) -> Self {
        let total = records.len();
        let ranking: Tally<Intent> = records.iter().map(|r| r.classification.intent).collect();

        let intents = ranking
            .most_common()
            .into_iter()
            .map(|(intent, count)| intent_demand(records, intent, count, total))
            .collect();

        Self { total, intents }
    }

    /// Combined share of the five most requested intents
    pub fn top5_share(&self) -> f64 {
        round1(self.intents.iter().take(5).map(|d| d.share).sum())
    }

    /// Distinct intents relative to total chats, as a percentage
    pub fn diversity(&self) -> f64 {
        percent(self.intents.len(), self.total)
    }

    pub fn tier(&self, tier: DemandTier) -> Vec<&IntentDemand> {
        self.intents.iter().filter(|d| d.tier() == tier).collect()
    }

    pub fn render(&self, ctx: &ReportContext) -> String {
        let mut out = ctx.header("DEMAND SUMMARY");

        section(&mut out, "OVERVIEW", 25);
        out.push_str(&format!("- Total requests: {}\n", self.total));
        out.push_str(&format!("- Distinct intents: {}\n", self.intents.len()));
        out.push_str(&format!(
            "- Top 5 intents: {:.1}% of all requests\n",
            self.top5_share()
        ));
        out.push_str(&format!("- Diversity ratio: {:.1}%\n\n", self.diversity()));

        section(&mut out, "DEMAND BY INTENT (PRIORITY ORDER)", 55);
        out.push('\n');
        for demand in &self.intents {
            render_intent(&mut out, demand);
        }

        section(&mut out, "TRENDS AND STRATEGY", 45);
        let high = self.tier(DemandTier::High);
        out.push_str(&format!("High demand (>10%): {} categories\n", high.len()));
        for d in &high {
            out.push_str(&format!(
                "   - {} ({:.1}%) - primary development area\n",
                d.intent, d.share
            ));
        }

        let medium = self.tier(DemandTier::Medium);
        out.push_str(&format!("\nMedium demand (5-10%): {} categories\n", medium.len()));
        for d in medium.iter().take(MEDIUM_LISTED) {
            out.push_str(&format!(
                "   - {} ({:.1}%) - secondary development area\n",
                d.intent, d.share
            ));
        }

        let low = self.tier(DemandTier::Low);
        let low_share: f64 = low.iter().map(|d| d.share).sum();
        out.push_str(&format!("\nLow demand (<5%): {} categories\n", low.len()));
        out.push_str(&format!("   - Combined: {:.1}% of requests\n", low_share));
        out
    }
}

/// Compute and render the demand summary
pub fn generate_demand_summary(records: &[AnalyzedRecord], ctx: &ReportContext) -> String {
    DemandSummary::compute(records).render(ctx)
}

fn intent_demand(
    records: &[AnalyzedRecord],
    intent: Intent,
    count: usize,
    total: usize,
) -> IntentDemand {
    let matching = || records.iter().filter(move |r| r.classification.intent == intent);

    let resolved = matching()
        .filter(|r| r.classification.resolution == Resolution::Resolved)
        .count();
    let chat_types: Tally<ChatType> = matching().map(|r| r.classification.chat_type).collect();
    let sentiments: Tally<Sentiment> = matching().map(|r| r.classification.sentiment).collect();
    let details: Tally<String> = matching()
        .map(|r| r.classification.intent_detail.trim())
        .filter(|detail| !detail.is_empty())
        .map(str::to_string)
        .collect();

    IntentDemand {
        intent,
        count,
        share: percent(count, total),
        resolution_rate: percent(resolved, count),
        chat_types: chat_types.most_common(),
        sentiments: sentiments.most_common(),
        details: details.keys(),
    }
}

fn render_intent(out: &mut String, d: &IntentDemand) {
    out.push_str(&format!(
        "* {}: {:.1}% ({} requests)\n",
        d.intent, d.share, d.count
    ));
    out.push_str(&format!(
        "   Resolution rate: {:.1}% [{}]\n",
        d.resolution_rate,
        ResolutionHealth::from_rate(d.resolution_rate)
    ));

    let types: Vec<String> = d
        .chat_types
        .iter()
        .map(|(t, n)| format!("{} ({:.1}%)", t, percent(*n, d.count)))
        .collect();
    out.push_str(&format!("   Chat types: {}\n", types.join(", ")));

    let moods: Vec<String> = d
        .sentiments
        .iter()
        .map(|(s, n)| format!("{} {:.1}%", s, percent(*n, d.count)))
        .collect();
    out.push_str(&format!("   Sentiment: {}\n", moods.join(" | ")));

    out.push_str(&format!("   Detail variations: {}\n", d.details.len()));
    for (i, detail) in d.details.iter().take(DETAIL_EXAMPLES).enumerate() {
        out.push_str(&format!("      {}. {}\n", i + 1, detail));
    }
    if d.details.len() > DETAIL_EXAMPLES {
        out.push_str(&format!(
            "      ... and {} more\n",
            d.details.len() - DETAIL_EXAMPLES
        ));
    }
    out.push('\n');
}
