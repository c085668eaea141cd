//! SWOT analysis of the analyzed support system.

use crate::labels::{Intent, Resolution, Sentiment};
use crate::records::AnalyzedRecord;

use super::tally::Tally;
use super::{dedup_preserving, percent, section, ReportContext};

const MAX_STRENGTHS: usize = 8;
const MAX_WEAKNESSES: usize = 8;
const MAX_OPPORTUNITIES: usize = 8;
const MAX_THREATS: usize = 5;

/// Headline counts behind the SWOT findings
#[derive(Debug, Clone, PartialEq)]
pub struct SwotStats {
    pub total: usize,
    pub resolved: usize,
    pub unresolved: usize,
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
    pub distinct_intents: usize,
    /// Mean length in characters of the non-blank intent details
    pub avg_detail_len: f64,
}

impl SwotStats {
    pub fn compute(records: &[AnalyzedRecord]) -> Self {
        let count = |pred: &dyn Fn(&AnalyzedRecord) -> bool| records.iter().filter(|r| pred(r)).count();

        let detail_lengths: Vec<usize> = records
            .iter()
            .map(|r| r.classification.intent_detail.as_str())
            .filter(|d| !d.trim().is_empty())
            .map(|d| d.chars().count())
            .collect();
        let avg_detail_len = if detail_lengths.is_empty() {
            0.0
        } else {
            detail_lengths.iter().sum::<usize>() as f64 / detail_lengths.len() as f64
        };

        let intents: Tally<Intent> = records.iter().map(|r| r.classification.intent).collect();

        Self {
            total: records.len(),
            resolved: count(&|r| r.classification.resolution == Resolution::Resolved),
            unresolved: count(&|r| r.classification.resolution == Resolution::Unresolved),
            positive: count(&|r| r.classification.sentiment == Sentiment::Positive),
            negative: count(&|r| r.classification.sentiment == Sentiment::Negative),
            neutral: count(&|r| r.classification.sentiment == Sentiment::Neutral),
            distinct_intents: intents.len(),
            avg_detail_len,
        }
    }

    pub fn rate(&self, part: usize) -> f64 {
        percent(part, self.total)
    }
}

/// Computed SWOT: statistics plus the four finding buckets
#[derive(Debug, Clone, PartialEq)]
pub struct SwotAnalysis {
    pub stats: SwotStats,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub opportunities: Vec<String>,
    pub threats: Vec<String>,
}

impl SwotAnalysis {
    pub fn compute(records: &[AnalyzedRecord]) -> Self {
        let stats = SwotStats::compute(records);
        let intents: Tally<Intent> = records.iter().map(|r| r.classification.intent).collect();

        let mut strengths = dedup_preserving(strengths(&stats));
        let mut weaknesses = dedup_preserving(weaknesses(&stats, records));
        let mut opportunities = dedup_preserving(opportunities(&stats, &intents));
        let mut threats = dedup_preserving(threats(&stats));

        strengths.truncate(MAX_STRENGTHS);
        weaknesses.truncate(MAX_WEAKNESSES);
        opportunities.truncate(MAX_OPPORTUNITIES);
        threats.truncate(MAX_THREATS);

        Self {
            stats,
            strengths,
            weaknesses,
            opportunities,
            threats,
        }
    }

    pub fn render(&self, ctx: &ReportContext) -> String {
        let s = &self.stats;
        let mut out = ctx.header("SWOT ANALYSIS");

        section(&mut out, "OVERALL PERFORMANCE", 40);
        out.push_str(&format!("- Total chats analyzed: {}\n", s.total));
        for (label, count) in [
            ("Resolved", s.resolved),
            ("Unresolved", s.unresolved),
            ("Positive experience", s.positive),
            ("Negative experience", s.negative),
            ("Neutral experience", s.neutral),
        ] {
            out.push_str(&format!("- {}: {} ({:.1}%)\n", label, count, s.rate(count)));
        }
        out.push_str(&format!("- Distinct intents understood: {}\n", s.distinct_intents));
        out.push_str(&format!(
            "- Average intent detail length: {:.0} characters\n\n",
            s.avg_detail_len
        ));

        render_bucket(&mut out, "STRENGTHS", &self.strengths, "No notable strengths identified");
        out.push('\n');
        render_bucket(&mut out, "WEAKNESSES", &self.weaknesses, "No critical weaknesses identified");
        out.push('\n');
        render_bucket(
            &mut out,
            "OPPORTUNITIES",
            &self.opportunities,
            "No clear opportunities identified",
        );
        out.push('\n');
        render_bucket(
            &mut out,
            "THREATS",
            &self.threats,
            "No threats requiring immediate action identified",
        );
        out
    }
}

/// Compute and render the SWOT report
pub fn generate_swot(records: &[AnalyzedRecord], ctx: &ReportContext) -> String {
    SwotAnalysis::compute(records).render(ctx)
}

fn render_bucket(out: &mut String, title: &str, items: &[String], empty: &str) {
    section(out, title, 20);
    if items.is_empty() {
        out.push_str(&format!("- {}\n", empty));
    }
    for (i, item) in items.iter().enumerate() {
        out.push_str(&format!("{}. {}\n", i + 1, item));
    }
}

fn strengths(s: &SwotStats) -> Vec<String> {
    let mut out = Vec::new();

    if s.resolved > 0 {
        let rate = s.rate(s.resolved);
        out.push(if rate >= 80.0 {
            format!("Outstanding resolution rate ({:.1}%): most customer problems get solved", rate)
        } else if rate >= 60.0 {
            format!("Good resolution rate ({:.1}%): core problems are handled effectively", rate)
        } else {
            format!("Baseline resolution capability ({:.1}%): some problems get solved", rate)
        });
    }

    if s.positive > 0 {
        let rate = s.rate(s.positive);
        out.push(if rate >= 70.0 {
            format!("Excellent customer experience ({:.1}%): most users are satisfied", rate)
        } else if rate >= 50.0 {
            format!("Positive customer interaction ({:.1}%): users are generally satisfied", rate)
        } else {
            format!("Acceptable customer response ({:.1}%): some users are satisfied", rate)
        });
    }

    if s.distinct_intents >= 10 {
        out.push(format!(
            "Broad understanding: recognizes {} distinct intents",
            s.distinct_intents
        ));
    } else if s.distinct_intents >= 5 {
        out.push(format!(
            "Versatile response capacity: answers {} distinct intents",
            s.distinct_intents
        ));
    }

    out
}

fn weaknesses(s: &SwotStats, records: &[AnalyzedRecord]) -> Vec<String> {
    let mut out = Vec::new();

    if s.unresolved > 0 {
        let rate = s.rate(s.unresolved);
        out.push(if rate >= 40.0 {
            format!("Severe resolution gap ({:.1}%): nearly half of all chats stay unresolved", rate)
        } else if rate >= 20.0 {
            format!("Significant resolution shortfall ({:.1}%): about one chat in five is not resolved", rate)
        } else {
            format!("Limited resolution capacity ({:.1}%): some complex problems stay unresolved", rate)
        });
    }

    if s.negative > 0 {
        let rate = s.rate(s.negative);
        if rate >= 30.0 {
            out.push(format!(
                "Serious customer dissatisfaction ({:.1}%): a third of users are unhappy",
                rate
            ));
        } else if rate >= 15.0 {
            out.push(format!(
                "Notable negative response ({:.1}%): a meaningful share of users are unhappy",
                rate
            ));
        }
    }

    let unresolved: Tally<Intent> = records
        .iter()
        .filter(|r| r.classification.resolution == Resolution::Unresolved)
        .map(|r| r.classification.intent)
        .collect();
    for (intent, count) in unresolved.top(3) {
        out.push(format!(
            "Critical failures on '{}': {:.1}% of unresolved chats",
            intent,
            percent(count, s.unresolved)
        ));
    }

    out
}

fn opportunities(s: &SwotStats, intents: &Tally<Intent>) -> Vec<String> {
    let mut out = Vec::new();

    for (intent, count) in intents.top(5) {
        let rate = s.rate(count);
        if rate >= 15.0 {
            out.push(format!(
                "Specialize in '{}': {:.1}% of requests come from this area",
                intent, rate
            ));
        } else if rate >= 8.0 {
            out.push(format!(
                "Deepen '{}' coverage: notable demand concentration ({:.1}%)",
                intent, rate
            ));
        }
    }

    if s.avg_detail_len > 0.0 {
        if s.avg_detail_len < 50.0 {
            out.push(format!(
                "Concise response structure: {:.0} characters on average keeps communication fast",
                s.avg_detail_len
            ));
        } else if s.avg_detail_len > 200.0 {
            out.push(format!(
                "Detailed explanation potential: {:.0} characters on average gives thorough answers",
                s.avg_detail_len
            ));
        }
    }

    out
}

/// Thresholds compare counts, so a share of exactly 30% or 40% never triggers.
fn threats(s: &SwotStats) -> Vec<String> {
    let mut out = Vec::new();

    if s.negative * 10 > s.total * 3 {
        out.push(
            "High customer churn risk: the negative experience rate is unacceptable".to_string(),
        );
    }

    if s.unresolved * 10 > s.total * 4 {
        out.push(
            "Brand reputation at risk: the unresolved chat rate undermines customer trust"
                .to_string(),
        );
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labels::ChatType;
    use crate::report::fixtures::{context, mixed_records, record};

    fn with_unresolved(unresolved: usize, total: usize) -> Vec<AnalyzedRecord> {
        (0..total)
            .map(|i| {
                let resolution = if i < unresolved {
                    Resolution::Unresolved
                } else {
                    Resolution::Resolved
                };
                record(
                    &format!("C-{}", i),
                    resolution,
                    Sentiment::Neutral,
                    ChatType::Question,
                    Intent::Order,
                    "Sipariş",
                )
            })
            .collect()
    }

    #[test]
    fn test_stats() {
        let stats = SwotStats::compute(&mixed_records());
        assert_eq!(stats.total, 10);
        assert_eq!(stats.resolved, 6);
        assert_eq!(stats.unresolved, 4);
        assert_eq!(stats.positive, 5);
        assert_eq!(stats.negative, 3);
        assert_eq!(stats.neutral, 2);
        assert_eq!(stats.distinct_intents, 4);
    }

    #[test]
    fn test_unresolved_threat_requires_more_than_forty_percent() {
        let at_forty = SwotAnalysis::compute(&with_unresolved(4, 10));
        assert!(at_forty.threats.iter().all(|t| !t.contains("unresolved")));

        let above = SwotAnalysis::compute(&with_unresolved(5, 10));
        assert!(above.threats.iter().any(|t| t.contains("unresolved")));
    }

    #[test]
    fn test_findings_for_mixed_records() {
        let swot = SwotAnalysis::compute(&mixed_records());

        assert_eq!(
            swot.strengths[0],
            "Good resolution rate (60.0%): core problems are handled effectively"
        );
        assert!(swot.strengths[1].starts_with("Positive customer interaction (50.0%)"));
        assert!(swot.weaknesses[0].starts_with("Severe resolution gap (40.0%)"));
        assert!(swot.weaknesses[1].starts_with("Serious customer dissatisfaction (30.0%)"));
        assert_eq!(
            swot.weaknesses[2],
            "Critical failures on 'Ödeme': 50.0% of unresolved chats"
        );
        assert!(swot.opportunities[0].starts_with("Specialize in 'Kargo': 40.0%"));
        assert!(swot.threats.is_empty());
    }

    #[test]
    fn test_render_numbers_buckets_and_marks_empty_ones() {
        let text = generate_swot(&mixed_records(), &context());

        assert!(text.starts_with("MILA SWOT ANALYSIS\n"));
        assert!(text.contains("- Resolved: 6 (60.0%)\n"));
        assert!(text.contains("STRENGTHS\n--------------------\n1. Good resolution rate"));
        assert!(text.contains("- No threats requiring immediate action identified\n"));
    }

    #[test]
    fn test_empty_records() {
        let swot = SwotAnalysis::compute(&[]);
        assert!(swot.strengths.is_empty());
        assert!(swot.threats.is_empty());
        assert_eq!(swot.stats.avg_detail_len, 0.0);
    }
}
