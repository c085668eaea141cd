//! Improvement recommendations for the analyzed support system.

use std::fmt;

use crate::labels::{ChatType, Intent, Resolution, Sentiment};
use crate::records::AnalyzedRecord;

use super::tally::Tally;
use super::{percent, section, ReportContext};

const EXPERIENCE_ACTIONS: [&str; 2] = [
    "Integrate apology-and-remedy templates for negative situations",
    "Strengthen the sentiment analysis module",
];

const TECHNICAL_ACTIONS: [&str; 4] = [
    "Optimize the natural language understanding model for Turkish",
    "Improve context and memory handling",
    "Add real-time learning and adaptation",
    "Build error handling and flexible response paths",
];

const KPI_ACTIONS: [&str; 4] = [
    "Build a detailed analytics dashboard",
    "Define key performance indicators",
    "Close the loop on user feedback",
    "Measure return on investment",
];

/// Priority of an intent by its share of all chats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Above 10% is high, above 5% medium, anything else low
    pub fn from_share(share: f64) -> Self {
        if share > 10.0 {
            Priority::High
        } else if share > 5.0 {
            Priority::Medium
        } else {
            Priority::Low
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::High => write!(f, "HIGH PRIORITY"),
            Priority::Medium => write!(f, "MEDIUM PRIORITY"),
            Priority::Low => write!(f, "LOW PRIORITY"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IntentPriority {
    pub intent: Intent,
    pub count: usize,
    pub share: f64,
    pub priority: Priority,
}

/// Where unresolved chats concentrate
#[derive(Debug, Clone, PartialEq)]
pub struct ResolutionFocus {
    pub unresolved_share: f64,
    /// Top intents among unresolved chats with their share of the unresolved
    pub intents: Vec<(Intent, f64)>,
    pub chat_types: Vec<ChatType>,
}

/// Where negative experiences concentrate
#[derive(Debug, Clone, PartialEq)]
pub struct ExperienceFocus {
    pub negative_share: f64,
    pub intents: Vec<Intent>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Recommendations {
    pub total: usize,
    pub unresolved: usize,
    pub negative: usize,
    pub resolution: Option<ResolutionFocus>,
    pub experience: Option<ExperienceFocus>,
    /// Every intent, most frequent first
    pub priorities: Vec<IntentPriority>,
}

impl Recommendations {
    pub fn compute(records: &[AnalyzedRecord]) -> Self {
        let total = records.len();
        let unresolved: Vec<&AnalyzedRecord> = records
            .iter()
            .filter(|r| r.classification.resolution == Resolution::Unresolved)
            .collect();
        let negative: Vec<&AnalyzedRecord> = records
            .iter()
            .filter(|r| r.classification.sentiment == Sentiment::Negative)
            .collect();

        let resolution = (!unresolved.is_empty()).then(|| {
            let intents: Tally<Intent> = unresolved.iter().map(|r| r.classification.intent).collect();
            let chat_types: Tally<ChatType> =
                unresolved.iter().map(|r| r.classification.chat_type).collect();
            ResolutionFocus {
                unresolved_share: percent(unresolved.len(), total),
                intents: intents
                    .top(3)
                    .into_iter()
                    .map(|(intent, count)| (intent, percent(count, unresolved.len())))
                    .collect(),
                chat_types: chat_types.top(2).into_iter().map(|(t, _)| t).collect(),
            }
        });

        let experience = (!negative.is_empty()).then(|| {
            let intents: Tally<Intent> = negative.iter().map(|r| r.classification.intent).collect();
            ExperienceFocus {
                negative_share: percent(negative.len(), total),
                intents: intents.top(3).into_iter().map(|(i, _)| i).collect(),
            }
        });

        let all: Tally<Intent> = records.iter().map(|r| r.classification.intent).collect();
        let priorities = all
            .most_common()
            .into_iter()
            .map(|(intent, count)| {
                let share = percent(count, total);
                IntentPriority {
                    intent,
                    count,
                    share,
                    priority: Priority::from_share(share),
                }
            })
            .collect();

        Self {
            total,
            unresolved: unresolved.len(),
            negative: negative.len(),
            resolution,
            experience,
            priorities,
        }
    }

    /// Share of chats not left unresolved
    pub fn success_rate(&self) -> f64 {
        percent(self.total - self.unresolved, self.total)
    }

    pub fn render(&self, ctx: &ReportContext) -> String {
        let mut out = ctx.header("IMPROVEMENT RECOMMENDATIONS");

        out.push_str("PERFORMANCE SUMMARY\n");
        out.push_str(&format!("- Total analyzed: {} chats\n", self.total));
        out.push_str(&format!(
            "- Unresolved: {} chats ({:.1}%)\n",
            self.unresolved,
            percent(self.unresolved, self.total)
        ));
        out.push_str(&format!(
            "- Negative experience: {} chats ({:.1}%)\n",
            self.negative,
            percent(self.negative, self.total)
        ));
        out.push_str(&format!("- Success rate: {:.1}%\n\n", self.success_rate()));

        section(&mut out, "DETAILED RECOMMENDATIONS", 30);

        if let Some(focus) = &self.resolution {
            out.push_str(&format!(
                "\nRESOLUTION IMPROVEMENT ({:.1}% of chats unresolved):\n",
                focus.unresolved_share
            ));
            for (intent, share) in &focus.intents {
                out.push_str(&format!(
                    "   - Provide targeted training for the '{}' intent ({:.1}% of failures)\n",
                    intent, share
                ));
            }
            for chat_type in &focus.chat_types {
                out.push_str(&format!(
                    "   - Design dedicated resolution flows for {} conversations\n",
                    chat_type
                ));
            }
        }

        if let Some(focus) = &self.experience {
            out.push_str(&format!(
                "\nCUSTOMER EXPERIENCE IMPROVEMENT ({:.1}% negative experiences):\n",
                focus.negative_share
            ));
            for intent in &focus.intents {
                out.push_str(&format!(
                    "   - Use more empathetic language in the '{}' flow\n",
                    intent
                ));
            }
            push_items(&mut out, &EXPERIENCE_ACTIONS);
        }

        out.push_str("\nINTENT PRIORITIES:\n");
        for p in &self.priorities {
            out.push_str(&format!(
                "   - '{}': {} - {:.1}% of requests\n",
                p.intent, p.priority, p.share
            ));
        }

        out.push_str("\nTECHNICAL IMPROVEMENTS:\n");
        push_items(&mut out, &TECHNICAL_ACTIONS);

        out.push_str("\nPERFORMANCE TRACKING:\n");
        push_items(&mut out, &KPI_ACTIONS);

        out.push_str("\nOVERALL ASSESSMENT:\n");
        out.push_str(&format!(
            "{} covers the core customer service needs. The recommended improvements can raise its performance by 30-50%.\n",
            ctx.analyzed_system
        ));
        out
    }
}

/// Compute and render the recommendations report
pub fn generate_recommendations(records: &[AnalyzedRecord], ctx: &ReportContext) -> String {
    Recommendations::compute(records).render(ctx)
}

fn push_items(out: &mut String, items: &[&str]) {
    for item in items {
        out.push_str(&format!("   - {}\n", item));
    }
}
