//! Sequential batch classification with rate limiting.

use std::panic::{self, AssertUnwindSafe};
use std::thread;
use std::time::{Duration, Instant};

use crate::classifier::{Classification, Classify};
use crate::records::AnalyzedRecord;
use crate::trace_time;
use crate::transcript::Transcript;

/// Default pause between groups of classifier calls
pub const DEFAULT_PAUSE: Duration = Duration::from_millis(500);

/// Default group size after which the runner pauses
pub const DEFAULT_PAUSE_EVERY: usize = 3;

/// Result of a batch run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOutcome {
    /// One record per input transcript, in input order
    pub records: Vec<AnalyzedRecord>,
    /// Records whose labels came from a real classification
    pub succeeded: usize,
    pub total: usize,
}

impl BatchOutcome {
    pub fn degraded(&self) -> usize {
        self.total - self.succeeded
    }
}

/// Applies a classifier to every transcript in order
pub struct BatchRunner<C> {
    classifier: C,
    pause: Duration,
    pause_every: usize,
}

impl<C: Classify> BatchRunner<C> {
    pub fn new(classifier: C) -> Self {
        Self {
            classifier,
            pause: DEFAULT_PAUSE,
            pause_every: DEFAULT_PAUSE_EVERY,
        }
    }

    /// Set the rate limit. A zero pause disables sleeping; a group size of 0
    /// is treated as 1.
    pub fn with_pause(mut self, pause: Duration, every: usize) -> Self {
        self.pause = pause;
        self.pause_every = every.max(1);
        self
    }

    pub fn run(&self, transcripts: &[Transcript]) -> BatchOutcome {
        let start = Instant::now();
        let total = transcripts.len();
        let mut records = Vec::with_capacity(total);
        let mut succeeded = 0;

        for (index, transcript) in transcripts.iter().enumerate() {
            let position = index + 1;
            tracing::info!(chat_id = %transcript.chat_id, position, total, "classifying");

            let classification = self.classify_isolated(transcript);
            if classification.degraded {
                tracing::info!(chat_id = %transcript.chat_id, position, total, "fallback applied");
            } else {
                succeeded += 1;
            }
            records.push(AnalyzedRecord::merge(transcript, classification));

            if self.should_pause(position, total) {
                tracing::debug!(pause_ms = self.pause.as_millis() as u64, "rate_limit_pause");
                thread::sleep(self.pause);
            }
        }

        trace_time!(start, "batch_run", total = total);
        tracing::info!(succeeded, total, "batch complete");

        BatchOutcome {
            records,
            succeeded,
            total,
        }
    }

    fn classify_isolated(&self, transcript: &Transcript) -> Classification {
        match panic::catch_unwind(AssertUnwindSafe(|| self.classifier.classify(transcript))) {
            Ok(classification) => classification,
            Err(_) => {
                tracing::warn!(chat_id = %transcript.chat_id, "classifier panicked, using fallback");
                Classification::fallback()
            }
        }
    }

    fn should_pause(&self, position: usize, total: usize) -> bool {
        !self.pause.is_zero() && position % self.pause_every == 0 && position < total
    }
}
