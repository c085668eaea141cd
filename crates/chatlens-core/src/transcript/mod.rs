//! Chat transcripts: the raw input of a run.

mod loader;
mod types;

pub use loader::{ground_truth_from_transcripts, load_ground_truth, load_transcripts};
pub use types::{
    format_duration, parse_timestamp, GroundTruth, GroundTruthRecord, Message, Speaker,
    Transcript, TIMESTAMP_FORMAT,
};

#[cfg(test)]
mod tests;
