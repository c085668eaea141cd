use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::{ChatlensError, Result};

use super::types::{GroundTruthRecord, Transcript};

/// Load every transcript from a JSON array file
pub fn load_transcripts(path: &Path) -> Result<Vec<Transcript>> {
    let content = read_input(path)?;
    let transcripts: Vec<Transcript> =
        serde_json::from_str(&content).map_err(|e| ChatlensError::invalid_input(path, e))?;

    tracing::debug!(path = %path.display(), count = transcripts.len(), "transcripts_loaded");
    Ok(transcripts)
}

/// Load a ground-truth list kept apart from the transcripts
pub fn load_ground_truth(path: &Path) -> Result<Vec<GroundTruthRecord>> {
    let content = read_input(path)?;
    let records: Vec<GroundTruthRecord> =
        serde_json::from_str(&content).map_err(|e| ChatlensError::invalid_input(path, e))?;

    tracing::debug!(path = %path.display(), count = records.len(), "ground_truth_loaded");
    Ok(records)
}

/// Ground-truth entries for every transcript that carries labels
pub fn ground_truth_from_transcripts(transcripts: &[Transcript]) -> Vec<GroundTruthRecord> {
    transcripts
        .iter()
        .filter_map(Transcript::ground_truth_record)
        .collect()
}

fn read_input(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => ChatlensError::InputNotFound {
            path: path.to_path_buf(),
        },
        _ => ChatlensError::io_operation("read", path.display(), e),
    })
}
