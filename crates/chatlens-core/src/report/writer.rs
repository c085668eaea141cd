use std::fs;
use std::path::{Path, PathBuf};

use crate::config::OutputConfig;
use crate::error::{ChatlensError, Result};

use super::Reports;

/// Overwrite `path` with `content`, creating parent directories
pub fn write_report(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| ChatlensError::io_operation("create directory", parent.display(), e))?;
    }
    fs::write(path, content)
        .map_err(|e| ChatlensError::io_operation("write report", path.display(), e))?;
    tracing::debug!(path = %path.display(), bytes = content.len(), "report_written");
    Ok(())
}

/// Write the four text reports to their configured paths
pub fn write_all(reports: &Reports, output: &OutputConfig) -> Result<Vec<PathBuf>> {
    let targets = [
        (&output.swot, &reports.swot),
        (&output.recommendations, &reports.recommendations),
        (&output.demand_summary, &reports.demand_summary),
        (&output.accuracy_report, &reports.accuracy_report),
    ];

    let mut written = Vec::with_capacity(targets.len());
    for (path, content) in targets {
        write_report(path, content)?;
        written.push(path.clone());
    }
    Ok(written)
}
