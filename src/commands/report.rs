//! `chatlens report`: rebuild reports and the spreadsheet from saved records

use std::path::Path;

use serde_json::json;

use chatlens_core::config::ChatlensConfig;
use chatlens_core::error::Result;
use chatlens_core::records::{attach_ground_truth, embedded_ground_truth, load_records};
use chatlens_core::report::{generate_all, write_all, ReportContext};
use chatlens_core::spreadsheet::write_spreadsheet;
use chatlens_core::transcript::load_ground_truth;

use super::summary::{accuracy_json, print_accuracy, Artifacts};
use crate::cli::{Cli, OutputFormat};

pub fn execute(
    cli: &Cli,
    config: &ChatlensConfig,
    records_path: &Path,
    ground_truth: Option<&Path>,
) -> Result<()> {
    let mut set = load_records(records_path)?;
    let ground_truth = match ground_truth {
        Some(path) => {
            let truth = load_ground_truth(path)?;
            attach_ground_truth(&mut set.records, &truth);
            truth
        }
        None => embedded_ground_truth(&set.records),
    };

    let ctx = ReportContext::from_config(config, &set.model);
    let reports = generate_all(&set.records, &ground_truth, &ctx);
    let spreadsheet = write_spreadsheet(&set.records, &config.output.spreadsheet)?;
    let written = write_all(&reports, &config.output)?;
    tracing::info!(run_id = %set.run_id, records = set.records.len(), "reports_regenerated");

    let artifacts = Artifacts {
        spreadsheet,
        records: None,
        reports: written,
    };

    match cli.format {
        OutputFormat::Json => {
            let output = json!({
                "run_id": set.run_id,
                "model": set.model,
                "total": set.records.len(),
                "accuracy": accuracy_json(&reports.accuracy),
                "outputs": artifacts.to_json(),
            });
            println!("{}", output);
        }
        OutputFormat::Human => {
            if !cli.quiet {
                println!(
                    "Regenerated reports for {} ({} chats)",
                    set.run_id,
                    set.records.len()
                );
                print_accuracy(&reports.accuracy);
                artifacts.print_human();
            }
        }
    }
    Ok(())
}
