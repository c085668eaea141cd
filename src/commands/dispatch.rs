//! Command dispatch logic for chatlens
use std::time::Instant;

use chatlens_core::config::ChatlensConfig;
use chatlens_core::error::Result;

use crate::cli::{Cli, Commands};
use crate::commands;

pub fn run(cli: &Cli, start: Instant) -> Result<()> {
    let mut config = ChatlensConfig::discover(cli.config.as_deref())?;
    config.apply_env();

    tracing::debug!(elapsed = ?start.elapsed(), "load_config");

    match &cli.command {
        Commands::Analyze {
            input,
            ground_truth,
            offline,
            pause_ms,
            model,
        } => {
            if let Some(path) = input {
                config.input.transcripts = path.clone();
            }
            if let Some(path) = ground_truth {
                config.input.ground_truth = Some(path.clone());
            }
            if let Some(ms) = pause_ms {
                config.batch.pause_ms = *ms;
            }
            if let Some(model) = model {
                config.classifier.model = model.clone();
            }
            config.validate()?;
            commands::analyze::execute(cli, &config, *offline, start)
        }

        Commands::Report {
            records,
            ground_truth,
        } => {
            config.validate()?;
            let records = records.as_deref().unwrap_or(config.output.records.as_path());
            commands::report::execute(cli, &config, records, ground_truth.as_deref())
        }

        Commands::Accuracy {
            records,
            ground_truth,
        } => {
            config.validate()?;
            let records = records.as_deref().unwrap_or(config.output.records.as_path());
            commands::accuracy::execute(cli, records, ground_truth.as_deref())
        }
    }
}
