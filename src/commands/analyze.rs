//! `chatlens analyze`: the full classification pipeline

use std::path::PathBuf;
use std::time::{Duration, Instant};

use serde_json::json;

use chatlens_core::batch::{BatchOutcome, BatchRunner};
use chatlens_core::classifier::{
    load_system_prompt, ClassifierBackend, ClassifierGateway, EchoBackend, OpenAiBackend,
};
use chatlens_core::config::ChatlensConfig;
use chatlens_core::error::{ChatlensError, Result};
use chatlens_core::records::{attach_ground_truth, save_records, RecordSet};
use chatlens_core::report::{generate_all, write_all, ReportContext, Reports};
use chatlens_core::spreadsheet::write_spreadsheet;
use chatlens_core::transcript::{
    ground_truth_from_transcripts, load_ground_truth, load_transcripts, GroundTruthRecord,
    Transcript,
};
use chatlens_core::trace_time;

use super::summary::{accuracy_json, print_accuracy, Artifacts};
use crate::cli::{Cli, OutputFormat};

/// Model label recorded for offline runs
const OFFLINE_MODEL: &str = "offline";

pub fn execute(cli: &Cli, config: &ChatlensConfig, offline: bool, start: Instant) -> Result<()> {
    let input = &config.input.transcripts;
    let transcripts = load_transcripts(input)?;
    if transcripts.is_empty() {
        return Err(ChatlensError::invalid_input(input, "no transcripts"));
    }
    let ground_truth = ground_truth_for(config, &transcripts)?;

    let backend = build_backend(config, offline, &transcripts)?;
    tracing::info!(
        backend = backend.name(),
        model = %config.classifier.model,
        chats = transcripts.len(),
        "analyze_start"
    );

    let gateway = ClassifierGateway::new(
        backend,
        load_system_prompt(&config.classifier.system_prompt_path),
    )
    .with_max_prompt_chars(config.classifier.max_prompt_chars);
    let runner = BatchRunner::new(gateway).with_pause(
        Duration::from_millis(config.batch.pause_ms),
        config.batch.pause_every,
    );
    let outcome = runner.run(&transcripts);
    trace_time!(start, "classify");

    let model = if offline {
        OFFLINE_MODEL
    } else {
        config.classifier.model.as_str()
    };
    let mut records = outcome.records.clone();
    if config.input.ground_truth.is_some() {
        attach_ground_truth(&mut records, &ground_truth);
    }
    let set = RecordSet::new(model, records);
    let ctx = ReportContext::from_config(config, model);
    let reports = generate_all(&set.records, &ground_truth, &ctx);
    let artifacts = write_outputs(config, &set, &reports)?;
    trace_time!(start, "write_outputs");

    print_result(cli, &set, &outcome, &reports, &artifacts);
    Ok(())
}

fn build_backend(
    config: &ChatlensConfig,
    offline: bool,
    transcripts: &[Transcript],
) -> Result<Box<dyn ClassifierBackend>> {
    if offline {
        return Ok(Box::new(EchoBackend::from_transcripts(transcripts)));
    }
    let backend = OpenAiBackend::from_config(&config.classifier)
        .map_err(|e| ChatlensError::Classifier(e.to_string()))?;
    Ok(Box::new(backend))
}

fn ground_truth_for(
    config: &ChatlensConfig,
    transcripts: &[Transcript],
) -> Result<Vec<GroundTruthRecord>> {
    match &config.input.ground_truth {
        Some(path) => load_ground_truth(path),
        None => Ok(ground_truth_from_transcripts(transcripts)),
    }
}

fn write_outputs(config: &ChatlensConfig, set: &RecordSet, reports: &Reports) -> Result<Artifacts> {
    let records: PathBuf = config.output.records.clone();
    save_records(&records, set)?;
    let spreadsheet = write_spreadsheet(&set.records, &config.output.spreadsheet)?;
    let reports = write_all(reports, &config.output)?;

    Ok(Artifacts {
        spreadsheet,
        records: Some(records),
        reports,
    })
}

fn print_result(
    cli: &Cli,
    set: &RecordSet,
    outcome: &BatchOutcome,
    reports: &Reports,
    artifacts: &Artifacts,
) {
    match cli.format {
        OutputFormat::Json => {
            let output = json!({
                "run_id": set.run_id,
                "model": set.model,
                "total": outcome.total,
                "succeeded": outcome.succeeded,
                "degraded": outcome.degraded(),
                "accuracy": accuracy_json(&reports.accuracy),
                "outputs": artifacts.to_json(),
            });
            println!("{}", output);
        }
        OutputFormat::Human => {
            if cli.quiet {
                return;
            }
            println!(
                "Analyzed {} chats: {} classified, {} fallback",
                outcome.total,
                outcome.succeeded,
                outcome.degraded()
            );
            print_accuracy(&reports.accuracy);
            artifacts.print_human();
        }
    }
}
