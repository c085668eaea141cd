//! Chatlens - batch classification and reporting for support chats
//!
//! Labels every transcript of a chat export with an LLM, measures the labels
//! against ground truth, and writes a spreadsheet plus four text reports.

mod cli;
mod commands;

use std::env;
use std::process::ExitCode;
use std::time::Instant;

use clap::error::ErrorKind;
use clap::Parser;

use chatlens_core::error::{ChatlensError, ExitCode as ChatlensExitCode};
use chatlens_core::logging;
use cli::{Cli, OutputFormat};

fn main() -> ExitCode {
    let start = Instant::now();

    let json_errors = argv_requests_json(env::args().skip(1));

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // clap can fail before `Cli.format` exists; honour a JSON request
        // seen on the raw argv
        Err(err) if json_errors && !is_informational(&err) => {
            let error = usage_error_from(&err);
            eprintln!("{}", error.to_json());
            return ExitCode::from(error.exit_code() as u8);
        }
        Err(err) => err.exit(),
    };

    if let Err(e) = logging::init_tracing(cli.verbose, cli.log_level.as_deref(), cli.log_json) {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    tracing::debug!(elapsed = ?start.elapsed(), "parse_args");

    match commands::dispatch::run(&cli, start) {
        Ok(()) => ExitCode::from(ChatlensExitCode::Success as u8),
        Err(e) => {
            if cli.format == OutputFormat::Json {
                eprintln!("{}", e.to_json());
            } else if !cli.quiet {
                eprintln!("error: {}", e);
            }

            ExitCode::from(e.exit_code() as u8)
        }
    }
}

fn is_informational(err: &clap::Error) -> bool {
    matches!(
        err.kind(),
        ErrorKind::DisplayHelp
            | ErrorKind::DisplayVersion
            | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
    )
}

fn usage_error_from(err: &clap::Error) -> ChatlensError {
    match err.kind() {
        ErrorKind::ValueValidation
        | ErrorKind::InvalidValue
        | ErrorKind::InvalidSubcommand
        | ErrorKind::UnknownArgument
        | ErrorKind::MissingRequiredArgument
        | ErrorKind::MissingSubcommand
        | ErrorKind::ArgumentConflict => ChatlensError::UsageError(err.to_string()),
        _ => ChatlensError::Other(err.to_string()),
    }
}

fn argv_requests_json<I: IntoIterator<Item = String>>(args: I) -> bool {
    let args: Vec<String> = args.into_iter().collect();
    args.iter().enumerate().any(|(i, arg)| {
        arg == "--format=json"
            || (arg == "--format" && args.get(i + 1).is_some_and(|v| v == "json"))
    })
}
