//! Structured logging setup shared by the binary and tests.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding a full filter, overriding the CLI flags
pub const LOG_ENV_VAR: &str = "CHATLENS_LOG";

/// HTTP client crates kept at `warn` unless named explicitly
const NOISY_TARGETS: [&str; 2] = ["ureq", "rustls"];

/// Log the time since `$start` for a named pipeline phase.
///
/// ```rust,ignore
/// let start = Instant::now();
/// trace_time!(start, "batch_run", total = transcripts.len());
/// ```
#[macro_export]
macro_rules! trace_time {
    ($start:expr, $phase:expr $(, $field:ident = $value:expr)* $(,)?) => {
        tracing::trace!(
            phase = $phase,
            elapsed_ms = $start.elapsed().as_millis() as u64
            $(, $field = $value)*,
            "phase_done"
        )
    };
}

/// Filter directives for the given flags.
///
/// A bare level (`debug`) applies to the chatlens crates only; anything
/// containing `=` or `,` is taken as a full directive list.
pub fn filter_directives(verbose: bool, log_level: Option<&str>) -> String {
    let level = match log_level.map(str::trim).filter(|l| !l.is_empty()) {
        Some(custom) if custom.contains('=') || custom.contains(',') => {
            return custom.to_string()
        }
        Some(level) => level,
        None if verbose => "debug",
        None => "warn",
    };

    let mut directives = vec![format!("chatlens={level}"), format!("chatlens_core={level}")];
    directives.extend(NOISY_TARGETS.iter().map(|t| format!("{t}=warn")));
    directives.join(",")
}

/// Install the global subscriber. Logs always go to stderr so stdout stays
/// machine-readable.
pub fn init_tracing(
    verbose: bool,
    log_level: Option<&str>,
    log_json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let filter = match EnvFilter::try_from_env(LOG_ENV_VAR) {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(filter_directives(verbose, log_level))?,
    };
    let registry = tracing_subscriber::registry().with(filter);

    if log_json {
        let layer = fmt::layer()
            .json()
            .with_current_span(false)
            .with_writer(std::io::stderr);
        registry.with(layer).try_init()?;
    } else {
        let layer = fmt::layer()
            .compact()
            .with_target(false)
            .without_time()
            .with_ansi(false)
            .with_writer(std::io::stderr);
        registry.with(layer).try_init()?;
    }
    Ok(())
}
