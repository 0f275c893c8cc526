use anyhow::{anyhow, Result};
use tracing::level_filters::LevelFilter;
use tracing::Level;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};
use tracing_subscriber::EnvFilter;

/// Environment variable that overrides the log filter.
pub const LOG_ENV: &str = "PATHSUB_LOG";

/// Filter directive for the requested verbosity. A trial always reports
/// its moves, so it raises a quieter configured level to info.
pub fn log_level(quiet: bool, verbose: bool, trial: bool, configured: &str) -> &str {
    if quiet {
        "off"
    } else if verbose {
        "debug"
    } else {
        match configured.parse::<LevelFilter>() {
            Ok(level) if trial && level < LevelFilter::INFO => "info",
            _ => configured,
        }
    }
}

/// Install the global subscriber: bare messages, warnings and errors on
/// stderr, everything else on stdout. With `all_to_stderr` stdout is left
/// to the caller, e.g. for JSON output.
pub fn init(level: &str, all_to_stderr: bool) -> Result<()> {
    let filter = match EnvFilter::try_from_env(LOG_ENV) {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level)
            .map_err(|e| anyhow!("Invalid log level {:?}: {}", level, e))?,
    };

    let writer = if all_to_stderr {
        BoxMakeWriter::new(std::io::stderr)
    } else {
        BoxMakeWriter::new(
            std::io::stderr
                .with_max_level(Level::WARN)
                .or_else(std::io::stdout),
        )
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .without_time()
        .with_level(false)
        .with_target(false)
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize logging: {}", e))
}
