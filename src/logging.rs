use anyhow::{anyhow, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Overrides the configured level, e.g. `GREBASE_LOG=grebase=debug`.
pub const LOG_ENV: &str = "GREBASE_LOG";
const LOG_FILE: &str = "grebase.log";

/// Logs go to a file so they never draw over the TUI; tail it with
/// `tail -f $TMPDIR/grebase.log`. Keep the guard alive until exit.
pub fn init(default_level: &str) -> Result<WorkerGuard> {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let file_appender = tracing_appender::rolling::never(std::env::temp_dir(), LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_env_filter(filter)
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow!("Failed to initialise logging: {e}"))?;
    Ok(guard)
}
