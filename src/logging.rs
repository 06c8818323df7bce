use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "INKDASH_LOG";
pub const LOG_FILE: &str = "inkdash.log";

/// Routes tracing output to `<dir>/inkdash.log`; stdout belongs to the TUI.
///
/// Returns the writer guard, which must be kept alive for the process
/// lifetime, or `None` when a global subscriber is already installed.
pub fn init_file_logging(dir: &Path) -> std::io::Result<Option<WorkerGuard>> {
    std::fs::create_dir_all(dir)?;

    let file_appender = tracing_appender::rolling::never(dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    match tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
    {
        Ok(()) => Ok(Some(guard)),
        Err(_) => Ok(None),
    }
}
