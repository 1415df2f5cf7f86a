use anyhow::{Context, Result};
use flexi_logger::{Logger, LoggerHandle};

/// Starts the stderr logger. Keep the handle alive for the process lifetime.
pub fn init_logging(spec: &str, verbose: bool) -> Result<LoggerHandle> {
    let spec = if verbose { "debug" } else { spec };
    Logger::try_with_str(spec)
        .with_context(|| format!("invalid log spec `{}`", spec))?
        .log_to_stderr()
        .start()
        .context("failed to start logger")
}
