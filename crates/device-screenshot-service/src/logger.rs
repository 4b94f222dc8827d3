//! Logger writing to stdout and a log file.

use std::path::Path;

use tracing::{
    Level, info,
    subscriber::{SetGlobalDefaultError, set_global_default},
};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{filter::Targets, fmt::format::FmtSpan, layer::SubscriberExt};

const LOG_FILE: &str = "device-screenshot.log";

/// Register the global logger.
///
/// The returned guards must be held for the lifetime of the process; dropping
/// them flushes and detaches the writers.
pub fn setup_logger(
    log_dir: &Path,
    debug: bool,
) -> Result<[WorkerGuard; 2], SetGlobalDefaultError> {
    let level = if debug { Level::DEBUG } else { Level::INFO };
    let filter = Targets::new().with_default(level);

    // stdout logger
    let (std_writer, std_guard) = tracing_appender::non_blocking(std::io::stdout());
    let std_logger = tracing_subscriber::fmt::layer()
        .with_writer(std_writer)
        .with_ansi(false)
        .with_target(false)
        .with_span_events(FmtSpan::CLOSE | FmtSpan::ENTER);

    // file logger
    let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE);
    let (file_writer, file_guard) = tracing_appender::non_blocking(file_appender);
    let file_logger = tracing_subscriber::fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_span_events(FmtSpan::CLOSE | FmtSpan::ENTER);

    // Register loggers
    let collector = tracing_subscriber::registry()
        .with(std_logger)
        .with(file_logger)
        .with(filter);

    set_global_default(collector)?;

    info!("Logger initialised");
    Ok([std_guard, file_guard])
}
