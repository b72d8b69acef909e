//! Logging Infrastructure
//!
//! Subscriber setup for hosts embedding the attribute engine. `RUST_LOG`
//! overrides the level passed in.

use std::path::Path;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

/// Initialize the logger at info level on stdout
pub fn init_logger() {
    init_logger_with_file(None, None, None);
}

/// Initialize the logger with optional JSON format and daily-rolling file output
///
/// A second call is ignored; the first subscriber stays installed.
pub fn init_logger_with_file(log_level: Option<&str>, json: Option<bool>, log_dir: Option<&str>) {
    let level = log_level.unwrap_or("info");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let writer = match log_dir.map(Path::new).filter(|p| p.is_dir()) {
        Some(dir) => BoxMakeWriter::new(tracing_appender::rolling::daily(dir, "rubric")),
        None => BoxMakeWriter::new(std::io::stdout),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false)
        .with_writer(writer);

    let installed = if json.unwrap_or(false) {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    if installed.is_err() {
        tracing::debug!("Logger already initialized");
    }
}
