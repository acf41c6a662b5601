//! Tracing setup: stderr at the `-v` level, plus an optional rolling log file.

use std::path::Path;

use tracing::Level;
use tracing::level_filters::LevelFilter;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{Layer, fmt};

use stmt_core::models::config::LoggingConfig;

/// Console level for a `-v` count.
pub fn console_level(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Daily-rotated appender for `path`: `<dir>/<stem>.<date>.<ext>`.
pub fn file_appender(path: &Path, max_files: usize) -> anyhow::Result<RollingFileAppender> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("stmt");

    let mut builder = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(stem)
        .max_log_files(max_files.max(1));
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        builder = builder.filename_suffix(ext);
    }

    Ok(builder.build(dir)?)
}

/// Install the global subscriber.
pub fn init(verbose: u8, config: &LoggingConfig) -> anyhow::Result<()> {
    let console = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(LevelFilter::from_level(console_level(verbose)));

    let file = match &config.file {
        Some(path) => {
            let level: LevelFilter = config
                .level
                .parse()
                .map_err(|e| anyhow::anyhow!("invalid logging.level {:?}: {}", config.level, e))?;
            let appender = file_appender(path, config.max_files)?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_writer(appender)
                    .with_filter(level),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(console)
        .with(file)
        .try_init()?;

    Ok(())
}
