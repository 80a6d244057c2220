//! File logging setup. The terminal belongs to the UI, so logs go to a file.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*, EnvFilter};

/// Default log file name, created in the working directory.
pub const LOG_FILE: &str = concat!(env!("CARGO_PKG_NAME"), ".log");

/// Initialize logging. `level` overrides `RUST_LOG`; the default is WARN.
pub fn init(
    custom_log_path: Option<PathBuf>,
    level: Option<tracing::Level>,
) -> Result<(), Box<dyn std::error::Error>> {
    let log_path = match custom_log_path {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            path
        }
        None => std::env::current_dir()?.join(LOG_FILE),
    };

    let env_filter = match level {
        Some(lvl) => EnvFilter::builder()
            .with_default_directive(LevelFilter::from_level(lvl).into())
            .parse_lossy(""),
        None => EnvFilter::builder()
            .with_default_directive(LevelFilter::WARN.into())
            .from_env_lossy(),
    };

    let file = OpenOptions::new().create(true).append(true).open(&log_path)?;
    let file_layer = fmt::layer()
        .with_file(true)
        .with_line_number(true)
        .with_writer(Mutex::new(file))
        .with_target(false)
        .with_ansi(false)
        .with_filter(env_filter);

    tracing_subscriber::registry().with(file_layer).try_init()?;
    Ok(())
}
