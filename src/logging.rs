use std::fs::File;
use std::sync::Mutex;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::Config;

/// Install the global subscriber. `RUST_LOG` takes precedence over the
/// configured level; events go to stderr and, optionally, to a log file.
pub fn init(config: &Config) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.host.log_level.to_lowercase()));

    let stderr_layer = fmt::layer()
        .with_file(true)
        .with_line_number(true)
        .with_writer(std::io::stderr);

    let file_layer = if config.logging.log_to_file {
        let file = File::create(&config.logging.log_file_path)?;
        Some(
            fmt::layer()
                .with_ansi(false)
                .with_file(true)
                .with_line_number(true)
                .with_writer(Mutex::new(file)),
        )
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()?;

    Ok(())
}
