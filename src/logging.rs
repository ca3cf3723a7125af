use std::fs::OpenOptions;

use anyhow::{Context, Result};
use env_logger::{Builder, Target};

use crate::config::AppConfig;

/// Installs the process logger: appends to `config.log_file` when set,
/// otherwise writes to stderr. The filter is `config.log_level` alone;
/// `RUST_LOG` is not consulted.
pub fn init(config: &AppConfig) -> Result<()> {
    let mut builder = builder(config)?;
    builder.try_init().context("logger already initialized")?;
    Ok(())
}

pub fn builder(config: &AppConfig) -> Result<Builder> {
    let mut builder = Builder::new();
    builder.parse_filters(&config.log_level);

    if let Some(path) = &config.log_file {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("failed to open log file {path}"))?;
        builder.target(Target::Pipe(Box::new(file)));
    }

    Ok(builder)
}
