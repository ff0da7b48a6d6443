// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow};
use std::env;
use std::fs::{self, File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "STOCKROOM_LOG";

/// `STOCKROOM_LOG` wins over the configured level when it is set and non-blank.
pub fn env_filter(config_level: &str) -> Result<EnvFilter> {
    filter_from(env::var(LOG_ENV).ok().as_deref(), config_level)
}

fn filter_from(env_directive: Option<&str>, config_level: &str) -> Result<EnvFilter> {
    match env_directive.map(str::trim) {
        Some(directive) if !directive.is_empty() => EnvFilter::try_new(directive)
            .with_context(|| format!("{LOG_ENV}={directive:?} is not a valid log filter")),
        _ => EnvFilter::try_new(config_level)
            .with_context(|| format!("log level {config_level:?} is not a valid log filter")),
    }
}

pub fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("create log directory {}", parent.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| {
            format!(
                "open log file {} -- set [log].path in the config to a writable file",
                path.display()
            )
        })
}

/// Installs the global subscriber. The terminal belongs to the TUI, so events
/// go to a plain-text file.
pub fn init(filter: EnvFilter, path: &Path) -> Result<()> {
    let file = open_log_file(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|error| anyhow!("install log subscriber: {error}"))
}
