//! Tracing setup: one ANSI console layer plus one plain-text file layer.
//!
//! Both layers share a single filter, taken from `RUST_LOG` when set and
//! [`DEFAULT_FILTER`] otherwise. The log file is opened in append mode so
//! consecutive runs accumulate in one place.

use crate::utils::ensure_parent_dir;
use std::error::Error;
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt as tfmt};

/// Debug output for this crate, info for dependencies (hyper, mongodb, ...).
pub const DEFAULT_FILTER: &str = "info,news_ingest=debug";

/// Install the global subscriber, logging to the console and to `log_file`.
pub fn init(log_file: &str) -> Result<(), Box<dyn Error>> {
    ensure_parent_dir(log_file)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let console = tfmt::layer()
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(UtcTime::rfc_3339());

    let file_layer = tfmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_timer(UtcTime::rfc_3339())
        .with_writer(Mutex::new(file));

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file_layer)
        .try_init()?;
    Ok(())
}
