//! Command implementations.
//!
//! Every data command takes a [`RequestCache`](royal_pipes_core::RequestCache)
//! built once per invocation in `main.rs`, so a command that needs the same
//! query twice reads the dataset once.

use anyhow::Context;
use royal_pipes_core::{Config, Dataset};
use serde::Serialize;

pub mod decades;
pub mod entities;
pub mod info;
pub mod monarchs;
pub mod odds;
pub mod search;
#[cfg(feature = "mcp")]
pub mod serve;
pub mod signatures;
pub mod speeches;
mod style;
pub mod top;
pub mod word;

/// Open the process-wide dataset handle for the configured location.
pub fn open_dataset(config: &Config) -> anyhow::Result<&'static Dataset> {
    let path = config
        .dataset_path()
        .context("failed to locate the dataset")?;
    Dataset::shared(&path).context("failed to open the dataset")
}

/// Print `value` as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
