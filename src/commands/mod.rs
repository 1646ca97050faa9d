//! CLI command implementations.

pub mod add;
pub mod buckets;
pub mod dump;
pub mod fetch;
pub mod list;
pub mod purge;
pub mod query;
pub mod scan;

use anyhow::{Context, Result};
use chrono::Utc;
use std::path::Path;

use crate::record::Record;
use crate::report::{render, OutputFormat, Template};
use crate::storage::Storage;

/// Open (or create) the database, creating its directory if needed.
///
/// Failure here is fatal to the process: there is nothing useful to do
/// without the store.
pub fn open_storage(path: &Path) -> Result<Storage> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create database directory: {:?}", parent))?;
        }
    }
    Storage::open(path).with_context(|| format!("Failed to open database: {:?}", path))
}

/// Render records for stdout, a template taking precedence over the format.
pub(crate) fn format_records(
    records: &[Record],
    format: &str,
    template: Option<&str>,
) -> Result<String> {
    let now = Utc::now();
    if let Some(source) = template {
        return Ok(Template::new(source).render(records, now));
    }
    let format: OutputFormat = format.parse().map_err(|e: String| anyhow::anyhow!(e))?;
    Ok(render(records, format, now))
}
