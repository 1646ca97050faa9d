//! Add command implementation.
//!
//! Addresses come from the command line or, when none are given, from
//! standard input one per line. A bad address is logged and skipped; the
//! rest of the batch still goes in.

use anyhow::{Context, Result};
use chrono::Duration;
use std::io::{self, BufRead};
use tracing::{info, warn};

use crate::error::Error;
use crate::record::Record;
use crate::storage::Storage;
use crate::utils::format_count_with_separator;
use crate::validation::{parse_ttl, validate_bucket};

/// Outcome of a batch add
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AddSummary {
    pub added: usize,
    pub rejected: usize,
}

/// Run the add command
pub fn run(
    storage: &Storage,
    bucket: &str,
    addresses: &[String],
    ttl: &str,
    description: &str,
) -> Result<()> {
    validate_bucket(bucket)?;
    let ttl = parse_ttl(ttl).context("Could not parse TTL")?;

    let summary = if addresses.is_empty() {
        let stdin = io::stdin();
        add_lines(storage, bucket, stdin.lock(), ttl, description)?
    } else {
        add_all(
            storage,
            bucket,
            addresses.iter().map(String::as_str),
            ttl,
            description,
        )?
    };

    info!(
        "Added {} address(es) to '{}', rejected {}",
        format_count_with_separator(summary.added),
        bucket,
        format_count_with_separator(summary.rejected)
    );
    Ok(())
}

/// Add every address from `input`, one per line.
///
/// Blank lines and `#` comments are skipped.
pub fn add_lines<R: BufRead>(
    storage: &Storage,
    bucket: &str,
    input: R,
    ttl: Duration,
    description: &str,
) -> Result<AddSummary> {
    let mut summary = AddSummary::default();
    for line in input.lines() {
        let line = line.context("Failed to read standard input")?;
        let address = line.trim();
        if address.is_empty() || address.starts_with('#') {
            continue;
        }
        add_one(storage, bucket, address, ttl, description, &mut summary)?;
    }
    Ok(summary)
}

/// Add each address in `addresses`.
pub fn add_all<'a, I>(
    storage: &Storage,
    bucket: &str,
    addresses: I,
    ttl: Duration,
    description: &str,
) -> Result<AddSummary>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut summary = AddSummary::default();
    for address in addresses {
        add_one(storage, bucket, address, ttl, description, &mut summary)?;
    }
    Ok(summary)
}

/// Validation failures are counted and logged; storage failures abort.
fn add_one(
    storage: &Storage,
    bucket: &str,
    address: &str,
    ttl: Duration,
    description: &str,
    summary: &mut AddSummary,
) -> Result<()> {
    let record = match Record::new(address, ttl, description) {
        Ok(record) => record,
        Err(e) => {
            warn!("{}", e);
            summary.rejected += 1;
            return Ok(());
        }
    };

    match storage.add(bucket, &record) {
        Ok(()) => {
            summary.added += 1;
            Ok(())
        }
        Err(Error::Validation(e)) => {
            warn!("{}", e);
            summary.rejected += 1;
            Ok(())
        }
        Err(e) => Err(e).with_context(|| format!("Failed to add {} to '{}'", address, bucket)),
    }
}
