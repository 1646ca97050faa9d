//! Scan command implementation.
//!
//! Reads each configured log source, extracts candidate addresses and
//! denylists them in the configured bucket.

use anyhow::{Context, Result};
use chrono::Utc;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info, warn};

use super::{list, open_storage};
use crate::config::Config;
use crate::error::Error;
use crate::record::Record;
use crate::report::{render, OutputFormat, Template};
use crate::scanner::Scanner;
use crate::storage::Storage;
use crate::utils::format_count_with_separator;

/// Totals for one scan run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScanSummary {
    pub lines: usize,
    pub added: usize,
    pub rejected: usize,
}

/// Run the scan command
pub fn run(config_path: &Path, print: bool) -> Result<()> {
    let config = Config::load(config_path)?;
    let scanner = Scanner::from_config(&config)?;
    let storage = open_storage(&config.database)?;

    let summary = scan_sources(&storage, &config.bucket, &scanner, &config.active_sources())?;
    info!(
        "Scanned {} line(s): {} address(es) added to '{}', {} rejected",
        format_count_with_separator(summary.lines),
        format_count_with_separator(summary.added),
        config.bucket,
        format_count_with_separator(summary.rejected)
    );

    if print {
        let records = list::live_records(&storage, &config.bucket)?;
        let now = Utc::now();
        let out = match config.print_template.as_deref() {
            Some(source) => Template::new(source).render(&records, now),
            None => render(&records, OutputFormat::Plain, now),
        };
        print!("{}", out);
    }

    storage.close();
    Ok(())
}

/// Scan every source in order. An unreadable source aborts the run.
pub fn scan_sources(
    storage: &Storage,
    bucket: &str,
    scanner: &Scanner,
    sources: &[&str],
) -> Result<ScanSummary> {
    let mut summary = ScanSummary::default();
    for source in sources {
        let file = File::open(source)
            .with_context(|| format!("Failed to open source {}", source))?;
        debug!("Scanning {}", source);
        scan_reader(storage, bucket, scanner, source, BufReader::new(file), &mut summary)?;
    }
    Ok(summary)
}

fn scan_reader<R: BufRead>(
    storage: &Storage,
    bucket: &str,
    scanner: &Scanner,
    source: &str,
    reader: R,
    summary: &mut ScanSummary,
) -> Result<()> {
    let description = format!("found in {}", source);
    for line in reader.lines() {
        let line = line.with_context(|| format!("Failed to read source {}", source))?;
        summary.lines += 1;

        for address in scanner.scan_line(&line) {
            let record = match Record::new(&address, scanner.ttl(), &description) {
                Ok(record) => record,
                Err(e) => {
                    warn!("{}", e);
                    summary.rejected += 1;
                    continue;
                }
            };
            match storage.add(bucket, &record) {
                Ok(()) => summary.added += 1,
                Err(Error::Validation(e)) => {
                    warn!("{}", e);
                    summary.rejected += 1;
                }
                Err(e) => {
                    return Err(e).with_context(|| format!("Failed to add {}", address));
                }
            }
        }
    }
    Ok(())
}
