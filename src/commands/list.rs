//! List command implementation.

use anyhow::Result;
use tracing::{info, warn};

use super::format_records;
use crate::error::Error;
use crate::record::Record;
use crate::storage::Storage;
use crate::utils::format_count_with_separator;

/// Run the list command
pub fn run(storage: &Storage, bucket: &str, format: &str, template: Option<&str>) -> Result<()> {
    let records = live_records(storage, bucket)?;
    print!("{}", format_records(&records, format, template)?);
    info!(
        "{} live record(s) in '{}'",
        format_count_with_separator(records.len()),
        bucket
    );
    Ok(())
}

/// Live records in `bucket`; a bucket that was never written is empty.
pub fn live_records(storage: &Storage, bucket: &str) -> Result<Vec<Record>> {
    match storage.list(bucket) {
        Ok(records) => Ok(records),
        Err(Error::NoBucket(_)) => {
            warn!("Bucket '{}' does not exist yet", bucket);
            Ok(Vec::new())
        }
        Err(e) => Err(e.into()),
    }
}
