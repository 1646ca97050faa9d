//! Dump command implementation.

use anyhow::Result;
use tracing::{info, warn};

use super::format_records;
use crate::error::Error;
use crate::storage::Storage;
use crate::utils::format_count_with_separator;

/// Run the dump command
pub fn run(storage: &Storage, bucket: &str, format: &str, template: Option<&str>) -> Result<()> {
    let records = match storage.dump(bucket) {
        Ok(records) => records,
        Err(Error::NoBucket(_)) => {
            warn!("Bucket '{}' does not exist yet", bucket);
            Vec::new()
        }
        Err(e) => return Err(e.into()),
    };

    print!("{}", format_records(&records, format, template)?);
    info!(
        "{} stored record(s) in '{}'",
        format_count_with_separator(records.len()),
        bucket
    );
    Ok(())
}
