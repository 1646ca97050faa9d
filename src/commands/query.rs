//! Query command implementation.

use anyhow::Result;

use crate::error::Error;
use crate::storage::Storage;

/// Run the query command. Returns whether the address is denylisted right now.
pub fn run(storage: &Storage, bucket: &str, address: &str) -> Result<bool> {
    let address = address.trim();
    let listed = is_listed(storage, bucket, address)?;
    if listed {
        println!("{} is DENYLISTED in '{}'", address, bucket);
    } else {
        println!("{} is NOT denylisted in '{}'", address, bucket);
    }
    Ok(listed)
}

/// Fetch plus liveness check; a missing bucket means not listed.
pub fn is_listed(storage: &Storage, bucket: &str, address: &str) -> Result<bool> {
    match storage.fetch(bucket, address) {
        Ok(record) => Ok(record.is_some_and(|r| r.is_live())),
        Err(Error::NoBucket(_)) => Ok(false),
        Err(e) => Err(e.into()),
    }
}
