//! Fetch command implementation.
//!
//! Shows whatever is stored for an address without purging anything, so
//! an expired record is still visible here until the next list.

use anyhow::Result;
use chrono::{Local, Utc};

use crate::error::Error;
use crate::record::Record;
use crate::storage::Storage;
use crate::utils::format_remaining;

/// Run the fetch command
pub fn run(storage: &Storage, bucket: &str, address: &str) -> Result<()> {
    let address = address.trim();
    match storage.fetch(bucket, address) {
        Ok(Some(record)) => print!("{}", describe(&record)),
        Ok(None) => println!("{} not found in '{}'", address, bucket),
        Err(Error::NoBucket(_)) => println!("Bucket '{}' does not exist", bucket),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

fn describe(record: &Record) -> String {
    let now = Utc::now();
    let local = record.expires_at.with_timezone(&Local);
    let status = if record.is_live_at(now) {
        match record.remaining_at(now) {
            Some(left) => format!("LIVE ({} left)", format_remaining(left)),
            None => "LIVE".to_string(),
        }
    } else {
        "EXPIRED".to_string()
    };

    let mut out = String::new();
    out.push_str(&format!("Address:     {}\n", record.address));
    out.push_str(&format!("Expires:     {}\n", local.format("%Y-%m-%d %H:%M:%S %Z")));
    if !record.description.is_empty() {
        out.push_str(&format!("Description: {}\n", record.description));
    }
    out.push_str(&format!("Status:      {}\n", status));
    out
}
