//! Purge command implementation.

use anyhow::{Context, Result};
use tracing::info;

use crate::storage::Storage;

/// Run the purge command
pub fn run(storage: &Storage, bucket: &str, addresses: &[String]) -> Result<()> {
    let addresses: Vec<&str> = addresses.iter().map(|a| a.trim()).collect();
    let removed = storage
        .purge(bucket, &addresses)
        .with_context(|| format!("Failed to purge from '{}'", bucket))?;

    println!("[OK] Removed {} of {} address(es)", removed, addresses.len());
    info!("Purged {} entries from '{}'", removed, bucket);
    Ok(())
}
