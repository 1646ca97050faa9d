//! Buckets command implementation.

use anyhow::Result;

use crate::storage::Storage;

/// Run the buckets command
pub fn run(storage: &Storage) -> Result<()> {
    let mut names = storage.buckets()?;
    names.sort();
    if names.is_empty() {
        println!("No buckets yet");
    }
    for name in names {
        println!("{}", name);
    }
    Ok(())
}
