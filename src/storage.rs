//! Bucketed denylist storage backed by redb.
//!
//! Each bucket is a redb table keyed by address text. redb gives us a
//! single writer and any number of MVCC read snapshots, so every
//! operation here is one transaction (or, for the lazy purge in
//! [`Storage::dump`] and [`Storage::list`], a read snapshot followed by a
//! separate write transaction).
//!
//! Nothing runs in the background. Expired and corrupt entries are only
//! removed when a read stumbles over them.

use std::path::{Path, PathBuf};

use redb::{
    Database, ReadOnlyTable, ReadTransaction, ReadableTable, TableDefinition, TableError,
    TableHandle,
};
use tracing::{debug, warn};

use crate::clock::{Clock, SystemClock};
use crate::error::{Error, Result};
use crate::record::{self, Record};
use crate::validation::{is_valid_address, validate_address};

fn bucket_table(name: &str) -> TableDefinition<'_, &'static str, &'static [u8]> {
    TableDefinition::new(name)
}

/// A stored entry as last observed in a read snapshot.
///
/// The raw bytes let the purge pass skip keys that were rewritten after
/// the snapshot was taken.
struct Observed {
    key: String,
    raw: Vec<u8>,
}

/// Persistent, bucketed denylist.
pub struct Storage<C: Clock = SystemClock> {
    db: Database,
    path: PathBuf,
    clock: C,
}

impl Storage<SystemClock> {
    /// Create or open a database at the given path.
    ///
    /// Fails if another process already holds the file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_clock(path, SystemClock)
    }
}

impl<C: Clock> Storage<C> {
    /// Like [`Storage::open`], reading the current time from `clock`.
    pub fn open_with_clock(path: impl AsRef<Path>, clock: C) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let db = Database::create(&path)?;
        debug!("Opened denylist database {:?}", path);
        Ok(Self { db, path, clock })
    }

    /// Path of the underlying database file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Insert or replace a record in `bucket`, creating the bucket if needed.
    pub fn add(&self, bucket: &str, record: &Record) -> Result<()> {
        if bucket.is_empty() {
            return Err(Error::BucketNameRequired);
        }
        // Fields are public, so the address may not have come through Record::new
        validate_address(&record.address)?;
        let payload = record::encode(record)?;

        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(bucket_table(bucket))?;
            table.insert(record.address.as_str(), payload.as_slice())?;
        }
        txn.commit()?;

        debug!(
            "Added {} to {} (expires {})",
            record.address, bucket, record.expires_at
        );
        Ok(())
    }

    /// Look up a single address without any eviction side effect.
    ///
    /// Returns whatever is stored, expired or not; check
    /// [`Record::is_live`] on the result.
    pub fn fetch(&self, bucket: &str, address: &str) -> Result<Option<Record>> {
        let txn = self.db.begin_read()?;
        let table = open_snapshot(&txn, bucket)?;

        let Some(value) = table.get(address)? else {
            return Ok(None);
        };
        record::decode(address, value.value())
            .into_record()
            .map(Some)
            .ok_or_else(|| Error::Corrupt {
                bucket: bucket.to_string(),
                address: address.to_string(),
            })
    }

    /// Every decodable record in `bucket`, expired ones included.
    ///
    /// Entries that fail to decode or whose key is no longer a valid
    /// address are deleted afterwards. That cleanup is best-effort: if it
    /// fails the entries stay and are retried on the next dump.
    pub fn dump(&self, bucket: &str) -> Result<Vec<Record>> {
        let (entries, corrupt) = self.scan(bucket)?;
        self.purge_corrupt(bucket, &corrupt);
        Ok(entries.into_iter().map(|(record, _)| record).collect())
    }

    /// Records in `bucket` that have not expired yet. Expired ones are purged.
    pub fn list(&self, bucket: &str) -> Result<Vec<Record>> {
        let (entries, corrupt) = self.scan(bucket)?;
        self.purge_corrupt(bucket, &corrupt);

        let now = self.clock.now();
        let (live, expired): (Vec<_>, Vec<_>) = entries
            .into_iter()
            .partition(|(record, _)| now < record.expires_at);

        if !expired.is_empty() {
            let stale: Vec<Observed> = expired.into_iter().map(|(_, seen)| seen).collect();
            let removed = self.evict(bucket, &stale)?;
            debug!("Purged {} expired entries from {}", removed, bucket);
        }

        Ok(live.into_iter().map(|(record, _)| record).collect())
    }

    /// Delete `addresses` from `bucket` in one transaction.
    ///
    /// Missing keys are ignored. Returns how many entries were removed.
    pub fn purge<S: AsRef<str>>(&self, bucket: &str, addresses: &[S]) -> Result<usize> {
        let txn = self.db.begin_write()?;
        let exists = txn.list_tables()?.any(|table| table.name() == bucket);
        if !exists {
            txn.abort()?;
            return Err(Error::NoBucket(bucket.to_string()));
        }

        let mut removed = 0;
        {
            let mut table = txn.open_table(bucket_table(bucket))?;
            for address in addresses {
                if table.remove(address.as_ref())?.is_some() {
                    removed += 1;
                }
            }
        }
        txn.commit()?;

        debug!("Purged {} of {} addresses from {}", removed, addresses.len(), bucket);
        Ok(removed)
    }

    /// Names of all buckets created so far.
    pub fn buckets(&self) -> Result<Vec<String>> {
        let txn = self.db.begin_read()?;
        let names = txn
            .list_tables()?
            .map(|table| table.name().to_string())
            .collect();
        Ok(names)
    }

    /// Release the database handle.
    pub fn close(self) {
        debug!("Closing denylist database {:?}", self.path);
        drop(self.db);
    }

    /// Read `bucket` in one snapshot, splitting entries into decoded
    /// records (with the bytes they came from) and corrupt keys.
    fn scan(&self, bucket: &str) -> Result<(Vec<(Record, Observed)>, Vec<Observed>)> {
        let txn = self.db.begin_read()?;
        let table = open_snapshot(&txn, bucket)?;

        let mut entries = Vec::new();
        let mut corrupt = Vec::new();
        for item in table.iter()? {
            let (key, value) = item?;
            let key = key.value();
            let raw = value.value();
            let seen = Observed {
                key: key.to_string(),
                raw: raw.to_vec(),
            };

            match record::decode(key, raw).into_record() {
                Some(record) if is_valid_address(&record.address) => entries.push((record, seen)),
                _ => {
                    debug!("Queueing undecodable or invalid entry {:?} in {}", key, bucket);
                    corrupt.push(seen);
                }
            }
        }

        Ok((entries, corrupt))
    }

    /// Best-effort removal of entries [`Storage::scan`] could not use.
    fn purge_corrupt(&self, bucket: &str, corrupt: &[Observed]) {
        if corrupt.is_empty() {
            return;
        }
        match self.evict(bucket, corrupt) {
            Ok(removed) => debug!("Purged {} corrupt entries from {}", removed, bucket),
            Err(e) => warn!("Failed to purge corrupt entries from {}: {}", bucket, e),
        }
    }

    /// Delete the given entries unless they changed since they were read.
    fn evict(&self, bucket: &str, stale: &[Observed]) -> Result<usize> {
        let txn = self.db.begin_write()?;
        let mut removed = 0;
        {
            let mut table = txn.open_table(bucket_table(bucket))?;
            for seen in stale {
                let unchanged = table
                    .get(seen.key.as_str())?
                    .is_some_and(|current| current.value() == seen.raw.as_slice());
                if unchanged {
                    table.remove(seen.key.as_str())?;
                    removed += 1;
                }
            }
        }
        txn.commit()?;
        Ok(removed)
    }
}

/// Open `bucket` inside a read snapshot, mapping a missing table to
/// [`Error::NoBucket`].
fn open_snapshot(
    txn: &ReadTransaction,
    bucket: &str,
) -> Result<ReadOnlyTable<&'static str, &'static [u8]>> {
    // No bucket can have an empty name
    if bucket.is_empty() {
        return Err(Error::NoBucket(bucket.to_string()));
    }
    match txn.open_table(bucket_table(bucket)) {
        Ok(table) => Ok(table),
        Err(TableError::TableDoesNotExist(_)) => Err(Error::NoBucket(bucket.to_string())),
        Err(e) => Err(e.into()),
    }
}
