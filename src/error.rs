//! Error types for the banstore engine.
//!
//! Validation and missing-bucket errors are local to the failing call.
//! Storage errors come from redb and mean the database itself is in
//! trouble; callers should treat them as fatal.

use thiserror::Error;

/// Rejected address or CIDR text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{input} is not a valid IP address or CIDR: {reason}")]
pub struct ValidationError {
    pub input: String,
    pub reason: String,
}

impl ValidationError {
    pub fn new(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            reason: reason.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("no {0} bucket found")]
    NoBucket(String),

    #[error("bucket name required")]
    BucketNameRequired,

    #[error("storage error: {0}")]
    Storage(#[from] redb::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("undecodable record for {address} in bucket {bucket}")]
    Corrupt { bucket: String, address: String },
}

macro_rules! storage_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Error {
                fn from(err: $ty) -> Self {
                    Self::Storage(err.into())
                }
            }
        )*
    };
}

storage_from!(
    redb::DatabaseError,
    redb::TransactionError,
    redb::TableError,
    redb::StorageError,
    redb::CommitError,
);

pub type Result<T> = std::result::Result<T, Error>;
