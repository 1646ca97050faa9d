//! # banstore - Time-bounded IP/CIDR denylist
//!
//! Keeps denylisted IP addresses and CIDR blocks in named buckets of an
//! embedded database. Every entry carries an absolute expiration; expired
//! entries stay on disk until a listing notices them and evicts them.
//!
//! ## Features
//!
//! - **Buckets** - Independent namespaces in one database file
//! - **Lazy Expiry** - No background sweeper; `list` evicts what it finds expired
//! - **Legacy Records** - Reads entries written by older releases (bare timestamps)
//! - **Log Scanning** - Regex-driven extraction from log files with a CIDR whitelist
//! - **Templated Output** - Text, JSON, plain, or user templates
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        banstore                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  CLI (clap)                                                 │
//! │    └── Commands: add, list, dump, fetch, query, purge...    │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Scanner (regex + ipnet)          Config (serde_yaml)       │
//! │    └── log lines -> host CIDRs      └── sources, patterns   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Storage (redb)                                             │
//! │    ├── one table per bucket, keyed by address               │
//! │    └── add / fetch / list / dump / purge / buckets          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Record (serde_json)              Validation (std::net)     │
//! │    └── current + legacy payloads    └── IP, CIDR, TTL       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example Usage
//!
//! ```no_run
//! use banstore::record::Record;
//! use banstore::storage::Storage;
//! use banstore::validation::parse_ttl;
//!
//! fn main() -> anyhow::Result<()> {
//!     let storage = Storage::open("/var/lib/banstore/banstore.redb")?;
//!
//!     let record = Record::new("203.0.113.7", parse_ttl("14d")?, "sshd brute force")?;
//!     storage.add("ssh", &record)?;
//!
//!     for record in storage.list("ssh")? {
//!         println!("{} until {}", record.address, record.expires_at);
//!     }
//!
//!     storage.close();
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`cli`] - Command-line interface definitions
//! - [`clock`] - Time source used for expiry decisions
//! - [`commands`] - CLI command implementations
//! - [`config`] - Scan configuration parsing and validation
//! - [`error`] - Storage error taxonomy
//! - [`record`] - Records and their on-disk encoding
//! - [`report`] - Output formats and templates
//! - [`scanner`] - Address extraction from log lines
//! - [`storage`] - The bucketed, expiring store
//! - [`utils`] - Common utility functions (formatting)
//! - [`validation`] - Address, bucket and TTL validation

pub mod cli;
pub mod clock;
pub mod commands;
pub mod config;
pub mod error;
pub mod record;
pub mod report;
pub mod scanner;
pub mod storage;
pub mod utils;
pub mod validation;

pub use cli::{Cli, Commands};
pub use config::Config;
pub use error::{Error, Result, ValidationError};
pub use record::Record;
pub use storage::Storage;
