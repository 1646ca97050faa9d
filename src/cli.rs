//! CLI argument parsing with clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::DEFAULT_DATABASE;

/// Default time-to-live for manually added addresses
pub const DEFAULT_ADD_TTL: &str = "14d";

#[derive(Parser)]
#[command(name = "banstore")]
#[command(author, version, about = "Time-bounded IP/CIDR denylist")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Database file path
    #[arg(long, default_value = DEFAULT_DATABASE, global = true)]
    pub db: PathBuf,

    /// Bucket to operate on
    #[arg(short, long, default_value = "default", global = true)]
    pub bucket: String,

    /// Quiet mode (for cron/systemd timer)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug output)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add addresses or CIDRs (from arguments, or one per line on stdin)
    Add {
        /// Addresses to add; read from stdin when omitted
        addresses: Vec<String>,

        /// Time to live (e.g. 14d, 2w3d, 12h, 90m)
        #[arg(long, short, default_value = DEFAULT_ADD_TTL)]
        ttl: String,

        /// Free-text note stored with each record
        #[arg(long, short, default_value = "")]
        description: String,
    },

    /// Print addresses that have not expired (purges expired ones)
    List {
        /// Output format (text, json, plain)
        #[arg(long, short, default_value = "plain")]
        format: String,

        /// Line template, e.g. "{address} {remaining}\n"
        #[arg(long)]
        template: Option<String>,
    },

    /// Print every stored record, expired ones included
    Dump {
        /// Output format (text, json, plain)
        #[arg(long, short, default_value = "text")]
        format: String,

        /// Line template, e.g. "{expires} {address}\n"
        #[arg(long)]
        template: Option<String>,
    },

    /// Show the stored record for an address, live or not
    Fetch {
        /// Address or CIDR exactly as stored
        address: String,
    },

    /// Check whether an address is currently denylisted (exit 1 if not)
    Query {
        /// Address or CIDR exactly as stored
        address: String,
    },

    /// Remove addresses from the bucket
    Purge {
        /// Addresses to remove
        #[arg(required = true)]
        addresses: Vec<String>,
    },

    /// List existing buckets
    Buckets,

    /// Scan log files for offending addresses and add them
    Scan {
        /// YAML configuration file
        #[arg(long, short)]
        config: PathBuf,

        /// Print the bucket's live records after scanning
        #[arg(long)]
        print: bool,
    },
}
