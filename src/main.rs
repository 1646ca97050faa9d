//! banstore - Time-bounded IP/CIDR denylist
//!
//! Command-line front end over the bucketed denylist store.

use anyhow::Result;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use banstore::cli::{Cli, Commands};
use banstore::commands::{self, open_storage};
use banstore::validation::validate_bucket;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    let log_level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::ERROR
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .without_time()
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    if !dispatch(cli)? {
        std::process::exit(1);
    }
    Ok(())
}

/// Execute the command. `Ok(false)` maps to exit status 1.
fn dispatch(cli: Cli) -> Result<bool> {
    // Scan brings its own database and bucket
    let storage = match cli.command {
        Commands::Scan { config, print } => {
            commands::scan::run(&config, print)?;
            return Ok(true);
        }
        _ => {
            validate_bucket(&cli.bucket)?;
            open_storage(&cli.db)?
        }
    };
    let bucket = cli.bucket.as_str();

    let result = match cli.command {
        Commands::Add {
            addresses,
            ttl,
            description,
        } => commands::add::run(&storage, bucket, &addresses, &ttl, &description).map(|()| true),
        Commands::List { format, template } => {
            commands::list::run(&storage, bucket, &format, template.as_deref()).map(|()| true)
        }
        Commands::Dump { format, template } => {
            commands::dump::run(&storage, bucket, &format, template.as_deref()).map(|()| true)
        }
        Commands::Fetch { address } => {
            commands::fetch::run(&storage, bucket, &address).map(|()| true)
        }
        Commands::Query { address } => commands::query::run(&storage, bucket, &address),
        Commands::Purge { addresses } => {
            commands::purge::run(&storage, bucket, &addresses).map(|()| true)
        }
        Commands::Buckets => commands::buckets::run(&storage).map(|()| true),
        Commands::Scan { .. } => Ok(true),
    };

    storage.close();
    result
}
