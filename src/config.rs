//! Configuration for the log-scanning pipeline.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::validation::{parse_ttl, validate_bucket};

/// Default database location, shared with the CLI default
pub const DEFAULT_DATABASE: &str = "/var/lib/banstore/banstore.redb";

/// Default time-to-live for addresses found in logs
pub const DEFAULT_SCAN_TTL: &str = "21d";

/// Scan configuration (YAML)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log files to read, line by line
    pub sources: Vec<String>,

    /// Regular expressions; capture group 1 is the candidate address
    pub patterns: Vec<String>,

    /// Database file
    pub database: PathBuf,

    /// Bucket receiving the addresses
    pub bucket: String,

    /// How long a match stays denylisted (e.g. "21d", "1w2d", "12h")
    pub ttl: String,

    /// Networks (CIDR) that are never denylisted
    pub network_whitelist: Vec<String>,

    /// Output template for `--print` (placeholders: {address}, {expires},
    /// {description}, {remaining})
    pub print_template: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            patterns: Vec::new(),
            database: PathBuf::from(DEFAULT_DATABASE),
            bucket: String::new(),
            ttl: DEFAULT_SCAN_TTL.to_string(),
            network_whitelist: Vec::new(),
            print_template: None,
        }
    }
}

impl Config {
    /// Load configuration from YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let config = Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;

        config.validate()?;

        Ok(config)
    }

    /// Parse configuration from a YAML string without validating it
    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Validate configuration values
    ///
    /// Patterns and whitelist entries are checked when the scanner is
    /// built, since that is where they get compiled.
    pub fn validate(&self) -> Result<()> {
        if self.active_sources().is_empty() {
            anyhow::bail!("No valid source defined");
        }

        validate_bucket(&self.bucket).context("Invalid bucket")?;

        parse_ttl(&self.ttl).context("Invalid ttl")?;

        if self.database.as_os_str().is_empty() {
            anyhow::bail!("Database path cannot be empty");
        }

        Ok(())
    }

    /// Source paths with surrounding whitespace removed, blanks skipped
    pub fn active_sources(&self) -> Vec<&str> {
        self.sources
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect()
    }
}
