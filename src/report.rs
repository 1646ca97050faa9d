//! Rendering of list/dump results.
//!
//! Consumers only rely on the address, the expiration instant and the
//! description; field order in the outputs below is not a contract.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::record::Record;
use crate::utils::format_remaining;

/// Output format for record listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// `<expires> <address> [description]`
    #[default]
    Text,
    /// Pretty-printed JSON array
    Json,
    /// Address only, one per line
    Plain,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "plain" | "address" => Ok(OutputFormat::Plain),
            _ => Err(format!("Unknown format: {}. Use text, json, or plain", s)),
        }
    }
}

/// JSON view of a record
#[derive(Debug, Serialize)]
struct RecordView<'a> {
    address: &'a str,
    expires_at: DateTime<Utc>,
    description: &'a str,
    live: bool,
}

/// Render `records` in `format`.
pub fn render(records: &[Record], format: OutputFormat, now: DateTime<Utc>) -> String {
    match format {
        OutputFormat::Text => records
            .iter()
            .map(|r| {
                let expires = r.expires_at.to_rfc3339_opts(SecondsFormat::Secs, true);
                if r.description.is_empty() {
                    format!("{} {}\n", expires, r.address)
                } else {
                    format!("{} {} {}\n", expires, r.address, r.description)
                }
            })
            .collect(),
        OutputFormat::Plain => records.iter().map(|r| format!("{}\n", r.address)).collect(),
        OutputFormat::Json => {
            let views: Vec<RecordView<'_>> = records
                .iter()
                .map(|r| RecordView {
                    address: &r.address,
                    expires_at: r.expires_at,
                    description: &r.description,
                    live: r.is_live_at(now),
                })
                .collect();
            // Serializing plain strings and timestamps cannot fail
            let mut out = serde_json::to_string_pretty(&views).unwrap_or_default();
            out.push('\n');
            out
        }
    }
}

/// A user-supplied line template.
///
/// Placeholders: `{address}`, `{expires}` (RFC 3339), `{description}`,
/// `{remaining}` (e.g. `2d3h`, or `expired`). The escapes `\n` and `\t`
/// are honoured so templates can be passed on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
}

impl Template {
    pub fn new(source: &str) -> Self {
        let source = source.replace("\\n", "\n").replace("\\t", "\t");
        Self { source }
    }

    /// Expand the template for one record.
    pub fn render_record(&self, record: &Record, now: DateTime<Utc>) -> String {
        let remaining = record
            .remaining_at(now)
            .map(format_remaining)
            .unwrap_or_else(|| "expired".to_string());
        self.source
            .replace("{address}", &record.address)
            .replace(
                "{expires}",
                &record.expires_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            )
            .replace("{description}", &record.description)
            .replace("{remaining}", &remaining)
    }

    /// Expand the template for every record, concatenated.
    pub fn render(&self, records: &[Record], now: DateTime<Utc>) -> String {
        records.iter().map(|r| self.render_record(r, now)).collect()
    }
}
