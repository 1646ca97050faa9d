//! Extraction of candidate addresses from log lines.
//!
//! Every configured pattern is matched against each line; capture group 1
//! of each match is a candidate. Candidates that are not IP addresses,
//! or that overlap a whitelisted network, are dropped. Bare addresses
//! are rewritten as host CIDRs (`/32`, `/128`) so that everything the scan
//! stores uses one notation.

use anyhow::{Context, Result};
use chrono::Duration;
use ipnet::IpNet;
use regex::Regex;
use std::net::IpAddr;
use tracing::debug;

use crate::config::Config;
use crate::validation::{parse_ttl, to_host_cidr, validate_address, AddressKind};

/// Compiled scan settings.
#[derive(Debug)]
pub struct Scanner {
    patterns: Vec<Regex>,
    whitelist: Vec<IpNet>,
    ttl: Duration,
}

impl Scanner {
    /// Build a scanner from already-validated configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let ttl = parse_ttl(&config.ttl).context("Invalid ttl")?;
        let patterns = config
            .patterns
            .iter()
            .map(|p| compile_pattern(p))
            .collect::<Result<Vec<_>>>()?;
        let whitelist = parse_whitelist(&config.network_whitelist)?;

        Ok(Self {
            patterns,
            whitelist,
            ttl,
        })
    }

    /// TTL applied to every address found.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Whether `ip` belongs to a whitelisted network.
    pub fn is_whitelisted(&self, ip: &IpAddr) -> bool {
        self.whitelist.iter().any(|net| net.contains(ip))
    }

    /// Whether `net` shares any address with a whitelisted network.
    ///
    /// CIDR blocks either nest or are disjoint, so containment in one
    /// direction or the other is the whole overlap test.
    pub fn overlaps_whitelist(&self, net: &IpNet) -> bool {
        self.whitelist
            .iter()
            .any(|allowed| allowed.contains(net) || net.contains(allowed))
    }

    /// Candidate addresses in `line`, in match order, host-CIDR form.
    pub fn scan_line(&self, line: &str) -> Vec<String> {
        let mut found = Vec::new();
        for re in &self.patterns {
            for caps in re.captures_iter(line) {
                let Some(candidate) = caps.get(1).map(|m| m.as_str().trim()) else {
                    continue;
                };
                if candidate.is_empty() {
                    continue;
                }
                if let Some(cidr) = self.accept(candidate) {
                    found.push(cidr);
                }
            }
        }
        found
    }

    fn accept(&self, candidate: &str) -> Option<String> {
        let kind = match validate_address(candidate) {
            Ok(kind) => kind,
            Err(e) => {
                debug!("Ignoring match: {}", e);
                return None;
            }
        };

        let whitelisted = match kind {
            AddressKind::Single(ip) => self.is_whitelisted(&ip),
            AddressKind::Network(net) => self.overlaps_whitelist(&net),
        };
        if whitelisted {
            debug!("Ignoring whitelisted {}", candidate);
            return None;
        }

        to_host_cidr(candidate).ok()
    }
}

fn compile_pattern(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).with_context(|| format!("Failed to compile regexp {}", pattern))
}

/// Parse whitelist CIDRs, naming the first bad entry on failure.
pub fn parse_whitelist(entries: &[String]) -> Result<Vec<IpNet>> {
    entries
        .iter()
        .map(|entry| {
            entry
                .trim()
                .parse::<IpNet>()
                .with_context(|| format!("Failed to parse whitelisted CIDR {}", entry))
        })
        .collect()
}
