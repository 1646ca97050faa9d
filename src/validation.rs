//! Centralized validation functions for banstore.
//!
//! This module provides unified validation for:
//! - IP addresses and CIDR ranges (the only keys the store accepts)
//! - TTL strings (`2w3d12h`, `90m`, `1ns`, ...)
//! - Bucket names

use anyhow::{bail, Context, Result};
use chrono::Duration;
use ipnet::IpNet;
use std::fmt;
use std::net::IpAddr;

use crate::error::ValidationError;

/// What a validated address string denotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressKind {
    /// A bare IPv4 or IPv6 address.
    Single(IpAddr),
    /// An address block. Host bits are preserved as written.
    Network(IpNet),
}

impl AddressKind {
    /// Whether `ip` falls inside this address or block.
    pub fn contains(&self, ip: &IpAddr) -> bool {
        match self {
            AddressKind::Single(addr) => addr == ip,
            AddressKind::Network(net) => net.contains(ip),
        }
    }
}

impl fmt::Display for AddressKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressKind::Single(addr) => write!(f, "{}", addr),
            AddressKind::Network(net) => write!(f, "{}", net),
        }
    }
}

/// Classify `text` as a single address or a CIDR block.
///
/// Anything containing a `/` is parsed as CIDR, with the prefix length
/// checked against the address family. `10.0.0.1/24` is accepted as
/// written even though it is not the network base address.
///
/// # Examples
/// ```
/// use banstore::validation::validate_address;
/// assert!(validate_address("192.168.1.1").is_ok());
/// assert!(validate_address("2001:db8::/32").is_ok());
/// assert!(validate_address("192.168.1.0/33").is_err());
/// assert!(validate_address("not-an-ip").is_err());
/// ```
pub fn validate_address(text: &str) -> Result<AddressKind, ValidationError> {
    if text.contains('/') {
        text.parse::<IpNet>()
            .map(AddressKind::Network)
            .map_err(|e| ValidationError::new(text, e.to_string()))
    } else {
        text.parse::<IpAddr>()
            .map(AddressKind::Single)
            .map_err(|e| ValidationError::new(text, e.to_string()))
    }
}

/// Boolean form of [`validate_address`].
pub fn is_valid_address(text: &str) -> bool {
    validate_address(text).is_ok()
}

/// Rewrite a bare address in host-CIDR form (`/32` or `/128`).
///
/// Text that already carries a prefix is returned unchanged. Anything
/// that is not an address is rejected.
///
/// # Examples
/// ```
/// use banstore::validation::to_host_cidr;
/// assert_eq!(to_host_cidr("10.0.0.1").unwrap(), "10.0.0.1/32");
/// assert_eq!(to_host_cidr("::1").unwrap(), "::1/128");
/// assert_eq!(to_host_cidr("10.0.0.0/8").unwrap(), "10.0.0.0/8");
/// ```
pub fn to_host_cidr(text: &str) -> Result<String, ValidationError> {
    match validate_address(text)? {
        AddressKind::Network(_) => Ok(text.to_string()),
        AddressKind::Single(addr) => Ok(IpNet::from(addr).to_string()),
    }
}

/// Validate a bucket name.
///
/// Buckets become redb table names, so the name must be non-blank and
/// free of control characters.
pub fn validate_bucket(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        bail!("Bucket name cannot be empty");
    }
    if name.chars().any(|c| c.is_control()) {
        bail!("Invalid bucket name '{}': contains control characters", name.escape_debug());
    }
    Ok(())
}

const NANOS_PER_MICRO: u128 = 1_000;
const NANOS_PER_MILLI: u128 = 1_000_000;
const NANOS_PER_SEC: u128 = 1_000_000_000;
const NANOS_PER_MIN: u128 = 60 * NANOS_PER_SEC;
const NANOS_PER_HOUR: u128 = 60 * NANOS_PER_MIN;
const NANOS_PER_DAY: u128 = 24 * NANOS_PER_HOUR;
const NANOS_PER_WEEK: u128 = 7 * NANOS_PER_DAY;

fn unit_nanos(unit: &str) -> Option<u128> {
    match unit {
        "w" => Some(NANOS_PER_WEEK),
        "d" => Some(NANOS_PER_DAY),
        "h" => Some(NANOS_PER_HOUR),
        "m" => Some(NANOS_PER_MIN),
        "s" => Some(NANOS_PER_SEC),
        "ms" => Some(NANOS_PER_MILLI),
        "us" | "µs" => Some(NANOS_PER_MICRO),
        "ns" => Some(1),
        _ => None,
    }
}

/// Parse a TTL such as `2w`, `3d12h`, `1w2d3h4m`, `1.5h` or `1ns`.
///
/// Weeks and days take whole numbers and must come before the clock
/// units (`h`, `m`, `s`, `ms`, `us`, `ns`), which accept a decimal
/// fraction. The result must be strictly positive.
///
/// # Examples
/// ```
/// use banstore::validation::parse_ttl;
/// use chrono::Duration;
/// assert_eq!(parse_ttl("2w").unwrap(), Duration::weeks(2));
/// assert_eq!(parse_ttl("1d12h").unwrap(), Duration::hours(36));
/// assert!(parse_ttl("4x").is_err());
/// assert!(parse_ttl("0s").is_err());
/// ```
pub fn parse_ttl(text: &str) -> Result<Duration> {
    if text.is_empty() {
        bail!("TTL cannot be empty");
    }
    if !text.chars().all(|c| c.is_ascii() || c == 'µ') {
        bail!("Invalid TTL '{}'. Only ASCII characters allowed", text);
    }

    let mut total: u128 = 0;
    let mut clock_units_seen = false;
    let mut rest = text;

    while !rest.is_empty() {
        let number_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        if number_len == 0 {
            bail!(
                "Invalid TTL '{}'. Expected a number before '{}'",
                text,
                rest
            );
        }
        let (number, after) = rest.split_at(number_len);

        let unit_len = after
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(after.len());
        let (unit, after) = after.split_at(unit_len);
        if unit.is_empty() {
            bail!(
                "Invalid TTL '{}'. Missing unit after {}; use w, d, h, m, s, ms, us or ns",
                text,
                number
            );
        }
        let scale = unit_nanos(unit).with_context(|| {
            format!(
                "Invalid TTL '{}'. Unknown unit '{}'; use w, d, h, m, s, ms, us or ns",
                text, unit
            )
        })?;

        let calendar_unit = matches!(unit, "w" | "d");
        if calendar_unit && clock_units_seen {
            bail!(
                "Invalid TTL '{}'. Weeks and days must come before hours, minutes and seconds",
                text
            );
        }
        if calendar_unit && number.contains('.') {
            bail!("Invalid TTL '{}'. Weeks and days must be whole numbers", text);
        }
        clock_units_seen |= !calendar_unit;

        let nanos = component_nanos(number, scale)
            .with_context(|| format!("Invalid TTL '{}'. Bad number '{}'", text, number))?;
        total = total
            .checked_add(nanos)
            .with_context(|| format!("TTL '{}' is too large", text))?;
        rest = after;
    }

    if total == 0 {
        bail!("TTL '{}' must be greater than zero", text);
    }
    let nanos = i64::try_from(total).with_context(|| format!("TTL '{}' is too large", text))?;
    Ok(Duration::nanoseconds(nanos))
}

/// `number` (optionally with a fraction) times `scale` nanoseconds.
fn component_nanos(number: &str, scale: u128) -> Option<u128> {
    let (whole, fraction) = match number.split_once('.') {
        Some((w, f)) => (w, f),
        None => (number, ""),
    };
    if whole.is_empty() && fraction.is_empty() {
        return None;
    }
    if fraction.contains('.') {
        return None;
    }

    let whole: u128 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
    let mut nanos = whole.checked_mul(scale)?;

    // Digits beyond nanosecond resolution are dropped.
    let mut divisor: u128 = 1;
    for digit in fraction.chars() {
        divisor = divisor.checked_mul(10)?;
        let d = u128::from(digit.to_digit(10)?);
        nanos = nanos.checked_add(d.checked_mul(scale)? / divisor)?;
    }
    Some(nanos)
}
