//! Denylist records and their on-disk encoding.
//!
//! A bucket entry is keyed by the address text. The value is a JSON
//! object with the expiration instant and description. Databases written
//! by older releases stored only the expiration as a bare Unix timestamp
//! (seconds, ASCII); [`decode`] accepts both.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::validation::{is_valid_address, validate_address};

/// A denylisted address or CIDR block with an absolute expiration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    pub address: String,
    pub expires_at: DateTime<Utc>,
    pub description: String,
}

impl Record {
    /// Build a record expiring `ttl` from now.
    ///
    /// The address and description are trimmed. A zero or negative `ttl`
    /// is accepted and yields a record that is already expired.
    pub fn new(address: &str, ttl: Duration, description: &str) -> Result<Self, ValidationError> {
        Self::new_at(address, ttl, description, Utc::now())
    }

    /// Build a record expiring `ttl` after `created`.
    pub fn new_at(
        address: &str,
        ttl: Duration,
        description: &str,
        created: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let address = address.trim();
        if address.is_empty() {
            return Err(ValidationError::new(address, "address is empty"));
        }
        validate_address(address)?;

        Ok(Self {
            address: address.to_string(),
            expires_at: expiry(created, ttl),
            description: description.trim().to_string(),
        })
    }

    /// True while the address still validates and the record has not expired.
    pub fn is_live(&self) -> bool {
        self.is_live_at(Utc::now())
    }

    /// [`Record::is_live`] against an explicit instant.
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        is_valid_address(&self.address) && now < self.expires_at
    }

    /// Time left before expiry, or `None` once expired.
    pub fn remaining_at(&self, now: DateTime<Utc>) -> Option<Duration> {
        let left = self.expires_at.signed_duration_since(now);
        (left > Duration::zero()).then_some(left)
    }
}

/// `created + ttl`, clamped to the representable range.
fn expiry(created: DateTime<Utc>, ttl: Duration) -> DateTime<Utc> {
    created.checked_add_signed(ttl).unwrap_or(if ttl < Duration::zero() {
        DateTime::<Utc>::MIN_UTC
    } else {
        DateTime::<Utc>::MAX_UTC
    })
}

/// Current on-disk payload. The address lives in the key.
#[derive(Debug, Serialize, Deserialize)]
struct StoredRecord {
    expires_at: DateTime<Utc>,
    #[serde(default)]
    description: String,
}

/// Outcome of decoding one stored value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    /// Current JSON payload.
    Current(Record),
    /// Bare Unix timestamp written by older releases.
    Legacy {
        address: String,
        expires_at: DateTime<Utc>,
    },
    /// Neither encoding matched.
    Undecodable,
}

impl Decoded {
    /// Normalize into a [`Record`]; legacy entries get an empty description.
    pub fn into_record(self) -> Option<Record> {
        match self {
            Decoded::Current(record) => Some(record),
            Decoded::Legacy {
                address,
                expires_at,
            } => Some(Record {
                address,
                expires_at,
                description: String::new(),
            }),
            Decoded::Undecodable => None,
        }
    }
}

/// Serialize a record's value in the current schema.
pub fn encode(record: &Record) -> serde_json::Result<Vec<u8>> {
    serde_json::to_vec(&StoredRecord {
        expires_at: record.expires_at,
        description: record.description.clone(),
    })
}

/// Decode a stored value, trying the current schema first and the legacy
/// bare-timestamp form second. No address validation happens here.
pub fn decode(key: &str, value: &[u8]) -> Decoded {
    if let Ok(stored) = serde_json::from_slice::<StoredRecord>(value) {
        return Decoded::Current(Record {
            address: key.to_string(),
            expires_at: stored.expires_at,
            description: stored.description,
        });
    }

    let legacy = std::str::from_utf8(value)
        .ok()
        .and_then(|text| text.parse::<i64>().ok())
        .and_then(|secs| DateTime::from_timestamp(secs, 0));
    match legacy {
        Some(expires_at) => Decoded::Legacy {
            address: key.to_string(),
            expires_at,
        },
        None => Decoded::Undecodable,
    }
}

/// Legacy encoding of an expiration instant. Kept for migration tooling
/// and tests that seed old-format databases.
pub fn encode_legacy(expires_at: DateTime<Utc>) -> Vec<u8> {
    expires_at.timestamp().to_string().into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_stamps_expiry() {
        let created = Utc::now();
        let record = Record::new_at("192.168.1.5", Duration::minutes(10), "", created).unwrap();
        assert_eq!(record.address, "192.168.1.5");
        assert_eq!(record.expires_at, created + Duration::minutes(10));
        assert!(record.description.is_empty());
    }

    #[test]
    fn test_new_trims_address_and_description() {
        let record = Record::new("  10.0.0.0/24 \n", Duration::hours(1), "  sshd  ").unwrap();
        assert_eq!(record.address, "10.0.0.0/24");
        assert_eq!(record.description, "sshd");
    }

    #[test]
    fn test_new_rejects_empty() {
        assert!(Record::new("", Duration::hours(1), "").is_err());
        assert!(Record::new("   \t", Duration::hours(1), "").is_err());
    }

    #[test]
    fn test_new_rejects_invalid() {
        let err = Record::new("not-an-ip", Duration::hours(1), "").unwrap_err();
        assert_eq!(err.input, "not-an-ip");
    }

    #[test]
    fn test_negative_ttl_is_already_expired() {
        let record = Record::new("10.0.0.1", Duration::seconds(-5), "").unwrap();
        assert!(!record.is_live());
    }

    #[test]
    fn test_extreme_ttl_saturates() {
        let forever = Record::new("10.0.0.1", Duration::MAX, "").unwrap();
        assert_eq!(forever.expires_at, DateTime::<Utc>::MAX_UTC);
        assert!(forever.is_live());

        let never = Record::new("10.0.0.1", Duration::MIN, "").unwrap();
        assert_eq!(never.expires_at, DateTime::<Utc>::MIN_UTC);
        assert!(!never.is_live());
    }

    #[test]
    fn test_is_live_at() {
        let created = Utc::now();
        let record = Record::new_at("10.0.0.1", Duration::minutes(1), "", created).unwrap();
        assert!(record.is_live_at(created));
        assert!(record.is_live_at(created + Duration::seconds(59)));
        assert!(!record.is_live_at(created + Duration::minutes(1)));
        assert!(!record.is_live_at(created + Duration::hours(1)));
    }

    #[test]
    fn test_is_live_requires_valid_address() {
        let record = Record {
            address: "garbage".to_string(),
            expires_at: Utc::now() + Duration::days(1),
            description: String::new(),
        };
        assert!(!record.is_live());
    }

    #[test]
    fn test_remaining_at() {
        let created = Utc::now();
        let record = Record::new_at("10.0.0.1", Duration::minutes(5), "", created).unwrap();
        assert_eq!(record.remaining_at(created), Some(Duration::minutes(5)));
        assert_eq!(record.remaining_at(created + Duration::minutes(5)), None);
    }

    #[test]
    fn test_decode_current() {
        let record = Record::new("10.0.0.1", Duration::hours(2), "from auth.log").unwrap();
        let bytes = encode(&record).unwrap();
        assert_eq!(decode("10.0.0.1", &bytes), Decoded::Current(record));
    }

    #[test]
    fn test_decode_current_without_description() {
        let decoded = decode("10.0.0.1", br#"{"expires_at":"2030-01-01T00:00:00Z"}"#);
        let record = decoded.into_record().unwrap();
        assert!(record.description.is_empty());
        assert_eq!(record.expires_at.timestamp(), 1_893_456_000);
    }

    #[test]
    fn test_decode_legacy_timestamp() {
        let decoded = decode("192.168.0.1", b"1893456000");
        assert_eq!(
            decoded,
            Decoded::Legacy {
                address: "192.168.0.1".to_string(),
                expires_at: DateTime::from_timestamp(1_893_456_000, 0).unwrap(),
            }
        );
        let record = decoded.into_record().unwrap();
        assert_eq!(record.address, "192.168.0.1");
        assert!(record.description.is_empty());
    }

    #[test]
    fn test_encode_legacy_round_trip() {
        let expires = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let bytes = encode_legacy(expires);
        assert_eq!(bytes, b"1700000000");
        assert!(matches!(decode("10.0.0.1", &bytes), Decoded::Legacy { .. }));
    }

    #[test]
    fn test_decode_undecodable() {
        assert_eq!(decode("10.0.0.1", b"\xff\xfe"), Decoded::Undecodable);
        assert_eq!(decode("10.0.0.1", b"{broken"), Decoded::Undecodable);
        assert_eq!(decode("10.0.0.1", b"12abc"), Decoded::Undecodable);
        assert_eq!(decode("10.0.0.1", b""), Decoded::Undecodable);
        assert!(Decoded::Undecodable.into_record().is_none());
    }
}
