//! Typed identifiers for batches, feeds and content.

use std::fmt;
use std::str::FromStr;

use alloy_primitives::keccak256;
use serde::{Deserialize, Serialize};

use crate::encoding::{decode_fixed, parse_hex32, strip_prefix};
use crate::{Result, StampkitError};

/// Depth assumed when the ledger cannot be queried.
pub const DEFAULT_BATCH_DEPTH: BatchDepth = BatchDepth(20);

/// Index written when the gateway cannot tell us the feed state.
pub const FALLBACK_FEED_INDEX: FeedIndex = FeedIndex(0);

/// Identifier of a storage-allocation batch on the ledger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BatchId(pub [u8; 32]);

impl BatchId {
    /// Parse 64 hex characters, with or without `0x`.
    pub fn from_hex(input: &str) -> Result<Self> {
        parse_hex32(input)
            .map(Self)
            .map_err(StampkitError::InvalidBatchId)
    }

    /// Raw bytes, used as the `bytes32` call argument.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

/// 32-byte namespace discriminator for feeds under one owner.
///
/// The default topic is all zeros.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FeedTopic(pub [u8; 32]);

impl FeedTopic {
    /// Parse 64 hex characters, with or without `0x`.
    pub fn from_hex(input: &str) -> Result<Self> {
        parse_hex32(input)
            .map(Self)
            .map_err(StampkitError::InvalidTopic)
    }

    /// Topic derived from a human-readable name as `keccak256(name)`.
    pub fn from_name(name: &str) -> Self {
        Self(keccak256(name.as_bytes()).0)
    }

    /// Raw bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

/// Swarm content reference: 32 bytes, or 64 bytes for encrypted content.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Reference {
    /// Plain content address.
    Plain([u8; 32]),
    /// Content address followed by the decryption key.
    Encrypted(Box<[u8; 64]>),
}

impl Reference {
    /// Parse 64 or 128 hex characters, with or without `0x`.
    pub fn from_hex(input: &str) -> Result<Self> {
        let digits = strip_prefix(input);
        match digits.len() {
            64 => decode_fixed::<32>(digits)
                .map(Self::Plain)
                .map_err(StampkitError::InvalidReference),
            128 => decode_fixed::<64>(digits)
                .map(|bytes| Self::Encrypted(Box::new(bytes)))
                .map_err(StampkitError::InvalidReference),
            other => Err(StampkitError::InvalidReference(format!(
                "expected 64 or 128 hex characters, got {}",
                other
            ))),
        }
    }

    /// Raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Plain(bytes) => bytes,
            Self::Encrypted(bytes) => bytes.as_slice(),
        }
    }

    /// Whether the reference carries a decryption key.
    pub fn is_encrypted(&self) -> bool {
        matches!(self, Self::Encrypted(_))
    }
}

/// Storage-allocation depth of a batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BatchDepth(pub u8);

impl fmt::Display for BatchDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Sequence number of a feed update.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeedIndex(pub u64);

impl FeedIndex {
    /// The index after this one, or `None` on overflow.
    pub fn next(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }

    /// Parse a gateway index value: hex digits, with or without `0x`.
    ///
    /// Gateways encode feed indices as 8-byte big-endian hex, so leading
    /// zeros are expected and `"000000000000000a"` is ten.
    pub fn from_hex(input: &str) -> Option<Self> {
        let digits = strip_prefix(input);
        if digits.is_empty()
            || digits.len() > 16
            || !digits.chars().all(|c| c.is_ascii_hexdigit())
        {
            return None;
        }
        u64::from_str_radix(digits, 16).ok().map(Self)
    }

    /// 8-byte big-endian hex form used on the wire.
    pub fn to_hex(&self) -> String {
        format!("{:016x}", self.0)
    }
}

impl fmt::Display for FeedIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Outcome of a lookup against an external service.
///
/// `Absent` is an expected outcome, not a failure: the caller always has a
/// fallback value. `reason` carries the transport or protocol detail for
/// diagnostics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Lookup<T> {
    /// The service answered with a usable value.
    Found(T),
    /// No usable value; the caller falls back.
    Absent {
        /// Why the value could not be resolved.
        reason: String,
    },
}

impl<T> Lookup<T> {
    /// Create an absent lookup.
    pub fn absent(reason: impl Into<String>) -> Self {
        Self::Absent {
            reason: reason.into(),
        }
    }

    /// Convert to an option, dropping the absence reason.
    pub fn found(self) -> Option<T> {
        match self {
            Self::Found(value) => Some(value),
            Self::Absent { .. } => None,
        }
    }

    /// Whether the lookup produced a value.
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

macro_rules! hex_display {
    ($($ty:ty),*) => {$(
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&hex::encode(self.as_bytes()))
            }
        }

        impl FromStr for $ty {
            type Err = StampkitError;

            fn from_str(s: &str) -> Result<Self> {
                Self::from_hex(s)
            }
        }

        impl Serialize for $ty {
            fn serialize<S: serde::Serializer>(
                &self,
                serializer: S,
            ) -> std::result::Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: serde::Deserializer<'de>>(
                deserializer: D,
            ) -> std::result::Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                Self::from_hex(&raw).map_err(serde::de::Error::custom)
            }
        }
    )*};
}

hex_display!(BatchId, FeedTopic, Reference);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_id_parsing() {
        let hex = "ab".repeat(32);
        let id = BatchId::from_hex(&format!("0x{hex}")).unwrap();
        assert_eq!(id.to_string(), hex);

        assert!(matches!(
            BatchId::from_hex("xyz"),
            Err(StampkitError::InvalidBatchId(_))
        ));
        assert!(BatchId::from_hex(&"ab".repeat(31)).is_err());
    }

    #[test]
    fn test_topic_default_and_name() {
        assert_eq!(FeedTopic::default().to_string(), "0".repeat(64));
        assert_eq!(
            FeedTopic::from_name("my-topic").to_string(),
            "0ce8095306af56dbf740006772ab425b05b0dbebbbf585cd640c645459865ced"
        );
        assert!(matches!(
            FeedTopic::from_hex("12"),
            Err(StampkitError::InvalidTopic(_))
        ));
    }

    #[test]
    fn test_reference_lengths() {
        let plain = Reference::from_hex(&"11".repeat(32)).unwrap();
        assert!(!plain.is_encrypted());
        assert_eq!(plain.as_bytes().len(), 32);

        let encrypted = Reference::from_hex(&format!("0x{}", "22".repeat(64))).unwrap();
        assert!(encrypted.is_encrypted());
        assert_eq!(encrypted.as_bytes().len(), 64);
        assert_eq!(encrypted.to_string(), "22".repeat(64));

        assert!(matches!(
            Reference::from_hex(&"33".repeat(40)),
            Err(StampkitError::InvalidReference(_))
        ));
    }

    #[test]
    fn test_feed_index_hex() {
        assert_eq!(FeedIndex::from_hex("000000000000000a"), Some(FeedIndex(10)));
        assert_eq!(FeedIndex::from_hex("0x1f"), Some(FeedIndex(31)));
        assert_eq!(FeedIndex::from_hex(""), None);
        assert_eq!(FeedIndex::from_hex("not-hex"), None);
        assert_eq!(FeedIndex::from_hex("+5"), None);
        assert_eq!(FeedIndex::from_hex(&"f".repeat(17)), None);
        assert_eq!(FeedIndex(255).to_hex(), "00000000000000ff");
    }

    #[test]
    fn test_feed_index_next() {
        assert_eq!(FeedIndex(4).next(), Some(FeedIndex(5)));
        assert_eq!(FeedIndex(u64::MAX).next(), None);
    }

    #[test]
    fn test_lookup_helpers() {
        let found: Lookup<u8> = Lookup::Found(3);
        assert!(found.is_found());
        assert_eq!(found.found(), Some(3));

        let absent: Lookup<u8> = Lookup::absent("gateway unreachable");
        assert!(!absent.is_found());
        assert_eq!(absent.found(), None);
    }

    #[test]
    fn test_identifier_serde() {
        let id = BatchId([7u8; 32]);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", "07".repeat(32)));
        assert_eq!(serde_json::from_str::<BatchId>(&json).unwrap(), id);
    }
}
