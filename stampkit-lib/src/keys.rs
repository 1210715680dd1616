//! secp256k1 private keys and the addresses they own.
//!
//! The address of a key is the low-order 20 bytes of the keccak-256 hash of
//! its uncompressed public key with the leading `0x04` format byte removed.
//! Addresses are never stored; they are recomputed from the key whenever
//! they are needed.

use std::fmt;
use std::str::FromStr;

use alloy_primitives::{Address, B256};
use alloy_signer_local::PrivateKeySigner;

use crate::encoding::parse_hex32;
use crate::{Result, StampkitError};

/// A validated secp256k1 private key.
///
/// Construction checks the scalar range (non-zero and below the curve
/// order), so every `PrivateKey` value can sign.
#[derive(Clone)]
pub struct PrivateKey {
    signer: PrivateKeySigner,
}

impl PrivateKey {
    /// Build a key from its raw 32-byte scalar.
    pub fn from_bytes(bytes: [u8; 32]) -> Result<Self> {
        let signer = PrivateKeySigner::from_bytes(&B256::from(bytes)).map_err(|e| {
            StampkitError::invalid_key(format!("not a valid secp256k1 scalar: {}", e))
        })?;
        Ok(Self { signer })
    }

    /// Parse a key from 64 hex characters, with or without `0x`.
    pub fn from_hex(input: &str) -> Result<Self> {
        let bytes = parse_hex32(input).map_err(StampkitError::InvalidKey)?;
        Self::from_bytes(bytes)
    }

    /// Raw 32-byte scalar.
    pub fn to_bytes(&self) -> [u8; 32] {
        self.signer.to_bytes().0
    }

    /// Lower-case hex without prefix.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// The address owned by this key.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Signer handed to the external stamping library.
    pub fn signer(&self) -> &PrivateKeySigner {
        &self.signer
    }
}

impl PartialEq for PrivateKey {
    fn eq(&self, other: &Self) -> bool {
        self.to_bytes() == other.to_bytes()
    }
}

impl Eq for PrivateKey {}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}

impl FromStr for PrivateKey {
    type Err = StampkitError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

/// Compute the address owned by `key`.
pub fn address_of(key: &PrivateKey) -> Address {
    key.address()
}

/// Parse a hex private key and compute its address.
pub fn address_of_hex(input: &str) -> Result<Address> {
    PrivateKey::from_hex(input).map(|key| key.address())
}

/// Lower-case hex form of an address without `0x`, as used in gateway paths.
pub fn address_path_segment(address: &Address) -> String {
    hex::encode(address.as_slice())
}

#[cfg(test)]
mod tests {
    use super::*;

    // Well-known vectors: key 1 and the web3.js documentation key.
    const KEY_ONE: &str = "0000000000000000000000000000000000000000000000000000000000000001";
    const DOC_KEY: &str = "0x4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";

    #[test]
    fn test_address_of_known_keys() {
        let address = address_of_hex(KEY_ONE).unwrap();
        assert_eq!(
            address_path_segment(&address),
            "7e5f4552091a69125d5dfcb7b8c2659029395bdf"
        );

        let key = PrivateKey::from_hex(DOC_KEY).unwrap();
        assert_eq!(
            address_path_segment(&address_of(&key)),
            "2c7536e3605d9c16a7a3d7b1898e529396a65c23"
        );
        assert_eq!(
            key.address().to_string(),
            "0x2c7536E3605D9C16a7a3D7b1898e529396a65c23"
        );
    }

    #[test]
    fn test_address_is_twenty_bytes_and_deterministic() {
        let key = PrivateKey::from_hex(DOC_KEY).unwrap();
        let a = key.address();
        let b = key.clone().address();
        assert_eq!(a, b);
        assert_eq!(a.as_slice().len(), 20);
    }

    #[test]
    fn test_hex_round_trip() {
        let key = PrivateKey::from_hex(DOC_KEY).unwrap();
        assert_eq!(format!("0x{}", key.to_hex()), DOC_KEY);
        assert_eq!(PrivateKey::from_bytes(key.to_bytes()).unwrap(), key);
    }

    #[test]
    fn test_rejects_out_of_range_scalars() {
        let zero = "00".repeat(32);
        assert!(matches!(
            PrivateKey::from_hex(&zero),
            Err(StampkitError::InvalidKey(_))
        ));

        let order = "fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141";
        assert!(matches!(
            PrivateKey::from_hex(order),
            Err(StampkitError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_rejects_malformed_hex() {
        assert!(matches!(
            address_of_hex("0x1234"),
            Err(StampkitError::InvalidKey(_))
        ));
        assert!(address_of_hex(&"g".repeat(64)).is_err());
    }

    #[test]
    fn test_debug_does_not_leak_key() {
        let key = PrivateKey::from_hex(DOC_KEY).unwrap();
        let rendered = format!("{:?}", key);
        assert!(!rendered.contains(&key.to_hex()));
        assert!(rendered.contains("address"));
    }
}
