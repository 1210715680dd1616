//! Test fixtures with known vectors.

use crate::keys::PrivateKey;
use crate::types::{BatchId, Reference};

/// A reserve key with a well-known address.
pub const KNOWN_KEY: &str = "4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";

/// Address of [`KNOWN_KEY`], lowercase, without `0x`.
pub const KNOWN_ADDRESS: &str = "2c7536e3605d9c16a7a3d7b1898e529396a65c23";

/// Project key derived from [`KNOWN_KEY`] for `my-blog`.
pub const MY_BLOG_KEY: &str = "38f9f0804f8c7c6d8a6eea252d0b3f08f007c7f35776c8f8ee4c2f13c737dc05";

/// Address of [`MY_BLOG_KEY`], lowercase, without `0x`.
pub const MY_BLOG_ADDRESS: &str = "883c6406282226d6a1dd13a085379c554ffcff31";

/// The reserve key behind [`KNOWN_KEY`].
pub fn test_reserve_key() -> PrivateKey {
    match PrivateKey::from_hex(KNOWN_KEY) {
        Ok(key) => key,
        Err(e) => panic!("fixture key is invalid: {}", e),
    }
}

/// A batch id with a recognisable pattern.
pub fn test_batch_id() -> BatchId {
    BatchId([0xba; 32])
}

/// A plain content reference.
pub fn test_reference() -> Reference {
    Reference::Plain([0x5e; 32])
}
