//! Project-scoped signing keys.
//!
//! A project key is `keccak256(parent_key || slug)`, where `slug` is the
//! normalized project name. The same reserve key and project name produce
//! the same project key on every machine, so a CI job can keep publishing
//! to the same feed without storing a second secret.

use std::fmt;

use alloy_primitives::{keccak256, Address};
use serde::{Deserialize, Serialize};

use crate::keys::PrivateKey;
use crate::{Result, StampkitError};

/// Maximum slug length in characters.
pub const MAX_SLUG_LEN: usize = 50;

/// Normalized project name: `[a-z0-9-]`, at most 50 characters, never empty.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProjectSlug(String);

impl ProjectSlug {
    /// Normalize an arbitrary project name.
    pub fn new(name: &str) -> Result<Self> {
        normalize_slug(name)
    }

    /// Get the slug as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ProjectSlug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ProjectSlug {
    type Error = StampkitError;

    fn try_from(value: String) -> Result<Self> {
        normalize_slug(&value)
    }
}

impl From<ProjectSlug> for String {
    fn from(slug: ProjectSlug) -> Self {
        slug.0
    }
}

/// Normalize a project name into a slug.
///
/// Lowercases, replaces every maximal run of characters outside `[a-z0-9]`
/// with a single `-`, trims leading and trailing hyphens, then truncates to
/// [`MAX_SLUG_LEN`] characters.
///
/// # Examples
///
/// ```
/// use stampkit_lib::project::normalize_slug;
///
/// assert_eq!(normalize_slug("My Blog!!").unwrap().as_str(), "my-blog");
/// assert!(normalize_slug("  ").is_err());
/// ```
pub fn normalize_slug(name: &str) -> Result<ProjectSlug> {
    let mut slug = String::with_capacity(name.len());
    let mut in_gap = false;

    for ch in name.chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if in_gap && !slug.is_empty() {
                slug.push('-');
            }
            in_gap = false;
            slug.push(ch);
        } else {
            in_gap = true;
        }
    }

    // Leading gaps are never emitted and trailing gaps are only flushed
    // before a following character, so the slug is already trimmed.
    slug.truncate(MAX_SLUG_LEN);

    if slug.is_empty() {
        return Err(StampkitError::invalid_slug(name));
    }
    Ok(ProjectSlug(slug))
}

/// Derive the project key for `slug` under `parent`.
///
/// Fails with [`StampkitError::DerivationFailed`] in the practically
/// impossible case that the digest is not a valid secp256k1 scalar.
pub fn derive_project_key(parent: &PrivateKey, slug: &ProjectSlug) -> Result<PrivateKey> {
    let mut preimage = Vec::with_capacity(32 + slug.as_str().len());
    preimage.extend_from_slice(&parent.to_bytes());
    preimage.extend_from_slice(slug.as_str().as_bytes());

    let digest = keccak256(&preimage);
    PrivateKey::from_bytes(digest.0).map_err(|_| StampkitError::DerivationFailed {
        slug: slug.to_string(),
    })
}

/// A project's slug together with its derived key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProjectIdentity {
    /// Normalized project name.
    pub slug: ProjectSlug,
    /// Key that owns and signs the project's feed.
    pub key: PrivateKey,
}

impl ProjectIdentity {
    /// Normalize `name` and derive its key from `parent`.
    pub fn derive(parent: &PrivateKey, name: &str) -> Result<Self> {
        let slug = normalize_slug(name)?;
        let key = derive_project_key(parent, &slug)?;
        Ok(Self { slug, key })
    }

    /// Address that owns the project's feed.
    pub fn address(&self) -> Address {
        self.key.address()
    }
}
