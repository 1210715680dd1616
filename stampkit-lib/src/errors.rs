//! Error types for stampkit operations.
//!
//! Validation failures abort a command before any network call is made.
//! Transport failures never escape the resolvers as hard errors: they are
//! folded into [`Lookup::Absent`](crate::Lookup) with the error text kept
//! as the absence reason.

use std::fmt;

/// Stable numeric error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum StampkitErrorCode {
    /// Malformed private key
    InvalidKey = 1001,
    /// Malformed batch identifier
    InvalidBatchId = 1002,
    /// Malformed content reference
    InvalidReference = 1003,
    /// Malformed feed topic
    InvalidTopic = 1004,
    /// Project name normalizes to nothing
    InvalidSlug = 1005,
    /// Derived key is not a usable scalar
    DerivationFailed = 1100,
    /// Transport/network layer error
    Transport = 2000,
    /// Connection failed
    ConnectionFailed = 2001,
    /// Connection timeout
    ConnectionTimeout = 2002,
    /// JSON-RPC error object returned by the node
    Rpc = 2100,
    /// Serialization error
    Serialization = 5002,
    /// Invalid configuration
    Config = 6000,
    /// Delegated feed write failed
    Write = 7000,
    /// Internal/unexpected error
    Internal = 9999,
}

/// Comprehensive error type for stampkit operations.
#[derive(Debug)]
pub enum StampkitError {
    /// Private key is not 64 hex characters or not a valid secp256k1 scalar.
    InvalidKey(String),

    /// Batch id is not 64 hex characters.
    InvalidBatchId(String),

    /// Content reference is not 64 or 128 hex characters.
    InvalidReference(String),

    /// Feed topic is not 64 hex characters.
    InvalidTopic(String),

    /// Project name normalizes to an empty slug.
    InvalidSlug {
        /// The name as supplied by the caller
        name: String,
    },

    /// Derived project key is not a valid scalar.
    DerivationFailed {
        /// Slug the derivation was attempted for
        slug: String,
    },

    /// Transport/network layer error.
    Transport(String),

    /// Connection failed.
    ConnectionFailed {
        /// Target endpoint
        target: String,
        /// Underlying error message
        reason: String,
    },

    /// Connection timeout.
    ConnectionTimeout {
        /// Operation that timed out
        operation: String,
        /// Timeout duration in milliseconds
        timeout_ms: u64,
    },

    /// The RPC node answered with a JSON-RPC error object (typically a revert).
    Rpc {
        /// JSON-RPC error code
        code: i64,
        /// Error message reported by the node
        message: String,
    },

    /// Serialization/deserialization error.
    Serialization(String),

    /// Invalid or incomplete configuration.
    Config(String),

    /// The external writer rejected or failed the feed update.
    Write(String),

    /// Internal/unexpected error.
    Internal(String),
}

impl StampkitError {
    /// Get the error code.
    pub fn code(&self) -> StampkitErrorCode {
        match self {
            Self::InvalidKey(_) => StampkitErrorCode::InvalidKey,
            Self::InvalidBatchId(_) => StampkitErrorCode::InvalidBatchId,
            Self::InvalidReference(_) => StampkitErrorCode::InvalidReference,
            Self::InvalidTopic(_) => StampkitErrorCode::InvalidTopic,
            Self::InvalidSlug { .. } => StampkitErrorCode::InvalidSlug,
            Self::DerivationFailed { .. } => StampkitErrorCode::DerivationFailed,
            Self::Transport(_) => StampkitErrorCode::Transport,
            Self::ConnectionFailed { .. } => StampkitErrorCode::ConnectionFailed,
            Self::ConnectionTimeout { .. } => StampkitErrorCode::ConnectionTimeout,
            Self::Rpc { .. } => StampkitErrorCode::Rpc,
            Self::Serialization(_) => StampkitErrorCode::Serialization,
            Self::Config(_) => StampkitErrorCode::Config,
            Self::Write(_) => StampkitErrorCode::Write,
            Self::Internal(_) => StampkitErrorCode::Internal,
        }
    }

    /// Returns true for malformed user input, which is always reported
    /// before any network call.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidKey(_)
                | Self::InvalidBatchId(_)
                | Self::InvalidReference(_)
                | Self::InvalidTopic(_)
                | Self::InvalidSlug { .. }
        )
    }

    /// Returns true if the error came from talking to an external service.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Transport(_)
                | Self::ConnectionFailed { .. }
                | Self::ConnectionTimeout { .. }
                | Self::Rpc { .. }
        )
    }

    /// Create an invalid key error.
    pub fn invalid_key(reason: impl Into<String>) -> Self {
        Self::InvalidKey(reason.into())
    }

    /// Create an invalid slug error.
    pub fn invalid_slug(name: impl Into<String>) -> Self {
        Self::InvalidSlug { name: name.into() }
    }
}

impl fmt::Display for StampkitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidKey(reason) => write!(f, "invalid private key: {}", reason),
            Self::InvalidBatchId(reason) => write!(f, "invalid batch id: {}", reason),
            Self::InvalidReference(reason) => write!(f, "invalid reference: {}", reason),
            Self::InvalidTopic(reason) => write!(f, "invalid topic: {}", reason),
            Self::InvalidSlug { name } => {
                write!(f, "project name {:?} does not contain any letters or digits", name)
            }
            Self::DerivationFailed { slug } => {
                write!(f, "derived key for project '{}' is not a valid secp256k1 scalar", slug)
            }
            Self::Transport(msg) => write!(f, "transport error: {}", msg),
            Self::ConnectionFailed { target, reason } => {
                write!(f, "connection to {} failed: {}", target, reason)
            }
            Self::ConnectionTimeout {
                operation,
                timeout_ms,
            } => {
                write!(f, "{} timed out after {}ms", operation, timeout_ms)
            }
            Self::Rpc { code, message } => write!(f, "rpc error {}: {}", code, message),
            Self::Serialization(msg) => write!(f, "serialization error: {}", msg),
            Self::Config(msg) => write!(f, "configuration error: {}", msg),
            Self::Write(msg) => write!(f, "feed write failed: {}", msg),
            Self::Internal(msg) => write!(f, "internal error: {}", msg),
        }
    }
}

impl std::error::Error for StampkitError {}

impl From<serde_json::Error> for StampkitError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
