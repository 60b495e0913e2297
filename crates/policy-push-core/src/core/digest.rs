// crates/policy-push-core/src/core/digest.rs
// ============================================================================
// Module: Policy Push Request Digests
// Description: Canonical JSON digests of wire requests.
// Purpose: Let dispatchers detect pushes that carry nothing new.
// Dependencies: serde, serde_jcs, sha2, thiserror
// ============================================================================

//! ## Overview
//! Requests are canonicalized with RFC 8785 (JCS) before hashing, so two
//! requests with equal content always share a digest regardless of how
//! their JSON was produced.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::fmt::Write as _;

use serde::Deserialize;
use serde::Serialize;
use sha2::Digest;
use sha2::Sha256;
use thiserror::Error;

// ============================================================================
// SECTION: Digest Value
// ============================================================================

/// Lowercase hex SHA-256 digest of canonical JSON.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentDigest(String);

impl ContentDigest {
    /// Returns the hex digest.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sha256:{}", self.0)
    }
}

/// Errors raised while computing digests.
#[derive(Debug, Error)]
pub enum DigestError {
    /// JSON canonicalization failed.
    #[error("failed to canonicalize json: {0}")]
    Canonicalization(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns RFC 8785 canonical JSON bytes for a value.
///
/// # Errors
///
/// Returns [`DigestError::Canonicalization`] when serialization fails.
pub fn canonical_json_bytes<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, DigestError> {
    serde_jcs::to_vec(value).map_err(|err| DigestError::Canonicalization(err.to_string()))
}

/// Hashes the canonical JSON form of a value.
///
/// # Errors
///
/// Returns [`DigestError::Canonicalization`] when serialization fails.
pub fn content_digest<T: Serialize + ?Sized>(value: &T) -> Result<ContentDigest, DigestError> {
    let bytes = canonical_json_bytes(value)?;
    let digest = Sha256::digest(&bytes);
    let mut hex = String::with_capacity(digest.len() * 2);
    for byte in digest {
        let _ = write!(hex, "{byte:02x}");
    }
    Ok(ContentDigest(hex))
}
