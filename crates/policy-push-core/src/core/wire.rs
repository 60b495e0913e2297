// crates/policy-push-core/src/core/wire.rs
// ============================================================================
// Module: Policy Push Wire Model
// Description: Flat, transport-ready records pushed to storage backends.
// Purpose: Define the request a backend applies to refresh its cooldown rules.
// Dependencies: crate::core::identifiers, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! The wire model is a flattened projection of the catalog: no locks, no
//! shared references, only owned values. A [`PushStoragePolicyRequest`] is
//! created once per backend per dispatch cycle and never mutated after
//! that. Versions are carried verbatim; backends compare them to detect
//! stale local copies.
//!
//! Security posture: [`S3StorageParam`] carries credentials. Its `Debug`
//! output redacts them.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::identifiers::PolicyId;
use crate::core::identifiers::ResourceId;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum encoded size accepted by [`decode_json`].
pub const MAX_WIRE_REQUEST_BYTES: usize = 16 * 1024 * 1024;

// ============================================================================
// SECTION: Wire Records
// ============================================================================

/// Storage policy as seen by a backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireStoragePolicy {
    /// Policy identifier.
    pub id: PolicyId,
    /// Policy name.
    pub name: String,
    /// Catalog version, copied verbatim.
    pub version: i64,
    /// Identifier of the resolved S3 resource.
    pub resource_id: ResourceId,
    /// Absolute cooldown time in epoch seconds.
    pub cooldown_datetime: i64,
    /// Cooldown TTL in seconds.
    pub cooldown_ttl: i64,
}

/// S3 connection parameters for one resource.
///
/// String fields mirror the resource properties exactly; an absent property
/// stays `None` rather than being defaulted.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct S3StorageParam {
    /// Object store endpoint.
    pub endpoint: Option<String>,
    /// Object store region.
    pub region: Option<String>,
    /// Access key.
    pub ak: Option<String>,
    /// Secret key.
    pub sk: Option<String>,
    /// Root path inside the bucket.
    pub root_path: Option<String>,
    /// Bucket name.
    pub bucket: Option<String>,
    /// Maximum client connections.
    pub max_conn: i32,
    /// Request timeout in milliseconds.
    pub request_timeout_ms: i32,
    /// Connection timeout in milliseconds.
    pub conn_timeout_ms: i32,
}

impl fmt::Debug for S3StorageParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("S3StorageParam")
            .field("endpoint", &self.endpoint)
            .field("region", &self.region)
            .field("ak", &self.ak.as_ref().map(|_| "<redacted>"))
            .field("sk", &self.sk.as_ref().map(|_| "<redacted>"))
            .field("root_path", &self.root_path)
            .field("bucket", &self.bucket)
            .field("max_conn", &self.max_conn)
            .field("request_timeout_ms", &self.request_timeout_ms)
            .field("conn_timeout_ms", &self.conn_timeout_ms)
            .finish()
    }
}

/// Storage resource as seen by a backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireStorageResource {
    /// Resource identifier.
    pub id: ResourceId,
    /// Resource name.
    pub name: String,
    /// Catalog version, copied verbatim.
    pub version: i64,
    /// S3 connection parameters.
    pub s3_storage_param: S3StorageParam,
}

/// Request carrying a full policy/resource refresh for one backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushStoragePolicyRequest {
    /// Policies whose resource resolved to an S3 resource.
    pub storage_policy: Vec<WireStoragePolicy>,
    /// Every S3 resource in the snapshot, whether or not a policy references it.
    pub resource: Vec<WireStorageResource>,
    /// Policies dropped since the last push, in input order.
    pub dropped_storage_policy: Vec<PolicyId>,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Wire encoding errors.
#[derive(Debug, Error)]
pub enum WireError {
    /// Request could not be serialized.
    #[error("wire encode error: {0}")]
    Encode(String),
    /// Request bytes could not be parsed.
    #[error("wire decode error: {0}")]
    Decode(String),
    /// Encoded request exceeds the size limit.
    #[error("wire request exceeds size limit: {actual} bytes (max {limit})")]
    TooLarge {
        /// Observed size in bytes.
        actual: usize,
        /// Allowed size in bytes.
        limit: usize,
    },
}

// ============================================================================
// SECTION: Codec
// ============================================================================

/// Encodes a request as JSON bytes.
///
/// # Errors
///
/// Returns [`WireError::Encode`] when serialization fails.
pub fn encode_json(request: &PushStoragePolicyRequest) -> Result<Vec<u8>, WireError> {
    serde_json::to_vec(request).map_err(|err| WireError::Encode(err.to_string()))
}

/// Decodes a request from JSON bytes.
///
/// # Errors
///
/// Returns [`WireError::TooLarge`] past [`MAX_WIRE_REQUEST_BYTES`] and
/// [`WireError::Decode`] on malformed input.
pub fn decode_json(bytes: &[u8]) -> Result<PushStoragePolicyRequest, WireError> {
    if bytes.len() > MAX_WIRE_REQUEST_BYTES {
        return Err(WireError::TooLarge {
            actual: bytes.len(),
            limit: MAX_WIRE_REQUEST_BYTES,
        });
    }
    serde_json::from_slice(bytes).map_err(|err| WireError::Decode(err.to_string()))
}
