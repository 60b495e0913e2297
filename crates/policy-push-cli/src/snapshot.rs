// crates/policy-push-cli/src/snapshot.rs
// ============================================================================
// Module: Catalog Snapshot Files
// Description: Bounded loading of policy/resource snapshots from JSON.
// Purpose: Turn an exported catalog into shared entities for one push.
// Dependencies: policy-push-core, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! A snapshot file is a JSON object with `policies` and `resources` arrays.
//! Loading registers every entity in an [`InMemoryCatalog`] (which rejects
//! duplicate names) while keeping file order for the push.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::io::Read;
use std::path::Path;

use policy_push_core::BackendId;
use policy_push_core::CatalogError;
use policy_push_core::InMemoryCatalog;
use policy_push_core::PolicyId;
use policy_push_core::PushStoragePolicyTask;
use policy_push_core::StoragePolicy;
use policy_push_core::StorageResource;
use policy_push_core::runtime::SharedPolicy;
use policy_push_core::runtime::SharedResource;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum snapshot file size in bytes.
pub const MAX_SNAPSHOT_BYTES: usize = 16 * 1024 * 1024;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Serialized catalog export.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogSnapshot {
    /// Storage policies in push order.
    #[serde(default)]
    pub policies: Vec<StoragePolicy>,
    /// Storage resources in push order.
    #[serde(default)]
    pub resources: Vec<StorageResource>,
}

/// Snapshot registered in a catalog, with handles in file order.
#[derive(Debug, Clone)]
pub struct LoadedSnapshot {
    /// Catalog used to resolve policy resource names.
    pub catalog: InMemoryCatalog,
    /// Policy handles in file order.
    pub policies: Vec<SharedPolicy>,
    /// S3 resource handles in file order.
    pub s3_resources: Vec<SharedResource>,
}

impl LoadedSnapshot {
    /// Builds a push task for one backend.
    #[must_use]
    pub fn push_task(
        &self,
        backend_id: BackendId,
        dropped_policy_ids: Vec<PolicyId>,
    ) -> PushStoragePolicyTask {
        PushStoragePolicyTask::new(
            backend_id,
            self.policies.clone(),
            self.s3_resources.clone(),
            dropped_policy_ids,
        )
    }
}

/// Snapshot loading errors.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// File could not be read.
    #[error("failed to read snapshot {path}: {error}")]
    Io {
        /// Snapshot path.
        path: String,
        /// Underlying error text.
        error: String,
    },
    /// File exceeds the size limit.
    #[error("snapshot {path} exceeds size limit ({size} > {limit} bytes)")]
    TooLarge {
        /// Snapshot path.
        path: String,
        /// Observed size in bytes.
        size: u64,
        /// Allowed size in bytes.
        limit: usize,
    },
    /// File is not a valid snapshot document.
    #[error("invalid snapshot {path}: {error}")]
    Parse {
        /// Snapshot path.
        path: String,
        /// Underlying error text.
        error: String,
    },
    /// Snapshot contains conflicting entries.
    #[error("invalid snapshot contents: {0}")]
    Catalog(#[from] CatalogError),
}

// ============================================================================
// SECTION: Loading
// ============================================================================

impl CatalogSnapshot {
    /// Registers the snapshot in a fresh catalog.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Catalog`] when names repeat.
    pub fn load(self) -> Result<LoadedSnapshot, SnapshotError> {
        let catalog = InMemoryCatalog::new();
        let mut s3_resources = Vec::new();
        for resource in self.resources {
            let is_s3 = resource.is_s3();
            let shared = catalog.insert_resource(resource)?;
            if is_s3 {
                s3_resources.push(shared);
            }
        }
        let policies = self
            .policies
            .into_iter()
            .map(|policy| catalog.insert_policy(policy))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(LoadedSnapshot {
            catalog,
            policies,
            s3_resources,
        })
    }
}

/// Reads and parses a snapshot file.
///
/// # Errors
///
/// Returns [`SnapshotError`] when the file is unreadable, oversized, or
/// malformed.
pub fn read_snapshot(path: &Path) -> Result<CatalogSnapshot, SnapshotError> {
    let bytes = read_bytes_with_limit(path, MAX_SNAPSHOT_BYTES)?;
    serde_json::from_slice(&bytes).map_err(|err| SnapshotError::Parse {
        path: path.display().to_string(),
        error: err.to_string(),
    })
}

/// Reads a file from disk while enforcing a hard size limit.
fn read_bytes_with_limit(path: &Path, max_bytes: usize) -> Result<Vec<u8>, SnapshotError> {
    let io_error = |err: std::io::Error| SnapshotError::Io {
        path: path.display().to_string(),
        error: err.to_string(),
    };
    let too_large = |size: u64| SnapshotError::TooLarge {
        path: path.display().to_string(),
        size,
        limit: max_bytes,
    };
    let file = File::open(path).map_err(io_error)?;
    let size = file.metadata().map_err(io_error)?.len();
    let limit = u64::try_from(max_bytes).map_err(|_| too_large(size))?;
    if size > limit {
        return Err(too_large(size));
    }

    let mut limited = file.take(limit.saturating_add(1));
    let mut bytes = Vec::new();
    limited.read_to_end(&mut bytes).map_err(io_error)?;
    if bytes.len() > max_bytes {
        return Err(too_large(u64::try_from(bytes.len()).unwrap_or(u64::MAX)));
    }
    Ok(bytes)
}
