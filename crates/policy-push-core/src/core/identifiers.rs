// crates/policy-push-core/src/core/identifiers.rs
// ============================================================================
// Module: Policy Push Identifiers
// Description: Numeric identifiers for catalog entities, backends, and tasks.
// Purpose: Keep policy, resource, and backend ids from being mixed up.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Catalog ids are 64-bit integers assigned by the master node. They
//! serialize as bare integers so the wire shape stays flat. No range
//! validation happens here; ids are whatever the catalog handed out.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Identifier Types
// ============================================================================

/// Storage policy identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PolicyId(i64);

impl PolicyId {
    /// Creates a new policy identifier.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw identifier value.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for PolicyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<i64> for PolicyId {
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}

/// Storage resource identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(i64);

impl ResourceId {
    /// Creates a new resource identifier.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw identifier value.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<i64> for ResourceId {
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}

/// Backend node identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BackendId(i64);

impl BackendId {
    /// Creates a new backend identifier.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw identifier value.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for BackendId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<i64> for BackendId {
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}

/// Agent task signature used by the dispatcher to match acknowledgements.
///
/// # Invariants
/// - [`TaskSignature::UNASSIGNED`] (`-1`) marks tasks that are never
///   acknowledged individually, such as storage policy pushes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskSignature(i64);

impl TaskSignature {
    /// Sentinel signature for tasks without a per-task acknowledgement.
    pub const UNASSIGNED: Self = Self(-1);

    /// Creates a new task signature.
    #[must_use]
    pub const fn new(signature: i64) -> Self {
        Self(signature)
    }

    /// Returns the raw signature value.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }

    /// Returns true when the signature is the unassigned sentinel.
    #[must_use]
    pub const fn is_unassigned(self) -> bool {
        self.0 == Self::UNASSIGNED.0
    }
}

impl fmt::Display for TaskSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
