// crates/policy-push-core/src/core/mod.rs
// ============================================================================
// Module: Policy Push Core Types
// Description: Catalog entities, lock wrapper, wire model, and task envelope.
// Purpose: Provide the typed model shared by projection, tooling, and tests.
// Dependencies: parking_lot, serde, serde_jcs, sha2
// ============================================================================

//! ## Overview
//! Core types split into two sides: lock-guarded catalog entities owned by
//! the master node, and the owned wire records sent to backends.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod catalog;
pub mod digest;
pub mod guarded;
pub mod identifiers;
pub mod task;
pub mod wire;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use catalog::ResourceType;
pub use catalog::StoragePolicy;
pub use catalog::StorageResource;
pub use digest::ContentDigest;
pub use digest::DigestError;
pub use digest::content_digest;
pub use guarded::Guarded;
pub use guarded::LockStats;
pub use guarded::ReadGuard;
pub use identifiers::BackendId;
pub use identifiers::PolicyId;
pub use identifiers::ResourceId;
pub use identifiers::TaskSignature;
pub use task::AgentTaskBody;
pub use task::AgentTaskRequest;
pub use task::TaskType;
pub use wire::PushStoragePolicyRequest;
pub use wire::S3StorageParam;
pub use wire::WireError;
pub use wire::WireStoragePolicy;
pub use wire::WireStorageResource;
