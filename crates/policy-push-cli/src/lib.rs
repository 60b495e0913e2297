// crates/policy-push-cli/src/lib.rs
// ============================================================================
// Module: Policy Push CLI Library
// Description: Snapshot loading and stdout dispatch for the policy-push binary.
// Purpose: Keep the binary thin and its building blocks testable.
// Dependencies: policy-push-core, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! The `policy-push` binary reads a catalog snapshot from disk, builds one
//! storage policy push for a backend, and writes the task as a JSON line.
//! This library holds the snapshot reader and the JSON-line dispatcher.
//!
//! Security posture: snapshot files are untrusted; reads are size-limited.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod dispatch;
pub mod snapshot;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use dispatch::JsonLineDispatcher;
pub use snapshot::CatalogSnapshot;
pub use snapshot::LoadedSnapshot;
pub use snapshot::SnapshotError;
pub use snapshot::read_snapshot;
