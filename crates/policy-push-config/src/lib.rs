// crates/policy-push-config/src/lib.rs
// ============================================================================
// Module: Policy Push Config Library
// Description: Configuration model and validation for policy push tooling.
// Purpose: Single source of truth for policy-push.toml semantics.
// Dependencies: policy-push-core, serde, toml
// ============================================================================

//! ## Overview
//! `policy-push-config` loads `policy-push.toml`, validates it fail-closed,
//! and converts it into the core projection options and audit sink.
//!
//! Security posture: config inputs are untrusted.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
