// crates/policy-push-core/src/lib.rs
// ============================================================================
// Module: Policy Push Core Library
// Description: Public API surface for the storage policy push core.
// Purpose: Expose catalog types, interfaces, and the projection runtime.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Policy Push builds the request a master node sends to each storage
//! backend so the backend can enforce cooldown rules: the storage policies,
//! the S3 resources they move data to, and the ids of policies dropped since
//! the previous push. Scheduling and transport stay behind the
//! [`AgentTaskDispatcher`] interface.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use crate::core::*;

pub use interfaces::AgentTaskDispatcher;
pub use interfaces::DispatchError;
pub use interfaces::ResourceResolver;
pub use runtime::AgentTask;
pub use runtime::AgentTaskPayload;
pub use runtime::CatalogError;
pub use runtime::FileAuditSink;
pub use runtime::InMemoryCatalog;
pub use runtime::InvalidPropertyPolicy;
pub use runtime::MemoryAuditSink;
pub use runtime::NoopAuditSink;
pub use runtime::PreparedTask;
pub use runtime::ProjectionError;
pub use runtime::ProjectionOptions;
pub use runtime::ProjectionOutput;
pub use runtime::ProjectionReport;
pub use runtime::ProjectionSkip;
pub use runtime::PushAuditSink;
pub use runtime::PushStoragePolicyTask;
pub use runtime::S3Defaults;
pub use runtime::SendError;
pub use runtime::SkipReason;
pub use runtime::SkippedItem;
pub use runtime::StderrAuditSink;
pub use runtime::send_task;
