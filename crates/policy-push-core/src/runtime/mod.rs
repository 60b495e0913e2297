// crates/policy-push-core/src/runtime/mod.rs
// ============================================================================
// Module: Policy Push Runtime
// Description: Projection builder, agent tasks, audit sinks, reference catalog.
// Purpose: Turn catalog snapshots into dispatchable backend requests.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! Runtime modules build push requests from catalog snapshots. Every entry
//! point (dispatcher loop, CLI, tests) goes through the same projection.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod audit;
pub mod catalog;
pub mod projection;
pub mod task;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::FileAuditSink;
pub use audit::MemoryAuditSink;
pub use audit::NoopAuditSink;
pub use audit::PushAuditSink;
pub use audit::PushBuildEvent;
pub use audit::PushSkipEvent;
pub use audit::RecordedAuditEvent;
pub use audit::StderrAuditSink;
pub use catalog::CatalogError;
pub use catalog::InMemoryCatalog;
pub use catalog::SharedPolicy;
pub use catalog::SharedResource;
pub use projection::InvalidPropertyPolicy;
pub use projection::ProjectionError;
pub use projection::ProjectionOptions;
pub use projection::ProjectionOutput;
pub use projection::ProjectionReport;
pub use projection::ProjectionSkip;
pub use projection::PushStoragePolicyTask;
pub use projection::S3Defaults;
pub use projection::SkipReason;
pub use projection::SkippedItem;
pub use task::AgentTask;
pub use task::AgentTaskPayload;
pub use task::PreparedTask;
pub use task::SendError;
pub use task::send_task;
