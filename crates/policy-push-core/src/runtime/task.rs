// crates/policy-push-core/src/runtime/task.rs
// ============================================================================
// Module: Policy Push Agent Tasks
// Description: Closed set of dispatchable tasks and their preparation.
// Purpose: Turn a task into a serializable request and audit what was built.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! [`AgentTask`] pairs the identity every task shares with a kind-specific
//! [`AgentTaskPayload`]. Preparing a task projects its payload, records
//! audit events, and yields the [`AgentTaskRequest`] a dispatcher sends.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::digest::content_digest;
use crate::core::identifiers::BackendId;
use crate::core::identifiers::TaskSignature;
use crate::core::task::AgentTaskBody;
use crate::core::task::AgentTaskRequest;
use crate::core::task::TaskType;
use crate::interfaces::AgentTaskDispatcher;
use crate::interfaces::DispatchError;
use crate::interfaces::ResourceResolver;
use crate::runtime::audit::NoopAuditSink;
use crate::runtime::audit::PushAuditSink;
use crate::runtime::audit::PushBuildEvent;
use crate::runtime::audit::PushSkipEvent;
use crate::runtime::projection::ProjectionError;
use crate::runtime::projection::ProjectionOptions;
use crate::runtime::projection::ProjectionReport;
use crate::runtime::projection::PushStoragePolicyTask;

// ============================================================================
// SECTION: Task Types
// ============================================================================

/// Kind-specific task payload.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum AgentTaskPayload {
    /// Storage policy push.
    PushStoragePolicy(PushStoragePolicyTask),
}

/// Task addressed to one backend.
#[derive(Debug, Clone)]
pub struct AgentTask {
    /// Addressed backend.
    backend_id: BackendId,
    /// Task signature.
    signature: TaskSignature,
    /// Kind-specific payload.
    payload: AgentTaskPayload,
}

/// Request ready for dispatch plus its build diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedTask {
    /// Serializable request.
    pub request: AgentTaskRequest,
    /// Items left out while building the request.
    pub report: ProjectionReport,
}

impl AgentTask {
    /// Wraps a storage policy push; its signature is always unassigned.
    #[must_use]
    pub fn push_storage_policy(task: PushStoragePolicyTask) -> Self {
        Self {
            backend_id: task.backend_id(),
            signature: TaskSignature::UNASSIGNED,
            payload: AgentTaskPayload::PushStoragePolicy(task),
        }
    }

    /// Returns the addressed backend.
    #[must_use]
    pub const fn backend_id(&self) -> BackendId {
        self.backend_id
    }

    /// Returns the task signature.
    #[must_use]
    pub const fn signature(&self) -> TaskSignature {
        self.signature
    }

    /// Returns the task tag.
    #[must_use]
    pub const fn task_type(&self) -> TaskType {
        match self.payload {
            AgentTaskPayload::PushStoragePolicy(_) => TaskType::PushStoragePolicy,
        }
    }

    /// Returns the kind-specific payload.
    #[must_use]
    pub const fn payload(&self) -> &AgentTaskPayload {
        &self.payload
    }

    /// Builds the dispatchable request without auditing.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectionError`] when the payload projection aborts.
    pub fn to_request<R: ResourceResolver + ?Sized>(
        &self,
        resolver: &R,
        options: &ProjectionOptions,
    ) -> Result<AgentTaskRequest, ProjectionError> {
        self.prepare(resolver, options, &NoopAuditSink).map(|prepared| prepared.request)
    }

    /// Builds the dispatchable request and records audit events.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectionError`] when the payload projection aborts.
    pub fn prepare<R: ResourceResolver + ?Sized>(
        &self,
        resolver: &R,
        options: &ProjectionOptions,
        audit: &dyn PushAuditSink,
    ) -> Result<PreparedTask, ProjectionError> {
        match &self.payload {
            AgentTaskPayload::PushStoragePolicy(task) => {
                let output = task.to_wire_request(resolver, options)?;
                for skip in &output.report.skips {
                    audit.record_skip(&PushSkipEvent::new(self.backend_id, skip.clone()));
                }
                let digest = content_digest(&output.request).ok();
                audit.record_build(&PushBuildEvent::new(
                    self.backend_id,
                    &output.request,
                    output.report.skips.len(),
                    digest,
                ));
                Ok(PreparedTask {
                    request: AgentTaskRequest {
                        backend_id: self.backend_id,
                        signature: self.signature,
                        body: AgentTaskBody::PushStoragePolicy(output.request),
                    },
                    report: output.report,
                })
            }
        }
    }
}

// ============================================================================
// SECTION: Dispatch
// ============================================================================

/// Errors raised while preparing and sending a task.
#[derive(Debug, Error)]
pub enum SendError {
    /// Projection aborted.
    #[error(transparent)]
    Projection(#[from] ProjectionError),
    /// Dispatcher rejected the request.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

/// Prepares a task and hands it to a dispatcher.
///
/// # Errors
///
/// Returns [`SendError`] when projection or dispatch fails.
pub fn send_task<R: ResourceResolver + ?Sized, D: AgentTaskDispatcher + ?Sized>(
    task: &AgentTask,
    resolver: &R,
    options: &ProjectionOptions,
    audit: &dyn PushAuditSink,
    dispatcher: &D,
) -> Result<ProjectionReport, SendError> {
    let prepared = task.prepare(resolver, options, audit)?;
    dispatcher.dispatch(&prepared.request)?;
    Ok(prepared.report)
}
