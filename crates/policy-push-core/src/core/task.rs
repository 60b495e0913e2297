// crates/policy-push-core/src/core/task.rs
// ============================================================================
// Module: Policy Push Agent Task Envelope
// Description: Task kind tags and the serializable envelope sent to backends.
// Purpose: Give every dispatchable task the same identity fields and framing.
// Dependencies: crate::core::{identifiers, wire}, serde
// ============================================================================

//! ## Overview
//! Every task the master sends to a backend shares three identity fields:
//! the addressed backend, a [`TaskType`] tag, and a [`TaskSignature`]. The
//! kind-specific part travels as an [`AgentTaskBody`]. Dispatchers only
//! need the identity and the serialized body.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::BackendId;
use crate::core::identifiers::TaskSignature;
use crate::core::wire::PushStoragePolicyRequest;

// ============================================================================
// SECTION: Task Types
// ============================================================================

/// Tag identifying a dispatchable task kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum TaskType {
    /// Full storage policy and resource refresh.
    PushStoragePolicy,
}

impl TaskType {
    /// Returns the canonical tag label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PushStoragePolicy => "PUSH_STORAGE_POLICY",
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Envelope
// ============================================================================

/// Kind-specific task body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "task_type", content = "request", rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum AgentTaskBody {
    /// Storage policy push body.
    PushStoragePolicy(PushStoragePolicyRequest),
}

impl AgentTaskBody {
    /// Returns the tag for this body.
    #[must_use]
    pub const fn task_type(&self) -> TaskType {
        match self {
            Self::PushStoragePolicy(_) => TaskType::PushStoragePolicy,
        }
    }
}

/// Serializable task handed to a dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentTaskRequest {
    /// Addressed backend.
    pub backend_id: BackendId,
    /// Task signature.
    pub signature: TaskSignature,
    /// Kind-specific body.
    pub body: AgentTaskBody,
}

impl AgentTaskRequest {
    /// Returns the task tag.
    #[must_use]
    pub const fn task_type(&self) -> TaskType {
        self.body.task_type()
    }
}
