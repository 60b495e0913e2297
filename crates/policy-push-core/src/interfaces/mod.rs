// crates/policy-push-core/src/interfaces/mod.rs
// ============================================================================
// Module: Policy Push Interfaces
// Description: Seams to the resource registry and the task dispatcher.
// Purpose: Keep catalog ownership and transport outside the projection core.
// Dependencies: crate::core, thiserror
// ============================================================================

//! ## Overview
//! The projection core consumes a [`ResourceResolver`] and produces requests
//! for an [`AgentTaskDispatcher`]. Neither the catalog's storage nor the RPC
//! transport lives in this crate.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use thiserror::Error;

use crate::core::catalog::StorageResource;
use crate::core::guarded::Guarded;
use crate::core::task::AgentTaskRequest;

// ============================================================================
// SECTION: Resource Resolver
// ============================================================================

/// Read-only lookup of storage resources by name.
///
/// Lookups are not coordinated with any policy lock. A resource may be
/// renamed or dropped between a policy write and the lookup.
pub trait ResourceResolver {
    /// Resolves a resource by name, returning `None` when it does not exist.
    fn resolve(&self, name: &str) -> Option<Arc<Guarded<StorageResource>>>;
}

impl<T: ResourceResolver + ?Sized> ResourceResolver for &T {
    fn resolve(&self, name: &str) -> Option<Arc<Guarded<StorageResource>>> {
        (**self).resolve(name)
    }
}

impl<T: ResourceResolver + ?Sized> ResourceResolver for Arc<T> {
    fn resolve(&self, name: &str) -> Option<Arc<Guarded<StorageResource>>> {
        (**self).resolve(name)
    }
}

// ============================================================================
// SECTION: Dispatcher
// ============================================================================

/// Dispatch errors for agent task delivery.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Backend is unknown or not reachable.
    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),
    /// Dispatcher reported an error.
    #[error("dispatch error: {0}")]
    DispatchFailed(String),
}

/// Dispatcher responsible for sending agent tasks to backends.
pub trait AgentTaskDispatcher {
    /// Sends a task to the backend it addresses.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError`] when the task cannot be handed off.
    fn dispatch(&self, request: &AgentTaskRequest) -> Result<(), DispatchError>;
}
