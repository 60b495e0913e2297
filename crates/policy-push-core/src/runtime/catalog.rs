// crates/policy-push-core/src/runtime/catalog.rs
// ============================================================================
// Module: Policy Push In-Memory Catalog
// Description: Simple policy and resource registry for tests and tooling.
// Purpose: Provide snapshots and resource lookups without a metadata service.
// Dependencies: crate::{core, interfaces, runtime::projection}, parking_lot, thiserror
// ============================================================================

//! ## Overview
//! [`InMemoryCatalog`] owns lock-guarded policies and resources keyed by
//! name, tracks policies dropped since the last drain, and implements
//! [`ResourceResolver`]. Mutations take the entity's exclusive lock and bump
//! its version. It is not intended as the production metadata store.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::Mutex;
use parking_lot::RwLock;
use thiserror::Error;

use crate::core::catalog::StoragePolicy;
use crate::core::catalog::StorageResource;
use crate::core::guarded::Guarded;
use crate::core::identifiers::BackendId;
use crate::core::identifiers::PolicyId;
use crate::interfaces::ResourceResolver;
use crate::runtime::projection::PushStoragePolicyTask;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Catalog mutation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// An entity with the same name already exists.
    #[error("catalog conflict: {0} already exists")]
    Conflict(String),
    /// No entity with the given name exists.
    #[error("catalog entry not found: {0}")]
    NotFound(String),
    /// An update tried to change the entity's name.
    #[error("catalog entry {from} cannot be renamed to {to}")]
    Rename {
        /// Name the entity is registered under.
        from: String,
        /// Name the update attempted to set.
        to: String,
    },
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Shared policy handle.
pub type SharedPolicy = Arc<Guarded<StoragePolicy>>;
/// Shared resource handle.
pub type SharedResource = Arc<Guarded<StorageResource>>;

/// In-memory policy and resource registry.
#[derive(Debug, Default, Clone)]
pub struct InMemoryCatalog {
    /// Policies keyed by name.
    policies: Arc<RwLock<BTreeMap<String, SharedPolicy>>>,
    /// Resources keyed by name.
    resources: Arc<RwLock<BTreeMap<String, SharedResource>>>,
    /// Policy ids dropped since the last drain.
    dropped: Arc<Mutex<Vec<PolicyId>>>,
}

impl InMemoryCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a policy.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Conflict`] when the name is taken.
    pub fn insert_policy(&self, policy: StoragePolicy) -> Result<SharedPolicy, CatalogError> {
        let mut policies = self.policies.write();
        if policies.contains_key(&policy.name) {
            return Err(CatalogError::Conflict(policy.name));
        }
        let name = policy.name.clone();
        let shared = Arc::new(Guarded::new(policy));
        policies.insert(name, Arc::clone(&shared));
        Ok(shared)
    }

    /// Registers a resource.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Conflict`] when the name is taken.
    pub fn insert_resource(
        &self,
        resource: StorageResource,
    ) -> Result<SharedResource, CatalogError> {
        let mut resources = self.resources.write();
        if resources.contains_key(&resource.name) {
            return Err(CatalogError::Conflict(resource.name));
        }
        let name = resource.name.clone();
        let shared = Arc::new(Guarded::new(resource));
        resources.insert(name, Arc::clone(&shared));
        Ok(shared)
    }

    /// Returns a policy by name.
    #[must_use]
    pub fn policy(&self, name: &str) -> Option<SharedPolicy> {
        self.policies.read().get(name).cloned()
    }

    /// Mutates a policy under its exclusive lock and bumps its version.
    ///
    /// The mutation runs on a copy and is committed only when the name is
    /// unchanged; renames go through drop and insert.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] when the policy does not exist and
    /// [`CatalogError::Rename`] when the mutation changes its name.
    pub fn update_policy(
        &self,
        name: &str,
        mutate: impl FnOnce(&mut StoragePolicy),
    ) -> Result<i64, CatalogError> {
        let shared = self.policy(name).ok_or_else(|| CatalogError::NotFound(name.to_string()))?;
        let mut policy = shared.write();
        let mut updated = policy.clone();
        mutate(&mut updated);
        ensure_same_name(&policy.name, &updated.name)?;
        updated.version += 1;
        *policy = updated;
        Ok(policy.version)
    }

    /// Mutates a resource under its exclusive lock and bumps its version.
    ///
    /// The mutation runs on a copy and is committed only when the name is
    /// unchanged; renames go through remove and insert.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] when the resource does not exist and
    /// [`CatalogError::Rename`] when the mutation changes its name.
    pub fn update_resource(
        &self,
        name: &str,
        mutate: impl FnOnce(&mut StorageResource),
    ) -> Result<i64, CatalogError> {
        let shared = self.resolve(name).ok_or_else(|| CatalogError::NotFound(name.to_string()))?;
        let mut resource = shared.write();
        let mut updated = resource.clone();
        mutate(&mut updated);
        ensure_same_name(&resource.name, &updated.name)?;
        updated.version += 1;
        *resource = updated;
        Ok(resource.version)
    }

    /// Removes a policy and queues its id for the next push.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] when the policy does not exist.
    pub fn drop_policy(&self, name: &str) -> Result<PolicyId, CatalogError> {
        let shared = self
            .policies
            .write()
            .remove(name)
            .ok_or_else(|| CatalogError::NotFound(name.to_string()))?;
        let id = shared.read().id;
        self.dropped.lock().push(id);
        Ok(id)
    }

    /// Removes a resource. Policies naming it stop resolving.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] when the resource does not exist.
    pub fn remove_resource(&self, name: &str) -> Result<SharedResource, CatalogError> {
        self.resources.write().remove(name).ok_or_else(|| CatalogError::NotFound(name.to_string()))
    }

    /// Returns every policy, ordered by name.
    #[must_use]
    pub fn policy_snapshot(&self) -> Vec<SharedPolicy> {
        self.policies.read().values().cloned().collect()
    }

    /// Returns every resource, ordered by name.
    #[must_use]
    pub fn resource_snapshot(&self) -> Vec<SharedResource> {
        self.resources.read().values().cloned().collect()
    }

    /// Returns S3 resources only, ordered by name.
    #[must_use]
    pub fn s3_resource_snapshot(&self) -> Vec<SharedResource> {
        self.resource_snapshot().into_iter().filter(|resource| resource.read().is_s3()).collect()
    }

    /// Returns dropped policy ids without clearing them.
    #[must_use]
    pub fn dropped_policy_ids(&self) -> Vec<PolicyId> {
        self.dropped.lock().clone()
    }

    /// Returns and clears dropped policy ids.
    #[must_use]
    pub fn drain_dropped_policy_ids(&self) -> Vec<PolicyId> {
        std::mem::take(&mut *self.dropped.lock())
    }

    /// Snapshots the catalog into a push task for one backend.
    ///
    /// Dropped ids are read, not drained; several backends share one drop
    /// list per cycle.
    #[must_use]
    pub fn push_task(&self, backend_id: BackendId) -> PushStoragePolicyTask {
        PushStoragePolicyTask::new(
            backend_id,
            self.policy_snapshot(),
            self.s3_resource_snapshot(),
            self.dropped_policy_ids(),
        )
    }
}

/// Rejects updates that would desynchronize an entity from its map key.
fn ensure_same_name(current: &str, updated: &str) -> Result<(), CatalogError> {
    if current == updated {
        return Ok(());
    }
    Err(CatalogError::Rename {
        from: current.to_string(),
        to: updated.to_string(),
    })
}

impl ResourceResolver for InMemoryCatalog {
    fn resolve(&self, name: &str) -> Option<SharedResource> {
        self.resources.read().get(name).cloned()
    }
}
