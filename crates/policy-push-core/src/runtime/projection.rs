// crates/policy-push-core/src/runtime/projection.rs
// ============================================================================
// Module: Policy Push Projection
// Description: Builds the per-backend storage policy push request.
// Purpose: Project lock-guarded catalog entities into an owned wire request.
// Dependencies: crate::{core, interfaces}, serde, thiserror
// ============================================================================

//! ## Overview
//! [`PushStoragePolicyTask`] carries a backend id, a policy snapshot, a
//! resource snapshot, and the ids of recently dropped policies. Its single
//! operation, [`PushStoragePolicyTask::to_wire_request`], reads each entity
//! under its own scoped shared lock and emits a [`PushStoragePolicyRequest`]
//! plus a [`ProjectionReport`] listing every item that was left out.
//!
//! ## Invariants
//! - Output order mirrors input order for policies and resources.
//! - At most one entity lock is held at a time, always in shared mode.
//! - A policy whose resource is missing or not S3 is skipped; the rest of the
//!   build continues.
//! - Dropped policy ids pass through untouched (no dedup, no sort).
//!
//! ## Consistency
//! A policy and the resource it names are read under separate lock scopes.
//! Concurrent writers may change either between the two reads, so a pushed
//! policy can reference a resource version newer or older than the one in the
//! same request. The next push cycle converges.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::catalog::DEFAULT_S3_CONNECTION_TIMEOUT_MS;
use crate::core::catalog::DEFAULT_S3_MAX_CONNECTIONS;
use crate::core::catalog::DEFAULT_S3_REQUEST_TIMEOUT_MS;
use crate::core::catalog::ResourceType;
use crate::core::catalog::S3_ACCESS_KEY;
use crate::core::catalog::S3_BUCKET;
use crate::core::catalog::S3_CONNECTION_TIMEOUT_MS;
use crate::core::catalog::S3_ENDPOINT;
use crate::core::catalog::S3_MAX_CONNECTIONS;
use crate::core::catalog::S3_REGION;
use crate::core::catalog::S3_REQUEST_TIMEOUT_MS;
use crate::core::catalog::S3_ROOT_PATH;
use crate::core::catalog::S3_SECRET_KEY;
use crate::core::catalog::StoragePolicy;
use crate::core::catalog::StorageResource;
use crate::core::guarded::Guarded;
use crate::core::identifiers::BackendId;
use crate::core::identifiers::PolicyId;
use crate::core::identifiers::ResourceId;
use crate::core::wire::PushStoragePolicyRequest;
use crate::core::wire::S3StorageParam;
use crate::core::wire::WireStoragePolicy;
use crate::core::wire::WireStorageResource;
use crate::interfaces::ResourceResolver;

// ============================================================================
// SECTION: Options
// ============================================================================

/// Handling of resource properties that fail to parse as integers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidPropertyPolicy {
    /// Skip the offending resource and keep building.
    #[default]
    SkipResource,
    /// Abort the whole build.
    FailBuild,
}

/// Integer fallbacks for absent S3 numeric properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct S3Defaults {
    /// Fallback for the max connections property.
    pub max_connections: i32,
    /// Fallback for the request timeout property (milliseconds).
    pub request_timeout_ms: i32,
    /// Fallback for the connection timeout property (milliseconds).
    pub connection_timeout_ms: i32,
}

impl Default for S3Defaults {
    fn default() -> Self {
        Self {
            max_connections: parse_builtin_default(DEFAULT_S3_MAX_CONNECTIONS, 50),
            request_timeout_ms: parse_builtin_default(DEFAULT_S3_REQUEST_TIMEOUT_MS, 3_000),
            connection_timeout_ms: parse_builtin_default(DEFAULT_S3_CONNECTION_TIMEOUT_MS, 1_000),
        }
    }
}

/// Parses a built-in default string, falling back to the literal value.
fn parse_builtin_default(raw: &str, literal: i32) -> i32 {
    raw.parse().unwrap_or(literal)
}

/// Options controlling a projection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProjectionOptions {
    /// Behavior on malformed numeric resource properties.
    pub on_invalid_property: InvalidPropertyPolicy,
    /// Fallbacks for absent numeric properties.
    pub s3_defaults: S3Defaults,
}

// ============================================================================
// SECTION: Diagnostics
// ============================================================================

/// Catalog item left out of a build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkippedItem {
    /// A storage policy.
    Policy {
        /// Policy identifier.
        id: PolicyId,
        /// Policy name.
        name: String,
    },
    /// A storage resource.
    Resource {
        /// Resource identifier.
        id: ResourceId,
        /// Resource name.
        name: String,
    },
}

/// Reason an item was left out of a build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum SkipReason {
    /// Referenced resource does not exist.
    ResourceNotFound {
        /// Name that failed to resolve.
        resource_name: String,
    },
    /// Resource exists but is not S3.
    NotS3Resource {
        /// Resource name.
        resource_name: String,
        /// Actual resource type.
        resource_type: ResourceType,
    },
    /// Numeric property is not an integer.
    InvalidProperty {
        /// Property key.
        property: String,
        /// Raw property value.
        value: String,
    },
}

/// One skipped item and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectionSkip {
    /// Item left out.
    pub item: SkippedItem,
    /// Why it was left out.
    pub reason: SkipReason,
}

/// Diagnostics gathered during one build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectionReport {
    /// Skipped items in encounter order (policies first, then resources).
    pub skips: Vec<ProjectionSkip>,
}

impl ProjectionReport {
    /// Returns true when nothing was skipped.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.skips.is_empty()
    }

    /// Returns the ids of skipped policies.
    #[must_use]
    pub fn skipped_policy_ids(&self) -> Vec<PolicyId> {
        self.skips
            .iter()
            .filter_map(|skip| match skip.item {
                SkippedItem::Policy {
                    id, ..
                } => Some(id),
                SkippedItem::Resource {
                    ..
                } => None,
            })
            .collect()
    }

    /// Returns the ids of skipped resources.
    #[must_use]
    pub fn skipped_resource_ids(&self) -> Vec<ResourceId> {
        self.skips
            .iter()
            .filter_map(|skip| match skip.item {
                SkippedItem::Resource {
                    id, ..
                } => Some(id),
                SkippedItem::Policy {
                    ..
                } => None,
            })
            .collect()
    }
}

/// Wire request plus the diagnostics from building it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectionOutput {
    /// Request for the backend.
    pub request: PushStoragePolicyRequest,
    /// Items left out of the request.
    pub report: ProjectionReport,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors that abort a whole build.
#[derive(Debug, Error)]
pub enum ProjectionError {
    /// Numeric property failed to parse under [`InvalidPropertyPolicy::FailBuild`].
    #[error("resource {resource} property {property} is not an integer: '{value}'")]
    InvalidProperty {
        /// Resource name.
        resource: String,
        /// Property key.
        property: String,
        /// Raw property value.
        value: String,
    },
}

// ============================================================================
// SECTION: Push Task
// ============================================================================

/// Per-backend storage policy push.
///
/// Holds shared handles to the snapshot entities for the duration of one
/// dispatch cycle. Never mutates them.
#[derive(Debug, Clone)]
pub struct PushStoragePolicyTask {
    /// Addressed backend.
    backend_id: BackendId,
    /// Policy snapshot in push order.
    policies: Vec<Arc<Guarded<StoragePolicy>>>,
    /// Resource snapshot in push order.
    resources: Vec<Arc<Guarded<StorageResource>>>,
    /// Policies dropped since the previous push.
    dropped_policy_ids: Vec<PolicyId>,
}

impl PushStoragePolicyTask {
    /// Creates a push task from catalog snapshots.
    #[must_use]
    pub const fn new(
        backend_id: BackendId,
        policies: Vec<Arc<Guarded<StoragePolicy>>>,
        resources: Vec<Arc<Guarded<StorageResource>>>,
        dropped_policy_ids: Vec<PolicyId>,
    ) -> Self {
        Self {
            backend_id,
            policies,
            resources,
            dropped_policy_ids,
        }
    }

    /// Returns the addressed backend.
    #[must_use]
    pub const fn backend_id(&self) -> BackendId {
        self.backend_id
    }

    /// Returns the policy snapshot.
    #[must_use]
    pub fn policies(&self) -> &[Arc<Guarded<StoragePolicy>>] {
        &self.policies
    }

    /// Returns the resource snapshot.
    #[must_use]
    pub fn resources(&self) -> &[Arc<Guarded<StorageResource>>] {
        &self.resources
    }

    /// Returns the dropped policy ids.
    #[must_use]
    pub fn dropped_policy_ids(&self) -> &[PolicyId] {
        &self.dropped_policy_ids
    }

    /// Projects the snapshots into a wire request.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectionError::InvalidProperty`] only when
    /// `options.on_invalid_property` is [`InvalidPropertyPolicy::FailBuild`]
    /// and a resource carries a malformed numeric property.
    pub fn to_wire_request<R: ResourceResolver + ?Sized>(
        &self,
        resolver: &R,
        options: &ProjectionOptions,
    ) -> Result<ProjectionOutput, ProjectionError> {
        let mut report = ProjectionReport::default();

        let mut storage_policy = Vec::with_capacity(self.policies.len());
        for policy in &self.policies {
            match project_policy(policy, resolver) {
                Ok(item) => storage_policy.push(item),
                Err(skip) => report.skips.push(skip),
            }
        }

        let mut resource = Vec::with_capacity(self.resources.len());
        for entry in &self.resources {
            match project_resource(entry, &options.s3_defaults) {
                Ok(item) => resource.push(item),
                Err(skip) => {
                    if options.on_invalid_property == InvalidPropertyPolicy::FailBuild
                        && let (
                            SkippedItem::Resource {
                                name, ..
                            },
                            SkipReason::InvalidProperty {
                                property,
                                value,
                            },
                        ) = (&skip.item, &skip.reason)
                    {
                        return Err(ProjectionError::InvalidProperty {
                            resource: name.clone(),
                            property: property.clone(),
                            value: value.clone(),
                        });
                    }
                    report.skips.push(skip);
                }
            }
        }

        Ok(ProjectionOutput {
            request: PushStoragePolicyRequest {
                storage_policy,
                resource,
                dropped_storage_policy: self.dropped_policy_ids.clone(),
            },
            report,
        })
    }
}

// ============================================================================
// SECTION: Policy Projection
// ============================================================================

/// Fields copied out of a policy under its shared lock.
struct PolicyFields {
    /// Policy identifier.
    id: PolicyId,
    /// Policy name.
    name: String,
    /// Policy version.
    version: i64,
    /// Referenced resource name.
    resource_name: String,
    /// Absolute cooldown time (epoch milliseconds).
    cooldown_timestamp_ms: i64,
    /// Cooldown TTL (seconds).
    cooldown_ttl_seconds: i64,
}

/// Projects one policy, or explains why it was skipped.
fn project_policy<R: ResourceResolver + ?Sized>(
    policy: &Guarded<StoragePolicy>,
    resolver: &R,
) -> Result<WireStoragePolicy, ProjectionSkip> {
    let fields = {
        let policy = policy.read();
        PolicyFields {
            id: policy.id,
            name: policy.name.clone(),
            version: policy.version,
            resource_name: policy.resource_name.clone(),
            cooldown_timestamp_ms: policy.cooldown_timestamp_ms,
            cooldown_ttl_seconds: policy.cooldown_ttl_seconds,
        }
    };

    let skipped = |reason| ProjectionSkip {
        item: SkippedItem::Policy {
            id: fields.id,
            name: fields.name.clone(),
        },
        reason,
    };

    let Some(resource) = resolver.resolve(&fields.resource_name) else {
        return Err(skipped(SkipReason::ResourceNotFound {
            resource_name: fields.resource_name.clone(),
        }));
    };
    let (resource_id, resource_type) = {
        let resource = resource.read();
        (resource.id, resource.resource_type)
    };
    if resource_type != ResourceType::S3 {
        return Err(skipped(SkipReason::NotS3Resource {
            resource_name: fields.resource_name.clone(),
            resource_type,
        }));
    }

    Ok(WireStoragePolicy {
        id: fields.id,
        name: fields.name,
        version: fields.version,
        resource_id,
        cooldown_datetime: fields.cooldown_timestamp_ms.div_euclid(1_000),
        cooldown_ttl: fields.cooldown_ttl_seconds,
    })
}

// ============================================================================
// SECTION: Resource Projection
// ============================================================================

/// Projects one resource, or explains why it was skipped.
fn project_resource(
    resource: &Guarded<StorageResource>,
    defaults: &S3Defaults,
) -> Result<WireStorageResource, ProjectionSkip> {
    let resource = resource.read();
    let skipped = |reason| ProjectionSkip {
        item: SkippedItem::Resource {
            id: resource.id,
            name: resource.name.clone(),
        },
        reason,
    };

    if !resource.is_s3() {
        return Err(skipped(SkipReason::NotS3Resource {
            resource_name: resource.name.clone(),
            resource_type: resource.resource_type,
        }));
    }

    let copy = |key: &str| resource.property(key).map(str::to_string);
    let s3_storage_param = S3StorageParam {
        endpoint: copy(S3_ENDPOINT),
        region: copy(S3_REGION),
        ak: copy(S3_ACCESS_KEY),
        sk: copy(S3_SECRET_KEY),
        root_path: copy(S3_ROOT_PATH),
        bucket: copy(S3_BUCKET),
        max_conn: int_property(&resource, S3_MAX_CONNECTIONS, defaults.max_connections)
            .map_err(&skipped)?,
        request_timeout_ms: int_property(
            &resource,
            S3_REQUEST_TIMEOUT_MS,
            defaults.request_timeout_ms,
        )
        .map_err(&skipped)?,
        conn_timeout_ms: int_property(
            &resource,
            S3_CONNECTION_TIMEOUT_MS,
            defaults.connection_timeout_ms,
        )
        .map_err(&skipped)?,
    };

    Ok(WireStorageResource {
        id: resource.id,
        name: resource.name.clone(),
        version: resource.version,
        s3_storage_param,
    })
}

/// Reads an integer property, using `default` when it is absent.
fn int_property(resource: &StorageResource, key: &str, default: i32) -> Result<i32, SkipReason> {
    resource.property(key).map_or(Ok(default), |raw| {
        raw.parse().map_err(|_| SkipReason::InvalidProperty {
            property: key.to_string(),
            value: raw.to_string(),
        })
    })
}
