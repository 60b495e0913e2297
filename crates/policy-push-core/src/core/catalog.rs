// crates/policy-push-core/src/core/catalog.rs
// ============================================================================
// Module: Policy Push Catalog Entities
// Description: Storage policies, storage resources, and S3 property keys.
// Purpose: Model the master-side catalog objects that get pushed to backends.
// Dependencies: crate::core::identifiers, serde
// ============================================================================

//! ## Overview
//! A [`StoragePolicy`] names a cooldown rule and the [`StorageResource`] that
//! cooled data moves to. Resources carry their connection settings as a flat
//! string property map; only S3 resources are pushed to backends.
//!
//! These types hold no locks themselves. Shared instances live behind
//! [`Guarded`](crate::core::guarded::Guarded) in the catalog.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::PolicyId;
use crate::core::identifiers::ResourceId;

// ============================================================================
// SECTION: S3 Property Keys
// ============================================================================

/// S3 endpoint property key.
pub const S3_ENDPOINT: &str = "AWS_ENDPOINT";
/// S3 region property key.
pub const S3_REGION: &str = "AWS_REGION";
/// S3 access key property key.
pub const S3_ACCESS_KEY: &str = "AWS_ACCESS_KEY";
/// S3 secret key property key.
pub const S3_SECRET_KEY: &str = "AWS_SECRET_KEY";
/// S3 root path property key.
pub const S3_ROOT_PATH: &str = "AWS_ROOT_PATH";
/// S3 bucket property key.
pub const S3_BUCKET: &str = "AWS_BUCKET";
/// S3 max connections property key.
pub const S3_MAX_CONNECTIONS: &str = "AWS_MAX_CONNECTIONS";
/// S3 request timeout property key (milliseconds).
pub const S3_REQUEST_TIMEOUT_MS: &str = "AWS_REQUEST_TIMEOUT_MS";
/// S3 connection timeout property key (milliseconds).
pub const S3_CONNECTION_TIMEOUT_MS: &str = "AWS_CONNECTION_TIMEOUT_MS";

/// Default for [`S3_MAX_CONNECTIONS`] when the property is absent.
pub const DEFAULT_S3_MAX_CONNECTIONS: &str = "50";
/// Default for [`S3_REQUEST_TIMEOUT_MS`] when the property is absent.
pub const DEFAULT_S3_REQUEST_TIMEOUT_MS: &str = "3000";
/// Default for [`S3_CONNECTION_TIMEOUT_MS`] when the property is absent.
pub const DEFAULT_S3_CONNECTION_TIMEOUT_MS: &str = "1000";

// ============================================================================
// SECTION: Storage Policy
// ============================================================================

/// Cooldown rule mapping data age to an external storage resource.
///
/// # Invariants
/// - `version` increases on every catalog mutation; consumers copy it
///   verbatim and never interpret it.
/// - A non-positive `cooldown_timestamp_ms` means the absolute cooldown
///   time is disabled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoragePolicy {
    /// Policy identifier.
    pub id: PolicyId,
    /// Unique policy name.
    pub name: String,
    /// Catalog version of this policy.
    pub version: i64,
    /// Name of the storage resource cooled data moves to.
    pub resource_name: String,
    /// Absolute cooldown time (epoch milliseconds).
    #[serde(default = "disabled_cooldown_timestamp")]
    pub cooldown_timestamp_ms: i64,
    /// Cooldown TTL in seconds.
    #[serde(default = "disabled_cooldown_ttl")]
    pub cooldown_ttl_seconds: i64,
}

impl StoragePolicy {
    /// Creates a policy with both cooldown conditions disabled.
    #[must_use]
    pub fn new(
        id: PolicyId,
        name: impl Into<String>,
        version: i64,
        resource_name: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            version,
            resource_name: resource_name.into(),
            cooldown_timestamp_ms: disabled_cooldown_timestamp(),
            cooldown_ttl_seconds: disabled_cooldown_ttl(),
        }
    }

    /// Sets the absolute cooldown time.
    #[must_use]
    pub const fn with_cooldown_timestamp_ms(mut self, timestamp_ms: i64) -> Self {
        self.cooldown_timestamp_ms = timestamp_ms;
        self
    }

    /// Sets the cooldown TTL.
    #[must_use]
    pub const fn with_cooldown_ttl_seconds(mut self, ttl_seconds: i64) -> Self {
        self.cooldown_ttl_seconds = ttl_seconds;
        self
    }
}

/// Sentinel for an unset absolute cooldown time.
const fn disabled_cooldown_timestamp() -> i64 {
    -1
}

/// Sentinel for an unset cooldown TTL.
const fn disabled_cooldown_ttl() -> i64 {
    -1
}

// ============================================================================
// SECTION: Storage Resource
// ============================================================================

/// External resource kinds known to the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    /// S3-compatible object storage.
    S3,
    /// HDFS cluster.
    Hdfs,
    /// JDBC data source.
    Jdbc,
    /// ODBC data source.
    Odbc,
    /// Spark cluster.
    Spark,
    /// Elasticsearch cluster.
    Es,
}

impl ResourceType {
    /// Returns the canonical lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::S3 => "s3",
            Self::Hdfs => "hdfs",
            Self::Jdbc => "jdbc",
            Self::Odbc => "odbc",
            Self::Spark => "spark",
            Self::Es => "es",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named external storage target with connection properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageResource {
    /// Resource identifier.
    pub id: ResourceId,
    /// Unique resource name.
    pub name: String,
    /// Catalog version of this resource.
    pub version: i64,
    /// Resource kind.
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
    /// Connection properties keyed by property name.
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

impl StorageResource {
    /// Creates a resource with an empty property map.
    #[must_use]
    pub fn new(
        id: ResourceId,
        name: impl Into<String>,
        version: i64,
        resource_type: ResourceType,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            version,
            resource_type,
            properties: BTreeMap::new(),
        }
    }

    /// Adds or replaces a property.
    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Returns a property value by key.
    #[must_use]
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    /// Returns true for S3-compatible resources.
    #[must_use]
    pub fn is_s3(&self) -> bool {
        self.resource_type == ResourceType::S3
    }
}
