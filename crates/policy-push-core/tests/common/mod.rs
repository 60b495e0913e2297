// crates/policy-push-core/tests/common/mod.rs
// ============================================================================
// Module: Shared Test Fixtures
// Description: Catalog fixtures reused across projection tests.
// ============================================================================

//! Shared fixtures for policy push tests.

use std::sync::Arc;

use policy_push_core::Guarded;
use policy_push_core::InMemoryCatalog;
use policy_push_core::PolicyId;
use policy_push_core::ResourceId;
use policy_push_core::ResourceType;
use policy_push_core::StoragePolicy;
use policy_push_core::StorageResource;
use policy_push_core::core::catalog::S3_ACCESS_KEY;
use policy_push_core::core::catalog::S3_BUCKET;
use policy_push_core::core::catalog::S3_ENDPOINT;
use policy_push_core::core::catalog::S3_REGION;
use policy_push_core::core::catalog::S3_ROOT_PATH;
use policy_push_core::core::catalog::S3_SECRET_KEY;

/// Builds an S3 resource with all six string properties set.
pub fn s3_resource(id: i64, name: &str) -> StorageResource {
    StorageResource::new(ResourceId::new(id), name, 1, ResourceType::S3)
        .with_property(S3_ENDPOINT, format!("http://{name}.s3.local"))
        .with_property(S3_REGION, "us-east-1")
        .with_property(S3_ACCESS_KEY, format!("ak-{name}"))
        .with_property(S3_SECRET_KEY, format!("sk-{name}"))
        .with_property(S3_ROOT_PATH, format!("/cold/{name}"))
        .with_property(S3_BUCKET, format!("bucket-{name}"))
}

/// Builds a policy with a cooldown TTL of one day.
pub fn policy(id: i64, name: &str, resource_name: &str) -> StoragePolicy {
    StoragePolicy::new(PolicyId::new(id), name, 1, resource_name)
        .with_cooldown_ttl_seconds(86_400)
}

/// Wraps an entity for use in a snapshot.
pub fn shared<T>(value: T) -> Arc<Guarded<T>> {
    Arc::new(Guarded::new(value))
}

/// Catalog with two S3 resources, one HDFS resource, and policies on each.
pub fn mixed_catalog() -> InMemoryCatalog {
    let catalog = InMemoryCatalog::new();
    catalog.insert_resource(s3_resource(100, "cold-a")).unwrap();
    catalog.insert_resource(s3_resource(200, "cold-b")).unwrap();
    let hdfs = StorageResource::new(ResourceId::new(300), "hdfs-1", 1, ResourceType::Hdfs);
    catalog.insert_resource(hdfs).unwrap();
    catalog.insert_policy(policy(1, "p-a", "cold-a")).unwrap();
    catalog.insert_policy(policy(2, "p-b", "cold-b")).unwrap();
    catalog.insert_policy(policy(3, "p-hdfs", "hdfs-1")).unwrap();
    catalog.insert_policy(policy(4, "p-missing", "nope")).unwrap();
    catalog
}
