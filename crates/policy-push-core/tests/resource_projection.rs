// crates/policy-push-core/tests/resource_projection.rs
// ============================================================================
// Module: Resource Projection Tests
// Description: S3 parameter copying, numeric defaults, and parse failures.
// Purpose: Pin how storage resources become wire records.
// Dependencies: policy-push-core
// ============================================================================

//! ## Overview
//! String properties are copied as-is (absent stays absent), numeric ones
//! fall back to defaults, and malformed numbers follow the configured policy.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]
#![allow(dead_code, reason = "Common module may have unused helpers.")]

mod common;

use policy_push_core::BackendId;
use policy_push_core::InMemoryCatalog;
use policy_push_core::InvalidPropertyPolicy;
use policy_push_core::ProjectionError;
use policy_push_core::ProjectionOptions;
use policy_push_core::PushStoragePolicyTask;
use policy_push_core::ResourceId;
use policy_push_core::ResourceType;
use policy_push_core::S3Defaults;
use policy_push_core::SkipReason;
use policy_push_core::SkippedItem;
use policy_push_core::StorageResource;
use policy_push_core::core::catalog::S3_BUCKET;
use policy_push_core::core::catalog::S3_CONNECTION_TIMEOUT_MS;
use policy_push_core::core::catalog::S3_ENDPOINT;
use policy_push_core::core::catalog::S3_MAX_CONNECTIONS;
use policy_push_core::core::catalog::S3_REQUEST_TIMEOUT_MS;

use crate::common::s3_resource;
use crate::common::shared;

fn task_with(resources: Vec<StorageResource>) -> PushStoragePolicyTask {
    PushStoragePolicyTask::new(
        BackendId::new(10_001),
        Vec::new(),
        resources.into_iter().map(shared).collect(),
        Vec::new(),
    )
}

fn fail_build() -> ProjectionOptions {
    ProjectionOptions {
        on_invalid_property: InvalidPropertyPolicy::FailBuild,
        ..ProjectionOptions::default()
    }
}

#[test]
fn string_properties_copy_verbatim() {
    let output = task_with(vec![s3_resource(5, "cold")])
        .to_wire_request(&InMemoryCatalog::new(), &ProjectionOptions::default())
        .unwrap();

    assert!(output.report.is_clean());
    let wire = &output.request.resource[0];
    assert_eq!(wire.id, ResourceId::new(5));
    assert_eq!(wire.name, "cold");
    assert_eq!(wire.version, 1);
    let param = &wire.s3_storage_param;
    assert_eq!(param.endpoint.as_deref(), Some("http://cold.s3.local"));
    assert_eq!(param.region.as_deref(), Some("us-east-1"));
    assert_eq!(param.ak.as_deref(), Some("ak-cold"));
    assert_eq!(param.sk.as_deref(), Some("sk-cold"));
    assert_eq!(param.root_path.as_deref(), Some("/cold/cold"));
    assert_eq!(param.bucket.as_deref(), Some("bucket-cold"));
}

#[test]
fn absent_string_properties_stay_unset() {
    let bare = StorageResource::new(ResourceId::new(1), "bare", 3, ResourceType::S3)
        .with_property(S3_ENDPOINT, "");
    let output = task_with(vec![bare])
        .to_wire_request(&InMemoryCatalog::new(), &ProjectionOptions::default())
        .unwrap();

    let param = &output.request.resource[0].s3_storage_param;
    assert_eq!(param.endpoint.as_deref(), Some(""));
    assert_eq!(param.region, None);
    assert_eq!(param.ak, None);
    assert_eq!(param.sk, None);
    assert_eq!(param.root_path, None);
    assert_eq!(param.bucket, None);
}

#[test]
fn absent_numeric_properties_use_builtin_defaults() {
    let output = task_with(vec![s3_resource(1, "cold")])
        .to_wire_request(&InMemoryCatalog::new(), &ProjectionOptions::default())
        .unwrap();

    let param = &output.request.resource[0].s3_storage_param;
    assert_eq!(param.max_conn, 50);
    assert_eq!(param.request_timeout_ms, 3_000);
    assert_eq!(param.conn_timeout_ms, 1_000);
}

#[test]
fn numeric_properties_land_in_their_own_fields() {
    let resource = s3_resource(1, "cold")
        .with_property(S3_MAX_CONNECTIONS, "100")
        .with_property(S3_REQUEST_TIMEOUT_MS, "5000")
        .with_property(S3_CONNECTION_TIMEOUT_MS, "2000");
    let output = task_with(vec![resource])
        .to_wire_request(&InMemoryCatalog::new(), &ProjectionOptions::default())
        .unwrap();

    let param = &output.request.resource[0].s3_storage_param;
    assert_eq!(param.max_conn, 100);
    assert_eq!(param.request_timeout_ms, 5_000);
    assert_eq!(param.conn_timeout_ms, 2_000);
}

#[test]
fn configured_defaults_replace_builtin_defaults() {
    let options = ProjectionOptions {
        s3_defaults: S3Defaults {
            max_connections: 8,
            request_timeout_ms: 900,
            connection_timeout_ms: 300,
        },
        ..ProjectionOptions::default()
    };
    let resource = s3_resource(1, "cold").with_property(S3_MAX_CONNECTIONS, "64");
    let output =
        task_with(vec![resource]).to_wire_request(&InMemoryCatalog::new(), &options).unwrap();

    let param = &output.request.resource[0].s3_storage_param;
    assert_eq!(param.max_conn, 64);
    assert_eq!(param.request_timeout_ms, 900);
    assert_eq!(param.conn_timeout_ms, 300);
}

#[test]
fn malformed_number_skips_only_that_resource() {
    let broken = s3_resource(2, "broken").with_property(S3_REQUEST_TIMEOUT_MS, "3s");
    let output = task_with(vec![s3_resource(1, "a"), broken, s3_resource(3, "c")])
        .to_wire_request(&InMemoryCatalog::new(), &ProjectionOptions::default())
        .unwrap();

    let ids: Vec<ResourceId> = output.request.resource.iter().map(|wire| wire.id).collect();
    assert_eq!(ids, vec![ResourceId::new(1), ResourceId::new(3)]);
    assert_eq!(output.report.skipped_resource_ids(), vec![ResourceId::new(2)]);
    assert_eq!(
        output.report.skips[0].reason,
        SkipReason::InvalidProperty {
            property: S3_REQUEST_TIMEOUT_MS.to_string(),
            value: "3s".to_string(),
        }
    );
}

#[test]
fn malformed_number_fails_build_when_configured() {
    let broken = s3_resource(2, "broken").with_property(S3_MAX_CONNECTIONS, "lots");
    let err = task_with(vec![s3_resource(1, "a"), broken])
        .to_wire_request(&InMemoryCatalog::new(), &fail_build())
        .unwrap_err();

    let ProjectionError::InvalidProperty {
        resource,
        property,
        value,
    } = err;
    assert_eq!(resource, "broken");
    assert_eq!(property, S3_MAX_CONNECTIONS);
    assert_eq!(value, "lots");
}

#[test]
fn out_of_range_number_is_malformed() {
    let huge = s3_resource(1, "huge").with_property(S3_MAX_CONNECTIONS, "4294967296");
    let output = task_with(vec![huge])
        .to_wire_request(&InMemoryCatalog::new(), &ProjectionOptions::default())
        .unwrap();

    assert!(output.request.resource.is_empty());
    assert_eq!(output.report.skipped_resource_ids(), vec![ResourceId::new(1)]);
}

#[test]
fn non_s3_resource_is_skipped_even_under_fail_build() {
    let hdfs = StorageResource::new(ResourceId::new(9), "hdfs-1", 1, ResourceType::Hdfs)
        .with_property(S3_BUCKET, "ignored");
    let output = task_with(vec![hdfs, s3_resource(1, "cold")])
        .to_wire_request(&InMemoryCatalog::new(), &fail_build())
        .unwrap();

    assert_eq!(output.request.resource.len(), 1);
    assert_eq!(
        output.report.skips[0].item,
        SkippedItem::Resource {
            id: ResourceId::new(9),
            name: "hdfs-1".to_string(),
        }
    );
    assert_eq!(
        output.report.skips[0].reason,
        SkipReason::NotS3Resource {
            resource_name: "hdfs-1".to_string(),
            resource_type: ResourceType::Hdfs,
        }
    );
}

#[test]
fn resource_locks_are_released_after_build() {
    let good = shared(s3_resource(1, "good"));
    let bad = shared(s3_resource(2, "bad").with_property(S3_MAX_CONNECTIONS, "x"));
    let task = PushStoragePolicyTask::new(
        BackendId::new(1),
        Vec::new(),
        vec![good.clone(), bad.clone()],
        Vec::new(),
    );

    let _ = task.to_wire_request(&InMemoryCatalog::new(), &fail_build());
    task.to_wire_request(&InMemoryCatalog::new(), &ProjectionOptions::default()).unwrap();

    assert_eq!(good.lock_stats().read_acquired, 2);
    assert!(good.lock_stats().is_balanced());
    assert_eq!(bad.lock_stats().read_acquired, 2);
    assert!(bad.lock_stats().is_balanced());
}
