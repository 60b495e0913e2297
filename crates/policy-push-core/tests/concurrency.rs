// crates/policy-push-core/tests/concurrency.rs
// ============================================================================
// Module: Concurrent Projection Tests
// Description: Builds racing catalog writers and other builds.
// Purpose: Ensure shared locks are always released and never deadlock.
// Dependencies: policy-push-core
// ============================================================================

//! ## Overview
//! Builds for different backends run in parallel over overlapping snapshots
//! while writers bump versions. Every shared acquisition must be matched by
//! a release once the threads join.

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

use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::thread;

use policy_push_core::BackendId;
use policy_push_core::InMemoryCatalog;
use policy_push_core::ProjectionOptions;
use policy_push_core::PushStoragePolicyTask;
use policy_push_core::ResourceResolver;

use crate::common::mixed_catalog;
use crate::common::policy;
use crate::common::s3_resource;

const BUILDS_PER_BACKEND: usize = 200;

fn assert_catalog_balanced(catalog: &InMemoryCatalog) {
    for policy in catalog.policy_snapshot() {
        let stats = policy.lock_stats();
        assert!(
            stats.is_balanced(),
            "policy {} has {} outstanding",
            policy.read().name,
            stats.outstanding()
        );
    }
    for resource in catalog.resource_snapshot() {
        let stats = resource.lock_stats();
        assert!(
            stats.is_balanced(),
            "resource {} has {} outstanding",
            resource.read().name,
            stats.outstanding()
        );
    }
}

#[test]
fn parallel_builds_with_writers_release_every_lock() {
    let catalog = mixed_catalog();
    let stop = AtomicBool::new(false);

    thread::scope(|scope| {
        scope.spawn(|| {
            while !stop.load(Ordering::Acquire) {
                catalog.update_policy("p-a", |policy| policy.cooldown_ttl_seconds += 1).unwrap();
                catalog.update_resource("cold-b", |_| {}).unwrap();
            }
        });

        let builders: Vec<_> = [1_i64, 2]
            .into_iter()
            .map(|backend| {
                let catalog = &catalog;
                scope.spawn(move || {
                    for _ in 0 .. BUILDS_PER_BACKEND {
                        let output = catalog
                            .push_task(BackendId::new(backend))
                            .to_wire_request(catalog, &ProjectionOptions::default())
                            .unwrap();
                        assert_eq!(output.request.storage_policy.len(), 2);
                        assert_eq!(output.request.resource.len(), 2);
                        assert_eq!(output.report.skipped_policy_ids().len(), 2);
                    }
                })
            })
            .collect();
        let results: Vec<_> = builders.into_iter().map(|builder| builder.join()).collect();
        stop.store(true, Ordering::Release);
        for result in results {
            result.unwrap();
        }
    });

    assert_catalog_balanced(&catalog);
    let cold_b = catalog.resolve("cold-b").unwrap();
    assert!(cold_b.lock_stats().read_acquired > 0);
}

#[test]
fn shared_snapshot_across_backends_stays_balanced() {
    let catalog = InMemoryCatalog::new();
    catalog.insert_resource(s3_resource(1, "cold")).unwrap();
    for id in 0 .. 16 {
        let target = if id % 4 == 0 { "missing" } else { "cold" };
        catalog.insert_policy(policy(id, &format!("p-{id:02}"), target)).unwrap();
    }
    let policies = catalog.policy_snapshot();
    let resources = catalog.s3_resource_snapshot();

    thread::scope(|scope| {
        for backend in 0 .. 4 {
            let task = PushStoragePolicyTask::new(
                BackendId::new(backend),
                policies.clone(),
                resources.clone(),
                Vec::new(),
            );
            let catalog = &catalog;
            scope.spawn(move || {
                let output = task.to_wire_request(catalog, &ProjectionOptions::default()).unwrap();
                assert_eq!(output.request.storage_policy.len(), 12);
                assert_eq!(output.report.skipped_policy_ids().len(), 4);
            });
        }
    });

    for policy in &policies {
        assert_eq!(policy.lock_stats().read_acquired, 4);
        assert!(policy.lock_stats().is_balanced());
    }
    assert_catalog_balanced(&catalog);
}

#[test]
fn build_succeeds_while_caller_holds_a_shared_lock() {
    let catalog = mixed_catalog();
    let cold_a = catalog.resolve("cold-a").unwrap();
    let held = cold_a.read();

    thread::scope(|scope| {
        let writer = scope.spawn(|| catalog.update_resource("cold-a", |_| {}).unwrap());
        let output = catalog
            .push_task(BackendId::new(1))
            .to_wire_request(&catalog, &ProjectionOptions::default())
            .unwrap();
        assert_eq!(output.request.storage_policy.len(), 2);
        drop(held);
        assert_eq!(writer.join().unwrap(), 2);
    });

    assert_catalog_balanced(&catalog);
}
