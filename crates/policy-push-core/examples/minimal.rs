// crates/policy-push-core/examples/minimal.rs
// ============================================================================
// Module: Policy Push Minimal Example
// Description: Minimal storage policy push using the in-memory catalog.
// Purpose: Demonstrate catalog snapshots, projection, and dispatch.
// Dependencies: policy-push-core
// ============================================================================

//! ## Overview
//! Registers one S3 resource and two policies (one dangling), pushes them to
//! a backend through a collecting dispatcher, and checks the skip report.

use std::sync::Mutex;

use policy_push_core::AgentTask;
use policy_push_core::AgentTaskDispatcher;
use policy_push_core::AgentTaskRequest;
use policy_push_core::BackendId;
use policy_push_core::DispatchError;
use policy_push_core::InMemoryCatalog;
use policy_push_core::NoopAuditSink;
use policy_push_core::PolicyId;
use policy_push_core::ProjectionOptions;
use policy_push_core::ResourceId;
use policy_push_core::ResourceType;
use policy_push_core::StoragePolicy;
use policy_push_core::StorageResource;
use policy_push_core::core::catalog::S3_BUCKET;
use policy_push_core::core::catalog::S3_ENDPOINT;
use policy_push_core::send_task;

/// Example error for unexpected outcomes.
#[derive(Debug)]
struct ExampleError(&'static str);

impl std::fmt::Display for ExampleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

impl std::error::Error for ExampleError {}

/// Dispatcher that keeps every request in memory.
#[derive(Default)]
struct CollectingDispatcher {
    /// Requests in dispatch order.
    sent: Mutex<Vec<AgentTaskRequest>>,
}

impl AgentTaskDispatcher for CollectingDispatcher {
    fn dispatch(&self, request: &AgentTaskRequest) -> Result<(), DispatchError> {
        self.sent
            .lock()
            .map_err(|_| DispatchError::DispatchFailed("dispatcher poisoned".to_string()))?
            .push(request.clone());
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let catalog = InMemoryCatalog::new();
    catalog.insert_resource(
        StorageResource::new(ResourceId::new(10), "cold", 1, ResourceType::S3)
            .with_property(S3_ENDPOINT, "http://s3.local")
            .with_property(S3_BUCKET, "archive"),
    )?;
    catalog.insert_policy(
        StoragePolicy::new(PolicyId::new(1), "hot_to_cold", 1, "cold")
            .with_cooldown_ttl_seconds(86_400),
    )?;
    catalog.insert_policy(StoragePolicy::new(PolicyId::new(2), "dangling", 1, "missing"))?;

    let dispatcher = CollectingDispatcher::default();
    for backend in [10_001, 10_002] {
        let task = AgentTask::push_storage_policy(catalog.push_task(BackendId::new(backend)));
        let report =
            send_task(&task, &catalog, &ProjectionOptions::default(), &NoopAuditSink, &dispatcher)?;
        if report.skipped_policy_ids() != vec![PolicyId::new(2)] {
            return Err(Box::new(ExampleError("expected the dangling policy to be skipped")));
        }
    }

    let sent = dispatcher.sent.lock().map_err(|_| ExampleError("dispatcher poisoned"))?.len();
    if sent != 2 {
        return Err(Box::new(ExampleError("expected one request per backend")));
    }
    Ok(())
}
