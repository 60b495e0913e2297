// crates/policy-push-core/src/runtime/audit.rs
// ============================================================================
// Module: Policy Push Audit Logging
// Description: Structured audit events for push builds and skipped items.
// Purpose: Emit JSON-line records without tying the core to a log framework.
// Dependencies: crate::{core, runtime::projection}, serde, serde_json
// ============================================================================

//! ## Overview
//! Each build emits one [`PushSkipEvent`] per skipped policy or resource and
//! one [`PushBuildEvent`] summarizing the request. Deployments choose where
//! the JSON lines go by picking a [`PushAuditSink`].
//!
//! Security posture: events never carry resource credentials.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

use crate::core::digest::ContentDigest;
use crate::core::identifiers::BackendId;
use crate::core::wire::PushStoragePolicyRequest;
use crate::runtime::projection::ProjectionSkip;

// ============================================================================
// SECTION: Events
// ============================================================================

/// Audit event for one item left out of a push.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PushSkipEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Addressed backend.
    pub backend_id: BackendId,
    /// Skipped item and reason.
    #[serde(flatten)]
    pub skip: ProjectionSkip,
}

impl PushSkipEvent {
    /// Creates a skip event stamped with the current time.
    #[must_use]
    pub fn new(backend_id: BackendId, skip: ProjectionSkip) -> Self {
        Self {
            event: "policy_push_skip",
            timestamp_ms: now_ms(),
            backend_id,
            skip,
        }
    }
}

/// Audit event summarizing one built push request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PushBuildEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Addressed backend.
    pub backend_id: BackendId,
    /// Policies included in the request.
    pub policies: usize,
    /// Resources included in the request.
    pub resources: usize,
    /// Dropped policy ids carried by the request.
    pub dropped: usize,
    /// Items left out of the request.
    pub skipped: usize,
    /// Canonical request digest when it could be computed.
    pub digest: Option<ContentDigest>,
}

impl PushBuildEvent {
    /// Creates a build summary stamped with the current time.
    #[must_use]
    pub fn new(
        backend_id: BackendId,
        request: &PushStoragePolicyRequest,
        skipped: usize,
        digest: Option<ContentDigest>,
    ) -> Self {
        Self {
            event: "policy_push_build",
            timestamp_ms: now_ms(),
            backend_id,
            policies: request.storage_policy.len(),
            resources: request.resource.len(),
            dropped: request.dropped_storage_policy.len(),
            skipped,
            digest,
        }
    }
}

/// Returns wall-clock milliseconds since the epoch.
fn now_ms() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis()
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Audit sink for push events.
pub trait PushAuditSink: Send + Sync {
    /// Records a skipped item.
    fn record_skip(&self, event: &PushSkipEvent);

    /// Records a build summary.
    fn record_build(&self, _event: &PushBuildEvent) {}
}

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl PushAuditSink for StderrAuditSink {
    fn record_skip(&self, event: &PushSkipEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(io::stderr(), "{payload}");
        }
    }

    fn record_build(&self, event: &PushBuildEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that appends JSON lines to a file.
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }

    /// Writes one serialized event.
    fn append<T: Serialize>(&self, event: &T) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

impl PushAuditSink for FileAuditSink {
    fn record_skip(&self, event: &PushSkipEvent) {
        self.append(event);
    }

    fn record_build(&self, event: &PushBuildEvent) {
        self.append(event);
    }
}

/// No-op audit sink.
pub struct NoopAuditSink;

impl PushAuditSink for NoopAuditSink {
    fn record_skip(&self, _event: &PushSkipEvent) {}

    fn record_build(&self, _event: &PushBuildEvent) {}
}

/// Recorded audit event held by [`MemoryAuditSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedAuditEvent {
    /// Skip event.
    Skip(PushSkipEvent),
    /// Build summary event.
    Build(PushBuildEvent),
}

/// Audit sink that keeps events in memory for inspection.
#[derive(Default)]
pub struct MemoryAuditSink {
    /// Events in record order.
    events: Mutex<Vec<RecordedAuditEvent>>,
}

impl MemoryAuditSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of all recorded events.
    #[must_use]
    pub fn events(&self) -> Vec<RecordedAuditEvent> {
        self.events.lock().map(|events| events.clone()).unwrap_or_default()
    }

    /// Returns recorded skip events.
    #[must_use]
    pub fn skips(&self) -> Vec<PushSkipEvent> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                RecordedAuditEvent::Skip(skip) => Some(skip),
                RecordedAuditEvent::Build(_) => None,
            })
            .collect()
    }

    /// Stores one event.
    fn push(&self, event: RecordedAuditEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl PushAuditSink for MemoryAuditSink {
    fn record_skip(&self, event: &PushSkipEvent) {
        self.push(RecordedAuditEvent::Skip(event.clone()));
    }

    fn record_build(&self, event: &PushBuildEvent) {
        self.push(RecordedAuditEvent::Build(event.clone()));
    }
}
