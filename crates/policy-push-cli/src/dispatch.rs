// crates/policy-push-cli/src/dispatch.rs
// ============================================================================
// Module: JSON-Line Dispatcher
// Description: Agent task dispatcher that writes requests as JSON lines.
// Purpose: Hand built tasks to stdout (or any writer) for downstream tooling.
// Dependencies: policy-push-core, serde_json
// ============================================================================

//! ## Overview
//! [`JsonLineDispatcher`] serializes each [`AgentTaskRequest`] as one JSON
//! line. With digests enabled it follows each request with its canonical
//! `sha256:` digest on a separate line.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::sync::Mutex;

use policy_push_core::AgentTaskDispatcher;
use policy_push_core::AgentTaskRequest;
use policy_push_core::DispatchError;
use policy_push_core::content_digest;

// ============================================================================
// SECTION: Dispatcher
// ============================================================================

/// Dispatcher that writes each request to a writer as a JSON line.
pub struct JsonLineDispatcher<W: Write + Send> {
    /// Output sink.
    writer: Mutex<W>,
    /// Whether to emit a digest line after each request.
    with_digest: bool,
}

impl<W: Write + Send> JsonLineDispatcher<W> {
    /// Creates a dispatcher writing to `writer`.
    pub const fn new(writer: W, with_digest: bool) -> Self {
        Self {
            writer: Mutex::new(writer),
            with_digest,
        }
    }

    /// Consumes the dispatcher and returns its writer.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::DispatchFailed`] when the writer lock was poisoned.
    pub fn into_inner(self) -> Result<W, DispatchError> {
        self.writer
            .into_inner()
            .map_err(|_| DispatchError::DispatchFailed("writer poisoned".to_string()))
    }
}

impl<W: Write + Send> AgentTaskDispatcher for JsonLineDispatcher<W> {
    fn dispatch(&self, request: &AgentTaskRequest) -> Result<(), DispatchError> {
        let payload = serde_json::to_string(request)
            .map_err(|err| DispatchError::DispatchFailed(err.to_string()))?;
        let digest = if self.with_digest {
            Some(
                content_digest(request)
                    .map_err(|err| DispatchError::DispatchFailed(err.to_string()))?,
            )
        } else {
            None
        };
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| DispatchError::DispatchFailed("writer poisoned".to_string()))?;
        let write_failed = |err: std::io::Error| DispatchError::DispatchFailed(err.to_string());
        writeln!(writer, "{payload}").map_err(write_failed)?;
        if let Some(digest) = digest {
            writeln!(writer, "{digest}").map_err(write_failed)?;
        }
        writer.flush().map_err(write_failed)
    }
}
