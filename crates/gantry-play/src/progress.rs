//! Upload progress reporting.
//!
//! A purely observational side channel around chunked uploads: it emits
//! coarse percentage events while bytes are in flight and a single completion
//! event per artifact. It never affects the upload's outcome.

use std::sync::Arc;
use tracing::info;

/// Minimum chunk size accepted by the resumable-upload transport.
pub const MINIMUM_CHUNK_SIZE: usize = 256 * 1024;

/// Chunk size used for uploads, a fixed multiple of the transport minimum.
pub const UPLOAD_CHUNK_SIZE: usize = 4 * MINIMUM_CHUNK_SIZE;

/// A progress event emitted during an upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadEvent {
    /// The transfer is in progress, with a rounded completion percentage.
    InProgress { percent: u8 },
    /// The transfer finished; `kind` names the artifact kind (e.g., "APK").
    Complete { kind: String },
}

/// Receives upload progress events.
pub trait ProgressSink: Send + Sync {
    /// Handles one event.
    fn event(&self, event: UploadEvent);
}

/// Default sink that logs progress through `tracing`.
#[derive(Debug, Default, Clone)]
pub struct TracingProgress;

impl ProgressSink for TracingProgress {
    fn event(&self, event: UploadEvent) {
        match event {
            UploadEvent::InProgress { percent } => info!("Uploading: {}% complete", percent),
            UploadEvent::Complete { kind } => info!("{} upload complete", kind),
        }
    }
}

/// Translates raw byte counts of a chunked upload into [`UploadEvent`]s.
#[derive(Clone)]
pub struct UploadProgressReporter {
    kind: Arc<str>,
    sink: Arc<dyn ProgressSink>,
}

impl UploadProgressReporter {
    /// Creates a reporter for one artifact kind, forwarding to `sink`.
    pub fn new(kind: impl Into<String>, sink: Arc<dyn ProgressSink>) -> Self {
        Self {
            kind: Arc::from(kind.into()),
            sink,
        }
    }

    /// Reports that `sent` of `total` bytes are on the wire.
    pub fn bytes_sent(&self, sent: u64, total: u64) {
        if total == 0 {
            return;
        }
        let percent = ((sent as f64 / total as f64) * 100.0).round() as u8;
        self.sink.event(UploadEvent::InProgress { percent });
    }

    /// Reports that the transfer finished.
    pub fn completed(&self) {
        self.sink.event(UploadEvent::Complete {
            kind: self.kind.to_string(),
        });
    }
}

impl std::fmt::Debug for UploadProgressReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadProgressReporter")
            .field("kind", &self.kind)
            .finish()
    }
}
