//! Abstract service boundary for the publishing API.
//!
//! The core talks to the store exclusively through [`EditService`]; the HTTP
//! adapter in [`crate::http`] implements it against the real Play Developer
//! API, and tests substitute in-memory implementations. Failures cross this
//! boundary as [`crate::PlayError::Api`] carrying a
//! [`crate::FailureKind`] classification, keeping vendor error shapes out of
//! the core.

use crate::error::Result;
use crate::progress::UploadProgressReporter;
use crate::types::{Artifact, InAppProduct, LocalizedText, Track};
use async_trait::async_trait;
use std::path::Path;

/// Operations consumed from the remote publishing service.
#[async_trait]
pub trait EditService: Send + Sync {
    /// Creates a new edit session and returns its id.
    async fn create_edit(&self, package_name: &str) -> Result<String>;

    /// Probes whether an existing edit session id is still usable.
    async fn validate_edit(&self, package_name: &str, edit_id: &str) -> Result<()>;

    /// Commits an edit session, applying its changes.
    async fn commit_edit(&self, package_name: &str, edit_id: &str) -> Result<()>;

    /// Deletes an edit session, discarding its changes.
    async fn delete_edit(&self, package_name: &str, edit_id: &str) -> Result<()>;

    /// Lists all release tracks within an edit.
    async fn list_tracks(&self, package_name: &str, edit_id: &str) -> Result<Vec<Track>>;

    /// Replaces the release list of the track named by `track.track`.
    async fn update_track(&self, package_name: &str, edit_id: &str, track: &Track) -> Result<()>;

    /// Uploads a build artifact via the chunked transport, reporting byte
    /// progress as chunks leave the client. The completion event is owned by
    /// the caller, which emits it once the upload outcome is accepted.
    async fn upload_artifact(
        &self,
        package_name: &str,
        edit_id: &str,
        artifact: &Path,
        progress: UploadProgressReporter,
    ) -> Result<Artifact>;

    /// Creates or updates an in-app product keyed by its SKU.
    async fn update_product(&self, package_name: &str, product: &InAppProduct) -> Result<()>;

    /// Associates release notes with an uploaded version.
    async fn attach_release_notes(
        &self,
        package_name: &str,
        edit_id: &str,
        version_code: i64,
        notes: &[LocalizedText],
    ) -> Result<()>;
}
