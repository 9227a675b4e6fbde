//! In-memory [`EditService`] used by the unit tests.

use crate::api::EditService;
use crate::error::{FailureKind, PlayError, Result};
use crate::progress::UploadProgressReporter;
use crate::types::{Artifact, InAppProduct, LocalizedText, Track};
use async_trait::async_trait;
use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

/// Configurable mock of the remote publishing service.
#[derive(Default)]
pub(crate) struct MockService {
    next_id: AtomicU32,
    pub create_calls: AtomicU32,
    pub create_failure: Mutex<Option<(FailureKind, u16)>>,
    /// Edit ids that `validate_edit` reports as already committed.
    pub stale_edits: Mutex<HashSet<String>>,
    pub tracks: Mutex<Vec<Track>>,
    pub updated_tracks: Mutex<Vec<Track>>,
    /// Failures popped one per upload before uploads start succeeding.
    pub upload_failures: Mutex<VecDeque<(FailureKind, u16)>>,
    pub uploads: Mutex<Vec<PathBuf>>,
    pub attached_notes: Mutex<Vec<(i64, Vec<LocalizedText>)>>,
    pub products: Mutex<Vec<InAppProduct>>,
    pub committed: Mutex<Vec<String>>,
    pub deleted: Mutex<Vec<String>>,
}

impl MockService {
    fn failure((kind, status): (FailureKind, u16)) -> PlayError {
        PlayError::api(kind, status, "mock failure")
    }
}

#[async_trait]
impl EditService for MockService {
    async fn create_edit(&self, _package_name: &str) -> Result<String> {
        if let Some(failure) = *self.create_failure.lock().unwrap() {
            return Err(Self::failure(failure));
        }
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(format!("edit-{}", n))
    }

    async fn validate_edit(&self, _package_name: &str, edit_id: &str) -> Result<()> {
        if self.stale_edits.lock().unwrap().contains(edit_id) {
            return Err(PlayError::api(
                FailureKind::EditAlreadyCommitted,
                400,
                "edit already committed",
            ));
        }
        Ok(())
    }

    async fn commit_edit(&self, _package_name: &str, edit_id: &str) -> Result<()> {
        self.committed.lock().unwrap().push(edit_id.to_string());
        Ok(())
    }

    async fn delete_edit(&self, _package_name: &str, edit_id: &str) -> Result<()> {
        self.deleted.lock().unwrap().push(edit_id.to_string());
        Ok(())
    }

    async fn list_tracks(&self, _package_name: &str, _edit_id: &str) -> Result<Vec<Track>> {
        Ok(self.tracks.lock().unwrap().clone())
    }

    async fn update_track(&self, _package_name: &str, _edit_id: &str, track: &Track) -> Result<()> {
        self.updated_tracks.lock().unwrap().push(track.clone());
        Ok(())
    }

    async fn upload_artifact(
        &self,
        _package_name: &str,
        _edit_id: &str,
        artifact: &Path,
        progress: UploadProgressReporter,
    ) -> Result<Artifact> {
        if let Some(failure) = self.upload_failures.lock().unwrap().pop_front() {
            return Err(Self::failure(failure));
        }

        progress.bytes_sent(1, 1);

        let mut uploads = self.uploads.lock().unwrap();
        uploads.push(artifact.to_path_buf());
        Ok(Artifact {
            version_code: 100 + uploads.len() as i64,
            binary_sha256: None,
        })
    }

    async fn update_product(&self, _package_name: &str, product: &InAppProduct) -> Result<()> {
        self.products.lock().unwrap().push(product.clone());
        Ok(())
    }

    async fn attach_release_notes(
        &self,
        _package_name: &str,
        _edit_id: &str,
        version_code: i64,
        notes: &[LocalizedText],
    ) -> Result<()> {
        self.attached_notes
            .lock()
            .unwrap()
            .push((version_code, notes.to_vec()));
        Ok(())
    }
}
