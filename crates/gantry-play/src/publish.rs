//! Build artifact publishing.
//!
//! Uploads APK artifacts inside an edit session, with bounded retry on
//! transient failures and progress reporting, then routes the uploaded
//! version codes onto the configured track.

use crate::api::EditService;
use crate::config::ReleaseOptions;
use crate::error::{FailureKind, PlayError, Result};
use crate::progress::{ProgressSink, TracingProgress, UploadProgressReporter};
use crate::retry::{retryable_execute, DEFAULT_MAX_ATTEMPTS};
use crate::types::{Artifact, Release, ReleaseStatus, Track};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tracing::{info, warn};

/// Uploads build artifacts and assigns them to a release track.
pub struct ArtifactPublisher<'a> {
    service: &'a dyn EditService,
    package_name: String,
    progress: Arc<dyn ProgressSink>,
    max_attempts: u32,
    output_dir: Option<PathBuf>,
}

impl<'a> ArtifactPublisher<'a> {
    /// Creates a publisher with tracing-backed progress and default retries.
    pub fn new(service: &'a dyn EditService, package_name: impl Into<String>) -> Self {
        Self {
            service,
            package_name: package_name.into(),
            progress: Arc::new(TracingProgress),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            output_dir: None,
        }
    }

    /// Replaces the progress sink.
    pub fn with_progress(mut self, progress: Arc<dyn ProgressSink>) -> Self {
        self.progress = progress;
        self
    }

    /// Overrides the retry bound for uploads.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Keeps a copy of every published artifact in `output_dir`.
    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(output_dir.into());
        self
    }

    /// Uploads one artifact inside the given edit.
    ///
    /// Transient upload failures are retried up to the configured bound. A
    /// duplicate-artifact rejection is benign: the existing server-side state
    /// stands and `None` is returned. On success exactly one completion event
    /// is emitted, the configured release notes are associated with the
    /// assigned version code, and the artifact is copied into the output
    /// directory when one is configured.
    pub async fn publish(
        &self,
        edit_id: &str,
        artifact: &Path,
        options: &ReleaseOptions,
    ) -> Result<Option<Artifact>> {
        let reporter = UploadProgressReporter::new("APK", self.progress.clone());

        let uploaded = match retryable_execute(
            || {
                self.service
                    .upload_artifact(&self.package_name, edit_id, artifact, reporter.clone())
            },
            self.max_attempts,
        )
        .await
        {
            Ok(artifact) => {
                reporter.completed();
                artifact
            }
            Err(e) if e.kind() == FailureKind::DuplicateArtifact => {
                warn!(
                    "{} was already uploaded; keeping the existing server state",
                    artifact.display()
                );
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        self.service
            .attach_release_notes(
                &self.package_name,
                edit_id,
                uploaded.version_code,
                &options.release_notes,
            )
            .await?;

        if let Some(out_dir) = &self.output_dir {
            if let Some(name) = artifact.file_name() {
                fs::create_dir_all(out_dir).await?;
                fs::copy(artifact, out_dir.join(name)).await?;
            }
        }

        Ok(Some(uploaded))
    }

    /// Publishes a batch of artifacts, then assigns every uploaded version
    /// code to the configured track in a single update.
    pub async fn publish_all(
        &self,
        edit_id: &str,
        artifacts: &[PathBuf],
        options: &ReleaseOptions,
    ) -> Result<Vec<Artifact>> {
        let mut published = Vec::new();
        for artifact in artifacts {
            if let Some(uploaded) = self.publish(edit_id, artifact, options).await? {
                published.push(uploaded);
            }
        }

        if !published.is_empty() {
            let version_codes = published.iter().map(|a| a.version_code).collect();
            self.assign_to_track(edit_id, version_codes, options).await?;
        }

        Ok(published)
    }

    /// Publishes every `.apk` file in a directory.
    pub async fn publish_dir(
        &self,
        edit_id: &str,
        artifact_dir: &Path,
        options: &ReleaseOptions,
    ) -> Result<Vec<Artifact>> {
        let mut artifacts = Vec::new();
        let mut entries = fs::read_dir(artifact_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("apk"))
            {
                artifacts.push(path);
            }
        }
        artifacts.sort();

        if artifacts.is_empty() {
            return Err(PlayError::InvalidConfig(format!(
                "No APKs found in '{}'.",
                artifact_dir.display()
            )));
        }

        self.publish_all(edit_id, &artifacts, options).await
    }

    async fn assign_to_track(
        &self,
        edit_id: &str,
        version_codes: Vec<i64>,
        options: &ReleaseOptions,
    ) -> Result<()> {
        let status = options.release_status.unwrap_or(if options.user_fraction.is_some() {
            ReleaseStatus::InProgress
        } else {
            ReleaseStatus::Completed
        });

        info!(
            "Assigning version codes {:?} to track '{}'",
            version_codes, options.track
        );

        let track = Track {
            track: options.track.clone(),
            releases: vec![Release {
                version_codes,
                status: Some(status),
                user_fraction: options.user_fraction,
                release_notes: options.release_notes.clone(),
                name: None,
            }],
        };
        self.service
            .update_track(&self.package_name, edit_id, &track)
            .await
    }
}
