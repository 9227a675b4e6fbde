//! Edit-session lifecycle management.
//!
//! Every publishing operation runs inside a server-side edit session. The
//! session id is persisted to a local file so an interrupted build can resume
//! the same session instead of minting a duplicate; committing or discarding
//! the remote edit belongs to the host, which calls [`EditSessionManager::commit`]
//! or [`EditSessionManager::discard`] when the whole publish step is done.

use crate::api::EditService;
use crate::error::{FailureKind, PlayError, Result};
use std::future::Future;
use std::path::PathBuf;
use tokio::fs;
use tracing::{debug, info};

/// Conventional file name for the persisted edit-session id.
pub const EDIT_ID_FILE: &str = "play-edit-id.txt";

/// Outcome of session acquisition.
enum Acquired {
    /// A usable session id.
    Id(String),
    /// The application does not exist and the caller opted to skip.
    Skipped,
}

/// Owns the edit-session lifecycle for one package.
pub struct EditSessionManager<'a> {
    service: &'a dyn EditService,
    package_name: String,
    id_file: PathBuf,
}

impl<'a> EditSessionManager<'a> {
    /// Creates a manager persisting the session id at `id_file`.
    pub fn new(
        service: &'a dyn EditService,
        package_name: impl Into<String>,
        id_file: impl Into<PathBuf>,
    ) -> Self {
        Self {
            service,
            package_name: package_name.into(),
            id_file: id_file.into(),
        }
    }

    /// Path of the persisted session id file.
    pub fn id_file(&self) -> &std::path::Path {
        &self.id_file
    }

    /// Runs `work` against a usable edit-session id.
    ///
    /// A persisted id is resumed when the service still accepts it; a stale
    /// id (already committed) is discarded and replaced with exactly one
    /// freshly minted session. When the application does not exist on the
    /// store and `allow_missing_app` is set, the unit of work is skipped and
    /// `Ok(None)` returned; otherwise the missing application is a fatal,
    /// user-actionable error.
    pub async fn with_session<T, F, Fut>(&self, allow_missing_app: bool, work: F) -> Result<Option<T>>
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        match self.acquire(allow_missing_app).await? {
            Acquired::Skipped => {
                info!(
                    "No application found for {}; skipping as requested",
                    self.package_name
                );
                Ok(None)
            }
            Acquired::Id(id) => work(id).await.map(Some),
        }
    }

    /// Commits the remote edit and forgets the persisted id.
    pub async fn commit(&self, edit_id: &str) -> Result<()> {
        self.service.commit_edit(&self.package_name, edit_id).await?;
        self.forget().await
    }

    /// Discards the remote edit and forgets the persisted id.
    pub async fn discard(&self, edit_id: &str) -> Result<()> {
        self.service.delete_edit(&self.package_name, edit_id).await?;
        self.forget().await
    }

    async fn acquire(&self, allow_missing_app: bool) -> Result<Acquired> {
        if let Some(saved) = self.read_saved().await? {
            match self.service.validate_edit(&self.package_name, &saved).await {
                Ok(()) => {
                    debug!("Resuming edit session {}", saved);
                    return Ok(Acquired::Id(saved));
                }
                Err(e) if e.kind() == FailureKind::EditAlreadyCommitted => {
                    info!("Failed to retrieve saved edit; starting a new one.");
                    fs::remove_file(&self.id_file).await?;
                    // Fall through to a single fresh acquisition.
                }
                Err(e) => return self.translate(e, allow_missing_app),
            }
        }

        match self.service.create_edit(&self.package_name).await {
            Ok(id) => {
                // Persist before doing any work so a crash can resume.
                self.persist(&id).await?;
                debug!("Created edit session {}", id);
                Ok(Acquired::Id(id))
            }
            Err(e) => self.translate(e, allow_missing_app),
        }
    }

    fn translate(&self, error: PlayError, allow_missing_app: bool) -> Result<Acquired> {
        match error.kind() {
            FailureKind::ApplicationNotFound if allow_missing_app => Ok(Acquired::Skipped),
            FailureKind::ApplicationNotFound => Err(PlayError::ApplicationNotFound {
                package: self.package_name.clone(),
            }),
            FailureKind::Unauthenticated => Err(PlayError::Unauthenticated(error.to_string())),
            _ => Err(error),
        }
    }

    async fn read_saved(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.id_file).await {
            Ok(content) => {
                let id = content.trim().to_string();
                Ok(if id.is_empty() { None } else { Some(id) })
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn persist(&self, id: &str) -> Result<()> {
        if let Some(parent) = self.id_file.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&self.id_file, id).await?;
        Ok(())
    }

    async fn forget(&self) -> Result<()> {
        match fs::remove_file(&self.id_file).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
