//! Incremental resource tree synchronization.
//!
//! Reconciles the developer-authored `play/` trees of one or more source sets
//! against a normalized output directory. Changed files are validated and
//! copied to their re-rooted destination, removed files are deleted from the
//! output, and files changed under the default locale's listing are fanned
//! out to sibling locales that lack them (see [`crate::fallback`]).
//!
//! Synchronization is idempotent: copies overwrite unconditionally and
//! deletes tolerate already-missing targets, so a run interrupted midway can
//! simply be repeated.

use crate::changeset::ChangeSet;
use crate::error::{ResourceError, Result};
use crate::fallback::FallbackPlanner;
use crate::layout::{is_child_of, is_hidden, DEFAULT_LANGUAGE_FILE, LISTINGS_DIR};
use crate::validate;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Drives incremental copy/delete of validated resource trees into a
/// normalized output layout.
#[derive(Debug, Clone)]
pub struct ResourceSynchronizer {
    /// Source-set resource roots, least specialized first.
    source_roots: Vec<PathBuf>,
    /// The normalized output directory.
    out_dir: PathBuf,
}

impl ResourceSynchronizer {
    /// Creates a synchronizer over the given source roots.
    ///
    /// Roots must be ordered least specialized first; later roots win when
    /// resolving the default-locale marker.
    pub fn new(source_roots: Vec<PathBuf>, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_roots,
            out_dir: out_dir.into(),
        }
    }

    /// The normalized output directory.
    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Resolves the default locale from the `default-language.txt` markers.
    ///
    /// The marker from the most specialized source set that has one wins.
    /// Returns `None` when no source set carries a marker, in which case
    /// fallback planning is skipped entirely.
    pub async fn default_locale(&self) -> Result<Option<String>> {
        let mut resolved = None;

        for root in &self.source_roots {
            let marker = root.join(DEFAULT_LANGUAGE_FILE);
            match fs::read_to_string(&marker).await {
                Ok(content) => {
                    let locale = content.trim().to_string();
                    if !locale.is_empty() {
                        resolved = Some(locale);
                    }
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            }
        }

        Ok(resolved)
    }

    /// Applies a change set to the output directory.
    pub async fn synchronize(&self, changes: &ChangeSet) -> Result<()> {
        if changes.full_rebuild {
            match fs::remove_dir_all(&self.out_dir).await {
                Ok(()) => debug!("Cleared output directory {}", self.out_dir.display()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }

        let default_locale = self.default_locale().await?;
        let mut changed_defaults: Vec<(PathBuf, PathBuf)> = Vec::new();

        for file in &changes.added_or_changed {
            if is_hidden(file) {
                continue;
            }
            validate::validate(file).await?;

            let dest = self.dest_of(file)?;
            if fs::metadata(file).await?.is_file() {
                copy_into(file, &dest).await?;

                if let Some(locale) = &default_locale {
                    if is_child_of(file, LISTINGS_DIR) && is_child_of(file, locale) {
                        changed_defaults.push((file.clone(), dest));
                    }
                }
            } else {
                fs::create_dir_all(&dest).await?;
            }
        }

        for file in &changes.removed {
            self.remove_dest(file).await?;
        }

        if let Some(locale) = default_locale {
            if !changed_defaults.is_empty() {
                let planner = FallbackPlanner::new(locale);
                let jobs = planner.plan(&changed_defaults).await?;
                info!("Materializing {} fallback copies", jobs.len());
                for job in jobs {
                    copy_into(&job.source, &job.dest).await?;
                }
            }
        }

        Ok(())
    }

    /// Maps a source path to its destination under the output directory.
    fn dest_of(&self, path: &Path) -> Result<PathBuf> {
        let owner = self.owner_of(path)?;
        let relative = path
            .strip_prefix(owner)
            .map_err(|_| ResourceError::UnownedFile(path.to_path_buf()))?;
        Ok(self.out_dir.join(relative))
    }

    /// Finds the single source root that owns a path.
    fn owner_of(&self, path: &Path) -> Result<&Path> {
        let mut owners = self
            .source_roots
            .iter()
            .filter(|root| path.starts_with(root));

        match (owners.next(), owners.next()) {
            (Some(owner), None) => Ok(owner.as_path()),
            _ => Err(ResourceError::UnownedFile(path.to_path_buf())),
        }
    }

    /// Deletes a removed file's counterpart from the output directory.
    async fn remove_dest(&self, file: &Path) -> Result<()> {
        let dest = self.dest_of(file)?;
        let removal = match fs::metadata(&dest).await {
            Ok(meta) if meta.is_dir() => fs::remove_dir_all(&dest).await,
            Ok(_) => fs::remove_file(&dest).await,
            Err(e) => Err(e),
        };

        match removal {
            Ok(()) => {
                debug!("Removed {}", dest.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Copies a file, creating parent directories as needed. Overwrites.
async fn copy_into(source: &Path, dest: &Path) -> Result<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).await?;
    }
    fs::copy(source, dest).await?;
    debug!("Copied {} -> {}", source.display(), dest.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    struct Fixture {
        _temp: TempDir,
        root: PathBuf,
        out: PathBuf,
    }

    async fn fixture() -> Fixture {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path().join("src/main/play");
        let out = temp.path().join("build/play/res");
        fs::create_dir_all(&root).await.unwrap();
        Fixture {
            _temp: temp,
            root,
            out,
        }
    }

    async fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).await.unwrap();
        fs::write(path, content).await.unwrap();
    }

    fn sync_for(fixture: &Fixture) -> ResourceSynchronizer {
        ResourceSynchronizer::new(vec![fixture.root.clone()], &fixture.out)
    }

    #[tokio::test]
    async fn copies_into_normalized_layout() {
        let f = fixture().await;
        write(&f.root.join("listings/en-US/title.txt"), "My App").await;

        sync_for(&f)
            .synchronize(&ChangeSet::full_scan(&[&f.root]))
            .await
            .unwrap();

        let copied = fs::read_to_string(f.out.join("listings/en-US/title.txt"))
            .await
            .unwrap();
        assert_eq!(copied, "My App");
    }

    #[tokio::test]
    async fn fallback_fills_missing_sibling_files() {
        let f = fixture().await;
        write(&f.root.join(DEFAULT_LANGUAGE_FILE), "en-US").await;
        write(&f.root.join("listings/en-US/title.txt"), "My App").await;
        write(&f.root.join("listings/de-DE/full-description.txt"), "Hallo").await;

        sync_for(&f)
            .synchronize(&ChangeSet::full_scan(&[&f.root]))
            .await
            .unwrap();

        // de-DE lacked title.txt, gains the default locale's copy.
        let title = fs::read_to_string(f.out.join("listings/de-DE/title.txt"))
            .await
            .unwrap();
        assert_eq!(title, "My App");
        // en-US does not receive de-DE content.
        assert!(!f.out.join("listings/en-US/full-description.txt").exists());
    }

    #[tokio::test]
    async fn fallback_respects_customized_graphic_category() {
        let f = fixture().await;
        write(&f.root.join(DEFAULT_LANGUAGE_FILE), "en-US").await;
        write(&f.root.join("listings/en-US/phone-screenshots/1.png"), "a").await;
        write(&f.root.join("listings/de-DE/phone-screenshots/mine.png"), "b").await;

        sync_for(&f)
            .synchronize(&ChangeSet::full_scan(&[&f.root]))
            .await
            .unwrap();

        assert!(!f.out.join("listings/de-DE/phone-screenshots/1.png").exists());
        assert!(f.out.join("listings/de-DE/phone-screenshots/mine.png").exists());
    }

    #[tokio::test]
    async fn no_marker_means_no_fallback() {
        let f = fixture().await;
        write(&f.root.join("listings/en-US/title.txt"), "My App").await;
        write(&f.root.join("listings/de-DE/full-description.txt"), "Hallo").await;

        sync_for(&f)
            .synchronize(&ChangeSet::full_scan(&[&f.root]))
            .await
            .unwrap();

        assert!(f.out.join("listings/en-US/title.txt").exists());
        assert!(!f.out.join("listings/de-DE/title.txt").exists());
    }

    #[tokio::test]
    async fn removal_deletes_output_counterpart() {
        let f = fixture().await;
        let source = f.root.join("listings/en-US/title.txt");
        write(&source, "My App").await;
        let sync = sync_for(&f);
        sync.synchronize(&ChangeSet::full_scan(&[&f.root]))
            .await
            .unwrap();

        fs::remove_file(&source).await.unwrap();
        sync.synchronize(&ChangeSet::incremental(vec![], vec![source]))
            .await
            .unwrap();

        assert!(!f.out.join("listings/en-US/title.txt").exists());
        // Removing again is tolerated.
        sync.synchronize(&ChangeSet::incremental(
            vec![],
            vec![f.root.join("listings/en-US/title.txt")],
        ))
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn empty_change_set_is_a_no_op() {
        let f = fixture().await;
        write(&f.root.join(DEFAULT_LANGUAGE_FILE), "en-US").await;
        write(&f.root.join("listings/en-US/title.txt"), "My App").await;
        let sync = sync_for(&f);
        sync.synchronize(&ChangeSet::full_scan(&[&f.root]))
            .await
            .unwrap();

        sync.synchronize(&ChangeSet::default()).await.unwrap();

        let title = fs::read_to_string(f.out.join("listings/en-US/title.txt"))
            .await
            .unwrap();
        assert_eq!(title, "My App");
    }

    #[tokio::test]
    async fn hidden_files_are_skipped() {
        let f = fixture().await;
        write(&f.root.join("listings/en-US/.hidden"), "junk").await;
        write(&f.root.join("listings/en-US/title.txt"), "My App").await;

        sync_for(&f)
            .synchronize(&ChangeSet::full_scan(&[&f.root]))
            .await
            .unwrap();

        assert!(!f.out.join("listings/en-US/.hidden").exists());
        assert!(f.out.join("listings/en-US/title.txt").exists());
    }

    #[tokio::test]
    async fn most_specialized_marker_wins() {
        let temp = tempfile::tempdir().unwrap();
        let main = temp.path().join("src/main/play");
        let release = temp.path().join("src/release/play");
        let out = temp.path().join("build/play/res");
        write(&main.join(DEFAULT_LANGUAGE_FILE), "en-US").await;
        write(&release.join(DEFAULT_LANGUAGE_FILE), "de-DE").await;

        let sync = ResourceSynchronizer::new(vec![main, release], &out);
        assert_eq!(sync.default_locale().await.unwrap().as_deref(), Some("de-DE"));
    }

    #[tokio::test]
    async fn unowned_file_is_rejected() {
        let f = fixture().await;
        // A structurally valid tree that is not one of the configured roots.
        let stray = f
            .root
            .ancestors()
            .nth(2)
            .unwrap()
            .join("other/play/listings/en-US/title.txt");
        write(&stray, "x").await;

        let err = sync_for(&f)
            .synchronize(&ChangeSet::incremental(vec![stray], vec![]))
            .await
            .unwrap_err();
        assert!(matches!(err, ResourceError::UnownedFile(_)));
    }
}
