//! Default-locale fallback planning.
//!
//! When a file under the default locale's listing changes, every other locale
//! already present in the destination tree that lacks the corresponding file
//! receives a copy of it. Fallback is additive only: a locale that already
//! has the file keeps its own, and a locale that customizes a graphic-asset
//! category in any form is never given fallback files for that category.

use crate::error::Result;
use crate::layout::{climb_up_to, is_direct_child_of, is_hidden, GraphicCategory, LISTINGS_DIR};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// A single scheduled fallback copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyJob {
    /// The default-locale source file.
    pub source: PathBuf,
    /// Where the copy lands under the output tree.
    pub dest: PathBuf,
}

/// Plans fallback copies for changed default-locale files.
#[derive(Debug, Clone)]
pub struct FallbackPlanner {
    default_locale: String,
}

impl FallbackPlanner {
    /// Creates a planner for the given default locale.
    pub fn new(default_locale: impl Into<String>) -> Self {
        Self {
            default_locale: default_locale.into(),
        }
    }

    /// Computes the batch of fallback copies for the given changed files.
    ///
    /// Each entry pairs a changed default-locale source file with its already
    /// materialized destination under the output tree. Sibling locales are
    /// discovered from the destination tree, so only locales that actually
    /// have synchronized content participate.
    pub async fn plan(&self, changed_defaults: &[(PathBuf, PathBuf)]) -> Result<Vec<CopyJob>> {
        let mut jobs = Vec::new();
        let mut planned = HashSet::new();

        for (source, dest) in changed_defaults {
            let Some(listings) = climb_up_to(dest, LISTINGS_DIR) else {
                continue;
            };
            let default_dir = listings.join(&self.default_locale);
            let Ok(relative) = dest.strip_prefix(&default_dir) else {
                continue;
            };

            let mut locales = match fs::read_dir(&listings).await {
                Ok(entries) => entries,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            };

            while let Some(entry) = locales.next_entry().await? {
                let locale_dir = entry.path();
                if !entry.file_type().await?.is_dir()
                    || is_hidden(&locale_dir)
                    || entry.file_name().to_string_lossy() == self.default_locale.as_str()
                {
                    continue;
                }

                let candidate = locale_dir.join(relative);
                if fs::try_exists(&candidate).await? {
                    continue;
                }
                if has_graphic_category(&candidate).await? {
                    debug!(
                        "Skipping fallback for {}: locale customizes the graphic category",
                        candidate.display()
                    );
                    continue;
                }

                if planned.insert(candidate.clone()) {
                    jobs.push(CopyJob {
                        source: source.clone(),
                        dest: candidate,
                    });
                }
            }
        }

        Ok(jobs)
    }
}

/// Whether `candidate` sits directly inside a graphic-asset category that the
/// locale already has in any form.
async fn has_graphic_category(candidate: &Path) -> Result<bool> {
    let Some(graphic) = GraphicCategory::ALL
        .iter()
        .find(|g| is_direct_child_of(candidate, g.dir_name()))
    else {
        return Ok(false);
    };

    match climb_up_to(candidate, graphic.dir_name()) {
        Some(dir) => Ok(fs::try_exists(&dir).await?),
        None => Ok(false),
    }
}
