//! Release track promotion.
//!
//! Promotion copies the releases of a source track onto a destination track,
//! applying any configured status or rollout-fraction updates and collapsing
//! duplicate statuses. The service rejects tracks carrying two releases with
//! the same status, so duplicates are resolved in favor of the release with
//! the highest version code.

use crate::api::EditService;
use crate::config::ReleaseOptions;
use crate::error::{PlayError, Result};
use crate::types::Track;
use std::cmp::Reverse;
use std::collections::HashSet;
use tracing::{info, warn};

/// Merges a source track's releases onto a destination track.
pub struct TrackPromoter<'a> {
    service: &'a dyn EditService,
    package_name: String,
}

impl<'a> TrackPromoter<'a> {
    /// Creates a promoter for one package.
    pub fn new(service: &'a dyn EditService, package_name: impl Into<String>) -> Self {
        Self {
            service,
            package_name: package_name.into(),
        }
    }

    /// Promotes releases onto `options.track` within the given edit.
    ///
    /// The source is `options.from_track` (case-insensitive, fatal when it
    /// matches nothing) or, when unset, the track whose highest version code
    /// is greatest. Tracks without any version code are never considered;
    /// with no eligible track at all the promotion is a no-op with a warning.
    pub async fn promote(&self, edit_id: &str, options: &ReleaseOptions) -> Result<()> {
        let tracks: Vec<Track> = self
            .service
            .list_tracks(&self.package_name, edit_id)
            .await?
            .into_iter()
            .filter(Track::has_version_codes)
            .collect();

        if tracks.is_empty() {
            warn!("Nothing to promote. Did you mean to run publish?");
            return Ok(());
        }

        let mut source = match &options.from_track {
            None => {
                let mut sorted = tracks;
                // Stable sort: equal maxima keep the service's enumeration
                // order, so the pick is deterministic for identical input.
                sorted.sort_by_key(|t| Reverse(t.max_version_code()));
                sorted.into_iter().next().expect("tracks is non-empty")
            }
            Some(name) => tracks
                .into_iter()
                .find(|t| t.track.eq_ignore_ascii_case(name))
                .ok_or_else(|| PlayError::TrackNotFound(name.clone()))?,
        };

        info!("Promoting '{}' release to '{}'", source.track, options.track);

        for release in &mut source.releases {
            release.apply_changes(options.release_status, options.user_fraction);
        }

        // Duplicate statuses are not allowed, so only keep the unique ones
        // from the highest version code.
        source
            .releases
            .sort_by_key(|r| Reverse(r.max_version_code()));
        let mut seen = HashSet::new();
        source.releases.retain(|r| seen.insert(r.status));

        let destination = Track {
            track: options.track.clone(),
            releases: source.releases,
        };
        self.service
            .update_track(&self.package_name, edit_id, &destination)
            .await
    }
}
