//! Wire types for the Play Developer API.

use serde::{Deserialize, Serialize};

/// Status of a release on a track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReleaseStatus {
    /// Saved but not published.
    Draft,
    /// Staged rollout in progress.
    InProgress,
    /// Staged rollout halted.
    Halted,
    /// Fully rolled out.
    Completed,
}

/// Localized text, used for release notes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalizedText {
    /// BCP 47 language tag.
    pub language: String,
    /// The localized text.
    pub text: String,
}

/// A release bound to one or more version codes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Release {
    /// Console name of the release.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Version codes covered by this release.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub version_codes: Vec<i64>,

    /// Release status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ReleaseStatus>,

    /// Staged-rollout fraction in `[0, 1]`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_fraction: Option<f64>,

    /// Per-locale release notes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub release_notes: Vec<LocalizedText>,
}

impl Release {
    /// The numerically highest version code, if any.
    pub fn max_version_code(&self) -> Option<i64> {
        self.version_codes.iter().copied().max()
    }

    /// Applies configured status and rollout-fraction updates.
    ///
    /// Console names are deliberately left untouched; promotion never renames
    /// a release.
    pub fn apply_changes(&mut self, status: Option<ReleaseStatus>, user_fraction: Option<f64>) {
        if let Some(status) = status {
            self.status = Some(status);
        }
        if let Some(fraction) = user_fraction {
            self.user_fraction = Some(fraction);
        }
    }
}

/// A named release track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    /// Track name (e.g., "production", "beta").
    pub track: String,

    /// Releases currently on the track.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub releases: Vec<Release>,
}

impl Track {
    /// Whether any release on this track carries a version code.
    pub fn has_version_codes(&self) -> bool {
        self.releases.iter().any(|r| !r.version_codes.is_empty())
    }

    /// The highest version code across all releases.
    pub fn max_version_code(&self) -> Option<i64> {
        self.releases.iter().filter_map(Release::max_version_code).max()
    }
}

/// Descriptor of an uploaded build artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    /// Version code assigned by the service.
    pub version_code: i64,

    /// SHA-256 of the uploaded binary, when reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub binary_sha256: Option<String>,
}

/// An in-app product definition, keyed by SKU.
///
/// Product files are authored as JSON; fields beyond the SKU are passed
/// through to the service untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InAppProduct {
    /// Product SKU.
    pub sku: String,

    /// Remaining product fields, forwarded verbatim.
    #[serde(flatten)]
    pub body: serde_json::Map<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn release_serializes_camel_case() {
        let release = Release {
            version_codes: vec![42],
            status: Some(ReleaseStatus::InProgress),
            user_fraction: Some(0.25),
            ..Default::default()
        };

        let json = serde_json::to_value(&release).unwrap();
        assert_eq!(json["versionCodes"][0], 42);
        assert_eq!(json["status"], "inProgress");
        assert_eq!(json["userFraction"], 0.25);
    }

    #[test]
    fn track_max_version_code_spans_releases() {
        let track = Track {
            track: "beta".into(),
            releases: vec![
                Release {
                    version_codes: vec![3, 7],
                    ..Default::default()
                },
                Release {
                    version_codes: vec![5],
                    ..Default::default()
                },
            ],
        };
        assert!(track.has_version_codes());
        assert_eq!(track.max_version_code(), Some(7));
    }

    #[test]
    fn apply_changes_only_overwrites_configured_fields() {
        let mut release = Release {
            name: Some("1.2.0".into()),
            status: Some(ReleaseStatus::Draft),
            user_fraction: Some(0.1),
            ..Default::default()
        };

        release.apply_changes(Some(ReleaseStatus::Completed), None);
        assert_eq!(release.status, Some(ReleaseStatus::Completed));
        assert_eq!(release.user_fraction, Some(0.1));
        assert_eq!(release.name.as_deref(), Some("1.2.0"));
    }

    #[test]
    fn product_round_trips_extra_fields() {
        let json = r#"{"sku":"premium","defaultPrice":{"priceMicros":"990000"}}"#;
        let product: InAppProduct = serde_json::from_str(json).unwrap();
        assert_eq!(product.sku, "premium");
        assert!(product.body.contains_key("defaultPrice"));
    }
}
