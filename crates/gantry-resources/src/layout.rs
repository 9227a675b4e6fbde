//! Layout of the publishing-resources directory.
//!
//! Developer-authored publishing resources live under a single `play/` root
//! inside each source set:
//!
//! ```text
//! play/
//! ├── default-language.txt
//! ├── listings/
//! │   └── {locale}/
//! │       ├── title.txt
//! │       ├── full-description.txt
//! │       └── phone-screenshots/
//! │           └── *.png
//! ├── release-notes/
//! │   └── {locale}/
//! │       └── default.txt
//! ├── release-names/
//! │   └── {locale}/
//! │       └── default.txt
//! └── products/
//!     └── {sku}.json
//! ```

use std::path::{Path, PathBuf};

/// Name of the publishing-resources root directory.
pub const RESOURCES_DIR: &str = "play";

/// Store listings category root.
pub const LISTINGS_DIR: &str = "listings";

/// Release notes category root.
pub const RELEASE_NOTES_DIR: &str = "release-notes";

/// Release (console) names category root.
pub const RELEASE_NAMES_DIR: &str = "release-names";

/// In-app products category root.
pub const PRODUCTS_DIR: &str = "products";

/// Marker file naming the default locale, located at a resources root.
pub const DEFAULT_LANGUAGE_FILE: &str = "default-language.txt";

/// A recognized resource category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Localized store listings, including graphic assets.
    Listings,
    /// Per-locale release notes.
    ReleaseNotes,
    /// Per-locale release names.
    ReleaseNames,
    /// In-app product definitions (one JSON file per SKU).
    Products,
}

impl Category {
    /// All recognized categories.
    pub const ALL: [Category; 4] = [
        Category::Listings,
        Category::ReleaseNotes,
        Category::ReleaseNames,
        Category::Products,
    ];

    /// The directory name of this category root.
    pub fn dir_name(self) -> &'static str {
        match self {
            Category::Listings => LISTINGS_DIR,
            Category::ReleaseNotes => RELEASE_NOTES_DIR,
            Category::ReleaseNames => RELEASE_NAMES_DIR,
            Category::Products => PRODUCTS_DIR,
        }
    }

    /// Whether this category contains one directory per locale.
    pub fn is_localized(self) -> bool {
        !matches!(self, Category::Products)
    }
}

/// A graphic-asset category within a listing locale.
///
/// A locale that has any file under one of these directories is considered
/// to have customized that category and is excluded from default-locale
/// fallback for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GraphicCategory {
    Icon,
    FeatureGraphic,
    PromoGraphic,
    PhoneScreenshots,
    TabletScreenshots,
    LargeTabletScreenshots,
    TvBanner,
    TvScreenshots,
    WearScreenshots,
}

impl GraphicCategory {
    /// All recognized graphic categories.
    pub const ALL: [GraphicCategory; 9] = [
        GraphicCategory::Icon,
        GraphicCategory::FeatureGraphic,
        GraphicCategory::PromoGraphic,
        GraphicCategory::PhoneScreenshots,
        GraphicCategory::TabletScreenshots,
        GraphicCategory::LargeTabletScreenshots,
        GraphicCategory::TvBanner,
        GraphicCategory::TvScreenshots,
        GraphicCategory::WearScreenshots,
    ];

    /// The directory name of this graphic category.
    pub fn dir_name(self) -> &'static str {
        match self {
            GraphicCategory::Icon => "icon",
            GraphicCategory::FeatureGraphic => "feature-graphic",
            GraphicCategory::PromoGraphic => "promo-graphic",
            GraphicCategory::PhoneScreenshots => "phone-screenshots",
            GraphicCategory::TabletScreenshots => "tablet-screenshots",
            GraphicCategory::LargeTabletScreenshots => "large-tablet-screenshots",
            GraphicCategory::TvBanner => "tv-banner",
            GraphicCategory::TvScreenshots => "tv-screenshots",
            GraphicCategory::WearScreenshots => "wear-screenshots",
        }
    }
}

/// Returns the nearest ancestor of `path` (including `path` itself) whose
/// final component is `dir_name`.
pub fn climb_up_to(path: &Path, dir_name: &str) -> Option<PathBuf> {
    path.ancestors()
        .find(|a| a.file_name().is_some_and(|n| n == dir_name))
        .map(Path::to_path_buf)
}

/// Whether any strict ancestor of `path` is named `dir_name`.
pub fn is_child_of(path: &Path, dir_name: &str) -> bool {
    path.ancestors()
        .skip(1)
        .any(|a| a.file_name().is_some_and(|n| n == dir_name))
}

/// Whether the immediate parent of `path` is named `dir_name`.
pub fn is_direct_child_of(path: &Path, dir_name: &str) -> bool {
    path.parent()
        .and_then(Path::file_name)
        .is_some_and(|n| n == dir_name)
}

/// Whether an entry is hidden by the leading-dot convention.
pub fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn climbs_to_named_ancestor() {
        let path = Path::new("src/main/play/listings/en-US/title.txt");
        assert_eq!(
            climb_up_to(path, LISTINGS_DIR),
            Some(PathBuf::from("src/main/play/listings"))
        );
        assert_eq!(climb_up_to(path, "missing"), None);
        // Includes the path itself.
        assert_eq!(
            climb_up_to(Path::new("play/listings"), LISTINGS_DIR),
            Some(PathBuf::from("play/listings"))
        );
    }

    #[test]
    fn child_relationships() {
        let path = Path::new("play/listings/en-US/title.txt");
        assert!(is_child_of(path, LISTINGS_DIR));
        assert!(is_child_of(path, RESOURCES_DIR));
        assert!(!is_child_of(path, PRODUCTS_DIR));
        // A directory is not its own child.
        assert!(!is_child_of(Path::new("play/listings"), LISTINGS_DIR));

        assert!(is_direct_child_of(path, "en-US"));
        assert!(!is_direct_child_of(path, LISTINGS_DIR));
    }

    #[test]
    fn hidden_entries() {
        assert!(is_hidden(Path::new("play/listings/.DS_Store")));
        assert!(!is_hidden(Path::new("play/listings/en-US")));
    }
}
