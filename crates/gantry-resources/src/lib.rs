//! Publishing resource tree handling for Gantry
//!
//! This crate validates and synchronizes the developer-authored publishing
//! resources of an Android application: localized store listings, release
//! notes, release names, and in-app product definitions.
//!
//! ## Directory Structure
//!
//! ```text
//! src/{sourceSet}/play/
//! ├── default-language.txt
//! ├── listings/
//! │   └── {locale}/
//! ├── release-notes/
//! │   └── {locale}/
//! ├── release-names/
//! │   └── {locale}/
//! └── products/
//!     └── {sku}.json
//! ```
//!
//! ## Synchronization
//!
//! [`ResourceSynchronizer`] applies a [`ChangeSet`] (incremental or full
//! rebuild) to a normalized output directory. Files changed under the default
//! locale's listing are propagated to sibling locales that lack them, unless
//! the sibling customizes the corresponding graphic-asset category.
//!
//! ```ignore
//! use gantry_resources::{ChangeSet, ResourceSynchronizer};
//!
//! let sync = ResourceSynchronizer::new(source_roots, out_dir);
//! sync.synchronize(&ChangeSet::full_scan(&roots)).await?;
//! ```

pub mod changeset;
pub mod error;
pub mod fallback;
pub mod layout;
pub mod locale;
pub mod sync;
pub mod validate;

pub use changeset::ChangeSet;
pub use error::{ResourceError, Result};
pub use fallback::{CopyJob, FallbackPlanner};
pub use layout::{Category, GraphicCategory};
pub use locale::LocaleCode;
pub use sync::ResourceSynchronizer;
