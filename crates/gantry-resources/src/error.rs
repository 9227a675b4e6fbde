//! Error types for resource tree operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while validating or synchronizing a resource tree.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// File does not belong under any recognized category root.
    #[error("Unknown file: {}", .0.display())]
    UnknownEntry(PathBuf),

    /// A category root is not placed directly under the publishing-resources root.
    #[error("{} ({}) must be directly under the publishing resources folder", category, path.display())]
    MisplacedCategory { category: String, path: PathBuf },

    /// A locale directory has an unrecognized name.
    #[error("Invalid locale '{}' at {}", name, path.display())]
    InvalidLocale { name: String, path: PathBuf },

    /// A file under the products root is not JSON.
    #[error("In-app product files must be JSON: {}", .0.display())]
    NotJson(PathBuf),

    /// A path that must be a directory is not one.
    #[error("{} must be a folder", .0.display())]
    NotADirectory(PathBuf),

    /// A file does not live under exactly one configured source root.
    #[error("{} is not owned by any configured source root", .0.display())]
    UnownedFile(PathBuf),
}

/// Result type for resource operations.
pub type Result<T> = std::result::Result<T, ResourceError>;
