//! Resource tree validation.
//!
//! Every file fed into synchronization is validated first: it must resolve to
//! the publishing-resources root, a direct child of it, or a descendant of one
//! of the four recognized category roots. Category roots must themselves sit
//! directly under the resources root, locale-bearing categories may only
//! contain validly named locale directories, and the products root may only
//! contain JSON files. The first violation is fatal and names the offending
//! path.

use crate::error::{ResourceError, Result};
use crate::layout::{
    climb_up_to, is_child_of, is_direct_child_of, is_hidden, Category, RESOURCES_DIR,
};
use crate::locale::is_valid_locale;
use std::path::Path;
use tokio::fs;

/// Validates a single node of the resource tree.
///
/// Hidden entries are the caller's responsibility to skip; this function
/// assumes `path` is a visible entry under some source root.
pub async fn validate(path: &Path) -> Result<()> {
    let is_resources_root = path
        .file_name()
        .is_some_and(|n| n == RESOURCES_DIR)
        && !is_child_of(path, RESOURCES_DIR);

    let roots_valid = is_resources_root
        || is_direct_child_of(path, RESOURCES_DIR)
        || Category::ALL
            .iter()
            .any(|c| is_child_of(path, c.dir_name()));
    if !roots_valid {
        return Err(ResourceError::UnknownEntry(path.to_path_buf()));
    }

    for category in Category::ALL {
        let Some(root) = climb_up_to(path, category.dir_name()) else {
            continue;
        };

        if !is_direct_child_of(&root, RESOURCES_DIR) {
            return Err(ResourceError::MisplacedCategory {
                category: category.dir_name().to_string(),
                path: root,
            });
        }

        if category.is_localized() {
            validate_locales(&root).await?;
        } else {
            validate_products(&root).await?;
        }
    }

    Ok(())
}

/// Checks that every visible child of a locale-bearing category root is a
/// directory named with a recognized locale code.
async fn validate_locales(category_root: &Path) -> Result<()> {
    let mut entries = fs::read_dir(category_root)
        .await
        .map_err(|_| ResourceError::NotADirectory(category_root.to_path_buf()))?;

    while let Some(entry) = entries.next_entry().await? {
        let child = entry.path();
        if is_hidden(&child) {
            continue;
        }

        let name = entry.file_name().to_string_lossy().into_owned();
        if !entry.file_type().await?.is_dir() || !is_valid_locale(&name) {
            return Err(ResourceError::InvalidLocale { name, path: child });
        }
    }

    Ok(())
}

/// Checks that every visible file under the products root is JSON.
async fn validate_products(products_root: &Path) -> Result<()> {
    let mut entries = fs::read_dir(products_root)
        .await
        .map_err(|_| ResourceError::NotADirectory(products_root.to_path_buf()))?;

    while let Some(entry) = entries.next_entry().await? {
        let child = entry.path();
        if is_hidden(&child) {
            continue;
        }

        let is_json = child
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if !is_json {
            return Err(ResourceError::NotJson(child));
        }
    }

    Ok(())
}
