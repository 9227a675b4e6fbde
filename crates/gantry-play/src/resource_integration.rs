//! Resource tree integration for publishing flows.
//!
//! Available with the `resources` feature. Glues `gantry-resources`
//! synchronization into the publishing workflow: the resource tree is
//! synchronized into its normalized output layout first, then changed in-app
//! products are pushed from that output tree.

use crate::api::EditService;
use crate::error::Result;
use crate::products::ProductPublisher;
use gantry_resources::layout::PRODUCTS_DIR;
use gantry_resources::{ChangeSet, ResourceSynchronizer};
use std::path::PathBuf;
use tracing::info;

/// Synchronizes the resource tree ahead of a publish step.
pub async fn sync_resources(
    synchronizer: &ResourceSynchronizer,
    changes: &ChangeSet,
) -> Result<()> {
    synchronizer.synchronize(changes).await?;
    Ok(())
}

/// Pushes in-app products whose definitions changed in this run.
///
/// Changed source paths are mapped to their normalized counterparts under
/// the synchronizer's output directory; the products directory is flat, so
/// the mapping is by file name. Removed files invalidate their product too,
/// but their missing output counterpart is skipped downstream, since the
/// service offers no product deletion.
pub async fn publish_changed_products(
    service: &dyn EditService,
    package_name: &str,
    synchronizer: &ResourceSynchronizer,
    changes: &ChangeSet,
) -> Result<u32> {
    let products_dir = synchronizer.out_dir().join(PRODUCTS_DIR);

    let changed: Vec<PathBuf> = changes
        .added_or_changed
        .iter()
        .chain(changes.removed.iter())
        .filter(|path| {
            path.parent()
                .and_then(|p| p.file_name())
                .is_some_and(|name| name == PRODUCTS_DIR)
        })
        .filter_map(|path| path.file_name().map(|name| products_dir.join(name)))
        .collect();

    let publisher = ProductPublisher::new(service, package_name);
    let pushed = publisher.publish(&products_dir, &changed).await?;
    if pushed > 0 {
        info!("Pushed {} in-app products", pushed);
    }
    Ok(pushed)
}

/// Synchronizes the tree, then pushes changed products.
pub async fn sync_and_publish_products(
    service: &dyn EditService,
    package_name: &str,
    synchronizer: &ResourceSynchronizer,
    changes: &ChangeSet,
) -> Result<u32> {
    sync_resources(synchronizer, changes).await?;
    publish_changed_products(service, package_name, synchronizer, changes).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockService;
    use tokio::fs;

    #[tokio::test]
    async fn syncs_then_pushes_changed_products() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path().join("src/main/play");
        let out = temp.path().join("build/play/res");
        let product = root.join("products/premium.json");
        fs::create_dir_all(product.parent().unwrap()).await.unwrap();
        fs::write(&product, r#"{"sku":"premium"}"#).await.unwrap();

        let synchronizer = ResourceSynchronizer::new(vec![root.clone()], &out);
        let service = MockService::default();

        let pushed = sync_and_publish_products(
            &service,
            "com.example.app",
            &synchronizer,
            &ChangeSet::full_scan(&[&root]),
        )
        .await
        .unwrap();

        assert_eq!(pushed, 1);
        assert!(out.join("products/premium.json").exists());
        assert_eq!(service.products.lock().unwrap()[0].sku, "premium");
    }

    #[tokio::test]
    async fn removed_products_invalidate_without_error() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path().join("src/main/play");
        let out = temp.path().join("build/play/res");
        let product = root.join("products/premium.json");
        fs::create_dir_all(product.parent().unwrap()).await.unwrap();
        fs::write(&product, r#"{"sku":"premium"}"#).await.unwrap();

        let synchronizer = ResourceSynchronizer::new(vec![root.clone()], &out);
        let service = MockService::default();
        sync_and_publish_products(
            &service,
            "com.example.app",
            &synchronizer,
            &ChangeSet::full_scan(&[&root]),
        )
        .await
        .unwrap();

        fs::remove_file(&product).await.unwrap();
        let pushed = sync_and_publish_products(
            &service,
            "com.example.app",
            &synchronizer,
            &ChangeSet::incremental(vec![], vec![product]),
        )
        .await
        .unwrap();

        assert_eq!(pushed, 0);
        assert!(!out.join("products/premium.json").exists());
        // Only the original full-scan push reached the service.
        assert_eq!(service.products.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn non_product_changes_push_nothing() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path().join("src/main/play");
        let out = temp.path().join("build/play/res");
        let listing = root.join("listings/en-US/title.txt");
        fs::create_dir_all(listing.parent().unwrap()).await.unwrap();
        fs::write(&listing, "My App").await.unwrap();

        let synchronizer = ResourceSynchronizer::new(vec![root.clone()], &out);
        let service = MockService::default();

        let pushed = sync_and_publish_products(
            &service,
            "com.example.app",
            &synchronizer,
            &ChangeSet::full_scan(&[&root]),
        )
        .await
        .unwrap();

        assert_eq!(pushed, 0);
        assert!(service.products.lock().unwrap().is_empty());
    }
}
