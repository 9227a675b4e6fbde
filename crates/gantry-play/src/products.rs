//! In-app product publishing.
//!
//! Product definitions are authored as one JSON file per SKU under the
//! products directory of the normalized resource tree. Changed files are
//! parsed and pushed to the service keyed by their SKU.

use crate::api::EditService;
use crate::error::Result;
use crate::types::InAppProduct;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Publishes changed in-app product definitions.
pub struct ProductPublisher<'a> {
    service: &'a dyn EditService,
    package_name: String,
}

impl<'a> ProductPublisher<'a> {
    /// Creates a product publisher for one package.
    pub fn new(service: &'a dyn EditService, package_name: impl Into<String>) -> Self {
        Self {
            service,
            package_name: package_name.into(),
        }
    }

    /// Publishes every changed file that is a product definition.
    ///
    /// Only files directly inside `products_dir` invalidate a product; paths
    /// elsewhere in the change list are ignored, as are files that no longer
    /// exist (a removed product is not deletable through this API).
    ///
    /// Returns the number of products pushed.
    pub async fn publish(&self, products_dir: &Path, changed: &[PathBuf]) -> Result<u32> {
        let mut pushed = 0;

        for path in changed {
            if path.parent() != Some(products_dir) {
                continue;
            }

            let content = match fs::read_to_string(path).await {
                Ok(content) => content,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    debug!("Skipping removed product file {}", path.display());
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            let product: InAppProduct = serde_json::from_str(&content)?;
            info!("Uploading {}", product.sku);
            self.service
                .update_product(&self.package_name, &product)
                .await?;
            pushed += 1;
        }

        Ok(pushed)
    }
}
