use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use shared::protocol::Catalog;

use crate::config::MeAgentConfig;

/// Where `init` gets the catalog from. Fetching is the host's concern; the
/// core only consumes the result.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn load_catalog(&self, config: &MeAgentConfig) -> Result<Catalog>;
}

/// Serves a catalog the host already has in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    catalog: Catalog,
}

impl StaticCatalog {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl CatalogSource for StaticCatalog {
    async fn load_catalog(&self, _config: &MeAgentConfig) -> Result<Catalog> {
        Ok(self.catalog.clone())
    }
}

/// Reads a JSON catalog snapshot from disk.
#[derive(Debug, Clone)]
pub struct JsonFileCatalog {
    path: PathBuf,
}

impl JsonFileCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CatalogSource for JsonFileCatalog {
    async fn load_catalog(&self, _config: &MeAgentConfig) -> Result<Catalog> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("failed to read catalog '{}'", self.path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse catalog '{}'", self.path.display()))
    }
}

/// Rejects catalog entries whose ids are blank.
pub fn check_catalog(catalog: &Catalog) -> Result<()> {
    if let Some(brand) = catalog.brands.iter().find(|b| b.brand_id.as_str().trim().is_empty()) {
        bail!("brand '{}' has an empty brand_id", brand.name);
    }
    if let Some(category) = catalog
        .categories
        .iter()
        .find(|c| c.category_id.as_str().trim().is_empty())
    {
        bail!("category '{}' has an empty category_id", category.name);
    }
    if let Some(offer) = catalog.offers.iter().find(|o| o.offer_id.as_str().trim().is_empty()) {
        bail!("offer '{}' has an empty offer_id", offer.title);
    }
    if let Some(product) = catalog
        .products
        .iter()
        .find(|p| p.product_id.as_str().trim().is_empty())
    {
        bail!("product '{}' has an empty product_id", product.name);
    }
    Ok(())
}
