//! Catalog service - product lookup and the filter/sort pipeline

use anyhow::Result;

use crate::adapters::catalog::{builtin_catalog, load_catalog};
use crate::config::Config;
use crate::domain::{filter_and_sort, Catalog, FilterCriteria, Product};

/// Number of products shown on the landing page
pub const FEATURED_COUNT: usize = 6;

/// Read-only access to the product catalog
pub struct CatalogService {
    catalog: Catalog,
}

impl CatalogService {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }

    /// Catalog from `config.catalog_path`, or the built-in lineup
    pub fn from_config(config: &Config) -> Result<Self> {
        let catalog = match &config.catalog_path {
            Some(path) => load_catalog(path)?,
            None => builtin_catalog()?,
        };
        Ok(Self::new(catalog))
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn all(&self) -> &[Product] {
        self.catalog.products()
    }

    /// Filtered, sorted view; the catalog itself never changes
    pub fn search(&self, criteria: &FilterCriteria) -> Vec<Product> {
        filter_and_sort(&self.catalog, criteria)
    }

    pub fn get(&self, id: u32) -> Option<&Product> {
        self.catalog.get(id)
    }

    /// Like `get`, but a missing id is `Error::NotFound`
    pub fn require(&self, id: u32) -> crate::domain::result::Result<&Product> {
        self.catalog.require(id)
    }

    pub fn featured(&self) -> &[Product] {
        self.catalog.featured(FEATURED_COUNT)
    }
}
