//! Catalog domain model - the immutable product list

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::result::{Error, Result};
use super::Product;

/// The static set of purchasable products, in display order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog, rejecting invalid products and duplicate ids
    pub fn new(products: Vec<Product>) -> Result<Self> {
        let mut seen = HashSet::new();
        for product in &products {
            product.validate().map_err(Error::validation)?;
            if !seen.insert(product.id) {
                return Err(Error::validation(format!(
                    "duplicate product id {} in catalog",
                    product.id
                )));
            }
        }
        Ok(Self { products })
    }

    /// Parse a catalog from a JSON array of products
    pub fn from_json(json: &str) -> Result<Self> {
        let products: Vec<Product> = serde_json::from_str(json)?;
        Self::new(products)
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn get(&self, id: u32) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Look up a product, failing with `NotFound` for unknown ids
    pub fn require(&self, id: u32) -> Result<&Product> {
        self.get(id)
            .ok_or_else(|| Error::not_found(format!("product {}", id)))
    }

    /// The first `n` products, as shown on the landing page
    pub fn featured(&self, n: usize) -> &[Product] {
        &self.products[..n.min(self.products.len())]
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
