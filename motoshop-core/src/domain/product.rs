//! Product domain model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use url::Url;

/// Highest rating a product can carry
pub const MAX_RATING: f64 = 5.0;

/// A purchasable motorcycle
///
/// Products are defined by the catalog and never mutated at runtime.
/// Carts and orders keep their own copies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u32,
    pub name: String,
    pub price: Decimal,
    pub rating: f64,
    pub description: String,
    /// Absolute URI of the product image
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    /// Color variants in display order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Vec<String>>,
}

impl Product {
    pub fn new(
        id: u32,
        name: impl Into<String>,
        price: Decimal,
        rating: f64,
        description: impl Into<String>,
        image: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            rating,
            description: description.into(),
            image: image.into(),
            badge: None,
            color: None,
        }
    }

    pub fn with_badge(mut self, badge: impl Into<String>) -> Self {
        self.badge = Some(badge.into());
        self
    }

    pub fn with_colors<I, S>(mut self, colors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.color = Some(colors.into_iter().map(Into::into).collect());
        self
    }

    /// Number of whole stars to render for the rating
    pub fn full_stars(&self) -> u8 {
        self.rating.clamp(0.0, MAX_RATING).floor() as u8
    }

    /// Validate product data
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err(format!("product {}: name cannot be empty", self.id));
        }
        if self.price.is_sign_negative() {
            return Err(format!("product {}: price cannot be negative", self.id));
        }
        if !self.rating.is_finite() || !(0.0..=MAX_RATING).contains(&self.rating) {
            return Err(format!(
                "product {}: rating {} is outside 0..={}",
                self.id, self.rating, MAX_RATING
            ));
        }
        Url::parse(&self.image)
            .map_err(|e| format!("product {}: invalid image URI: {}", self.id, e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bike() -> Product {
        Product::new(
            1,
            "Test Bike",
            Decimal::new(12_500, 0),
            4.6,
            "A bike for tests",
            "https://images.example.com/bike.jpg",
        )
    }

    #[test]
    fn test_product_validation() {
        let mut product = bike();
        assert!(product.validate().is_ok());

        product.rating = 5.5;
        assert!(product.validate().is_err());

        let mut product = bike();
        product.price = Decimal::new(-1, 0);
        assert!(product.validate().is_err());

        let mut product = bike();
        product.image = "not a uri".to_string();
        assert!(product.validate().is_err());
    }

    #[test]
    fn test_full_stars() {
        assert_eq!(bike().full_stars(), 4);
    }

    #[test]
    fn test_optional_fields_skipped_in_json() {
        let json = serde_json::to_value(bike()).unwrap();
        assert!(json.get("badge").is_none());

        let json = serde_json::to_value(bike().with_badge("New").with_colors(["Red", "Black"])).unwrap();
        assert_eq!(json["badge"], "New");
        assert_eq!(json["color"][1], "Black");
    }
}
