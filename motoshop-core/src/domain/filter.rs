//! Product filtering and sorting
//!
//! A pure pipeline over the catalog: one predicate pass followed by a
//! stable sort. The catalog itself is never touched.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Catalog, Product};

/// Sort order for product listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    /// Catalog order
    #[default]
    None,
    PriceAsc,
    PriceDesc,
    RatingDesc,
    NameAsc,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::None => "none",
            SortKey::PriceAsc => "price-asc",
            SortKey::PriceDesc => "price-desc",
            SortKey::RatingDesc => "rating",
            SortKey::NameAsc => "name",
        }
    }

    fn compare(&self, a: &Product, b: &Product) -> Ordering {
        match self {
            SortKey::None => Ordering::Equal,
            SortKey::PriceAsc => a.price.cmp(&b.price),
            SortKey::PriceDesc => b.price.cmp(&a.price),
            SortKey::RatingDesc => b.rating.total_cmp(&a.rating),
            SortKey::NameAsc => compare_names(&a.name, &b.name),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" | "default" => Ok(SortKey::None),
            "price-asc" => Ok(SortKey::PriceAsc),
            "price-desc" => Ok(SortKey::PriceDesc),
            "rating" | "rating-desc" => Ok(SortKey::RatingDesc),
            "name" | "name-asc" => Ok(SortKey::NameAsc),
            other => Err(format!(
                "unknown sort key '{}' (expected none, price-asc, price-desc, rating, name)",
                other
            )),
        }
    }
}

/// Case-folded comparison with a raw tie-break so the order is total
fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Price range shortcuts offered next to the listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PriceRange {
    All,
    Under10k,
    From10kTo20k,
    From20kTo30k,
    Over30k,
}

impl PriceRange {
    pub const ALL: [PriceRange; 5] = [
        PriceRange::All,
        PriceRange::Under10k,
        PriceRange::From10kTo20k,
        PriceRange::From20kTo30k,
        PriceRange::Over30k,
    ];

    /// Inclusive (min, max) bounds; `None` means unbounded
    pub fn bounds(&self) -> (Option<Decimal>, Option<Decimal>) {
        let k = |n: i64| Some(Decimal::new(n * 1000, 0));
        match self {
            PriceRange::All => (None, None),
            PriceRange::Under10k => (k(0), k(10)),
            PriceRange::From10kTo20k => (k(10), k(20)),
            PriceRange::From20kTo30k => (k(20), k(30)),
            PriceRange::Over30k => (k(30), None),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PriceRange::All => "All",
            PriceRange::Under10k => "$0 - $10,000",
            PriceRange::From10kTo20k => "$10,000 - $20,000",
            PriceRange::From20kTo30k => "$20,000 - $30,000",
            PriceRange::Over30k => "$30,000+",
        }
    }
}

impl FromStr for PriceRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(PriceRange::All),
            "under-10k" | "0-10k" => Ok(PriceRange::Under10k),
            "10k-20k" => Ok(PriceRange::From10kTo20k),
            "20k-30k" => Ok(PriceRange::From20kTo30k),
            "over-30k" | "30k+" => Ok(PriceRange::Over30k),
            other => Err(format!(
                "unknown price range '{}' (expected all, 0-10k, 10k-20k, 20k-30k, 30k+)",
                other
            )),
        }
    }
}

/// Listing criteria. `Default` is the "clear filters" state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Case-insensitive substring matched against name or description
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub price_min: Option<Decimal>,
    #[serde(default)]
    pub price_max: Option<Decimal>,
    #[serde(default)]
    pub min_rating: f64,
    #[serde(default)]
    pub sort: SortKey,
}

impl FilterCriteria {
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_price(mut self, min: Option<Decimal>, max: Option<Decimal>) -> Self {
        self.price_min = min;
        self.price_max = max;
        self
    }

    pub fn with_price_range(self, range: PriceRange) -> Self {
        let (min, max) = range.bounds();
        self.with_price(min, max)
    }

    pub fn with_min_rating(mut self, min_rating: f64) -> Self {
        self.min_rating = min_rating;
        self
    }

    pub fn with_sort(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self
    }

    /// True when any criterion differs from the defaults
    pub fn is_active(&self) -> bool {
        *self != Self::default()
    }

    fn matches(&self, product: &Product, query: &str) -> bool {
        if !query.is_empty()
            && !product.name.to_lowercase().contains(query)
            && !product.description.to_lowercase().contains(query)
        {
            return false;
        }
        if self.price_min.is_some_and(|min| product.price < min) {
            return false;
        }
        if self.price_max.is_some_and(|max| product.price > max) {
            return false;
        }
        product.rating >= self.min_rating
    }
}

/// Filter the catalog and sort the survivors
///
/// Returns a fresh list; with `SortKey::None` the catalog order is kept.
pub fn filter_and_sort(catalog: &Catalog, criteria: &FilterCriteria) -> Vec<Product> {
    let query = criteria.search.to_lowercase();

    let mut result: Vec<Product> = catalog
        .products()
        .iter()
        .filter(|p| criteria.matches(p, &query))
        .cloned()
        .collect();

    if criteria.sort != SortKey::None {
        // sort_by is stable: equal keys keep catalog order
        result.sort_by(|a, b| criteria.sort.compare(a, b));
    }

    result
}
