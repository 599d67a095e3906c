//! Products commands - browse, filter and inspect the catalog

use anyhow::{bail, Result};
use colored::Colorize;
use motoshop_core::{FilterCriteria, LogEvent, OperationResult, PriceRange, Product, SortKey};
use rust_decimal::Decimal;

use super::{get_context, get_logger, log_event};
use crate::output::{create_table, format_price, format_rating, info, print_json};

/// Options for `moto products`
pub struct ProductQuery {
    pub search: Option<String>,
    pub range: Option<PriceRange>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub min_rating: f64,
    pub sort: SortKey,
    pub featured: bool,
    pub json: bool,
}

impl ProductQuery {
    fn criteria(&self) -> FilterCriteria {
        let mut criteria = FilterCriteria::default()
            .with_min_rating(self.min_rating)
            .with_sort(self.sort);
        if let Some(search) = &self.search {
            criteria = criteria.with_search(search.clone());
        }
        if let Some(range) = self.range {
            criteria = criteria.with_price_range(range);
        }
        // Explicit bounds override the preset's
        if self.min_price.is_some() || self.max_price.is_some() {
            let min = self.min_price.or(criteria.price_min);
            let max = self.max_price.or(criteria.price_max);
            criteria = criteria.with_price(min, max);
        }
        criteria
    }
}

pub fn run_list(query: ProductQuery) -> Result<()> {
    if !(0.0..=5.0).contains(&query.min_rating) {
        bail!("--min-rating must be between 0 and 5");
    }

    let logger = get_logger();
    let ctx = get_context()?;

    let products: Vec<Product> = if query.featured {
        ctx.catalog_service.featured().to_vec()
    } else {
        ctx.catalog_service.search(&query.criteria())
    };
    log_event(&logger, LogEvent::new("products_listed").with_command("products"));

    if query.json {
        return print_json(&OperationResult::ok(products));
    }

    if products.is_empty() {
        info("No motorcycles match your filters.");
        return Ok(());
    }

    let mut table = create_table();
    table.set_header(vec!["ID", "Name", "Price", "Rating", "Badge"]);
    for product in &products {
        table.add_row(vec![
            product.id.to_string(),
            product.name.clone(),
            format_price(product.price),
            format_rating(product),
            product.badge.clone().unwrap_or_default(),
        ]);
    }
    println!("{}", table);
    println!(
        "{}",
        format!("{} of {} motorcycles", products.len(), ctx.catalog_service.all().len()).dimmed()
    );
    Ok(())
}

pub fn run_show(id: u32, json: bool) -> Result<()> {
    let logger = get_logger();
    let ctx = get_context()?;
    let product = ctx.catalog_service.require(id)?.clone();
    let in_cart = ctx.cart_service.state().quantity_of(id);
    log_event(
        &logger,
        LogEvent::new("product_viewed").with_command("product").with_product(id),
    );

    if json {
        return print_json(
            &OperationResult::ok(product).with_context("inCart", serde_json::json!(in_cart)),
        );
    }

    println!("{}", product.name.bold());
    if let Some(badge) = &product.badge {
        println!("{}", badge.magenta());
    }
    println!();
    println!("  Price:  {}", format_price(product.price).green().bold());
    println!("  Rating: {}", format_rating(&product));
    if let Some(colors) = &product.color {
        println!("  Colors: {}", colors.join(", "));
    }
    println!("  Image:  {}", product.image.dimmed());
    println!();
    println!("{}", product.description);
    if in_cart > 0 {
        println!();
        info(&format!("{} in your cart", in_cart));
    }
    Ok(())
}
