//! Cart commands - show and edit the shopping cart

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use motoshop_core::{CartSummary, LogEvent, OperationResult};

use super::{get_context, get_logger, log_event};
use crate::output::{create_table, format_price, info, print_json, success};

#[derive(Subcommand)]
pub enum CartCommands {
    /// Show cart contents and totals
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a motorcycle to the cart
    Add {
        /// Product ID
        id: u32,
        /// Number of units to add
        #[arg(short, long, default_value = "1")]
        quantity: u32,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Remove a motorcycle from the cart
    Remove {
        /// Product ID
        id: u32,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Set the quantity of a cart line (0 or less removes it)
    Set {
        /// Product ID
        id: u32,
        /// New quantity
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Empty the cart and drop any promo code
    Clear {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(command: CartCommands) -> Result<()> {
    let logger = get_logger();
    let mut ctx = get_context()?;

    let (json, message) = match command {
        CartCommands::Show { json } => (json, None),
        CartCommands::Add { id, quantity, json } => {
            let product = ctx.catalog_service.require(id)?.clone();
            ctx.cart_service.add_to_cart_many(&product, quantity)?;
            log_event(
                &logger,
                LogEvent::new("cart_item_added").with_command("cart add").with_product(id),
            );
            (json, Some(format!("Added {} x {} to your cart", quantity, product.name)))
        }
        CartCommands::Remove { id, json } => {
            ctx.cart_service.remove_from_cart(id)?;
            log_event(
                &logger,
                LogEvent::new("cart_item_removed").with_command("cart remove").with_product(id),
            );
            (json, Some("Removed from cart".to_string()))
        }
        CartCommands::Set { id, quantity, json } => {
            ctx.cart_service.update_quantity(id, quantity)?;
            log_event(
                &logger,
                LogEvent::new("cart_quantity_updated").with_command("cart set").with_product(id),
            );
            (json, Some("Cart updated".to_string()))
        }
        CartCommands::Clear { json } => {
            ctx.cart_service.clear_cart()?;
            log_event(&logger, LogEvent::new("cart_cleared").with_command("cart clear"));
            (json, Some("Cart cleared".to_string()))
        }
    };

    let summary = ctx.cart_service.summary();
    if json {
        return print_json(&OperationResult::ok(summary));
    }
    if let Some(message) = message {
        success(&message);
    }
    print_summary(&summary);
    Ok(())
}

/// Render the cart as a table plus totals
pub fn print_summary(summary: &CartSummary) {
    if summary.lines.is_empty() {
        info("Your cart is empty.");
        return;
    }

    let mut table = create_table();
    table.set_header(vec!["ID", "Motorcycle", "Qty", "Unit price", "Line total"]);
    for line in &summary.lines {
        table.add_row(vec![
            line.product.id.to_string(),
            line.product.name.clone(),
            line.quantity.to_string(),
            format_price(line.product.price),
            format_price(line.line_total()),
        ]);
    }
    println!("{}", table);

    println!("  Items:    {}", summary.total_items);
    println!("  Subtotal: {}", format_price(summary.subtotal));
    if let Some(code) = &summary.promo_code {
        println!(
            "  Promo:    {} (-{}%) {}",
            code.cyan(),
            summary.discount_percent,
            format!("-{}", format_price(summary.discount_amount)).green()
        );
    }
    println!("  {}    {}", "Total:".bold(), format_price(summary.total).bold());
}
