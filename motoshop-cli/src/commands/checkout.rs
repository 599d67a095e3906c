//! Checkout command - place an order from the cart

use anyhow::Result;
use colored::Colorize;
use motoshop_core::{LogEvent, OperationResult};

use super::{get_context, get_logger, log_event, log_failure};
use crate::output::{format_price, print_json, success};

pub fn run(json: bool) -> Result<()> {
    let logger = get_logger();
    let mut ctx = get_context()?;

    let order = match ctx.checkout() {
        Ok(order) => order,
        Err(e) => {
            log_failure(&logger, "checkout_failed", "checkout", &e);
            if json {
                return print_json(&OperationResult::<()>::fail(e.to_string()));
            }
            return Err(e.into());
        }
    };
    log_event(&logger, LogEvent::new("checkout_completed").with_command("checkout"));

    if json {
        return print_json(&OperationResult::ok(order));
    }

    success(&format!("Order {} placed!", order.display_id()));
    println!("  Items:  {}", order.item_count());
    if let (Some(code), Some(pct)) = (&order.promo_code, order.discount_percent) {
        println!("  Promo:  {} (-{}%)", code.cyan(), pct);
    }
    println!("  Total:  {}", format_price(order.total).bold());
    println!("  Status: {}", order.status);
    Ok(())
}
