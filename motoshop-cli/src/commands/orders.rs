//! Orders command - order history of the logged-in user

use anyhow::Result;
use colored::Colorize;
use motoshop_core::{LogEvent, OperationResult, Order};

use super::{get_context, get_logger, log_event, log_failure};
use crate::output::{create_table, format_price, info, print_json};

pub fn run(detailed: bool, json: bool) -> Result<()> {
    let logger = get_logger();
    let ctx = get_context()?;

    let orders = match ctx.my_orders() {
        Ok(orders) => orders,
        Err(e) => {
            log_failure(&logger, "orders_failed", "orders", &e);
            return Err(e.into());
        }
    };
    log_event(&logger, LogEvent::new("orders_listed").with_command("orders"));

    if json {
        return print_json(&OperationResult::ok(orders));
    }

    if orders.is_empty() {
        info("No orders yet.");
        return Ok(());
    }

    let mut table = create_table();
    table.set_header(vec!["Order", "Date", "Items", "Promo", "Total", "Status"]);
    for order in &orders {
        table.add_row(vec![
            order.display_id(),
            order.created_at.format("%Y-%m-%d %H:%M").to_string(),
            order.item_count().to_string(),
            order.promo_code.clone().unwrap_or_default(),
            format_price(order.total),
            order.status.to_string(),
        ]);
    }
    println!("{}", table);

    if detailed {
        for order in &orders {
            print_line_items(order);
        }
    }
    Ok(())
}

fn print_line_items(order: &Order) {
    println!();
    println!("{}", order.display_id().bold());
    for item in &order.line_items {
        println!(
            "  {} x {} @ {} = {}",
            item.quantity,
            item.name,
            format_price(item.unit_price),
            format_price(item.line_total())
        );
    }
}
