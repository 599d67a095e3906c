//! Promo commands - apply or remove a promo code

use anyhow::Result;
use clap::Subcommand;
use motoshop_core::{LogEvent, OperationResult};

use super::{get_context, get_logger, log_event};
use crate::output::{error, format_price, print_json, success};

#[derive(Subcommand)]
pub enum PromoCommands {
    /// Apply a promo code to the cart
    Apply {
        /// Promo code (case-insensitive)
        code: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Remove the applied promo code
    Remove {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(command: PromoCommands) -> Result<()> {
    let logger = get_logger();
    let mut ctx = get_context()?;

    match command {
        PromoCommands::Apply { code, json } => {
            let applied = ctx.cart_service.apply_promo_code(&code)?;
            let summary = ctx.cart_service.summary();

            // The entered code is never logged, only whether it matched
            match applied {
                Some(percent) => {
                    log_event(&logger, LogEvent::new("promo_applied").with_command("promo apply"));
                    if json {
                        return print_json(
                            &OperationResult::ok(summary)
                                .with_context("discountPercent", serde_json::json!(percent)),
                        );
                    }
                    success(&format!(
                        "Promo code applied: {}% off, new total {}",
                        percent,
                        format_price(summary.total)
                    ));
                }
                None => {
                    log_event(
                        &logger,
                        LogEvent::new("promo_rejected")
                            .with_command("promo apply")
                            .with_error("unknown promo code"),
                    );
                    if json {
                        return print_json(&OperationResult::<()>::fail("Invalid promo code"));
                    }
                    error("Invalid promo code");
                }
            }
        }
        PromoCommands::Remove { json } => {
            ctx.cart_service.remove_promo_code()?;
            log_event(&logger, LogEvent::new("promo_removed").with_command("promo remove"));
            let summary = ctx.cart_service.summary();
            if json {
                return print_json(&OperationResult::ok(summary));
            }
            success(&format!("Promo code removed, total {}", format_price(summary.total)));
        }
    }

    Ok(())
}
