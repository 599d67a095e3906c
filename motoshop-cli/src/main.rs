//! Motoshop CLI - a motorcycle storefront in your terminal

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use motoshop_core::{PriceRange, SortKey};
use rust_decimal::Decimal;

mod commands;
mod output;

use commands::{auth, cart, checkout, logs, orders, products, promo};

/// Motoshop - browse and buy motorcycles from your terminal
#[derive(Parser)]
#[command(name = "moto", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List motorcycles, with optional filters and sorting
    Products {
        /// Text to look for in name or description
        #[arg(short, long)]
        search: Option<String>,
        /// Price preset: all, 0-10k, 10k-20k, 20k-30k, 30k+
        #[arg(long)]
        range: Option<PriceRange>,
        /// Minimum price (inclusive)
        #[arg(long)]
        min_price: Option<Decimal>,
        /// Maximum price (inclusive)
        #[arg(long)]
        max_price: Option<Decimal>,
        /// Minimum rating, 0 to 5
        #[arg(long, default_value = "0")]
        min_rating: f64,
        /// Sort order: none, price-asc, price-desc, rating, name
        #[arg(long, default_value = "none")]
        sort: SortKey,
        /// Only the featured motorcycles
        #[arg(long)]
        featured: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one motorcycle
    Product {
        /// Product ID
        id: u32,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage the shopping cart
    Cart {
        #[command(subcommand)]
        command: cart::CartCommands,
    },

    /// Apply or remove a promo code
    Promo {
        #[command(subcommand)]
        command: promo::PromoCommands,
    },

    /// Create an account and log in
    Signup {
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        name: Option<String>,
        /// Password (or set MOTOSHOP_PASSWORD)
        #[arg(short, long)]
        password: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Log in to an existing account
    Login {
        #[arg(long)]
        email: Option<String>,
        /// Password (or set MOTOSHOP_PASSWORD)
        #[arg(short, long)]
        password: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Log out
    Logout {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the logged-in user
    Whoami {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show or update your profile
    Profile {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        /// Avatar image URL
        #[arg(long)]
        avatar: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Place an order for everything in the cart
    Checkout {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show your order history
    Orders {
        /// Include line items
        #[arg(long, short)]
        detailed: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// View and manage application logs
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = run(cli);

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&e.to_string());
            if !is_user_error(&e) {
                output::info("Run `moto logs list --errors` for details");
            }
            ExitCode::FAILURE
        }
    }
}

/// Bad input the user can fix, as opposed to a broken environment
fn is_user_error(err: &anyhow::Error) -> bool {
    err.downcast_ref::<motoshop_core::Error>()
        .is_some_and(motoshop_core::Error::is_user_error)
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Products {
            search,
            range,
            min_price,
            max_price,
            min_rating,
            sort,
            featured,
            json,
        } => products::run_list(products::ProductQuery {
            search,
            range,
            min_price,
            max_price,
            min_rating,
            sort,
            featured,
            json,
        }),
        Commands::Product { id, json } => products::run_show(id, json),
        Commands::Cart { command } => cart::run(command),
        Commands::Promo { command } => promo::run(command),
        Commands::Signup { email, name, password, json } => {
            auth::run_signup(email, name, password, json)
        }
        Commands::Login { email, password, json } => auth::run_login(email, password, json),
        Commands::Logout { json } => auth::run_logout(json),
        Commands::Whoami { json } => auth::run_whoami(json),
        Commands::Profile { name, email, avatar, json } => {
            auth::run_profile(name, email, avatar, json)
        }
        Commands::Checkout { json } => checkout::run(json),
        Commands::Orders { detailed, json } => orders::run(detailed, json),
        Commands::Logs { command } => logs::run(command),
    }
}
