//! CLI command implementations

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod logs;
pub mod orders;
pub mod products;
pub mod promo;

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use motoshop_core::{EntryPoint, LogEvent, LoggingService, ShopContext};

/// Environment variable overriding the shop directory
pub const SHOP_DIR_ENV: &str = "MOTOSHOP_DIR";

/// Get the logging service for CLI operations
///
/// Returns None if logging fails to initialize (shouldn't block operations)
pub fn get_logger() -> Option<LoggingService> {
    let shop_dir = get_shop_dir().ok()?;
    std::fs::create_dir_all(&shop_dir).ok()?;
    LoggingService::new(&shop_dir, EntryPoint::Cli, env!("CARGO_PKG_VERSION")).ok()
}

/// Log an event, ignoring any errors (logging should never break the app)
pub fn log_event(logger: &Option<LoggingService>, event: LogEvent) {
    if let Some(l) = logger {
        let _ = l.log(event);
    }
}

/// Record a failed command without user input in the message
pub fn log_failure(logger: &Option<LoggingService>, event: &str, command: &str, err: &motoshop_core::Error) {
    log_event(
        logger,
        LogEvent::new(event)
            .with_command(command)
            .with_error(error_kind(err)),
    );
}

/// Stable, privacy-safe name for an error
fn error_kind(err: &motoshop_core::Error) -> &'static str {
    use motoshop_core::Error;
    match err {
        Error::Storage(_) => "storage",
        Error::NotFound(_) => "not_found",
        Error::Validation(_) => "validation",
        Error::Config(_) => "config",
        Error::InvalidCredentials => "invalid_credentials",
        Error::EmailTaken => "email_taken",
        Error::NoActiveSession => "no_active_session",
        Error::EmptyCart => "empty_cart",
        Error::PasswordHash(_) => "password_hash",
        Error::Io(_) => "io",
        Error::Json(_) => "json",
        Error::Other(_) => "other",
    }
}

/// Get the shop directory from environment or default
pub fn get_shop_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(SHOP_DIR_ENV) {
        return Ok(PathBuf::from(dir));
    }
    dirs::home_dir()
        .map(|home| home.join(".motoshop"))
        .ok_or_else(|| anyhow!("Could not find home directory; set {}", SHOP_DIR_ENV))
}

/// Open the shop context
pub fn get_context() -> Result<ShopContext> {
    let shop_dir = get_shop_dir()?;
    std::fs::create_dir_all(&shop_dir)
        .with_context(|| format!("Failed to create shop directory: {:?}", shop_dir))?;
    ShopContext::new(&shop_dir).context("Failed to open the shop")
}
