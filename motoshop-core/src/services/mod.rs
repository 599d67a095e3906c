//! Service layer - business logic orchestration
//!
//! Services coordinate domain logic and port interactions. Each service
//! focuses on a specific use case or feature area.

mod auth;
mod cart;
mod catalog;
mod checkout;
pub mod logging;
pub mod migration;
mod orders;
mod password;

pub use auth::AuthService;
pub use cart::CartService;
pub use catalog::{CatalogService, FEATURED_COUNT};
pub use checkout::checkout;
pub use logging::{EntryPoint, LogEntry, LogEvent, LoggingService};
pub use migration::{MigrationResult, MigrationService};
pub use orders::OrderService;
pub use password::PasswordHasher;
