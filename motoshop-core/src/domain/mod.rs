//! Core domain entities
//!
//! All business entities are defined here. These are pure data structures
//! with validation logic - no I/O or external dependencies.

mod cart;
mod catalog;
mod credential;
pub mod filter;
mod order;
mod product;
mod promo;
pub mod result;
mod user;

pub use cart::{CartLine, CartState, CartSummary};
pub use catalog::Catalog;
pub use credential::Argon2Params;
pub use filter::{filter_and_sort, FilterCriteria, PriceRange, SortKey};
pub use order::{NewOrder, Order, OrderLineItem, OrderStats, OrderStatus};
pub use product::Product;
pub use promo::{PromoTable, DEFAULT_PROMO_CODES};
pub use user::{is_valid_email, AccountRegistry, ProfileUpdate, User, UserRecord, MIN_PASSWORD_LEN};
