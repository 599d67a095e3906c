//! Motoshop Core - storefront logic for a motorcycle dealer
//!
//! This crate implements the core domain logic following hexagonal architecture:
//!
//! - **domain**: Core entities (Product, CartState, User, Order, ...)
//! - **ports**: Trait definitions for external dependencies (KeyValueStore)
//! - **services**: Business logic orchestration (catalog, cart, auth, orders)
//! - **adapters**: Concrete implementations (DuckDB, in-memory, built-in catalog)

pub mod adapters;
pub mod config;
pub mod domain;
pub mod log_migrations;
pub mod migrations;
pub mod ports;
pub mod services;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use adapters::duckdb::DuckDbStore;
use config::Config;
use ports::KeyValueStore;
use services::*;

// Re-export commonly used types at crate root
pub use domain::result::{Error, OperationResult};
pub use domain::{
    CartState, CartSummary, Catalog, FilterCriteria, NewOrder, Order, OrderStats, PriceRange,
    Product, ProfileUpdate, SortKey, User,
};
pub use services::{EntryPoint, LogEvent, LoggingService};

/// Store database file inside the shop directory
pub const STORE_FILENAME: &str = "shop.duckdb";

/// Main context for shop operations
///
/// Owns every stateful service; nothing is global. All services share one
/// `KeyValueStore`.
pub struct ShopContext {
    pub config: Config,
    pub store: Arc<dyn KeyValueStore>,
    pub catalog_service: CatalogService,
    pub cart_service: CartService,
    pub auth_service: AuthService,
    pub order_service: OrderService,
}

impl ShopContext {
    /// Open the shop in `shop_dir`, creating the directory and store if needed
    pub fn new(shop_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(shop_dir)?;
        let config = Config::load(shop_dir)?;

        let store = DuckDbStore::new(&shop_dir.join(STORE_FILENAME))?;
        store.ensure_schema()?;

        let catalog = CatalogService::from_config(&config)?;
        Self::assemble(config, Arc::new(store), catalog)
    }

    /// Build a context over an existing store and catalog
    pub fn with_store(config: Config, store: Arc<dyn KeyValueStore>, catalog: Catalog) -> Result<Self> {
        Self::assemble(config, store, CatalogService::new(catalog))
    }

    fn assemble(
        config: Config,
        store: Arc<dyn KeyValueStore>,
        catalog_service: CatalogService,
    ) -> Result<Self> {
        let promos = config.promo_table()?;
        let hasher = PasswordHasher::new(config.password_hashing.clone());

        let cart_service = CartService::load(Arc::clone(&store), promos);
        let auth_service = AuthService::load(Arc::clone(&store), hasher);
        let order_service = OrderService::new(Arc::clone(&store));

        Ok(Self {
            config,
            store,
            catalog_service,
            cart_service,
            auth_service,
            order_service,
        })
    }

    /// Place an order from the cart for the logged-in user
    pub fn checkout(&mut self) -> domain::result::Result<Order> {
        services::checkout(&mut self.cart_service, &self.auth_service, &self.order_service)
    }

    /// Orders of the logged-in user, most recent first
    pub fn my_orders(&self) -> domain::result::Result<Vec<Order>> {
        let user = self
            .auth_service
            .current_user()
            .ok_or(Error::NoActiveSession)?;
        Ok(self.order_service.orders_for(user))
    }
}
