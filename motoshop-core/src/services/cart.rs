//! Cart service - the persistent shopping cart
//!
//! Every mutation writes the full cart state under `cart-state`. On load
//! the state is read back and sanitized; absent or unreadable state is an
//! empty cart.

use std::sync::Arc;

use crate::domain::result::Result;
use crate::domain::{CartState, CartSummary, Product, PromoTable};
use crate::ports::{read_json, write_json, KeyValueStore, StorageKey};

pub struct CartService {
    store: Arc<dyn KeyValueStore>,
    promos: PromoTable,
    state: CartState,
}

impl CartService {
    /// Rehydrate the cart from storage
    pub fn load(store: Arc<dyn KeyValueStore>, promos: PromoTable) -> Self {
        let mut state: CartState =
            read_json(store.as_ref(), &StorageKey::CartState).unwrap_or_default();
        state.sanitize(&promos);
        Self {
            store,
            promos,
            state,
        }
    }

    pub fn state(&self) -> &CartState {
        &self.state
    }

    pub fn summary(&self) -> CartSummary {
        self.state.summary()
    }

    pub fn promos(&self) -> &PromoTable {
        &self.promos
    }

    pub fn add_to_cart(&mut self, product: &Product) -> Result<()> {
        self.state.add(product);
        self.persist()
    }

    /// Add several units at once (product detail view)
    pub fn add_to_cart_many(&mut self, product: &Product, quantity: u32) -> Result<()> {
        self.state.add_many(product, quantity);
        self.persist()
    }

    pub fn remove_from_cart(&mut self, product_id: u32) -> Result<()> {
        self.state.remove(product_id);
        self.persist()
    }

    /// `quantity <= 0` removes the line
    pub fn update_quantity(&mut self, product_id: u32, quantity: i64) -> Result<()> {
        self.state.update_quantity(product_id, quantity);
        self.persist()
    }

    pub fn clear_cart(&mut self) -> Result<()> {
        self.state.clear();
        self.persist()
    }

    /// Put back a previously taken snapshot of the cart
    pub fn restore(&mut self, state: CartState) -> Result<()> {
        self.state = state;
        self.persist()
    }

    /// Apply a promo code
    ///
    /// `Ok(Some(percent))` when the code is known, `Ok(None)` when it is
    /// not. An unknown code leaves the cart, and storage, untouched.
    pub fn apply_promo_code(&mut self, code: &str) -> Result<Option<u8>> {
        match self.state.apply_promo(code, &self.promos) {
            Some(percent) => {
                self.persist()?;
                Ok(Some(percent))
            }
            None => Ok(None),
        }
    }

    pub fn remove_promo_code(&mut self) -> Result<()> {
        self.state.remove_promo();
        self.persist()
    }

    fn persist(&self) -> Result<()> {
        write_json(self.store.as_ref(), &StorageKey::CartState, &self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryStore;
    use rust_decimal::Decimal;

    fn bike(id: u32, price: i64) -> Product {
        Product::new(
            id,
            format!("Bike {}", id),
            Decimal::new(price, 0),
            4.0,
            "",
            format!("https://img.example.com/{}.jpg", id),
        )
    }

    fn service() -> (Arc<MemoryStore>, CartService) {
        let store = Arc::new(MemoryStore::new());
        let cart = CartService::load(store.clone(), PromoTable::default());
        (store, cart)
    }

    #[test]
    fn test_add_persists_and_rehydrates() {
        let (store, mut cart) = service();
        let p1 = bike(1, 1000);
        let p2 = bike(2, 2000);

        cart.add_to_cart(&p1).unwrap();
        cart.add_to_cart(&p2).unwrap();
        cart.add_to_cart(&p1).unwrap();

        let reloaded = CartService::load(store, PromoTable::default());
        assert_eq!(reloaded.state().lines.len(), 2);
        assert_eq!(reloaded.state().quantity_of(1), 2);
        assert_eq!(reloaded.state().quantity_of(2), 1);
        assert_eq!(reloaded.summary().total_items, 3);
    }

    #[test]
    fn test_promo_round_trip() {
        let (store, mut cart) = service();
        cart.add_to_cart_many(&bike(1, 1000), 3).unwrap();

        assert_eq!(cart.apply_promo_code(" moto10 ").unwrap(), Some(10));
        let reloaded = CartService::load(store.clone(), PromoTable::default());
        assert_eq!(reloaded.state().promo_code.as_deref(), Some("MOTO10"));
        assert_eq!(reloaded.summary().total, Decimal::new(2700, 0));

        cart.remove_promo_code().unwrap();
        let reloaded = CartService::load(store, PromoTable::default());
        assert_eq!(reloaded.state().promo_code, None);
        assert_eq!(reloaded.state().discount_percent, 0);
    }

    #[test]
    fn test_invalid_promo_writes_nothing() {
        let (store, mut cart) = service();
        assert_eq!(cart.apply_promo_code("FREEBIKE").unwrap(), None);
        assert_eq!(store.get("cart-state").unwrap(), None);
    }

    #[test]
    fn test_clear_cart() {
        let (store, mut cart) = service();
        cart.add_to_cart(&bike(1, 1000)).unwrap();
        cart.apply_promo_code("SPEED20").unwrap();
        cart.clear_cart().unwrap();

        let reloaded = CartService::load(store, PromoTable::default());
        assert!(reloaded.state().is_empty());
        assert_eq!(reloaded.state().promo_code, None);
        assert_eq!(reloaded.state().discount_percent, 0);
    }

    #[test]
    fn test_corrupt_state_is_empty_cart() {
        let store = Arc::new(MemoryStore::new());
        store.set("cart-state", "[[[").unwrap();
        let cart = CartService::load(store, PromoTable::default());
        assert_eq!(cart.state(), &CartState::default());
    }

    #[test]
    fn test_promo_dropped_when_no_longer_configured() {
        let (store, mut cart) = service();
        cart.add_to_cart(&bike(1, 1000)).unwrap();
        cart.apply_promo_code("NEWBIKE").unwrap();

        let only_moto = PromoTable::new([("MOTO10", 10)]).unwrap();
        let reloaded = CartService::load(store, only_moto);
        assert_eq!(reloaded.state().promo_code, None);
        assert_eq!(reloaded.summary().total, Decimal::new(1000, 0));
    }

    #[test]
    fn test_update_quantity_zero_removes() {
        let (_, mut cart) = service();
        cart.add_to_cart(&bike(1, 1000)).unwrap();
        cart.add_to_cart(&bike(2, 1000)).unwrap();

        cart.update_quantity(1, 0).unwrap();
        cart.update_quantity(2, 5).unwrap();
        cart.update_quantity(99, 3).unwrap();

        assert_eq!(cart.state().lines.len(), 1);
        assert_eq!(cart.state().quantity_of(2), 5);
    }
}
