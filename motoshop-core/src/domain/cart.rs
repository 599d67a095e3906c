//! Cart domain model
//!
//! `CartState` owns the line sequence and the applied promo code. Totals are
//! always derived from the lines on read and are never stored.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Product, PromoTable};

/// One (product, quantity) pairing. Quantity is always at least 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub product: Product,
    pub quantity: u32,
}

impl CartLine {
    pub fn line_total(&self) -> Decimal {
        self.product.price * Decimal::from(self.quantity)
    }
}

/// Persisted cart contents
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartState {
    #[serde(default)]
    pub lines: Vec<CartLine>,
    #[serde(default)]
    pub promo_code: Option<String>,
    #[serde(default)]
    pub discount_percent: u8,
}

impl CartState {
    /// Add one unit: bump an existing line or append a new one at the end
    pub fn add(&mut self, product: &Product) {
        self.add_many(product, 1);
    }

    /// Add `quantity` units of a product. Zero is a no-op.
    pub fn add_many(&mut self, product: &Product, quantity: u32) {
        if quantity == 0 {
            return;
        }
        match self.line_mut(product.id) {
            Some(line) => line.quantity = line.quantity.saturating_add(quantity),
            None => self.lines.push(CartLine {
                product: product.clone(),
                quantity,
            }),
        }
    }

    /// Drop the line for `product_id`; absent ids are ignored
    pub fn remove(&mut self, product_id: u32) {
        self.lines.retain(|line| line.product.id != product_id);
    }

    /// Set a line's quantity. Zero or less removes the line; an unknown
    /// product is left alone.
    pub fn update_quantity(&mut self, product_id: u32, quantity: i64) {
        if quantity <= 0 {
            self.remove(product_id);
            return;
        }
        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        if let Some(line) = self.line_mut(product_id) {
            line.quantity = quantity;
        }
    }

    /// Empty the cart and drop any promo code
    pub fn clear(&mut self) {
        self.lines.clear();
        self.remove_promo();
    }

    /// Apply a promo code, returning the discount percent on success
    ///
    /// Unknown codes leave the cart untouched.
    pub fn apply_promo(&mut self, code: &str, promos: &PromoTable) -> Option<u8> {
        let (canonical, percent) = promos.lookup(code)?;
        self.promo_code = Some(canonical);
        self.discount_percent = percent;
        Some(percent)
    }

    pub fn remove_promo(&mut self) {
        self.promo_code = None;
        self.discount_percent = 0;
    }

    /// Restore invariants on state read back from storage
    ///
    /// Merges duplicate lines, drops zero quantities, and discards a promo
    /// code that is no longer configured or a discount without a code.
    pub fn sanitize(&mut self, promos: &PromoTable) {
        let mut merged = CartState::default();
        for line in self.lines.drain(..) {
            merged.add_many(&line.product, line.quantity);
        }
        self.lines = merged.lines;

        let valid_promo = match &self.promo_code {
            Some(code) => promos.lookup(code),
            None => None,
        };
        match valid_promo {
            Some((code, percent)) => {
                self.promo_code = Some(code);
                self.discount_percent = percent;
            }
            None => self.remove_promo(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn quantity_of(&self, product_id: u32) -> u32 {
        self.lines
            .iter()
            .find(|line| line.product.id == product_id)
            .map_or(0, |line| line.quantity)
    }

    pub fn total_items(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    pub fn subtotal(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// `subtotal * (1 - discount/100)`
    pub fn total(&self) -> Decimal {
        let percent = Decimal::from(self.discount_percent);
        self.subtotal() * (Decimal::ONE_HUNDRED - percent) / Decimal::ONE_HUNDRED
    }

    pub fn discount_amount(&self) -> Decimal {
        self.subtotal() - self.total()
    }

    /// Snapshot of the cart with all derived figures
    pub fn summary(&self) -> CartSummary {
        CartSummary {
            lines: self.lines.clone(),
            total_items: self.total_items(),
            subtotal: self.subtotal(),
            promo_code: self.promo_code.clone(),
            discount_percent: self.discount_percent,
            discount_amount: self.discount_amount(),
            total: self.total(),
        }
    }

    fn line_mut(&mut self, product_id: u32) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|line| line.product.id == product_id)
    }
}

/// Read-only view of the cart for display and JSON output
#[derive(Debug, Clone, Serialize)]
pub struct CartSummary {
    pub lines: Vec<CartLine>,
    pub total_items: u64,
    pub subtotal: Decimal,
    pub promo_code: Option<String>,
    pub discount_percent: u8,
    pub discount_amount: Decimal,
    pub total: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: u32, price: i64) -> Product {
        Product::new(
            id,
            format!("Bike {}", id),
            Decimal::new(price, 0),
            4.0,
            "test bike",
            "https://images.example.com/bike.jpg",
        )
    }

    fn assert_total_invariant(cart: &CartState) {
        let expected = cart.subtotal()
            * (Decimal::ONE - Decimal::from(cart.discount_percent) / Decimal::ONE_HUNDRED);
        assert_eq!(cart.total(), expected);
        assert_eq!(cart.discount_percent != 0, cart.promo_code.is_some());
    }

    #[test]
    fn test_add_merges_lines_in_insertion_order() {
        let (p1, p2) = (product(1, 100), product(2, 200));
        let mut cart = CartState::default();
        cart.add(&p1);
        cart.add(&p2);
        cart.add(&p1);

        assert_eq!(cart.lines.len(), 2);
        assert_eq!(cart.lines[0].product.id, 1);
        assert_eq!(cart.lines[0].quantity, 2);
        assert_eq!(cart.lines[1].quantity, 1);
        assert_eq!(cart.total_items(), 3);
    }

    #[test]
    fn test_update_quantity_zero_equals_remove() {
        let mut a = CartState::default();
        a.add(&product(1, 100));
        a.add(&product(2, 100));
        let mut b = a.clone();

        a.update_quantity(1, 0);
        b.remove(1);
        assert_eq!(a, b);

        a.update_quantity(2, -3);
        assert!(a.is_empty());
    }

    #[test]
    fn test_update_quantity_unknown_product_is_noop() {
        let mut cart = CartState::default();
        cart.add(&product(1, 100));
        let before = cart.clone();
        cart.update_quantity(9, 4);
        assert_eq!(cart, before);

        cart.update_quantity(1, 4);
        assert_eq!(cart.quantity_of(1), 4);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut cart = CartState::default();
        cart.add(&product(1, 100));
        cart.remove(42);
        assert_eq!(cart.lines.len(), 1);
    }

    #[test]
    fn test_promo_apply_is_idempotent_and_invalid_is_ignored() {
        let promos = PromoTable::default();
        let mut cart = CartState::default();
        cart.add(&product(1, 1000));

        assert_eq!(cart.apply_promo("moto10", &promos), Some(10));
        let once = cart.clone();
        assert_eq!(cart.apply_promo("MOTO10", &promos), Some(10));
        assert_eq!(cart, once);

        assert_eq!(cart.apply_promo("BOGUS", &promos), None);
        assert_eq!(cart, once);
    }

    #[test]
    fn test_pricing_with_promo() {
        let promos = PromoTable::default();
        let mut cart = CartState::default();
        cart.add_many(&product(1, 1000), 3);
        cart.apply_promo("MOTO10", &promos);

        assert_eq!(cart.subtotal(), Decimal::new(3000, 0));
        assert_eq!(cart.discount_percent, 10);
        assert_eq!(cart.total(), Decimal::new(2700, 0));
        assert_eq!(cart.discount_amount(), Decimal::new(300, 0));
    }

    #[test]
    fn test_total_invariant_across_mutations() {
        let promos = PromoTable::default();
        let bikes = [product(1, 8999), product(2, 15499), product(3, 333)];
        let mut cart = CartState::default();
        assert_total_invariant(&cart);

        for (step, code) in ["RIDER15", "nope", "SPEED20", "NEWBIKE"].iter().enumerate() {
            cart.add(&bikes[step % bikes.len()]);
            assert_total_invariant(&cart);
            cart.apply_promo(code, &promos);
            assert_total_invariant(&cart);
            cart.update_quantity(bikes[0].id, step as i64 + 2);
            assert_total_invariant(&cart);
        }
        cart.remove_promo();
        assert_total_invariant(&cart);
        cart.remove(2);
        assert_total_invariant(&cart);
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut cart = CartState::default();
        cart.add(&product(1, 100));
        cart.apply_promo("SPEED20", &PromoTable::default());
        cart.clear();

        assert!(cart.lines.is_empty());
        assert!(cart.promo_code.is_none());
        assert_eq!(cart.discount_percent, 0);
        assert_eq!(cart.total(), Decimal::ZERO);
    }

    #[test]
    fn test_sanitize_repairs_stored_state() {
        let p = product(1, 100);
        let mut cart = CartState {
            lines: vec![
                CartLine { product: p.clone(), quantity: 1 },
                CartLine { product: p.clone(), quantity: 0 },
                CartLine { product: p, quantity: 2 },
            ],
            promo_code: Some("RETIRED".to_string()),
            discount_percent: 50,
        };
        cart.sanitize(&PromoTable::default());

        assert_eq!(cart.lines.len(), 1);
        assert_eq!(cart.lines[0].quantity, 3);
        assert!(cart.promo_code.is_none());
        assert_eq!(cart.discount_percent, 0);
    }

    #[test]
    fn test_stored_json_shape() {
        let mut cart = CartState::default();
        cart.add(&product(1, 100));
        cart.apply_promo("MOTO10", &PromoTable::default());
        let json = serde_json::to_value(&cart).unwrap();
        assert_eq!(json["promoCode"], "MOTO10");
        assert_eq!(json["discountPercent"], 10);
        assert_eq!(json["lines"][0]["quantity"], 1);
    }
}
