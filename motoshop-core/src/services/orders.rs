//! Order service - per-user order ledger
//!
//! Each user's history lives under `order-ledger/<user-id>`, most recent
//! order first. Orders are only ever prepended.

use std::sync::Arc;

use crate::domain::result::{Error, Result};
use crate::domain::{NewOrder, Order, OrderStats, User};
use crate::ports::{read_json, try_read_json, write_json, KeyValueStore, StorageKey};

pub struct OrderService {
    store: Arc<dyn KeyValueStore>,
}

impl OrderService {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Record a new pending order for the session user
    ///
    /// Fails with `NoActiveSession` when nobody is logged in. A ledger that
    /// cannot be read is an error, so the write never replaces history.
    pub fn add_order(&self, session: Option<&User>, new_order: NewOrder) -> Result<Order> {
        let user = session.ok_or(Error::NoActiveSession)?;
        let key = StorageKey::OrderLedger(user.id.clone());

        let mut ledger: Vec<Order> =
            try_read_json(self.store.as_ref(), &key)?.unwrap_or_default();
        let order = Order::create(new_order);
        ledger.insert(0, order.clone());
        write_json(self.store.as_ref(), &key, &ledger)?;

        Ok(order)
    }

    /// A user's orders, most recent first
    pub fn orders_for(&self, user: &User) -> Vec<Order> {
        read_json(
            self.store.as_ref(),
            &StorageKey::OrderLedger(user.id.clone()),
        )
        .unwrap_or_default()
    }

    pub fn stats_for(&self, user: &User) -> OrderStats {
        OrderStats::from_orders(&self.orders_for(user))
    }
}
