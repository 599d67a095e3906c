//! Order domain model

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::CartState;

/// Fulfilment status. Orders are created `Pending` and nothing in the core
/// moves them further.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Shipped,
    Delivered,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
        };
        f.write_str(s)
    }
}

/// One purchased product, frozen at checkout time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineItem {
    pub name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
}

impl OrderLineItem {
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// Everything the caller supplies when recording an order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub line_items: Vec<OrderLineItem>,
    pub total: Decimal,
    pub promo_code: Option<String>,
    pub discount_percent: Option<u8>,
}

impl NewOrder {
    /// Snapshot the cart's lines, total and promo
    pub fn from_cart(cart: &CartState) -> Self {
        Self {
            line_items: cart
                .lines
                .iter()
                .map(|line| OrderLineItem {
                    name: line.product.name.clone(),
                    quantity: line.quantity,
                    unit_price: line.product.price,
                })
                .collect(),
            total: cart.total(),
            promo_code: cart.promo_code.clone(),
            discount_percent: (cart.discount_percent > 0).then_some(cart.discount_percent),
        }
    }
}

/// A completed checkout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub line_items: Vec<OrderLineItem>,
    pub total: Decimal,
    pub status: OrderStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promo_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_percent: Option<u8>,
}

impl Order {
    /// Stamp a new pending order with a fresh id and the current time
    pub fn create(new_order: NewOrder) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            line_items: new_order.line_items,
            total: new_order.total,
            status: OrderStatus::Pending,
            promo_code: new_order.promo_code,
            discount_percent: new_order.discount_percent,
        }
    }

    /// Short reference shown to customers, e.g. `#3F2A9C01`
    pub fn display_id(&self) -> String {
        let hex: String = self.id.chars().filter(|c| *c != '-').take(8).collect();
        format!("#{}", hex.to_uppercase())
    }

    pub fn item_count(&self) -> u64 {
        self.line_items.iter().map(|item| u64::from(item.quantity)).sum()
    }
}

/// Aggregates for the profile page
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OrderStats {
    pub order_count: usize,
    pub total_spent: Decimal,
}

impl OrderStats {
    pub fn from_orders(orders: &[Order]) -> Self {
        Self {
            order_count: orders.len(),
            total_spent: orders.iter().map(|o| o.total).sum(),
        }
    }
}
