//! Checkout - turn the cart into an order

use crate::domain::result::{Error, Result};
use crate::domain::{NewOrder, Order};
use crate::services::{AuthService, CartService, OrderService};

/// Place an order from the current cart and empty the cart
///
/// Needs an active session and at least one cart line. The stored cart is
/// emptied before the order is written and put back if that write fails,
/// so a failed checkout never leaves both an order and a full cart.
pub fn checkout(cart: &mut CartService, auth: &AuthService, orders: &OrderService) -> Result<Order> {
    let user = auth.current_user().ok_or(Error::NoActiveSession)?;
    if cart.state().is_empty() {
        return Err(Error::EmptyCart);
    }

    let snapshot = cart.state().clone();
    if let Err(e) = cart.clear_cart() {
        let _ = cart.restore(snapshot);
        return Err(e);
    }

    match orders.add_order(Some(user), NewOrder::from_cart(&snapshot)) {
        Ok(order) => Ok(order),
        Err(e) => {
            let _ = cart.restore(snapshot);
            Err(e)
        }
    }
}
