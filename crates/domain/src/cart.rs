//! The cart aggregator.
//!
//! A cart is session-local, client-held state: a plain value object with
//! pure derivation functions and no interior mutability. It is never
//! persisted server-side and is lost if the session ends before
//! submission — there is no cart-recovery feature.

use common::ProductId;
use serde::{Deserialize, Serialize};

use crate::catalog::Product;
use crate::order::builder::LineInput;
use crate::order::value_objects::Money;

/// One product selection in a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: ProductId,
    /// Display price, snapshotted when the line was added.
    pub unit_price: Money,
    /// Always ≥ 1; a line at quantity 0 is removed instead.
    pub quantity: u32,
}

/// Ephemeral collection of product selections prior to order submission.
///
/// Line order follows order of addition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Creates an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `quantity` of a product, merging into an existing line.
    ///
    /// A product with a negative price is rejected as a no-op; a zero
    /// quantity is a no-op.
    pub fn add_item(&mut self, product: &Product, quantity: u32) {
        if quantity == 0 || product.price.is_negative() {
            return;
        }
        match self.lines.iter_mut().find(|l| l.product_id == product.id) {
            Some(line) => line.quantity += quantity,
            None => self.lines.push(CartLine {
                product_id: product.id,
                unit_price: product.price,
                quantity,
            }),
        }
    }

    /// Sets the quantity of a line; `0` removes it.
    pub fn set_quantity(&mut self, product_id: ProductId, quantity: u32) {
        if quantity == 0 {
            self.remove_item(product_id);
        } else if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product_id) {
            line.quantity = quantity;
        }
    }

    /// Removes a line. Removing an absent line is a no-op.
    pub fn remove_item(&mut self, product_id: ProductId) {
        self.lines.retain(|l| l.product_id != product_id);
    }

    /// Empties the cart. Called only after the store confirms persistence
    /// of the submitted order.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Running total, recomputed on demand.
    pub fn total(&self) -> Money {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Total quantity across all lines (UI badge count).
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Returns true if the cart holds no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The lines in order of addition.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Converts the cart into the line inputs of an order submission.
    pub fn to_submission(&self) -> Vec<LineInput> {
        self.lines
            .iter()
            .map(|l| LineInput {
                product_id: l.product_id,
                quantity: l.quantity,
            })
            .collect()
    }
}

impl CartLine {
    fn line_total(&self) -> Money {
        self.unit_price.multiply(self.quantity)
    }
}
