//! Value objects for the order domain.

use common::ProductId;
use serde::{Deserialize, Serialize};

use crate::catalog::Product;

/// Money amount represented in cents to avoid floating point drift.
///
/// `$4.99 × 2 + $8.99` must come out to exactly `$18.97`; integer cents
/// guarantee that.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money {
    /// Amount in cents (e.g., 499 = $4.99)
    cents: i64,
}

impl Money {
    /// Creates a money amount from cents.
    pub fn from_cents(cents: i64) -> Self {
        Self { cents }
    }

    /// Returns zero money.
    pub fn zero() -> Self {
        Self { cents: 0 }
    }

    /// Returns the amount in cents.
    pub fn cents(&self) -> i64 {
        self.cents
    }

    /// Returns true if the amount is strictly positive.
    pub fn is_positive(&self) -> bool {
        self.cents > 0
    }

    /// Returns true if the amount is negative.
    pub fn is_negative(&self) -> bool {
        self.cents < 0
    }

    /// Multiplies by a quantity.
    pub fn multiply(&self, quantity: u32) -> Money {
        Money {
            cents: self.cents * i64::from(quantity),
        }
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.cents < 0 { "-" } else { "" };
        write!(f, "{sign}${}.{:02}", (self.cents / 100).abs(), self.cents.abs() % 100)
    }
}

impl std::ops::Add for Money {
    type Output = Money;

    fn add(self, rhs: Self) -> Self::Output {
        Money {
            cents: self.cents + rhs.cents,
        }
    }
}

impl std::ops::AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.cents += rhs.cents;
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

/// A line item snapshotted into an order at creation time.
///
/// Name, price, and image are copied from the product as it existed when
/// the order was placed; the snapshot never changes afterwards, even if
/// the source product is edited or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    /// Reference to the source product.
    pub product_id: ProductId,

    /// Product name at order time.
    pub product_name: String,

    /// Unit price at order time.
    pub unit_price: Money,

    /// Quantity ordered (always ≥ 1).
    pub quantity: u32,

    /// Product image at order time.
    pub image: String,
}

impl OrderLine {
    /// Snapshots a product into an order line.
    pub fn snapshot(product: &Product, quantity: u32) -> Self {
        Self {
            product_id: product.id,
            product_name: product.name.clone(),
            unit_price: product.price,
            quantity,
            image: product.image.clone(),
        }
    }

    /// Returns the total price for this line (unit price × quantity).
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply(self.quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Category;

    #[test]
    fn money_display() {
        assert_eq!(Money::from_cents(1897).to_string(), "$18.97");
        assert_eq!(Money::from_cents(100).to_string(), "$1.00");
        assert_eq!(Money::from_cents(5).to_string(), "$0.05");
        assert_eq!(Money::from_cents(-1234).to_string(), "-$12.34");
    }

    #[test]
    fn money_arithmetic_is_exact() {
        let muffins = Money::from_cents(499).multiply(2);
        let tiramisu = Money::from_cents(899);
        assert_eq!((muffins + tiramisu).cents(), 1897);
    }

    #[test]
    fn money_sum_over_iterator() {
        let total: Money = [100, 250, 49].into_iter().map(Money::from_cents).sum();
        assert_eq!(total.cents(), 399);
    }

    #[test]
    fn money_sign_checks() {
        assert!(Money::from_cents(1).is_positive());
        assert!(!Money::zero().is_positive());
        assert!(Money::from_cents(-1).is_negative());
    }

    #[test]
    fn snapshot_copies_product_fields() {
        let product = Product::new("Tiramisu", Category::Desserts, Money::from_cents(899))
            .with_image("tiramisu.jpg");
        let line = OrderLine::snapshot(&product, 3);

        assert_eq!(line.product_id, product.id);
        assert_eq!(line.product_name, "Tiramisu");
        assert_eq!(line.unit_price.cents(), 899);
        assert_eq!(line.image, "tiramisu.jpg");
        assert_eq!(line.line_total().cents(), 2697);
    }

    #[test]
    fn order_line_serialization_roundtrip() {
        let product = Product::new("Bagel", Category::Breads, Money::from_cents(349));
        let line = OrderLine::snapshot(&product, 2);
        let json = serde_json::to_string(&line).unwrap();
        let deserialized: OrderLine = serde_json::from_str(&json).unwrap();
        assert_eq!(line, deserialized);
    }
}
