//! The order builder: the sole path by which a cart becomes an order.

use chrono::Utc;
use common::{OrderId, ProductId};
use serde::{Deserialize, Serialize};

use crate::auth::Caller;
use crate::catalog::Product;
use crate::error::DomainError;

use super::status::{OrderStatus, PaymentMethod, PaymentStatus};
use super::value_objects::{Money, OrderLine};
use super::Order;

/// One line of an order submission: a product reference and a quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineInput {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Everything a caller supplies when submitting a cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSubmission {
    pub lines: Vec<LineInput>,
    pub delivery_address: String,
    pub phone: String,
    pub payment_method: PaymentMethod,
}

/// Accumulates resolved line snapshots and validates the whole submission.
///
/// Validation is all-or-nothing: any failure leaves no partial order
/// behind. The builder is pure; product resolution and persistence are
/// the order service's job.
#[derive(Debug)]
pub struct OrderBuilder {
    owner: common::UserId,
    lines: Vec<OrderLine>,
    delivery_address: String,
    phone: String,
    payment_method: Option<PaymentMethod>,
}

impl OrderBuilder {
    /// Starts a build owned by the authenticated caller.
    pub fn new(caller: &Caller) -> Self {
        Self {
            owner: caller.user_id,
            lines: Vec::new(),
            delivery_address: String::new(),
            phone: String::new(),
            payment_method: None,
        }
    }

    /// Sets the delivery address.
    pub fn delivery_address(mut self, address: impl Into<String>) -> Self {
        self.delivery_address = address.into();
        self
    }

    /// Sets the contact phone.
    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = phone.into();
        self
    }

    /// Sets the payment method.
    pub fn payment_method(mut self, method: PaymentMethod) -> Self {
        self.payment_method = Some(method);
        self
    }

    /// Snapshots a resolved product into the order.
    ///
    /// The quantity is copied verbatim and must be at least 1.
    pub fn add_line(&mut self, product: &Product, quantity: u32) -> Result<(), DomainError> {
        if quantity < 1 {
            return Err(DomainError::InvalidQuantity { quantity });
        }
        self.lines.push(OrderLine::snapshot(product, quantity));
        Ok(())
    }

    /// Validates the accumulated submission and produces the order.
    ///
    /// The total is the exact sum of unit price × quantity across all
    /// snapshots; a non-positive total, an empty line set, or an empty
    /// address/phone fails the whole build.
    pub fn build(self) -> Result<Order, DomainError> {
        if self.lines.is_empty() {
            return Err(DomainError::EmptyOrder);
        }
        if self.delivery_address.trim().is_empty() {
            return Err(DomainError::MissingField("deliveryAddress"));
        }
        if self.phone.trim().is_empty() {
            return Err(DomainError::MissingField("phone"));
        }
        let payment_method = self
            .payment_method
            .ok_or(DomainError::MissingField("paymentMethod"))?;

        let total: Money = self.lines.iter().map(OrderLine::line_total).sum();
        if !total.is_positive() {
            return Err(DomainError::InvalidTotal { total });
        }

        let now = Utc::now();
        Ok(Order {
            id: OrderId::new(),
            owner: self.owner,
            items: self.lines,
            total_amount: total,
            delivery_address: self.delivery_address,
            phone: self.phone,
            payment_method,
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Pending,
            created_at: now,
            updated_at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Category;
    use common::UserId;

    fn caller() -> Caller {
        Caller::customer(UserId::new())
    }

    fn ready_builder(caller: &Caller) -> OrderBuilder {
        OrderBuilder::new(caller)
            .delivery_address("12 Baker St")
            .phone("555-0100")
            .payment_method(PaymentMethod::Card)
    }

    #[test]
    fn builds_pending_order_with_exact_total() {
        let caller = caller();
        let muffins = Product::new("Blueberry Muffins", Category::Pastries, Money::from_cents(499));
        let tiramisu = Product::new("Tiramisu", Category::Desserts, Money::from_cents(899));

        let mut builder = ready_builder(&caller);
        builder.add_line(&muffins, 2).unwrap();
        builder.add_line(&tiramisu, 1).unwrap();
        let order = builder.build().unwrap();

        assert_eq!(order.total_amount.cents(), 1897);
        assert_eq!(order.owner, caller.user_id);
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.payment_status, PaymentStatus::Pending);
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.created_at, order.updated_at);
    }

    #[test]
    fn lines_keep_order_of_addition() {
        let caller = caller();
        let first = Product::new("Bagel", Category::Breads, Money::from_cents(349));
        let second = Product::new("Croissant", Category::Pastries, Money::from_cents(299));

        let mut builder = ready_builder(&caller);
        builder.add_line(&first, 1).unwrap();
        builder.add_line(&second, 1).unwrap();
        let order = builder.build().unwrap();

        assert_eq!(order.items[0].product_name, "Bagel");
        assert_eq!(order.items[1].product_name, "Croissant");
    }

    #[test]
    fn zero_quantity_is_rejected() {
        let caller = caller();
        let product = Product::new("Bagel", Category::Breads, Money::from_cents(349));
        let mut builder = ready_builder(&caller);

        let err = builder.add_line(&product, 0).unwrap_err();
        assert!(matches!(err, DomainError::InvalidQuantity { quantity: 0 }));
    }

    #[test]
    fn empty_submission_is_rejected() {
        let caller = caller();
        let err = ready_builder(&caller).build().unwrap_err();
        assert!(matches!(err, DomainError::EmptyOrder));
    }

    #[test]
    fn zero_total_is_rejected() {
        let caller = caller();
        let free = Product::new("Sample", Category::Cookies, Money::zero());
        let mut builder = ready_builder(&caller);
        builder.add_line(&free, 1).unwrap();

        let err = builder.build().unwrap_err();
        assert!(matches!(err, DomainError::InvalidTotal { .. }));
    }

    #[test]
    fn blank_delivery_fields_are_rejected() {
        let caller = caller();
        let product = Product::new("Bagel", Category::Breads, Money::from_cents(349));

        let mut builder = OrderBuilder::new(&caller)
            .phone("555-0100")
            .payment_method(PaymentMethod::Cash);
        builder.add_line(&product, 1).unwrap();
        assert!(matches!(
            builder.build().unwrap_err(),
            DomainError::MissingField("deliveryAddress")
        ));

        let mut builder = OrderBuilder::new(&caller)
            .delivery_address("12 Baker St")
            .phone("   ")
            .payment_method(PaymentMethod::Cash);
        builder.add_line(&product, 1).unwrap();
        assert!(matches!(
            builder.build().unwrap_err(),
            DomainError::MissingField("phone")
        ));
    }

    #[test]
    fn snapshot_outlives_product_mutation() {
        let caller = caller();
        let mut product = Product::new("Bagel", Category::Breads, Money::from_cents(349));

        let mut builder = ready_builder(&caller);
        builder.add_line(&product, 1).unwrap();
        let order = builder.build().unwrap();

        // Later edits to the product do not touch the snapshot.
        product.name = "Everything Bagel".to_string();
        product.price = Money::from_cents(999);

        assert_eq!(order.items[0].product_name, "Bagel");
        assert_eq!(order.items[0].unit_price.cents(), 349);
    }
}
