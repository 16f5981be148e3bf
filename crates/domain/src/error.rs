//! Domain error taxonomy.

use common::{OrderId, ProductId};
use thiserror::Error;

use crate::order::status::{OrderStatus, PaymentStatus};
use crate::order::value_objects::Money;
use crate::store::StoreError;

/// Errors surfaced by the order builder and status machine.
///
/// Every failure is distinguishable by kind; none is swallowed. The
/// submission errors are client input errors and are never retried
/// automatically; `Conflict` and `Storage` are retryable by the caller.
#[derive(Debug, Error)]
pub enum DomainError {
    /// Authenticated but lacking the privileged role.
    #[error("forbidden: caller lacks the required role")]
    Forbidden,

    /// No order with the given ID exists.
    #[error("order not found: {0}")]
    NotFound(OrderId),

    /// A submitted line references a product that cannot be resolved.
    #[error("invalid line item: product {0} cannot be resolved")]
    InvalidLineItem(ProductId),

    /// A submitted line carries a quantity below 1.
    #[error("invalid quantity: {quantity} (must be at least 1)")]
    InvalidQuantity { quantity: u32 },

    /// The computed order total is not positive.
    #[error("invalid total: {total} (must be positive)")]
    InvalidTotal { total: Money },

    /// The submission carries no line items.
    #[error("order has no line items")]
    EmptyOrder,

    /// A required submission field is empty.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// The requested status is not reachable from the current one.
    #[error("illegal transition from {from} to {to}")]
    IllegalTransition {
        from: OrderStatus,
        to: OrderStatus,
    },

    /// The requested payment status is not reachable from the current one.
    #[error("illegal payment transition from {from} to {to}")]
    IllegalPaymentTransition {
        from: PaymentStatus,
        to: PaymentStatus,
    },

    /// The order changed between read and conditional write. Retry with a
    /// fresh read.
    #[error("conflicting update for order {0}: status changed since read")]
    Conflict(OrderId),

    /// Transient storage failure. Retryable; nothing was persisted.
    #[error("storage failure: {0}")]
    Storage(#[from] StoreError),
}
