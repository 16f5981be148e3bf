//! The order entity and its lifecycle.

pub mod builder;
pub mod service;
pub mod status;
pub mod value_objects;

use chrono::{DateTime, Utc};
use common::{OrderId, UserId};
use serde::{Deserialize, Serialize};

pub use value_objects::{Money, OrderLine};

use status::{OrderStatus, PaymentMethod, PaymentStatus};

/// A durable order record.
///
/// Created atomically by the order builder; afterwards only `status`,
/// `payment_status`, and `updated_at` ever change, and only through the
/// status machine. Orders are never physically deleted — cancellation is
/// a status value. Field names and enum values are part of the durable
/// schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,

    /// The authenticated user who placed the order. Exactly one owner;
    /// ownership never transfers.
    pub owner: UserId,

    /// Line snapshots in order of addition. Non-empty, write-once.
    pub items: Vec<OrderLine>,

    /// Σ line.unit_price × quantity, verified at creation and never
    /// silently recomputed.
    pub total_amount: Money,

    pub delivery_address: String,
    pub phone: String,
    pub payment_method: PaymentMethod,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Returns true if the fulfillment status is terminal.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Total quantity across all lines.
    pub fn total_quantity(&self) -> u32 {
        self.items.iter().map(|l| l.quantity).sum()
    }
}
