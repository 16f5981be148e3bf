//! Storage port traits consumed by the core.
//!
//! The order store and product catalog are the contracts the core requires
//! from durable storage, regardless of backing technology. Implementations
//! live in the `order-store` crate (in-memory and PostgreSQL).

use async_trait::async_trait;
use common::{OrderId, ProductId, UserId};
use thiserror::Error;

use crate::catalog::{Category, Product};
use crate::order::Order;
use crate::order::status::{OrderStatus, PaymentStatus};

/// Errors surfaced by storage implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The targeted record does not exist.
    #[error("record not found")]
    NotFound,

    /// A conditional update found the record changed since it was read.
    #[error("conditional update failed: record changed since read")]
    Conflict,

    /// Line snapshots could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The backend failed. Transient; the caller may retry.
    #[error("backend error: {0}")]
    Backend(String),
}

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Durable order storage.
///
/// Creation is append-only and contention-free; status mutation is the
/// only shared mutable path and uses conditional writes. All
/// implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Inserts an order as a single atomic unit.
    ///
    /// On failure nothing is persisted; there is no partially written
    /// order. Returns the stored order.
    async fn create(&self, order: Order) -> Result<Order>;

    /// Looks up an order by ID.
    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>>;

    /// Returns all orders of one owner, newest first.
    async fn find_by_owner(&self, owner: UserId) -> Result<Vec<Order>>;

    /// Returns all orders, newest first. Privilege is enforced by the
    /// caller, not the store.
    async fn find_all(&self) -> Result<Vec<Order>>;

    /// Sets the order status, conditioned on the status observed at read
    /// time.
    ///
    /// Touches only `status` and `updated_at`. Fails with [`StoreError::Conflict`]
    /// if the current status is no longer `expected`, and with
    /// [`StoreError::NotFound`] if the order does not exist. Returns the
    /// updated order.
    async fn update_status(
        &self,
        id: OrderId,
        expected: OrderStatus,
        new_status: OrderStatus,
    ) -> Result<Order>;

    /// Sets the payment status, conditioned on the payment status observed
    /// at read time. Same contract as [`OrderStore::update_status`].
    async fn update_payment_status(
        &self,
        id: OrderId,
        expected: PaymentStatus,
        new_status: PaymentStatus,
    ) -> Result<Order>;
}

/// Read-mostly product catalog.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// Inserts a product (admin seeding/creation path).
    async fn create(&self, product: Product) -> Result<Product>;

    /// Looks up a product by ID.
    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>>;

    /// Returns available products, newest first, optionally filtered by
    /// category.
    async fn find_available(&self, category: Option<Category>) -> Result<Vec<Product>>;

    /// Returns the number of products in the catalog.
    async fn count(&self) -> Result<usize>;
}
