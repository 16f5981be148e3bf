//! Domain layer for the storefront ordering system.
//!
//! Contains the cart aggregator, the order builder (the sole path by which
//! a cart becomes a durable order), the status machine governing order and
//! payment transitions, and the storage port traits implemented by the
//! `order-store` crate.

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod error;
pub mod order;
pub mod store;

pub use auth::{Caller, Role};
pub use cart::{Cart, CartLine};
pub use catalog::{Category, Product};
pub use error::DomainError;
pub use order::builder::{LineInput, OrderBuilder, OrderSubmission};
pub use order::service::OrderService;
pub use order::status::{OrderStatus, PaymentMethod, PaymentStatus};
pub use order::value_objects::Money;
pub use order::{Order, OrderLine};
pub use store::{OrderStore, ProductCatalog, StoreError};
