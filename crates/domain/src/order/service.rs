//! Order service: orchestrates the order builder and the status machine
//! against the storage ports.

use common::OrderId;

use crate::auth::Caller;
use crate::error::DomainError;
use crate::store::{OrderStore, ProductCatalog, StoreError};

use super::builder::{OrderBuilder, OrderSubmission};
use super::status::{OrderStatus, PaymentStatus};
use super::Order;

/// High-level API over order creation, queries, and status updates.
pub struct OrderService<S, C> {
    store: S,
    catalog: C,
}

impl<S: OrderStore, C: ProductCatalog> OrderService<S, C> {
    /// Creates a service over the given store and catalog.
    pub fn new(store: S, catalog: C) -> Self {
        Self { store, catalog }
    }

    /// Converts a cart submission into a persisted order.
    ///
    /// All-or-nothing: any unresolvable product, bad quantity, or invalid
    /// total aborts the whole submission with nothing persisted. On
    /// storage failure no order exists and the caller may retry; the cart
    /// must only be cleared after this returns `Ok`.
    #[tracing::instrument(skip(self, submission), fields(owner = %caller.user_id))]
    pub async fn place_order(
        &self,
        caller: &Caller,
        submission: OrderSubmission,
    ) -> Result<Order, DomainError> {
        let mut builder = OrderBuilder::new(caller)
            .delivery_address(submission.delivery_address)
            .phone(submission.phone)
            .payment_method(submission.payment_method);

        for line in &submission.lines {
            let product = self
                .catalog
                .find_by_id(line.product_id)
                .await?
                .ok_or(DomainError::InvalidLineItem(line.product_id))?;
            builder.add_line(&product, line.quantity)?;
        }

        let order = builder.build()?;
        let stored = self.store.create(order).await?;

        metrics::counter!("orders_created_total").increment(1);
        tracing::info!(order_id = %stored.id, total = %stored.total_amount, "order placed");
        Ok(stored)
    }

    /// Returns the caller's own orders, newest first.
    #[tracing::instrument(skip(self), fields(owner = %caller.user_id))]
    pub async fn orders_for(&self, caller: &Caller) -> Result<Vec<Order>, DomainError> {
        Ok(self.store.find_by_owner(caller.user_id).await?)
    }

    /// Returns all orders, newest first. Privileged callers only.
    #[tracing::instrument(skip(self))]
    pub async fn all_orders(&self, caller: &Caller) -> Result<Vec<Order>, DomainError> {
        if !caller.is_privileged() {
            return Err(DomainError::Forbidden);
        }
        Ok(self.store.find_all().await?)
    }

    /// Moves an order to a new fulfillment status.
    ///
    /// Only privileged callers may mutate status. A request for the
    /// current status is an idempotent no-op; any other target must be an
    /// out-edge of the current status in the transition graph. The write
    /// is conditioned on the status read here, so a concurrent update
    /// that lands first surfaces as [`DomainError::Conflict`] and the
    /// caller retries with a fresh read.
    #[tracing::instrument(skip(self))]
    pub async fn update_status(
        &self,
        caller: &Caller,
        id: OrderId,
        new_status: OrderStatus,
    ) -> Result<Order, DomainError> {
        if !caller.is_privileged() {
            return Err(DomainError::Forbidden);
        }

        let order = self
            .store
            .find_by_id(id)
            .await?
            .ok_or(DomainError::NotFound(id))?;

        if order.status == new_status {
            return Ok(order);
        }
        if !order.status.can_transition_to(new_status) {
            return Err(DomainError::IllegalTransition {
                from: order.status,
                to: new_status,
            });
        }

        match self.store.update_status(id, order.status, new_status).await {
            Ok(updated) => {
                metrics::counter!("order_status_transitions_total").increment(1);
                tracing::info!(order_id = %id, from = %order.status, to = %new_status, "status updated");
                Ok(updated)
            }
            Err(StoreError::Conflict) => Err(DomainError::Conflict(id)),
            Err(StoreError::NotFound) => Err(DomainError::NotFound(id)),
            Err(e) => Err(DomainError::Storage(e)),
        }
    }

    /// Moves an order's payment status. Same contract as
    /// [`OrderService::update_status`], against the payment graph.
    #[tracing::instrument(skip(self))]
    pub async fn update_payment_status(
        &self,
        caller: &Caller,
        id: OrderId,
        new_status: PaymentStatus,
    ) -> Result<Order, DomainError> {
        if !caller.is_privileged() {
            return Err(DomainError::Forbidden);
        }

        let order = self
            .store
            .find_by_id(id)
            .await?
            .ok_or(DomainError::NotFound(id))?;

        if order.payment_status == new_status {
            return Ok(order);
        }
        if !order.payment_status.can_transition_to(new_status) {
            return Err(DomainError::IllegalPaymentTransition {
                from: order.payment_status,
                to: new_status,
            });
        }

        match self
            .store
            .update_payment_status(id, order.payment_status, new_status)
            .await
        {
            Ok(updated) => {
                metrics::counter!("order_payment_transitions_total").increment(1);
                Ok(updated)
            }
            Err(StoreError::Conflict) => Err(DomainError::Conflict(id)),
            Err(StoreError::NotFound) => Err(DomainError::NotFound(id)),
            Err(e) => Err(DomainError::Storage(e)),
        }
    }

    /// Applies a status and/or payment-status update as one request.
    ///
    /// Both requested transitions are validated against the same read
    /// before either write, so an illegal leg rejects the whole request
    /// with the order untouched. A concurrent writer landing between
    /// validation and a write still surfaces as [`DomainError::Conflict`].
    #[tracing::instrument(skip(self))]
    pub async fn update_status_fields(
        &self,
        caller: &Caller,
        id: OrderId,
        status: Option<OrderStatus>,
        payment_status: Option<PaymentStatus>,
    ) -> Result<Order, DomainError> {
        if !caller.is_privileged() {
            return Err(DomainError::Forbidden);
        }

        let order = self
            .store
            .find_by_id(id)
            .await?
            .ok_or(DomainError::NotFound(id))?;

        if let Some(next) = status {
            if next != order.status && !order.status.can_transition_to(next) {
                return Err(DomainError::IllegalTransition {
                    from: order.status,
                    to: next,
                });
            }
        }
        if let Some(next) = payment_status {
            if next != order.payment_status && !order.payment_status.can_transition_to(next) {
                return Err(DomainError::IllegalPaymentTransition {
                    from: order.payment_status,
                    to: next,
                });
            }
        }

        let mut current = order;
        if let Some(next) = status {
            current = self.update_status(caller, id, next).await?;
        }
        if let Some(next) = payment_status {
            current = self.update_payment_status(caller, id, next).await?;
        }
        Ok(current)
    }

    /// Available products, newest first, optionally filtered by category.
    #[tracing::instrument(skip(self))]
    pub async fn browse_products(
        &self,
        category: Option<crate::catalog::Category>,
    ) -> Result<Vec<crate::catalog::Product>, DomainError> {
        Ok(self.catalog.find_available(category).await?)
    }

    /// Looks up one product.
    #[tracing::instrument(skip(self))]
    pub async fn product(
        &self,
        id: common::ProductId,
    ) -> Result<Option<crate::catalog::Product>, DomainError> {
        Ok(self.catalog.find_by_id(id).await?)
    }

    /// Adds a product to the catalog. Privileged callers only.
    #[tracing::instrument(skip(self, product))]
    pub async fn add_product(
        &self,
        caller: &Caller,
        product: crate::catalog::Product,
    ) -> Result<crate::catalog::Product, DomainError> {
        if !caller.is_privileged() {
            return Err(DomainError::Forbidden);
        }
        Ok(self.catalog.create(product).await?)
    }
}
