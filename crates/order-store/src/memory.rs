use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use common::{OrderId, ProductId, UserId};
use domain::store::Result;
use domain::{
    Category, Order, OrderStatus, OrderStore, PaymentStatus, Product, ProductCatalog, StoreError,
};
use tokio::sync::RwLock;

/// In-memory order store.
///
/// Backs the default runtime and the test suites with the same interface
/// and conditional-write semantics as the PostgreSQL implementation.
/// Insertion order doubles as creation order, so "newest first" is a
/// reverse iteration.
#[derive(Clone, Default)]
pub struct InMemoryOrderStore {
    orders: Arc<RwLock<Vec<Order>>>,
}

impl InMemoryOrderStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of stored orders.
    pub async fn order_count(&self) -> usize {
        self.orders.read().await.len()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn create(&self, order: Order) -> Result<Order> {
        let mut orders = self.orders.write().await;
        if orders.iter().any(|o| o.id == order.id) {
            return Err(StoreError::Backend(format!(
                "duplicate order id {}",
                order.id
            )));
        }
        orders.push(order.clone());
        Ok(order)
    }

    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>> {
        Ok(self
            .orders
            .read()
            .await
            .iter()
            .find(|o| o.id == id)
            .cloned())
    }

    async fn find_by_owner(&self, owner: UserId) -> Result<Vec<Order>> {
        Ok(self
            .orders
            .read()
            .await
            .iter()
            .rev()
            .filter(|o| o.owner == owner)
            .cloned()
            .collect())
    }

    async fn find_all(&self) -> Result<Vec<Order>> {
        Ok(self.orders.read().await.iter().rev().cloned().collect())
    }

    async fn update_status(
        &self,
        id: OrderId,
        expected: OrderStatus,
        new_status: OrderStatus,
    ) -> Result<Order> {
        let mut orders = self.orders.write().await;
        let order = orders
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or(StoreError::NotFound)?;
        if order.status != expected {
            return Err(StoreError::Conflict);
        }
        order.status = new_status;
        order.updated_at = Utc::now();
        Ok(order.clone())
    }

    async fn update_payment_status(
        &self,
        id: OrderId,
        expected: PaymentStatus,
        new_status: PaymentStatus,
    ) -> Result<Order> {
        let mut orders = self.orders.write().await;
        let order = orders
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or(StoreError::NotFound)?;
        if order.payment_status != expected {
            return Err(StoreError::Conflict);
        }
        order.payment_status = new_status;
        order.updated_at = Utc::now();
        Ok(order.clone())
    }
}

/// In-memory product catalog.
#[derive(Clone, Default)]
pub struct InMemoryCatalog {
    products: Arc<RwLock<Vec<Product>>>,
}

impl InMemoryCatalog {
    /// Creates a new empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Deletes a product. Existing order snapshots are unaffected.
    pub async fn remove(&self, id: ProductId) {
        self.products.write().await.retain(|p| p.id != id);
    }
}

#[async_trait]
impl ProductCatalog for InMemoryCatalog {
    async fn create(&self, product: Product) -> Result<Product> {
        self.products.write().await.push(product.clone());
        Ok(product)
    }

    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>> {
        Ok(self
            .products
            .read()
            .await
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn find_available(&self, category: Option<Category>) -> Result<Vec<Product>> {
        Ok(self
            .products
            .read()
            .await
            .iter()
            .rev()
            .filter(|p| p.available && category.is_none_or(|c| p.category == c))
            .cloned()
            .collect())
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.products.read().await.len())
    }
}
