//! End-to-end tests for the order service over stub storage.

use std::sync::Arc;

use async_trait::async_trait;
use common::{OrderId, ProductId, UserId};
use domain::store::Result as StoreResult;
use domain::{
    Caller, Cart, Category, DomainError, Money, Order, OrderService, OrderStatus, OrderStore,
    OrderSubmission, PaymentMethod, PaymentStatus, Product, ProductCatalog, StoreError,
};
use tokio::sync::RwLock;

/// Minimal in-process order store for exercising the service.
#[derive(Clone, Default)]
struct StubOrderStore {
    orders: Arc<RwLock<Vec<Order>>>,
    fail_create: bool,
}

#[async_trait]
impl OrderStore for StubOrderStore {
    async fn create(&self, order: Order) -> StoreResult<Order> {
        if self.fail_create {
            return Err(StoreError::Backend("simulated outage".to_string()));
        }
        self.orders.write().await.push(order.clone());
        Ok(order)
    }

    async fn find_by_id(&self, id: OrderId) -> StoreResult<Option<Order>> {
        Ok(self
            .orders
            .read()
            .await
            .iter()
            .find(|o| o.id == id)
            .cloned())
    }

    async fn find_by_owner(&self, owner: UserId) -> StoreResult<Vec<Order>> {
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

    async fn find_all(&self) -> StoreResult<Vec<Order>> {
        Ok(self.orders.read().await.iter().rev().cloned().collect())
    }

    async fn update_status(
        &self,
        id: OrderId,
        expected: OrderStatus,
        new_status: OrderStatus,
    ) -> StoreResult<Order> {
        let mut orders = self.orders.write().await;
        let order = orders
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or(StoreError::NotFound)?;
        if order.status != expected {
            return Err(StoreError::Conflict);
        }
        order.status = new_status;
        order.updated_at = chrono::Utc::now();
        Ok(order.clone())
    }

    async fn update_payment_status(
        &self,
        id: OrderId,
        expected: PaymentStatus,
        new_status: PaymentStatus,
    ) -> StoreResult<Order> {
        let mut orders = self.orders.write().await;
        let order = orders
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or(StoreError::NotFound)?;
        if order.payment_status != expected {
            return Err(StoreError::Conflict);
        }
        order.payment_status = new_status;
        order.updated_at = chrono::Utc::now();
        Ok(order.clone())
    }
}

#[derive(Clone, Default)]
struct StubCatalog {
    products: Arc<RwLock<Vec<Product>>>,
}

impl StubCatalog {
    async fn remove(&self, id: ProductId) {
        self.products.write().await.retain(|p| p.id != id);
    }
}

#[async_trait]
impl ProductCatalog for StubCatalog {
    async fn create(&self, product: Product) -> StoreResult<Product> {
        self.products.write().await.push(product.clone());
        Ok(product)
    }

    async fn find_by_id(&self, id: ProductId) -> StoreResult<Option<Product>> {
        Ok(self
            .products
            .read()
            .await
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn find_available(&self, category: Option<Category>) -> StoreResult<Vec<Product>> {
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

    async fn count(&self) -> StoreResult<usize> {
        Ok(self.products.read().await.len())
    }
}

struct Fixture {
    service: OrderService<StubOrderStore, StubCatalog>,
    store: StubOrderStore,
    catalog: StubCatalog,
    muffins: Product,
    tiramisu: Product,
}

async fn setup() -> Fixture {
    let store = StubOrderStore::default();
    let catalog = StubCatalog::default();

    let muffins = Product::new("Blueberry Muffins", Category::Pastries, Money::from_cents(499));
    let tiramisu = Product::new("Tiramisu", Category::Desserts, Money::from_cents(899));
    catalog.create(muffins.clone()).await.unwrap();
    catalog.create(tiramisu.clone()).await.unwrap();

    let service = OrderService::new(store.clone(), catalog.clone());
    Fixture {
        service,
        store,
        catalog,
        muffins,
        tiramisu,
    }
}

fn submission_from(cart: &Cart) -> OrderSubmission {
    OrderSubmission {
        lines: cart.to_submission(),
        delivery_address: "12 Baker St".to_string(),
        phone: "555-0100".to_string(),
        payment_method: PaymentMethod::Card,
    }
}

#[tokio::test]
async fn cart_submission_totals_exactly() {
    let fx = setup().await;
    let customer = Caller::customer(UserId::new());

    let mut cart = Cart::new();
    cart.add_item(&fx.muffins, 2);
    cart.add_item(&fx.tiramisu, 1);
    assert_eq!(cart.total().cents(), 1897);

    let order = fx
        .service
        .place_order(&customer, submission_from(&cart))
        .await
        .unwrap();

    assert_eq!(order.total_amount.cents(), 1897);
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.payment_status, PaymentStatus::Pending);
    assert_eq!(order.owner, customer.user_id);

    // Persistence confirmed — only now is the cart cleared.
    cart.clear();
    assert!(cart.is_empty());

    let mine = fx.service.orders_for(&customer).await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].id, order.id);
}

#[tokio::test]
async fn unresolvable_product_aborts_whole_submission() {
    let fx = setup().await;
    let customer = Caller::customer(UserId::new());

    let mut cart = Cart::new();
    cart.add_item(&fx.muffins, 1);
    cart.add_item(&fx.tiramisu, 1);

    // The product disappears between cart and submission.
    fx.catalog.remove(fx.tiramisu.id).await;

    let err = fx
        .service
        .place_order(&customer, submission_from(&cart))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::InvalidLineItem(id) if id == fx.tiramisu.id));

    // Nothing persisted.
    assert!(fx.service.orders_for(&customer).await.unwrap().is_empty());
}

#[tokio::test]
async fn snapshots_survive_product_deletion() {
    let fx = setup().await;
    let customer = Caller::customer(UserId::new());

    let mut cart = Cart::new();
    cart.add_item(&fx.muffins, 2);
    let order = fx
        .service
        .place_order(&customer, submission_from(&cart))
        .await
        .unwrap();

    fx.catalog.remove(fx.muffins.id).await;

    let reloaded = fx.store.find_by_id(order.id).await.unwrap().unwrap();
    assert_eq!(reloaded.items[0].product_name, "Blueberry Muffins");
    assert_eq!(reloaded.items[0].unit_price.cents(), 499);
    assert_eq!(reloaded.total_amount.cents(), 998);
}

#[tokio::test]
async fn storage_outage_surfaces_as_retryable_failure() {
    let fx = setup().await;
    let failing = StubOrderStore {
        fail_create: true,
        ..StubOrderStore::default()
    };
    let service = OrderService::new(failing, fx.catalog.clone());
    let customer = Caller::customer(UserId::new());

    let mut cart = Cart::new();
    cart.add_item(&fx.muffins, 1);

    let err = service
        .place_order(&customer, submission_from(&cart))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Storage(_)));

    // The cart is untouched; the caller may retry.
    assert_eq!(cart.item_count(), 1);
}

#[tokio::test]
async fn full_fulfillment_path() {
    let fx = setup().await;
    let customer = Caller::customer(UserId::new());
    let admin = Caller::admin(UserId::new());

    let mut cart = Cart::new();
    cart.add_item(&fx.muffins, 1);
    let order = fx
        .service
        .place_order(&customer, submission_from(&cart))
        .await
        .unwrap();

    for next in [
        OrderStatus::Confirmed,
        OrderStatus::Preparing,
        OrderStatus::OutForDelivery,
        OrderStatus::Delivered,
    ] {
        let updated = fx
            .service
            .update_status(&admin, order.id, next)
            .await
            .unwrap();
        assert_eq!(updated.status, next);
    }

    let final_order = fx.store.find_by_id(order.id).await.unwrap().unwrap();
    assert!(final_order.is_terminal());
    // Only status and updated_at moved.
    assert_eq!(final_order.items, order.items);
    assert_eq!(final_order.total_amount, order.total_amount);
    assert_eq!(final_order.created_at, order.created_at);
}

#[tokio::test]
async fn non_privileged_caller_cannot_mutate_status() {
    let fx = setup().await;
    let customer = Caller::customer(UserId::new());

    let mut cart = Cart::new();
    cart.add_item(&fx.muffins, 1);
    let order = fx
        .service
        .place_order(&customer, submission_from(&cart))
        .await
        .unwrap();

    let err = fx
        .service
        .update_status(&customer, order.id, OrderStatus::Confirmed)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden));

    let unchanged = fx.store.find_by_id(order.id).await.unwrap().unwrap();
    assert_eq!(unchanged.status, OrderStatus::Pending);
}

#[tokio::test]
async fn illegal_transitions_are_rejected() {
    let fx = setup().await;
    let customer = Caller::customer(UserId::new());
    let admin = Caller::admin(UserId::new());

    let mut cart = Cart::new();
    cart.add_item(&fx.muffins, 1);
    let order = fx
        .service
        .place_order(&customer, submission_from(&cart))
        .await
        .unwrap();

    // Skipping confirmation is illegal.
    let err = fx
        .service
        .update_status(&admin, order.id, OrderStatus::Preparing)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::IllegalTransition { .. }));

    // Cancellation is unreachable once out for delivery.
    for next in [
        OrderStatus::Confirmed,
        OrderStatus::Preparing,
        OrderStatus::OutForDelivery,
    ] {
        fx.service.update_status(&admin, order.id, next).await.unwrap();
    }
    let err = fx
        .service
        .update_status(&admin, order.id, OrderStatus::Cancelled)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::IllegalTransition {
            from: OrderStatus::OutForDelivery,
            to: OrderStatus::Cancelled,
        }
    ));
}

#[tokio::test]
async fn same_status_update_is_idempotent() {
    let fx = setup().await;
    let customer = Caller::customer(UserId::new());
    let admin = Caller::admin(UserId::new());

    let mut cart = Cart::new();
    cart.add_item(&fx.muffins, 1);
    let order = fx
        .service
        .place_order(&customer, submission_from(&cart))
        .await
        .unwrap();

    let first = fx
        .service
        .update_status(&admin, order.id, OrderStatus::Pending)
        .await
        .unwrap();
    let second = fx
        .service
        .update_status(&admin, order.id, OrderStatus::Pending)
        .await
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(first.updated_at, order.updated_at);
}

#[tokio::test]
async fn stale_concurrent_update_loses_with_conflict() {
    let fx = setup().await;
    let customer = Caller::customer(UserId::new());
    let admin = Caller::admin(UserId::new());

    let mut cart = Cart::new();
    cart.add_item(&fx.muffins, 1);
    let order = fx
        .service
        .place_order(&customer, submission_from(&cart))
        .await
        .unwrap();

    // First writer wins.
    fx.service
        .update_status(&admin, order.id, OrderStatus::Confirmed)
        .await
        .unwrap();

    // Second writer validated against the stale pending read; its
    // conditional write must fail rather than clobber the transition.
    let err = fx
        .store
        .update_status(order.id, OrderStatus::Pending, OrderStatus::Cancelled)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Conflict));

    let current = fx.store.find_by_id(order.id).await.unwrap().unwrap();
    assert_eq!(current.status, OrderStatus::Confirmed);
}

#[tokio::test]
async fn payment_status_updates_follow_their_own_graph() {
    let fx = setup().await;
    let customer = Caller::customer(UserId::new());
    let admin = Caller::admin(UserId::new());

    let mut cart = Cart::new();
    cart.add_item(&fx.muffins, 1);
    let order = fx
        .service
        .place_order(&customer, submission_from(&cart))
        .await
        .unwrap();

    let updated = fx
        .service
        .update_payment_status(&admin, order.id, PaymentStatus::Completed)
        .await
        .unwrap();
    assert_eq!(updated.payment_status, PaymentStatus::Completed);
    // Fulfillment status untouched.
    assert_eq!(updated.status, OrderStatus::Pending);

    let err = fx
        .service
        .update_payment_status(&admin, order.id, PaymentStatus::Failed)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::IllegalPaymentTransition { .. }));
}

#[tokio::test]
async fn combined_update_applies_both_fields() {
    let fx = setup().await;
    let customer = Caller::customer(UserId::new());
    let admin = Caller::admin(UserId::new());

    let mut cart = Cart::new();
    cart.add_item(&fx.muffins, 1);
    let order = fx
        .service
        .place_order(&customer, submission_from(&cart))
        .await
        .unwrap();

    let updated = fx
        .service
        .update_status_fields(
            &admin,
            order.id,
            Some(OrderStatus::Confirmed),
            Some(PaymentStatus::Completed),
        )
        .await
        .unwrap();
    assert_eq!(updated.status, OrderStatus::Confirmed);
    assert_eq!(updated.payment_status, PaymentStatus::Completed);
}

#[tokio::test]
async fn combined_update_with_illegal_leg_writes_nothing() {
    let fx = setup().await;
    let customer = Caller::customer(UserId::new());
    let admin = Caller::admin(UserId::new());

    let mut cart = Cart::new();
    cart.add_item(&fx.muffins, 1);
    let order = fx
        .service
        .place_order(&customer, submission_from(&cart))
        .await
        .unwrap();

    fx.service
        .update_payment_status(&admin, order.id, PaymentStatus::Completed)
        .await
        .unwrap();

    // The status leg is legal on its own, but the payment leg is not.
    // The whole request must be rejected before either write.
    let err = fx
        .service
        .update_status_fields(
            &admin,
            order.id,
            Some(OrderStatus::Confirmed),
            Some(PaymentStatus::Failed),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::IllegalPaymentTransition { .. }));

    let current = fx.store.find_by_id(order.id).await.unwrap().unwrap();
    assert_eq!(current.status, OrderStatus::Pending);
    assert_eq!(current.payment_status, PaymentStatus::Completed);
}

#[tokio::test]
async fn unknown_order_is_not_found() {
    let fx = setup().await;
    let admin = Caller::admin(UserId::new());

    let err = fx
        .service
        .update_status(&admin, OrderId::new(), OrderStatus::Confirmed)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound(_)));
}

#[tokio::test]
async fn all_orders_requires_privilege_and_sorts_newest_first() {
    let fx = setup().await;
    let alice = Caller::customer(UserId::new());
    let bob = Caller::customer(UserId::new());
    let admin = Caller::admin(UserId::new());

    for caller in [&alice, &bob] {
        let mut cart = Cart::new();
        cart.add_item(&fx.muffins, 1);
        fx.service
            .place_order(caller, submission_from(&cart))
            .await
            .unwrap();
    }

    let err = fx.service.all_orders(&alice).await.unwrap_err();
    assert!(matches!(err, DomainError::Forbidden));

    let all = fx.service.all_orders(&admin).await.unwrap();
    assert_eq!(all.len(), 2);
    // Newest first: Bob ordered after Alice.
    assert_eq!(all[0].owner, bob.user_id);
    assert_eq!(all[1].owner, alice.user_id);
}
