use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{OrderId, ProductId, UserId};
use domain::store::Result;
use domain::{
    Category, Money, Order, OrderStatus, OrderStore, PaymentMethod, PaymentStatus, Product,
    ProductCatalog, StoreError,
};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

const ORDER_COLUMNS: &str = "id, owner_id, items, total_cents, delivery_address, phone, \
     payment_method, status, payment_status, created_at, updated_at";

const PRODUCT_COLUMNS: &str = "id, name, category, price_cents, description, image, available, \
     weight, contains, ingredients, created_at, updated_at";

fn db_err(e: sqlx::Error) -> StoreError {
    StoreError::Backend(e.to_string())
}

fn parse_err(field: &str, value: &str) -> StoreError {
    StoreError::Backend(format!("unrecognized {field} value in row: {value}"))
}

/// PostgreSQL-backed order store.
#[derive(Clone)]
pub struct PostgresOrderStore {
    pool: PgPool,
}

impl PostgresOrderStore {
    /// Creates a new PostgreSQL order store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }

    fn row_to_order(row: PgRow) -> Result<Order> {
        let items_json: serde_json::Value = row.try_get("items").map_err(db_err)?;
        let status_str: String = row.try_get("status").map_err(db_err)?;
        let payment_status_str: String = row.try_get("payment_status").map_err(db_err)?;
        let payment_method_str: String = row.try_get("payment_method").map_err(db_err)?;

        Ok(Order {
            id: OrderId::from_uuid(row.try_get::<Uuid, _>("id").map_err(db_err)?),
            owner: UserId::from_uuid(row.try_get::<Uuid, _>("owner_id").map_err(db_err)?),
            items: serde_json::from_value(items_json)?,
            total_amount: Money::from_cents(row.try_get("total_cents").map_err(db_err)?),
            delivery_address: row.try_get("delivery_address").map_err(db_err)?,
            phone: row.try_get("phone").map_err(db_err)?,
            payment_method: PaymentMethod::parse(&payment_method_str)
                .ok_or_else(|| parse_err("payment_method", &payment_method_str))?,
            status: OrderStatus::parse(&status_str)
                .ok_or_else(|| parse_err("status", &status_str))?,
            payment_status: PaymentStatus::parse(&payment_status_str)
                .ok_or_else(|| parse_err("payment_status", &payment_status_str))?,
            created_at: row.try_get("created_at").map_err(db_err)?,
            updated_at: row.try_get("updated_at").map_err(db_err)?,
        })
    }
}

#[async_trait]
impl OrderStore for PostgresOrderStore {
    async fn create(&self, order: Order) -> Result<Order> {
        let items = serde_json::to_value(&order.items)?;

        sqlx::query(
            "INSERT INTO orders (id, owner_id, items, total_cents, delivery_address, phone, \
             payment_method, status, payment_status, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
        )
        .bind(order.id.as_uuid())
        .bind(order.owner.as_uuid())
        .bind(items)
        .bind(order.total_amount.cents())
        .bind(&order.delivery_address)
        .bind(&order.phone)
        .bind(order.payment_method.as_str())
        .bind(order.status.as_str())
        .bind(order.payment_status.as_str())
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        tracing::debug!(order_id = %order.id, "order inserted");
        Ok(order)
    }

    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>> {
        let row = sqlx::query(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.map(Self::row_to_order).transpose()
    }

    async fn find_by_owner(&self, owner: UserId) -> Result<Vec<Order>> {
        let rows = sqlx::query(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE owner_id = $1 ORDER BY created_at DESC"
        ))
        .bind(owner.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.into_iter().map(Self::row_to_order).collect()
    }

    async fn find_all(&self) -> Result<Vec<Order>> {
        let rows = sqlx::query(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.into_iter().map(Self::row_to_order).collect()
    }

    async fn update_status(
        &self,
        id: OrderId,
        expected: OrderStatus,
        new_status: OrderStatus,
    ) -> Result<Order> {
        // The WHERE clause carries the optimistic-concurrency guard: the
        // write only lands if the status is still the one read earlier.
        let row = sqlx::query(&format!(
            "UPDATE orders SET status = $3, updated_at = NOW() \
             WHERE id = $1 AND status = $2 RETURNING {ORDER_COLUMNS}"
        ))
        .bind(id.as_uuid())
        .bind(expected.as_str())
        .bind(new_status.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        match row {
            Some(row) => Self::row_to_order(row),
            None => Err(self.missed_update_error(id).await?),
        }
    }

    async fn update_payment_status(
        &self,
        id: OrderId,
        expected: PaymentStatus,
        new_status: PaymentStatus,
    ) -> Result<Order> {
        let row = sqlx::query(&format!(
            "UPDATE orders SET payment_status = $3, updated_at = NOW() \
             WHERE id = $1 AND payment_status = $2 RETURNING {ORDER_COLUMNS}"
        ))
        .bind(id.as_uuid())
        .bind(expected.as_str())
        .bind(new_status.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        match row {
            Some(row) => Self::row_to_order(row),
            None => Err(self.missed_update_error(id).await?),
        }
    }
}

impl PostgresOrderStore {
    /// Distinguishes a missing row from a lost conditional write.
    async fn missed_update_error(&self, id: OrderId) -> Result<StoreError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM orders WHERE id = $1)")
            .bind(id.as_uuid())
            .fetch_one(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(if exists {
            StoreError::Conflict
        } else {
            StoreError::NotFound
        })
    }
}

/// PostgreSQL-backed product catalog.
#[derive(Clone)]
pub struct PostgresCatalog {
    pool: PgPool,
}

impl PostgresCatalog {
    /// Creates a new PostgreSQL product catalog.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_product(row: PgRow) -> Result<Product> {
        let category_str: String = row.try_get("category").map_err(db_err)?;
        let contains: serde_json::Value = row.try_get("contains").map_err(db_err)?;
        let ingredients: serde_json::Value = row.try_get("ingredients").map_err(db_err)?;

        Ok(Product {
            id: ProductId::from_uuid(row.try_get::<Uuid, _>("id").map_err(db_err)?),
            name: row.try_get("name").map_err(db_err)?,
            // Legacy rows may carry mixed casing; normalize here so the
            // core only ever sees canonical categories.
            category: Category::parse(&category_str)
                .ok_or_else(|| parse_err("category", &category_str))?,
            price: Money::from_cents(row.try_get("price_cents").map_err(db_err)?),
            description: row.try_get("description").map_err(db_err)?,
            image: row.try_get("image").map_err(db_err)?,
            available: row.try_get("available").map_err(db_err)?,
            weight: row.try_get("weight").map_err(db_err)?,
            contains: serde_json::from_value(contains)?,
            ingredients: serde_json::from_value(ingredients)?,
            created_at: row.try_get::<DateTime<Utc>, _>("created_at").map_err(db_err)?,
            updated_at: row.try_get::<DateTime<Utc>, _>("updated_at").map_err(db_err)?,
        })
    }
}

#[async_trait]
impl ProductCatalog for PostgresCatalog {
    async fn create(&self, product: Product) -> Result<Product> {
        sqlx::query(
            "INSERT INTO products (id, name, category, price_cents, description, image, \
             available, weight, contains, ingredients, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)",
        )
        .bind(product.id.as_uuid())
        .bind(&product.name)
        .bind(product.category.as_str())
        .bind(product.price.cents())
        .bind(&product.description)
        .bind(&product.image)
        .bind(product.available)
        .bind(&product.weight)
        .bind(serde_json::to_value(&product.contains)?)
        .bind(serde_json::to_value(&product.ingredients)?)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(product)
    }

    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>> {
        let row = sqlx::query(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.map(Self::row_to_product).transpose()
    }

    async fn find_available(&self, category: Option<Category>) -> Result<Vec<Product>> {
        let rows = sqlx::query(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE available AND ($1::text IS NULL OR category = $1) \
             ORDER BY created_at DESC"
        ))
        .bind(category.map(|c| c.as_str()))
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.into_iter().map(Self::row_to_product).collect()
    }

    async fn count(&self) -> Result<usize> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(count as usize)
    }
}
