//! Public catalog browsing and privileged product creation.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use domain::store::{OrderStore, ProductCatalog};
use domain::{Category, Money, Product};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::AuthenticatedCaller;
use crate::error::ApiError;
use crate::routes::orders::AppState;

#[derive(Debug, Deserialize)]
pub struct ProductQuery {
    pub category: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub name: String,
    pub category: String,
    pub price_cents: i64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub weight: String,
    #[serde(default)]
    pub contains: Vec<String>,
    #[serde(default)]
    pub ingredients: Vec<String>,
}

/// GET /products — available products, optionally filtered by category.
///
/// `all` or an absent parameter disables the filter. The filter matches
/// the canonical lowercase names exactly; an unknown value yields an
/// empty list rather than an error.
#[tracing::instrument(skip(state))]
pub async fn list<S: OrderStore, C: ProductCatalog>(
    State(state): State<Arc<AppState<S, C>>>,
    Query(query): Query<ProductQuery>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let filter = match query.category.as_deref() {
        None | Some("all") => None,
        Some(raw) => match Category::from_exact(raw) {
            Some(category) => Some(category),
            None => return Ok(Json(Vec::new())),
        },
    };

    let products = state.order_service.browse_products(filter).await?;
    Ok(Json(products))
}

/// GET /products/:id — one product, or 404.
#[tracing::instrument(skip(state))]
pub async fn get<S: OrderStore, C: ProductCatalog>(
    State(state): State<Arc<AppState<S, C>>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Product>, ApiError> {
    let product = state
        .order_service
        .product(id.into())
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("product {id} not found")))?;
    Ok(Json(product))
}

/// POST /products — add a catalog product. Privileged callers only.
#[tracing::instrument(skip(state, req), fields(caller = %caller.user_id))]
pub async fn create<S: OrderStore, C: ProductCatalog>(
    State(state): State<Arc<AppState<S, C>>>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
    Json(req): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    // Casing is normalized at this boundary; the core only sees the
    // canonical lowercase categories.
    let category = Category::parse(&req.category)
        .ok_or_else(|| ApiError::BadRequest(format!("unknown category: {}", req.category)))?;
    if req.price_cents < 0 {
        return Err(ApiError::BadRequest("price must not be negative".to_string()));
    }

    let product = Product::new(req.name, category, Money::from_cents(req.price_cents))
        .with_description(req.description)
        .with_image(req.image)
        .with_details(req.weight, req.contains, req.ingredients);

    let stored = state.order_service.add_product(&caller, product).await?;
    Ok((StatusCode::CREATED, Json(stored)))
}
