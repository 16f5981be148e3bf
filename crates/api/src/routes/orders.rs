//! Order submission, listing, and status update endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use domain::store::{OrderStore, ProductCatalog};
use domain::{
    LineInput, Order, OrderService, OrderStatus, OrderSubmission, PaymentMethod, PaymentStatus,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::AuthenticatedCaller;
use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState<S, C> {
    pub order_service: OrderService<S, C>,
}

// -- Request types --

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub items: Vec<OrderItemRequest>,
    pub delivery_address: String,
    pub phone: String,
    pub payment_method: PaymentMethod,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRequest {
    pub product_id: Uuid,
    pub quantity: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderRequest {
    pub status: Option<OrderStatus>,
    pub payment_status: Option<PaymentStatus>,
}

// -- Handlers --

/// POST /orders — submit a cart as a new order.
#[tracing::instrument(skip(state, req), fields(caller = %caller.user_id))]
pub async fn create<S: OrderStore, C: ProductCatalog>(
    State(state): State<Arc<AppState<S, C>>>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
    Json(req): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<Order>), ApiError> {
    let submission = OrderSubmission {
        lines: req
            .items
            .iter()
            .map(|item| LineInput {
                product_id: item.product_id.into(),
                quantity: item.quantity,
            })
            .collect(),
        delivery_address: req.delivery_address,
        phone: req.phone,
        payment_method: req.payment_method,
    };

    let order = state.order_service.place_order(&caller, submission).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// GET /orders/mine — the caller's orders, newest first.
#[tracing::instrument(skip(state), fields(caller = %caller.user_id))]
pub async fn mine<S: OrderStore, C: ProductCatalog>(
    State(state): State<Arc<AppState<S, C>>>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
) -> Result<Json<Vec<Order>>, ApiError> {
    let orders = state.order_service.orders_for(&caller).await?;
    Ok(Json(orders))
}

/// GET /orders — all orders, newest first. Privileged callers only.
#[tracing::instrument(skip(state), fields(caller = %caller.user_id))]
pub async fn list<S: OrderStore, C: ProductCatalog>(
    State(state): State<Arc<AppState<S, C>>>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
) -> Result<Json<Vec<Order>>, ApiError> {
    let orders = state.order_service.all_orders(&caller).await?;
    Ok(Json(orders))
}

/// PUT /orders/:id — move an order's status and/or payment status.
/// Privileged callers only.
#[tracing::instrument(skip(state, req), fields(caller = %caller.user_id))]
pub async fn update<S: OrderStore, C: ProductCatalog>(
    State(state): State<Arc<AppState<S, C>>>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateOrderRequest>,
) -> Result<Json<Order>, ApiError> {
    let id = common::OrderId::from_uuid(id);

    if req.status.is_none() && req.payment_status.is_none() {
        return Err(ApiError::BadRequest(
            "either status or paymentStatus is required".to_string(),
        ));
    }

    let order = state
        .order_service
        .update_status_fields(&caller, id, req.status, req.payment_status)
        .await?;
    Ok(Json(order))
}
