use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use crate::catalog::CatalogStore;

use super::order::OrderId;
use super::repository::OrderRepository;
use super::service::{OrderRequest, OrderService, OrderServiceError};

/// Router builder exposing the catalog read path and the order lifecycle
/// endpoints.
pub fn order_router<R, C>(service: Arc<OrderService<R, C>>) -> Router
where
    R: OrderRepository + 'static,
    C: CatalogStore + 'static,
{
    Router::new()
        .route("/api/v1/catalog", get(catalog_handler::<R, C>))
        .route("/api/v1/orders", post(create_order_handler::<R, C>))
        .route("/api/v1/orders/:order_id", get(get_order_handler::<R, C>))
        .route(
            "/api/v1/orders/:order_id/status",
            put(update_status_handler::<R, C>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct CatalogQuery {
    pub(crate) category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatusUpdateRequest {
    /// Raw status name; validated by the service, not by serde, so an
    /// unrecognized value surfaces as `invalid_transition`.
    pub(crate) status: String,
}

pub(crate) async fn catalog_handler<R, C>(
    State(service): State<Arc<OrderService<R, C>>>,
    Query(query): Query<CatalogQuery>,
) -> Response
where
    R: OrderRepository + 'static,
    C: CatalogStore + 'static,
{
    match service.catalog_snapshot(query.category.as_deref()) {
        Ok(snapshot) => (StatusCode::OK, axum::Json(snapshot)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn create_order_handler<R, C>(
    State(service): State<Arc<OrderService<R, C>>>,
    axum::Json(request): axum::Json<OrderRequest>,
) -> Response
where
    R: OrderRepository + 'static,
    C: CatalogStore + 'static,
{
    match service.place_order(request) {
        Ok(order) => (StatusCode::CREATED, axum::Json(order)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn get_order_handler<R, C>(
    State(service): State<Arc<OrderService<R, C>>>,
    Path(order_id): Path<String>,
) -> Response
where
    R: OrderRepository + 'static,
    C: CatalogStore + 'static,
{
    match service.get(&OrderId(order_id)) {
        Ok(order) => (StatusCode::OK, axum::Json(order)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn update_status_handler<R, C>(
    State(service): State<Arc<OrderService<R, C>>>,
    Path(order_id): Path<String>,
    axum::Json(request): axum::Json<StatusUpdateRequest>,
) -> Response
where
    R: OrderRepository + 'static,
    C: CatalogStore + 'static,
{
    match service.transition(&OrderId(order_id), &request.status) {
        Ok(order) => (StatusCode::OK, axum::Json(order)).into_response(),
        Err(error) => error_response(error),
    }
}

/// Map a service error onto a status code and a machine-distinguishable
/// JSON body: `{"kind": ..., "error": ...}`.
pub(crate) fn error_response(error: OrderServiceError) -> Response {
    let kind = error.kind();
    let status = status_for_kind(kind);
    let payload = json!({
        "kind": kind,
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}

pub(crate) fn status_for_kind(kind: &str) -> StatusCode {
    match kind {
        "invalid_selection" | "incomplete_selection" | "invalid_quantity" | "empty_cart"
        | "missing_required_field" => StatusCode::UNPROCESSABLE_ENTITY,
        "unknown_order" => StatusCode::NOT_FOUND,
        "invalid_transition" => StatusCode::CONFLICT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
