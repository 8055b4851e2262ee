use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, post, put},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::order_controller::OrderController;
use crate::dto::assignment_dto::AssignmentHistoryResponse;
use crate::dto::order_dto::{
    ApiResponse, AssignResourceRequest, CreateOrderRequest, OrderFilters, OrderResponse,
    QuoteActionRequest, UpdateOrderRequest,
};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_order_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_order))
        .route("/", get(list_orders))
        .route("/search", get(search_orders))
        .route("/:id", get(get_order))
        .route("/:id", put(update_order))
        .route("/:id", delete(delete_order))
        .route("/:id/assign", post(assign_resource))
        .route("/:id/approve-quote", post(approve_quote))
        .route("/:id/cancel-quote", post(cancel_quote))
        .route("/:id/history", get(order_history))
        .route("/:id/history/:resource_type", get(order_history_by_type))
}

async fn create_order(
    State(state): State<AppState>,
    Json(request): Json<CreateOrderRequest>,
) -> Result<Json<ApiResponse<OrderResponse>>, AppError> {
    let controller = OrderController::new(state.pool.clone());
    let response = controller.create(request).await?;
    Ok(Json(response))
}

async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<OrderResponse>, AppError> {
    let controller = OrderController::new(state.pool.clone());
    let response = controller.get_by_id(id).await?;
    Ok(Json(response))
}

async fn list_orders(
    State(state): State<AppState>,
) -> Result<Json<Vec<OrderResponse>>, AppError> {
    let controller = OrderController::new(state.pool.clone());
    let response = controller.list().await?;
    Ok(Json(response))
}

async fn search_orders(
    State(state): State<AppState>,
    Query(filters): Query<OrderFilters>,
) -> Result<Json<Vec<OrderResponse>>, AppError> {
    let controller = OrderController::new(state.pool.clone());
    let response = controller.search(filters).await?;
    Ok(Json(response))
}

async fn update_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateOrderRequest>,
) -> Result<Json<ApiResponse<OrderResponse>>, AppError> {
    let controller = OrderController::new(state.pool.clone());
    let response = controller.update(id, request).await?;
    Ok(Json(response))
}

async fn delete_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let controller = OrderController::new(state.pool.clone());
    controller.delete(id).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Orden eliminada exitosamente"
    })))
}

async fn assign_resource(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AssignResourceRequest>,
) -> Result<Json<ApiResponse<OrderResponse>>, AppError> {
    let controller = OrderController::new(state.pool.clone());
    let response = controller.assign_resource(id, request).await?;
    Ok(Json(response))
}

async fn approve_quote(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<QuoteActionRequest>,
) -> Result<Json<ApiResponse<OrderResponse>>, AppError> {
    let controller = OrderController::new(state.pool.clone());
    let response = controller.approve_quote(id, request).await?;
    Ok(Json(response))
}

async fn cancel_quote(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<QuoteActionRequest>,
) -> Result<Json<ApiResponse<OrderResponse>>, AppError> {
    let controller = OrderController::new(state.pool.clone());
    let response = controller.cancel_quote(id, request).await?;
    Ok(Json(response))
}

async fn order_history(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<AssignmentHistoryResponse>>, AppError> {
    let controller = OrderController::new(state.pool.clone());
    let response = controller.history(id).await?;
    Ok(Json(response))
}

async fn order_history_by_type(
    State(state): State<AppState>,
    Path((id, resource_type)): Path<(Uuid, String)>,
) -> Result<Json<Vec<AssignmentHistoryResponse>>, AppError> {
    let controller = OrderController::new(state.pool.clone());
    let response = controller.history_by_type(id, &resource_type).await?;
    Ok(Json(response))
}
