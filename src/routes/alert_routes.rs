use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::alert_controller::AlertController;
use crate::dto::alert_dto::{
    AlertResponse, AssignAlertRequest, DeactivateAlertRequest, ScanSummaryResponse,
    UnreadCountResponse,
};
use crate::dto::order_dto::ApiResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_alert_router() -> Router<AppState> {
    Router::new()
        .route("/active", get(list_active))
        .route("/unread", get(list_unread))
        .route("/critical", get(list_critical))
        .route("/unread/count", get(count_unread))
        .route("/assigned/:user_id", get(list_assigned))
        .route("/:id/read", post(mark_as_read))
        .route("/:id/deactivate", post(deactivate))
        .route("/:id/assign", post(assign))
        .route("/:id/unassign", post(unassign))
        .route("/scan", post(trigger_scan))
}

async fn list_active(
    State(state): State<AppState>,
) -> Result<Json<Vec<AlertResponse>>, AppError> {
    let controller = AlertController::new(state.pool.clone());
    let response = controller.list_active().await?;
    Ok(Json(response))
}

async fn list_unread(
    State(state): State<AppState>,
) -> Result<Json<Vec<AlertResponse>>, AppError> {
    let controller = AlertController::new(state.pool.clone());
    let response = controller.list_unread().await?;
    Ok(Json(response))
}

async fn list_critical(
    State(state): State<AppState>,
) -> Result<Json<Vec<AlertResponse>>, AppError> {
    let controller = AlertController::new(state.pool.clone());
    let response = controller.list_critical().await?;
    Ok(Json(response))
}

async fn count_unread(
    State(state): State<AppState>,
) -> Result<Json<UnreadCountResponse>, AppError> {
    let controller = AlertController::new(state.pool.clone());
    let response = controller.count_unread().await?;
    Ok(Json(response))
}

async fn list_assigned(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<AlertResponse>>, AppError> {
    let controller = AlertController::new(state.pool.clone());
    let response = controller.list_assigned_to(user_id).await?;
    Ok(Json(response))
}

async fn mark_as_read(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<AlertResponse>>, AppError> {
    let controller = AlertController::new(state.pool.clone());
    let response = controller.mark_as_read(id).await?;
    Ok(Json(response))
}

async fn deactivate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<DeactivateAlertRequest>,
) -> Result<Json<ApiResponse<AlertResponse>>, AppError> {
    let controller = AlertController::new(state.pool.clone());
    let response = controller.deactivate(id, request.acting_user_id).await?;
    Ok(Json(response))
}

async fn assign(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AssignAlertRequest>,
) -> Result<Json<ApiResponse<AlertResponse>>, AppError> {
    let controller = AlertController::new(state.pool.clone());
    let response = controller.assign(id, request.user_id).await?;
    Ok(Json(response))
}

async fn unassign(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<AlertResponse>>, AppError> {
    let controller = AlertController::new(state.pool.clone());
    let response = controller.unassign(id).await?;
    Ok(Json(response))
}

/// Trigger manual del escaneo; devuelve Conflict si ya hay uno en curso
async fn trigger_scan(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ScanSummaryResponse>>, AppError> {
    let summary = state.alert_scan.run_scan().await?;
    Ok(Json(ApiResponse::success_with_message(
        summary,
        "Escaneo de alertas completado".to_string(),
    )))
}
