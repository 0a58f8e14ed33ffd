//! Rutas de administración de drivers y passengers

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};

use crate::controllers::admin_controller::AdminController;
use crate::dto::admin_dto::{
    AwardPointsRequest, CreatePassengerRequest, CreatePassengerResponse, DriverPointsResponse,
    PassengerPointsResponse, UpdateDriverStatusRequest, UpdateDriverStatusResponse,
};
use crate::middleware::auth::AuthUser;
use crate::models::driver::Driver;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_admin_router() -> Router<AppState> {
    Router::new()
        .route("/drivers/pending-documents", get(pending_driver_documents))
        .route("/drivers/:id/approve", post(approve_driver))
        .route("/drivers/:id/approve-documents", post(approve_driver_documents))
        .route("/drivers/:id/reject-documents", post(reject_driver_documents))
        .route("/drivers/:id/status", post(update_driver_status))
        .route("/drivers/:id/points", post(award_driver_points))
        .route("/passengers", post(create_passenger))
        .route("/passengers/:id/points", post(award_passenger_points))
}

async fn approve_driver(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Driver>, AppError> {
    user.require_admin()?;
    let controller = AdminController::new(&state);
    Ok(Json(controller.approve_driver(id).await?))
}

async fn approve_driver_documents(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Driver>, AppError> {
    user.require_admin()?;
    let controller = AdminController::new(&state);
    Ok(Json(controller.approve_driver_documents(id).await?))
}

async fn reject_driver_documents(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Driver>, AppError> {
    user.require_admin()?;
    let controller = AdminController::new(&state);
    Ok(Json(controller.reject_driver_documents(id).await?))
}

async fn update_driver_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
    Json(request): Json<UpdateDriverStatusRequest>,
) -> Result<Json<UpdateDriverStatusResponse>, AppError> {
    user.require_admin()?;
    let controller = AdminController::new(&state);
    Ok(Json(controller.update_driver_status(id, request).await?))
}

async fn pending_driver_documents(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<Driver>>, AppError> {
    user.require_admin()?;
    let controller = AdminController::new(&state);
    Ok(Json(controller.pending_driver_documents().await?))
}

async fn award_driver_points(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
    Json(request): Json<AwardPointsRequest>,
) -> Result<Json<DriverPointsResponse>, AppError> {
    user.require_admin()?;
    let controller = AdminController::new(&state);
    Ok(Json(controller.award_driver_points(id, request.points).await?))
}

async fn award_passenger_points(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
    Json(request): Json<AwardPointsRequest>,
) -> Result<Json<PassengerPointsResponse>, AppError> {
    user.require_admin()?;
    let controller = AdminController::new(&state);
    Ok(Json(controller.award_passenger_points(id, request.points).await?))
}

async fn create_passenger(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<CreatePassengerRequest>,
) -> Result<Json<CreatePassengerResponse>, AppError> {
    user.require_admin()?;
    let controller = AdminController::new(&state);
    Ok(Json(controller.create_passenger(request).await?))
}
