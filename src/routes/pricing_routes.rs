//! Rutas de pricing

use axum::{
    extract::{Path, State},
    routing::{post, put},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::pricing_controller::PricingController;
use crate::dto::pricing_dto::{CreatePricingRequest, RecalculateRequest, UpdatePricingRequest};
use crate::middleware::auth::AuthUser;
use crate::models::pricing::PricingPolicy;
use crate::services::pricing_service::PricingUpdate;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_pricing_router() -> Router<AppState> {
    Router::new()
        .route("/recalculate", post(recalculate))
        .route("/", post(create_policy))
        .route("/:id", put(update_policy))
}

async fn recalculate(
    State(state): State<AppState>,
    Json(request): Json<RecalculateRequest>,
) -> Result<Json<PricingUpdate>, AppError> {
    let controller = PricingController::new(&state);
    Ok(Json(controller.recalculate(request).await?))
}

async fn create_policy(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<CreatePricingRequest>,
) -> Result<Json<PricingPolicy>, AppError> {
    user.require_admin()?;
    let controller = PricingController::new(&state);
    Ok(Json(controller.create_policy(request).await?))
}

async fn update_policy(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdatePricingRequest>,
) -> Result<Json<PricingPolicy>, AppError> {
    user.require_admin()?;
    let controller = PricingController::new(&state);
    Ok(Json(controller.update_policy(id, request).await?))
}
