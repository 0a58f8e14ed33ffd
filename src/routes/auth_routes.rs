//! Rutas de autenticación por teléfono

use axum::{extract::State, routing::post, Json, Router};

use crate::controllers::phone_auth_controller::PhoneAuthController;
use crate::dto::auth_dto::{
    RequestOtpRequest, RequestOtpResponse, VerifyOtpRequest, VerifyOtpResponse,
};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/request-otp", post(request_otp))
        .route("/verify-otp", post(verify_otp))
}

async fn request_otp(
    State(state): State<AppState>,
    Json(request): Json<RequestOtpRequest>,
) -> Result<Json<RequestOtpResponse>, AppError> {
    let controller = PhoneAuthController::new(&state);
    let response = controller.request_otp(&request.phone).await?;
    Ok(Json(response))
}

async fn verify_otp(
    State(state): State<AppState>,
    Json(request): Json<VerifyOtpRequest>,
) -> Result<Json<VerifyOtpResponse>, AppError> {
    let controller = PhoneAuthController::new(&state);
    let response = controller.verify_otp(&request.phone, &request.otp).await?;
    Ok(Json(response))
}
