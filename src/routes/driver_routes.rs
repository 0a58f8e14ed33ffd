//! Rutas del driver (self-service y documentos)

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde_json::json;
use uuid::Uuid;

use crate::controllers::driver_controller::DriverController;
use crate::dto::driver_dto::{
    AvailabilityResponse, CanAcceptBookingsResponse, RatePassengerRequest, RatePassengerResponse,
    UpdateMyProfileRequest, UploadDocumentsResponse, UploadedFileMeta,
};
use crate::middleware::auth::AuthUser;
use crate::models::driver::Driver;
use crate::services::driver_status_service::DocumentUpload;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_driver_router() -> Router<AppState> {
    Router::new()
        .route("/profile/me", get(get_my_profile))
        .route("/profile/me", put(update_my_profile))
        .route("/profile/me/toggle-availability", post(toggle_my_availability))
        .route("/booking-eligibility", get(check_booking_eligibility))
        .route("/passengers/:id/rate", post(rate_passenger))
        .route("/:id/upload-documents", post(upload_documents))
}

async fn rate_passenger(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
    Json(request): Json<RatePassengerRequest>,
) -> Result<Json<RatePassengerResponse>, AppError> {
    let controller = DriverController::new(&state);
    let passenger = controller.rate_passenger(&user, id, request.rating).await?;
    Ok(Json(RatePassengerResponse {
        message: "Passenger rated successfully".to_string(),
        passenger,
        rating: request.rating,
        comment: request.comment,
    }))
}

async fn get_my_profile(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Driver>, AppError> {
    let controller = DriverController::new(&state);
    Ok(Json(controller.get_my_profile(&user).await?))
}

async fn update_my_profile(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<UpdateMyProfileRequest>,
) -> Result<Json<Driver>, AppError> {
    let controller = DriverController::new(&state);
    Ok(Json(controller.update_my_profile(&user, request).await?))
}

async fn toggle_my_availability(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<AvailabilityResponse>, AppError> {
    let controller = DriverController::new(&state);
    Ok(Json(controller.toggle_my_availability(&user).await?))
}

async fn check_booking_eligibility(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Response, AppError> {
    let controller = DriverController::new(&state);
    let result = controller.check_booking_eligibility(&user).await?;

    if result.eligible {
        return Ok(Json(CanAcceptBookingsResponse {
            can_accept_bookings: true,
            status: result.status,
            driver_status: result.driver_status,
        })
        .into_response());
    }

    Ok((
        StatusCode::FORBIDDEN,
        Json(json!({
            "message": result.reason,
            "status": result.status,
            "driverStatus": result.driver_status,
            "missing": result.missing,
        })),
    )
        .into_response())
}

async fn upload_documents(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i64>,
    mut multipart: Multipart,
) -> Result<Json<UploadDocumentsResponse>, AppError> {
    let uploads_dir = state.config.uploads_dir.clone();
    tokio::fs::create_dir_all(&uploads_dir)
        .await
        .map_err(|e| AppError::Internal(format!("Error creating uploads dir: {}", e)))?;

    let mut upload = DocumentUpload::default();
    let mut files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart payload: {}", e)))?
    {
        let Some(name) = field.name().map(|s| s.to_string()) else {
            continue;
        };
        let original_name = field.file_name().map(|s| s.to_string()).unwrap_or_default();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Invalid multipart payload: {}", e)))?;
        if data.is_empty() {
            continue;
        }

        let slot = match name.as_str() {
            "nationalId" => &mut upload.national_id_file,
            "vehicleRegistration" => &mut upload.vehicle_registration_file,
            "insurance" => &mut upload.insurance_file,
            "document" => &mut upload.document,
            "license" => &mut upload.driving_license_file,
            _ => continue,
        };

        let extension = std::path::Path::new(&original_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e))
            .unwrap_or_default();
        let filename = format!("{}{}", Uuid::new_v4(), extension);
        let path = format!("{}/{}", uploads_dir, filename);

        tokio::fs::write(&path, &data)
            .await
            .map_err(|e| AppError::Internal(format!("Error storing uploaded file: {}", e)))?;

        *slot = Some(filename.clone());
        files.push(UploadedFileMeta { field: name, filename, path });
    }

    let controller = DriverController::new(&state);
    Ok(Json(controller.upload_documents(id, upload, files).await?))
}
