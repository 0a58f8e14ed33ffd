//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores del sistema
//! y su conversión a respuestas HTTP apropiadas.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::services::driver_status_service::DriverStatusError;
use crate::services::otp_service::OtpError;
use crate::services::pricing_service::PricingError;

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("JWT error: {0}")]
    Jwt(String),

    #[error("Hash error: {0}")]
    Hash(String),

    #[error(transparent)]
    Otp(#[from] OtpError),

    #[error(transparent)]
    DriverStatus(#[from] DriverStatusError),

    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

impl ErrorResponse {
    fn new(error: &str, message: String, code: &str) -> Self {
        Self {
            error: error.to_string(),
            message,
            details: None,
            code: Some(code.to_string()),
        }
    }

    fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_response) = match self {
            AppError::Database(e) => {
                tracing::error!("❌ Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new(
                        "Database Error",
                        "An error occurred while accessing the database".to_string(),
                        "DB_ERROR",
                    ),
                )
            }

            AppError::Validation(e) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new(
                    "Validation Error",
                    "The provided data is invalid".to_string(),
                    "VALIDATION_ERROR",
                )
                .with_details(json!(e)),
            ),

            AppError::Unauthorized(msg) => (
                StatusCode::UNAUTHORIZED,
                ErrorResponse::new("Unauthorized", msg, "UNAUTHORIZED"),
            ),

            AppError::Forbidden(msg) => (
                StatusCode::FORBIDDEN,
                ErrorResponse::new("Forbidden", msg, "FORBIDDEN"),
            ),

            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorResponse::new("Not Found", msg, "NOT_FOUND"),
            ),

            AppError::Conflict(msg) => (
                StatusCode::CONFLICT,
                ErrorResponse::new("Conflict", msg, "CONFLICT"),
            ),

            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("Bad Request", msg, "BAD_REQUEST"),
            ),

            AppError::Internal(msg) => {
                tracing::error!("❌ Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new(
                        "Internal Server Error",
                        "An unexpected error occurred".to_string(),
                        "INTERNAL_ERROR",
                    ),
                )
            }

            AppError::RateLimitExceeded => (
                StatusCode::TOO_MANY_REQUESTS,
                ErrorResponse::new(
                    "Rate Limit Exceeded",
                    "Too many requests. Please try again later".to_string(),
                    "RATE_LIMIT_EXCEEDED",
                ),
            ),

            AppError::Jwt(msg) => (
                StatusCode::UNAUTHORIZED,
                ErrorResponse::new("JWT Error", msg, "JWT_ERROR"),
            ),

            AppError::Hash(msg) => {
                tracing::error!("❌ Hash error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new(
                        "Hash Error",
                        "An error occurred while processing credentials".to_string(),
                        "HASH_ERROR",
                    ),
                )
            }

            AppError::Otp(e) => otp_error_response(e),
            AppError::DriverStatus(e) => driver_status_error_response(e),
            AppError::Pricing(e) => pricing_error_response(e),
        };

        (status, Json(error_response)).into_response()
    }
}

fn otp_error_response(e: OtpError) -> (StatusCode, ErrorResponse) {
    let message = e.to_string();
    match e {
        OtpError::InvalidPhoneFormat => (
            StatusCode::BAD_REQUEST,
            ErrorResponse::new("Invalid Phone Format", message, "INVALID_PHONE_FORMAT"),
        ),
        OtpError::TooSoon { remaining_seconds } => (
            StatusCode::TOO_MANY_REQUESTS,
            ErrorResponse::new("OTP Cooldown", message, "OTP_COOLDOWN")
                .with_details(json!({ "retryAfterSeconds": remaining_seconds })),
        ),
        OtpError::AccountLocked { remaining_seconds } => (
            StatusCode::TOO_MANY_REQUESTS,
            ErrorResponse::new("Account Locked", message, "ACCOUNT_LOCKED")
                .with_details(json!({ "retryAfterSeconds": remaining_seconds })),
        ),
        OtpError::NoValidCode => (
            StatusCode::BAD_REQUEST,
            ErrorResponse::new("No Valid Code", message, "NO_VALID_CODE"),
        ),
        OtpError::CodeExpired => (
            StatusCode::BAD_REQUEST,
            ErrorResponse::new("Code Expired", message, "OTP_EXPIRED"),
        ),
        OtpError::InvalidCode => (
            StatusCode::BAD_REQUEST,
            ErrorResponse::new("Invalid Code", message, "INVALID_OTP"),
        ),
        OtpError::ReferenceNotFound(_) => (
            StatusCode::NOT_FOUND,
            ErrorResponse::new("Not Found", message, "REFERENCE_NOT_FOUND"),
        ),
        OtpError::MissingPhone(_) => (
            StatusCode::BAD_REQUEST,
            ErrorResponse::new("Bad Request", message, "MISSING_PHONE"),
        ),
        OtpError::Storage(err) => {
            tracing::error!("❌ OTP storage error: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::new(
                    "Database Error",
                    "An error occurred while accessing the database".to_string(),
                    "DB_ERROR",
                ),
            )
        }
    }
}

fn driver_status_error_response(e: DriverStatusError) -> (StatusCode, ErrorResponse) {
    let message = e.to_string();
    match e {
        DriverStatusError::MissingDocuments { missing } => (
            StatusCode::BAD_REQUEST,
            ErrorResponse::new("Missing Documents", message, "MISSING_DOCUMENTS")
                .with_details(json!({ "missing": missing })),
        ),
        DriverStatusError::MissingApprovalFields { missing } => (
            StatusCode::BAD_REQUEST,
            ErrorResponse::new("Missing Documents", message, "MISSING_APPROVAL_FIELDS")
                .with_details(json!({ "missing": missing })),
        ),
        DriverStatusError::InvalidStatus => (
            StatusCode::BAD_REQUEST,
            ErrorResponse::new("Invalid Status", message, "INVALID_STATUS"),
        ),
        DriverStatusError::AccountPending => (
            StatusCode::FORBIDDEN,
            ErrorResponse::new("Forbidden", message, "ACCOUNT_PENDING"),
        ),
        DriverStatusError::AccountSuspended => (
            StatusCode::FORBIDDEN,
            ErrorResponse::new("Forbidden", message, "ACCOUNT_SUSPENDED"),
        ),
        DriverStatusError::DriverStatusSuspended => (
            StatusCode::FORBIDDEN,
            ErrorResponse::new("Forbidden", message, "DRIVER_STATUS_SUSPENDED"),
        ),
        DriverStatusError::DriverStatusInactive => (
            StatusCode::FORBIDDEN,
            ErrorResponse::new("Forbidden", message, "DRIVER_STATUS_INACTIVE"),
        ),
        DriverStatusError::Offline => (
            StatusCode::FORBIDDEN,
            ErrorResponse::new("Forbidden", message, "DRIVER_OFFLINE"),
        ),
    }
}

fn pricing_error_response(e: PricingError) -> (StatusCode, ErrorResponse) {
    let message = e.to_string();
    match e {
        PricingError::BookingNotFound => (
            StatusCode::NOT_FOUND,
            ErrorResponse::new("Not Found", message, "BOOKING_NOT_FOUND"),
        ),
        PricingError::NoActivePricing => (
            StatusCode::NOT_FOUND,
            ErrorResponse::new("Not Found", message, "NO_ACTIVE_PRICING"),
        ),
        PricingError::InvalidVehicleType(_) => (
            StatusCode::BAD_REQUEST,
            ErrorResponse::new("Bad Request", message, "INVALID_VEHICLE_TYPE"),
        ),
        PricingError::Storage(err) => {
            tracing::error!("❌ Pricing storage error: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::new(
                    "Database Error",
                    "An error occurred while accessing the database".to_string(),
                    "DB_ERROR",
                ),
            )
        }
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(e: bcrypt::BcryptError) -> Self {
        AppError::Hash(e.to_string())
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Función helper para crear errores de recurso no encontrado
pub fn not_found_error(resource: &str, id: &str) -> AppError {
    AppError::NotFound(format!("{} with id '{}' not found", resource, id))
}

/// Función helper para crear errores de conflicto
pub fn conflict_error(resource: &str, field: &str, value: &str) -> AppError {
    AppError::Conflict(format!("{} with {} '{}' already exists", resource, field, value))
}
