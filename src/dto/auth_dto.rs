//! DTOs de autenticación por teléfono

use serde::{Deserialize, Serialize};

use crate::models::passenger::PassengerSummary;

/// Request para solicitar un OTP
#[derive(Debug, Deserialize)]
pub struct RequestOtpRequest {
    #[serde(default)]
    pub phone: String,
}

/// Request para verificar un OTP
#[derive(Debug, Deserialize)]
pub struct VerifyOtpRequest {
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub otp: String,
}

/// Response de emisión de OTP
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestOtpResponse {
    pub success: bool,
    pub message: String,
    pub phone_number: String,
    pub expires_in: i64,
}

/// Response de verificación exitosa con credenciales emitidas
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpResponse {
    pub success: bool,
    pub message: String,
    pub passenger: PassengerSummary,
    pub access_token: String,
    pub refresh_token: String,
}
