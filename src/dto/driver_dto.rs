//! DTOs del perfil y estado del driver

use serde::{Deserialize, Serialize};

use crate::models::driver::Driver;
use crate::models::passenger::Passenger;

/// Request de actualización de perfil self-service.
///
/// Los campos de estado (status, verification, documentStatus, driverStatus)
/// y el rating no son editables por el driver; el controller los rechaza.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMyProfileRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub car_name: Option<String>,
    pub vehicle_type: Option<String>,
    pub car_plate: Option<String>,
    pub car_model: Option<String>,
    pub car_color: Option<String>,
    pub bank_account_no: Option<String>,
    pub payment_preference: Option<i32>,
    pub emergency_contacts: Option<String>,
    // Campos de estado: presentes solo para rechazarlos con 403; rating y
    // status ni siquiera se declaran y serde los descarta del payload
    pub verification: Option<bool>,
    pub document_status: Option<String>,
    pub driver_status: Option<String>,
}

/// Response del toggle de disponibilidad
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
    pub message: String,
    pub availability: bool,
    pub status: String,
    pub driver_status: String,
}

/// Metadatos de un archivo subido
#[derive(Debug, Serialize)]
pub struct UploadedFileMeta {
    pub field: String,
    pub filename: String,
    pub path: String,
}

/// Response de la subida de documentos
#[derive(Debug, Serialize)]
pub struct UploadDocumentsResponse {
    pub message: String,
    pub driver: Driver,
    pub files: Vec<UploadedFileMeta>,
}

/// Response de elegibilidad positiva
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CanAcceptBookingsResponse {
    pub can_accept_bookings: bool,
    pub status: String,
    pub driver_status: String,
}

/// Request de valoración de un passenger por un driver
#[derive(Debug, Deserialize)]
pub struct RatePassengerRequest {
    pub rating: f64,
    pub comment: Option<String>,
}

/// Response de la valoración
#[derive(Debug, Serialize)]
pub struct RatePassengerResponse {
    pub message: String,
    pub passenger: Passenger,
    pub rating: f64,
    pub comment: Option<String>,
}
