//! DTOs de operaciones admin sobre drivers y passengers

use serde::{Deserialize, Serialize};

use crate::models::driver::Driver;

/// Request del endpoint genérico de estado del driver
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDriverStatusRequest {
    pub status: Option<String>,
    pub verification: Option<bool>,
    pub document_status: Option<String>,
    pub availability: Option<bool>,
}

/// Response del endpoint de estado
#[derive(Debug, Serialize)]
pub struct UpdateDriverStatusResponse {
    pub message: String,
    pub driver: Driver,
}

/// Request para otorgar puntos de recompensa
#[derive(Debug, Deserialize)]
pub struct AwardPointsRequest {
    pub points: Option<i32>,
}

/// Response de puntos otorgados a un driver
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverPointsResponse {
    pub message: String,
    pub driver_id: i64,
    pub reward_points: i32,
}

/// Response de puntos otorgados a un passenger
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PassengerPointsResponse {
    pub message: String,
    pub passenger_id: i64,
    pub reward_points: i32,
}

/// Request de alta de passenger por un admin
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePassengerRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    pub email: Option<String>,
    #[serde(default)]
    pub password: String,
    pub emergency_contacts: Option<String>,
}

/// Vista del passenger creado (sin password)
#[derive(Debug, Serialize)]
pub struct CreatedPassenger {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreatePassengerResponse {
    pub passenger: CreatedPassenger,
}
