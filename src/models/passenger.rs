//! Modelo de Passenger
//!
//! Mapea a la tabla passengers. El password nunca se serializa hacia la API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Passenger principal - mapea a la tabla passengers
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Passenger {
    pub id: i64,
    pub name: String,
    pub phone: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub email: Option<String>,
    pub rating: f64,
    pub reward_points: i32,
    pub emergency_contacts: Option<String>,
    pub otp_registered: bool,
    pub created_at: DateTime<Utc>,
}

/// Vista reducida del passenger para respuestas de autenticación
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PassengerSummary {
    pub id: i64,
    pub phone: String,
}

impl From<&Passenger> for PassengerSummary {
    fn from(p: &Passenger) -> Self {
        Self { id: p.id, phone: p.phone.clone() }
    }
}
