//! Modelo de Booking (subset relevante para pricing)
//!
//! El booking guarda el último resultado de recálculo en sitio; el core no
//! mantiene historial de tarifas.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// Desglose de tarifa persistido junto al booking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FareBreakdown {
    pub base: f64,
    pub distance_cost: f64,
    pub time_cost: f64,
    pub waiting_cost: f64,
    pub surge_multiplier: f64,
}

/// Booking - mapea a la tabla bookings
#[derive(Debug, Clone, FromRow)]
pub struct Booking {
    pub id: Uuid,
    pub vehicle_type: String,
    pub pickup_latitude: f64,
    pub pickup_longitude: f64,
    pub dropoff_latitude: f64,
    pub dropoff_longitude: f64,
    pub distance_km: Option<f64>,
    pub fare_estimated: Option<f64>,
    pub fare_breakdown: Option<Json<FareBreakdown>>,
    pub created_at: DateTime<Utc>,
}
