//! Modelo de políticas de pricing
//!
//! Una política por vehicleType; el motor de pricing selecciona la fila
//! activa actualizada más recientemente.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Tipos de vehículo admitidos por las políticas de pricing
pub const ALLOWED_VEHICLE_TYPES: [&str; 7] =
    ["mini", "sedan", "van", "suv", "mpv", "motorbike", "bajaj"];

/// Normalizar el vehicleType: trim + lowercase, y corrige el typo
/// histórico 'motobike'
pub fn normalize_vehicle_type(value: &str) -> String {
    let v = value.trim().to_lowercase();
    if v == "motobike" {
        "motorbike".to_string()
    } else {
        v
    }
}

/// Política de pricing - mapea a la tabla pricing_policies
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PricingPolicy {
    pub id: Uuid,
    pub vehicle_type: String,
    pub base_fare: f64,
    pub per_km: f64,
    pub per_minute: f64,
    pub waiting_per_minute: f64,
    pub surge_multiplier: f64,
    pub minimum_fare: f64,
    pub maximum_fare: f64,
    pub is_active: bool,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_vehicle_type() {
        assert_eq!(normalize_vehicle_type(" Mini "), "mini");
        assert_eq!(normalize_vehicle_type("MotoBike"), "motorbike");
        assert_eq!(normalize_vehicle_type("motobike"), "motorbike");
        assert_eq!(normalize_vehicle_type("bajaj"), "bajaj");
    }
}
