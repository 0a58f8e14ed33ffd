//! DTOs de pricing

use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Request de recálculo de tarifa
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecalculateRequest {
    pub booking_id: Uuid,
}

/// Request de creación de política (admin)
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePricingRequest {
    pub vehicle_type: String,

    #[validate(range(min = 0.0))]
    pub base_fare: f64,

    #[validate(range(min = 0.0))]
    pub per_km: f64,

    #[validate(range(min = 0.0))]
    pub per_minute: f64,

    #[validate(range(min = 0.0))]
    pub waiting_per_minute: f64,

    #[validate(range(min = 0.0))]
    pub surge_multiplier: f64,

    #[validate(range(min = 0.0))]
    pub minimum_fare: f64,

    #[validate(range(min = 0.0))]
    pub maximum_fare: f64,

    pub is_active: Option<bool>,
    pub description: Option<String>,
}

/// Request de actualización de política (admin)
#[derive(Debug, Deserialize, Validate, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePricingRequest {
    #[validate(range(min = 0.0))]
    pub base_fare: Option<f64>,

    #[validate(range(min = 0.0))]
    pub per_km: Option<f64>,

    #[validate(range(min = 0.0))]
    pub per_minute: Option<f64>,

    #[validate(range(min = 0.0))]
    pub waiting_per_minute: Option<f64>,

    #[validate(range(min = 0.0))]
    pub surge_multiplier: Option<f64>,

    #[validate(range(min = 0.0))]
    pub minimum_fare: Option<f64>,

    #[validate(range(min = 0.0))]
    pub maximum_fare: Option<f64>,

    pub is_active: Option<bool>,
    pub description: Option<String>,

    /// Para que los clientes que siguen pricing por booking reciban el
    /// bookingId en el broadcast
    pub booking_id: Option<Uuid>,
}
