//! Motor de pricing
//!
//! Recalcula la tarifa estimada de un booking a partir de la distancia
//! geodésica pickup-dropoff y la política activa de su vehicleType,
//! persiste el resultado sobre el booking y lo difunde a los suscriptores.
//!
//! Nota: minimumFare/maximumFare existen en la política pero no se aplican
//! como clamp; comportamiento heredado pendiente de decisión de producto.

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::models::booking::FareBreakdown;
use crate::models::pricing::PricingPolicy;
use crate::repositories::booking_repository::BookingRepository;
use crate::repositories::pricing_repository::PricingRepository;
use crate::services::broadcast_service::PricingBroadcaster;

/// Errores del motor de pricing
#[derive(Error, Debug)]
pub enum PricingError {
    #[error("Booking not found")]
    BookingNotFound,

    #[error("Active pricing not found for vehicleType")]
    NoActivePricing,

    #[error("Invalid vehicleType '{0}'")]
    InvalidVehicleType(String),

    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

/// Payload difundido tras cada recálculo o cambio de política
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingUpdate {
    pub booking_id: String,
    pub vehicle_type: String,
    pub distance_km: f64,
    pub fare_estimated: f64,
    pub fare_breakdown: FareBreakdown,
}

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Distancia de gran círculo (haversine) en kilómetros
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// Desglose de tarifa para una distancia dada.
///
/// timeCost y waitingCost quedan en 0 hasta que haya telemetría real de
/// duración del viaje.
pub fn compute_fare(policy: &PricingPolicy, distance_km: f64) -> (FareBreakdown, f64) {
    let breakdown = FareBreakdown {
        base: policy.base_fare,
        distance_cost: distance_km * policy.per_km,
        time_cost: 0.0,
        waiting_cost: 0.0,
        surge_multiplier: policy.surge_multiplier,
    };
    let total = (breakdown.base + breakdown.distance_cost + breakdown.time_cost
        + breakdown.waiting_cost)
        * breakdown.surge_multiplier;
    (breakdown, total)
}

/// Servicio de pricing: orquesta repositorios y broadcast
pub struct PricingService {
    bookings: BookingRepository,
    pricing: PricingRepository,
    broadcaster: PricingBroadcaster,
}

impl PricingService {
    pub fn new(
        bookings: BookingRepository,
        pricing: PricingRepository,
        broadcaster: PricingBroadcaster,
    ) -> Self {
        Self { bookings, pricing, broadcaster }
    }

    /// Recalcular y persistir la tarifa estimada de un booking.
    pub async fn recalculate(&self, booking_id: Uuid) -> Result<PricingUpdate, PricingError> {
        let booking = self
            .bookings
            .find_by_id(booking_id)
            .await?
            .ok_or(PricingError::BookingNotFound)?;

        let distance_km = haversine_km(
            booking.pickup_latitude,
            booking.pickup_longitude,
            booking.dropoff_latitude,
            booking.dropoff_longitude,
        );

        let policy = self
            .pricing
            .find_active_by_vehicle_type(&booking.vehicle_type)
            .await?
            .ok_or(PricingError::NoActivePricing)?;

        let (breakdown, fare_estimated) = compute_fare(&policy, distance_km);

        self.bookings
            .save_fare(booking.id, distance_km, fare_estimated, &breakdown)
            .await?;

        let update = PricingUpdate {
            booking_id: booking.id.to_string(),
            vehicle_type: booking.vehicle_type.clone(),
            distance_km,
            fare_estimated,
            fare_breakdown: breakdown,
        };
        self.broadcaster.publish(update.clone());

        Ok(update)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn mini_policy() -> PricingPolicy {
        PricingPolicy {
            id: Uuid::new_v4(),
            vehicle_type: "mini".to_string(),
            base_fare: 50.0,
            per_km: 10.0,
            per_minute: 2.0,
            waiting_per_minute: 1.0,
            surge_multiplier: 1.5,
            minimum_fare: 500.0,
            maximum_fare: 1.0,
            is_active: true,
            description: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_haversine_addis_sample() {
        // Pickup y dropoff de referencia en Addis Abeba, ~3.1 km
        let d = haversine_km(9.0000, 38.7000, 9.0200, 38.7200);
        assert!(d > 3.0 && d < 3.25, "distancia fuera de rango: {}", d);
    }

    #[test]
    fn test_haversine_zero_distance() {
        let d = haversine_km(9.0, 38.7, 9.0, 38.7);
        assert!(d.abs() < 1e-9);
    }

    #[test]
    fn test_haversine_is_symmetric() {
        let a = haversine_km(9.0, 38.7, 9.02, 38.72);
        let b = haversine_km(9.02, 38.72, 9.0, 38.7);
        assert!((a - b).abs() < 1e-9);
    }

    #[test]
    fn test_compute_fare_formula() {
        let policy = mini_policy();
        let distance = haversine_km(9.0000, 38.7000, 9.0200, 38.7200);
        let (breakdown, total) = compute_fare(&policy, distance);
        assert_eq!(breakdown.base, 50.0);
        assert_eq!(breakdown.time_cost, 0.0);
        assert_eq!(breakdown.waiting_cost, 0.0);
        assert_eq!(breakdown.surge_multiplier, 1.5);
        assert!((breakdown.distance_cost - distance * 10.0).abs() < 1e-9);
        let expected = (50.0 + distance * 10.0) * 1.5;
        assert!((total - expected).abs() < 1e-9);
    }

    #[test]
    fn test_compute_fare_ignores_min_max_clamping() {
        // La política de ejemplo tiene minimumFare=500 y maximumFare=1:
        // el total no se ajusta a ninguno de los dos
        let policy = mini_policy();
        let (_, total) = compute_fare(&policy, 3.0);
        assert!((total - (50.0 + 30.0) * 1.5).abs() < 1e-9);
        assert!(total < policy.minimum_fare);
        assert!(total > policy.maximum_fare);
    }
}
