//! Repositorio de bookings (subset de pricing)

use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::booking::{Booking, FareBreakdown};

pub struct BookingRepository {
    pool: PgPool,
}

impl BookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Booking>, sqlx::Error> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    /// Persistir el resultado de un recálculo en sitio sobre el booking.
    pub async fn save_fare(
        &self,
        id: Uuid,
        distance_km: f64,
        fare_estimated: f64,
        breakdown: &FareBreakdown,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE bookings
            SET distance_km = $2, fare_estimated = $3, fare_breakdown = $4
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(distance_km)
        .bind(fare_estimated)
        .bind(Json(breakdown))
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
