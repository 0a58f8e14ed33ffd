//! Repositorio de políticas de pricing
//!
//! El motor de pricing solo lee; la escritura viene de los endpoints admin.

use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::pricing_dto::{CreatePricingRequest, UpdatePricingRequest};
use crate::models::pricing::PricingPolicy;

pub struct PricingRepository {
    pool: PgPool,
}

impl PricingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Política activa más recientemente actualizada para el vehicleType.
    pub async fn find_active_by_vehicle_type(
        &self,
        vehicle_type: &str,
    ) -> Result<Option<PricingPolicy>, sqlx::Error> {
        sqlx::query_as::<_, PricingPolicy>(
            r#"
            SELECT * FROM pricing_policies
            WHERE vehicle_type = $1 AND is_active = true
            ORDER BY updated_at DESC
            LIMIT 1
            "#,
        )
        .bind(vehicle_type)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<PricingPolicy>, sqlx::Error> {
        sqlx::query_as::<_, PricingPolicy>("SELECT * FROM pricing_policies WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn create(
        &self,
        vehicle_type: &str,
        request: &CreatePricingRequest,
    ) -> Result<PricingPolicy, sqlx::Error> {
        sqlx::query_as::<_, PricingPolicy>(
            r#"
            INSERT INTO pricing_policies
                (id, vehicle_type, base_fare, per_km, per_minute, waiting_per_minute,
                 surge_multiplier, minimum_fare, maximum_fare, is_active, description,
                 created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, NOW(), NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(vehicle_type)
        .bind(request.base_fare)
        .bind(request.per_km)
        .bind(request.per_minute)
        .bind(request.waiting_per_minute)
        .bind(request.surge_multiplier)
        .bind(request.minimum_fare)
        .bind(request.maximum_fare)
        .bind(request.is_active.unwrap_or(true))
        .bind(request.description.as_deref())
        .fetch_one(&self.pool)
        .await
    }

    /// Update con merge sobre la política actual; refresca updated_at para
    /// que la selección por-más-reciente la prefiera.
    pub async fn update(
        &self,
        current: &PricingPolicy,
        request: &UpdatePricingRequest,
    ) -> Result<PricingPolicy, sqlx::Error> {
        sqlx::query_as::<_, PricingPolicy>(
            r#"
            UPDATE pricing_policies
            SET base_fare = $2,
                per_km = $3,
                per_minute = $4,
                waiting_per_minute = $5,
                surge_multiplier = $6,
                minimum_fare = $7,
                maximum_fare = $8,
                is_active = $9,
                description = $10,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(current.id)
        .bind(request.base_fare.unwrap_or(current.base_fare))
        .bind(request.per_km.unwrap_or(current.per_km))
        .bind(request.per_minute.unwrap_or(current.per_minute))
        .bind(request.waiting_per_minute.unwrap_or(current.waiting_per_minute))
        .bind(request.surge_multiplier.unwrap_or(current.surge_multiplier))
        .bind(request.minimum_fare.unwrap_or(current.minimum_fare))
        .bind(request.maximum_fare.unwrap_or(current.maximum_fare))
        .bind(request.is_active.unwrap_or(current.is_active))
        .bind(request.description.clone().or_else(|| current.description.clone()))
        .fetch_one(&self.pool)
        .await
    }
}
