//! Controller de pricing
//!
//! Recálculo de tarifas por booking y administración de políticas. Tras un
//! cambio de política con bookingId asociado se recalcula y difunde ese
//! booking para que los clientes suscritos vean el precio nuevo.

use uuid::Uuid;
use validator::Validate;

use crate::dto::pricing_dto::{CreatePricingRequest, RecalculateRequest, UpdatePricingRequest};
use crate::models::pricing::{normalize_vehicle_type, PricingPolicy, ALLOWED_VEHICLE_TYPES};
use crate::repositories::booking_repository::BookingRepository;
use crate::repositories::pricing_repository::PricingRepository;
use crate::services::pricing_service::{PricingError, PricingService, PricingUpdate};
use crate::state::AppState;
use crate::utils::errors::{AppError, AppResult};

pub struct PricingController {
    pricing: PricingRepository,
    service: PricingService,
}

impl PricingController {
    pub fn new(state: &AppState) -> Self {
        let service = PricingService::new(
            BookingRepository::new(state.pool.clone()),
            PricingRepository::new(state.pool.clone()),
            state.pricing_broadcast.clone(),
        );
        Self {
            pricing: PricingRepository::new(state.pool.clone()),
            service,
        }
    }

    /// POST /pricing/recalculate
    pub async fn recalculate(&self, request: RecalculateRequest) -> AppResult<PricingUpdate> {
        Ok(self.service.recalculate(request.booking_id).await?)
    }

    /// POST /pricing
    pub async fn create_policy(&self, request: CreatePricingRequest) -> AppResult<PricingPolicy> {
        request.validate()?;
        let vehicle_type = normalize_vehicle_type(&request.vehicle_type);
        if !ALLOWED_VEHICLE_TYPES.contains(&vehicle_type.as_str()) {
            return Err(AppError::Pricing(PricingError::InvalidVehicleType(vehicle_type)));
        }
        Ok(self.pricing.create(&vehicle_type, &request).await?)
    }

    /// PUT /pricing/:id
    pub async fn update_policy(
        &self,
        id: Uuid,
        request: UpdatePricingRequest,
    ) -> AppResult<PricingPolicy> {
        request.validate()?;
        let current = self
            .pricing
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Not found".to_string()))?;

        let updated = self.pricing.update(&current, &request).await?;

        // Clientes que siguen un booking concreto reciben el precio nuevo
        if let Some(booking_id) = request.booking_id {
            if let Err(e) = self.service.recalculate(booking_id).await {
                tracing::warn!("⚠️ No se pudo recalcular el booking {}: {}", booking_id, e);
            }
        }

        Ok(updated)
    }
}
