//! Controller del driver (self-service)
//!
//! Perfil, disponibilidad, elegibilidad de booking y subida de documentos.
//! Todas las transiciones de estado pasan por driver_status_service; aquí
//! solo se valida el request y se aplica el update vía repositorio.

use bcrypt::{hash, DEFAULT_COST};

use crate::dto::driver_dto::{
    AvailabilityResponse, UpdateMyProfileRequest, UploadDocumentsResponse, UploadedFileMeta,
};
use crate::middleware::auth::AuthUser;
use crate::models::driver::Driver;
use crate::repositories::driver_repository::{DriverProfilePatch, DriverRepository};
use crate::services::driver_status_service::{
    self, BookingEligibility, DocumentUpload,
};
use crate::state::AppState;
use crate::models::passenger::Passenger;
use crate::repositories::passenger_repository::PassengerRepository;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::{clamp_rating, validate_not_empty, DRIVER_VEHICLE_TYPES};

pub struct DriverController {
    drivers: DriverRepository,
    passengers: PassengerRepository,
}

impl DriverController {
    pub fn new(state: &AppState) -> Self {
        Self {
            drivers: DriverRepository::new(state.pool.clone()),
            passengers: PassengerRepository::new(state.pool.clone()),
        }
    }

    async fn load_driver(&self, id: i64) -> AppResult<Driver> {
        self.drivers
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Driver not found".to_string()))
    }

    /// GET /drivers/profile/me
    pub async fn get_my_profile(&self, user: &AuthUser) -> AppResult<Driver> {
        user.require_driver("access this endpoint")?;
        self.load_driver(user.id).await
    }

    /// PUT /drivers/profile/me
    pub async fn update_my_profile(
        &self,
        user: &AuthUser,
        request: UpdateMyProfileRequest,
    ) -> AppResult<Driver> {
        user.require_driver("access this endpoint")?;

        // Campos de estado no editables por el propio driver
        if request.verification.is_some() || request.document_status.is_some() {
            return Err(AppError::Forbidden("Forbidden".to_string()));
        }
        if request.driver_status.is_some() {
            return Err(AppError::Forbidden(
                "Cannot update driver status directly. Contact support.".to_string(),
            ));
        }
        // rating y status se descartan silenciosamente

        if let Some(vehicle_type) = &request.vehicle_type {
            if !DRIVER_VEHICLE_TYPES.contains(&vehicle_type.as_str()) {
                return Err(AppError::BadRequest(format!(
                    "Invalid vehicleType. Must be one of: {}",
                    DRIVER_VEHICLE_TYPES.join(", ")
                )));
            }
        }
        if let Some(car_name) = &request.car_name {
            if validate_not_empty(car_name).is_err() {
                return Err(AppError::BadRequest(
                    "Invalid carName. Must be a non-empty string".to_string(),
                ));
            }
        }

        let driver = self.load_driver(user.id).await?;

        let password = match &request.password {
            Some(plain) => Some(hash(plain, DEFAULT_COST)?),
            None => None,
        };

        let patch = DriverProfilePatch {
            name: request.name,
            email: request.email,
            password,
            car_name: request.car_name,
            vehicle_type: request.vehicle_type,
            car_plate: request.car_plate,
            car_model: request.car_model,
            car_color: request.car_color,
            bank_account_no: request.bank_account_no,
            payment_preference: request.payment_preference,
            emergency_contacts: request.emergency_contacts,
        };

        Ok(self.drivers.update_profile(&driver, &patch).await?)
    }

    /// POST /drivers/profile/me/toggle-availability
    pub async fn toggle_my_availability(&self, user: &AuthUser) -> AppResult<AvailabilityResponse> {
        user.require_driver("toggle availability")?;
        let driver = self.load_driver(user.id).await?;

        let update = driver_status_service::toggle_availability(&driver)?;
        let updated = self.drivers.apply_update(&driver, &update).await?;

        Ok(AvailabilityResponse {
            message: "Availability updated".to_string(),
            availability: updated.availability,
            status: updated.status,
            driver_status: updated.driver_status,
        })
    }

    /// GET /drivers/booking-eligibility
    pub async fn check_booking_eligibility(&self, user: &AuthUser) -> AppResult<BookingEligibility> {
        user.require_driver("check booking eligibility")?;
        let driver = self.load_driver(user.id).await?;
        Ok(driver_status_service::booking_eligibility(&driver))
    }

    /// POST /drivers/:id/upload-documents
    pub async fn upload_documents(
        &self,
        driver_id: i64,
        upload: DocumentUpload,
        files: Vec<UploadedFileMeta>,
    ) -> AppResult<UploadDocumentsResponse> {
        let driver = self.load_driver(driver_id).await?;

        let update = driver_status_service::apply_document_upload(&driver, &upload)?;
        let updated = if update.is_empty() {
            driver
        } else {
            self.drivers.apply_update(&driver, &update).await?
        };

        Ok(UploadDocumentsResponse {
            message: "Documents uploaded successfully".to_string(),
            driver: updated,
            files,
        })
    }

    /// POST /drivers/passengers/:id/rate
    ///
    /// El rating se fija directamente, acotado a [0, 5]; no hay contador de
    /// valoraciones.
    pub async fn rate_passenger(
        &self,
        user: &AuthUser,
        passenger_id: i64,
        rating: f64,
    ) -> AppResult<Passenger> {
        user.require_driver("rate passengers")?;

        if !rating.is_finite() {
            return Err(AppError::BadRequest("Invalid rating".to_string()));
        }
        let new_rating = clamp_rating(rating);

        let passenger = self
            .passengers
            .find_by_id(passenger_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Passenger not found".to_string()))?;

        Ok(self.passengers.set_rating(passenger.id, new_rating).await?)
    }
}
