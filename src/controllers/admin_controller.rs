//! Controller de operaciones admin
//!
//! Aprobación/rechazo de drivers, endpoint genérico de estado, listado de
//! revisiones pendientes, puntos de recompensa y alta de passengers.

use bcrypt::{hash, DEFAULT_COST};

use crate::dto::admin_dto::{
    CreatePassengerRequest, CreatePassengerResponse, CreatedPassenger, DriverPointsResponse,
    PassengerPointsResponse, UpdateDriverStatusRequest, UpdateDriverStatusResponse,
};
use crate::models::driver::Driver;
use crate::repositories::driver_repository::DriverRepository;
use crate::repositories::passenger_repository::PassengerRepository;
use crate::services::driver_status_service::{self, StatusChange};
use crate::state::AppState;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::phone::normalize_phone;

pub struct AdminController {
    drivers: DriverRepository,
    passengers: PassengerRepository,
}

impl AdminController {
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

    /// POST /admin/drivers/:id/approve
    pub async fn approve_driver(&self, driver_id: i64) -> AppResult<Driver> {
        let driver = self.load_driver(driver_id).await?;
        let update = driver_status_service::approve(&driver)?;
        Ok(self.drivers.apply_update(&driver, &update).await?)
    }

    /// POST /admin/drivers/:id/approve-documents
    pub async fn approve_driver_documents(&self, driver_id: i64) -> AppResult<Driver> {
        let driver = self.load_driver(driver_id).await?;
        let update = driver_status_service::approve_documents(&driver)?;
        Ok(self.drivers.apply_update(&driver, &update).await?)
    }

    /// POST /admin/drivers/:id/reject-documents
    pub async fn reject_driver_documents(&self, driver_id: i64) -> AppResult<Driver> {
        let driver = self.load_driver(driver_id).await?;
        let update = driver_status_service::reject_documents(&driver);
        Ok(self.drivers.apply_update(&driver, &update).await?)
    }

    /// POST /admin/drivers/:id/status
    pub async fn update_driver_status(
        &self,
        driver_id: i64,
        request: UpdateDriverStatusRequest,
    ) -> AppResult<UpdateDriverStatusResponse> {
        let driver = self.load_driver(driver_id).await?;

        let change = StatusChange {
            status: request.status,
            verification: request.verification,
            document_status: request.document_status,
            availability: request.availability,
        };
        let update = driver_status_service::apply_status_change(&driver, &change)?;
        let updated = if update.is_empty() {
            driver
        } else {
            self.drivers.apply_update(&driver, &update).await?
        };

        Ok(UpdateDriverStatusResponse {
            message: "Driver status updated".to_string(),
            driver: updated,
        })
    }

    /// GET /admin/drivers/pending-documents
    pub async fn pending_driver_documents(&self) -> AppResult<Vec<Driver>> {
        Ok(self.drivers.list_pending_documents().await?)
    }

    /// POST /admin/drivers/:id/points
    pub async fn award_driver_points(
        &self,
        driver_id: i64,
        points: Option<i32>,
    ) -> AppResult<DriverPointsResponse> {
        let delta = points.filter(|p| *p != 0).ok_or_else(|| {
            AppError::BadRequest("points must be a non-zero number".to_string())
        })?;
        self.load_driver(driver_id).await?;
        let updated = self.drivers.add_reward_points(driver_id, delta).await?;
        Ok(DriverPointsResponse {
            message: "Driver points updated".to_string(),
            driver_id: updated.id,
            reward_points: updated.reward_points,
        })
    }

    /// POST /admin/passengers/:id/points
    pub async fn award_passenger_points(
        &self,
        passenger_id: i64,
        points: Option<i32>,
    ) -> AppResult<PassengerPointsResponse> {
        let delta = points.filter(|p| *p != 0).ok_or_else(|| {
            AppError::BadRequest("points must be a non-zero number".to_string())
        })?;
        let passenger = self
            .passengers
            .find_by_id(passenger_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Passenger not found".to_string()))?;
        let updated = self.passengers.add_reward_points(passenger.id, delta).await?;
        Ok(PassengerPointsResponse {
            message: "Passenger points updated".to_string(),
            passenger_id: updated.id,
            reward_points: updated.reward_points,
        })
    }

    /// POST /admin/passengers
    pub async fn create_passenger(
        &self,
        request: CreatePassengerRequest,
    ) -> AppResult<CreatePassengerResponse> {
        if request.name.is_empty() || request.phone.is_empty() || request.password.is_empty() {
            return Err(AppError::BadRequest(
                "name, phone, and password are required".to_string(),
            ));
        }

        let normalized_phone = normalize_phone(&request.phone);

        if self.passengers.find_by_phone(&normalized_phone).await?.is_some() {
            return Err(AppError::Conflict("Phone already registered".to_string()));
        }

        let hashed = hash(&request.password, DEFAULT_COST)?;
        let passenger = self
            .passengers
            .create(
                &request.name,
                &normalized_phone,
                request.email.as_deref(),
                request.emergency_contacts.as_deref(),
                &hashed,
            )
            .await?;

        Ok(CreatePassengerResponse {
            passenger: CreatedPassenger {
                id: passenger.id,
                name: passenger.name,
                phone: passenger.phone,
                email: passenger.email,
            },
        })
    }
}
