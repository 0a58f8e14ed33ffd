//! Repositorio de drivers

use sqlx::PgPool;

use crate::models::driver::Driver;
use crate::services::driver_status_service::DriverUpdate;

/// Campos editables por el propio driver en su perfil
#[derive(Debug, Clone, Default)]
pub struct DriverProfilePatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub car_name: Option<String>,
    pub vehicle_type: Option<String>,
    pub car_plate: Option<String>,
    pub car_model: Option<String>,
    pub car_color: Option<String>,
    pub bank_account_no: Option<String>,
    pub payment_preference: Option<i32>,
    pub emergency_contacts: Option<String>,
}

pub struct DriverRepository {
    pool: PgPool,
}

impl DriverRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Driver>, sqlx::Error> {
        sqlx::query_as::<_, Driver>("SELECT * FROM drivers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn find_by_phone(&self, phone: &str) -> Result<Option<Driver>, sqlx::Error> {
        sqlx::query_as::<_, Driver>("SELECT * FROM drivers WHERE phone = $1")
            .bind(phone)
            .fetch_optional(&self.pool)
            .await
    }

    /// Drivers con admisión o documentos pendientes de revisión.
    pub async fn list_pending_documents(&self) -> Result<Vec<Driver>, sqlx::Error> {
        sqlx::query_as::<_, Driver>(
            r#"
            SELECT * FROM drivers
            WHERE status = 'pending'
               OR document_status = 'pending'
               OR document_status IS NULL
               OR document_status = ''
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    /// Aplicar una actualización de la máquina de estados. Solo los campos
    /// presentes en el update se escriben.
    pub async fn apply_update(
        &self,
        current: &Driver,
        update: &DriverUpdate,
    ) -> Result<Driver, sqlx::Error> {
        sqlx::query_as::<_, Driver>(
            r#"
            UPDATE drivers
            SET status = $2,
                document_status = $3,
                verification = $4,
                availability = $5,
                driving_license_file = $6,
                document = $7,
                national_id_file = $8,
                vehicle_registration_file = $9,
                insurance_file = $10
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(current.id)
        .bind(update.status.map(|s| s.to_string()).unwrap_or_else(|| current.status.clone()))
        .bind(
            update
                .document_status
                .map(|s| Some(s.to_string()))
                .unwrap_or_else(|| current.document_status.clone()),
        )
        .bind(update.verification.unwrap_or(current.verification))
        .bind(update.availability.unwrap_or(current.availability))
        .bind(update.driving_license_file.clone().or_else(|| current.driving_license_file.clone()))
        .bind(update.document.clone().or_else(|| current.document.clone()))
        .bind(update.national_id_file.clone().or_else(|| current.national_id_file.clone()))
        .bind(
            update
                .vehicle_registration_file
                .clone()
                .or_else(|| current.vehicle_registration_file.clone()),
        )
        .bind(update.insurance_file.clone().or_else(|| current.insurance_file.clone()))
        .fetch_one(&self.pool)
        .await
    }

    /// Actualización de perfil self-service con merge sobre el estado actual.
    pub async fn update_profile(
        &self,
        current: &Driver,
        patch: &DriverProfilePatch,
    ) -> Result<Driver, sqlx::Error> {
        sqlx::query_as::<_, Driver>(
            r#"
            UPDATE drivers
            SET name = $2,
                email = $3,
                password = $4,
                car_name = $5,
                vehicle_type = $6,
                car_plate = $7,
                car_model = $8,
                car_color = $9,
                bank_account_no = $10,
                payment_preference = $11,
                emergency_contacts = $12
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(current.id)
        .bind(patch.name.clone().unwrap_or_else(|| current.name.clone()))
        .bind(patch.email.clone().or_else(|| current.email.clone()))
        .bind(patch.password.clone().unwrap_or_else(|| current.password.clone()))
        .bind(patch.car_name.clone().or_else(|| current.car_name.clone()))
        .bind(patch.vehicle_type.clone().or_else(|| current.vehicle_type.clone()))
        .bind(patch.car_plate.clone().or_else(|| current.car_plate.clone()))
        .bind(patch.car_model.clone().or_else(|| current.car_model.clone()))
        .bind(patch.car_color.clone().or_else(|| current.car_color.clone()))
        .bind(patch.bank_account_no.clone().or_else(|| current.bank_account_no.clone()))
        .bind(patch.payment_preference.or(current.payment_preference))
        .bind(patch.emergency_contacts.clone().or_else(|| current.emergency_contacts.clone()))
        .fetch_one(&self.pool)
        .await
    }

    /// Sumar (o restar) puntos de recompensa.
    pub async fn add_reward_points(&self, id: i64, delta: i32) -> Result<Driver, sqlx::Error> {
        sqlx::query_as::<_, Driver>(
            "UPDATE drivers SET reward_points = reward_points + $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(delta)
        .fetch_one(&self.pool)
        .await
    }
}
