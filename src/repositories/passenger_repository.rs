//! Repositorio de passengers

use sqlx::PgPool;

use crate::models::passenger::Passenger;

pub struct PassengerRepository {
    pool: PgPool,
}

impl PassengerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Passenger>, sqlx::Error> {
        sqlx::query_as::<_, Passenger>("SELECT * FROM passengers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn find_by_phone(&self, phone: &str) -> Result<Option<Passenger>, sqlx::Error> {
        sqlx::query_as::<_, Passenger>("SELECT * FROM passengers WHERE phone = $1")
            .bind(phone)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn create(
        &self,
        name: &str,
        phone: &str,
        email: Option<&str>,
        emergency_contacts: Option<&str>,
        hashed_password: &str,
    ) -> Result<Passenger, sqlx::Error> {
        sqlx::query_as::<_, Passenger>(
            r#"
            INSERT INTO passengers (name, phone, email, emergency_contacts, password, rating, reward_points, otp_registered, created_at)
            VALUES ($1, $2, $3, $4, $5, 5.0, 0, false, NOW())
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(phone)
        .bind(email)
        .bind(emergency_contacts)
        .bind(hashed_password)
        .fetch_one(&self.pool)
        .await
    }

    /// Marcar la cuenta como registrada vía OTP.
    pub async fn set_otp_registered(&self, id: i64) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE passengers SET otp_registered = true WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Fijar el rating del passenger.
    pub async fn set_rating(&self, id: i64, rating: f64) -> Result<Passenger, sqlx::Error> {
        sqlx::query_as::<_, Passenger>(
            "UPDATE passengers SET rating = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(rating)
        .fetch_one(&self.pool)
        .await
    }

    /// Sumar (o restar) puntos de recompensa.
    pub async fn add_reward_points(&self, id: i64, delta: i32) -> Result<Passenger, sqlx::Error> {
        sqlx::query_as::<_, Passenger>(
            "UPDATE passengers SET reward_points = reward_points + $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(delta)
        .fetch_one(&self.pool)
        .await
    }
}
