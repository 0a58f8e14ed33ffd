//! Repositorio de códigos OTP
//!
//! El motor OTP es el único dueño de la tabla otps; todas las operaciones
//! van keyed por (phone, reference_type, reference_id).

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::models::otp::{Otp, OtpKey, OtpStatus};

pub struct OtpRepository {
    pool: PgPool,
}

impl OtpRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fila pending sin vencer para la clave.
    pub async fn find_pending(
        &self,
        key: &OtpKey,
        now: DateTime<Utc>,
    ) -> Result<Option<Otp>, sqlx::Error> {
        sqlx::query_as::<_, Otp>(
            r#"
            SELECT * FROM otps
            WHERE phone = $1 AND reference_type = $2 AND reference_id = $3
              AND status = 'pending' AND expires_at > $4
            "#,
        )
        .bind(&key.phone)
        .bind(&key.reference_type)
        .bind(key.reference_id)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
    }

    /// Fila pending sin mirar expiración; la verificación decide si venció.
    pub async fn find_pending_any(&self, key: &OtpKey) -> Result<Option<Otp>, sqlx::Error> {
        sqlx::query_as::<_, Otp>(
            r#"
            SELECT * FROM otps
            WHERE phone = $1 AND reference_type = $2 AND reference_id = $3
              AND status = 'pending'
            "#,
        )
        .bind(&key.phone)
        .bind(&key.reference_type)
        .bind(key.reference_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Fila locked sin vencer para la clave.
    pub async fn find_locked(
        &self,
        key: &OtpKey,
        now: DateTime<Utc>,
    ) -> Result<Option<Otp>, sqlx::Error> {
        sqlx::query_as::<_, Otp>(
            r#"
            SELECT * FROM otps
            WHERE phone = $1 AND reference_type = $2 AND reference_id = $3
              AND status = 'locked' AND expires_at > $4
            "#,
        )
        .bind(&key.phone)
        .bind(&key.reference_type)
        .bind(key.reference_id)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
    }

    /// Purga de emisión: filas vencidas o en estado terminal.
    pub async fn purge_stale(&self, key: &OtpKey, now: DateTime<Utc>) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            DELETE FROM otps
            WHERE phone = $1 AND reference_type = $2 AND reference_id = $3
              AND (expires_at < $4 OR status IN ('verified', 'expired'))
            "#,
        )
        .bind(&key.phone)
        .bind(&key.reference_type)
        .bind(key.reference_id)
        .bind(now)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Purga de verificación: solo estados terminales, conservando las
    /// pending vencidas para poder reportar su expiración.
    pub async fn purge_terminal(&self, key: &OtpKey) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            DELETE FROM otps
            WHERE phone = $1 AND reference_type = $2 AND reference_id = $3
              AND status IN ('verified', 'expired')
            "#,
        )
        .bind(&key.phone)
        .bind(&key.reference_type)
        .bind(key.reference_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Crear una fila pending nueva.
    pub async fn create(
        &self,
        key: &OtpKey,
        hashed_secret: &str,
        expires_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<Otp, sqlx::Error> {
        sqlx::query_as::<_, Otp>(
            r#"
            INSERT INTO otps (phone, hashed_secret, expires_at, attempts, status, reference_type, reference_id, created_at)
            VALUES ($1, $2, $3, 0, 'pending', $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&key.phone)
        .bind(hashed_secret)
        .bind(expires_at)
        .bind(&key.reference_type)
        .bind(key.reference_id)
        .bind(now)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn delete(&self, id: i64) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM otps WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Borrar todas las filas de la clave (tras una verificación exitosa).
    pub async fn delete_all(&self, key: &OtpKey) -> Result<(), sqlx::Error> {
        sqlx::query(
            "DELETE FROM otps WHERE phone = $1 AND reference_type = $2 AND reference_id = $3",
        )
        .bind(&key.phone)
        .bind(&key.reference_type)
        .bind(key.reference_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn increment_attempts(&self, id: i64) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE otps SET attempts = attempts + 1 WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Transicionar el estado de una fila; opcionalmente corre su expiración
    /// (lockout).
    pub async fn set_status(
        &self,
        id: i64,
        status: OtpStatus,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<(), sqlx::Error> {
        match expires_at {
            Some(expires_at) => {
                sqlx::query("UPDATE otps SET status = $2, expires_at = $3 WHERE id = $1")
                    .bind(id)
                    .bind(status.as_str())
                    .bind(expires_at)
                    .execute(&self.pool)
                    .await?;
            }
            None => {
                sqlx::query("UPDATE otps SET status = $2 WHERE id = $1")
                    .bind(id)
                    .bind(status.as_str())
                    .execute(&self.pool)
                    .await?;
            }
        }
        Ok(())
    }
}
