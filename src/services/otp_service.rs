//! Motor de códigos OTP
//!
//! Emite, limita y verifica códigos de un solo uso por clave
//! (phone, referenceType, referenceId). Estados: none -> pending ->
//! {verified (terminal, luego borrado) | expired | locked}. Las filas
//! obsoletas se purgan al inicio del siguiente acceso a la misma clave;
//! no hay sweep en background.
//!
//! El código en claro solo viaja por SMS; en storage queda únicamente su
//! hash sha256. Un fallo del proveedor SMS no falla la emisión: el código
//! ya quedó persistido y se reporta éxito con logging del error.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::Serialize;
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::config::environment::EnvironmentConfig;
use crate::models::otp::{Otp, OtpKey, OtpReference, OtpStatus, ReferenceKind};
use crate::repositories::driver_repository::DriverRepository;
use crate::repositories::otp_repository::OtpRepository;
use crate::repositories::passenger_repository::PassengerRepository;
use crate::services::sms_service::SmsService;
use crate::utils::phone::{strict_digits, CanonicalPhone};

/// Errores del motor OTP
#[derive(Error, Debug)]
pub enum OtpError {
    #[error("Phone must be 9 or 10 digits starting with 9 or 7, optionally prefixed with 251")]
    InvalidPhoneFormat,

    #[error("Please wait {remaining_seconds} seconds before requesting another OTP")]
    TooSoon { remaining_seconds: i64 },

    #[error("Account locked. Try again in {remaining_seconds} seconds")]
    AccountLocked { remaining_seconds: i64 },

    #[error("No valid OTP found")]
    NoValidCode,

    #[error("OTP has expired")]
    CodeExpired,

    #[error("Invalid OTP")]
    InvalidCode,

    #[error("{0} not found")]
    ReferenceNotFound(&'static str),

    #[error("{0} has no phone number")]
    MissingPhone(&'static str),

    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

/// Configuración del motor OTP
#[derive(Debug, Clone)]
pub struct OtpConfig {
    pub otp_length: u32,
    pub expiration_seconds: i64,
    pub max_attempts: i32,
    pub lockout_seconds: i64,
    pub resend_cooldown_seconds: i64,
    pub company_name: String,
}

impl From<&EnvironmentConfig> for OtpConfig {
    fn from(config: &EnvironmentConfig) -> Self {
        Self {
            otp_length: config.otp_length,
            expiration_seconds: config.otp_expiration_seconds,
            max_attempts: config.otp_max_attempts,
            lockout_seconds: config.otp_lockout_seconds,
            resend_cooldown_seconds: config.otp_resend_cooldown_seconds,
            company_name: config.company_name.clone(),
        }
    }
}

/// Resultado de una emisión exitosa
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OtpIssued {
    pub phone_number: String,
    pub expires_in: i64,
}

/// Hash sha256 en hex del código
pub fn hash_secret(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

/// Código numérico uniforme en [10^(n-1), 10^n - 1]
pub fn generate_code(length: u32) -> String {
    let min = 10u64.pow(length - 1);
    let max = 10u64.pow(length) - 1;
    let value = rand::thread_rng().gen_range(min..=max);
    value.to_string()
}

/// Comparación en tiempo constante de los hashes
pub fn constant_time_eq(a: &str, b: &str) -> bool {
    let a = a.as_bytes();
    let b = b.as_bytes();
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Segundos de cooldown restantes desde la emisión anterior, si aplica
pub fn cooldown_remaining(
    created_at: DateTime<Utc>,
    now: DateTime<Utc>,
    cooldown_seconds: i64,
) -> Option<i64> {
    let elapsed = (now - created_at).num_seconds();
    if elapsed < cooldown_seconds {
        Some(cooldown_seconds - elapsed)
    } else {
        None
    }
}

/// Segundos restantes de un lockout/expiración, nunca negativos
pub fn seconds_until(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (expires_at - now).num_seconds().max(0)
}

/// Servicio OTP: orquesta repositorios, generación y dispatch SMS
pub struct OtpService {
    otps: OtpRepository,
    passengers: PassengerRepository,
    drivers: DriverRepository,
    sms: SmsService,
    config: OtpConfig,
}

impl OtpService {
    pub fn new(
        otps: OtpRepository,
        passengers: PassengerRepository,
        drivers: DriverRepository,
        sms: SmsService,
        config: OtpConfig,
    ) -> Self {
        Self { otps, passengers, drivers, sms, config }
    }

    /// Resolver el teléfono canónico de la emisión: directo si viene en el
    /// request, vía lookup de la entidad referenciada si no.
    async fn resolve_phone(
        &self,
        reference: &OtpReference,
        phone_number: Option<&str>,
    ) -> Result<CanonicalPhone, OtpError> {
        let raw = match phone_number {
            Some(phone) => phone.to_string(),
            None => match reference.kind {
                ReferenceKind::Passenger => {
                    let passenger = self
                        .passengers
                        .find_by_id(reference.id)
                        .await?
                        .ok_or(OtpError::ReferenceNotFound("Passenger"))?;
                    if passenger.phone.is_empty() {
                        return Err(OtpError::MissingPhone("Passenger"));
                    }
                    passenger.phone
                }
                ReferenceKind::Driver => {
                    let driver = self
                        .drivers
                        .find_by_id(reference.id)
                        .await?
                        .ok_or(OtpError::ReferenceNotFound("Driver"))?;
                    if driver.phone.is_empty() {
                        return Err(OtpError::MissingPhone("Driver"));
                    }
                    driver.phone
                }
                ReferenceKind::Direct => return Err(OtpError::MissingPhone("direct reference")),
            },
        };
        strict_digits(&raw).ok_or(OtpError::InvalidPhoneFormat)
    }

    /// Emitir un código para la clave (phone, referencia).
    pub async fn issue(
        &self,
        reference: &OtpReference,
        phone_number: Option<&str>,
    ) -> Result<OtpIssued, OtpError> {
        let canonical = self.resolve_phone(reference, phone_number).await?;
        let key = OtpKey::new(&canonical.digits, reference);
        let now = Utc::now();

        if let Some(locked) = self.otps.find_locked(&key, now).await? {
            return Err(OtpError::AccountLocked {
                remaining_seconds: seconds_until(locked.expires_at, now),
            });
        }

        if let Some(pending) = self.otps.find_pending(&key, now).await? {
            if let Some(remaining) =
                cooldown_remaining(pending.created_at, now, self.config.resend_cooldown_seconds)
            {
                return Err(OtpError::TooSoon { remaining_seconds: remaining });
            }
            // Supersede: la emisión nueva invalida el código anterior
            self.otps.delete(pending.id).await?;
        }

        self.otps.purge_stale(&key, now).await?;

        let code = generate_code(self.config.otp_length);
        let expires_at = now + Duration::seconds(self.config.expiration_seconds);
        self.otps.create(&key, &hash_secret(&code), expires_at, now).await?;

        // Fire-and-forget: el código ya está persistido, un fallo del
        // proveedor SMS no revierte la emisión
        let msg = format!(
            "{}: Your OTP is {}. It expires in {} minutes.",
            self.config.company_name,
            code,
            self.config.expiration_seconds / 60
        );
        match self.sms.send_single_sms(&canonical.e164, &msg).await {
            Ok(_) => {
                tracing::info!("📨 OTP enviado a {}", canonical.e164);
            }
            Err(e) => {
                tracing::warn!("[OTP SMS ERROR] phone={} err={}", canonical.e164, e);
            }
        }

        Ok(OtpIssued {
            phone_number: canonical.e164,
            expires_in: self.config.expiration_seconds,
        })
    }

    /// Verificar un código para la clave (phone, referencia).
    pub async fn verify(
        &self,
        reference: &OtpReference,
        phone_number: Option<&str>,
        submitted_code: &str,
    ) -> Result<(), OtpError> {
        let canonical = self.resolve_phone(reference, phone_number).await?;
        let key = OtpKey::new(&canonical.digits, reference);
        let now = Utc::now();

        // Solo filas terminales: una pending vencida debe poder transicionar
        // a expired abajo para reportar CodeExpired
        self.otps.purge_terminal(&key).await?;

        let otp = self.otps.find_pending_any(&key).await?.ok_or(OtpError::NoValidCode)?;

        match evaluate_pending(&otp, now, self.config.max_attempts) {
            PendingEvaluation::LockOut => {
                let lock_until = now + Duration::seconds(self.config.lockout_seconds);
                self.otps.set_status(otp.id, OtpStatus::Locked, Some(lock_until)).await?;
                return Err(OtpError::AccountLocked {
                    remaining_seconds: self.config.lockout_seconds,
                });
            }
            PendingEvaluation::Expired => {
                self.otps.set_status(otp.id, OtpStatus::Expired, None).await?;
                return Err(OtpError::CodeExpired);
            }
            PendingEvaluation::Attempt => {}
        }

        let attempts = otp.attempts + 1;
        self.otps.increment_attempts(otp.id).await?;

        if !constant_time_eq(&hash_secret(submitted_code), &otp.hashed_secret) {
            if attempts >= self.config.max_attempts {
                let lock_until = now + Duration::seconds(self.config.lockout_seconds);
                self.otps.set_status(otp.id, OtpStatus::Locked, Some(lock_until)).await?;
                return Err(OtpError::AccountLocked {
                    remaining_seconds: self.config.lockout_seconds,
                });
            }
            return Err(OtpError::InvalidCode);
        }

        self.otps.set_status(otp.id, OtpStatus::Verified, None).await?;
        self.otps.delete_all(&key).await?;
        Ok(())
    }
}

/// Evaluación pura de una fila pending en la verificación; la usa el
/// servicio y la cubren los tests sin necesidad de storage.
#[derive(Debug, PartialEq)]
pub enum PendingEvaluation {
    /// La fila agotó sus intentos: pasa a locked
    LockOut,
    /// La fila venció: pasa a expired
    Expired,
    /// Se puede contar un intento y comparar el hash
    Attempt,
}

pub fn evaluate_pending(otp: &Otp, now: DateTime<Utc>, max_attempts: i32) -> PendingEvaluation {
    if otp.attempts >= max_attempts {
        PendingEvaluation::LockOut
    } else if now > otp.expires_at {
        PendingEvaluation::Expired
    } else {
        PendingEvaluation::Attempt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending_row(attempts: i32, expires_in_seconds: i64, created_ago_seconds: i64) -> Otp {
        let now = Utc::now();
        Otp {
            id: 1,
            phone: "251911223344".to_string(),
            hashed_secret: hash_secret("123456"),
            expires_at: now + Duration::seconds(expires_in_seconds),
            attempts,
            status: "pending".to_string(),
            reference_type: "Passenger".to_string(),
            reference_id: 9,
            created_at: now - Duration::seconds(created_ago_seconds),
        }
    }

    #[test]
    fn test_hash_secret_is_stable_and_one_way() {
        let h = hash_secret("123456");
        assert_eq!(h.len(), 64);
        assert_eq!(h, hash_secret("123456"));
        assert_ne!(h, hash_secret("123457"));
        assert_ne!(h, "123456");
    }

    #[test]
    fn test_generate_code_covers_full_digit_range() {
        for _ in 0..200 {
            let code = generate_code(6);
            assert_eq!(code.len(), 6);
            let value: u64 = code.parse().unwrap();
            assert!((100_000..=999_999).contains(&value));
        }
        let short = generate_code(4);
        let value: u64 = short.parse().unwrap();
        assert!((1_000..=9_999).contains(&value));
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq("abc123", "abc123"));
        assert!(!constant_time_eq("abc123", "abc124"));
        assert!(!constant_time_eq("abc", "abc123"));
    }

    #[test]
    fn test_cooldown_blocks_within_window() {
        let now = Utc::now();
        let created = now - Duration::seconds(10);
        assert_eq!(cooldown_remaining(created, now, 30), Some(20));
    }

    #[test]
    fn test_cooldown_clears_after_window() {
        let now = Utc::now();
        let created = now - Duration::seconds(31);
        assert_eq!(cooldown_remaining(created, now, 30), None);
        let created = now - Duration::seconds(30);
        assert_eq!(cooldown_remaining(created, now, 30), None);
    }

    #[test]
    fn test_seconds_until_never_negative() {
        let now = Utc::now();
        assert_eq!(seconds_until(now - Duration::seconds(5), now), 0);
        assert_eq!(seconds_until(now + Duration::seconds(90), now), 90);
    }

    #[test]
    fn test_evaluate_pending_prefers_lockout_over_expiry() {
        let now = Utc::now();
        let row = pending_row(3, -10, 400);
        assert_eq!(evaluate_pending(&row, now, 3), PendingEvaluation::LockOut);
    }

    #[test]
    fn test_evaluate_pending_expired() {
        let now = Utc::now();
        let row = pending_row(1, -1, 301);
        assert_eq!(evaluate_pending(&row, now, 3), PendingEvaluation::Expired);
    }

    #[test]
    fn test_evaluate_pending_attempt_allowed() {
        let now = Utc::now();
        let row = pending_row(2, 200, 100);
        assert_eq!(evaluate_pending(&row, now, 3), PendingEvaluation::Attempt);
    }
}
