//! Modelo de códigos OTP
//!
//! Una fila por intento de verificación pendiente/usado. Nunca se almacena
//! el código en claro, solo su hash sha256.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Estado de un código OTP
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OtpStatus {
    Pending,
    Verified,
    Expired,
    Locked,
}

impl OtpStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OtpStatus::Pending => "pending",
            OtpStatus::Verified => "verified",
            OtpStatus::Expired => "expired",
            OtpStatus::Locked => "locked",
        }
    }
}

/// Tipo de entidad a la que pertenece el código
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    Passenger,
    Driver,
    /// Emisión directa por teléfono, sin entidad asociada
    Direct,
}

impl ReferenceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReferenceKind::Passenger => "Passenger",
            ReferenceKind::Driver => "Driver",
            ReferenceKind::Direct => "direct",
        }
    }
}

/// Referencia polimórfica {kind, id} resuelta contra passengers o drivers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OtpReference {
    pub kind: ReferenceKind,
    pub id: i64,
}

impl OtpReference {
    pub fn passenger(id: i64) -> Self {
        Self { kind: ReferenceKind::Passenger, id }
    }

    pub fn driver(id: i64) -> Self {
        Self { kind: ReferenceKind::Driver, id }
    }

    pub fn direct() -> Self {
        Self { kind: ReferenceKind::Direct, id: 0 }
    }
}

/// Clave completa de un código: (phone canónico, referencia)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpKey {
    pub phone: String,
    pub reference_type: String,
    pub reference_id: i64,
}

impl OtpKey {
    pub fn new(phone_digits: &str, reference: &OtpReference) -> Self {
        Self {
            phone: phone_digits.to_string(),
            reference_type: reference.kind.as_str().to_string(),
            reference_id: reference.id,
        }
    }
}

/// Fila OTP - mapea a la tabla otps
#[derive(Debug, Clone, FromRow)]
pub struct Otp {
    pub id: i64,
    pub phone: String,
    pub hashed_secret: String,
    pub expires_at: DateTime<Utc>,
    pub attempts: i32,
    pub status: String,
    pub reference_type: String,
    pub reference_id: i64,
    pub created_at: DateTime<Utc>,
}
