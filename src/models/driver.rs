//! Modelo de Driver
//!
//! Este módulo contiene el struct Driver y los tres ejes de estado que
//! gobiernan su elegibilidad: estado de admisión de la cuenta, estado de
//! revisión de documentos y estado operacional.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Estado de admisión de la cuenta del driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdmissionStatus {
    Pending,
    Approved,
    Suspended,
    Rejected,
}

impl AdmissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdmissionStatus::Pending => "pending",
            AdmissionStatus::Approved => "approved",
            AdmissionStatus::Suspended => "suspended",
            AdmissionStatus::Rejected => "rejected",
        }
    }

    /// Parseo case-insensitive; "active" es un alias de "approved"
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "pending" => Some(AdmissionStatus::Pending),
            "approved" | "active" => Some(AdmissionStatus::Approved),
            "suspended" => Some(AdmissionStatus::Suspended),
            "rejected" => Some(AdmissionStatus::Rejected),
            _ => None,
        }
    }
}

/// Estado de revisión de los documentos actuales
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    Pending,
    Approved,
    Rejected,
    Unset,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Pending => "pending",
            DocumentStatus::Approved => "approved",
            DocumentStatus::Rejected => "rejected",
            DocumentStatus::Unset => "",
        }
    }

    pub fn parse(value: Option<&str>) -> Self {
        match value.map(|v| v.to_lowercase()) {
            Some(v) if v == "pending" => DocumentStatus::Pending,
            Some(v) if v == "approved" => DocumentStatus::Approved,
            Some(v) if v == "rejected" => DocumentStatus::Rejected,
            _ => DocumentStatus::Unset,
        }
    }
}

/// Estado operacional, independiente de la admisión
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationalStatus {
    Active,
    Inactive,
    Suspended,
}

impl OperationalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationalStatus::Active => "active",
            OperationalStatus::Inactive => "inactive",
            OperationalStatus::Suspended => "suspended",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "active" => Some(OperationalStatus::Active),
            "inactive" => Some(OperationalStatus::Inactive),
            "suspended" => Some(OperationalStatus::Suspended),
            _ => None,
        }
    }
}

/// Driver principal - mapea a la tabla drivers
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Driver {
    pub id: i64,
    pub name: String,
    pub phone: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub email: Option<String>,
    pub wallet: Decimal,
    pub rating: f64,
    pub reward_points: i32,
    pub driving_license_file: Option<String>,
    pub document: Option<String>,
    pub national_id_file: Option<String>,
    pub vehicle_registration_file: Option<String>,
    pub insurance_file: Option<String>,
    pub car_name: Option<String>,
    pub vehicle_type: Option<String>,
    pub car_plate: Option<String>,
    pub car_model: Option<String>,
    pub car_color: Option<String>,
    pub availability: bool,
    pub bank_account_no: Option<String>,
    pub verification: bool,
    pub payment_preference: Option<i32>,
    pub emergency_contacts: Option<String>,
    pub document_status: Option<String>,
    pub driver_status: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl Driver {
    /// Estado de admisión parseado; valores desconocidos cuentan como pending
    pub fn admission_status(&self) -> AdmissionStatus {
        AdmissionStatus::parse(&self.status).unwrap_or(AdmissionStatus::Pending)
    }

    /// Estado de documentos parseado
    pub fn document_status(&self) -> DocumentStatus {
        DocumentStatus::parse(self.document_status.as_deref())
    }

    /// Estado operacional parseado; valores desconocidos cuentan como inactive
    pub fn operational_status(&self) -> OperationalStatus {
        OperationalStatus::parse(&self.driver_status).unwrap_or(OperationalStatus::Inactive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admission_status_parse_accepts_active_alias() {
        assert_eq!(AdmissionStatus::parse("active"), Some(AdmissionStatus::Approved));
        assert_eq!(AdmissionStatus::parse("APPROVED"), Some(AdmissionStatus::Approved));
        assert_eq!(AdmissionStatus::parse("Suspended"), Some(AdmissionStatus::Suspended));
        assert_eq!(AdmissionStatus::parse("bogus"), None);
    }

    #[test]
    fn test_document_status_parse_treats_missing_as_unset() {
        assert_eq!(DocumentStatus::parse(None), DocumentStatus::Unset);
        assert_eq!(DocumentStatus::parse(Some("")), DocumentStatus::Unset);
        assert_eq!(DocumentStatus::parse(Some("approved")), DocumentStatus::Approved);
    }
}
