//! Máquina de estados de elegibilidad del driver
//!
//! Tres ejes independientes pero interrelacionados: estado de admisión de la
//! cuenta (`status`), estado de revisión de documentos (`documentStatus`) y
//! estado operacional (`driverStatus`), más los flags `verification` y
//! `availability`. Cada operación es una función de transición pura
//! (estado actual, acción) -> (actualización | error); los controllers
//! aplican la actualización vía repositorio.
//!
//! Nota: la elegibilidad de booking usa OR entre admisión aprobada y
//! documentos aprobados. Varios endpoints dependen de esa semántica; no
//! cambiarla a AND sin una decisión de producto.

use serde::Serialize;
use thiserror::Error;

use crate::models::driver::{AdmissionStatus, DocumentStatus, Driver, OperationalStatus};

/// Documentos exigidos en la subida de archivos del driver
pub const UPLOAD_REQUIRED_DOCS: [&str; 5] = [
    "nationalIdFile",
    "vehicleRegistrationFile",
    "insuranceFile",
    "document",
    "drivingLicenseFile",
];

/// Campos exigidos para la aprobación por un admin (más amplio que la subida)
pub const APPROVAL_REQUIRED_FIELDS: [&str; 8] = [
    "carPlate",
    "carModel",
    "carColor",
    "drivingLicenseFile",
    "document",
    "nationalIdFile",
    "vehicleRegistrationFile",
    "insuranceFile",
];

/// Campos reportados como faltantes al consultar elegibilidad de booking
/// (sin la licencia de conducir)
pub const ELIGIBILITY_REQUIRED_FIELDS: [&str; 7] = [
    "carPlate",
    "carModel",
    "carColor",
    "document",
    "nationalIdFile",
    "vehicleRegistrationFile",
    "insuranceFile",
];

/// Errores de la máquina de estados del driver
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DriverStatusError {
    #[error("Missing required documents")]
    MissingDocuments { missing: Vec<String> },

    #[error("Missing required fields for approval")]
    MissingApprovalFields { missing: Vec<String> },

    #[error("Invalid status. Allowed values: pending, approved, suspended, rejected.")]
    InvalidStatus,

    #[error("Cannot change availability. Your account is still pending approval. Please contact support.")]
    AccountPending,

    #[error("Cannot change availability. Your account has been suspended. Please contact support.")]
    AccountSuspended,

    #[error("Cannot change availability. Your driver status is suspended. Please contact support.")]
    DriverStatusSuspended,

    #[error("Cannot change availability. Your driver status is inactive. Please contact support.")]
    DriverStatusInactive,

    #[error("Cannot accept bookings. You are currently offline. Please toggle your availability.")]
    Offline,
}

/// Actualización resultante de una transición; solo los campos presentes
/// se escriben sobre el driver.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DriverUpdate {
    pub status: Option<&'static str>,
    pub document_status: Option<&'static str>,
    pub verification: Option<bool>,
    pub availability: Option<bool>,
    pub driving_license_file: Option<String>,
    pub document: Option<String>,
    pub national_id_file: Option<String>,
    pub vehicle_registration_file: Option<String>,
    pub insurance_file: Option<String>,
}

impl DriverUpdate {
    pub fn is_empty(&self) -> bool {
        self == &DriverUpdate::default()
    }
}

/// Archivos recibidos en una subida de documentos
#[derive(Debug, Clone, Default)]
pub struct DocumentUpload {
    pub national_id_file: Option<String>,
    pub vehicle_registration_file: Option<String>,
    pub insurance_file: Option<String>,
    pub document: Option<String>,
    pub driving_license_file: Option<String>,
}

impl DocumentUpload {
    pub fn is_empty(&self) -> bool {
        self.national_id_file.is_none()
            && self.vehicle_registration_file.is_none()
            && self.insurance_file.is_none()
            && self.document.is_none()
            && self.driving_license_file.is_none()
    }
}

/// Cambio de estado solicitado por un admin en el endpoint genérico
#[derive(Debug, Clone, Default)]
pub struct StatusChange {
    pub status: Option<String>,
    pub verification: Option<bool>,
    pub document_status: Option<String>,
    pub availability: Option<bool>,
}

/// Resultado de la consulta de elegibilidad de booking
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingEligibility {
    pub eligible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub missing: Vec<String>,
    pub status: String,
    pub driver_status: String,
}

fn field_value<'a>(driver: &'a Driver, field: &str) -> Option<&'a str> {
    match field {
        "carPlate" => driver.car_plate.as_deref(),
        "carModel" => driver.car_model.as_deref(),
        "carColor" => driver.car_color.as_deref(),
        "drivingLicenseFile" => driver.driving_license_file.as_deref(),
        "document" => driver.document.as_deref(),
        "nationalIdFile" => driver.national_id_file.as_deref(),
        "vehicleRegistrationFile" => driver.vehicle_registration_file.as_deref(),
        "insuranceFile" => driver.insurance_file.as_deref(),
        _ => None,
    }
}

/// Campos requeridos que están vacíos o ausentes en el driver
pub fn missing_fields(driver: &Driver, required: &[&str]) -> Vec<String> {
    required
        .iter()
        .filter(|field| matches!(field_value(driver, field), None | Some("")))
        .map(|field| field.to_string())
        .collect()
}

/// Subida de documentos iniciada por el driver.
///
/// La unión de los archivos subidos con los ya almacenados debe cubrir el
/// set requerido completo; si falta alguno no se muta nada. Con el set
/// completo, la cuenta vuelve a revisión: documentStatus=pending,
/// status=pending, verification=false.
pub fn apply_document_upload(
    driver: &Driver,
    upload: &DocumentUpload,
) -> Result<DriverUpdate, DriverStatusError> {
    let merged = |uploaded: &Option<String>, stored: Option<&str>| {
        uploaded.as_deref().filter(|v| !v.is_empty()).or(stored.filter(|v| !v.is_empty())).is_some()
    };

    let mut missing = Vec::new();
    for field in UPLOAD_REQUIRED_DOCS {
        let present = match field {
            "nationalIdFile" => merged(&upload.national_id_file, driver.national_id_file.as_deref()),
            "vehicleRegistrationFile" => {
                merged(&upload.vehicle_registration_file, driver.vehicle_registration_file.as_deref())
            }
            "insuranceFile" => merged(&upload.insurance_file, driver.insurance_file.as_deref()),
            "document" => merged(&upload.document, driver.document.as_deref()),
            "drivingLicenseFile" => {
                merged(&upload.driving_license_file, driver.driving_license_file.as_deref())
            }
            _ => false,
        };
        if !present {
            missing.push(field.to_string());
        }
    }
    if !missing.is_empty() {
        return Err(DriverStatusError::MissingDocuments { missing });
    }

    // Sin archivos nuevos no hay nada que re-revisar
    if upload.is_empty() {
        return Ok(DriverUpdate::default());
    }

    Ok(DriverUpdate {
        status: Some(AdmissionStatus::Pending.as_str()),
        document_status: Some(DocumentStatus::Pending.as_str()),
        verification: Some(false),
        national_id_file: upload.national_id_file.clone(),
        vehicle_registration_file: upload.vehicle_registration_file.clone(),
        insurance_file: upload.insurance_file.clone(),
        document: upload.document.clone(),
        driving_license_file: upload.driving_license_file.clone(),
        ..DriverUpdate::default()
    })
}

/// Aprobación completa por un admin: admisión + documentos + verificación.
pub fn approve(driver: &Driver) -> Result<DriverUpdate, DriverStatusError> {
    let missing = missing_fields(driver, &APPROVAL_REQUIRED_FIELDS);
    if !missing.is_empty() {
        return Err(DriverStatusError::MissingApprovalFields { missing });
    }
    Ok(DriverUpdate {
        status: Some(AdmissionStatus::Approved.as_str()),
        document_status: Some(DocumentStatus::Approved.as_str()),
        verification: Some(true),
        ..DriverUpdate::default()
    })
}

/// Aprobación solo de documentos, sin tocar la admisión.
pub fn approve_documents(driver: &Driver) -> Result<DriverUpdate, DriverStatusError> {
    let missing = missing_fields(driver, &APPROVAL_REQUIRED_FIELDS);
    if !missing.is_empty() {
        return Err(DriverStatusError::MissingApprovalFields { missing });
    }
    Ok(DriverUpdate {
        document_status: Some(DocumentStatus::Approved.as_str()),
        ..DriverUpdate::default()
    })
}

/// Rechazo de documentos: incondicional.
pub fn reject_documents(_driver: &Driver) -> DriverUpdate {
    DriverUpdate {
        document_status: Some(DocumentStatus::Rejected.as_str()),
        ..DriverUpdate::default()
    }
}

/// Endpoint genérico de estado del admin.
///
/// Acepta además overrides directos de verification/documentStatus/
/// availability; un cambio a `approved` re-verifica el set de campos de
/// aprobación y cada estado destino aplica sus efectos secundarios.
pub fn apply_status_change(
    driver: &Driver,
    change: &StatusChange,
) -> Result<DriverUpdate, DriverStatusError> {
    let mut update = DriverUpdate::default();

    if let Some(verification) = change.verification {
        update.verification = Some(verification);
    }
    if let Some(document_status) = &change.document_status {
        update.document_status = Some(match DocumentStatus::parse(Some(document_status)) {
            DocumentStatus::Pending => DocumentStatus::Pending.as_str(),
            DocumentStatus::Approved => DocumentStatus::Approved.as_str(),
            DocumentStatus::Rejected => DocumentStatus::Rejected.as_str(),
            DocumentStatus::Unset => DocumentStatus::Unset.as_str(),
        });
    }
    if let Some(availability) = change.availability {
        update.availability = Some(availability);
    }

    if let Some(raw_status) = &change.status {
        let target = AdmissionStatus::parse(raw_status).ok_or(DriverStatusError::InvalidStatus)?;

        if target == AdmissionStatus::Approved {
            let missing = missing_fields(driver, &APPROVAL_REQUIRED_FIELDS);
            if !missing.is_empty() {
                return Err(DriverStatusError::MissingApprovalFields { missing });
            }
        }

        update.status = Some(target.as_str());
        match target {
            AdmissionStatus::Approved => {
                update.verification = Some(true);
                update.document_status = Some(DocumentStatus::Approved.as_str());
            }
            AdmissionStatus::Pending => {
                update.verification = Some(false);
                update.document_status = Some(DocumentStatus::Pending.as_str());
            }
            AdmissionStatus::Suspended => {
                update.availability = Some(false);
            }
            AdmissionStatus::Rejected => {
                update.verification = Some(false);
                update.document_status = Some(DocumentStatus::Rejected.as_str());
            }
        }
    }

    Ok(update)
}

/// Toggle de disponibilidad iniciado por el propio driver.
pub fn toggle_availability(driver: &Driver) -> Result<DriverUpdate, DriverStatusError> {
    match driver.admission_status() {
        AdmissionStatus::Pending => return Err(DriverStatusError::AccountPending),
        AdmissionStatus::Suspended => return Err(DriverStatusError::AccountSuspended),
        _ => {}
    }
    match driver.operational_status() {
        OperationalStatus::Suspended => return Err(DriverStatusError::DriverStatusSuspended),
        OperationalStatus::Inactive => return Err(DriverStatusError::DriverStatusInactive),
        OperationalStatus::Active => {}
    }
    Ok(DriverUpdate {
        availability: Some(!driver.availability),
        ..DriverUpdate::default()
    })
}

/// Predicado derivado de elegibilidad de booking.
///
/// approvalEligible = admisión aprobada OR documentos aprobados (semántica
/// OR intencional); statusEligible = estado operacional activo.
pub fn booking_eligibility(driver: &Driver) -> BookingEligibility {
    let approval_eligible = driver.admission_status() == AdmissionStatus::Approved
        || driver.document_status() == DocumentStatus::Approved;
    let status_eligible = driver.operational_status() == OperationalStatus::Active;
    let eligible = approval_eligible && status_eligible;

    if eligible {
        return BookingEligibility {
            eligible: true,
            reason: None,
            missing: Vec::new(),
            status: driver.status.clone(),
            driver_status: driver.driver_status.clone(),
        };
    }

    let missing = missing_fields(driver, &ELIGIBILITY_REQUIRED_FIELDS);
    let doc_state = driver
        .document_status
        .as_deref()
        .filter(|v| !v.is_empty())
        .unwrap_or("not submitted");

    let reason = if !approval_eligible {
        if driver.admission_status() != AdmissionStatus::Approved {
            format!("Account status is '{}'. Approval required.", driver.status)
        } else {
            format!("Driver documents are '{}'. Approval required.", doc_state)
        }
    } else {
        format!(
            "Driver status is '{}'. Active status required to accept bookings.",
            driver.driver_status
        )
    };

    BookingEligibility {
        eligible: false,
        reason: Some(reason),
        missing,
        status: driver.status.clone(),
        driver_status: driver.driver_status.clone(),
    }
}

/// Gate completo para aceptar bookings: elegibilidad + disponibilidad online.
pub fn can_accept_bookings(driver: &Driver) -> Result<(), DriverStatusError> {
    match driver.admission_status() {
        AdmissionStatus::Pending => return Err(DriverStatusError::AccountPending),
        AdmissionStatus::Suspended => return Err(DriverStatusError::AccountSuspended),
        _ => {}
    }
    match driver.operational_status() {
        OperationalStatus::Suspended => return Err(DriverStatusError::DriverStatusSuspended),
        OperationalStatus::Inactive => return Err(DriverStatusError::DriverStatusInactive),
        OperationalStatus::Active => {}
    }
    if !driver.availability {
        return Err(DriverStatusError::Offline);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn complete_driver() -> Driver {
        Driver {
            id: 1,
            name: "Abebe".to_string(),
            phone: "+251911223344".to_string(),
            password: "hashed".to_string(),
            email: None,
            wallet: Decimal::ZERO,
            rating: 5.0,
            reward_points: 0,
            driving_license_file: Some("license.jpg".to_string()),
            document: Some("doc.jpg".to_string()),
            national_id_file: Some("id.jpg".to_string()),
            vehicle_registration_file: Some("reg.jpg".to_string()),
            insurance_file: Some("ins.jpg".to_string()),
            car_name: Some("Corolla".to_string()),
            vehicle_type: Some("mini".to_string()),
            car_plate: Some("AA-12345".to_string()),
            car_model: Some("2018".to_string()),
            car_color: Some("white".to_string()),
            availability: false,
            bank_account_no: None,
            verification: false,
            payment_preference: None,
            emergency_contacts: None,
            document_status: Some("pending".to_string()),
            driver_status: "active".to_string(),
            status: "pending".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_approve_fails_with_missing_plate() {
        let mut driver = complete_driver();
        driver.car_plate = Some("".to_string());
        let err = approve(&driver).unwrap_err();
        match err {
            DriverStatusError::MissingApprovalFields { missing } => {
                assert_eq!(missing, vec!["carPlate".to_string()]);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_approve_sets_all_three_flags() {
        let driver = complete_driver();
        let update = approve(&driver).unwrap();
        assert_eq!(update.status, Some("approved"));
        assert_eq!(update.document_status, Some("approved"));
        assert_eq!(update.verification, Some(true));
    }

    #[test]
    fn test_upload_missing_documents_lists_fields_and_mutates_nothing() {
        let mut driver = complete_driver();
        driver.insurance_file = None;
        driver.document = None;
        let upload = DocumentUpload {
            document: Some("new-doc.jpg".to_string()),
            ..DocumentUpload::default()
        };
        let err = apply_document_upload(&driver, &upload).unwrap_err();
        match err {
            DriverStatusError::MissingDocuments { missing } => {
                assert_eq!(missing, vec!["insuranceFile".to_string()]);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_upload_complete_set_resets_review_state() {
        let mut driver = complete_driver();
        driver.status = "approved".to_string();
        driver.document_status = Some("approved".to_string());
        driver.verification = true;
        let upload = DocumentUpload {
            insurance_file: Some("ins-v2.jpg".to_string()),
            ..DocumentUpload::default()
        };
        let update = apply_document_upload(&driver, &upload).unwrap();
        assert_eq!(update.status, Some("pending"));
        assert_eq!(update.document_status, Some("pending"));
        assert_eq!(update.verification, Some(false));
        assert_eq!(update.insurance_file, Some("ins-v2.jpg".to_string()));
    }

    #[test]
    fn test_reject_documents_is_unconditional() {
        let mut driver = complete_driver();
        driver.car_plate = None;
        let update = reject_documents(&driver);
        assert_eq!(update.document_status, Some("rejected"));
        assert_eq!(update.status, None);
    }

    #[test]
    fn test_status_change_accepts_active_alias() {
        let driver = complete_driver();
        let change = StatusChange {
            status: Some("Active".to_string()),
            ..StatusChange::default()
        };
        let update = apply_status_change(&driver, &change).unwrap();
        assert_eq!(update.status, Some("approved"));
        assert_eq!(update.verification, Some(true));
        assert_eq!(update.document_status, Some("approved"));
    }

    #[test]
    fn test_status_change_rejects_unknown_status() {
        let driver = complete_driver();
        let change = StatusChange {
            status: Some("banished".to_string()),
            ..StatusChange::default()
        };
        assert_eq!(
            apply_status_change(&driver, &change).unwrap_err(),
            DriverStatusError::InvalidStatus
        );
    }

    #[test]
    fn test_status_change_approved_rechecks_documents() {
        let mut driver = complete_driver();
        driver.national_id_file = None;
        let change = StatusChange {
            status: Some("approved".to_string()),
            ..StatusChange::default()
        };
        assert!(matches!(
            apply_status_change(&driver, &change),
            Err(DriverStatusError::MissingApprovalFields { .. })
        ));
    }

    #[test]
    fn test_status_change_suspended_forces_offline() {
        let driver = complete_driver();
        let change = StatusChange {
            status: Some("suspended".to_string()),
            ..StatusChange::default()
        };
        let update = apply_status_change(&driver, &change).unwrap();
        assert_eq!(update.status, Some("suspended"));
        assert_eq!(update.availability, Some(false));
    }

    #[test]
    fn test_status_change_rejected_clears_verification() {
        let driver = complete_driver();
        let change = StatusChange {
            status: Some("rejected".to_string()),
            ..StatusChange::default()
        };
        let update = apply_status_change(&driver, &change).unwrap();
        assert_eq!(update.status, Some("rejected"));
        assert_eq!(update.verification, Some(false));
        assert_eq!(update.document_status, Some("rejected"));
    }

    #[test]
    fn test_toggle_availability_blocked_while_pending() {
        let driver = complete_driver();
        assert_eq!(
            toggle_availability(&driver).unwrap_err(),
            DriverStatusError::AccountPending
        );
    }

    #[test]
    fn test_toggle_availability_blocked_by_operational_status() {
        let mut driver = complete_driver();
        driver.status = "approved".to_string();
        driver.driver_status = "suspended".to_string();
        assert_eq!(
            toggle_availability(&driver).unwrap_err(),
            DriverStatusError::DriverStatusSuspended
        );

        driver.driver_status = "inactive".to_string();
        assert_eq!(
            toggle_availability(&driver).unwrap_err(),
            DriverStatusError::DriverStatusInactive
        );
    }

    #[test]
    fn test_toggle_availability_flips_flag() {
        let mut driver = complete_driver();
        driver.status = "approved".to_string();
        let update = toggle_availability(&driver).unwrap();
        assert_eq!(update.availability, Some(true));

        driver.availability = true;
        let update = toggle_availability(&driver).unwrap();
        assert_eq!(update.availability, Some(false));
    }

    #[test]
    fn test_booking_eligibility_uses_or_between_axes() {
        // Admisión no aprobada pero documentos aprobados: sigue siendo elegible
        let mut driver = complete_driver();
        driver.status = "pending".to_string();
        driver.document_status = Some("approved".to_string());
        driver.driver_status = "active".to_string();
        let result = booking_eligibility(&driver);
        assert!(result.eligible);

        // Admisión aprobada pero documentos rechazados: también elegible
        driver.status = "approved".to_string();
        driver.document_status = Some("rejected".to_string());
        let result = booking_eligibility(&driver);
        assert!(result.eligible);
    }

    #[test]
    fn test_booking_eligibility_reports_account_axis() {
        let mut driver = complete_driver();
        driver.status = "pending".to_string();
        driver.document_status = Some("pending".to_string());
        driver.car_plate = None;
        let result = booking_eligibility(&driver);
        assert!(!result.eligible);
        assert_eq!(
            result.reason.as_deref(),
            Some("Account status is 'pending'. Approval required.")
        );
        assert_eq!(result.missing, vec!["carPlate".to_string()]);
    }

    #[test]
    fn test_booking_eligibility_reports_operational_axis() {
        let mut driver = complete_driver();
        driver.status = "approved".to_string();
        driver.document_status = Some("approved".to_string());
        driver.driver_status = "inactive".to_string();
        let result = booking_eligibility(&driver);
        assert!(!result.eligible);
        assert_eq!(
            result.reason.as_deref(),
            Some("Driver status is 'inactive'. Active status required to accept bookings.")
        );
    }

    #[test]
    fn test_eligibility_missing_set_excludes_license() {
        let mut driver = complete_driver();
        driver.status = "pending".to_string();
        driver.document_status = None;
        driver.driving_license_file = None;
        let result = booking_eligibility(&driver);
        assert!(!result.missing.contains(&"drivingLicenseFile".to_string()));
    }

    #[test]
    fn test_can_accept_bookings_requires_online() {
        let mut driver = complete_driver();
        driver.status = "approved".to_string();
        driver.availability = false;
        assert_eq!(can_accept_bookings(&driver).unwrap_err(), DriverStatusError::Offline);

        driver.availability = true;
        assert!(can_accept_bookings(&driver).is_ok());
    }
}
