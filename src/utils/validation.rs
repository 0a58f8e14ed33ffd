//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! de requests antes de tocar la base de datos.

use validator::ValidationError;

/// Tipos de vehículo que un driver puede declarar en su perfil
pub const DRIVER_VEHICLE_TYPES: [&str; 3] = ["mini", "sedan", "van"];

/// Validar que un string no esté vacío
pub fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_empty");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Acotar un rating a [0, 5]
pub fn clamp_rating(value: f64) -> f64 {
    value.clamp(0.0, 5.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_not_empty() {
        assert!(validate_not_empty("x").is_ok());
        assert!(validate_not_empty("").is_err());
        assert!(validate_not_empty("   ").is_err());
    }

    #[test]
    fn test_clamp_rating() {
        assert_eq!(clamp_rating(7.5), 5.0);
        assert_eq!(clamp_rating(-1.0), 0.0);
        assert_eq!(clamp_rating(4.2), 4.2);
    }
}
