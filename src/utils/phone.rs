//! Normalización de números de teléfono
//!
//! Este módulo convierte los formatos locales etíopes (09XXXXXXXX / 07XXXXXXXX)
//! y sus variantes internacionales a la forma canónica "+251XXXXXXXXX".
//!
//! Hay dos puntos de entrada con distinta severidad:
//! - `normalize_phone`: best-effort, usado por los flujos de identidad/auth
//!   (request-otp, verify-otp, alta de pasajeros). Nunca falla; si el valor
//!   no es reconocible lo devuelve sin cambios y el caller decide.
//! - `strict_digits`: usado por el motor OTP vía
//!   `OtpService` (emisión/verificación). Devuelve `None` cuando los dígitos
//!   no cumplen el formato esperado y el motor lo convierte en
//!   `OtpError::InvalidPhoneFormat`.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref LOCAL_RE: Regex = Regex::new(r"^(09|07)\d{7,8}$").unwrap();
    static ref INTL_RE: Regex = Regex::new(r"^251(9|7)\d{7,8}$").unwrap();
    static ref LOCAL_EXACT_RE: Regex = Regex::new(r"^(09|07)\d{8}$").unwrap();
    static ref INTL_PLUS_RE: Regex = Regex::new(r"^\+?251(9|7)\d{8}$").unwrap();
}

/// Teléfono en forma canónica
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalPhone {
    /// Solo dígitos, con prefijo de país: "2519XXXXXXXX"
    pub digits: String,
    /// Forma E.164 para mostrar y para el proveedor SMS: "+2519XXXXXXXX"
    pub e164: String,
}

impl CanonicalPhone {
    fn from_digits(digits: String) -> Self {
        let e164 = format!("+{}", digits);
        Self { digits, e164 }
    }
}

fn clean_digits(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Normalización best-effort a "+251XXXXXXXXX".
///
/// Entradas no reconocibles se devuelven sin cambios.
pub fn normalize_phone(raw: &str) -> String {
    let cleaned = clean_digits(raw);
    if cleaned.starts_with("09") || cleaned.starts_with("07") {
        return format!("+251{}", &cleaned[1..]);
    }
    if cleaned.starts_with("251") {
        return format!("+{}", cleaned);
    }
    raw.to_string()
}

/// Normalización estricta a dígitos canónicos "251XXXXXXXXX".
///
/// `None` cuando los dígitos no cumplen `^(09|07)\d{7,8}$` ni
/// `^251(9|7)\d{7,8}$`.
pub fn strict_digits(raw: &str) -> Option<CanonicalPhone> {
    let cleaned = clean_digits(raw);
    if LOCAL_RE.is_match(&cleaned) {
        let digits = format!("251{}", &cleaned[1..]);
        return Some(CanonicalPhone::from_digits(digits));
    }
    if INTL_RE.is_match(&cleaned) {
        return Some(CanonicalPhone::from_digits(cleaned));
    }
    None
}

/// Pre-chequeo de formato usado por los controllers de phone-auth.
///
/// Acepta 09XXXXXXXX / 07XXXXXXXX (sobre los dígitos limpios) o
/// +2519XXXXXXXX / +2517XXXXXXXX (sobre el valor original).
pub fn is_valid_phone_number(raw: &str) -> bool {
    if raw.is_empty() {
        return false;
    }
    let cleaned = clean_digits(raw);
    LOCAL_EXACT_RE.is_match(&cleaned) || INTL_PLUS_RE.is_match(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_local_forms() {
        assert_eq!(normalize_phone("0911223344"), "+251911223344");
        assert_eq!(normalize_phone("0711223344"), "+251711223344");
        assert_eq!(normalize_phone("09 11 22 33 44"), "+251911223344");
    }

    #[test]
    fn test_normalize_international_forms() {
        assert_eq!(normalize_phone("251911223344"), "+251911223344");
        assert_eq!(normalize_phone("+251911223344"), "+251911223344");
    }

    #[test]
    fn test_normalize_is_idempotent_across_forms() {
        // Todas las variantes del mismo número producen la misma forma canónica
        let forms = ["0911223344", "251911223344", "+251911223344", "09-11-22-33-44"];
        for form in forms {
            let first = normalize_phone(form);
            assert_eq!(first, "+251911223344");
            assert_eq!(normalize_phone(&first), first);
        }
    }

    #[test]
    fn test_normalize_passes_through_unknown_input() {
        assert_eq!(normalize_phone("12345"), "12345");
        assert_eq!(normalize_phone("not-a-phone"), "not-a-phone");
    }

    #[test]
    fn test_strict_digits_accepts_valid_forms() {
        let canonical = strict_digits("0911223344").unwrap();
        assert_eq!(canonical.digits, "251911223344");
        assert_eq!(canonical.e164, "+251911223344");

        let canonical = strict_digits("+251711223344").unwrap();
        assert_eq!(canonical.digits, "251711223344");
    }

    #[test]
    fn test_strict_digits_rejects_invalid_forms() {
        assert!(strict_digits("").is_none());
        assert!(strict_digits("12345").is_none());
        assert!(strict_digits("0811223344").is_none());
        assert!(strict_digits("2518112233").is_none());
    }

    #[test]
    fn test_is_valid_phone_number() {
        assert!(is_valid_phone_number("0911223344"));
        assert!(is_valid_phone_number("0711223344"));
        assert!(is_valid_phone_number("+251911223344"));
        assert!(is_valid_phone_number("251911223344"));
        assert!(!is_valid_phone_number(""));
        assert!(!is_valid_phone_number("0811223344"));
        assert!(!is_valid_phone_number("hello"));
    }
}
