//! Utilidades del sistema
//!
//! Este módulo contiene utilidades para manejo de errores, validación,
//! JWT y normalización de teléfonos.

pub mod errors;
pub mod jwt;
pub mod phone;
pub mod validation;
