//! Modelos del sistema
//!
//! Este módulo contiene todos los modelos de datos que mapean
//! al schema PostgreSQL con las convenciones estándar.

pub mod booking;
pub mod driver;
pub mod otp;
pub mod passenger;
pub mod pricing;
