//! Repositorios
//!
//! Acceso a datos con SQLx; una struct por agregado.

pub mod booking_repository;
pub mod driver_repository;
pub mod otp_repository;
pub mod passenger_repository;
pub mod pricing_repository;
