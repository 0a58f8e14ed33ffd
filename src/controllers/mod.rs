//! Controllers
//!
//! Orquestación request -> validación -> servicio/repositorio -> response.

pub mod admin_controller;
pub mod driver_controller;
pub mod phone_auth_controller;
pub mod pricing_controller;
