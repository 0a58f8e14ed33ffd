//! Rutas de la API
//!
//! Ensamblado del router completo con CORS y rate limiting sobre los
//! endpoints de phone-auth.

pub mod admin_routes;
pub mod auth_routes;
pub mod driver_routes;
pub mod pricing_routes;

use axum::{middleware::from_fn_with_state, response::Json, routing::get, Router};
use serde_json::json;

use crate::middleware::cors::cors_middleware;
use crate::middleware::rate_limit::{rate_limit_middleware, RateLimitState};
use crate::state::AppState;

/// Construir la aplicación completa sobre el estado dado.
pub fn create_app(state: AppState) -> Router {
    let rate_limit_state = RateLimitState::new(&state.config);

    let auth_router = auth_routes::create_auth_router()
        .layer(from_fn_with_state(rate_limit_state, rate_limit_middleware));

    Router::new()
        .route("/health", get(health))
        .nest("/auth", auth_router)
        .nest("/drivers", driver_routes::create_driver_router())
        .nest("/admin", admin_routes::create_admin_router())
        .nest("/pricing", pricing_routes::create_pricing_router())
        .layer(cors_middleware())
        .with_state(state)
}

/// Health check simple
async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "service": "ride-hailing",
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
