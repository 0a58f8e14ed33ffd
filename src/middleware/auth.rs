//! Middleware de autenticación
//!
//! Extractor del usuario autenticado a partir del header Authorization.
//! Los handlers declaran `AuthUser` como argumento y el chequeo de rol se
//! hace con los helpers `require_*`.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::jwt::{verify_access_token, JwtConfig};

/// Tipo de usuario autenticado
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserType {
    Passenger,
    Driver,
    Admin,
    Staff,
}

impl UserType {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "passenger" => Some(UserType::Passenger),
            "driver" => Some(UserType::Driver),
            "admin" => Some(UserType::Admin),
            "staff" => Some(UserType::Staff),
            _ => None,
        }
    }
}

/// Usuario autenticado extraído del token
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: i64,
    pub user_type: UserType,
}

impl AuthUser {
    /// El endpoint es solo para drivers.
    pub fn require_driver(&self, action: &str) -> Result<(), AppError> {
        if self.user_type != UserType::Driver {
            return Err(AppError::Forbidden(format!("Only drivers can {}", action)));
        }
        Ok(())
    }

    /// El endpoint es solo para admins.
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.user_type != UserType::Admin {
            return Err(AppError::Forbidden("Admin access required".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("Authorization header is required".to_string()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Unauthorized("Bearer token is required".to_string()))?;

        let jwt_config = JwtConfig::from(&state.config);
        let claims = verify_access_token(token, &jwt_config)?;

        let id = claims
            .sub
            .parse::<i64>()
            .map_err(|_| AppError::Unauthorized("Invalid token subject".to_string()))?;
        let user_type = UserType::parse(&claims.user_type)
            .ok_or_else(|| AppError::Unauthorized("Invalid token user type".to_string()))?;

        Ok(AuthUser { id, user_type })
    }
}
