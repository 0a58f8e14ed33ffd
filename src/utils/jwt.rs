//! Utilidades JWT
//!
//! Este módulo contiene funciones helper para la emisión y verificación de
//! tokens de acceso y refresh. El resto del core lo trata como un servicio
//! de tokens opaco.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::environment::EnvironmentConfig;
use crate::utils::errors::AppError;

/// Claims del JWT token
#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,       // user id
    pub user_type: String, // passenger | driver | admin | staff
    pub token_use: String, // access | refresh
    pub exp: usize,        // expiration timestamp
    pub iat: usize,        // issued at timestamp
}

/// Configuración de JWT
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub access_expiration: u64,
    pub refresh_expiration: u64,
}

impl From<&EnvironmentConfig> for JwtConfig {
    fn from(config: &EnvironmentConfig) -> Self {
        Self {
            secret: config.jwt_secret.clone(),
            access_expiration: config.jwt_access_expiration,
            refresh_expiration: config.jwt_refresh_expiration,
        }
    }
}

/// Par de tokens emitido tras una verificación exitosa
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

fn generate_token(
    user_id: i64,
    user_type: &str,
    token_use: &str,
    expiration_seconds: u64,
    config: &JwtConfig,
) -> Result<String, AppError> {
    let now = chrono::Utc::now();
    let expires_at = now + chrono::Duration::seconds(expiration_seconds as i64);

    let claims = JwtClaims {
        sub: user_id.to_string(),
        user_type: user_type.to_string(),
        token_use: token_use.to_string(),
        exp: expires_at.timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    let encoding_key = EncodingKey::from_secret(config.secret.as_ref());

    encode(&Header::default(), &claims, &encoding_key)
        .map_err(|e| AppError::Jwt(format!("Error generando token: {}", e)))
}

/// Generar token de acceso para un usuario
pub fn generate_access_token(
    user_id: i64,
    user_type: &str,
    config: &JwtConfig,
) -> Result<String, AppError> {
    generate_token(user_id, user_type, "access", config.access_expiration, config)
}

/// Generar token de refresh para un usuario
pub fn generate_refresh_token(
    user_id: i64,
    user_type: &str,
    config: &JwtConfig,
) -> Result<String, AppError> {
    generate_token(user_id, user_type, "refresh", config.refresh_expiration, config)
}

/// Generar el par access/refresh
pub fn generate_token_pair(
    user_id: i64,
    user_type: &str,
    config: &JwtConfig,
) -> Result<TokenPair, AppError> {
    Ok(TokenPair {
        access_token: generate_access_token(user_id, user_type, config)?,
        refresh_token: generate_refresh_token(user_id, user_type, config)?,
    })
}

/// Verificar y decodificar JWT token
pub fn verify_token(token: &str, config: &JwtConfig) -> Result<JwtClaims, AppError> {
    let decoding_key = DecodingKey::from_secret(config.secret.as_ref());

    let token_data = decode::<JwtClaims>(token, &decoding_key, &Validation::default())
        .map_err(|e| AppError::Jwt(format!("Token inválido: {}", e)))?;

    Ok(token_data.claims)
}

/// Verificar un token de acceso (rechaza tokens de refresh)
pub fn verify_access_token(token: &str, config: &JwtConfig) -> Result<JwtClaims, AppError> {
    let claims = verify_token(token, config)?;
    if claims.token_use != "access" {
        return Err(AppError::Jwt("Se esperaba un token de acceso".to_string()));
    }
    Ok(claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "test_secret".to_string(),
            access_expiration: 3600,
            refresh_expiration: 86400,
        }
    }

    #[test]
    fn test_token_round_trip() {
        let config = test_config();
        let token = generate_access_token(42, "driver", &config).unwrap();
        let claims = verify_access_token(&token, &config).unwrap();
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.user_type, "driver");
        assert_eq!(claims.token_use, "access");
    }

    #[test]
    fn test_refresh_token_is_not_an_access_token() {
        let config = test_config();
        let pair = generate_token_pair(7, "passenger", &config).unwrap();
        assert!(verify_access_token(&pair.access_token, &config).is_ok());
        assert!(verify_access_token(&pair.refresh_token, &config).is_err());
    }

    #[test]
    fn test_invalid_secret_rejected() {
        let config = test_config();
        let token = generate_access_token(1, "passenger", &config).unwrap();
        let other = JwtConfig { secret: "other".to_string(), ..test_config() };
        assert!(verify_token(&token, &other).is_err());
    }
}
