//! Controller de autenticación por teléfono
//!
//! request-otp crea (o encuentra) el passenger por su teléfono normalizado y
//! emite un código; verify-otp valida el código, marca la cuenta como
//! registrada y emite el par de tokens.

use bcrypt::{hash, DEFAULT_COST};
use rand::distributions::Alphanumeric;
use rand::Rng;

use crate::dto::auth_dto::{RequestOtpResponse, VerifyOtpResponse};
use crate::models::otp::OtpReference;
use crate::models::passenger::{Passenger, PassengerSummary};
use crate::repositories::driver_repository::DriverRepository;
use crate::repositories::otp_repository::OtpRepository;
use crate::repositories::passenger_repository::PassengerRepository;
use crate::services::otp_service::{OtpConfig, OtpService};
use crate::state::AppState;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::jwt::{generate_token_pair, JwtConfig};
use crate::utils::phone::{is_valid_phone_number, normalize_phone};

pub struct PhoneAuthController {
    passengers: PassengerRepository,
    otp: OtpService,
    jwt_config: JwtConfig,
}

impl PhoneAuthController {
    pub fn new(state: &AppState) -> Self {
        let pool = state.pool.clone();
        let otp = OtpService::new(
            OtpRepository::new(pool.clone()),
            PassengerRepository::new(pool.clone()),
            DriverRepository::new(pool.clone()),
            state.sms.clone(),
            OtpConfig::from(&state.config),
        );
        Self {
            passengers: PassengerRepository::new(pool),
            otp,
            jwt_config: JwtConfig::from(&state.config),
        }
    }

    fn validate_phone(phone: &str) -> AppResult<String> {
        if phone.is_empty() {
            return Err(AppError::BadRequest("Phone number is required".to_string()));
        }
        if !is_valid_phone_number(phone) {
            return Err(AppError::BadRequest(
                "Invalid phone number format. Use 09XXXXXXXX or 07XXXXXXXX".to_string(),
            ));
        }
        Ok(normalize_phone(phone))
    }

    /// Passenger existente por teléfono, o alta con password aleatorio.
    async fn find_or_create_passenger(&self, normalized_phone: &str) -> AppResult<Passenger> {
        if let Some(passenger) = self.passengers.find_by_phone(normalized_phone).await? {
            return Ok(passenger);
        }

        let random_password: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(10)
            .map(char::from)
            .collect::<String>()
            + "!A1";
        let hashed = hash(&random_password, DEFAULT_COST)?;

        let suffix_start = normalized_phone.len().saturating_sub(4);
        let name = format!("Passenger {}", &normalized_phone[suffix_start..]);

        let passenger = self
            .passengers
            .create(&name, normalized_phone, None, None, &hashed)
            .await?;
        Ok(passenger)
    }

    /// POST /auth/request-otp
    pub async fn request_otp(&self, phone: &str) -> AppResult<RequestOtpResponse> {
        let normalized = Self::validate_phone(phone)?;
        let passenger = self.find_or_create_passenger(&normalized).await?;

        let issued = self
            .otp
            .issue(&OtpReference::passenger(passenger.id), Some(&normalized))
            .await?;

        Ok(RequestOtpResponse {
            success: true,
            message: "OTP sent successfully".to_string(),
            phone_number: issued.phone_number,
            expires_in: issued.expires_in,
        })
    }

    /// POST /auth/verify-otp
    pub async fn verify_otp(&self, phone: &str, otp: &str) -> AppResult<VerifyOtpResponse> {
        if otp.is_empty() {
            return Err(AppError::BadRequest("Phone number and OTP are required".to_string()));
        }
        let normalized = Self::validate_phone(phone)?;
        let passenger = self.find_or_create_passenger(&normalized).await?;

        self.otp
            .verify(&OtpReference::passenger(passenger.id), Some(&normalized), otp)
            .await?;

        self.passengers.set_otp_registered(passenger.id).await?;

        let pair = generate_token_pair(passenger.id, "passenger", &self.jwt_config)?;

        Ok(VerifyOtpResponse {
            success: true,
            message: "OTP verified successfully. Account activated.".to_string(),
            passenger: PassengerSummary::from(&passenger),
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
        })
    }
}
