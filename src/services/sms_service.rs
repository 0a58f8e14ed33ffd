//! Cliente del proveedor SMS
//!
//! Este módulo encapsula el gateway SMS (GeezSMS) detrás de un contrato
//! mínimo: (phone, msg) -> receipt | error. El timeout está acotado a 15s;
//! los callers deciden si un fallo es fatal (el motor OTP lo ignora).

use serde_json::json;
use thiserror::Error;

use crate::config::environment::EnvironmentConfig;

/// Errores del envío de SMS
#[derive(Error, Debug)]
pub enum SmsError {
    #[error("SMS provider error: {0}")]
    Provider(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Receipt devuelto por el proveedor
#[derive(Debug, Clone)]
pub struct SmsReceipt {
    pub data: serde_json::Value,
}

/// Cliente SMS con timeout acotado
#[derive(Clone)]
pub struct SmsService {
    client: reqwest::Client,
    base_url: String,
    token: String,
    sender_id: Option<String>,
    shortcode_id: Option<String>,
}

impl SmsService {
    pub fn new(config: &EnvironmentConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.sms_timeout_seconds))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: config.geezsms_base_url.trim_end_matches('/').to_string(),
            token: config.geezsms_token.clone(),
            sender_id: config.geezsms_sender_id.clone(),
            shortcode_id: config.geezsms_shortcode_id.clone(),
        }
    }

    /// Enviar un SMS individual.
    pub async fn send_single_sms(&self, phone: &str, msg: &str) -> Result<SmsReceipt, SmsError> {
        let url = format!("{}/sms/send", self.base_url);

        let mut payload = json!({ "phone": phone, "msg": msg });
        if let Some(sender_id) = &self.sender_id {
            payload["sender_id"] = json!(sender_id);
        }
        if let Some(shortcode_id) = &self.shortcode_id {
            payload["shortcode_id"] = json!(shortcode_id);
        }

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .header("X-GeezSMS-Key", &self.token)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        let body: serde_json::Value = response.json().await.unwrap_or_else(|_| json!({}));

        if !status.is_success() {
            let message = body
                .get("message")
                .or_else(|| body.get("msg"))
                .or_else(|| body.get("error"))
                .or_else(|| body.get("detail"))
                .and_then(|v| v.as_str())
                .unwrap_or("Failed to send SMS")
                .to_string();
            return Err(SmsError::Provider(format!("{} ({})", message, status)));
        }

        Ok(SmsReceipt { data: body })
    }
}
