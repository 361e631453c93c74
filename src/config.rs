use std::env;

use crate::errors::AppError;
use crate::models::Catalog;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub clinic_name: String,
    pub twilio_account_sid: String,
    pub twilio_auth_token: String,
    pub twilio_phone_number: String,
    pub catalog_path: Option<String>,
    pub form_ttl_minutes: i64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            clinic_name: env::var("CLINIC_NAME").unwrap_or_else(|_| "Dr. Tang's Clinic".to_string()),
            twilio_account_sid: env::var("TWILIO_ACCOUNT_SID").unwrap_or_default(),
            twilio_auth_token: env::var("TWILIO_AUTH_TOKEN").unwrap_or_default(),
            twilio_phone_number: env::var("TWILIO_PHONE_NUMBER").unwrap_or_default(),
            catalog_path: env::var("APPOINTMENT_CATALOG_PATH")
                .ok()
                .filter(|p| !p.is_empty()),
            form_ttl_minutes: env::var("FORM_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|m| *m > 0)
                .unwrap_or(30),
        }
    }

    pub fn twilio_configured(&self) -> bool {
        !self.twilio_account_sid.is_empty()
            && !self.twilio_auth_token.is_empty()
            && !self.twilio_phone_number.is_empty()
    }

    pub fn load_catalog(&self) -> Result<Catalog, AppError> {
        let Some(path) = &self.catalog_path else {
            return Ok(Catalog::default_clinic());
        };
        let raw = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("reading {path}: {e}")))?;
        Catalog::from_json(&raw).map_err(|e| AppError::Config(format!("parsing {path}: {e}")))
    }
}
