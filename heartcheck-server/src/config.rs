//! Configuration module

use std::env;
use std::path::PathBuf;

use heartcheck_core::constants::{
    DEFAULT_CREDENTIALS_PATH, DEFAULT_MODEL_PATH, DEFAULT_SCALER_PATH,
};

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// Classifier artifact (`.json` logistic regression or `.onnx`)
    pub model_path: PathBuf,

    /// Scaler artifact (JSON mean/scale)
    pub scaler_path: PathBuf,

    /// Credential CSV file
    pub credentials_path: PathBuf,

    /// Password storage: `argon2` or `plaintext`
    pub password_storage: String,

    /// JWT secret key
    pub jwt_secret: String,

    /// JWT expiration in hours
    pub jwt_expiration_hours: u64,

    /// Environment (development, production)
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),

            model_path: env::var("MODEL_PATH")
                .unwrap_or_else(|_| DEFAULT_MODEL_PATH.to_string())
                .into(),

            scaler_path: env::var("SCALER_PATH")
                .unwrap_or_else(|_| DEFAULT_SCALER_PATH.to_string())
                .into(),

            credentials_path: env::var("CREDENTIALS_PATH")
                .unwrap_or_else(|_| DEFAULT_CREDENTIALS_PATH.to_string())
                .into(),

            password_storage: env::var("PASSWORD_STORAGE")
                .unwrap_or_else(|_| "argon2".to_string()),

            jwt_secret: env::var("JWT_SECRET")
                .unwrap_or_else(|_| "heartcheck-secret-key-change-in-production".to_string()),

            jwt_expiration_hours: env::var("JWT_EXPIRATION_HOURS")
                .ok()
                .and_then(|h| h.parse().ok())
                .unwrap_or(24),

            environment: env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),
        }
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
