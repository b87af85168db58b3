//! Central Configuration Constants
//!
//! Single source of truth for file names, formats and defaults.

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "HeartCheck";

/// Title printed at the top of every report page
pub const REPORT_TITLE: &str = "Heart Disease Prediction Report";

/// Wall-clock format used in reports and history exports
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ============================================
// Downloads
// ============================================

pub const REPORT_FILENAME: &str = "Heart_Health_Report.pdf";
pub const REPORT_MIME: &str = "application/pdf";

pub const HISTORY_FILENAME: &str = "prediction_log.csv";
pub const HISTORY_MIME: &str = "text/csv";

// ============================================
// Default artifact locations
// ============================================

pub const DEFAULT_MODEL_PATH: &str = "heart_disease_model.json";
pub const DEFAULT_SCALER_PATH: &str = "scaler.json";
pub const DEFAULT_CREDENTIALS_PATH: &str = "users.csv";
