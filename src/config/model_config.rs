//! Model artifact configuration parsing from environment variables.

use std::env;
use std::path::PathBuf;

pub const DEFAULT_MODEL_PATH: &str = "models/xrp_xgb_model.joblib";
pub const DEFAULT_ARIMA_PATH: &str = "models/arima_xrp.pkl";
pub const DEFAULT_MODEL_VERSION: &str = "v1.0";

/// Model environment configuration
#[derive(Debug, Clone)]
pub struct ModelEnvConfig {
    /// Required tabular model artifact
    pub model_path: PathBuf,
    /// Optional sequential forecaster artifact
    pub arima_path: PathBuf,
    /// Free-form version shown in service metadata
    pub model_version: String,
}

impl Default for ModelEnvConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            arima_path: PathBuf::from(DEFAULT_ARIMA_PATH),
            model_version: DEFAULT_MODEL_VERSION.to_string(),
        }
    }
}

impl ModelEnvConfig {
    pub fn from_env() -> Self {
        Self {
            model_path: env::var("MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_MODEL_PATH)),
            arima_path: env::var("ARIMA_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_ARIMA_PATH)),
            model_version: env::var("MODEL_VERSION")
                .unwrap_or_else(|_| DEFAULT_MODEL_VERSION.to_string()),
        }
    }
}
