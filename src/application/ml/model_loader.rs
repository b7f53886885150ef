//! Startup-time model loading.
//!
//! The tabular model gates startup; the sequential forecaster is optional and
//! any problem with it only disables the `use_arima` route.

use super::arima_forecaster::ArimaForecaster;
use super::smartcore_predictor::SmartCorePredictor;
use crate::domain::errors::ModelLoadError;
use std::path::Path;
use tracing::{info, warn};

/// Load the tabular model. Callers treat an error as fatal.
pub fn load_required(path: &Path) -> Result<SmartCorePredictor, ModelLoadError> {
    SmartCorePredictor::load(path)
}

/// Load the sequential forecaster, or `None` on any failure.
pub fn load_optional(path: &Path) -> Option<ArimaForecaster> {
    if !path.exists() {
        info!(
            "ARIMA model file not found at {:?}. use_arima requests will fall back to the tabular model.",
            path
        );
        return None;
    }

    match ArimaForecaster::load(path) {
        Ok(forecaster) => Some(forecaster),
        Err(e) => {
            warn!("ARIMA model unavailable: {}", e);
            None
        }
    }
}
