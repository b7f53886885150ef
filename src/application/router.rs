//! Prediction routing between the tabular model and the sequential forecaster.
//!
//! Routing rules:
//! 1. `use_arima` set and forecaster loaded: forecast one step. A forecaster
//!    error is returned inline as a `Failed` envelope, never as a fallback.
//! 2. Otherwise: call the tabular model. Its errors propagate to the caller,
//!    which surfaces them as server faults.
//!
//! Each predictor is called at most once per request.

use crate::domain::errors::PredictorError;
use crate::domain::ml::{SequentialForecaster, TabularPredictor};
use crate::domain::prediction::{ModelKind, PredictionRequest, PredictionResponse};
use crate::infrastructure::observability::{Metrics, Outcome};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

pub struct PredictionRouter {
    tabular: Arc<dyn TabularPredictor>,
    sequential: Option<Arc<dyn SequentialForecaster>>,
    metrics: Metrics,
}

impl PredictionRouter {
    pub fn new(
        tabular: Arc<dyn TabularPredictor>,
        sequential: Option<Arc<dyn SequentialForecaster>>,
        metrics: Metrics,
    ) -> Self {
        Self {
            tabular,
            sequential,
            metrics,
        }
    }

    pub fn has_sequential(&self) -> bool {
        self.sequential.is_some()
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Answer a validated request.
    ///
    /// `Err` means the tabular model failed; forecaster failures come back as
    /// `Ok(PredictionResponse::Failed { .. })`.
    pub fn route(&self, request: &PredictionRequest) -> Result<PredictionResponse, PredictorError> {
        if request.use_arima {
            if let Some(forecaster) = &self.sequential {
                return Ok(self.forecast(forecaster.as_ref()));
            }
            debug!("use_arima requested but no forecaster is loaded, using tabular model");
        }

        self.predict_tabular(request)
    }

    fn forecast(&self, forecaster: &dyn SequentialForecaster) -> PredictionResponse {
        let started = Instant::now();
        let result = forecaster.forecast_next();
        let elapsed = started.elapsed();

        match result {
            Ok(value) => {
                self.metrics
                    .record_prediction(ModelKind::Sequential, Outcome::Success, elapsed);
                debug!(model = forecaster.name(), value, "Sequential forecast");
                PredictionResponse::prediction(value, ModelKind::Sequential)
            }
            Err(e) => {
                self.metrics
                    .record_prediction(ModelKind::Sequential, Outcome::Error, elapsed);
                warn!(model = forecaster.name(), "Forecaster failed: {}", e);
                PredictionResponse::Failed {
                    error: format!("forecaster failed: {}", e),
                }
            }
        }
    }

    fn predict_tabular(
        &self,
        request: &PredictionRequest,
    ) -> Result<PredictionResponse, PredictorError> {
        let started = Instant::now();
        let result = self.tabular.predict(&request.features);
        let elapsed = started.elapsed();

        let outcome = if result.is_ok() {
            Outcome::Success
        } else {
            Outcome::Error
        };
        self.metrics
            .record_prediction(ModelKind::Tabular, outcome, elapsed);

        let value = result?;
        debug!(model = self.tabular.name(), value, "Tabular prediction");
        Ok(PredictionResponse::prediction(value, ModelKind::Tabular))
    }
}
