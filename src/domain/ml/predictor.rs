use super::feature_registry::FeatureVector;
use crate::domain::errors::PredictorError;

/// Model mapping a fixed-order feature vector to a scalar.
pub trait TabularPredictor: Send + Sync {
    fn predict(&self, features: &FeatureVector) -> Result<f64, PredictorError>;

    /// Get model name/type
    fn name(&self) -> &str;
}

/// Model forecasting the next value of its own fitted series.
///
/// Forecasting never mutates the fitted state, so one instance can serve
/// concurrent requests.
pub trait SequentialForecaster: Send + Sync {
    /// Forecast exactly one step past the end of the fitted series.
    fn forecast_next(&self) -> Result<f64, PredictorError>;

    /// Get model name/type
    fn name(&self) -> &str;
}
