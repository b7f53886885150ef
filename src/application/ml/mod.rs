pub mod arima_forecaster;
pub mod model_loader;
pub mod smartcore_predictor;

pub use arima_forecaster::{ArimaForecaster, ArimaState};
pub use model_loader::{load_optional, load_required};
pub use smartcore_predictor::SmartCorePredictor;
