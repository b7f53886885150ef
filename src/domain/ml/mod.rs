pub mod feature_registry;
pub mod predictor;

pub use feature_registry::{FEATURE_COUNT, FEATURE_NAMES, FeatureVector};
pub use predictor::{SequentialForecaster, TabularPredictor};
