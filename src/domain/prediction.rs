use crate::domain::ml::FeatureVector;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which predictor produced a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    Tabular,
    Sequential,
}

impl ModelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelKind::Tabular => "tabular",
            ModelKind::Sequential => "sequential",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated `/predict` payload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictionRequest {
    pub features: FeatureVector,
    /// Prefer the sequential forecaster when it is loaded.
    pub use_arima: bool,
}

impl PredictionRequest {
    pub fn new(features: FeatureVector) -> Self {
        Self {
            features,
            use_arima: false,
        }
    }

    pub fn with_arima(mut self, use_arima: bool) -> Self {
        self.use_arima = use_arima;
        self
    }
}

/// Body returned by a successful call to `/predict`.
///
/// `Failed` only carries forecaster failures; the status code stays 200.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PredictionResponse {
    Prediction {
        predicted_value: f64,
        model: ModelKind,
    },
    Failed {
        error: String,
    },
}

impl PredictionResponse {
    pub fn prediction(predicted_value: f64, model: ModelKind) -> Self {
        PredictionResponse::Prediction {
            predicted_value,
            model,
        }
    }

    pub fn model(&self) -> Option<ModelKind> {
        match self {
            PredictionResponse::Prediction { model, .. } => Some(*model),
            PredictionResponse::Failed { .. } => None,
        }
    }
}
