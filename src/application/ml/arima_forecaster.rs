//! ARIMA(p, d, q) one-step forecaster.
//!
//! The artifact is the fitted state only: coefficients plus the tail of the
//! training series and its in-sample residuals. Forecasting reads that state
//! and never updates it.

use crate::domain::errors::{ModelLoadError, PredictorError};
use crate::domain::ml::SequentialForecaster;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::info;

/// Fitted ARIMA state as written by the training job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArimaState {
    /// AR order (p)
    pub p: usize,
    /// Differencing order (d)
    pub d: usize,
    /// MA order (q)
    pub q: usize,
    /// AR coefficients, lag 1 first
    pub ar_coeffs: Vec<f64>,
    /// MA coefficients, lag 1 first
    pub ma_coeffs: Vec<f64>,
    /// Constant term of the differenced series
    #[serde(default)]
    pub constant: f64,
    /// Tail of the training series on the original scale, oldest first
    pub history: Vec<f64>,
    /// Tail of in-sample residuals, oldest first
    #[serde(default)]
    pub residuals: Vec<f64>,
}

impl ArimaState {
    /// Check that the state carries enough data for a one-step forecast.
    pub fn validate(&self) -> Result<(), String> {
        if self.ar_coeffs.len() != self.p {
            return Err(format!(
                "expected {} AR coefficients, found {}",
                self.p,
                self.ar_coeffs.len()
            ));
        }
        if self.ma_coeffs.len() != self.q {
            return Err(format!(
                "expected {} MA coefficients, found {}",
                self.q,
                self.ma_coeffs.len()
            ));
        }

        let min_history = (self.p + self.d).max(self.d + 1);
        if self.history.len() < min_history {
            return Err(format!(
                "history needs at least {} values, found {}",
                min_history,
                self.history.len()
            ));
        }
        if self.residuals.len() < self.q {
            return Err(format!(
                "residuals need at least {} values, found {}",
                self.q,
                self.residuals.len()
            ));
        }

        let all_finite = std::iter::once(&self.constant)
            .chain(&self.ar_coeffs)
            .chain(&self.ma_coeffs)
            .chain(&self.history)
            .chain(&self.residuals)
            .all(|v| v.is_finite());
        if !all_finite {
            return Err("state contains NaN or infinite values".to_string());
        }

        Ok(())
    }

    /// Forecast the next value on the original scale.
    ///
    /// Assumes a state that passed [`ArimaState::validate`].
    pub fn forecast_one(&self) -> f64 {
        // levels[k] is the history differenced k times
        let mut levels = Vec::with_capacity(self.d + 1);
        levels.push(self.history.clone());
        for _ in 0..self.d {
            let next = levels.last().map(|l: &Vec<f64>| difference(l)).unwrap_or_default();
            levels.push(next);
        }

        let stationary = &levels[self.d];
        let ar_term: f64 = self
            .ar_coeffs
            .iter()
            .zip(stationary.iter().rev())
            .map(|(phi, x)| phi * x)
            .sum();
        let ma_term: f64 = self
            .ma_coeffs
            .iter()
            .zip(self.residuals.iter().rev())
            .map(|(theta, e)| theta * e)
            .sum();

        let mut forecast = self.constant + ar_term + ma_term;

        // Integrate back up to the original scale
        for level in levels[..self.d].iter().rev() {
            forecast += level.last().copied().unwrap_or(0.0);
        }

        forecast
    }
}

fn difference(data: &[f64]) -> Vec<f64> {
    data.windows(2).map(|w| w[1] - w[0]).collect()
}

/// Sequential forecaster backed by a fitted ARIMA state.
pub struct ArimaForecaster {
    state: ArimaState,
    model_path: PathBuf,
}

impl ArimaForecaster {
    pub fn new(state: ArimaState, model_path: impl Into<PathBuf>) -> Result<Self, ModelLoadError> {
        let model_path = model_path.into();
        state
            .validate()
            .map_err(|reason| ModelLoadError::InvalidArtifact {
                path: model_path.clone(),
                reason,
            })?;
        Ok(Self { state, model_path })
    }

    /// Read a JSON-serialized ARIMA state from disk.
    pub fn load(model_path: impl Into<PathBuf>) -> Result<Self, ModelLoadError> {
        let model_path = model_path.into();

        let file = File::open(&model_path).map_err(|source| ModelLoadError::Io {
            path: model_path.clone(),
            source,
        })?;

        let state: ArimaState = serde_json::from_reader(BufReader::new(file)).map_err(|source| {
            ModelLoadError::Deserialize {
                path: model_path.clone(),
                source,
            }
        })?;

        let forecaster = Self::new(state, model_path)?;
        info!(
            "Successfully loaded ARIMA({}, {}, {}) forecaster from {:?}",
            forecaster.state.p, forecaster.state.d, forecaster.state.q, forecaster.model_path
        );
        Ok(forecaster)
    }

    pub fn state(&self) -> &ArimaState {
        &self.state
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }
}

impl SequentialForecaster for ArimaForecaster {
    fn forecast_next(&self) -> Result<f64, PredictorError> {
        let value = self.state.forecast_one();
        if !value.is_finite() {
            return Err(PredictorError::NonFinite { value });
        }
        Ok(value)
    }

    fn name(&self) -> &str {
        "ARIMA"
    }
}
