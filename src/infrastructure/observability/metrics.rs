//! Prometheus metrics definitions for the prediction service
//!
//! All metrics use the `xrp_predictor_` prefix.

use crate::domain::prediction::ModelKind;
use prometheus::{CounterVec, HistogramOpts, HistogramVec, IntCounter, Opts, Registry, TextEncoder};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// Outcome label for `predictions_total`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Error,
}

impl Outcome {
    fn as_str(&self) -> &'static str {
        match self {
            Outcome::Success => "success",
            Outcome::Error => "error",
        }
    }
}

/// Prometheus metrics for the prediction service
#[derive(Clone)]
pub struct Metrics {
    registry: Arc<Registry>,
    /// Predictions by model and outcome
    pub predictions_total: CounterVec,
    /// Predictor call latency in seconds
    pub prediction_latency_seconds: HistogramVec,
    /// Requests rejected before any model was called
    pub validation_failures_total: IntCounter,
}

impl Metrics {
    /// Create a new Metrics instance with all counters registered
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let predictions_total = CounterVec::new(
            Opts::new(
                "xrp_predictor_predictions_total",
                "Total predictions by model and outcome",
            ),
            &["model", "outcome"],
        )?;
        registry.register(Box::new(predictions_total.clone()))?;

        let prediction_latency_seconds = HistogramVec::new(
            HistogramOpts::new(
                "xrp_predictor_prediction_latency_seconds",
                "Predictor call latency in seconds",
            )
            .buckets(vec![
                0.0001, 0.0005, 0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 1.0,
            ]),
            &["model"],
        )?;
        registry.register(Box::new(prediction_latency_seconds.clone()))?;

        let validation_failures_total = IntCounter::with_opts(Opts::new(
            "xrp_predictor_validation_failures_total",
            "Requests rejected by schema validation",
        ))?;
        registry.register(Box::new(validation_failures_total.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            predictions_total,
            prediction_latency_seconds,
            validation_failures_total,
        })
    }

    pub fn record_prediction(&self, model: ModelKind, outcome: Outcome, elapsed: Duration) {
        self.predictions_total
            .with_label_values(&[model.as_str(), outcome.as_str()])
            .inc();
        self.prediction_latency_seconds
            .with_label_values(&[model.as_str()])
            .observe(elapsed.as_secs_f64());
    }

    pub fn record_validation_failure(&self) {
        self.validation_failures_total.inc();
    }

    pub fn prediction_count(&self, model: ModelKind, outcome: Outcome) -> u64 {
        self.predictions_total
            .with_label_values(&[model.as_str(), outcome.as_str()])
            .get() as u64
    }

    /// Snapshot of the counters, suitable for a structured log line.
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            timestamp: chrono::Utc::now().to_rfc3339(),
            tabular_success: self.prediction_count(ModelKind::Tabular, Outcome::Success),
            tabular_error: self.prediction_count(ModelKind::Tabular, Outcome::Error),
            sequential_success: self.prediction_count(ModelKind::Sequential, Outcome::Success),
            sequential_error: self.prediction_count(ModelKind::Sequential, Outcome::Error),
            validation_failures: self.validation_failures_total.get(),
        }
    }

    /// Render all metrics in the Prometheus text format
    pub fn render(&self) -> anyhow::Result<String> {
        let encoder = TextEncoder::new();
        Ok(encoder.encode_to_string(&self.registry.gather())?)
    }
}

/// Counter snapshot for JSON output
#[derive(Debug, Serialize)]
pub struct MetricsSummary {
    pub timestamp: String,
    pub tabular_success: u64,
    pub tabular_error: u64,
    pub sequential_success: u64,
    pub sequential_error: u64,
    pub validation_failures: u64,
}
