//! Push-based observability for the prediction service
//!
//! Counters live in a private Prometheus registry. Nothing is served over HTTP;
//! the binary logs a JSON summary on shutdown.

pub mod metrics;

pub use metrics::{Metrics, MetricsSummary, Outcome};
