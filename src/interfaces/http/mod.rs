//! HTTP surface for the prediction service.
//!
//! Three endpoints: service metadata, health, and predict. Handlers share one
//! immutable [`AppState`] built during startup.

pub mod routes;

use crate::application::router::PredictionRouter;
use crate::config::Config;
use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;
use std::any::Any as PanicPayload;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::error;

pub const APP_TITLE: &str = "XRP Next-Day High Predictor";

/// Static metadata reported by `GET /`
#[derive(Debug, Clone)]
pub struct ServiceInfo {
    pub title: String,
    pub version: String,
    pub model_path: String,
}

impl ServiceInfo {
    pub fn from_config(config: &Config) -> Self {
        Self {
            title: APP_TITLE.to_string(),
            version: config.model_version.clone(),
            model_path: config.model_path.display().to_string(),
        }
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<PredictionRouter>,
    pub info: Arc<ServiceInfo>,
}

impl AppState {
    pub fn new(router: PredictionRouter, info: ServiceInfo) -> Self {
        Self {
            router: Arc::new(router),
            info: Arc::new(info),
        }
    }
}

/// Build the axum router with middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(routes::root))
        .route("/health", get(routes::health))
        .route("/predict", post(routes::predict))
        // Path used by earlier deployments
        .route("/predict/xrp", post(routes::predict))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Turns a panicking handler into the same 500 body as a tabular failure.
fn handle_panic(payload: Box<dyn PanicPayload + Send + 'static>) -> Response {
    let reason = if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else {
        "unknown panic payload"
    };
    error!("Request handler panicked: {}", reason);

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "detail": "Internal Server Error" })),
    )
        .into_response()
}
