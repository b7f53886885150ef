//! API route handlers

use super::AppState;
use crate::application::validation::parse_prediction_request;
use crate::domain::ml::FEATURE_NAMES;
use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use tracing::{debug, error, info_span};
use uuid::Uuid;

pub const ENDPOINTS: [&str; 3] = ["/health", "/predict (POST JSON)", "/predict/xrp (POST JSON)"];

pub async fn root(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "project": state.info.title,
        "version": state.info.version,
        "endpoints": ENDPOINTS,
        "expected_features": FEATURE_NAMES,
        "model_path": state.info.model_path,
        "sequential_model_loaded": state.router.has_sequential(),
    }))
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn predict(State(state): State<AppState>, body: Bytes) -> Response {
    let request_id = Uuid::new_v4();
    let span = info_span!("predict", %request_id);

    span.in_scope(|| {
        let request = match parse_prediction_request(&body) {
            Ok(request) => request,
            Err(e) => {
                state.router.metrics().record_validation_failure();
                debug!("Rejected request: {}", e);
                return (StatusCode::UNPROCESSABLE_ENTITY, Json(e)).into_response();
            }
        };

        match state.router.route(&request) {
            Ok(response) => (StatusCode::OK, Json(response)).into_response(),
            Err(e) => {
                error!("Tabular predictor failed: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "detail": "Internal Server Error" })),
                )
                    .into_response()
            }
        }
    })
}
