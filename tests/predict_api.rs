use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tower::ServiceExt;
use xrp_predictor::application::router::PredictionRouter;
use xrp_predictor::config::Config;
use xrp_predictor::domain::errors::PredictorError;
use xrp_predictor::domain::ml::{FEATURE_NAMES, FeatureVector, SequentialForecaster, TabularPredictor};
use xrp_predictor::infrastructure::observability::Metrics;
use xrp_predictor::interfaces::http::{AppState, ServiceInfo, build_router};

// Tabular stub returning a fixed result and counting calls
struct StubTabular {
    result: Result<f64, PredictorError>,
    calls: Arc<AtomicUsize>,
}

impl TabularPredictor for StubTabular {
    fn predict(&self, _features: &FeatureVector) -> Result<f64, PredictorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.clone()
    }

    fn name(&self) -> &str {
        "stub-tabular"
    }
}

// Forecaster stub returning a fixed result and counting calls
struct StubForecaster {
    result: Result<f64, PredictorError>,
    calls: Arc<AtomicUsize>,
}

impl SequentialForecaster for StubForecaster {
    fn forecast_next(&self) -> Result<f64, PredictorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.clone()
    }

    fn name(&self) -> &str {
        "stub-forecaster"
    }
}

// Tabular stub that indexes past the feature vector, like a forest trained on more columns
struct PanickingTabular {
    calls: Arc<AtomicUsize>,
}

impl TabularPredictor for PanickingTabular {
    fn predict(&self, features: &FeatureVector) -> Result<f64, PredictorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let row = features.to_vec();
        let column = row.len() + 1;
        Ok(row[column])
    }

    fn name(&self) -> &str {
        "panicking-tabular"
    }
}

struct TestApp {
    app: Router,
    tabular_calls: Arc<AtomicUsize>,
    forecaster_calls: Arc<AtomicUsize>,
    metrics: Metrics,
}

impl TestApp {
    fn new(
        tabular: Result<f64, PredictorError>,
        forecaster: Option<Result<f64, PredictorError>>,
    ) -> Self {
        let tabular_calls = Arc::new(AtomicUsize::new(0));
        let tabular = Arc::new(StubTabular {
            result: tabular,
            calls: tabular_calls.clone(),
        });
        Self::with_tabular(tabular, tabular_calls, forecaster)
    }

    fn with_tabular(
        tabular: Arc<dyn TabularPredictor>,
        tabular_calls: Arc<AtomicUsize>,
        forecaster: Option<Result<f64, PredictorError>>,
    ) -> Self {
        let forecaster_calls = Arc::new(AtomicUsize::new(0));
        let sequential = forecaster.map(|result| {
            Arc::new(StubForecaster {
                result,
                calls: forecaster_calls.clone(),
            }) as Arc<dyn SequentialForecaster>
        });

        let metrics = Metrics::new().unwrap();
        let router = PredictionRouter::new(tabular, sequential, metrics.clone());
        let config = Config {
            model_version: "v-test".to_string(),
            ..Config::default()
        };
        let app = build_router(AppState::new(router, ServiceInfo::from_config(&config)));

        Self {
            app,
            tabular_calls,
            forecaster_calls,
            metrics,
        }
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        self.send(request).await
    }

    async fn post(&self, uri: &str, body: impl Into<Body>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(body.into())
            .unwrap();
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn predictor_calls(&self) -> usize {
        self.tabular_calls.load(Ordering::SeqCst) + self.forecaster_calls.load(Ordering::SeqCst)
    }
}

fn features() -> Value {
    json!({
        "open": 0.5012,
        "low": 0.4950,
        "close": 0.5100,
        "volume": 1_203_456_789.0,
        "marketcap": 27_000_000_000.0,
        "price_change": 0.0088,
        "volatility_abs": 0.0210,
        "ret_1d": 0.0175,
        "ret_7d": -0.0320,
        "ma_7": 0.5050,
        "ma_30": 0.5200,
        "vol_ma_7": 1_100_000_000.0,
        "vol_ma_30": 980_000_000.0
    })
}

fn with_arima(use_arima: bool) -> Value {
    let mut payload = features();
    payload["use_arima"] = json!(use_arima);
    payload
}

fn inference_error() -> PredictorError {
    PredictorError::Inference {
        reason: "model exploded".to_string(),
    }
}

#[tokio::test]
async fn test_health_is_ok() {
    let app = TestApp::new(Ok(0.5), None);
    let (status, body) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_root_reports_service_metadata() {
    let app = TestApp::new(Ok(0.5), None);
    let (status, body) = app.get("/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["project"], "XRP Next-Day High Predictor");
    assert_eq!(body["version"], "v-test");
    assert_eq!(body["model_path"], "models/xrp_xgb_model.joblib");
    assert_eq!(body["sequential_model_loaded"], false);
    assert_eq!(body["expected_features"], json!(FEATURE_NAMES));
    assert!(
        body["endpoints"]
            .as_array()
            .unwrap()
            .iter()
            .any(|e| e.as_str().unwrap().starts_with("/predict"))
    );
    assert_eq!(app.predictor_calls(), 0);
}

#[tokio::test]
async fn test_predict_returns_tabular_constant() {
    let app = TestApp::new(Ok(0.6142), None);
    let (status, body) = app.post("/predict", features().to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "predicted_value": 0.6142, "model": "tabular" }));
    assert_eq!(app.tabular_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_use_arima_false_stays_tabular() {
    let app = TestApp::new(Ok(0.6142), Some(Ok(0.7)));
    let (status, body) = app.post("/predict", with_arima(false).to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["model"], "tabular");
    assert_eq!(app.forecaster_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_use_arima_without_forecaster_falls_back_to_tabular() {
    let app = TestApp::new(Ok(0.6142), None);
    let (status, body) = app.post("/predict", with_arima(true).to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "predicted_value": 0.6142, "model": "tabular" }));
}

#[tokio::test]
async fn test_use_arima_with_forecaster_is_sequential() {
    let app = TestApp::new(Ok(0.6142), Some(Ok(0.7031)));
    let (status, body) = app.post("/predict", with_arima(true).to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "predicted_value": 0.7031, "model": "sequential" }));
    assert_eq!(app.tabular_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_forecaster_failure_is_reported_with_ok_status() {
    let app = TestApp::new(Ok(0.6142), Some(Err(inference_error())));
    let (status, body) = app.post("/predict", with_arima(true).to_string()).await;

    assert_eq!(status, StatusCode::OK);
    let error = body["error"].as_str().unwrap();
    assert!(error.starts_with("forecaster failed"));
    assert!(error.contains("model exploded"));
    assert!(body.get("predicted_value").is_none());
    // No silent fallback
    assert_eq!(app.tabular_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_tabular_failure_is_server_error() {
    let app = TestApp::new(Err(inference_error()), None);
    let (status, body) = app.post("/predict", features().to_string()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.get("predicted_value").is_none());
    assert_eq!(app.metrics.summary().tabular_error, 1);
}

#[tokio::test]
async fn test_tabular_panic_is_server_error() {
    let calls = Arc::new(AtomicUsize::new(0));
    let tabular = Arc::new(PanickingTabular {
        calls: calls.clone(),
    });
    let app = TestApp::with_tabular(tabular, calls, None);

    let (status, body) = app.post("/predict", features().to_string()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "detail": "Internal Server Error" }));
    assert_eq!(app.tabular_calls.load(Ordering::SeqCst), 1);

    // The service keeps answering after a panic
    let (status, body) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_out_of_range_literal_is_a_field_error() {
    let app = TestApp::new(Ok(0.5), None);
    let body = features()
        .to_string()
        .replace("\"volume\":1203456789.0", "\"volume\":1e400");
    assert!(body.contains("1e400"));

    let (status, body) = app.post("/predict", body).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["detail"][0]["loc"], json!(["body", "volume"]));
    assert_eq!(body["detail"][0]["type"], "finite_number");
    assert_eq!(app.predictor_calls(), 0);
}

#[tokio::test]
async fn test_each_missing_field_is_a_client_error() {
    let app = TestApp::new(Ok(0.5), Some(Ok(0.5)));

    for name in FEATURE_NAMES {
        let mut payload = with_arima(true);
        payload.as_object_mut().unwrap().remove(name);

        let (status, body) = app.post("/predict", payload.to_string()).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "field {}", name);
        assert_eq!(body["detail"][0]["loc"], json!(["body", name]));
        assert_eq!(body["detail"][0]["type"], "missing");
    }

    assert_eq!(app.predictor_calls(), 0);
    assert_eq!(app.metrics.summary().validation_failures, 13);
}

#[tokio::test]
async fn test_non_numeric_field_is_a_client_error() {
    let app = TestApp::new(Ok(0.5), None);
    let mut payload = features();
    payload["marketcap"] = json!("a lot");

    let (status, body) = app.post("/predict", payload.to_string()).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["detail"][0]["loc"], json!(["body", "marketcap"]));
    assert_eq!(body["detail"][0]["type"], "float_parsing");
    assert_eq!(app.predictor_calls(), 0);
}

#[tokio::test]
async fn test_numeric_strings_are_accepted() {
    let app = TestApp::new(Ok(0.5), None);
    let mut payload = features();
    payload["close"] = json!("0.5100");

    let (status, body) = app.post("/predict", payload.to_string()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["model"], "tabular");
}

#[tokio::test]
async fn test_malformed_body_is_a_client_error() {
    let app = TestApp::new(Ok(0.5), None);

    let (status, body) = app.post("/predict", "{\"open\": 0.5,").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["detail"][0]["type"], "json_invalid");

    let (status, _) = app.post("/predict", "[]").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(app.predictor_calls(), 0);
}

#[tokio::test]
async fn test_legacy_predict_path_is_served() {
    let app = TestApp::new(Ok(0.42), None);
    let (status, body) = app.post("/predict/xrp", features().to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["predicted_value"], 0.42);
}

#[tokio::test]
async fn test_unknown_path_is_not_found() {
    let app = TestApp::new(Ok(0.5), None);
    let (status, _) = app.get("/predict/btc").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(app.predictor_calls(), 0);
}
