//! Request schema for `/predict`.
//!
//! Turns an untyped JSON body into a fully populated [`PredictionRequest`] or a
//! [`ValidationError`] listing every failed field. Nothing is clamped or
//! defaulted except `use_arima`.

use crate::domain::errors::{FieldError, FieldErrorKind, ValidationError};
use crate::domain::ml::{FEATURE_COUNT, FEATURE_NAMES, FeatureVector};
use crate::domain::prediction::PredictionRequest;
use serde_json::value::RawValue;
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};

/// Name of the routing flag in the request body.
pub const USE_ARIMA_FIELD: &str = "use_arima";

/// Parse and validate a raw request body.
///
/// Fields are decoded one by one so a number literal outside the f64 range is
/// reported against its own field instead of failing the whole body.
pub fn parse_prediction_request(body: &[u8]) -> Result<PredictionRequest, ValidationError> {
    let Ok(raw_fields) = serde_json::from_slice::<HashMap<String, Box<RawValue>>>(body) else {
        // Not an object, or not JSON at all
        let payload: Value = serde_json::from_slice(body).map_err(|e| {
            FieldError::body(FieldErrorKind::JsonInvalid, format!("JSON decode error: {}", e))
        })?;
        return validate_prediction_request(&payload);
    };

    let mut object = Map::new();
    let mut out_of_range = HashSet::new();
    for (name, raw) in raw_fields {
        match serde_json::from_str::<Value>(raw.get()) {
            Ok(value) => {
                object.insert(name, value);
            }
            Err(_) => {
                out_of_range.insert(name);
            }
        }
    }

    validate_fields(&object, &out_of_range)
}

/// Validate an already decoded JSON payload.
pub fn validate_prediction_request(payload: &Value) -> Result<PredictionRequest, ValidationError> {
    let Some(object) = payload.as_object() else {
        return Err(FieldError::body(
            FieldErrorKind::ModelType,
            "Input should be a valid JSON object",
        )
        .into());
    };

    validate_fields(object, &HashSet::new())
}

/// `out_of_range` names fields present in the body whose numbers do not fit an f64.
fn validate_fields(
    object: &Map<String, Value>,
    out_of_range: &HashSet<String>,
) -> Result<PredictionRequest, ValidationError> {
    let mut errors = Vec::new();
    let mut values = [0.0; FEATURE_COUNT];

    for (slot, name) in values.iter_mut().zip(FEATURE_NAMES) {
        let result = if out_of_range.contains(name) {
            Err(not_finite(name))
        } else {
            read_float(object, name)
        };
        match result {
            Ok(value) => *slot = value,
            Err(error) => errors.push(error),
        }
    }

    let use_arima = match object.get(USE_ARIMA_FIELD) {
        None | Some(Value::Null) if !out_of_range.contains(USE_ARIMA_FIELD) => false,
        Some(Value::Bool(flag)) => *flag,
        _ => {
            errors.push(FieldError::field(
                USE_ARIMA_FIELD,
                FieldErrorKind::BoolType,
                "Input should be a valid boolean",
            ));
            false
        }
    };

    if !errors.is_empty() {
        return Err(ValidationError { detail: errors });
    }

    Ok(PredictionRequest::new(FeatureVector::from_ordered(values)).with_arima(use_arima))
}

fn not_finite(name: &str) -> FieldError {
    FieldError::field(
        name,
        FieldErrorKind::FiniteNumber,
        "Input should be a finite number",
    )
}

fn read_float(object: &Map<String, Value>, name: &str) -> Result<f64, FieldError> {
    let raw = object
        .get(name)
        .ok_or_else(|| FieldError::field(name, FieldErrorKind::Missing, "Field required"))?;

    let value = match raw {
        Value::Number(number) => number.as_f64().ok_or_else(|| {
            FieldError::field(
                name,
                FieldErrorKind::FloatParsing,
                "Input should be a valid number",
            )
        })?,
        Value::String(text) => text.trim().parse::<f64>().map_err(|_| {
            FieldError::field(
                name,
                FieldErrorKind::FloatParsing,
                format!(
                    "Input should be a valid number, unable to parse string as a number: {:?}",
                    text
                ),
            )
        })?,
        _ => {
            return Err(FieldError::field(
                name,
                FieldErrorKind::FloatType,
                "Input should be a valid number",
            ));
        }
    };

    if !value.is_finite() {
        return Err(not_finite(name));
    }

    Ok(value)
}
