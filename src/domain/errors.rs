use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading a model artifact from disk
#[derive(Debug, Error)]
pub enum ModelLoadError {
    #[error("Failed to read model artifact {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to deserialize model artifact {path:?}: {source}")]
    Deserialize {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid model artifact {path:?}: {reason}")]
    InvalidArtifact { path: PathBuf, reason: String },
}

/// Errors raised by a loaded predictor at request time
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictorError {
    #[error("Inference failed: {reason}")]
    Inference { reason: String },

    #[error("Model produced a non-finite value: {value}")]
    NonFinite { value: f64 },

    #[error("Invalid model input: {reason}")]
    InvalidInput { reason: String },
}

/// Machine-readable category of a request field failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldErrorKind {
    Missing,
    FloatType,
    FloatParsing,
    FiniteNumber,
    BoolType,
    JsonInvalid,
    ModelType,
}

/// One failed field in a request body
#[derive(Debug, Clone, PartialEq, Serialize, Error)]
#[error("{}: {}", .loc.join("."), .msg)]
pub struct FieldError {
    pub loc: Vec<String>,
    pub msg: String,
    #[serde(rename = "type")]
    pub kind: FieldErrorKind,
}

impl FieldError {
    /// Error located at the request body itself.
    pub fn body(kind: FieldErrorKind, msg: impl Into<String>) -> Self {
        Self {
            loc: vec!["body".to_string()],
            msg: msg.into(),
            kind,
        }
    }

    /// Error located at a named body field.
    pub fn field(name: &str, kind: FieldErrorKind, msg: impl Into<String>) -> Self {
        Self {
            loc: vec!["body".to_string(), name.to_string()],
            msg: msg.into(),
            kind,
        }
    }

    /// Name of the failed field, if the error is not about the whole body.
    pub fn field_name(&self) -> Option<&str> {
        self.loc.get(1).map(String::as_str)
    }
}

/// Rejected request body, listing every failed field
#[derive(Debug, Clone, PartialEq, Serialize, Error)]
#[error("Request validation failed with {} error(s)", .detail.len())]
pub struct ValidationError {
    pub detail: Vec<FieldError>,
}

impl From<FieldError> for ValidationError {
    fn from(error: FieldError) -> Self {
        Self {
            detail: vec![error],
        }
    }
}
