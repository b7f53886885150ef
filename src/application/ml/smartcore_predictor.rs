use crate::domain::errors::{ModelLoadError, PredictorError};
use crate::domain::ml::{FeatureVector, TabularPredictor};
use smartcore::ensemble::random_forest_regressor::RandomForestRegressor;
use smartcore::linalg::basic::matrix::DenseMatrix;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::info;

pub type ForestModel = RandomForestRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>;

/// Random forest regressor trained on the ordered feature vector.
pub struct SmartCorePredictor {
    model: ForestModel,
    model_path: PathBuf,
}

impl SmartCorePredictor {
    pub fn new(model: ForestModel, model_path: impl Into<PathBuf>) -> Self {
        Self {
            model,
            model_path: model_path.into(),
        }
    }

    /// Read a serde_json-serialized forest from disk.
    pub fn load(model_path: impl Into<PathBuf>) -> Result<Self, ModelLoadError> {
        let model_path = model_path.into();

        let file = File::open(&model_path).map_err(|source| ModelLoadError::Io {
            path: model_path.clone(),
            source,
        })?;

        let model: ForestModel = serde_json::from_reader(BufReader::new(file)).map_err(|source| {
            ModelLoadError::Deserialize {
                path: model_path.clone(),
                source,
            }
        })?;

        info!("Successfully loaded tabular model from {:?}", model_path);
        Ok(Self::new(model, model_path))
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }
}

impl TabularPredictor for SmartCorePredictor {
    fn predict(&self, features: &FeatureVector) -> Result<f64, PredictorError> {
        let input_matrix =
            DenseMatrix::from_2d_vec(&vec![features.to_vec()]).map_err(|e| {
                PredictorError::InvalidInput {
                    reason: format!("Matrix creation failed: {}", e),
                }
            })?;

        let predictions = self
            .model
            .predict(&input_matrix)
            .map_err(|e| PredictorError::Inference {
                reason: format!("Prediction failed: {}", e),
            })?;

        let value = predictions
            .first()
            .copied()
            .ok_or_else(|| PredictorError::Inference {
                reason: "No prediction returned".to_string(),
            })?;

        if !value.is_finite() {
            return Err(PredictorError::NonFinite { value });
        }
        Ok(value)
    }

    fn name(&self) -> &str {
        "SmartCore Random Forest"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ml::FEATURE_COUNT;
    use smartcore::ensemble::random_forest_regressor::RandomForestRegressorParameters;
    use std::fs;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "xrp_predictor_test_{}_{}_{}",
            std::process::id(),
            uuid::Uuid::new_v4(),
            name
        ))
    }

    /// Forest fitted on a constant target, so every prediction equals `target`.
    fn constant_forest(target: f64) -> ForestModel {
        let x: Vec<Vec<f64>> = (0..24)
            .map(|row| {
                (0..FEATURE_COUNT)
                    .map(|col| (row * FEATURE_COUNT + col) as f64 * 0.01)
                    .collect()
            })
            .collect();
        let y = vec![target; x.len()];

        let x_matrix = DenseMatrix::from_2d_vec(&x).unwrap();
        let params = RandomForestRegressorParameters::default()
            .with_n_trees(5)
            .with_max_depth(4);
        RandomForestRegressor::fit(&x_matrix, &y, params).unwrap()
    }

    #[test]
    fn test_predict_uses_trained_forest() {
        let predictor = SmartCorePredictor::new(constant_forest(0.5731), "in-memory");
        let value = predictor.predict(&FeatureVector::default()).unwrap();
        assert!((value - 0.5731).abs() < 1e-12);
    }

    #[test]
    fn test_load_round_trips_serialized_forest() {
        let path = temp_path("forest.json");
        let file = File::create(&path).unwrap();
        serde_json::to_writer(file, &constant_forest(1.25)).unwrap();

        let predictor = SmartCorePredictor::load(&path).unwrap();
        assert_eq!(predictor.model_path(), path.as_path());
        let value = predictor.predict(&FeatureVector::default()).unwrap();
        assert!((value - 1.25).abs() < 1e-12);

        fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let result = SmartCorePredictor::load(temp_path("missing.json"));
        assert!(matches!(result, Err(ModelLoadError::Io { .. })));
    }

    #[test]
    fn test_load_corrupt_file_is_deserialize_error() {
        let path = temp_path("corrupt.json");
        fs::write(&path, b"\x80\x04\x95 not json").unwrap();

        let result = SmartCorePredictor::load(&path);
        assert!(matches!(result, Err(ModelLoadError::Deserialize { .. })));

        fs::remove_file(path).ok();
    }
}
