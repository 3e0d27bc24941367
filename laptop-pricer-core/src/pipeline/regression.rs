//! Serializable preprocessing + regression pipeline artifact.

use crate::features::FeatureRecord;
use crate::pipeline::{ColumnTransformer, Estimator, InferenceError, Pipeline};
use serde::{Deserialize, Serialize};

/// A trained pipeline as persisted on disk: column transformer then estimator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionPipeline {
    #[serde(default = "default_name")]
    pub name: String,
    pub transformer: ColumnTransformer,
    pub estimator: Estimator,
}

fn default_name() -> String {
    "regression_pipeline".to_string()
}

impl RegressionPipeline {
    pub fn new(transformer: ColumnTransformer, estimator: Estimator) -> Self {
        Self {
            name: default_name(),
            transformer,
            estimator,
        }
    }

    /// Verify the estimator fits the transformer's output. Run once at load time.
    pub fn check(&self) -> Result<(), InferenceError> {
        self.estimator.check(self.transformer.output_width())
    }
}

impl Pipeline for RegressionPipeline {
    fn name(&self) -> &str {
        &self.name
    }

    fn predict(&self, record: &FeatureRecord) -> Result<f64, InferenceError> {
        let x = self.transformer.transform(record)?;
        self.estimator.predict(&x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::ColumnStep;

    fn pipeline() -> RegressionPipeline {
        RegressionPipeline::new(
            ColumnTransformer::new(vec![
                ColumnStep::OneHot {
                    column: "os".into(),
                    categories: vec!["Linux".into(), "Windows".into()],
                    drop_first: false,
                },
                ColumnStep::Passthrough {
                    column: "Ram".into(),
                },
            ]),
            Estimator::Linear {
                coefficients: vec![0.0, 0.2, 0.05],
                intercept: 6.0,
            },
        )
    }

    #[test]
    fn test_predict_linear_pipeline() {
        let record = FeatureRecord::new().with("os", "Windows").with("Ram", 8u32);
        let out = pipeline().predict(&record).unwrap();
        assert!((out - 6.6).abs() < 1e-12);
    }

    #[test]
    fn test_check_detects_width_mismatch() {
        let mut p = pipeline();
        p.check().unwrap();
        p.estimator = Estimator::Linear {
            coefficients: vec![1.0],
            intercept: 0.0,
        };
        assert!(matches!(
            p.check().unwrap_err(),
            InferenceError::ShapeMismatch { expected: 1, actual: 3 }
        ));
    }

    #[test]
    fn test_json_layout() {
        let json = serde_json::json!({
            "transformer": {"steps": [
                {"kind": "one_hot", "column": "os", "categories": ["Linux", "Windows"]},
                {"kind": "passthrough", "column": "Ram"}
            ]},
            "estimator": {"kind": "linear", "coefficients": [0.0, 0.2, 0.05], "intercept": 6.0}
        });
        let parsed: RegressionPipeline = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, pipeline());
    }
}
