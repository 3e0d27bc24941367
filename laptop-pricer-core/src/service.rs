//! Prediction service: feature engineering, inference and catalog queries.

use crate::artifacts::ArtifactCache;
use crate::catalog::{FeatureOptions, FormSchema};
use crate::config::PricerConfig;
use crate::error::PricerError;
use crate::features::to_feature_record;
use crate::pipeline::InferenceError;
use crate::response::{HealthReport, PredictionResponse};
use crate::specification::Specification;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Stateless apart from the shared artifact cache; safe to call from any thread.
#[derive(Clone)]
pub struct PredictionService {
    cache: Arc<ArtifactCache>,
}

impl PredictionService {
    pub fn new(cache: Arc<ArtifactCache>) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &Arc<ArtifactCache> {
        &self.cache
    }

    /// Predict the linear-scale price of `spec`.
    ///
    /// The whole call runs against one artifact generation even if a reload
    /// happens concurrently. Artifact errors are returned unchanged.
    pub fn predict(&self, spec: &Specification) -> Result<f64, PricerError> {
        let generation = self.cache.current()?;
        let record = to_feature_record(spec);
        debug!(generation = generation.generation, record = ?record, "Feature record built");

        let log_price = generation
            .pipeline
            .predict(&record)
            .map_err(PricerError::prediction)?;
        let price = to_linear_price(log_price).map_err(|e| {
            warn!(log_price, error = %e, "Pipeline output rejected");
            PricerError::prediction(e)
        })?;

        info!(
            generation = generation.generation,
            company = spec.brand(),
            price,
            "Prediction served"
        );
        Ok(price)
    }

    /// [`predict`](Self::predict) wrapped in the response body, with the
    /// price rounded to cents.
    pub fn predict_response(
        &self,
        spec: Specification,
        currency: &str,
    ) -> Result<PredictionResponse, PricerError> {
        let price = self.predict(&spec)?;
        Ok(PredictionResponse::new(price, currency, spec))
    }

    pub fn get_feature_options(&self) -> Result<FeatureOptions, PricerError> {
        let dataset = self.cache.get_dataframe()?;
        FeatureOptions::from_dataset(&dataset)
    }

    pub fn form_schema(&self, config: &PricerConfig) -> Result<FormSchema, PricerError> {
        Ok(FormSchema::new(self.get_feature_options()?, config))
    }

    /// Exercises the catalog path, loading the artifacts if needed. Never
    /// fails; the outcome is in the report.
    pub fn health(&self, version: &str) -> HealthReport {
        match self.get_feature_options() {
            Ok(_) => HealthReport::healthy(version),
            Err(e) => {
                warn!(error = %e, "Health check failed");
                HealthReport::unhealthy(&e)
            }
        }
    }
}

fn to_linear_price(log_price: f64) -> Result<f64, InferenceError> {
    if !log_price.is_finite() {
        return Err(InferenceError::NonFinite(log_price));
    }
    let price = log_price.exp();
    if price.is_infinite() {
        return Err(InferenceError::Overflow { log_price });
    }
    Ok(price)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::{ArtifactLoader, LoadedArtifacts};
    use crate::dataset::ReferenceDataset;
    use crate::error::{ArtifactKind, StatusClass};
    use crate::features::{FeatureRecord, columns};
    use crate::pipeline::Pipeline;
    use crate::specification::SpecificationInput;
    use serde_json::json;
    use std::path::PathBuf;

    /// Returns the RAM column scaled down, or a fixed raw output.
    struct Fixed(Option<f64>);

    impl Pipeline for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }

        fn predict(&self, record: &FeatureRecord) -> Result<f64, InferenceError> {
            match self.0 {
                Some(v) => Ok(v),
                None => record
                    .get(columns::RAM)
                    .and_then(|v| v.as_f64())
                    .map(|ram| ram / 2.0)
                    .ok_or_else(|| InferenceError::MissingColumn(columns::RAM.into())),
            }
        }
    }

    struct StaticLoader {
        output: Option<f64>,
        missing: bool,
        catalog_columns: usize,
    }

    impl ArtifactLoader for StaticLoader {
        fn describe(&self) -> String {
            "static".to_string()
        }

        fn load(&self) -> Result<LoadedArtifacts, PricerError> {
            if self.missing {
                return Err(PricerError::ArtifactMissing {
                    artifact: ArtifactKind::Pipeline,
                    path: PathBuf::from("artifacts/pipe.json"),
                });
            }
            let cols: Vec<String> = columns::ALL[..self.catalog_columns]
                .iter()
                .map(|c| c.to_string())
                .collect();
            let row = vec![json!("Dell"); cols.len()];
            Ok(LoadedArtifacts {
                pipeline: Arc::new(Fixed(self.output)),
                dataset: ReferenceDataset::new(cols, vec![row]),
            })
        }
    }

    fn service(output: Option<f64>, missing: bool) -> PredictionService {
        PredictionService::new(Arc::new(ArtifactCache::new(StaticLoader {
            output,
            missing,
            catalog_columns: columns::ALL.len(),
        })))
    }

    fn spec() -> Specification {
        Specification::try_from(SpecificationInput {
            company: "Dell".into(),
            type_name: "Notebook".into(),
            ram: 8,
            weight: 2.0,
            touchscreen: "No".into(),
            ips: "Yes".into(),
            screen_size: 15.6,
            resolution: "1920x1080".into(),
            cpu: "Intel Core i5".into(),
            hdd: 0,
            ssd: 256,
            gpu: "Intel".into(),
            os: "Windows".into(),
        })
        .unwrap()
    }

    #[test]
    fn test_predict_exponentiates_pipeline_output() {
        let price = service(None, false).predict(&spec()).unwrap();
        assert!((price - 4f64.exp()).abs() < 1e-9);
    }

    #[test]
    fn test_predict_response_rounds_and_echoes() {
        let response = service(Some(10.0), false)
            .predict_response(spec(), "USD")
            .unwrap();
        assert_eq!(response.predicted_price, 22026.47);
        assert_eq!(response.currency, "USD");
        assert_eq!(response.specifications, spec());
    }

    #[test]
    fn test_non_finite_output_is_prediction_failure() {
        let err = service(Some(f64::NAN), false).predict(&spec()).unwrap_err();
        assert!(matches!(
            err,
            PricerError::PredictionFailure {
                cause: InferenceError::NonFinite(_)
            }
        ));
    }

    #[test]
    fn test_overflow_is_prediction_failure() {
        let err = service(Some(1000.0), false).predict(&spec()).unwrap_err();
        assert!(matches!(
            err,
            PricerError::PredictionFailure {
                cause: InferenceError::Overflow { .. }
            }
        ));
        assert_eq!(err.status_class(), StatusClass::Internal);
    }

    #[test]
    fn test_huge_finite_price_serializes_as_number() {
        let response = service(Some(708.0), false)
            .predict_response(spec(), "USD")
            .unwrap();
        assert!(response.predicted_price.is_finite());
        assert_eq!(response.predicted_price, 708f64.exp());
        let body = serde_json::to_value(&response).unwrap();
        assert!(body["predicted_price"].is_number());
    }

    #[test]
    fn test_response_overflow_is_prediction_failure() {
        let err = service(Some(710.0), false)
            .predict_response(spec(), "USD")
            .unwrap_err();
        assert!(matches!(
            err,
            PricerError::PredictionFailure {
                cause: InferenceError::Overflow { .. }
            }
        ));
    }

    #[test]
    fn test_missing_artifact_is_not_wrapped() {
        let err = service(None, true).predict(&spec()).unwrap_err();
        assert!(matches!(err, PricerError::ArtifactMissing { .. }));
        assert_eq!(err.status_class(), StatusClass::Unavailable);
    }

    #[test]
    fn test_feature_options_need_every_categorical_column() {
        let service = PredictionService::new(Arc::new(ArtifactCache::new(StaticLoader {
            output: None,
            missing: false,
            catalog_columns: 2,
        })));
        let err = service.get_feature_options().unwrap_err();
        assert!(matches!(err, PricerError::Dataset(_)));
        assert!(!service.health("1.0.0").is_healthy());
    }

    #[test]
    fn test_form_schema_uses_config_lists() {
        let form = service(None, false)
            .form_schema(&PricerConfig::default())
            .unwrap();
        assert_eq!(form.categories.companies, vec!["Dell"]);
        assert_eq!(form.defaults.ssd_gb, 256);
        assert!(form.resolutions.contains(&"1920x1080".to_string()));
    }

    #[test]
    fn test_health_reports_load_outcome() {
        let healthy = service(None, false).health("1.0.0");
        assert!(healthy.is_healthy());
        assert!(healthy.models_loaded);

        let unhealthy = service(None, true).health("1.0.0");
        assert!(!unhealthy.is_healthy());
        assert!(unhealthy.error.unwrap().contains("pipe.json"));
    }
}
