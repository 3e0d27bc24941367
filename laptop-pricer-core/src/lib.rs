//! # laptop-pricer-core — Laptop Price Inference
//!
//! Turns a laptop hardware specification into a price estimate using a
//! pre-trained regression pipeline and its reference dataset.
//!
//! ## Flow
//!
//! 1. **Validate** a [`SpecificationInput`] into a [`Specification`]
//! 2. **Engineer** the twelve model inputs ([`features::to_feature_record`])
//! 3. **Infer** the log price with the resident [`Pipeline`]
//! 4. **Respond** with the linear price rounded to cents
//!
//! Artifacts are loaded lazily, at most once, by the [`ArtifactCache`].

// Foundation
pub mod config;
pub mod error;

// Inputs & features
pub mod features;
pub mod specification;

// Artifacts
pub mod artifacts;
pub mod dataset;
pub mod pipeline;

// Serving
pub mod catalog;
pub mod response;
pub mod service;

// Re-exports
pub use artifacts::{ArtifactCache, ArtifactGeneration, ArtifactLoader, FsArtifactLoader};
pub use catalog::{FeatureOptions, FormSchema};
pub use config::{PricerConfig, load_config};
pub use dataset::ReferenceDataset;
pub use error::{ArtifactKind, PricerError, StatusClass, ValidationError};
pub use pipeline::{InferenceError, Pipeline, RegressionPipeline};
pub use response::{ErrorResponse, FeaturesResponse, HealthReport, PredictionResponse};
pub use service::PredictionService;
pub use specification::{Resolution, Specification, SpecificationInput, YesNo};
