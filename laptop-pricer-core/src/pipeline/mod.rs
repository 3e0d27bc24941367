//! Trained pipeline abstraction.
//!
//! The prediction service depends only on the [`Pipeline`] capability; the
//! serializable [`RegressionPipeline`] is the artifact format this crate loads.

pub mod estimator;
pub mod regression;
pub mod transformer;

pub use estimator::{Aggregation, Estimator, RegressionTree, TreeNode};
pub use regression::RegressionPipeline;
pub use transformer::{ColumnStep, ColumnTransformer};

use crate::features::FeatureRecord;
use thiserror::Error;

/// Failures raised while evaluating a pipeline or interpreting its output.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InferenceError {
    #[error("missing feature column '{0}'")]
    MissingColumn(String),

    #[error("feature column '{column}' expected a {expected} value, got {actual}")]
    WrongKind {
        column: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("estimator expects {expected} inputs, transformer produced {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("tree {tree}: {reason}")]
    MalformedTree { tree: usize, reason: String },

    #[error("tree ensemble has no trees")]
    EmptyEnsemble,

    #[error("pipeline returned a non-finite log price: {0}")]
    NonFinite(f64),

    #[error("log price {log_price} overflows when converted to a linear price")]
    Overflow { log_price: f64 },

    #[error("{0}")]
    Other(String),
}

/// Anything that accepts a feature record and returns one numeric prediction.
///
/// Implementations must be immutable once constructed; one instance is shared
/// by every concurrent request of an artifact generation.
pub trait Pipeline: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    /// Predict the log-scale price for one record.
    fn predict(&self, record: &FeatureRecord) -> Result<f64, InferenceError>;
}
