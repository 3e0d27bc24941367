//! Error types for the laptop-pricer-core crate.
//!
//! Every layer raises a typed failure carrying the offending field, the
//! missing path, or the underlying cause, so the transport layer can map it to
//! a status without re-deriving what went wrong.

use crate::pipeline::InferenceError;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Which of the two persisted artifacts an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Pipeline,
    Dataset,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactKind::Pipeline => write!(f, "pipeline"),
            ArtifactKind::Dataset => write!(f, "reference dataset"),
        }
    }
}

/// A specification field violated its domain constraint.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{field} must be one of [{}], got {value}", .allowed.join(", "))]
    NotInSet {
        field: &'static str,
        value: String,
        allowed: Vec<String>,
    },

    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("{field} must be a finite number greater than 0, got {value}")]
    NotPositive { field: &'static str, value: f64 },

    #[error("resolution must be in format 'WIDTHxHEIGHT', got '{0}'")]
    MalformedResolution(String),

    /// The body could not be read as a specification object at all.
    #[error("specification is not a valid object: {0}")]
    MalformedBody(String),
}

impl ValidationError {
    /// Boundary name of the offending field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::NotInSet { field, .. }
            | Self::OutOfRange { field, .. }
            | Self::NotPositive { field, .. } => field,
            Self::MalformedResolution(_) => "resolution",
            Self::MalformedBody(_) => "body",
        }
    }

    pub(crate) fn not_in_set<T: ToString>(field: &'static str, value: T, allowed: &[T]) -> Self {
        Self::NotInSet {
            field,
            value: value.to_string(),
            allowed: allowed.iter().map(ToString::to_string).collect(),
        }
    }
}

/// How the transport layer should classify a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    /// The caller sent a specification that fails validation.
    ClientError,
    /// Artifacts are absent or unreadable; nothing can be served until fixed.
    Unavailable,
    /// Inference or an internal invariant failed.
    Internal,
}

impl StatusClass {
    /// HTTP-equivalent status code.
    pub fn http_status(&self) -> u16 {
        match self {
            StatusClass::ClientError => 422,
            StatusClass::Unavailable => 503,
            StatusClass::Internal => 500,
        }
    }
}

/// Top-level error type for pricing operations.
#[derive(Debug, Error)]
pub enum PricerError {
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("{artifact} not found at {}", .path.display())]
    ArtifactMissing { artifact: ArtifactKind, path: PathBuf },

    #[error("Failed to load {artifact} from {}: {cause}", .path.display())]
    ArtifactCorrupt {
        artifact: ArtifactKind,
        path: PathBuf,
        #[source]
        cause: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Prediction failed: {cause}")]
    PredictionFailure {
        #[source]
        cause: InferenceError,
    },

    #[error("Dataset error: {0}")]
    Dataset(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Artifact cache lock poisoned")]
    LockPoisoned,
}

impl PricerError {
    pub fn prediction(cause: InferenceError) -> Self {
        Self::PredictionFailure { cause }
    }

    pub fn corrupt(
        artifact: ArtifactKind,
        path: impl Into<PathBuf>,
        cause: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::ArtifactCorrupt {
            artifact,
            path: path.into(),
            cause: cause.into(),
        }
    }

    pub fn dataset(msg: impl Into<String>) -> Self {
        Self::Dataset(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn status_class(&self) -> StatusClass {
        match self {
            Self::Validation(_) => StatusClass::ClientError,
            Self::ArtifactMissing { .. } | Self::ArtifactCorrupt { .. } => StatusClass::Unavailable,
            Self::PredictionFailure { .. }
            | Self::Dataset(_)
            | Self::Config(_)
            | Self::LockPoisoned => StatusClass::Internal,
        }
    }
}
