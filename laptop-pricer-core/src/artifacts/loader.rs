//! Reading and deserializing artifacts from durable storage.

use crate::config::ArtifactsConfig;
use crate::dataset::ReferenceDataset;
use crate::error::{ArtifactKind, PricerError};
use crate::pipeline::{Pipeline, RegressionPipeline};
use sha2::{Digest, Sha256};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};

/// Both artifacts produced by one load.
pub struct LoadedArtifacts {
    pub pipeline: Arc<dyn Pipeline>,
    pub dataset: ReferenceDataset,
}

/// Source of artifact pairs. Every call performs a fresh read and deserialization.
pub trait ArtifactLoader: Send + Sync {
    /// Where the artifacts come from, for logs.
    fn describe(&self) -> String;

    fn load(&self) -> Result<LoadedArtifacts, PricerError>;
}

/// Loads the JSON pipeline and dataset files from the filesystem.
#[derive(Debug, Clone)]
pub struct FsArtifactLoader {
    pipeline_path: PathBuf,
    dataset_path: PathBuf,
}

impl FsArtifactLoader {
    pub fn new(pipeline_path: impl Into<PathBuf>, dataset_path: impl Into<PathBuf>) -> Self {
        Self {
            pipeline_path: pipeline_path.into(),
            dataset_path: dataset_path.into(),
        }
    }

    pub fn from_config(config: &ArtifactsConfig) -> Self {
        Self::new(&config.pipeline_path, &config.dataset_path)
    }

    pub fn pipeline_path(&self) -> &Path {
        &self.pipeline_path
    }

    pub fn dataset_path(&self) -> &Path {
        &self.dataset_path
    }
}

impl ArtifactLoader for FsArtifactLoader {
    fn describe(&self) -> String {
        format!(
            "pipeline={} dataset={}",
            self.pipeline_path.display(),
            self.dataset_path.display()
        )
    }

    fn load(&self) -> Result<LoadedArtifacts, PricerError> {
        // Both locations are checked before anything is deserialized.
        for (artifact, path) in [
            (ArtifactKind::Pipeline, &self.pipeline_path),
            (ArtifactKind::Dataset, &self.dataset_path),
        ] {
            if !path.exists() {
                error!(%artifact, path = %path.display(), "Artifact not found");
                return Err(PricerError::ArtifactMissing {
                    artifact,
                    path: path.clone(),
                });
            }
        }

        let pipeline: RegressionPipeline = read_json(ArtifactKind::Pipeline, &self.pipeline_path)?;
        pipeline
            .check()
            .map_err(|e| PricerError::corrupt(ArtifactKind::Pipeline, &self.pipeline_path, e))?;
        info!(
            path = %self.pipeline_path.display(),
            name = %pipeline.name,
            estimator = pipeline.estimator.kind(),
            inputs = pipeline.transformer.output_width(),
            "Pipeline loaded"
        );

        let dataset: ReferenceDataset = read_json(ArtifactKind::Dataset, &self.dataset_path)?;
        dataset
            .check()
            .map_err(|e| PricerError::corrupt(ArtifactKind::Dataset, &self.dataset_path, e))?;
        info!(
            path = %self.dataset_path.display(),
            rows = dataset.row_count(),
            columns = dataset.column_count(),
            "Reference dataset loaded"
        );

        Ok(LoadedArtifacts {
            pipeline: Arc::new(pipeline),
            dataset,
        })
    }
}

fn read_json<T: serde::de::DeserializeOwned>(
    artifact: ArtifactKind,
    path: &Path,
) -> Result<T, PricerError> {
    let bytes = std::fs::read(path).map_err(|e| {
        error!(%artifact, path = %path.display(), error = %e, "Failed to read artifact");
        PricerError::corrupt(artifact, path, e)
    })?;
    let digest = hash_bytes(&bytes);
    tracing::debug!(%artifact, sha256 = %digest, bytes = bytes.len(), "Artifact read");
    serde_json::from_slice(&bytes).map_err(|e| {
        error!(%artifact, path = %path.display(), error = %e, "Failed to deserialize artifact");
        PricerError::corrupt(artifact, path, e)
    })
}

/// Compute SHA-256 hash of arbitrary bytes.
pub fn hash_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

/// Atomically write JSON data to a file.
///
/// Writes to a `.tmp` sibling, then renames over the target so a concurrent
/// reload never observes a half-written artifact. Creates parent directories.
pub fn atomic_write_json<T: serde::Serialize>(path: &Path, data: &T) -> io::Result<()> {
    let json = serde_json::to_vec_pretty(data).map_err(io::Error::other)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, json)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{ColumnStep, ColumnTransformer, Estimator};
    use serde_json::json;
    use tempfile::TempDir;

    fn write_valid(dir: &Path) -> FsArtifactLoader {
        let pipeline = RegressionPipeline::new(
            ColumnTransformer::new(vec![ColumnStep::Passthrough {
                column: "Ram".into(),
            }]),
            Estimator::Linear {
                coefficients: vec![0.1],
                intercept: 6.0,
            },
        );
        let dataset = ReferenceDataset::new(vec!["Company".into()], vec![vec![json!("Dell")]]);
        let loader = FsArtifactLoader::new(dir.join("pipe.json"), dir.join("df.json"));
        atomic_write_json(loader.pipeline_path(), &pipeline).unwrap();
        atomic_write_json(loader.dataset_path(), &dataset).unwrap();
        loader
    }

    #[test]
    fn test_load_valid_artifacts() {
        let dir = TempDir::new().unwrap();
        let loaded = write_valid(dir.path()).load().unwrap();
        assert_eq!(loaded.pipeline.name(), "regression_pipeline");
        assert_eq!(loaded.dataset.row_count(), 1);
    }

    #[test]
    fn test_missing_dataset_reported_before_parsing_pipeline() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("pipe.json"), b"not json").unwrap();
        let loader = FsArtifactLoader::new(dir.path().join("pipe.json"), dir.path().join("df.json"));
        match loader.load() {
            Err(PricerError::ArtifactMissing { artifact, path }) => {
                assert_eq!(artifact, ArtifactKind::Dataset);
                assert_eq!(path, dir.path().join("df.json"));
            }
            other => panic!("expected ArtifactMissing, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_corrupt_pipeline() {
        let dir = TempDir::new().unwrap();
        let loader = write_valid(dir.path());
        std::fs::write(loader.pipeline_path(), b"{\"transformer\": 3}").unwrap();
        assert!(matches!(
            loader.load(),
            Err(PricerError::ArtifactCorrupt {
                artifact: ArtifactKind::Pipeline,
                ..
            })
        ));
    }

    #[test]
    fn test_inconsistent_pipeline_is_corrupt() {
        let dir = TempDir::new().unwrap();
        let loader = write_valid(dir.path());
        let bad = json!({
            "transformer": {"steps": [{"kind": "passthrough", "column": "Ram"}]},
            "estimator": {"kind": "linear", "coefficients": [1.0, 2.0], "intercept": 0.0}
        });
        atomic_write_json(loader.pipeline_path(), &bad).unwrap();
        assert!(matches!(
            loader.load(),
            Err(PricerError::ArtifactCorrupt { .. })
        ));
    }

    #[test]
    fn test_hash_bytes_is_stable() {
        assert_eq!(
            hash_bytes(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
