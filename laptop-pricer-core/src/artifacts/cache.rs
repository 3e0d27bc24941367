//! Process-wide artifact cache.
//!
//! The cache is an explicit object owned by the serving layer and injected
//! into the prediction service. Lifecycle:
//!
//! - cold until the first accessor call or an explicit [`ArtifactCache::load`];
//! - at most one load runs at a time, so concurrent cold callers cause exactly
//!   one deserialization of each artifact;
//! - [`ArtifactCache::reload`] discards the resident generation and installs a
//!   fresh one. Pipeline and dataset are swapped together as a single
//!   [`ArtifactGeneration`], so no reader ever pairs halves of two generations;
//! - readers hold the `RwLock` read guard only long enough to clone the
//!   resident `Arc`; inference then runs outside any lock.

use crate::artifacts::loader::{ArtifactLoader, FsArtifactLoader};
use crate::config::ArtifactsConfig;
use crate::dataset::ReferenceDataset;
use crate::error::PricerError;
use crate::pipeline::Pipeline;
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use tracing::{info, warn};

/// The pipeline and dataset produced by one load or reload.
pub struct ArtifactGeneration {
    /// Monotonic counter, starting at 1 for the first successful load.
    pub generation: u64,
    pub pipeline: Arc<dyn Pipeline>,
    pub dataset: Arc<ReferenceDataset>,
    pub loaded_at: DateTime<Utc>,
}

impl fmt::Debug for ArtifactGeneration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArtifactGeneration")
            .field("generation", &self.generation)
            .field("pipeline", &self.pipeline.name())
            .field("dataset_rows", &self.dataset.row_count())
            .field("loaded_at", &self.loaded_at)
            .finish()
    }
}

/// Holds the resident artifact generation.
pub struct ArtifactCache {
    loader: Box<dyn ArtifactLoader>,
    resident: RwLock<Option<Arc<ArtifactGeneration>>>,
    /// Serializes loads and reloads.
    load_gate: Mutex<()>,
    generations: AtomicU64,
}

impl ArtifactCache {
    pub fn new(loader: impl ArtifactLoader + 'static) -> Self {
        Self {
            loader: Box::new(loader),
            resident: RwLock::new(None),
            load_gate: Mutex::new(()),
            generations: AtomicU64::new(0),
        }
    }

    /// Cache backed by the filesystem locations in `config`.
    pub fn from_config(config: &ArtifactsConfig) -> Self {
        Self::new(FsArtifactLoader::from_config(config))
    }

    /// Whether a generation is resident. Never triggers a load.
    pub fn is_loaded(&self) -> bool {
        self.resident().ok().flatten().is_some()
    }

    /// The resident generation, loading it on first use.
    pub fn current(&self) -> Result<Arc<ArtifactGeneration>, PricerError> {
        match self.resident()? {
            Some(generation) => Ok(generation),
            None => self.load(),
        }
    }

    pub fn get_pipeline(&self) -> Result<Arc<dyn Pipeline>, PricerError> {
        Ok(Arc::clone(&self.current()?.pipeline))
    }

    pub fn get_dataframe(&self) -> Result<Arc<ReferenceDataset>, PricerError> {
        Ok(Arc::clone(&self.current()?.dataset))
    }

    /// Load both artifacts unless a generation is already resident.
    pub fn load(&self) -> Result<Arc<ArtifactGeneration>, PricerError> {
        if let Some(generation) = self.resident()? {
            return Ok(generation);
        }

        let _gate = self.load_gate.lock().map_err(|_| PricerError::LockPoisoned)?;
        // Another caller may have finished loading while we waited on the gate.
        if let Some(generation) = self.resident()? {
            return Ok(generation);
        }

        info!(source = %self.loader.describe(), "Loading artifacts");
        let generation = self.fetch()?;
        self.install(Some(Arc::clone(&generation)))?;
        Ok(generation)
    }

    /// Discard the resident generation and load a fresh one.
    ///
    /// If the fresh load fails the cache is left cold and the error returned;
    /// the next accessor call retries the load.
    pub fn reload(&self) -> Result<Arc<ArtifactGeneration>, PricerError> {
        let _gate = self.load_gate.lock().map_err(|_| PricerError::LockPoisoned)?;
        info!(source = %self.loader.describe(), "Forcing artifact reload");
        self.install(None)?;

        let generation = self.fetch().inspect_err(|e| {
            warn!(error = %e, "Reload failed, artifact cache is cold");
        })?;
        self.install(Some(Arc::clone(&generation)))?;
        Ok(generation)
    }

    fn resident(&self) -> Result<Option<Arc<ArtifactGeneration>>, PricerError> {
        let guard = self.resident.read().map_err(|_| PricerError::LockPoisoned)?;
        Ok(guard.clone())
    }

    fn install(&self, generation: Option<Arc<ArtifactGeneration>>) -> Result<(), PricerError> {
        let mut guard = self
            .resident
            .write()
            .map_err(|_| PricerError::LockPoisoned)?;
        *guard = generation;
        Ok(())
    }

    fn fetch(&self) -> Result<Arc<ArtifactGeneration>, PricerError> {
        let loaded = self.loader.load()?;
        let generation = self.generations.fetch_add(1, Ordering::SeqCst) + 1;
        info!(
            generation,
            pipeline = loaded.pipeline.name(),
            dataset_rows = loaded.dataset.row_count(),
            "Artifacts resident"
        );
        Ok(Arc::new(ArtifactGeneration {
            generation,
            pipeline: loaded.pipeline,
            dataset: Arc::new(loaded.dataset),
            loaded_at: Utc::now(),
        }))
    }
}
