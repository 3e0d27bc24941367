//! Persisted artifacts and the process-wide cache that holds them.

pub mod cache;
pub mod loader;

pub use cache::{ArtifactCache, ArtifactGeneration};
pub use loader::{ArtifactLoader, FsArtifactLoader, LoadedArtifacts, atomic_write_json, hash_bytes};
