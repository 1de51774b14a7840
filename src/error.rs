//! Error taxonomy for the analysis pipeline.
//!
//! Configuration and data-sufficiency problems are fatal and abort the run
//! before any summary is produced. Data-quality anomalies (unmapped
//! annotation descriptions, bands with no frequency bins) are never errors:
//! they resolve to `Unknown` / `0.0` and are logged instead.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SomnoError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("insufficient data: {n_epochs} epochs but {k} clusters requested")]
    InsufficientData { n_epochs: usize, k: usize },

    #[error("clustering failed: {0}")]
    Clustering(String),
}
