//! Pipeline configuration.
//!
//! [`PipelineConfig`] holds every tunable parameter of the analysis. All
//! fields are `pub` so a config can be built with struct-update syntax:
//!
//! ```
//! use somno::PipelineConfig;
//!
//! let cfg = PipelineConfig {
//!     epoch_duration: 20.0,   // shorter windows
//!     cluster_count: 4,
//!     ..PipelineConfig::default()
//! };
//! ```
use crate::error::SomnoError;
use crate::features::{canonical_bands, Band};
use crate::stage::StageLabel;

/// Default rng seed for the k-means initialisation.
pub const DEFAULT_CLUSTER_SEED: u64 = 0;

/// Default cluster-id → stage table.
///
/// Heuristic and unvalidated: the ids are not tied to any measured cluster
/// characteristic. Kept as data so an alternative table can be injected.
pub fn default_cluster_stages() -> Vec<StageLabel> {
    vec![
        StageLabel::N3,    // 0: deep, restorative sleep
        StageLabel::N2,    // 1: most common, light sleep
        StageLabel::Awake, // 2: wakefulness
        StageLabel::N1,    // 3: transitional, lightest sleep
        StageLabel::Rem,   // 4: rapid eye movement
    ]
}

/// Configuration for the full analysis pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Epoch length in seconds. The standard scoring window is 30 s.
    ///
    /// Default: `30.0`.
    pub epoch_duration: f64,

    /// Overlap between consecutive epochs in seconds; must satisfy
    /// `0 ≤ overlap < duration`.
    ///
    /// Default: `0.0` (non-overlapping windows).
    pub epoch_overlap: f64,

    /// Frequency bands reduced from each channel's PSD.
    ///
    /// Default: delta [0.5, 4), theta [4, 8), alpha [8, 13), beta [13, 30).
    pub bands: Vec<Band>,

    /// Number of k-means clusters in annotation-free mode.
    ///
    /// Default: `5` (one per expected stage).
    pub cluster_count: usize,

    /// Seed for the k-means rng; fixed so runs are reproducible.
    ///
    /// Default: [`DEFAULT_CLUSTER_SEED`].
    pub cluster_seed: u64,

    /// Cluster-id → stage table; must hold at least `cluster_count` entries.
    ///
    /// Default: [`default_cluster_stages`].
    pub cluster_stages: Vec<StageLabel>,

    /// Decimal places for the hours column of the summary (minutes are
    /// reported exact).
    ///
    /// Default: `2`.
    pub time_rounding_decimals: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            epoch_duration: 30.0,
            epoch_overlap: 0.0,
            bands: canonical_bands(),
            cluster_count: 5,
            cluster_seed: DEFAULT_CLUSTER_SEED,
            cluster_stages: default_cluster_stages(),
            time_rounding_decimals: 2,
        }
    }
}

impl PipelineConfig {
    /// Samples per epoch at `sfreq` Hz: `floor(duration × sfreq)`.
    pub fn epoch_samples(&self, sfreq: f64) -> usize {
        (self.epoch_duration * sfreq) as usize
    }

    /// Samples between consecutive epoch starts:
    /// `floor((duration − overlap) × sfreq)`.
    pub fn step_samples(&self, sfreq: f64) -> usize {
        ((self.epoch_duration - self.epoch_overlap) * sfreq) as usize
    }

    /// Epoch length in minutes (the aggregation unit).
    pub fn epoch_minutes(&self) -> f64 {
        self.epoch_duration / 60.0
    }

    /// Check every field; the pipeline refuses to run on a bad config.
    pub fn validate(&self) -> Result<(), SomnoError> {
        if !self.epoch_duration.is_finite() || self.epoch_duration <= 0.0 {
            return Err(SomnoError::InvalidConfiguration(format!(
                "epoch duration must be positive, got {}",
                self.epoch_duration
            )));
        }
        if !self.epoch_overlap.is_finite() || self.epoch_overlap < 0.0 {
            return Err(SomnoError::InvalidConfiguration(format!(
                "epoch overlap must be non-negative, got {}",
                self.epoch_overlap
            )));
        }
        if self.epoch_overlap >= self.epoch_duration {
            return Err(SomnoError::InvalidConfiguration(format!(
                "epoch overlap {} s must be smaller than the epoch duration {} s",
                self.epoch_overlap, self.epoch_duration
            )));
        }
        if self.bands.is_empty() {
            return Err(SomnoError::InvalidConfiguration(
                "at least one frequency band is required".into(),
            ));
        }
        for band in &self.bands {
            if !(band.low >= 0.0 && band.high > band.low) {
                return Err(SomnoError::InvalidConfiguration(format!(
                    "band '{}' has invalid range [{}, {})",
                    band.name, band.low, band.high
                )));
            }
        }
        if self.cluster_count == 0 {
            return Err(SomnoError::InvalidConfiguration(
                "cluster count must be at least 1".into(),
            ));
        }
        if self.cluster_stages.len() < self.cluster_count {
            return Err(SomnoError::InvalidConfiguration(format!(
                "cluster-to-stage table has {} entries but {} clusters were requested",
                self.cluster_stages.len(),
                self.cluster_count
            )));
        }
        Ok(())
    }
}
