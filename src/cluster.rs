//! Annotation-free stage inference via k-means.
//!
//! Epoch feature vectors are partitioned into `k` groups (squared-Euclidean
//! k-means, seeded rng for reproducibility) and each cluster id is translated
//! to a stage through a static, id-keyed table.
//!
//! The id→stage table is an unvalidated heuristic: nothing guarantees that
//! cluster 0 is the deepest-sleep cluster for a given patient. It stands in
//! for a real classifier behind the same [`crate::stage::Labeler`] contract.
use linfa::traits::{Fit, Predict};
use linfa::DatasetBase;
use linfa_clustering::KMeans;
use ndarray::{Array1, Array2};
use rand_xoshiro::rand_core::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;

use crate::error::SomnoError;
use crate::stage::StageLabel;

/// Iteration cap for the k-means refinement loop.
const MAX_ITERATIONS: u64 = 300;

/// Partition `features` ([E, F]) into `k` clusters.
///
/// Deterministic for a fixed `seed`, `k`, and feature matrix. Fails with
/// `InsufficientData` when there are fewer epochs than clusters; no partial
/// clustering is attempted.
pub fn cluster_assignments(
    features: &Array2<f64>,
    k: usize,
    seed: u64,
) -> Result<Array1<usize>, SomnoError> {
    let n_epochs = features.nrows();
    if n_epochs < k {
        return Err(SomnoError::InsufficientData { n_epochs, k });
    }

    let rng = Xoshiro256Plus::seed_from_u64(seed);
    let dataset = DatasetBase::from(features.clone());
    let model = KMeans::params_with_rng(k, rng)
        .max_n_iterations(MAX_ITERATIONS)
        .tolerance(1e-8)
        .fit(&dataset)
        .map_err(|e| SomnoError::Clustering(e.to_string()))?;

    Ok(model.predict(&dataset))
}

/// Translate cluster ids to stages through the static table.
pub fn assign_stages(assignments: &Array1<usize>, stages: &[StageLabel]) -> Vec<StageLabel> {
    assignments.iter().map(|&id| stages[id]).collect()
}

/// Clustering-mode labeling strategy.
#[derive(Debug, Clone)]
pub struct ClusteringLabeler {
    k: usize,
    seed: u64,
    stages: Vec<StageLabel>,
}

impl ClusteringLabeler {
    /// `stages` must hold at least `k` entries (checked by
    /// [`crate::config::PipelineConfig::validate`] before the pipeline runs).
    pub fn new(k: usize, seed: u64, stages: Vec<StageLabel>) -> Self {
        Self { k, seed, stages }
    }

    pub fn cluster_count(&self) -> usize {
        self.k
    }

    /// One stage per feature row, in epoch order.
    pub fn label(&self, features: &Array2<f64>) -> Result<Vec<StageLabel>, SomnoError> {
        let assignments = cluster_assignments(features, self.k, self.seed)?;
        Ok(assign_stages(&assignments, &self.stages))
    }
}
