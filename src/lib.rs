//! # somno — sleep-stage analysis for polysomnography recordings
//!
//! `somno` turns a continuous, already band-pass-filtered multi-channel
//! recording into a per-epoch sleep-stage timeline and a stage-time summary.
//! Two labeling modes share one pipeline:
//!
//! - **annotation mode** — ground-truth hypnogram records are mapped through
//!   a fixed description → stage table;
//! - **clustering mode** — no annotations needed: band-power features are
//!   partitioned with seeded k-means and clusters translated to stages via a
//!   static table (a documented heuristic, not a validated classifier).
//!
//! ## Pipeline overview
//!
//! ```text
//! recording.safetensors
//!   │
//!   ├─ io::load_recording()   [C, T] f64 + sfreq + annotations
//!   ├─ epoch                  30 s non-overlapping windows
//!   ├─ features               periodogram → mean power per band
//!   │                         (δ [0.5,4) · θ [4,8) · α [8,13) · β [13,30))
//!   ├─ stage labeling         annotation lookup  OR  k-means + stage table
//!   └─ summary                minutes/hours per stage, TST, wake time
//! ```
//!
//! ## Quick start
//!
//! ```no_run
//! use somno::{analyze, LabelMode, PipelineConfig};
//! use somno::io::load_recording;
//! use std::path::Path;
//!
//! let recording = load_recording(Path::new("data/patient1.safetensors")).unwrap();
//! let cfg = PipelineConfig::default();
//!
//! let report = analyze(&recording, &cfg, LabelMode::Clustering).unwrap();
//! for (stage, minutes) in &report.summary.stage_minutes {
//!     println!("{stage}: {minutes} min");
//! }
//! println!("TST: {} min", report.summary.total_sleep_time);
//! ```
//!
//! ## Running individual steps
//!
//! Each stage of the pipeline is also exposed as a standalone function:
//!
//! ```no_run
//! use somno::{extract_features, segment, FeatureLayout, PipelineConfig, Recording};
//! use ndarray::Array2;
//!
//! let rec = Recording::new(Array2::zeros((2, 64 * 300)), 64.0);
//! let cfg = PipelineConfig::default();
//!
//! let epochs = segment(&rec, &cfg).unwrap();
//! let feats = extract_features(
//!     &epochs, rec.sfreq, &cfg.bands, FeatureLayout::ChannelConcatenated,
//! );
//! println!("feature matrix: {:?}", feats.dim());
//! ```

pub mod cluster;
pub mod config;
pub mod epoch;
pub mod error;
pub mod features;
pub mod io;
pub mod psd;
pub mod recording;
pub mod stage;
pub mod summary;

// ── Crate-root re-exports ─────────────────────────────────────────────────
//
// Everything a downstream user is likely to need is available directly as
// `somno::Foo` without having to know the internal module layout.

// cluster
pub use cluster::{assign_stages, cluster_assignments, ClusteringLabeler};

// config
pub use config::{default_cluster_stages, PipelineConfig, DEFAULT_CLUSTER_SEED};

// epoch
pub use epoch::{n_epochs, segment, Epoch, Epochs};

// error
pub use error::SomnoError;

// features
pub use features::{
    band_power_means, canonical_bands, channel_band_powers, extract_features,
    Band, FeatureLayout,
};

// psd
pub use psd::{hann, periodogram};

// recording
pub use recording::{Annotation, Recording};

// stage
pub use stage::{map_description, DirectLabeler, LabelOutcome, Labeler, StageLabel};

// summary
pub use summary::{summarize, SleepSummary};

/// How stage labels are produced, chosen at pipeline construction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelMode {
    /// Use the recording's annotation records (ground truth).
    Annotations,
    /// Infer stages from band-power features via k-means.
    Clustering,
}

/// Everything a downstream presentation layer needs from one run.
#[derive(Debug, Clone)]
pub struct SleepReport {
    pub summary: SleepSummary,
    /// Stage per epoch (clustering mode) or per annotation record
    /// (annotation mode).
    pub timeline: Vec<StageLabel>,
    /// Shape of the extracted feature matrix, `(epochs, features)`.
    pub feature_shape: (usize, usize),
    /// Annotation descriptions that fell back to `Unknown` (0 in
    /// clustering mode).
    pub unmapped_annotations: usize,
}

/// Run the **full analysis pipeline** on one recording.
///
/// This is the main entry point for the `somno` library.
///
/// # Pipeline steps
///
/// 1. Validate `cfg` (fail fast, nothing partial is produced).
/// 2. Segment the recording into fixed-length epochs; a recording shorter
///    than one epoch yields zero epochs.
/// 3. Extract the band-power feature matrix in the layout required by the
///    selected mode (channel-averaged for annotations, channel-concatenated
///    for clustering).
/// 4. Label: annotation lookup, or seeded k-means plus the static
///    cluster → stage table.
/// 5. Aggregate the timeline into per-stage minutes/hours and totals.
///
/// # Errors
///
/// * [`SomnoError::InvalidConfiguration`] — bad duration/overlap/band/table
///   values.
/// * [`SomnoError::InsufficientData`] — clustering mode with fewer epochs
///   than clusters.
/// * [`SomnoError::Clustering`] — the k-means backend failed to fit.
///
/// Unmapped annotation descriptions and empty bands are not errors; they
/// resolve to `Unknown` / `0.0` and are reported via the logger and
/// [`SleepReport::unmapped_annotations`].
pub fn analyze(
    recording: &Recording,
    cfg: &PipelineConfig,
    mode: LabelMode,
) -> Result<SleepReport, SomnoError> {
    cfg.validate()?;

    let labeler = match mode {
        LabelMode::Annotations => {
            Labeler::Direct(DirectLabeler::new(recording.annotations.clone()))
        }
        LabelMode::Clustering => Labeler::Clustering(ClusteringLabeler::new(
            cfg.cluster_count,
            cfg.cluster_seed,
            cfg.cluster_stages.clone(),
        )),
    };

    let epochs = segment(recording, cfg)?;
    log::debug!(
        "{} epochs of {} s from a {:.1} s recording",
        epochs.len(),
        cfg.epoch_duration,
        recording.duration_secs()
    );

    let features = extract_features(
        &epochs,
        recording.sfreq,
        &cfg.bands,
        labeler.feature_layout(),
    );
    let feature_shape = features.dim();

    let outcome = labeler.label(&features)?;
    if outcome.unmapped_annotations > 0 {
        log::warn!(
            "{} annotation description(s) resolved to Unknown",
            outcome.unmapped_annotations
        );
    }

    let summary = summarize(
        &outcome.timeline,
        cfg.epoch_minutes(),
        cfg.time_rounding_decimals,
    );

    Ok(SleepReport {
        summary,
        timeline: outcome.timeline,
        feature_shape,
        unmapped_annotations: outcome.unmapped_annotations,
    })
}
