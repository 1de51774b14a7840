//! Sleep-stage vocabulary and the two labeling strategies.
//!
//! A [`Labeler`] is chosen once at pipeline construction:
//! - [`Labeler::Direct`] maps externally supplied annotation descriptions
//!   through a fixed lookup table; it never consumes the feature matrix.
//! - [`Labeler::Clustering`] partitions the feature matrix with k-means and
//!   translates cluster ids through a static stage table (see
//!   [`crate::cluster`]).
use std::fmt;

use ndarray::Array2;

use crate::cluster::ClusteringLabeler;
use crate::error::SomnoError;
use crate::features::FeatureLayout;
use crate::recording::Annotation;

/// Canonical sleep stages. `N3` absorbs the legacy stage-3/stage-4 split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StageLabel {
    Awake,
    N1,
    N2,
    N3,
    Rem,
    Unknown,
}

impl StageLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            StageLabel::Awake => "Awake",
            StageLabel::N1 => "N1",
            StageLabel::N2 => "N2",
            StageLabel::N3 => "N3",
            StageLabel::Rem => "REM",
            StageLabel::Unknown => "Unknown",
        }
    }

    /// Whether this stage counts toward total sleep time.
    pub fn is_sleep(&self) -> bool {
        !matches!(self, StageLabel::Awake | StageLabel::Unknown)
    }
}

impl fmt::Display for StageLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map an annotation description to a stage via exact string match.
///
/// Total: any description outside the table yields [`StageLabel::Unknown`].
pub fn map_description(description: &str) -> StageLabel {
    match description {
        "Sleep stage W" => StageLabel::Awake,
        "Sleep stage 1" => StageLabel::N1,
        "Sleep stage 2" => StageLabel::N2,
        // Stages 3 and 4 are reported jointly as N3.
        "Sleep stage 3" | "Sleep stage 4" => StageLabel::N3,
        "Sleep stage R" => StageLabel::Rem,
        "Sleep stage ?" => StageLabel::Unknown,
        _ => StageLabel::Unknown,
    }
}

/// Annotation-driven labeling: one stage per annotation record.
///
/// The resulting timeline is index-aligned with the annotation sequence, not
/// reconciled against epoch boundaries. When annotation spans do not match
/// the epoching grid the two sequences can diverge; that is a property of
/// the source data and is deliberately left visible.
#[derive(Debug, Clone)]
pub struct DirectLabeler {
    annotations: Vec<Annotation>,
}

impl DirectLabeler {
    pub fn new(annotations: Vec<Annotation>) -> Self {
        Self { annotations }
    }

    /// Label every record. Returns the timeline and the number of
    /// descriptions that fell outside the lookup table.
    pub fn label(&self) -> (Vec<StageLabel>, usize) {
        let mut unmapped = 0usize;
        let timeline = self
            .annotations
            .iter()
            .map(|a| {
                let stage = map_description(&a.description);
                if stage == StageLabel::Unknown && a.description != "Sleep stage ?" {
                    log::warn!("unmapped annotation description: {:?}", a.description);
                    unmapped += 1;
                }
                stage
            })
            .collect();
        (timeline, unmapped)
    }
}

/// Outcome of a labeling pass.
#[derive(Debug, Clone)]
pub struct LabelOutcome {
    pub timeline: Vec<StageLabel>,
    /// Annotation descriptions that resolved to `Unknown` via the fallback
    /// (direct mode only; always 0 in clustering mode).
    pub unmapped_annotations: usize,
}

/// Labeling strategy, fixed at pipeline construction time.
#[derive(Debug, Clone)]
pub enum Labeler {
    Direct(DirectLabeler),
    Clustering(ClusteringLabeler),
}

impl Labeler {
    /// The feature dimensionality this strategy consumes.
    pub fn feature_layout(&self) -> FeatureLayout {
        match self {
            Labeler::Direct(_) => FeatureLayout::ChannelAveraged,
            Labeler::Clustering(_) => FeatureLayout::ChannelConcatenated,
        }
    }

    /// Produce a stage timeline. Direct mode ignores `features` entirely.
    pub fn label(&self, features: &Array2<f64>) -> Result<LabelOutcome, SomnoError> {
        match self {
            Labeler::Direct(d) => {
                let (timeline, unmapped) = d.label();
                Ok(LabelOutcome { timeline, unmapped_annotations: unmapped })
            }
            Labeler::Clustering(c) => {
                let timeline = c.label(features)?;
                Ok(LabelOutcome { timeline, unmapped_annotations: 0 })
            }
        }
    }
}
