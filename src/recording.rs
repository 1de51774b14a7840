//! In-memory representation of a polysomnography recording.
//!
//! `data`: [C, T] f64, already band-pass filtered by the upstream loader.
//! The pipeline never mutates a [`Recording`] once constructed.
use ndarray::Array2;

/// A hypnogram annotation record: one scored interval of the recording.
///
/// `onset` and `duration` are in seconds from the start of the recording.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub description: String,
    pub onset: f64,
    pub duration: f64,
}

impl Annotation {
    pub fn new(description: impl Into<String>, onset: f64, duration: f64) -> Self {
        Self { description: description.into(), onset, duration }
    }
}

/// A continuous multi-channel recording at a fixed sampling rate.
#[derive(Debug, Clone)]
pub struct Recording {
    /// [C, T] samples, one row per channel.
    pub data: Array2<f64>,
    /// Sampling rate (Hz).
    pub sfreq: f64,
    /// Channel identifiers, row-aligned with `data`.
    pub ch_names: Vec<String>,
    /// Optional hypnogram annotations (may be empty).
    pub annotations: Vec<Annotation>,
}

impl Recording {
    /// Build a recording with generated channel names and no annotations.
    pub fn new(data: Array2<f64>, sfreq: f64) -> Self {
        let ch_names = (0..data.nrows()).map(|i| format!("ch{i}")).collect();
        Self { data, sfreq, ch_names, annotations: vec![] }
    }

    pub fn with_annotations(mut self, annotations: Vec<Annotation>) -> Self {
        self.annotations = annotations;
        self
    }

    pub fn n_channels(&self) -> usize {
        self.data.nrows()
    }

    pub fn n_samples(&self) -> usize {
        self.data.ncols()
    }

    /// Total recording length in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.n_samples() as f64 / self.sfreq
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    #[test]
    fn duration_from_samples_and_rate() {
        let rec = Recording::new(Array2::zeros((2, 256 * 90)), 256.0);
        approx::assert_abs_diff_eq!(rec.duration_secs(), 90.0, epsilon = 1e-9);
        assert_eq!(rec.n_channels(), 2);
        assert_eq!(rec.ch_names, vec!["ch0", "ch1"]);
    }
}
