//! Fixed-length epoching of a continuous recording.
//!
//! Slices [C, T] data into windows of `epoch_duration` seconds stepping by
//! `epoch_duration − epoch_overlap`, dropping any trailing incomplete
//! window. A recording shorter than one epoch yields an empty sequence.
use ndarray::{s, Array2};

use crate::config::PipelineConfig;
use crate::error::SomnoError;
use crate::recording::Recording;

/// One fixed-duration window of the recording.
#[derive(Debug, Clone, PartialEq)]
pub struct Epoch {
    /// Position in the epoch sequence (0-based).
    pub index: usize,
    /// First sample of the window in the source recording.
    pub start_sample: usize,
    /// [C, epoch_samples] copy of the windowed data.
    pub data: Array2<f64>,
}

impl Epoch {
    pub fn n_channels(&self) -> usize {
        self.data.nrows()
    }

    pub fn n_samples(&self) -> usize {
        self.data.ncols()
    }
}

/// Number of complete windows: `(T − S) / step + 1`, or 0 when `T < S`.
pub fn n_epochs(n_samples: usize, epoch_samples: usize, step_samples: usize) -> usize {
    if n_samples < epoch_samples || epoch_samples == 0 || step_samples == 0 {
        return 0;
    }
    (n_samples - epoch_samples) / step_samples + 1
}

/// Lazy, finite, restartable sequence of [`Epoch`]s over a recording.
///
/// The iterator is `Clone`, so a fresh pass can be taken at any point; the
/// source recording is never mutated.
#[derive(Debug, Clone)]
pub struct Epochs<'a> {
    recording: &'a Recording,
    epoch_samples: usize,
    step_samples: usize,
    index: usize,
    total: usize,
}

impl<'a> Epochs<'a> {
    /// Validates the configuration and binds it to `recording`'s sampling
    /// rate. Fails with `InvalidConfiguration` when the duration/overlap pair
    /// rounds to a zero-length window or step at this rate.
    pub fn new(recording: &'a Recording, cfg: &PipelineConfig) -> Result<Self, SomnoError> {
        cfg.validate()?;
        let epoch_samples = cfg.epoch_samples(recording.sfreq);
        let step_samples = cfg.step_samples(recording.sfreq);
        if epoch_samples == 0 {
            return Err(SomnoError::InvalidConfiguration(format!(
                "epoch duration {} s is shorter than one sample at {} Hz",
                cfg.epoch_duration, recording.sfreq
            )));
        }
        if step_samples == 0 {
            return Err(SomnoError::InvalidConfiguration(format!(
                "step (duration {} s − overlap {} s) is shorter than one sample at {} Hz",
                cfg.epoch_duration, cfg.epoch_overlap, recording.sfreq
            )));
        }
        let total = n_epochs(recording.n_samples(), epoch_samples, step_samples);
        Ok(Self { recording, epoch_samples, step_samples, index: 0, total })
    }

    /// Samples per epoch at the recording's sampling rate.
    pub fn epoch_samples(&self) -> usize {
        self.epoch_samples
    }
}

impl<'a> Iterator for Epochs<'a> {
    type Item = Epoch;

    fn next(&mut self) -> Option<Epoch> {
        if self.index >= self.total {
            return None;
        }
        let index = self.index;
        let start = index * self.step_samples;
        let data = self
            .recording
            .data
            .slice(s![.., start..start + self.epoch_samples])
            .to_owned();
        self.index += 1;
        Some(Epoch { index, start_sample: start, data })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.total - self.index;
        (left, Some(left))
    }
}

impl<'a> ExactSizeIterator for Epochs<'a> {}

/// Segment `recording` into a vector of epochs.
pub fn segment(recording: &Recording, cfg: &PipelineConfig) -> Result<Vec<Epoch>, SomnoError> {
    Ok(Epochs::new(recording, cfg)?.collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    fn rec(n_ch: usize, secs: f64, sfreq: f64) -> Recording {
        Recording::new(Array2::zeros((n_ch, (secs * sfreq) as usize)), sfreq)
    }

    #[test]
    fn count_without_overlap() {
        // 95 s / 30 s epochs → 3 complete windows, 5 s dropped.
        let r = rec(2, 95.0, 64.0);
        let cfg = PipelineConfig::default();
        assert_eq!(segment(&r, &cfg).unwrap().len(), 3);
    }

    #[test]
    fn count_with_overlap() {
        // step = 20 s → (120 − 30) / 20 + 1 = 5.
        let r = rec(1, 120.0, 64.0);
        let cfg = PipelineConfig { epoch_overlap: 10.0, ..PipelineConfig::default() };
        let epochs = segment(&r, &cfg).unwrap();
        assert_eq!(epochs.len(), 5);
        assert_eq!(epochs[1].start_sample, (20.0 * 64.0) as usize);
    }

    #[test]
    fn short_recording_is_empty_not_error() {
        let r = rec(4, 10.0, 64.0);
        assert!(segment(&r, &PipelineConfig::default()).unwrap().is_empty());
    }

    #[test]
    fn epoch_shape_and_indices() {
        let r = rec(3, 90.0, 64.0);
        let epochs = segment(&r, &PipelineConfig::default()).unwrap();
        for (i, ep) in epochs.iter().enumerate() {
            assert_eq!(ep.index, i);
            assert_eq!(ep.n_channels(), 3);
            assert_eq!(ep.n_samples(), 30 * 64);
        }
    }

    #[test]
    fn iterator_is_restartable() {
        let r = rec(1, 90.0, 64.0);
        let cfg = PipelineConfig::default();
        let iter = Epochs::new(&r, &cfg).unwrap();
        let first: Vec<_> = iter.clone().map(|e| e.start_sample).collect();
        let second: Vec<_> = iter.map(|e| e.start_sample).collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
    }

    #[test]
    fn overlap_ge_duration_rejected() {
        let r = rec(1, 90.0, 64.0);
        let cfg = PipelineConfig { epoch_overlap: 30.0, ..PipelineConfig::default() };
        assert!(matches!(
            segment(&r, &cfg),
            Err(SomnoError::InvalidConfiguration(_))
        ));
    }
}
