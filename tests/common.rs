/// Shared helpers for building synthetic recordings.
use ndarray::Array2;
use somno::{Annotation, Recording};
use std::f64::consts::PI;

#[allow(unused)]
pub const SFREQ: f64 = 64.0;

#[allow(unused)]
/// Single sine wave sampled at `sfreq`.
pub fn sine(freq: f64, sfreq: f64, n: usize) -> Vec<f64> {
    (0..n).map(|i| (2.0 * PI * freq * i as f64 / sfreq).sin()).collect()
}

#[allow(unused)]
/// Recording with every channel carrying the given sine frequency.
pub fn sine_recording(n_ch: usize, secs: f64, sfreq: f64, freq: f64) -> Recording {
    let n = (secs * sfreq) as usize;
    let data = Array2::from_shape_fn((n_ch, n), |(c, t)| {
        // Small per-channel phase offset so channels are not identical.
        (2.0 * PI * freq * t as f64 / sfreq + c as f64 * 0.1).sin()
    });
    Recording::new(data, sfreq)
}

#[allow(unused)]
/// Recording whose dominant frequency switches per 30 s block, giving the
/// clusterer well-separated feature groups.
pub fn block_recording(block_freqs: &[f64], n_ch: usize, sfreq: f64) -> Recording {
    let block_len = (30.0 * sfreq) as usize;
    let n = block_len * block_freqs.len();
    let data = Array2::from_shape_fn((n_ch, n), |(c, t)| {
        let freq = block_freqs[t / block_len];
        let amp = 1.0 + c as f64 * 0.05;
        amp * (2.0 * PI * freq * t as f64 / sfreq).sin()
    });
    Recording::new(data, sfreq)
}

#[allow(unused)]
/// Recording carrying one 30 s annotation per description, with enough
/// signal to cover them.
pub fn annotated_recording(descriptions: &[&str], sfreq: f64) -> Recording {
    let secs = 30.0 * descriptions.len() as f64;
    let annotations = descriptions
        .iter()
        .enumerate()
        .map(|(i, d)| Annotation::new(*d, i as f64 * 30.0, 30.0))
        .collect();
    sine_recording(2, secs, sfreq, 10.0).with_annotations(annotations)
}
