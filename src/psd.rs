//! Single-window power spectral density estimate.
//!
//! One Hann-windowed, mean-detrended periodogram over the full window,
//! matching `scipy.signal.welch(x, fs, nperseg=len(x))`:
//!   1. x -= mean(x)                    (constant detrend)
//!   2. x *= hann(N)                    (periodic window)
//!   3. X = fft(x)                      (half spectrum kept, N/2 + 1 bins)
//!   4. psd[k] = |X[k]|² · 2 / (fs · Σw²)   (DC/Nyquist bins un-doubled)
//!
//! Frequency resolution is fs / N; no sub-windowing or segment averaging.
use rustfft::FftPlanner;

/// Periodic Hann window of length `n`.
pub fn hann(n: usize) -> Vec<f64> {
    let nf = n as f64;
    (0..n)
        .map(|i| 0.5 * (1.0 - (2.0 * std::f64::consts::PI * i as f64 / nf).cos()))
        .collect()
}

/// One-sided PSD of `x` in V²/Hz. Returns `(freqs, psd)`, each of length
/// `N/2 + 1`.
///
/// Deterministic: identical input yields bit-identical output. A constant
/// (zero-variance) input produces an all-zero spectrum because the mean is
/// removed before windowing.
pub fn periodogram(x: &[f64], sfreq: f64) -> (Vec<f64>, Vec<f64>) {
    let n = x.len();
    if n == 0 {
        return (vec![], vec![]);
    }

    let mean = x.iter().sum::<f64>() / n as f64;
    let w = hann(n);
    let s2: f64 = w.iter().map(|v| v * v).sum();

    // rustfft has no dedicated rfft: run the full FFT and keep the first
    // N/2 + 1 bins.
    let mut planner: FftPlanner<f64> = FftPlanner::new();
    let fft = planner.plan_fft_forward(n);
    let mut buf: Vec<rustfft::num_complex::Complex<f64>> = x
        .iter()
        .zip(&w)
        .map(|(&v, &wi)| rustfft::num_complex::Complex { re: (v - mean) * wi, im: 0.0 })
        .collect();
    fft.process(&mut buf);

    let rfft_len = n / 2 + 1;
    let scale = 1.0 / (sfreq * s2);
    let freq_res = sfreq / n as f64;

    let mut freqs = Vec::with_capacity(rfft_len);
    let mut psd = Vec::with_capacity(rfft_len);
    for k in 0..rfft_len {
        // Interior bins carry both halves of the spectrum; DC and (for even
        // N) the Nyquist bin appear only once.
        let one_sided = if k == 0 || (n % 2 == 0 && k == n / 2) { 1.0 } else { 2.0 };
        freqs.push(k as f64 * freq_res);
        psd.push(buf[k].norm_sqr() * scale * one_sided);
    }
    (freqs, psd)
}
