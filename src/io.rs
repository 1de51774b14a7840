//! Safetensors loader for pre-filtered recordings.
//!
//! The core treats file parsing as external glue: a companion exporter dumps
//! the already band-pass-filtered recording to a `.safetensors` file, which
//! this module maps onto a [`Recording`].
//!
//! Expected keys:
//!   data                     [C, T]  F32  filtered signal
//!   sfreq                    [1]     F32  sampling rate (Hz)
//!   ch_names                 U8      newline-joined channel names (optional)
//!   annotation_onsets        [N]     F32  seconds (optional)
//!   annotation_durations     [N]     F32  seconds (optional)
//!   annotation_descriptions  U8      newline-joined strings (optional)
use anyhow::{bail, Context, Result};
use ndarray::Array2;
use std::collections::HashMap;
use std::path::Path;

use crate::recording::{Annotation, Recording};

// ── Low-level safetensors parser (no dependency on the `safetensors` crate's
//    tensor types — we just need raw bytes → ndarray). ─────────────────────────

fn parse_header(bytes: &[u8]) -> Result<(HashMap<String, serde_json::Value>, usize)> {
    if bytes.len() < 8 {
        bail!("safetensors file too small");
    }
    let n = u64::from_le_bytes(bytes[..8].try_into().unwrap()) as usize;
    let header: HashMap<String, serde_json::Value> =
        serde_json::from_slice(&bytes[8..8 + n])
            .context("failed to parse safetensors header")?;
    Ok((header, 8 + n))
}

fn data_range(entry: &serde_json::Value) -> Result<(usize, usize)> {
    let offsets = entry["data_offsets"]
        .as_array()
        .context("tensor entry missing data_offsets")?;
    let s = offsets[0].as_u64().context("bad start offset")? as usize;
    let e = offsets[1].as_u64().context("bad end offset")? as usize;
    Ok((s, e))
}

fn read_f32_tensor(
    bytes: &[u8],
    data_start: usize,
    entry: &serde_json::Value,
) -> Result<Vec<f32>> {
    let (s, e) = data_range(entry)?;
    let raw = &bytes[data_start + s..data_start + e];
    Ok(raw
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect())
}

fn read_string_lines(
    bytes: &[u8],
    data_start: usize,
    entry: &serde_json::Value,
) -> Result<Vec<String>> {
    let (s, e) = data_range(entry)?;
    let raw = std::str::from_utf8(&bytes[data_start + s..data_start + e])
        .context("string tensor is not valid UTF-8")?;
    Ok(raw.split('\n').filter(|l| !l.is_empty()).map(String::from).collect())
}

fn shape_of(entry: &serde_json::Value) -> Result<Vec<usize>> {
    entry["shape"]
        .as_array()
        .context("tensor entry missing shape")?
        .iter()
        .map(|v| v.as_u64().map(|u| u as usize).context("bad shape value"))
        .collect()
}

/// Load a recording from a `.safetensors` file.
pub fn load_recording(path: &Path) -> Result<Recording> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let (header, data_start) = parse_header(&bytes)?;

    let data_entry = header.get("data").context("missing 'data' key")?;
    let shape = shape_of(data_entry)?;
    if shape.len() != 2 {
        bail!("'data' must be 2-D [channels, samples], got shape {shape:?}");
    }
    let data_vec = read_f32_tensor(&bytes, data_start, data_entry)?;
    let data: Array2<f64> = Array2::from_shape_vec((shape[0], shape[1]), data_vec)?
        .mapv(|v| v as f64);

    let sfreq_entry = header.get("sfreq").context("missing 'sfreq' key")?;
    let sfreq = read_f32_tensor(&bytes, data_start, sfreq_entry)?
        .first()
        .copied()
        .context("'sfreq' tensor is empty")? as f64;
    if !(sfreq.is_finite() && sfreq > 0.0) {
        bail!("sampling rate must be positive, got {sfreq}");
    }

    // Channel names are optional; fall back to generated ones.
    let ch_names = match header.get("ch_names") {
        Some(e) => read_string_lines(&bytes, data_start, e)?,
        None => (0..shape[0]).map(|i| format!("ch{i}")).collect(),
    };
    if ch_names.len() != shape[0] {
        bail!(
            "channel name count {} does not match channel count {}",
            ch_names.len(),
            shape[0]
        );
    }

    let annotations = load_annotations(&bytes, data_start, &header)?;

    Ok(Recording { data, sfreq, ch_names, annotations })
}

fn load_annotations(
    bytes: &[u8],
    data_start: usize,
    header: &HashMap<String, serde_json::Value>,
) -> Result<Vec<Annotation>> {
    let (onsets, durations, descs) = match (
        header.get("annotation_onsets"),
        header.get("annotation_durations"),
        header.get("annotation_descriptions"),
    ) {
        (Some(o), Some(d), Some(s)) => (
            read_f32_tensor(bytes, data_start, o)?,
            read_f32_tensor(bytes, data_start, d)?,
            read_string_lines(bytes, data_start, s)?,
        ),
        (None, None, None) => return Ok(vec![]),
        _ => bail!("annotation tensors must be present together or not at all"),
    };

    if onsets.len() != durations.len() || onsets.len() != descs.len() {
        bail!(
            "annotation tensor lengths disagree: {} onsets, {} durations, {} descriptions",
            onsets.len(),
            durations.len(),
            descs.len()
        );
    }

    Ok(descs
        .into_iter()
        .zip(onsets)
        .zip(durations)
        .map(|((description, onset), duration)| Annotation {
            description,
            onset: onset as f64,
            duration: duration as f64,
        })
        .collect())
}
