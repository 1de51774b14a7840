//! Stage-time aggregation.
//!
//! Turns a per-epoch stage timeline into minutes/hours per stage plus the
//! derived totals. Pure and deterministic; an empty timeline yields an
//! all-zero summary.
use std::collections::BTreeMap;

use crate::stage::StageLabel;

/// Per-stage durations and derived totals for one run.
///
/// Only stages that actually occur appear in the maps, mirroring a plain
/// occurrence count; `total_wake_time` is 0 when `Awake` never occurs.
#[derive(Debug, Clone, PartialEq)]
pub struct SleepSummary {
    /// Minutes spent in each observed stage.
    pub stage_minutes: BTreeMap<StageLabel, f64>,
    /// Hours spent in each observed stage, rounded to the configured number
    /// of decimals.
    pub stage_hours: BTreeMap<StageLabel, f64>,
    /// Σ minutes over sleep stages (everything except Awake and Unknown).
    pub total_sleep_time: f64,
    /// Minutes spent Awake.
    pub total_wake_time: f64,
}

fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Aggregate a timeline into per-stage durations.
///
/// `epoch_minutes` is the fixed epoch duration in minutes (0.5 for the
/// standard 30 s epoch). Minutes are exact counts × duration; only the hours
/// map is rounded.
pub fn summarize(timeline: &[StageLabel], epoch_minutes: f64, decimals: u32) -> SleepSummary {
    let mut counts: BTreeMap<StageLabel, usize> = BTreeMap::new();
    for &stage in timeline {
        *counts.entry(stage).or_insert(0) += 1;
    }

    let mut stage_minutes = BTreeMap::new();
    let mut stage_hours = BTreeMap::new();
    let mut total_sleep_time = 0.0;
    let mut total_wake_time = 0.0;

    for (&stage, &count) in &counts {
        let minutes = count as f64 * epoch_minutes;
        stage_minutes.insert(stage, minutes);
        stage_hours.insert(stage, round_to(minutes / 60.0, decimals));
        if stage.is_sleep() {
            total_sleep_time += minutes;
        } else if stage == StageLabel::Awake {
            total_wake_time = minutes;
        }
    }

    SleepSummary { stage_minutes, stage_hours, total_sleep_time, total_wake_time }
}

#[cfg(test)]
mod tests {
    use super::*;
    use StageLabel::*;

    #[test]
    fn basic_aggregation() {
        // Scenario: W, N2, R with 30 s epochs.
        let s = summarize(&[Awake, N2, Rem], 0.5, 2);
        assert_eq!(s.stage_minutes[&Awake], 0.5);
        assert_eq!(s.stage_minutes[&N2], 0.5);
        assert_eq!(s.stage_minutes[&Rem], 0.5);
        approx::assert_abs_diff_eq!(s.total_sleep_time, 1.0, epsilon = 1e-12);
        approx::assert_abs_diff_eq!(s.total_wake_time, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn unknown_counts_toward_neither_total() {
        let s = summarize(&[Awake, Unknown], 0.5, 2);
        approx::assert_abs_diff_eq!(s.total_sleep_time, 0.0, epsilon = 1e-12);
        approx::assert_abs_diff_eq!(s.total_wake_time, 0.5, epsilon = 1e-12);
        assert_eq!(s.stage_minutes[&Unknown], 0.5);
    }

    #[test]
    fn total_time_is_conserved() {
        let timeline = vec![N1, N2, N2, N3, Rem, Awake, Awake, Unknown, N2];
        let s = summarize(&timeline, 0.5, 2);
        let sum: f64 = s.stage_minutes.values().sum();
        approx::assert_abs_diff_eq!(sum, timeline.len() as f64 * 0.5, epsilon = 1e-12);
    }

    #[test]
    fn empty_timeline_is_all_zero() {
        let s = summarize(&[], 0.5, 2);
        assert!(s.stage_minutes.is_empty());
        assert!(s.stage_hours.is_empty());
        assert_eq!(s.total_sleep_time, 0.0);
        assert_eq!(s.total_wake_time, 0.0);
    }

    #[test]
    fn hours_are_rounded() {
        // 100 epochs of N2 at 0.5 min = 50 min = 0.8333… h → 0.83.
        let timeline = vec![N2; 100];
        let s = summarize(&timeline, 0.5, 2);
        approx::assert_abs_diff_eq!(s.stage_hours[&N2], 0.83, epsilon = 1e-12);
        // Minutes stay exact.
        approx::assert_abs_diff_eq!(s.stage_minutes[&N2], 50.0, epsilon = 1e-12);
    }

    #[test]
    fn no_awake_defaults_to_zero_wake() {
        let s = summarize(&[N2, N3], 0.5, 2);
        assert_eq!(s.total_wake_time, 0.0);
        approx::assert_abs_diff_eq!(s.total_sleep_time, 1.0, epsilon = 1e-12);
    }
}
