/// sleep_report: load a pre-filtered recording from a safetensors file, run
/// the analysis pipeline in the selected mode, and print the stage-time
/// tables to stdout.
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::fmt;
use std::path::PathBuf;

use somno::{analyze, io::load_recording, LabelMode, PipelineConfig};

#[derive(ValueEnum, Debug, Clone, Copy)]
enum Mode {
    /// Use the hypnogram annotations stored with the recording.
    Annotations,
    /// Infer stages from band-power features (no annotations needed).
    Clustering,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Annotations => f.write_str("annotations"),
            Mode::Clustering => f.write_str("clustering"),
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "sleep_report")]
struct Args {
    /// Input safetensors recording.
    #[arg(long)]
    input: PathBuf,

    /// Labeling mode.
    #[arg(long, value_enum, default_value_t = Mode::Annotations)]
    mode: Mode,

    /// Epoch duration (s).
    #[arg(long, default_value_t = 30.0)]
    epoch_dur: f64,

    /// Epoch overlap (s).
    #[arg(long, default_value_t = 0.0)]
    overlap: f64,

    /// Cluster count (clustering mode).
    #[arg(long, default_value_t = 5)]
    clusters: usize,

    /// Rng seed for k-means (clustering mode).
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

const SEP: &str = "_________________________________________________________";

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let recording = load_recording(&args.input)?;
    eprintln!(
        "{} channels @ {} Hz, {:.1} s, {} annotation(s)",
        recording.n_channels(),
        recording.sfreq,
        recording.duration_secs(),
        recording.annotations.len(),
    );

    let cfg = PipelineConfig {
        epoch_duration: args.epoch_dur,
        epoch_overlap: args.overlap,
        cluster_count: args.clusters,
        cluster_seed: args.seed,
        ..PipelineConfig::default()
    };
    let mode = match args.mode {
        Mode::Annotations => LabelMode::Annotations,
        Mode::Clustering => LabelMode::Clustering,
    };

    let report = analyze(&recording, &cfg, mode)?;

    println!("{SEP}\n");
    println!("Time spent in each sleep stage (minutes):");
    for (stage, minutes) in &report.summary.stage_minutes {
        println!("  {stage}: {minutes}");
    }
    println!("{SEP}\n");
    println!("Time spent in each sleep stage (hours):");
    for (stage, hours) in &report.summary.stage_hours {
        println!("  {stage}: {hours}");
    }
    println!("{SEP}\n");
    println!("Total Sleep Time (minutes): {}", report.summary.total_sleep_time);
    println!("{SEP}\n");
    println!("Total Awake Time (minutes): {}", report.summary.total_wake_time);
    println!("{SEP}\n");
    println!(
        "Extracted features shape: ({}, {})",
        report.feature_shape.0, report.feature_shape.1
    );
    if report.unmapped_annotations > 0 {
        println!("Unmapped annotations: {}", report.unmapped_annotations);
    }
    println!("{SEP}");

    Ok(())
}
