//! CLI command implementations for the AIMD experiments
//!
//! Kept out of main.rs so the commands can be unit tested.

use crate::SweepKind;
use anyhow::{Context, Result};
use renoaimd::{ExperimentConfig, ExperimentOutcome, Flow, Presets, Summary, Sweep, SweepPoint};
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Options for the 'run' command
#[derive(Debug, Default)]
pub struct RunArgs {
    pub preset: Option<String>,
    pub config: Option<PathBuf>,
    pub rounds: Option<usize>,
    pub params: Option<(f64, f64)>,
    pub json: bool,
    pub trajectory: Option<PathBuf>,
}

/// Implementation of the 'run' command - runs one shared-link experiment
pub fn cmd_run(args: RunArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => ExperimentConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => resolve_preset(args.preset.as_deref())?,
    };
    if let Some(rounds) = args.rounds {
        config = config.with_rounds(rounds);
    }
    if let Some((alpha, beta)) = args.params {
        config = config.with_params(alpha, beta);
    }

    info!("Running experiment: {} ({} rounds)", config.name, config.rounds);
    let outcome = config.run()?;

    if let Some(path) = &args.trajectory {
        write_trajectory(&outcome, path)?;
        info!("Trajectory written to {}", path.display());
    }

    let (summary_a, summary_b) = outcome.summaries()?;
    if args.json {
        let output = json!({
            "experiment": config.name,
            "report": outcome.report,
            "flows": [
                { "name": outcome.flow_a.name(), "summary": summary_a },
                { "name": outcome.flow_b.name(), "summary": summary_b }
            ]
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("Experiment: {}", config.name);
        println!("Rounds: {}", outcome.report.rounds);
        println!(
            "Increases: {}  Decreases: {}",
            outcome.report.increases, outcome.report.decreases
        );
        println!("Total data sent: {} packets", outcome.report.total_data_sent);
        println!();
        print_metrics(&outcome.flow_a, &summary_a);
        println!();
        print_metrics(&outcome.flow_b, &summary_b);
    }

    Ok(())
}

/// Implementation of the 'sweep' command - runs a static alpha or beta sweep
pub fn cmd_sweep(kind: SweepKind, rounds: usize, json: bool) -> Result<()> {
    let sweep = match kind {
        SweepKind::Alpha => Sweep::alpha(),
        SweepKind::Beta => Sweep::beta(),
    }
    .with_rounds(rounds);

    info!("Running {:?} sweep over {} points", kind, sweep.points().len());
    let points = sweep.run()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&points)?);
    } else {
        print_sweep(&points);
    }

    Ok(())
}

/// Implementation of the 'list' command - shows available presets
pub fn cmd_list() -> Result<()> {
    println!("Available presets:");
    println!("==================");
    for preset in Presets::all() {
        println!("  {:<12} - {}", preset.name, preset.description);
    }

    println!("\nSweeps:");
    println!("  alpha        - alpha 1..6, beta 0.8");
    println!("  beta         - alpha 1, beta 0.5..0.9");

    Ok(())
}

/// Implementation of the 'preset' command - prints a preset as JSON
pub fn cmd_preset(name: &str) -> Result<()> {
    let preset = resolve_preset(Some(name))?;
    println!("{}", preset.to_json()?);
    Ok(())
}

/// Helper function to resolve preset names to experiment configs
fn resolve_preset(preset: Option<&str>) -> Result<ExperimentConfig> {
    match preset {
        Some(name) => match Presets::by_name(name) {
            Some(config) => Ok(config),
            None => {
                error!("Unknown preset: {}", name);
                anyhow::bail!("Unknown preset: {}", name);
            }
        },
        None => Ok(Presets::bottleneck()),
    }
}

fn print_metrics(flow: &Flow, summary: &Summary) {
    println!("Metrics for {}", flow.name());
    println!("Average Latency: {:.2} msec", summary.mean_latency * 1000.0);
    println!(
        "Standard Deviation of Latency: {:.2} msec",
        summary.std_latency * 1000.0
    );
    println!("Average Throughput: {:.2} KB/s", summary.mean_throughput);
    println!(
        "Standard Deviation of Throughput: {:.2} KB/s",
        summary.std_throughput
    );
    println!("Bandwidth-Delay Product: {:.2} bytes", summary.bdp);
}

fn print_sweep(points: &[SweepPoint]) {
    println!(
        "{:>6} {:>6} {:>14} {:>14} {:>18} {:>18}",
        "Alpha", "Beta", "Latency (ms)", "Latency std", "Throughput (KB/s)", "Throughput std"
    );
    for p in points {
        println!(
            "{:>6.1} {:>6.1} {:>14.4} {:>14.4} {:>18.2} {:>18.2}",
            p.alpha,
            p.beta,
            p.mean_latency * 1000.0,
            p.std_latency * 1000.0,
            p.mean_throughput,
            p.std_throughput
        );
    }
}

/// Write one CSV row per round with both flows' samples side by side.
fn write_trajectory(outcome: &ExperimentOutcome, path: &Path) -> Result<()> {
    let (a, b) = (&outcome.flow_a, &outcome.flow_b);
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    writer.write_record([
        "round",
        "cwnd_a",
        "cwnd_b",
        "latency_a",
        "latency_b",
        "throughput_a",
        "throughput_b",
    ])?;
    for round in 0..outcome.report.rounds {
        writer.write_record([
            round.to_string(),
            a.cwnd_history()[round].to_string(),
            b.cwnd_history()[round].to_string(),
            a.latency_history()[round].to_string(),
            b.latency_history()[round].to_string(),
            a.throughput_history()[round].to_string(),
            b.throughput_history()[round].to_string(),
        ])?;
    }
    writer.flush()?;

    Ok(())
}
