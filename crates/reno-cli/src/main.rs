//! AIMD experiment CLI tool
//!
//! Runs two-flow TCP Reno experiments and parameter sweeps from presets or
//! JSON configuration files and reports the resulting statistics.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use commands::{cmd_list, cmd_preset, cmd_run, cmd_sweep, RunArgs};
use std::path::PathBuf;
use tracing::Level;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SweepKind {
    /// Vary alpha from 1 to 6 with beta fixed at 0.8
    Alpha,
    /// Vary beta from 0.5 to 0.9 with alpha fixed at 1
    Beta,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a shared-link experiment from a preset or config file
    Run {
        /// Preset name (bottleneck, fair, defaults)
        #[arg(long, conflicts_with = "config")]
        preset: Option<String>,

        /// Experiment config file (JSON)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Override the number of rounds
        #[arg(long)]
        rounds: Option<usize>,

        /// Override alpha on both flows
        #[arg(long, requires = "beta")]
        alpha: Option<f64>,

        /// Override beta on both flows
        #[arg(long, requires = "alpha")]
        beta: Option<f64>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,

        /// Write the per-round trajectory to a CSV file
        #[arg(long)]
        trajectory: Option<PathBuf>,
    },

    /// Sweep alpha or beta over the bottleneck preset
    Sweep {
        /// Parameter to sweep
        #[arg(value_enum)]
        kind: SweepKind,

        /// Rounds per sweep point
        #[arg(long, default_value_t = 1000)]
        rounds: usize,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// List available presets
    List,

    /// Print a preset as a JSON config
    Preset {
        /// Preset name
        name: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Run {
            preset,
            config,
            rounds,
            alpha,
            beta,
            json,
            trajectory,
        } => {
            cmd_run(RunArgs {
                preset,
                config,
                rounds,
                params: alpha.zip(beta),
                json,
                trajectory,
            })?;
        }
        Commands::Sweep { kind, rounds, json } => {
            cmd_sweep(kind, rounds, json)?;
        }
        Commands::List => {
            cmd_list()?;
        }
        Commands::Preset { name } => {
            cmd_preset(&name)?;
        }
    }

    Ok(())
}
