//! Adaptiv CLI - drive the health and capability pipeline from the terminal
//!
//! Readings are JSON lines, one `SensorReading` per line:
//!
//! ```text
//! {"asset_id": "milling-01", "vib_rms": 2.4, "omega": 120, "load": 600, "wear": 0.1}
//! ```
//!
//! Results are written to stdout; logs go to stderr.

use std::io::{self, Write};

use adaptiv_runtime::{init_tracing, CapabilityPipeline, ServiceConfig};
use anyhow::Context;
use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{assess, audit, fuse, rules};

/// Adaptiv CLI application
#[derive(Parser)]
#[command(name = "adaptiv")]
#[command(about = "Adaptiv - hybrid health assessment and capability policy", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "ADAPTIV_CONFIG")]
    config: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = output::OutputFormat::Json)]
    output: output::OutputFormat,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Assess sensor readings
    Assess(assess::AssessArgs),

    /// Process readings and show the capability audit trail
    Audit(audit::AuditArgs),

    /// Fuse an anomaly score and physics residual
    Fuse(fuse::FuseArgs),

    /// Show capability rules
    Rules(rules::RulesArgs),

    /// Show the effective configuration
    Config,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config =
        ServiceConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    init_tracing(&config.logging)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if let Commands::Config = cli.command {
        output::write_item(&mut out, &config, cli.output)?;
        return Ok(());
    }

    let pipeline = CapabilityPipeline::from_config(&config)?;
    match &cli.command {
        Commands::Assess(args) => assess::run(&pipeline, args, &mut out, cli.output)?,
        Commands::Audit(args) => audit::run(&pipeline, args, &mut out, cli.output)?,
        Commands::Fuse(args) => fuse::run(pipeline.fusion(), args, &mut out, cli.output)?,
        Commands::Rules(args) => rules::run(pipeline.policy(), args, &mut out, cli.output)?,
        Commands::Config => {}
    }

    out.flush()?;
    Ok(())
}
