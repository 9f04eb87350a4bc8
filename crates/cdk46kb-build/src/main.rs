//! cdk46kb-build: assemble `data/` from `raw_data/`.
//!
//! Run with: cargo run -p cdk46kb-build -- all

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use cdk46kb_build::pipeline::{run_all, run_subtypes};
use cdk46kb_build::report::StepReport;
use cdk46kb_build::{archive, mindmap, styles};
use cdk46kb_config::Config;

#[derive(Parser)]
#[command(name = "cdk46kb-build", version, about = "Build the CDK4/6 knowledge-base data directory")]
struct Cli {
    /// Config file (defaults to $CDK46KB_CONFIG, then ./cdk46kb.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every stage in order
    All,
    /// Merge the augmented subtype networks only
    Subtypes,
    /// Convert the desktop network style to a Cytoscape.js stylesheet
    Styles,
    /// Convert knowledge_map.txt to a jsMind document
    Mindmap,
    /// Zip the statistics directory
    Archive,
    /// Validate the configuration and print the resolved merge plans
    CheckConfig,
}

fn print_steps(steps: &[StepReport]) {
    for step in steps {
        println!("{}", step);
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("cdk46kb=debug,info")),
        )
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("loading configuration")?;

    match cli.command {
        Commands::All => {
            let summary = run_all(&config).context("data build aborted")?;
            println!("{}", summary);
        }
        Commands::Subtypes => {
            let outcomes = run_subtypes(&config).context("subtype build aborted")?;
            for outcome in &outcomes {
                println!("{}", outcome);
            }
        }
        Commands::Styles => print_steps(&styles::stage_styles(&config.paths)?),
        Commands::Mindmap => print_steps(&mindmap::stage_mindmap(&config.paths)?),
        Commands::Archive => print_steps(&archive::stage_archive(&config)?),
        Commands::CheckConfig => {
            config.validate()?;
            for plan in config.subtype_plans()? {
                println!(
                    "{} (extends {}): {} + {} -> {}, {}",
                    plan.tag,
                    plan.tag.original(),
                    plan.original_edges.display(),
                    plan.augmented_edges.display(),
                    plan.edges_out.display(),
                    plan.nodes_out.display()
                );
                for source in [&plan.original_edges, &plan.augmented_edges] {
                    if !source.is_file() {
                        warn!(tag = %plan.tag, path = %source.display(), "merge source not found");
                    }
                }
            }
            info!("Configuration is valid");
        }
    }

    Ok(())
}
