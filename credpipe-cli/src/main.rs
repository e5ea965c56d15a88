//! credpipe CLI — harvest and transform carbon-credit registry data.
//!
//! Runs the full pipeline or individual stages against the configured
//! registry and artifact locations.

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use credpipe_core::{Pipeline, RegistryClient, load_config};

/// Credpipe: carbon-credit registry harvest and transform pipeline
#[derive(Parser, Debug)]
#[command(name = "credpipe", version, about, long_about = None)]
struct Cli {
    /// Configuration file path (defaults to ./credpipe.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Run the full pipeline: fetch, clean, transform
    Run {
        /// Harvest all projects, not only Gold Standard certified ones
        #[arg(long)]
        all_projects: bool,
    },
    /// Harvest the registry and write the raw artifact
    Fetch {
        /// Harvest all projects, not only Gold Standard certified ones
        #[arg(long)]
        all_projects: bool,
    },
    /// Clean the raw artifact and write the cleaned artifact
    Clean,
    /// Derive features over the cleaned artifact
    Transform,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let mut config = load_config(cli.config.as_deref())?;
    if let Commands::Run { all_projects } | Commands::Fetch { all_projects } = &cli.command
        && *all_projects
    {
        config.api.certified_only = false;
    }

    let client = RegistryClient::new(&config.api)?;
    let pipeline = Pipeline::new(config, &client);

    let table = match cli.command {
        Commands::Run { .. } => pipeline.run().await?,
        Commands::Fetch { .. } => pipeline.run_ingestion().await?,
        Commands::Clean => pipeline.run_cleaning()?,
        Commands::Transform => pipeline.run_transformation()?,
    };

    println!(
        "Done: {} rows, {} columns",
        table.num_rows(),
        table.num_columns()
    );
    Ok(())
}
