mod generate;
mod validate;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "feedgen")]
#[command(about = "Catalog feed generator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the configured pipeline for every store, or for one store
    Generate {
        /// Feed configuration file (defaults to FEEDGEN_CONFIG_PATH)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Only run the named store
        #[arg(long)]
        store: Option<String>,
        /// Print what would run without running it
        #[arg(long)]
        dry_run: bool,
    },
    /// Check the feed configuration and its component identifiers
    Validate {
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = feedgen_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::debug!(env = %config.env, "configuration loaded");

    match cli.command {
        Commands::Generate {
            config: config_path,
            store,
            dry_run,
        } => generate::run_generate(&config, config_path.as_deref(), store.as_deref(), dry_run),
        Commands::Validate {
            config: config_path,
        } => validate::run_validate(&config, config_path.as_deref()),
    }
}
