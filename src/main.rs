//! assetmill command-line entry point.

use anyhow::Result;
use assetmill::{
    cli::{self, Cli, Commands},
    config::AssetConfig,
};
use clap::{ColorChoice, Parser};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    let config = AssetConfig::load(&cli)?;

    match &cli.command {
        Commands::Build { .. } => cli::build::build_assets(config, false).map(|_| ()),
        Commands::Resolve { args } => cli::resolve::resolve_routes(config, args),
    }
}
