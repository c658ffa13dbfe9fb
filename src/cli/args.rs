//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Multi-root asset pipeline: module assemblies, fingerprints and manifests
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: assetmill.toml)
    #[arg(short = 'C', long, default_value = "assetmill.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Search root, repeatable; replaces `paths.roots` (relative to current directory)
    #[arg(short, long = "root", value_name = "DIR", value_hint = clap::ValueHint::DirPath)]
    pub root: Vec<PathBuf>,

    /// Module search root, repeatable; replaces `paths.modules`
    #[arg(short, long = "module-root", value_name = "DIR", value_hint = clap::ValueHint::DirPath)]
    pub module_root: Vec<PathBuf>,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Precompile every asset under the search roots
    #[command(visible_alias = "b")]
    Build {
        #[command(flatten)]
        build_args: BuildArgs,
    },

    /// Print the rendered markup for logical routes
    #[command(visible_alias = "r")]
    Resolve {
        #[command(flatten)]
        args: ResolveArgs,
    },
}

/// Build command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct BuildArgs {
    /// Output directory (relative to current directory)
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub output: Option<PathBuf>,

    /// Public serving prefix, e.g. a CDN origin
    #[arg(short, long = "serve-path")]
    pub serve_path: Option<String>,

    /// Write a gzip sibling next to each artifact
    #[arg(short = 'z', long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub gzip: Option<bool>,

    /// Minify script content
    #[arg(long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub minify: Option<bool>,

    /// Clean output directory completely before building
    #[arg(short, long)]
    pub clean: bool,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long)]
    pub verbose: bool,
}

/// Resolve command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct ResolveArgs {
    /// Logical routes, e.g. `app.js`, `theme.less.css`, `logo.png`
    #[arg(required = true, value_name = "ROUTE")]
    pub routes: Vec<String>,

    /// Fingerprint resolved assets
    #[arg(short, long)]
    pub production: bool,

    /// Media type for stylesheet links
    #[arg(long)]
    pub media: Option<String>,

    /// Public serving prefix, e.g. a CDN origin
    #[arg(short, long = "serve-path")]
    pub serve_path: Option<String>,

    /// Look routes up in a persisted manifest.json instead of the sources
    #[arg(long, value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
    pub manifest: Option<PathBuf>,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long)]
    pub verbose: bool,
}

#[allow(unused)]
impl Cli {
    pub const fn is_build(&self) -> bool {
        matches!(self.command, Commands::Build { .. })
    }
    pub const fn is_resolve(&self) -> bool {
        matches!(self.command, Commands::Resolve { .. })
    }
}
