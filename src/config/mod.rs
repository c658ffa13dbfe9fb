//! Pipeline configuration management for `assetmill.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── paths      # [paths]
//! │   ├── build      # [build]
//! │   └── compilers  # [compilers]
//! ├── types/         # Utility types
//! │   ├── error      # ConfigError, ConfigDiagnostics
//! │   └── field      # FieldPath
//! └── mod.rs         # AssetConfig (this file)
//! ```
//!
//! # Precedence
//!
//! Defaults, then the config file (paths relative to its directory), then
//! command-line flags (paths relative to the working directory).

pub mod section;
pub mod types;
mod util;

use util::find_config_file;

pub use section::{BuildConfig, CompilersConfig, PathsConfig};
pub use types::{ConfigDiagnostic, ConfigDiagnostics, ConfigError, FieldPath};

use crate::{
    cli::{BuildArgs, Cli, Commands, ResolveArgs},
    log,
    utils::path::{expand_path, normalize_path},
};
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing assetmill.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Directory relative paths are resolved against (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Search roots
    #[serde(default)]
    pub paths: PathsConfig,

    /// Build settings
    #[serde(default)]
    pub build: BuildConfig,

    /// External dialect compilers
    #[serde(default)]
    pub compilers: CompilersConfig,
}

impl AssetConfig {
    /// Load configuration from CLI arguments.
    ///
    /// Searches upward from cwd for the config file. Without one, the roots
    /// given on the command line are enough to run.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        let mut config = match find_config_file(&cli.config) {
            Some(path) => {
                let mut config = Self::from_path(&path)?;
                config.root = path.parent().map_or_else(|| cwd.clone(), Path::to_path_buf);
                config.config_path = path;
                config
            }
            None if !cli.root.is_empty() => Self {
                config_path: cwd.join(&cli.config),
                root: cwd.clone(),
                ..Self::default()
            },
            None => bail!(ConfigError::Validation(format!(
                "config file '{}' not found, create one or pass `--root <DIR>`",
                cli.config.display()
            ))),
        };

        config.normalize_paths();
        config.apply_cli(cli, &cwd);
        config.validate()?;

        Ok(config)
    }

    /// Configuration with the given roots and defaults everywhere else.
    pub fn with_roots(root: &Path, roots: &[PathBuf], modules: &[PathBuf]) -> Self {
        let mut config = Self {
            root: root.to_path_buf(),
            paths: PathsConfig {
                roots: roots.to_vec(),
                modules: modules.to_vec(),
            },
            ..Self::default()
        };
        config.normalize_paths();
        config
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Toml)?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::Toml)?;
        Ok((config, ignored))
    }

    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warn"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Join a path with the config directory.
    pub fn root_join(&self, path: impl AsRef<Path>) -> PathBuf {
        self.root.join(path)
    }

    /// Path of the persisted server manifest.
    pub fn manifest_path(&self) -> PathBuf {
        self.build.output.join(crate::manifest::MANIFEST_FILE)
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    fn apply_cli(&mut self, cli: &Cli, cwd: &Path) {
        if !cli.root.is_empty() {
            self.paths.roots = cli.root.iter().map(|p| expand_path(p, cwd)).collect();
        }
        if !cli.module_root.is_empty() {
            self.paths.modules = cli.module_root.iter().map(|p| expand_path(p, cwd)).collect();
        }

        match &cli.command {
            Commands::Build { build_args } => self.apply_build_args(build_args, cwd),
            Commands::Resolve { args } => self.apply_resolve_args(args),
        }
    }

    fn apply_build_args(&mut self, args: &BuildArgs, cwd: &Path) {
        crate::logger::set_verbose(args.verbose);

        if let Some(output) = &args.output {
            self.build.output = expand_path(output, cwd);
        }
        Self::update_option(&mut self.build.serve_path, args.serve_path.as_ref());
        Self::update_option(&mut self.build.minify, args.minify.as_ref());
        Self::update_option(&mut self.build.gzip, args.gzip.as_ref());
        self.build.clean = args.clean;
    }

    fn apply_resolve_args(&mut self, args: &ResolveArgs) {
        crate::logger::set_verbose(args.verbose);

        if args.production {
            self.build.production = true;
        }
        Self::update_option(&mut self.build.serve_path, args.serve_path.as_ref());
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    // ========================================================================
    // path normalization
    // ========================================================================

    /// Normalize all paths relative to the config directory.
    fn normalize_paths(&mut self) {
        let root = normalize_path(&self.root);
        self.paths.normalize(&root);
        self.build.normalize(&root);
        self.root = root;
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate configuration.
    ///
    /// Collects all validation errors and returns them at once.
    pub fn validate(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        self.paths.validate(&mut diag);
        self.build.validate(&mut diag);
        self.compilers.validate(&mut diag);

        diag.print_warnings();

        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }
}

// ============================================================================
// tests
// ============================================================================
