//! Asset pipeline entry point.
//!
//! A [`Pipeline`] owns one configuration, one [`PathResolver`] (and with it
//! the resolution cache) and one [`Toolchain`]. Several pipelines can live
//! in the same process without sharing state.
//!
//! # Modes
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  context(DEVELOPMENT)  plain paths           │
//! │  context(PRODUCTION)   fingerprinted paths   │
//! └──────────────────────────────────────────────┘
//!
//! ┌──────────────────────────────────────────────┐
//! │  precompile()                                │
//! │  scan -> build (rayon) -> write -> manifests │
//! └──────────────────────────────────────────────┘
//! ```

mod scan;

pub use scan::{ScannedRoute, count_by_kind, scan};

use rayon::prelude::*;
use std::{cmp::Ordering, collections::BTreeMap};

use crate::assembly::js_string_literal;
use crate::asset::{Asset, AssetVariant};
use crate::config::AssetConfig;
use crate::content::toolchain::Toolchain;
use crate::context::AssetContext;
use crate::error::{AssetError, Result};
use crate::logger::ProgressLine;
use crate::manifest::ManifestBuilder;
use crate::resolve::{AssetKind, PathResolver};
use crate::{debug, log};

/// Resolution mode of an [`AssetContext`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildMode {
    /// Embed content fingerprints in every path.
    pub fingerprint: bool,
}

impl BuildMode {
    /// Production mode: fingerprinted, cache-busting paths.
    pub const PRODUCTION: Self = Self { fingerprint: true };

    /// Development mode: plain paths.
    pub const DEVELOPMENT: Self = Self { fingerprint: false };

    #[inline]
    pub const fn is_dev(&self) -> bool {
        !self.fingerprint
    }
}

/// Outcome of [`Pipeline::precompile`].
#[derive(Debug, Default)]
pub struct BuildReport {
    /// Written assets per kind.
    pub counts: BTreeMap<AssetKind, usize>,
    /// Route and error of every unit that could not be built or written.
    pub failures: Vec<(String, AssetError)>,
}

impl BuildReport {
    pub fn count(&self, kind: AssetKind) -> usize {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

pub struct Pipeline {
    config: AssetConfig,
    resolver: PathResolver,
    toolchain: Toolchain,
}

impl Pipeline {
    pub fn new(config: AssetConfig, toolchain: Toolchain) -> Self {
        let resolver = PathResolver::new(config.paths.roots.clone(), config.paths.modules.clone());
        Self {
            config,
            resolver,
            toolchain,
        }
    }

    /// Pipeline with the command-line compilers and minifier from `config`.
    pub fn from_config(config: AssetConfig) -> Self {
        let toolchain = Toolchain::from_config(&config);
        Self::new(config, toolchain)
    }

    pub fn config(&self) -> &AssetConfig {
        &self.config
    }

    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    pub fn toolchain(&self) -> &Toolchain {
        &self.toolchain
    }

    /// Public serving prefix.
    pub fn serve_path(&self) -> &str {
        &self.config.build.serve_path
    }

    /// Mode selected by `build.production`.
    pub fn mode(&self) -> BuildMode {
        if self.config.build.production {
            BuildMode::PRODUCTION
        } else {
            BuildMode::DEVELOPMENT
        }
    }

    /// Fresh template context. Assets are memoized per context.
    pub fn context(&self, mode: BuildMode) -> AssetContext<'_> {
        AssetContext::new(self, mode)
    }

    /// The raw source of a script, wrapped so it registers itself as
    /// `FS._modules['<name>']` with `module`/`exports` in scope.
    pub fn wrapped_script(&self, route: &str) -> Result<String> {
        let context = self.context(BuildMode::DEVELOPMENT);
        let asset = context.try_asset(route, None)?;
        if !matches!(
            asset.variant(),
            AssetVariant::Script | AssetVariant::TranspiledScript(_)
        ) {
            return Err(AssetError::NotScript(route.to_owned()));
        }
        let content = asset
            .content()
            .ok_or_else(|| AssetError::Passthrough(route.to_owned()))?;

        let module = format!("FS._modules[{}]", single_quoted(&asset.route().name));
        Ok([
            "window.FS = window.FS || {};".to_owned(),
            "FS._modules = FS._modules || {};".to_owned(),
            format!("{module} = {{exports:{{}}}};"),
            "(function(module, exports) {".to_owned(),
            content.raw_text().into_owned(),
            "function __get__(){ return eval(arguments[0]); };".to_owned(),
            " module.__get__ = __get__;".to_owned(),
            "function __set__(){ arguments.src = arguments[0] + ' = arguments[1];'; eval(arguments.src); };"
                .to_owned(),
            " module.__set__ = __set__;".to_owned(),
            format!("}})({module}, {module}.exports);"),
        ]
        .join("\n"))
    }

    /// Every route a precompile pass would build.
    pub fn scan(&self) -> Vec<ScannedRoute> {
        scan(&self.resolver)
    }

    /// Scan, build and write every asset, then both manifests.
    pub fn precompile(&self, progress: Option<&ProgressLine>) -> Result<BuildReport> {
        let routes = self.scan();
        self.precompile_routes(&routes, progress)
    }

    /// Build and write `routes` into `build.output`.
    ///
    /// Units are built in parallel with fingerprints on. A unit that fails
    /// is logged and reported; it never stops its siblings or the manifests.
    pub fn precompile_routes(
        &self,
        routes: &[ScannedRoute],
        progress: Option<&ProgressLine>,
    ) -> Result<BuildReport> {
        let context = self.context(BuildMode::PRODUCTION);

        let mut failures: Vec<(String, AssetError)> = routes
            .par_iter()
            .filter_map(|scanned| match context.try_asset(&scanned.route, None) {
                Ok(_) => None,
                Err(err) => {
                    log!("error"; "{}: {err}", scanned.route);
                    Some((scanned.route.clone(), err))
                }
            })
            .collect();

        // The first asset per requested route wins: bare references before
        // `?query#fragment` ones, then by the route as written.
        let mut assets = context.assets();
        assets.sort_by(|a, b| registration_order(a, b));

        let mut manifest = ManifestBuilder::new(self.serve_path());
        for asset in assets {
            manifest.add(asset);
        }
        debug!("build"; "{} assets from {} scanned routes", manifest.len(), routes.len());

        let persisted = manifest.persist(&self.config.build.output, self.config.build.gzip, progress)?;
        failures.extend(persisted.failures);
        failures.sort_by(|a, b| a.0.cmp(&b.0));

        Ok(BuildReport {
            counts: persisted.by_kind,
            failures,
        })
    }
}

fn registration_order(a: &Asset, b: &Asset) -> Ordering {
    let decorated = |asset: &Asset| {
        let route = asset.route();
        !route.query.is_empty() || !route.fragment.is_empty()
    };
    a.requested()
        .cmp(b.requested())
        .then_with(|| a.media().cmp(b.media()))
        .then_with(|| decorated(a).cmp(&decorated(b)))
        .then_with(|| a.route().original.cmp(&b.route().original))
}

/// `text` as a single-quoted script string literal.
fn single_quoted(text: &str) -> String {
    let literal = js_string_literal(text);
    let inner = literal
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(&literal);
    format!("'{}'", inner.replace('\'', "\\'"))
}
