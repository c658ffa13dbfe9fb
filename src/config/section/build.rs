//! `[build]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [build]
//! output = "builtAssets"     # precompile output directory (relative to config dir)
//! serve_path = ""            # public serving prefix, e.g. a CDN origin
//! production = false         # fingerprint assets as they are resolved
//! minify = true              # minify script content
//! gzip = false               # write a .gz sibling next to each artifact
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::utils::path::expand_path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Precompile output directory.
    pub output: PathBuf,

    /// Prefix prepended to every public path.
    pub serve_path: String,

    /// Compute fingerprints on resolution.
    pub production: bool,

    /// Produce a minified variant of script content.
    pub minify: bool,

    /// Write gzip siblings for every non-image artifact.
    pub gzip: bool,

    /// Remove the output directory before building (CLI only).
    #[serde(skip)]
    pub clean: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            output: "builtAssets".into(),
            serve_path: String::new(),
            production: false,
            minify: true,
            gzip: false,
            clean: false,
        }
    }
}

impl BuildConfig {
    pub const OUTPUT: FieldPath = FieldPath::new("build.output");
    pub const SERVE_PATH: FieldPath = FieldPath::new("build.serve_path");

    pub fn normalize(&mut self, base: &Path) {
        self.output = expand_path(&self.output, base);
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.output.is_file() {
            diag.error(
                Self::OUTPUT,
                format!("'{}' exists and is not a directory", self.output.display()),
            );
        }
        if self.serve_path.contains(['?', '#']) {
            diag.error_with_hint(
                Self::SERVE_PATH,
                "serving prefix must not carry a query or fragment",
                "use a bare origin or path, e.g. `https://cdn.example.com/assets`",
            );
        }
    }
}
