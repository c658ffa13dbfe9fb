//! `[paths]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [paths]
//! roots = ["app", "shared"]        # searched in order, first hit wins
//! modules = ["vendor/modules"]     # searched after roots for css, img and html
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::utils::path::expand_path;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Primary search roots, in priority order.
    pub roots: Vec<PathBuf>,

    /// Module search roots, appended after `roots` for non-script kinds.
    pub modules: Vec<PathBuf>,
}

impl PathsConfig {
    pub const ROOTS: FieldPath = FieldPath::new("paths.roots");
    pub const MODULES: FieldPath = FieldPath::new("paths.modules");

    /// Make every path absolute against `base`.
    pub fn normalize(&mut self, base: &Path) {
        for path in self.roots.iter_mut().chain(self.modules.iter_mut()) {
            *path = expand_path(path, base);
        }
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.roots.is_empty() {
            diag.error_with_hint(
                Self::ROOTS,
                "no search roots configured",
                "set `paths.roots` or pass `--root <DIR>`",
            );
        }

        for root in &self.roots {
            if !root.is_dir() {
                diag.error(
                    Self::ROOTS,
                    format!("directory '{}' not found", root.display()),
                );
            }
        }

        // A missing module root only narrows the search.
        for module in &self.modules {
            if !module.is_dir() {
                diag.warn(
                    Self::MODULES,
                    format!("directory '{}' not found, skipping", module.display()),
                );
            }
        }
    }
}
