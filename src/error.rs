//! Library error type.
//!
//! Most of these never reach the caller: assembly and compile failures are
//! turned into diagnostics or fallbacks at the smallest affected unit. The
//! variants still exist so each degradation can be logged with a precise
//! message and so fallible entry points can report the root cause.

use std::path::PathBuf;
use thiserror::Error;

use crate::content::dialect::Dialect;

pub type Result<T, E = AssetError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum AssetError {
    /// No physical match in any search root.
    #[error("unresolved asset `{0}`")]
    Unresolved(String),

    /// Bad template/locale override or a sub-assembly without `simpleWrap`.
    #[error("assembly `{}` is misconfigured: {message}", path.display())]
    AssemblyConfiguration { path: PathBuf, message: String },

    #[error("{dialect} compilation failed: {message}")]
    Compile { dialect: Dialect, message: String },

    #[error("minification failed: {0}")]
    Minify(String),

    #[error("assembly `{assembly}` could not include `{file}`")]
    MissingFileInAssembly { assembly: String, file: String },

    /// A disk location was requested for a remote route.
    #[error("`{0}` is a remote route and has no disk path")]
    Passthrough(String),

    #[error("`{0}` is not a script")]
    NotScript(String),

    #[error("IO error when accessing `{path}`: {1}", path = .0.display())]
    Io(PathBuf, #[source] std::io::Error),

    #[error("invalid JSON in `{path}`: {1}", path = .0.display())]
    Json(PathBuf, #[source] serde_json::Error),
}

impl AssetError {
    pub fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        Self::Io(path.into(), err)
    }
}
