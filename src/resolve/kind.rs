//! Asset kinds and their top-level folders.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which top-level folder an asset lives under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Js,
    Css,
    Img,
    Html,
}

impl AssetKind {
    pub const ALL: [Self; 4] = [Self::Js, Self::Css, Self::Img, Self::Html];

    /// Folder name inside a search root, also the public path segment.
    pub const fn dir(self) -> &'static str {
        match self {
            Self::Js => "js",
            Self::Css => "css",
            Self::Img => "img",
            Self::Html => "html",
        }
    }

    /// Module search roots are only consulted for non-script kinds.
    pub const fn uses_module_roots(self) -> bool {
        !matches!(self, Self::Js)
    }

    /// Whether `js/<dir>/<name>/<name>.<ext>` may satisfy this kind.
    pub const fn has_colocated_module_file(self) -> bool {
        matches!(self, Self::Css | Self::Html)
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir())
    }
}
