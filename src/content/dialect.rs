//! Source dialects that need a compile step before they can be served.

use std::{
    fmt,
    path::{Path, PathBuf},
};

/// Script dialects compiled to plain JavaScript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScriptDialect {
    Coffee,
}

/// Stylesheet dialects compiled to plain CSS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleDialect {
    Less,
    Stylus,
}

impl ScriptDialect {
    pub fn from_ext(ext: &str) -> Option<Self> {
        match ext {
            "coffee" => Some(Self::Coffee),
            _ => None,
        }
    }

    pub const fn ext(self) -> &'static str {
        match self {
            Self::Coffee => "coffee",
        }
    }
}

impl StyleDialect {
    pub fn from_ext(ext: &str) -> Option<Self> {
        match ext {
            "less" => Some(Self::Less),
            "styl" => Some(Self::Stylus),
            _ => None,
        }
    }

    pub const fn ext(self) -> &'static str {
        match self {
            Self::Less => "less",
            Self::Stylus => "styl",
        }
    }

    /// Import search paths handed to the compiler.
    ///
    /// Less imports are relative to the search roots themselves, stylus
    /// imports to each root's `css` folder.
    pub fn include_paths(self, roots: &[PathBuf]) -> Vec<PathBuf> {
        match self {
            Self::Less => roots.to_vec(),
            Self::Stylus => roots.iter().map(|r| r.join("css")).collect(),
        }
    }
}

/// Either kind of dialect, for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Script(ScriptDialect),
    Style(StyleDialect),
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Script(ScriptDialect::Coffee) => "coffee",
            Self::Style(StyleDialect::Less) => "less",
            Self::Style(StyleDialect::Stylus) => "stylus",
        };
        f.write_str(name)
    }
}

/// Dialect of a file judged by its extension.
pub fn script_dialect_of(path: &Path) -> Option<ScriptDialect> {
    path.extension()
        .and_then(|e| e.to_str())
        .and_then(ScriptDialect::from_ext)
}
