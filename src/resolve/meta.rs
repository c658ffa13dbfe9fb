//! Resolution keys and cached resolution results.

use std::path::{Path, PathBuf};

use super::AssetKind;

/// Name of the descriptor file marking a module assembly folder.
pub const ASSEMBLY_FILE: &str = "assembly.json";

/// Logical identity of a resource: `(kind, dir, name, ext)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentKey {
    pub kind: AssetKind,
    /// Directory part relative to the kind folder, without surrounding slashes.
    pub dir: String,
    pub name: String,
    pub ext: String,
}

impl ContentKey {
    pub fn new(kind: AssetKind, dir: &str, name: &str, ext: &str) -> Self {
        Self {
            kind,
            dir: dir.trim_matches('/').to_owned(),
            name: name.to_owned(),
            ext: ext.to_owned(),
        }
    }

    fn in_kind(&self, root: &Path) -> PathBuf {
        let base = root.join(self.kind.dir());
        if self.dir.is_empty() { base } else { base.join(&self.dir) }
    }

    /// `<root>/<kind>/<dir>/<name>.<ext>`
    pub fn check_path(&self, root: &Path) -> PathBuf {
        self.in_kind(root).join(format!("{}.{}", self.name, self.ext))
    }

    /// `<root>/<kind>/<dir>/<name>/index.<ext>`
    pub fn index_path(&self, root: &Path) -> PathBuf {
        self.in_kind(root)
            .join(&self.name)
            .join(format!("index.{}", self.ext))
    }

    /// `<root>/js/<dir>/<name>/<name>.<ext>`
    pub fn module_path(&self, root: &Path) -> PathBuf {
        let base = root.join("js");
        let base = if self.dir.is_empty() { base } else { base.join(&self.dir) };
        base.join(&self.name).join(format!("{}.{}", self.name, self.ext))
    }

    /// `<root>/<kind>/<dir>/<name>/`
    pub fn module_dir(&self, root: &Path) -> PathBuf {
        self.in_kind(root).join(&self.name)
    }

    /// Route form used in messages: `css/theme/app.css`.
    pub fn display_route(&self) -> String {
        crate::utils::path::join_url(&[
            self.kind.dir(),
            &self.dir,
            &format!("{}.{}", self.name, self.ext),
        ])
    }
}

/// Where an assembled module lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblyLocation {
    /// Folder holding `assembly.json`.
    pub module_dir: PathBuf,
    /// Search root the module was found in.
    pub root: PathBuf,
}

/// Result of resolving a [`ContentKey`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentMeta {
    /// Physical file: the asset itself or the `assembly.json` descriptor.
    pub main_file: PathBuf,
    pub name: String,
    pub dir: String,
    pub assembly: Option<AssemblyLocation>,
}

impl ContentMeta {
    pub fn is_assembled(&self) -> bool {
        self.assembly.is_some()
    }
}
