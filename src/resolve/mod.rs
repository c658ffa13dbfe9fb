//! Multi-root path resolution.
//!
//! A logical key `(kind, dir, name, ext)` is looked up in every search root
//! in priority order. Within one root the candidates are tried as:
//!
//! 1. `<kind>/<dir>/<name>.<ext>`
//! 2. `<kind>/<dir>/<name>/index.<ext>`
//! 3. `js/<dir>/<name>/<name>.<ext>` (css and html only)
//! 4. `<kind>/<dir>/<name>/assembly.json` (module assembly)
//!
//! The first hit across all roots wins and is cached for the lifetime of the
//! resolver. Misses are not cached.

mod kind;
mod meta;

pub use kind::AssetKind;
pub use meta::{ASSEMBLY_FILE, AssemblyLocation, ContentKey, ContentMeta};

use dashmap::DashMap;
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::debug;
use crate::error::{AssetError, Result};

pub struct PathResolver {
    roots: Vec<PathBuf>,
    module_roots: Vec<PathBuf>,
    cache: DashMap<ContentKey, Arc<ContentMeta>>,
}

impl PathResolver {
    pub fn new(roots: Vec<PathBuf>, module_roots: Vec<PathBuf>) -> Self {
        Self {
            roots,
            module_roots,
            cache: DashMap::new(),
        }
    }

    /// Primary search roots, in priority order.
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    pub fn module_roots(&self) -> &[PathBuf] {
        &self.module_roots
    }

    /// Roots consulted for `kind`: primary roots, then module roots for non-script kinds.
    pub fn search_roots(&self, kind: AssetKind) -> impl Iterator<Item = &Path> {
        let modules: &[PathBuf] = if kind.uses_module_roots() {
            &self.module_roots
        } else {
            &[]
        };
        self.roots.iter().chain(modules).map(PathBuf::as_path)
    }

    /// Resolve a key to a physical file or assembly descriptor.
    pub fn resolve(&self, key: &ContentKey) -> Result<Arc<ContentMeta>> {
        if let Some(meta) = self.cache.get(key) {
            return Ok(Arc::clone(&meta));
        }

        let meta = self
            .search_roots(key.kind)
            .find_map(|root| Self::probe(key, root))
            .ok_or_else(|| AssetError::Unresolved(key.display_route()))?;

        debug!("resolve"; "{} -> {}", key.display_route(), meta.main_file.display());

        // A concurrent resolver may have won the race; keep the first entry.
        let entry = self.cache.entry(key.clone()).or_insert_with(|| Arc::new(meta));
        Ok(Arc::clone(&entry))
    }

    /// Shorthand for [`Self::resolve`] with a freshly built key.
    pub fn resolve_parts(
        &self,
        kind: AssetKind,
        dir: &str,
        name: &str,
        ext: &str,
    ) -> Result<Arc<ContentMeta>> {
        self.resolve(&ContentKey::new(kind, dir, name, ext))
    }

    /// Find `<root>/<relative>` in the first primary root containing it.
    pub fn find_in_roots(&self, relative: &Path) -> Option<PathBuf> {
        self.roots
            .iter()
            .map(|root| root.join(relative))
            .find(|p| p.is_file())
    }

    fn probe(key: &ContentKey, root: &Path) -> Option<ContentMeta> {
        let plain = |main_file: PathBuf| ContentMeta {
            main_file,
            name: key.name.clone(),
            dir: key.dir.clone(),
            assembly: None,
        };

        let exact = key.check_path(root);
        if exact.is_file() {
            return Some(plain(exact));
        }

        let index = key.index_path(root);
        if index.is_file() {
            return Some(plain(index));
        }

        if key.kind.has_colocated_module_file() {
            let colocated = key.module_path(root);
            if colocated.is_file() {
                return Some(plain(colocated));
            }
        }

        let module_dir = key.module_dir(root);
        let descriptor = module_dir.join(ASSEMBLY_FILE);
        if descriptor.is_file() {
            return Some(ContentMeta {
                main_file: descriptor,
                name: key.name.clone(),
                dir: key.dir.clone(),
                assembly: Some(AssemblyLocation {
                    module_dir,
                    root: root.to_path_buf(),
                }),
            });
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn setup() -> (TempDir, PathResolver) {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("appA");
        let b = dir.path().join("appB");
        let m = dir.path().join("modules");
        for p in [&a, &b, &m] {
            fs::create_dir_all(p).unwrap();
        }
        let resolver = PathResolver::new(vec![a, b], vec![m]);
        (dir, resolver)
    }

    #[test]
    fn test_first_root_wins() {
        let (dir, resolver) = setup();
        touch(&dir.path().join("appA"), "css/app.css", "a");
        touch(&dir.path().join("appB"), "css/app.css", "b");

        let meta = resolver.resolve_parts(AssetKind::Css, "", "app", "css").unwrap();
        assert_eq!(meta.main_file, dir.path().join("appA/css/app.css"));
        assert!(!meta.is_assembled());
    }

    #[test]
    fn test_later_root_used_when_first_misses() {
        let (dir, resolver) = setup();
        touch(&dir.path().join("appB"), "js/vendor/lib.js", "");

        let meta = resolver.resolve_parts(AssetKind::Js, "vendor", "lib", "js").unwrap();
        assert_eq!(meta.main_file, dir.path().join("appB/js/vendor/lib.js"));
        assert_eq!(meta.dir, "vendor");
    }

    #[test]
    fn test_index_file() {
        let (dir, resolver) = setup();
        touch(&dir.path().join("appA"), "js/widget/index.js", "");

        let meta = resolver.resolve_parts(AssetKind::Js, "", "widget", "js").unwrap();
        assert_eq!(meta.main_file, dir.path().join("appA/js/widget/index.js"));
    }

    #[test]
    fn test_colocated_module_css_and_html() {
        let (dir, resolver) = setup();
        touch(&dir.path().join("appA"), "js/panel/panel.css", "");
        touch(&dir.path().join("appA"), "js/panel/panel.html", "");

        let css = resolver.resolve_parts(AssetKind::Css, "", "panel", "css").unwrap();
        assert_eq!(css.main_file, dir.path().join("appA/js/panel/panel.css"));
        let html = resolver.resolve_parts(AssetKind::Html, "", "panel", "html").unwrap();
        assert_eq!(html.main_file, dir.path().join("appA/js/panel/panel.html"));

        // Images never use the colocated lookup.
        touch(&dir.path().join("appA"), "js/panel/panel.png", "");
        assert!(resolver.resolve_parts(AssetKind::Img, "", "panel", "png").is_err());
    }

    #[test]
    fn test_assembly_descriptor() {
        let (dir, resolver) = setup();
        touch(&dir.path().join("appB"), "js/widget/assembly.json", "{}");

        let meta = resolver.resolve_parts(AssetKind::Js, "", "widget", "js").unwrap();
        let location = meta.assembly.as_ref().unwrap();
        assert_eq!(location.module_dir, dir.path().join("appB/js/widget"));
        assert_eq!(location.root, dir.path().join("appB"));
    }

    #[test]
    fn test_module_roots_only_for_non_script_kinds() {
        let (dir, resolver) = setup();
        touch(&dir.path().join("modules"), "img/arrow.png", "");
        touch(&dir.path().join("modules"), "js/helper.js", "");

        assert!(resolver.resolve_parts(AssetKind::Img, "", "arrow", "png").is_ok());
        let err = resolver.resolve_parts(AssetKind::Js, "", "helper", "js").unwrap_err();
        assert!(matches!(err, AssetError::Unresolved(route) if route == "js/helper.js"));
    }

    #[test]
    fn test_resolution_is_cached() {
        let (dir, resolver) = setup();
        touch(&dir.path().join("appB"), "css/app.css", "b");
        let first = resolver.resolve_parts(AssetKind::Css, "", "app", "css").unwrap();

        // A better match appearing later does not replace the cached entry.
        touch(&dir.path().join("appA"), "css/app.css", "a");
        let second = resolver.resolve_parts(AssetKind::Css, "", "app", "css").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(resolver.cache.len(), 1);
    }

    #[test]
    fn test_find_in_roots() {
        let (dir, resolver) = setup();
        touch(&dir.path().join("appB"), "js/shared.js", "");
        assert_eq!(
            resolver.find_in_roots(Path::new("js/shared.js")),
            Some(dir.path().join("appB/js/shared.js"))
        );
        assert_eq!(resolver.find_in_roots(Path::new("js/none.js")), None);
    }
}
