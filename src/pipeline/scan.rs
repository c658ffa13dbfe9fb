//! Asset discovery for a precompile pass (pure, no side effects).
//!
//! Every search root is walked per kind folder in sorted order, so the
//! same tree always yields the same route list:
//!
//! | kind | roots              | files                                   |
//! |------|--------------------|-----------------------------------------|
//! | js   | roots              | `*.js`, `*.coffee`, assembly folders    |
//! | css  | roots + modules    | `*.css`, `*.less`, `*.styl`, colocated  |
//! | img  | roots + modules    | anything but dotfiles                   |
//! | html | roots + modules    | `*.html`, colocated                     |
//!
//! Colocated files are module files living in a script folder,
//! `js/<dir>/<name>/<name>.css`, addressed as `<dir>/<name>.css`.

use rustc_hash::FxHashSet;
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::asset::{AssetVariant, extension_of};
use crate::resolve::{ASSEMBLY_FILE, AssetKind, PathResolver};
use crate::utils::path::to_route;

/// A logical route discovered on disk.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScannedRoute {
    pub kind: AssetKind,
    pub route: String,
}

/// Every distinct route under the resolver's search roots.
///
/// A route found in several roots is listed once, for the first root.
pub fn scan(resolver: &PathResolver) -> Vec<ScannedRoute> {
    let mut seen = FxHashSet::default();
    let mut results = Vec::new();

    for kind in AssetKind::ALL {
        let mut found = Vec::new();
        for root in resolver.search_roots(kind) {
            scan_kind(&mut found, root, kind);
            if kind.has_colocated_module_file() {
                scan_colocated(&mut found, &root.join(AssetKind::Js.dir()), Path::new(""), kind);
            }
        }

        for route in found {
            let scanned = ScannedRoute { kind, route };
            if seen.insert(scanned.clone()) {
                results.push(scanned);
            }
        }
    }

    results
}

/// Number of routes per kind, in [`AssetKind::ALL`] order.
pub fn count_by_kind(routes: &[ScannedRoute]) -> Vec<(AssetKind, usize)> {
    AssetKind::ALL
        .iter()
        .map(|kind| (*kind, routes.iter().filter(|r| r.kind == *kind).count()))
        .collect()
}

fn scan_kind(results: &mut Vec<String>, root: &Path, kind: AssetKind) {
    let base = root.join(kind.dir());
    scan_recursive(results, &base, &base, kind);
}

fn scan_recursive(results: &mut Vec<String>, dir: &Path, base: &Path, kind: AssetKind) {
    for path in sorted_entries(dir) {
        if is_dotfile(&path) {
            continue;
        }
        let rel = path.strip_prefix(base).unwrap_or(&path);
        if path.is_dir() {
            // An assembly folder is one script; its parts are not standalone.
            if kind == AssetKind::Js && path.join(ASSEMBLY_FILE).is_file() {
                results.push(format!("{}.js", to_route(rel)));
            } else {
                scan_recursive(results, &path, base, kind);
            }
        } else {
            let route = to_route(rel);
            if belongs_to(&route, kind) {
                results.push(route);
            }
        }
    }
}

/// Collect `<dir>/<name>/<name>.<ext>` files of `kind` below a script folder.
fn scan_colocated(results: &mut Vec<String>, dir: &Path, rel: &Path, kind: AssetKind) {
    for path in sorted_entries(dir) {
        if !path.is_dir() {
            continue;
        }
        let Some(name) = path.file_name() else {
            continue;
        };
        let module_rel = rel.join(name);

        for file in sorted_entries(&path) {
            let ext = file.extension().and_then(|e| e.to_str());
            let (Some(ext), true) = (ext, file.file_stem() == Some(name) && file.is_file()) else {
                continue;
            };
            let route = format!("{}.{ext}", to_route(&module_rel));
            if belongs_to(&route, kind) {
                results.push(route);
            }
        }

        scan_colocated(results, &path, &module_rel, kind);
    }
}

/// Whether `route` is served as `kind` (an `.html` file in `img/` is not an image).
fn belongs_to(route: &str, kind: AssetKind) -> bool {
    let (variant, _) = AssetVariant::detect(route, extension_of(route));
    variant.kind() == kind
}

fn is_dotfile(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('.'))
}

fn sorted_entries(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut paths: Vec<_> = entries.flatten().map(|e| e.path()).collect();
    paths.sort();
    paths
}
