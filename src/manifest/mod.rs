//! Manifest aggregation for a precompile pass.
//!
//! Two documents come out of a pass:
//!
//! - `manifest.json`: requested route -> [`ServerEntry`], for request-time lookups
//! - `js/clientManifest.js`: `var manifest = {css:{}, js:{}, img:{}, html:{}};`
//!   mapping logical names to public paths, runnable standalone in a browser

mod entry;
mod server;

pub use entry::{ClientEntry, ServerEntry};
pub use server::ServerManifest;

use rayon::prelude::*;
use serde_json::{Map, Value};
use std::{collections::BTreeMap, path::Path, sync::Arc};

use crate::asset::Asset;
use crate::error::{AssetError, Result};
use crate::logger::ProgressLine;
use crate::resolve::AssetKind;
use crate::utils::{hash, write::write_artifact};
use crate::{debug, log};

pub const MANIFEST_FILE: &str = "manifest.json";
pub const CLIENT_MANIFEST: &str = "clientManifest.js";

/// Outcome of [`ManifestBuilder::persist`].
#[derive(Debug, Default)]
pub struct PersistReport {
    /// Assets whose artifacts were written.
    pub written: usize,
    /// Written assets per kind.
    pub by_kind: BTreeMap<AssetKind, usize>,
    /// Requested route and error of every asset that failed to write.
    pub failures: Vec<(String, AssetError)>,
}

/// Collects the assets touched in one pass.
#[derive(Debug, Default)]
pub struct ManifestBuilder {
    serve_path: String,
    assets: BTreeMap<String, Arc<Asset>>,
}

impl ManifestBuilder {
    pub fn new(serve_path: &str) -> Self {
        Self {
            serve_path: serve_path.to_owned(),
            assets: BTreeMap::new(),
        }
    }

    /// Register an asset. Passthrough assets are skipped and the first asset
    /// registered for a requested route wins.
    pub fn add(&mut self, asset: Arc<Asset>) -> bool {
        if asset.is_passthrough() || self.assets.contains_key(asset.requested()) {
            return false;
        }
        self.assets.insert(asset.requested().to_owned(), asset);
        true
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Server entries keyed by requested route.
    pub fn server_entries(&self) -> BTreeMap<String, ServerEntry> {
        self.assets
            .iter()
            .map(|(route, asset)| (route.clone(), asset.server_entry()))
            .collect()
    }

    /// `var manifest = {...};` with one branch per kind.
    pub fn client_script(&self) -> String {
        let mut branches: BTreeMap<AssetKind, BTreeMap<String, String>> =
            AssetKind::ALL.iter().map(|k| (*k, BTreeMap::new())).collect();
        for asset in self.assets.values() {
            let entry = asset.client_entry();
            if let Some(branch) = branches.get_mut(&asset.kind()) {
                branch.insert(entry.name, entry.path);
            }
        }

        let mut table = Map::new();
        for kind in [AssetKind::Css, AssetKind::Js, AssetKind::Img, AssetKind::Html] {
            let branch = branches.remove(&kind).unwrap_or_default();
            let branch: Map<String, Value> = branch
                .into_iter()
                .map(|(name, path)| (name, Value::String(path)))
                .collect();
            table.insert(kind.dir().to_owned(), Value::Object(branch));
        }

        let json = serde_json::to_string(&table).unwrap_or_else(|_| "{}".into());
        format!("var manifest = {json};")
    }

    /// Write every artifact, the client manifest and `manifest.json` under `out`.
    ///
    /// Artifacts are written in parallel. A failed asset is reported and left
    /// out of `manifest.json`; it never stops the others.
    pub fn persist(
        &self,
        out: &Path,
        gzip: bool,
        progress: Option<&ProgressLine>,
    ) -> Result<PersistReport> {
        let results: Vec<(&String, Result<()>)> = self
            .assets
            .par_iter()
            .map(|(route, asset)| {
                let result = asset.write_artifacts(out, gzip);
                if let Some(progress) = progress {
                    progress.inc(asset.kind().dir());
                }
                (route, result)
            })
            .collect();

        let mut report = PersistReport::default();
        let mut entries = BTreeMap::new();
        for (route, result) in results {
            match result {
                Ok(()) => {
                    report.written += 1;
                    if let Some(asset) = self.assets.get(route) {
                        *report.by_kind.entry(asset.kind()).or_default() += 1;
                        entries.insert(route.clone(), asset.server_entry());
                    }
                }
                Err(err) => {
                    log!("error"; "{route}: {err}");
                    report.failures.push((route.clone(), err));
                }
            }
        }

        let client = self.write_client_manifest(out, gzip)?;
        entries.insert(CLIENT_MANIFEST.to_owned(), client);

        let manifest_path = out.join(MANIFEST_FILE);
        let json = serde_json::to_string_pretty(&entries)
            .map_err(|e| AssetError::Json(manifest_path.clone(), e))?;
        write_artifact(&manifest_path, json.as_bytes(), false)
            .map_err(|e| AssetError::io(&manifest_path, e))?;
        debug!("manifest"; "{} entries -> {}", entries.len(), manifest_path.display());

        Ok(report)
    }

    /// Write `js/clientManifest.js` and its fingerprinted twin.
    fn write_client_manifest(&self, out: &Path, gzip: bool) -> Result<ServerEntry> {
        let script = self.client_script();
        let fingerprint = hash::fingerprint(&script);
        let plain = format!("js/{CLIENT_MANIFEST}");
        let relative_path = format!("js/clientManifest-{fingerprint}.js");

        for rel in [&plain, &relative_path] {
            let path = out.join(rel);
            write_artifact(&path, script.as_bytes(), gzip).map_err(|e| AssetError::io(&path, e))?;
        }

        let public = format!("{}/{relative_path}", self.serve_path.trim_end_matches('/'));
        Ok(ServerEntry {
            requested: CLIENT_MANIFEST.to_owned(),
            kind: AssetKind::Js,
            output: format!("<script src='{public}'></script>"),
            relative_path,
            fingerprint: Some(fingerprint),
            output_raw: None,
        })
    }
}
