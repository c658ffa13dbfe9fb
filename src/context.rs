//! Template-facing capability functions.
//!
//! An [`AssetContext`] hands out rendered markup for logical routes and
//! remembers every asset it created, so a page referencing the same image
//! twice resolves it once and a precompile pass can collect them all.

use dashmap::DashMap;
use std::{collections::BTreeMap, sync::Arc};

use crate::asset::{Asset, ImageResolver, is_remote};
use crate::error::{AssetError, Result};
use crate::pipeline::{BuildMode, Pipeline};

/// Stylesheet reference: a single route, or one route per media type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StyleRef {
    Route(String),
    Media(BTreeMap<String, String>),
}

impl From<&str> for StyleRef {
    fn from(route: &str) -> Self {
        Self::Route(route.to_owned())
    }
}

impl From<String> for StyleRef {
    fn from(route: String) -> Self {
        Self::Route(route)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for StyleRef {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::Media(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Cache key: route as written plus media type.
type AssetKey = (String, Option<String>);

pub struct AssetContext<'p> {
    pipeline: &'p Pipeline,
    mode: BuildMode,
    assets: DashMap<AssetKey, Arc<Asset>>,
}

impl<'p> AssetContext<'p> {
    pub fn new(pipeline: &'p Pipeline, mode: BuildMode) -> Self {
        Self {
            pipeline,
            mode,
            assets: DashMap::new(),
        }
    }

    pub fn mode(&self) -> BuildMode {
        self.mode
    }

    /// Script tag for `route`.
    pub fn js(&self, route: &str) -> String {
        self.render(route, None)
    }

    /// Stylesheet link(s); a media map renders one link per entry, newline separated.
    pub fn css(&self, style: impl Into<StyleRef>) -> String {
        match style.into() {
            StyleRef::Route(route) => self.render(&route, None),
            StyleRef::Media(map) => map
                .iter()
                .map(|(media, route)| self.render(route, Some(media)))
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    /// Public path of an image (or font, or any other binary asset).
    pub fn img(&self, route: &str) -> String {
        self.render(route, None)
    }

    /// Public path of a static html file.
    pub fn html(&self, route: &str) -> String {
        self.render(route, None)
    }

    /// Rendered markup for any route; unresolvable routes render verbatim.
    pub fn render(&self, route: &str, media: Option<&str>) -> String {
        self.asset(route, media).render_tag()
    }

    /// Asset for `route`, degrading to passthrough when it cannot be resolved.
    pub fn asset(&self, route: &str, media: Option<&str>) -> Arc<Asset> {
        let key = (route.to_owned(), media.map(str::to_owned));
        if let Some(asset) = self.cached(&key) {
            return asset;
        }
        let asset = self.finish(Asset::parse(route, media, self.pipeline, self));
        self.store(key, asset)
    }

    /// Asset for `route`, or the resolution error.
    pub fn try_asset(&self, route: &str, media: Option<&str>) -> Result<Arc<Asset>> {
        let key = (route.to_owned(), media.map(str::to_owned));
        if let Some(asset) = self.cached(&key) {
            return Ok(asset);
        }
        let asset = self.finish(Asset::new(route, media, self.pipeline, self)?);
        Ok(self.store(key, asset))
    }

    /// Every asset created so far, in no particular order.
    pub fn assets(&self) -> Vec<Arc<Asset>> {
        self.assets.iter().map(|e| Arc::clone(e.value())).collect()
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    fn cached(&self, key: &AssetKey) -> Option<Arc<Asset>> {
        // Clone out so no shard lock is held while building dependencies.
        self.assets.get(key).map(|e| Arc::clone(e.value()))
    }

    fn finish(&self, mut asset: Asset) -> Asset {
        if self.mode.fingerprint {
            asset.compute_fingerprint();
        }
        asset
    }

    fn store(&self, key: AssetKey, asset: Asset) -> Arc<Asset> {
        let entry = self.assets.entry(key).or_insert_with(|| Arc::new(asset));
        Arc::clone(entry.value())
    }
}

impl ImageResolver for AssetContext<'_> {
    fn resolve_image(&self, route: &str) -> Result<String> {
        if is_remote(route) {
            return Ok(route.to_owned());
        }
        let asset = self.try_asset(route, None)?;
        if asset.is_passthrough() {
            return Err(AssetError::Unresolved(route.to_owned()));
        }
        Ok(asset.public_path())
    }
}
