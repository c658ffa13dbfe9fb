//! Asset descriptors: public paths, disk paths and fingerprints per kind.
//!
//! One [`Asset`] is created per logical reference. Its [`AssetVariant`]
//! decides the per-kind rules; everything else is shared:
//!
//! | variant            | public path                     | raw twin                     |
//! |--------------------|---------------------------------|------------------------------|
//! | script             | `js/dir/name[-fp].js`           | `js/dir/name[-fp]_raw.js`    |
//! | transpiled script  | `js/dir/name[-fp].coffee.js`    | `js/dir/name[-fp].coffee_raw.js` |
//! | stylesheet         | `css/dir/name[-fp].css`         |                              |
//! | dialect stylesheet | `css/dir/name[-fp].less.css`    |                              |
//! | image              | `img/dir/name[-fp].ext`         |                              |
//! | static             | `html/dir/name[-fp].html`       |                              |
//!
//! Remote routes (`http://`, `https://`, `//`) are passthrough: every
//! accessor echoes the original route and nothing touches the filesystem.

mod route;
mod stylesheet;
mod variant;

pub use route::{AssetRoute, extension_of, is_remote, split_suffixes};
pub use stylesheet::{ImageResolver, rewrite_urls};
pub use variant::AssetVariant;

use std::path::Path;

use crate::content::ContentUnit;
use crate::content::dialect::StyleDialect;
use crate::error::{AssetError, Result};
use crate::log;
use crate::manifest::{ClientEntry, ServerEntry};
use crate::pipeline::Pipeline;
use crate::resolve::{AssetKind, ContentKey};
use crate::utils::{hash, path::join_url, write::write_artifact};

/// Media type of stylesheet links without an explicit one.
pub const DEFAULT_MEDIA: &str = "screen";

#[derive(Debug, Clone)]
pub struct Asset {
    variant: AssetVariant,
    route: AssetRoute,
    media: String,
    serve_path: String,
    fingerprint: Option<String>,
    /// `None` for passthrough assets.
    content: Option<ContentUnit>,
}

impl Asset {
    /// Resolve and load the asset behind `route`.
    ///
    /// Fails with [`AssetError::Unresolved`] when no search root has it.
    /// Stylesheets are compiled and have their image references rewritten
    /// through `images` here, before any fingerprint is taken.
    pub fn new(
        route: &str,
        media: Option<&str>,
        pipeline: &Pipeline,
        images: &dyn ImageResolver,
    ) -> Result<Self> {
        let mut asset = Self::describe(route, media, pipeline.serve_path());
        if asset.route.passthrough {
            return Ok(asset);
        }

        let kind = asset.kind();
        let key = ContentKey::new(kind, &asset.route.dir, &asset.route.name, &asset.route.ext);
        let meta = pipeline.resolver().resolve(&key)?;
        let mut content = ContentUnit::load(
            meta,
            kind,
            &asset.route.ext,
            pipeline.resolver(),
            pipeline.toolchain(),
        )?;

        if let AssetVariant::Stylesheet(dialect) = asset.variant {
            asset.preprocess(&mut content, dialect, pipeline, images);
        }

        asset.content = Some(content);
        Ok(asset)
    }

    /// Like [`Self::new`], but an unresolvable route degrades to a
    /// passthrough asset rendering the route verbatim.
    pub fn parse(
        route: &str,
        media: Option<&str>,
        pipeline: &Pipeline,
        images: &dyn ImageResolver,
    ) -> Self {
        Self::new(route, media, pipeline, images).unwrap_or_else(|err| {
            log!("warn"; "{err}, rendering `{route}` as is");
            let mut asset = Self::describe(route, media, pipeline.serve_path());
            asset.route = asset.route.into_passthrough();
            asset
        })
    }

    /// Parse the route without touching the filesystem.
    fn describe(route: &str, media: Option<&str>, serve_path: &str) -> Self {
        let (path, _, _) = split_suffixes(route);
        let (variant, source_path) = AssetVariant::detect(path, extension_of(route));
        Self {
            variant,
            route: AssetRoute::parse(route, &source_path),
            media: media.unwrap_or(DEFAULT_MEDIA).to_owned(),
            serve_path: serve_path.to_owned(),
            fingerprint: None,
            content: None,
        }
    }

    fn preprocess(
        &self,
        content: &mut ContentUnit,
        dialect: Option<StyleDialect>,
        pipeline: &Pipeline,
        images: &dyn ImageResolver,
    ) {
        let mut css = content.content_text().into_owned();

        if let Some(dialect) = dialect {
            let mut includes: Vec<_> = content.disk_path().parent().into_iter().map(Path::to_path_buf).collect();
            includes.extend(dialect.include_paths(pipeline.resolver().roots()));
            match pipeline.toolchain().styles.compile(dialect, &css, &includes) {
                Ok(compiled) => css = compiled,
                Err(err) => log!(
                    "compile";
                    "{}: {err}, serving uncompiled source",
                    content.disk_path().display()
                ),
            }
        }

        let css = rewrite_urls(&css, images, &self.route.requested);
        content.set_content(css.into_bytes(), pipeline.toolchain());
    }

    pub fn variant(&self) -> AssetVariant {
        self.variant
    }

    pub fn kind(&self) -> AssetKind {
        self.variant.kind()
    }

    pub fn route(&self) -> &AssetRoute {
        &self.route
    }

    /// Requested route without query, fragment and leading slash.
    pub fn requested(&self) -> &str {
        &self.route.requested
    }

    pub fn is_passthrough(&self) -> bool {
        self.route.passthrough
    }

    pub fn media(&self) -> &str {
        &self.media
    }

    pub fn content(&self) -> Option<&ContentUnit> {
        self.content.as_ref()
    }

    pub fn fingerprint(&self) -> Option<&str> {
        self.fingerprint.as_deref()
    }

    /// Hash the raw content and embed it in every path. Idempotent.
    pub fn compute_fingerprint(&mut self) -> Option<&str> {
        if self.fingerprint.is_none()
            && let Some(content) = &self.content
        {
            self.fingerprint = Some(hash::fingerprint(content.raw()));
        }
        self.fingerprint.as_deref()
    }

    fn stem(&self) -> String {
        match &self.fingerprint {
            Some(fp) => format!("{}-{fp}", self.route.name),
            None => self.route.name.clone(),
        }
    }

    fn under_kind(&self, file_name: &str) -> String {
        join_url(&[self.kind().dir(), &self.route.dir, file_name])
    }

    fn public(&self, relative: &str) -> String {
        format!(
            "{}/{relative}{}{}",
            self.serve_path.trim_end_matches('/'),
            self.route.query,
            self.route.fragment
        )
    }

    /// Path under the output root, e.g. `css/app-<fp>.css`.
    pub fn relative_path(&self) -> String {
        if self.route.passthrough {
            return self.route.original.clone();
        }
        let ext = self.variant.public_ext(&self.route.ext);
        let file_name = if ext.is_empty() {
            self.stem()
        } else {
            format!("{}.{ext}", self.stem())
        };
        self.under_kind(&file_name)
    }

    /// Path of the unminified twin, scripts only.
    pub fn raw_relative_path(&self) -> Option<String> {
        if self.route.passthrough {
            return None;
        }
        let suffix = self.variant.raw_suffix(&self.route.ext)?;
        Some(self.under_kind(&format!("{}{suffix}", self.stem())))
    }

    /// Serving prefix + relative path + query + fragment.
    pub fn public_path(&self) -> String {
        if self.route.passthrough {
            return self.route.original.clone();
        }
        self.public(&self.relative_path())
    }

    pub fn raw_public_path(&self) -> Option<String> {
        self.raw_relative_path().map(|rel| self.public(&rel))
    }

    /// Markup for templates: script tag, stylesheet link or bare path.
    pub fn render_tag(&self) -> String {
        self.render(&self.public_path())
    }

    /// Script tag pointing at the unminified twin.
    pub fn render_raw_tag(&self) -> Option<String> {
        self.raw_public_path().map(|path| self.render(&path))
    }

    fn render(&self, path: &str) -> String {
        match self.variant {
            AssetVariant::Script | AssetVariant::TranspiledScript(_) => {
                format!("<script src='{path}'></script>")
            }
            AssetVariant::Stylesheet(_) => format!(
                "<link href='{path}' rel='stylesheet' media='{}'>",
                self.media
            ),
            AssetVariant::Image | AssetVariant::Static => path.to_owned(),
        }
    }

    /// Resolved file on disk (`assembly.json` for assemblies).
    pub fn disk_path(&self) -> Result<&Path> {
        self.content
            .as_ref()
            .map(ContentUnit::disk_path)
            .ok_or_else(|| AssetError::Passthrough(self.route.original.clone()))
    }

    /// Write the artifact (and its raw twin) under `out`.
    ///
    /// `.gz` siblings are written when `gzip` is set, except for images.
    pub fn write_artifacts(&self, out: &Path, gzip: bool) -> Result<()> {
        let Some(content) = &self.content else {
            return Ok(());
        };
        let gzip = gzip && self.variant.compresses();

        let path = out.join(self.relative_path());
        write_artifact(&path, content.content(), gzip).map_err(|e| AssetError::io(&path, e))?;

        if let Some(raw) = self.raw_relative_path() {
            let path = out.join(raw);
            write_artifact(&path, content.raw(), gzip).map_err(|e| AssetError::io(&path, e))?;
        }
        Ok(())
    }

    pub fn server_entry(&self) -> ServerEntry {
        ServerEntry {
            requested: self.route.requested.clone(),
            kind: self.kind(),
            output: self.render_tag(),
            relative_path: self.relative_path(),
            fingerprint: self.fingerprint.clone(),
            output_raw: self.render_raw_tag(),
        }
    }

    /// Scripts are looked up client side by bare module name, everything
    /// else by requested route.
    pub fn client_entry(&self) -> ClientEntry {
        let name = if self.variant.is_script() {
            self.route.name.clone()
        } else {
            self.route.requested.clone()
        };
        ClientEntry {
            name,
            path: self.public_path(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::dialect::ScriptDialect;

    fn described(route: &str, serve_path: &str) -> Asset {
        Asset::describe(route, None, serve_path)
    }

    #[test]
    fn test_paths_without_fingerprint() {
        let asset = described("/vendor/app.js?v=1#top", "");
        assert_eq!(asset.relative_path(), "js/vendor/app.js");
        assert_eq!(asset.public_path(), "/js/vendor/app.js?v=1#top");
        assert_eq!(asset.raw_relative_path().as_deref(), Some("js/vendor/app_raw.js"));
        assert_eq!(asset.render_tag(), "<script src='/js/vendor/app.js?v=1#top'></script>");
    }

    #[test]
    fn test_dialect_paths() {
        let asset = described("theme.less", "CDN/");
        assert_eq!(asset.variant(), AssetVariant::Stylesheet(Some(StyleDialect::Less)));
        assert_eq!(asset.requested(), "theme.less");
        assert_eq!(asset.public_path(), "CDN/css/theme.less.css");
        assert_eq!(
            asset.render_tag(),
            "<link href='CDN/css/theme.less.css' rel='stylesheet' media='screen'>"
        );

        let asset = described("app.coffee.js", "");
        assert_eq!(asset.variant(), AssetVariant::TranspiledScript(ScriptDialect::Coffee));
        assert_eq!(asset.relative_path(), "js/app.coffee.js");
        assert_eq!(asset.raw_relative_path().as_deref(), Some("js/app.coffee_raw.js"));
    }

    #[test]
    fn test_fingerprinted_names() {
        let mut asset = described("app.coffee", "");
        asset.fingerprint = Some("abc".into());
        assert_eq!(asset.relative_path(), "js/app-abc.coffee.js");
        assert_eq!(asset.raw_relative_path().as_deref(), Some("js/app-abc.coffee_raw.js"));

        let mut asset = described("webfonts/gothic.eot?#iefix", "");
        asset.fingerprint = Some("abc".into());
        assert_eq!(asset.public_path(), "/img/webfonts/gothic-abc.eot?#iefix");
    }

    #[test]
    fn test_passthrough_accessors() {
        let mut asset = described("https://cdn.com/me.css?q#h", "CDN");
        assert!(asset.is_passthrough());
        assert_eq!(asset.public_path(), "https://cdn.com/me.css?q#h");
        assert_eq!(asset.relative_path(), "https://cdn.com/me.css?q#h");
        assert_eq!(
            asset.render_tag(),
            "<link href='https://cdn.com/me.css?q#h' rel='stylesheet' media='screen'>"
        );
        assert_eq!(asset.compute_fingerprint(), None);
        assert!(matches!(asset.disk_path(), Err(AssetError::Passthrough(_))));
        assert!(asset.write_artifacts(Path::new("/nonexistent"), true).is_ok());
    }

    #[test]
    fn test_media_and_bare_paths() {
        let asset = Asset::describe("print.css", Some("print"), "");
        assert_eq!(
            asset.render_tag(),
            "<link href='/css/print.css' rel='stylesheet' media='print'>"
        );
        assert_eq!(described("logo.png", "").render_tag(), "/img/logo.png");
        assert_eq!(described("t.html", "").render_tag(), "/html/t.html");
    }

    #[test]
    fn test_entries() {
        let mut asset = described("angular/MyApp.js", "CDN");
        asset.fingerprint = Some("fp".into());
        let server = asset.server_entry();
        assert_eq!(server.requested, "angular/MyApp.js");
        assert_eq!(server.kind, AssetKind::Js);
        assert_eq!(server.output, "<script src='CDN/js/angular/MyApp-fp.js'></script>");
        assert_eq!(server.relative_path, "js/angular/MyApp-fp.js");
        assert_eq!(
            server.output_raw.as_deref(),
            Some("<script src='CDN/js/angular/MyApp-fp_raw.js'></script>")
        );
        assert_eq!(asset.client_entry().name, "MyApp");

        let image = described("icons/arrow.png", "");
        assert_eq!(image.server_entry().output_raw, None);
        assert_eq!(image.client_entry().name, "icons/arrow.png");
    }
}
