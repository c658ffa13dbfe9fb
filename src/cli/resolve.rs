//! Route resolution from the command line.

use anyhow::{Context, Result};

use crate::{
    cli::ResolveArgs, config::AssetConfig, debug, manifest::ServerManifest, pipeline::Pipeline,
};

/// Print the rendered markup of every route, one per line.
pub fn resolve_routes(config: AssetConfig, args: &ResolveArgs) -> Result<()> {
    for line in render_routes(config, args)? {
        println!("{line}");
    }
    Ok(())
}

/// Rendered markup per route, from the sources or from a persisted manifest.
///
/// Unresolvable routes render verbatim, as they would in a template.
fn render_routes(config: AssetConfig, args: &ResolveArgs) -> Result<Vec<String>> {
    if let Some(path) = &args.manifest {
        let manifest = ServerManifest::load(path)
            .with_context(|| format!("Failed to load manifest: {}", path.display()))?;
        debug!("resolve"; "{} manifest entries", manifest.len());
        return Ok(args.routes.iter().map(|r| manifest.render(r)).collect());
    }

    let pipeline = Pipeline::from_config(config);
    let context = pipeline.context(pipeline.mode());
    Ok(args
        .routes
        .iter()
        .map(|route| context.render(route, args.media.as_deref()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::testing::fixture;
    use crate::utils::hash::fingerprint;
    use std::path::{Path, PathBuf};

    fn config(dir: &Path, production: bool) -> AssetConfig {
        let mut config = AssetConfig::with_roots(dir, &[PathBuf::from("app")], &[]);
        config.build.production = production;
        config.build.minify = false;
        config
    }

    fn args(routes: &[&str]) -> ResolveArgs {
        ResolveArgs {
            routes: routes.iter().map(|r| (*r).to_owned()).collect(),
            production: false,
            media: None,
            serve_path: None,
            manifest: None,
            verbose: false,
        }
    }

    #[test]
    fn test_render_from_sources() {
        let dir = fixture(&[("app/css/app.css", "body{}"), ("app/img/logo.png", "PNG")]);

        let lines = render_routes(config(dir.path(), false), &args(&["app.css", "logo.png", "nope.js"])).unwrap();
        assert_eq!(
            lines,
            vec![
                "<link href='/css/app.css' rel='stylesheet' media='screen'>".to_owned(),
                "/img/logo.png".to_owned(),
                "<script src='nope.js'></script>".to_owned(),
            ]
        );

        let mut print = args(&["app.css"]);
        print.media = Some("print".into());
        let lines = render_routes(config(dir.path(), true), &print).unwrap();
        assert_eq!(
            lines[0],
            format!(
                "<link href='/css/app-{}.css' rel='stylesheet' media='print'>",
                fingerprint("body{}")
            )
        );
    }

    #[test]
    fn test_render_from_manifest() {
        let dir = fixture(&[("app/img/logo.png", "PNG")]);
        let mut cfg = config(dir.path(), true);
        cfg.build.output = dir.path().join("out");
        Pipeline::from_config(cfg.clone()).precompile(None).unwrap();

        let mut lookup = args(&["/logo.png", "missing.png"]);
        lookup.manifest = Some(cfg.manifest_path());
        let lines = render_routes(cfg, &lookup).unwrap();
        assert_eq!(lines[0], format!("/img/logo-{}.png", fingerprint("PNG")));
        assert_eq!(lines[1], "missing.png");
    }
}
