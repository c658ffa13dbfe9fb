//! Precompile orchestration.
//!
//! Build phases:
//! - **Init** - clean the output directory when asked
//! - **Scan** - discover every route under the search roots
//! - **Build** - parallel asset builds, artifact writes, manifests
//! - **Finalize** - summary and failure report

use anyhow::{Context, Result, bail};
use std::{fs, path::Path};

use crate::{
    config::AssetConfig,
    log,
    logger::ProgressLine,
    pipeline::{BuildReport, Pipeline, count_by_kind},
    resolve::AssetKind,
    utils::plural_count,
};

/// Precompile every asset of `config` into `build.output`.
pub fn build_assets(config: AssetConfig, quiet: bool) -> Result<BuildReport> {
    init_output(&config.build.output, config.build.clean)?;

    let pipeline = Pipeline::from_config(config);
    let routes = pipeline.scan();
    if routes.is_empty() {
        log!("warn"; "no assets found under {}", plural_count(pipeline.resolver().roots().len(), "root"));
    }

    let progress = create_progress(&count_by_kind(&routes), quiet);
    let report = pipeline
        .precompile_routes(&routes, progress.as_ref())
        .context("Failed to write manifests")?;
    if let Some(p) = progress {
        p.finish();
    }

    finalize_build(&report, &pipeline.config().build.output, quiet)?;
    Ok(report)
}

fn init_output(output: &Path, clean: bool) -> Result<()> {
    if clean && output.exists() {
        fs::remove_dir_all(output).with_context(|| {
            format!("Failed to clear output directory: {}", output.display())
        })?;
    }
    fs::create_dir_all(output)
        .with_context(|| format!("Failed to create output directory: {}", output.display()))
}

fn create_progress(counts: &[(AssetKind, usize)], quiet: bool) -> Option<ProgressLine> {
    if quiet {
        return None;
    }
    let items: Vec<_> = counts.iter().map(|(kind, n)| (kind.dir(), *n)).collect();
    Some(ProgressLine::new("build", &items))
}

fn finalize_build(report: &BuildReport, output: &Path, quiet: bool) -> Result<()> {
    if !quiet {
        let summary: Vec<_> = AssetKind::ALL
            .iter()
            .map(|kind| report.count(*kind))
            .zip(["script", "stylesheet", "image", "html file"])
            .filter(|(n, _)| *n > 0)
            .map(|(n, noun)| plural_count(n, noun))
            .collect();
        if summary.is_empty() {
            log!("build"; "nothing written to {}", output.display());
        } else {
            log!("build"; "{} -> {}", summary.join(", "), output.display());
        }
    }

    if !report.is_success() {
        for (route, err) in &report.failures {
            log!("error"; "{route}: {err}");
        }
        bail!(
            "{} failed to build",
            plural_count(report.failures.len(), "asset")
        );
    }
    Ok(())
}
