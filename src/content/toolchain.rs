//! External collaborators used while loading content.
//!
//! Compilers and the minifier are consumed through traits so a pipeline can
//! run with the real command line tools, with in-process fakes under test,
//! or with nothing at all.

use std::{path::PathBuf, sync::Arc};

use super::command::CommandCompiler;
use super::dialect::{ScriptDialect, StyleDialect};
use super::minify::OxcMinifier;
use crate::config::AssetConfig;
use crate::error::Result;

/// Compiles a script dialect to JavaScript.
pub trait ScriptCompiler: Send + Sync {
    /// `bare` asks for output without the top-level safety wrapper, used for
    /// assembly parts that are wrapped by the assembly itself.
    fn compile(&self, dialect: ScriptDialect, source: &str, bare: bool) -> Result<String>;
}

/// Compiles a stylesheet dialect to CSS.
pub trait StyleCompiler: Send + Sync {
    fn compile(
        &self,
        dialect: StyleDialect,
        source: &str,
        include_paths: &[PathBuf],
    ) -> Result<String>;
}

/// Compacts script source.
pub trait Minifier: Send + Sync {
    fn minify(&self, source: &str) -> Result<String>;
}

/// Bundle of collaborators shared by every content unit of a pipeline.
#[derive(Clone)]
pub struct Toolchain {
    pub scripts: Arc<dyn ScriptCompiler>,
    pub styles: Arc<dyn StyleCompiler>,
    pub minifier: Arc<dyn Minifier>,
    /// Whether script content gets a minified variant.
    pub minify: bool,
}

impl Toolchain {
    /// Command-line compilers from `[compilers]` and the oxc minifier.
    pub fn from_config(config: &AssetConfig) -> Self {
        let compiler = Arc::new(CommandCompiler::new(config.compilers.clone()));
        Self {
            scripts: compiler.clone(),
            styles: compiler,
            minifier: Arc::new(OxcMinifier),
            minify: config.build.minify,
        }
    }
}
