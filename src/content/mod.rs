//! Loaded content of one resolved resource.
//!
//! A [`ContentUnit`] keeps two variants of the bytes:
//!
//! - `content`: what gets served (compiled, and minified for scripts when
//!   minification is on)
//! - `raw`: the unminified text, used for fingerprints and `_raw` artifacts

pub mod command;
pub mod dialect;
pub mod minify;
pub mod toolchain;

use std::{borrow::Cow, fs, path::Path, sync::Arc};

use crate::assembly::AssemblyBuilder;
use crate::error::{AssetError, Result};
use crate::log;
use crate::resolve::{AssetKind, ContentMeta, PathResolver};
use dialect::ScriptDialect;
use toolchain::Toolchain;

#[derive(Debug, Clone)]
pub struct ContentUnit {
    meta: Arc<ContentMeta>,
    kind: AssetKind,
    ext: String,
    content: Vec<u8>,
    raw: Vec<u8>,
}

impl ContentUnit {
    /// Read (or assemble) the resource behind `meta` and run the content transforms.
    pub fn load(
        meta: Arc<ContentMeta>,
        kind: AssetKind,
        ext: &str,
        resolver: &PathResolver,
        toolchain: &Toolchain,
    ) -> Result<Self> {
        let bytes = if meta.is_assembled() {
            AssemblyBuilder::new(resolver, toolchain)
                .build(&meta)
                .into_bytes()
        } else {
            fs::read(&meta.main_file).map_err(|e| AssetError::io(&meta.main_file, e))?
        };

        let mut unit = Self {
            meta,
            kind,
            ext: ext.to_owned(),
            content: Vec::new(),
            raw: Vec::new(),
        };
        unit.set_content(bytes, toolchain);
        Ok(unit)
    }

    /// Replace the content and re-run dialect compilation and minification.
    ///
    /// Both steps degrade: a failed compile keeps the source, a failed
    /// minification serves the unminified text.
    pub fn set_content(&mut self, bytes: Vec<u8>, toolchain: &Toolchain) {
        self.content = bytes;

        if !self.meta.is_assembled()
            && let Some(dialect) = ScriptDialect::from_ext(&self.ext)
        {
            let source = String::from_utf8_lossy(&self.content).into_owned();
            match toolchain.scripts.compile(dialect, &source, false) {
                Ok(compiled) => self.content = compiled.into_bytes(),
                Err(e) => log!("compile"; "{}: {e}", self.meta.main_file.display()),
            }
        }

        self.raw = self.content.clone();

        if toolchain.minify && self.kind == AssetKind::Js {
            let source = String::from_utf8_lossy(&self.raw);
            match toolchain.minifier.minify(&source) {
                Ok(minified) => self.content = minified.into_bytes(),
                Err(e) => log!("minify"; "{}: {e}, serving unminified", self.meta.main_file.display()),
            }
        }
    }

    pub fn meta(&self) -> &ContentMeta {
        &self.meta
    }

    pub fn disk_path(&self) -> &Path {
        &self.meta.main_file
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    pub fn content_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.content)
    }

    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    pub fn raw_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.raw)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-process collaborators for tests.

    use std::path::PathBuf;
    use std::sync::Arc;

    use super::dialect::{Dialect, ScriptDialect, StyleDialect};
    use super::toolchain::{Minifier, ScriptCompiler, StyleCompiler, Toolchain};
    use crate::error::{AssetError, Result};

    /// Tags compiled output so tests can see which transform ran.
    ///
    /// Sources containing `!fail` make the compiler fail.
    pub struct FakeCompiler;

    impl ScriptCompiler for FakeCompiler {
        fn compile(&self, dialect: ScriptDialect, source: &str, bare: bool) -> Result<String> {
            if source.contains("!fail") {
                return Err(AssetError::Compile {
                    dialect: Dialect::Script(dialect),
                    message: "fake failure".into(),
                });
            }
            let tag = if bare { "bare" } else { "wrapped" };
            Ok(format!("/*{}:{tag}*/{}", dialect.ext(), source.trim()))
        }
    }

    impl StyleCompiler for FakeCompiler {
        fn compile(
            &self,
            dialect: StyleDialect,
            source: &str,
            _include_paths: &[PathBuf],
        ) -> Result<String> {
            if source.contains("!fail") {
                return Err(AssetError::Compile {
                    dialect: Dialect::Style(dialect),
                    message: "fake failure".into(),
                });
            }
            Ok(format!("/*{}*/{}", dialect.ext(), source.trim()))
        }
    }

    /// Strips whitespace; fails on `!nominify`.
    pub struct FakeMinifier;

    impl Minifier for FakeMinifier {
        fn minify(&self, source: &str) -> Result<String> {
            if source.contains("!nominify") {
                return Err(AssetError::Minify("fake failure".into()));
            }
            Ok(source.split_whitespace().collect())
        }
    }

    pub fn toolchain(minify: bool) -> Toolchain {
        let compiler = Arc::new(FakeCompiler);
        Toolchain {
            scripts: compiler.clone(),
            styles: compiler,
            minifier: Arc::new(FakeMinifier),
            minify,
        }
    }
}
