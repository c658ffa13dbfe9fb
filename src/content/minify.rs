//! Script minification with oxc.

use oxc::allocator::Allocator;
use oxc::codegen::{Codegen, CodegenOptions, CommentOptions};
use oxc::mangler::MangleOptions;
use oxc::minifier::{CompressOptions, Minifier as OxcCompressor, MinifierOptions};
use oxc::parser::Parser;
use oxc::span::SourceType;

use super::toolchain::Minifier;
use crate::error::{AssetError, Result};

/// Minifier backed by the oxc parser, compressor and mangler.
///
/// Sources are parsed as classic scripts: assemblies and plain bundles
/// communicate through top-level globals, so top-level names are neither
/// mangled nor dropped.
#[derive(Debug, Default, Clone, Copy)]
pub struct OxcMinifier;

impl Minifier for OxcMinifier {
    fn minify(&self, source: &str) -> Result<String> {
        let allocator = Allocator::default();
        let ret = Parser::new(&allocator, source, SourceType::cjs()).parse();
        if !ret.errors.is_empty() {
            let message = ret
                .errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(AssetError::Minify(message));
        }
        if ret.panicked {
            return Err(AssetError::Minify("parser aborted".into()));
        }

        let mut program = ret.program;
        let options = MinifierOptions {
            mangle: Some(MangleOptions::default()),
            compress: Some(CompressOptions::default()),
        };
        let ret = OxcCompressor::new(options).minify(&allocator, &mut program);
        let code = Codegen::new()
            .with_options(CodegenOptions {
                minify: true,
                comments: CommentOptions::disabled(),
                ..CodegenOptions::default()
            })
            .with_scoping(ret.scoping)
            .build(&program)
            .code;
        Ok(code)
    }
}
