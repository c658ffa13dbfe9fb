//! assetmill - an asset pipeline for multi-root web projects.
//!
//! Logical routes such as `app.js`, `theme.less` or `icons/arrow.png` are
//! resolved across an ordered list of search roots, composed from module
//! assemblies when needed, fingerprinted for cache busting and recorded in
//! a server manifest plus a client-side lookup script.
//!
//! ```ignore
//! let pipeline = Pipeline::from_config(config);
//! let context = pipeline.context(BuildMode::PRODUCTION);
//! let tag = context.js("app.js");   // <script src='/js/app-<fp>.js'></script>
//! let report = pipeline.precompile(None)?;
//! ```

pub mod assembly;
pub mod asset;
pub mod cli;
pub mod config;
pub mod content;
pub mod context;
pub mod error;
pub mod logger;
pub mod manifest;
pub mod pipeline;
pub mod resolve;
pub mod utils;

pub use config::AssetConfig;
pub use context::{AssetContext, StyleRef};
pub use error::{AssetError, Result};
pub use pipeline::{BuildMode, BuildReport, Pipeline};
