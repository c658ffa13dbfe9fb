//! Configuration section definitions.
//!
//! Each module corresponds to a section in `assetmill.toml`:
//!
//! | Module      | TOML Section    | Purpose                                 |
//! |-------------|-----------------|-----------------------------------------|
//! | `paths`     | `[paths]`       | Search roots and module search roots    |
//! | `build`     | `[build]`       | Output, serving prefix, minify, gzip    |
//! | `compilers` | `[compilers]`   | External dialect compiler commands      |

mod build;
mod compilers;
mod paths;

pub use build::BuildConfig;
pub use compilers::CompilersConfig;
pub use paths::PathsConfig;
