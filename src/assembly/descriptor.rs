//! `assembly.json` model.

use serde::Deserialize;
use std::{borrow::Cow, fs, path::Path};

use crate::error::{AssetError, Result};

/// Closure header emitted for `simpleWrap` assemblies.
pub const SIMPLE_WRAP_OPEN: &str = "(function(window,undefined){\n\n";
/// Closure footer matching [`SIMPLE_WRAP_OPEN`].
pub const SIMPLE_WRAP_CLOSE: &str = "}(this));";

/// Parsed module assembly descriptor.
///
/// ```json
/// {
///   "files": ["helpers.js", "main.coffee"],
///   "assemblies": ["widgets"],
///   "simpleWrap": true,
///   "templatePath": "views",
///   "localePath": "i18n",
///   "localeFileName": "shared"
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssemblyDescriptor {
    pub files: Vec<String>,
    pub assemblies: Vec<String>,
    pub prefix: Option<String>,
    pub suffix: Option<String>,
    pub simple_wrap: bool,
    pub template_path: Option<String>,
    pub locale_path: Option<String>,
    pub locale_file_name: Option<String>,
}

impl AssemblyDescriptor {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| AssetError::io(path, e))?;
        Self::parse(&text, path)
    }

    pub fn parse(text: &str, path: &Path) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| AssetError::Json(path.to_path_buf(), e))
    }

    /// Text opening the assembly body. `simpleWrap` takes precedence over `prefix`.
    pub fn wrap_open(&self) -> Option<Cow<'_, str>> {
        if self.simple_wrap {
            Some(Cow::Borrowed(SIMPLE_WRAP_OPEN))
        } else {
            self.prefix
                .as_deref()
                .filter(|p| !p.is_empty())
                .map(|p| Cow::Owned(format!("{p}\n\n")))
        }
    }

    /// Text closing the assembly body, mirroring [`Self::wrap_open`].
    pub fn wrap_close(&self) -> Option<&str> {
        if self.simple_wrap {
            Some(SIMPLE_WRAP_CLOSE)
        } else {
            self.suffix.as_deref().filter(|s| !s.is_empty())
        }
    }
}
