//! Request-time lookups against a persisted `manifest.json`.

use std::{collections::BTreeMap, fs, path::Path};

use super::ServerEntry;
use crate::asset::{AssetVariant, extension_of, split_suffixes};
use crate::error::{AssetError, Result};

#[derive(Debug, Clone, Default)]
pub struct ServerManifest {
    entries: BTreeMap<String, ServerEntry>,
}

impl ServerManifest {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| AssetError::io(path, e))?;
        let entries = serde_json::from_str(&text).map_err(|e| AssetError::Json(path.to_path_buf(), e))?;
        Ok(Self { entries })
    }

    /// Entry for a route written the way templates write it
    /// (`/app.js`, `theme.less.css`, `logo.png?v=2`).
    pub fn lookup(&self, route: &str) -> Option<&ServerEntry> {
        let (path, _, _) = split_suffixes(route);
        let (_, source) = AssetVariant::detect(path, extension_of(route));
        self.entries.get(source.trim_start_matches('/'))
    }

    /// Rendered markup for `route`, or the route itself when it was not built.
    pub fn render(&self, route: &str) -> String {
        self.lookup(route)
            .map_or_else(|| route.to_owned(), |entry| entry.output.clone())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const MANIFEST: &str = r#"{
  "app.js": {
    "requested": "app.js",
    "type": "js",
    "output": "<script src='/js/app-fp.js'></script>",
    "relativePath": "js/app-fp.js",
    "fingerprint": "fp",
    "outputRaw": "<script src='/js/app-fp_raw.js'></script>"
  },
  "theme.less": {
    "requested": "theme.less",
    "type": "css",
    "output": "<link href='/css/theme-fp.less.css' rel='stylesheet' media='screen'>",
    "relativePath": "css/theme-fp.less.css",
    "fingerprint": "fp"
  }
}"#;

    #[test]
    fn test_load_and_lookup() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("manifest.json");
        fs::write(&path, MANIFEST).unwrap();

        let manifest = ServerManifest::load(&path).unwrap();
        assert_eq!(manifest.len(), 2);
        assert_eq!(manifest.lookup("/app.js").unwrap().fingerprint.as_deref(), Some("fp"));
        assert_eq!(manifest.lookup("theme.less.css").unwrap().requested, "theme.less");
        assert_eq!(manifest.render("missing.js"), "missing.js");
        assert_eq!(manifest.render("app.js?x=1"), "<script src='/js/app-fp.js'></script>");
    }

    #[test]
    fn test_load_invalid() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("manifest.json");
        fs::write(&path, "[1,2").unwrap();
        assert!(matches!(ServerManifest::load(&path), Err(AssetError::Json(..))));
        assert!(matches!(
            ServerManifest::load(&dir.path().join("none.json")),
            Err(AssetError::Io(..))
        ));
    }
}
