//! Locale tables injected into assemblies.
//!
//! A locale directory holds one `<base>_<code>.json` file per language.
//! Nothing is injected unless the English baseline `<base>_en.json` exists.

use serde_json::Value;
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use crate::error::{AssetError, Result};

/// Runtime code picking the active locale and merging it over English.
pub const LOCALE_BOOTSTRAP: &str = "\
var locale = (window.FS && window.FS.locale) || window.locale || 'en';
locale = typeof(locale) == 'string' ? locale : locale[0].split('-')[0];
var lang = {};
(function(base, active){ var k; for (k in base) { lang[k] = base[k]; } for (k in active) { lang[k] = active[k]; } }(langs['en'], langs[locale] || langs['en']));
function __localize(str){ return String(str).replace(/\\{(\\w+)\\}/g, function(m, key){ return lang.hasOwnProperty(key) ? lang[key] : m; }); }";

/// Label of the bootstrap part.
pub const BOOTSTRAP_LABEL: &str = "Injected code";

/// Every translation of one module, keyed by locale code.
#[derive(Debug, Clone, PartialEq)]
pub struct LocaleTable {
    pub base: String,
    pub langs: BTreeMap<String, Value>,
}

impl LocaleTable {
    pub fn baseline_path(dir: &Path, base: &str) -> PathBuf {
        dir.join(format!("{base}_en.json"))
    }

    /// Load `<base>_*.json` from `dir`, or `None` without an English baseline.
    pub fn load(dir: &Path, base: &str) -> Result<Option<Self>> {
        if !Self::baseline_path(dir, base).is_file() {
            return Ok(None);
        }

        let prefix = format!("{base}_");
        let mut langs = BTreeMap::new();
        for entry in fs::read_dir(dir).map_err(|e| AssetError::io(dir, e))? {
            let path = entry.map_err(|e| AssetError::io(dir, e))?.path();
            let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let Some(code) = file_name
                .strip_prefix(&prefix)
                .and_then(|rest| rest.strip_suffix(".json"))
            else {
                continue;
            };
            if code.is_empty() || !path.is_file() {
                continue;
            }

            let text = fs::read_to_string(&path).map_err(|e| AssetError::io(&path, e))?;
            let value: Value = serde_json::from_str(&text)
                .map_err(|e| AssetError::Json(path.clone(), e))?;
            langs.insert(code.to_owned(), value);
        }

        Ok(Some(Self {
            base: base.to_owned(),
            langs,
        }))
    }

    /// `var langs = {...};`
    pub fn script(&self) -> String {
        let json = serde_json::to_string(&self.langs).unwrap_or_else(|_| "{}".into());
        format!("var langs = {json};")
    }

    /// Banner label of the table part.
    pub fn label(&self) -> String {
        format!("{}_en.json", self.base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_requires_english_baseline() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("nav_es.json"), r#"{"title":"hola"}"#).unwrap();
        assert_eq!(LocaleTable::load(dir.path(), "nav").unwrap(), None);
    }

    #[test]
    fn test_table_sorted_by_code() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("nav_fr.json"), r#"{"title":"salut"}"#).unwrap();
        fs::write(dir.path().join("nav_en.json"), r#"{"title":"hello"}"#).unwrap();
        fs::write(dir.path().join("nav_es.json"), r#"{"title":"hola"}"#).unwrap();
        fs::write(dir.path().join("other_de.json"), r#"{"title":"hallo"}"#).unwrap();

        let table = LocaleTable::load(dir.path(), "nav").unwrap().unwrap();
        assert_eq!(table.label(), "nav_en.json");
        assert_eq!(
            table.script(),
            r#"var langs = {"en":{"title":"hello"},"es":{"title":"hola"},"fr":{"title":"salut"}};"#
        );
    }

    #[test]
    fn test_malformed_locale_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("nav_en.json"), "{oops").unwrap();
        assert!(LocaleTable::load(dir.path(), "nav").is_err());
    }
}
