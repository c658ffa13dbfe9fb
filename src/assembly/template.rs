//! HTML templates flattened into script string literals.

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::error::{AssetError, Result};

/// Encode `text` as a double-quoted script string literal.
///
/// JSON string syntax is valid script syntax except for the raw line and
/// paragraph separators, which are escaped as well.
pub fn js_string_literal(text: &str) -> String {
    serde_json::to_string(text)
        .unwrap_or_default()
        .replace('\u{2028}', "\\u2028")
        .replace('\u{2029}', "\\u2029")
}

fn localized(expr: &str, has_translations: bool) -> String {
    if has_translations {
        format!("__localize({expr})")
    } else {
        expr.to_owned()
    }
}

/// Script exposing the module's `template.html` as `getSnippets()`.
pub fn snippet_script(html: &str, has_translations: bool) -> String {
    format!(
        "var snippetsRaw = {};\n\
         function getSnippetsRaw(){{ return {}; }}\n\
         function getSnippets(){{\n\
         var snip = document.createElement('div');\n\
         snip.innerHTML = getSnippetsRaw();\n\
         return snip;\n\
         }}",
        js_string_literal(html),
        localized("snippetsRaw", has_translations),
    )
}

/// One `.html` file of a template directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateFile {
    /// File name without `.html`; the lookup key.
    pub name: String,
    pub file_name: String,
    pub html: String,
}

impl TemplateFile {
    /// Registration statement for this template.
    pub fn script(&self) -> String {
        format!(
            "var templates = templates || {{}};\ntemplates[{}] = {};",
            js_string_literal(&self.name),
            js_string_literal(&self.html)
        )
    }
}

/// Read every `.html` file of `dir`, sorted by file name.
pub fn read_templates(dir: &Path) -> Result<Vec<TemplateFile>> {
    let entries = fs::read_dir(dir).map_err(|e| AssetError::io(dir, e))?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && p.extension().is_some_and(|e| e == "html"))
        .collect();
    paths.sort();

    paths
        .into_iter()
        .map(|path| {
            let html = fs::read_to_string(&path).map_err(|e| AssetError::io(&path, e))?;
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let name = file_name.trim_end_matches(".html").to_owned();
            Ok(TemplateFile {
                name,
                file_name,
                html,
            })
        })
        .collect()
}

/// Accessors over the `templates` table.
pub fn template_helpers(has_translations: bool) -> String {
    format!(
        "function getTemplate(name){{\n\
         var t = templates[name];\n\
         if (t === undefined) {{ throw new Error('Unknown template: ' + name); }}\n\
         return {};\n\
         }}\n\
         function renderTemplate(name){{\n\
         var el = document.createElement('div');\n\
         el.innerHTML = getTemplate(name);\n\
         return el;\n\
         }}",
        localized("t", has_translations),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_js_string_literal() {
        assert_eq!(js_string_literal("a\"b\n"), r#""a\"b\n""#);
        assert_eq!(js_string_literal("x\u{2028}y"), r#""x\u2028y""#);
    }

    #[test]
    fn test_snippet_script() {
        let plain = snippet_script("<p>hi</p>", false);
        assert!(plain.starts_with("var snippetsRaw = \"<p>hi</p>\";"));
        assert!(plain.contains("return snippetsRaw;"));

        let localized = snippet_script("<p>{title}</p>", true);
        assert!(localized.contains("return __localize(snippetsRaw);"));
    }

    #[test]
    fn test_read_templates_sorted() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("t2.html"), "two").unwrap();
        fs::write(dir.path().join("t1.html"), "one").unwrap();
        fs::write(dir.path().join("notes.txt"), "skip").unwrap();

        let templates = read_templates(dir.path()).unwrap();
        let names: Vec<_> = templates.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["t1", "t2"]);
        assert_eq!(templates[0].file_name, "t1.html");
        assert_eq!(
            templates[0].script(),
            "var templates = templates || {};\ntemplates[\"t1\"] = \"one\";"
        );
    }

    #[test]
    fn test_helpers_localize_only_with_translations() {
        assert!(template_helpers(true).contains("return __localize(t);"));
        assert!(template_helpers(false).contains("return t;"));
    }
}
