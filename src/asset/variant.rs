//! Per-kind rules of the asset descriptor model.
//!
//! Each variant is a small rule set: which folder it lives in, the public
//! extension it is served under, whether it has a `_raw` twin and whether
//! its artifacts are compressed.

use crate::content::dialect::{ScriptDialect, StyleDialect};
use crate::resolve::AssetKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetVariant {
    Script,
    TranspiledScript(ScriptDialect),
    Stylesheet(Option<StyleDialect>),
    Image,
    Static,
}

impl AssetVariant {
    /// Pick the variant for a route path and return the path of the source
    /// file it addresses.
    ///
    /// `theme.less.css` and `theme.less` both address `theme.less`; the same
    /// holds for `app.coffee.js`. Any unknown extension is an image.
    pub fn detect(path: &str, ext: &str) -> (Self, String) {
        match ext {
            "css" | "less" | "styl" => {
                for dialect in [StyleDialect::Less, StyleDialect::Stylus] {
                    let source_ext = format!(".{}", dialect.ext());
                    let compiled = format!("{source_ext}.css");
                    if ext == dialect.ext() {
                        return (Self::Stylesheet(Some(dialect)), path.to_owned());
                    }
                    if let Some(stem) = path.strip_suffix(&compiled) {
                        return (Self::Stylesheet(Some(dialect)), format!("{stem}{source_ext}"));
                    }
                }
                (Self::Stylesheet(None), path.to_owned())
            }
            "js" | "coffee" => {
                let dialect = ScriptDialect::Coffee;
                if ext == dialect.ext() {
                    return (Self::TranspiledScript(dialect), path.to_owned());
                }
                match path.strip_suffix(".coffee.js") {
                    Some(stem) => (Self::TranspiledScript(dialect), format!("{stem}.coffee")),
                    None => (Self::Script, path.to_owned()),
                }
            }
            "html" => (Self::Static, path.to_owned()),
            _ => (Self::Image, path.to_owned()),
        }
    }

    pub const fn kind(self) -> AssetKind {
        match self {
            Self::Script | Self::TranspiledScript(_) => AssetKind::Js,
            Self::Stylesheet(_) => AssetKind::Css,
            Self::Image => AssetKind::Img,
            Self::Static => AssetKind::Html,
        }
    }

    pub const fn is_script(self) -> bool {
        matches!(self, Self::Script | Self::TranspiledScript(_))
    }

    /// Extension the artifact is served under, given the source extension.
    pub fn public_ext(self, source_ext: &str) -> String {
        match self {
            Self::TranspiledScript(d) => format!("{}.js", d.ext()),
            Self::Stylesheet(Some(d)) => format!("{}.css", d.ext()),
            _ => source_ext.to_owned(),
        }
    }

    /// Suffix of the unminified twin (`_raw.js`, `.coffee_raw.js`), scripts only.
    pub fn raw_suffix(self, source_ext: &str) -> Option<String> {
        match self {
            Self::Script => Some(format!("_raw.{source_ext}")),
            Self::TranspiledScript(d) => Some(format!(".{}_raw.js", d.ext())),
            _ => None,
        }
    }

    /// Images are already compressed.
    pub const fn compresses(self) -> bool {
        !matches!(self, Self::Image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect() {
        assert_eq!(AssetVariant::detect("app.js", "js"), (AssetVariant::Script, "app.js".into()));
        assert_eq!(
            AssetVariant::detect("app.coffee.js", "js"),
            (AssetVariant::TranspiledScript(ScriptDialect::Coffee), "app.coffee".into())
        );
        assert_eq!(
            AssetVariant::detect("theme.less.css", "css"),
            (AssetVariant::Stylesheet(Some(StyleDialect::Less)), "theme.less".into())
        );
        assert_eq!(
            AssetVariant::detect("theme.styl", "styl"),
            (AssetVariant::Stylesheet(Some(StyleDialect::Stylus)), "theme.styl".into())
        );
        assert_eq!(
            AssetVariant::detect("app.css", "css"),
            (AssetVariant::Stylesheet(None), "app.css".into())
        );
        assert_eq!(AssetVariant::detect("t.html", "html").0, AssetVariant::Static);
        assert_eq!(AssetVariant::detect("font.woff2", "woff2").0, AssetVariant::Image);
    }

    #[test]
    fn test_extensions() {
        let coffee = AssetVariant::TranspiledScript(ScriptDialect::Coffee);
        assert_eq!(coffee.public_ext("coffee"), "coffee.js");
        assert_eq!(coffee.raw_suffix("coffee").as_deref(), Some(".coffee_raw.js"));
        assert_eq!(AssetVariant::Script.raw_suffix("js").as_deref(), Some("_raw.js"));
        assert_eq!(
            AssetVariant::Stylesheet(Some(StyleDialect::Stylus)).public_ext("styl"),
            "styl.css"
        );
        assert_eq!(AssetVariant::Image.public_ext("png"), "png");
        assert_eq!(AssetVariant::Image.raw_suffix("png"), None);
        assert!(!AssetVariant::Image.compresses());
        assert!(AssetVariant::Static.compresses());
    }
}
