//! Module assembly composition.
//!
//! A folder with an `assembly.json` is served as one synthesized script:
//!
//! ```text
//! //Module assembly: <name>
//!
//! <wrap open>          simpleWrap closure or literal prefix
//! <files>              listed order, dialect parts compiled bare
//! <locale table>       when <base>_en.json exists
//! <template.html>      snippet accessor
//! <templates/*.html>   sorted by file name, plus accessors
//! <wrap close>         closure footer or literal suffix
//! <sub-assemblies>     recursively, each must be simpleWrap
//! ```
//!
//! Every part is preceded by an `Included File` banner. Failures never
//! escape [`AssemblyBuilder::build`]: a missing file or a bad sub-assembly
//! becomes a runtime diagnostic in place, a bad descriptor or override turns
//! the whole assembly into one diagnostic.

mod descriptor;
mod diagnostic;
mod locale;
mod template;

pub use descriptor::{AssemblyDescriptor, SIMPLE_WRAP_CLOSE, SIMPLE_WRAP_OPEN};
pub use diagnostic::runtime_error;
pub use locale::LocaleTable;
pub use template::js_string_literal;

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::content::dialect::script_dialect_of;
use crate::content::toolchain::Toolchain;
use crate::error::{AssetError, Result};
use crate::resolve::{ASSEMBLY_FILE, AssemblyLocation, AssetKind, ContentMeta, PathResolver};
use crate::utils::path::{join_url, normalize_path};
use crate::{debug, log};

/// Default folder of per-language files inside a module.
const LOCALE_DIR: &str = "locales";
/// Default folder of `.html` templates inside a module.
const TEMPLATE_DIR: &str = "templates";
/// Single-snippet template at the module root.
const SNIPPET_FILE: &str = "template.html";
/// Sub-folder of each search root consulted for files missing from the module.
const SHARED_SCRIPT_DIR: &str = "js";

/// Append a banner-labelled part.
fn append_part(out: &mut String, label: &str, body: &str) {
    out.push_str("/*\n * Included File: ");
    out.push_str(label);
    out.push_str("\n */\n\n");
    out.push_str(body);
    out.push_str("\n\n");
}

fn header(name: &str) -> String {
    format!("//Module assembly: {name}\n\n")
}

pub struct AssemblyBuilder<'a> {
    resolver: &'a PathResolver,
    toolchain: &'a Toolchain,
}

impl<'a> AssemblyBuilder<'a> {
    pub fn new(resolver: &'a PathResolver, toolchain: &'a Toolchain) -> Self {
        Self {
            resolver,
            toolchain,
        }
    }

    /// Synthesize the source of the assembly behind `meta`.
    pub fn build(&self, meta: &ContentMeta) -> String {
        let mut stack = Vec::new();
        AssemblyDescriptor::load(&meta.main_file)
            .and_then(|descriptor| self.assemble(meta, &descriptor, &mut stack))
            .unwrap_or_else(|err| {
                log!("assembly"; "{err}");
                let message = format!(
                    "Error building assembly '{}': {err}",
                    meta.main_file.display()
                );
                let mut out = header(&meta.name);
                out.push_str(&runtime_error(&message));
                out
            })
    }

    /// `stack` holds the descriptors currently being assembled, outermost first.
    fn assemble(
        &self,
        meta: &ContentMeta,
        descriptor: &AssemblyDescriptor,
        stack: &mut Vec<PathBuf>,
    ) -> Result<String> {
        let location = meta
            .assembly
            .as_ref()
            .ok_or_else(|| AssetError::AssemblyConfiguration {
                path: meta.main_file.clone(),
                message: "not a module assembly".into(),
            })?;

        let layout = AssemblyLayout::inspect(meta, location, descriptor)?;
        let translations = match &layout.locale {
            Some((dir, base)) => LocaleTable::load(dir, base)?,
            None => None,
        };
        let snippet = match &layout.snippet {
            Some(path) => Some(fs::read_to_string(path).map_err(|e| AssetError::io(path, e))?),
            None => None,
        };
        let templates = match &layout.templates {
            Some(dir) => template::read_templates(dir)?,
            None => Vec::new(),
        };
        let has_translations = translations.is_some();

        debug!("assembly"; "{} ({} files)", meta.name, descriptor.files.len());

        stack.push(normalize_path(&meta.main_file));
        let mut out = header(&meta.name);

        if let Some(open) = descriptor.wrap_open() {
            out.push_str(&open);
        }

        for file in &descriptor.files {
            let body = self.file_part(meta, location, file);
            append_part(&mut out, file, &body);
        }

        if let Some(table) = &translations {
            append_part(&mut out, &table.label(), &table.script());
            append_part(&mut out, locale::BOOTSTRAP_LABEL, locale::LOCALE_BOOTSTRAP);
        }

        if let Some(html) = &snippet {
            append_part(
                &mut out,
                SNIPPET_FILE,
                &template::snippet_script(html, has_translations),
            );
        }

        if !templates.is_empty() {
            for file in &templates {
                append_part(&mut out, &file.file_name, &file.script());
            }
            append_part(
                &mut out,
                "Template helpers",
                &template::template_helpers(has_translations),
            );
        }

        if let Some(close) = descriptor.wrap_close() {
            out.push_str(close);
        }

        for sub in &descriptor.assemblies {
            let body = self.sub_assembly(meta, location, sub, stack);
            append_part(&mut out, sub, &body);
        }

        stack.pop();
        Ok(out)
    }

    /// One listed file, or a diagnostic if it cannot be found or compiled.
    fn file_part(&self, meta: &ContentMeta, location: &AssemblyLocation, file: &str) -> String {
        let local = location.module_dir.join(file);
        let path = if local.is_file() {
            Some(local)
        } else {
            self.resolver
                .find_in_roots(&Path::new(SHARED_SCRIPT_DIR).join(file))
        };

        let Some(path) = path else {
            let err = AssetError::MissingFileInAssembly {
                assembly: meta.name.clone(),
                file: file.to_owned(),
            };
            log!("assembly"; "{err}");
            return runtime_error(&err.to_string());
        };

        self.read_part(&path).unwrap_or_else(|err| {
            log!("assembly"; "{}: {err}", meta.name);
            runtime_error(&format!("{}: {err}", meta.name))
        })
    }

    fn read_part(&self, path: &Path) -> Result<String> {
        let source = fs::read_to_string(path).map_err(|e| AssetError::io(path, e))?;
        match script_dialect_of(path) {
            Some(dialect) => self.toolchain.scripts.compile(dialect, &source, true),
            None => Ok(source),
        }
    }

    /// A nested assembly, or a diagnostic stand-in for it alone.
    fn sub_assembly(
        &self,
        parent: &ContentMeta,
        location: &AssemblyLocation,
        sub: &str,
        stack: &mut Vec<PathBuf>,
    ) -> String {
        let built = self.locate_sub(parent, location, sub).and_then(|meta| {
            let misconfigured = |message: String| AssetError::AssemblyConfiguration {
                path: meta.main_file.clone(),
                message,
            };
            if stack.contains(&normalize_path(&meta.main_file)) {
                return Err(misconfigured(format!("sub-assembly `{sub}` includes itself")));
            }
            let descriptor = AssemblyDescriptor::load(&meta.main_file)?;
            if !descriptor.simple_wrap {
                return Err(misconfigured(format!(
                    "sub-assembly `{sub}` must declare \"simpleWrap\": true"
                )));
            }
            self.assemble(&meta, &descriptor, stack)
        });

        built.unwrap_or_else(|err| {
            log!("assembly"; "{err}");
            runtime_error(&err.to_string())
        })
    }

    /// `<module>/<sub>/assembly.json`, else a script assembly found by the resolver.
    fn locate_sub(
        &self,
        parent: &ContentMeta,
        location: &AssemblyLocation,
        sub: &str,
    ) -> Result<ContentMeta> {
        let sub = sub.trim_matches('/');
        let (sub_dir, name) = sub.rsplit_once('/').unwrap_or(("", sub));

        let module_dir = normalize_path(&location.module_dir.join(sub));
        let descriptor = module_dir.join(ASSEMBLY_FILE);
        if descriptor.is_file() {
            return Ok(ContentMeta {
                main_file: descriptor,
                name: name.to_owned(),
                dir: join_url(&[&parent.dir, &parent.name, sub_dir]),
                assembly: Some(AssemblyLocation {
                    module_dir,
                    root: location.root.clone(),
                }),
            });
        }

        let meta = self
            .resolver
            .resolve_parts(AssetKind::Js, sub_dir, name, "js")?;
        if meta.is_assembled() {
            Ok((*meta).clone())
        } else {
            Err(AssetError::AssemblyConfiguration {
                path: meta.main_file.clone(),
                message: format!("sub-assembly `{sub}` has no {ASSEMBLY_FILE}"),
            })
        }
    }
}

/// Where an assembly's optional parts live, checked before anything is built.
#[derive(Debug, Default)]
struct AssemblyLayout {
    /// Locale directory and file base name.
    locale: Option<(PathBuf, String)>,
    snippet: Option<PathBuf>,
    templates: Option<PathBuf>,
}

impl AssemblyLayout {
    /// Resolve optional parts; every broken override is reported in one error.
    fn inspect(
        meta: &ContentMeta,
        location: &AssemblyLocation,
        descriptor: &AssemblyDescriptor,
    ) -> Result<Self> {
        let module_dir = &location.module_dir;
        let mut problems = Vec::new();

        let templates = match &descriptor.template_path {
            Some(rel) => {
                let dir = module_dir.join(rel);
                if !dir.is_dir() {
                    problems.push(format!("templatePath `{rel}` is not a directory"));
                }
                Some(dir)
            }
            None => Some(module_dir.join(TEMPLATE_DIR)).filter(|d| d.is_dir()),
        };

        let locale_dir = match &descriptor.locale_path {
            Some(rel) => {
                let dir = module_dir.join(rel);
                if !dir.is_dir() {
                    problems.push(format!("localePath `{rel}` is not a directory"));
                }
                Some(dir)
            }
            None => Self::default_locale_dir(meta, location),
        };

        let base = descriptor
            .locale_file_name
            .clone()
            .unwrap_or_else(|| meta.name.clone());
        if descriptor.locale_file_name.is_some() {
            let has_baseline = locale_dir
                .as_deref()
                .is_some_and(|dir| LocaleTable::baseline_path(dir, &base).is_file());
            if !has_baseline {
                problems.push(format!("localeFileName `{base}` has no `{base}_en.json`"));
            }
        }

        if !problems.is_empty() {
            return Err(AssetError::AssemblyConfiguration {
                path: meta.main_file.clone(),
                message: problems.join("; "),
            });
        }

        let snippet = Some(module_dir.join(SNIPPET_FILE)).filter(|p| p.is_file());

        Ok(Self {
            locale: locale_dir.map(|dir| (dir, base)),
            snippet,
            templates,
        })
    }

    /// `<module>/locales`, else the shared `<root>/../locales/<dir>` tree.
    fn default_locale_dir(meta: &ContentMeta, location: &AssemblyLocation) -> Option<PathBuf> {
        let own = location.module_dir.join(LOCALE_DIR);
        if own.is_dir() {
            return Some(own);
        }
        let shared = location.root.parent()?.join(LOCALE_DIR);
        let shared = if meta.dir.is_empty() {
            shared
        } else {
            shared.join(&meta.dir)
        };
        shared.is_dir().then_some(shared)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::testing;
    use tempfile::TempDir;

    struct Fixture {
        dir: TempDir,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                dir: TempDir::new().unwrap(),
            }
        }

        fn write(&self, rel: &str, content: &str) -> &Self {
            let path = self.dir.path().join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
            self
        }

        fn build_in(&self, roots: &[&str], name: &str) -> String {
            let roots = roots.iter().map(|r| self.dir.path().join(r)).collect();
            let resolver = PathResolver::new(roots, vec![]);
            let toolchain = testing::toolchain(false);
            let meta = resolver
                .resolve_parts(AssetKind::Js, "", name, "js")
                .unwrap();
            AssemblyBuilder::new(&resolver, &toolchain).build(&meta)
        }

        fn build(&self, name: &str) -> String {
            self.build_in(&["app"], name)
        }
    }

    #[test]
    fn test_simple_module() {
        let fx = Fixture::new();
        fx.write("app/js/simple/assembly.json", r#"{"files":["main.js"]}"#)
            .write("app/js/simple/main.js", "var m=\"main.js\";");

        assert_eq!(
            fx.build("simple"),
            "//Module assembly: simple\n\n/*\n * Included File: main.js\n */\n\nvar m=\"main.js\";\n\n"
        );
    }

    #[test]
    fn test_simple_wrap() {
        let fx = Fixture::new();
        fx.write(
            "app/js/wrapped/assembly.json",
            r#"{"files":["main.js"],"simpleWrap":true,"prefix":"ignored"}"#,
        )
        .write("app/js/wrapped/main.js", "alert('test');");

        assert_eq!(
            fx.build("wrapped"),
            "//Module assembly: wrapped\n\n(function(window,undefined){\n\n/*\n * Included File: main.js\n */\n\nalert('test');\n\n}(this));"
        );
    }

    #[test]
    fn test_prefix_and_suffix() {
        let fx = Fixture::new();
        fx.write(
            "app/js/complex/assembly.json",
            r#"{"files":["main.js"],"prefix":"(function(window,$,undefined){","suffix":"}(this,jQuery));"}"#,
        )
        .write("app/js/complex/main.js", "alert('test');");

        assert_eq!(
            fx.build("complex"),
            "//Module assembly: complex\n\n(function(window,$,undefined){\n\n/*\n * Included File: main.js\n */\n\nalert('test');\n\n}(this,jQuery));"
        );
    }

    #[test]
    fn test_files_found_through_search_roots() {
        let fx = Fixture::new();
        fx.write(
            "app/js/spread/assembly.json",
            r#"{"files":["main.js","shared.js","vendor.js"]}"#,
        )
        .write("app/js/spread/main.js", "var m;")
        .write("shared/js/shared.js", "var s;")
        .write("vendor/js/vendor.js", "var v;");

        let out = fx.build_in(&["app", "shared", "vendor"], "spread");
        let m = out.find("var m;").unwrap();
        let s = out.find("var s;").unwrap();
        let v = out.find("var v;").unwrap();
        assert!(m < s && s < v);
    }

    #[test]
    fn test_missing_file_is_inline_diagnostic() {
        let fx = Fixture::new();
        fx.write(
            "app/js/partial/assembly.json",
            r#"{"files":["a.js","gone.js","b.js"]}"#,
        )
        .write("app/js/partial/a.js", "var a;")
        .write("app/js/partial/b.js", "var b;");

        let out = fx.build("partial");
        assert!(out.contains("var a;"));
        assert!(out.contains("var b;"));
        assert!(out.contains(
            "/*\n * Included File: gone.js\n */\n\nsetTimeout(function(){ throw new Error(\"assembly `partial` could not include `gone.js`\"); }, 0);"
        ));
    }

    #[test]
    fn test_coffee_parts_compiled_bare() {
        let fx = Fixture::new();
        fx.write("app/js/mixed/assembly.json", r#"{"files":["main.coffee"]}"#)
            .write("app/js/mixed/main.coffee", "alert 'hi'");

        assert!(fx.build("mixed").contains("/*coffee:bare*/alert 'hi'"));
    }

    #[test]
    fn test_locales_from_module_folder() {
        let fx = Fixture::new();
        fx.write("app/js/nav/assembly.json", r#"{"files":["main.js"]}"#)
            .write("app/js/nav/main.js", "var m;")
            .write("app/js/nav/locales/nav_en.json", r#"{"title":"Home"}"#)
            .write("app/js/nav/locales/nav_es.json", r#"{"title":"Inicio"}"#)
            .write("app/js/nav/template.html", "<h1>{title}</h1>");

        let out = fx.build("nav");
        assert!(out.contains(
            "/*\n * Included File: nav_en.json\n */\n\nvar langs = {\"en\":{\"title\":\"Home\"},\"es\":{\"title\":\"Inicio\"}};\n\n"
        ));
        assert!(out.contains("/*\n * Included File: Injected code\n */\n\nvar locale = "));
        assert!(out.contains("var snippetsRaw = \"<h1>{title}</h1>\";"));
        assert!(out.contains("return __localize(snippetsRaw);"));
        assert!(out.find("var langs").unwrap() < out.find("var snippetsRaw").unwrap());
    }

    #[test]
    fn test_locales_from_shared_tree() {
        let fx = Fixture::new();
        fx.write("app/js/admin/nav/assembly.json", r#"{"files":[]}"#)
            .write("locales/admin/nav_en.json", r#"{"title":"Home"}"#);

        let roots = vec![fx.dir.path().join("app")];
        let resolver = PathResolver::new(roots, vec![]);
        let toolchain = testing::toolchain(false);
        let meta = resolver
            .resolve_parts(AssetKind::Js, "admin", "nav", "js")
            .unwrap();
        let out = AssemblyBuilder::new(&resolver, &toolchain).build(&meta);
        assert!(out.contains("var langs = {\"en\":{\"title\":\"Home\"}};"));
    }

    #[test]
    fn test_no_translations_without_english() {
        let fx = Fixture::new();
        fx.write("app/js/nav/assembly.json", r#"{"files":[]}"#)
            .write("app/js/nav/locales/nav_es.json", r#"{"title":"Inicio"}"#)
            .write("app/js/nav/template.html", "<p></p>");

        let out = fx.build("nav");
        assert!(!out.contains("var langs"));
        assert!(out.contains("return snippetsRaw;"));
    }

    #[test]
    fn test_templates_sorted_after_files() {
        let fx = Fixture::new();
        fx.write(
            "app/js/views/assembly.json",
            r#"{"files":["a.js","b.js"],"simpleWrap":true}"#,
        )
        .write("app/js/views/a.js", "var A;")
        .write("app/js/views/b.js", "var B;")
        .write("app/js/views/templates/t2.html", "<i>two</i>")
        .write("app/js/views/templates/t1.html", "<b>one</b>");

        let out = fx.build("views");
        let positions: Vec<_> = ["var A;", "var B;", "<b>one</b>", "<i>two</i>", "function getTemplate", SIMPLE_WRAP_CLOSE]
            .iter()
            .map(|needle| out.find(needle).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_bad_overrides_abort_whole_assembly() {
        let fx = Fixture::new();
        fx.write(
            "app/js/broken/assembly.json",
            r#"{"files":["main.js"],"templatePath":"nope","localePath":"missing","localeFileName":"x"}"#,
        )
        .write("app/js/broken/main.js", "var shouldNotAppear;");

        let out = fx.build("broken");
        assert!(out.starts_with("//Module assembly: broken\n\nsetTimeout("));
        assert!(!out.contains("shouldNotAppear"));
        assert!(out.contains("templatePath `nope`"));
        assert!(out.contains("localePath `missing`"));
        assert!(out.contains("localeFileName `x`"));
    }

    #[test]
    fn test_explicit_overrides() {
        let fx = Fixture::new();
        fx.write(
            "app/js/custom/assembly.json",
            r#"{"templatePath":"views","localePath":"i18n","localeFileName":"shared"}"#,
        )
        .write("app/js/custom/views/card.html", "<div>{title}</div>")
        .write("app/js/custom/i18n/shared_en.json", r#"{"title":"Card"}"#);

        let out = fx.build("custom");
        assert!(out.contains("Included File: shared_en.json"));
        assert!(out.contains("templates[\"card\"] = \"<div>{title}</div>\";"));
        assert!(out.contains("return __localize(t);"));
    }

    #[test]
    fn test_malformed_descriptor() {
        let fx = Fixture::new();
        fx.write("app/js/bad/assembly.json", "{\"files\": [");
        let out = fx.build("bad");
        assert!(out.starts_with("//Module assembly: bad\n\nsetTimeout(function(){ throw new Error(\"Error building assembly"));
        assert!(out.contains("EOF while parsing a list at line 1"));
    }

    #[test]
    fn test_sub_assemblies() {
        let fx = Fixture::new();
        fx.write(
            "app/js/parent/assembly.json",
            r#"{"files":["main.js"],"assemblies":["good","plain","other"]}"#,
        )
        .write("app/js/parent/main.js", "var parent;")
        .write("app/js/parent/good/assembly.json", r#"{"files":["g.js"],"simpleWrap":true}"#)
        .write("app/js/parent/good/g.js", "var good;")
        .write("app/js/parent/plain/assembly.json", r#"{"files":["p.js"]}"#)
        .write("app/js/parent/plain/p.js", "var plainPart;")
        .write("app/js/other/assembly.json", r#"{"files":["o.js"],"simpleWrap":true}"#)
        .write("app/js/other/o.js", "var other;");

        let out = fx.build("parent");
        assert!(out.contains("var parent;"));
        assert!(out.contains(
            "/*\n * Included File: good\n */\n\n//Module assembly: good\n\n(function(window,undefined){"
        ));
        assert!(out.contains("var good;"));
        assert!(!out.contains("var plainPart;"));
        assert!(out.contains("sub-assembly `plain` must declare"));
        assert!(out.contains("//Module assembly: other"));
        assert!(out.contains("var other;"));
    }

    #[test]
    fn test_sub_assembly_cycle() {
        let fx = Fixture::new();
        fx.write(
            "app/js/loop/assembly.json",
            r#"{"files":[],"simpleWrap":true,"assemblies":["loop"]}"#,
        );

        let out = fx.build("loop");
        assert!(out.contains("sub-assembly `loop` includes itself"));
        assert_eq!(out.matches("//Module assembly: loop").count(), 1);
    }

    #[test]
    fn test_sub_assembly_cycle_through_parent_dir() {
        let fx = Fixture::new();
        fx.write(
            "app/js/a/assembly.json",
            r#"{"files":["a.js"],"simpleWrap":true,"assemblies":["../a"]}"#,
        )
        .write("app/js/a/a.js", "var a;");

        let out = fx.build("a");
        assert!(out.contains("sub-assembly `../a` includes itself"));
        assert_eq!(out.matches("//Module assembly: a").count(), 1);
        assert_eq!(out.matches("var a;").count(), 1);
    }

    #[test]
    fn test_deterministic_output() {
        let fx = Fixture::new();
        fx.write("app/js/det/assembly.json", r#"{"files":["a.js"]}"#)
            .write("app/js/det/a.js", "var a;")
            .write("app/js/det/templates/z.html", "z")
            .write("app/js/det/templates/a.html", "a")
            .write("app/js/det/templates/m.html", "m");

        assert_eq!(fx.build("det"), fx.build("det"));
    }
}
