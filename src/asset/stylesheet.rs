//! Stylesheet preprocessing: `url(...)` references to public image paths.

use regex::{Captures, Regex};
use std::sync::LazyLock;

use crate::error::Result;
use crate::log;

static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"url\([^)]+\)").expect("valid url() regex"));

/// Image lookup offered by the surrounding context.
pub trait ImageResolver {
    /// Public path of the image at `route`, failing if it cannot be resolved.
    fn resolve_image(&self, route: &str) -> Result<String>;
}

/// Route under the `img` folder addressed by a stylesheet reference.
///
/// References are usually written relative to the stylesheet
/// (`../img/arrow.png`) or to the site root (`/img/arrow.png`).
fn image_route(reference: &str) -> &str {
    let mut route = reference;
    loop {
        let next = route
            .strip_prefix("../")
            .or_else(|| route.strip_prefix("./"))
            .or_else(|| route.strip_prefix('/'));
        match next {
            Some(rest) => route = rest,
            None => break,
        }
    }
    route.strip_prefix("img/").unwrap_or(route)
}

/// Rewrite every `url(...)` in `css` to the resolved public image path.
///
/// `data:` URLs are left alone. Unresolvable references keep their
/// unquoted path and are logged; `origin` names the stylesheet in the log.
pub fn rewrite_urls(css: &str, images: &dyn ImageResolver, origin: &str) -> String {
    URL_RE
        .replace_all(css, |caps: &Captures| {
            let whole = &caps[0];
            let stripped: String = whole
                .replace("url(", "")
                .chars()
                .filter(|c| !matches!(c, '\'' | '"' | ')'))
                .collect();
            let stripped = stripped.trim();

            if stripped.starts_with("data:") {
                return whole.to_owned();
            }

            match images.resolve_image(image_route(stripped)) {
                Ok(path) if !path.is_empty() => {
                    if !path.starts_with("http") && path.starts_with("img") {
                        format!("url('/{path}')")
                    } else {
                        format!("url('{path}')")
                    }
                }
                _ => {
                    log!("warn"; "can't resolve image path '{stripped}' in '{origin}'");
                    format!("url('{stripped}')")
                }
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AssetError;

    struct Images;

    impl ImageResolver for Images {
        fn resolve_image(&self, route: &str) -> Result<String> {
            match route {
                "arrow.png" => Ok("CDN/img/arrow-abc.png".into()),
                "icons/x.svg" => Ok("img/icons/x.svg".into()),
                "http://cdn.com/a.png" => Ok(route.into()),
                _ => Err(AssetError::Unresolved(route.into())),
            }
        }
    }

    #[test]
    fn test_image_route() {
        assert_eq!(image_route("../img/arrow.png"), "arrow.png");
        assert_eq!(image_route("/img/arrow.png"), "arrow.png");
        assert_eq!(image_route("./../../arrow.png"), "arrow.png");
        assert_eq!(image_route("arrow.png"), "arrow.png");
    }

    #[test]
    fn test_rewrite_resolved() {
        let css = "a{background:url(\"../img/arrow.png\")} b{background:url( '/img/icons/x.svg' )}";
        assert_eq!(
            rewrite_urls(css, &Images, "app.css"),
            "a{background:url('CDN/img/arrow-abc.png')} b{background:url('/img/icons/x.svg')}"
        );
    }

    #[test]
    fn test_rewrite_keeps_data_and_remote() {
        let css = "a{b:url(data:image/png;base64,AAAA)} c{d:url(http://cdn.com/a.png)}";
        assert_eq!(
            rewrite_urls(css, &Images, "app.css"),
            "a{b:url(data:image/png;base64,AAAA)} c{d:url('http://cdn.com/a.png')}"
        );
    }

    #[test]
    fn test_rewrite_unresolved() {
        let css = "a{b:url('missingImage.png')}";
        assert_eq!(
            rewrite_urls(css, &Images, "app.css"),
            "a{b:url('missingImage.png')}"
        );
    }
}
