//! Logical route parsing: `dir/name.ext?query#fragment`.

/// A logical asset reference split into its parts.
///
/// The fragment is split off before the query, so `font.eot?#iefix` keeps
/// `?` as its query and `#iefix` as its fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRoute {
    /// Route exactly as written by the caller.
    pub original: String,
    /// Route without query, fragment and leading slash.
    pub requested: String,
    /// Directory part without surrounding slashes.
    pub dir: String,
    pub name: String,
    pub ext: String,
    /// `?...` including the marker, or empty.
    pub query: String,
    /// `#...` including the marker, or empty.
    pub fragment: String,
    /// Remote route that never touches the filesystem.
    pub passthrough: bool,
}

/// Whether a route points to another origin.
pub fn is_remote(route: &str) -> bool {
    route.starts_with("http://") || route.starts_with("https://") || route.starts_with("//")
}

/// Split `route` into its path and trailing `?query` / `#fragment`.
pub fn split_suffixes(route: &str) -> (&str, &str, &str) {
    let (rest, fragment) = match route.find('#') {
        Some(i) => route.split_at(i),
        None => (route, ""),
    };
    let (path, query) = match rest.find('?') {
        Some(i) => rest.split_at(i),
        None => (rest, ""),
    };
    (path, query, fragment)
}

/// Extension of the last path segment, ignoring query and fragment.
pub fn extension_of(route: &str) -> &str {
    let (path, _, _) = split_suffixes(route);
    let file = path.rsplit('/').next().unwrap_or(path);
    file.rsplit_once('.').map_or("", |(_, ext)| ext)
}

impl AssetRoute {
    /// Parse `original`, addressing the file at `path` (the path part of
    /// `original`, possibly normalized to a dialect source name).
    pub fn parse(original: &str, path: &str) -> Self {
        let (_, query, fragment) = split_suffixes(original);
        let passthrough = is_remote(original);
        let requested = path.trim_start_matches('/').to_owned();

        let (dir, file) = requested.rsplit_once('/').unwrap_or(("", &requested));
        let (name, ext) = file.rsplit_once('.').unwrap_or((file, ""));

        Self {
            original: original.to_owned(),
            dir: dir.trim_matches('/').to_owned(),
            name: name.to_owned(),
            ext: ext.to_owned(),
            query: query.to_owned(),
            fragment: fragment.to_owned(),
            passthrough,
            requested,
        }
    }

    /// Same route, marked as passthrough (rendered verbatim).
    pub fn into_passthrough(mut self) -> Self {
        self.passthrough = true;
        self
    }
}
