//! Manifest entry shapes.

use serde::{Deserialize, Serialize};

use crate::resolve::AssetKind;

/// One record of `manifest.json`, keyed by requested route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerEntry {
    pub requested: String,
    #[serde(rename = "type")]
    pub kind: AssetKind,
    /// Rendered markup (or bare path).
    pub output: String,
    pub relative_path: String,
    pub fingerprint: Option<String>,
    /// Markup of the unminified twin, scripts only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_raw: Option<String>,
}

/// One record of the client-side lookup table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientEntry {
    pub name: String,
    pub path: String,
}
