//! Shared helpers: hashing, paths, external commands, artifact writes.

pub mod exec;
pub mod hash;
pub mod path;
pub mod write;

/// Format count with noun, handling pluralization.
///
/// - `plural_count(0, "file")` -> `"0 files"`
/// - `plural_count(1, "file")` -> `"1 file"`
#[inline]
pub fn plural_count(count: usize, noun: &str) -> String {
    format!("{count} {noun}{}", if count == 1 { "" } else { "s" })
}
