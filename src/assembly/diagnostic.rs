//! Stand-ins for parts that could not be built.
//!
//! The statement throws asynchronously so the failure shows up in the
//! browser console without stopping the rest of the bundle.

use super::template::js_string_literal;

pub fn runtime_error(message: &str) -> String {
    format!(
        "setTimeout(function(){{ throw new Error({}); }}, 0);",
        js_string_literal(message)
    )
}
