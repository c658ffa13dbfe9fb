//! `[compilers]` section configuration.
//!
//! Each dialect compiler is an external command that reads source on stdin
//! and prints the compiled result on stdout.
//!
//! # Example
//!
//! ```toml
//! [compilers]
//! less = ["lessc", "-"]
//! stylus = ["stylus", "--print"]
//! coffee = ["coffee", "--stdio", "--print"]
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilersConfig {
    pub less: Vec<String>,
    pub stylus: Vec<String>,
    pub coffee: Vec<String>,
}

impl Default for CompilersConfig {
    fn default() -> Self {
        fn cmd(parts: &[&str]) -> Vec<String> {
            parts.iter().map(|s| (*s).to_owned()).collect()
        }
        Self {
            less: cmd(&["lessc", "-"]),
            stylus: cmd(&["stylus", "--print"]),
            coffee: cmd(&["coffee", "--stdio", "--print"]),
        }
    }
}

impl CompilersConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        let commands = [
            (FieldPath::new("compilers.less"), &self.less),
            (FieldPath::new("compilers.stylus"), &self.stylus),
            (FieldPath::new("compilers.coffee"), &self.coffee),
        ];
        for (field, command) in commands {
            if command.first().is_none_or(|program| program.trim().is_empty()) {
                diag.error_with_hint(
                    field,
                    "compiler command is empty",
                    "remove the key to use the default command",
                );
            }
        }
    }
}
