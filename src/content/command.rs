//! Dialect compilers run as external filter commands.

use std::path::PathBuf;

use super::dialect::{Dialect, ScriptDialect, StyleDialect};
use super::toolchain::{ScriptCompiler, StyleCompiler};
use crate::config::section::CompilersConfig;
use crate::error::{AssetError, Result};
use crate::utils::exec::Cmd;

/// Pipes source through the commands configured in `[compilers]`.
#[derive(Debug, Clone)]
pub struct CommandCompiler {
    commands: CompilersConfig,
}

impl CommandCompiler {
    pub fn new(commands: CompilersConfig) -> Self {
        Self { commands }
    }

    fn run(dialect: Dialect, cmd: Cmd, source: &str) -> Result<String> {
        let output = cmd.stdin(source).run().map_err(|e| AssetError::Compile {
            dialect,
            message: format!("{e:#}"),
        })?;
        String::from_utf8(output.stdout).map_err(|_| AssetError::Compile {
            dialect,
            message: "compiler produced invalid UTF-8".into(),
        })
    }

    /// Command line for a stylesheet dialect, include paths appended.
    fn style_command(&self, dialect: StyleDialect, include_paths: &[PathBuf]) -> Cmd {
        match dialect {
            StyleDialect::Less => {
                let joined = std::env::join_paths(include_paths)
                    .map(|p| p.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let cmd = Cmd::from_slice(&self.commands.less);
                if joined.is_empty() {
                    cmd
                } else {
                    cmd.arg(format!("--include-path={joined}"))
                }
            }
            StyleDialect::Stylus => include_paths
                .iter()
                .fold(Cmd::from_slice(&self.commands.stylus), |cmd, path| {
                    cmd.arg("--include").arg(path)
                }),
        }
    }
}

impl ScriptCompiler for CommandCompiler {
    fn compile(&self, dialect: ScriptDialect, source: &str, bare: bool) -> Result<String> {
        let cmd = match dialect {
            ScriptDialect::Coffee => Cmd::from_slice(&self.commands.coffee),
        };
        let cmd = if bare { cmd.arg("--bare") } else { cmd };
        Self::run(Dialect::Script(dialect), cmd, source)
    }
}

impl StyleCompiler for CommandCompiler {
    fn compile(
        &self,
        dialect: StyleDialect,
        source: &str,
        include_paths: &[PathBuf],
    ) -> Result<String> {
        let cmd = self.style_command(dialect, include_paths);
        Self::run(Dialect::Style(dialect), cmd, source)
    }
}
