//! CLI-level error type: CLI-specific failures, plus transparent
//! passthrough of compiler errors not already turned into a diagnostic
//! report.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{}: No such file or directory", .0.display())]
    NoSuchPath(PathBuf),

    #[error("{}: Is a directory", .0.display())]
    IsADirectory(PathBuf),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Compiler(#[from] onyoc_compiler::Error),
}
