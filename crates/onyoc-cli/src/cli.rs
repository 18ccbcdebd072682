//! The `onyoc` command line surface.
//!
//! A single flat flag set (no subcommands): the pipeline itself branches
//! on `--syntax-highlight` and on whether `-o` was given, not on a
//! subcommand name.

use std::path::PathBuf;

use clap::Parser;

/// Text-based compiler front-end for the onyo programming language.
#[derive(Parser, Debug)]
#[command(name = "onyoc", bin_name = "onyoc")]
#[command(about = "Text-based compiler front-end for the onyo programming language")]
#[command(after_help = "Homepage: <https://github.com/aspizu/onyo>")]
pub struct Cli {
    /// Source file to compile.
    #[arg(short = 'i', long = "input", value_name = "PATH")]
    pub input: PathBuf,

    /// Output JSON (or, with --syntax-highlight, HTML) file. Leave empty
    /// to run the interpreter directly (ignored with --syntax-highlight,
    /// which then writes to stdout).
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Path to the interpreter executable. Defaults to `onyo-rs` on PATH.
    #[arg(short = 'p', long = "interpreter-path", value_name = "PATH")]
    pub interpreter_path: Option<PathBuf>,

    /// Emit syntax-highlighted HTML instead of compiling to IR.
    #[arg(long = "syntax-highlight")]
    pub syntax_highlight: bool,

    /// Arguments forwarded to the interpreter. Ignored when `-o` is given.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}
