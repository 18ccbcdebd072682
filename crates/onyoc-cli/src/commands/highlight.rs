//! Driver for `--syntax-highlight` mode: not a standalone HTML document,
//! just the source re-emitted with semantic `<span>` wrappers -- the
//! host page supplies the surrounding `<html>`/CSS.

use crate::cli::Cli;
use crate::error::CliError;

pub fn run(cli: &Cli) -> Result<i32, CliError> {
    let source = std::fs::read_to_string(&cli.input)?;
    let html = onyoc_compiler::highlight::highlight(&source);

    match &cli.output {
        Some(output) => std::fs::write(output, html)?,
        None => print!("{html}"),
    }
    Ok(0)
}
