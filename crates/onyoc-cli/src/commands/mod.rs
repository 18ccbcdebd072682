//! Top-level dispatch: validate the `-i`/`-o` paths the way the original
//! argparse `type=` validators did, then hand off to the highlight driver
//! or the compile driver.

pub mod compile;
pub mod highlight;

use std::path::Path;

use crate::cli::Cli;
use crate::error::CliError;

pub fn run(cli: &Cli) -> Result<i32, CliError> {
    validate_input(&cli.input)?;
    if let Some(output) = &cli.output {
        validate_output(output)?;
    }

    if cli.syntax_highlight {
        highlight::run(cli)
    } else {
        compile::run(cli)
    }
}

fn validate_input(path: &Path) -> Result<(), CliError> {
    if !path.exists() {
        return Err(CliError::NoSuchPath(path.to_path_buf()));
    }
    if path.is_dir() {
        return Err(CliError::IsADirectory(path.to_path_buf()));
    }
    Ok(())
}

fn validate_output(path: &Path) -> Result<(), CliError> {
    if path.is_dir() {
        return Err(CliError::IsADirectory(path.to_path_buf()));
    }
    Ok(())
}
