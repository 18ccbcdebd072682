//! Driver for the default mode: compile to IR, then either write it to
//! `-o` or hand it to the interpreter directly via a scoped temp file.

use std::io::{IsTerminal, Write};
use std::path::Path;
use std::process::Command;

use onyoc_compiler::diagnostics::Diagnostics;
use onyoc_core::Colors;

use crate::cli::Cli;
use crate::error::CliError;

pub fn run(cli: &Cli) -> Result<i32, CliError> {
    let source = std::fs::read_to_string(&cli.input)?;
    let expanded = onyoc_compiler::preprocess(&source)?;

    let data = match onyoc_compiler::compile(&expanded) {
        Ok(data) => data,
        Err(onyoc_compiler::Error::Parse(diagnostics))
        | Err(onyoc_compiler::Error::Compile(diagnostics)) => {
            return Ok(report_and_fail(&diagnostics, &cli.input, &source));
        }
        Err(other) => return Err(other.into()),
    };
    let json = onyoc_compiler::to_json(&data).expect("assembled IR always serializes");

    match &cli.output {
        Some(output) => {
            std::fs::write(output, json)?;
            Ok(0)
        }
        None => run_directly(&json, cli),
    }
}

fn report_and_fail(diagnostics: &Diagnostics, path: &Path, source: &str) -> i32 {
    let colors = Colors::new(std::io::stderr().is_terminal());
    eprint!(
        "{}",
        diagnostics.render(&path.display().to_string(), source, colors)
    );
    1
}

/// Writes `json` to a scoped temp file, invokes the interpreter on it,
/// and deletes the temp file on every exit path -- success, interpreter
/// failure, or an I/O error here -- via `NamedTempFile`'s `Drop`.
fn run_directly(json: &str, cli: &Cli) -> Result<i32, CliError> {
    let mut tempfile = tempfile::NamedTempFile::new()?;
    tempfile.write_all(json.as_bytes())?;
    tempfile.flush()?;
    let path = tempfile.path().to_path_buf();

    let interpreter = cli
        .interpreter_path
        .clone()
        .unwrap_or_else(|| std::path::PathBuf::from("onyo-rs"));

    let status = Command::new(&interpreter).arg(&path).args(&cli.args).status();

    // `tempfile` is dropped (and the file deleted) here regardless of
    // whether spawning/waiting on the interpreter succeeded.
    let status = status?;
    Ok(status.code().unwrap_or(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli_with(input: &std::path::Path, output: Option<std::path::PathBuf>) -> Cli {
        Cli {
            input: input.to_path_buf(),
            output,
            interpreter_path: None,
            syntax_highlight: false,
            args: Vec::new(),
        }
    }

    #[test]
    fn writes_ir_json_to_output_path() {
        let mut src = tempfile::NamedTempFile::new().unwrap();
        write!(src, "main() {{ print(1) }}").unwrap();
        let out = tempfile::NamedTempFile::new().unwrap();
        let cli = cli_with(src.path(), Some(out.path().to_path_buf()));

        let code = run(&cli).unwrap();
        assert_eq!(code, 0);
        let written = std::fs::read_to_string(out.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(value["functions"][0]["name"], "main");
    }

    #[test]
    fn diagnostics_produce_exit_code_one_and_no_output_file() {
        let mut src = tempfile::NamedTempFile::new().unwrap();
        write!(src, "foo() {{}}").unwrap();
        let out = tempfile::NamedTempFile::new().unwrap();
        std::fs::remove_file(out.path()).unwrap();
        let cli = cli_with(src.path(), Some(out.path().to_path_buf()));

        let code = run(&cli).unwrap();
        assert_eq!(code, 1);
        assert!(!out.path().exists());
    }
}
