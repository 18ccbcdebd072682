//! Crate-level error type.

use crate::diagnostics::Diagnostics;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("could not lex source at line {line}, column {column}")]
    Lex { line: u32, column: u32 },

    #[error("parsing failed")]
    Parse(Diagnostics),

    #[error("compilation produced diagnostics")]
    Compile(Diagnostics),
}

impl From<crate::lexer::LexError> for Error {
    fn from(e: crate::lexer::LexError) -> Self {
        Error::Lex {
            line: e.line,
            column: e.column,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
