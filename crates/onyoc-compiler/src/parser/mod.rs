//! Parsing: lex, verify grammaticality with the Earley recognizer, then
//! build the concrete syntax tree.

pub mod build;
pub mod earley;
pub mod grammar;

use crate::cst::Decl;
use crate::diagnostics::{Diagnostic, Diagnostics, Range};
use crate::error::{Error, Result};
use crate::lexer::{lex, Token};

/// Parse a full onyo program (`(func | structdef)*`).
pub fn parse(source: &str) -> Result<Vec<Decl>> {
    let tokens = lex(source)?;
    verify(&tokens, grammar::NonTerm::Start)?;
    let mut builder = build::Builder::new(&tokens);
    builder
        .parse_program()
        .map_err(|e| Error::Parse(build_error_to_diagnostics(e, &tokens)))
}

fn verify(tokens: &[Token], start: grammar::NonTerm) -> Result<()> {
    let rules = grammar::rules();
    match earley::recognize(tokens, &rules, start) {
        Ok(()) => Ok(()),
        Err(failure) => {
            let mut diagnostics = Diagnostics::new();
            let range = tokens.get(failure.position).map(Range::from_token);
            let expected: Vec<&str> = failure.expected.iter().map(|k| k.label()).collect();
            let message = if expected.is_empty() {
                "unexpected end of input".to_string()
            } else {
                format!("expected one of {}", expected.join(", "))
            };
            let mut diagnostic = Diagnostic::new(message);
            if let Some(range) = range {
                diagnostic = diagnostic.at(range);
            }
            diagnostics.push(diagnostic);
            Err(Error::Parse(diagnostics))
        }
    }
}

fn build_error_to_diagnostics(e: build::BuildError, tokens: &[Token]) -> Diagnostics {
    let mut diagnostics = Diagnostics::new();
    let range = tokens.get(e.position).map(Range::from_token);
    let mut diagnostic = Diagnostic::new(format!("expected {}", e.expected));
    if let Some(range) = range {
        diagnostic = diagnostic.at(range);
    }
    diagnostics.push(diagnostic);
    diagnostics
}
