//! Compiler front-end for the onyo programming language.
//!
//! The pipeline runs leaves-first: [`preprocess`] expands `#use`
//! directives, [`parser`] builds a concrete syntax tree from an
//! Earley-backed grammar, [`collect`] assigns stable function/struct ids
//! (Pass 1), [`lower`] resolves identifiers and desugars surface forms
//! into IR (Pass 2), and [`emit`] assembles and serializes the result.
//! [`diagnostics`] renders accumulated errors; [`highlight`] is a
//! separate CST walk that produces syntax-highlighted HTML instead of IR.

pub mod collect;
pub mod cst;
pub mod diagnostics;
pub mod emit;
pub mod error;
pub mod highlight;
pub mod lexer;
pub mod lower;
pub mod parser;
pub mod preprocess;
pub mod typo;

pub use emit::{compile, to_json};
pub use error::{Error, Result};
pub use preprocess::preprocess;
