//! Core data structures shared by the onyo compiler front-end.
//!
//! This crate has no knowledge of onyo source syntax; it only defines the
//! identifier table, the intermediate representation, and terminal color
//! handling that both the compiler and the CLI depend on.

pub mod colors;
pub mod interner;
pub mod ir;

pub use colors::Colors;
pub use interner::{Interner, Symbol};
pub use ir::{
    BinaryOperator, Data, Exec, Expr, Function, IdentMap, Literal, NaryOperator, Prototype,
    Reference, ReservedIdents, TernaryOperator, UnaryOperator,
};
