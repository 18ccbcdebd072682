//! The onyo intermediate representation.
//!
//! These types are the contract between onyoc and the external onyo
//! interpreter: every field name and tagging convention here is load
//! bearing for the JSON the interpreter reads. Internally tagged variants
//! (`Exec`, `Expr`) serialize as `{"type": "VariantName", ...fields}`;
//! externally tagged variants (`Literal`, `Reference`) serialize as
//! `{"VariantName": payload}`, with unit variants serializing as a bare
//! string. Operator enums have no payload and always serialize as their
//! bare variant name.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// A fully assembled compilation unit, ready to hand to the interpreter.
#[derive(Debug, Clone, Serialize)]
pub struct Data {
    pub functions: Vec<Function>,
    pub prototypes: Vec<Prototype>,
    pub ident_map: IdentMap,
    pub reserved_idents: ReservedIdents,
}

/// `id -> name`, serialized as a JSON object with stringified integer
/// keys (`{"0": "foo", "1": "bar"}`) -- JSON object keys are always
/// strings, so the id is formatted rather than used as a numeric key.
#[derive(Debug, Clone)]
pub struct IdentMap(pub Vec<String>);

impl Serialize for IdentMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (id, name) in self.0.iter().enumerate() {
            map.serialize_entry(&id.to_string(), name)?;
        }
        map.end()
    }
}

/// The id of the interned name `"next"` -- the language-level iterator
/// protocol hook a struct's `next` method is dispatched through by id,
/// without the interpreter re-parsing method names.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ReservedIdents {
    pub next: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct Function {
    pub name: String,
    pub parameters: Vec<String>,
    pub variables: Vec<String>,
    pub body: Vec<Exec>,
}

/// `field_map`/`method_map` map identifier id to a dense slot index;
/// iteration order is declaration order and defines struct literal value
/// order.
#[derive(Debug, Clone, Serialize)]
pub struct Prototype {
    pub name: String,
    pub field_map: indexmap::IndexMap<u32, u32>,
    pub method_map: indexmap::IndexMap<u32, u32>,
}

/// A literal value. Externally tagged; `Nil` has no payload and
/// serializes as the bare string `"Nil"`.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Serialize for Literal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Literal::Nil => serializer.serialize_str("Nil"),
            Literal::Bool(v) => external_tag(serializer, "Bool", v),
            Literal::Int(v) => external_tag(serializer, "Int", v),
            Literal::Float(v) => external_tag(serializer, "Float", v),
            Literal::Str(v) => external_tag(serializer, "Str", v),
        }
    }
}

/// How a value is named: either a local variable slot in the enclosing
/// function, or a declared function used as a first-class value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reference {
    Variable(u32),
    Function(u32),
}

impl Serialize for Reference {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Reference::Variable(slot) => external_tag(serializer, "Variable", slot),
            Reference::Function(id) => external_tag(serializer, "Function", id),
        }
    }
}

fn external_tag<S: Serializer, T: Serialize>(
    serializer: S,
    variant: &'static str,
    value: &T,
) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(1))?;
    map.serialize_entry(variant, value)?;
    map.end()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UnaryOperator {
    Not,
    BitNot,
    Minus,
    Type,
    Err,
    Bool,
    Int,
    Float,
    Str,
    Len,
    Print,
    Read,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BinaryOperator {
    Add,
    Sub,
    Mul,
    Div,
    Modulo,
    GetItem,
    Eq,
    Is,
    Lt,
    Leq,
    BitAnd,
    BitOr,
    BitXor,
    LeftShift,
    RightShift,
    And,
    Or,
    Push,
    Remove,
    Index,
    Join,
    Write,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TernaryOperator {
    Branch,
    SetItem,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NaryOperator {
    Tuple,
    List,
}

/// An onyo expression, lowered to IR form.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Literal),
    Reference(Reference),
    UnaryOperation(UnaryOperator, Box<Expr>),
    BinaryOperation(BinaryOperator, Box<Expr>, Box<Expr>),
    TernaryOperation(TernaryOperator, Box<Expr>, Box<Expr>, Box<Expr>),
    NaryOperation(NaryOperator, Vec<Expr>),
    SetVar(Reference, Box<Expr>),
    Call(Box<Expr>, Vec<Expr>),
    Struct(u32, Vec<Expr>),
    GetField(Box<Expr>, u32),
    SetField(Box<Expr>, u32, Box<Expr>),
}

impl Serialize for Expr {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Expr::Literal(value) => {
                let mut m = serializer.serialize_map(Some(2))?;
                m.serialize_entry("type", "Literal")?;
                m.serialize_entry("value", value)?;
                m.end()
            }
            Expr::Reference(value) => {
                let mut m = serializer.serialize_map(Some(2))?;
                m.serialize_entry("type", "Reference")?;
                m.serialize_entry("value", value)?;
                m.end()
            }
            Expr::UnaryOperation(operator, value) => {
                let mut m = serializer.serialize_map(Some(3))?;
                m.serialize_entry("type", "UnaryOperation")?;
                m.serialize_entry("operator", operator)?;
                m.serialize_entry("value", value)?;
                m.end()
            }
            Expr::BinaryOperation(operator, left, right) => {
                let mut m = serializer.serialize_map(Some(4))?;
                m.serialize_entry("type", "BinaryOperation")?;
                m.serialize_entry("operator", operator)?;
                m.serialize_entry("left", left)?;
                m.serialize_entry("right", right)?;
                m.end()
            }
            Expr::TernaryOperation(operator, a, b, c) => {
                let mut m = serializer.serialize_map(Some(5))?;
                m.serialize_entry("type", "TernaryOperation")?;
                m.serialize_entry("operator", operator)?;
                m.serialize_entry("condition", a)?;
                m.serialize_entry("then", b)?;
                m.serialize_entry("or_else", c)?;
                m.end()
            }
            Expr::NaryOperation(operator, values) => {
                let mut m = serializer.serialize_map(Some(3))?;
                m.serialize_entry("type", "NaryOperation")?;
                m.serialize_entry("operator", operator)?;
                m.serialize_entry("values", values)?;
                m.end()
            }
            Expr::SetVar(reference, value) => {
                let mut m = serializer.serialize_map(Some(3))?;
                m.serialize_entry("type", "SetVar")?;
                m.serialize_entry("reference", reference)?;
                m.serialize_entry("value", value)?;
                m.end()
            }
            Expr::Call(callee, arguments) => {
                let mut m = serializer.serialize_map(Some(3))?;
                m.serialize_entry("type", "Call")?;
                m.serialize_entry("callee", callee)?;
                m.serialize_entry("arguments", arguments)?;
                m.end()
            }
            Expr::Struct(prototype, values) => {
                let mut m = serializer.serialize_map(Some(3))?;
                m.serialize_entry("type", "Struct")?;
                m.serialize_entry("prototype", prototype)?;
                m.serialize_entry("values", values)?;
                m.end()
            }
            Expr::GetField(instance, field) => {
                let mut m = serializer.serialize_map(Some(3))?;
                m.serialize_entry("type", "GetField")?;
                m.serialize_entry("instance", instance)?;
                m.serialize_entry("field", field)?;
                m.end()
            }
            Expr::SetField(instance, field, value) => {
                let mut m = serializer.serialize_map(Some(4))?;
                m.serialize_entry("type", "SetField")?;
                m.serialize_entry("instance", instance)?;
                m.serialize_entry("field", field)?;
                m.serialize_entry("value", value)?;
                m.end()
            }
        }
    }
}

/// A statement inside a function body. Field names below (`block`,
/// `otherwise`, `variable_ref`, `iterator_expr`) are part of the wire
/// contract with the interpreter -- see `Data`'s doc comment.
#[derive(Debug, Clone, PartialEq)]
pub enum Exec {
    Expr(Expr),
    Return(Expr),
    While(Expr, Vec<Exec>),
    DoWhile(Vec<Exec>, Expr),
    Branch(Expr, Vec<Exec>, Vec<Exec>),
    ForLoop(Reference, Expr, Vec<Exec>),
}

impl Serialize for Exec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Exec::Expr(expr) => {
                let mut m = serializer.serialize_map(Some(2))?;
                m.serialize_entry("type", "Expr")?;
                m.serialize_entry("expr", expr)?;
                m.end()
            }
            Exec::Return(expr) => {
                let mut m = serializer.serialize_map(Some(2))?;
                m.serialize_entry("type", "Return")?;
                m.serialize_entry("expr", expr)?;
                m.end()
            }
            Exec::While(condition, block) => {
                let mut m = serializer.serialize_map(Some(3))?;
                m.serialize_entry("type", "While")?;
                m.serialize_entry("condition", condition)?;
                m.serialize_entry("block", block)?;
                m.end()
            }
            Exec::DoWhile(block, condition) => {
                let mut m = serializer.serialize_map(Some(3))?;
                m.serialize_entry("type", "DoWhile")?;
                m.serialize_entry("block", block)?;
                m.serialize_entry("condition", condition)?;
                m.end()
            }
            Exec::Branch(condition, then, otherwise) => {
                let mut m = serializer.serialize_map(Some(4))?;
                m.serialize_entry("type", "Branch")?;
                m.serialize_entry("condition", condition)?;
                m.serialize_entry("then", then)?;
                m.serialize_entry("otherwise", otherwise)?;
                m.end()
            }
            Exec::ForLoop(variable_ref, iterator_expr, block) => {
                let mut m = serializer.serialize_map(Some(4))?;
                m.serialize_entry("type", "ForLoop")?;
                m.serialize_entry("variable_ref", variable_ref)?;
                m.serialize_entry("iterator_expr", iterator_expr)?;
                m.serialize_entry("block", block)?;
                m.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_nil_serializes_as_bare_string() {
        let v = serde_json::to_value(Literal::Nil).unwrap();
        assert_eq!(v, serde_json::json!("Nil"));
    }

    #[test]
    fn literal_payload_variants_are_externally_tagged() {
        let v = serde_json::to_value(Literal::Int(3)).unwrap();
        assert_eq!(v, serde_json::json!({"Int": 3}));
    }

    #[test]
    fn reference_is_externally_tagged() {
        let v = serde_json::to_value(Reference::Variable(2)).unwrap();
        assert_eq!(v, serde_json::json!({"Variable": 2}));
    }

    #[test]
    fn ident_map_serializes_as_object_with_stringified_keys() {
        let map = IdentMap(vec!["foo".to_string(), "bar".to_string()]);
        let v = serde_json::to_value(map).unwrap();
        assert_eq!(v, serde_json::json!({"0": "foo", "1": "bar"}));
    }

    #[test]
    fn expr_is_internally_tagged() {
        let e = Expr::BinaryOperation(
            BinaryOperator::Add,
            Box::new(Expr::Literal(Literal::Int(1))),
            Box::new(Expr::Literal(Literal::Int(2))),
        );
        let v = serde_json::to_value(e).unwrap();
        assert_eq!(v["type"], serde_json::json!("BinaryOperation"));
        assert_eq!(v["operator"], serde_json::json!("Add"));
        assert_eq!(v["left"]["type"], serde_json::json!("Literal"));
    }

    #[test]
    fn unary_operator_is_bare_string() {
        let v = serde_json::to_value(UnaryOperator::Not).unwrap();
        assert_eq!(v, serde_json::json!("Not"));
    }

    #[test]
    fn neq_desugars_to_not_eq_shape() {
        let e = Expr::UnaryOperation(
            UnaryOperator::Not,
            Box::new(Expr::BinaryOperation(
                BinaryOperator::Eq,
                Box::new(Expr::Literal(Literal::Int(1))),
                Box::new(Expr::Literal(Literal::Int(2))),
            )),
        );
        let v = serde_json::to_value(e).unwrap();
        assert_eq!(v["type"], "UnaryOperation");
        assert_eq!(v["operator"], "Not");
        assert_eq!(v["value"]["operator"], "Eq");
    }
}
