//! Pass 2: the lowerer.
//!
//! Transforms one function body's CST into IR, bottom-up: children are
//! lowered first, then the parent node consumes the already-lowered
//! results. Each `Lowerer` owns a single function's `variables` map
//! (insertion-ordered name -> slot) and borrows Pass 1's frozen function
//! and struct tables to resolve calls, struct literals and field access.

use std::collections::HashMap;

use indexmap::IndexMap;
use onyoc_core::ir::{
    BinaryOperator, Exec, Expr, Literal, NaryOperator, Reference, TernaryOperator, UnaryOperator,
};
use onyoc_core::Interner;

use crate::collect::StructProto;
use crate::cst::{BinOp, CstNode, ElifClause, UnOp};
use crate::diagnostics::{Diagnostic, Diagnostics, Range};
use crate::lexer::{unescape_string, Token};
use crate::typo;

/// Built-in call names that lower directly to an operator node instead of
/// an `Expr::Call`. Arity is fixed per name (`onyoc/V.py`'s dispatch
/// table): the unary builtins take exactly one argument, the binary ones
/// exactly two.
enum Builtin {
    Unary(UnaryOperator),
    Binary(BinaryOperator),
}

fn builtin(name: &str) -> Option<Builtin> {
    use Builtin::*;
    Some(match name {
        "print" => Unary(UnaryOperator::Print),
        "read" => Unary(UnaryOperator::Read),
        "type" => Unary(UnaryOperator::Type),
        "err" => Unary(UnaryOperator::Err),
        "bool" => Unary(UnaryOperator::Bool),
        "int" => Unary(UnaryOperator::Int),
        "float" => Unary(UnaryOperator::Float),
        "str" => Unary(UnaryOperator::Str),
        "len" => Unary(UnaryOperator::Len),
        "write" => Binary(BinaryOperator::Write),
        "join" => Binary(BinaryOperator::Join),
        "push" => Binary(BinaryOperator::Push),
        "remove" => Binary(BinaryOperator::Remove),
        "index" => Binary(BinaryOperator::Index),
        _ => return None,
    })
}

fn builtin_names() -> impl Iterator<Item = &'static str> {
    [
        "print", "read", "type", "err", "bool", "int", "float", "str", "len", "write", "join",
        "push", "remove", "index",
    ]
    .into_iter()
}

pub struct Lowerer<'a> {
    variables: IndexMap<String, u32>,
    interner: &'a Interner,
    function_index: &'a HashMap<String, u32>,
    struct_index: &'a HashMap<String, u32>,
    prototypes: &'a [StructProto],
    pub diagnostics: Diagnostics,
}

impl<'a> Lowerer<'a> {
    pub fn new(
        parameters: &[String],
        interner: &'a Interner,
        function_index: &'a HashMap<String, u32>,
        struct_index: &'a HashMap<String, u32>,
        prototypes: &'a [StructProto],
    ) -> Self {
        let mut variables = IndexMap::new();
        for p in parameters {
            let slot = variables.len() as u32;
            variables.insert(p.clone(), slot);
        }
        Self {
            variables,
            interner,
            function_index,
            struct_index,
            prototypes,
            diagnostics: Diagnostics::new(),
        }
    }

    /// Consumes `self`, returning the final slot-ordered variable names
    /// (parameters occupy slots `0..parameters.len()` by construction).
    pub fn into_variable_names(self) -> Vec<String> {
        self.variables.into_keys().collect()
    }

    pub fn lower_block(&mut self, block: &[CstNode]) -> Vec<Exec> {
        block.iter().map(|node| self.lower_exec(node)).collect()
    }

    fn resolve_or_allocate(&mut self, name: &str) -> u32 {
        if let Some(&slot) = self.variables.get(name) {
            return slot;
        }
        let slot = self.variables.len() as u32;
        self.variables.insert(name.to_string(), slot);
        slot
    }

    fn lower_exec(&mut self, node: &CstNode) -> Exec {
        match node {
            CstNode::Assign(name, value, _) => {
                let value = self.lower_expr(value);
                let slot = self.resolve_or_allocate(&name.text);
                Exec::Expr(Expr::SetVar(Reference::Variable(slot), Box::new(value)))
            }
            CstNode::SetField(obj, field, value, _) => {
                Exec::Expr(self.lower_set_field(obj, field, value))
            }
            CstNode::SetItem(obj, index, value, _) => {
                let obj = self.lower_expr(obj);
                let index = self.lower_expr(index);
                let value = self.lower_expr(value);
                Exec::Expr(Expr::TernaryOperation(
                    TernaryOperator::SetItem,
                    Box::new(obj),
                    Box::new(index),
                    Box::new(value),
                ))
            }
            CstNode::While(cond, body, _) => {
                Exec::While(self.lower_expr(cond), self.lower_block(body))
            }
            CstNode::DoWhile(body, cond, _) => {
                Exec::DoWhile(self.lower_block(body), self.lower_expr(cond))
            }
            CstNode::ForLoop(name, iter, body, _) => {
                let iter_expr = self.lower_expr(iter);
                let slot = self.resolve_or_allocate(&name.text);
                let block = self.lower_block(body);
                Exec::ForLoop(Reference::Variable(slot), iter_expr, block)
            }
            CstNode::If {
                condition,
                then_block,
                elifs,
                else_block,
                ..
            } => self.lower_branch_chain(condition, then_block, elifs, else_block.as_deref()),
            CstNode::Return(value, _) => Exec::Return(self.lower_expr(value)),
            CstNode::EvalStmt(value, _) => Exec::Expr(self.lower_expr(value)),
            CstNode::ExprStmt(inner) => Exec::Expr(self.lower_expr(inner)),
            other => {
                // Only reachable if the grammar ever admits an expression
                // node directly at statement position; treat it as a bare
                // expression-statement for robustness.
                Exec::Expr(self.lower_expr(other))
            }
        }
    }

    fn lower_branch_chain(
        &mut self,
        condition: &CstNode,
        then_block: &[CstNode],
        elifs: &[ElifClause],
        else_block: Option<&[CstNode]>,
    ) -> Exec {
        let then = self.lower_block(then_block);
        let otherwise = match elifs.split_first() {
            Some((first, rest)) => {
                vec![self.lower_branch_chain(&first.condition, &first.block, rest, else_block)]
            }
            None => else_block.map(|b| self.lower_block(b)).unwrap_or_default(),
        };
        Exec::Branch(self.lower_expr(condition), then, otherwise)
    }

    pub fn lower_expr(&mut self, node: &CstNode) -> Expr {
        match node {
            CstNode::Nil(_) => Expr::Literal(Literal::Nil),
            CstNode::Bool(tok) => Expr::Literal(Literal::Bool(tok.text == "true")),
            CstNode::Int(tok) => match tok.text.parse::<i64>() {
                Ok(v) => Expr::Literal(Literal::Int(v)),
                Err(_) => {
                    self.diagnostics.push(
                        Diagnostic::new(format!("integer literal `{}` is out of range", tok.text))
                            .at(Range::from_token(tok)),
                    );
                    Expr::Literal(Literal::Int(0))
                }
            },
            CstNode::Float(tok) => match tok.text.parse::<f64>() {
                Ok(v) => Expr::Literal(Literal::Float(v)),
                Err(_) => {
                    self.diagnostics.push(
                        Diagnostic::new(format!("float literal `{}` is out of range", tok.text))
                            .at(Range::from_token(tok)),
                    );
                    Expr::Literal(Literal::Float(0.0))
                }
            },
            CstNode::Str(tok) => Expr::Literal(Literal::Str(unescape_string(&tok.text))),
            CstNode::Var(tok) => self.lower_var(tok),
            CstNode::List(items, _) => {
                let values = items.iter().map(|e| self.lower_expr(e)).collect();
                Expr::NaryOperation(NaryOperator::List, values)
            }
            CstNode::StructLit(name, fields, _) => self.lower_struct_lit(name, fields),
            CstNode::Branch(cond, then, or_else, _) => Expr::TernaryOperation(
                TernaryOperator::Branch,
                Box::new(self.lower_expr(cond)),
                Box::new(self.lower_expr(then)),
                Box::new(self.lower_expr(or_else)),
            ),
            CstNode::GetItem(obj, idx, _) => Expr::BinaryOperation(
                BinaryOperator::GetItem,
                Box::new(self.lower_expr(obj)),
                Box::new(self.lower_expr(idx)),
            ),
            CstNode::GetField(obj, field, _) => {
                let obj = self.lower_expr(obj);
                let field_id = self.resolve_field_id(field);
                Expr::GetField(Box::new(obj), field_id)
            }
            CstNode::Call(callee, args, _) => self.lower_call(callee, args),
            CstNode::Unary(op, value, _) => {
                let operand = self.lower_expr(value);
                let ir_op = match op {
                    UnOp::BitNot => UnaryOperator::BitNot,
                    UnOp::Not => UnaryOperator::Not,
                    UnOp::Neg => UnaryOperator::Minus,
                };
                Expr::UnaryOperation(ir_op, Box::new(operand))
            }
            CstNode::Binary(op, lhs, rhs, _) => self.lower_binary(*op, lhs, rhs),
            // Assign/SetField/SetItem only ever arise at statement
            // position (`parse_assign_or_expr_stmt` is reached only from
            // `parse_exec`), never nested inside an expression.
            CstNode::Assign(..)
            | CstNode::SetField(..)
            | CstNode::SetItem(..)
            | CstNode::While(..)
            | CstNode::DoWhile(..)
            | CstNode::ForLoop(..)
            | CstNode::If { .. }
            | CstNode::Return(..)
            | CstNode::EvalStmt(..)
            | CstNode::ExprStmt(..) => {
                unreachable!("statement node encountered in expression position")
            }
        }
    }

    /// Lowers `a.b = value` to `Expr::SetField`.
    fn lower_set_field(&mut self, obj: &CstNode, field: &Token, value: &CstNode) -> Expr {
        let obj = self.lower_expr(obj);
        let field_id = self.resolve_field_id(field);
        let value = self.lower_expr(value);
        Expr::SetField(Box::new(obj), field_id, Box::new(value))
    }

    fn resolve_field_id(&mut self, field: &Token) -> u32 {
        match self.interner.get(&field.text) {
            Some(sym) => sym.as_u32(),
            None => {
                self.diagnostics.push(
                    Diagnostic::new(format!("undefined field `{}`", field.text))
                        .at(Range::from_token(field)),
                );
                0
            }
        }
    }

    fn lower_var(&mut self, tok: &Token) -> Expr {
        if let Some(&slot) = self.variables.get(&tok.text) {
            return Expr::Reference(Reference::Variable(slot));
        }
        if let Some(&id) = self.function_index.get(&tok.text) {
            return Expr::Reference(Reference::Function(id));
        }
        let candidates: Vec<&str> = self
            .variables
            .keys()
            .map(|s| s.as_str())
            .chain(self.function_index.keys().map(|s| s.as_str()))
            .collect();
        let suggestion = typo::suggest(&tok.text, candidates);
        let mut diagnostic = Diagnostic::new(format!("undefined variable `{}`", tok.text))
            .at(Range::from_token(tok));
        if let Some(s) = suggestion {
            diagnostic = diagnostic.with_typo(s);
        }
        self.diagnostics.push(diagnostic);
        Expr::Literal(Literal::Nil)
    }

    fn lower_call(&mut self, callee: &CstNode, args: &[CstNode]) -> Expr {
        if let CstNode::Var(name_tok) = callee {
            let name = name_tok.text.as_str();
            if let Some(kind) = builtin(name) {
                return self.lower_builtin_call(name_tok, kind, args);
            }
            if let Some(&slot) = self.variables.get(name) {
                let callee = Expr::Reference(Reference::Variable(slot));
                let lowered_args = args.iter().map(|a| self.lower_expr(a)).collect();
                return Expr::Call(Box::new(callee), lowered_args);
            }
            if let Some(&id) = self.function_index.get(name) {
                let callee = Expr::Reference(Reference::Function(id));
                let lowered_args = args.iter().map(|a| self.lower_expr(a)).collect();
                return Expr::Call(Box::new(callee), lowered_args);
            }
            let candidates: Vec<&str> = builtin_names()
                .chain(self.variables.keys().map(|s| s.as_str()))
                .chain(self.function_index.keys().map(|s| s.as_str()))
                .collect();
            let suggestion = typo::suggest(name, candidates);
            let mut diagnostic = Diagnostic::new(format!("undefined function `{name}`"))
                .at(Range::from_token(name_tok));
            if let Some(s) = suggestion {
                diagnostic = diagnostic.with_typo(s);
            }
            self.diagnostics.push(diagnostic);
            return Expr::Literal(Literal::Nil);
        }
        let callee_expr = self.lower_expr(callee);
        let lowered_args = args.iter().map(|a| self.lower_expr(a)).collect();
        Expr::Call(Box::new(callee_expr), lowered_args)
    }

    fn lower_builtin_call(&mut self, name_tok: &Token, kind: Builtin, args: &[CstNode]) -> Expr {
        match kind {
            Builtin::Unary(op) => {
                if args.len() != 1 {
                    self.diagnostics.push(
                        Diagnostic::new(format!(
                            "builtin `{}` expects 1 argument, got {}",
                            name_tok.text,
                            args.len()
                        ))
                        .at(Range::from_token(name_tok)),
                    );
                    return Expr::Literal(Literal::Nil);
                }
                let operand = self.lower_expr(&args[0]);
                Expr::UnaryOperation(op, Box::new(operand))
            }
            Builtin::Binary(op) => {
                if args.len() != 2 {
                    self.diagnostics.push(
                        Diagnostic::new(format!(
                            "builtin `{}` expects 2 arguments, got {}",
                            name_tok.text,
                            args.len()
                        ))
                        .at(Range::from_token(name_tok)),
                    );
                    return Expr::Literal(Literal::Nil);
                }
                let lhs = self.lower_expr(&args[0]);
                let rhs = self.lower_expr(&args[1]);
                Expr::BinaryOperation(op, Box::new(lhs), Box::new(rhs))
            }
        }
    }

    fn lower_binary(&mut self, op: BinOp, lhs: &CstNode, rhs: &CstNode) -> Expr {
        let l = self.lower_expr(lhs);
        let r = self.lower_expr(rhs);
        match op {
            BinOp::NotEq => Expr::UnaryOperation(
                UnaryOperator::Not,
                Box::new(Expr::BinaryOperation(BinaryOperator::Eq, Box::new(l), Box::new(r))),
            ),
            BinOp::Gt => Expr::UnaryOperation(
                UnaryOperator::Not,
                Box::new(Expr::BinaryOperation(BinaryOperator::Leq, Box::new(l), Box::new(r))),
            ),
            BinOp::Geq => Expr::UnaryOperation(
                UnaryOperator::Not,
                Box::new(Expr::BinaryOperation(BinaryOperator::Lt, Box::new(l), Box::new(r))),
            ),
            BinOp::Or => Expr::BinaryOperation(BinaryOperator::Or, Box::new(l), Box::new(r)),
            BinOp::And => Expr::BinaryOperation(BinaryOperator::And, Box::new(l), Box::new(r)),
            BinOp::Eq => Expr::BinaryOperation(BinaryOperator::Eq, Box::new(l), Box::new(r)),
            BinOp::Is => Expr::BinaryOperation(BinaryOperator::Is, Box::new(l), Box::new(r)),
            BinOp::Lt => Expr::BinaryOperation(BinaryOperator::Lt, Box::new(l), Box::new(r)),
            BinOp::Leq => Expr::BinaryOperation(BinaryOperator::Leq, Box::new(l), Box::new(r)),
            BinOp::Shl => {
                Expr::BinaryOperation(BinaryOperator::LeftShift, Box::new(l), Box::new(r))
            }
            BinOp::Shr => {
                Expr::BinaryOperation(BinaryOperator::RightShift, Box::new(l), Box::new(r))
            }
            BinOp::BitOr => Expr::BinaryOperation(BinaryOperator::BitOr, Box::new(l), Box::new(r)),
            BinOp::BitXor => {
                Expr::BinaryOperation(BinaryOperator::BitXor, Box::new(l), Box::new(r))
            }
            BinOp::BitAnd => {
                Expr::BinaryOperation(BinaryOperator::BitAnd, Box::new(l), Box::new(r))
            }
            BinOp::Add => Expr::BinaryOperation(BinaryOperator::Add, Box::new(l), Box::new(r)),
            BinOp::Sub => Expr::BinaryOperation(BinaryOperator::Sub, Box::new(l), Box::new(r)),
            BinOp::Mul => Expr::BinaryOperation(BinaryOperator::Mul, Box::new(l), Box::new(r)),
            BinOp::Div => Expr::BinaryOperation(BinaryOperator::Div, Box::new(l), Box::new(r)),
            BinOp::Mod => Expr::BinaryOperation(BinaryOperator::Modulo, Box::new(l), Box::new(r)),
        }
    }

    fn lower_struct_lit(
        &mut self,
        name: &Token,
        fields: &[crate::cst::FieldInit],
    ) -> Expr {
        let Some(&proto_id) = self.struct_index.get(&name.text) else {
            let suggestion = typo::suggest(&name.text, self.struct_index.keys().map(|s| s.as_str()));
            let mut diagnostic =
                Diagnostic::new(format!("undefined struct `{}`", name.text)).at(Range::from_token(name));
            if let Some(s) = suggestion {
                diagnostic = diagnostic.with_typo(s);
            }
            self.diagnostics.push(diagnostic);
            return Expr::Literal(Literal::Nil);
        };
        let proto = &self.prototypes[proto_id as usize];
        let mut provided: HashMap<u32, Expr> = HashMap::new();
        for field in fields {
            let value = self.lower_expr(&field.value);
            let Some(sym) = self.interner.get(&field.name.text) else {
                self.diagnostics.push(
                    Diagnostic::new(format!(
                        "struct `{}` has no field `{}`",
                        name.text, field.name.text
                    ))
                    .at(Range::from_token(&field.name)),
                );
                continue;
            };
            let ident_id = sym.as_u32();
            if !proto.field_map.contains_key(&ident_id) {
                self.diagnostics.push(
                    Diagnostic::new(format!(
                        "struct `{}` has no field `{}`",
                        name.text, field.name.text
                    ))
                    .at(Range::from_token(&field.name)),
                );
                continue;
            }
            if provided.insert(ident_id, value).is_some() {
                self.diagnostics.push(
                    Diagnostic::new(format!(
                        "duplicate field `{}` in struct literal for `{}`",
                        field.name.text, name.text
                    ))
                    .at(Range::from_token(&field.name)),
                );
            }
        }
        let mut values = Vec::with_capacity(proto.field_map.len());
        for &ident_id in proto.field_map.keys() {
            match provided.remove(&ident_id) {
                Some(v) => values.push(v),
                None => {
                    let field_name = self.interner.try_resolve(onyoc_core::Symbol::from_raw(ident_id)).unwrap_or("?");
                    self.diagnostics.push(Diagnostic::new(format!(
                        "struct literal for `{}` is missing field `{}`",
                        name.text, field_name
                    )));
                    values.push(Expr::Literal(Literal::Nil));
                }
            }
        }
        Expr::Struct(proto_id, values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collect::collect;
    use crate::parser::parse;

    fn lower_main_body(source: &str) -> (Vec<Exec>, Vec<String>, Diagnostics) {
        let decls = parse(source).unwrap();
        let collected = collect(decls);
        let main = collected
            .functions
            .iter()
            .find(|f| f.name == "main")
            .unwrap();
        let mut lowerer = Lowerer::new(
            &main.parameters,
            &collected.interner,
            &collected.function_index,
            &collected.struct_index,
            &collected.prototypes,
        );
        let body = lowerer.lower_block(&main.cst_body);
        let diagnostics = std::mem::take(&mut lowerer.diagnostics);
        (body, lowerer.into_variable_names(), diagnostics)
    }

    #[test]
    fn print_add_lowers_to_unary_over_binary() {
        let (body, _, diags) = lower_main_body("main() { print(1 + 2) }");
        assert!(diags.is_empty());
        assert_eq!(body.len(), 1);
        match &body[0] {
            Exec::Expr(Expr::UnaryOperation(UnaryOperator::Print, inner)) => match inner.as_ref() {
                Expr::BinaryOperation(BinaryOperator::Add, l, r) => {
                    assert_eq!(**l, Expr::Literal(Literal::Int(1)));
                    assert_eq!(**r, Expr::Literal(Literal::Int(2)));
                }
                other => panic!("unexpected inner: {other:?}"),
            },
            other => panic!("unexpected body: {other:?}"),
        }
    }

    #[test]
    fn neq_desugars_to_not_eq() {
        let (body, _, _) = lower_main_body("main() { eval 1 != 2 }");
        match &body[0] {
            Exec::Expr(Expr::UnaryOperation(UnaryOperator::Not, inner)) => {
                assert!(matches!(inner.as_ref(), Expr::BinaryOperation(BinaryOperator::Eq, _, _)));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn gt_desugars_to_not_leq() {
        let (body, _, _) = lower_main_body("main() { eval 1 > 2 }");
        match &body[0] {
            Exec::Expr(Expr::UnaryOperation(UnaryOperator::Not, inner)) => {
                assert!(matches!(inner.as_ref(), Expr::BinaryOperation(BinaryOperator::Leq, _, _)));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn geq_desugars_to_not_lt() {
        let (body, _, _) = lower_main_body("main() { eval 1 >= 2 }");
        match &body[0] {
            Exec::Expr(Expr::UnaryOperation(UnaryOperator::Not, inner)) => {
                assert!(matches!(inner.as_ref(), Expr::BinaryOperation(BinaryOperator::Lt, _, _)));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn elif_chain_right_associates() {
        let (body, _, _) =
            lower_main_body("main() { if a { } elif b { } elif c { } else { } a = 1 b = 1 c = 1 }");
        // First statement is the branch chain (a/b/c referenced before
        // assignment in this fixture are undefined, so check shape via a
        // variant that assigns before using -- use a simpler fixture:
        let _ = body;
        let (body2, _, diags2) = lower_main_body(
            "main() { a = 1 b = 1 c = 1 if a { } elif b { } elif c { } else { } }",
        );
        assert!(diags2.is_empty());
        match &body2[3] {
            Exec::Branch(_, _, otherwise) => match &otherwise[0] {
                Exec::Branch(_, _, otherwise2) => {
                    assert!(matches!(otherwise2[0], Exec::Branch(..)));
                }
                other => panic!("unexpected: {other:?}"),
            },
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn undefined_variable_is_diagnosed_with_typo() {
        let (_, _, diags) = lower_main_body("main() { x = 1 y = x + z }");
        assert_eq!(diags.len(), 1);
        assert_eq!(diags.errors[0].message, "undefined variable `z`");
    }

    #[test]
    fn assignment_allocates_sequential_slots() {
        let (_, variables, diags) = lower_main_body("main() { x = 1 y = 2 }");
        assert!(diags.is_empty());
        assert_eq!(variables, vec!["x".to_string(), "y".to_string()]);
    }

    #[test]
    fn struct_literal_reorders_to_declaration_order() {
        let source = "struct P { x y }\nmain() { p = P { y: 2, x: 1 } }";
        let decls = parse(source).unwrap();
        let collected = collect(decls);
        let main = collected.functions.iter().find(|f| f.name == "main").unwrap();
        let mut lowerer = Lowerer::new(
            &main.parameters,
            &collected.interner,
            &collected.function_index,
            &collected.struct_index,
            &collected.prototypes,
        );
        let body = lowerer.lower_block(&main.cst_body);
        assert!(lowerer.diagnostics.is_empty());
        match &body[0] {
            Exec::Expr(Expr::SetVar(_, value)) => match value.as_ref() {
                Expr::Struct(0, values) => {
                    assert_eq!(values[0], Expr::Literal(Literal::Int(1)));
                    assert_eq!(values[1], Expr::Literal(Literal::Int(2)));
                }
                other => panic!("unexpected: {other:?}"),
            },
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn calling_local_variable_dispatches_to_variable_reference() {
        let source = "apply(f) { ret f() }\nmain() { }";
        let (body, vars, diags) = lower_main_body(source);
        let _ = (body, vars, diags);
        let decls = parse(source).unwrap();
        let collected = collect(decls);
        let apply = collected.functions.iter().find(|f| f.name == "apply").unwrap();
        let mut lowerer = Lowerer::new(
            &apply.parameters,
            &collected.interner,
            &collected.function_index,
            &collected.struct_index,
            &collected.prototypes,
        );
        let apply_body = lowerer.lower_block(&apply.cst_body);
        match &apply_body[0] {
            Exec::Return(Expr::Call(callee, _)) => {
                assert!(matches!(callee.as_ref(), Expr::Reference(Reference::Variable(0))));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }
}
