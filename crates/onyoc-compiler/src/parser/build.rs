//! Deterministic CST construction.
//!
//! Once [`super::earley::recognize`] confirms a token stream derives from
//! the grammar, this recursive-descent pass walks the same (unambiguous,
//! precedence-stratified) grammar to build the actual [`CstNode`] tree.
//! Operator precedence is expressed directly as a chain of mutually
//! recursive parse functions, one per precedence level, each left-folding
//! its same-level operators.

use crate::cst::{BinOp, CstNode, Decl, ElifClause, FieldInit, Func, Span, StructDef, UnOp};
use crate::lexer::{unescape_string, Token, TokenKind};

#[derive(Debug, thiserror::Error)]
#[error("internal parser inconsistency at token {position}: expected {expected}")]
pub struct BuildError {
    pub position: usize,
    pub expected: String,
}

pub struct Builder<'a> {
    tokens: &'a [Token],
    pos: usize,
    /// Suppressed while parsing an `if`/`while`/`elif`/`for ... in` header
    /// expression, so a trailing `Ident {` is not mistaken for a struct
    /// literal when the `{` actually opens the statement's block. Reset
    /// to `false` whenever we descend into an already-delimited
    /// sub-expression (parens, brackets, call arguments, struct field
    /// values), where the ambiguity cannot occur.
    suppress_struct_lit: bool,
}

type R<T> = Result<T, BuildError>;

impl<'a> Builder<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            pos: 0,
            suppress_struct_lit: false,
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_kind(&self) -> Option<TokenKind> {
        self.peek().map(|t| t.kind)
    }

    fn bump(&mut self) -> Token {
        let t = self.tokens[self.pos].clone();
        self.pos += 1;
        t
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.peek_kind() == Some(kind)
    }

    fn expect(&mut self, kind: TokenKind) -> R<Token> {
        if self.at(kind) {
            Ok(self.bump())
        } else {
            Err(BuildError {
                position: self.pos,
                expected: kind.label().to_string(),
            })
        }
    }

    pub fn parse_program(&mut self) -> R<Vec<Decl>> {
        let mut decls = Vec::new();
        while self.peek().is_some() {
            decls.push(self.parse_decl()?);
        }
        Ok(decls)
    }

    fn parse_decl(&mut self) -> R<Decl> {
        if self.at(TokenKind::KwStruct) {
            Ok(Decl::Struct(self.parse_structdef()?))
        } else {
            Ok(Decl::Func(self.parse_func()?))
        }
    }

    /// A struct member is a bare field identifier, or a method declared
    /// exactly like a top-level function. Lookahead one token past the
    /// identifier to tell them apart: `(` starts a method's parameter list.
    fn parse_structdef(&mut self) -> R<StructDef> {
        let kw = self.expect(TokenKind::KwStruct)?;
        let span = Span::from_token(&kw);
        let name = self.expect(TokenKind::Ident)?;
        self.expect(TokenKind::LBrace)?;
        let mut fields = Vec::new();
        let mut methods = Vec::new();
        while !self.at(TokenKind::RBrace) {
            let is_method = self
                .tokens
                .get(self.pos + 1)
                .map(|t| t.kind == TokenKind::LParen)
                .unwrap_or(false);
            if is_method {
                methods.push(self.parse_func()?);
            } else {
                fields.push(self.expect(TokenKind::Ident)?);
            }
        }
        self.expect(TokenKind::RBrace)?;
        Ok(StructDef {
            name,
            fields,
            methods,
            span,
        })
    }

    /// Parse a bare statement list, with no enclosing `{ }` or function
    /// header. Used by the highlighter's "raw block" fallback.
    pub fn parse_bare_exec_list(&mut self) -> R<Vec<CstNode>> {
        let mut execs = Vec::new();
        while self.peek().is_some() {
            execs.push(self.parse_exec()?);
        }
        Ok(execs)
    }

    /// Parse a single expression with nothing following it. Used by the
    /// highlighter's "expr" fallback.
    pub fn parse_bare_expr(&mut self) -> R<CstNode> {
        let e = self.parse_expr()?;
        Ok(e)
    }

    fn parse_func(&mut self) -> R<Func> {
        let name = self.expect(TokenKind::Ident)?;
        let start = Span::from_token(&name);
        self.expect(TokenKind::LParen)?;
        let mut params = Vec::new();
        if !self.at(TokenKind::RParen) {
            params.push(self.expect(TokenKind::Ident)?);
            while self.at(TokenKind::Comma) {
                self.bump();
                params.push(self.expect(TokenKind::Ident)?);
            }
        }
        self.expect(TokenKind::RParen)?;
        let body = self.parse_block()?;
        Ok(Func {
            name,
            params,
            body,
            span: start,
        })
    }

    fn parse_block(&mut self) -> R<Vec<CstNode>> {
        self.expect(TokenKind::LBrace)?;
        let mut execs = Vec::new();
        while !self.at(TokenKind::RBrace) {
            execs.push(self.parse_exec()?);
        }
        self.expect(TokenKind::RBrace)?;
        Ok(execs)
    }

    fn parse_exec(&mut self) -> R<CstNode> {
        match self.peek_kind() {
            Some(TokenKind::KwWhile) => self.parse_while(),
            Some(TokenKind::KwDo) => self.parse_do_while(),
            Some(TokenKind::KwFor) => self.parse_for_loop(),
            Some(TokenKind::KwIf) => self.parse_if(),
            Some(TokenKind::KwReturn) => self.parse_return(),
            Some(TokenKind::KwEval) => self.parse_eval_stmt(),
            _ => self.parse_assign_or_expr_stmt(),
        }
    }

    /// Parses a postfix expression, then checks for a trailing `=`. A bare
    /// `IDENT` target becomes `Assign`; a `.field`/`[index]` target becomes
    /// `SetField`/`SetItem`. Anything else followed by `=` is a grammar
    /// error (e.g. `1 = 2`), since only these three shapes are assignable.
    fn parse_assign_or_expr_stmt(&mut self) -> R<CstNode> {
        let target = self.parse_postfix()?;
        if !self.at(TokenKind::Assign) {
            return Ok(CstNode::ExprStmt(Box::new(target)));
        }
        self.bump();
        let span = target.span();
        let value = self.parse_expr()?;
        match target {
            CstNode::Var(name) => Ok(CstNode::Assign(name, Box::new(value), span)),
            CstNode::GetField(obj, field, _) => {
                Ok(CstNode::SetField(obj, field, Box::new(value), span))
            }
            CstNode::GetItem(obj, index, _) => {
                Ok(CstNode::SetItem(obj, index, Box::new(value), span))
            }
            _ => Err(BuildError {
                position: self.pos,
                expected: "an assignable target".to_string(),
            }),
        }
    }

    fn parse_condition_expr(&mut self) -> R<CstNode> {
        let prev = self.suppress_struct_lit;
        self.suppress_struct_lit = true;
        let result = self.parse_expr();
        self.suppress_struct_lit = prev;
        result
    }

    fn parse_while(&mut self) -> R<CstNode> {
        let kw = self.expect(TokenKind::KwWhile)?;
        let span = Span::from_token(&kw);
        let cond = self.parse_condition_expr()?;
        let body = self.parse_block()?;
        Ok(CstNode::While(Box::new(cond), body, span))
    }

    fn parse_do_while(&mut self) -> R<CstNode> {
        let kw = self.expect(TokenKind::KwDo)?;
        let span = Span::from_token(&kw);
        let body = self.parse_block()?;
        self.expect(TokenKind::KwWhile)?;
        let cond = self.parse_expr()?;
        Ok(CstNode::DoWhile(body, Box::new(cond), span))
    }

    fn parse_for_loop(&mut self) -> R<CstNode> {
        let kw = self.expect(TokenKind::KwFor)?;
        let span = Span::from_token(&kw);
        let var = self.expect(TokenKind::Ident)?;
        self.expect(TokenKind::KwIn)?;
        let iter = self.parse_condition_expr()?;
        let body = self.parse_block()?;
        Ok(CstNode::ForLoop(var, Box::new(iter), body, span))
    }

    fn parse_if(&mut self) -> R<CstNode> {
        let kw = self.expect(TokenKind::KwIf)?;
        let span = Span::from_token(&kw);
        let condition = self.parse_condition_expr()?;
        let then_block = self.parse_block()?;
        let mut elifs = Vec::new();
        while self.at(TokenKind::KwElif) {
            self.bump();
            let c = self.parse_condition_expr()?;
            let b = self.parse_block()?;
            elifs.push(ElifClause {
                condition: c,
                block: b,
            });
        }
        let else_block = if self.at(TokenKind::KwElse) {
            self.bump();
            Some(self.parse_block()?)
        } else {
            None
        };
        Ok(CstNode::If {
            condition: Box::new(condition),
            then_block,
            elifs,
            else_block,
            span,
        })
    }

    fn parse_return(&mut self) -> R<CstNode> {
        let kw = self.expect(TokenKind::KwReturn)?;
        let span = Span::from_token(&kw);
        let value = self.parse_expr()?;
        Ok(CstNode::Return(Box::new(value), span))
    }

    fn parse_eval_stmt(&mut self) -> R<CstNode> {
        let kw = self.expect(TokenKind::KwEval)?;
        let span = Span::from_token(&kw);
        let value = self.parse_expr()?;
        Ok(CstNode::EvalStmt(Box::new(value), span))
    }

    pub fn parse_expr(&mut self) -> R<CstNode> {
        self.parse_or_expr()
    }

    fn parse_or_expr(&mut self) -> R<CstNode> {
        let mut lhs = self.parse_and_expr()?;
        while self.at(TokenKind::KwOr) {
            self.bump();
            let span = lhs.span();
            let rhs = self.parse_and_expr()?;
            lhs = CstNode::Binary(BinOp::Or, Box::new(lhs), Box::new(rhs), span);
        }
        Ok(lhs)
    }

    fn parse_and_expr(&mut self) -> R<CstNode> {
        let mut lhs = self.parse_eq_expr()?;
        while self.at(TokenKind::KwAnd) {
            self.bump();
            let span = lhs.span();
            let rhs = self.parse_eq_expr()?;
            lhs = CstNode::Binary(BinOp::And, Box::new(lhs), Box::new(rhs), span);
        }
        Ok(lhs)
    }

    fn parse_eq_expr(&mut self) -> R<CstNode> {
        let mut lhs = self.parse_rel_expr()?;
        loop {
            let op = match self.peek_kind() {
                Some(TokenKind::EqEq) => BinOp::Eq,
                Some(TokenKind::NotEq) => BinOp::NotEq,
                Some(TokenKind::KwIs) => BinOp::Is,
                _ => break,
            };
            self.bump();
            let span = lhs.span();
            let rhs = self.parse_rel_expr()?;
            lhs = CstNode::Binary(op, Box::new(lhs), Box::new(rhs), span);
        }
        Ok(lhs)
    }

    fn parse_rel_expr(&mut self) -> R<CstNode> {
        let mut lhs = self.parse_shift_expr()?;
        loop {
            let op = match self.peek_kind() {
                Some(TokenKind::Lt) => BinOp::Lt,
                Some(TokenKind::Gt) => BinOp::Gt,
                Some(TokenKind::Leq) => BinOp::Leq,
                Some(TokenKind::Geq) => BinOp::Geq,
                _ => break,
            };
            self.bump();
            let span = lhs.span();
            let rhs = self.parse_shift_expr()?;
            lhs = CstNode::Binary(op, Box::new(lhs), Box::new(rhs), span);
        }
        Ok(lhs)
    }

    fn parse_shift_expr(&mut self) -> R<CstNode> {
        let mut lhs = self.parse_bitor_expr()?;
        loop {
            let op = match self.peek_kind() {
                Some(TokenKind::Shl) => BinOp::Shl,
                Some(TokenKind::Shr) => BinOp::Shr,
                _ => break,
            };
            self.bump();
            let span = lhs.span();
            let rhs = self.parse_bitor_expr()?;
            lhs = CstNode::Binary(op, Box::new(lhs), Box::new(rhs), span);
        }
        Ok(lhs)
    }

    fn parse_bitor_expr(&mut self) -> R<CstNode> {
        let mut lhs = self.parse_bitxor_expr()?;
        while self.at(TokenKind::Pipe) {
            self.bump();
            let span = lhs.span();
            let rhs = self.parse_bitxor_expr()?;
            lhs = CstNode::Binary(BinOp::BitOr, Box::new(lhs), Box::new(rhs), span);
        }
        Ok(lhs)
    }

    fn parse_bitxor_expr(&mut self) -> R<CstNode> {
        let mut lhs = self.parse_bitand_expr()?;
        while self.at(TokenKind::Caret) {
            self.bump();
            let span = lhs.span();
            let rhs = self.parse_bitand_expr()?;
            lhs = CstNode::Binary(BinOp::BitXor, Box::new(lhs), Box::new(rhs), span);
        }
        Ok(lhs)
    }

    fn parse_bitand_expr(&mut self) -> R<CstNode> {
        let mut lhs = self.parse_add_expr()?;
        while self.at(TokenKind::Amp) {
            self.bump();
            let span = lhs.span();
            let rhs = self.parse_add_expr()?;
            lhs = CstNode::Binary(BinOp::BitAnd, Box::new(lhs), Box::new(rhs), span);
        }
        Ok(lhs)
    }

    fn parse_add_expr(&mut self) -> R<CstNode> {
        let mut lhs = self.parse_mul_expr()?;
        loop {
            let op = match self.peek_kind() {
                Some(TokenKind::Plus) => BinOp::Add,
                Some(TokenKind::Minus) => BinOp::Sub,
                _ => break,
            };
            self.bump();
            let span = lhs.span();
            let rhs = self.parse_mul_expr()?;
            lhs = CstNode::Binary(op, Box::new(lhs), Box::new(rhs), span);
        }
        Ok(lhs)
    }

    fn parse_mul_expr(&mut self) -> R<CstNode> {
        let mut lhs = self.parse_unary_expr()?;
        loop {
            let op = match self.peek_kind() {
                Some(TokenKind::Star) => BinOp::Mul,
                Some(TokenKind::Slash) => BinOp::Div,
                Some(TokenKind::Percent) => BinOp::Mod,
                _ => break,
            };
            self.bump();
            let span = lhs.span();
            let rhs = self.parse_unary_expr()?;
            lhs = CstNode::Binary(op, Box::new(lhs), Box::new(rhs), span);
        }
        Ok(lhs)
    }

    fn parse_unary_expr(&mut self) -> R<CstNode> {
        let op = match self.peek_kind() {
            Some(TokenKind::Tilde) => Some(UnOp::BitNot),
            Some(TokenKind::KwNot) => Some(UnOp::Not),
            Some(TokenKind::Minus) => Some(UnOp::Neg),
            _ => None,
        };
        if let Some(op) = op {
            let tok = self.bump();
            let span = Span::from_token(&tok);
            let value = self.parse_unary_expr()?;
            Ok(CstNode::Unary(op, Box::new(value), span))
        } else {
            self.parse_postfix()
        }
    }

    fn parse_postfix(&mut self) -> R<CstNode> {
        let mut node = self.parse_atom()?;
        loop {
            match self.peek_kind() {
                Some(TokenKind::LBracket) => {
                    self.bump();
                    let span = node.span();
                    let index = self.with_struct_lit_allowed(|b| b.parse_expr())?;
                    self.expect(TokenKind::RBracket)?;
                    node = CstNode::GetItem(Box::new(node), Box::new(index), span);
                }
                Some(TokenKind::Dot) => {
                    self.bump();
                    let span = node.span();
                    let field = self.expect(TokenKind::Ident)?;
                    node = CstNode::GetField(Box::new(node), field, span);
                }
                Some(TokenKind::LParen) => {
                    self.bump();
                    let span = node.span();
                    let args = self.with_struct_lit_allowed(|b| b.parse_expr_list(TokenKind::RParen))?;
                    self.expect(TokenKind::RParen)?;
                    node = CstNode::Call(Box::new(node), args, span);
                }
                _ => break,
            }
        }
        Ok(node)
    }

    fn with_struct_lit_allowed<T>(&mut self, f: impl FnOnce(&mut Self) -> R<T>) -> R<T> {
        let prev = self.suppress_struct_lit;
        self.suppress_struct_lit = false;
        let result = f(self);
        self.suppress_struct_lit = prev;
        result
    }

    fn parse_expr_list(&mut self, closing: TokenKind) -> R<Vec<CstNode>> {
        let mut items = Vec::new();
        if !self.at(closing) {
            items.push(self.parse_expr()?);
            while self.at(TokenKind::Comma) {
                self.bump();
                if self.at(closing) {
                    break;
                }
                items.push(self.parse_expr()?);
            }
        }
        Ok(items)
    }

    fn parse_atom(&mut self) -> R<CstNode> {
        match self.peek_kind() {
            Some(TokenKind::Nil) => {
                let t = self.bump();
                Ok(CstNode::Nil(Span::from_token(&t)))
            }
            Some(TokenKind::True) | Some(TokenKind::False) => Ok(CstNode::Bool(self.bump())),
            Some(TokenKind::Int) => Ok(CstNode::Int(self.bump())),
            Some(TokenKind::Float) => Ok(CstNode::Float(self.bump())),
            Some(TokenKind::Str) => Ok(CstNode::Str(self.bump())),
            Some(TokenKind::LBracket) => {
                let open = self.bump();
                let span = Span::from_token(&open);
                let items = self.with_struct_lit_allowed(|b| b.parse_expr_list(TokenKind::RBracket))?;
                self.expect(TokenKind::RBracket)?;
                Ok(CstNode::List(items, span))
            }
            Some(TokenKind::LParen) => {
                self.bump();
                let inner = self.with_struct_lit_allowed(|b| b.parse_expr())?;
                self.expect(TokenKind::RParen)?;
                Ok(inner)
            }
            Some(TokenKind::KwIf) => self.parse_branch(),
            Some(TokenKind::Ident) => {
                let next_is_brace = self
                    .tokens
                    .get(self.pos + 1)
                    .map(|t| t.kind == TokenKind::LBrace)
                    .unwrap_or(false);
                if next_is_brace && !self.suppress_struct_lit {
                    self.parse_struct_lit()
                } else {
                    Ok(CstNode::Var(self.bump()))
                }
            }
            _ => Err(BuildError {
                position: self.pos,
                expected: "an expression".to_string(),
            }),
        }
    }

    fn parse_branch(&mut self) -> R<CstNode> {
        let kw = self.expect(TokenKind::KwIf)?;
        let span = Span::from_token(&kw);
        let cond = self.with_struct_lit_allowed(|b| b.parse_expr())?;
        self.expect(TokenKind::KwThen)?;
        let then = self.with_struct_lit_allowed(|b| b.parse_expr())?;
        self.expect(TokenKind::KwElse)?;
        let or_else = self.with_struct_lit_allowed(|b| b.parse_expr())?;
        Ok(CstNode::Branch(
            Box::new(cond),
            Box::new(then),
            Box::new(or_else),
            span,
        ))
    }

    fn parse_struct_lit(&mut self) -> R<CstNode> {
        let name = self.expect(TokenKind::Ident)?;
        let span = Span::from_token(&name);
        self.expect(TokenKind::LBrace)?;
        let mut fields = Vec::new();
        if !self.at(TokenKind::RBrace) {
            fields.push(self.parse_field_init()?);
            while self.at(TokenKind::Comma) {
                self.bump();
                if self.at(TokenKind::RBrace) {
                    break;
                }
                fields.push(self.parse_field_init()?);
            }
        }
        self.expect(TokenKind::RBrace)?;
        Ok(CstNode::StructLit(name, fields, span))
    }

    fn parse_field_init(&mut self) -> R<FieldInit> {
        let name = self.expect(TokenKind::Ident)?;
        self.expect(TokenKind::Colon)?;
        let value = self.with_struct_lit_allowed(|b| b.parse_expr())?;
        Ok(FieldInit { name, value })
    }
}

/// Parse a string literal token's text into its literal value, applying
/// the grammar's escape set.
pub fn string_literal_value(token: &Token) -> String {
    unescape_string(&token.text)
}
