//! The onyo grammar, stratified by operator precedence so that the chart
//! built by [`crate::parser::earley`] is unambiguous. This is the
//! production list transcribed from onyo's original operator-soup `expr`
//! rule, rewritten as the standard precedence-climbing cascade (`or` looser
//! than `and`, looser than comparisons, ..., looser than unary, looser than
//! postfix) so that a single parse is always recoverable instead of lark's
//! default ambiguity-pack resolution.

use crate::lexer::TokenKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NonTerm {
    Start,
    DeclList,
    Decl,
    Func,
    StructDef,
    MemberList,
    Member,
    IdentList,
    Block,
    ExecList,
    Exec,
    Assign,
    While,
    DoWhile,
    ForLoop,
    If,
    ElifList,
    ElifClause,
    Ret,
    EvalStmt,
    ExprStmt,
    Expr,
    OrExpr,
    AndExpr,
    EqExpr,
    RelExpr,
    ShiftExpr,
    BitOrExpr,
    BitXorExpr,
    BitAndExpr,
    AddExpr,
    MulExpr,
    UnaryExpr,
    Postfix,
    Atom,
    Branch,
    StructLit,
    FieldInitList,
    FieldInit,
    List,
    ExprList,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sym {
    Term(TokenKind),
    NonTerm(NonTerm),
}

pub struct Rule {
    pub lhs: NonTerm,
    pub rhs: Vec<Sym>,
}

fn t(k: TokenKind) -> Sym {
    Sym::Term(k)
}
fn n(nt: NonTerm) -> Sym {
    Sym::NonTerm(nt)
}

/// The full rule table. Rule order within an LHS doubles as the priority
/// lark's default earley ambiguity resolution would have applied; since
/// this grammar is unambiguous by construction the order only matters for
/// the diagnostic "expected one of" listing (earlier alternatives first).
pub fn rules() -> Vec<Rule> {
    use NonTerm::*;
    use TokenKind::*;

    vec![
        Rule { lhs: Start, rhs: vec![n(DeclList)] },
        Rule { lhs: DeclList, rhs: vec![n(DeclList), n(Decl)] },
        Rule { lhs: DeclList, rhs: vec![] },
        Rule { lhs: Decl, rhs: vec![n(Func)] },
        Rule { lhs: Decl, rhs: vec![n(StructDef)] },
        Rule {
            lhs: Func,
            rhs: vec![t(Ident), t(LParen), n(IdentList), t(RParen), n(Block)],
        },
        Rule {
            lhs: StructDef,
            rhs: vec![t(KwStruct), t(Ident), t(LBrace), n(MemberList), t(RBrace)],
        },
        Rule { lhs: MemberList, rhs: vec![n(MemberList), n(Member)] },
        Rule { lhs: MemberList, rhs: vec![] },
        Rule { lhs: Member, rhs: vec![t(Ident)] },
        Rule { lhs: Member, rhs: vec![n(Func)] },
        Rule { lhs: IdentList, rhs: vec![t(Ident)] },
        Rule { lhs: IdentList, rhs: vec![n(IdentList), t(Comma), t(Ident)] },
        Rule { lhs: IdentList, rhs: vec![] },
        Rule { lhs: Block, rhs: vec![t(LBrace), n(ExecList), t(RBrace)] },
        Rule { lhs: ExecList, rhs: vec![n(ExecList), n(Exec)] },
        Rule { lhs: ExecList, rhs: vec![] },
        Rule { lhs: Exec, rhs: vec![n(Assign)] },
        Rule { lhs: Exec, rhs: vec![n(While)] },
        Rule { lhs: Exec, rhs: vec![n(DoWhile)] },
        Rule { lhs: Exec, rhs: vec![n(ForLoop)] },
        Rule { lhs: Exec, rhs: vec![n(If)] },
        Rule { lhs: Exec, rhs: vec![n(Ret)] },
        Rule { lhs: Exec, rhs: vec![n(EvalStmt)] },
        Rule { lhs: Exec, rhs: vec![n(ExprStmt)] },
        Rule { lhs: NonTerm::Assign, rhs: vec![n(Postfix), t(TokenKind::Assign), n(Expr)] },
        Rule { lhs: While, rhs: vec![t(KwWhile), n(Expr), n(Block)] },
        Rule { lhs: DoWhile, rhs: vec![t(KwDo), n(Block), t(KwWhile), n(Expr)] },
        Rule {
            lhs: ForLoop,
            rhs: vec![t(KwFor), t(Ident), t(KwIn), n(Expr), n(Block)],
        },
        Rule {
            lhs: If,
            rhs: vec![
                t(KwIf),
                n(Expr),
                n(Block),
                n(ElifList),
                t(KwElse),
                n(Block),
            ],
        },
        Rule {
            lhs: If,
            rhs: vec![t(KwIf), n(Expr), n(Block), n(ElifList)],
        },
        Rule { lhs: ElifList, rhs: vec![n(ElifList), n(ElifClause)] },
        Rule { lhs: ElifList, rhs: vec![] },
        Rule {
            lhs: ElifClause,
            rhs: vec![t(KwElif), n(Expr), n(Block)],
        },
        Rule { lhs: Ret, rhs: vec![t(KwReturn), n(Expr)] },
        Rule { lhs: EvalStmt, rhs: vec![t(KwEval), n(Expr)] },
        Rule { lhs: ExprStmt, rhs: vec![n(Postfix)] },
        Rule { lhs: Expr, rhs: vec![n(OrExpr)] },
        Rule { lhs: OrExpr, rhs: vec![n(OrExpr), t(KwOr), n(AndExpr)] },
        Rule { lhs: OrExpr, rhs: vec![n(AndExpr)] },
        Rule { lhs: AndExpr, rhs: vec![n(AndExpr), t(KwAnd), n(EqExpr)] },
        Rule { lhs: AndExpr, rhs: vec![n(EqExpr)] },
        Rule { lhs: EqExpr, rhs: vec![n(EqExpr), t(EqEq), n(RelExpr)] },
        Rule { lhs: EqExpr, rhs: vec![n(EqExpr), t(NotEq), n(RelExpr)] },
        Rule { lhs: EqExpr, rhs: vec![n(EqExpr), t(KwIs), n(RelExpr)] },
        Rule { lhs: EqExpr, rhs: vec![n(RelExpr)] },
        Rule { lhs: RelExpr, rhs: vec![n(RelExpr), t(Lt), n(ShiftExpr)] },
        Rule { lhs: RelExpr, rhs: vec![n(RelExpr), t(Gt), n(ShiftExpr)] },
        Rule { lhs: RelExpr, rhs: vec![n(RelExpr), t(Leq), n(ShiftExpr)] },
        Rule { lhs: RelExpr, rhs: vec![n(RelExpr), t(Geq), n(ShiftExpr)] },
        Rule { lhs: RelExpr, rhs: vec![n(ShiftExpr)] },
        Rule { lhs: ShiftExpr, rhs: vec![n(ShiftExpr), t(Shl), n(BitOrExpr)] },
        Rule { lhs: ShiftExpr, rhs: vec![n(ShiftExpr), t(Shr), n(BitOrExpr)] },
        Rule { lhs: ShiftExpr, rhs: vec![n(BitOrExpr)] },
        Rule { lhs: BitOrExpr, rhs: vec![n(BitOrExpr), t(Pipe), n(BitXorExpr)] },
        Rule { lhs: BitOrExpr, rhs: vec![n(BitXorExpr)] },
        Rule { lhs: BitXorExpr, rhs: vec![n(BitXorExpr), t(Caret), n(BitAndExpr)] },
        Rule { lhs: BitXorExpr, rhs: vec![n(BitAndExpr)] },
        Rule { lhs: BitAndExpr, rhs: vec![n(BitAndExpr), t(Amp), n(AddExpr)] },
        Rule { lhs: BitAndExpr, rhs: vec![n(AddExpr)] },
        Rule { lhs: AddExpr, rhs: vec![n(AddExpr), t(Plus), n(MulExpr)] },
        Rule { lhs: AddExpr, rhs: vec![n(AddExpr), t(Minus), n(MulExpr)] },
        Rule { lhs: AddExpr, rhs: vec![n(MulExpr)] },
        Rule { lhs: MulExpr, rhs: vec![n(MulExpr), t(Star), n(UnaryExpr)] },
        Rule { lhs: MulExpr, rhs: vec![n(MulExpr), t(Slash), n(UnaryExpr)] },
        Rule { lhs: MulExpr, rhs: vec![n(MulExpr), t(Percent), n(UnaryExpr)] },
        Rule { lhs: MulExpr, rhs: vec![n(UnaryExpr)] },
        Rule { lhs: UnaryExpr, rhs: vec![t(Tilde), n(UnaryExpr)] },
        Rule { lhs: UnaryExpr, rhs: vec![t(KwNot), n(UnaryExpr)] },
        Rule { lhs: UnaryExpr, rhs: vec![t(Minus), n(UnaryExpr)] },
        Rule { lhs: UnaryExpr, rhs: vec![n(Postfix)] },
        Rule {
            lhs: Postfix,
            rhs: vec![n(Postfix), t(LBracket), n(Expr), t(RBracket)],
        },
        Rule { lhs: Postfix, rhs: vec![n(Postfix), t(Dot), t(Ident)] },
        Rule {
            lhs: Postfix,
            rhs: vec![n(Postfix), t(LParen), n(ExprList), t(RParen)],
        },
        Rule { lhs: Postfix, rhs: vec![n(Atom)] },
        Rule { lhs: Atom, rhs: vec![t(Nil)] },
        Rule { lhs: Atom, rhs: vec![t(True)] },
        Rule { lhs: Atom, rhs: vec![t(False)] },
        Rule { lhs: Atom, rhs: vec![t(Int)] },
        Rule { lhs: Atom, rhs: vec![t(Float)] },
        Rule { lhs: Atom, rhs: vec![t(Str)] },
        Rule { lhs: Atom, rhs: vec![t(Ident)] },
        Rule { lhs: Atom, rhs: vec![n(StructLit)] },
        Rule { lhs: Atom, rhs: vec![n(List)] },
        Rule { lhs: Atom, rhs: vec![n(Branch)] },
        Rule { lhs: Atom, rhs: vec![t(LParen), n(Expr), t(RParen)] },
        Rule {
            lhs: Branch,
            rhs: vec![t(KwIf), n(Expr), t(KwThen), n(Expr), t(KwElse), n(Expr)],
        },
        Rule {
            lhs: StructLit,
            rhs: vec![t(Ident), t(LBrace), n(FieldInitList), t(RBrace)],
        },
        Rule { lhs: FieldInitList, rhs: vec![n(FieldInit)] },
        Rule {
            lhs: FieldInitList,
            rhs: vec![n(FieldInitList), t(Comma), n(FieldInit)],
        },
        Rule { lhs: FieldInitList, rhs: vec![] },
        Rule {
            lhs: FieldInit,
            rhs: vec![t(Ident), t(Colon), n(Expr)],
        },
        Rule { lhs: List, rhs: vec![t(LBracket), n(ExprList), t(RBracket)] },
        Rule { lhs: ExprList, rhs: vec![n(Expr)] },
        Rule { lhs: ExprList, rhs: vec![n(ExprList), t(Comma), n(Expr)] },
        Rule { lhs: ExprList, rhs: vec![] },
    ]
}
