//! Tokenizer for onyo source text.
//!
//! Line comments (`; ...`) and block comments (`<!-- ... -->`, non-greedy,
//! may span lines) are trivia and never reach the token stream, matching
//! the original grammar's `CPP_COMMENT`/`C_COMMENT` ignore rules.

use logos::Logos;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[logos(skip r"[ \t\r\n]+")]
#[logos(skip r";[^\n]*")]
#[logos(skip r"<!--([^-]|-[^-]|--[^>])*-->")]
pub enum TokenKind {
    #[token("nil")]
    Nil,
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[regex(r"[0-9]+", priority = 3)]
    Int,
    #[regex(r"[0-9]+\.[0-9]+")]
    Float,
    #[regex(r#""([^"\\]|\\.)*""#)]
    Str,
    #[token("ret")]
    KwReturn,
    #[token("eval")]
    KwEval,
    #[token("while")]
    KwWhile,
    #[token("do")]
    KwDo,
    #[token("for")]
    KwFor,
    #[token("struct")]
    KwStruct,
    #[token("in")]
    KwIn,
    #[token("if")]
    KwIf,
    #[token("then")]
    KwThen,
    #[token("elif")]
    KwElif,
    #[token("else")]
    KwElse,
    #[token("or")]
    KwOr,
    #[token("and")]
    KwAnd,
    #[token("is")]
    KwIs,
    #[token("not")]
    KwNot,
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Ident,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token(".")]
    Dot,
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("<=")]
    Leq,
    #[token(">=")]
    Geq,
    #[token("<<")]
    Shl,
    #[token(">>")]
    Shr,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("=")]
    Assign,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("&")]
    Amp,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("~")]
    Tilde,
}

impl TokenKind {
    /// A short human-readable label, used in "expected one of ..." diagnostics.
    pub fn label(self) -> &'static str {
        match self {
            TokenKind::Nil => "`nil`",
            TokenKind::True | TokenKind::False => "a boolean literal",
            TokenKind::Int => "an integer literal",
            TokenKind::Float => "a float literal",
            TokenKind::Str => "a string literal",
            TokenKind::KwReturn => "`ret`",
            TokenKind::KwEval => "`eval`",
            TokenKind::KwWhile => "`while`",
            TokenKind::KwDo => "`do`",
            TokenKind::KwFor => "`for`",
            TokenKind::KwStruct => "`struct`",
            TokenKind::KwIn => "`in`",
            TokenKind::KwIf => "`if`",
            TokenKind::KwThen => "`then`",
            TokenKind::KwElif => "`elif`",
            TokenKind::KwElse => "`else`",
            TokenKind::KwOr => "`or`",
            TokenKind::KwAnd => "`and`",
            TokenKind::KwIs => "`is`",
            TokenKind::KwNot => "`not`",
            TokenKind::Ident => "an identifier",
            TokenKind::LParen => "`(`",
            TokenKind::RParen => "`)`",
            TokenKind::LBrace => "`{`",
            TokenKind::RBrace => "`}`",
            TokenKind::LBracket => "`[`",
            TokenKind::RBracket => "`]`",
            TokenKind::Comma => "`,`",
            TokenKind::Colon => "`:`",
            TokenKind::Dot => "`.`",
            TokenKind::EqEq => "`==`",
            TokenKind::NotEq => "`!=`",
            TokenKind::Leq => "`<=`",
            TokenKind::Geq => "`>=`",
            TokenKind::Shl => "`<<`",
            TokenKind::Shr => "`>>`",
            TokenKind::Lt => "`<`",
            TokenKind::Gt => "`>`",
            TokenKind::Assign => "`=`",
            TokenKind::Pipe => "`|`",
            TokenKind::Caret => "`^`",
            TokenKind::Amp => "`&`",
            TokenKind::Plus => "`+`",
            TokenKind::Minus => "`-`",
            TokenKind::Star => "`*`",
            TokenKind::Slash => "`/`",
            TokenKind::Percent => "`%`",
            TokenKind::Tilde => "`~`",
        }
    }
}

/// A single lexed token with its 1-based source location.
#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: u32,
    pub column: u32,
    pub length: u32,
}

#[derive(Debug, thiserror::Error)]
#[error("unrecognized character at line {line}, column {column}")]
pub struct LexError {
    pub line: u32,
    pub column: u32,
}

/// Lex `source` into a flat token stream, tracking 1-based line/column as
/// we go. Trivia (whitespace, line comments, block comments) is skipped by
/// the `logos` lexer itself and never produces a `Token`.
pub fn lex(source: &str) -> Result<Vec<Token>, LexError> {
    let mut lexer = TokenKind::lexer(source);
    let mut tokens = Vec::new();
    let mut line = 1u32;
    let mut line_start = 0usize;

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        // Advance line/column tracking over any skipped trivia and the token itself.
        for (i, b) in source.as_bytes()[line_start..span.start].iter().enumerate() {
            if *b == b'\n' {
                line += 1;
                line_start += i + 1;
            }
        }
        let column = (span.start - line_start) as u32 + 1;

        match result {
            Ok(kind) => {
                let text = lexer.slice().to_string();
                let length = span.len() as u32;
                tokens.push(Token {
                    kind,
                    text,
                    line,
                    column,
                    length,
                });
                for (i, b) in source.as_bytes()[span.start..span.end].iter().enumerate() {
                    if *b == b'\n' {
                        line += 1;
                        line_start = span.start + i + 1;
                    }
                }
                line_start = line_start.max(line_start);
            }
            Err(()) => {
                return Err(LexError { line, column });
            }
        }
    }

    Ok(tokens)
}

/// Unescape a lexed string literal's raw text (including surrounding
/// quotes) per the grammar's escape set: `\"`, `\n`, `\t`, `\\`.
pub fn unescape_string(raw: &str) -> String {
    let inner = &raw[1..raw.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('"') => out.push('"'),
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some('\\') => out.push('\\'),
                Some(other) => {
                    out.push('\\');
                    out.push(other);
                }
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}
