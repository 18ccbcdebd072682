//! Diagnostic collection and rendering.
//!
//! A `Range` is 0-based line/column with a byte `length`, built from a
//! lexer [`Token`] or a [`crate::cst::Span`]. Diagnostics accumulate in a
//! [`Diagnostics`] batch across a compilation unit rather than aborting on
//! the first error, so the renderer can report everything wrong with a
//! program in one pass.

use annotate_snippets::{Level, Renderer, Snippet};
use onyoc_core::Colors;

use crate::cst::Span as CstSpan;
use crate::lexer::Token;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    pub line: u32,
    pub column: u32,
    pub length: u32,
}

impl Range {
    pub fn from_token(token: &Token) -> Self {
        Self {
            line: token.line - 1,
            column: token.column - 1,
            length: token.length,
        }
    }

    pub fn from_cst_span(span: CstSpan) -> Self {
        Self {
            line: span.line - 1,
            column: span.column - 1,
            length: span.length,
        }
    }

    /// Byte offset of this range's start within `source`.
    fn byte_offset(&self, source: &str) -> usize {
        let mut offset = 0usize;
        for (i, line) in source.split('\n').enumerate() {
            if i as u32 == self.line {
                let col = self.column as usize;
                return offset + line.char_indices().nth(col).map(|(b, _)| b).unwrap_or(line.len());
            }
            offset += line.len() + 1;
        }
        offset
    }
}

#[derive(Debug, Clone)]
pub struct Suggestion {
    pub message: String,
    pub range: Range,
    pub replacement: String,
}

#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub message: String,
    pub range: Option<Range>,
    pub typo: Option<String>,
    pub suggestion: Option<Suggestion>,
}

impl Diagnostic {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            range: None,
            typo: None,
            suggestion: None,
        }
    }

    pub fn at(mut self, range: Range) -> Self {
        self.range = Some(range);
        self
    }

    pub fn with_typo(mut self, typo: impl Into<String>) -> Self {
        self.typo = Some(typo.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: Suggestion) -> Self {
        self.suggestion = Some(suggestion);
        self
    }
}

/// Accumulates diagnostics for a single compilation unit.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    pub errors: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.errors.push(diagnostic);
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.errors.extend(other.errors);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Render every diagnostic plus a trailing `generated N errors`
    /// summary, in `path`'s source text.
    pub fn render(&self, path: &str, source: &str, colors: Colors) -> String {
        let mut out = String::new();
        for diagnostic in &self.errors {
            out.push_str(&render_one(diagnostic, path, source));
            out.push('\n');
        }
        let (bold_red, reset) = if colors.is_enabled() {
            ("\x1b[1m\x1b[91m", colors.reset)
        } else {
            ("", "")
        };
        out.push_str(&format!(
            "{bold_red}generated {} error{}{reset}\n",
            self.errors.len(),
            if self.errors.len() == 1 { "" } else { "s" },
        ));
        out
    }
}

fn render_one(diagnostic: &Diagnostic, path: &str, source: &str) -> String {
    let level = Level::Error;
    let mut title = level.title(&diagnostic.message);

    if let Some(range) = diagnostic.range {
        let start = range.byte_offset(source);
        let end = start + range.length.max(1) as usize;
        let label = diagnostic
            .typo
            .as_ref()
            .map(|t| format!("did you mean `{t}`?"))
            .unwrap_or_default();
        let origin = format!("{path}:{}:{}", range.line + 1, range.column + 1);
        title = title.snippet(
            Snippet::source(source)
                .line_start(1)
                .origin(&origin)
                .fold(true)
                .annotation(Level::Error.span(start..end).label(&label)),
        );
    }

    if let Some(suggestion) = &diagnostic.suggestion {
        let start = suggestion.range.byte_offset(source);
        let end = start + suggestion.replacement.len();
        title = title.footer(
            Level::Help
                .title(&suggestion.message)
                .snippet(Snippet::source(&suggestion.replacement).line_start(suggestion.range.line + 1).fold(true).annotation(Level::Help.span(0..(end - start)).label(""))),
        );
    }

    let renderer = Renderer::styled();
    renderer.render(title).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_offset_finds_second_line() {
        let range = Range { line: 1, column: 2, length: 1 };
        let offset = range.byte_offset("ab\ncdef\n");
        assert_eq!(offset, 3 + 2);
    }

    #[test]
    fn summary_counts_errors() {
        let mut d = Diagnostics::new();
        d.push(Diagnostic::new("oops"));
        d.push(Diagnostic::new("oops again"));
        let rendered = d.render("f.onyo", "main() {}", Colors::OFF);
        assert!(rendered.contains("generated 2 errors"));
    }
}
