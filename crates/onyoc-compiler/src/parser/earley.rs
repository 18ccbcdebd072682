//! A chart-based Earley recognizer.
//!
//! This does recognition only: it answers "does this token stream derive
//! from `start`?" and, on failure, reports the furthest position the chart
//! made progress along with the terminals that would have continued a
//! derivation there. Because [`super::grammar`] stratifies the onyo
//! grammar by precedence it is unambiguous, so [`super::build`] can
//! recover the unique parse tree with a plain recursive-descent pass once
//! recognition succeeds, rather than extracting a shared packed forest.

use std::collections::HashSet;

use crate::lexer::{Token, TokenKind};
use crate::parser::grammar::{NonTerm, Rule, Sym};

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
struct Item {
    rule: usize,
    dot: usize,
    origin: usize,
}

#[derive(Debug)]
pub struct ParseFailure {
    pub position: usize,
    pub expected: Vec<TokenKind>,
}

fn add(pos: usize, item: Item, chart: &mut [Vec<Item>], seen: &mut [HashSet<Item>]) {
    if seen[pos].insert(item) {
        chart[pos].push(item);
    }
}

/// Run the Earley recognizer over `tokens`, validating that they derive
/// from `start`. Returns `Ok(())` on success or a [`ParseFailure`]
/// describing the furthest point of progress on failure.
pub fn recognize(tokens: &[Token], rules: &[Rule], start: NonTerm) -> Result<(), ParseFailure> {
    let n = tokens.len();
    let mut chart: Vec<Vec<Item>> = vec![Vec::new(); n + 1];
    let mut seen: Vec<HashSet<Item>> = vec![HashSet::new(); n + 1];
    let mut last_scan_pos = 0usize;

    for (i, r) in rules.iter().enumerate() {
        if r.lhs == start {
            add(0, Item { rule: i, dot: 0, origin: 0 }, &mut chart, &mut seen);
        }
    }

    for pos in 0..=n {
        let mut idx = 0;
        while idx < chart[pos].len() {
            let item = chart[pos][idx];
            idx += 1;
            let rule = &rules[item.rule];
            if item.dot == rule.rhs.len() {
                let lhs = rule.lhs;
                let candidates: Vec<Item> = chart[item.origin]
                    .iter()
                    .filter(|it| {
                        let r2 = &rules[it.rule];
                        it.dot < r2.rhs.len() && r2.rhs[it.dot] == Sym::NonTerm(lhs)
                    })
                    .copied()
                    .collect();
                for cand in candidates {
                    add(
                        pos,
                        Item {
                            rule: cand.rule,
                            dot: cand.dot + 1,
                            origin: cand.origin,
                        },
                        &mut chart,
                        &mut seen,
                    );
                }
            } else if let Sym::NonTerm(nt) = rule.rhs[item.dot] {
                for (i, r2) in rules.iter().enumerate() {
                    if r2.lhs == nt {
                        add(
                            pos,
                            Item { rule: i, dot: 0, origin: pos },
                            &mut chart,
                            &mut seen,
                        );
                    }
                }
            }
        }

        if pos < n {
            let tok_kind = tokens[pos].kind;
            let mut scanned_any = false;
            let current: Vec<Item> = chart[pos].clone();
            for item in current {
                let rule = &rules[item.rule];
                if item.dot < rule.rhs.len() {
                    if let Sym::Term(k) = rule.rhs[item.dot] {
                        if k == tok_kind {
                            add(
                                pos + 1,
                                Item {
                                    rule: item.rule,
                                    dot: item.dot + 1,
                                    origin: item.origin,
                                },
                                &mut chart,
                                &mut seen,
                            );
                            scanned_any = true;
                        }
                    }
                }
            }
            if scanned_any {
                last_scan_pos = pos + 1;
            }
        }
    }

    let ok = chart[n].iter().any(|it| {
        let r = &rules[it.rule];
        r.lhs == start && it.dot == r.rhs.len() && it.origin == 0
    });
    if ok {
        return Ok(());
    }

    let mut expected = Vec::new();
    for item in &chart[last_scan_pos] {
        let rule = &rules[item.rule];
        if item.dot < rule.rhs.len() {
            if let Sym::Term(k) = rule.rhs[item.dot] {
                if !expected.contains(&k) {
                    expected.push(k);
                }
            }
        }
    }
    Err(ParseFailure {
        position: last_scan_pos,
        expected,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex;
    use crate::parser::grammar::{rules, NonTerm};

    #[test]
    fn minimal_program_recognizes() {
        let tokens = lex("main() {}").unwrap();
        let grammar = rules();
        assert!(recognize(&tokens, &grammar, NonTerm::Start).is_ok());
    }

    #[test]
    fn unbalanced_brace_fails_with_furthest_progress() {
        let tokens = lex("main() {").unwrap();
        let grammar = rules();
        let err = recognize(&tokens, &grammar, NonTerm::Start).unwrap_err();
        assert_eq!(err.position, tokens.len());
    }
}
