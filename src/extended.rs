use crate::error::{YagaError, YagaResult};
use crate::grammar::{Grammar, Production};
use crate::symbol::Symbol;

const ARROW: &str = "=>";
const ALTERNATION: &str = "|";
const STAR: &str = "*";
const ESCAPE: char = '\\';

/// A production carried through desugaring with the 1-based input line it
/// came from, so every diagnostic can name its line.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Sourced {
    line: usize,
    lhs: String,
    rhs: Vec<String>,
}

/// Desugar the extended `.cfg1` surface form into a plain grammar.
///
/// Each non-blank line is `lhs => alt | alt | …`. Recognised meta-tokens,
/// all whitespace-delimited: `=>` (exactly one, right after the lhs), `|`
/// (alternation; n separators make n+1 alternatives, any of which may be
/// empty), `*` (Kleene star over the single preceding symbol), and a
/// leading `\` that escapes the next character so `\*`, `\|` and `\=>` can
/// be ordinary symbols. `X *` desugars once across the whole input to a
/// fresh `X_star_seq` nonterminal with productions
/// `X_star_seq -> X X_star_seq` and `X_star_seq -> ε`. Escapes are
/// stripped from every token after star desugaring.
pub fn desugar(input: &str) -> YagaResult<Grammar> {
    let mut sourced = Vec::new();
    for (index, text) in input.lines().enumerate() {
        let line = index + 1;
        let mut tokens = text.split_whitespace();
        let Some(lhs) = tokens.next() else {
            continue;
        };
        if matches!(lhs, ARROW | ALTERNATION | STAR) {
            return Err(YagaError::MetaLhs {
                line,
                token: lhs.to_string(),
            });
        }
        if tokens.next() != Some(ARROW) {
            return Err(YagaError::MissingArrow { line });
        }

        let mut rhs = Vec::new();
        for token in tokens {
            if token == ALTERNATION {
                sourced.push(Sourced {
                    line,
                    lhs: lhs.to_string(),
                    rhs: std::mem::take(&mut rhs),
                });
            } else {
                rhs.push(token.to_string());
            }
        }
        sourced.push(Sourced {
            line,
            lhs: lhs.to_string(),
            rhs,
        });
    }

    let mut desugared: Vec<Sourced> = Vec::new();
    for p in sourced {
        if p.rhs.iter().any(|t| t == STAR) {
            for generated in split_star(p)? {
                // Repeating `X *` elsewhere in the input regenerates the
                // same productions; keep the first copy only.
                let seen = desugared
                    .iter()
                    .any(|q| q.lhs == generated.lhs && q.rhs == generated.rhs);
                if !seen {
                    desugared.push(generated);
                }
            }
        } else {
            desugared.push(p);
        }
    }

    let mut productions = Vec::new();
    for p in desugared {
        let lhs = strip_escapes(&p.lhs);
        if lhs.is_empty() {
            return Err(YagaError::EmptySymbol { line: p.line });
        }
        let mut rhs = Vec::new();
        for token in &p.rhs {
            let stripped = strip_escapes(token);
            if stripped.is_empty() {
                return Err(YagaError::EmptySymbol { line: p.line });
            }
            rhs.push(Symbol::new(stripped));
        }
        productions.push(Production::new(Symbol::new(lhs), rhs));
    }
    Ok(Grammar::new(productions))
}

/// Rewrite the one `X *` of a production into `X_star_seq` and emit the
/// two productions that unroll the repetition.
fn split_star(p: Sourced) -> YagaResult<[Sourced; 3]> {
    let star = p
        .rhs
        .iter()
        .position(|t| t == STAR)
        .unwrap_or(p.rhs.len());
    if star == 0 {
        return Err(YagaError::DanglingStar { line: p.line });
    }
    if p.rhs[star + 1..].iter().any(|t| t == STAR) {
        return Err(YagaError::RepeatedStar { line: p.line });
    }

    let repeated = p.rhs[star - 1].clone();
    let seq = format!("{repeated}_star_seq");

    let mut rhs = p.rhs;
    rhs[star - 1] = seq.clone();
    rhs.remove(star);

    Ok([
        Sourced {
            line: p.line,
            lhs: p.lhs,
            rhs,
        },
        Sourced {
            line: p.line,
            lhs: seq.clone(),
            rhs: vec![repeated, seq.clone()],
        },
        Sourced {
            line: p.line,
            lhs: seq,
            rhs: Vec::new(),
        },
    ])
}

/// Drop every escape character, keeping the character it protected.
fn strip_escapes(token: &str) -> String {
    let mut out = String::with_capacity(token.len());
    let mut chars = token.chars();
    while let Some(c) = chars.next() {
        if c == ESCAPE {
            if let Some(escaped) = chars.next() {
                out.push(escaped);
            }
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn production(lhs: &str, rhs: &[&str]) -> Production {
        Production::new(
            Symbol::from(lhs),
            rhs.iter().copied().map(Symbol::from).collect(),
        )
    }

    #[test]
    fn alternation_splits_a_line_into_productions() {
        let g = desugar("Expr => Term + Expr | Term\n").unwrap();
        assert_eq!(g.len(), 2);
        assert_eq!(g.get(0).unwrap(), &production("Expr", &["Term", "+", "Expr"]));
        assert_eq!(g.get(1).unwrap(), &production("Expr", &["Term"]));
    }

    #[test]
    fn empty_alternatives_are_epsilon_productions() {
        let g = desugar("A => a |\n").unwrap();
        assert_eq!(g.len(), 2);
        assert_eq!(g.get(1).unwrap(), &production("A", &[]));

        let lone = desugar("A =>\n").unwrap();
        assert_eq!(lone.len(), 1);
        assert!(lone.get(0).unwrap().is_epsilon());
    }

    #[test]
    fn star_desugars_through_a_fresh_seq_nonterminal() {
        let g = desugar("list => item list | item * | \\*\n").unwrap();
        let expected = [
            production("list", &["item", "list"]),
            production("list", &["item_star_seq"]),
            production("item_star_seq", &["item", "item_star_seq"]),
            production("item_star_seq", &[]),
            production("list", &["*"]),
        ];
        assert_eq!(g.len(), expected.len());
        for (i, p) in expected.iter().enumerate() {
            assert_eq!(g.get(i).unwrap(), p);
        }
    }

    #[test]
    fn a_star_is_desugared_once_across_the_input() {
        let g = desugar("a => x *\nb => x *\n").unwrap();
        let seq = Symbol::from("x_star_seq");
        assert_eq!(g.iter_by_lhs(&seq).count(), 2);
        assert_eq!(g.len(), 4);
    }

    #[test]
    fn escapes_let_meta_tokens_be_symbols() {
        let g = desugar("ops => \\=> | \\|\n").unwrap();
        assert_eq!(g.get(0).unwrap(), &production("ops", &["=>"]));
        assert_eq!(g.get(1).unwrap(), &production("ops", &["|"]));
    }

    #[test]
    fn malformed_lines_are_named() {
        assert_eq!(
            desugar("A => a\nB a b\n"),
            Err(YagaError::MissingArrow { line: 2 })
        );
        assert_eq!(
            desugar("=> => a\n"),
            Err(YagaError::MetaLhs {
                line: 1,
                token: "=>".to_string(),
            })
        );
        assert_eq!(
            desugar("A => * a\n"),
            Err(YagaError::DanglingStar { line: 1 })
        );
        assert_eq!(
            desugar("A => a * b *\n"),
            Err(YagaError::RepeatedStar { line: 1 })
        );
        assert_eq!(
            desugar("A => \\\n"),
            Err(YagaError::EmptySymbol { line: 1 })
        );
    }

    #[test]
    fn blank_lines_are_skipped() {
        let g = desugar("\nA => a\n   \nB => b\n").unwrap();
        assert_eq!(g.len(), 2);
    }
}
