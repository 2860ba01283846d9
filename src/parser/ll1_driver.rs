//! The top-down LL(1) parser driver (§4.4): a symbol stack paired with a
//! parse-tree-node stack, driven by a predictive table.

use super::tree::{Leaf, Tree};
use crate::grammar::{Grammar, Ll1Table, EPSILON, END};
use crate::lexer::TokenStream;
use crate::util::Position;
use std::fmt::{self, Display, Formatter};

/// A syntax error raised by the LL(1) driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LlParseError {
    /// The table has no entry for `(non_terminal, token_class)`.
    NoEntry {
        non_terminal: String,
        token_class: String,
        position: Position,
    },
    /// The stack top is a terminal that does not match the next token.
    TerminalMismatch {
        expected: String,
        got: String,
        position: Position,
    },
}

impl Display for LlParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            LlParseError::NoEntry { non_terminal, token_class, position } => write!(
                f,
                "SyntaxError: cannot place token '{}' while expanding '{}' at {}",
                token_class, non_terminal, position
            ),
            LlParseError::TerminalMismatch { expected, got, position } => write!(
                f,
                "SyntaxError: expected '{}', got '{}' at {}",
                expected, got, position
            ),
        }
    }
}

impl std::error::Error for LlParseError {}

enum StackItem {
    Symbol(String),
    Build { symbol: String, arity: usize },
}

/// Drive `table` against `stream` starting from `grammar`'s start symbol,
/// producing a parse tree.
pub fn drive<'c>(
    grammar: &Grammar,
    table: &Ll1Table,
    stream: &mut dyn TokenStream<'c>,
) -> Result<Tree, LlParseError> {
    let mut stack: Vec<StackItem> = vec![
        StackItem::Symbol(END.to_string()),
        StackItem::Symbol(grammar.start().to_string()),
    ];
    let mut trees: Vec<Tree> = Vec::new();
    let mut lookahead = stream.next();

    loop {
        let item = stack.pop().expect("driver exits via accept before the stack empties");
        match item {
            StackItem::Build { symbol, arity } => {
                let start = trees.len() - arity;
                let children = trees.split_off(start);
                trees.push(Tree::non_terminal(symbol, children));
            }
            StackItem::Symbol(symbol) if symbol == END => {
                debug_assert!(lookahead.is_eof(), "table guarantees $ is only reached at eof");
                debug_assert_eq!(trees.len(), 1);
                return Ok(trees.pop().unwrap());
            }
            StackItem::Symbol(symbol) if grammar.is_non_terminal(&symbol) => {
                // Translate the lexer's reserved eof class to the grammar's
                // reserved "$" terminal at the driver boundary.
                let class = if lookahead.is_eof() {
                    END
                } else {
                    lookahead.class.as_str()
                };
                let Some(production) = table.get(&symbol, class) else {
                    return Err(LlParseError::NoEntry {
                        non_terminal: symbol,
                        token_class: class.to_string(),
                        position: lookahead.position,
                    });
                };
                if production.is_epsilon() {
                    let epsilon_leaf = Tree::terminal(Leaf {
                        class: EPSILON.to_string(),
                        lexeme: EPSILON.to_string(),
                        position: lookahead.position,
                        line: lookahead.line.to_string(),
                    });
                    trees.push(Tree::non_terminal(symbol, vec![epsilon_leaf]));
                } else {
                    let body = production.symbols().to_vec();
                    stack.push(StackItem::Build {
                        symbol,
                        arity: body.len(),
                    });
                    for s in body.into_iter().rev() {
                        stack.push(StackItem::Symbol(s));
                    }
                }
            }
            StackItem::Symbol(symbol) => {
                // A terminal: it must match the lookahead exactly.
                let got_class = if lookahead.is_eof() { END } else { lookahead.class.as_str() };
                if symbol != got_class {
                    return Err(LlParseError::TerminalMismatch {
                        expected: symbol,
                        got: got_class.to_string(),
                        position: lookahead.position,
                    });
                }
                trees.push(Tree::terminal(Leaf::from(&lookahead)));
                lookahead = stream.next();
            }
        }
    }
}
