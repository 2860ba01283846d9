//! The bottom-up shift-reduce parser driver (§4.6): a state stack, a token
//! stack, and a subtree stack, driven by a built [Table].

use super::tree::{Leaf, Tree};
use crate::grammar::{Grammar, END};
use crate::lexer::{Token, TokenStream};
use crate::lr::{Action, Table};
use crate::util::Position;
use std::fmt::{self, Display, Formatter};

/// A syntax error raised by the LR driver (§7): the offending token's
/// position, its human-readable name, and the human-readable list of
/// terminals that would have been accepted instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LrSyntaxError {
    pub position: Position,
    pub got: String,
    pub expected: Vec<String>,
    pub message: String,
}

impl Display for LrSyntaxError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "SyntaxError: {} at {}", self.message, self.position)
    }
}

impl std::error::Error for LrSyntaxError {}

/// Drive `table` against `stream`, producing a parse tree. `trace`, when
/// given, receives one string per shift/reduce/accept event (§4.6, §9).
pub fn drive<'c>(
    grammar: &Grammar,
    table: &Table,
    stream: &mut dyn TokenStream<'c>,
    mut trace: Option<&mut dyn FnMut(&str)>,
) -> Result<Tree, LrSyntaxError> {
    let mut state_stack: Vec<String> = vec![table.initial_state().to_string()];
    let mut token_stack: Vec<Token<'c>> = Vec::new();
    let mut subtree_stack: Vec<Tree> = Vec::new();
    let mut lookahead = stream.next();

    loop {
        let state = state_stack.last().unwrap().clone();
        // The lexer's reserved end-of-input class and the grammar's reserved
        // end-of-input terminal are named differently; translate at the
        // driver boundary so table lookups see the grammar's "$".
        let class = if lookahead.is_eof() {
            END.to_string()
        } else {
            lookahead.class.as_str().to_string()
        };

        match table.action(&state, &class) {
            Some(Action::Shift(next)) => {
                if let Some(f) = trace.as_deref_mut() {
                    f(&format!("shift '{}' -> state {}", class, next));
                }
                state_stack.push(next.clone());
                token_stack.push(lookahead);
                lookahead = stream.next();
            }
            Some(Action::Reduce(head, production)) => {
                if let Some(f) = trace.as_deref_mut() {
                    f(&format!("reduce {} -> {}", head, production));
                }
                let mut children = Vec::with_capacity(production.symbols().len());
                for symbol in production.symbols().iter().rev() {
                    if grammar.is_non_terminal(symbol) {
                        children.push(subtree_stack.pop().expect("subtree stack underflow"));
                    } else {
                        let token = token_stack.pop().expect("token stack underflow");
                        children.push(Tree::terminal(Leaf::from(&token)));
                    }
                    state_stack.pop();
                }
                children.reverse();
                subtree_stack.push(Tree::non_terminal(head.clone(), children));
                let top = state_stack.last().unwrap();
                let goto_state = table
                    .goto(top, &head)
                    .expect("a valid reduce always has a defined goto");
                state_stack.push(goto_state.to_string());
            }
            Some(Action::Accept) => {
                if let Some(f) = trace.as_deref_mut() {
                    f("accept");
                }
                return Ok(subtree_stack.pop().expect("accept leaves exactly one subtree"));
            }
            None => {
                let expected: Vec<String> = table
                    .expected_terminals(&state)
                    .into_iter()
                    .map(|t| describe_one(grammar.terminal_label(t).unwrap_or(t)))
                    .collect();
                let got = describe_one(grammar.terminal_label(&class).unwrap_or(&class));
                return Err(LrSyntaxError {
                    position: lookahead.position,
                    got: got.clone(),
                    expected: expected.clone(),
                    message: format!("expected {}; got {}", describe_list(&expected), got),
                });
            }
        }
    }
}

fn article_for(label: &str) -> &'static str {
    match label.chars().next().map(|c| c.to_ascii_lowercase()) {
        Some(c) if "aeiou".contains(c) => "an",
        _ => "a",
    }
}

/// Render one expected/actual terminal label, e.g. `a 'c'` or (for the
/// reserved end-of-input label, which reads as a phrase already) just the
/// label unquoted, e.g. `end of input`.
fn describe_one(label: &str) -> String {
    if label == "end of input" {
        label.to_string()
    } else {
        format!("{} '{}'", article_for(label), label)
    }
}

/// Join already-described labels with Oxford-comma + "or": `x`, `x or y`, or
/// `x, y, or z`.
fn describe_list(items: &[String]) -> String {
    match items {
        [] => "nothing".to_string(),
        [only] => only.clone(),
        [first, second] => format!("{} or {}", first, second),
        _ => {
            let (last, rest) = items.split_last().unwrap();
            format!("{}, or {}", rest.join(", "), last)
        }
    }
}
