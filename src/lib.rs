//! A parser-generator toolkit: given a context-free grammar, builds a
//! lexical analyzer, a syntactic analyzer (LL(1), SLR(1), CLR(1), or
//! LALR(1)), and a syntax-directed translator, composed end to end by
//! [Frontend](crate::frontend::Frontend).
//!
//! # Overview
//!
//! The pipeline runs leaves-first: a [Grammar](crate::grammar::Grammar) models
//! terminals, non-terminals, and productions, and derives FIRST/FOLLOW and
//! left-recursion/left-factoring/epsilon/unit-production rewrites. The
//! [automaton] module provides the generic NFA/DFA machinery ([lr] builds LR
//! item automata on top of it). A regex-driven, multi-state [lexer] turns
//! source text into a token stream. [lr] and [grammar]'s LL(1) table
//! construction turn a grammar into a parse table; [parser] drives that
//! table against a token stream to produce a parse tree. [translator]
//! evaluates an attribute grammar over that tree to reduce it to an
//! intermediate representation.
//!
//! # Example
//!
//! ```
//! use forest_pt::frontend::{FrontendBuilder, ParserStrategy};
//! use forest_pt::grammar::Grammar;
//! use forest_pt::lexer::Lexer;
//!
//! let grammar = Grammar::parse("S -> a S | b ;").unwrap();
//! let lexer = Lexer::compile("^a %token a\n^b %token b\n").unwrap();
//! let frontend = FrontendBuilder::new(grammar, lexer)
//!     .strategy(ParserStrategy::Lalr)
//!     .build()
//!     .unwrap();
//! let tree = frontend.parse("aaab").unwrap();
//! assert_eq!(tree.lexeme_sequence(), vec!["a", "a", "a", "b"]);
//! ```
//!
//! # License
//! [forest_pt](crate) is provided under the MIT license.

pub mod automaton;
pub mod frontend;
pub mod grammar;
pub mod lexer;
pub mod lr;
pub mod parser;
pub mod translator;
pub mod util;

#[derive(Debug)]
/// A syntax error raised while eagerly lexing input: the byte offset of the
/// failure and a human-readable message (§7 "Lex error (eager)").
pub struct ParseError {
    pub pointer: usize,
    pub message: String,
}

impl ParseError {
    pub fn new(pointer: usize, message: String) -> Self {
        Self { pointer, message }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SyntaxError: {}", self.message)
    }
}

impl std::error::Error for ParseError {}
