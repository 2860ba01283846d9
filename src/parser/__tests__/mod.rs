use crate::grammar::Grammar;
use crate::lexer::{Token, TokenClass, TokenStream};
use crate::lr::{build_clr, build_slr};
use crate::util::Position;
use std::borrow::Cow;

/// A token stream fed from a fixed list of class names, for grammar-level
/// driver tests that don't need a real lexer.
struct VecTokenStream {
    classes: Vec<String>,
    cursor: usize,
}

impl VecTokenStream {
    fn new(classes: &[&str]) -> Self {
        Self {
            classes: classes.iter().map(|s| s.to_string()).collect(),
            cursor: 0,
        }
    }

    fn token_at(&self, index: usize) -> Token<'static> {
        let class = self
            .classes
            .get(index)
            .cloned()
            .unwrap_or_else(|| "$".to_string());
        Token {
            class: TokenClass::new(class.clone()),
            lexeme: Cow::Owned(class),
            position: Position::new(1, index + 1),
            line: "",
        }
    }
}

impl<'c> TokenStream<'c> for VecTokenStream {
    fn next(&mut self) -> Token<'c> {
        let token = self.token_at(self.cursor);
        if self.cursor < self.classes.len() {
            self.cursor += 1;
        }
        token
    }

    fn peek(&mut self) -> Token<'c> {
        self.token_at(self.cursor)
    }
}

#[test]
fn ll1_expression_grammar_accepts_and_shapes_tree() {
    // S1: S -> T X ; T -> ( S ) | int Y ; X -> + S | ε ; Y -> * T | ε ;
    let grammar =
        Grammar::parse("S -> T X ; T -> ( S ) | int Y ; X -> + S | ε ; Y -> * T | ε ;").unwrap();
    let table = grammar.ll1_table().unwrap();
    let mut stream = VecTokenStream::new(&["int", "*", "int"]);

    let tree = super::drive_ll1(&grammar, &table, &mut stream).unwrap();
    assert_eq!(tree.symbol(), "S");
    assert_eq!(tree.children().len(), 2);
    assert_eq!(tree.children()[0].symbol(), "T");
    assert_eq!(tree.children()[1].symbol(), "X");
    let x = &tree.children()[1];
    assert_eq!(x.children().len(), 1);
    assert_eq!(x.children()[0].symbol(), "ε");
}

#[test]
fn slr_expression_grammar_with_ambiguity_resolution_accepts() {
    // S2: E -> E + T | T ; T -> T * F | F ; F -> ( E ) | id ;
    let grammar = Grammar::parse("E -> E + T | T ; T -> T * F | F ; F -> ( E ) | id ;").unwrap();
    let table = build_slr(&grammar, true).unwrap();
    let mut stream = VecTokenStream::new(&["id", "*", "id", "+", "id"]);
    let tree = super::drive_lr(&grammar, &table, &mut stream, None).unwrap();
    assert_eq!(tree.symbol(), "E");
    // Right-grouped sum: E -> E + T, so the top-level split is (id*id) + id.
    assert_eq!(tree.children().len(), 3);
    assert_eq!(tree.children()[0].symbol(), "E");
    assert_eq!(tree.children()[2].symbol(), "T");
}

#[test]
fn clr_canonical_example_has_ten_states() {
    // S3: S -> C C ; C -> c C | d ;
    let grammar = Grammar::parse("S -> C C ; C -> c C | d ;").unwrap();
    let table = build_clr(&grammar).unwrap();
    assert_eq!(table.states().len(), 10);

    let mut stream = VecTokenStream::new(&["c", "d", "d"]);
    let tree = super::drive_lr(&grammar, &table, &mut stream, None).unwrap();
    assert_eq!(tree.symbol(), "S");
    assert_eq!(tree.lexeme_sequence(), vec!["c", "d", "d"]);
}

#[test]
fn lr_error_reports_expected_terminals_and_human_names() {
    // S5: grammar S3 with input `c $`.
    let grammar = Grammar::parse("S -> C C ; C -> c C | d ;").unwrap();
    let table = build_clr(&grammar).unwrap();
    let mut stream = VecTokenStream::new(&["c"]);
    let err = super::drive_lr(&grammar, &table, &mut stream, None).unwrap_err();
    assert_eq!(err.message, "expected a 'c' or a 'd'; got end of input");
}
