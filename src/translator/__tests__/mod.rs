use super::{evaluate, evaluate_as, AttributeError, AttributeRef, Binding, Bindings};
use crate::grammar::Grammar;
use crate::lr::build_slr;
use crate::parser::drive_lr;
use crate::util::Position;
use crate::lexer::{Token, TokenClass, TokenStream};
use std::borrow::Cow;

struct VecTokenStream {
    classes: Vec<&'static str>,
    lexemes: Vec<&'static str>,
    cursor: usize,
}

impl VecTokenStream {
    fn new(classes: &[&'static str], lexemes: &[&'static str]) -> Self {
        Self {
            classes: classes.to_vec(),
            lexemes: lexemes.to_vec(),
            cursor: 0,
        }
    }

    fn token_at(&self, index: usize) -> Token<'static> {
        let class = self.classes.get(index).copied().unwrap_or("$");
        let lexeme = self.lexemes.get(index).copied().unwrap_or("$");
        Token {
            class: TokenClass::new(class.to_string()),
            lexeme: Cow::Borrowed(lexeme),
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

/// S6: E -> E + N | N ; N -> int ;
/// N.value = int.lexeme-as-integer ; E.value = E'.value + N.value | N.value.
fn sum_grammar_bindings() -> Bindings {
    let mut bindings = Bindings::new();
    bindings.add(Binding::new(
        "N",
        0,
        AttributeRef::new(0, "value"),
        vec![AttributeRef::new(1, "lexeme")],
        |sources| {
            let lexeme = sources[0].downcast_ref::<String>().unwrap();
            super::AttributeValue::new(lexeme.parse::<i64>().unwrap())
        },
    ));
    // E -> E + N (production index 0, alternatives in declaration order)
    bindings.add(Binding::new(
        "E",
        0,
        AttributeRef::new(0, "value"),
        vec![AttributeRef::new(1, "value"), AttributeRef::new(3, "value")],
        |sources| {
            let lhs = *sources[0].downcast_ref::<i64>().unwrap();
            let rhs = *sources[1].downcast_ref::<i64>().unwrap();
            super::AttributeValue::new(lhs + rhs)
        },
    ));
    // E -> N (production index 1)
    bindings.add(Binding::new(
        "E",
        1,
        AttributeRef::new(0, "value"),
        vec![AttributeRef::new(1, "value")],
        |sources| {
            let value = *sources[0].downcast_ref::<i64>().unwrap();
            super::AttributeValue::new(value)
        },
    ));
    bindings
}

#[test]
fn synthesized_sum_attribute_evaluates_left_to_right() {
    let grammar = Grammar::parse("E -> E + N | N ; N -> int ;").unwrap();
    let table = build_slr(&grammar, true).unwrap();
    let mut stream = VecTokenStream::new(
        &["int", "+", "int", "+", "int"],
        &["2", "+", "3", "+", "4"],
    );
    let tree = drive_lr(&grammar, &table, &mut stream, None).unwrap();

    let bindings = sum_grammar_bindings();
    let value: i64 = evaluate_as(&grammar, &tree, &bindings, "value").unwrap();
    assert_eq!(value, 9);
}

#[test]
fn missing_binding_is_reported() {
    let grammar = Grammar::parse("E -> E + N | N ; N -> int ;").unwrap();
    let table = build_slr(&grammar, true).unwrap();
    let mut stream = VecTokenStream::new(&["int"], &["7"]);
    let tree = drive_lr(&grammar, &table, &mut stream, None).unwrap();

    let bindings = Bindings::new();
    let err = evaluate(&grammar, &tree, &bindings, "value").unwrap_err();
    assert!(matches!(err, AttributeError::MissingBinding { .. }));
}

#[test]
fn type_mismatch_is_reported_on_extraction() {
    let grammar = Grammar::parse("E -> E + N | N ; N -> int ;").unwrap();
    let table = build_slr(&grammar, true).unwrap();
    let mut stream = VecTokenStream::new(&["int"], &["7"]);
    let tree = drive_lr(&grammar, &table, &mut stream, None).unwrap();

    let bindings = sum_grammar_bindings();
    let err = evaluate_as::<String>(&grammar, &tree, &bindings, "value").unwrap_err();
    assert!(matches!(err, AttributeError::TypeMismatch { .. }));
}
