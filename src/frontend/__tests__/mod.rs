use super::{Frontend, FrontendBuilder, ParserStrategy};
use crate::grammar::Grammar;
use crate::lexer::Lexer;
use crate::translator::{evaluate_as, AttributeRef, Binding, Bindings};

fn expression_lexer() -> Lexer {
    Lexer::compile(
        "^\\s+\n\
         ^\\( %token (\n\
         ^\\) %token )\n\
         ^\\+ %token +\n\
         ^\\* %token *\n\
         ^int %token int\n",
    )
    .unwrap()
}

#[test]
fn ll1_frontend_parses_real_lexed_source() {
    // S1 grammar, driven through a real lexer rather than a synthetic stream.
    let grammar =
        Grammar::parse("S -> T X ; T -> ( S ) | int Y ; X -> + S | ε ; Y -> * T | ε ;").unwrap();
    let frontend = FrontendBuilder::new(grammar, expression_lexer())
        .strategy(ParserStrategy::Ll1)
        .build()
        .unwrap();

    let tree = frontend.parse("int * int").unwrap();
    assert_eq!(tree.symbol(), "S");
    assert_eq!(tree.lexeme_sequence(), vec!["int", "*", "int"]);
}

#[test]
fn lalr_frontend_reports_syntax_errors_with_position() {
    let grammar = Grammar::parse("S -> C C ; C -> c C | d ;").unwrap();
    let lexer = Lexer::compile("^\\s+\n^c %token c\n^d %token d\n").unwrap();
    let frontend = FrontendBuilder::new(grammar, lexer)
        .strategy(ParserStrategy::Lalr)
        .build()
        .unwrap();

    let err = frontend.parse("c").unwrap_err();
    match err {
        super::FrontendError::LrSyntax(syntax) => {
            assert_eq!(syntax.message, "expected a 'c' or a 'd'; got end of input");
        }
        other => panic!("expected a syntax error, got {:?}", other),
    }
}

fn sum_bindings() -> Bindings {
    let mut bindings = Bindings::new();
    bindings.add(Binding::new(
        "N",
        0,
        AttributeRef::new(0, "value"),
        vec![AttributeRef::new(1, "lexeme")],
        |sources| {
            let lexeme = sources[0].downcast_ref::<String>().unwrap();
            crate::translator::AttributeValue::new(lexeme.parse::<i64>().unwrap())
        },
    ));
    bindings.add(Binding::new(
        "E",
        0,
        AttributeRef::new(0, "value"),
        vec![AttributeRef::new(1, "value"), AttributeRef::new(3, "value")],
        |sources| {
            let lhs = *sources[0].downcast_ref::<i64>().unwrap();
            let rhs = *sources[1].downcast_ref::<i64>().unwrap();
            crate::translator::AttributeValue::new(lhs + rhs)
        },
    ));
    bindings.add(Binding::new(
        "E",
        1,
        AttributeRef::new(0, "value"),
        vec![AttributeRef::new(1, "value")],
        |sources| {
            let value = *sources[0].downcast_ref::<i64>().unwrap();
            crate::translator::AttributeValue::new(value)
        },
    ));
    bindings
}

#[test]
fn frontend_translate_reduces_source_to_an_integer() {
    // S6: E -> E + N | N ; N -> int ; with a synthesized sum attribute.
    let grammar = Grammar::parse("E -> E + N | N ; N -> int ;").unwrap();
    let lexer = Lexer::compile("^\\s+\n^\\+ %token +\n^[0-9]+ %token int\n").unwrap();
    let frontend = FrontendBuilder::new(grammar, lexer)
        .strategy(ParserStrategy::Lalr)
        .bindings(sum_bindings())
        .build()
        .unwrap();

    let value: i64 = frontend.translate("2 + 3 + 4", "value").unwrap();
    assert_eq!(value, 9);

    // evaluate_as is re-exported for direct tree-level use too.
    let tree = frontend.parse("2 + 3 + 4").unwrap();
    let bindings = sum_bindings();
    let direct: i64 = evaluate_as(frontend.grammar(), &tree, &bindings, "value").unwrap();
    assert_eq!(direct, 9);
}
