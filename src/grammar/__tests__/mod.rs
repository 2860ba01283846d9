use crate::grammar::{Grammar, Production, Rule, EPSILON};

fn s1_grammar() -> Grammar {
    // S -> T X ; T -> ( S ) | int Y ; X -> + S | ε ; Y -> * T | ε ;
    Grammar::parse("S -> T X ; T -> ( S ) | int Y ; X -> + S | ε ; Y -> * T | ε ;").unwrap()
}

#[test]
fn parses_textual_grammar_and_infers_terminals() {
    let g = s1_grammar();
    assert_eq!(g.start(), "S");
    assert!(g.is_non_terminal("S"));
    assert!(g.is_non_terminal("X"));
    assert!(g.is_terminal("int"));
    assert!(g.is_terminal("("));
    assert!(g.rule("X").unwrap().alternatives().iter().any(|p| p.is_epsilon()));
}

#[test]
fn first_and_follow_for_s1() {
    let g = s1_grammar();
    let first_s = g.first(&["S".to_string()]);
    assert!(first_s.contains("("));
    assert!(first_s.contains("int"));
    assert!(!first_s.contains(EPSILON));

    let follow_x = g.follow("X");
    assert!(follow_x.contains("$"));
    assert!(follow_x.contains(")"));
}

#[test]
fn s1_grammar_is_ll1() {
    let g = s1_grammar();
    assert!(g.is_ll1());
    let table = g.ll1_table().unwrap();
    let production = table.get("T", "int").unwrap();
    assert_eq!(production, &Production::new(["int", "Y"]));
}

#[test]
fn detects_ll1_conflict() {
    // A -> a | a b ; shares FIRST('a') on both alternatives.
    let g = Grammar::parse("A -> a | a b ;").unwrap();
    assert!(!g.is_ll1());
    let err = g.ll1_table().unwrap_err();
    assert_eq!(err.head, "A");
}

#[test]
fn remove_epsilons_preserves_language_shape() {
    let g = s1_grammar();
    let reduced = g.remove_epsilons();
    // X's epsilon alternative is gone (X isn't the start symbol).
    assert!(!reduced
        .rule("X")
        .unwrap()
        .alternatives()
        .iter()
        .any(|p| p.is_epsilon()));
    // The production that used to have X trailing now also has a variant without it.
    assert!(reduced
        .rule("S")
        .unwrap()
        .alternatives()
        .iter()
        .any(|p| p.symbols() == ["T"]));
}

#[test]
fn remove_unit_productions_inlines_unit_chains() {
    let g = Grammar::parse("A -> B | x ; B -> C ; C -> y ;").unwrap();
    let reduced = g.remove_unit_productions();
    let a_alts = reduced.rule("A").unwrap().alternatives();
    assert!(a_alts.contains(&Production::new(["x"])));
    assert!(a_alts.contains(&Production::new(["y"])));
    assert!(!a_alts.iter().any(|p| p.symbols() == ["B"]));
}

#[test]
fn remove_left_recursion_eliminates_direct_recursion() {
    // Classic E -> E + T | T ; T -> int ;
    let g = Grammar::parse("E -> E + T | T ; T -> int ;").unwrap();
    let fixed = g.remove_left_recursion();
    for nt in fixed.non_terminals() {
        for production in fixed.rule(nt).unwrap().alternatives() {
            assert_ne!(production.symbols().first().map(String::as_str), Some(nt.as_str()));
        }
    }
}

#[test]
fn left_factor_extracts_common_prefix() {
    let g = Grammar::parse("S -> if E then S | if E then S else S | x ;").unwrap();
    let factored = g.left_factor();
    // Original S rule should shrink to 2 alternatives: the factored "if E then S ..." and "x".
    assert_eq!(factored.rule("S").unwrap().alternatives().len(), 2);
    // A fresh non-terminal must have been minted to hold the "else S | ε" choice.
    assert!(factored.non_terminals().len() > g.non_terminals().len());
}

#[test]
fn unique_name_avoids_collisions() {
    let g = Grammar::parse("A -> x ;").unwrap();
    let first = g.unique_name("A");
    assert_eq!(first, "A-P");
}

#[test]
fn rejects_unknown_symbol() {
    let err = Grammar::new(
        vec![Rule::with_alternatives("S", vec![Production::new(["nope"])])],
        vec![],
        "S",
    )
    .unwrap_err();
    matches!(err, crate::grammar::GrammarError::UnknownSymbol { .. });
}
