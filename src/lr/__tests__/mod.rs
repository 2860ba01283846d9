use super::{build_clr, build_lalr, build_slr, lalr_via_kernels, lalr_via_merge, lr0_automaton, lr1_automaton};
use crate::grammar::Grammar;

#[test]
fn lr0_automaton_has_ten_states_for_the_canonical_example() {
    // S3: S -> C C ; C -> c C | d ;
    let grammar = Grammar::parse("S -> C C ; C -> c C | d ;").unwrap();
    let lr0 = lr0_automaton(&grammar);
    assert_eq!(lr0.states().count(), 10);
}

#[test]
fn lr1_automaton_agrees_with_lr0_on_state_count_for_an_slr_grammar() {
    let grammar = Grammar::parse("S -> C C ; C -> c C | d ;").unwrap();
    let lr0 = lr0_automaton(&grammar);
    let lr1 = lr1_automaton(&grammar);
    assert_eq!(lr0.states().count(), lr1.states().count());
}

#[test]
fn lalr_via_kernels_and_via_merge_produce_states_with_matching_cores() {
    // A grammar with genuine LALR merging (two LR(1) states collapse to
    // one LALR state without introducing a conflict). `build_lalr` itself
    // cross-checks these two construction paths render identically; this
    // just confirms both paths are independently reachable on this grammar.
    let grammar = Grammar::parse("S -> a E a | b E b | a F b | b F a ; E -> e ; F -> e ;").unwrap();
    let via_merge = lalr_via_merge(&grammar).expect("grammar is LALR(1)");
    let via_kernels = lalr_via_kernels(&grammar);
    assert_eq!(via_merge.states().count(), via_kernels.states().count());
}

#[test]
fn build_slr_resolves_expression_grammar_ambiguity() {
    let grammar = Grammar::parse("E -> E + T | T ; T -> T * F | F ; F -> ( E ) | id ;").unwrap();
    let table = build_slr(&grammar, true).unwrap();
    assert!(table.states().len() > 0);
}

#[test]
fn build_clr_and_build_lalr_agree_on_the_canonical_example() {
    let grammar = Grammar::parse("S -> C C ; C -> c C | d ;").unwrap();
    let clr = build_clr(&grammar).unwrap();
    let lalr = build_lalr(&grammar).unwrap();
    // This grammar is SLR/LALR-equivalent to its canonical collection (no
    // states merge), so both constructions see the same number of states.
    assert_eq!(clr.states().len(), lalr.states().len());
}

#[test]
fn build_lalr_merges_states_the_clr_table_keeps_separate() {
    let grammar = Grammar::parse("S -> a E a | b E b | a F b | b F a ; E -> e ; F -> e ;").unwrap();
    let clr = build_clr(&grammar).unwrap();
    let lalr = build_lalr(&grammar).unwrap();
    assert!(lalr.states().len() < clr.states().len());
}
