use crate::automaton::Nfa;

/// NFA for (a|b)*abb — the dragon-book running example for subset construction.
fn example_nfa() -> Nfa<()> {
    let mut nfa = Nfa::new();
    for i in 0..=10 {
        nfa.add_state(&i.to_string(), (), i == 10);
    }
    nfa.set_start("0");
    nfa.add_epsilon("0", "1");
    nfa.add_epsilon("0", "7");
    nfa.add_epsilon("1", "2");
    nfa.add_epsilon("1", "4");
    nfa.add_transition("2", "a", "3");
    nfa.add_transition("4", "b", "5");
    nfa.add_epsilon("3", "6");
    nfa.add_epsilon("5", "6");
    nfa.add_epsilon("6", "1");
    nfa.add_epsilon("6", "7");
    nfa.add_transition("7", "a", "8");
    nfa.add_transition("8", "b", "9");
    nfa.add_transition("9", "b", "10");
    nfa
}

#[test]
fn epsilon_closure_reaches_transitively() {
    let nfa = example_nfa();
    let closure = nfa.epsilon_closure_of("0");
    for expected in ["0", "1", "2", "4", "7"] {
        assert!(closure.contains(expected), "missing {}", expected);
    }
}

#[test]
fn subset_construction_accepts_same_language() {
    let nfa = example_nfa();
    let dfa = nfa.to_dfa();
    dfa.validate().unwrap();
    assert_eq!(dfa.run(["a", "b", "b"]), Some(true));
    assert_eq!(dfa.run(["a", "a", "b", "a", "b", "b"]), Some(true));
    assert_eq!(dfa.run(["a", "b"]), Some(false));
}

#[test]
fn direct_to_dfa_fails_on_nondeterministic_nfa() {
    let nfa = example_nfa();
    assert!(!nfa.is_deterministic());
    assert!(nfa.direct_to_dfa().is_err());
}

#[test]
fn direct_to_dfa_succeeds_when_already_deterministic() {
    let mut nfa: Nfa<()> = Nfa::new();
    nfa.add_state("0", (), false);
    nfa.add_state("1", (), true);
    nfa.set_start("0");
    nfa.add_transition("0", "a", "1");
    let dfa = nfa.direct_to_dfa().unwrap();
    assert_eq!(dfa.run(["a"]), Some(true));
}

#[test]
fn join_prefixes_states_and_applies_extra_transitions() {
    let mut left: Nfa<()> = Nfa::new();
    left.add_state("0", (), false);
    left.add_state("1", (), true);
    left.set_start("0");
    left.add_transition("0", "a", "1");

    let mut right: Nfa<()> = Nfa::new();
    right.add_state("0", (), true);
    right.set_start("0");

    let joined = left.join(
        &right,
        &[("1:1".to_string(), "".to_string(), "2:0".to_string())],
        &["1:1".to_string()],
    );
    assert!(joined.contains("1:0"));
    assert!(joined.contains("2:0"));
    // The extra epsilon edge should connect 1:1 to 2:0.
    let closure = joined.epsilon_closure_of("1:1");
    assert!(closure.contains("2:0"));
    // flip_accepting toggled 1:1 from accepting to non-accepting.
    assert!(!joined.is_accepting("1:1"));
}

#[test]
fn renumber_places_start_first_then_alphabetical() {
    let mut dfa = crate::automaton::Dfa::new();
    dfa.add_state("zebra", (), false);
    dfa.add_state("apple", (), true);
    dfa.set_start("zebra");
    dfa.add_transition("zebra", "x", "apple");
    let (renumbered, mapping) = dfa.renumber();
    assert_eq!(mapping["zebra"], "0");
    assert_eq!(mapping["apple"], "1");
    assert_eq!(renumbered.start(), Some("0"));
    assert_eq!(renumbered.transition("0", "x"), Some("1"));
}

#[test]
fn validate_detects_dangling_transition() {
    let mut dfa: crate::automaton::Dfa<()> = crate::automaton::Dfa::new();
    dfa.add_state("0", (), false);
    dfa.set_start("0");
    dfa.add_transition("0", "a", "missing");
    assert!(dfa.validate().is_err());
}
