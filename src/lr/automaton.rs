//! Construction of the LR(0) and LR(1) canonical collections (§4.5).

use super::item::{Lr0Item, Lr1Item};
use crate::automaton::{Dfa, Nfa};
use crate::grammar::{Grammar, END};
use std::collections::{BTreeMap, BTreeSet};

/// Build the LR(0) items DFA: an NFA of items joined by epsilon transitions
/// at every non-terminal dot position, then subset-constructed to a DFA
/// whose state 0 contains `S' -> .S`.
pub fn lr0_automaton(grammar: &Grammar) -> Dfa<BTreeSet<Lr0Item>> {
    let (augmented, start_head) = grammar.augment();
    let mut nfa: Nfa<Lr0Item> = Nfa::new();

    for head in augmented.non_terminals() {
        let rule = augmented.rule(head).unwrap();
        for production in rule.alternatives() {
            let mut item = Lr0Item::initial(head, production);
            loop {
                let name = item.to_string();
                if !nfa.contains(&name) {
                    nfa.add_state(&name, item.clone(), false);
                }
                if let Some(symbol) = item.next_symbol() {
                    let advanced = item.advanced();
                    let advanced_name = advanced.to_string();
                    if !nfa.contains(&advanced_name) {
                        nfa.add_state(&advanced_name, advanced.clone(), false);
                    }
                    nfa.add_transition(&name, symbol, &advanced_name);
                    if augmented.is_non_terminal(symbol) {
                        for target_production in augmented.rule(symbol).unwrap().alternatives() {
                            let target = Lr0Item::initial(symbol, target_production);
                            let target_name = target.to_string();
                            if !nfa.contains(&target_name) {
                                nfa.add_state(&target_name, target.clone(), false);
                            }
                            nfa.add_epsilon(&name, &target_name);
                        }
                    }
                    item = advanced;
                } else {
                    break;
                }
            }
        }
    }

    let start_item = Lr0Item::initial(
        &start_head,
        &augmented.rule(&start_head).unwrap().alternatives()[0],
    );
    nfa.set_start(&start_item.to_string());

    let subset = nfa.to_dfa();
    let as_sets = subset.map_values(|_, items| items.iter().cloned().collect::<BTreeSet<_>>());
    as_sets.renumber().0
}

/// CLOSURE of an LR(1) item set: repeatedly add `[B -> .g, b]` for every
/// `[A -> a.Bb, a]` in the set and every `b` in FIRST(beta lookahead).
fn closure1(grammar: &Grammar, items: BTreeSet<Lr1Item>) -> BTreeSet<Lr1Item> {
    let mut closure = items;
    loop {
        let mut additions = Vec::new();
        for item in &closure {
            let Some(symbol) = item.core.next_symbol() else {
                continue;
            };
            if !grammar.is_non_terminal(symbol) {
                continue;
            }
            let mut beta_a = item.core.body[item.core.dot + 1..].to_vec();
            beta_a.push(item.lookahead.clone());
            let lookaheads = grammar.first(&beta_a);
            for production in grammar.rule(symbol).unwrap().alternatives() {
                for lookahead in &lookaheads {
                    if lookahead == crate::grammar::EPSILON {
                        continue;
                    }
                    additions.push(Lr1Item {
                        core: Lr0Item::initial(symbol, production),
                        lookahead: lookahead.clone(),
                    });
                }
            }
        }
        let mut changed = false;
        for item in additions {
            if closure.insert(item) {
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }
    closure
}

fn goto1(grammar: &Grammar, items: &BTreeSet<Lr1Item>, symbol: &str) -> BTreeSet<Lr1Item> {
    let moved: BTreeSet<Lr1Item> = items
        .iter()
        .filter(|item| item.core.next_symbol() == Some(symbol))
        .map(|item| Lr1Item {
            core: item.core.advanced(),
            lookahead: item.lookahead.clone(),
        })
        .collect();
    closure1(grammar, moved)
}

/// Build the LR(1) items DFA directly via closure/goto, starting from
/// `CLOSURE({[S' -> .S, $]})`.
pub fn lr1_automaton(grammar: &Grammar) -> Dfa<BTreeSet<Lr1Item>> {
    let (augmented, start_head) = grammar.augment();
    let start_production = &augmented.rule(&start_head).unwrap().alternatives()[0];
    let start_item = Lr1Item {
        core: Lr0Item::initial(&start_head, start_production),
        lookahead: END.to_string(),
    };
    let start_set = closure1(&augmented, BTreeSet::from([start_item]));

    let mut dfa: Dfa<BTreeSet<Lr1Item>> = Dfa::new();
    let mut names: BTreeMap<BTreeSet<Lr1Item>, String> = BTreeMap::new();
    let mut counter = 0usize;

    let start_name = format!("s{}", counter);
    counter += 1;
    names.insert(start_set.clone(), start_name.clone());
    dfa.add_state(&start_name, start_set.clone(), false);
    dfa.set_start(&start_name);

    let mut worklist = vec![start_set];
    while let Some(set) = worklist.pop() {
        let from_name = names[&set].clone();
        let symbols: BTreeSet<String> = set
            .iter()
            .filter_map(|item| item.core.next_symbol().map(str::to_string))
            .collect();
        for symbol in symbols {
            let moved = goto1(&augmented, &set, &symbol);
            if moved.is_empty() {
                continue;
            }
            let to_name = match names.get(&moved) {
                Some(existing) => existing.clone(),
                None => {
                    let name = format!("s{}", counter);
                    counter += 1;
                    names.insert(moved.clone(), name.clone());
                    dfa.add_state(&name, moved.clone(), false);
                    worklist.push(moved.clone());
                    name
                }
            };
            dfa.add_transition(&from_name, &symbol, &to_name);
        }
    }
    dfa.renumber().0
}

/// Merge LR(1) states whose LR(0) cores are identical (the CLR-merge path
/// to LALR(1), §4.5 option 1). Returns `None` if the merge collapses the
/// grammar into ambiguity (direct-to-DFA fails on the merged NFA).
pub fn lalr_via_merge(grammar: &Grammar) -> Option<Dfa<BTreeSet<Lr1Item>>> {
    let clr = lr1_automaton(grammar);

    let core_of = |items: &BTreeSet<Lr1Item>| -> BTreeSet<Lr0Item> {
        items.iter().map(|item| item.core.clone()).collect()
    };

    let mut groups: BTreeMap<BTreeSet<Lr0Item>, Vec<String>> = BTreeMap::new();
    for state in clr.states() {
        let items = clr.value(state).unwrap();
        groups.entry(core_of(items)).or_default().push(state.to_string());
    }

    let mut merged_name_of: BTreeMap<String, String> = BTreeMap::new();
    let mut merged_values: BTreeMap<String, BTreeSet<Lr1Item>> = BTreeMap::new();
    for (core, members) in &groups {
        let representative = members.iter().min().unwrap().clone();
        let mut union: BTreeMap<Lr0Item, BTreeSet<String>> = BTreeMap::new();
        for member in members {
            for item in clr.value(member).unwrap() {
                union
                    .entry(item.core.clone())
                    .or_default()
                    .insert(item.lookahead.clone());
            }
        }
        let merged_items: BTreeSet<Lr1Item> = union
            .into_iter()
            .flat_map(|(core_item, lookaheads)| {
                lookaheads.into_iter().map(move |lookahead| Lr1Item {
                    core: core_item.clone(),
                    lookahead,
                })
            })
            .collect();
        debug_assert_eq!(&core_of(&merged_items), core);
        for member in members {
            merged_name_of.insert(member.clone(), representative.clone());
        }
        merged_values.insert(representative.clone(), merged_items);
    }

    let mut merged: Nfa<BTreeSet<Lr1Item>> = Nfa::new();
    for name in merged_values.keys() {
        merged.add_state(name, merged_values[name].clone(), false);
    }
    merged.set_start(&merged_name_of[clr.start().unwrap()]);
    for (from, input, to) in clr.all_transitions() {
        merged.add_transition(&merged_name_of[from], input, &merged_name_of[to]);
    }

    merged.direct_to_dfa().ok().map(|dfa| dfa.renumber().0)
}

/// Sentinel lookahead used by [lalr_via_kernels] to tell spontaneous
/// generation apart from propagation along a closure.
const PROPAGATE: &str = "#";

/// The kernel of an LR(0) state: every item with `dot > 0`, plus (for the
/// start state only) `start_item` itself, which has `dot == 0` but is not a
/// closure-introduced item.
fn kernels(
    lr0: &Dfa<BTreeSet<Lr0Item>>,
    start_item: &Lr0Item,
) -> BTreeMap<String, BTreeSet<Lr0Item>> {
    let start = lr0.start().unwrap().to_string();
    let mut result = BTreeMap::new();
    for state in lr0.states() {
        let items = lr0.value(state).unwrap();
        let kernel: BTreeSet<Lr0Item> = items
            .iter()
            .filter(|item| item.dot > 0 || (state == start && *item == start_item))
            .cloned()
            .collect();
        result.insert(state.to_string(), kernel);
    }
    result
}

/// Build the LALR(1) items DFA via the efficient kernel-propagation method
/// (§4.5 option 2, dragon-book algorithm 4.63): compute lookaheads for LR(0)
/// kernel items directly, without ever materializing the full CLR collection.
pub fn lalr_via_kernels(grammar: &Grammar) -> Dfa<BTreeSet<Lr1Item>> {
    let (augmented, start_head) = grammar.augment();
    let lr0 = lr0_automaton(grammar);
    let start_item = Lr0Item::initial(
        &start_head,
        &augmented.rule(&start_head).unwrap().alternatives()[0],
    );
    let kernels_by_state = kernels(&lr0, &start_item);

    let mut lookaheads: BTreeMap<(String, Lr0Item), BTreeSet<String>> = BTreeMap::new();
    let mut propagate_to: BTreeMap<(String, Lr0Item), Vec<(String, Lr0Item)>> = BTreeMap::new();

    let start_state = lr0.start().unwrap().to_string();
    lookaheads
        .entry((start_state, start_item))
        .or_default()
        .insert(END.to_string());

    for (state, kernel) in &kernels_by_state {
        for kernel_item in kernel {
            let seeded = BTreeSet::from([Lr1Item {
                core: kernel_item.clone(),
                lookahead: PROPAGATE.to_string(),
            }]);
            let closed = closure1(&augmented, seeded);
            for item in &closed {
                let Some(symbol) = item.core.next_symbol() else {
                    continue;
                };
                let Some(target) = lr0.transition(state, symbol) else {
                    continue;
                };
                let advanced = item.core.advanced();
                if item.lookahead == PROPAGATE {
                    propagate_to
                        .entry((state.clone(), kernel_item.clone()))
                        .or_default()
                        .push((target.to_string(), advanced));
                } else {
                    lookaheads
                        .entry((target.to_string(), advanced))
                        .or_default()
                        .insert(item.lookahead.clone());
                }
            }
        }
    }

    loop {
        let mut changed = false;
        for (from, targets) in &propagate_to {
            let from_set = lookaheads.get(from).cloned().unwrap_or_default();
            for target in targets {
                let entry = lookaheads.entry(target.clone()).or_default();
                let before = entry.len();
                entry.extend(from_set.iter().cloned());
                if entry.len() != before {
                    changed = true;
                }
            }
        }
        if !changed {
            break;
        }
    }

    lr0.map_values(|state, items| {
        let mut full_kernel_and_closure: BTreeSet<Lr1Item> = BTreeSet::new();
        for item in items {
            let item_lookaheads = lookaheads
                .get(&(state.to_string(), item.clone()))
                .cloned()
                .unwrap_or_default();
            for lookahead in item_lookaheads {
                full_kernel_and_closure.insert(Lr1Item {
                    core: item.clone(),
                    lookahead,
                });
            }
        }
        closure1(&augmented, full_kernel_and_closure)
    })
}
