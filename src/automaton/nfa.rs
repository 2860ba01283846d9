use super::{AutomatonError, Dfa, StateEntry, TransitionTable, EPSILON_INPUT};
use std::collections::{BTreeMap, BTreeSet};

/// A non-deterministic finite automaton: `(state, input)` may map to several
/// destinations, and `input = ""` denotes an epsilon transition.
#[derive(Debug, Clone)]
pub struct Nfa<V> {
    states: BTreeMap<String, StateEntry<V>>,
    transitions: TransitionTable,
    start: Option<String>,
}

impl<V> Default for Nfa<V> {
    fn default() -> Self {
        Self {
            states: BTreeMap::new(),
            transitions: TransitionTable::default(),
            start: None,
        }
    }
}

impl<V> Nfa<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_state(&mut self, name: &str, value: V, accepting: bool) {
        if self.start.is_none() {
            self.start = Some(name.to_string());
        }
        self.states
            .insert(name.to_string(), StateEntry { value, accepting });
    }

    pub fn set_start(&mut self, name: &str) {
        self.start = Some(name.to_string());
    }

    pub fn start(&self) -> Option<&str> {
        self.start.as_deref()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.states.contains_key(name)
    }

    pub fn value(&self, state: &str) -> Option<&V> {
        self.states.get(state).map(|s| &s.value)
    }

    pub fn is_accepting(&self, state: &str) -> bool {
        self.states.get(state).map(|s| s.accepting).unwrap_or(false)
    }

    pub fn states(&self) -> impl Iterator<Item = &str> {
        self.states.keys().map(String::as_str)
    }

    pub fn add_transition(&mut self, from: &str, input: &str, to: &str) {
        self.transitions.add(from, input, to);
    }

    pub fn add_epsilon(&mut self, from: &str, to: &str) {
        self.transitions.add(from, EPSILON_INPUT, to);
    }

    pub fn transitions_from(&self, from: &str) -> impl Iterator<Item = (&str, &str)> {
        self.transitions.transitions_from(from)
    }

    /// epsilon-closure of a single state.
    pub fn epsilon_closure_of(&self, state: &str) -> BTreeSet<String> {
        let mut one = BTreeSet::new();
        one.insert(state.to_string());
        self.epsilon_closure(&one)
    }

    /// epsilon-closure of a set of states: the smallest superset closed under
    /// epsilon transitions.
    pub fn epsilon_closure(&self, states: &BTreeSet<String>) -> BTreeSet<String> {
        let mut closure = states.clone();
        let mut frontier: Vec<String> = states.iter().cloned().collect();
        while let Some(state) = frontier.pop() {
            for to in self.transitions.destinations(&state, EPSILON_INPUT) {
                if closure.insert(to.clone()) {
                    frontier.push(to.clone());
                }
            }
        }
        closure
    }

    /// MOVE(X, a): the union of destinations for input `a` from any state in `X`.
    pub fn move_set(&self, states: &BTreeSet<String>, input: &str) -> BTreeSet<String> {
        let mut result = BTreeSet::new();
        for state in states {
            for to in self.transitions.destinations(state, input) {
                result.insert(to.clone());
            }
        }
        result
    }

    /// All non-epsilon input symbols that appear anywhere in the automaton.
    fn alphabet(&self) -> BTreeSet<String> {
        self.transitions
            .all()
            .filter(|(_, input, _)| *input != EPSILON_INPUT)
            .map(|(_, input, _)| input.to_string())
            .collect()
    }

    /// Subset construction (dragon-book Algorithm 3.20): convert this NFA to
    /// an equivalent DFA whose state values are the *set of values* of the
    /// member NFA states.
    pub fn to_dfa(&self) -> Dfa<Vec<V>>
    where
        V: Clone,
    {
        let start_state = self
            .start
            .clone()
            .expect("subset construction requires a start state");
        let start_closure = self.epsilon_closure_of(&start_state);
        let alphabet = self.alphabet();

        let mut dfa: Dfa<Vec<V>> = Dfa::new();
        let mut names: BTreeMap<BTreeSet<String>, String> = BTreeMap::new();
        let mut counter = 0usize;

        let start_name = format!("s{}", counter);
        counter += 1;
        names.insert(start_closure.clone(), start_name.clone());
        dfa.add_state(
            &start_name,
            self.values_of(&start_closure),
            self.any_accepting(&start_closure),
        );
        dfa.set_start(&start_name);

        let mut worklist = vec![start_closure];
        while let Some(set) = worklist.pop() {
            let from_name = names[&set].clone();
            for symbol in &alphabet {
                let moved = self.move_set(&set, symbol);
                if moved.is_empty() {
                    continue;
                }
                let closure = self.epsilon_closure(&moved);
                let to_name = match names.get(&closure) {
                    Some(existing) => existing.clone(),
                    None => {
                        let name = format!("s{}", counter);
                        counter += 1;
                        names.insert(closure.clone(), name.clone());
                        dfa.add_state(
                            &name,
                            self.values_of(&closure),
                            self.any_accepting(&closure),
                        );
                        worklist.push(closure.clone());
                        name
                    }
                };
                dfa.add_transition(&from_name, symbol, &to_name);
            }
        }
        dfa
    }

    fn values_of(&self, states: &BTreeSet<String>) -> Vec<V>
    where
        V: Clone,
    {
        states
            .iter()
            .filter_map(|s| self.states.get(s))
            .map(|entry| entry.value.clone())
            .collect()
    }

    fn any_accepting(&self, states: &BTreeSet<String>) -> bool {
        states.iter().any(|s| self.is_accepting(s))
    }

    /// Whether this NFA happens to already be deterministic: no epsilon
    /// transitions and at most one destination per `(state, input)`.
    pub fn is_deterministic(&self) -> bool {
        for (_, input, _) in self.transitions.all() {
            if input == EPSILON_INPUT {
                return false;
            }
        }
        for state in self.states.keys() {
            let mut seen_inputs: BTreeSet<&str> = BTreeSet::new();
            for (input, _) in self.transitions.transitions_from(state) {
                if !seen_inputs.insert(input) {
                    return false;
                }
            }
        }
        true
    }

    /// Trivial rename to a [Dfa] when this NFA is already deterministic.
    /// Fails with [AutomatonError::NotDeterministic] otherwise — used by the
    /// LALR merge path to verify a merge did not introduce ambiguity.
    pub fn direct_to_dfa(&self) -> Result<Dfa<V>, AutomatonError>
    where
        V: Clone,
    {
        for state in self.states.keys() {
            let mut seen: BTreeMap<&str, &str> = BTreeMap::new();
            for (input, to) in self.transitions.transitions_from(state) {
                if input == EPSILON_INPUT {
                    return Err(AutomatonError::NotDeterministic {
                        state: state.clone(),
                        input: input.to_string(),
                    });
                }
                if let Some(existing) = seen.get(input) {
                    if *existing != to {
                        return Err(AutomatonError::NotDeterministic {
                            state: state.clone(),
                            input: input.to_string(),
                        });
                    }
                } else {
                    seen.insert(input, to);
                }
            }
        }

        let mut dfa = Dfa::new();
        for (name, entry) in &self.states {
            dfa.add_state(name, entry.value.clone(), entry.accepting);
        }
        dfa.set_start(self.start.as_ref().expect("direct conversion requires a start state"));
        for (from, input, to) in self.transitions.all() {
            dfa.add_transition(from, input, to);
        }
        Ok(dfa)
    }

    /// Join two NFAs into one: states from `self` are prefixed `1:`, states
    /// from `other` are prefixed `2:`, plus any additional cross-automaton
    /// transitions given as `(from, input, to)` triples using those prefixed
    /// names. `flip_accepting` toggles the accepting flag on the named
    /// (already-prefixed) states after the join.
    pub fn join(
        &self,
        other: &Nfa<V>,
        extra_transitions: &[(String, String, String)],
        flip_accepting: &[String],
    ) -> Nfa<V>
    where
        V: Clone,
    {
        let mut joined = Nfa::new();
        for (name, entry) in &self.states {
            joined.add_state(&format!("1:{}", name), entry.value.clone(), entry.accepting);
        }
        for (name, entry) in &other.states {
            joined.add_state(&format!("2:{}", name), entry.value.clone(), entry.accepting);
        }
        if let Some(start) = &self.start {
            joined.set_start(&format!("1:{}", start));
        }
        for (from, input, to) in self.transitions.all() {
            joined.add_transition(&format!("1:{}", from), input, &format!("1:{}", to));
        }
        for (from, input, to) in other.transitions.all() {
            joined.add_transition(&format!("2:{}", from), input, &format!("2:{}", to));
        }
        for (from, input, to) in extra_transitions {
            joined.add_transition(from, input, to);
        }
        for name in flip_accepting {
            if let Some(entry) = joined.states.get_mut(name) {
                entry.accepting = !entry.accepting;
            }
        }
        joined
    }

    /// Rewrite every transition endpoint named `old` to `new`. Used after a
    /// LALR merge, where synthesized state names may collide with names used
    /// by later-generated states.
    pub fn rename_state(&mut self, old: &str, new: &str) {
        if let Some(entry) = self.states.remove(old) {
            self.states.insert(new.to_string(), entry);
        }
        if self.start.as_deref() == Some(old) {
            self.start = Some(new.to_string());
        }
        self.transitions.rename_state(old, new);
    }
}
