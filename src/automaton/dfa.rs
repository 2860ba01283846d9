use super::{AutomatonError, StateEntry, TransitionTable};
use std::collections::BTreeMap;

/// A deterministic finite automaton: at most one destination per `(state, input)`.
#[derive(Debug, Clone)]
pub struct Dfa<V> {
    states: BTreeMap<String, StateEntry<V>>,
    transitions: TransitionTable,
    start: Option<String>,
}

impl<V> Default for Dfa<V> {
    fn default() -> Self {
        Self {
            states: BTreeMap::new(),
            transitions: TransitionTable::default(),
            start: None,
        }
    }
}

impl<V> Dfa<V> {
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

    pub fn value(&self, state: &str) -> Option<&V> {
        self.states.get(state).map(|s| &s.value)
    }

    pub fn set_value(&mut self, state: &str, value: V) {
        if let Some(entry) = self.states.get_mut(state) {
            entry.value = value;
        }
    }

    pub fn is_accepting(&self, state: &str) -> bool {
        self.states.get(state).map(|s| s.accepting).unwrap_or(false)
    }

    pub fn states(&self) -> impl Iterator<Item = &str> {
        self.states.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Add a transition, overwriting any previous destination for `(from, input)`.
    pub fn add_transition(&mut self, from: &str, input: &str, to: &str) {
        // A DFA permits only one destination per (state, input): clear first.
        if let Some(existing) = self.transition(from, input) {
            let existing = existing.to_string();
            self.transitions.remove(from, input, &existing);
        }
        self.transitions.add(from, input, to);
    }

    pub fn remove_transition(&mut self, from: &str, input: &str) {
        if let Some(to) = self.transition(from, input) {
            let to = to.to_string();
            self.transitions.remove(from, input, &to);
        }
    }

    pub fn transition(&self, from: &str, input: &str) -> Option<&str> {
        self.transitions.destinations(from, input).first().map(String::as_str)
    }

    pub fn transitions_from(&self, from: &str) -> impl Iterator<Item = (&str, &str)> {
        self.transitions.transitions_from(from)
    }

    pub fn transitions_to<'a>(&'a self, to: &'a str) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        self.transitions.transitions_to(to)
    }

    pub fn all_transitions(&self) -> impl Iterator<Item = (&str, &str, &str)> {
        self.transitions.all()
    }

    /// `DFA::run`: follow transitions for each input symbol; `None` on a dead end.
    pub fn run<'a, I: IntoIterator<Item = &'a str>>(&self, inputs: I) -> Option<bool> {
        let mut current = self.start.clone()?;
        for input in inputs {
            current = self.transition(&current, input)?.to_string();
        }
        Some(self.is_accepting(&current))
    }

    /// Validate automaton invariants: start is defined, every transition
    /// target exists, and no state besides the start is unreachable.
    pub fn validate(&self) -> Result<(), AutomatonError> {
        let start = self
            .start
            .as_ref()
            .ok_or_else(|| AutomatonError::UndefinedStart("<none>".into()))?;
        if !self.states.contains_key(start) {
            return Err(AutomatonError::UndefinedStart(start.clone()));
        }
        for (from, input, to) in self.transitions.all() {
            if !self.states.contains_key(to) {
                return Err(AutomatonError::DanglingTransition {
                    from: from.to_string(),
                    input: input.to_string(),
                    to: to.to_string(),
                });
            }
        }

        let mut reachable = std::collections::HashSet::new();
        let mut frontier = vec![start.clone()];
        reachable.insert(start.clone());
        while let Some(state) = frontier.pop() {
            for (_, to) in self.transitions.transitions_from(&state) {
                if reachable.insert(to.to_string()) {
                    frontier.push(to.to_string());
                }
            }
        }
        for state in self.states.keys() {
            if !reachable.contains(state) {
                return Err(AutomatonError::OrphanState(state.clone()));
            }
        }
        Ok(())
    }

    /// Rebuild this automaton with every state value transformed by `f`,
    /// keeping states, transitions, and start unchanged.
    pub fn map_values<W>(&self, mut f: impl FnMut(&str, &V) -> W) -> Dfa<W> {
        let mut mapped = Dfa::new();
        for (name, entry) in &self.states {
            mapped.add_state(name, f(name, &entry.value), entry.accepting);
        }
        if let Some(start) = &self.start {
            mapped.set_start(start);
        }
        for (from, input, to) in self.transitions.all() {
            mapped.add_transition(from, input, to);
        }
        mapped
    }

    /// Renumber states deterministically: the start state becomes `"0"`, the
    /// remaining states are assigned `"1"`, `"2"`, … in alphabetical order of
    /// their original name. Returns the new automaton and the old->new map.
    pub fn renumber(&self) -> (Dfa<V>, BTreeMap<String, String>)
    where
        V: Clone,
    {
        let start = self.start.clone().expect("renumbering requires a start state");
        let mut others: Vec<&String> = self.states.keys().filter(|s| *s != &start).collect();
        others.sort();

        let mut mapping = BTreeMap::new();
        mapping.insert(start.clone(), "0".to_string());
        for (i, name) in others.into_iter().enumerate() {
            mapping.insert(name.clone(), (i + 1).to_string());
        }

        let mut renamed = Dfa::new();
        for (old_name, entry) in &self.states {
            let new_name = &mapping[old_name];
            renamed.add_state(new_name, entry.value.clone(), entry.accepting);
        }
        renamed.set_start("0");
        for (from, input, to) in self.transitions.all() {
            renamed.add_transition(&mapping[from], input, &mapping[to]);
        }
        (renamed, mapping)
    }
}
