//! Deterministic and non-deterministic finite automata over symbolic,
//! string-named states with a typed, parametric state value (§4.2 / §9 design
//! notes: "symbolic states keyed by strings").
//!
//! [Nfa] and [Dfa] share the same transition model; an [Nfa] allows several
//! destinations per `(state, input)` pair and an epsilon input (`""`), a
//! [Dfa] allows at most one.

mod dfa;
mod nfa;

#[cfg(test)]
mod __tests__;

pub use dfa::Dfa;
pub use nfa::Nfa;

use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};

/// The epsilon input symbol: only ever used in an [Nfa].
pub const EPSILON_INPUT: &str = "";

/// A raised invariant violation in an automaton (orphan state, dangling
/// transition target, undefined start state, or a non-deterministic NFA
/// passed where determinism was required).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AutomatonError {
    UndefinedStart(String),
    DanglingTransition { from: String, input: String, to: String },
    OrphanState(String),
    NotDeterministic { state: String, input: String },
}

impl Display for AutomatonError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            AutomatonError::UndefinedStart(s) => {
                write!(f, "AutomatonError: start state '{}' is not defined", s)
            }
            AutomatonError::DanglingTransition { from, input, to } => write!(
                f,
                "AutomatonError: transition ({}, '{}') -> '{}' targets an undefined state",
                from, input, to
            ),
            AutomatonError::OrphanState(s) => write!(
                f,
                "AutomatonError: state '{}' is unreachable from the start state",
                s
            ),
            AutomatonError::NotDeterministic { state, input } => write!(
                f,
                "AutomatonError: state '{}' has more than one transition on '{}'",
                state, input
            ),
        }
    }
}

impl std::error::Error for AutomatonError {}

/// A single state's value together with whether the state accepts.
#[derive(Debug, Clone)]
pub(crate) struct StateEntry<V> {
    pub value: V,
    pub accepting: bool,
}

/// A `(from, input) -> {to}` transition table shared by [Nfa] and [Dfa].
///
/// Kept as a sorted `BTreeMap` so enumeration order (and therefore every
/// diagnostic rendering and numbering scheme built on top of it) is
/// deterministic without an extra sort step.
#[derive(Debug, Clone, Default)]
pub(crate) struct TransitionTable {
    // (from_state, input) -> ordered, de-duplicated destination list
    edges: BTreeMap<(String, String), Vec<String>>,
}

impl TransitionTable {
    fn add(&mut self, from: &str, input: &str, to: &str) {
        let key = (from.to_string(), input.to_string());
        let entry = self.edges.entry(key).or_default();
        if !entry.iter().any(|t| t == to) {
            entry.push(to.to_string());
        }
    }

    fn remove(&mut self, from: &str, input: &str, to: &str) {
        let key = (from.to_string(), input.to_string());
        if let Some(entry) = self.edges.get_mut(&key) {
            entry.retain(|t| t != to);
            if entry.is_empty() {
                self.edges.remove(&key);
            }
        }
    }

    fn destinations(&self, from: &str, input: &str) -> &[String] {
        self.edges
            .get(&(from.to_string(), input.to_string()))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn transitions_from(&self, from: &str) -> impl Iterator<Item = (&str, &str)> {
        self.edges
            .iter()
            .filter(move |((s, _), _)| s == from)
            .flat_map(|((_, input), tos)| tos.iter().map(move |to| (input.as_str(), to.as_str())))
    }

    fn transitions_to<'a>(&'a self, to: &'a str) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        self.edges.iter().flat_map(move |((from, input), tos)| {
            tos.iter()
                .filter(move |t| t.as_str() == to)
                .map(move |_| (from.as_str(), input.as_str()))
        })
    }

    fn all(&self) -> impl Iterator<Item = (&str, &str, &str)> {
        self.edges.iter().flat_map(|((from, input), tos)| {
            tos.iter()
                .map(move |to| (from.as_str(), input.as_str(), to.as_str()))
        })
    }

    fn rename_state(&mut self, old: &str, new: &str) {
        let mut renamed = BTreeMap::new();
        for ((from, input), tos) in self.edges.drain() {
            let new_from = if from == old { new.to_string() } else { from };
            let new_tos: Vec<String> = tos
                .into_iter()
                .map(|t| if t == old { new.to_string() } else { t })
                .collect();
            let key = (new_from, input);
            let entry: &mut Vec<String> = renamed.entry(key).or_default();
            for t in new_tos {
                if !entry.contains(&t) {
                    entry.push(t);
                }
            }
        }
        self.edges = renamed;
    }
}
