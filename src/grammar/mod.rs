//! Symbolic model of a context-free grammar: terminals, non-terminals,
//! productions, and the relations ([first][Grammar::first], [follow][Grammar::follow])
//! derived from them.
//!
//! A [Grammar] is built once from a set of rules and a start symbol, validated,
//! and then treated as immutable. The rewrite passes in [rewrite] each consume
//! a grammar and produce a new one; they never mutate their input.

mod first_follow;
mod ll1;
mod rewrite;
mod text;

#[cfg(test)]
mod __tests__;

use std::collections::HashMap;
use std::fmt::{self, Display, Formatter};

pub use ll1::{Ll1Conflict, Ll1Table};
pub use text::GrammarSyntaxError;

/// Reserved symbol denoting the empty production.
pub const EPSILON: &str = "ε";
/// Reserved end-of-input terminal present in every augmented grammar.
pub const END: &str = "$";

/// An ordered sequence of grammar symbols forming one alternative of a rule.
///
/// Productions compare and hash structurally: two productions are equal
/// iff their symbol sequences are equal, element for element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Production(pub Vec<String>);

impl Production {
    pub fn new<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(symbols.into_iter().map(Into::into).collect())
    }

    /// The empty production.
    pub fn epsilon() -> Self {
        Self(Vec::new())
    }

    pub fn is_epsilon(&self) -> bool {
        self.0.is_empty()
    }

    pub fn symbols(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl Display for Production {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            write!(f, "{}", EPSILON)
        } else {
            write!(f, "{}", self.0.join(" "))
        }
    }
}

/// A non-terminal head paired with an ordered, de-duplicated sequence of
/// alternative productions. Alternation order is significant (it is the
/// priority used by [Grammar::ll1_table] and by ambiguity resolution).
#[derive(Debug, Clone, Default)]
pub struct Rule {
    pub head: String,
    alternatives: Vec<Production>,
}

impl Rule {
    pub fn new<S: Into<String>>(head: S) -> Self {
        Self {
            head: head.into(),
            alternatives: Vec::new(),
        }
    }

    pub fn with_alternatives<S, I>(head: S, alternatives: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = Production>,
    {
        let mut rule = Self::new(head);
        for alt in alternatives {
            rule.push(alt);
        }
        rule
    }

    /// Append an alternative, skipping it if structurally equal to one already present.
    pub fn push(&mut self, production: Production) -> &mut Self {
        if !self.alternatives.contains(&production) {
            self.alternatives.push(production);
        }
        self
    }

    pub fn alternatives(&self) -> &[Production] {
        &self.alternatives
    }
}

/// An error raised while constructing or validating a [Grammar].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrammarError {
    UnknownSymbol { production_head: String, symbol: String },
    MissingStart(String),
    SymbolCollision(String),
    EmptyGrammar,
}

impl Display for GrammarError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            GrammarError::UnknownSymbol { production_head, symbol } => write!(
                f,
                "GrammarError: symbol '{}' used in a production of '{}' is neither a known terminal nor a known non-terminal",
                symbol, production_head
            ),
            GrammarError::MissingStart(start) => write!(
                f,
                "GrammarError: start symbol '{}' is not defined as a non-terminal",
                start
            ),
            GrammarError::SymbolCollision(symbol) => write!(
                f,
                "GrammarError: '{}' is declared as both a terminal and a non-terminal",
                symbol
            ),
            GrammarError::EmptyGrammar => write!(f, "GrammarError: grammar has no rules"),
        }
    }
}

impl std::error::Error for GrammarError {}

/// A context-free grammar: terminals (each with a human-readable label),
/// non-terminals (each a [Rule]), and a designated start symbol.
///
/// Non-terminal insertion order is preserved in [Grammar::non_terminals] since
/// several algorithms (left-recursion removal ordering, table column layout)
/// are order-sensitive and must be deterministic.
#[derive(Debug, Clone)]
pub struct Grammar {
    terminals: Vec<(String, String)>,
    non_terminal_order: Vec<String>,
    rules: HashMap<String, Rule>,
    start: String,
}

impl Grammar {
    /// Build and validate a grammar from its rules, terminal declarations, and start symbol.
    pub fn new<R, T>(rules: R, terminals: T, start: &str) -> Result<Self, GrammarError>
    where
        R: IntoIterator<Item = Rule>,
        T: IntoIterator<Item = (String, String)>,
    {
        let terminals: Vec<(String, String)> = terminals.into_iter().collect();
        let mut non_terminal_order = Vec::new();
        let mut rule_map: HashMap<String, Rule> = HashMap::new();
        for rule in rules {
            if !rule_map.contains_key(&rule.head) {
                non_terminal_order.push(rule.head.clone());
            }
            rule_map.insert(rule.head.clone(), rule);
        }

        if rule_map.is_empty() {
            return Err(GrammarError::EmptyGrammar);
        }

        let terminal_names: std::collections::HashSet<&str> =
            terminals.iter().map(|(t, _)| t.as_str()).collect();

        for name in &non_terminal_order {
            if terminal_names.contains(name.as_str()) {
                return Err(GrammarError::SymbolCollision(name.clone()));
            }
        }

        if !rule_map.contains_key(start) {
            return Err(GrammarError::MissingStart(start.to_string()));
        }

        let grammar = Self {
            terminals,
            non_terminal_order,
            rules: rule_map,
            start: start.to_string(),
        };

        for head in &grammar.non_terminal_order {
            let rule = &grammar.rules[head];
            for production in rule.alternatives() {
                for symbol in production.symbols() {
                    if symbol != EPSILON && !grammar.is_terminal(symbol) && !grammar.is_non_terminal(symbol) {
                        return Err(GrammarError::UnknownSymbol {
                            production_head: head.clone(),
                            symbol: symbol.clone(),
                        });
                    }
                }
            }
        }

        Ok(grammar)
    }

    pub fn start(&self) -> &str {
        &self.start
    }

    pub fn is_terminal(&self, symbol: &str) -> bool {
        self.terminals.iter().any(|(t, _)| t == symbol)
    }

    pub fn is_non_terminal(&self, symbol: &str) -> bool {
        self.rules.contains_key(symbol)
    }

    pub fn terminals(&self) -> &[(String, String)] {
        &self.terminals
    }

    pub fn terminal_label(&self, terminal: &str) -> Option<&str> {
        if terminal == END {
            return Some("end of input");
        }
        self.terminals
            .iter()
            .find(|(t, _)| t == terminal)
            .map(|(_, label)| label.as_str())
    }

    pub fn non_terminals(&self) -> &[String] {
        &self.non_terminal_order
    }

    pub fn rule(&self, head: &str) -> Option<&Rule> {
        self.rules.get(head)
    }

    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.non_terminal_order.iter().map(move |h| &self.rules[h])
    }

    /// Build a fresh, grammar-wide-unique symbol name by appending `-P`, `-P2`, …
    /// to `base` until the candidate is free of every known terminal and non-terminal.
    pub fn unique_name(&self, base: &str) -> String {
        let mut candidate = format!("{}-P", base);
        let mut suffix = 2;
        while self.is_terminal(&candidate) || self.is_non_terminal(&candidate) {
            candidate = format!("{}-P{}", base, suffix);
            suffix += 1;
        }
        candidate
    }

    /// Build the augmented grammar used by all LR constructions: adds `S' -> S`
    /// with a freshly generated start symbol `S'`.
    pub fn augment(&self) -> (Self, String) {
        let new_start = self.unique_name(&self.start);
        let mut rules: Vec<Rule> = vec![Rule::with_alternatives(
            new_start.clone(),
            vec![Production::new([self.start.clone()])],
        )];
        rules.extend(self.rules().cloned());
        let grammar = Self::new(rules, self.terminals.clone(), &new_start)
            .expect("augmenting a valid grammar cannot fail validation");
        (grammar, new_start)
    }
}
