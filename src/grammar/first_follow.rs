//! FIRST and FOLLOW set computation (§4.1 of the design).

use super::{Grammar, EPSILON, END};
use std::collections::{HashMap, HashSet};

impl Grammar {
    /// Whether the non-terminal `head` is nullable, i.e. can derive ε.
    pub fn is_nullable(&self, head: &str) -> bool {
        self.nullable_set().contains(head)
    }

    /// The set of non-terminals that can derive ε, computed to a fixed point.
    pub fn nullable_set(&self) -> HashSet<String> {
        let mut nullable: HashSet<String> = HashSet::new();
        let mut changed = true;
        while changed {
            changed = false;
            for head in self.non_terminals() {
                if nullable.contains(head) {
                    continue;
                }
                let rule = self.rule(head).expect("non-terminal list is authoritative");
                let is_nullable = rule.alternatives().iter().any(|production| {
                    production.is_epsilon()
                        || production
                            .symbols()
                            .iter()
                            .all(|s| s == EPSILON || nullable.contains(s))
                });
                if is_nullable {
                    nullable.insert(head.clone());
                    changed = true;
                }
            }
        }
        nullable
    }

    /// FIRST(symbol) for a single grammar symbol (terminal, non-terminal, or ε).
    pub fn first_of_symbol(&self, symbol: &str) -> HashSet<String> {
        if symbol == EPSILON {
            let mut set = HashSet::new();
            set.insert(EPSILON.to_string());
            return set;
        }
        if self.is_non_terminal(symbol) {
            return self.first_sets().remove(symbol).unwrap_or_default();
        }
        // A terminal, or a reserved pseudo-terminal such as `$` that is not
        // formally declared: FIRST of either is just itself.
        let mut set = HashSet::new();
        set.insert(symbol.to_string());
        set
    }

    /// FIRST(α): the terminals that may begin a string derivable from the
    /// symbol sequence α, plus ε if α ⇒* ε.
    pub fn first(&self, alpha: &[String]) -> HashSet<String> {
        let nullable = self.nullable_set();
        let first_sets = self.first_sets();
        self.first_of_sequence(alpha, &nullable, &first_sets)
    }

    fn first_of_sequence(
        &self,
        alpha: &[String],
        nullable: &HashSet<String>,
        first_sets: &HashMap<String, HashSet<String>>,
    ) -> HashSet<String> {
        let mut result = HashSet::new();
        let mut all_nullable_so_far = true;
        for symbol in alpha {
            if symbol == EPSILON {
                continue;
            }
            let symbol_first = if self.is_non_terminal(symbol) {
                first_sets.get(symbol).cloned().unwrap_or_default()
            } else {
                let mut s = HashSet::new();
                s.insert(symbol.clone());
                s
            };
            result.extend(symbol_first.iter().filter(|s| *s != EPSILON).cloned());
            let symbol_nullable = symbol == EPSILON || nullable.contains(symbol);
            if !symbol_nullable {
                all_nullable_so_far = false;
                break;
            }
        }
        if all_nullable_so_far {
            result.insert(EPSILON.to_string());
        }
        result
    }

    /// FIRST(A) for every non-terminal A, computed together to a fixed point.
    pub fn first_sets(&self) -> HashMap<String, HashSet<String>> {
        let nullable = self.nullable_set();
        let mut first_sets: HashMap<String, HashSet<String>> = self
            .non_terminals()
            .iter()
            .map(|h| (h.clone(), HashSet::new()))
            .collect();

        let mut changed = true;
        while changed {
            changed = false;
            for head in self.non_terminals() {
                let rule = self.rule(head).unwrap();
                let mut additions: HashSet<String> = HashSet::new();
                for production in rule.alternatives() {
                    let seq_first = self.first_of_sequence(production.symbols(), &nullable, &first_sets);
                    additions.extend(seq_first);
                }
                let entry = first_sets.get_mut(head).unwrap();
                let before = entry.len();
                entry.extend(additions);
                if entry.len() != before {
                    changed = true;
                }
            }
        }
        first_sets
    }

    /// FOLLOW(A): terminals that may immediately follow A in some derivation
    /// from the start symbol, including `$` if A can appear at the end.
    pub fn follow(&self, head: &str) -> HashSet<String> {
        self.follow_sets().remove(head).unwrap_or_default()
    }

    /// FOLLOW(A) for every non-terminal A, computed together to a fixed point.
    pub fn follow_sets(&self) -> HashMap<String, HashSet<String>> {
        let nullable = self.nullable_set();
        let first_sets = self.first_sets();
        let mut follow_sets: HashMap<String, HashSet<String>> = self
            .non_terminals()
            .iter()
            .map(|h| (h.clone(), HashSet::new()))
            .collect();
        follow_sets
            .get_mut(self.start())
            .unwrap()
            .insert(END.to_string());

        let mut changed = true;
        while changed {
            changed = false;
            for head in self.non_terminals() {
                let rule = self.rule(head).unwrap();
                for production in rule.alternatives() {
                    let symbols = production.symbols();
                    for (i, symbol) in symbols.iter().enumerate() {
                        if !self.is_non_terminal(symbol) {
                            continue;
                        }
                        let rest = &symbols[i + 1..];
                        let rest_first = self.first_of_sequence(rest, &nullable, &first_sets);
                        let mut additions: HashSet<String> =
                            rest_first.iter().filter(|s| *s != EPSILON).cloned().collect();
                        if rest.is_empty() || rest_first.contains(EPSILON) {
                            let head_follow = follow_sets.get(head).cloned().unwrap_or_default();
                            additions.extend(head_follow);
                        }
                        let entry = follow_sets.get_mut(symbol).unwrap();
                        let before = entry.len();
                        entry.extend(additions);
                        if entry.len() != before {
                            changed = true;
                        }
                    }
                }
            }
        }
        follow_sets
    }
}
