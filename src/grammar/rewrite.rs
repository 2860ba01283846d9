//! Grammar rewrite passes: ε-elimination, unit-production elimination,
//! left-recursion elimination, and left-factoring. Each returns a new
//! [Grammar]; the receiver is never mutated.

use super::{Grammar, Production, Rule, EPSILON};
use std::collections::{HashMap, HashSet};

impl Grammar {
    /// Eliminate every ε-production except possibly the start symbol's.
    ///
    /// For a production with k nullable symbols, every one of the 2^k
    /// subsets obtained by variously omitting those symbols is added back
    /// (the all-omitted subset is skipped unless the head is nullable and
    /// has no other alternative, in which case the empty production must
    /// survive to keep the head itself nullable).
    pub fn remove_epsilons(&self) -> Self {
        let nullable = self.nullable_set();
        let mut rules = Vec::new();
        for head in self.non_terminals() {
            let rule = self.rule(head).unwrap();
            let mut new_rule = Rule::new(head.clone());
            for production in rule.alternatives() {
                if production.is_epsilon() {
                    // Only the start symbol may keep its own ε-production.
                    if head == self.start() {
                        new_rule.push(Production::epsilon());
                    }
                    continue;
                }
                let symbols = production.symbols();
                let nullable_positions: Vec<usize> = symbols
                    .iter()
                    .enumerate()
                    .filter(|(_, s)| nullable.contains(s.as_str()))
                    .map(|(i, _)| i)
                    .collect();

                let k = nullable_positions.len();
                for mask in 0..(1u32 << k) {
                    let omit: HashSet<usize> = nullable_positions
                        .iter()
                        .enumerate()
                        .filter(|(bit, _)| mask & (1 << bit) != 0)
                        .map(|(_, &pos)| pos)
                        .collect();
                    let new_symbols: Vec<String> = symbols
                        .iter()
                        .enumerate()
                        .filter(|(i, _)| !omit.contains(i))
                        .map(|(_, s)| s.clone())
                        .collect();
                    if new_symbols.is_empty() {
                        if head == self.start() {
                            new_rule.push(Production::epsilon());
                        }
                        continue;
                    }
                    new_rule.push(Production::new(new_symbols));
                }
            }
            rules.push(new_rule);
        }
        Grammar::new(rules, self.terminals().to_vec(), self.start())
            .expect("removing epsilons from a valid grammar cannot fail validation")
    }

    /// The unit-closure of `head`: every non-terminal reachable via a chain
    /// of unit productions `A -> B`, including `head` itself.
    pub fn unit_closure(&self, head: &str) -> HashSet<String> {
        let mut closure = HashSet::new();
        closure.insert(head.to_string());
        let mut frontier = vec![head.to_string()];
        while let Some(current) = frontier.pop() {
            if let Some(rule) = self.rule(&current) {
                for production in rule.alternatives() {
                    if production.len() == 1 && self.is_non_terminal(&production.symbols()[0]) {
                        let target = production.symbols()[0].clone();
                        if closure.insert(target.clone()) {
                            frontier.push(target);
                        }
                    }
                }
            }
        }
        closure
    }

    /// Replace each non-terminal's productions with the union of the
    /// non-unit productions of every member of its unit-closure, preserving
    /// original alternation order.
    pub fn remove_unit_productions(&self) -> Self {
        let mut rules = Vec::new();
        for head in self.non_terminals() {
            let mut new_rule = Rule::new(head.clone());
            for member in self.unit_closure(head) {
                let member_rule = self.rule(&member).unwrap();
                for production in member_rule.alternatives() {
                    let is_unit =
                        production.len() == 1 && self.is_non_terminal(&production.symbols()[0]);
                    if !is_unit {
                        new_rule.push(production.clone());
                    }
                }
            }
            rules.push(new_rule);
        }
        Grammar::new(rules, self.terminals().to_vec(), self.start())
            .expect("removing unit productions from a valid grammar cannot fail validation")
    }

    /// Remove direct and indirect left recursion.
    ///
    /// First removes ε-productions and unit productions, then applies the
    /// standard substitution/elimination algorithm over the non-terminals in
    /// their declared order, pruning any rule left unreachable from the start
    /// symbol.
    pub fn remove_left_recursion(&self) -> Self {
        let base = self.remove_epsilons().remove_unit_productions();
        let order: Vec<String> = base.non_terminals().to_vec();

        let mut productions: HashMap<String, Vec<Production>> = order
            .iter()
            .map(|h| (h.clone(), base.rule(h).unwrap().alternatives().to_vec()))
            .collect();
        let mut fresh_rules: Vec<Rule> = Vec::new();

        for i in 0..order.len() {
            let ai = order[i].clone();
            // Substitute any leading A_j (j < i) with A_j's current alternatives.
            let mut substituted: Vec<Production> = Vec::new();
            for production in productions[&ai].clone() {
                let symbols = production.symbols();
                if let Some(first) = symbols.first() {
                    if let Some(j) = order[..i].iter().position(|h| h == first) {
                        let aj = &order[j];
                        for aj_alt in &productions[aj] {
                            let mut new_symbols = aj_alt.symbols().to_vec();
                            new_symbols.extend_from_slice(&symbols[1..]);
                            substituted.push(Production::new(new_symbols));
                        }
                        continue;
                    }
                }
                substituted.push(production);
            }

            // Eliminate immediate left recursion on A_i.
            let (recursive, non_recursive): (Vec<Production>, Vec<Production>) = substituted
                .into_iter()
                .partition(|p| p.symbols().first() == Some(&ai));

            if recursive.is_empty() {
                productions.insert(ai.clone(), non_recursive);
            } else {
                let tail = base.unique_name(&ai);
                let mut ai_alts: Vec<Production> = Vec::new();
                for beta in &non_recursive {
                    let mut symbols = beta.symbols().to_vec();
                    symbols.push(tail.clone());
                    ai_alts.push(Production::new(symbols));
                }
                productions.insert(ai.clone(), ai_alts);

                let mut tail_alts: Vec<Production> = Vec::new();
                for alpha in &recursive {
                    let mut symbols = alpha.symbols()[1..].to_vec();
                    symbols.push(tail.clone());
                    tail_alts.push(Production::new(symbols));
                }
                tail_alts.push(Production::epsilon());
                productions.insert(tail.clone(), tail_alts);
                fresh_rules.push(Rule::with_alternatives(tail, Vec::new()));
            }
        }

        let mut rules: Vec<Rule> = order
            .iter()
            .map(|h| Rule::with_alternatives(h.clone(), productions[h].clone()))
            .collect();
        for fresh in fresh_rules {
            rules.push(Rule::with_alternatives(
                fresh.head.clone(),
                productions[&fresh.head].clone(),
            ));
        }

        let grammar = Grammar::new(rules, base.terminals().to_vec(), base.start())
            .expect("eliminating left recursion from a valid grammar cannot fail validation");
        grammar.prune_unreachable()
    }

    /// Drop non-terminals unreachable from the start symbol.
    fn prune_unreachable(&self) -> Self {
        let mut reachable: HashSet<String> = HashSet::new();
        let mut frontier = vec![self.start().to_string()];
        reachable.insert(self.start().to_string());
        while let Some(head) = frontier.pop() {
            if let Some(rule) = self.rule(&head) {
                for production in rule.alternatives() {
                    for symbol in production.symbols() {
                        if self.is_non_terminal(symbol) && reachable.insert(symbol.clone()) {
                            frontier.push(symbol.clone());
                        }
                    }
                }
            }
        }
        let rules: Vec<Rule> = self
            .non_terminals()
            .iter()
            .filter(|h| reachable.contains(h.as_str()))
            .map(|h| self.rule(h).unwrap().clone())
            .collect();
        Grammar::new(rules, self.terminals().to_vec(), self.start())
            .expect("pruning unreachable rules from a valid grammar cannot fail validation")
    }

    /// Repeatedly factor out the longest common prefix shared by two or more
    /// alternatives of a rule into a fresh non-terminal.
    pub fn left_factor(&self) -> Self {
        let mut rules: Vec<Rule> = self.rules().cloned().collect();
        let mut extra_rules: Vec<Rule> = Vec::new();
        let mut naming = self.clone();

        let mut i = 0;
        while i < rules.len() {
            rules[i] = Self::factor_rule(rules[i].clone(), &mut naming, &mut extra_rules);
            i += 1;
        }
        rules.extend(extra_rules);

        Grammar::new(rules, self.terminals().to_vec(), self.start())
            .expect("left-factoring a valid grammar cannot fail validation")
    }

    /// Factor a single rule to a fixed point, minting a fresh non-terminal
    /// (appended to `extra_rules`) for every shared prefix found.
    fn factor_rule(rule: Rule, naming: &mut Grammar, extra_rules: &mut Vec<Rule>) -> Rule {
        let mut alts = rule.alternatives().to_vec();
        loop {
            let prefix_len = longest_shared_prefix(&alts);
            if prefix_len == 0 {
                return Rule::with_alternatives(rule.head.clone(), alts);
            }
            let groups = group_by_prefix(&alts, prefix_len);
            let (shared_prefix, members) = groups
                .into_iter()
                .filter(|(_, members)| members.len() >= 2)
                .max_by_key(|(prefix, members)| (members.len(), prefix.len()))
                .expect("a positive longest shared prefix implies a group of >= 2 members");

            let fresh = naming.unique_name(&rule.head);
            naming.register_synthesized_non_terminal(&fresh);

            let mut fresh_rule = Rule::new(fresh.clone());
            for member in &members {
                fresh_rule.push(Production::new(member.symbols()[prefix_len..].to_vec()));
            }
            extra_rules.push(fresh_rule);

            let mut new_alts: Vec<Production> = alts
                .iter()
                .filter(|p| !members.contains(p))
                .cloned()
                .collect();
            let mut new_prefix = shared_prefix;
            new_prefix.push(fresh);
            new_alts.push(Production::new(new_prefix));
            alts = new_alts;
        }
    }
}

// `Grammar::unique_name` only consults terminals/non-terminals already present
// at construction time; left-factoring synthesizes rules incrementally so we
// register freshly minted names here to keep `unique_name` collision-free.
impl Grammar {
    fn register_synthesized_non_terminal(&mut self, fresh: &str) {
        self.non_terminal_order.push(fresh.to_string());
        self.rules
            .insert(fresh.to_string(), Rule::new(fresh.to_string()));
    }
}

fn longest_shared_prefix(alts: &[Production]) -> usize {
    let mut best = 0;
    for i in 0..alts.len() {
        for j in (i + 1)..alts.len() {
            let a = alts[i].symbols();
            let b = alts[j].symbols();
            let mut len = 0;
            while len < a.len() && len < b.len() && a[len] == b[len] {
                len += 1;
            }
            best = best.max(len);
        }
    }
    best
}

fn group_by_prefix(alts: &[Production], prefix_len: usize) -> Vec<(Vec<String>, Vec<Production>)> {
    let mut groups: Vec<(Vec<String>, Vec<Production>)> = Vec::new();
    for alt in alts {
        if alt.symbols().len() < prefix_len {
            continue;
        }
        let prefix = alt.symbols()[..prefix_len].to_vec();
        if let Some((_, members)) = groups.iter_mut().find(|(p, _)| p == &prefix) {
            members.push(alt.clone());
        } else {
            groups.push((prefix, vec![alt.clone()]));
        }
    }
    groups
}
