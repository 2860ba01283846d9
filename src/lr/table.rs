//! LR parse table construction (SLR(1), CLR(1), LALR(1)) and its canonical
//! text-grid rendering (§4.5).

use super::automaton::{lalr_via_kernels, lalr_via_merge, lr0_automaton, lr1_automaton};
use super::item::{Lr0Item, Lr1Item};
use crate::automaton::Dfa;
use crate::grammar::{Grammar, Production, END};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{self, Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Shift(String),
    Reduce(String, Production),
    Accept,
}

impl Display for Action {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Action::Shift(state) => write!(f, "s{}", state),
            Action::Reduce(head, production) => write!(f, "r{} -> {}", head, production),
            Action::Accept => write!(f, "acc"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    ShiftReduce {
        state: String,
        terminal: String,
        shift: Action,
        reduce: Action,
    },
    ReduceReduce {
        state: String,
        terminal: String,
        first: Action,
        second: Action,
    },
    /// A post-merge check (direct-NFA-to-DFA) failed: the grammar is not LALR(1).
    NotLalr,
}

impl Display for TableError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            TableError::ShiftReduce { state, terminal, shift, reduce } => write!(
                f,
                "TableError: shift/reduce conflict in state {} on '{}': {} vs {}",
                state, terminal, shift, reduce
            ),
            TableError::ReduceReduce { state, terminal, first, second } => write!(
                f,
                "TableError: reduce/reduce conflict in state {} on '{}': {} vs {}",
                state, terminal, first, second
            ),
            TableError::NotLalr => write!(f, "TableError: grammar is not LALR(1)"),
        }
    }
}

impl std::error::Error for TableError {}

/// A built LR parse table: per-state ACTION entries over terminals (plus
/// `$`) and GOTO entries over non-terminals.
#[derive(Debug, Clone)]
pub struct Table {
    states: Vec<String>,
    terminals: Vec<String>,
    non_terminals: Vec<String>,
    action: BTreeMap<(String, String), Action>,
    goto: BTreeMap<(String, String), String>,
    pub warnings: Vec<String>,
}

impl Table {
    pub fn states(&self) -> &[String] {
        &self.states
    }

    pub fn initial_state(&self) -> &str {
        &self.states[0]
    }

    pub fn action(&self, state: &str, terminal: &str) -> Option<&Action> {
        self.action.get(&(state.to_string(), terminal.to_string()))
    }

    pub fn goto(&self, state: &str, non_terminal: &str) -> Option<&str> {
        self.goto
            .get(&(state.to_string(), non_terminal.to_string()))
            .map(String::as_str)
    }

    /// The terminals for which ACTION[state, _] is defined — used to build
    /// "expected one of ..." syntax error messages (§4.6).
    pub fn expected_terminals(&self, state: &str) -> Vec<&str> {
        self.terminals
            .iter()
            .filter(|t| self.action(state, t).is_some())
            .map(String::as_str)
            .collect()
    }
}

impl PartialEq for Table {
    /// Two tables are equal iff their rendered text grids match (§4.5).
    fn eq(&self, other: &Self) -> bool {
        self.render() == other.render()
    }
}

impl Display for Table {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}

impl Table {
    /// Render the fixed-width text grid described in §4.5: rows are states
    /// (state 0 first), columns are `A:terminal` then `G:non-terminal`.
    pub fn render(&self) -> String {
        let mut columns: Vec<String> = self.terminals.iter().map(|t| format!("A:{}", t)).collect();
        columns.extend(self.non_terminals.iter().map(|n| format!("G:{}", n)));

        let mut cells: Vec<Vec<String>> = Vec::with_capacity(self.states.len());
        for state in &self.states {
            let mut row = Vec::with_capacity(columns.len());
            for terminal in &self.terminals {
                row.push(self.action(state, terminal).map(|a| a.to_string()).unwrap_or_default());
            }
            for non_terminal in &self.non_terminals {
                row.push(self.goto(state, non_terminal).map(str::to_string).unwrap_or_default());
            }
            cells.push(row);
        }

        let mut widths: Vec<usize> = columns.iter().map(String::len).collect();
        for row in &cells {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(cell.len());
            }
        }
        let state_width = self.states.iter().map(String::len).max().unwrap_or(1).max(5);

        let mut out = String::new();
        out.push_str(&" ".repeat(state_width));
        for (column, width) in columns.iter().zip(&widths) {
            out.push_str(&format!(" {:width$}", column, width = width));
        }
        out.push('\n');
        for (state, row) in self.states.iter().zip(&cells) {
            out.push_str(&format!("{:width$}", state, width = state_width));
            for (cell, width) in row.iter().zip(&widths) {
                out.push_str(&format!(" {:width$}", cell, width = width));
            }
            out.push('\n');
        }
        out
    }
}

fn terminal_columns(grammar: &Grammar) -> Vec<String> {
    let mut terminals: Vec<String> = grammar.terminals().iter().map(|(t, _)| t.clone()).collect();
    terminals.push(END.to_string());
    terminals
}

fn numeric_order(states: impl Iterator<Item = String>) -> Vec<String> {
    let mut states: Vec<String> = states.collect();
    states.sort_by_key(|s| s.parse::<usize>().unwrap_or(usize::MAX));
    states
}

/// Build ACTION/GOTO from an LR(0)-shaped automaton (shift/goto targets
/// always come straight from the deterministic transitions) plus a
/// per-(state, completed item) set of reduce lookaheads.
fn build_table(
    augmented: &Grammar,
    original: &Grammar,
    augmented_start: &str,
    lr0: &Dfa<BTreeSet<Lr0Item>>,
    reduce_lookaheads: impl Fn(&str, &Lr0Item) -> BTreeSet<String>,
    resolve_shift_reduce_as_shift: bool,
) -> Result<Table, TableError> {
    let mut action: BTreeMap<(String, String), Action> = BTreeMap::new();
    let mut goto: BTreeMap<(String, String), String> = BTreeMap::new();
    let mut warnings = Vec::new();

    for state in lr0.states() {
        for (symbol, dest) in lr0.transitions_from(state) {
            if augmented.is_non_terminal(symbol) {
                goto.insert((state.to_string(), symbol.to_string()), dest.to_string());
            } else {
                insert_action(
                    &mut action,
                    &mut warnings,
                    resolve_shift_reduce_as_shift,
                    state,
                    symbol,
                    Action::Shift(dest.to_string()),
                )?;
            }
        }
    }

    for state in lr0.states() {
        for item in lr0.value(state).unwrap() {
            if !item.is_complete() {
                continue;
            }
            if item.head == augmented_start {
                insert_action(
                    &mut action,
                    &mut warnings,
                    resolve_shift_reduce_as_shift,
                    state,
                    END,
                    Action::Accept,
                )?;
                continue;
            }
            for terminal in reduce_lookaheads(state, item) {
                insert_action(
                    &mut action,
                    &mut warnings,
                    resolve_shift_reduce_as_shift,
                    state,
                    &terminal,
                    Action::Reduce(item.head.clone(), item.production()),
                )?;
            }
        }
    }

    Ok(Table {
        states: numeric_order(lr0.states().map(str::to_string)),
        terminals: terminal_columns(original),
        non_terminals: original.non_terminals().to_vec(),
        action,
        goto,
        warnings,
    })
}

fn insert_action(
    table: &mut BTreeMap<(String, String), Action>,
    warnings: &mut Vec<String>,
    allow_shift_on_conflict: bool,
    state: &str,
    terminal: &str,
    action: Action,
) -> Result<(), TableError> {
    let key = (state.to_string(), terminal.to_string());
    match table.get(&key) {
        None => {
            table.insert(key, action);
            Ok(())
        }
        Some(existing) if *existing == action => Ok(()),
        Some(existing) => match (existing, &action) {
            (Action::Shift(_), Action::Reduce(..)) | (Action::Reduce(..), Action::Shift(_)) => {
                if allow_shift_on_conflict {
                    let shift = if matches!(existing, Action::Shift(_)) {
                        existing.clone()
                    } else {
                        action.clone()
                    };
                    warnings.push(format!(
                        "shift/reduce conflict on '{}' in state {}: resolved in favor of shift",
                        terminal, state
                    ));
                    table.insert(key, shift);
                    Ok(())
                } else {
                    let (shift, reduce) = if matches!(existing, Action::Shift(_)) {
                        (existing.clone(), action)
                    } else {
                        (action.clone(), existing.clone())
                    };
                    Err(TableError::ShiftReduce {
                        state: state.to_string(),
                        terminal: terminal.to_string(),
                        shift,
                        reduce,
                    })
                }
            }
            _ => Err(TableError::ReduceReduce {
                state: state.to_string(),
                terminal: terminal.to_string(),
                first: existing.clone(),
                second: action,
            }),
        },
    }
}

/// Build the SLR(1) table: reduce lookaheads are FOLLOW(head), ignoring the
/// state the item appears in. `allow_ambiguous` resolves shift/reduce
/// conflicts (dangling-else style) in favor of shift.
pub fn build_slr(grammar: &Grammar, allow_ambiguous: bool) -> Result<Table, TableError> {
    let (augmented, augmented_start) = grammar.augment();
    let lr0 = lr0_automaton(grammar);
    let follow_sets = augmented.follow_sets();
    build_table(
        &augmented,
        grammar,
        &augmented_start,
        &lr0,
        |_state, item| follow_sets.get(&item.head).cloned().unwrap_or_default(),
        allow_ambiguous,
    )
}

/// Build the canonical CLR(1) table: reduce lookaheads come from each item's
/// own explicit lookahead.
pub fn build_clr(grammar: &Grammar) -> Result<Table, TableError> {
    let (augmented, augmented_start) = grammar.augment();
    let clr = lr1_automaton(grammar);
    let lr0 = lr1_to_lr0_shape(&clr);
    let lookaheads = per_state_lookaheads(&clr);
    build_table(
        &augmented,
        grammar,
        &augmented_start,
        &lr0,
        |state, item| {
            lookaheads
                .get(state)
                .and_then(|m| m.get(item))
                .cloned()
                .unwrap_or_default()
        },
        false,
    )
}

/// Build the LALR(1) table via the CLR-merge path (§4.5 option 1), then
/// cross-check it against the efficient kernel-propagation path (option 2):
/// both must render identically, or construction fails as inconsistent.
pub fn build_lalr(grammar: &Grammar) -> Result<Table, TableError> {
    let (augmented, augmented_start) = grammar.augment();

    let merged = lalr_via_merge(grammar).ok_or(TableError::NotLalr)?;
    let merged_lr0 = lr1_to_lr0_shape(&merged);
    let merged_lookaheads = per_state_lookaheads(&merged);
    let via_merge = build_table(
        &augmented,
        grammar,
        &augmented_start,
        &merged_lr0,
        |state, item| {
            merged_lookaheads
                .get(state)
                .and_then(|m| m.get(item))
                .cloned()
                .unwrap_or_default()
        },
        false,
    )?;

    let kernels = lalr_via_kernels(grammar);
    let kernels_lr0 = lr1_to_lr0_shape(&kernels);
    let kernels_lookaheads = per_state_lookaheads(&kernels);
    let via_kernels = build_table(
        &augmented,
        grammar,
        &augmented_start,
        &kernels_lr0,
        |state, item| {
            kernels_lookaheads
                .get(state)
                .and_then(|m| m.get(item))
                .cloned()
                .unwrap_or_default()
        },
        false,
    )?;

    debug_assert_eq!(
        via_merge.render(),
        via_kernels.render(),
        "the CLR-merge and efficient-kernel LALR constructions must agree"
    );

    Ok(via_merge)
}

/// Project an `Lr1Item`-valued automaton down to its LR(0) cores, keeping
/// topology (states, transitions, start) unchanged.
fn lr1_to_lr0_shape(dfa: &Dfa<BTreeSet<Lr1Item>>) -> Dfa<BTreeSet<Lr0Item>> {
    dfa.map_values(|_, items| items.iter().map(|i| i.core.clone()).collect())
}

/// Group each state's `Lr1Item`s by their LR(0) core, collecting lookaheads.
fn per_state_lookaheads(
    dfa: &Dfa<BTreeSet<Lr1Item>>,
) -> BTreeMap<String, BTreeMap<Lr0Item, BTreeSet<String>>> {
    let mut out = BTreeMap::new();
    for state in dfa.states() {
        let mut by_core: BTreeMap<Lr0Item, BTreeSet<String>> = BTreeMap::new();
        for item in dfa.value(state).unwrap() {
            by_core.entry(item.core.clone()).or_default().insert(item.lookahead.clone());
        }
        out.insert(state.to_string(), by_core);
    }
    out
}
