//! LL(1) predictive-table construction (§4.4).

use super::{Grammar, Production, EPSILON};
use std::collections::HashMap;
use std::fmt::{self, Display, Formatter};

/// Two alternatives of the same non-terminal both claim the same
/// `(non-terminal, lookahead)` table cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ll1Conflict {
    pub head: String,
    pub lookahead: String,
    pub first: Production,
    pub second: Production,
}

impl Display for Ll1Conflict {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Ll1Conflict: '{}' has two productions claiming lookahead '{}': '{} -> {}' and '{} -> {}'",
            self.head, self.lookahead, self.head, self.first, self.head, self.second
        )
    }
}

impl std::error::Error for Ll1Conflict {}

/// A predictive parsing table: `M[(non-terminal, terminal-or-$)] -> production`.
#[derive(Debug, Clone, Default)]
pub struct Ll1Table {
    cells: HashMap<(String, String), Production>,
}

impl Ll1Table {
    pub fn get(&self, head: &str, lookahead: &str) -> Option<&Production> {
        self.cells
            .get(&(head.to_string(), lookahead.to_string()))
    }

    pub fn entries(&self) -> impl Iterator<Item = (&(String, String), &Production)> {
        self.cells.iter()
    }
}

impl Grammar {
    /// True iff no two alternatives of any rule have overlapping predict sets,
    /// per the standard LL(1) condition stated in §4.1.
    pub fn is_ll1(&self) -> bool {
        self.ll1_table().is_ok()
    }

    /// Build the LL(1) predictive table, or the first conflict encountered.
    pub fn ll1_table(&self) -> Result<Ll1Table, Ll1Conflict> {
        let nullable = self.nullable_set();
        let follow_sets = self.follow_sets();
        let mut cells: HashMap<(String, String), Production> = HashMap::new();

        for head in self.non_terminals() {
            let rule = self.rule(head).unwrap();
            for production in rule.alternatives() {
                let first = self.first(production.symbols());
                for terminal in first.iter().filter(|s| *s != EPSILON) {
                    insert_cell(&mut cells, head, terminal, production)?;
                }
                let produces_epsilon = production.is_epsilon()
                    || production
                        .symbols()
                        .iter()
                        .all(|s| s == EPSILON || nullable.contains(s));
                if produces_epsilon {
                    for terminal in &follow_sets[head] {
                        insert_cell(&mut cells, head, terminal, production)?;
                    }
                }
            }
        }
        Ok(Ll1Table { cells })
    }
}

fn insert_cell(
    cells: &mut HashMap<(String, String), Production>,
    head: &str,
    terminal: &str,
    production: &Production,
) -> Result<(), Ll1Conflict> {
    let key = (head.to_string(), terminal.to_string());
    match cells.get(&key) {
        Some(existing) if existing != production => Err(Ll1Conflict {
            head: head.to_string(),
            lookahead: terminal.to_string(),
            first: existing.clone(),
            second: production.clone(),
        }),
        _ => {
            cells.insert(key, production.clone());
            Ok(())
        }
    }
}
