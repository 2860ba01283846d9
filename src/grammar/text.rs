//! Parser for the human-authored textual grammar syntax of §6:
//! `Head -> a1 a2 | b1 | ε ;` one rule at a time, terminated by `;`.
//!
//! This is a convenience for writing short test grammars; it infers the
//! terminal/non-terminal split from lexical case (upper-case heads are
//! non-terminals, everything else is a terminal) per §3's "lexical case as a
//! structural hint".

use super::{Grammar, GrammarError, Production, Rule, EPSILON};
use std::collections::HashSet;
use std::fmt::{self, Display, Formatter};

/// A malformed textual grammar (missing `;`, empty head, etc).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrammarSyntaxError(pub String);

impl Display for GrammarSyntaxError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "GrammarSyntaxError: {}", self.0)
    }
}

impl std::error::Error for GrammarSyntaxError {}

impl Grammar {
    /// Parse the textual grammar DSL and build a validated [Grammar].
    ///
    /// The first rule's head is taken as the start symbol.
    pub fn parse(source: &str) -> Result<Self, ParseGrammarError> {
        let mut rules: Vec<Rule> = Vec::new();
        let mut start: Option<String> = None;
        let mut terminals: HashSet<String> = HashSet::new();

        for statement in split_statements(source)? {
            let (head, alternatives) = parse_rule(&statement)?;
            if start.is_none() {
                start = Some(head.clone());
            }
            let mut rule = Rule::new(head);
            for alt in alternatives {
                for symbol in &alt {
                    if !is_non_terminal_name(symbol) && symbol != EPSILON {
                        terminals.insert(symbol.clone());
                    }
                }
                rule.push(if alt.len() == 1 && alt[0] == EPSILON {
                    Production::epsilon()
                } else {
                    Production::new(alt)
                });
            }
            rules.push(rule);
        }

        let start = start.ok_or_else(|| {
            ParseGrammarError::Syntax(GrammarSyntaxError("grammar has no rules".into()))
        })?;

        let terminal_list: Vec<(String, String)> = terminals
            .into_iter()
            .map(|name| {
                let label = name.clone();
                (name, label)
            })
            .collect();

        Grammar::new(rules, terminal_list, &start).map_err(ParseGrammarError::Grammar)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseGrammarError {
    Syntax(GrammarSyntaxError),
    Grammar(GrammarError),
}

impl Display for ParseGrammarError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ParseGrammarError::Syntax(e) => write!(f, "{}", e),
            ParseGrammarError::Grammar(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ParseGrammarError {}

fn is_non_terminal_name(symbol: &str) -> bool {
    symbol
        .chars()
        .next()
        .map(|c| c.is_uppercase())
        .unwrap_or(false)
}

fn split_statements(source: &str) -> Result<Vec<String>, ParseGrammarError> {
    let mut statements = Vec::new();
    for raw in source.split(';') {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            statements.push(trimmed.to_string());
        }
    }
    Ok(statements)
}

fn parse_rule(statement: &str) -> Result<(String, Vec<Vec<String>>), ParseGrammarError> {
    let (head, rest) = statement.split_once("->").ok_or_else(|| {
        ParseGrammarError::Syntax(GrammarSyntaxError(format!(
            "rule '{}' is missing '->'",
            statement
        )))
    })?;
    let head = head.trim().to_string();
    if head.is_empty() {
        return Err(ParseGrammarError::Syntax(GrammarSyntaxError(
            "rule head must not be empty".into(),
        )));
    }
    let alternatives = rest
        .split('|')
        .map(|alt| alt.split_whitespace().map(str::to_string).collect())
        .collect();
    Ok((head, alternatives))
}
