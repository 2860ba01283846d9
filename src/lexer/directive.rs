//! Parses the declarative lexer-rule mini-language (§6): one pattern per
//! line, followed by `%token`, `%human`, and `%stateshift` directives, with
//! standalone `%state NAME` lines switching which state subsequent pattern
//! lines belong to.

use super::{LexerAction, PatternRule};
use std::collections::HashMap;
use std::fmt::{self, Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectiveError {
    EmptyPattern(usize),
    UnknownDirective { line: usize, directive: String },
    MissingArgument { line: usize, directive: String },
    UnterminatedString(usize),
    StateBeforePattern(usize),
}

impl Display for DirectiveError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            DirectiveError::EmptyPattern(line) => {
                write!(f, "DirectiveError: line {}: missing pattern", line)
            }
            DirectiveError::UnknownDirective { line, directive } => {
                write!(f, "DirectiveError: line {}: unknown directive '{}'", line, directive)
            }
            DirectiveError::MissingArgument { line, directive } => write!(
                f,
                "DirectiveError: line {}: '{}' requires an argument",
                line, directive
            ),
            DirectiveError::UnterminatedString(line) => {
                write!(f, "DirectiveError: line {}: unterminated \"...\" string", line)
            }
            DirectiveError::StateBeforePattern(line) => write!(
                f,
                "DirectiveError: line {}: '%state' must appear on its own line",
                line
            ),
        }
    }
}

impl std::error::Error for DirectiveError {}

/// The parsed result of a directive source: per-state pattern rules in
/// declaration order, human-readable labels keyed by lower-cased token
/// class, and the first state declared (the implicit start state).
pub struct LexerSpec {
    pub states: Vec<(String, Vec<PatternRule>)>,
    pub human_labels: HashMap<String, String>,
    pub start_state: String,
}

const DEFAULT_STATE: &str = "default";

pub fn parse_directives(source: &str) -> Result<LexerSpec, DirectiveError> {
    let mut states: Vec<(String, Vec<PatternRule>)> = Vec::new();
    let mut human_labels = HashMap::new();
    let mut current_state = DEFAULT_STATE.to_string();
    let mut state_seen = false;

    for (offset, raw_line) in source.lines().enumerate() {
        let line_no = offset + 1;
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(rest) = line.strip_prefix("%state") {
            let name = rest.trim();
            if name.is_empty() {
                return Err(DirectiveError::MissingArgument {
                    line: line_no,
                    directive: "%state".to_string(),
                });
            }
            if name.starts_with('%') {
                return Err(DirectiveError::StateBeforePattern(line_no));
            }
            current_state = name.to_string();
            state_seen = true;
            if !states.iter().any(|(s, _)| s == &current_state) {
                states.push((current_state.clone(), Vec::new()));
            }
            continue;
        }

        let (pattern, tail) = split_pattern(line, line_no)?;
        let rule = parse_directive_tail(&pattern, tail, line_no, &mut human_labels)?;

        if !states.iter().any(|(s, _)| s == &current_state) {
            states.push((current_state.clone(), Vec::new()));
        }
        let entry = states.iter_mut().find(|(s, _)| s == &current_state).unwrap();
        entry.1.push(rule);
    }

    if states.is_empty() {
        states.push((DEFAULT_STATE.to_string(), Vec::new()));
    }
    let start_state = if state_seen {
        states[0].0.clone()
    } else {
        DEFAULT_STATE.to_string()
    };

    Ok(LexerSpec {
        states,
        human_labels,
        start_state,
    })
}

/// Split a pattern line at the first ` %` boundary not inside the pattern's
/// own text, returning the pattern and the remaining directive tail.
fn split_pattern(line: &str, line_no: usize) -> Result<(String, &str), DirectiveError> {
    match line.find(" %") {
        Some(index) => {
            let pattern = line[..index].trim();
            if pattern.is_empty() {
                return Err(DirectiveError::EmptyPattern(line_no));
            }
            Ok((pattern.to_string(), line[index + 1..].trim()))
        }
        None => {
            let pattern = line.trim();
            if pattern.is_empty() {
                return Err(DirectiveError::EmptyPattern(line_no));
            }
            Ok((pattern.to_string(), ""))
        }
    }
}

fn parse_directive_tail(
    pattern: &str,
    tail: &str,
    line_no: usize,
    human_labels: &mut HashMap<String, String>,
) -> Result<PatternRule, DirectiveError> {
    let mut token: Option<String> = None;
    let mut stateshift: Option<String> = None;
    let mut rest = tail;

    while !rest.is_empty() {
        rest = rest.trim_start();
        if rest.is_empty() {
            break;
        }
        let (directive, after) = split_word(rest);
        match directive {
            "%token" => {
                let (arg, after) = split_word(after.trim_start());
                if arg.is_empty() {
                    return Err(DirectiveError::MissingArgument {
                        line: line_no,
                        directive: "%token".to_string(),
                    });
                }
                token = Some(arg.to_lowercase());
                rest = after;
            }
            "%human" => {
                let after = after.trim_start();
                let (text, after) = parse_quoted(after, line_no)?;
                let class = token.clone().ok_or_else(|| DirectiveError::MissingArgument {
                    line: line_no,
                    directive: "%human (preceded by %token)".to_string(),
                })?;
                human_labels.insert(class, text);
                rest = after;
            }
            "%stateshift" => {
                let (arg, after) = split_word(after.trim_start());
                if arg.is_empty() {
                    return Err(DirectiveError::MissingArgument {
                        line: line_no,
                        directive: "%stateshift".to_string(),
                    });
                }
                stateshift = Some(arg.to_string());
                rest = after;
            }
            other => {
                return Err(DirectiveError::UnknownDirective {
                    line: line_no,
                    directive: other.to_string(),
                })
            }
        }
    }

    let action = match (token, stateshift) {
        (None, None) => LexerAction::None,
        (Some(class), None) => LexerAction::Scan(class),
        (None, Some(state)) => LexerAction::ShiftState(state),
        (Some(class), Some(state)) => LexerAction::ScanAndShift(class, state),
    };
    Ok(PatternRule::new(pattern, action))
}

fn split_word(s: &str) -> (&str, &str) {
    match s.find(char::is_whitespace) {
        Some(index) => (&s[..index], &s[index..]),
        None => (s, ""),
    }
}

fn parse_quoted(s: &str, line_no: usize) -> Result<(String, &str), DirectiveError> {
    let s = s.trim_start();
    if !s.starts_with('"') {
        return Err(DirectiveError::MissingArgument {
            line: line_no,
            directive: "%human".to_string(),
        });
    }
    let rest = &s[1..];
    match rest.find('"') {
        Some(end) => Ok((rest[..end].to_string(), &rest[end + 1..])),
        None => Err(DirectiveError::UnterminatedString(line_no)),
    }
}
