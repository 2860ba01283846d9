use super::LexerAction;
use crate::util::Code;
use regex::bytes::Regex;
use std::fmt::{self, Display, Formatter};

/// A pattern that failed to compile, or that would match the empty string,
/// or that declares more than one capturing group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    Invalid { pattern: String, message: String },
    Nullable(String),
    TooManyGroups(String),
}

impl Display for PatternError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            PatternError::Invalid { pattern, message } => {
                write!(f, "PatternError: '{}' is not a valid regex: {}", pattern, message)
            }
            PatternError::Nullable(pattern) => write!(
                f,
                "PatternError: pattern '{}' must not match the empty string",
                pattern
            ),
            PatternError::TooManyGroups(pattern) => write!(
                f,
                "PatternError: pattern '{}' declares more than one capturing group",
                pattern
            ),
        }
    }
}

impl std::error::Error for PatternError {}

/// A match of a [CompiledPattern] against the input at some pointer.
pub(crate) struct PatternMatch {
    /// Index into this pattern's definition order, used for the
    /// first-defined tie-break.
    pub definition_index: usize,
    pub lexeme_start: usize,
    pub lexeme_end: usize,
    /// End of the whole-pattern match (may extend past `lexeme_end` when a
    /// capturing group leaves trailing context unconsumed). Used only to
    /// rank competing patterns by overall match length.
    pub full_match_end: usize,
}

/// One compiled (regex, action) rule. At most one capturing group is
/// permitted in `pattern`; if present, it delimits the lexeme and the new
/// cursor position, leaving any post-group matched text unconsumed (§4.2
/// design notes, §4.3 matching protocol step 5).
pub(crate) struct CompiledPattern {
    definition_index: usize,
    regex: Regex,
    has_group: bool,
    pub action: LexerAction,
}

impl CompiledPattern {
    pub fn new(
        definition_index: usize,
        pattern: String,
        action: LexerAction,
    ) -> Result<Self, PatternError> {
        let regex = Regex::new(&pattern).map_err(|err| PatternError::Invalid {
            pattern: pattern.clone(),
            message: err.to_string(),
        })?;

        if regex.captures_len() > 2 {
            return Err(PatternError::TooManyGroups(pattern));
        }
        let has_group = regex.captures_len() == 2;

        if regex.is_match(b"") {
            return Err(PatternError::Nullable(pattern));
        }

        Ok(Self {
            definition_index,
            regex,
            has_group,
            action,
        })
    }

    /// Attempt this pattern at `pointer`. The caller is responsible for
    /// running every pattern of a state and picking the longest (§4.3 step 3).
    pub fn try_match(&self, code: &Code, pointer: usize) -> Option<PatternMatch> {
        let rest = &code.value[pointer..];
        let captures = self.regex.captures(rest)?;
        debug_assert_eq!(
            captures.get(0).map(|m| m.start()),
            Some(0),
            "lexer patterns must anchor to the start of the remaining input with '^'"
        );
        let group_index = if self.has_group { 1 } else { 0 };
        let target = captures.get(group_index)?;
        let whole = captures.get(0)?;
        Some(PatternMatch {
            definition_index: self.definition_index,
            lexeme_start: pointer + target.start(),
            lexeme_end: pointer + target.end(),
            full_match_end: pointer + whole.end(),
        })
    }
}
