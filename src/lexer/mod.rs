//! Regex-driven, multi-state lexer (§4.3). Configured as a set of
//! (pattern, action, state) rules; exposes a [TokenStream] in lazy or eager
//! execution mode.

mod directive;
mod pattern;
mod stream;

#[cfg(test)]
mod __tests__;

pub use directive::{parse_directives, DirectiveError, LexerSpec};
pub use pattern::PatternError;
pub use stream::{
    EagerTokenStream, LazyTokenStream, Token, TokenClass, TokenStream, ERROR_CLASS, EOF_CLASS,
};

use crate::util::{Code, Log};
use pattern::CompiledPattern;
use std::collections::HashMap;
use std::fmt::{self, Display, Formatter};

/// What a lexer does once a pattern matches (§4.3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexerAction {
    /// Discard the matched lexeme; no token is emitted.
    None,
    /// Emit a token of the given class carrying the matched lexeme.
    Scan(String),
    /// Switch the lexer to the given state; no token is emitted.
    ShiftState(String),
    /// Emit a token of the given class, then switch to the given state.
    ScanAndShift(String, String),
}

/// One (pattern, action) rule declared within a lexer state.
#[derive(Debug, Clone)]
pub struct PatternRule {
    pub pattern: String,
    pub action: LexerAction,
}

impl PatternRule {
    pub fn new(pattern: &str, action: LexerAction) -> Self {
        Self {
            pattern: pattern.to_string(),
            action,
        }
    }
}

/// An error raised while compiling a [Lexer] from its declared rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexerBuildError {
    Pattern(PatternError),
    UnknownState(String),
    NoStates,
}

impl Display for LexerBuildError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            LexerBuildError::Pattern(e) => write!(f, "{}", e),
            LexerBuildError::UnknownState(s) => {
                write!(f, "LexerBuildError: state '{}' is not declared", s)
            }
            LexerBuildError::NoStates => write!(f, "LexerBuildError: lexer declares no states"),
        }
    }
}

impl std::error::Error for LexerBuildError {}

impl From<PatternError> for LexerBuildError {
    fn from(e: PatternError) -> Self {
        LexerBuildError::Pattern(e)
    }
}

/// An error raised while compiling a [Lexer] straight from directive source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexerCompileError {
    Directive(DirectiveError),
    Build(LexerBuildError),
}

impl Display for LexerCompileError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            LexerCompileError::Directive(e) => write!(f, "{}", e),
            LexerCompileError::Build(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for LexerCompileError {}

impl From<DirectiveError> for LexerCompileError {
    fn from(e: DirectiveError) -> Self {
        LexerCompileError::Directive(e)
    }
}

impl From<LexerBuildError> for LexerCompileError {
    fn from(e: LexerBuildError) -> Self {
        LexerCompileError::Build(e)
    }
}

/// A compiled, ready-to-run lexical analyzer: a definition-order list of
/// [CompiledPattern]s per declared state, plus the designated start state.
pub struct Lexer {
    states: HashMap<String, Vec<CompiledPattern>>,
    start_state: String,
    human_labels: HashMap<String, String>,
    log: Option<Log<&'static str>>,
}

impl Lexer {
    /// Compile a lexer from its per-state rule lists. `start_state` must be
    /// one of the declared state names.
    pub fn new<S: Into<String>>(
        rules_by_state: Vec<(String, Vec<PatternRule>)>,
        start_state: S,
    ) -> Result<Self, LexerBuildError> {
        if rules_by_state.is_empty() {
            return Err(LexerBuildError::NoStates);
        }
        let start_state = start_state.into();
        let declared: std::collections::HashSet<String> =
            rules_by_state.iter().map(|(s, _)| s.clone()).collect();
        let mut states = HashMap::new();
        for (state, rules) in rules_by_state {
            let mut compiled = Vec::with_capacity(rules.len());
            for (index, rule) in rules.into_iter().enumerate() {
                match &rule.action {
                    LexerAction::ShiftState(s) | LexerAction::ScanAndShift(_, s) => {
                        if !declared.contains(s) {
                            return Err(LexerBuildError::UnknownState(s.clone()));
                        }
                    }
                    _ => {}
                }
                compiled.push(CompiledPattern::new(index, rule.pattern, rule.action)?);
            }
            states.insert(state, compiled);
        }
        if !states.contains_key(&start_state) {
            return Err(LexerBuildError::UnknownState(start_state));
        }
        Ok(Self {
            states,
            start_state,
            human_labels: HashMap::new(),
            log: None,
        })
    }

    /// Compile a lexer from the declarative directive mini-language (§6).
    pub fn compile(source: &str) -> Result<Self, LexerCompileError> {
        let spec = parse_directives(source)?;
        let mut lexer = Lexer::new(spec.states, spec.start_state)?;
        lexer.human_labels = spec.human_labels;
        Ok(lexer)
    }

    pub fn set_log(&mut self, log: Log<&'static str>) {
        self.log = Some(log);
    }

    pub fn start_state(&self) -> &str {
        &self.start_state
    }

    /// The human-readable label for a token class, registered via `%human`;
    /// falls back to the class name itself when none was declared.
    pub fn human_label<'a>(&'a self, class: &'a str) -> &'a str {
        self.human_labels.get(class).map(String::as_str).unwrap_or(class)
    }

    /// Lazily tokenize `code`: one token computed per [TokenStream::next] call.
    pub fn lazy_stream<'l, 'c>(&'l self, code: &'c Code<'c>) -> LazyTokenStream<'l, 'c> {
        LazyTokenStream::new(self, code)
    }

    /// Eagerly tokenize the whole input up front. Fails on the first lex error.
    pub fn eager_stream<'c>(
        &self,
        code: &'c Code<'c>,
    ) -> Result<EagerTokenStream<'c>, crate::ParseError> {
        EagerTokenStream::build(self, code)
    }

    fn patterns_for(&self, state: &str) -> &[CompiledPattern] {
        self.states
            .get(state)
            .map(Vec::as_slice)
            .unwrap_or_else(|| panic!("lexer state '{}' is not declared", state))
    }
}
