use super::pattern::{CompiledPattern, PatternMatch};
use super::{LexerAction, Lexer};
use crate::util::{Code, Position};
use crate::ParseError;
use std::borrow::Cow;
use std::fmt::{self, Display, Formatter};

pub const ERROR_CLASS: &str = "error";
pub const EOF_CLASS: &str = "eof";

/// A lexical token class, e.g. `"id"` or `"kw_if"`. Class names are
/// lower-cased by [parse_directives](super::parse_directives); the two
/// reserved classes [ERROR_CLASS] and [EOF_CLASS] are never produced by a
/// user-declared `%token`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TokenClass(String);

impl TokenClass {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_error(&self) -> bool {
        self.0 == ERROR_CLASS
    }

    pub fn is_eof(&self) -> bool {
        self.0 == EOF_CLASS
    }
}

impl Display for TokenClass {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TokenClass {
    fn from(s: &str) -> Self {
        TokenClass::new(s)
    }
}

/// A scanned token: its class, the matched text, and its source position.
/// `lexeme` borrows directly from the scanned [Code] except for synthesized
/// error messages and the end-of-input marker, which own their text.
#[derive(Debug, Clone)]
pub struct Token<'c> {
    pub class: TokenClass,
    pub lexeme: Cow<'c, str>,
    pub position: Position,
    pub line: &'c str,
}

impl<'c> Token<'c> {
    pub fn is_error(&self) -> bool {
        self.class.is_error()
    }

    pub fn is_eof(&self) -> bool {
        self.class.is_eof()
    }
}

/// A source of [Token]s, either lazily computed one at a time or built
/// eagerly up front.
pub trait TokenStream<'c> {
    /// Produce the next token. Once end-of-input is reached, every
    /// subsequent call returns an [EOF_CLASS] token at the same position.
    fn next(&mut self) -> Token<'c>;

    /// Look at the next token without consuming it.
    fn peek(&mut self) -> Token<'c>;
}

/// Scans one token per call against a [Lexer]'s compiled patterns,
/// recovering from unmatched input via panic mode (§4.3).
pub struct LazyTokenStream<'l, 'c> {
    lexer: &'l Lexer,
    code: &'c Code<'c>,
    pointer: usize,
    state: String,
    finished: bool,
}

impl<'l, 'c> LazyTokenStream<'l, 'c> {
    pub(crate) fn new(lexer: &'l Lexer, code: &'c Code<'c>) -> Self {
        Self {
            lexer,
            code,
            pointer: 0,
            state: lexer.start_state().to_string(),
            finished: false,
        }
    }

    pub(crate) fn pointer(&self) -> usize {
        self.pointer
    }

    fn eof_token(&self) -> Token<'c> {
        Token {
            class: TokenClass::new(EOF_CLASS),
            lexeme: Cow::Borrowed(""),
            position: self.code.obtain_position(self.pointer),
            line: self.code.line_text(self.pointer),
        }
    }

    fn best_match(&self) -> Option<(PatternMatch, LexerAction)> {
        let patterns = self.lexer.patterns_for(&self.state);
        best_of(patterns, self.code, self.pointer)
    }

    /// Advance past unmatched input one code point at a time, recording the
    /// span consumed, until a pattern matches or input is exhausted.
    fn recover(&mut self) -> (usize, usize) {
        let start = self.pointer;
        loop {
            if self.pointer >= self.code.value.len() {
                return (start, self.pointer);
            }
            let rest = unsafe { std::str::from_utf8_unchecked(&self.code.value[self.pointer..]) };
            let width = rest.chars().next().map(char::len_utf8).unwrap_or(1);
            self.pointer += width;
            if self.pointer >= self.code.value.len() {
                return (start, self.pointer);
            }
            if self.best_match().is_some() {
                return (start, self.pointer);
            }
        }
    }
}

impl<'l, 'c> TokenStream<'c> for LazyTokenStream<'l, 'c> {
    fn next(&mut self) -> Token<'c> {
        loop {
            if self.finished || self.pointer >= self.code.value.len() {
                self.finished = true;
                return self.eof_token();
            }

            let Some((matched, action)) = self.best_match() else {
                let error_position = self.code.obtain_position(self.pointer);
                let error_line = self.code.line_text(self.pointer);
                let (_, _) = self.recover();
                return Token {
                    class: TokenClass::new(ERROR_CLASS),
                    lexeme: Cow::Owned(format!(
                        "unexpected input at {}",
                        error_position
                    )),
                    position: error_position,
                    line: error_line,
                };
            };

            let position = self.code.obtain_position(matched.lexeme_start);
            let line = self.code.line_text(matched.lexeme_start);
            let lexeme = unsafe {
                std::str::from_utf8_unchecked(
                    &self.code.value[matched.lexeme_start..matched.lexeme_end],
                )
            };
            self.pointer = matched.lexeme_end;

            match action {
                LexerAction::None => continue,
                LexerAction::Scan(class) => {
                    return Token {
                        class: TokenClass::new(class),
                        lexeme: Cow::Borrowed(lexeme),
                        position,
                        line,
                    }
                }
                LexerAction::ShiftState(state) => {
                    self.state = state;
                    continue;
                }
                LexerAction::ScanAndShift(class, state) => {
                    let token = Token {
                        class: TokenClass::new(class),
                        lexeme: Cow::Borrowed(lexeme),
                        position,
                        line,
                    };
                    self.state = state;
                    return token;
                }
            }
        }
    }

    fn peek(&mut self) -> Token<'c> {
        let pointer = self.pointer;
        let state = self.state.clone();
        let finished = self.finished;
        let token = self.next();
        self.pointer = pointer;
        self.state = state;
        self.finished = finished;
        token
    }
}

/// Pick the best of all patterns matching at `pointer`: longest overall
/// match wins; ties broken by lowest definition index (§4.3 step 3).
fn best_of<'a>(
    patterns: &'a [CompiledPattern],
    code: &Code,
    pointer: usize,
) -> Option<(PatternMatch, LexerAction)> {
    let mut best: Option<&'a CompiledPattern> = None;
    let mut best_match: Option<PatternMatch> = None;
    for pattern in patterns {
        if let Some(candidate) = pattern.try_match(code, pointer) {
            let better = match &best_match {
                None => true,
                Some(current) => {
                    let candidate_len = candidate.full_match_end - pointer;
                    let current_len = current.full_match_end - pointer;
                    candidate_len > current_len
                        || (candidate_len == current_len
                            && candidate.definition_index < current.definition_index)
                }
            };
            if better {
                best_match = Some(candidate);
                best = Some(pattern);
            }
        }
    }
    best.map(|pattern| (best_match.unwrap(), pattern.action.clone()))
}

/// A token stream whose entire input has been scanned up front. Construction
/// fails at the first lex error, reported as a syntax error (§4.3, §7).
pub struct EagerTokenStream<'c> {
    tokens: Vec<Token<'c>>,
    cursor: usize,
}

impl<'c> EagerTokenStream<'c> {
    pub(crate) fn build(lexer: &Lexer, code: &'c Code<'c>) -> Result<Self, ParseError> {
        let mut stream = LazyTokenStream::new(lexer, code);
        let mut tokens = Vec::new();
        loop {
            let pointer = stream.pointer();
            let token = stream.next();
            if token.is_error() {
                return Err(ParseError::new(pointer, format!("{}", token.lexeme)));
            }
            let is_eof = token.is_eof();
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        Ok(Self { tokens, cursor: 0 })
    }

    pub fn tokens(&self) -> &[Token<'c>] {
        &self.tokens
    }
}

impl<'c> TokenStream<'c> for EagerTokenStream<'c> {
    fn next(&mut self) -> Token<'c> {
        let token = self.tokens[self.cursor.min(self.tokens.len() - 1)].clone();
        if self.cursor < self.tokens.len() - 1 {
            self.cursor += 1;
        }
        token
    }

    fn peek(&mut self) -> Token<'c> {
        self.tokens[self.cursor.min(self.tokens.len() - 1)].clone()
    }
}
