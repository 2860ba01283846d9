//! The composed pipeline (§6): source text → token stream → parse tree →
//! intermediate representation. [FrontendBuilder] mirrors the teacher's
//! explicit-construction configuration style (`Tokenizer::new` +
//! `add_state`) rather than reading ambient configuration.

pub mod markdown;

#[cfg(test)]
mod __tests__;

use crate::grammar::{Grammar, Ll1Conflict, Ll1Table};
use crate::lexer::Lexer;
use crate::lr::{build_clr, build_lalr, build_slr, Table, TableError};
use crate::parser::{drive_ll1, drive_lr, LlParseError, LrSyntaxError, Tree};
use crate::translator::{evaluate_as, AttributeError, Bindings};
use crate::util::Code;
use std::fmt::{self, Display, Formatter};

/// Which table-construction strategy a [Frontend] drives its parse with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserStrategy {
    Ll1,
    Slr,
    Clr,
    Lalr,
}

/// Either table kind a built [Frontend] can hold, named by the strategy
/// that produced it.
enum BuiltTable {
    Ll1(Ll1Table),
    Lr(Table),
}

/// An error raised while freezing a [FrontendBuilder] into a [Frontend].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrontendBuildError {
    Ll1(Ll1Conflict),
    Lr(TableError),
}

impl Display for FrontendBuildError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            FrontendBuildError::Ll1(e) => write!(f, "{}", e),
            FrontendBuildError::Lr(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for FrontendBuildError {}

impl From<Ll1Conflict> for FrontendBuildError {
    fn from(e: Ll1Conflict) -> Self {
        FrontendBuildError::Ll1(e)
    }
}

impl From<TableError> for FrontendBuildError {
    fn from(e: TableError) -> Self {
        FrontendBuildError::Lr(e)
    }
}

/// An error raised while running a built [Frontend] end to end.
#[derive(Debug)]
pub enum FrontendError {
    Lex(crate::ParseError),
    LlSyntax(LlParseError),
    LrSyntax(LrSyntaxError),
    Attribute(AttributeError),
}

impl Display for FrontendError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            FrontendError::Lex(e) => write!(f, "{}", e),
            FrontendError::LlSyntax(e) => write!(f, "{}", e),
            FrontendError::LrSyntax(e) => write!(f, "{}", e),
            FrontendError::Attribute(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for FrontendError {}

/// Builds a [Frontend] from its four explicit ingredients: the grammar, the
/// lexer, the chosen parsing strategy, and the translator's bindings. None
/// of these are read from ambient or global state (§9).
pub struct FrontendBuilder {
    grammar: Grammar,
    lexer: Lexer,
    strategy: ParserStrategy,
    allow_ambiguous: bool,
    bindings: Bindings,
}

impl FrontendBuilder {
    pub fn new(grammar: Grammar, lexer: Lexer) -> Self {
        Self {
            grammar,
            lexer,
            strategy: ParserStrategy::Lalr,
            allow_ambiguous: false,
            bindings: Bindings::new(),
        }
    }

    pub fn strategy(mut self, strategy: ParserStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Resolve shift/reduce conflicts in favor of shift instead of aborting
    /// table construction (only meaningful for [ParserStrategy::Slr]/[ParserStrategy::Clr]).
    pub fn allow_ambiguous(mut self, allow_ambiguous: bool) -> Self {
        self.allow_ambiguous = allow_ambiguous;
        self
    }

    pub fn bindings(mut self, bindings: Bindings) -> Self {
        self.bindings = bindings;
        self
    }

    pub fn build(self) -> Result<Frontend, FrontendBuildError> {
        let table = match self.strategy {
            ParserStrategy::Ll1 => BuiltTable::Ll1(self.grammar.ll1_table()?),
            ParserStrategy::Slr => {
                BuiltTable::Lr(build_slr(&self.grammar, self.allow_ambiguous)?)
            }
            ParserStrategy::Clr => BuiltTable::Lr(build_clr(&self.grammar)?),
            ParserStrategy::Lalr => BuiltTable::Lr(build_lalr(&self.grammar)?),
        };
        Ok(Frontend {
            grammar: self.grammar,
            lexer: self.lexer,
            table,
            bindings: self.bindings,
        })
    }
}

/// A frozen, immutable parser-generator pipeline: source text in, either a
/// parse tree or a fully reduced intermediate representation out.
pub struct Frontend {
    grammar: Grammar,
    lexer: Lexer,
    table: BuiltTable,
    bindings: Bindings,
}

impl Frontend {
    /// Lex and parse `source`, producing a parse tree. Lexing runs eagerly so
    /// a lex error is reported up front rather than mid-parse (§7).
    pub fn parse(&self, source: &str) -> Result<Tree, FrontendError> {
        let code = Code::from(source);
        let mut stream = self
            .lexer
            .eager_stream(&code)
            .map_err(FrontendError::Lex)?;
        match &self.table {
            BuiltTable::Ll1(table) => {
                drive_ll1(&self.grammar, table, &mut stream).map_err(FrontendError::LlSyntax)
            }
            BuiltTable::Lr(table) => {
                drive_lr(&self.grammar, table, &mut stream, None).map_err(FrontendError::LrSyntax)
            }
        }
    }

    /// Parse `source` and reduce the resulting tree to `attribute`, downcast
    /// to `T` — the full pipeline described in §6.
    pub fn translate<T: std::any::Any + Clone>(
        &self,
        source: &str,
        attribute: &str,
    ) -> Result<T, FrontendError> {
        let tree = self.parse(source)?;
        evaluate_as(&self.grammar, &tree, &self.bindings, attribute).map_err(FrontendError::Attribute)
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }
}
