//! The parse tree produced by both drivers (§3, §4.6): a node is either a
//! terminal carrying its originating token, or a non-terminal carrying a
//! symbol and an ordered list of children.

use crate::util::Position;
use ptree::TreeItem;
use std::borrow::Cow;

/// An owned copy of the token that produced a terminal leaf: the stream's
/// borrowed [Token](crate::lexer::Token) does not outlive the lexing pass,
/// but a tree built from it must.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leaf {
    pub class: String,
    pub lexeme: String,
    pub position: Position,
    pub line: String,
}

impl<'c> From<&crate::lexer::Token<'c>> for Leaf {
    fn from(token: &crate::lexer::Token<'c>) -> Self {
        Self {
            class: token.class.as_str().to_string(),
            lexeme: token.lexeme.to_string(),
            position: token.position,
            line: token.line.to_string(),
        }
    }
}

/// A node of a parse tree: either a terminal leaf or a non-terminal with
/// children. Structural equality is recursive on terminal-ness, symbol
/// value, and children (§3).
#[derive(Debug, Clone)]
pub enum Tree {
    Terminal(Leaf),
    NonTerminal {
        symbol: String,
        children: Vec<Tree>,
    },
}

impl Tree {
    pub fn terminal(leaf: Leaf) -> Self {
        Tree::Terminal(leaf)
    }

    pub fn non_terminal(symbol: impl Into<String>, children: Vec<Tree>) -> Self {
        Tree::NonTerminal {
            symbol: symbol.into(),
            children,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Tree::Terminal(_))
    }

    /// The class name for a terminal, or the non-terminal symbol name.
    pub fn symbol(&self) -> &str {
        match self {
            Tree::Terminal(leaf) => &leaf.class,
            Tree::NonTerminal { symbol, .. } => symbol,
        }
    }

    pub fn children(&self) -> &[Tree] {
        match self {
            Tree::Terminal(_) => &[],
            Tree::NonTerminal { children, .. } => children,
        }
    }

    /// The concatenation of terminal lexemes in pre-order traversal (§8
    /// invariant 9: parse trees round-trip to the original token sequence).
    pub fn lexeme_sequence(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_lexemes(&mut out);
        out
    }

    fn collect_lexemes<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Tree::Terminal(leaf) => out.push(leaf.lexeme.as_str()),
            Tree::NonTerminal { children, .. } => {
                for child in children {
                    child.collect_lexemes(out);
                }
            }
        }
    }
}

impl PartialEq for Tree {
    fn eq(&self, other: &Self) -> bool {
        self.is_terminal() == other.is_terminal()
            && self.symbol() == other.symbol()
            && self.children() == other.children()
    }
}

impl TreeItem for Tree {
    type Child = Self;

    fn write_self<W: std::io::Write>(&self, f: &mut W, _: &ptree::Style) -> std::io::Result<()> {
        match self {
            Tree::Terminal(leaf) => write!(f, "{} \"{}\"", leaf.class, leaf.lexeme),
            Tree::NonTerminal { symbol, .. } => write!(f, "{}", symbol),
        }
    }

    fn children(&self) -> Cow<[Self::Child]> {
        Cow::from(self.children())
    }
}

impl Tree {
    pub fn print(&self) -> std::io::Result<()> {
        ptree::print_tree(self)
    }
}
