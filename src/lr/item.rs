use crate::grammar::Production;
use std::fmt::{self, Display, Formatter};

/// An LR(0) item: a production with a dot marking how much of its body has
/// been recognized. An item with the dot past the body's end is complete;
/// epsilon productions (empty body) start out complete.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Lr0Item {
    pub head: String,
    pub body: Vec<String>,
    pub dot: usize,
}

impl Lr0Item {
    pub fn initial(head: &str, production: &Production) -> Self {
        Self {
            head: head.to_string(),
            body: production.symbols().to_vec(),
            dot: 0,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.dot >= self.body.len()
    }

    pub fn next_symbol(&self) -> Option<&str> {
        self.body.get(self.dot).map(String::as_str)
    }

    pub fn advanced(&self) -> Self {
        Self {
            head: self.head.clone(),
            body: self.body.clone(),
            dot: self.dot + 1,
        }
    }

    pub fn production(&self) -> Production {
        Production::new(self.body.clone())
    }
}

impl Display for Lr0Item {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<&str> = Vec::with_capacity(self.body.len() + 1);
        for (i, symbol) in self.body.iter().enumerate() {
            if i == self.dot {
                parts.push(".");
            }
            parts.push(symbol.as_str());
        }
        if self.dot >= self.body.len() {
            parts.push(".");
        }
        write!(f, "{} -> {}", self.head, parts.join(" "))
    }
}

/// An LR(1) item: an [Lr0Item] core plus a single lookahead terminal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Lr1Item {
    pub core: Lr0Item,
    pub lookahead: String,
}

impl Display for Lr1Item {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.core, self.lookahead)
    }
}
