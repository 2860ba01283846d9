//! Parser drivers (§4.4, §4.6): both the top-down LL(1) engine and the
//! bottom-up shift-reduce engine produce the same [Tree] shape.

mod ll1_driver;
mod lr_driver;
mod tree;

#[cfg(test)]
mod __tests__;

pub use ll1_driver::LlParseError;
pub use lr_driver::LrSyntaxError;
pub use tree::{Leaf, Tree};

/// Drive an LL(1) parse to completion, producing a [Tree].
pub fn drive_ll1<'c>(
    grammar: &crate::grammar::Grammar,
    table: &crate::grammar::Ll1Table,
    stream: &mut dyn crate::lexer::TokenStream<'c>,
) -> Result<Tree, LlParseError> {
    ll1_driver::drive(grammar, table, stream)
}

/// Drive a shift-reduce parse to completion, producing a [Tree]. `trace`
/// receives one string per shift/reduce/accept event when present.
pub fn drive_lr<'c>(
    grammar: &crate::grammar::Grammar,
    table: &crate::lr::Table,
    stream: &mut dyn crate::lexer::TokenStream<'c>,
    trace: Option<&mut dyn FnMut(&str)>,
) -> Result<Tree, LrSyntaxError> {
    lr_driver::drive(grammar, table, stream, trace)
}
