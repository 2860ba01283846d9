//! Bottom-up (shift-reduce) parse table construction: LR(0)/LR(1) item
//! automata (§4.5), SLR(1)/CLR(1)/LALR(1) table construction, and the
//! shift-reduce driver that runs a built [Table] against a token stream.

mod automaton;
mod item;
mod table;

#[cfg(test)]
mod __tests__;

pub use automaton::{lalr_via_kernels, lalr_via_merge, lr0_automaton, lr1_automaton};
pub use item::{Lr0Item, Lr1Item};
pub use table::{build_clr, build_lalr, build_slr, Action, Table, TableError};
