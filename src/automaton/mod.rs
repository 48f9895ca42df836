//! Automata pipeline: PFA construction, lowering, determinization,
//! minimization, trimming, and enumeration.

mod dfa;
mod enumerator;
mod epsilon_nfa;
mod lowering;
mod pfa;
mod state;
mod subset_construction;
mod symbol;

pub use dfa::Dfa;
pub use enumerator::{Enumerator, Plan};
pub use epsilon_nfa::EpsilonNfa;
pub use lowering::lower;
pub use pfa::{LambdaEdge, LambdaPair, Pfa};
pub use state::{StateId, StateSet};
pub use subset_construction::subset_construction;
pub use symbol::{is_epsilon, SymbolId, SymbolTable, EPSILON};

pub(crate) use enumerator::Cursor;

/// Ceiling on intermediate automaton sizes; shuffle expansion is
/// super-polynomial and this bound turns a runaway construction into
/// a reportable error.
pub(crate) const STATE_LIMIT: usize = 1 << 16;
