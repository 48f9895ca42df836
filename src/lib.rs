//! Compiles *parallel regular expressions* — classical regexes extended with
//! a binary shuffle operator `&` — into deterministic finite automata and
//! lazily enumerates every accepted interleaving.
//!
//! Each enumerated plan is one sequentially consistent serialization of the
//! concurrent structure the expression describes: shuffle arms may interleave
//! freely, but each arm's internal order is preserved. The [`driver`] routes
//! plans through a host-supplied dispatcher to execute them.
//!
//! ```
//! use prex::{compile, CompileOptions};
//!
//! let mut compiled = compile("A&B", CompileOptions::default()).unwrap();
//! let plans: Vec<String> = compiled
//!     .plans()
//!     .unwrap()
//!     .iter()
//!     .map(|p| p.render())
//!     .collect();
//! assert_eq!(plans, vec!["A B ", "B A "]);
//! ```

pub mod ast;
pub mod automaton;
pub mod driver;
pub mod error;
pub mod parser;

pub use ast::Expr;
pub use automaton::{Dfa, Enumerator, EpsilonNfa, Pfa, Plan, SymbolId, SymbolTable};
pub use driver::{compile, Compiled, CompileOptions};
pub use error::{PrexError, Result, RunError};
