//! Error types for parsing and automaton construction.

use thiserror::Error;

/// Result type for compilation operations.
pub type Result<T> = std::result::Result<T, PrexError>;

/// Errors raised while compiling a parallel regular expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrexError {
    /// The expression violates the grammar.
    #[error("unexpected {unexpected_token} at position {position}")]
    Parse {
        /// The offending token, or "end of input".
        unexpected_token: String,
        /// Byte offset into the expression string.
        position: usize,
    },

    /// An intermediate automaton exceeded the state ceiling.
    #[error("automaton state limit exceeded: {states} states (limit: {limit})")]
    TooLarge { states: usize, limit: usize },
}

/// Errors raised while running plans through a dispatcher.
///
/// Dispatch errors are carried unchanged; the driver never inspects them.
#[derive(Debug, Error)]
pub enum RunError<E> {
    #[error(transparent)]
    Compile(#[from] PrexError),

    #[error("dispatch aborted: {0}")]
    Dispatch(E),
}
