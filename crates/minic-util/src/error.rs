//! Core error types for the util crate.
//!
//! [`MinicError`] unifies the §7 diagnostic taxonomy (the faults a source
//! program itself can trigger) with the lower-level failures the utility
//! crate's own data structures can raise (a bad symbol handle, an
//! out-of-bounds index, an internal invariant break). Front-end phases
//! report the taxonomy variants through a `Diagnostic` via the `Handler`;
//! this enum exists for callers that need a single `Result<T, E>` rather
//! than the accumulate-and-continue diagnostic style.

use thiserror::Error;

/// Unified error type for the §7 taxonomy plus infrastructure failures.
#[derive(Debug, Error)]
pub enum MinicError {
    /// The left-hand side of an assignment is not an identifier.
    #[error("invalid assignment target")]
    InvalidLValue,

    /// A name is declared twice in the same scope.
    #[error("duplicate declaration: {name}")]
    DuplicateDecl { name: String },

    /// A name is used but never declared in any enclosing scope.
    #[error("undeclared identifier: {name}")]
    UndeclaredId { name: String },

    /// An expression's type does not match what its context requires.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    /// A variable is read on some path before it is definitely assigned.
    #[error("use of possibly-uninitialized variable: {name}")]
    UseBeforeInit { name: String },

    /// An invariant an earlier phase was supposed to establish didn't hold.
    #[error("internal error: {0}")]
    InternalError(String),

    /// A symbol handle did not resolve to an interned string.
    #[error("symbol not found: index {index}")]
    SymbolNotFound { index: u32 },

    /// An `IndexVec` was indexed past its length.
    #[error("index out of bounds: index {index}, length {length}")]
    IndexOutOfBounds { index: usize, length: usize },
}

/// Result type alias for fallible operations across this crate.
pub type Result<T> = std::result::Result<T, MinicError>;
