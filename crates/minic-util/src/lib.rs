//! minic-util - Core utilities and foundation types shared by every compiler crate.
//!
//! Provides source-position tracking (`span`), string interning (`symbol`),
//! diagnostic reporting (`diagnostic`), and a typed-index vector
//! (`index_vec`) used throughout the pipeline for arena-style storage.

pub mod diagnostic;
pub mod error;
pub mod index_vec;
pub mod span;
pub mod symbol;

pub use diagnostic::{Diagnostic, DiagnosticBuilder, DiagnosticCode, Handler, Level};
pub use error::MinicError;
pub use index_vec::{Idx, IndexVec};
pub use span::{FileId, Position, SourceFile, SourceMap, Span};
pub use symbol::Symbol;

pub use rustc_hash::{FxHashMap, FxHashSet};
