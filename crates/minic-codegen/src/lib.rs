//! IA-32 code generation: register allocation and AT&T-syntax assembly
//! emission over a type-checked, initialization-checked, simplified
//! `minic-ast` tree.
//!
//! Runs last in the pipeline, after every earlier pass has completed
//! without reporting a diagnostic. Unlike the analysis passes, code
//! generation doesn't accumulate errors through a shared `Handler` — any
//! failure here means an earlier pass's invariant didn't hold, which is
//! always a compiler bug rather than a fault in the source program, so it
//! short-circuits on the first one via `CodeGenError`.

pub mod codegen;
pub mod emit;
pub mod error;
pub mod frame;

pub use codegen::generate;
pub use error::CodeGenError;
