//! Algebraic simplification: a bottom-up rewrite over a type-checked
//! `minic-ast` tree.
//!
//! Runs unconditionally once scope, type, and init analysis have all
//! succeeded. Produces a new tree rather than mutating the input in place —
//! every node this pass doesn't touch is a cheap clone, and every node it
//! rewrites carries forward the type analysis already assigned it, per the
//! invariant that simplification preserves type.

pub mod rewrite;

pub use rewrite::simplify_expr;

use minic_ast::Stmt;

/// Runs the simplifier over the whole program, logging entry/exit the same
/// way the other phases do.
#[tracing::instrument(level = "debug", skip_all)]
pub fn simplify_stmt(stmt: &Stmt) -> Stmt {
    tracing::debug!("entering simplification");
    let result = rewrite::simplify_stmt(stmt);
    tracing::info!("leaving simplification");
    result
}
