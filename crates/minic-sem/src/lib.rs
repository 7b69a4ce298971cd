//! Semantic analysis: scope resolution, type checking, and definite-assignment
//! checking over a `minic-ast` tree.
//!
//! The three passes run in strict order — each must complete without
//! reporting anything before the next begins. All three share the caller's
//! `Handler`; it is up to the driver to stop before code generation once any
//! diagnostic has been recorded (see `minic-drv`).

pub mod init;
pub mod scope;
pub mod type_check;
pub mod varset;

pub use scope::{resolve_scopes, EnvEntry};

use minic_ast::{EntryId, Stmt};
use minic_util::{Handler, IndexVec};

/// Runs scope analysis. Returns the resolved entry arena regardless of
/// whether any diagnostic was reported — callers check `handler.has_errors()`
/// before proceeding to [`check_types`].
#[tracing::instrument(level = "debug", skip_all)]
pub fn analyze_scopes(program: &Stmt, handler: &Handler) -> IndexVec<EntryId, EnvEntry> {
    tracing::debug!("entering scope analysis");
    let entries = scope::resolve_scopes(program, handler);
    tracing::info!(entries = entries.len(), diagnostics = handler.error_count(), "leaving scope analysis");
    entries
}

/// Runs type analysis. Requires scope analysis to have already bound every
/// `Id` node; reports `TypeMismatch` for any operator applied to the wrong
/// operand types.
#[tracing::instrument(level = "debug", skip_all)]
pub fn check_types(program: &Stmt, entries: &IndexVec<EntryId, EnvEntry>, handler: &Handler) {
    tracing::debug!("entering type analysis");
    type_check::check_stmt(program, entries, handler);
    tracing::info!(diagnostics = handler.error_count(), "leaving type analysis");
}

/// Runs initialization analysis. Requires every `Id` node to carry both its
/// binding and its type; reports `UseBeforeInit` for any read of a variable
/// not definitely assigned on all paths reaching it.
#[tracing::instrument(level = "debug", skip_all)]
pub fn check_init(program: &Stmt, entry_count: usize, handler: &Handler) {
    tracing::debug!("entering init analysis");
    init::check_stmt(program, entry_count, handler);
    tracing::info!(diagnostics = handler.error_count(), "leaving init analysis");
}
