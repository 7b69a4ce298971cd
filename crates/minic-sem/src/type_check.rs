//! Bottom-up type analysis.
//!
//! Each expression returns the `Type` it computed and writes that same
//! value into the node's own `ty` slot. `require` is the recovery
//! discipline the rest of the pass is built on: on mismatch it reports
//! `TypeMismatch` but returns the expected type anyway, so one bad operand
//! does not cascade into a diagnostic at every node above it. This is
//! deliberately preserved rather than threaded through a `Result` — see
//! the open question recorded in the design notes.

use minic_ast::{EntryId, Expr, Position, Stmt, Type};
use minic_util::diagnostic::DiagnosticCode;
use minic_util::{Handler, IndexVec};

use crate::scope::EnvEntry;

/// Analyzes `expr`, reports a mismatch against `expected`, and returns
/// `expected` regardless of the actual result — callers that already know
/// what type they need call this instead of `infer` + manual comparison.
fn require(
    expr: &Expr,
    expected: Type,
    entries: &IndexVec<EntryId, EnvEntry>,
    handler: &Handler,
) -> Type {
    let actual = infer(expr, entries, handler);
    if actual != expected {
        report_mismatch(expr.position(), expected, actual, handler);
    }
    expected
}

/// Two-type variant of `require`: accepts either `expected` or `alt` without
/// reporting, used where the spec's typing rule for a construct genuinely
/// allows two types (codegen does not need this today but `type_check`
/// exposes it for symmetry with the one-type form).
#[allow(dead_code)]
fn require_one_of(
    expr: &Expr,
    expected: Type,
    alt: Type,
    entries: &IndexVec<EntryId, EnvEntry>,
    handler: &Handler,
) -> Type {
    let actual = infer(expr, entries, handler);
    if actual == expected || actual == alt {
        actual
    } else {
        report_mismatch(expr.position(), expected, actual, handler);
        expected
    }
}

fn report_mismatch(position: Position, expected: Type, actual: Type, handler: &Handler) {
    handler
        .build_error(
            position,
            format!("type mismatch: expected {expected:?}, found {actual:?}"),
        )
        .code(DiagnosticCode::E_TYPE_MISMATCH)
        .emit(handler);
}

/// Infers the type of `expr`, writing it into the node's `ty` slot.
fn infer(expr: &Expr, entries: &IndexVec<EntryId, EnvEntry>, handler: &Handler) -> Type {
    let ty = match expr {
        Expr::IntLit { .. } => Type::Int,
        Expr::BoolLit { .. } => Type::Boolean,
        Expr::Id { binding, .. } => {
            let id = binding.get().expect("Id not bound by scope analysis");
            entries[id].ty
        }
        Expr::Arith { lhs, rhs, .. } => {
            require(lhs, Type::Int, entries, handler);
            require(rhs, Type::Int, entries, handler);
            Type::Int
        }
        Expr::Rel { lhs, rhs, .. } => {
            require(lhs, Type::Int, entries, handler);
            require(rhs, Type::Int, entries, handler);
            Type::Boolean
        }
        Expr::Logic { lhs, rhs, .. } => {
            require(lhs, Type::Boolean, entries, handler);
            require(rhs, Type::Boolean, entries, handler);
            Type::Boolean
        }
        Expr::Unary { operand, .. } => {
            require(operand, Type::Int, entries, handler);
            Type::Int
        }
        Expr::LNot { operand, .. } => {
            require(operand, Type::Boolean, entries, handler);
            Type::Boolean
        }
        Expr::Assign { lhs, rhs, .. } => {
            let lhs_ty = infer(lhs, entries, handler);
            require(rhs, lhs_ty, entries, handler);
            lhs_ty
        }
    };
    expr.set_ty(ty);
    ty
}

pub fn check_stmt(stmt: &Stmt, entries: &IndexVec<EntryId, EnvEntry>, handler: &Handler) {
    match stmt {
        Stmt::Empty { .. } => {}
        Stmt::Seq { first, rest } => {
            check_stmt(first, entries, handler);
            check_stmt(rest, entries, handler);
        }
        Stmt::If {
            test,
            then_branch,
            else_branch,
            ..
        } => {
            require(test, Type::Boolean, entries, handler);
            check_stmt(then_branch, entries, handler);
            check_stmt(else_branch, entries, handler);
        }
        Stmt::While { test, body, .. } => {
            require(test, Type::Boolean, entries, handler);
            check_stmt(body, entries, handler);
        }
        Stmt::Assign { expr, .. } => {
            infer(expr, entries, handler);
        }
        Stmt::Print { expr, .. } => {
            require(expr, Type::Int, entries, handler);
        }
        Stmt::ExprStmt { expr, .. } => {
            infer(expr, entries, handler);
        }
        Stmt::Block { decls, body, .. } => {
            for decl in decls {
                check_stmt(decl, entries, handler);
            }
            check_stmt(body, entries, handler);
        }
        Stmt::VarDecl {
            declared_type, init, ..
        } => {
            if let Some(init_expr) = init {
                require(init_expr, *declared_type, entries, handler);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minic_ast::{ArithOp, Symbol};
    use minic_util::span::Span;

    fn pos() -> Position {
        Span::DUMMY
    }

    fn entries_with_one_int() -> (IndexVec<EntryId, EnvEntry>, EntryId) {
        let mut entries: IndexVec<EntryId, EnvEntry> = IndexVec::new();
        let id = entries.push(EnvEntry {
            name: Symbol::intern("x"),
            ty: Type::Int,
            position: pos(),
            is_error: false,
            slot: std::cell::Cell::new(None),
        });
        (entries, id)
    }

    #[test]
    fn arithmetic_infers_int() {
        let handler = Handler::new();
        let (entries, _) = entries_with_one_int();
        let expr = Expr::arith(pos(), ArithOp::Add, Expr::int_lit(pos(), 1), Expr::int_lit(pos(), 2));
        let ty = infer(&expr, &entries, &handler);
        assert_eq!(ty, Type::Int);
        assert!(!handler.has_errors());
    }

    #[test]
    fn comparing_wrong_type_reports_mismatch_and_recovers() {
        let handler = Handler::new();
        let (entries, _) = entries_with_one_int();
        let expr = Expr::arith(pos(), ArithOp::Add, Expr::bool_lit(pos(), true), Expr::int_lit(pos(), 2));
        let ty = infer(&expr, &entries, &handler);
        assert_eq!(ty, Type::Int);
        assert_eq!(handler.error_count(), 1);
    }

    #[test]
    fn id_reads_its_entrys_declared_type() {
        let handler = Handler::new();
        let (entries, id) = entries_with_one_int();
        let id_expr = Expr::id(pos(), Symbol::intern("x"));
        id_expr.set_binding(id);
        let ty = infer(&id_expr, &entries, &handler);
        assert_eq!(ty, Type::Int);
    }

    #[test]
    fn if_test_must_be_boolean() {
        let handler = Handler::new();
        let (entries, _) = entries_with_one_int();
        let stmt = Stmt::if_stmt(
            pos(),
            Expr::int_lit(pos(), 1),
            Stmt::Empty { position: pos() },
            Stmt::Empty { position: pos() },
        );
        check_stmt(&stmt, &entries, &handler);
        assert_eq!(handler.error_count(), 1);
    }
}
