//! Definite-assignment (initialization) analysis.
//!
//! A direct recursive walk over the tree rather than a fixed-point dataflow
//! pass: the mini-language's control flow is entirely structured
//! (`Seq`/`If`/`While`), so there is no join point a single top-down,
//! left-to-right traversal can't express directly. Each expression node
//! implements `analyze(in) -> out` per the spec's contract; each statement
//! does the same.

use minic_ast::{Expr, Stmt};
use minic_util::diagnostic::DiagnosticCode;
use minic_util::Handler;

use crate::varset::VarSet;

/// Analyzes `program` from the empty initialization set, reporting
/// `UseBeforeInit` for every read that is not definitely assigned. The
/// bitset backing `VarSet` is sized to `entry_count` so every declared
/// variable has a bit, even ones the walk never reaches.
pub fn check_stmt(program: &Stmt, entry_count: usize, handler: &Handler) {
    let _ = entry_count; // bit-set grows on demand; kept for interface symmetry
    analyze_stmt(program, &VarSet::empty(), handler);
}

fn analyze_expr(expr: &Expr, in_set: &VarSet, handler: &Handler) -> VarSet {
    match expr {
        Expr::IntLit { .. } | Expr::BoolLit { .. } => in_set.clone(),
        Expr::Id { binding, position, name, .. } => {
            let id = binding.get().expect("Id not bound by scope analysis");
            if !in_set.contains(id) {
                handler
                    .build_error(
                        *position,
                        format!("`{}` is read here before it is definitely assigned", name.as_str()),
                    )
                    .code(DiagnosticCode::E_INIT_USE_BEFORE_INIT)
                    .emit(handler);
            }
            in_set.clone()
        }
        Expr::Arith { lhs, rhs, .. } | Expr::Rel { lhs, rhs, .. } => {
            let mid = analyze_expr(lhs, in_set, handler);
            analyze_expr(rhs, &mid, handler)
        }
        Expr::Logic { lhs, rhs, .. } => {
            // Short-circuit: the right side may not execute, so its reads
            // must not gate on anything the left side alone initialized,
            // but are still walked for their own error-reporting effect.
            let after_left = analyze_expr(lhs, in_set, handler);
            let _ = analyze_expr(rhs, &after_left, handler);
            after_left
        }
        Expr::Unary { operand, .. } | Expr::LNot { operand, .. } => analyze_expr(operand, in_set, handler),
        Expr::Assign { lhs, rhs, .. } => {
            let after_rhs = analyze_expr(rhs, in_set, handler);
            let id = lhs
                .binding()
                .expect("Assign lhs is always an Id bound by scope analysis");
            after_rhs.add(id)
        }
    }
}

fn analyze_stmt(stmt: &Stmt, in_set: &VarSet, handler: &Handler) -> VarSet {
    match stmt {
        Stmt::Empty { .. } => in_set.clone(),
        Stmt::Seq { first, rest } => {
            let mid = analyze_stmt(first, in_set, handler);
            analyze_stmt(rest, &mid, handler)
        }
        Stmt::If {
            test,
            then_branch,
            else_branch,
            ..
        } => {
            let after_test = analyze_expr(test, in_set, handler);
            let then_out = analyze_stmt(then_branch, &after_test, handler);
            let else_out = analyze_stmt(else_branch, &after_test, handler);
            let common_new = then_out.trim(&after_test).intersect(&else_out.trim(&after_test));
            common_new.union(&after_test)
        }
        Stmt::While { test, body, .. } => {
            let after_test = analyze_expr(test, in_set, handler);
            // The body may never execute; walk it for error reporting only
            // and discard whatever it would have added.
            let _ = analyze_stmt(body, &after_test, handler);
            after_test
        }
        Stmt::Assign { expr, .. } | Stmt::ExprStmt { expr, .. } => analyze_expr(expr, in_set, handler),
        Stmt::Print { expr, .. } => analyze_expr(expr, in_set, handler),
        Stmt::Block { decls, body, .. } => {
            let mut current = in_set.clone();
            for decl in decls {
                current = analyze_stmt(decl, &current, handler);
            }
            analyze_stmt(body, &current, handler)
        }
        Stmt::VarDecl { init, binding, .. } => match init {
            Some(init_expr) => {
                let after_init = analyze_expr(init_expr, in_set, handler);
                let id = binding.get().expect("VarDecl not bound by scope analysis");
                after_init.add(id)
            }
            None => in_set.clone(),
        },
    }
}
