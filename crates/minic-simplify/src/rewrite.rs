//! The rewrite rules themselves.
//!
//! Each binary arithmetic/bitwise node with a simplified, known-integer
//! right operand delegates to a `simp_*` function keyed on the left
//! operator — a two-level match (outer on operator, outer-left on the
//! simplified left subtree) standing in for the source's left-side virtual
//! dispatch. Constant operands are always migrated to the right by
//! commuting first, so every `simp_*` function only has to look at its
//! right-hand literal and its own left subtree.

use minic_ast::{ArithOp, Expr, LogicOp, Position, RelOp, Stmt, Type, UnaryOp};

fn as_int(expr: &Expr) -> Option<i32> {
    match expr {
        Expr::IntLit { value, .. } => Some(*value),
        _ => None,
    }
}

fn as_bool(expr: &Expr) -> Option<bool> {
    match expr {
        Expr::BoolLit { value, .. } => Some(*value),
        _ => None,
    }
}

fn int_lit(position: Position, value: i32) -> Expr {
    let e = Expr::int_lit(position, value);
    e.set_ty(Type::Int);
    e
}

fn bool_lit(position: Position, value: bool) -> Expr {
    let e = Expr::bool_lit(position, value);
    e.set_ty(Type::Boolean);
    e
}

fn is_commutative(op: ArithOp) -> bool {
    matches!(op, ArithOp::Add | ArithOp::Mul | ArithOp::BAnd | ArithOp::BOr | ArithOp::BXor)
}

fn rebuild_arith(position: Position, op: ArithOp, lhs: Expr, rhs: Expr, ty: Type) -> Expr {
    let e = Expr::arith(position, op, lhs, rhs);
    e.set_ty(ty);
    e
}

fn rebuild_unary(position: Position, op: UnaryOp, operand: Expr, ty: Type) -> Expr {
    let e = Expr::unary(position, op, operand);
    e.set_ty(ty);
    e
}

/// `x + n`: zero elimination, constant fold, and `(x + m) + n -> x + (m+n)`
/// re-association.
fn simp_add(position: Position, left: Expr, n: i32, ty: Type) -> Expr {
    if n == 0 {
        return left;
    }
    if let Some(m) = as_int(&left) {
        return int_lit(position, m.wrapping_add(n));
    }
    if let Expr::Arith {
        op: ArithOp::Add,
        lhs: inner_lhs,
        rhs: inner_rhs,
        ..
    } = &left
    {
        if let Some(m) = as_int(inner_rhs) {
            let folded = m.wrapping_add(n);
            return rebuild_arith(position, ArithOp::Add, (**inner_lhs).clone(), int_lit(position, folded), ty);
        }
    }
    rebuild_arith(position, ArithOp::Add, left, int_lit(position, n), ty)
}

/// `x * n`: unit elimination, zero absorption, constant fold, and
/// `(x * m) * n -> x * (m*n)` re-association.
fn simp_mul(position: Position, left: Expr, n: i32, ty: Type) -> Expr {
    if n == 1 {
        return left;
    }
    if n == 0 {
        return int_lit(position, 0);
    }
    if let Some(m) = as_int(&left) {
        return int_lit(position, m.wrapping_mul(n));
    }
    if let Expr::Arith {
        op: ArithOp::Mul,
        lhs: inner_lhs,
        rhs: inner_rhs,
        ..
    } = &left
    {
        if let Some(m) = as_int(inner_rhs) {
            let folded = m.wrapping_mul(n);
            return rebuild_arith(position, ArithOp::Mul, (**inner_lhs).clone(), int_lit(position, folded), ty);
        }
    }
    rebuild_arith(position, ArithOp::Mul, left, int_lit(position, n), ty)
}

/// `x & n`: `& -1` is the identity, `& 0` absorbs to zero.
fn simp_band(position: Position, left: Expr, n: i32, ty: Type) -> Expr {
    if n == -1 {
        return left;
    }
    if n == 0 {
        return int_lit(position, 0);
    }
    if let Some(m) = as_int(&left) {
        return int_lit(position, m & n);
    }
    rebuild_arith(position, ArithOp::BAnd, left, int_lit(position, n), ty)
}

/// `x | n`: `| -1` absorbs to all-ones, `| 0` is the identity.
fn simp_bor(position: Position, left: Expr, n: i32, ty: Type) -> Expr {
    if n == -1 {
        return int_lit(position, -1);
    }
    if n == 0 {
        return left;
    }
    if let Some(m) = as_int(&left) {
        return int_lit(position, m | n);
    }
    rebuild_arith(position, ArithOp::BOr, left, int_lit(position, n), ty)
}

/// `x ^ n`: `^ -1` becomes bitwise complement, `^ 0` is the identity.
fn simp_bxor(position: Position, left: Expr, n: i32, ty: Type) -> Expr {
    if n == -1 {
        return if let Some(m) = as_int(&left) {
            int_lit(position, !m)
        } else {
            rebuild_unary(position, UnaryOp::BNot, left, ty)
        };
    }
    if n == 0 {
        return left;
    }
    if let Some(m) = as_int(&left) {
        return int_lit(position, m ^ n);
    }
    rebuild_arith(position, ArithOp::BXor, left, int_lit(position, n), ty)
}

fn simplify_arith(position: Position, op: ArithOp, lhs: Expr, rhs: Expr, ty: Type) -> Expr {
    let (mut lhs, mut rhs) = (lhs, rhs);
    if is_commutative(op) && as_int(&lhs).is_some() && as_int(&rhs).is_none() {
        std::mem::swap(&mut lhs, &mut rhs);
    }

    match as_int(&rhs) {
        Some(n) => match op {
            ArithOp::Add => simp_add(position, lhs, n, ty),
            ArithOp::Mul => simp_mul(position, lhs, n, ty),
            ArithOp::BAnd => simp_band(position, lhs, n, ty),
            ArithOp::BOr => simp_bor(position, lhs, n, ty),
            ArithOp::BXor => simp_bxor(position, lhs, n, ty),
            ArithOp::Sub => match as_int(&lhs) {
                Some(m) => int_lit(position, m.wrapping_sub(n)),
                None => rebuild_arith(position, ArithOp::Sub, lhs, rhs, ty),
            },
        },
        None => rebuild_arith(position, op, lhs, rhs, ty),
    }
}

fn simplify_rel(position: Position, op: RelOp, lhs: Expr, rhs: Expr, ty: Type) -> Expr {
    if let (Some(a), Some(b)) = (as_int(&lhs), as_int(&rhs)) {
        let result = match op {
            RelOp::Eq => a == b,
            RelOp::Neq => a != b,
            RelOp::Lt => a < b,
            RelOp::Le => a <= b,
            RelOp::Gt => a > b,
            RelOp::Ge => a >= b,
        };
        return bool_lit(position, result);
    }
    let e = Expr::rel(position, op, lhs, rhs);
    e.set_ty(ty);
    e
}

fn simplify_logic(position: Position, op: LogicOp, lhs: Expr, rhs: Expr, ty: Type) -> Expr {
    if let (Some(a), Some(b)) = (as_bool(&lhs), as_bool(&rhs)) {
        let result = match op {
            LogicOp::LAnd => a && b,
            LogicOp::LOr => a || b,
        };
        return bool_lit(position, result);
    }
    let e = Expr::logic(position, op, lhs, rhs);
    e.set_ty(ty);
    e
}

fn simplify_unary(position: Position, op: UnaryOp, operand: Expr, ty: Type) -> Expr {
    if let Expr::Unary { op: inner_op, operand: inner, .. } = &operand {
        if *inner_op == op {
            return (**inner).clone();
        }
    }
    if let Some(m) = as_int(&operand) {
        let folded = match op {
            UnaryOp::Neg => m.wrapping_neg(),
            UnaryOp::BNot => !m,
        };
        return int_lit(position, folded);
    }
    rebuild_unary(position, op, operand, ty)
}

fn simplify_lnot(position: Position, operand: Expr, ty: Type) -> Expr {
    if let Expr::LNot { operand: inner, .. } = &operand {
        return (**inner).clone();
    }
    if let Some(b) = as_bool(&operand) {
        return bool_lit(position, !b);
    }
    let e = Expr::lnot(position, operand);
    e.set_ty(ty);
    e
}

/// Simplifies children first, then applies the local rules above at this
/// node.
pub fn simplify_expr(expr: &Expr) -> Expr {
    match expr {
        Expr::IntLit { .. } | Expr::BoolLit { .. } | Expr::Id { .. } => expr.clone(),
        Expr::Arith { position, op, lhs, rhs, .. } => {
            let ty = expr.ty().expect("type analysis must run before simplification");
            let lhs = simplify_expr(lhs);
            let rhs = simplify_expr(rhs);
            simplify_arith(*position, *op, lhs, rhs, ty)
        }
        Expr::Rel { position, op, lhs, rhs, .. } => {
            let ty = expr.ty().expect("type analysis must run before simplification");
            let lhs = simplify_expr(lhs);
            let rhs = simplify_expr(rhs);
            simplify_rel(*position, *op, lhs, rhs, ty)
        }
        Expr::Logic { position, op, lhs, rhs, .. } => {
            let ty = expr.ty().expect("type analysis must run before simplification");
            let lhs = simplify_expr(lhs);
            let rhs = simplify_expr(rhs);
            simplify_logic(*position, *op, lhs, rhs, ty)
        }
        Expr::Unary { position, op, operand, .. } => {
            let ty = expr.ty().expect("type analysis must run before simplification");
            let operand = simplify_expr(operand);
            simplify_unary(*position, *op, operand, ty)
        }
        Expr::LNot { position, operand, .. } => {
            let ty = expr.ty().expect("type analysis must run before simplification");
            let operand = simplify_expr(operand);
            simplify_lnot(*position, operand, ty)
        }
        Expr::Assign { position, lhs, rhs, .. } => {
            let ty = expr.ty().expect("type analysis must run before simplification");
            let rhs = simplify_expr(rhs);
            let e = Expr::Assign {
                position: *position,
                lhs: Box::new((**lhs).clone()),
                rhs: Box::new(rhs),
                ty: std::cell::Cell::new(None),
            };
            e.set_ty(ty);
            e
        }
    }
}

/// Walks a statement tree, simplifying every expression it holds.
pub fn simplify_stmt(stmt: &Stmt) -> Stmt {
    match stmt {
        Stmt::Empty { position } => Stmt::Empty { position: *position },
        Stmt::Seq { first, rest } => Stmt::seq(simplify_stmt(first), simplify_stmt(rest)),
        Stmt::If {
            position,
            test,
            then_branch,
            else_branch,
        } => Stmt::if_stmt(
            *position,
            simplify_expr(test),
            simplify_stmt(then_branch),
            simplify_stmt(else_branch),
        ),
        Stmt::While { position, test, body } => {
            Stmt::while_stmt(*position, simplify_expr(test), simplify_stmt(body))
        }
        Stmt::Assign { position, expr } => Stmt::Assign {
            position: *position,
            expr: simplify_expr(expr),
        },
        Stmt::Print { position, expr } => Stmt::print(*position, simplify_expr(expr)),
        Stmt::ExprStmt { position, expr } => Stmt::expr_stmt(*position, simplify_expr(expr)),
        Stmt::Block { position, decls, body } => Stmt::block(
            *position,
            decls.iter().map(simplify_stmt).collect(),
            simplify_stmt(body),
        ),
        Stmt::VarDecl {
            position,
            name,
            declared_type,
            init,
            ..
        } => Stmt::var_decl(*position, *name, *declared_type, init.as_ref().map(simplify_expr)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minic_ast::Symbol;
    use minic_util::span::Span;

    fn pos() -> Position {
        Span::DUMMY
    }

    fn typed_int(value: i32) -> Expr {
        let e = Expr::int_lit(pos(), value);
        e.set_ty(Type::Int);
        e
    }

    fn typed_id(name: &str) -> Expr {
        let e = Expr::id(pos(), Symbol::intern(name));
        e.set_ty(Type::Int);
        e
    }

    /// Structural equality ignoring the `ty`/`binding` slots, since freshly
    /// built literal nodes always carry a correct slot anyway.
    fn shape_eq(a: &Expr, b: &Expr) -> bool {
        match (a, b) {
            (Expr::IntLit { value: x, .. }, Expr::IntLit { value: y, .. }) => x == y,
            (Expr::BoolLit { value: x, .. }, Expr::BoolLit { value: y, .. }) => x == y,
            (Expr::Id { name: x, .. }, Expr::Id { name: y, .. }) => x == y,
            (
                Expr::Arith { op: xo, lhs: xl, rhs: xr, .. },
                Expr::Arith { op: yo, lhs: yl, rhs: yr, .. },
            ) => xo == yo && shape_eq(xl, yl) && shape_eq(xr, yr),
            (
                Expr::Rel { op: xo, lhs: xl, rhs: xr, .. },
                Expr::Rel { op: yo, lhs: yl, rhs: yr, .. },
            ) => xo == yo && shape_eq(xl, yl) && shape_eq(xr, yr),
            (
                Expr::Logic { op: xo, lhs: xl, rhs: xr, .. },
                Expr::Logic { op: yo, lhs: yl, rhs: yr, .. },
            ) => xo == yo && shape_eq(xl, yl) && shape_eq(xr, yr),
            (Expr::Unary { op: xo, operand: xp, .. }, Expr::Unary { op: yo, operand: yp, .. }) => {
                xo == yo && shape_eq(xp, yp)
            }
            (Expr::LNot { operand: xp, .. }, Expr::LNot { operand: yp, .. }) => shape_eq(xp, yp),
            (
                Expr::Assign { lhs: xl, rhs: xr, .. },
                Expr::Assign { lhs: yl, rhs: yr, .. },
            ) => shape_eq(xl, yl) && shape_eq(xr, yr),
            _ => false,
        }
    }

    #[test]
    fn add_zero_elides() {
        let e = Expr::arith(pos(), ArithOp::Add, typed_id("x"), typed_int(0));
        e.set_ty(Type::Int);
        let result = simplify_expr(&e);
        assert!(shape_eq(&result, &typed_id("x")));
    }

    #[test]
    fn add_constants_fold() {
        let e = Expr::arith(pos(), ArithOp::Add, typed_int(2), typed_int(3));
        e.set_ty(Type::Int);
        let result = simplify_expr(&e);
        assert!(shape_eq(&result, &typed_int(5)));
    }

    #[test]
    fn add_reassociates_nested_literal() {
        let inner = Expr::arith(pos(), ArithOp::Add, typed_id("x"), typed_int(2));
        inner.set_ty(Type::Int);
        let outer = Expr::arith(pos(), ArithOp::Add, inner, typed_int(3));
        outer.set_ty(Type::Int);
        let result = simplify_expr(&outer);
        let expected = Expr::arith(pos(), ArithOp::Add, typed_id("x"), typed_int(5));
        assert!(shape_eq(&result, &expected));
    }

    #[test]
    fn mul_by_zero_absorbs() {
        let e = Expr::arith(pos(), ArithOp::Mul, typed_id("x"), typed_int(0));
        e.set_ty(Type::Int);
        let result = simplify_expr(&e);
        assert!(shape_eq(&result, &typed_int(0)));
    }

    #[test]
    fn xor_negative_one_becomes_bnot() {
        let e = Expr::arith(pos(), ArithOp::BXor, typed_id("x"), typed_int(-1));
        e.set_ty(Type::Int);
        let result = simplify_expr(&e);
        let expected = Expr::unary(pos(), UnaryOp::BNot, typed_id("x"));
        assert!(shape_eq(&result, &expected));
    }

    #[test]
    fn or_negative_one_becomes_all_ones() {
        let e = Expr::arith(pos(), ArithOp::BOr, typed_id("x"), typed_int(-1));
        e.set_ty(Type::Int);
        let result = simplify_expr(&e);
        assert!(shape_eq(&result, &typed_int(-1)));
    }

    #[test]
    fn double_negation_eliminates() {
        let inner = Expr::unary(pos(), UnaryOp::Neg, typed_id("x"));
        inner.set_ty(Type::Int);
        let outer = Expr::unary(pos(), UnaryOp::Neg, inner);
        outer.set_ty(Type::Int);
        let result = simplify_expr(&outer);
        assert!(shape_eq(&result, &typed_id("x")));
    }

    #[test]
    fn simplification_is_idempotent() {
        let e = Expr::arith(
            pos(),
            ArithOp::Add,
            Expr::arith(pos(), ArithOp::Add, typed_id("x"), typed_int(2)),
            typed_int(3),
        );
        e.set_ty(Type::Int);
        let once = simplify_expr(&e);
        let twice = simplify_expr(&once);
        assert!(shape_eq(&once, &twice));
    }

    #[test]
    fn commutative_literal_migrates_right_before_folding() {
        let e = Expr::arith(pos(), ArithOp::Add, typed_int(3), typed_id("x"));
        e.set_ty(Type::Int);
        let result = simplify_expr(&e);
        let expected = Expr::arith(pos(), ArithOp::Add, typed_id("x"), typed_int(3));
        assert!(shape_eq(&result, &expected));
    }

    #[test]
    fn subtraction_is_not_rewritten_unless_both_sides_fold() {
        let e = Expr::arith(pos(), ArithOp::Sub, typed_id("x"), typed_int(0));
        e.set_ty(Type::Int);
        let result = simplify_expr(&e);
        let expected = Expr::arith(pos(), ArithOp::Sub, typed_id("x"), typed_int(0));
        assert!(shape_eq(&result, &expected));
    }
}
