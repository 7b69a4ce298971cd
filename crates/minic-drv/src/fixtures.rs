//! Built-in example programs, hand-built as `minic-ast` trees.
//!
//! There is no lexer or parser in this pipeline — an upstream parser's
//! output is exactly a `Stmt` tree like the ones built here, so these
//! fixtures stand in for one, letting the driver exercise the full
//! scope/type/init/simplify/codegen pipeline end to end without any
//! source text at all.

use minic_ast::{ArithOp, LogicOp, RelOp, Stmt, Symbol, Type};
use minic_util::span::Span;

fn pos() -> minic_ast::Position {
    Span::DUMMY
}

use minic_ast::Expr;

/// `int x; x = 3 + 0; print x;` — the simplifier collapses `3 + 0` to `3`
/// before codegen ever sees it.
pub fn add_zero() -> Stmt {
    let x = Symbol::intern("x");
    let decls = vec![Stmt::var_decl(pos(), x, Type::Int, None)];
    let assign = Stmt::assign(
        pos(),
        Expr::id(pos(), x),
        Expr::arith(pos(), ArithOp::Add, Expr::int_lit(pos(), 3), Expr::int_lit(pos(), 0)),
    )
    .expect("x is a valid lvalue");
    let print = Stmt::print(pos(), Expr::id(pos(), x));
    Stmt::block(pos(), decls, Stmt::seq(assign, print))
}

/// `int x; x = (5 + 2) * 3;` — folds entirely to the literal `21`.
pub fn constant_fold() -> Stmt {
    let x = Symbol::intern("x");
    let decls = vec![Stmt::var_decl(pos(), x, Type::Int, None)];
    let rhs = Expr::arith(
        pos(),
        ArithOp::Mul,
        Expr::arith(pos(), ArithOp::Add, Expr::int_lit(pos(), 5), Expr::int_lit(pos(), 2)),
        Expr::int_lit(pos(), 3),
    );
    let assign = Stmt::assign(pos(), Expr::id(pos(), x), rhs).expect("x is a valid lvalue");
    Stmt::block(pos(), decls, assign)
}

/// `int x; print x;` — `x` is read before it is ever assigned.
pub fn use_before_init() -> Stmt {
    let x = Symbol::intern("x");
    let decls = vec![Stmt::var_decl(pos(), x, Type::Int, None)];
    let print = Stmt::print(pos(), Expr::id(pos(), x));
    Stmt::block(pos(), decls, print)
}

/// `boolean b; b = true; if (b) print 1; else print 2;`
pub fn if_else() -> Stmt {
    let b = Symbol::intern("b");
    let decls = vec![Stmt::var_decl(pos(), b, Type::Boolean, None)];
    let assign = Stmt::assign(pos(), Expr::id(pos(), b), Expr::bool_lit(pos(), true)).expect("b is a valid lvalue");
    let if_stmt = Stmt::if_stmt(
        pos(),
        Expr::id(pos(), b),
        Stmt::print(pos(), Expr::int_lit(pos(), 1)),
        Stmt::print(pos(), Expr::int_lit(pos(), 2)),
    );
    Stmt::block(pos(), decls, Stmt::seq(assign, if_stmt))
}

/// `int x; x = 0; while (x < 3) { print x; x = x + 1; }`
pub fn while_loop() -> Stmt {
    let x = Symbol::intern("x");
    let decls = vec![Stmt::var_decl(pos(), x, Type::Int, None)];
    let init = Stmt::assign(pos(), Expr::id(pos(), x), Expr::int_lit(pos(), 0)).expect("x is a valid lvalue");
    let test = Expr::rel(pos(), RelOp::Lt, Expr::id(pos(), x), Expr::int_lit(pos(), 3));
    let body = Stmt::seq(
        Stmt::print(pos(), Expr::id(pos(), x)),
        Stmt::assign(
            pos(),
            Expr::id(pos(), x),
            Expr::arith(pos(), ArithOp::Add, Expr::id(pos(), x), Expr::int_lit(pos(), 1)),
        )
        .expect("x is a valid lvalue"),
    );
    let loop_stmt = Stmt::while_stmt(pos(), test, body);
    Stmt::block(pos(), decls, Stmt::seq(init, loop_stmt))
}

/// `int x; x = ((y + 2) + 3);` with `y` never declared — reported once,
/// with no cascading type error from the addition around it.
pub fn undeclared_id() -> Stmt {
    let x = Symbol::intern("x");
    let y = Symbol::intern("y");
    let decls = vec![Stmt::var_decl(pos(), x, Type::Int, None)];
    let rhs = Expr::arith(
        pos(),
        ArithOp::Add,
        Expr::arith(pos(), ArithOp::Add, Expr::id(pos(), y), Expr::int_lit(pos(), 2)),
        Expr::int_lit(pos(), 3),
    );
    let assign = Stmt::assign(pos(), Expr::id(pos(), x), rhs).expect("x is a valid lvalue");
    Stmt::block(pos(), decls, assign)
}

/// `int x = 0x0F; x = x ^ -1;` — the simplifier rewrites the xor-by-`-1`
/// to a bitwise complement.
pub fn bxor_negate() -> Stmt {
    let x = Symbol::intern("x");
    let decls = vec![Stmt::var_decl(pos(), x, Type::Int, Some(Expr::int_lit(pos(), 0x0F)))];
    let assign = Stmt::assign(
        pos(),
        Expr::id(pos(), x),
        Expr::arith(pos(), ArithOp::BXor, Expr::id(pos(), x), Expr::int_lit(pos(), -1)),
    )
    .expect("x is a valid lvalue");
    Stmt::block(pos(), decls, assign)
}

/// Exercises both sides of a short-circuiting `&&`/`||`, beyond what the
/// table scenarios cover on their own.
pub fn short_circuit() -> Stmt {
    let a = Symbol::intern("a");
    let b = Symbol::intern("c");
    let decls = vec![
        Stmt::var_decl(pos(), a, Type::Boolean, Some(Expr::bool_lit(pos(), false))),
        Stmt::var_decl(pos(), b, Type::Boolean, Some(Expr::bool_lit(pos(), true))),
    ];
    let test = Expr::logic(pos(), LogicOp::LOr, Expr::id(pos(), a), Expr::id(pos(), b));
    let if_stmt = Stmt::if_stmt(
        pos(),
        test,
        Stmt::print(pos(), Expr::int_lit(pos(), 1)),
        Stmt::print(pos(), Expr::int_lit(pos(), 0)),
    );
    Stmt::block(pos(), decls, if_stmt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_fixture_builds_without_panicking() {
        let _ = add_zero();
        let _ = constant_fold();
        let _ = use_before_init();
        let _ = if_else();
        let _ = while_loop();
        let _ = undeclared_id();
        let _ = bxor_negate();
        let _ = short_circuit();
    }
}
