//! Abstract syntax tree for the mini language.
//!
//! Each syntactic category (`Stmt`, `Expr`) is a single tagged enum; every
//! analysis pass is a function that matches over the variant it cares about,
//! rather than a per-node virtual method. `Expr` nodes carry a `type` slot
//! written once by type analysis, and `Id` additionally carries a `binding`
//! slot written once by scope analysis — both are plain `Cell`s rather than
//! a parallel side-table, since every node already owns its slot.

use std::cell::Cell;

use minic_util::index_vec::Idx;

pub use minic_util::span::Position;
pub use minic_util::symbol::Symbol;

/// The language's closed set of scalar types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Type {
    Int,
    Boolean,
}

/// A stable index into the environment-entry arena, installed by scope
/// analysis and never reassigned afterward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(u32);

impl Idx for EntryId {
    fn from_usize(idx: usize) -> Self {
        assert!(idx <= u32::MAX as usize, "entry arena overflowed u32");
        EntryId(idx as u32)
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Raised when an `Assign` node is built with a non-identifier left-hand
/// side. This is the one diagnostic in the taxonomy raised at construction
/// time rather than accumulated by a later pass; callers should treat it as
/// fatal for the whole pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidLValue {
    pub position: Position,
}

impl std::fmt::Display for InvalidLValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid assignment target at {}",
            self.position.coord_string()
        )
    }
}

impl std::error::Error for InvalidLValue {}

/// Binary operators typed `int × int → int`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    BAnd,
    BOr,
    BXor,
}

/// Binary operators typed `int × int → boolean`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelOp {
    Eq,
    Neq,
    Lt,
    Le,
    Gt,
    Ge,
}

/// Short-circuiting binary operators typed `boolean × boolean → boolean`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicOp {
    LAnd,
    LOr,
}

/// Unary operators typed `int → int`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    BNot,
}

/// An expression node.
///
/// Every variant carries its source `position` and a `ty` slot written once
/// by type analysis. `Id` additionally carries a `binding` slot written once
/// by scope analysis; after scope analysis it is always `Some`.
#[derive(Debug, Clone)]
pub enum Expr {
    IntLit {
        position: Position,
        value: i32,
        ty: Cell<Option<Type>>,
    },
    BoolLit {
        position: Position,
        value: bool,
        ty: Cell<Option<Type>>,
    },
    Id {
        position: Position,
        name: Symbol,
        binding: Cell<Option<EntryId>>,
        ty: Cell<Option<Type>>,
    },
    Arith {
        position: Position,
        op: ArithOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
        ty: Cell<Option<Type>>,
    },
    Rel {
        position: Position,
        op: RelOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
        ty: Cell<Option<Type>>,
    },
    Logic {
        position: Position,
        op: LogicOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
        ty: Cell<Option<Type>>,
    },
    Unary {
        position: Position,
        op: UnaryOp,
        operand: Box<Expr>,
        ty: Cell<Option<Type>>,
    },
    LNot {
        position: Position,
        operand: Box<Expr>,
        ty: Cell<Option<Type>>,
    },
    /// Only ever constructed via [`Expr::assign`], which enforces that `lhs`
    /// is an `Id`.
    Assign {
        position: Position,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
        ty: Cell<Option<Type>>,
    },
}

impl Expr {
    pub fn int_lit(position: Position, value: i32) -> Self {
        Expr::IntLit {
            position,
            value,
            ty: Cell::new(None),
        }
    }

    pub fn bool_lit(position: Position, value: bool) -> Self {
        Expr::BoolLit {
            position,
            value,
            ty: Cell::new(None),
        }
    }

    pub fn id(position: Position, name: Symbol) -> Self {
        Expr::Id {
            position,
            name,
            binding: Cell::new(None),
            ty: Cell::new(None),
        }
    }

    pub fn arith(position: Position, op: ArithOp, lhs: Expr, rhs: Expr) -> Self {
        Expr::Arith {
            position,
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
            ty: Cell::new(None),
        }
    }

    pub fn rel(position: Position, op: RelOp, lhs: Expr, rhs: Expr) -> Self {
        Expr::Rel {
            position,
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
            ty: Cell::new(None),
        }
    }

    pub fn logic(position: Position, op: LogicOp, lhs: Expr, rhs: Expr) -> Self {
        Expr::Logic {
            position,
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
            ty: Cell::new(None),
        }
    }

    pub fn unary(position: Position, op: UnaryOp, operand: Expr) -> Self {
        Expr::Unary {
            position,
            op,
            operand: Box::new(operand),
            ty: Cell::new(None),
        }
    }

    pub fn lnot(position: Position, operand: Expr) -> Self {
        Expr::LNot {
            position,
            operand: Box::new(operand),
            ty: Cell::new(None),
        }
    }

    /// Builds an assignment, rejecting any `lhs` that is not an `Id` with
    /// `InvalidLValue`. This is the sole construction-time check in the
    /// taxonomy; every other diagnostic is accumulated by a later pass.
    pub fn assign(position: Position, lhs: Expr, rhs: Expr) -> Result<Self, InvalidLValue> {
        if !matches!(lhs, Expr::Id { .. }) {
            return Err(InvalidLValue { position });
        }
        Ok(Expr::Assign {
            position,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
            ty: Cell::new(None),
        })
    }

    pub fn position(&self) -> Position {
        match self {
            Expr::IntLit { position, .. }
            | Expr::BoolLit { position, .. }
            | Expr::Id { position, .. }
            | Expr::Arith { position, .. }
            | Expr::Rel { position, .. }
            | Expr::Logic { position, .. }
            | Expr::Unary { position, .. }
            | Expr::LNot { position, .. }
            | Expr::Assign { position, .. } => *position,
        }
    }

    /// The type written by type analysis, or `None` before it has run.
    pub fn ty(&self) -> Option<Type> {
        match self {
            Expr::IntLit { ty, .. }
            | Expr::BoolLit { ty, .. }
            | Expr::Id { ty, .. }
            | Expr::Arith { ty, .. }
            | Expr::Rel { ty, .. }
            | Expr::Logic { ty, .. }
            | Expr::Unary { ty, .. }
            | Expr::LNot { ty, .. }
            | Expr::Assign { ty, .. } => ty.get(),
        }
    }

    /// Writes the type slot. Type analysis calls this exactly once per node.
    pub fn set_ty(&self, t: Type) {
        match self {
            Expr::IntLit { ty, .. }
            | Expr::BoolLit { ty, .. }
            | Expr::Id { ty, .. }
            | Expr::Arith { ty, .. }
            | Expr::Rel { ty, .. }
            | Expr::Logic { ty, .. }
            | Expr::Unary { ty, .. }
            | Expr::LNot { ty, .. }
            | Expr::Assign { ty, .. } => ty.set(Some(t)),
        }
    }

    /// The binding written by scope analysis, `None` on every variant except
    /// `Id`, and `None` on `Id` itself before scope analysis has run.
    pub fn binding(&self) -> Option<EntryId> {
        match self {
            Expr::Id { binding, .. } => binding.get(),
            _ => None,
        }
    }

    /// Writes the binding slot of an `Id` node. Panics if called on any
    /// other variant; scope analysis only ever calls this on `Id`.
    pub fn set_binding(&self, entry: EntryId) {
        match self {
            Expr::Id { binding, .. } => binding.set(Some(entry)),
            other => panic!("set_binding called on non-Id node: {other:?}"),
        }
    }
}

/// A statement node. Every variant carries its source `position`.
#[derive(Debug, Clone)]
pub enum Stmt {
    /// A no-op; used where the grammar requires a statement but none was
    /// written, e.g. an `if` with no `else`.
    Empty { position: Position },
    Seq {
        first: Box<Stmt>,
        rest: Box<Stmt>,
    },
    If {
        position: Position,
        test: Expr,
        then_branch: Box<Stmt>,
        else_branch: Box<Stmt>,
    },
    While {
        position: Position,
        test: Expr,
        body: Box<Stmt>,
    },
    /// Wraps an `Expr::Assign`, built through [`Stmt::assign`] so the
    /// lvalue check happens once at construction.
    Assign {
        position: Position,
        expr: Expr,
    },
    Print {
        position: Position,
        expr: Expr,
    },
    ExprStmt {
        position: Position,
        expr: Expr,
    },
    /// Introduces a nested scope: `decls` are `VarDecl` statements installed
    /// into the fresh frame before `body` is walked.
    Block {
        position: Position,
        decls: Vec<Stmt>,
        body: Box<Stmt>,
    },
    VarDecl {
        position: Position,
        name: Symbol,
        declared_type: Type,
        init: Option<Expr>,
        binding: Cell<Option<EntryId>>,
    },
}

impl Stmt {
    pub fn seq(first: Stmt, rest: Stmt) -> Self {
        Stmt::Seq {
            first: Box::new(first),
            rest: Box::new(rest),
        }
    }

    pub fn if_stmt(position: Position, test: Expr, then_branch: Stmt, else_branch: Stmt) -> Self {
        Stmt::If {
            position,
            test,
            then_branch: Box::new(then_branch),
            else_branch: Box::new(else_branch),
        }
    }

    pub fn while_stmt(position: Position, test: Expr, body: Stmt) -> Self {
        Stmt::While {
            position,
            test,
            body: Box::new(body),
        }
    }

    /// Builds an assignment statement, delegating the lvalue check to
    /// [`Expr::assign`].
    pub fn assign(position: Position, lhs: Expr, rhs: Expr) -> Result<Self, InvalidLValue> {
        let expr = Expr::assign(position, lhs, rhs)?;
        Ok(Stmt::Assign { position, expr })
    }

    pub fn print(position: Position, expr: Expr) -> Self {
        Stmt::Print { position, expr }
    }

    pub fn expr_stmt(position: Position, expr: Expr) -> Self {
        Stmt::ExprStmt { position, expr }
    }

    pub fn block(position: Position, decls: Vec<Stmt>, body: Stmt) -> Self {
        Stmt::Block {
            position,
            decls,
            body: Box::new(body),
        }
    }

    pub fn var_decl(position: Position, name: Symbol, declared_type: Type, init: Option<Expr>) -> Self {
        Stmt::VarDecl {
            position,
            name,
            declared_type,
            init,
            binding: Cell::new(None),
        }
    }

    pub fn position(&self) -> Position {
        match self {
            Stmt::Empty { position }
            | Stmt::If { position, .. }
            | Stmt::While { position, .. }
            | Stmt::Assign { position, .. }
            | Stmt::Print { position, .. }
            | Stmt::ExprStmt { position, .. }
            | Stmt::Block { position, .. }
            | Stmt::VarDecl { position, .. } => *position,
            Stmt::Seq { first, .. } => first.position(),
        }
    }

    /// The binding written by scope analysis; `None` on every variant except
    /// `VarDecl`, and `None` on `VarDecl` itself before scope analysis runs.
    pub fn binding(&self) -> Option<EntryId> {
        match self {
            Stmt::VarDecl { binding, .. } => binding.get(),
            _ => None,
        }
    }

    pub fn set_binding(&self, entry: EntryId) {
        match self {
            Stmt::VarDecl { binding, .. } => binding.set(Some(entry)),
            other => panic!("set_binding called on non-VarDecl statement: {other:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minic_util::span::Span;

    fn pos() -> Position {
        Span::DUMMY
    }

    #[test]
    fn entry_id_roundtrips_through_idx() {
        let id = EntryId::from_usize(7);
        assert_eq!(id.index(), 7);
    }

    #[test]
    fn assign_accepts_id_lhs() {
        let lhs = Expr::id(pos(), Symbol::intern("x"));
        let rhs = Expr::int_lit(pos(), 3);
        assert!(Expr::assign(pos(), lhs, rhs).is_ok());
    }

    #[test]
    fn assign_rejects_non_id_lhs() {
        let lhs = Expr::int_lit(pos(), 1);
        let rhs = Expr::int_lit(pos(), 2);
        let err = Expr::assign(pos(), lhs, rhs).unwrap_err();
        assert_eq!(err.position, pos());
    }

    #[test]
    fn ty_slot_is_written_once_and_read_back() {
        let lit = Expr::int_lit(pos(), 42);
        assert_eq!(lit.ty(), None);
        lit.set_ty(Type::Int);
        assert_eq!(lit.ty(), Some(Type::Int));
    }

    #[test]
    fn id_binding_slot_roundtrips() {
        let id_expr = Expr::id(pos(), Symbol::intern("y"));
        assert_eq!(id_expr.binding(), None);
        let entry = EntryId::from_usize(0);
        id_expr.set_binding(entry);
        assert_eq!(id_expr.binding(), Some(entry));
    }

    #[test]
    fn seq_position_is_first_statements_position() {
        let a = Stmt::print(pos(), Expr::int_lit(pos(), 1));
        let b = Stmt::print(pos(), Expr::int_lit(pos(), 2));
        let seq = Stmt::seq(a, b);
        assert_eq!(seq.position(), pos());
    }

    #[test]
    fn var_decl_binding_starts_unset() {
        let decl = Stmt::var_decl(pos(), Symbol::intern("x"), Type::Int, None);
        assert_eq!(decl.binding(), None);
    }
}
