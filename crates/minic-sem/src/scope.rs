//! Binding resolution against a nested environment.
//!
//! `Env` is a stack of `Frame`s; each frame maps a name to the `EntryId` of
//! an `EnvEntry` living in an arena that outlives the frame stack itself —
//! entries are allocated once and never freed until the whole AST is
//! dropped, per the environment back-reference design. `resolve` walks
//! frames from innermost to outermost; `declare` only ever checks the
//! innermost frame for a duplicate.

use minic_ast::{EntryId, Expr, Position, Stmt, Symbol, Type};
use minic_util::diagnostic::DiagnosticCode;
use minic_util::{FxHashMap, Handler, Idx, IndexVec};

/// A resolved binding: its declared type and the storage slot codegen later
/// assigns. `is_error` marks the synthetic entry substituted for an
/// undeclared name, so later passes can treat it as a harmless int without
/// re-reporting the same fault.
#[derive(Debug, Clone)]
pub struct EnvEntry {
    pub name: Symbol,
    pub ty: Type,
    pub position: Position,
    pub is_error: bool,
    /// Stack-frame offset, assigned during codegen; absent before then.
    pub slot: std::cell::Cell<Option<i32>>,
}

impl EnvEntry {
    fn new(name: Symbol, ty: Type, position: Position, is_error: bool) -> Self {
        EnvEntry {
            name,
            ty,
            position,
            is_error,
            slot: std::cell::Cell::new(None),
        }
    }
}

#[derive(Default)]
struct Frame {
    bindings: FxHashMap<Symbol, EntryId>,
}

/// The arena of resolved bindings plus the live frame stack used while
/// walking the tree. Callers keep the arena (`into_entries`) after the walk
/// finishes; the frame stack itself has no further use once scope analysis
/// completes.
pub struct Env {
    entries: IndexVec<EntryId, EnvEntry>,
    frames: Vec<Frame>,
    error_entry: Option<EntryId>,
}

impl Env {
    pub fn new() -> Self {
        Env {
            entries: IndexVec::new(),
            frames: vec![Frame::default()],
            error_entry: None,
        }
    }

    pub fn push_frame(&mut self) {
        self.frames.push(Frame::default());
    }

    pub fn pop_frame(&mut self) {
        self.frames.pop();
    }

    /// Declares `name` in the innermost frame. Returns the existing entry
    /// when `name` already names a binding in that same frame — callers
    /// report `DuplicateDecl` in that case but still receive a fresh entry
    /// to bind the declaration to, so the rest of the tree sees a valid id.
    pub fn declare(&mut self, name: Symbol, ty: Type, position: Position) -> (EntryId, Option<EntryId>) {
        let innermost = self.frames.last().expect("frame stack never empty");
        let existing = innermost.bindings.get(&name).copied();

        let id = self.entries.push(EnvEntry::new(name, ty, position, false));
        self.frames
            .last_mut()
            .expect("frame stack never empty")
            .bindings
            .insert(name, id);

        (id, existing)
    }

    /// Resolves `name` against the current frame stack, innermost first.
    pub fn resolve(&self, name: Symbol) -> Option<EntryId> {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.bindings.get(&name).copied())
    }

    pub fn entry(&self, id: EntryId) -> &EnvEntry {
        &self.entries[id]
    }

    /// A single shared entry substituted for every undeclared reference, so
    /// one missing name never allocates more than one sentinel.
    pub fn error_entry(&mut self, name: Symbol, position: Position) -> EntryId {
        if let Some(id) = self.error_entry {
            return id;
        }
        let id = self.entries.push(EnvEntry::new(name, Type::Int, position, true));
        self.error_entry = Some(id);
        id
    }

    pub fn into_entries(self) -> IndexVec<EntryId, EnvEntry> {
        self.entries
    }
}

impl Default for Env {
    fn default() -> Self {
        Self::new()
    }
}

/// Walks `program` top-down, binding every `Id` to an `EnvEntry` and
/// reporting `DuplicateDecl`/`UndeclaredId` along the way. Returns the
/// entry arena; callers consult it during type analysis and codegen.
pub fn resolve_scopes(program: &Stmt, handler: &Handler) -> IndexVec<EntryId, EnvEntry> {
    let mut env = Env::new();
    walk_stmt(program, &mut env, handler);
    env.into_entries()
}

fn walk_stmt(stmt: &Stmt, env: &mut Env, handler: &Handler) {
    match stmt {
        Stmt::Empty { .. } => {}
        Stmt::Seq { first, rest } => {
            walk_stmt(first, env, handler);
            walk_stmt(rest, env, handler);
        }
        Stmt::If {
            test,
            then_branch,
            else_branch,
            ..
        } => {
            walk_expr(test, env, handler);
            walk_stmt(then_branch, env, handler);
            walk_stmt(else_branch, env, handler);
        }
        Stmt::While { test, body, .. } => {
            walk_expr(test, env, handler);
            walk_stmt(body, env, handler);
        }
        Stmt::Assign { expr, .. } | Stmt::Print { expr, .. } | Stmt::ExprStmt { expr, .. } => {
            walk_expr(expr, env, handler);
        }
        Stmt::Block { decls, body, .. } => {
            env.push_frame();
            for decl in decls {
                walk_stmt(decl, env, handler);
            }
            walk_stmt(body, env, handler);
            env.pop_frame();
        }
        Stmt::VarDecl {
            name,
            declared_type,
            init,
            binding,
            position,
        } => {
            if let Some(init_expr) = init {
                walk_expr(init_expr, env, handler);
            }
            let (id, existing) = env.declare(*name, *declared_type, *position);
            if let Some(previous) = existing {
                let prev_pos = env.entry(previous).position;
                handler
                    .build_error(
                        *position,
                        format!(
                            "`{}` is already declared in this scope (first declared at {})",
                            name.as_str(),
                            prev_pos.coord_string()
                        ),
                    )
                    .code(DiagnosticCode::E_SCOPE_DUPLICATE_DECL)
                    .emit(handler);
            }
            binding.set(Some(id));
        }
    }
}

fn walk_expr(expr: &Expr, env: &mut Env, handler: &Handler) {
    match expr {
        Expr::IntLit { .. } | Expr::BoolLit { .. } => {}
        Expr::Id {
            name,
            binding,
            position,
            ..
        } => {
            let id = match env.resolve(*name) {
                Some(id) => id,
                None => {
                    handler
                        .build_error(*position, format!("undeclared identifier `{}`", name.as_str()))
                        .code(DiagnosticCode::E_SCOPE_UNDECLARED_ID)
                        .emit(handler);
                    env.error_entry(*name, *position)
                }
            };
            binding.set(Some(id));
        }
        Expr::Arith { lhs, rhs, .. } | Expr::Rel { lhs, rhs, .. } | Expr::Logic { lhs, rhs, .. } => {
            walk_expr(lhs, env, handler);
            walk_expr(rhs, env, handler);
        }
        Expr::Unary { operand, .. } | Expr::LNot { operand, .. } => {
            walk_expr(operand, env, handler);
        }
        Expr::Assign { lhs, rhs, .. } => {
            walk_expr(lhs, env, handler);
            walk_expr(rhs, env, handler);
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

    fn program_with_duplicate() -> Stmt {
        let decl_a = Stmt::var_decl(pos(), Symbol::intern("x"), Type::Int, None);
        let decl_b = Stmt::var_decl(pos(), Symbol::intern("x"), Type::Int, None);
        Stmt::block(pos(), vec![decl_a, decl_b], Stmt::Empty { position: pos() })
    }

    #[test]
    fn duplicate_declaration_is_reported() {
        let handler = Handler::new();
        let program = program_with_duplicate();
        resolve_scopes(&program, &handler);
        assert!(handler.has_errors());
        assert_eq!(handler.error_count(), 1);
    }

    #[test]
    fn undeclared_identifier_is_reported_and_bound_to_sentinel() {
        let handler = Handler::new();
        let read = Expr::id(pos(), Symbol::intern("missing"));
        let program = Stmt::print(pos(), read);
        let entries = resolve_scopes(&program, &handler);
        assert!(handler.has_errors());
        if let Stmt::Print { expr, .. } = &program {
            assert!(expr.binding().is_some());
        }
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn nested_block_resolves_outer_declaration() {
        let handler = Handler::new();
        let outer_decl = Stmt::var_decl(pos(), Symbol::intern("x"), Type::Int, None);
        let inner_read = Expr::id(pos(), Symbol::intern("x"));
        let inner_block = Stmt::block(pos(), vec![], Stmt::print(pos(), inner_read));
        let program = Stmt::block(pos(), vec![outer_decl], inner_block);
        resolve_scopes(&program, &handler);
        assert!(!handler.has_errors());
    }
}
