//! Sethi-Ullman register allocation and IA-32 instruction selection.
//!
//! Mirrors `faxc`'s lowering-and-allocation split, collapsed onto a single
//! tree walk since the mini-language has no intermediate representation of
//! its own to build first: `compile_expr` both selects instructions and
//! decides register placement as it descends, the way a one-pass
//! Sethi-Ullman code generator always has.

use minic_ast::{ArithOp, EntryId, Expr, LogicOp, Position, RelOp, Stmt, UnaryOp};
use minic_sem::EnvEntry;
use minic_util::IndexVec;

use crate::emit::{Emitter, NREGS, WORDSIZE};
use crate::error::CodeGenError;
use crate::frame::StackFrame;

/// Sentinel register-pressure depth for expressions with side effects
/// (`Assign`), which must be evaluated in strict left-to-right order rather
/// than reordered for register economy. Larger than any depth a tree of
/// reasonable size can otherwise reach.
pub const DEEP: u32 = 1000;

/// Sethi-Ullman estimate of how many registers are needed to evaluate
/// `expr` without spilling, assuming no child is itself side-effecting.
/// Monotonic: a compound expression's depth is never less than either
/// child's.
pub fn depth(expr: &Expr) -> u32 {
    match expr {
        Expr::IntLit { .. } | Expr::BoolLit { .. } | Expr::Id { .. } => 1,
        Expr::Arith { lhs, rhs, .. } | Expr::Rel { lhs, rhs, .. } | Expr::Logic { lhs, rhs, .. } => {
            let dl = depth(lhs);
            let dr = depth(rhs);
            if dl >= DEEP || dr >= DEEP {
                DEEP
            } else if dl == dr {
                dl + 1
            } else {
                dl.max(dr)
            }
        }
        Expr::Unary { operand, .. } | Expr::LNot { operand, .. } => depth(operand),
        Expr::Assign { .. } => DEEP,
    }
}

fn is_commutative(op: ArithOp) -> bool {
    matches!(op, ArithOp::Add | ArithOp::Mul | ArithOp::BAnd | ArithOp::BOr | ArithOp::BXor)
}

fn arith_mnemonic(op: ArithOp) -> &'static str {
    match op {
        ArithOp::Add => "addl",
        ArithOp::Sub => "subl",
        ArithOp::Mul => "imull",
        ArithOp::BAnd => "andl",
        ArithOp::BOr => "orl",
        ArithOp::BXor => "xorl",
    }
}

pub struct CodeGenerator<'a> {
    emitter: Emitter,
    entries: &'a IndexVec<EntryId, EnvEntry>,
}

impl<'a> CodeGenerator<'a> {
    fn new(entries: &'a IndexVec<EntryId, EnvEntry>) -> Self {
        CodeGenerator {
            emitter: Emitter::new(),
            entries,
        }
    }

    fn slot_of(&self, id: EntryId, position: Position) -> Result<i32, CodeGenError> {
        self.entries[id]
            .slot
            .get()
            .ok_or_else(|| CodeGenError::internal(position, "variable has no assigned frame slot"))
    }

    /// Compiles `expr`, leaving its value in register `free` and never
    /// touching any register below `free` — the contract every recursive
    /// call in this module relies on.
    fn compile_expr(&mut self, expr: &Expr, pushed: i32, free: usize) -> Result<(), CodeGenError> {
        match expr {
            Expr::IntLit { value, .. } => {
                self.emitter.emit("movl", &[&format!("${value}"), Emitter::reg(free)]);
                Ok(())
            }
            Expr::BoolLit { value, .. } => {
                let n = if *value { 1 } else { 0 };
                self.emitter.emit("movl", &[&format!("${n}"), Emitter::reg(free)]);
                Ok(())
            }
            Expr::Id { binding, position, .. } => {
                let id = binding
                    .get()
                    .ok_or_else(|| CodeGenError::internal(*position, "unresolved Id reached codegen"))?;
                let slot = self.slot_of(id, *position)?;
                self.emitter.emit("movl", &[&format!("{slot}(%ebp)"), Emitter::reg(free)]);
                Ok(())
            }
            Expr::Arith { op, lhs, rhs, .. } => {
                self.compile_binary(arith_mnemonic(*op), is_commutative(*op), lhs, rhs, pushed, free)
            }
            Expr::Rel { op, lhs, rhs, .. } => self.compile_rel_value(*op, lhs, rhs, pushed, free),
            Expr::Logic { .. } => self.compile_logic_value(expr, pushed, free),
            Expr::Unary { op, operand, .. } => {
                self.compile_expr(operand, pushed, free)?;
                let mnemonic = match op {
                    UnaryOp::Neg => "negl",
                    UnaryOp::BNot => "notl",
                };
                self.emitter.emit(mnemonic, &[Emitter::reg(free)]);
                Ok(())
            }
            Expr::LNot { operand, .. } => {
                self.compile_expr(operand, pushed, free)?;
                self.emitter.emit("xorl", &["$1", Emitter::reg(free)]);
                Ok(())
            }
            Expr::Assign { lhs, rhs, position, .. } => {
                self.compile_expr(rhs, pushed, free)?;
                self.store_to_lvalue(lhs, free, *position)?;
                Ok(())
            }
        }
    }

    /// Evaluates `left` and `right` into `free` and `free + 1`, spilling
    /// register 0 if the register file is exhausted, then combines them
    /// with `mnemonic` into `free`. For a commutative operator the deeper
    /// operand goes first, regardless of source order, since the operator
    /// doesn't care which physical register holds which operand; a
    /// non-commutative operator always evaluates `left` first.
    fn compile_binary(
        &mut self,
        mnemonic: &str,
        commutative: bool,
        left: &Expr,
        right: &Expr,
        pushed: i32,
        free: usize,
    ) -> Result<(), CodeGenError> {
        let dl = depth(left);
        let dr = depth(right);

        let (first, second) = if dl != DEEP && dr != DEEP && commutative && dr > dl {
            (right, left)
        } else {
            (left, right)
        };

        self.compile_expr(first, pushed, free)?;

        if free + 1 < NREGS {
            self.compile_expr(second, pushed, free + 1)?;
            self.emitter.emit(mnemonic, &[Emitter::reg(free + 1), Emitter::reg(free)]);
        } else {
            self.emitter.emit("pushl", &[Emitter::reg(0)]);
            self.compile_expr(second, pushed + WORDSIZE, 0)?;
            self.emitter.emit(mnemonic, &[Emitter::reg(0), Emitter::reg(free)]);
            self.emitter.emit("popl", &[Emitter::reg(0)]);
        }
        Ok(())
    }

    /// Evaluates `left` into `free`, `right` into `free + 1` (spilling
    /// register 0 if needed), then `cmpl`s them, leaving `left - right`'s
    /// flags set. Comparison is not commutative, so operand order is never
    /// swapped for register economy.
    fn compile_compare(&mut self, left: &Expr, right: &Expr, pushed: i32, free: usize) -> Result<(), CodeGenError> {
        self.compile_expr(left, pushed, free)?;
        if free + 1 < NREGS {
            self.compile_expr(right, pushed, free + 1)?;
            self.emitter.emit("cmpl", &[Emitter::reg(free + 1), Emitter::reg(free)]);
        } else {
            self.emitter.emit("pushl", &[Emitter::reg(0)]);
            self.compile_expr(right, pushed + WORDSIZE, 0)?;
            self.emitter.emit("cmpl", &[Emitter::reg(0), Emitter::reg(free)]);
            self.emitter.emit("popl", &[Emitter::reg(0)]);
        }
        Ok(())
    }

    fn compile_rel_value(&mut self, op: RelOp, lhs: &Expr, rhs: &Expr, pushed: i32, free: usize) -> Result<(), CodeGenError> {
        self.compile_compare(lhs, rhs, pushed, free)?;
        let setcc = match op {
            RelOp::Eq => "sete",
            RelOp::Neq => "setne",
            RelOp::Lt => "setl",
            RelOp::Le => "setle",
            RelOp::Gt => "setg",
            RelOp::Ge => "setge",
        };
        self.emitter.emit(setcc, &[Emitter::reg8(free)]);
        self.emitter.emit("movzbl", &[Emitter::reg8(free), Emitter::reg(free)]);
        Ok(())
    }

    fn compile_rel_branch(
        &mut self,
        op: RelOp,
        lhs: &Expr,
        rhs: &Expr,
        pushed: i32,
        free: usize,
        label: &str,
        branch_on_true: bool,
    ) -> Result<(), CodeGenError> {
        self.compile_compare(lhs, rhs, pushed, free)?;
        let jcc = match (op, branch_on_true) {
            (RelOp::Eq, true) => "je",
            (RelOp::Eq, false) => "jne",
            (RelOp::Neq, true) => "jne",
            (RelOp::Neq, false) => "je",
            (RelOp::Lt, true) => "jl",
            (RelOp::Lt, false) => "jge",
            (RelOp::Le, true) => "jle",
            (RelOp::Le, false) => "jg",
            (RelOp::Gt, true) => "jg",
            (RelOp::Gt, false) => "jle",
            (RelOp::Ge, true) => "jge",
            (RelOp::Ge, false) => "jl",
        };
        self.emitter.emit(jcc, &[label]);
        Ok(())
    }

    /// Materializes a `Logic` node's boolean value by branching past a
    /// `movl $0` with the same short-circuit evaluation `branch_false`
    /// uses for control flow.
    fn compile_logic_value(&mut self, expr: &Expr, pushed: i32, free: usize) -> Result<(), CodeGenError> {
        let l_false = self.emitter.new_label();
        let l_done = self.emitter.new_label();
        self.branch_false(expr, &l_false, pushed, free)?;
        self.emitter.emit("movl", &["$1", Emitter::reg(free)]);
        self.emitter.emit("jmp", &[&l_done]);
        self.emitter.emit_label(&l_false);
        self.emitter.emit("movl", &["$0", Emitter::reg(free)]);
        self.emitter.emit_label(&l_done);
        Ok(())
    }

    /// Jumps to `label` if `expr` evaluates false. `Rel` emits a direct
    /// `cmpl`/`j<cc>` pair; `LAnd`/`LOr`/`LNot` short-circuit by recursing
    /// into their operands rather than materializing an intermediate
    /// boolean value; anything else falls back to evaluating into a
    /// register and testing it.
    fn branch_false(&mut self, expr: &Expr, label: &str, pushed: i32, free: usize) -> Result<(), CodeGenError> {
        match expr {
            Expr::Rel { op, lhs, rhs, .. } => self.compile_rel_branch(*op, lhs, rhs, pushed, free, label, false),
            Expr::Logic { op: LogicOp::LAnd, lhs, rhs, .. } => {
                self.branch_false(lhs, label, pushed, free)?;
                self.branch_false(rhs, label, pushed, free)
            }
            Expr::Logic { op: LogicOp::LOr, lhs, rhs, .. } => {
                let keep_going = self.emitter.new_label();
                self.branch_true(lhs, &keep_going, pushed, free)?;
                self.branch_false(rhs, label, pushed, free)?;
                self.emitter.emit_label(&keep_going);
                Ok(())
            }
            Expr::LNot { operand, .. } => self.branch_true(operand, label, pushed, free),
            _ => {
                self.compile_expr(expr, pushed, free)?;
                self.emitter.emit("testl", &[Emitter::reg(free), Emitter::reg(free)]);
                self.emitter.emit("je", &[label]);
                Ok(())
            }
        }
    }

    /// Jumps to `label` if `expr` evaluates true. Mirrors `branch_false`.
    fn branch_true(&mut self, expr: &Expr, label: &str, pushed: i32, free: usize) -> Result<(), CodeGenError> {
        match expr {
            Expr::Rel { op, lhs, rhs, .. } => self.compile_rel_branch(*op, lhs, rhs, pushed, free, label, true),
            Expr::Logic { op: LogicOp::LOr, lhs, rhs, .. } => {
                self.branch_true(lhs, label, pushed, free)?;
                self.branch_true(rhs, label, pushed, free)
            }
            Expr::Logic { op: LogicOp::LAnd, lhs, rhs, .. } => {
                let keep_going = self.emitter.new_label();
                self.branch_false(lhs, &keep_going, pushed, free)?;
                self.branch_true(rhs, label, pushed, free)?;
                self.emitter.emit_label(&keep_going);
                Ok(())
            }
            Expr::LNot { operand, .. } => self.branch_false(operand, label, pushed, free),
            _ => {
                self.compile_expr(expr, pushed, free)?;
                self.emitter.emit("testl", &[Emitter::reg(free), Emitter::reg(free)]);
                self.emitter.emit("jne", &[label]);
                Ok(())
            }
        }
    }

    fn store_to_lvalue(&mut self, lhs: &Expr, free: usize, position: Position) -> Result<(), CodeGenError> {
        match lhs {
            Expr::Id { binding, position, .. } => {
                let id = binding
                    .get()
                    .ok_or_else(|| CodeGenError::internal(*position, "unresolved Id reached codegen"))?;
                let slot = self.slot_of(id, *position)?;
                self.emitter.emit("movl", &[Emitter::reg(free), &format!("{slot}(%ebp)")]);
                Ok(())
            }
            _ => Err(CodeGenError::internal(
                position,
                "assignment target is not an Id (should have been rejected at AST construction)",
            )),
        }
    }

    /// Stores `expr` into the frame slot at `offset`. A literal folds
    /// straight to an immediate-to-memory `movl`, skipping the round trip
    /// through a register that a constant-folded assignment has no further
    /// use for; anything else is evaluated into register 0 first.
    fn compile_into_slot(&mut self, expr: &Expr, offset: i32, pushed: i32) -> Result<(), CodeGenError> {
        match expr {
            Expr::IntLit { value, .. } => {
                self.emitter.emit("movl", &[&format!("${value}"), &format!("{offset}(%ebp)")]);
                Ok(())
            }
            Expr::BoolLit { value, .. } => {
                let n = if *value { 1 } else { 0 };
                self.emitter.emit("movl", &[&format!("${n}"), &format!("{offset}(%ebp)")]);
                Ok(())
            }
            _ => {
                self.compile_expr(expr, pushed, 0)?;
                self.emitter.emit("movl", &[Emitter::reg(0), &format!("{offset}(%ebp)")]);
                Ok(())
            }
        }
    }

    fn compile_assign_stmt(&mut self, lhs: &Expr, rhs: &Expr, pushed: i32, position: Position) -> Result<(), CodeGenError> {
        let id = match lhs {
            Expr::Id { binding, position, .. } => binding
                .get()
                .ok_or_else(|| CodeGenError::internal(*position, "unresolved Id reached codegen"))?,
            _ => {
                return Err(CodeGenError::internal(
                    position,
                    "assignment target is not an Id (should have been rejected at AST construction)",
                ))
            }
        };
        let slot = self.slot_of(id, position)?;
        self.compile_into_slot(rhs, slot, pushed)
    }

    fn compile_var_decl(&mut self, decl: &Stmt, frame: &mut StackFrame, pushed: i32) -> Result<(), CodeGenError> {
        match decl {
            Stmt::VarDecl { binding, init, position, .. } => {
                let id = binding
                    .get()
                    .ok_or_else(|| CodeGenError::internal(*position, "VarDecl not bound by scope analysis"))?;
                let offset = frame.allocate();
                self.entries[id].slot.set(Some(offset));
                if let Some(init_expr) = init {
                    self.compile_into_slot(init_expr, offset, pushed)?;
                }
                Ok(())
            }
            other => Err(CodeGenError::internal(
                other.position(),
                "compile_var_decl called on a non-VarDecl statement",
            )),
        }
    }

    fn compile_stmt(&mut self, stmt: &Stmt, frame: &mut StackFrame, pushed: i32) -> Result<(), CodeGenError> {
        match stmt {
            Stmt::Empty { .. } => Ok(()),
            Stmt::Seq { first, rest } => {
                self.compile_stmt(first, frame, pushed)?;
                self.compile_stmt(rest, frame, pushed)
            }
            Stmt::Assign { expr, position } => match expr {
                Expr::Assign { lhs, rhs, .. } => self.compile_assign_stmt(lhs, rhs, pushed, *position),
                _ => Err(CodeGenError::internal(*position, "Stmt::Assign did not wrap an Expr::Assign")),
            },
            Stmt::Print { expr, .. } => {
                let adjust = Emitter::alignment_adjust(pushed + WORDSIZE);
                self.emitter.insert_adjust(adjust);
                self.compile_expr(expr, pushed + adjust, 0)?;
                self.emitter.emit("pushl", &[Emitter::reg(0)]);
                self.emitter.call("print");
                self.emitter.remove_adjust(WORDSIZE);
                self.emitter.remove_adjust(adjust);
                Ok(())
            }
            Stmt::ExprStmt { expr, .. } => self.compile_expr(expr, pushed, 0),
            Stmt::If { test, then_branch, else_branch, .. } => {
                let else_label = self.emitter.new_label();
                let end_label = self.emitter.new_label();
                self.branch_false(test, &else_label, pushed, 0)?;
                self.compile_stmt(then_branch, frame, pushed)?;
                self.emitter.emit("jmp", &[&end_label]);
                self.emitter.emit_label(&else_label);
                self.compile_stmt(else_branch, frame, pushed)?;
                self.emitter.emit_label(&end_label);
                Ok(())
            }
            Stmt::While { test, body, .. } => {
                let top_label = self.emitter.new_label();
                let test_label = self.emitter.new_label();
                self.emitter.emit("jmp", &[&test_label]);
                self.emitter.emit_label(&top_label);
                self.compile_stmt(body, frame, pushed)?;
                self.emitter.emit_label(&test_label);
                self.branch_true(test, &top_label, pushed, 0)?;
                Ok(())
            }
            Stmt::Block { decls, body, .. } => {
                let mark = frame.mark();
                for decl in decls {
                    self.compile_var_decl(decl, frame, pushed)?;
                }
                self.compile_stmt(body, frame, pushed)?;
                frame.restore(mark);
                Ok(())
            }
            Stmt::VarDecl { .. } => self.compile_var_decl(stmt, frame, pushed),
        }
    }
}

/// Lowers `program` to a complete IA-32 assembly source, driven by the
/// environment arena scope analysis built (so local slots are assigned
/// here, as the tree is walked, rather than beforehand).
#[tracing::instrument(level = "debug", skip_all)]
pub fn generate(program: &Stmt, entries: &IndexVec<EntryId, EnvEntry>) -> Result<String, CodeGenError> {
    tracing::debug!("entering code generation");
    let mut gen = CodeGenerator::new(entries);
    let mut frame = StackFrame::new();
    gen.compile_stmt(program, &mut frame, 0)?;
    let body = gen.emitter.into_source();
    let frame_size = frame.frame_size();
    tracing::info!(frame_size, "leaving code generation");

    let mut out = String::new();
    out.push_str("\t.text\n");
    out.push_str("\t.globl main\n");
    out.push_str("main:\n");
    out.push_str("\tpushl %ebp\n");
    out.push_str("\tmovl %esp, %ebp\n");
    if frame_size > 0 {
        out.push_str(&format!("\tsubl ${frame_size}, %esp\n"));
    }
    out.push_str(&body);
    out.push_str("\tmovl %ebp, %esp\n");
    out.push_str("\tpopl %ebp\n");
    out.push_str("\txorl %eax, %eax\n");
    out.push_str("\tret\n");
    Ok(out)
}
