//! Compiler driver: orchestrates the pipeline's phases in the order the
//! language design requires — scope, then type, then initialization
//! analysis, each gating the next — followed by simplification and IA-32
//! code generation.
//!
//! There is no lexer or parser here; [`fixtures`] stands in for one, so the
//! driver can be exercised end to end purely as a library plus a thin CLI
//! front end in `main.rs`.

pub mod fixtures;

use minic_ast::Stmt;
use minic_util::diagnostic::Diagnostic;
use minic_util::Handler;

/// One finished diagnostic, rendered with its source position.
pub fn format_diagnostic(diag: &Diagnostic) -> String {
    let code = diag
        .code
        .map(|c| format!(" [{}]", c.as_str()))
        .unwrap_or_default();
    format!("{}: {}: {}{code}", diag.span.coord_string(), diag.level, diag.message)
}

/// The result of running the full pipeline over one program.
pub enum CompileOutcome {
    /// Every phase succeeded; this is the finished IA-32 assembly text.
    Assembly(String),
    /// Some phase reported at least one diagnostic; codegen never ran.
    Diagnostics(Vec<Diagnostic>),
}

/// Runs scope, type, and initialization analysis over `program`, halting
/// before simplification and codegen the moment any phase reports a
/// diagnostic — exactly the propagation rule the error-handling design
/// specifies.
#[tracing::instrument(level = "info", skip_all)]
pub fn compile(program: &Stmt) -> Result<CompileOutcome, minic_codegen::CodeGenError> {
    let handler = Handler::new();

    let entries = minic_sem::analyze_scopes(program, &handler);
    if handler.has_errors() {
        tracing::info!(diagnostics = handler.error_count(), "halting before type analysis");
        return Ok(CompileOutcome::Diagnostics(handler.diagnostics()));
    }

    minic_sem::check_types(program, &entries, &handler);
    if handler.has_errors() {
        tracing::info!(diagnostics = handler.error_count(), "halting before init analysis");
        return Ok(CompileOutcome::Diagnostics(handler.diagnostics()));
    }

    minic_sem::check_init(program, entries.len(), &handler);
    if handler.has_errors() {
        tracing::info!(diagnostics = handler.error_count(), "halting before simplification");
        return Ok(CompileOutcome::Diagnostics(handler.diagnostics()));
    }

    let simplified = minic_simplify::simplify_stmt(program);
    let assembly = minic_codegen::generate(&simplified, &entries)?;
    tracing::debug!("pipeline completed, assembly ready");
    Ok(CompileOutcome::Assembly(assembly))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_zero_fixture_compiles_to_assembly() {
        let program = fixtures::add_zero();
        match compile(&program).unwrap() {
            CompileOutcome::Assembly(asm) => {
                assert!(asm.contains("main:"));
                assert!(asm.contains("$3"));
            }
            CompileOutcome::Diagnostics(diags) => panic!("expected success, got {diags:?}"),
        }
    }

    #[test]
    fn use_before_init_fixture_halts_before_codegen() {
        let program = fixtures::use_before_init();
        match compile(&program).unwrap() {
            CompileOutcome::Diagnostics(diags) => assert_eq!(diags.len(), 1),
            CompileOutcome::Assembly(_) => panic!("expected a diagnostic, got assembly"),
        }
    }

    #[test]
    fn undeclared_id_fixture_reports_exactly_one_diagnostic() {
        let program = fixtures::undeclared_id();
        match compile(&program).unwrap() {
            CompileOutcome::Diagnostics(diags) => assert_eq!(diags.len(), 1),
            CompileOutcome::Assembly(_) => panic!("expected a diagnostic, got assembly"),
        }
    }

    #[test]
    fn bxor_negate_fixture_emits_a_not_instead_of_a_xor() {
        let program = fixtures::bxor_negate();
        match compile(&program).unwrap() {
            CompileOutcome::Assembly(asm) => assert!(asm.contains("notl")),
            CompileOutcome::Diagnostics(diags) => panic!("expected success, got {diags:?}"),
        }
    }
}
