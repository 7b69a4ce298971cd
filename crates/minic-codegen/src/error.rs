//! Code generator errors.
//!
//! The only diagnostic code generation itself raises: an invariant the
//! earlier passes were supposed to establish (a resolved `Id`, an assigned
//! frame slot) turned out not to hold. This is always a compiler bug, never
//! a fault in the source program.

use minic_ast::Position;
use minic_util::diagnostic::DiagnosticCode;
use minic_util::Handler;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodeGenError {
    #[error("internal code generator error at {}: {message}", .position.coord_string())]
    Internal { position: Position, message: String },
}

impl CodeGenError {
    pub fn internal(position: Position, message: impl Into<String>) -> Self {
        CodeGenError::Internal {
            position,
            message: message.into(),
        }
    }

    /// Reports this error through the shared diagnostic handler with the
    /// taxonomy's `E_CODEGEN_INTERNAL` code.
    pub fn emit(&self, handler: &Handler) {
        let CodeGenError::Internal { position, message } = self;
        handler
            .build_error(*position, message.clone())
            .code(DiagnosticCode::E_CODEGEN_INTERNAL)
            .emit(handler);
    }
}
