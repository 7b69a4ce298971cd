//! Diagnostic codes for categorizing compiler errors.
//!
//! This module provides the [`DiagnosticCode`] type for uniquely identifying
//! diagnostic messages, enabling users to look up documentation and suppress
//! specific warnings.
//!
//! # Examples
//!
//! ```
//! use minic_util::diagnostic::DiagnosticCode;
//!
//! let code = DiagnosticCode::E_TYPE_MISMATCH;
//! assert_eq!(code.prefix(), "E");
//! assert_eq!(code.as_str(), "E0004");
//! ```

/// A unique code identifying a diagnostic message
///
/// Diagnostic codes follow the format `{prefix}{number}` where:
/// - `prefix` is typically "E" for errors or "W" for warnings
/// - `number` is a 4-digit number (padded with zeros)
///
/// This allows users to reference specific diagnostics in documentation
/// and suppression attributes.
///
/// # Examples
///
/// ```
/// use minic_util::diagnostic::DiagnosticCode;
///
/// let code = DiagnosticCode::new("E", 1);
/// assert_eq!(code.as_str(), "E0001");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct DiagnosticCode {
    /// The prefix (e.g., "E" for error, "W" for warning)
    pub prefix: &'static str,
    /// The numeric identifier
    pub number: u32,
}

impl DiagnosticCode {
    /// Create a new diagnostic code
    #[inline]
    pub const fn new(prefix: &'static str, number: u32) -> Self {
        Self { prefix, number }
    }

    /// Get the prefix (e.g., "E" for error, "W" for warning)
    #[inline]
    pub const fn prefix(&self) -> &'static str {
        self.prefix
    }

    /// Get the numeric identifier
    #[inline]
    pub const fn number(&self) -> u32 {
        self.number
    }

    /// Get the full code string (e.g., "E0001")
    pub fn as_str(&self) -> String {
        format!("{}{:04}", self.prefix, self.number)
    }

    // =========================================================================
    // ERROR TAXONOMY
    //
    // Mirrors the six diagnostics the analysis passes can raise, one per
    // phase: an ill-formed assignment target is rejected at construction
    // time (E0001), duplicate/undeclared names are a scope-analysis concern
    // (E0002/E0003), a type mismatch is caught by `require` (E0004),
    // reading a possibly-unassigned variable is caught by init analysis
    // (E0005), and E0006 covers invariant violations inside code generation
    // itself rather than anything the source program did wrong.
    // =========================================================================

    /// E0001: the left-hand side of an assignment is not an lvalue
    pub const E_AST_INVALID_LVALUE: Self = Self::new("E", 1);
    /// E0002: a name is declared twice in the same scope
    pub const E_SCOPE_DUPLICATE_DECL: Self = Self::new("E", 2);
    /// E0003: a name is used but never declared in any enclosing scope
    pub const E_SCOPE_UNDECLARED_ID: Self = Self::new("E", 3);
    /// E0004: an expression's type does not match what its context requires
    pub const E_TYPE_MISMATCH: Self = Self::new("E", 4);
    /// E0005: a variable is read on some path before it is definitely assigned
    pub const E_INIT_USE_BEFORE_INIT: Self = Self::new("E", 5);
    /// E0006: an internal invariant was violated during code generation
    pub const E_CODEGEN_INTERNAL: Self = Self::new("E", 6);
}

impl std::fmt::Debug for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DiagnosticCode({})", self.as_str())
    }
}

impl std::fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// Standalone constant exports for convenience
pub const E_AST_INVALID_LVALUE: DiagnosticCode = DiagnosticCode::E_AST_INVALID_LVALUE;
pub const E_SCOPE_DUPLICATE_DECL: DiagnosticCode = DiagnosticCode::E_SCOPE_DUPLICATE_DECL;
pub const E_SCOPE_UNDECLARED_ID: DiagnosticCode = DiagnosticCode::E_SCOPE_UNDECLARED_ID;
pub const E_TYPE_MISMATCH: DiagnosticCode = DiagnosticCode::E_TYPE_MISMATCH;
pub const E_INIT_USE_BEFORE_INIT: DiagnosticCode = DiagnosticCode::E_INIT_USE_BEFORE_INIT;
pub const E_CODEGEN_INTERNAL: DiagnosticCode = DiagnosticCode::E_CODEGEN_INTERNAL;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_code() {
        let code = DiagnosticCode::new("E", 4);
        assert_eq!(code.prefix(), "E");
        assert_eq!(code.number(), 4);
    }

    #[test]
    fn test_as_str() {
        assert_eq!(DiagnosticCode::E_AST_INVALID_LVALUE.as_str(), "E0001");
        assert_eq!(DiagnosticCode::E_CODEGEN_INTERNAL.as_str(), "E0006");
    }

    #[test]
    fn test_display() {
        let code = DiagnosticCode::E_TYPE_MISMATCH;
        assert_eq!(format!("{}", code), "E0004");
    }

    #[test]
    fn test_debug() {
        let code = DiagnosticCode::E_TYPE_MISMATCH;
        assert_eq!(format!("{:?}", code), "DiagnosticCode(E0004)");
    }

    #[test]
    fn test_taxonomy_codes_distinct() {
        let codes = [
            DiagnosticCode::E_AST_INVALID_LVALUE,
            DiagnosticCode::E_SCOPE_DUPLICATE_DECL,
            DiagnosticCode::E_SCOPE_UNDECLARED_ID,
            DiagnosticCode::E_TYPE_MISMATCH,
            DiagnosticCode::E_INIT_USE_BEFORE_INIT,
            DiagnosticCode::E_CODEGEN_INTERNAL,
        ];
        for (i, a) in codes.iter().enumerate() {
            for (j, b) in codes.iter().enumerate() {
                if i != j {
                    assert_ne!(a, b);
                }
            }
        }
    }

    #[test]
    fn test_code_equality() {
        let code1 = DiagnosticCode::new("E", 4);
        let code2 = DiagnosticCode::new("E", 4);
        let code3 = DiagnosticCode::new("E", 5);

        assert_eq!(code1, code2);
        assert_ne!(code1, code3);
    }
}
