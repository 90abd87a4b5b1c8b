//! Runtime error types for the C interpreter
//!
//! Failures fall into two tiers:
//!
//! - [`RuntimeError`]: fatal. Evaluation of the program stops and the error is
//!   returned from [`Interpreter::run`](crate::interpreter::Interpreter::run).
//! - [`Unsupported`]: a construct outside the supported subset. By default it is
//!   logged, recorded as a [`Diagnostic`] and the node evaluates to 0 so that the
//!   program keeps running. In strict mode it becomes
//!   [`RuntimeError::Unsupported`] instead.

use crate::memory::MemoryError;
use crate::parser::ast::SourceLocation;
use std::fmt;
use thiserror::Error;

/// Constructs the evaluator reports and steps over
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Unsupported {
    #[error("unsupported binary operator '{0}'")]
    BinaryOperator(&'static str),

    #[error("unsupported unary operator '{0}'")]
    UnaryOperator(&'static str),

    #[error("unsupported assignment target")]
    AssignmentTarget,

    #[error("function '{0}' used as a value")]
    FunctionReference(String),

    #[error("unsupported reference to '{name}' of type '{ty}'")]
    DeclRefType { name: String, ty: String },
}

/// A reported construct and where it occurred
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: Unsupported,
    pub location: SourceLocation,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at line {}, column {}",
            self.kind, self.location.line, self.location.column
        )
    }
}

/// Fatal runtime errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// Heap, array store or frame invariant violated
    #[error("{source} at line {}", .location.line)]
    Memory {
        source: MemoryError,
        location: SourceLocation,
    },

    #[error("Function '{function}' expects {expected} argument{}, got {got} at line {}",
        plural(.expected), .location.line)]
    ArityMismatch {
        function: String,
        expected: usize,
        got: usize,
        location: SourceLocation,
    },

    /// Array ids and heap addresses never convert into each other
    #[error("Cannot use a value of type '{found}' as '{expected}' at line {}", .location.line)]
    ArrayConversion {
        expected: String,
        found: String,
        location: SourceLocation,
    },

    #[error("Call depth limit of {depth} exceeded at line {}", .location.line)]
    RecursionLimit {
        depth: usize,
        location: SourceLocation,
    },

    #[error("sizeof is not supported for type '{ty}' at line {}", .location.line)]
    UnsupportedSizeOf { ty: String, location: SourceLocation },

    #[error("Division by zero in '{op}' at line {}", .location.line)]
    DivisionByZero {
        op: &'static str,
        location: SourceLocation,
    },

    #[error("Invalid pointer arithmetic '{op}' at line {}", .location.line)]
    InvalidPointerArithmetic {
        op: &'static str,
        location: SourceLocation,
    },

    #[error("Call to undefined function '{name}' at line {}", .location.line)]
    UndefinedFunction {
        name: String,
        location: SourceLocation,
    },

    #[error("'{name}' has no value in the current or global frame at line {}", .location.line)]
    UnboundDeclaration {
        name: String,
        location: SourceLocation,
    },

    #[error("No input available for GET at line {}", .location.line)]
    InputUnavailable { location: SourceLocation },

    /// A reported construct, promoted to fatal by strict mode
    #[error("{kind} at line {}", .location.line)]
    Unsupported {
        kind: Unsupported,
        location: SourceLocation,
    },

    #[error("No main() function found")]
    NoEntryFunction,
}

fn plural(count: &usize) -> &'static str {
    if *count == 1 {
        ""
    } else {
        "s"
    }
}

impl RuntimeError {
    pub fn location(&self) -> Option<&SourceLocation> {
        match self {
            RuntimeError::Memory { location, .. }
            | RuntimeError::ArityMismatch { location, .. }
            | RuntimeError::ArrayConversion { location, .. }
            | RuntimeError::RecursionLimit { location, .. }
            | RuntimeError::UnsupportedSizeOf { location, .. }
            | RuntimeError::DivisionByZero { location, .. }
            | RuntimeError::InvalidPointerArithmetic { location, .. }
            | RuntimeError::UndefinedFunction { location, .. }
            | RuntimeError::UnboundDeclaration { location, .. }
            | RuntimeError::InputUnavailable { location }
            | RuntimeError::Unsupported { location, .. } => Some(location),
            RuntimeError::NoEntryFunction => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_line() {
        let err = RuntimeError::Memory {
            source: MemoryError::InvalidHeapAccess(9000),
            location: SourceLocation::new(3, 5),
        };
        assert_eq!(err.to_string(), "Invalid heap access at address 9000 at line 3");
        assert_eq!(err.location(), Some(&SourceLocation::new(3, 5)));

        let err = RuntimeError::ArityMismatch {
            function: "f".to_string(),
            expected: 1,
            got: 2,
            location: SourceLocation::new(7, 1),
        };
        assert_eq!(err.to_string(), "Function 'f' expects 1 argument, got 2 at line 7");

        let err = RuntimeError::RecursionLimit {
            depth: 64,
            location: SourceLocation::new(4, 9),
        };
        assert_eq!(err.to_string(), "Call depth limit of 64 exceeded at line 4");
    }

    #[test]
    fn test_diagnostic_display() {
        let diagnostic = Diagnostic {
            kind: Unsupported::BinaryOperator("&&"),
            location: SourceLocation::new(2, 14),
        };
        assert_eq!(
            diagnostic.to_string(),
            "unsupported binary operator '&&' at line 2, column 14"
        );
        assert_eq!(RuntimeError::NoEntryFunction.location(), None);
    }
}
