//! Memory model for the C interpreter
//!
//! This module provides the core memory abstractions:
//! - [`heap`]: Fixed-capacity byte region with bump-pointer allocation
//! - [`arrays`]: Registry of fixed-size integer arrays
//! - [`frame`]: Per-call binding tables for declarations and expression nodes
//!
//! # Value Model
//!
//! Every runtime value is an `i32`. Pointers are heap byte offsets and array
//! variables hold array-store ids; the static type of the referencing node
//! decides how a value is interpreted.
//!
//! # Pointer Arithmetic
//!
//! Element size is fixed regardless of the pointee type:
//! ```text
//! ptr + n    →  ptr + n * 4
//! ptr - ptr  →  (ptr - ptr) / 4
//! ```

pub mod arrays;
pub mod frame;
pub mod heap;

use crate::parser::ast::ExprId;
use thiserror::Error;

/// Heap byte offset
pub type Address = i32;

/// Faults raised by the memory model. The interpreter attaches the source
/// location of the node being evaluated when it turns one into a
/// [`RuntimeError`](crate::interpreter::errors::RuntimeError).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemoryError {
    #[error("Out of heap memory: requested {requested} bytes with {used} of {capacity} in use")]
    HeapExhausted {
        requested: i32,
        used: usize,
        capacity: usize,
    },

    #[error("Invalid allocation size {0}")]
    InvalidAllocationSize(i32),

    #[error("Invalid heap access at address {0}")]
    InvalidHeapAccess(Address),

    #[error("Invalid array id {0}")]
    InvalidArray(i32),

    #[error("Array index {index} out of bounds for length {len}")]
    ArrayIndexOutOfBounds { index: i32, len: usize },

    #[error("Expression node {0:?} read before it was evaluated")]
    UnboundExpression(ExprId),
}
