//! C interpreter execution engine
//!
//! This module provides the evaluator and its runtime state:
//! - [`engine`]: [`Interpreter`], the tree-walking evaluator and its entry point
//! - [`environment`]: call stack, heap, arrays, built-in roles
//! - [`ops`]: operator, reference, cast, subscript and `sizeof` handlers
//! - [`errors`]: fatal errors and reported constructs
//!
//! # Execution Model
//!
//! The evaluator visits an expression's children first, then asks the
//! environment to compute the node from the children's bound values and bind
//! the result in the top frame. Parents read those bindings, never re-evaluate.
//!
//! # Built-in Functions
//!
//! `GET`, `PRINT`, `MALLOC` and `FREE` are ordinary declarations recognized by
//! name when the interpreter is created (see [`builtins`]).

pub mod builtins;
pub mod config;
pub mod constants;
pub mod engine;
pub mod environment;
pub mod errors;
pub mod loops;
pub mod ops;
pub mod statements;

pub use config::Config;
pub use engine::{ExitStatus, Flow, Interpreter};
pub use errors::{Diagnostic, RuntimeError, Unsupported};
