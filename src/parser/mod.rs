//! C source code parser
//!
//! This module transforms C source text into an arena-allocated AST:
//! - [`lexer`]: Tokenization (source text → tokens)
//! - [`parse`]: Parser struct, scopes and the [`parse()`] entry point
//! - [`ast`]: AST node definitions
//!
//! # Supported C Subset
//!
//! - Types: `int`, `char`, `void`, pointers, one-dimensional arrays
//! - Statements: declarations, expression statements, `if`, `while`, `for`,
//!   `return`, blocks
//! - Expressions: arithmetic, comparisons, assignment, calls, subscripts,
//!   casts, `sizeof`, plus operators the evaluator reports as unsupported
//! - Lines starting with `#` are skipped
//!
//! Names are resolved and expression types are computed while parsing, so the
//! evaluator works purely on declaration identities and static types.

pub mod ast;
pub mod lexer;
pub mod parse;

mod declarations;
mod expressions;
mod statements;

pub use parse::{parse, ParseError, Parser};
