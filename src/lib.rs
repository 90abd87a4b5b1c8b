//! # Introduction
//!
//! cwalk is a tree-walking evaluator for a minimal C-like language. Programs
//! compute with machine integers, pointers into a flat simulated heap and
//! fixed-size integer arrays, and talk to the outside world through four
//! built-in functions: `GET`, `PRINT`, `MALLOC` and `FREE`.
//!
//! ## Execution pipeline
//!
//! ```text
//! Source → Lexer → Parser → Program (arena AST) → Interpreter → Console
//! ```
//!
//! 1. [`parser`]: tokenises the source, resolves names and types, and builds
//!    an arena of expression, statement and declaration nodes.
//! 2. [`interpreter`]: walks the program, binding a value to every evaluated
//!    expression node in the current stack frame.
//! 3. [`memory`]: heap, array store and stack frames.
//! 4. [`console`]: integer input and output for `GET` and `PRINT`.
//!
//! ## Supported C subset
//!
//! Types: `int`, `char`, `void`, single-level pointers, one-dimensional arrays.
//! Control flow: `if/else`, `while`, `for`, `return`.
//! Operators: arithmetic, comparison, assignment, unary `- + ! ~ *`,
//! subscripts, casts and `sizeof`. Other C operators parse but are reported at
//! run time and evaluate to 0.
//!
//! ```
//! use cwalk::console::ScriptedConsole;
//! use cwalk::interpreter::Config;
//!
//! let source = "extern void PRINT(int);\nint main() { PRINT(6 * 7); return 0; }";
//! let (status, console) = cwalk::run_source(source, Config::default(), ScriptedConsole::default())
//!     .unwrap();
//! assert_eq!(status.return_value, 0);
//! assert_eq!(console.output(), &[42]);
//! ```

pub mod console;
pub mod interpreter;
pub mod memory;
pub mod parser;

use console::Console;
use interpreter::{Config, ExitStatus, Interpreter, RuntimeError};
use parser::ParseError;
use thiserror::Error;

/// Anything that stops a program from running to completion
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

/// Parse and run `source`, handing the console back after the run
pub fn run_source<C: Console>(
    source: &str,
    config: Config,
    console: C,
) -> Result<(ExitStatus, C), Error> {
    let program = parser::parse(source)?;
    let mut interpreter = Interpreter::new(&program, config, console);
    let status = interpreter.run()?;
    Ok((status, interpreter.into_console()))
}
