//! Execution engine for the C interpreter
//!
//! [`Interpreter`] walks the AST. Each expression's children are evaluated
//! first and bound in the top frame, then the matching
//! [`Environment`] handler reads them back and binds the node itself.
//!
//! # Calls
//!
//! A user call pushes a frame, runs the body and binds the call node in the
//! caller's frame once the callee's [`Flow::Return`] (or the end of its body)
//! is reached. Nesting is bounded by [`Config::max_call_depth`]; the native
//! stack grows on demand so that the limit, not the host, ends deep recursion.

use crate::console::Console;
use crate::interpreter::config::Config;
use crate::interpreter::environment::{CallKind, Environment};
use crate::interpreter::errors::{Diagnostic, RuntimeError};
use crate::memory::frame::Cursor;
use crate::parser::ast::*;
use tracing::{debug, trace, warn};

/// Native stack that must remain before a call body is entered
const RED_ZONE: usize = 100 * 1024;

/// Size of each additional native stack segment
const STACK_GROWTH: usize = 1024 * 1024;

/// How a statement finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Continue with the next statement
    Normal,
    /// A `return` is unwinding to the enclosing call
    Return(i32),
}

/// Result of running a program to completion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitStatus {
    /// Value returned by `main`, 0 if it finished without `return`
    pub return_value: i32,
}

/// Tree-walking evaluator over a parsed program
pub struct Interpreter<'p, C: Console> {
    pub(crate) env: Environment<'p, C>,
}

impl<'p, C: Console> Interpreter<'p, C> {
    /// Create an interpreter for `program`, resolving built-ins and `main`
    pub fn new(program: &'p Program, config: Config, console: C) -> Self {
        Interpreter {
            env: Environment::new(program, config, console),
        }
    }

    /// Initialize globals, then run `main` to completion
    pub fn run(&mut self) -> Result<ExitStatus, RuntimeError> {
        let program = self.env.program;

        for item in &program.items {
            if let TopLevel::Variable(decl) = *item {
                self.execute_var_decl(decl)?;
            }
        }

        let entry = self.env.entry().ok_or(RuntimeError::NoEntryFunction)?;
        let body = self
            .env
            .enter_entry(entry)
            .ok_or_else(|| RuntimeError::UndefinedFunction {
                name: program.decl(entry).name.clone(),
                location: program.decl(entry).location,
            })?;
        debug!("entering main");

        let return_value = match self.execute_statement(body)? {
            Flow::Return(value) => value,
            Flow::Normal => 0,
        };
        self.env.leave_entry();

        if return_value != 0 {
            warn!(return_value, "main exited with a non-zero code");
        }

        Ok(ExitStatus { return_value })
    }

    /// Evaluate `expr` and bind its value in the top frame
    pub(crate) fn evaluate_expr(&mut self, expr: ExprId) -> Result<(), RuntimeError> {
        let program = self.env.program;
        let node = program.expr(expr);
        self.env.set_cursor(Cursor::Expr(expr));
        trace!(expr = expr.0, line = node.location.line, "evaluate");

        match &node.kind {
            ExprKind::IntLiteral(n) => {
                self.env.bind_expr(expr, *n);
                Ok(())
            }

            ExprKind::DeclRef(decl) => self.env.declref(expr, *decl),

            ExprKind::Paren(inner) => {
                self.evaluate_expr(*inner)?;
                let value = self.env.lookup_expr(*inner)?;
                self.env.bind_expr(expr, value);
                Ok(())
            }

            ExprKind::Unary { op, operand } => {
                self.evaluate_expr(*operand)?;
                self.env.set_cursor(Cursor::Expr(expr));
                self.env.uop(expr, *op, *operand)
            }

            ExprKind::Binary { op, lhs, rhs } => {
                if op.is_assignment() {
                    self.evaluate_expr(*rhs)?;
                    self.evaluate_target(*lhs)?;
                } else {
                    self.evaluate_expr(*lhs)?;
                    self.evaluate_expr(*rhs)?;
                }
                self.env.set_cursor(Cursor::Expr(expr));
                self.env.binop(expr, *op, *lhs, *rhs)
            }

            ExprKind::Call { callee, args } => self.evaluate_call(expr, *callee, args),

            ExprKind::Subscript { base, index } => {
                self.evaluate_expr(*base)?;
                self.evaluate_expr(*index)?;
                self.env.set_cursor(Cursor::Expr(expr));
                self.env.arraysub(expr, *base, *index)
            }

            ExprKind::Cast { expr: operand } => {
                self.evaluate_expr(*operand)?;
                self.env.cast(expr, *operand)
            }

            ExprKind::SizeOf(ty) => self.env.sizeof(expr, ty),
        }
    }

    /// Evaluate only what locates an assignment target, never the target itself
    fn evaluate_target(&mut self, target: ExprId) -> Result<(), RuntimeError> {
        let program = self.env.program;
        match &program.expr(target).kind {
            ExprKind::Paren(inner) => self.evaluate_target(*inner),
            ExprKind::Unary {
                op: UnOp::Deref,
                operand,
            } => self.evaluate_expr(*operand),
            ExprKind::Subscript { base, index } => {
                self.evaluate_expr(*base)?;
                self.evaluate_expr(*index)
            }
            // Variables need nothing; other shapes are reported by the assignment
            _ => Ok(()),
        }
    }

    fn evaluate_call(
        &mut self,
        expr: ExprId,
        callee: DeclId,
        args: &[ExprId],
    ) -> Result<(), RuntimeError> {
        for &arg in args {
            self.evaluate_expr(arg)?;
        }
        self.env.set_cursor(Cursor::Expr(expr));

        match self.env.call(expr, callee, args)? {
            CallKind::Builtin(_) => Ok(()),
            CallKind::User { body } => {
                let flow = stacker::maybe_grow(RED_ZONE, STACK_GROWTH, || {
                    self.execute_statement(body)
                })?;
                let value = match flow {
                    Flow::Return(value) => value,
                    Flow::Normal => 0,
                };
                self.env.return_from_call(expr, value);
                Ok(())
            }
        }
    }

    /// Value bound to an already-evaluated condition, as a truth value
    pub(crate) fn condition_holds(&mut self, condition: ExprId) -> Result<bool, RuntimeError> {
        self.evaluate_expr(condition)?;
        Ok(self.env.lookup_expr(condition)? != 0)
    }

    pub fn environment(&self) -> &Environment<'p, C> {
        &self.env
    }

    /// Constructs reported and skipped during the run
    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.env.diagnostics()
    }

    pub fn console(&self) -> &C {
        self.env.console()
    }

    pub fn into_console(self) -> C {
        self.env.into_console()
    }
}
