//! Statement execution implementation
//!
//! This module handles the execution of:
//!
//! - Variable declarations and initializations
//! - Blocks and expression statements
//! - `if`/`else`
//! - `return`
//!
//! Loops live in [`loops`](super::loops).
//!
//! # Control Flow
//!
//! Every statement returns a [`Flow`]. A `return` produces [`Flow::Return`],
//! which each enclosing statement passes straight up without running anything
//! else, until the call that pushed the frame consumes it.

use crate::console::Console;
use crate::interpreter::engine::{Flow, Interpreter};
use crate::interpreter::errors::RuntimeError;
use crate::memory::frame::Cursor;
use crate::parser::ast::*;

impl<C: Console> Interpreter<'_, C> {
    pub(crate) fn execute_statement(&mut self, stmt: StmtId) -> Result<Flow, RuntimeError> {
        let program = self.env.program;
        self.env.set_cursor(Cursor::Stmt(stmt));

        match &program.stmt(stmt).kind {
            StmtKind::Compound(statements) => self.execute_block(statements),

            StmtKind::Decl(decls) => {
                for &decl in decls {
                    self.execute_var_decl(decl)?;
                }
                Ok(Flow::Normal)
            }

            StmtKind::Expr(expr) => {
                self.evaluate_expr(*expr)?;
                Ok(Flow::Normal)
            }

            StmtKind::If {
                condition,
                then_branch,
                else_branch,
            } => self.execute_if(*condition, *then_branch, *else_branch),

            StmtKind::While { condition, body } => self.execute_while(*condition, *body),

            StmtKind::For {
                init,
                condition,
                increment,
                body,
            } => self.execute_for(*init, *condition, *increment, *body),

            StmtKind::Return(expr) => self.execute_return(*expr),

            StmtKind::Empty => Ok(Flow::Normal),
        }
    }

    fn execute_block(&mut self, statements: &[StmtId]) -> Result<Flow, RuntimeError> {
        for &stmt in statements {
            if let flow @ Flow::Return(_) = self.execute_statement(stmt)? {
                return Ok(flow);
            }
        }
        Ok(Flow::Normal)
    }

    /// Evaluate the initializer, if any, then bind the variable in the top frame
    pub(crate) fn execute_var_decl(&mut self, decl: DeclId) -> Result<(), RuntimeError> {
        let program = self.env.program;
        if let DeclKind::Var {
            init: Some(init), ..
        } = &program.decl(decl).kind
        {
            self.evaluate_expr(*init)?;
        }
        self.env.handle_var_decl(decl)
    }

    fn execute_if(
        &mut self,
        condition: ExprId,
        then_branch: StmtId,
        else_branch: Option<StmtId>,
    ) -> Result<Flow, RuntimeError> {
        if self.condition_holds(condition)? {
            self.execute_statement(then_branch)
        } else if let Some(else_branch) = else_branch {
            self.execute_statement(else_branch)
        } else {
            Ok(Flow::Normal)
        }
    }

    fn execute_return(&mut self, expr: Option<ExprId>) -> Result<Flow, RuntimeError> {
        let value = match expr {
            Some(expr) => {
                self.evaluate_expr(expr)?;
                if let Some(function) = self.env.stack.top().function {
                    let return_type = self.env.program.decl(function).ty().return_type();
                    if return_type.is_pointer() {
                        self.env.check_array_conversion(&return_type, expr)?;
                    }
                }
                self.env.lookup_expr(expr)?
            }
            None => 0,
        };
        Ok(Flow::Return(value))
    }
}
