//! Loop statement execution (`while`, `for`).
//!
//! The condition is evaluated before every iteration, so a loop whose
//! condition starts out false never runs its body. A [`Flow::Return`] from
//! the body ends the loop and is passed up unchanged.

use crate::console::Console;
use crate::interpreter::engine::{Flow, Interpreter};
use crate::interpreter::errors::RuntimeError;
use crate::parser::ast::{ExprId, StmtId};

impl<C: Console> Interpreter<'_, C> {
    /// Executes `while (condition) body`
    pub(crate) fn execute_while(
        &mut self,
        condition: ExprId,
        body: StmtId,
    ) -> Result<Flow, RuntimeError> {
        while self.condition_holds(condition)? {
            if let flow @ Flow::Return(_) = self.execute_statement(body)? {
                return Ok(flow);
            }
        }
        Ok(Flow::Normal)
    }

    /// Executes `for (init; condition; increment) body`.
    ///
    /// A missing condition loops until the body returns.
    pub(crate) fn execute_for(
        &mut self,
        init: Option<StmtId>,
        condition: Option<ExprId>,
        increment: Option<ExprId>,
        body: StmtId,
    ) -> Result<Flow, RuntimeError> {
        if let Some(init) = init {
            self.execute_statement(init)?;
        }

        loop {
            if let Some(condition) = condition {
                if !self.condition_holds(condition)? {
                    break;
                }
            }

            if let flow @ Flow::Return(_) = self.execute_statement(body)? {
                return Ok(flow);
            }

            if let Some(increment) = increment {
                self.evaluate_expr(increment)?;
            }
        }

        Ok(Flow::Normal)
    }
}
