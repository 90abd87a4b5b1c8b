//! Unary operator evaluation

use crate::console::Console;
use crate::interpreter::environment::Environment;
use crate::interpreter::errors::{RuntimeError, Unsupported};
use crate::parser::ast::*;

impl<C: Console> Environment<'_, C> {
    /// Evaluate unary operator `expr` whose operand is already evaluated
    pub fn uop(&mut self, expr: ExprId, op: UnOp, operand: ExprId) -> Result<(), RuntimeError> {
        let value = match op {
            UnOp::Neg => self.lookup_expr(operand)?.wrapping_neg(),
            UnOp::Plus => self.lookup_expr(operand)?,
            UnOp::BitNot => !self.lookup_expr(operand)?,
            UnOp::Not => (self.lookup_expr(operand)? == 0) as i32,
            UnOp::Deref => {
                let addr = self.lookup_expr(operand)?;
                self.heap.read(addr).map_err(|err| self.memory_error(err))?
            }
            UnOp::AddrOf | UnOp::PreInc | UnOp::PreDec | UnOp::PostInc | UnOp::PostDec => {
                return self.report(expr, Unsupported::UnaryOperator(op.symbol()));
            }
        };

        self.bind_expr(expr, value);
        Ok(())
    }
}
