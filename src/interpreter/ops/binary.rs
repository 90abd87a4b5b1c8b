//! Binary operator evaluation
//!
//! Additive operators follow pointer rules when an operand is pointer-typed:
//! the integer side is scaled by the element size, and the difference of two
//! pointers is divided by it. Arithmetic wraps like machine integers.

use crate::console::Console;
use crate::interpreter::constants::INT_SIZE;
use crate::interpreter::environment::Environment;
use crate::interpreter::errors::{RuntimeError, Unsupported};
use crate::parser::ast::*;

impl<C: Console> Environment<'_, C> {
    /// Evaluate binary operator `expr` whose operands are already evaluated.
    /// Assignments expect `lhs` to have been evaluated as a target only.
    pub fn binop(
        &mut self,
        expr: ExprId,
        op: BinOp,
        lhs: ExprId,
        rhs: ExprId,
    ) -> Result<(), RuntimeError> {
        if op == BinOp::Assign {
            return self.assign(expr, lhs, rhs);
        }

        if op.is_additive() {
            let value = self.additive(op, lhs, rhs)?;
            self.bind_expr(expr, value);
            return Ok(());
        }

        if op.is_multiplicative() {
            let value = self.multiplicative(op, lhs, rhs)?;
            self.bind_expr(expr, value);
            return Ok(());
        }

        if op.is_comparison() {
            let left = self.lookup_expr(lhs)?;
            let right = self.lookup_expr(rhs)?;
            let result = match op {
                BinOp::Eq => left == right,
                BinOp::Ne => left != right,
                BinOp::Lt => left < right,
                BinOp::Le => left <= right,
                BinOp::Gt => left > right,
                _ => left >= right,
            };
            self.bind_expr(expr, result as i32);
            return Ok(());
        }

        // Logical, bitwise and compound assignment operators
        self.report(expr, Unsupported::BinaryOperator(op.symbol()))
    }

    fn additive(&self, op: BinOp, lhs: ExprId, rhs: ExprId) -> Result<i32, RuntimeError> {
        let program = self.program;
        let left = self.lookup_expr(lhs)?;
        let right = self.lookup_expr(rhs)?;
        let left_ptr = program.expr(lhs).ty.is_pointer();
        let right_ptr = program.expr(rhs).ty.is_pointer();

        match (left_ptr, right_ptr, op) {
            // Pointer difference counts elements
            (true, true, BinOp::Sub) => Ok(left.wrapping_sub(right) / INT_SIZE),
            (true, false, BinOp::Add) => Ok(left.wrapping_add(self.heap.step_to_size(right))),
            (true, false, _) => Ok(left.wrapping_sub(self.heap.step_to_size(right))),
            (false, true, BinOp::Add) => Ok(self.heap.step_to_size(left).wrapping_add(right)),
            (true, true, _) | (false, true, _) => Err(RuntimeError::InvalidPointerArithmetic {
                op: op.symbol(),
                location: program.expr(lhs).location,
            }),
            (false, false, BinOp::Add) => Ok(left.wrapping_add(right)),
            (false, false, _) => Ok(left.wrapping_sub(right)),
        }
    }

    fn multiplicative(&self, op: BinOp, lhs: ExprId, rhs: ExprId) -> Result<i32, RuntimeError> {
        let left = self.lookup_expr(lhs)?;
        let right = self.lookup_expr(rhs)?;

        if op == BinOp::Mul {
            return Ok(left.wrapping_mul(right));
        }

        if right == 0 {
            return Err(RuntimeError::DivisionByZero {
                op: op.symbol(),
                location: self.program.expr(rhs).location,
            });
        }

        Ok(match op {
            BinOp::Div => left.wrapping_div(right),
            _ => left.wrapping_rem(right),
        })
    }
}
