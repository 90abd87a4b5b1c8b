//! Assignment
//!
//! The right operand's value is bound to the target node and to the
//! assignment itself, then stored according to the target's shape:
//!
//! - Variable: written through the two-level binding policy
//! - `*p`: written to the heap at the pointer's address
//! - `a[i]`: written to the array store, or to the heap for pointer bases
//!
//! Any other target is reported as unsupported.

use crate::console::Console;
use crate::interpreter::environment::Environment;
use crate::interpreter::errors::{RuntimeError, Unsupported};
use crate::parser::ast::*;

impl<C: Console> Environment<'_, C> {
    pub(crate) fn assign(
        &mut self,
        expr: ExprId,
        lhs: ExprId,
        rhs: ExprId,
    ) -> Result<(), RuntimeError> {
        let program = self.program;
        let target_ty = &program.expr(lhs).ty;
        if target_ty.is_pointer() {
            self.check_array_conversion(target_ty, rhs)?;
        }

        let value = self.lookup_expr(rhs)?;
        self.bind_expr(lhs, value);
        self.bind_expr(expr, value);

        let target = program.strip_parens(lhs);
        match &program.expr(target).kind {
            ExprKind::DeclRef(decl) if is_assignable(program.decl(*decl)) => {
                self.bind_decl(*decl, value);
            }
            ExprKind::Unary {
                op: UnOp::Deref,
                operand,
            } => {
                let addr = self.lookup_expr(*operand)?;
                self.heap
                    .write(addr, value)
                    .map_err(|err| self.memory_error(err))?;
            }
            ExprKind::Subscript { base, index } => {
                self.store_element(*base, *index, value)?;
            }
            _ => return self.report(expr, Unsupported::AssignmentTarget),
        }

        Ok(())
    }
}

/// Scalar variables; arrays and functions cannot be assigned as a whole
fn is_assignable(decl: &Decl) -> bool {
    match &decl.kind {
        DeclKind::Var { ty, .. } => !ty.is_array(),
        DeclKind::Function { .. } => false,
    }
}
