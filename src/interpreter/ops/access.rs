//! Value access: declaration references, casts, subscripts and `sizeof`

use crate::console::Console;
use crate::interpreter::constants::INT_SIZE;
use crate::interpreter::environment::Environment;
use crate::interpreter::errors::{RuntimeError, Unsupported};
use crate::memory::arrays::ArrayId;
use crate::memory::Address;
use crate::parser::ast::*;

/// Storage location of a subscripted element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Element {
    Array { id: ArrayId, index: i32 },
    Heap(Address),
}

impl<C: Console> Environment<'_, C> {
    /// Evaluate a reference to `decl`
    pub fn declref(&mut self, expr: ExprId, decl: DeclId) -> Result<(), RuntimeError> {
        let program = self.program;
        let target = program.decl(decl);

        match &target.kind {
            DeclKind::Var { ty, .. } if ty.is_integer() || ty.is_pointer() || ty.is_array() => {
                let value = self.lookup_decl(decl)?;
                self.bind_expr(expr, value);
                Ok(())
            }
            DeclKind::Var { ty, .. } => self.report(
                expr,
                Unsupported::DeclRefType {
                    name: target.name.clone(),
                    ty: ty.to_string(),
                },
            ),
            // Built-ins may be named as values; they carry no meaningful value
            DeclKind::Function { .. } if self.builtin_role(decl).is_some() => {
                self.bind_expr(expr, 0);
                Ok(())
            }
            DeclKind::Function { .. } => {
                self.report(expr, Unsupported::FunctionReference(target.name.clone()))
            }
        }
    }

    /// Casts keep the value unchanged; a cast to `void` produces nothing
    pub fn cast(&mut self, expr: ExprId, operand: ExprId) -> Result<(), RuntimeError> {
        if self.program.expr(expr).ty.is_void() {
            return Ok(());
        }

        let value = self.lookup_expr(operand)?;
        self.bind_expr(expr, value);
        Ok(())
    }

    /// Read `base[index]`
    pub fn arraysub(
        &mut self,
        expr: ExprId,
        base: ExprId,
        index: ExprId,
    ) -> Result<(), RuntimeError> {
        let value = match self.element(base, index)? {
            Element::Array { id, index } => self.arrays.get(id, index),
            Element::Heap(addr) => self.heap.read(addr),
        }
        .map_err(|err| self.memory_error(err))?;

        self.bind_expr(expr, value);
        Ok(())
    }

    /// Write `base[index]`
    pub(crate) fn store_element(
        &mut self,
        base: ExprId,
        index: ExprId,
        value: i32,
    ) -> Result<(), RuntimeError> {
        match self.element(base, index)? {
            Element::Array { id, index } => self.arrays.set(id, index, value),
            Element::Heap(addr) => self.heap.write(addr, value),
        }
        .map_err(|err| self.memory_error(err))
    }

    /// Size in bytes of `ty`: pointers and integers only
    pub fn sizeof(&mut self, expr: ExprId, ty: &Type) -> Result<(), RuntimeError> {
        let size = if ty.is_pointer() {
            self.heap.ptr_size()
        } else if ty.is_integer() {
            INT_SIZE
        } else {
            return Err(RuntimeError::UnsupportedSizeOf {
                ty: ty.to_string(),
                location: self.program.expr(expr).location,
            });
        };

        self.bind_expr(expr, size);
        Ok(())
    }

    /// Pointer bases address the heap, anything else names an array.
    ///
    /// Array-typed parameters receive the caller's array id, so they take the
    /// array path; array values never reach a pointer slot.
    fn element(&self, base: ExprId, index: ExprId) -> Result<Element, RuntimeError> {
        let base_value = self.lookup_expr(base)?;
        let index_value = self.lookup_expr(index)?;

        if self.program.expr(base).ty.is_pointer() {
            let offset = self.heap.step_to_size(index_value);
            Ok(Element::Heap(base_value.wrapping_add(offset)))
        } else {
            Ok(Element::Array {
                id: base_value,
                index: index_value,
            })
        }
    }
}
