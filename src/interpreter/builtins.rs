//! Built-in function implementations
//!
//! Built-ins are plain function declarations whose names match a reserved
//! role. Calls to them are handled here without pushing a frame.
//!
//! # Supported Built-ins
//!
//! - `GET()`: read one integer from the console
//! - `PRINT(value)`: write one integer to the console
//! - `MALLOC(size)`: reserve `size` heap bytes and return their address
//! - `FREE(ptr)`: accepted and ignored; heap space is never reclaimed
//!
//! `PRINT` and `FREE` produce no value, so their call nodes stay unbound.

use crate::console::Console;
use crate::interpreter::environment::{Builtin, Environment};
use crate::interpreter::errors::RuntimeError;
use crate::parser::ast::ExprId;
use tracing::debug;

impl<C: Console> Environment<'_, C> {
    pub(crate) fn call_builtin(
        &mut self,
        expr: ExprId,
        builtin: Builtin,
        args: &[ExprId],
    ) -> Result<(), RuntimeError> {
        if args.len() != builtin.arity() {
            return Err(RuntimeError::ArityMismatch {
                function: builtin.name().to_string(),
                expected: builtin.arity(),
                got: args.len(),
                location: self.location(),
            });
        }

        match builtin {
            Builtin::Get => {
                let value = self
                    .console
                    .read_int()
                    .ok_or_else(|| RuntimeError::InputUnavailable {
                        location: self.location(),
                    })?;
                debug!(value, "GET");
                self.bind_expr(expr, value);
            }
            Builtin::Print => {
                let value = self.lookup_expr(args[0])?;
                debug!(value, "PRINT");
                self.console.write_int(value);
            }
            Builtin::Malloc => {
                let size = self.lookup_expr(args[0])?;
                let addr = self
                    .heap
                    .allocate(size)
                    .map_err(|err| self.memory_error(err))?;
                self.bind_expr(expr, addr);
            }
            Builtin::Free => {
                let addr = self.lookup_expr(args[0])?;
                self.heap.free(addr);
            }
        }

        Ok(())
    }
}
