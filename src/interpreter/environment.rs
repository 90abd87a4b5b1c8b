//! Runtime environment shared by every evaluation step
//!
//! [`Environment`] owns the call stack (frame 0 is the global scope), the heap,
//! the array store and the console. It also knows which declarations play the
//! built-in roles and which function is the entry point; both are resolved by
//! name once, at construction, and referenced by [`DeclId`] afterwards.
//!
//! # Binding Policy
//!
//! Only two levels are searched: the top frame, then frame 0. Writing a
//! declaration goes to the top frame if it already holds that declaration and
//! to the global frame otherwise; new locals are introduced with
//! [`Environment::declare`].
//!
//! The operator and built-in handlers live in [`ops`](super::ops) and
//! [`builtins`](super::builtins) as further `impl Environment` blocks.

use crate::console::Console;
use crate::interpreter::config::Config;
use crate::interpreter::constants::{
    BUILTIN_FREE, BUILTIN_GET, BUILTIN_MALLOC, BUILTIN_PRINT, ENTRY_FUNCTION,
};
use crate::interpreter::errors::{Diagnostic, RuntimeError, Unsupported};
use crate::memory::arrays::ArrayStore;
use crate::memory::frame::{CallStack, Cursor, StackFrame};
use crate::memory::heap::Heap;
use crate::memory::MemoryError;
use crate::parser::ast::*;
use tracing::{debug, trace, warn};

/// Built-in runtime operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    /// Read one integer
    Get,
    /// Write one integer
    Print,
    /// Allocate heap bytes
    Malloc,
    /// Release heap bytes (no reclamation)
    Free,
}

impl Builtin {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            BUILTIN_GET => Some(Builtin::Get),
            BUILTIN_PRINT => Some(Builtin::Print),
            BUILTIN_MALLOC => Some(Builtin::Malloc),
            BUILTIN_FREE => Some(Builtin::Free),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Builtin::Get => BUILTIN_GET,
            Builtin::Print => BUILTIN_PRINT,
            Builtin::Malloc => BUILTIN_MALLOC,
            Builtin::Free => BUILTIN_FREE,
        }
    }

    /// Number of arguments the built-in takes
    pub fn arity(self) -> usize {
        match self {
            Builtin::Get => 0,
            Builtin::Print | Builtin::Malloc | Builtin::Free => 1,
        }
    }
}

/// Declarations bound to each built-in role
#[derive(Debug, Clone, Copy, Default)]
struct BuiltinRoles {
    get: Option<DeclId>,
    print: Option<DeclId>,
    malloc: Option<DeclId>,
    free: Option<DeclId>,
}

impl BuiltinRoles {
    fn assign(&mut self, builtin: Builtin, decl: DeclId) {
        let slot = match builtin {
            Builtin::Get => &mut self.get,
            Builtin::Print => &mut self.print,
            Builtin::Malloc => &mut self.malloc,
            Builtin::Free => &mut self.free,
        };
        slot.get_or_insert(decl);
    }

    fn role_of(&self, decl: DeclId) -> Option<Builtin> {
        [
            (self.get, Builtin::Get),
            (self.print, Builtin::Print),
            (self.malloc, Builtin::Malloc),
            (self.free, Builtin::Free),
        ]
        .into_iter()
        .find_map(|(slot, builtin)| (slot == Some(decl)).then_some(builtin))
    }
}

/// Outcome of [`Environment::call`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    /// Handled synchronously, no frame was pushed
    Builtin(Builtin),
    /// A frame was pushed; the evaluator must run `body` and then
    /// [`Environment::return_from_call`]
    User { body: StmtId },
}

/// Interpreter state: call stack, heap, arrays, roles and I/O
pub struct Environment<'p, C: Console> {
    pub(crate) program: &'p Program,
    pub(crate) stack: CallStack,
    pub(crate) heap: Heap,
    pub(crate) arrays: ArrayStore,
    pub(crate) console: C,
    pub(crate) config: Config,
    roles: BuiltinRoles,
    entry: Option<DeclId>,
    diagnostics: Vec<Diagnostic>,
}

impl<'p, C: Console> Environment<'p, C> {
    /// Create the environment and resolve built-in roles and the entry function
    pub fn new(program: &'p Program, config: Config, console: C) -> Self {
        let mut roles = BuiltinRoles::default();
        let mut entry = None;

        for item in &program.items {
            let TopLevel::Function(id) = *item else {
                continue;
            };
            let name = program.decl(id).name.as_str();
            if let Some(builtin) = Builtin::from_name(name) {
                roles.assign(builtin, id);
            } else if name == ENTRY_FUNCTION {
                entry.get_or_insert(id);
            }
        }

        debug!(
            ?entry,
            get = ?roles.get,
            print = ?roles.print,
            malloc = ?roles.malloc,
            free = ?roles.free,
            "resolved entry and built-in roles"
        );

        Environment {
            program,
            stack: CallStack::new(),
            heap: Heap::new(config.heap_capacity),
            arrays: ArrayStore::new(),
            console,
            config,
            roles,
            entry,
            diagnostics: Vec::new(),
        }
    }

    pub fn entry(&self) -> Option<DeclId> {
        self.entry
    }

    /// Built-in role of a function declaration, if any
    pub fn builtin_role(&self, decl: DeclId) -> Option<Builtin> {
        self.roles.role_of(decl)
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn heap(&self) -> &Heap {
        &self.heap
    }

    pub fn arrays(&self) -> &ArrayStore {
        &self.arrays
    }

    pub fn stack(&self) -> &CallStack {
        &self.stack
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    pub fn into_console(self) -> C {
        self.console
    }

    // ===== Declarations =====

    /// Write `decl`: the top frame if it already holds it, frame 0 otherwise
    pub fn bind_decl(&mut self, decl: DeclId, value: i32) {
        let frame = if self.stack.top().has_decl(decl) {
            self.stack.top_mut()
        } else {
            self.stack.global_mut()
        };
        frame.bind_decl(decl, value);
    }

    /// Introduce `decl` in the top frame
    pub fn declare(&mut self, decl: DeclId, value: i32) {
        trace!(name = %self.program.decl(decl).name, value, "declare");
        self.stack.top_mut().bind_decl(decl, value);
    }

    /// Read `decl` from the top frame, falling back to frame 0
    pub fn lookup_decl(&self, decl: DeclId) -> Result<i32, RuntimeError> {
        self.stack
            .top()
            .lookup_decl(decl)
            .or_else(|| self.stack.global().lookup_decl(decl))
            .ok_or_else(|| RuntimeError::UnboundDeclaration {
                name: self.program.decl(decl).name.clone(),
                location: self.location(),
            })
    }

    // ===== Expression values =====

    pub fn bind_expr(&mut self, expr: ExprId, value: i32) {
        trace!(expr = expr.0, value, "bind");
        self.stack.top_mut().bind_expr(expr, value);
    }

    pub fn lookup_expr(&self, expr: ExprId) -> Result<i32, RuntimeError> {
        self.stack
            .top()
            .lookup_expr(expr)
            .map_err(|err| self.memory_error(err))
    }

    // ===== Cursor and errors =====

    pub fn set_cursor(&mut self, cursor: Cursor) {
        self.stack.top_mut().set_cursor(cursor);
    }

    /// Source location of the node the top frame is executing
    pub fn location(&self) -> SourceLocation {
        match self.stack.top().cursor() {
            Some(Cursor::Stmt(id)) => self.program.stmt(id).location,
            Some(Cursor::Expr(id)) => self.program.expr(id).location,
            None => SourceLocation::default(),
        }
    }

    pub(crate) fn memory_error(&self, source: MemoryError) -> RuntimeError {
        RuntimeError::Memory {
            source,
            location: self.location(),
        }
    }

    /// Report an unsupported construct at `expr` and bind the node to 0.
    /// Strict mode turns the report into an error.
    pub(crate) fn report(&mut self, expr: ExprId, kind: Unsupported) -> Result<(), RuntimeError> {
        let location = self.program.expr(expr).location;
        if self.config.strict {
            return Err(RuntimeError::Unsupported { kind, location });
        }

        warn!(line = location.line, column = location.column, "{}", kind);
        self.diagnostics.push(Diagnostic { kind, location });
        self.bind_expr(expr, 0);
        Ok(())
    }

    // ===== Declarations and calls =====

    /// Give a variable its initial value in the top frame.
    ///
    /// Arrays are created in the array store and the variable holds the array id.
    /// Otherwise the value of the already-evaluated initializer is used, or 0.
    pub fn handle_var_decl(&mut self, decl: DeclId) -> Result<(), RuntimeError> {
        let program = self.program;
        let DeclKind::Var { ty, init, .. } = &program.decl(decl).kind else {
            return Ok(());
        };

        let value = if let Some(len) = ty.array_len() {
            self.arrays.create(len, self.stack.depth() - 1)
        } else if let Some(init) = init {
            self.check_array_conversion(ty, *init)?;
            self.lookup_expr(*init)?
        } else {
            0
        };

        self.declare(decl, value);
        Ok(())
    }

    /// Reject moving a value between an array-typed and a pointer-typed slot.
    ///
    /// Array-typed values are array store ids, pointer-typed values are heap
    /// addresses. An `int a[]` slot only accepts an array, and a pointer slot
    /// never accepts one.
    pub(crate) fn check_array_conversion(
        &self,
        target: &Type,
        source: ExprId,
    ) -> Result<(), RuntimeError> {
        let found = &self.program.expr(source).ty;
        if (target.is_pointer() && found.is_array()) || (target.is_array() && !found.is_array()) {
            return Err(RuntimeError::ArrayConversion {
                expected: target.to_string(),
                found: found.to_string(),
                location: self.program.expr(source).location,
            });
        }
        Ok(())
    }

    /// Dispatch a call whose arguments are already evaluated.
    ///
    /// Built-ins run immediately. For user functions a frame is pushed, the
    /// parameters are bound and the body is handed back to the evaluator.
    pub fn call(
        &mut self,
        expr: ExprId,
        callee: DeclId,
        args: &[ExprId],
    ) -> Result<CallKind, RuntimeError> {
        let program = self.program;

        if let Some(builtin) = self.builtin_role(callee) {
            self.call_builtin(expr, builtin, args)?;
            return Ok(CallKind::Builtin(builtin));
        }

        let decl = program.decl(callee);
        let (params, body) = match &decl.kind {
            DeclKind::Function {
                params,
                body: Some(body),
                ..
            } => (params, *body),
            _ => {
                return Err(RuntimeError::UndefinedFunction {
                    name: decl.name.clone(),
                    location: self.location(),
                });
            }
        };

        if params.len() != args.len() {
            return Err(RuntimeError::ArityMismatch {
                function: decl.name.clone(),
                expected: params.len(),
                got: args.len(),
                location: self.location(),
            });
        }

        for (&param, &arg) in params.iter().zip(args) {
            self.check_array_conversion(&program.decl(param).ty(), arg)?;
        }

        let values = args
            .iter()
            .map(|&arg| self.lookup_expr(arg))
            .collect::<Result<Vec<_>, _>>()?;

        // Frame 0 holds globals and does not count as a call
        if self.stack.depth() > self.config.max_call_depth {
            return Err(RuntimeError::RecursionLimit {
                depth: self.config.max_call_depth,
                location: self.location(),
            });
        }

        self.stack.push_frame(callee);
        debug!(function = %decl.name, depth = self.stack.depth(), "push frame");
        for (&param, value) in params.iter().zip(values) {
            self.declare(param, value);
        }
        self.set_cursor(Cursor::Stmt(body));

        Ok(CallKind::User { body })
    }

    /// Pop the callee frame and bind the call node in the caller's frame
    pub fn return_from_call(&mut self, expr: ExprId, value: i32) {
        if let Some(frame) = self.stack.pop_frame() {
            debug!(function = ?frame.function, value, "pop frame");
        }
        self.bind_expr(expr, value);
    }

    /// Frame for the entry function; it takes no arguments, parameters start at 0
    pub(crate) fn enter_entry(&mut self, entry: DeclId) -> Option<StmtId> {
        let program = self.program;
        let DeclKind::Function { params, body, .. } = &program.decl(entry).kind else {
            return None;
        };
        let body = (*body)?;

        self.stack.push_frame(entry);
        for &param in params {
            self.declare(param, 0);
        }
        self.set_cursor(Cursor::Stmt(body));
        Some(body)
    }

    pub(crate) fn leave_entry(&mut self) -> Option<StackFrame> {
        self.stack.pop_frame()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::ScriptedConsole;
    use crate::parser::parse;

    fn decl_named(program: &Program, name: &str) -> DeclId {
        let index = program
            .decls
            .iter()
            .position(|decl| decl.name == name)
            .unwrap();
        DeclId(index as u32)
    }

    #[test]
    fn test_roles_resolved_by_name() {
        let program = parse(
            "extern int GET(); extern void PRINT(int); extern int MALLOC(int);\n\
             extern void FREE(int *); int helper() { return 1; } int main() { return 0; }",
        )
        .unwrap();
        let env = Environment::new(&program, Config::default(), ScriptedConsole::default());

        assert_eq!(env.entry(), Some(decl_named(&program, "main")));
        assert_eq!(
            env.builtin_role(decl_named(&program, "PRINT")),
            Some(Builtin::Print)
        );
        assert_eq!(
            env.builtin_role(decl_named(&program, "FREE")),
            Some(Builtin::Free)
        );
        assert_eq!(env.builtin_role(decl_named(&program, "helper")), None);
    }

    #[test]
    fn test_binding_policy_prefers_top_then_global() {
        let program = parse("int g; int f(int p) { return p; } int main() { return 0; }").unwrap();
        let g = decl_named(&program, "g");
        let p = decl_named(&program, "p");
        let f = decl_named(&program, "f");

        let mut env = Environment::new(&program, Config::default(), ScriptedConsole::default());
        env.declare(g, 1);

        env.stack.push_frame(f);
        env.declare(p, 5);

        // Not in the top frame: written to the global frame
        env.bind_decl(g, 7);
        // Shadowed in the top frame: written locally
        env.bind_decl(p, 9);

        assert_eq!(env.lookup_decl(g).unwrap(), 7);
        assert_eq!(env.lookup_decl(p).unwrap(), 9);
        assert_eq!(env.stack.global().lookup_decl(p), None);

        env.stack.pop_frame();
        assert!(matches!(
            env.lookup_decl(p),
            Err(RuntimeError::UnboundDeclaration { .. })
        ));
        assert_eq!(env.lookup_decl(g).unwrap(), 7);
    }

    #[test]
    fn test_report_binds_zero_and_records() {
        let program = parse("int main() { return 1 && 2; }").unwrap();
        let and = program
            .exprs
            .iter()
            .position(|expr| matches!(expr.kind, ExprKind::Binary { op: BinOp::And, .. }))
            .map(|index| ExprId(index as u32))
            .unwrap();

        let mut env = Environment::new(&program, Config::default(), ScriptedConsole::default());
        env.report(and, Unsupported::BinaryOperator("&&")).unwrap();
        assert_eq!(env.lookup_expr(and).unwrap(), 0);
        assert_eq!(env.diagnostics().len(), 1);

        let strict = Config {
            strict: true,
            ..Config::default()
        };
        let mut env = Environment::new(&program, strict, ScriptedConsole::default());
        assert!(matches!(
            env.report(and, Unsupported::BinaryOperator("&&")),
            Err(RuntimeError::Unsupported { .. })
        ));
    }
}
