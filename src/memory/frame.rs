//! Call stack implementation
//!
//! - [`StackFrame`]: one call's binding tables plus its cursor
//! - [`CallStack`]: the ordered frames; frame 0 is the global scope and is
//!   never popped
//!
//! A frame maps declarations to their current values and expression nodes to
//! the value they last evaluated to. Parents read the values of their children
//! from the expression table, so a lookup of a node that was never evaluated is
//! an interpreter defect and reported as [`MemoryError::UnboundExpression`].

use super::MemoryError;
use crate::parser::ast::{DeclId, ExprId, StmtId};
use rustc_hash::FxHashMap;

/// The node a frame is currently executing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cursor {
    Stmt(StmtId),
    Expr(ExprId),
}

/// Stack frame for a function call
#[derive(Debug, Clone, Default)]
pub struct StackFrame {
    /// Function executing in this frame, `None` for the global frame
    pub function: Option<DeclId>,
    decls: FxHashMap<DeclId, i32>,
    exprs: FxHashMap<ExprId, i32>,
    cursor: Option<Cursor>,
}

impl StackFrame {
    pub fn new(function: Option<DeclId>) -> Self {
        StackFrame {
            function,
            ..Self::default()
        }
    }

    pub fn bind_decl(&mut self, decl: DeclId, value: i32) {
        self.decls.insert(decl, value);
    }

    pub fn lookup_decl(&self, decl: DeclId) -> Option<i32> {
        self.decls.get(&decl).copied()
    }

    pub fn has_decl(&self, decl: DeclId) -> bool {
        self.decls.contains_key(&decl)
    }

    pub fn bind_expr(&mut self, expr: ExprId, value: i32) {
        self.exprs.insert(expr, value);
    }

    pub fn lookup_expr(&self, expr: ExprId) -> Result<i32, MemoryError> {
        self.exprs
            .get(&expr)
            .copied()
            .ok_or(MemoryError::UnboundExpression(expr))
    }

    pub fn set_cursor(&mut self, cursor: Cursor) {
        self.cursor = Some(cursor);
    }

    pub fn cursor(&self) -> Option<Cursor> {
        self.cursor
    }
}

/// The call stack
#[derive(Debug, Clone)]
pub struct CallStack {
    frames: Vec<StackFrame>,
}

impl CallStack {
    /// Create a stack holding only the global frame
    pub fn new() -> Self {
        CallStack {
            frames: vec![StackFrame::new(None)],
        }
    }

    pub fn push_frame(&mut self, function: DeclId) {
        self.frames.push(StackFrame::new(Some(function)));
    }

    /// Pop the top frame. The global frame stays.
    pub fn pop_frame(&mut self) -> Option<StackFrame> {
        if self.frames.len() > 1 {
            self.frames.pop()
        } else {
            None
        }
    }

    /// Current (top) frame
    pub fn top(&self) -> &StackFrame {
        let last = self.frames.len() - 1;
        &self.frames[last]
    }

    pub fn top_mut(&mut self) -> &mut StackFrame {
        let last = self.frames.len() - 1;
        &mut self.frames[last]
    }

    /// Frame 0
    pub fn global(&self) -> &StackFrame {
        &self.frames[0]
    }

    pub fn global_mut(&mut self) -> &mut StackFrame {
        &mut self.frames[0]
    }

    /// Number of frames, including the global one
    pub fn depth(&self) -> usize {
        self.frames.len()
    }
}

impl Default for CallStack {
    fn default() -> Self {
        Self::new()
    }
}
