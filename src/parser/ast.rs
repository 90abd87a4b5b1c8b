// AST (Abstract Syntax Tree) definitions for the C interpreter
//
// Nodes live in flat arenas owned by [`Program`] and are addressed by
// integer ids. The evaluator keys its per-frame value tables by these ids.

use std::fmt;

/// Index of an expression node in [`Program::exprs`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExprId(pub u32);

/// Index of a statement node in [`Program::stmts`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StmtId(pub u32);

/// Index of a declaration in [`Program::decls`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeclId(pub u32);

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Base types supported by the interpreter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseType {
    Int,
    Char,
    Void,
}

/// Static type of a declaration or expression.
///
/// Only one level of pointer typing is meaningful to the evaluator, but the
/// depth is tracked so that `*p` on an `int **` still reports a pointer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    Scalar {
        base: BaseType,
        pointer_depth: usize,
        array_len: Option<usize>,
    },
    Function {
        return_type: Box<Type>,
    },
}

impl Type {
    pub fn new(base: BaseType) -> Self {
        Type::Scalar {
            base,
            pointer_depth: 0,
            array_len: None,
        }
    }

    pub fn int() -> Self {
        Type::new(BaseType::Int)
    }

    pub fn with_pointer(self) -> Self {
        match self {
            Type::Scalar {
                base,
                pointer_depth,
                array_len,
            } => Type::Scalar {
                base,
                pointer_depth: pointer_depth + 1,
                array_len,
            },
            other => other,
        }
    }

    pub fn with_array(self, len: usize) -> Self {
        match self {
            Type::Scalar {
                base,
                pointer_depth,
                ..
            } => Type::Scalar {
                base,
                pointer_depth,
                array_len: Some(len),
            },
            other => other,
        }
    }

    pub fn function(return_type: Type) -> Self {
        Type::Function {
            return_type: Box::new(return_type),
        }
    }

    /// `int` or `char`, not a pointer and not an array
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            Type::Scalar {
                base: BaseType::Int | BaseType::Char,
                pointer_depth: 0,
                array_len: None,
            }
        )
    }

    pub fn is_pointer(&self) -> bool {
        match self {
            Type::Scalar {
                pointer_depth,
                array_len: None,
                ..
            } => *pointer_depth > 0,
            _ => false,
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Type::Scalar { array_len: Some(_), .. })
    }

    pub fn is_function(&self) -> bool {
        matches!(self, Type::Function { .. })
    }

    pub fn is_void(&self) -> bool {
        matches!(
            self,
            Type::Scalar {
                base: BaseType::Void,
                pointer_depth: 0,
                array_len: None,
            }
        )
    }

    /// Constant length of an array type
    pub fn array_len(&self) -> Option<usize> {
        match self {
            Type::Scalar { array_len, .. } => *array_len,
            Type::Function { .. } => None,
        }
    }

    /// Type produced by dereferencing or subscripting a value of this type
    pub fn element_type(&self) -> Type {
        match self {
            Type::Scalar {
                base,
                array_len: Some(_),
                pointer_depth,
            } => Type::Scalar {
                base: *base,
                pointer_depth: *pointer_depth,
                array_len: None,
            },
            Type::Scalar {
                base,
                pointer_depth,
                array_len: None,
            } => Type::Scalar {
                base: *base,
                pointer_depth: pointer_depth.saturating_sub(1),
                array_len: None,
            },
            Type::Function { .. } => Type::int(),
        }
    }

    /// Return type for functions, the type itself otherwise
    pub fn return_type(&self) -> Type {
        match self {
            Type::Function { return_type } => (**return_type).clone(),
            other => other.clone(),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Scalar {
                base,
                pointer_depth,
                array_len,
            } => {
                let name = match base {
                    BaseType::Int => "int",
                    BaseType::Char => "char",
                    BaseType::Void => "void",
                };
                write!(f, "{}{}", name, "*".repeat(*pointer_depth))?;
                match array_len {
                    Some(0) => write!(f, "[]")?,
                    Some(len) => write!(f, "[{}]", len)?,
                    None => {}
                }
                Ok(())
            }
            Type::Function { return_type } => write!(f, "{} (*)()", return_type),
        }
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    // Comparison
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    // Logical
    And,
    Or,
    // Bitwise
    BitAnd,
    BitOr,
    BitXor,
    BitShl,
    BitShr,
    // Assignment
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    ModAssign,
}

impl BinOp {
    pub fn is_assignment(self) -> bool {
        matches!(
            self,
            BinOp::Assign
                | BinOp::AddAssign
                | BinOp::SubAssign
                | BinOp::MulAssign
                | BinOp::DivAssign
                | BinOp::ModAssign
        )
    }

    pub fn is_additive(self) -> bool {
        matches!(self, BinOp::Add | BinOp::Sub)
    }

    pub fn is_multiplicative(self) -> bool {
        matches!(self, BinOp::Mul | BinOp::Div | BinOp::Mod)
    }

    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinOp::Eq | BinOp::Ne | BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge
        )
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
            BinOp::And => "&&",
            BinOp::Or => "||",
            BinOp::BitAnd => "&",
            BinOp::BitOr => "|",
            BinOp::BitXor => "^",
            BinOp::BitShl => "<<",
            BinOp::BitShr => ">>",
            BinOp::Assign => "=",
            BinOp::AddAssign => "+=",
            BinOp::SubAssign => "-=",
            BinOp::MulAssign => "*=",
            BinOp::DivAssign => "/=",
            BinOp::ModAssign => "%=",
        }
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Neg,     // -x
    Plus,    // +x
    Not,     // !x
    BitNot,  // ~x
    PreInc,  // ++x
    PreDec,  // --x
    PostInc, // x++
    PostDec, // x--
    Deref,   // *x
    AddrOf,  // &x
}

impl UnOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnOp::Neg => "-",
            UnOp::Plus => "+",
            UnOp::Not => "!",
            UnOp::BitNot => "~",
            UnOp::PreInc | UnOp::PostInc => "++",
            UnOp::PreDec | UnOp::PostDec => "--",
            UnOp::Deref => "*",
            UnOp::AddrOf => "&",
        }
    }
}

/// Expression node kinds
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    IntLiteral(i32),
    DeclRef(DeclId),
    Unary {
        op: UnOp,
        operand: ExprId,
    },
    Binary {
        op: BinOp,
        lhs: ExprId,
        rhs: ExprId,
    },
    Call {
        callee: DeclId,
        args: Vec<ExprId>,
    },
    Subscript {
        base: ExprId,
        index: ExprId,
    },
    Cast {
        expr: ExprId,
    },
    Paren(ExprId),
    SizeOf(Type),
}

/// An expression together with its static type
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub ty: Type,
    pub location: SourceLocation,
}

/// Statement node kinds
#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    Compound(Vec<StmtId>),
    Decl(Vec<DeclId>),
    Expr(ExprId),
    If {
        condition: ExprId,
        then_branch: StmtId,
        else_branch: Option<StmtId>,
    },
    While {
        condition: ExprId,
        body: StmtId,
    },
    For {
        init: Option<StmtId>,
        condition: Option<ExprId>,
        increment: Option<ExprId>,
        body: StmtId,
    },
    Return(Option<ExprId>),
    Empty,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub location: SourceLocation,
}

/// Storage class of a variable declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Storage {
    Global,
    Local,
    Param,
}

/// Declaration kinds
#[derive(Debug, Clone, PartialEq)]
pub enum DeclKind {
    Var {
        ty: Type,
        init: Option<ExprId>,
        storage: Storage,
    },
    Function {
        return_type: Type,
        params: Vec<DeclId>,
        body: Option<StmtId>,
    },
}

/// A named slot: variable, parameter, or function
#[derive(Debug, Clone, PartialEq)]
pub struct Decl {
    pub name: String,
    pub kind: DeclKind,
    pub location: SourceLocation,
}

impl Decl {
    /// Static type of a reference to this declaration
    pub fn ty(&self) -> Type {
        match &self.kind {
            DeclKind::Var { ty, .. } => ty.clone(),
            DeclKind::Function { return_type, .. } => Type::function(return_type.clone()),
        }
    }

    pub fn is_function(&self) -> bool {
        matches!(self.kind, DeclKind::Function { .. })
    }
}

/// Top-level item of a translation unit, in source order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopLevel {
    Function(DeclId),
    Variable(DeclId),
}

/// Top-level program structure: node arenas plus the translation unit order
#[derive(Debug, Clone, Default)]
pub struct Program {
    pub exprs: Vec<Expr>,
    pub stmts: Vec<Stmt>,
    pub decls: Vec<Decl>,
    pub items: Vec<TopLevel>,
}

impl Program {
    pub fn new() -> Self {
        Program::default()
    }

    pub fn push_expr(&mut self, kind: ExprKind, ty: Type, location: SourceLocation) -> ExprId {
        let id = ExprId(self.exprs.len() as u32);
        self.exprs.push(Expr { kind, ty, location });
        id
    }

    pub fn push_stmt(&mut self, kind: StmtKind, location: SourceLocation) -> StmtId {
        let id = StmtId(self.stmts.len() as u32);
        self.stmts.push(Stmt { kind, location });
        id
    }

    pub fn push_decl(&mut self, decl: Decl) -> DeclId {
        let id = DeclId(self.decls.len() as u32);
        self.decls.push(decl);
        id
    }

    pub fn expr(&self, id: ExprId) -> &Expr {
        &self.exprs[id.0 as usize]
    }

    pub fn stmt(&self, id: StmtId) -> &Stmt {
        &self.stmts[id.0 as usize]
    }

    pub fn decl(&self, id: DeclId) -> &Decl {
        &self.decls[id.0 as usize]
    }

    pub fn decl_mut(&mut self, id: DeclId) -> &mut Decl {
        &mut self.decls[id.0 as usize]
    }

    /// Innermost expression under any parentheses
    pub fn strip_parens(&self, mut id: ExprId) -> ExprId {
        while let ExprKind::Paren(inner) = &self.expr(id).kind {
            id = *inner;
        }
        id
    }

    /// Find a top-level function declaration by name
    #[cfg(test)]
    pub(crate) fn function_named(&self, name: &str) -> Option<DeclId> {
        self.items.iter().find_map(|item| match item {
            TopLevel::Function(id) if self.decl(*id).name == name => Some(*id),
            _ => None,
        })
    }
}
