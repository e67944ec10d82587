//! Owned syntax tree produced by the parser.
//!
//! Names are unresolved and types are written forms; lowering turns this into
//! the typed expression arena. Every node carries its source range.

use rowan::TextRange;

use crate::ops::{AssignOp, BinaryOp, Fixity, UnaryOp};

#[derive(Debug, Clone, Default)]
pub struct SourceFile {
    pub items: Vec<Item>,
}

#[derive(Debug, Clone)]
pub enum Item {
    Import(Ident),
    Alias { name: Ident, target: TypeExpr },
    Class(Ident),
    Function(FunctionDecl),
    Global(VarDecl),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub text: String,
    pub range: TextRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BasicTypeName {
    Void,
    Bool,
    Int,
    Long,
    Uint,
    Char,
    Double,
    String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FnAttrs {
    pub is_pure: bool,
    pub is_nothrow: bool,
}

impl FnAttrs {
    pub fn merge(self, other: FnAttrs) -> FnAttrs {
        FnAttrs {
            is_pure: self.is_pure || other.is_pure,
            is_nothrow: self.is_nothrow || other.is_nothrow,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TypeExpr {
    pub kind: TypeExprKind,
    pub range: TextRange,
}

#[derive(Debug, Clone)]
pub enum TypeExprKind {
    Basic(BasicTypeName),
    Named(Ident),
    Pointer(Box<TypeExpr>),
    Array(Box<TypeExpr>),
    AssocArray {
        value: Box<TypeExpr>,
        key: Box<TypeExpr>,
    },
    /// `R function(params) attrs` (a pointer to function) or `R delegate(params) attrs`.
    Callable {
        ret: Box<TypeExpr>,
        params: Vec<Param>,
        attrs: FnAttrs,
        is_delegate: bool,
    },
    /// Placeholder after a parse error.
    Error,
}

#[derive(Debug, Clone)]
pub struct Param {
    pub ty: TypeExpr,
    pub name: Option<Ident>,
    pub is_ref: bool,
}

#[derive(Debug, Clone)]
pub struct FunctionDecl {
    pub name: Ident,
    pub ret: TypeExpr,
    pub params: Vec<Param>,
    pub attrs: FnAttrs,
    pub body: Option<Block>,
    pub range: TextRange,
}

#[derive(Debug, Clone)]
pub struct VarDecl {
    pub ty: TypeExpr,
    pub name: Ident,
    pub init: Option<Expr>,
    pub range: TextRange,
}

#[derive(Debug, Clone)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub range: TextRange,
}

#[derive(Debug, Clone)]
pub enum Stmt {
    Expr(Expr),
    Local(VarDecl),
    Return {
        value: Option<Expr>,
        range: TextRange,
    },
    If {
        cond: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },
    While {
        cond: Expr,
        body: Box<Stmt>,
    },
    For {
        init: Option<Box<Stmt>>,
        cond: Option<Expr>,
        step: Option<Expr>,
        body: Box<Stmt>,
    },
    Block(Block),
    Empty(TextRange),
}

#[derive(Debug, Clone)]
pub struct Expr {
    pub kind: ExprKind,
    pub range: TextRange,
}

#[derive(Debug, Clone)]
pub enum ExprKind {
    Ident(String),
    Int(i64),
    Str(String),
    Bool(bool),
    Null,
    Paren(Box<Expr>),
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    /// `=` when `op` is `None`, otherwise a compound assignment.
    Assign {
        op: Option<AssignOp>,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    AndAnd(Box<Expr>, Box<Expr>),
    OrOr(Box<Expr>, Box<Expr>),
    Cond {
        cond: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Box<Expr>,
    },
    Comma(Box<Expr>, Box<Expr>),
    In {
        key: Box<Expr>,
        container: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Deref(Box<Expr>),
    AddressOf(Box<Expr>),
    Step {
        increment: bool,
        fixity: Fixity,
        operand: Box<Expr>,
    },
    Cast {
        ty: TypeExpr,
        operand: Box<Expr>,
    },
    New(Ident),
    NewAnonClass,
    Delete(Box<Expr>),
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    Index {
        base: Box<Expr>,
        index: Box<Expr>,
    },
    Remove {
        container: Box<Expr>,
        key: Box<Expr>,
    },
    Tuple(Vec<Expr>),
    Assert {
        cond: Box<Expr>,
        message: Option<Box<Expr>>,
    },
    AutoDecl {
        name: Ident,
        init: Box<Expr>,
    },
    TraitsCompiles(Box<Expr>),
    /// Placeholder after a parse error.
    Error,
}

impl Expr {
    pub fn is_error(&self) -> bool {
        matches!(self.kind, ExprKind::Error)
    }
}
