//! Typed expression arena.
//!
//! Expressions are allocated bottom-up and never mutated afterwards. Every
//! node has at most one parent, so a walk from any root reaches each node of
//! its subtree exactly once.

use std::ops::Index;

use rowan::TextRange;

use super::symbols::{FuncId, ModuleId, VarId};
use super::types::TypeId;
use crate::ops::{AssignOp, BinaryOp, Fixity, UnaryOp};

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct ExprId(u32);

impl ExprId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Debug)]
pub struct Expr {
    pub kind: ExprKind,
    /// Static type; `None` for module references.
    pub ty: Option<TypeId>,
    pub range: TextRange,
}

/// Closed set of expression kinds.
#[derive(Clone, Debug, PartialEq)]
pub enum ExprKind {
    /// `lhs = rhs`
    Assign { lhs: ExprId, rhs: ExprId },
    /// Initialization of a freshly declared variable.
    Construct { lhs: ExprId, rhs: ExprId },
    /// Raw bitwise copy-construction.
    Blit { lhs: ExprId, rhs: ExprId },
    CompoundAssign {
        op: AssignOp,
        lhs: ExprId,
        rhs: ExprId,
    },
    Increment { operand: ExprId, fixity: Fixity },
    Decrement { operand: ExprId, fixity: Fixity },
    /// Local declaration; `init` is a `Construct` when present.
    Declaration { var: VarId, init: Option<ExprId> },
    /// `key in container`
    In { key: ExprId, container: ExprId },
    /// `container.remove(key)`
    Remove { container: ExprId, key: ExprId },
    Assert {
        condition: ExprId,
        message: Option<ExprId>,
    },
    /// Unconditional trap, written `assert(0)`.
    Halt,
    Delete(ExprId),
    New { class: TypeId },
    NewAnonClass,
    Call {
        callee: ExprId,
        args: Vec<ExprId>,
        /// Declared function when the callee names one directly.
        func: Option<FuncId>,
    },
    Cast { to: TypeId, operand: ExprId },
    AndAnd { lhs: ExprId, rhs: ExprId },
    OrOr { lhs: ExprId, rhs: ExprId },
    Cond {
        cond: ExprId,
        then_branch: ExprId,
        else_branch: ExprId,
    },
    Comma { lhs: ExprId, rhs: ExprId },
    Var(VarId),
    Func(FuncId),
    Tuple(Vec<ExprId>),
    /// Placeholder for an expression that already failed to check.
    Error,
    Import(ModuleId),
    Binary {
        op: BinaryOp,
        lhs: ExprId,
        rhs: ExprId,
    },
    Unary { op: UnaryOp, operand: ExprId },
    Deref(ExprId),
    AddressOf(ExprId),
    Index { base: ExprId, index: ExprId },
    IntLiteral(i64),
    BoolLiteral(bool),
    StringLiteral(String),
    Null,
}

impl ExprKind {
    /// Operator or construct name used in diagnostics.
    pub fn op_name(&self) -> &'static str {
        match self {
            Self::Assign { .. } | Self::Construct { .. } | Self::Blit { .. } => "=",
            Self::CompoundAssign { op, .. } => op.token(),
            Self::Increment { .. } => "++",
            Self::Decrement { .. } => "--",
            Self::Declaration { .. } => "declaration",
            Self::In { .. } => "in",
            Self::Remove { .. } => "remove",
            Self::Assert { .. } => "assert",
            Self::Halt => "halt",
            Self::Delete(_) => "delete",
            Self::New { .. } | Self::NewAnonClass => "new",
            Self::Call { .. } => "call",
            Self::Cast { .. } => "cast",
            Self::AndAnd { .. } => "&&",
            Self::OrOr { .. } => "||",
            Self::Cond { .. } => "?",
            Self::Comma { .. } => ",",
            Self::Var(_) | Self::Func(_) => "var",
            Self::Tuple(_) => "tuple",
            Self::Error => "error",
            Self::Import(_) => "import",
            Self::Binary { op, .. } => op.token(),
            Self::Unary { op, .. } => op.token(),
            Self::Deref(_) => "*",
            Self::AddressOf(_) => "&",
            Self::Index { .. } => "index",
            Self::IntLiteral(_) | Self::BoolLiteral(_) | Self::StringLiteral(_) => "literal",
            Self::Null => "null",
        }
    }

    /// Short kind name for dumps.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Assign { .. } => "Assign",
            Self::Construct { .. } => "Construct",
            Self::Blit { .. } => "Blit",
            Self::CompoundAssign { .. } => "CompoundAssign",
            Self::Increment { .. } => "Increment",
            Self::Decrement { .. } => "Decrement",
            Self::Declaration { .. } => "Declaration",
            Self::In { .. } => "In",
            Self::Remove { .. } => "Remove",
            Self::Assert { .. } => "Assert",
            Self::Halt => "Halt",
            Self::Delete(_) => "Delete",
            Self::New { .. } => "New",
            Self::NewAnonClass => "NewAnonClass",
            Self::Call { .. } => "Call",
            Self::Cast { .. } => "Cast",
            Self::AndAnd { .. } => "AndAnd",
            Self::OrOr { .. } => "OrOr",
            Self::Cond { .. } => "Cond",
            Self::Comma { .. } => "Comma",
            Self::Var(_) => "Var",
            Self::Func(_) => "Func",
            Self::Tuple(_) => "Tuple",
            Self::Error => "Error",
            Self::Import(_) => "Import",
            Self::Binary { .. } => "Binary",
            Self::Unary { .. } => "Unary",
            Self::Deref(_) => "Deref",
            Self::AddressOf(_) => "AddressOf",
            Self::Index { .. } => "Index",
            Self::IntLiteral(_) => "IntLiteral",
            Self::BoolLiteral(_) => "BoolLiteral",
            Self::StringLiteral(_) => "StringLiteral",
            Self::Null => "Null",
        }
    }

    /// Direct sub-expressions in evaluation order.
    pub fn children(&self) -> Children<'_> {
        let (head, rest): ([Option<ExprId>; 3], &[ExprId]) = match self {
            Self::Assign { lhs, rhs }
            | Self::Construct { lhs, rhs }
            | Self::Blit { lhs, rhs }
            | Self::CompoundAssign { lhs, rhs, .. }
            | Self::AndAnd { lhs, rhs }
            | Self::OrOr { lhs, rhs }
            | Self::Comma { lhs, rhs }
            | Self::Binary { lhs, rhs, .. } => ([Some(*lhs), Some(*rhs), None], NO_CHILDREN),
            Self::In { key, container } => ([Some(*key), Some(*container), None], NO_CHILDREN),
            Self::Remove { container, key } => ([Some(*container), Some(*key), None], NO_CHILDREN),
            Self::Index { base, index } => ([Some(*base), Some(*index), None], NO_CHILDREN),
            Self::Increment { operand, .. }
            | Self::Decrement { operand, .. }
            | Self::Cast { operand, .. }
            | Self::Unary { operand, .. }
            | Self::Delete(operand)
            | Self::Deref(operand)
            | Self::AddressOf(operand) => ([Some(*operand), None, None], NO_CHILDREN),
            Self::Declaration { init, .. } => ([*init, None, None], NO_CHILDREN),
            Self::Assert { condition, message } => ([Some(*condition), *message, None], NO_CHILDREN),
            Self::Cond {
                cond,
                then_branch,
                else_branch,
            } => ([Some(*cond), Some(*then_branch), Some(*else_branch)], NO_CHILDREN),
            Self::Call { callee, args, .. } => ([Some(*callee), None, None], args.as_slice()),
            Self::Tuple(elements) => ([None, None, None], elements.as_slice()),
            Self::Halt
            | Self::New { .. }
            | Self::NewAnonClass
            | Self::Var(_)
            | Self::Func(_)
            | Self::Error
            | Self::Import(_)
            | Self::IntLiteral(_)
            | Self::BoolLiteral(_)
            | Self::StringLiteral(_)
            | Self::Null => ([None, None, None], NO_CHILDREN),
        };
        Children {
            head,
            pos: 0,
            rest: rest.iter(),
        }
    }
}

const NO_CHILDREN: &[ExprId] = &[];

/// Iterator over the direct children of an expression.
pub struct Children<'a> {
    head: [Option<ExprId>; 3],
    pos: usize,
    rest: std::slice::Iter<'a, ExprId>,
}

impl Iterator for Children<'_> {
    type Item = ExprId;

    fn next(&mut self) -> Option<ExprId> {
        while self.pos < self.head.len() {
            let child = self.head[self.pos];
            self.pos += 1;
            if child.is_some() {
                return child;
            }
        }
        self.rest.next().copied()
    }
}

/// Owner of all expressions of a program.
#[derive(Clone, Debug, Default)]
pub struct ExprArena {
    exprs: Vec<Expr>,
    parents: Vec<Option<ExprId>>,
}

impl ExprArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a node. Its children must already be allocated and parentless.
    pub fn alloc(&mut self, kind: ExprKind, ty: Option<TypeId>, range: TextRange) -> ExprId {
        let id = ExprId(self.exprs.len() as u32);
        for child in kind.children() {
            debug_assert!(child < id, "child allocated after parent");
            debug_assert!(
                self.parents[child.index()].is_none(),
                "expression {child:?} already has a parent"
            );
            self.parents[child.index()] = Some(id);
        }
        self.exprs.push(Expr { kind, ty, range });
        self.parents.push(None);
        id
    }

    pub fn get(&self, id: ExprId) -> Option<&Expr> {
        self.exprs.get(id.index())
    }

    pub fn parent(&self, id: ExprId) -> Option<ExprId> {
        self.parents.get(id.index()).copied().flatten()
    }

    pub fn len(&self) -> usize {
        self.exprs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exprs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ExprId, &Expr)> {
        self.exprs
            .iter()
            .enumerate()
            .map(|(i, e)| (ExprId(i as u32), e))
    }
}

impl Index<ExprId> for ExprArena {
    type Output = Expr;

    fn index(&self, id: ExprId) -> &Expr {
        &self.exprs[id.index()]
    }
}
