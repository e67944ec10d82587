//! Lowered program: everything the effect analysis reads.

use sidefx_core::Interner;

use super::context::TypeContext;
use super::expr::{ExprArena, ExprId};
use super::symbols::{FuncId, SymbolTable, VarId};

/// Statement skeleton of a function body. Only expression positions matter
/// to the analysis, so control flow is kept as plain nesting.
#[derive(Clone, Debug)]
pub enum Stmt {
    /// Expression statement, local declarations included.
    Expr(ExprId),
    Return(Option<ExprId>),
    If {
        cond: ExprId,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },
    While {
        cond: ExprId,
        body: Box<Stmt>,
    },
    For {
        init: Option<Box<Stmt>>,
        cond: Option<ExprId>,
        step: Option<ExprId>,
        body: Box<Stmt>,
    },
    Block(Vec<Stmt>),
}

#[derive(Clone, Debug)]
pub struct FunctionDef {
    pub func: FuncId,
    /// `None` for extern declarations.
    pub body: Option<Vec<Stmt>>,
}

impl FunctionDef {
    /// Expression statements and `for` steps of the body, in source order.
    pub fn discarded_exprs(&self) -> Vec<(ExprId, DiscardSite)> {
        enum Work<'a> {
            Stmt(&'a Stmt),
            Step(ExprId),
        }

        let mut out = Vec::new();
        let Some(body) = &self.body else {
            return out;
        };
        let mut stack: Vec<Work<'_>> = body.iter().rev().map(Work::Stmt).collect();
        while let Some(work) = stack.pop() {
            let stmt = match work {
                Work::Stmt(stmt) => stmt,
                Work::Step(step) => {
                    out.push((step, DiscardSite::ForStep));
                    continue;
                }
            };
            match stmt {
                Stmt::Expr(expr) => out.push((*expr, DiscardSite::Statement)),
                Stmt::Return(_) => {}
                Stmt::If {
                    then_branch,
                    else_branch,
                    ..
                } => {
                    if let Some(else_branch) = else_branch {
                        stack.push(Work::Stmt(else_branch));
                    }
                    stack.push(Work::Stmt(then_branch));
                }
                Stmt::While { body, .. } => stack.push(Work::Stmt(body)),
                Stmt::For {
                    init, step, body, ..
                } => {
                    if let Some(step) = step {
                        stack.push(Work::Step(*step));
                    }
                    stack.push(Work::Stmt(body));
                    if let Some(init) = init {
                        stack.push(Work::Stmt(init));
                    }
                }
                Stmt::Block(stmts) => stack.extend(stmts.iter().rev().map(Work::Stmt)),
            }
        }
        out
    }
}

#[derive(Clone, Debug)]
pub struct GlobalDef {
    pub var: VarId,
    pub init: Option<ExprId>,
}

/// Where a value is thrown away.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DiscardSite {
    Statement,
    ForStep,
}

#[derive(Clone, Debug, Default)]
pub struct Program {
    pub interner: Interner,
    pub types: TypeContext,
    pub symbols: SymbolTable,
    pub exprs: ExprArena,
    pub functions: Vec<FunctionDef>,
    pub globals: Vec<GlobalDef>,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expressions whose value is discarded, in source order.
    pub fn discarded_exprs(&self) -> Vec<(ExprId, DiscardSite)> {
        self.functions
            .iter()
            .flat_map(FunctionDef::discarded_exprs)
            .collect()
    }
}
