//! Hand-built programs for exercising the analysis without the front end.

use rowan::TextRange;

use crate::diagnostics::{DiagnosticContext, WarningMode};
use crate::ops::{BinaryOp, Fixity};
use crate::sema::{
    ExprId, ExprKind, FuncDecl, FuncId, FunctionDef, FunctionType, ModuleDecl, ParamType,
    Program, Stmt, TYPE_BOOL, TYPE_INT, TYPE_VOID, TypeId, TypeShape, VarDecl, VarId,
};

/// Allocates typed nodes directly into a [`Program`].
///
/// Ranges are empty; tests that care about positions go through the parser.
pub struct ProgramBuilder {
    pub program: Program,
}

impl ProgramBuilder {
    pub fn new() -> Self {
        Self {
            program: Program::new(),
        }
    }

    pub fn node(&mut self, kind: ExprKind, ty: Option<TypeId>) -> ExprId {
        self.program.exprs.alloc(kind, ty, TextRange::default())
    }

    pub fn declare(&mut self, name: &str, ty: TypeId) -> VarId {
        let name = self.program.interner.intern(name);
        self.program.symbols.add_var(VarDecl {
            name,
            ty,
            range: TextRange::default(),
            is_global: false,
        })
    }

    pub fn var(&mut self, var: VarId) -> ExprId {
        let ty = self.program.symbols.var(var).ty;
        self.node(ExprKind::Var(var), Some(ty))
    }

    /// Declare a fresh variable and reference it.
    pub fn local(&mut self, name: &str, ty: TypeId) -> ExprId {
        let var = self.declare(name, ty);
        self.var(var)
    }

    pub fn int(&mut self, value: i64) -> ExprId {
        self.node(ExprKind::IntLiteral(value), Some(TYPE_INT))
    }

    pub fn boolean(&mut self, value: bool) -> ExprId {
        self.node(ExprKind::BoolLiteral(value), Some(TYPE_BOOL))
    }

    pub fn binary(&mut self, op: BinaryOp, lhs: ExprId, rhs: ExprId) -> ExprId {
        self.node(ExprKind::Binary { op, lhs, rhs }, Some(TYPE_INT))
    }

    pub fn assign(&mut self, lhs: ExprId, rhs: ExprId) -> ExprId {
        let ty = self.program.exprs[lhs].ty;
        self.node(ExprKind::Assign { lhs, rhs }, ty)
    }

    pub fn increment(&mut self, operand: ExprId) -> ExprId {
        let ty = self.program.exprs[operand].ty;
        self.node(
            ExprKind::Increment {
                operand,
                fixity: Fixity::Postfix,
            },
            ty,
        )
    }

    pub fn comma(&mut self, lhs: ExprId, rhs: ExprId) -> ExprId {
        let ty = self.program.exprs[rhs].ty;
        self.node(ExprKind::Comma { lhs, rhs }, ty)
    }

    pub fn and_and(&mut self, lhs: ExprId, rhs: ExprId) -> ExprId {
        self.node(ExprKind::AndAnd { lhs, rhs }, Some(TYPE_BOOL))
    }

    pub fn cond(&mut self, cond: ExprId, then_branch: ExprId, else_branch: ExprId) -> ExprId {
        let ty = self.program.exprs[then_branch].ty;
        self.node(
            ExprKind::Cond {
                cond,
                then_branch,
                else_branch,
            },
            ty,
        )
    }

    pub fn cast(&mut self, to: TypeId, operand: ExprId) -> ExprId {
        self.node(ExprKind::Cast { to, operand }, Some(to))
    }

    pub fn class(&mut self, name: &str) -> TypeId {
        let name = self.program.interner.intern(name);
        self.program.types.intern(TypeShape::Class(name))
    }

    pub fn import(&mut self, name: &str) -> ExprId {
        let name = self.program.interner.intern(name);
        let module = self.program.symbols.add_module(ModuleDecl {
            name,
            range: TextRange::default(),
        });
        self.node(ExprKind::Import(module), None)
    }

    pub fn function(&mut self, name: &str, function: FunctionType) -> FuncId {
        let name = self.program.interner.intern(name);
        let ty = self.program.types.function(function);
        self.program.symbols.add_func(FuncDecl {
            name,
            ty,
            range: TextRange::default(),
        })
    }

    /// `int name(params)` with the given attributes.
    pub fn int_function(&mut self, name: &str, params: &[TypeId], pure: bool, nothrow: bool) -> FuncId {
        let params = params
            .iter()
            .map(|&ty| ParamType { ty, is_ref: false })
            .collect();
        self.function(name, FunctionType::new(params, TYPE_INT, pure, nothrow))
    }

    pub fn void_function(&mut self, name: &str, pure: bool, nothrow: bool) -> FuncId {
        self.function(name, FunctionType::new(Vec::new(), TYPE_VOID, pure, nothrow))
    }

    /// Direct call by name.
    pub fn call(&mut self, func: FuncId, args: Vec<ExprId>) -> ExprId {
        let fn_ty = self.program.symbols.func(func).ty;
        let ret = self.program.types.callee_function(fn_ty).map(|f| f.ret);
        let callee = self.node(ExprKind::Func(func), Some(fn_ty));
        self.node(
            ExprKind::Call {
                callee,
                args,
                func: Some(func),
            },
            ret,
        )
    }

    /// Call through an arbitrary callee expression.
    pub fn call_expr(&mut self, callee: ExprId, ret: Option<TypeId>) -> ExprId {
        self.node(
            ExprKind::Call {
                callee,
                args: Vec::new(),
                func: None,
            },
            ret,
        )
    }

    /// Wrap expression statements into one function body.
    pub fn body(&mut self, name: &str, stmts: Vec<Stmt>) -> FuncId {
        let func = self.void_function(name, false, false);
        self.program.functions.push(FunctionDef {
            func,
            body: Some(stmts),
        });
        func
    }

    pub fn text(&self, id: ExprId) -> String {
        self.program.expr_text(id)
    }
}

pub fn context() -> DiagnosticContext {
    DiagnosticContext::new(WarningMode::Informational)
}

/// Messages of every diagnostic, one per line.
pub fn messages(ctx: &DiagnosticContext) -> String {
    ctx.diagnostics()
        .iter()
        .map(|d| format!("{}: {}", d.severity(), d.message()))
        .collect::<Vec<_>>()
        .join("\n")
}
