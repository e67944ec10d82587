//! Lowering: resolve names and types, build the expression arena.
//!
//! Runs in three passes over the items:
//! 1. imports and classes (names usable by everything after)
//! 2. aliases, in source order
//! 3. function signatures and globals, then bodies
//!
//! Problems in user code are reported to the [`DiagnosticContext`] and the
//! offending expression becomes `ExprKind::Error`. Any expression with an
//! `Error` operand is itself lowered to `Error`, so one mistake is reported once.

use rowan::TextRange;
use sidefx_core::Symbol;

use super::expr::{ExprId, ExprKind};
use super::program::{FunctionDef, GlobalDef, Program, Stmt};
use super::symbols::{Binding, FuncDecl, ModuleDecl, Scopes, VarDecl, VarId};
use super::types::{
    BasicType, FunctionType, ParamType, TYPE_BOOL, TYPE_CHAR, TYPE_ERROR, TYPE_INT, TYPE_LONG,
    TYPE_NULL, TYPE_STRING, TYPE_VOID, TypeId, TypeShape,
};
use crate::diagnostics::{DiagnosticContext, DiagnosticKind};
use crate::ops::{BinaryOp, Fixity, UnaryOp};
use crate::parser::ast::{self, BasicTypeName, Item, SourceFile, TypeExpr, TypeExprKind};

/// Lower a parsed file into a [`Program`].
pub fn lower(file: &SourceFile, source: &str, ctx: &mut DiagnosticContext) -> Program {
    let mut lowerer = Lowerer {
        source,
        program: Program::new(),
        scopes: Scopes::new(),
        ctx,
    };
    lowerer.lower_file(file);

    let program = lowerer.program;
    tracing::debug!(
        functions = program.functions.len(),
        exprs = program.exprs.len(),
        types = program.types.len(),
        "lowered module"
    );
    program
}

struct Lowerer<'a> {
    source: &'a str,
    program: Program,
    scopes: Scopes,
    ctx: &'a mut DiagnosticContext,
}

impl Lowerer<'_> {
    fn lower_file(&mut self, file: &SourceFile) {
        for item in &file.items {
            match item {
                Item::Import(name) => {
                    let sym = self.intern(&name.text);
                    let module = self.program.symbols.add_module(ModuleDecl {
                        name: sym,
                        range: name.range,
                    });
                    self.define(name, Binding::Module(module));
                }
                Item::Class(name) => {
                    let sym = self.intern(&name.text);
                    let ty = self.program.types.intern(TypeShape::Class(sym));
                    self.define(name, Binding::Type(ty));
                }
                Item::Alias { .. } | Item::Function(_) | Item::Global(_) => {}
            }
        }

        for item in &file.items {
            if let Item::Alias { name, target } = item {
                let target = self.resolve_type(target);
                let sym = self.intern(&name.text);
                let ty = self
                    .program
                    .types
                    .intern(TypeShape::Alias { name: sym, target });
                self.define(name, Binding::Type(ty));
            }
        }

        let mut bodies = Vec::new();
        for item in &file.items {
            match item {
                Item::Function(decl) => {
                    let function = self.resolve_signature(&decl.ret, &decl.params, decl.attrs);
                    let ty = self.program.types.function(function);
                    let sym = self.intern(&decl.name.text);
                    let func = self.program.symbols.add_func(FuncDecl {
                        name: sym,
                        ty,
                        range: decl.name.range,
                    });
                    self.define(&decl.name, Binding::Func(func));
                    bodies.push((func, decl));
                }
                Item::Global(decl) => {
                    let ty = self.resolve_type(&decl.ty);
                    let var = self.declare_var(&decl.name, ty, true);
                    let init = decl.init.as_ref().map(|init| self.lower_expr(init));
                    self.program.globals.push(GlobalDef { var, init });
                }
                Item::Import(_) | Item::Class(_) | Item::Alias { .. } => {}
            }
        }

        for (func, decl) in bodies {
            let body = decl.body.as_ref().map(|block| {
                self.scopes.push();
                for param in &decl.params {
                    if let Some(name) = &param.name {
                        let ty = self.resolve_type(&param.ty);
                        self.declare_var(name, ty, false);
                    }
                }
                let stmts = self.lower_stmts(&block.stmts);
                self.scopes.pop();
                stmts
            });
            self.program.functions.push(FunctionDef { func, body });
        }
    }

    fn intern(&mut self, name: &str) -> Symbol {
        self.program.interner.intern(name)
    }

    fn text(&self, range: TextRange) -> &str {
        &self.source[std::ops::Range::<usize>::from(range)]
    }

    fn define(&mut self, name: &ast::Ident, binding: Binding) {
        let sym = self.intern(&name.text);
        if self.scopes.is_defined_here(sym) {
            self.ctx
                .report(DiagnosticKind::DuplicateDefinition, name.range)
                .message(&name.text)
                .emit();
            return;
        }
        self.scopes.define(sym, binding);
    }

    fn declare_var(&mut self, name: &ast::Ident, ty: TypeId, is_global: bool) -> VarId {
        let sym = self.intern(&name.text);
        let var = self.program.symbols.add_var(VarDecl {
            name: sym,
            ty,
            range: name.range,
            is_global,
        });
        self.define(name, Binding::Var(var));
        var
    }

    fn resolve_type(&mut self, ty: &TypeExpr) -> TypeId {
        match &ty.kind {
            TypeExprKind::Basic(basic) => self.program.types.basic(basic_type(*basic)),
            TypeExprKind::Named(name) => {
                let binding = self
                    .program
                    .interner
                    .lookup(&name.text)
                    .and_then(|sym| self.scopes.lookup(sym));
                match binding {
                    Some(Binding::Type(ty)) => ty,
                    _ => {
                        self.ctx
                            .report(DiagnosticKind::UnknownType, name.range)
                            .message(&name.text)
                            .emit();
                        TYPE_ERROR
                    }
                }
            }
            TypeExprKind::Pointer(target) => {
                let target = self.resolve_type(target);
                self.wrap_type(target, TypeShape::Pointer)
            }
            TypeExprKind::Array(element) => {
                let element = self.resolve_type(element);
                self.wrap_type(element, TypeShape::Array)
            }
            TypeExprKind::AssocArray { value, key } => {
                let value = self.resolve_type(value);
                let key = self.resolve_type(key);
                if value == TYPE_ERROR || key == TYPE_ERROR {
                    return TYPE_ERROR;
                }
                self.program.types.assoc_array(key, value)
            }
            TypeExprKind::Callable {
                ret,
                params,
                attrs,
                is_delegate,
            } => {
                let function = self.resolve_signature(ret, params, *attrs);
                if *is_delegate {
                    self.program.types.delegate(function)
                } else {
                    let target = self.program.types.function(function);
                    self.program.types.pointer_to(target)
                }
            }
            TypeExprKind::Error => TYPE_ERROR,
        }
    }

    fn wrap_type(&mut self, inner: TypeId, wrap: fn(TypeId) -> TypeShape) -> TypeId {
        if inner == TYPE_ERROR {
            return TYPE_ERROR;
        }
        self.program.types.intern(wrap(inner))
    }

    fn resolve_signature(
        &mut self,
        ret: &TypeExpr,
        params: &[ast::Param],
        attrs: ast::FnAttrs,
    ) -> FunctionType {
        let ret = self.resolve_type(ret);
        let params = params
            .iter()
            .map(|p| ParamType {
                ty: self.resolve_type(&p.ty),
                is_ref: p.is_ref,
            })
            .collect();
        FunctionType::new(params, ret, attrs.is_pure, attrs.is_nothrow)
    }

    fn lower_stmts(&mut self, stmts: &[ast::Stmt]) -> Vec<Stmt> {
        stmts.iter().filter_map(|s| self.lower_stmt(s)).collect()
    }

    fn lower_stmt(&mut self, stmt: &ast::Stmt) -> Option<Stmt> {
        let lowered = match stmt {
            ast::Stmt::Expr(expr) => Stmt::Expr(self.lower_expr(expr)),
            ast::Stmt::Local(decl) => Stmt::Expr(self.lower_local(decl)),
            ast::Stmt::Return { value, .. } => {
                Stmt::Return(value.as_ref().map(|v| self.lower_expr(v)))
            }
            ast::Stmt::If {
                cond,
                then_branch,
                else_branch,
            } => {
                let cond = self.lower_expr(cond);
                let then_branch = Box::new(self.lower_scoped(then_branch));
                let else_branch = else_branch
                    .as_ref()
                    .map(|s| Box::new(self.lower_scoped(s)));
                Stmt::If {
                    cond,
                    then_branch,
                    else_branch,
                }
            }
            ast::Stmt::While { cond, body } => {
                let cond = self.lower_expr(cond);
                let body = Box::new(self.lower_scoped(body));
                Stmt::While { cond, body }
            }
            ast::Stmt::For {
                init,
                cond,
                step,
                body,
            } => {
                self.scopes.push();
                let init = init
                    .as_ref()
                    .and_then(|s| self.lower_stmt(s))
                    .map(Box::new);
                let cond = cond.as_ref().map(|c| self.lower_expr(c));
                let step = step.as_ref().map(|s| self.lower_expr(s));
                let body = Box::new(self.lower_scoped(body));
                self.scopes.pop();
                Stmt::For {
                    init,
                    cond,
                    step,
                    body,
                }
            }
            ast::Stmt::Block(block) => {
                self.scopes.push();
                let stmts = self.lower_stmts(&block.stmts);
                self.scopes.pop();
                Stmt::Block(stmts)
            }
            ast::Stmt::Empty(_) => return None,
        };
        Some(lowered)
    }

    /// Branch and loop bodies get their own scope even without braces.
    fn lower_scoped(&mut self, stmt: &ast::Stmt) -> Stmt {
        self.scopes.push();
        let lowered = self.lower_stmt(stmt).unwrap_or(Stmt::Block(Vec::new()));
        self.scopes.pop();
        lowered
    }

    /// `T x = init;` becomes `Declaration(x, Construct(x, init))`.
    fn lower_local(&mut self, decl: &ast::VarDecl) -> ExprId {
        let ty = self.resolve_type(&decl.ty);
        let init = decl.init.as_ref().map(|init| self.lower_expr(init));
        let var = self.declare_var(&decl.name, ty, false);
        self.build_declaration(var, &decl.name, init, decl.range)
    }

    fn build_declaration(
        &mut self,
        var: VarId,
        name: &ast::Ident,
        init: Option<ExprId>,
        range: TextRange,
    ) -> ExprId {
        let ty = self.program.symbols.var(var).ty;
        let construct = match init {
            Some(init) if self.is_error(init) => return self.error(range),
            Some(init) => {
                let target = self.alloc(ExprKind::Var(var), Some(ty), name.range);
                let construct_range = name.range.cover(self.program.exprs[init].range);
                Some(self.alloc(
                    ExprKind::Construct {
                        lhs: target,
                        rhs: init,
                    },
                    Some(ty),
                    construct_range,
                ))
            }
            None => None,
        };
        self.alloc(
            ExprKind::Declaration {
                var,
                init: construct,
            },
            Some(ty),
            range,
        )
    }

    fn alloc(&mut self, kind: ExprKind, ty: Option<TypeId>, range: TextRange) -> ExprId {
        self.program.exprs.alloc(kind, ty, range)
    }

    fn error(&mut self, range: TextRange) -> ExprId {
        self.alloc(ExprKind::Error, Some(TYPE_ERROR), range)
    }

    fn is_error(&self, id: ExprId) -> bool {
        matches!(self.program.exprs[id].kind, ExprKind::Error)
    }

    fn ty(&self, id: ExprId) -> Option<TypeId> {
        self.program.exprs[id].ty
    }

    /// Nested first operands (operator chains, postfix chains, prefix operators)
    /// are followed along an explicit spine; only the other operands recurse.
    fn lower_expr(&mut self, expr: &ast::Expr) -> ExprId {
        let mut spine = Vec::new();
        let mut leaf = expr;
        while let Some(operand) = first_operand(leaf) {
            spine.push(leaf);
            leaf = operand;
        }
        let mut lowered = self.lower_node(leaf, None);
        while let Some(node) = spine.pop() {
            lowered = self.lower_node(node, Some(lowered));
        }
        lowered
    }

    /// The first operand of `expr` is taken from `first` when the spine
    /// already lowered it.
    fn operand(&mut self, first: Option<ExprId>, expr: &ast::Expr) -> ExprId {
        match first {
            Some(id) => id,
            None => self.lower_expr(expr),
        }
    }

    fn lower_node(&mut self, expr: &ast::Expr, first: Option<ExprId>) -> ExprId {
        let range = expr.range;
        match &expr.kind {
            ast::ExprKind::Ident(name) => self.lower_ident(name, range),
            ast::ExprKind::Int(value) => {
                let ty = if i32::try_from(*value).is_ok() {
                    TYPE_INT
                } else {
                    TYPE_LONG
                };
                self.alloc(ExprKind::IntLiteral(*value), Some(ty), range)
            }
            ast::ExprKind::Str(text) => {
                self.alloc(ExprKind::StringLiteral(text.clone()), Some(TYPE_STRING), range)
            }
            ast::ExprKind::Bool(value) => {
                self.alloc(ExprKind::BoolLiteral(*value), Some(TYPE_BOOL), range)
            }
            ast::ExprKind::Null => self.alloc(ExprKind::Null, Some(TYPE_NULL), range),
            ast::ExprKind::Paren(inner) => self.operand(first, inner),
            ast::ExprKind::Binary { op, lhs, rhs } => {
                let (lhs, rhs) = (self.operand(first, lhs), self.lower_expr(rhs));
                if self.is_error(lhs) || self.is_error(rhs) {
                    return self.error(range);
                }
                let ty = self.binary_type(*op, lhs, rhs);
                self.alloc(ExprKind::Binary { op: *op, lhs, rhs }, Some(ty), range)
            }
            ast::ExprKind::Assign { op, lhs, rhs } => {
                let (lhs, rhs) = (self.operand(first, lhs), self.lower_expr(rhs));
                if self.is_error(lhs) || self.is_error(rhs) {
                    return self.error(range);
                }
                let ty = self.ty(lhs);
                let kind = match op {
                    None => ExprKind::Assign { lhs, rhs },
                    Some(op) => ExprKind::CompoundAssign { op: *op, lhs, rhs },
                };
                self.alloc(kind, ty, range)
            }
            ast::ExprKind::AndAnd(lhs, rhs) => {
                let (lhs, rhs) = (self.operand(first, lhs), self.lower_expr(rhs));
                if self.is_error(lhs) || self.is_error(rhs) {
                    return self.error(range);
                }
                self.alloc(ExprKind::AndAnd { lhs, rhs }, Some(TYPE_BOOL), range)
            }
            ast::ExprKind::OrOr(lhs, rhs) => {
                let (lhs, rhs) = (self.operand(first, lhs), self.lower_expr(rhs));
                if self.is_error(lhs) || self.is_error(rhs) {
                    return self.error(range);
                }
                self.alloc(ExprKind::OrOr { lhs, rhs }, Some(TYPE_BOOL), range)
            }
            ast::ExprKind::Cond {
                cond,
                then_branch,
                else_branch,
            } => {
                let cond = self.operand(first, cond);
                let then_branch = self.lower_expr(then_branch);
                let else_branch = self.lower_expr(else_branch);
                if [cond, then_branch, else_branch]
                    .iter()
                    .any(|e| self.is_error(*e))
                {
                    return self.error(range);
                }
                let ty = match self.ty(then_branch) {
                    Some(TYPE_NULL) | None => self.ty(else_branch),
                    ty => ty,
                };
                self.alloc(
                    ExprKind::Cond {
                        cond,
                        then_branch,
                        else_branch,
                    },
                    ty,
                    range,
                )
            }
            ast::ExprKind::Comma(lhs, rhs) => {
                let (lhs, rhs) = (self.operand(first, lhs), self.lower_expr(rhs));
                if self.is_error(lhs) || self.is_error(rhs) {
                    return self.error(range);
                }
                let ty = self.ty(rhs);
                self.alloc(ExprKind::Comma { lhs, rhs }, ty, range)
            }
            ast::ExprKind::In { key, container } => {
                let (key, container) = (self.operand(first, key), self.lower_expr(container));
                if self.is_error(key) || self.is_error(container) {
                    return self.error(range);
                }
                let Some(value) = self.assoc_value(container) else {
                    return self.report_error(DiagnosticKind::NotAssociative, container);
                };
                let ty = self.program.types.pointer_to(value);
                self.alloc(ExprKind::In { key, container }, Some(ty), range)
            }
            ast::ExprKind::Unary { op, operand } => {
                let operand = self.operand(first, operand);
                if self.is_error(operand) {
                    return self.error(range);
                }
                let ty = match op {
                    UnaryOp::Not => Some(TYPE_BOOL),
                    UnaryOp::Neg | UnaryOp::Plus | UnaryOp::Complement => self.ty(operand),
                };
                self.alloc(ExprKind::Unary { op: *op, operand }, ty, range)
            }
            ast::ExprKind::Deref(operand) => {
                let operand = self.operand(first, operand);
                if self.is_error(operand) {
                    return self.error(range);
                }
                let target = self.ty(operand).and_then(|ty| {
                    match self.program.types.resolved_shape(ty) {
                        TypeShape::Pointer(target) => Some(*target),
                        _ => None,
                    }
                });
                let Some(target) = target else {
                    return self.report_error(DiagnosticKind::CannotDereference, operand);
                };
                self.alloc(ExprKind::Deref(operand), Some(target), range)
            }
            ast::ExprKind::AddressOf(operand) => {
                let operand = self.operand(first, operand);
                if self.is_error(operand) {
                    return self.error(range);
                }
                let Some(target) = self.ty(operand) else {
                    return self.report_error(DiagnosticKind::NotAValue, operand);
                };
                let ty = self.program.types.pointer_to(target);
                self.alloc(ExprKind::AddressOf(operand), Some(ty), range)
            }
            ast::ExprKind::Step {
                increment,
                fixity,
                operand,
            } => {
                let operand = self.operand(first, operand);
                if self.is_error(operand) {
                    return self.error(range);
                }
                let ty = self.ty(operand);
                let kind = step_kind(*increment, operand, *fixity);
                self.alloc(kind, ty, range)
            }
            ast::ExprKind::Cast { ty, operand } => {
                let to = self.resolve_type(ty);
                let operand = self.lower_expr(operand);
                if to == TYPE_ERROR || self.is_error(operand) {
                    return self.error(range);
                }
                self.alloc(ExprKind::Cast { to, operand }, Some(to), range)
            }
            ast::ExprKind::New(name) => {
                let class = self
                    .program
                    .interner
                    .lookup(&name.text)
                    .and_then(|sym| self.scopes.lookup(sym))
                    .and_then(|binding| match binding {
                        Binding::Type(ty) if self.program.types.is_class(ty) => Some(ty),
                        _ => None,
                    });
                let Some(class) = class else {
                    self.ctx
                        .report(DiagnosticKind::NotAClass, name.range)
                        .message(&name.text)
                        .emit();
                    return self.error(range);
                };
                self.alloc(ExprKind::New { class }, Some(class), range)
            }
            ast::ExprKind::NewAnonClass => {
                let sym = self.intern("__anonclass");
                let ty = self.program.types.intern(TypeShape::Class(sym));
                self.alloc(ExprKind::NewAnonClass, Some(ty), range)
            }
            ast::ExprKind::Delete(operand) => {
                let operand = self.operand(first, operand);
                if self.is_error(operand) {
                    return self.error(range);
                }
                self.alloc(ExprKind::Delete(operand), Some(TYPE_VOID), range)
            }
            ast::ExprKind::Call { callee, args } => {
                let callee = self.operand(first, callee);
                self.lower_call(callee, args, range)
            }
            ast::ExprKind::Index { base, index } => {
                let (base, index) = (self.operand(first, base), self.lower_expr(index));
                if self.is_error(base) || self.is_error(index) {
                    return self.error(range);
                }
                let element = self
                    .ty(base)
                    .and_then(|ty| match self.program.types.resolved_shape(ty) {
                        TypeShape::Array(element) | TypeShape::Pointer(element) => Some(*element),
                        TypeShape::AssocArray { value, .. } => Some(*value),
                        TypeShape::Basic(BasicType::String) => Some(TYPE_CHAR),
                        _ => None,
                    });
                let Some(element) = element else {
                    return self.report_error(DiagnosticKind::NotIndexable, base);
                };
                self.alloc(ExprKind::Index { base, index }, Some(element), range)
            }
            ast::ExprKind::Remove { container, key } => {
                let (container, key) = (self.operand(first, container), self.lower_expr(key));
                if self.is_error(container) || self.is_error(key) {
                    return self.error(range);
                }
                if self.assoc_value(container).is_none() {
                    return self.report_error(DiagnosticKind::NotAssociative, container);
                }
                self.alloc(ExprKind::Remove { container, key }, Some(TYPE_BOOL), range)
            }
            ast::ExprKind::Tuple(elements) => {
                let elements: Vec<ExprId> = elements.iter().map(|e| self.lower_expr(e)).collect();
                if elements.iter().any(|e| self.is_error(*e)) {
                    return self.error(range);
                }
                let types = elements
                    .iter()
                    .map(|e| self.ty(*e).unwrap_or(TYPE_ERROR))
                    .collect();
                let ty = self.program.types.intern(TypeShape::Tuple(types));
                self.alloc(ExprKind::Tuple(elements), Some(ty), range)
            }
            ast::ExprKind::Assert { cond, message } => {
                let is_halt = is_false_literal(cond);
                let condition = self.lower_expr(cond);
                let message = message.as_ref().map(|m| self.lower_expr(m));
                if self.is_error(condition) || message.is_some_and(|m| self.is_error(m)) {
                    return self.error(range);
                }
                if is_halt {
                    return self.alloc(ExprKind::Halt, Some(TYPE_VOID), range);
                }
                self.alloc(ExprKind::Assert { condition, message }, Some(TYPE_VOID), range)
            }
            ast::ExprKind::AutoDecl { name, init } => {
                let init = self.lower_expr(init);
                let ty = self.ty(init).unwrap_or(TYPE_ERROR);
                let var = self.declare_var(name, ty, false);
                self.build_declaration(var, name, Some(init), range)
            }
            ast::ExprKind::TraitsCompiles(operand) => {
                let snapshot = self.ctx.start_gagging();
                self.scopes.push();
                let lowered = self.lower_expr(operand);
                self.scopes.pop();
                let failed = self.ctx.end_gagging(snapshot);
                let compiles = !failed && !self.is_error(lowered);
                tracing::trace!(compiles, "__traits(compiles)");
                self.alloc(ExprKind::BoolLiteral(compiles), Some(TYPE_BOOL), range)
            }
            ast::ExprKind::Error => self.error(range),
        }
    }

    fn lower_ident(&mut self, name: &str, range: TextRange) -> ExprId {
        let binding = self
            .program
            .interner
            .lookup(name)
            .and_then(|sym| self.scopes.lookup(sym));
        match binding {
            Some(Binding::Var(var)) => {
                let ty = self.program.symbols.var(var).ty;
                self.alloc(ExprKind::Var(var), Some(ty), range)
            }
            Some(Binding::Func(func)) => {
                let ty = self.program.symbols.func(func).ty;
                self.alloc(ExprKind::Func(func), Some(ty), range)
            }
            Some(Binding::Module(module)) => self.alloc(ExprKind::Import(module), None, range),
            Some(Binding::Type(_)) => {
                self.ctx
                    .report(DiagnosticKind::NotAValue, range)
                    .message(name)
                    .emit();
                self.error(range)
            }
            None => {
                self.ctx
                    .report(DiagnosticKind::UndefinedIdentifier, range)
                    .message(name)
                    .emit();
                self.error(range)
            }
        }
    }

    fn lower_call(&mut self, callee: ExprId, args: &[ast::Expr], range: TextRange) -> ExprId {
        let args: Vec<ExprId> = args.iter().map(|a| self.lower_expr(a)).collect();
        if self.is_error(callee) || args.iter().any(|a| self.is_error(*a)) {
            return self.error(range);
        }

        let signature = self
            .ty(callee)
            .and_then(|ty| self.program.types.call_signature(ty))
            .map(|f| (f.ret, f.params.len()));
        let Some((ret, arity)) = signature else {
            return self.report_error(DiagnosticKind::NotCallable, callee);
        };

        if arity != args.len() {
            let callee_text = self.text(self.program.exprs[callee].range).to_string();
            let plural = if arity == 1 { "" } else { "s" };
            self.ctx
                .report(DiagnosticKind::WrongArgumentCount, range)
                .message(format!(
                    "`{callee_text}` takes {arity} argument{plural} but {} were given",
                    args.len()
                ))
                .emit();
            return self.error(range);
        }

        let func = match self.program.exprs[callee].kind {
            ExprKind::Func(func) => Some(func),
            _ => None,
        };
        self.alloc(ExprKind::Call { callee, args, func }, Some(ret), range)
    }

    /// Value type of an associative-array expression.
    fn assoc_value(&self, container: ExprId) -> Option<TypeId> {
        let ty = self.ty(container)?;
        match self.program.types.resolved_shape(ty) {
            TypeShape::AssocArray { value, .. } => Some(*value),
            _ => None,
        }
    }

    /// Report `kind` naming the source text of `subject`, returning an error placeholder
    /// spanning it.
    fn report_error(&mut self, kind: DiagnosticKind, subject: ExprId) -> ExprId {
        let range = self.program.exprs[subject].range;
        let text = self.text(range).to_string();
        self.ctx.report(kind, range).message(text).emit();
        self.error(range)
    }

    fn binary_type(&self, op: BinaryOp, lhs: ExprId, rhs: ExprId) -> TypeId {
        if op.is_comparison() {
            return TYPE_BOOL;
        }
        let lhs_ty = self.ty(lhs).unwrap_or(TYPE_ERROR);
        let rhs_ty = self.ty(rhs).unwrap_or(TYPE_ERROR);
        if op == BinaryOp::Cat {
            return lhs_ty;
        }

        let types = &self.program.types;
        let numeric = |ty: TypeId| match types.resolved_shape(ty) {
            TypeShape::Basic(basic) if basic.is_numeric() => Some(*basic),
            _ => None,
        };
        match (numeric(lhs_ty), numeric(rhs_ty)) {
            (Some(a), Some(b)) => types.basic(wider(a, b)),
            _ => lhs_ty,
        }
    }
}

fn basic_type(name: BasicTypeName) -> BasicType {
    match name {
        BasicTypeName::Void => BasicType::Void,
        BasicTypeName::Bool => BasicType::Bool,
        BasicTypeName::Int => BasicType::Int,
        BasicTypeName::Long => BasicType::Long,
        BasicTypeName::Uint => BasicType::Uint,
        BasicTypeName::Char => BasicType::Char,
        BasicTypeName::Double => BasicType::Double,
        BasicTypeName::String => BasicType::String,
    }
}

/// Usual arithmetic conversion, simplified to a fixed ranking.
fn wider(a: BasicType, b: BasicType) -> BasicType {
    let rank = |t: BasicType| match t {
        BasicType::Double => 4,
        BasicType::Long => 3,
        BasicType::Uint => 2,
        _ => 1,
    };
    if rank(b) > rank(a) {
        return b;
    }
    if rank(a) == 1 {
        return BasicType::Int;
    }
    a
}

/// Operand lowered before anything else in `expr`, when it may itself nest.
fn first_operand(expr: &ast::Expr) -> Option<&ast::Expr> {
    use ast::ExprKind as E;

    match &expr.kind {
        E::Paren(operand)
        | E::Binary { lhs: operand, .. }
        | E::Assign { lhs: operand, .. }
        | E::AndAnd(operand, _)
        | E::OrOr(operand, _)
        | E::Comma(operand, _)
        | E::Cond { cond: operand, .. }
        | E::In { key: operand, .. }
        | E::Unary { operand, .. }
        | E::Deref(operand)
        | E::AddressOf(operand)
        | E::Step { operand, .. }
        | E::Delete(operand)
        | E::Call { callee: operand, .. }
        | E::Index { base: operand, .. }
        | E::Remove { container: operand, .. } => Some(&**operand),
        _ => None,
    }
}

fn step_kind(increment: bool, operand: ExprId, fixity: Fixity) -> ExprKind {
    if increment {
        ExprKind::Increment { operand, fixity }
    } else {
        ExprKind::Decrement { operand, fixity }
    }
}

/// `0` or `false`, possibly parenthesized.
fn is_false_literal(expr: &ast::Expr) -> bool {
    let mut expr = expr;
    while let ast::ExprKind::Paren(inner) = &expr.kind {
        expr = inner;
    }
    matches!(expr.kind, ast::ExprKind::Int(0) | ast::ExprKind::Bool(false))
}
