//! Semantic model: types, symbols, the typed expression arena and the
//! lowering pass that builds them from the syntax tree.

mod context;
mod display;
mod expr;
mod lower;
mod program;
mod symbols;
mod types;

#[cfg(test)]
mod display_tests;
#[cfg(test)]
mod types_tests;

pub use context::TypeContext;
pub use expr::{Children, Expr, ExprArena, ExprId, ExprKind};
pub use lower::lower;
pub use program::{DiscardSite, FunctionDef, GlobalDef, Program, Stmt};
pub use symbols::{
    Binding, FuncDecl, FuncId, ModuleDecl, ModuleId, Scopes, SymbolTable, VarDecl, VarId,
};
pub use types::{
    BasicType, FunctionType, ParamType, PurityLevel, TYPE_BOOL, TYPE_CHAR, TYPE_DOUBLE,
    TYPE_ERROR, TYPE_INT, TYPE_LONG, TYPE_NULL, TYPE_STRING, TYPE_UINT, TYPE_VOID, TypeId,
    TypeShape,
};
