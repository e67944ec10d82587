//! Declared entities and lexical scopes.

use indexmap::IndexMap;
use rowan::TextRange;
use sidefx_core::Symbol;

use super::types::TypeId;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
        pub struct $name(u32);

        impl $name {
            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }
    };
}

entity_id!(
    /// A global, local or temporary variable.
    VarId
);
entity_id!(
    /// A declared function.
    FuncId
);
entity_id!(
    /// An imported module.
    ModuleId
);

#[derive(Clone, Debug)]
pub struct VarDecl {
    pub name: Symbol,
    pub ty: TypeId,
    pub range: TextRange,
    pub is_global: bool,
}

#[derive(Clone, Debug)]
pub struct FuncDecl {
    pub name: Symbol,
    /// Always a `TypeShape::Function`.
    pub ty: TypeId,
    pub range: TextRange,
}

#[derive(Clone, Debug)]
pub struct ModuleDecl {
    pub name: Symbol,
    pub range: TextRange,
}

/// What a name refers to in a scope.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Binding {
    Var(VarId),
    Func(FuncId),
    Module(ModuleId),
    Type(TypeId),
}

/// Owner of every declared entity.
#[derive(Clone, Debug, Default)]
pub struct SymbolTable {
    vars: Vec<VarDecl>,
    funcs: Vec<FuncDecl>,
    modules: Vec<ModuleDecl>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_var(&mut self, decl: VarDecl) -> VarId {
        let id = VarId(self.vars.len() as u32);
        self.vars.push(decl);
        id
    }

    pub fn add_func(&mut self, decl: FuncDecl) -> FuncId {
        let id = FuncId(self.funcs.len() as u32);
        self.funcs.push(decl);
        id
    }

    pub fn add_module(&mut self, decl: ModuleDecl) -> ModuleId {
        let id = ModuleId(self.modules.len() as u32);
        self.modules.push(decl);
        id
    }

    pub fn var(&self, id: VarId) -> &VarDecl {
        &self.vars[id.index()]
    }

    pub fn func(&self, id: FuncId) -> &FuncDecl {
        &self.funcs[id.index()]
    }

    pub fn module(&self, id: ModuleId) -> &ModuleDecl {
        &self.modules[id.index()]
    }

    pub fn vars(&self) -> impl Iterator<Item = (VarId, &VarDecl)> {
        self.vars
            .iter()
            .enumerate()
            .map(|(i, d)| (VarId(i as u32), d))
    }

    pub fn funcs(&self) -> impl Iterator<Item = (FuncId, &FuncDecl)> {
        self.funcs
            .iter()
            .enumerate()
            .map(|(i, d)| (FuncId(i as u32), d))
    }
}

/// Stack of lexical scopes; index 0 is module scope.
#[derive(Clone, Debug)]
pub struct Scopes {
    stack: Vec<IndexMap<Symbol, Binding>>,
}

impl Default for Scopes {
    fn default() -> Self {
        Self::new()
    }
}

impl Scopes {
    pub fn new() -> Self {
        Self {
            stack: vec![IndexMap::new()],
        }
    }

    pub fn push(&mut self) {
        self.stack.push(IndexMap::new());
    }

    pub fn pop(&mut self) {
        debug_assert!(self.stack.len() > 1, "module scope must not be popped");
        if self.stack.len() > 1 {
            self.stack.pop();
        }
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Bind in the innermost scope. Returns the previous binding of that scope, if any.
    pub fn define(&mut self, name: Symbol, binding: Binding) -> Option<Binding> {
        let scope = self.stack.last_mut()?;
        scope.insert(name, binding)
    }

    /// Whether `name` is bound in the innermost scope.
    pub fn is_defined_here(&self, name: Symbol) -> bool {
        self.stack.last().is_some_and(|s| s.contains_key(&name))
    }

    pub fn lookup(&self, name: Symbol) -> Option<Binding> {
        self.stack
            .iter()
            .rev()
            .find_map(|scope| scope.get(&name).copied())
    }
}
