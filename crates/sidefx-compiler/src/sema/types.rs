//! Core type definitions for semantic analysis.
//!
//! Types are interned in [`TypeContext`](super::context::TypeContext) so that
//! equality is an id comparison. Function types carry their declared
//! attributes and a lazily computed purity level.

use std::cell::OnceCell;
use std::hash::{Hash, Hasher};

use sidefx_core::Symbol;

/// Interned type identifier.
///
/// Index into the type registry. Values 0-9 are reserved for builtins;
/// user types start at index 10.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct TypeId(pub u32);

pub const TYPE_VOID: TypeId = TypeId(0);
pub const TYPE_BOOL: TypeId = TypeId(1);
pub const TYPE_INT: TypeId = TypeId(2);
pub const TYPE_LONG: TypeId = TypeId(3);
pub const TYPE_UINT: TypeId = TypeId(4);
pub const TYPE_CHAR: TypeId = TypeId(5);
pub const TYPE_DOUBLE: TypeId = TypeId(6);
pub const TYPE_STRING: TypeId = TypeId(7);
pub const TYPE_NULL: TypeId = TypeId(8);
pub const TYPE_ERROR: TypeId = TypeId(9);

impl TypeId {
    pub fn is_builtin(self) -> bool {
        self.0 <= TYPE_ERROR.0
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum BasicType {
    Void,
    Bool,
    Int,
    Long,
    Uint,
    Char,
    Double,
    String,
}

impl BasicType {
    pub fn name(self) -> &'static str {
        match self {
            Self::Void => "void",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Long => "long",
            Self::Uint => "uint",
            Self::Char => "char",
            Self::Double => "double",
            Self::String => "string",
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            Self::Int | Self::Long | Self::Uint | Self::Char | Self::Double
        )
    }
}

/// The shape of a type.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum TypeShape {
    Basic(BasicType),
    /// Type of the `null` literal.
    Null,
    /// Type of an expression that failed to check.
    Error,
    Class(Symbol),
    /// Transparent alias; see `TypeContext::resolve`.
    Alias { name: Symbol, target: TypeId },
    Pointer(TypeId),
    Array(TypeId),
    AssocArray { key: TypeId, value: TypeId },
    Function(FunctionType),
    /// Delegate wrapping a `Function` type.
    Delegate(TypeId),
    Tuple(Vec<TypeId>),
}

/// Purity of a callable, ordered from weakest guarantee to strongest.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum PurityLevel {
    /// May read and write global state.
    Impure,
    /// Pure, but may mutate through indirections reachable from its parameters.
    Weak,
    /// Result depends only on the argument values.
    Strong,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ParamType {
    pub ty: TypeId,
    pub is_ref: bool,
}

#[derive(Clone, Debug)]
pub struct FunctionType {
    pub params: Vec<ParamType>,
    pub ret: TypeId,
    pub is_pure: bool,
    pub is_nothrow: bool,
    /// Memoized by `purity_level`; not part of the type's identity.
    purity: OnceCell<PurityLevel>,
}

impl FunctionType {
    pub fn new(params: Vec<ParamType>, ret: TypeId, is_pure: bool, is_nothrow: bool) -> Self {
        Self {
            params,
            ret,
            is_pure,
            is_nothrow,
            purity: OnceCell::new(),
        }
    }

    /// Purity level, computed on first read.
    pub fn purity_level(&self, types: &super::context::TypeContext) -> PurityLevel {
        *self.purity.get_or_init(|| {
            if !self.is_pure {
                return PurityLevel::Impure;
            }
            let weak = self
                .params
                .iter()
                .any(|p| p.is_ref || types.has_mutable_indirection(p.ty));
            if weak {
                PurityLevel::Weak
            } else {
                PurityLevel::Strong
            }
        })
    }

    /// Whether `purity_level` has already been computed.
    pub fn is_purity_computed(&self) -> bool {
        self.purity.get().is_some()
    }
}

impl PartialEq for FunctionType {
    fn eq(&self, other: &Self) -> bool {
        self.params == other.params
            && self.ret == other.ret
            && self.is_pure == other.is_pure
            && self.is_nothrow == other.is_nothrow
    }
}

impl Eq for FunctionType {}

impl Hash for FunctionType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.params.hash(state);
        self.ret.hash(state);
        self.is_pure.hash(state);
        self.is_nothrow.hash(state);
    }
}
