//! TypeContext: interned types and their queries.

use std::collections::HashMap;

use sidefx_core::Interner;

use super::types::{
    BasicType, FunctionType, TYPE_BOOL, TYPE_CHAR, TYPE_DOUBLE, TYPE_ERROR, TYPE_INT, TYPE_LONG,
    TYPE_NULL, TYPE_STRING, TYPE_UINT, TYPE_VOID, TypeId, TypeShape,
};

/// Central registry for types.
#[derive(Clone, Debug)]
pub struct TypeContext {
    types: Vec<TypeShape>,
    type_map: HashMap<TypeShape, TypeId>,
}

impl Default for TypeContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeContext {
    pub fn new() -> Self {
        let mut ctx = Self {
            types: Vec::new(),
            type_map: HashMap::new(),
        };

        // Pre-register builtin types at their expected IDs
        let builtins = [
            (TypeShape::Basic(BasicType::Void), TYPE_VOID),
            (TypeShape::Basic(BasicType::Bool), TYPE_BOOL),
            (TypeShape::Basic(BasicType::Int), TYPE_INT),
            (TypeShape::Basic(BasicType::Long), TYPE_LONG),
            (TypeShape::Basic(BasicType::Uint), TYPE_UINT),
            (TypeShape::Basic(BasicType::Char), TYPE_CHAR),
            (TypeShape::Basic(BasicType::Double), TYPE_DOUBLE),
            (TypeShape::Basic(BasicType::String), TYPE_STRING),
            (TypeShape::Null, TYPE_NULL),
            (TypeShape::Error, TYPE_ERROR),
        ];
        for (shape, expected) in builtins {
            let id = ctx.intern(shape);
            debug_assert_eq!(id, expected);
        }

        ctx
    }

    /// Intern a type, returning its ID. Deduplicates identical types.
    pub fn intern(&mut self, shape: TypeShape) -> TypeId {
        if let Some(&id) = self.type_map.get(&shape) {
            return id;
        }

        let id = TypeId(self.types.len() as u32);
        self.types.push(shape.clone());
        self.type_map.insert(shape, id);
        id
    }

    pub fn get(&self, id: TypeId) -> Option<&TypeShape> {
        self.types.get(id.index())
    }

    /// Shape of an id produced by this context.
    pub fn shape(&self, id: TypeId) -> &TypeShape {
        &self.types[id.index()]
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn basic(&self, basic: BasicType) -> TypeId {
        match basic {
            BasicType::Void => TYPE_VOID,
            BasicType::Bool => TYPE_BOOL,
            BasicType::Int => TYPE_INT,
            BasicType::Long => TYPE_LONG,
            BasicType::Uint => TYPE_UINT,
            BasicType::Char => TYPE_CHAR,
            BasicType::Double => TYPE_DOUBLE,
            BasicType::String => TYPE_STRING,
        }
    }

    pub fn pointer_to(&mut self, target: TypeId) -> TypeId {
        self.intern(TypeShape::Pointer(target))
    }

    pub fn array_of(&mut self, element: TypeId) -> TypeId {
        self.intern(TypeShape::Array(element))
    }

    pub fn assoc_array(&mut self, key: TypeId, value: TypeId) -> TypeId {
        self.intern(TypeShape::AssocArray { key, value })
    }

    pub fn function(&mut self, function: FunctionType) -> TypeId {
        self.intern(TypeShape::Function(function))
    }

    pub fn delegate(&mut self, function: FunctionType) -> TypeId {
        let target = self.function(function);
        self.intern(TypeShape::Delegate(target))
    }

    /// Strip aliases.
    pub fn resolve(&self, mut id: TypeId) -> TypeId {
        while let TypeShape::Alias { target, .. } = self.shape(id) {
            id = *target;
        }
        id
    }

    pub fn resolved_shape(&self, id: TypeId) -> &TypeShape {
        self.shape(self.resolve(id))
    }

    pub fn is_void(&self, id: TypeId) -> bool {
        self.resolve(id) == TYPE_VOID
    }

    pub fn is_error(&self, id: TypeId) -> bool {
        self.resolve(id) == TYPE_ERROR
    }

    pub fn is_class(&self, id: TypeId) -> bool {
        matches!(self.resolved_shape(id), TypeShape::Class(_))
    }

    /// The function type invoked when calling a value of type `id`.
    ///
    /// Delegates are unwrapped to their function type. Anything else,
    /// function pointers included, has no directly callable function type.
    pub fn callee_function(&self, id: TypeId) -> Option<&FunctionType> {
        let mut shape = self.resolved_shape(id);
        if let TypeShape::Delegate(target) = shape {
            shape = self.resolved_shape(*target);
        }
        match shape {
            TypeShape::Function(function) => Some(function),
            _ => None,
        }
    }

    /// Function type reachable by calling `id` through one optional pointer level.
    pub fn call_signature(&self, id: TypeId) -> Option<&FunctionType> {
        if let Some(function) = self.callee_function(id) {
            return Some(function);
        }
        match self.resolved_shape(id) {
            TypeShape::Pointer(target) => match self.resolved_shape(*target) {
                TypeShape::Function(function) => Some(function),
                _ => None,
            },
            _ => None,
        }
    }

    /// Whether a value of this type can be used to mutate state it does not own.
    pub fn has_mutable_indirection(&self, id: TypeId) -> bool {
        match self.resolved_shape(id) {
            TypeShape::Pointer(_)
            | TypeShape::Array(_)
            | TypeShape::AssocArray { .. }
            | TypeShape::Class(_)
            | TypeShape::Delegate(_) => true,
            TypeShape::Tuple(elements) => {
                elements.iter().any(|e| self.has_mutable_indirection(*e))
            }
            TypeShape::Basic(_)
            | TypeShape::Null
            | TypeShape::Error
            | TypeShape::Function(_)
            | TypeShape::Alias { .. } => false,
        }
    }

    /// Render a type the way it is written in source.
    pub fn display(&self, id: TypeId, interner: &Interner) -> String {
        let mut out = String::new();
        self.write_type(&mut out, id, interner);
        out
    }

    fn write_type(&self, out: &mut String, id: TypeId, interner: &Interner) {
        match self.shape(id) {
            TypeShape::Basic(basic) => out.push_str(basic.name()),
            TypeShape::Null => out.push_str("typeof(null)"),
            TypeShape::Error => out.push_str("__error"),
            TypeShape::Class(name) | TypeShape::Alias { name, .. } => {
                out.push_str(interner.resolve(*name))
            }
            TypeShape::Pointer(target) => {
                if let TypeShape::Function(function) = self.shape(*target) {
                    self.write_signature(out, function, "function", interner);
                } else {
                    self.write_type(out, *target, interner);
                    out.push('*');
                }
            }
            TypeShape::Array(element) => {
                self.write_type(out, *element, interner);
                out.push_str("[]");
            }
            TypeShape::AssocArray { key, value } => {
                self.write_type(out, *value, interner);
                out.push('[');
                self.write_type(out, *key, interner);
                out.push(']');
            }
            TypeShape::Function(function) => self.write_signature(out, function, "", interner),
            TypeShape::Delegate(target) => match self.shape(*target) {
                TypeShape::Function(function) => {
                    self.write_signature(out, function, "delegate", interner)
                }
                _ => {
                    out.push_str("delegate ");
                    self.write_type(out, *target, interner);
                }
            },
            TypeShape::Tuple(elements) => {
                out.push_str("tuple(");
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    self.write_type(out, *element, interner);
                }
                out.push(')');
            }
        }
    }

    fn write_signature(
        &self,
        out: &mut String,
        function: &FunctionType,
        keyword: &str,
        interner: &Interner,
    ) {
        self.write_type(out, function.ret, interner);
        if !keyword.is_empty() {
            out.push(' ');
            out.push_str(keyword);
        }
        out.push('(');
        for (i, param) in function.params.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            if param.is_ref {
                out.push_str("ref ");
            }
            self.write_type(out, param.ty, interner);
        }
        out.push(')');
        if function.is_pure {
            out.push_str(" pure");
        }
        if function.is_nothrow {
            out.push_str(" nothrow");
        }
    }
}
