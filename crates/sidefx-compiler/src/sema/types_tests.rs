use sidefx_core::Interner;

use super::*;

fn strong(params: Vec<ParamType>, ret: TypeId) -> FunctionType {
    FunctionType::new(params, ret, true, true)
}

fn by_value(ty: TypeId) -> ParamType {
    ParamType { ty, is_ref: false }
}

#[test]
fn builtins_are_preregistered() {
    let ctx = TypeContext::new();

    assert_eq!(ctx.len(), 10);
    assert_eq!(ctx.shape(TYPE_INT), &TypeShape::Basic(BasicType::Int));
    assert_eq!(ctx.shape(TYPE_NULL), &TypeShape::Null);
    assert_eq!(ctx.shape(TYPE_ERROR), &TypeShape::Error);
    assert_eq!(ctx.basic(BasicType::String), TYPE_STRING);
    assert!(TYPE_ERROR.is_builtin());
    assert!(ctx.get(TypeId(10)).is_none());
}

#[test]
fn interning_deduplicates() {
    let mut ctx = TypeContext::new();

    let a = ctx.pointer_to(TYPE_INT);
    let b = ctx.pointer_to(TYPE_INT);
    let c = ctx.pointer_to(TYPE_LONG);

    assert_eq!(a, b);
    assert_ne!(a, c);
    assert!(!a.is_builtin());
}

#[test]
fn function_identity_ignores_purity_memo() {
    let mut ctx = TypeContext::new();
    let first = ctx.function(strong(vec![by_value(TYPE_INT)], TYPE_INT));
    if let TypeShape::Function(function) = ctx.shape(first) {
        function.purity_level(&ctx);
    }

    let second = ctx.function(strong(vec![by_value(TYPE_INT)], TYPE_INT));

    assert_eq!(first, second);
}

#[test]
fn aliases_resolve_transitively() {
    let mut interner = Interner::new();
    let mut ctx = TypeContext::new();
    let inner = ctx.intern(TypeShape::Alias {
        name: interner.intern("Num"),
        target: TYPE_VOID,
    });
    let outer = ctx.intern(TypeShape::Alias {
        name: interner.intern("Nothing"),
        target: inner,
    });

    assert_eq!(ctx.resolve(outer), TYPE_VOID);
    assert!(ctx.is_void(outer));
    assert_eq!(ctx.display(outer, &interner), "Nothing");
}

#[test]
fn purity_levels() {
    let mut ctx = TypeContext::new();
    let ptr = ctx.pointer_to(TYPE_INT);

    let impure = FunctionType::new(vec![by_value(TYPE_INT)], TYPE_INT, false, true);
    let strong_fn = strong(vec![by_value(TYPE_INT), by_value(TYPE_STRING)], TYPE_INT);
    let weak_ptr = strong(vec![by_value(ptr)], TYPE_INT);
    let weak_ref = strong(
        vec![ParamType {
            ty: TYPE_INT,
            is_ref: true,
        }],
        TYPE_INT,
    );
    let no_params = strong(Vec::new(), TYPE_INT);

    assert_eq!(impure.purity_level(&ctx), PurityLevel::Impure);
    assert_eq!(strong_fn.purity_level(&ctx), PurityLevel::Strong);
    assert_eq!(weak_ptr.purity_level(&ctx), PurityLevel::Weak);
    assert_eq!(weak_ref.purity_level(&ctx), PurityLevel::Weak);
    assert_eq!(no_params.purity_level(&ctx), PurityLevel::Strong);
    assert!(PurityLevel::Strong > PurityLevel::Weak);
    assert!(PurityLevel::Weak > PurityLevel::Impure);
}

#[test]
fn purity_is_memoized() {
    let ctx = TypeContext::new();
    let function = strong(Vec::new(), TYPE_INT);

    assert!(!function.is_purity_computed());
    function.purity_level(&ctx);
    assert!(function.is_purity_computed());
}

#[test]
fn mutable_indirection() {
    let mut interner = Interner::new();
    let mut ctx = TypeContext::new();
    let ptr = ctx.pointer_to(TYPE_INT);
    let arr = ctx.array_of(TYPE_INT);
    let map = ctx.assoc_array(TYPE_STRING, TYPE_INT);
    let class = ctx.intern(TypeShape::Class(interner.intern("Widget")));
    let dg = ctx.delegate(strong(Vec::new(), TYPE_INT));
    let pure_tuple = ctx.intern(TypeShape::Tuple(vec![TYPE_INT, TYPE_BOOL]));
    let ref_tuple = ctx.intern(TypeShape::Tuple(vec![TYPE_INT, ptr]));

    for ty in [ptr, arr, map, class, dg, ref_tuple] {
        assert!(ctx.has_mutable_indirection(ty), "{}", ctx.display(ty, &interner));
    }
    for ty in [TYPE_INT, TYPE_STRING, TYPE_NULL, pure_tuple] {
        assert!(!ctx.has_mutable_indirection(ty), "{}", ctx.display(ty, &interner));
    }
}

#[test]
fn callee_function_unwraps_delegates_only() {
    let mut ctx = TypeContext::new();
    let function = ctx.function(strong(Vec::new(), TYPE_INT));
    let dg = ctx.delegate(strong(Vec::new(), TYPE_INT));
    let fp = ctx.pointer_to(function);

    assert!(ctx.callee_function(function).is_some());
    assert!(ctx.callee_function(dg).is_some());
    assert!(ctx.callee_function(fp).is_none());
    assert!(ctx.callee_function(TYPE_INT).is_none());

    assert!(ctx.call_signature(fp).is_some());
    assert!(ctx.call_signature(dg).is_some());
    assert!(ctx.call_signature(TYPE_INT).is_none());
}

#[test]
fn class_queries() {
    let mut interner = Interner::new();
    let mut ctx = TypeContext::new();
    let class = ctx.intern(TypeShape::Class(interner.intern("Widget")));
    let alias = ctx.intern(TypeShape::Alias {
        name: interner.intern("W"),
        target: class,
    });

    assert!(ctx.is_class(class));
    assert!(ctx.is_class(alias));
    assert!(!ctx.is_class(TYPE_INT));
    assert!(ctx.is_error(TYPE_ERROR));
}

#[test]
fn type_display() {
    let mut interner = Interner::new();
    let mut ctx = TypeContext::new();
    let ptr = ctx.pointer_to(TYPE_INT);
    let arr = ctx.array_of(ptr);
    let map = ctx.assoc_array(TYPE_STRING, TYPE_DOUBLE);
    let function = ctx.function(FunctionType::new(
        vec![
            by_value(TYPE_INT),
            ParamType {
                ty: TYPE_CHAR,
                is_ref: true,
            },
        ],
        TYPE_BOOL,
        true,
        false,
    ));
    let fp = ctx.pointer_to(function);
    let dg = ctx.delegate(FunctionType::new(Vec::new(), TYPE_VOID, false, true));
    let tuple = ctx.intern(TypeShape::Tuple(vec![TYPE_INT, TYPE_UINT]));
    let class = ctx.intern(TypeShape::Class(interner.intern("Widget")));

    let rendered: Vec<String> = [
        ptr, arr, map, function, fp, dg, tuple, class, TYPE_NULL, TYPE_ERROR, TYPE_LONG,
    ]
    .into_iter()
    .map(|ty| ctx.display(ty, &interner))
    .collect();

    insta::assert_snapshot!(rendered.join("\n"), @r"
    int*
    int*[]
    double[string]
    bool(int, ref char) pure
    bool function(int, ref char) pure
    void delegate() nothrow
    tuple(int, uint)
    Widget
    typeof(null)
    __error
    long
    ");
}

#[test]
fn basic_type_properties() {
    assert_eq!(BasicType::Uint.name(), "uint");
    assert!(BasicType::Char.is_numeric());
    assert!(BasicType::Double.is_numeric());
    assert!(!BasicType::Bool.is_numeric());
    assert!(!BasicType::String.is_numeric());
}
