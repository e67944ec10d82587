use crate::Interner;

#[test]
fn intern_deduplicates() {
    let mut interner = Interner::new();

    let a = interner.intern("foo");
    let b = interner.intern("foo");
    let c = interner.intern("bar");

    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(interner.len(), 2);
}

#[test]
fn resolve_returns_original_text() {
    let mut interner = Interner::new();
    let sym = interner.intern("__tmp1");
    assert_eq!(interner.resolve(sym), "__tmp1");
}

#[test]
fn lookup_does_not_insert() {
    let mut interner = Interner::new();
    interner.intern("x");

    assert!(interner.lookup("y").is_none());
    assert_eq!(interner.len(), 1);
    assert_eq!(interner.lookup("x"), Some(interner.intern("x")));
}

#[test]
fn try_resolve_foreign_symbol() {
    let mut big = Interner::new();
    big.intern("a");
    let second = big.intern("b");

    let small = Interner::new();
    assert!(small.try_resolve(second).is_none());
}

#[test]
fn symbols_order_by_insertion() {
    let mut interner = Interner::new();

    let z = interner.intern("z");
    let a = interner.intern("a");

    assert!(z < a);
    let names: Vec<_> = interner.iter().map(|(_, s)| s).collect();
    assert_eq!(names, ["z", "a"]);
}

#[test]
fn symbol_serializes_as_index() {
    let mut interner = Interner::new();
    interner.intern("first");
    let sym = interner.intern("second");

    assert_eq!(serde_json::to_string(&sym).unwrap(), "1");
}
