use super::*;
use rayon::prelude::*;

#[test]
fn test_builtins_are_preregistered() {
    let registry = TypeRegistry::new();
    let int = registry.shape(TypeHandle::INT32).expect("int is builtin");
    assert_eq!(int.name, "Int32");
    assert_eq!(int.namespace.as_deref(), Some("System"));
    assert_eq!(int.assembly.as_deref(), Some(CORE_ASSEMBLY));
    assert_eq!(int.keyword, Some("int"));

    let string = registry.shape(TypeHandle::STRING).expect("string is builtin");
    assert_eq!(string.base_type, Some(TypeHandle::OBJECT));
    assert!(!registry.is_empty());
}

#[test]
fn test_intern_memoizes_by_identity() {
    let registry = TypeRegistry::new();
    let before = registry.len();
    let first = registry.class("Widget", "Acme.Widgets", "Acme");
    let second = registry.class("Widget", "Acme.Widgets", "Acme");
    assert_eq!(first, second);
    assert_eq!(registry.len(), before + 1);
    assert!(first.0 >= TypeHandle::FIRST_USER);

    let first_shape = registry.shape(first).expect("registered");
    let second_shape = registry.shape(second).expect("registered");
    assert!(Arc::ptr_eq(&first_shape, &second_shape));
}

#[test]
fn test_interning_a_builtin_identity_returns_the_builtin_handle() {
    let registry = TypeRegistry::new();
    let again = registry.intern(TypeShape::builtin(TypeKind::Primitive, "Int32", Some("int")));
    assert_eq!(again, TypeHandle::INT32);
}

#[test]
fn test_instantiate_closes_generic_definition() {
    let registry = TypeRegistry::new();
    let dictionary = registry.class("Dictionary", "System.Collections.Generic", "System.Collections");
    let closed = registry
        .instantiate(dictionary, vec![TypeHandle::STRING, TypeHandle::INT32])
        .expect("definition is registered");
    assert_ne!(closed, dictionary);
    assert!(registry.is_generic(closed));
    assert_eq!(
        registry.instantiate(dictionary, vec![TypeHandle::STRING, TypeHandle::INT32]),
        Some(closed)
    );
    assert_eq!(registry.instantiate(TypeHandle(9_999), vec![]), None);
}

#[test]
fn test_array_of_is_memoized() {
    let registry = TypeRegistry::new();
    let first = registry.array_of(TypeHandle::STRING);
    let second = registry.array_of(TypeHandle::STRING);
    assert_eq!(first, second);
    assert_ne!(first, registry.array_of(TypeHandle::INT32));
}

#[test]
fn test_concurrent_intern_yields_one_handle_per_identity() {
    let registry = TypeRegistry::new();
    let handles: Vec<TypeHandle> = (0..256)
        .into_par_iter()
        .map(|i| registry.class(&format!("Type{}", i % 8), "Acme.Concurrency", "Acme"))
        .collect();

    for (i, handle) in handles.iter().enumerate() {
        let expected = registry.class(&format!("Type{}", i % 8), "Acme.Concurrency", "Acme");
        assert_eq!(*handle, expected);
        assert!(registry.shape(*handle).is_some());
    }
    let mut distinct = handles.clone();
    distinct.sort();
    distinct.dedup();
    assert_eq!(distinct.len(), 8);
}

#[test]
fn test_global_registry_is_shared() {
    let a = TypeRegistry::global().class("Shared", "Acme.Global", "Acme");
    let b = TypeRegistry::global().class("Shared", "Acme.Global", "Acme");
    assert_eq!(a, b);
}
