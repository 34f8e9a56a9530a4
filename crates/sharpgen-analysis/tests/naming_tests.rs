use super::*;
use sharpgen_model::{Expr, MethodFlags, TypeDecl, TypeDeclId, TypeRegistry, TypeShape, Variable};

fn unit() -> (SourceCode, TypeDeclId) {
    let mut unit = SourceCode::new("Acme.Generated");
    let type_id = unit.add_type(TypeDecl::class("Program"));
    (unit, type_id)
}

fn add_block_method(unit: &mut SourceCode, type_id: TypeDeclId, ty: TypeHandle) -> MethodId {
    unit.push_method(
        type_id,
        MethodModel::block_method(type_id, ty, MethodFlags::empty(), None),
    )
}

fn finalize(unit: &mut SourceCode, id: MethodId, registry: &TypeRegistry) -> String {
    let name = finalize_name(unit, id, registry, true).expect("method exists");
    unit.register_method(id);
    name
}

#[test]
fn test_base_names() {
    let registry = TypeRegistry::new();
    let list = registry.class("List", "System.Collections.Generic", "System.Collections");
    let list_of_string = registry
        .instantiate(list, vec![TypeHandle::STRING])
        .expect("registered");
    let ints = registry.array_of(TypeHandle::INT32);

    assert_eq!(base_name(TypeHandle::VOID, &registry), "DoAction");
    assert_eq!(base_name(TypeHandle::INT32, &registry), "GetInt32");
    assert_eq!(base_name(TypeHandle::STRING, &registry), "GetString");
    assert_eq!(base_name(list_of_string, &registry), "GetStringList");
    assert_eq!(base_name(ints, &registry), "GetInt32Array");
}

#[test]
fn test_type_name_part_strips_arity_and_capitalizes() {
    let registry = TypeRegistry::new();
    let odd = registry.intern(TypeShape::class("widget`1", "Acme", "Acme"));
    assert_eq!(type_name_part(odd, &registry), "Widget");
}

#[test]
fn test_first_method_gets_base_name() {
    let registry = TypeRegistry::new();
    let (mut unit, type_id) = unit();
    let id = add_block_method(&mut unit, type_id, TypeHandle::INT32);
    assert_eq!(finalize(&mut unit, id, &registry), "GetInt32");
    assert_eq!(unit.method(id).and_then(MethodModel::name), Some("GetInt32"));
}

#[test]
fn test_second_same_signature_block_method_renames_first() {
    let registry = TypeRegistry::new();
    let (mut unit, type_id) = unit();
    let first = add_block_method(&mut unit, type_id, TypeHandle::INT32);
    let second = add_block_method(&mut unit, type_id, TypeHandle::INT32);
    let third = add_block_method(&mut unit, type_id, TypeHandle::INT32);

    finalize(&mut unit, first, &registry);
    assert_eq!(finalize(&mut unit, second, &registry), "GetInt322");
    assert_eq!(unit.method(first).and_then(MethodModel::name), Some("GetInt321"));
    assert_eq!(finalize(&mut unit, third, &registry), "GetInt323");
}

#[test]
fn test_declared_method_keeps_base_name() {
    let registry = TypeRegistry::new();
    let (mut unit, type_id) = unit();
    let declared = unit.add_method(
        type_id,
        MethodModel::new(Some("GetInt32"), vec![], TypeHandle::INT32, Some(Expr::int(0))),
    );
    let generated = add_block_method(&mut unit, type_id, TypeHandle::INT32);

    assert_eq!(finalize(&mut unit, generated, &registry), "GetInt321");
    assert_eq!(unit.method(declared).and_then(MethodModel::name), Some("GetInt32"));
}

#[test]
fn test_different_signatures_do_not_share_a_sequence() {
    let registry = TypeRegistry::new();
    let (mut unit, type_id) = unit();
    let first = add_block_method(&mut unit, type_id, TypeHandle::VOID);
    let second = add_block_method(&mut unit, type_id, TypeHandle::VOID);
    if let Some(method) = unit.method_mut(second) {
        method.parameters = vec![Variable::new("x", TypeHandle::STRING)];
    }

    assert_eq!(finalize(&mut unit, first, &registry), "DoAction");
    assert_eq!(finalize(&mut unit, second, &registry), "DoAction");
    assert_eq!(unit.method_names(type_id), vec!["DoAction", "DoAction"]);
}

#[test]
fn test_rename_is_skipped_when_suffix_one_is_taken() {
    let registry = TypeRegistry::new();
    let (mut unit, type_id) = unit();
    unit.add_method(
        type_id,
        MethodModel::new(Some("GetInt321"), vec![], TypeHandle::INT32, None),
    );
    let first = add_block_method(&mut unit, type_id, TypeHandle::INT32);
    let second = add_block_method(&mut unit, type_id, TypeHandle::INT32);

    // Suffix 1 is already taken, so numbering continues after it.
    assert_eq!(finalize(&mut unit, first, &registry), "GetInt322");
    assert_eq!(finalize(&mut unit, second, &registry), "GetInt323");
}

#[test]
fn test_unrelated_suffixes_are_ignored() {
    let registry = TypeRegistry::new();
    let (mut unit, type_id) = unit();
    unit.add_method(
        type_id,
        MethodModel::new(Some("GetInt32Value"), vec![], TypeHandle::INT32, None),
    );
    let id = add_block_method(&mut unit, type_id, TypeHandle::INT32);
    assert_eq!(finalize(&mut unit, id, &registry), "GetInt32");
}

#[test]
fn test_unknown_method_is_an_error() {
    let registry = TypeRegistry::new();
    let (mut unit, _) = unit();
    let err = finalize_name(&mut unit, MethodId(42), &registry, true).expect_err("no such method");
    assert!(matches!(err, AnalysisError::UnknownMethod(42)));
}
