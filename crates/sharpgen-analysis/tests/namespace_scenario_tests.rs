//! Namespace and assembly requirements of whole generation units.

use sharpgen_analysis::{analyze_method, analyze_source_code};
use sharpgen_common::AnalysisOptions;
use sharpgen_model::{
    AttributeModel, Expr, FieldModel, MethodInfo, MethodModel, SourceCode, TypeDecl, TypeHandle,
    TypeReference, TypeRegistry, TypeShape, Variable,
};
use std::sync::Arc;

const UNIT_NAMESPACE: &str = "Acme.Generated";

struct Fixture {
    registry: TypeRegistry,
    list_of_string: TypeHandle,
    console: TypeHandle,
    enumerable: TypeHandle,
    widget: TypeHandle,
    helper: TypeHandle,
}

fn fixture() -> Fixture {
    let registry = TypeRegistry::new();
    let list = registry.class("List`1", "System.Collections.Generic", "System.Collections");
    let list_of_string = registry
        .instantiate(list, vec![TypeHandle::STRING])
        .expect("registered");
    let console = registry.class("Console", "System", "System.Console");
    let enumerable = registry.class("Enumerable", "System.Linq", "System.Linq");
    let widget = registry.class("Widget", "Acme.Widgets", "Acme.Widgets");
    let helper = registry.class("Helper", UNIT_NAMESPACE, "Acme.Generated.Support");
    Fixture {
        registry,
        list_of_string,
        console,
        enumerable,
        widget,
        helper,
    }
}

fn unit_with(method: MethodModel) -> SourceCode {
    let mut unit = SourceCode::new(UNIT_NAMESPACE);
    let program = unit.add_type(TypeDecl::class("Program"));
    unit.add_method(program, method);
    unit
}

#[test]
fn test_list_of_string_needs_only_its_own_namespace() {
    let fx = fixture();
    let body = Expr::new_object(fx.list_of_string, vec![]);
    let mut unit = unit_with(MethodModel::new(
        Some("Create"),
        vec![],
        fx.list_of_string,
        Some(body),
    ));

    let analysis =
        analyze_source_code(&mut unit, &fx.registry, &AnalysisOptions::default()).expect("valid");
    assert_eq!(analysis.required_namespaces, vec!["System.Collections.Generic"]);
    assert_eq!(analysis.required_assemblies, vec!["System.Collections"]);
}

#[test]
fn test_own_namespace_is_omitted_but_its_assembly_is_kept() {
    let fx = fixture();
    let body = Expr::new_object(fx.helper, vec![]);
    let mut unit = unit_with(MethodModel::new(Some("Make"), vec![], fx.helper, Some(body)));

    let analysis =
        analyze_source_code(&mut unit, &fx.registry, &AnalysisOptions::default()).expect("valid");
    assert!(analysis.required_namespaces.is_empty());
    assert_eq!(analysis.required_assemblies, vec!["Acme.Generated.Support"]);
}

#[test]
fn test_unit_namespaces_are_sorted_system_first() {
    let fx = fixture();
    let items = Variable::new("items", fx.list_of_string);
    let write = MethodInfo::new("WriteLine", fx.console, TypeHandle::VOID).with_static();
    let count = MethodInfo::new("Count", fx.enumerable, TypeHandle::INT32).with_extension();
    let body = Expr::block(
        vec![],
        vec![
            Expr::new_object(fx.widget, vec![]),
            Expr::call_static(
                write,
                vec![Expr::call(None, count, vec![Expr::variable(&items)])],
            ),
        ],
    );
    let mut unit = unit_with(MethodModel::new(
        Some("Report"),
        vec![items],
        TypeHandle::VOID,
        Some(body),
    ));

    let analysis =
        analyze_source_code(&mut unit, &fx.registry, &AnalysisOptions::default()).expect("valid");
    assert_eq!(
        analysis.required_namespaces,
        vec!["System", "System.Collections.Generic", "System.Linq", "Acme.Widgets"]
    );
    assert_eq!(
        analysis.required_assemblies,
        vec!["Acme.Widgets", "System.Collections", "System.Console", "System.Linq"]
    );
}

#[test]
fn test_instance_member_owner_is_not_required() {
    let fx = fixture();
    let widget = Variable::new("widget", fx.widget);
    let describe = MethodInfo::new("Describe", fx.console, TypeHandle::STRING);
    let body = Expr::call(Some(Expr::variable(&widget)), describe, vec![]);
    let mut unit = unit_with(MethodModel::new(
        Some("Describe"),
        vec![widget],
        TypeHandle::STRING,
        Some(body),
    ));

    let analysis =
        analyze_source_code(&mut unit, &fx.registry, &AnalysisOptions::default()).expect("valid");
    // Only the parameter type is written out.
    assert_eq!(analysis.required_namespaces, vec!["Acme.Widgets"]);
}

#[test]
fn test_assembly_collection_can_be_disabled() {
    let fx = fixture();
    let options = AnalysisOptions {
        collect_assemblies: false,
        ..AnalysisOptions::default()
    };
    let body = Expr::new_object(fx.list_of_string, vec![]);
    let mut unit = unit_with(MethodModel::new(
        Some("Create"),
        vec![],
        fx.list_of_string,
        Some(body),
    ));

    let analysis = analyze_source_code(&mut unit, &fx.registry, &options).expect("valid");
    assert_eq!(analysis.required_namespaces, vec!["System.Collections.Generic"]);
    assert!(analysis.required_assemblies.is_empty());
}

#[test]
fn test_type_declarations_contribute_requirements() {
    let fx = fixture();
    let obsolete = fx.registry.class("ObsoleteAttribute", "System", "System.Runtime");
    let mut unit = SourceCode::new(UNIT_NAMESPACE);
    let mut decl = TypeDecl::class("Panel")
        .with_base_type(Arc::new(TypeReference::External(fx.widget)));
    decl.attributes.push(AttributeModel::new(obsolete));
    let panel = unit.add_type(decl);
    unit.add_field(
        panel,
        FieldModel::new("items", fx.list_of_string)
            .with_initializer(Expr::new_object(fx.list_of_string, vec![])),
    );

    let analysis =
        analyze_source_code(&mut unit, &fx.registry, &AnalysisOptions::default()).expect("valid");
    assert_eq!(
        analysis.required_namespaces,
        vec!["System", "System.Collections.Generic", "Acme.Widgets"]
    );
    assert_eq!(
        analysis.required_assemblies,
        vec!["Acme.Widgets", "System.Collections", "System.Runtime"]
    );
}

#[test]
fn test_generic_placeholders_are_skipped() {
    let fx = fixture();
    let placeholder = fx.registry.intern(TypeShape::generic_parameter(
        "T",
        0,
        false,
        AnalysisOptions::default().generic_placeholder_namespace.as_str(),
    ));
    let stand_in = fx.registry.class(
        "TPlaceholder",
        AnalysisOptions::default().generic_placeholder_namespace.as_str(),
        "Sharpgen",
    );
    let value = Variable::new("value", placeholder);
    let other = Variable::new("other", stand_in);
    let mut unit = unit_with(MethodModel::new(
        Some("Echo"),
        vec![value.clone(), other],
        placeholder,
        Some(Expr::variable(&value)),
    ));

    let analysis =
        analyze_source_code(&mut unit, &fx.registry, &AnalysisOptions::default()).expect("valid");
    assert!(analysis.required_namespaces.is_empty());
    assert!(analysis.required_assemblies.is_empty());
}

#[test]
fn test_method_analysis_lists_are_sorted_and_exclude_own_namespace() {
    let fx = fixture();
    let body = Expr::block(
        vec![],
        vec![
            Expr::new_object(fx.widget, vec![]),
            Expr::new_object(fx.helper, vec![]),
            Expr::call_static(
                MethodInfo::new("Beep", fx.console, TypeHandle::VOID).with_static(),
                vec![],
            ),
        ],
    );
    let mut unit = SourceCode::new(UNIT_NAMESPACE);
    let program = unit.add_type(TypeDecl::class("Program"));
    let method = unit.add_method(
        program,
        MethodModel::new(Some("Run"), vec![], TypeHandle::VOID, Some(body)),
    );

    let analysis =
        analyze_method(&mut unit, method, &fx.registry, &AnalysisOptions::default()).expect("valid");
    assert_eq!(analysis.required_namespaces, vec!["System", "Acme.Widgets"]);
    assert_eq!(
        analysis.required_assemblies,
        vec!["Acme.Generated.Support", "Acme.Widgets", "System.Console"]
    );
}
