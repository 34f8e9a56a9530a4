use super::*;
use sharpgen_model::{MemberInfo, MemberKind, TypeRegistry, TypeShape, Variable};

struct Fixture {
    registry: TypeRegistry,
    list: TypeHandle,
    console: TypeHandle,
    widget: TypeHandle,
}

fn fixture() -> Fixture {
    let registry = TypeRegistry::new();
    let list = registry.class("List", "System.Collections.Generic", "System.Collections");
    let console = registry.class("Console", "System", "System.Console");
    let widget = registry.class("Widget", "Acme.Widgets", "Acme");
    Fixture {
        registry,
        list,
        console,
        widget,
    }
}

#[test]
fn test_compare_namespaces_puts_system_first() {
    let mut namespaces = vec![
        "Acme.Widgets",
        "System.Linq",
        "acme.Alpha",
        "System",
        "Systematic",
        "Acme.widgets",
    ];
    namespaces.sort_by(|a, b| compare_namespaces(a, b));
    assert_eq!(
        namespaces,
        vec![
            "System",
            "System.Linq",
            "acme.Alpha",
            "Acme.Widgets",
            "Acme.widgets",
            "Systematic",
        ]
    );
}

#[test]
fn test_keyword_types_need_nothing() {
    let fx = fixture();
    let options = AnalysisOptions::default();
    let mut collector = NamespaceCollector::new(&fx.registry, &options);
    for ty in [
        TypeHandle::VOID,
        TypeHandle::OBJECT,
        TypeHandle::STRING,
        TypeHandle::INT32,
    ] {
        collector.visit_type(ty);
    }
    assert_eq!(collector.finish("Acme"), (vec![], vec![]));
}

#[test]
fn test_generic_type_adds_namespace_and_arguments() {
    let fx = fixture();
    let options = AnalysisOptions::default();
    let list_of_widget = fx
        .registry
        .instantiate(fx.list, vec![fx.widget])
        .expect("registered");
    let mut collector = NamespaceCollector::new(&fx.registry, &options);
    collector.visit_type(list_of_widget);
    let (namespaces, assemblies) = collector.finish("Acme.Generated");
    assert_eq!(namespaces, vec!["System.Collections.Generic", "Acme.Widgets"]);
    assert_eq!(assemblies, vec!["Acme", "System.Collections"]);
}

#[test]
fn test_arrays_contribute_element_type() {
    let fx = fixture();
    let options = AnalysisOptions::default();
    let widgets = fx.registry.array_of(fx.widget);
    let mut collector = NamespaceCollector::new(&fx.registry, &options);
    collector.visit_type(widgets);
    assert_eq!(collector.finish("Other").0, vec!["Acme.Widgets"]);
}

#[test]
fn test_placeholder_namespace_is_skipped() {
    let fx = fixture();
    let options = AnalysisOptions::default();
    let t = fx.registry.intern(TypeShape::class(
        "Marker",
        &options.generic_placeholder_namespace,
        "Placeholders",
    ));
    let mut collector = NamespaceCollector::new(&fx.registry, &options);
    collector.visit_type(t);
    assert_eq!(collector.finish("Acme"), (vec![], vec![]));
}

#[test]
fn test_own_namespace_is_removed() {
    let fx = fixture();
    let options = AnalysisOptions::default();
    let mut collector = NamespaceCollector::new(&fx.registry, &options);
    collector.visit_type(fx.widget);
    assert!(collector.finish("Acme.Widgets").0.is_empty());
}

#[test]
fn test_assemblies_can_be_disabled() {
    let fx = fixture();
    let options = AnalysisOptions {
        collect_assemblies: false,
        ..AnalysisOptions::default()
    };
    let mut collector = NamespaceCollector::new(&fx.registry, &options);
    collector.visit_type(fx.widget);
    let (namespaces, assemblies) = collector.finish("Other");
    assert_eq!(namespaces, vec!["Acme.Widgets"]);
    assert!(assemblies.is_empty());
}

#[test]
fn test_base_chain_assemblies_are_collected() {
    let fx = fixture();
    let options = AnalysisOptions::default();
    let base = fx.registry.class("Control", "Acme.Ui", "Acme.Ui.Core");
    let derived = fx.registry.intern(
        TypeShape::class("Button", "Acme.Ui.Buttons", "Acme.Ui.Buttons").with_base_type(base),
    );
    let mut collector = NamespaceCollector::new(&fx.registry, &options);
    collector.visit_type(derived);
    let (namespaces, assemblies) = collector.finish("Other");
    assert_eq!(namespaces, vec!["Acme.Ui.Buttons"]);
    assert_eq!(assemblies, vec!["Acme.Ui.Buttons", "Acme.Ui.Core"]);
}

#[test]
fn test_static_members_count_and_instance_members_do_not() {
    let fx = fixture();
    let options = AnalysisOptions::default();
    let mut collector = NamespaceCollector::new(&fx.registry, &options);

    let instance = Expr::member(
        Some(Expr::null(fx.widget)),
        MemberInfo::new("Size", fx.list, TypeHandle::INT32, MemberKind::Property),
    );
    collector.visit_node(&instance.kind, instance.ty);
    assert!(collector.namespaces.is_empty());

    let call = Expr::call_static(
        MethodInfo::new("WriteLine", fx.console, TypeHandle::VOID).with_static(),
        vec![Expr::string("hi")],
    );
    collector.visit_node(&call.kind, call.ty);
    assert_eq!(collector.finish("Acme").0, vec!["System"]);
}

#[test]
fn test_extension_method_owner_counts() {
    let fx = fixture();
    let options = AnalysisOptions::default();
    let enumerable = fx.registry.class("Enumerable", "System.Linq", "System.Linq");
    let call = Expr::call(
        None,
        MethodInfo::new("Count", enumerable, TypeHandle::INT32).with_extension(),
        vec![Expr::null(fx.widget)],
    );
    let mut collector = NamespaceCollector::new(&fx.registry, &options);
    collector.visit_node(&call.kind, call.ty);
    assert_eq!(collector.finish("Acme").0, vec!["System.Linq"]);
}

#[test]
fn test_generic_method_arguments_only_when_not_inferable() {
    let fx = fixture();
    let options = AnalysisOptions::default();
    let t0 = fx.registry.intern(TypeShape::generic_parameter(
        "T",
        0,
        true,
        &options.generic_placeholder_namespace,
    ));
    let factory = fx.registry.class("Factory", "Acme.Factories", "Acme");
    let gadget = fx.registry.class("Gadget", "Acme.Gadgets", "Acme");

    // Identity<T>(T value): T is inferred from the argument.
    let identity = MethodInfo::new("Identity", factory, fx.widget)
        .with_parameter_types(vec![t0])
        .with_generic_arguments(vec![fx.widget]);
    // Create<T>(): T must be written.
    let create = MethodInfo::new("Create", factory, gadget).with_generic_arguments(vec![gadget]);

    let mut collector = NamespaceCollector::new(&fx.registry, &options);
    let inferred = Expr::call(Some(Expr::null(factory)), identity, vec![Expr::null(fx.widget)]);
    collector.visit_node(&inferred.kind, inferred.ty);
    assert!(collector.namespaces.is_empty());

    let explicit = Expr::call(Some(Expr::null(factory)), create, vec![]);
    collector.visit_node(&explicit.kind, explicit.ty);
    assert_eq!(collector.finish("Other").0, vec!["Acme.Gadgets"]);
}

#[test]
fn test_type_constants_casts_and_enum_values() {
    let fx = fixture();
    let options = AnalysisOptions::default();
    let color = fx
        .registry
        .intern(TypeShape::enumeration("Color", "Acme.Palette", "Acme"));
    let tree = Expr::block(
        vec![Variable::new("w", fx.widget)],
        vec![
            Expr::type_of(fx.console),
            Expr::enum_member(color, "Red"),
            Expr::convert(Expr::null(TypeHandle::OBJECT), fx.list),
        ],
    );
    let mut collector = NamespaceCollector::new(&fx.registry, &options);
    collector.visit_tree(&tree);
    assert_eq!(
        collector.finish("Other").0,
        vec![
            "System",
            "System.Collections.Generic",
            "Acme.Palette",
            "Acme.Widgets"
        ]
    );
}

#[test]
fn test_merge_then_finish_sorts_and_deduplicates() {
    let fx = fixture();
    let options = AnalysisOptions::default();
    let mut collector = NamespaceCollector::new(&fx.registry, &options);
    collector.merge(&["Zeta".to_string(), "System".to_string()], &["b".to_string()]);
    collector.merge(&["Zeta".to_string(), "Alpha".to_string()], &["a".to_string()]);
    let (namespaces, assemblies) = collector.finish("Own");
    assert_eq!(namespaces, vec!["System", "Alpha", "Zeta"]);
    assert_eq!(assemblies, vec!["a", "b"]);
}
