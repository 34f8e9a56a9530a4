use super::*;

#[derive(Debug)]
struct Pair {
    left: Expr,
    right: Expr,
}

impl CustomExpr for Pair {
    fn name(&self) -> &str {
        "Pair"
    }

    fn children(&self) -> Vec<Expr> {
        vec![self.left.clone(), self.right.clone()]
    }

    fn rewrite(&self, mut children: Vec<Expr>) -> Expr {
        let right = children.pop().unwrap_or_else(Expr::empty);
        let left = children.pop().unwrap_or_else(Expr::empty);
        Expr::custom(Arc::new(Pair { left, right }), TypeHandle::VOID)
    }
}

#[test]
fn test_variables_compare_by_identity() {
    let a = Variable::new("x", TypeHandle::INT32);
    let b = Variable::new("x", TypeHandle::INT32);
    assert_ne!(a, b);
    assert_eq!(a, a.clone());
    assert_ne!(a.id(), b.id());
    assert_eq!(a.name(), "x");
}

#[test]
fn test_labels_compare_by_identity() {
    let a = Label::new(Some("exit"), TypeHandle::VOID);
    let b = Label::new(Some("exit"), TypeHandle::VOID);
    assert_ne!(a, b);
    assert_eq!(a.name(), Some("exit"));
}

#[test]
fn test_leaf_kinds() {
    assert!(NodeKind::Constant.is_leaf());
    assert!(NodeKind::Variable.is_leaf());
    assert!(!NodeKind::Block.is_leaf());
    assert!(!NodeKind::Method.is_leaf());
    assert_eq!(Expr::int(1).node_kind(), NodeKind::Constant);
    assert_eq!(Expr::block(vec![], vec![]).node_kind(), NodeKind::Block);
}

#[test]
fn test_factory_types() {
    let x = Variable::new("x", TypeHandle::INT32);
    assert_eq!(Expr::add(Expr::variable(&x), Expr::int(1)).ty, TypeHandle::INT32);
    assert_eq!(Expr::less_than(Expr::variable(&x), Expr::int(1)).ty, TypeHandle::BOOLEAN);
    assert!(Expr::if_then(Expr::bool(true), Expr::int(1)).is_void());
    assert_eq!(
        Expr::block(vec![], vec![Expr::comment("c"), Expr::string("s")]).ty,
        TypeHandle::STRING
    );
    assert!(Expr::block(vec![], vec![]).is_void());
    assert_eq!(Expr::type_of(TypeHandle::INT32).ty, TypeHandle::TYPE);
}

#[test]
fn test_for_each_child_visits_catch_filter_before_handler() {
    let filter = Expr::bool(true);
    let handler = Expr::string("handled");
    let body = Expr::string("body");
    let try_expr = Expr::try_catch(
        body,
        vec![CatchBlock::new(TypeHandle::OBJECT, None, handler).with_filter(filter)],
    );

    let mut kinds = Vec::new();
    try_expr.for_each_child(&mut |child| kinds.push(child.ty));
    assert_eq!(
        kinds,
        vec![TypeHandle::STRING, TypeHandle::BOOLEAN, TypeHandle::STRING]
    );
}

#[test]
fn test_references_variable() {
    let x = Variable::new("x", TypeHandle::INT32);
    let y = Variable::new("y", TypeHandle::INT32);
    let expr = Expr::block(
        vec![],
        vec![Expr::if_then(
            Expr::greater_than(Expr::variable(&x), Expr::int(0)),
            Expr::assign(&x, Expr::int(1)),
        )],
    );
    assert!(expr.references_variable(&x));
    assert!(!expr.references_variable(&y));
}

#[test]
fn test_custom_nodes_expose_children() {
    let pair = Expr::custom(
        Arc::new(Pair {
            left: Expr::int(1),
            right: Expr::int(2),
        }),
        TypeHandle::VOID,
    );
    assert_eq!(pair.node_kind(), NodeKind::Custom);
    assert_eq!(pair.node_count(), 3);

    let ExprKind::Custom(node) = &pair.kind else {
        panic!("expected a custom node");
    };
    assert_eq!(node.name(), "Pair");
    let rebuilt = node.rewrite(vec![Expr::int(3), Expr::int(4)]);
    assert_eq!(rebuilt.node_count(), 3);
}
