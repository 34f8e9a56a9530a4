use super::*;
use sharpgen_model::{Expr, Variable};

fn non_empty_block() -> BlockExpr {
    BlockExpr {
        variables: vec![Variable::new("y", TypeHandle::INT32)],
        expressions: vec![Expr::int(1)],
    }
}

fn frame(kind: NodeKind, ty: TypeHandle, slot: ChildSlot) -> Ancestor {
    Ancestor { kind, ty, slot }
}

#[test]
fn test_empty_block_is_never_extracted() {
    let empty = BlockExpr {
        variables: vec![],
        expressions: vec![],
    };
    let ancestors = [frame(NodeKind::Binary, TypeHandle::INT32, ChildSlot::Operand)];
    assert!(!should_extract(&empty, &ancestors));
}

#[test]
fn test_block_without_parent_stays() {
    assert!(!should_extract(&non_empty_block(), &[]));
}

#[test]
fn test_native_block_hosts() {
    let block = non_empty_block();
    for kind in [
        NodeKind::Block,
        NodeKind::Lambda,
        NodeKind::Loop,
        NodeKind::Quote,
        NodeKind::Method,
    ] {
        let ancestors = [frame(kind, TypeHandle::VOID, ChildSlot::Body)];
        assert!(!should_extract(&block, &ancestors), "{kind:?} hosts blocks");
    }
}

#[test]
fn test_expression_positions_force_extraction() {
    let block = non_empty_block();
    for (kind, slot) in [
        (NodeKind::Binary, ChildSlot::Operand),
        (NodeKind::Call, ChildSlot::Argument),
        (NodeKind::Assign, ChildSlot::Operand),
        (NodeKind::New, ChildSlot::Argument),
        (NodeKind::Custom, ChildSlot::Argument),
    ] {
        let ancestors = [frame(kind, TypeHandle::INT32, slot)];
        assert!(should_extract(&block, &ancestors), "{kind:?} forces extraction");
    }
}

#[test]
fn test_try_slots() {
    let block = non_empty_block();
    for slot in [ChildSlot::Body, ChildSlot::CatchBody, ChildSlot::Finally, ChildSlot::Fault] {
        let ancestors = [frame(NodeKind::Try, TypeHandle::VOID, slot)];
        assert!(!should_extract(&block, &ancestors));
    }
    let filter = [frame(NodeKind::Try, TypeHandle::VOID, ChildSlot::CatchFilter)];
    assert!(should_extract(&block, &filter));
}

#[test]
fn test_switch_slots() {
    let block = non_empty_block();
    let case_body = [frame(NodeKind::Switch, TypeHandle::VOID, ChildSlot::CaseBody)];
    let default_body = [frame(NodeKind::Switch, TypeHandle::VOID, ChildSlot::DefaultBody)];
    let value = [frame(NodeKind::Switch, TypeHandle::VOID, ChildSlot::SwitchValue)];
    assert!(!should_extract(&block, &case_body));
    assert!(!should_extract(&block, &default_body));
    assert!(should_extract(&block, &value));
}

#[test]
fn test_conditional_statement_branches_stay() {
    let block = non_empty_block();
    let ancestors = [
        frame(NodeKind::Method, TypeHandle::INT32, ChildSlot::Statement),
        frame(NodeKind::Block, TypeHandle::VOID, ChildSlot::Statement),
        frame(NodeKind::Conditional, TypeHandle::VOID, ChildSlot::IfFalse),
    ];
    assert!(!should_extract(&block, &ancestors));
}

#[test]
fn test_conditional_test_is_extracted() {
    let block = non_empty_block();
    let ancestors = [
        frame(NodeKind::Block, TypeHandle::VOID, ChildSlot::Statement),
        frame(NodeKind::Conditional, TypeHandle::VOID, ChildSlot::Test),
    ];
    assert!(should_extract(&block, &ancestors));
}

#[test]
fn test_value_conditional_inside_expression_is_extracted() {
    let block = non_empty_block();
    let ancestors = [
        frame(NodeKind::Block, TypeHandle::VOID, ChildSlot::Statement),
        frame(NodeKind::Binary, TypeHandle::INT32, ChildSlot::Operand),
        frame(NodeKind::Conditional, TypeHandle::INT32, ChildSlot::IfTrue),
    ];
    assert!(should_extract(&block, &ancestors));
}

#[test]
fn test_value_conditional_in_statement_host_keeps_branches() {
    let block = non_empty_block();
    let ancestors = [
        frame(NodeKind::Method, TypeHandle::INT32, ChildSlot::Statement),
        frame(NodeKind::Conditional, TypeHandle::INT32, ChildSlot::IfTrue),
    ];
    assert!(!should_extract(&block, &ancestors));
}

#[test]
fn test_nested_statement_conditionals() {
    let block = non_empty_block();
    let ancestors = [
        frame(NodeKind::Block, TypeHandle::VOID, ChildSlot::Statement),
        frame(NodeKind::Conditional, TypeHandle::VOID, ChildSlot::IfTrue),
        frame(NodeKind::Conditional, TypeHandle::INT32, ChildSlot::IfFalse),
    ];
    assert!(!should_extract(&block, &ancestors));
}
