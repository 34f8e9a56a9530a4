//! Block extraction decision.
//!
//! C# can only host a multi-statement block in statement position. The
//! expression tree allows a block anywhere (as a call argument, as the
//! operand of `+`, as a `?:` branch), so those blocks are hoisted into their
//! own private method and replaced with a call.
//!
//! The decision only needs the block itself and the stack of its ancestors:
//!
//! | Parent | Slot | Extract |
//! |--------|------|---------|
//! | Block, Lambda, Loop, Quote, Method | any | no |
//! | Try | catch filter | yes |
//! | Try | body, handler, finally, fault | no |
//! | Switch | case body, default body | no |
//! | Switch | switched value, case test | yes |
//! | Conditional | branch, conditional in statement position | no |
//! | Conditional | test, or branch of a value-producing `?:` | yes |
//! | anything else | any | yes |
//!
//! Empty blocks are never extracted.

use sharpgen_model::{BlockExpr, NodeKind, TypeHandle};
use tracing::trace;

/// Which child of its parent the node being visited is.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ChildSlot {
    Statement,
    Operand,
    Test,
    IfTrue,
    IfFalse,
    Body,
    CatchFilter,
    CatchBody,
    Finally,
    Fault,
    SwitchValue,
    CaseTest,
    CaseBody,
    DefaultBody,
    Instance,
    Argument,
}

/// One frame of the ancestor stack: a node that has children, its static
/// type, and the slot of the child currently being visited.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Ancestor {
    pub kind: NodeKind,
    pub ty: TypeHandle,
    pub slot: ChildSlot,
}

impl Ancestor {
    pub fn new(kind: NodeKind, ty: TypeHandle) -> Self {
        Ancestor {
            kind,
            ty,
            slot: ChildSlot::Statement,
        }
    }

    /// Root frame of a method body.
    pub fn method(return_type: TypeHandle) -> Self {
        Self::new(NodeKind::Method, return_type)
    }
}

/// Decide whether `block`, whose ancestors are `ancestors` (innermost
/// last), must be hoisted into its own method.
pub fn should_extract(block: &BlockExpr, ancestors: &[Ancestor]) -> bool {
    if block.is_empty() {
        return false;
    }
    let Some((parent, above)) = ancestors.split_last() else {
        return false;
    };
    let extract = match parent.kind {
        NodeKind::Block | NodeKind::Lambda | NodeKind::Loop | NodeKind::Quote | NodeKind::Method => {
            false
        }
        NodeKind::Try => parent.slot == ChildSlot::CatchFilter,
        NodeKind::Switch => !matches!(parent.slot, ChildSlot::CaseBody | ChildSlot::DefaultBody),
        NodeKind::Conditional => {
            let in_branch = matches!(parent.slot, ChildSlot::IfTrue | ChildSlot::IfFalse);
            !(in_branch && is_statement_position(parent.ty, above))
        }
        _ => true,
    };
    trace!(parent = ?parent.kind, slot = ?parent.slot, extract, "block extraction decision");
    extract
}

/// Whether a node of type `ty`, whose ancestors are `ancestors`, can be
/// written as a statement.
fn is_statement_position(ty: TypeHandle, ancestors: &[Ancestor]) -> bool {
    ty.is_void() || hosts_statements(ancestors)
}

/// Whether the innermost frame of `ancestors` accepts a statement in its
/// current slot.
fn hosts_statements(ancestors: &[Ancestor]) -> bool {
    let Some((parent, above)) = ancestors.split_last() else {
        return true;
    };
    match parent.kind {
        NodeKind::Block | NodeKind::Lambda | NodeKind::Loop | NodeKind::Quote | NodeKind::Method => {
            true
        }
        NodeKind::Try => parent.slot != ChildSlot::CatchFilter,
        NodeKind::Switch => matches!(parent.slot, ChildSlot::CaseBody | ChildSlot::DefaultBody),
        NodeKind::Conditional => {
            matches!(parent.slot, ChildSlot::IfTrue | ChildSlot::IfFalse)
                && is_statement_position(parent.ty, above)
        }
        _ => false,
    }
}

#[cfg(test)]
#[path = "../tests/extraction_tests.rs"]
mod tests;
