//! Expression tree for generated method bodies.
//!
//! An [`Expr`] is a tagged union of node variants plus its static type.
//! Trees are owned top-down; the only cross-reference is
//! [`ExprKind::MethodCall`], which names a model method by [`MethodId`]
//! without owning it.
//!
//! # Node kinds
//!
//! [`NodeKind`] is the fieldless discriminant of [`ExprKind`]. The analysis
//! keeps a stack of `NodeKind`s for the ancestors of the node being visited
//! so it can ask "what is my parent" without re-entering the visitor.
//!
//! # Extension nodes
//!
//! Hosts that need node kinds the tree does not model can implement
//! [`CustomExpr`] and wrap it in [`ExprKind::Custom`]. Custom nodes expose
//! their children and rebuild themselves from rewritten children, so they
//! take part in every walk like a builtin node.

use crate::model::MethodId;
use crate::types::TypeHandle;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

/// Global counter for variable identities.
static NEXT_VARIABLE_ID: AtomicU32 = AtomicU32::new(1);

/// Global counter for label identities.
static NEXT_LABEL_ID: AtomicU32 = AtomicU32::new(1);

// =============================================================================
// Variables and Labels
// =============================================================================

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(pub u32);

/// A parameter or local variable. Two variables are the same variable only
/// if they were created by the same `Variable::new` call; names may repeat.
#[derive(Clone, Debug)]
pub struct Variable {
    id: VarId,
    name: Arc<str>,
    ty: TypeHandle,
}

impl Variable {
    pub fn new(name: impl Into<Arc<str>>, ty: TypeHandle) -> Self {
        Variable {
            id: VarId(NEXT_VARIABLE_ID.fetch_add(1, Ordering::Relaxed)),
            name: name.into(),
            ty,
        }
    }

    pub fn id(&self) -> VarId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> TypeHandle {
        self.ty
    }
}

impl PartialEq for Variable {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Variable {}

impl Hash for Variable {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct LabelId(pub u32);

/// Jump target for `goto`, `return`, `break` and `continue`.
#[derive(Clone, Debug)]
pub struct Label {
    id: LabelId,
    name: Option<Arc<str>>,
    ty: TypeHandle,
}

impl Label {
    pub fn new(name: Option<&str>, ty: TypeHandle) -> Self {
        Label {
            id: LabelId(NEXT_LABEL_ID.fetch_add(1, Ordering::Relaxed)),
            name: name.map(Arc::from),
            ty,
        }
    }

    pub fn id(&self) -> LabelId {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn ty(&self) -> TypeHandle {
        self.ty
    }
}

impl PartialEq for Label {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Label {}

// =============================================================================
// Operators and Values
// =============================================================================

#[derive(Clone, Debug, PartialEq)]
pub enum ConstantValue {
    Null,
    Bool(bool),
    Char(char),
    Int(i64),
    UInt(u64),
    Float(f64),
    String(Arc<str>),
    /// `typeof(T)`
    Type(TypeHandle),
    /// A named member of the expression's enum type.
    EnumMember(Arc<str>),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Negate,
    Not,
    OnesComplement,
    /// `(T)x` - the target type is the node's type.
    Convert,
    /// `x as T`
    TypeAs,
    PreIncrement,
    PreDecrement,
    PostIncrement,
    PostDecrement,
    Throw,
    ArrayLength,
}

impl UnaryOp {
    /// Whether the emitted form spells out the node's type.
    pub fn writes_type(self) -> bool {
        matches!(self, UnaryOp::Convert | UnaryOp::TypeAs)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    And,
    Or,
    ExclusiveOr,
    AndAlso,
    OrElse,
    Equal,
    NotEqual,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    LeftShift,
    RightShift,
    Coalesce,
    ArrayIndex,
}

impl BinaryOp {
    /// Operators whose result is always `bool`.
    pub fn is_boolean(self) -> bool {
        matches!(
            self,
            BinaryOp::AndAlso
                | BinaryOp::OrElse
                | BinaryOp::Equal
                | BinaryOp::NotEqual
                | BinaryOp::LessThan
                | BinaryOp::LessThanOrEqual
                | BinaryOp::GreaterThan
                | BinaryOp::GreaterThanOrEqual
        )
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AssignOp {
    Assign,
    AddAssign,
    SubtractAssign,
    MultiplyAssign,
    DivideAssign,
    ModuloAssign,
    AndAssign,
    OrAssign,
    ExclusiveOrAssign,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum GotoKind {
    Goto,
    Return,
    Break,
    Continue,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DebugMarker {
    pub document: Arc<str>,
    pub start_line: u32,
    pub end_line: u32,
    /// A clearance marker resets sequence-point tracking.
    pub is_clear: bool,
}

// =============================================================================
// Compound Node Payloads
// =============================================================================

/// `{ variables; expressions }`. The block's value is its last expression.
#[derive(Clone, Debug)]
pub struct BlockExpr {
    pub variables: Vec<Variable>,
    pub expressions: Vec<Expr>,
}

impl BlockExpr {
    /// A block with no statements and no variables.
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty() && self.expressions.is_empty()
    }
}

#[derive(Clone, Debug)]
pub struct CatchBlock {
    /// Caught exception type.
    pub test: TypeHandle,
    pub variable: Option<Variable>,
    /// `when (...)` clause.
    pub filter: Option<Expr>,
    pub body: Expr,
}

#[derive(Clone, Debug)]
pub struct TryExpr {
    pub body: Box<Expr>,
    pub handlers: Vec<CatchBlock>,
    pub finally: Option<Box<Expr>>,
    pub fault: Option<Box<Expr>>,
}

#[derive(Clone, Debug)]
pub struct SwitchCase {
    pub test_values: Vec<Expr>,
    pub body: Expr,
}

#[derive(Clone, Debug)]
pub struct SwitchExpr {
    pub value: Box<Expr>,
    pub cases: Vec<SwitchCase>,
    pub default_body: Option<Box<Expr>>,
}

#[derive(Clone, Debug)]
pub struct LambdaExpr {
    pub name: Option<Arc<str>>,
    pub parameters: Vec<Variable>,
    pub body: Box<Expr>,
}

/// An external (host-library) method referenced by a call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MethodInfo {
    pub name: Arc<str>,
    pub declaring_type: TypeHandle,
    pub return_type: TypeHandle,
    pub is_static: bool,
    /// Declared as `static M(this T x, ...)`; written as an instance call.
    pub is_extension: bool,
    /// Closed type arguments of a generic method call.
    pub generic_arguments: Vec<TypeHandle>,
    /// Parameter types of the generic *definition*; may mention
    /// method generic-parameter placeholders.
    pub parameter_types: Vec<TypeHandle>,
}

impl MethodInfo {
    pub fn new(name: &str, declaring_type: TypeHandle, return_type: TypeHandle) -> Self {
        MethodInfo {
            name: Arc::from(name),
            declaring_type,
            return_type,
            is_static: false,
            is_extension: false,
            generic_arguments: Vec::new(),
            parameter_types: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_static(mut self) -> Self {
        self.is_static = true;
        self
    }

    #[must_use]
    pub fn with_extension(mut self) -> Self {
        self.is_static = true;
        self.is_extension = true;
        self
    }

    #[must_use]
    pub fn with_parameter_types(mut self, parameter_types: Vec<TypeHandle>) -> Self {
        self.parameter_types = parameter_types;
        self
    }

    #[must_use]
    pub fn with_generic_arguments(mut self, generic_arguments: Vec<TypeHandle>) -> Self {
        self.generic_arguments = generic_arguments;
        self
    }

    pub fn is_generic(&self) -> bool {
        !self.generic_arguments.is_empty()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MemberKind {
    Field,
    Property,
}

/// An external field or property referenced by a member access.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemberInfo {
    pub name: Arc<str>,
    pub declaring_type: TypeHandle,
    pub ty: TypeHandle,
    pub kind: MemberKind,
    pub is_static: bool,
}

impl MemberInfo {
    pub fn new(name: &str, declaring_type: TypeHandle, ty: TypeHandle, kind: MemberKind) -> Self {
        MemberInfo {
            name: Arc::from(name),
            declaring_type,
            ty,
            kind,
            is_static: false,
        }
    }

    #[must_use]
    pub fn with_static(mut self) -> Self {
        self.is_static = true;
        self
    }
}

/// Capability interface for host-defined node kinds.
pub trait CustomExpr: fmt::Debug + Send + Sync {
    /// Short name used in diagnostics.
    fn name(&self) -> &str;

    /// Children in evaluation order.
    fn children(&self) -> Vec<Expr>;

    /// Rebuild this node from rewritten children, given in the order
    /// `children()` returned them.
    fn rewrite(&self, children: Vec<Expr>) -> Expr;
}

// =============================================================================
// Expr
// =============================================================================

#[derive(Clone, Debug)]
pub struct Expr {
    pub kind: ExprKind,
    /// Static type of the node's value (`VOID` for statements).
    pub ty: TypeHandle,
}

#[derive(Clone, Debug)]
pub enum ExprKind {
    Constant(ConstantValue),
    /// `default(T)` - `T` is the node's type.
    Default,
    DebugInfo(DebugMarker),
    Variable(Variable),
    Comment(Arc<str>),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Assign {
        op: AssignOp,
        target: Box<Expr>,
        value: Box<Expr>,
    },
    Conditional {
        test: Box<Expr>,
        if_true: Box<Expr>,
        if_false: Option<Box<Expr>>,
    },
    Block(BlockExpr),
    Loop {
        body: Box<Expr>,
        break_label: Option<Label>,
        continue_label: Option<Label>,
    },
    Goto {
        kind: GotoKind,
        target: Label,
        value: Option<Box<Expr>>,
    },
    Label {
        target: Label,
        default_value: Option<Box<Expr>>,
    },
    Try(TryExpr),
    Switch(SwitchExpr),
    Lambda(LambdaExpr),
    Quote(Box<Expr>),
    /// Call to an external method.
    Call {
        instance: Option<Box<Expr>>,
        method: Arc<MethodInfo>,
        arguments: Vec<Expr>,
    },
    /// Call to a method of the model being generated.
    MethodCall {
        method: MethodId,
        arguments: Vec<Expr>,
    },
    Invoke {
        target: Box<Expr>,
        arguments: Vec<Expr>,
    },
    Member {
        instance: Option<Box<Expr>>,
        member: Arc<MemberInfo>,
    },
    Index {
        instance: Box<Expr>,
        arguments: Vec<Expr>,
    },
    /// `new T(arguments)` - `T` is the node's type.
    New {
        arguments: Vec<Expr>,
    },
    /// `new E[] { items }` or `new E[bounds]` - the node's type is the
    /// array type.
    NewArray {
        bounds: bool,
        items: Vec<Expr>,
    },
    /// `operand is T`
    TypeTest {
        operand: Box<Expr>,
        type_operand: TypeHandle,
    },
    Custom(Arc<dyn CustomExpr>),
}

/// Fieldless discriminant of [`ExprKind`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Constant,
    Default,
    DebugInfo,
    Variable,
    Comment,
    Unary,
    Binary,
    Assign,
    Conditional,
    Block,
    Loop,
    Goto,
    Label,
    Try,
    Switch,
    Lambda,
    Quote,
    Call,
    MethodCall,
    Invoke,
    Member,
    Index,
    New,
    NewArray,
    TypeTest,
    Custom,
    /// Not an expression variant: the root frame of a method body.
    Method,
}

impl NodeKind {
    /// Leaf kinds never host children, so they are never ancestors.
    pub fn is_leaf(self) -> bool {
        matches!(
            self,
            NodeKind::Constant
                | NodeKind::Default
                | NodeKind::DebugInfo
                | NodeKind::Variable
                | NodeKind::Comment
        )
    }
}

impl ExprKind {
    pub fn node_kind(&self) -> NodeKind {
        match self {
            ExprKind::Constant(_) => NodeKind::Constant,
            ExprKind::Default => NodeKind::Default,
            ExprKind::DebugInfo(_) => NodeKind::DebugInfo,
            ExprKind::Variable(_) => NodeKind::Variable,
            ExprKind::Comment(_) => NodeKind::Comment,
            ExprKind::Unary { .. } => NodeKind::Unary,
            ExprKind::Binary { .. } => NodeKind::Binary,
            ExprKind::Assign { .. } => NodeKind::Assign,
            ExprKind::Conditional { .. } => NodeKind::Conditional,
            ExprKind::Block(_) => NodeKind::Block,
            ExprKind::Loop { .. } => NodeKind::Loop,
            ExprKind::Goto { .. } => NodeKind::Goto,
            ExprKind::Label { .. } => NodeKind::Label,
            ExprKind::Try(_) => NodeKind::Try,
            ExprKind::Switch(_) => NodeKind::Switch,
            ExprKind::Lambda(_) => NodeKind::Lambda,
            ExprKind::Quote(_) => NodeKind::Quote,
            ExprKind::Call { .. } => NodeKind::Call,
            ExprKind::MethodCall { .. } => NodeKind::MethodCall,
            ExprKind::Invoke { .. } => NodeKind::Invoke,
            ExprKind::Member { .. } => NodeKind::Member,
            ExprKind::Index { .. } => NodeKind::Index,
            ExprKind::New { .. } => NodeKind::New,
            ExprKind::NewArray { .. } => NodeKind::NewArray,
            ExprKind::TypeTest { .. } => NodeKind::TypeTest,
            ExprKind::Custom(_) => NodeKind::Custom,
        }
    }
}

impl Expr {
    pub fn node_kind(&self) -> NodeKind {
        self.kind.node_kind()
    }

    pub fn is_void(&self) -> bool {
        self.ty.is_void()
    }

    pub fn as_block(&self) -> Option<&BlockExpr> {
        match &self.kind {
            ExprKind::Block(block) => Some(block),
            _ => None,
        }
    }

    pub fn as_variable(&self) -> Option<&Variable> {
        match &self.kind {
            ExprKind::Variable(variable) => Some(variable),
            _ => None,
        }
    }

    /// Call `f` on each direct child expression, in evaluation order.
    pub fn for_each_child(&self, f: &mut dyn FnMut(&Expr)) {
        match &self.kind {
            ExprKind::Constant(_)
            | ExprKind::Default
            | ExprKind::DebugInfo(_)
            | ExprKind::Variable(_)
            | ExprKind::Comment(_) => {}
            ExprKind::Unary { operand, .. } => f(operand),
            ExprKind::Binary { left, right, .. } => {
                f(left);
                f(right);
            }
            ExprKind::Assign { target, value, .. } => {
                f(target);
                f(value);
            }
            ExprKind::Conditional {
                test,
                if_true,
                if_false,
            } => {
                f(test);
                f(if_true);
                if let Some(if_false) = if_false {
                    f(if_false);
                }
            }
            ExprKind::Block(block) => block.expressions.iter().for_each(|e| f(e)),
            ExprKind::Loop { body, .. } => f(body),
            ExprKind::Goto { value, .. } => {
                if let Some(value) = value {
                    f(value);
                }
            }
            ExprKind::Label { default_value, .. } => {
                if let Some(value) = default_value {
                    f(value);
                }
            }
            ExprKind::Try(try_expr) => {
                f(&try_expr.body);
                for handler in &try_expr.handlers {
                    if let Some(filter) = &handler.filter {
                        f(filter);
                    }
                    f(&handler.body);
                }
                if let Some(finally) = &try_expr.finally {
                    f(finally);
                }
                if let Some(fault) = &try_expr.fault {
                    f(fault);
                }
            }
            ExprKind::Switch(switch) => {
                f(&switch.value);
                for case in &switch.cases {
                    case.test_values.iter().for_each(|e| f(e));
                    f(&case.body);
                }
                if let Some(default_body) = &switch.default_body {
                    f(default_body);
                }
            }
            ExprKind::Lambda(lambda) => f(&lambda.body),
            ExprKind::Quote(quoted) => f(quoted),
            ExprKind::Call {
                instance,
                arguments,
                ..
            } => {
                if let Some(instance) = instance {
                    f(instance);
                }
                arguments.iter().for_each(|e| f(e));
            }
            ExprKind::MethodCall { arguments, .. } => arguments.iter().for_each(|e| f(e)),
            ExprKind::Invoke { target, arguments } => {
                f(target);
                arguments.iter().for_each(|e| f(e));
            }
            ExprKind::Member { instance, .. } => {
                if let Some(instance) = instance {
                    f(instance);
                }
            }
            ExprKind::Index {
                instance,
                arguments,
            } => {
                f(instance);
                arguments.iter().for_each(|e| f(e));
            }
            ExprKind::New { arguments } => arguments.iter().for_each(|e| f(e)),
            ExprKind::NewArray { items, .. } => items.iter().for_each(|e| f(e)),
            ExprKind::TypeTest { operand, .. } => f(operand),
            ExprKind::Custom(custom) => custom.children().iter().for_each(|e| f(e)),
        }
    }

    /// Whether `variable` is read or written anywhere in this subtree.
    pub fn references_variable(&self, variable: &Variable) -> bool {
        if let ExprKind::Variable(v) = &self.kind {
            return v == variable;
        }
        let mut found = false;
        self.for_each_child(&mut |child| {
            if !found && child.references_variable(variable) {
                found = true;
            }
        });
        found
    }

    /// Number of nodes in this subtree, including this one.
    pub fn node_count(&self) -> usize {
        let mut count = 1;
        self.for_each_child(&mut |child| count += child.node_count());
        count
    }
}

#[cfg(test)]
#[path = "../tests/expr_tests.rs"]
mod tests;
