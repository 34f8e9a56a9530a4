//! Constructors for expression nodes.
//!
//! These compute the node's static type the way the host expression API
//! does (comparisons are `bool`, a block has its last expression's type,
//! an `if` statement is `void`), so callers only pass types where the tree
//! cannot infer them.

use crate::expr::{
    AssignOp, BinaryOp, BlockExpr, CatchBlock, ConstantValue, CustomExpr, DebugMarker, Expr,
    ExprKind, GotoKind, Label, LambdaExpr, MemberInfo, MethodInfo, SwitchCase, SwitchExpr,
    TryExpr, UnaryOp, Variable,
};
use crate::model::MethodId;
use crate::types::TypeHandle;
use std::sync::Arc;

impl Expr {
    pub fn new(kind: ExprKind, ty: TypeHandle) -> Self {
        Expr { kind, ty }
    }

    // =========================================================================
    // Leaves
    // =========================================================================

    pub fn constant(value: ConstantValue, ty: TypeHandle) -> Self {
        Self::new(ExprKind::Constant(value), ty)
    }

    pub fn int(value: i32) -> Self {
        Self::constant(ConstantValue::Int(i64::from(value)), TypeHandle::INT32)
    }

    pub fn long(value: i64) -> Self {
        Self::constant(ConstantValue::Int(value), TypeHandle::INT64)
    }

    pub fn bool(value: bool) -> Self {
        Self::constant(ConstantValue::Bool(value), TypeHandle::BOOLEAN)
    }

    pub fn string(value: &str) -> Self {
        Self::constant(ConstantValue::String(Arc::from(value)), TypeHandle::STRING)
    }

    pub fn null(ty: TypeHandle) -> Self {
        Self::constant(ConstantValue::Null, ty)
    }

    /// `typeof(ty)`
    pub fn type_of(ty: TypeHandle) -> Self {
        Self::constant(ConstantValue::Type(ty), TypeHandle::TYPE)
    }

    /// `EnumType.Member`
    pub fn enum_member(enum_type: TypeHandle, member: &str) -> Self {
        Self::constant(ConstantValue::EnumMember(Arc::from(member)), enum_type)
    }

    pub fn default_value(ty: TypeHandle) -> Self {
        Self::new(ExprKind::Default, ty)
    }

    /// An empty statement: `default(void)`.
    pub fn empty() -> Self {
        Self::default_value(TypeHandle::VOID)
    }

    pub fn variable(variable: &Variable) -> Self {
        Self::new(ExprKind::Variable(variable.clone()), variable.ty())
    }

    pub fn comment(text: &str) -> Self {
        Self::new(ExprKind::Comment(Arc::from(text)), TypeHandle::VOID)
    }

    pub fn debug_info(document: &str, start_line: u32, end_line: u32) -> Self {
        Self::new(
            ExprKind::DebugInfo(DebugMarker {
                document: Arc::from(document),
                start_line,
                end_line,
                is_clear: false,
            }),
            TypeHandle::VOID,
        )
    }

    // =========================================================================
    // Operators
    // =========================================================================

    pub fn unary(op: UnaryOp, operand: Expr, ty: TypeHandle) -> Self {
        Self::new(
            ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
            ty,
        )
    }

    pub fn convert(operand: Expr, ty: TypeHandle) -> Self {
        Self::unary(UnaryOp::Convert, operand, ty)
    }

    pub fn negate(operand: Expr) -> Self {
        let ty = operand.ty;
        Self::unary(UnaryOp::Negate, operand, ty)
    }

    pub fn not(operand: Expr) -> Self {
        let ty = operand.ty;
        Self::unary(UnaryOp::Not, operand, ty)
    }

    pub fn throw(exception: Expr) -> Self {
        Self::unary(UnaryOp::Throw, exception, TypeHandle::VOID)
    }

    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        let ty = if op.is_boolean() {
            TypeHandle::BOOLEAN
        } else if op == BinaryOp::Coalesce {
            right.ty
        } else {
            left.ty
        };
        Self::new(
            ExprKind::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            ty,
        )
    }

    pub fn add(left: Expr, right: Expr) -> Self {
        Self::binary(BinaryOp::Add, left, right)
    }

    pub fn subtract(left: Expr, right: Expr) -> Self {
        Self::binary(BinaryOp::Subtract, left, right)
    }

    pub fn multiply(left: Expr, right: Expr) -> Self {
        Self::binary(BinaryOp::Multiply, left, right)
    }

    pub fn equal(left: Expr, right: Expr) -> Self {
        Self::binary(BinaryOp::Equal, left, right)
    }

    pub fn greater_than(left: Expr, right: Expr) -> Self {
        Self::binary(BinaryOp::GreaterThan, left, right)
    }

    pub fn less_than(left: Expr, right: Expr) -> Self {
        Self::binary(BinaryOp::LessThan, left, right)
    }

    pub fn assign(target: &Variable, value: Expr) -> Self {
        Self::assign_to(AssignOp::Assign, Self::variable(target), value)
    }

    pub fn assign_to(op: AssignOp, target: Expr, value: Expr) -> Self {
        let ty = target.ty;
        Self::new(
            ExprKind::Assign {
                op,
                target: Box::new(target),
                value: Box::new(value),
            },
            ty,
        )
    }

    // =========================================================================
    // Control Flow
    // =========================================================================

    /// Value-producing `test ? if_true : if_false`.
    pub fn condition(test: Expr, if_true: Expr, if_false: Expr) -> Self {
        let ty = if_true.ty;
        Self::new(
            ExprKind::Conditional {
                test: Box::new(test),
                if_true: Box::new(if_true),
                if_false: Some(Box::new(if_false)),
            },
            ty,
        )
    }

    /// `if (test) { if_true }`
    pub fn if_then(test: Expr, if_true: Expr) -> Self {
        Self::new(
            ExprKind::Conditional {
                test: Box::new(test),
                if_true: Box::new(if_true),
                if_false: None,
            },
            TypeHandle::VOID,
        )
    }

    /// `if (test) { if_true } else { if_false }`
    pub fn if_then_else(test: Expr, if_true: Expr, if_false: Expr) -> Self {
        Self::new(
            ExprKind::Conditional {
                test: Box::new(test),
                if_true: Box::new(if_true),
                if_false: Some(Box::new(if_false)),
            },
            TypeHandle::VOID,
        )
    }

    /// Block typed by its last expression (`void` when empty).
    pub fn block(variables: Vec<Variable>, expressions: Vec<Expr>) -> Self {
        let ty = expressions.last().map_or(TypeHandle::VOID, |last| last.ty);
        Self::block_typed(ty, variables, expressions)
    }

    pub fn block_typed(ty: TypeHandle, variables: Vec<Variable>, expressions: Vec<Expr>) -> Self {
        Self::new(
            ExprKind::Block(BlockExpr {
                variables,
                expressions,
            }),
            ty,
        )
    }

    pub fn loop_(body: Expr, break_label: Option<Label>, continue_label: Option<Label>) -> Self {
        let ty = break_label.as_ref().map_or(TypeHandle::VOID, Label::ty);
        Self::new(
            ExprKind::Loop {
                body: Box::new(body),
                break_label,
                continue_label,
            },
            ty,
        )
    }

    pub fn goto(kind: GotoKind, target: &Label, value: Option<Expr>) -> Self {
        Self::new(
            ExprKind::Goto {
                kind,
                target: target.clone(),
                value: value.map(Box::new),
            },
            TypeHandle::VOID,
        )
    }

    pub fn return_(target: &Label, value: Expr) -> Self {
        Self::goto(GotoKind::Return, target, Some(value))
    }

    pub fn break_(target: &Label) -> Self {
        Self::goto(GotoKind::Break, target, None)
    }

    pub fn label(target: &Label, default_value: Option<Expr>) -> Self {
        Self::new(
            ExprKind::Label {
                target: target.clone(),
                default_value: default_value.map(Box::new),
            },
            target.ty(),
        )
    }

    pub fn try_expr(try_expr: TryExpr) -> Self {
        let ty = try_expr.body.ty;
        Self::new(ExprKind::Try(try_expr), ty)
    }

    pub fn try_catch(body: Expr, handlers: Vec<CatchBlock>) -> Self {
        Self::try_expr(TryExpr {
            body: Box::new(body),
            handlers,
            finally: None,
            fault: None,
        })
    }

    pub fn try_finally(body: Expr, finally: Expr) -> Self {
        Self::try_expr(TryExpr {
            body: Box::new(body),
            handlers: Vec::new(),
            finally: Some(Box::new(finally)),
            fault: None,
        })
    }

    pub fn switch(value: Expr, cases: Vec<SwitchCase>, default_body: Option<Expr>) -> Self {
        let ty = default_body
            .as_ref()
            .map(|body| body.ty)
            .or_else(|| cases.first().map(|case| case.body.ty))
            .unwrap_or(TypeHandle::VOID);
        Self::new(
            ExprKind::Switch(SwitchExpr {
                value: Box::new(value),
                cases,
                default_body: default_body.map(Box::new),
            }),
            ty,
        )
    }

    pub fn lambda(parameters: Vec<Variable>, body: Expr, delegate_type: TypeHandle) -> Self {
        Self::new(
            ExprKind::Lambda(LambdaExpr {
                name: None,
                parameters,
                body: Box::new(body),
            }),
            delegate_type,
        )
    }

    pub fn named_lambda(
        name: &str,
        parameters: Vec<Variable>,
        body: Expr,
        delegate_type: TypeHandle,
    ) -> Self {
        Self::new(
            ExprKind::Lambda(LambdaExpr {
                name: Some(Arc::from(name)),
                parameters,
                body: Box::new(body),
            }),
            delegate_type,
        )
    }

    pub fn quote(lambda: Expr) -> Self {
        let ty = lambda.ty;
        Self::new(ExprKind::Quote(Box::new(lambda)), ty)
    }

    // =========================================================================
    // Calls, Members and Construction
    // =========================================================================

    pub fn call(instance: Option<Expr>, method: MethodInfo, arguments: Vec<Expr>) -> Self {
        let ty = method.return_type;
        Self::new(
            ExprKind::Call {
                instance: instance.map(Box::new),
                method: Arc::new(method),
                arguments,
            },
            ty,
        )
    }

    pub fn call_static(method: MethodInfo, arguments: Vec<Expr>) -> Self {
        Self::call(None, method, arguments)
    }

    /// Call to a method of the model being generated.
    pub fn method_call(method: MethodId, arguments: Vec<Expr>, return_type: TypeHandle) -> Self {
        Self::new(ExprKind::MethodCall { method, arguments }, return_type)
    }

    pub fn invoke(target: Expr, arguments: Vec<Expr>, ty: TypeHandle) -> Self {
        Self::new(
            ExprKind::Invoke {
                target: Box::new(target),
                arguments,
            },
            ty,
        )
    }

    pub fn member(instance: Option<Expr>, member: MemberInfo) -> Self {
        let ty = member.ty;
        Self::new(
            ExprKind::Member {
                instance: instance.map(Box::new),
                member: Arc::new(member),
            },
            ty,
        )
    }

    pub fn index(instance: Expr, arguments: Vec<Expr>, ty: TypeHandle) -> Self {
        Self::new(
            ExprKind::Index {
                instance: Box::new(instance),
                arguments,
            },
            ty,
        )
    }

    pub fn new_object(ty: TypeHandle, arguments: Vec<Expr>) -> Self {
        Self::new(ExprKind::New { arguments }, ty)
    }

    pub fn new_array_init(array_type: TypeHandle, items: Vec<Expr>) -> Self {
        Self::new(
            ExprKind::NewArray {
                bounds: false,
                items,
            },
            array_type,
        )
    }

    pub fn new_array_bounds(array_type: TypeHandle, bounds: Vec<Expr>) -> Self {
        Self::new(
            ExprKind::NewArray {
                bounds: true,
                items: bounds,
            },
            array_type,
        )
    }

    pub fn type_is(operand: Expr, type_operand: TypeHandle) -> Self {
        Self::new(
            ExprKind::TypeTest {
                operand: Box::new(operand),
                type_operand,
            },
            TypeHandle::BOOLEAN,
        )
    }

    pub fn custom(node: Arc<dyn CustomExpr>, ty: TypeHandle) -> Self {
        Self::new(ExprKind::Custom(node), ty)
    }
}

impl CatchBlock {
    pub fn new(test: TypeHandle, variable: Option<Variable>, body: Expr) -> Self {
        CatchBlock {
            test,
            variable,
            filter: None,
            body,
        }
    }

    #[must_use]
    pub fn with_filter(mut self, filter: Expr) -> Self {
        self.filter = Some(filter);
        self
    }
}

impl SwitchCase {
    pub fn new(test_values: Vec<Expr>, body: Expr) -> Self {
        SwitchCase { test_values, body }
    }
}
