//! Tree rewriter: the single analysis walk over a method body.
//!
//! The rewriter consumes a body and rebuilds it node by node. On the way it
//! drives the [`ScopeTracker`], asks the extraction decision about every
//! block, hoists the blocks that must leave their position (see
//! `synthesis.rs`), feeds every typed node to the [`NamespaceCollector`], and
//! detects joinable first assignments.
//!
//! # Ancestor stack
//!
//! Every node with children pushes a frame `(kind, type, slot)` while its
//! children are visited; the slot is updated before each child so a block
//! can see both its parent and which child of the parent it is. Leaf nodes
//! push nothing.
//!
//! # Modes
//!
//! - Method mode rewrites the body of a model method and may extract blocks.
//! - Expression mode walks a free-standing expression: blocks always stay
//!   inline and undeclared variables are reported instead of rejected.

use crate::extraction::{self, Ancestor, ChildSlot};
use crate::namespaces::NamespaceCollector;
use crate::scope::{ScopeKind, ScopeTracker};
use rustc_hash::FxHashMap;
use sharpgen_common::limits::ANCESTOR_STACK_CAPACITY;
use sharpgen_common::{AnalysisOptions, Result};
use sharpgen_model::{
    AssignOp, BlockExpr, CatchBlock, Expr, ExprKind, LambdaExpr, MethodFlags, MethodId, NodeKind,
    SourceCode, SwitchCase, SwitchExpr, TryExpr, TypeDeclId, TypeHandle, TypeResolver, VarId,
    Variable,
};
use tracing::trace;

/// The method whose body is being rewritten.
#[derive(Copy, Clone, Debug)]
pub(crate) struct MethodContext {
    pub declaring_type: TypeDeclId,
    /// Flags inherited by block-methods hoisted out of this body.
    pub inherited_flags: MethodFlags,
}

pub(crate) struct Rewriter<'a> {
    /// `None` in expression mode.
    pub(crate) unit: Option<&'a mut SourceCode>,
    pub(crate) context: Option<MethodContext>,
    pub(crate) resolver: &'a dyn TypeResolver,
    pub(crate) options: &'a AnalysisOptions,
    pub(crate) scopes: ScopeTracker,
    pub(crate) ancestors: Vec<Ancestor>,
    pub(crate) namespaces: NamespaceCollector<'a>,
    /// Joined assignments per method being rewritten; the root method's
    /// list is at the bottom, each open block-method pushes its own.
    pub(crate) joined: Vec<Vec<VarId>>,
    /// Block-methods created by this walk, in creation order.
    pub(crate) synthesized: Vec<MethodId>,
    /// Chain of block-methods whose bodies are being rewritten.
    pub(crate) open_block_methods: Vec<MethodId>,
    /// Nested block-methods waiting for their parent to be finalized.
    pub(crate) pending_children: FxHashMap<MethodId, Vec<MethodId>>,
}

impl<'a> Rewriter<'a> {
    pub(crate) fn for_method(
        unit: &'a mut SourceCode,
        context: MethodContext,
        resolver: &'a dyn TypeResolver,
        options: &'a AnalysisOptions,
    ) -> Self {
        Self::new(Some(unit), Some(context), resolver, options)
    }

    pub(crate) fn for_expression(resolver: &'a dyn TypeResolver, options: &'a AnalysisOptions) -> Self {
        Self::new(None, None, resolver, options)
    }

    fn new(
        unit: Option<&'a mut SourceCode>,
        context: Option<MethodContext>,
        resolver: &'a dyn TypeResolver,
        options: &'a AnalysisOptions,
    ) -> Self {
        Rewriter {
            unit,
            context,
            resolver,
            options,
            scopes: ScopeTracker::new(),
            ancestors: Vec::with_capacity(ANCESTOR_STACK_CAPACITY),
            namespaces: NamespaceCollector::new(resolver, options),
            joined: vec![Vec::new()],
            synthesized: Vec::new(),
            open_block_methods: Vec::new(),
            pending_children: FxHashMap::default(),
        }
    }

    fn extracts_blocks(&self) -> bool {
        self.unit.is_some() && self.context.is_some()
    }

    // =========================================================================
    // Frames
    // =========================================================================

    fn enter(&mut self, kind: NodeKind, ty: TypeHandle) {
        self.ancestors.push(Ancestor::new(kind, ty));
    }

    fn leave(&mut self) {
        self.ancestors.pop();
    }

    /// Visit `expr` as the `slot` child of the innermost frame.
    fn child(&mut self, expr: Expr, slot: ChildSlot) -> Result<Expr> {
        if let Some(frame) = self.ancestors.last_mut() {
            frame.slot = slot;
        }
        self.visit(expr)
    }

    fn boxed(&mut self, expr: Box<Expr>, slot: ChildSlot) -> Result<Box<Expr>> {
        Ok(Box::new(self.child(*expr, slot)?))
    }

    fn optional(&mut self, expr: Option<Box<Expr>>, slot: ChildSlot) -> Result<Option<Box<Expr>>> {
        expr.map(|expr| self.boxed(expr, slot)).transpose()
    }

    fn all(&mut self, exprs: Vec<Expr>, slot: ChildSlot) -> Result<Vec<Expr>> {
        exprs
            .into_iter()
            .map(|expr| self.child(expr, slot))
            .collect()
    }

    // =========================================================================
    // Visitor
    // =========================================================================

    /// Rewrite one node and its subtree.
    pub(crate) fn visit(&mut self, expr: Expr) -> Result<Expr> {
        let Expr { kind, ty } = expr;
        self.namespaces.visit_node(&kind, ty);
        let node_kind = kind.node_kind();

        let kind = match kind {
            ExprKind::Variable(variable) => {
                self.scopes.access(&variable);
                ExprKind::Variable(variable)
            }
            leaf @ (ExprKind::Constant(_)
            | ExprKind::Default
            | ExprKind::DebugInfo(_)
            | ExprKind::Comment(_)) => leaf,
            ExprKind::Block(block) => {
                if self.extracts_blocks() && extraction::should_extract(&block, &self.ancestors) {
                    return self.extract_block(block, ty);
                }
                return self.visit_inline_block(block, ty);
            }
            kind => {
                self.enter(node_kind, ty);
                let rebuilt = self.visit_children(kind);
                self.leave();
                rebuilt?
            }
        };
        Ok(Expr::new(kind, ty))
    }

    fn visit_children(&mut self, kind: ExprKind) -> Result<ExprKind> {
        Ok(match kind {
            ExprKind::Unary { op, operand } => ExprKind::Unary {
                op,
                operand: self.boxed(operand, ChildSlot::Operand)?,
            },
            ExprKind::Binary { op, left, right } => ExprKind::Binary {
                op,
                left: self.boxed(left, ChildSlot::Operand)?,
                right: self.boxed(right, ChildSlot::Operand)?,
            },
            ExprKind::Assign { op, target, value } => ExprKind::Assign {
                op,
                target: self.boxed(target, ChildSlot::Operand)?,
                value: self.boxed(value, ChildSlot::Operand)?,
            },
            ExprKind::Conditional {
                test,
                if_true,
                if_false,
            } => ExprKind::Conditional {
                test: self.boxed(test, ChildSlot::Test)?,
                if_true: self.boxed(if_true, ChildSlot::IfTrue)?,
                if_false: self.optional(if_false, ChildSlot::IfFalse)?,
            },
            ExprKind::Loop {
                body,
                break_label,
                continue_label,
            } => ExprKind::Loop {
                body: self.boxed(body, ChildSlot::Body)?,
                break_label,
                continue_label,
            },
            ExprKind::Goto {
                kind,
                target,
                value,
            } => ExprKind::Goto {
                kind,
                target,
                value: self.optional(value, ChildSlot::Operand)?,
            },
            ExprKind::Label {
                target,
                default_value,
            } => ExprKind::Label {
                target,
                default_value: self.optional(default_value, ChildSlot::Operand)?,
            },
            ExprKind::Try(try_expr) => ExprKind::Try(self.visit_try(try_expr)?),
            ExprKind::Switch(switch) => ExprKind::Switch(self.visit_switch(switch)?),
            ExprKind::Lambda(lambda) => ExprKind::Lambda(self.visit_lambda(lambda)?),
            ExprKind::Quote(quoted) => ExprKind::Quote(self.boxed(quoted, ChildSlot::Body)?),
            ExprKind::Call {
                instance,
                method,
                arguments,
            } => ExprKind::Call {
                instance: self.optional(instance, ChildSlot::Instance)?,
                method,
                arguments: self.all(arguments, ChildSlot::Argument)?,
            },
            ExprKind::MethodCall { method, arguments } => ExprKind::MethodCall {
                method,
                arguments: self.all(arguments, ChildSlot::Argument)?,
            },
            ExprKind::Invoke { target, arguments } => ExprKind::Invoke {
                target: self.boxed(target, ChildSlot::Instance)?,
                arguments: self.all(arguments, ChildSlot::Argument)?,
            },
            ExprKind::Member { instance, member } => ExprKind::Member {
                instance: self.optional(instance, ChildSlot::Instance)?,
                member,
            },
            ExprKind::Index {
                instance,
                arguments,
            } => ExprKind::Index {
                instance: self.boxed(instance, ChildSlot::Instance)?,
                arguments: self.all(arguments, ChildSlot::Argument)?,
            },
            ExprKind::New { arguments } => ExprKind::New {
                arguments: self.all(arguments, ChildSlot::Argument)?,
            },
            ExprKind::NewArray { bounds, items } => ExprKind::NewArray {
                bounds,
                items: self.all(items, ChildSlot::Argument)?,
            },
            ExprKind::TypeTest {
                operand,
                type_operand,
            } => ExprKind::TypeTest {
                operand: self.boxed(operand, ChildSlot::Operand)?,
                type_operand,
            },
            ExprKind::Custom(node) => {
                let children = self.all(node.children(), ChildSlot::Argument)?;
                return Ok(node.rewrite(children).kind);
            }
            leaf @ (ExprKind::Constant(_)
            | ExprKind::Default
            | ExprKind::DebugInfo(_)
            | ExprKind::Variable(_)
            | ExprKind::Comment(_)
            | ExprKind::Block(_)) => leaf,
        })
    }

    fn visit_try(&mut self, try_expr: TryExpr) -> Result<TryExpr> {
        let TryExpr {
            body,
            handlers,
            finally,
            fault,
        } = try_expr;
        let body = self.boxed(body, ChildSlot::Body)?;
        let mut rewritten = Vec::with_capacity(handlers.len());
        for handler in handlers {
            rewritten.push(self.visit_catch(handler)?);
        }
        Ok(TryExpr {
            body,
            handlers: rewritten,
            finally: self.optional(finally, ChildSlot::Finally)?,
            fault: self.optional(fault, ChildSlot::Fault)?,
        })
    }

    /// The catch variable is in scope for the filter and the handler body.
    fn visit_catch(&mut self, handler: CatchBlock) -> Result<CatchBlock> {
        let CatchBlock {
            test,
            variable,
            filter,
            body,
        } = handler;
        self.scopes.enter_scope(ScopeKind::Nested, variable.as_slice());
        let visited = self.visit_catch_parts(filter, body);
        self.scopes.exit_scope();
        let (filter, body) = visited?;
        Ok(CatchBlock {
            test,
            variable,
            filter,
            body,
        })
    }

    fn visit_catch_parts(&mut self, filter: Option<Expr>, body: Expr) -> Result<(Option<Expr>, Expr)> {
        let filter = filter
            .map(|filter| self.child(filter, ChildSlot::CatchFilter))
            .transpose()?;
        let body = self.child(body, ChildSlot::CatchBody)?;
        Ok((filter, body))
    }

    fn visit_switch(&mut self, switch: SwitchExpr) -> Result<SwitchExpr> {
        let SwitchExpr {
            value,
            cases,
            default_body,
        } = switch;
        let value = self.boxed(value, ChildSlot::SwitchValue)?;
        let mut rewritten = Vec::with_capacity(cases.len());
        for case in cases {
            let test_values = self.all(case.test_values, ChildSlot::CaseTest)?;
            let body = self.child(case.body, ChildSlot::CaseBody)?;
            rewritten.push(SwitchCase { test_values, body });
        }
        Ok(SwitchExpr {
            value,
            cases: rewritten,
            default_body: self.optional(default_body, ChildSlot::DefaultBody)?,
        })
    }

    fn visit_lambda(&mut self, lambda: LambdaExpr) -> Result<LambdaExpr> {
        let LambdaExpr {
            name,
            parameters,
            body,
        } = lambda;
        self.scopes.enter_scope(ScopeKind::Nested, &parameters);
        let body = self.boxed(body, ChildSlot::Body);
        self.scopes.exit_scope();
        Ok(LambdaExpr {
            name,
            parameters,
            body: body?,
        })
    }

    /// A block that stays in place: its variables are visible to its own
    /// statements and everything nested in them.
    fn visit_inline_block(&mut self, block: BlockExpr, ty: TypeHandle) -> Result<Expr> {
        let BlockExpr {
            variables,
            expressions,
        } = block;
        self.scopes.enter_scope(ScopeKind::Nested, &variables);
        let expressions = self.visit_statements(NodeKind::Block, ty, &variables, expressions);
        self.scopes.exit_scope();
        Ok(Expr::block_typed(ty, variables, expressions?))
    }

    /// Visit the statements of a block whose variables are already declared
    /// in the current scope, then look for joinable assignments.
    pub(crate) fn visit_statements(
        &mut self,
        frame: NodeKind,
        ty: TypeHandle,
        variables: &[Variable],
        expressions: Vec<Expr>,
    ) -> Result<Vec<Expr>> {
        self.enter(frame, ty);
        let visited = self.all(expressions, ChildSlot::Statement);
        self.leave();
        let expressions = visited?;
        if self.options.join_assignments && !variables.is_empty() {
            self.collect_joined_assignments(variables, &expressions);
        }
        Ok(expressions)
    }

    // =========================================================================
    // Joined assignments
    // =========================================================================

    /// A block's first plain assignment to one of its own variables can be
    /// written as the variable's declaration when nothing before it touches
    /// the variable and its value does not read the variable.
    fn collect_joined_assignments(&mut self, variables: &[Variable], statements: &[Expr]) {
        let mut joined = Vec::new();
        for (index, statement) in statements.iter().enumerate() {
            let ExprKind::Assign {
                op: AssignOp::Assign,
                target,
                value,
            } = &statement.kind
            else {
                continue;
            };
            let Some(variable) = target.as_variable() else {
                continue;
            };
            if !variables.contains(variable) || joined.contains(&variable.id()) {
                continue;
            }
            let used_earlier = statements[..index]
                .iter()
                .any(|earlier| earlier.references_variable(variable));
            if used_earlier
                || value.references_variable(variable)
                || self.scopes.is_parameter_of_current_scope(variable)
            {
                continue;
            }
            trace!(variable = variable.name(), "joined assignment");
            joined.push(variable.id());
        }
        if let Some(current) = self.joined.last_mut() {
            current.extend(joined);
        }
    }
}

#[cfg(test)]
#[path = "../tests/rewriter_tests.rs"]
mod tests;
