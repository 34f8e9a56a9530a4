//! Block-method synthesis.
//!
//! Hoisting a block creates a private method on the declaring type of the
//! method being rewritten, analyzes the block's contents as that method's
//! body in a fresh [`ScopeKind::BlockMethod`] scope, and replaces the block
//! with a call passing the escaping variables as arguments.
//!
//! # Finalization order
//!
//! Naming is deferred until the method's body and parameters are fixed.
//! A block-method hoisted directly out of a declared method is finalized as
//! soon as its body is done; one hoisted out of another block-method waits
//! until its parent is finalized. Finalizing a method then finalizes its
//! waiting children in creation order, so names are assigned outer before
//! inner and left to right.

use crate::extraction::Ancestor;
use crate::naming;
use crate::rewriter::Rewriter;
use crate::scope::ScopeKind;
use sharpgen_common::{AnalysisError, Result};
use sharpgen_model::{
    BlockExpr, Expr, MethodAnalysis, MethodFlags, MethodId, MethodModel, NodeKind, SourceCode,
    TypeHandle,
};
use std::sync::Arc;
use tracing::debug;

impl Rewriter<'_> {
    /// Hoist `block` (of type `ty`) into a new block-method and return the
    /// call that replaces it.
    pub(crate) fn extract_block(&mut self, block: BlockExpr, ty: TypeHandle) -> Result<Expr> {
        let Some(context) = self.context else {
            return Err(AnalysisError::invalid_structure(
                "block extraction outside a method",
            ));
        };
        let parent = self.open_block_methods.last().copied();
        let method = MethodModel::block_method(
            context.declaring_type,
            ty,
            context.inherited_flags & MethodFlags::STATIC,
            parent,
        );
        let id = self.unit_mut()?.push_method(context.declaring_type, method);
        self.synthesized.push(id);
        debug!(
            method = id.0,
            parent = ?parent.map(|p| p.0),
            statements = block.expressions.len(),
            "extracting block into block-method"
        );

        // The return type is written in the new method's signature.
        self.namespaces.visit_type(ty);

        let BlockExpr {
            variables,
            expressions,
        } = block;
        self.scopes.enter_scope(ScopeKind::BlockMethod, &[]);
        self.scopes.declare_all(&variables);
        self.open_block_methods.push(id);
        self.joined.push(Vec::new());
        self.ancestors.push(Ancestor::method(ty));

        let statements = self.visit_statements(NodeKind::Block, ty, &variables, expressions);

        self.ancestors.pop();
        let joined = self.joined.pop().unwrap_or_default();
        self.open_block_methods.pop();
        let parameters = self.scopes.finalize("<block-method>", self.resolver);
        self.scopes.exit_scope();
        let statements = statements?;
        let parameters = parameters?;

        let arguments: Vec<Expr> = parameters.iter().map(Expr::variable).collect();
        let body = Expr::block_typed(ty, variables, statements);
        let model = self
            .unit_mut()?
            .method_mut(id)
            .ok_or(AnalysisError::UnknownMethod(id.0))?;
        model.parameters = parameters;
        model.body = Some(body);
        model.set_analysis(Arc::new(MethodAnalysis {
            joined_assignments: joined,
            ..MethodAnalysis::default()
        }));

        match parent {
            None => self.finalize_block_method(id)?,
            Some(parent) => self.pending_children.entry(parent).or_default().push(id),
        }
        Ok(Expr::method_call(id, arguments, ty))
    }

    /// Name `method`, register it on its type, then do the same for the
    /// block-methods that were waiting on it.
    pub(crate) fn finalize_block_method(&mut self, method: MethodId) -> Result<()> {
        let resolver = self.resolver;
        let unit = self.unit_mut()?;
        naming::finalize_name(unit, method, resolver, true)?;
        unit.register_method(method);
        let children = self.pending_children.remove(&method).unwrap_or_default();
        for child in children {
            self.finalize_block_method(child)?;
        }
        Ok(())
    }

    fn unit_mut(&mut self) -> Result<&mut SourceCode> {
        self.unit
            .as_deref_mut()
            .ok_or_else(|| AnalysisError::invalid_structure("block extraction outside a method"))
    }
}
