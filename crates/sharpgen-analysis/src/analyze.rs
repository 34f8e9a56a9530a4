//! Analysis entry points.
//!
//! - [`analyze_source_code`] analyzes a whole generation unit once and caches
//!   the result on the unit.
//! - [`analyze_method`] analyzes one method once and caches the result on
//!   the method.
//! - [`analyze_expression`] walks a free-standing expression without
//!   extracting anything.

use crate::extraction::Ancestor;
use crate::namespaces::NamespaceCollector;
use crate::naming;
use crate::rewriter::{MethodContext, Rewriter};
use crate::scope::ScopeKind;
use sharpgen_common::{AnalysisError, AnalysisOptions, Result};
use sharpgen_model::{
    Expr, MethodAnalysis, MethodId, MethodModel, MethodOrigin, SourceCode, TypeDeclId,
    TypeResolver, UnitAnalysis, VarId, Variable,
};
use std::sync::Arc;
use tracing::{debug, trace};

/// Result of [`analyze_expression`].
#[derive(Clone, Debug)]
pub struct ExpressionAnalysis {
    /// The walked expression. Blocks are never extracted in this mode, so
    /// it is structurally the input.
    pub expression: Expr,
    pub required_namespaces: Vec<String>,
    pub required_assemblies: Vec<String>,
    pub joined_assignments: Vec<VarId>,
    /// Variables used but declared nowhere in the expression, in
    /// first-access order.
    pub free_variables: Vec<Variable>,
}

/// Analyze every method of `unit`, extracting blocks and collecting the
/// unit's namespace and assembly requirements.
///
/// The first successful call caches its result on the unit; later calls
/// return the cached `Arc`. A failed call leaves the unit unusable.
#[tracing::instrument(level = "debug", skip(unit, resolver, options), fields(namespace = %unit.namespace()))]
pub fn analyze_source_code(
    unit: &mut SourceCode,
    resolver: &dyn TypeResolver,
    options: &AnalysisOptions,
) -> Result<Arc<UnitAnalysis>> {
    if let Some(cached) = unit.analysis() {
        debug!("unit already analyzed");
        return Ok(Arc::clone(cached));
    }

    let type_ids: Vec<TypeDeclId> = unit.type_ids().collect();
    finalize_pending_names(unit, &type_ids, resolver)?;

    let mut collector = NamespaceCollector::new(resolver, options);
    for &type_id in &type_ids {
        collector.visit_type_decl(unit, type_id);
    }

    let mut synthesized_methods = Vec::new();
    for &type_id in &type_ids {
        for method in methods_to_analyze(unit, type_id) {
            let analysis = analyze_method(unit, method, resolver, options)?;
            collector.merge(&analysis.required_namespaces, &analysis.required_assemblies);
            synthesized_methods.extend_from_slice(&analysis.synthesized_methods);
        }
    }

    let (required_namespaces, required_assemblies) = collector.finish(unit.namespace());
    debug!(
        namespaces = required_namespaces.len(),
        assemblies = required_assemblies.len(),
        synthesized = synthesized_methods.len(),
        "unit analysis complete"
    );
    let analysis = Arc::new(UnitAnalysis {
        required_namespaces,
        required_assemblies,
        synthesized_methods,
    });
    unit.set_analysis(Arc::clone(&analysis));
    Ok(analysis)
}

/// Analyze one method of `unit`: rewrite its body, hoisting blocks that
/// cannot stay in place, and collect what it needs.
///
/// Returns the cached result if the method was analyzed before, without
/// walking it again. Fails with [`AnalysisError::UnknownType`] when the
/// resolver cannot describe the method's return or parameter types.
#[tracing::instrument(level = "debug", skip(unit, resolver, options), fields(method = method.0))]
pub fn analyze_method(
    unit: &mut SourceCode,
    method: MethodId,
    resolver: &dyn TypeResolver,
    options: &AnalysisOptions,
) -> Result<Arc<MethodAnalysis>> {
    let model = unit
        .method(method)
        .ok_or(AnalysisError::UnknownMethod(method.0))?;
    if let Some(cached) = model.analysis() {
        trace!("method already analyzed");
        return Ok(Arc::clone(cached));
    }
    if let Some(unknown) = std::iter::once(model.return_type)
        .chain(model.signature())
        .find(|&ty| resolver.shape(ty).is_none())
    {
        return Err(AnalysisError::UnknownType(unknown.0));
    }
    if !model.is_named() {
        naming::finalize_name(unit, method, resolver, false)?;
    }

    let own_namespace = unit.namespace().to_string();
    let model = unit
        .method_mut(method)
        .ok_or(AnalysisError::UnknownMethod(method.0))?;
    let body = model.body.take();
    let header: MethodModel = model.clone();
    let name = header.name().unwrap_or_default().to_string();
    let context = MethodContext {
        declaring_type: header.declaring_type(),
        inherited_flags: header.flags,
    };

    let mut rewriter = Rewriter::for_method(unit, context, resolver, options);
    rewriter.namespaces.visit_method_signature(&header);
    rewriter.scopes.enter_scope(ScopeKind::Method, &header.parameters);
    rewriter.ancestors.push(Ancestor::method(header.return_type));
    let body = body.map(|body| rewriter.visit(body)).transpose();
    rewriter.ancestors.pop();
    let finalized = rewriter.scopes.finalize(&name, resolver);
    rewriter.scopes.exit_scope();
    let body = body?;
    finalized?;

    let Rewriter {
        namespaces,
        mut joined,
        synthesized,
        ..
    } = rewriter;
    let (required_namespaces, required_assemblies) = namespaces.finish(&own_namespace);
    let analysis = Arc::new(MethodAnalysis {
        synthesized_methods: synthesized,
        joined_assignments: joined.pop().unwrap_or_default(),
        required_namespaces,
        required_assemblies,
    });
    debug!(
        method = %name,
        synthesized = analysis.synthesized_methods.len(),
        "method analysis complete"
    );

    let model = unit
        .method_mut(method)
        .ok_or(AnalysisError::UnknownMethod(method.0))?;
    model.body = body;
    model.set_analysis(Arc::clone(&analysis));
    Ok(analysis)
}

/// Walk a free-standing expression: collect namespaces, assemblies and
/// joined assignments, and report undeclared variables as free variables.
#[tracing::instrument(level = "debug", skip_all)]
pub fn analyze_expression(
    expr: Expr,
    resolver: &dyn TypeResolver,
    options: &AnalysisOptions,
) -> Result<ExpressionAnalysis> {
    let mut rewriter = Rewriter::for_expression(resolver, options);
    rewriter.scopes.enter_scope(ScopeKind::Expression, &[]);
    let expression = rewriter.visit(expr);
    let free_variables = rewriter.scopes.finalize("<expression>", resolver);
    rewriter.scopes.exit_scope();
    let expression = expression?;
    let free_variables = free_variables?;

    let Rewriter {
        namespaces,
        mut joined,
        ..
    } = rewriter;
    let (required_namespaces, required_assemblies) = namespaces.finish("");
    Ok(ExpressionAnalysis {
        expression,
        required_namespaces,
        required_assemblies,
        joined_assignments: joined.pop().unwrap_or_default(),
        free_variables,
    })
}

/// Declared methods configured without a name (unnamed lambdas) get a
/// generated one before any body is analyzed.
fn finalize_pending_names(
    unit: &mut SourceCode,
    type_ids: &[TypeDeclId],
    resolver: &dyn TypeResolver,
) -> Result<()> {
    for &type_id in type_ids {
        let pending: Vec<MethodId> = unit
            .type_decl(type_id)
            .map(|decl| decl.methods().to_vec())
            .unwrap_or_default()
            .into_iter()
            .filter(|&id| {
                unit.method(id).is_some_and(|m| {
                    !m.is_named() && m.origin() == MethodOrigin::Declared
                })
            })
            .collect();
        for id in pending {
            naming::finalize_name(unit, id, resolver, false)?;
        }
    }
    Ok(())
}

/// Registered methods of a type followed by its property accessors.
fn methods_to_analyze(unit: &SourceCode, type_id: TypeDeclId) -> Vec<MethodId> {
    let Some(decl) = unit.type_decl(type_id) else {
        return Vec::new();
    };
    let mut methods = decl.methods().to_vec();
    for property in &decl.properties {
        methods.extend(property.getter);
        methods.extend(property.setter);
    }
    methods
}
