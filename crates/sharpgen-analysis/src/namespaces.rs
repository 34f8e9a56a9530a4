//! Namespace and assembly reference collection.
//!
//! Collects the namespaces that need a `using` directive and the assemblies
//! that need a compiler reference, from every place a type is written out
//! in the generated source.
//!
//! # Rules
//!
//! - Types with a C# keyword (`int`, `string`, `object`, `void`) need nothing.
//! - Open generic placeholders and anything in the placeholder namespace
//!   are skipped.
//! - Arrays contribute their element type.
//! - Generic types contribute their own namespace and their type arguments.
//! - Static member owners and extension-method owners are written out (or
//!   must be imported), so they count; instance member owners do not.
//! - Type arguments of a generic method call only count when they cannot be
//!   inferred from the method's parameter types.
//! - Assemblies also include the assembly of every type on the base-type
//!   chain of a collected type, since the compiler needs them to bind members.
//!
//! The final namespace list drops the unit's own namespace and is sorted
//! with `System` and `System.*` first, then case-insensitively.

use indexmap::IndexSet;
use rustc_hash::{FxBuildHasher, FxHashSet};
use sharpgen_common::AnalysisOptions;
use sharpgen_common::limits::{MAX_TYPE_NESTING_DEPTH, SYSTEM_NAMESPACE};
use sharpgen_model::{
    AttributeModel, ConstantValue, Expr, ExprKind, MethodInfo, MethodModel, SourceCode,
    TypeDeclId, TypeHandle, TypeKind, TypeReference, TypeResolver,
};
use std::cmp::Ordering;
use tracing::trace;

/// Order namespaces for `using` lists: `System` and `System.*` first, then
/// case-insensitive, then ordinal to keep the order total.
pub fn compare_namespaces(a: &str, b: &str) -> Ordering {
    is_system_namespace(b)
        .cmp(&is_system_namespace(a))
        .then_with(|| {
            a.bytes()
                .map(|c| c.to_ascii_lowercase())
                .cmp(b.bytes().map(|c| c.to_ascii_lowercase()))
        })
        .then_with(|| a.cmp(b))
}

fn is_system_namespace(namespace: &str) -> bool {
    namespace
        .strip_prefix(SYSTEM_NAMESPACE)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('.'))
}

/// Accumulates required namespaces and assemblies in first-seen order.
pub struct NamespaceCollector<'a> {
    resolver: &'a dyn TypeResolver,
    options: &'a AnalysisOptions,
    namespaces: IndexSet<String, FxBuildHasher>,
    assemblies: IndexSet<String, FxBuildHasher>,
    visited: FxHashSet<TypeHandle>,
}

impl<'a> NamespaceCollector<'a> {
    pub fn new(resolver: &'a dyn TypeResolver, options: &'a AnalysisOptions) -> Self {
        NamespaceCollector {
            resolver,
            options,
            namespaces: IndexSet::default(),
            assemblies: IndexSet::default(),
            visited: FxHashSet::default(),
        }
    }

    /// Record everything needed to write `ty` in source.
    pub fn visit_type(&mut self, ty: TypeHandle) {
        if !self.visited.insert(ty) {
            return;
        }
        let Some(shape) = self.resolver.shape(ty) else {
            return;
        };
        match shape.kind {
            TypeKind::Array { element, .. } => return self.visit_type(element),
            TypeKind::GenericParameter { .. } => return,
            _ => {}
        }
        if shape.has_keyword() {
            return;
        }
        if let Some(namespace) = &shape.namespace {
            if self.options.is_placeholder_namespace(namespace) {
                return;
            }
            if self.namespaces.insert(namespace.clone()) {
                trace!(namespace = %namespace, "required namespace");
            }
        }
        if self.options.collect_assemblies {
            self.add_assembly(shape.assembly.as_deref());
            self.visit_base_chain_assemblies(ty);
        }
        for &argument in &shape.generic_arguments {
            self.visit_type(argument);
        }
    }

    fn add_assembly(&mut self, assembly: Option<&str>) {
        if let Some(assembly) = assembly
            && !self.assemblies.contains(assembly)
        {
            trace!(assembly, "required assembly");
            self.assemblies.insert(assembly.to_string());
        }
    }

    fn visit_base_chain_assemblies(&mut self, ty: TypeHandle) {
        let mut seen = FxHashSet::default();
        let mut cursor = self.resolver.base_type(ty);
        while let Some(base) = cursor {
            if !seen.insert(base) {
                break;
            }
            let Some(shape) = self.resolver.shape(base) else {
                break;
            };
            if !shape.has_keyword() {
                self.add_assembly(shape.assembly.as_deref());
            }
            cursor = shape.base_type;
        }
    }

    /// Hook for one expression node, called before its children are visited.
    pub fn visit_node(&mut self, kind: &ExprKind, ty: TypeHandle) {
        match kind {
            ExprKind::Constant(ConstantValue::Type(written)) => self.visit_type(*written),
            ExprKind::Constant(ConstantValue::EnumMember(_)) => self.visit_type(ty),
            ExprKind::Constant(ConstantValue::Null) => {}
            ExprKind::Constant(_) => {
                if self.resolver.is_enum(ty) {
                    self.visit_type(ty);
                }
            }
            ExprKind::Default | ExprKind::New { .. } | ExprKind::NewArray { .. } => {
                self.visit_type(ty);
            }
            ExprKind::Unary { op, .. } if op.writes_type() => self.visit_type(ty),
            ExprKind::TypeTest { type_operand, .. } => self.visit_type(*type_operand),
            ExprKind::Call { method, .. } => self.visit_method_info(method),
            ExprKind::Member { member, .. } if member.is_static => {
                self.visit_type(member.declaring_type);
            }
            ExprKind::Try(try_expr) => {
                for handler in &try_expr.handlers {
                    self.visit_type(handler.test);
                    if let Some(variable) = &handler.variable {
                        self.visit_type(variable.ty());
                    }
                }
            }
            ExprKind::Block(block) => {
                for variable in &block.variables {
                    self.visit_type(variable.ty());
                }
            }
            _ => {}
        }
    }

    fn visit_method_info(&mut self, method: &MethodInfo) {
        if method.is_static || method.is_extension {
            self.visit_type(method.declaring_type);
        }
        for (position, &argument) in method.generic_arguments.iter().enumerate() {
            if !self.is_inferable(method, position as u32) {
                self.visit_type(argument);
            }
        }
    }

    /// A method type argument can be inferred when some parameter type of
    /// the generic definition mentions it.
    fn is_inferable(&self, method: &MethodInfo, position: u32) -> bool {
        method
            .parameter_types
            .iter()
            .any(|&parameter| self.mentions_method_parameter(parameter, position, 0))
    }

    fn mentions_method_parameter(&self, ty: TypeHandle, position: u32, depth: u32) -> bool {
        if depth > MAX_TYPE_NESTING_DEPTH {
            return false;
        }
        let Some(shape) = self.resolver.shape(ty) else {
            return false;
        };
        match shape.kind {
            TypeKind::GenericParameter {
                position: found,
                on_method: true,
            } => found == position,
            TypeKind::Array { element, .. } => {
                self.mentions_method_parameter(element, position, depth + 1)
            }
            _ => shape
                .generic_arguments
                .iter()
                .any(|&argument| self.mentions_method_parameter(argument, position, depth + 1)),
        }
    }

    /// Walk a tree that is not being rewritten (field initializers,
    /// attribute arguments) and collect its references.
    pub fn visit_tree(&mut self, expr: &Expr) {
        self.visit_node(&expr.kind, expr.ty);
        expr.for_each_child(&mut |child| self.visit_tree(child));
    }

    /// Return type, parameter types and attributes of a method.
    pub fn visit_method_signature(&mut self, method: &MethodModel) {
        self.visit_type(method.return_type);
        for parameter in &method.parameters {
            self.visit_type(parameter.ty());
        }
        self.visit_attributes(&method.attributes);
    }

    pub fn visit_attributes(&mut self, attributes: &[AttributeModel]) {
        for attribute in attributes {
            self.visit_type(attribute.ty);
            for argument in &attribute.arguments {
                self.visit_tree(argument);
            }
            for (_, argument) in &attribute.named_arguments {
                self.visit_tree(argument);
            }
        }
    }

    /// Everything written in a type's declaration other than method bodies:
    /// base type, interfaces, attributes, property and field types, field
    /// initializers.
    pub fn visit_type_decl(&mut self, unit: &SourceCode, type_id: TypeDeclId) {
        let Some(decl) = unit.type_decl(type_id) else {
            return;
        };
        for reference in decl.base_type.iter().chain(&decl.interfaces) {
            if let TypeReference::External(handle) = **reference {
                self.visit_type(handle);
            }
        }
        self.visit_attributes(&decl.attributes);
        for property in &decl.properties {
            self.visit_type(property.ty);
            self.visit_attributes(&property.attributes);
        }
        for field in &decl.fields {
            self.visit_type(field.ty);
            self.visit_attributes(&field.attributes);
            if let Some(initializer) = &field.initializer {
                self.visit_tree(initializer);
            }
        }
    }

    /// Add results collected elsewhere (a cached method analysis).
    pub fn merge(&mut self, namespaces: &[String], assemblies: &[String]) {
        self.namespaces.extend(namespaces.iter().cloned());
        self.assemblies.extend(assemblies.iter().cloned());
    }

    /// Final lists: namespaces without `own_namespace`, sorted with
    /// [`compare_namespaces`]; assemblies sorted ordinally.
    pub fn finish(self, own_namespace: &str) -> (Vec<String>, Vec<String>) {
        let mut namespaces: Vec<String> = self
            .namespaces
            .into_iter()
            .filter(|namespace| namespace != own_namespace)
            .collect();
        namespaces.sort_by(|a, b| compare_namespaces(a, b));
        let mut assemblies: Vec<String> = self.assemblies.into_iter().collect();
        assemblies.sort();
        (namespaces, assemblies)
    }
}

#[cfg(test)]
#[path = "../tests/namespaces_tests.rs"]
mod tests;
