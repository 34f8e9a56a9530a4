//! Type/member model of one generation unit.
//!
//! A [`SourceCode`] owns every type and method of the unit in two arenas
//! indexed by [`TypeDeclId`] and [`MethodId`]. Types list their methods by id,
//! and calls to model methods ([`crate::ExprKind::MethodCall`]) refer to them
//! by id, so methods can be renamed or added while the analysis rewrites
//! bodies without invalidating any reference.
//!
//! ## Method lifecycle
//!
//! | State | `name()` | Registered on type |
//! |-------|----------|--------------------|
//! | Created (block-method or unnamed lambda) | `None` | no (block-method) |
//! | Finalized | `Some(..)` | yes |
//!
//! An unfinalized name is never exposed.

use crate::expr::{Expr, Variable};
use crate::types::TypeHandle;
use bitflags::bitflags;
use std::sync::Arc;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeDeclId(pub u32);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MethodId(pub u32);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Visibility {
    Public,
    Internal,
    Protected,
    ProtectedInternal,
    Private,
}

impl Visibility {
    pub fn keyword(self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Internal => "internal",
            Visibility::Protected => "protected",
            Visibility::ProtectedInternal => "protected internal",
            Visibility::Private => "private",
        }
    }
}

bitflags! {
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct MethodFlags: u8 {
        const STATIC = 1 << 0;
        const ABSTRACT = 1 << 1;
        const VIRTUAL = 1 << 2;
        const OVERRIDE = 1 << 3;
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AccessorKind {
    Getter,
    Setter,
}

/// How a method came to exist.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MethodOrigin {
    /// Configured by the caller (possibly still awaiting a generated name).
    Declared,
    /// Hoisted out of another method's body. `parent` is the block-method
    /// whose analysis created it, `None` when created directly from a
    /// declared method.
    BlockMethod { parent: Option<MethodId> },
    /// Property accessor body.
    Accessor(AccessorKind),
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum MethodName {
    Pending,
    Finalized(Arc<str>),
}

/// A `[Attribute(args, Name = value)]` application.
#[derive(Clone, Debug)]
pub struct AttributeModel {
    pub ty: TypeHandle,
    pub arguments: Vec<Expr>,
    pub named_arguments: Vec<(Arc<str>, Expr)>,
}

impl AttributeModel {
    pub fn new(ty: TypeHandle) -> Self {
        AttributeModel {
            ty,
            arguments: Vec::new(),
            named_arguments: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_argument(mut self, argument: Expr) -> Self {
        self.arguments.push(argument);
        self
    }
}

/// Cached result of analyzing one method.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MethodAnalysis {
    /// Block-methods created while rewriting this method, in creation order.
    pub synthesized_methods: Vec<MethodId>,
    /// Variables whose first assignment can be emitted as their declaration.
    pub joined_assignments: Vec<crate::VarId>,
    /// Namespaces this method needs, sorted, excluding the unit's own.
    pub required_namespaces: Vec<String>,
    /// Assemblies this method needs, sorted.
    pub required_assemblies: Vec<String>,
}

/// Cached result of analyzing a whole generation unit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UnitAnalysis {
    /// Sorted, duplicate-free, excluding the unit's own namespace.
    pub required_namespaces: Vec<String>,
    /// Sorted, duplicate-free.
    pub required_assemblies: Vec<String>,
    pub synthesized_methods: Vec<MethodId>,
}

#[derive(Clone, Debug)]
pub struct MethodModel {
    name: MethodName,
    pub parameters: Vec<Variable>,
    pub return_type: TypeHandle,
    pub body: Option<Expr>,
    pub visibility: Visibility,
    pub flags: MethodFlags,
    pub generic_parameters: Vec<TypeHandle>,
    pub attributes: Vec<AttributeModel>,
    pub summary: Vec<String>,
    origin: MethodOrigin,
    declaring_type: TypeDeclId,
    analysis: Option<Arc<MethodAnalysis>>,
}

impl MethodModel {
    /// A caller-configured method. `name` of `None` defers naming to the
    /// analysis pass.
    pub fn new(
        name: Option<&str>,
        parameters: Vec<Variable>,
        return_type: TypeHandle,
        body: Option<Expr>,
    ) -> Self {
        MethodModel {
            name: name.map_or(MethodName::Pending, |n| MethodName::Finalized(Arc::from(n))),
            parameters,
            return_type,
            body,
            visibility: Visibility::Public,
            flags: MethodFlags::empty(),
            generic_parameters: Vec::new(),
            attributes: Vec::new(),
            summary: Vec::new(),
            origin: MethodOrigin::Declared,
            declaring_type: TypeDeclId(u32::MAX),
            analysis: None,
        }
    }

    /// A private method hoisted out of another body. Parameters, body and
    /// name are filled in as its analysis completes.
    pub fn block_method(
        declaring_type: TypeDeclId,
        return_type: TypeHandle,
        flags: MethodFlags,
        parent: Option<MethodId>,
    ) -> Self {
        MethodModel {
            name: MethodName::Pending,
            parameters: Vec::new(),
            return_type,
            body: None,
            visibility: Visibility::Private,
            flags,
            generic_parameters: Vec::new(),
            attributes: Vec::new(),
            summary: Vec::new(),
            origin: MethodOrigin::BlockMethod { parent },
            declaring_type,
            analysis: None,
        }
    }

    #[must_use]
    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    #[must_use]
    pub fn with_flags(mut self, flags: MethodFlags) -> Self {
        self.flags = flags;
        self
    }

    #[must_use]
    pub fn with_summary(mut self, summary: Vec<String>) -> Self {
        self.summary = summary;
        self
    }

    #[must_use]
    pub fn with_attribute(mut self, attribute: AttributeModel) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// The finalized name; `None` while naming is deferred.
    pub fn name(&self) -> Option<&str> {
        match &self.name {
            MethodName::Pending => None,
            MethodName::Finalized(name) => Some(name),
        }
    }

    pub fn is_named(&self) -> bool {
        matches!(self.name, MethodName::Finalized(_))
    }

    /// Fix the method's name. Also used to rename an already-finalized
    /// block-method when a sibling takes its suffix sequence.
    pub fn set_name(&mut self, name: &str) {
        self.name = MethodName::Finalized(Arc::from(name));
    }

    pub fn origin(&self) -> MethodOrigin {
        self.origin
    }

    pub fn is_block_method(&self) -> bool {
        matches!(self.origin, MethodOrigin::BlockMethod { .. })
    }

    pub fn block_method_parent(&self) -> Option<MethodId> {
        match self.origin {
            MethodOrigin::BlockMethod { parent } => parent,
            _ => None,
        }
    }

    pub fn declaring_type(&self) -> TypeDeclId {
        self.declaring_type
    }

    pub fn is_static(&self) -> bool {
        self.flags.contains(MethodFlags::STATIC)
    }

    /// Ordered parameter types; two methods with equal signatures cannot
    /// share a name.
    pub fn signature(&self) -> Vec<TypeHandle> {
        self.parameters.iter().map(Variable::ty).collect()
    }

    pub fn analysis(&self) -> Option<&Arc<MethodAnalysis>> {
        self.analysis.as_ref()
    }

    pub fn set_analysis(&mut self, analysis: Arc<MethodAnalysis>) {
        self.analysis = Some(analysis);
    }
}

/// Base type or interface reference, shared between declaring types.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeReference {
    External(TypeHandle),
    Declared(TypeDeclId),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeDeclKind {
    Class,
    Struct,
    Interface,
}

#[derive(Clone, Debug)]
pub struct PropertyModel {
    pub name: Arc<str>,
    pub ty: TypeHandle,
    pub visibility: Visibility,
    pub is_static: bool,
    pub getter: Option<MethodId>,
    pub setter: Option<MethodId>,
    pub attributes: Vec<AttributeModel>,
}

#[derive(Clone, Debug)]
pub struct FieldModel {
    pub name: Arc<str>,
    pub ty: TypeHandle,
    pub visibility: Visibility,
    pub is_static: bool,
    pub is_readonly: bool,
    pub initializer: Option<Expr>,
    pub attributes: Vec<AttributeModel>,
}

impl FieldModel {
    pub fn new(name: &str, ty: TypeHandle) -> Self {
        FieldModel {
            name: Arc::from(name),
            ty,
            visibility: Visibility::Private,
            is_static: false,
            is_readonly: false,
            initializer: None,
            attributes: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_initializer(mut self, initializer: Expr) -> Self {
        self.initializer = Some(initializer);
        self
    }
}

#[derive(Clone, Debug)]
pub struct TypeDecl {
    pub name: Arc<str>,
    pub kind: TypeDeclKind,
    pub visibility: Visibility,
    pub is_static: bool,
    pub base_type: Option<Arc<TypeReference>>,
    pub interfaces: Vec<Arc<TypeReference>>,
    pub generic_parameters: Vec<TypeHandle>,
    pub attributes: Vec<AttributeModel>,
    pub summary: Vec<String>,
    pub properties: Vec<PropertyModel>,
    pub fields: Vec<FieldModel>,
    methods: Vec<MethodId>,
}

impl TypeDecl {
    pub fn new(name: &str, kind: TypeDeclKind) -> Self {
        TypeDecl {
            name: Arc::from(name),
            kind,
            visibility: Visibility::Public,
            is_static: false,
            base_type: None,
            interfaces: Vec::new(),
            generic_parameters: Vec::new(),
            attributes: Vec::new(),
            summary: Vec::new(),
            properties: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn class(name: &str) -> Self {
        Self::new(name, TypeDeclKind::Class)
    }

    #[must_use]
    pub fn with_base_type(mut self, base: Arc<TypeReference>) -> Self {
        self.base_type = Some(base);
        self
    }

    #[must_use]
    pub fn with_interface(mut self, interface: Arc<TypeReference>) -> Self {
        self.interfaces.push(interface);
        self
    }

    /// Registered methods in declaration order, block-methods included once
    /// finalized. Property accessors are reached through `properties`.
    pub fn methods(&self) -> &[MethodId] {
        &self.methods
    }
}

/// One generation unit: a namespace and the types generated into it.
#[derive(Clone, Debug)]
pub struct SourceCode {
    namespace: Arc<str>,
    types: Vec<TypeDecl>,
    methods: Vec<MethodModel>,
    analysis: Option<Arc<UnitAnalysis>>,
}

impl SourceCode {
    pub fn new(namespace: &str) -> Self {
        SourceCode {
            namespace: Arc::from(namespace),
            types: Vec::new(),
            methods: Vec::new(),
            analysis: None,
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn add_type(&mut self, decl: TypeDecl) -> TypeDeclId {
        let id = TypeDeclId(self.types.len() as u32);
        self.types.push(decl);
        id
    }

    /// Add a method to the arena and register it on `type_id`.
    pub fn add_method(&mut self, type_id: TypeDeclId, method: MethodModel) -> MethodId {
        let id = self.push_method(type_id, method);
        self.register_method(id);
        id
    }

    /// Add a method to the arena without registering it on its type.
    pub fn push_method(&mut self, type_id: TypeDeclId, mut method: MethodModel) -> MethodId {
        method.declaring_type = type_id;
        let id = MethodId(self.methods.len() as u32);
        self.methods.push(method);
        id
    }

    /// Append a method to its declaring type's member list (idempotent).
    pub fn register_method(&mut self, id: MethodId) {
        let Some(type_id) = self.method(id).map(MethodModel::declaring_type) else {
            return;
        };
        if let Some(decl) = self.types.get_mut(type_id.0 as usize)
            && !decl.methods.contains(&id)
        {
            decl.methods.push(id);
        }
    }

    /// Add a property; returns its index on the type.
    pub fn add_property(
        &mut self,
        type_id: TypeDeclId,
        name: &str,
        ty: TypeHandle,
        visibility: Visibility,
    ) -> Option<usize> {
        let decl = self.types.get_mut(type_id.0 as usize)?;
        decl.properties.push(PropertyModel {
            name: Arc::from(name),
            ty,
            visibility,
            is_static: false,
            getter: None,
            setter: None,
            attributes: Vec::new(),
        });
        Some(decl.properties.len() - 1)
    }

    /// Give a property a getter body.
    pub fn set_getter(&mut self, type_id: TypeDeclId, property: usize, body: Expr) -> Option<MethodId> {
        let prop = self.types.get(type_id.0 as usize)?.properties.get(property)?;
        let mut method = MethodModel::new(
            Some(&format!("get_{}", prop.name)),
            Vec::new(),
            prop.ty,
            Some(body),
        )
        .with_visibility(prop.visibility);
        method.origin = MethodOrigin::Accessor(AccessorKind::Getter);
        if prop.is_static {
            method.flags |= MethodFlags::STATIC;
        }
        let id = self.push_method(type_id, method);
        self.types[type_id.0 as usize].properties[property].getter = Some(id);
        Some(id)
    }

    /// Give a property a setter body; `value` is the implicit parameter.
    pub fn set_setter(
        &mut self,
        type_id: TypeDeclId,
        property: usize,
        value: Variable,
        body: Expr,
    ) -> Option<MethodId> {
        let prop = self.types.get(type_id.0 as usize)?.properties.get(property)?;
        let mut method = MethodModel::new(
            Some(&format!("set_{}", prop.name)),
            vec![value],
            crate::TypeHandle::VOID,
            Some(body),
        )
        .with_visibility(prop.visibility);
        method.origin = MethodOrigin::Accessor(AccessorKind::Setter);
        if prop.is_static {
            method.flags |= MethodFlags::STATIC;
        }
        let id = self.push_method(type_id, method);
        self.types[type_id.0 as usize].properties[property].setter = Some(id);
        Some(id)
    }

    pub fn add_field(&mut self, type_id: TypeDeclId, field: FieldModel) -> Option<usize> {
        let decl = self.types.get_mut(type_id.0 as usize)?;
        decl.fields.push(field);
        Some(decl.fields.len() - 1)
    }

    pub fn type_decl(&self, id: TypeDeclId) -> Option<&TypeDecl> {
        self.types.get(id.0 as usize)
    }

    pub fn type_decl_mut(&mut self, id: TypeDeclId) -> Option<&mut TypeDecl> {
        self.types.get_mut(id.0 as usize)
    }

    pub fn type_ids(&self) -> impl Iterator<Item = TypeDeclId> + use<> {
        (0..self.types.len() as u32).map(TypeDeclId)
    }

    pub fn types(&self) -> &[TypeDecl] {
        &self.types
    }

    pub fn method(&self, id: MethodId) -> Option<&MethodModel> {
        self.methods.get(id.0 as usize)
    }

    pub fn method_mut(&mut self, id: MethodId) -> Option<&mut MethodModel> {
        self.methods.get_mut(id.0 as usize)
    }

    pub fn method_count(&self) -> usize {
        self.methods.len()
    }

    /// Find a registered method on `type_id` by finalized name.
    pub fn find_method(&self, type_id: TypeDeclId, name: &str) -> Option<MethodId> {
        self.type_decl(type_id)?
            .methods
            .iter()
            .copied()
            .find(|&id| self.method(id).and_then(MethodModel::name) == Some(name))
    }

    /// Names of the registered methods of `type_id`, in order.
    pub fn method_names(&self, type_id: TypeDeclId) -> Vec<String> {
        self.type_decl(type_id)
            .map(|decl| {
                decl.methods
                    .iter()
                    .filter_map(|&id| self.method(id).and_then(MethodModel::name))
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn analysis(&self) -> Option<&Arc<UnitAnalysis>> {
        self.analysis.as_ref()
    }

    pub fn set_analysis(&mut self, analysis: Arc<UnitAnalysis>) {
        self.analysis = Some(analysis);
    }
}

#[cfg(test)]
#[path = "../tests/model_tests.rs"]
mod tests;
