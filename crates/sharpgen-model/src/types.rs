//! Type identity for the analysis core.
//!
//! The analysis never materializes real runtime types. It works with opaque
//! [`TypeHandle`]s and asks a [`TypeResolver`] for the few shape queries it
//! needs: name, namespace, assembly, generic arguments, array element type,
//! enum-ness, base type and interfaces.
//!
//! ## Well-known handles
//!
//! | Handle | C# | Keyword |
//! |--------|----|---------|
//! | `VOID` | `System.Void` | `void` |
//! | `OBJECT` | `System.Object` | `object` |
//! | `STRING` | `System.String` | `string` |
//! | `INT32` | `System.Int32` | `int` |
//! | `TYPE` | `System.Type` | - |
//!
//! Types with a keyword never need a `using` directive.

use std::sync::Arc;

/// Opaque, stable identity of a type known to a [`TypeResolver`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeHandle(pub u32);

impl TypeHandle {
    pub const VOID: Self = Self(0);
    pub const OBJECT: Self = Self(1);
    pub const STRING: Self = Self(2);
    pub const BOOLEAN: Self = Self(3);
    pub const CHAR: Self = Self(4);
    pub const BYTE: Self = Self(5);
    pub const INT16: Self = Self(6);
    pub const INT32: Self = Self(7);
    pub const INT64: Self = Self(8);
    pub const SINGLE: Self = Self(9);
    pub const DOUBLE: Self = Self(10);
    pub const DECIMAL: Self = Self(11);
    pub const TYPE: Self = Self(12);

    /// First handle available for non-builtin types.
    pub const FIRST_USER: u32 = 16;

    /// Check if this is one of the pre-registered builtin handles.
    pub const fn is_builtin(self) -> bool {
        self.0 < Self::FIRST_USER
    }

    pub const fn is_void(self) -> bool {
        self.0 == Self::VOID.0
    }
}

/// Structural category of a type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Void,
    Primitive,
    Class,
    Struct,
    Interface,
    Enum,
    Delegate,
    /// `T[]`, `T[,]`
    Array { element: TypeHandle, rank: u8 },
    /// Synthetic placeholder for an open generic parameter. `on_method`
    /// distinguishes `M<T>()` parameters from `C<T>` parameters.
    GenericParameter { position: u32, on_method: bool },
}

/// Everything the analysis can ask about a type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeShape {
    /// Simple name without generic arity: `List`, `Int32`.
    pub name: String,
    pub namespace: Option<String>,
    pub assembly: Option<String>,
    pub kind: TypeKind,
    pub generic_arguments: Vec<TypeHandle>,
    pub base_type: Option<TypeHandle>,
    pub interfaces: Vec<TypeHandle>,
    /// C# keyword alias (`int`, `string`), if the type has one.
    pub keyword: Option<&'static str>,
}

/// Structural identity used by the registry to memoize shapes.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeKey {
    namespace: Option<String>,
    name: String,
    assembly: Option<String>,
    kind: TypeKind,
    generic_arguments: Vec<TypeHandle>,
}

impl TypeShape {
    fn new(kind: TypeKind, name: &str, namespace: Option<&str>, assembly: Option<&str>) -> Self {
        TypeShape {
            name: name.to_string(),
            namespace: namespace.map(str::to_string),
            assembly: assembly.map(str::to_string),
            kind,
            generic_arguments: Vec::new(),
            base_type: None,
            interfaces: Vec::new(),
            keyword: None,
        }
    }

    pub fn class(name: &str, namespace: &str, assembly: &str) -> Self {
        Self::new(TypeKind::Class, name, Some(namespace), Some(assembly))
            .with_base_type(TypeHandle::OBJECT)
    }

    pub fn structure(name: &str, namespace: &str, assembly: &str) -> Self {
        Self::new(TypeKind::Struct, name, Some(namespace), Some(assembly))
    }

    pub fn interface(name: &str, namespace: &str, assembly: &str) -> Self {
        Self::new(TypeKind::Interface, name, Some(namespace), Some(assembly))
    }

    pub fn enumeration(name: &str, namespace: &str, assembly: &str) -> Self {
        Self::new(TypeKind::Enum, name, Some(namespace), Some(assembly))
    }

    pub fn delegate(name: &str, namespace: &str, assembly: &str) -> Self {
        Self::new(TypeKind::Delegate, name, Some(namespace), Some(assembly))
    }

    /// Array of `element`. Arrays carry no namespace of their own.
    pub fn array(element: TypeHandle, rank: u8) -> Self {
        Self::new(TypeKind::Array { element, rank }, "Array", None, None)
    }

    /// Placeholder for an open generic parameter, living in the
    /// placeholder namespace so it is never emitted.
    pub fn generic_parameter(name: &str, position: u32, on_method: bool, namespace: &str) -> Self {
        Self::new(
            TypeKind::GenericParameter {
                position,
                on_method,
            },
            name,
            Some(namespace),
            None,
        )
    }

    pub(crate) fn builtin(kind: TypeKind, name: &str, keyword: Option<&'static str>) -> Self {
        let mut shape = Self::new(kind, name, Some("System"), Some(crate::CORE_ASSEMBLY));
        shape.keyword = keyword;
        shape
    }

    #[must_use]
    pub fn with_generic_arguments(mut self, arguments: Vec<TypeHandle>) -> Self {
        self.generic_arguments = arguments;
        self
    }

    #[must_use]
    pub fn with_base_type(mut self, base: TypeHandle) -> Self {
        self.base_type = Some(base);
        self
    }

    #[must_use]
    pub fn with_interfaces(mut self, interfaces: Vec<TypeHandle>) -> Self {
        self.interfaces = interfaces;
        self
    }

    pub fn is_generic(&self) -> bool {
        !self.generic_arguments.is_empty()
    }

    pub fn is_enum(&self) -> bool {
        self.kind == TypeKind::Enum
    }

    pub fn is_array(&self) -> bool {
        matches!(self.kind, TypeKind::Array { .. })
    }

    pub fn is_generic_parameter(&self) -> bool {
        matches!(self.kind, TypeKind::GenericParameter { .. })
    }

    /// Builtin types written with a keyword (`int`, `string`, `object`,
    /// `void`) are always in scope.
    pub fn has_keyword(&self) -> bool {
        self.keyword.is_some()
    }

    pub fn identity(&self) -> TypeKey {
        TypeKey {
            namespace: self.namespace.clone(),
            name: self.name.clone(),
            assembly: self.assembly.clone(),
            kind: self.kind,
            generic_arguments: self.generic_arguments.clone(),
        }
    }
}

/// Source of type shapes. Implemented by [`crate::TypeRegistry`], or by a host
/// that bridges to real runtime reflection.
pub trait TypeResolver: Send + Sync {
    /// Describe a handle. `None` for handles this resolver never issued.
    fn shape(&self, ty: TypeHandle) -> Option<Arc<TypeShape>>;

    fn is_generic(&self, ty: TypeHandle) -> bool {
        self.shape(ty).is_some_and(|s| s.is_generic())
    }

    fn is_enum(&self, ty: TypeHandle) -> bool {
        self.shape(ty).is_some_and(|s| s.is_enum())
    }

    fn base_type(&self, ty: TypeHandle) -> Option<TypeHandle> {
        self.shape(ty).and_then(|s| s.base_type)
    }

    fn interfaces(&self, ty: TypeHandle) -> Vec<TypeHandle> {
        self.shape(ty)
            .map(|s| s.interfaces.clone())
            .unwrap_or_default()
    }

    /// C#-style display name: `int`, `List<string>`, `int[]`.
    fn display_name(&self, ty: TypeHandle) -> String {
        let Some(shape) = self.shape(ty) else {
            return format!("<unknown #{}>", ty.0);
        };
        if let Some(keyword) = shape.keyword {
            return keyword.to_string();
        }
        match shape.kind {
            TypeKind::Array { element, rank } => {
                let commas = ",".repeat(usize::from(rank.saturating_sub(1)));
                format!("{}[{commas}]", self.display_name(element))
            }
            _ if shape.is_generic() => {
                let arguments: Vec<String> = shape
                    .generic_arguments
                    .iter()
                    .map(|&arg| self.display_name(arg))
                    .collect();
                format!("{}<{}>", shape.name, arguments.join(", "))
            }
            _ => shape.name.clone(),
        }
    }
}

#[cfg(test)]
#[path = "../tests/types_tests.rs"]
mod tests;
