//! Concurrent, memoizing type registry.
//!
//! `TypeRegistry` is the process-wide cache of type shapes keyed by type
//! identity. Interning the same identity twice returns the same handle and
//! the same `Arc<TypeShape>`, and shapes are immutable once inserted.
//!
//! Uses `DashMap` so several generation units can populate it from
//! different threads at once.

use crate::types::{TypeHandle, TypeKey, TypeKind, TypeResolver, TypeShape};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use once_cell::sync::Lazy;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use tracing::trace;

/// Assembly that holds the builtin `System` types.
pub const CORE_ASSEMBLY: &str = "System.Private.CoreLib";

static GLOBAL_REGISTRY: Lazy<TypeRegistry> = Lazy::new(TypeRegistry::new);

pub struct TypeRegistry {
    shapes: DashMap<TypeHandle, Arc<TypeShape>>,
    by_identity: DashMap<TypeKey, TypeHandle>,
    next_handle: AtomicU32,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Create a registry with the builtin handles pre-registered.
    pub fn new() -> Self {
        let registry = TypeRegistry {
            shapes: DashMap::new(),
            by_identity: DashMap::new(),
            next_handle: AtomicU32::new(TypeHandle::FIRST_USER),
        };
        for (handle, shape) in builtin_shapes() {
            registry.by_identity.insert(shape.identity(), handle);
            registry.shapes.insert(handle, Arc::new(shape));
        }
        registry
    }

    /// The lazily-initialized process-wide registry.
    pub fn global() -> &'static TypeRegistry {
        &GLOBAL_REGISTRY
    }

    /// Return the handle for `shape`, registering it on first sight.
    pub fn intern(&self, shape: TypeShape) -> TypeHandle {
        let key = shape.identity();
        if let Some(handle) = self.by_identity.get(&key) {
            return *handle;
        }
        match self.by_identity.entry(key) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                let handle = TypeHandle(self.next_handle.fetch_add(1, Ordering::Relaxed));
                trace!(handle = handle.0, name = %shape.name, "registering type shape");
                // Insert the shape while the identity entry is still locked so
                // no thread can observe the handle without its shape.
                self.shapes.insert(handle, Arc::new(shape));
                entry.insert(handle);
                handle
            }
        }
    }

    /// Close an open generic definition over `arguments`:
    /// `List<T>` + `[string]` -> `List<string>`.
    pub fn instantiate(&self, definition: TypeHandle, arguments: Vec<TypeHandle>) -> Option<TypeHandle> {
        let shape = self.shape(definition)?;
        let closed = (*shape).clone().with_generic_arguments(arguments);
        Some(self.intern(closed))
    }

    /// `element[]` for a single-dimension array.
    pub fn array_of(&self, element: TypeHandle) -> TypeHandle {
        self.intern(TypeShape::array(element, 1))
    }

    pub fn class(&self, name: &str, namespace: &str, assembly: &str) -> TypeHandle {
        self.intern(TypeShape::class(name, namespace, assembly))
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

impl TypeResolver for TypeRegistry {
    fn shape(&self, ty: TypeHandle) -> Option<Arc<TypeShape>> {
        self.shapes.get(&ty).map(|entry| Arc::clone(entry.value()))
    }
}

fn builtin_shapes() -> Vec<(TypeHandle, TypeShape)> {
    vec![
        (
            TypeHandle::VOID,
            TypeShape::builtin(TypeKind::Void, "Void", Some("void")),
        ),
        (
            TypeHandle::OBJECT,
            TypeShape::builtin(TypeKind::Class, "Object", Some("object")),
        ),
        (
            TypeHandle::STRING,
            TypeShape::builtin(TypeKind::Class, "String", Some("string"))
                .with_base_type(TypeHandle::OBJECT),
        ),
        (
            TypeHandle::BOOLEAN,
            TypeShape::builtin(TypeKind::Primitive, "Boolean", Some("bool")),
        ),
        (
            TypeHandle::CHAR,
            TypeShape::builtin(TypeKind::Primitive, "Char", Some("char")),
        ),
        (
            TypeHandle::BYTE,
            TypeShape::builtin(TypeKind::Primitive, "Byte", Some("byte")),
        ),
        (
            TypeHandle::INT16,
            TypeShape::builtin(TypeKind::Primitive, "Int16", Some("short")),
        ),
        (
            TypeHandle::INT32,
            TypeShape::builtin(TypeKind::Primitive, "Int32", Some("int")),
        ),
        (
            TypeHandle::INT64,
            TypeShape::builtin(TypeKind::Primitive, "Int64", Some("long")),
        ),
        (
            TypeHandle::SINGLE,
            TypeShape::builtin(TypeKind::Primitive, "Single", Some("float")),
        ),
        (
            TypeHandle::DOUBLE,
            TypeShape::builtin(TypeKind::Primitive, "Double", Some("double")),
        ),
        (
            TypeHandle::DECIMAL,
            TypeShape::builtin(TypeKind::Struct, "Decimal", Some("decimal")),
        ),
        (
            TypeHandle::TYPE,
            TypeShape::builtin(TypeKind::Class, "Type", None).with_base_type(TypeHandle::OBJECT),
        ),
    ]
}

#[cfg(test)]
#[path = "../tests/registry_tests.rs"]
mod tests;
