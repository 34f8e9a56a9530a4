//! Generated method names.
//!
//! A generated name is `DoAction` for a method that returns nothing, or
//! `Get` followed by the PascalCase name of the return type (`GetInt32`,
//! `GetStringList`, `GetInt32Array`).
//!
//! Methods on the same type with the same parameter signature share one
//! suffix sequence: `GetInt32`, then `GetInt321`, `GetInt322`. When a second
//! same-signature method needs the base name and the holder of the plain
//! base name is itself a generated block-method, the holder is renamed to
//! `{base}1` so the sequence reads uniformly. Methods with a different
//! signature are overloads and do not take part in the sequence.

use sharpgen_common::limits::{ACTION_METHOD_NAME, GETTER_METHOD_PREFIX};
use sharpgen_common::{AnalysisError, Result};
use sharpgen_model::{MethodId, MethodModel, SourceCode, TypeHandle, TypeKind, TypeResolver};
use tracing::debug;

/// Base name for a generated method returning `return_type`.
pub fn base_name(return_type: TypeHandle, resolver: &dyn TypeResolver) -> String {
    if return_type.is_void() {
        return ACTION_METHOD_NAME.to_string();
    }
    format!("{GETTER_METHOD_PREFIX}{}", type_name_part(return_type, resolver))
}

/// PascalCase rendering of a type for use inside an identifier.
pub fn type_name_part(ty: TypeHandle, resolver: &dyn TypeResolver) -> String {
    let Some(shape) = resolver.shape(ty) else {
        return "Object".to_string();
    };
    match shape.kind {
        TypeKind::Array { element, .. } => format!("{}Array", type_name_part(element, resolver)),
        _ => {
            let mut name: String = shape
                .generic_arguments
                .iter()
                .map(|&arg| type_name_part(arg, resolver))
                .collect();
            name.push_str(&pascal_case(simple_name(&shape.name)));
            name
        }
    }
}

/// `List`1` -> `List`
fn simple_name(name: &str) -> &str {
    name.split('`').next().unwrap_or(name)
}

fn pascal_case(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Numeric suffix of `name` relative to `base`: `0` for the base name
/// itself, `n` for `{base}{n}`, `None` for anything else.
fn suffix_of(name: &str, base: &str) -> Option<u32> {
    let rest = name.strip_prefix(base)?;
    if rest.is_empty() {
        return Some(0);
    }
    if !rest.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    rest.parse().ok()
}

/// Assign a generated name to `method` and return it.
///
/// `allow_rename` enables the rename of a same-signature block-method that
/// holds the plain base name. The method is not registered on its type.
pub fn finalize_name(
    unit: &mut SourceCode,
    method: MethodId,
    resolver: &dyn TypeResolver,
    allow_rename: bool,
) -> Result<String> {
    let model = unit
        .method(method)
        .ok_or(AnalysisError::UnknownMethod(method.0))?;
    let base = base_name(model.return_type, resolver);
    let signature = model.signature();
    let type_id = model.declaring_type();

    // Same-signature siblings already holding a name in this sequence.
    let mut siblings: Vec<(MethodId, u32)> = unit
        .type_decl(type_id)
        .map(|decl| decl.methods().to_vec())
        .unwrap_or_default()
        .into_iter()
        .filter(|&id| id != method)
        .filter_map(|id| {
            let sibling = unit.method(id)?;
            let suffix = suffix_of(sibling.name()?, &base)?;
            (sibling.signature() == signature).then_some((id, suffix))
        })
        .collect();

    let name = if siblings.is_empty() {
        base
    } else {
        if allow_rename && !siblings.iter().any(|&(_, suffix)| suffix == 1) {
            let holder = siblings.iter_mut().find(|(id, suffix)| {
                *suffix == 0 && unit.method(*id).is_some_and(MethodModel::is_block_method)
            });
            if let Some((holder_id, suffix)) = holder {
                let renamed = format!("{base}1");
                debug!(method = holder_id.0, name = %renamed, "renaming block-method to start suffix sequence");
                if let Some(holder) = unit.method_mut(*holder_id) {
                    holder.set_name(&renamed);
                }
                *suffix = 1;
            }
        }
        let highest = siblings.iter().map(|&(_, suffix)| suffix).max().unwrap_or(0);
        format!("{base}{}", highest + 1)
    };

    debug!(method = method.0, name = %name, "finalized method name");
    if let Some(model) = unit.method_mut(method) {
        model.set_name(&name);
    }
    Ok(name)
}

#[cfg(test)]
#[path = "../tests/naming_tests.rs"]
mod tests;
