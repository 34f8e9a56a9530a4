//! Build a generation unit from a raw block of lambdas.
//!
//! Accepted shape:
//!
//! ```text
//! Block (no variables, at least one expression)
//! ├── Lambda          -> public static method of `DefaultTypeName`
//! ├── Comment         -> summary line of `DefaultTypeName`
//! └── Block           -> additional type `DefaultTypeName{n}`
//!     ├── Lambda
//!     └── Comment
//! ```
//!
//! Anything else is rejected with [`AnalysisError::InvalidStructure`] before
//! analysis runs.

use crate::expr::{BlockExpr, Expr, ExprKind, LambdaExpr};
use crate::model::{MethodFlags, MethodModel, SourceCode, TypeDecl, TypeDeclId};
use sharpgen_common::{AnalysisError, AnalysisOptions, Result};
use tracing::debug;

impl SourceCode {
    /// Build a unit in `namespace` from a raw block, validating its shape.
    pub fn from_block(namespace: &str, options: &AnalysisOptions, block: &Expr) -> Result<Self> {
        let ExprKind::Block(root) = &block.kind else {
            return Err(AnalysisError::invalid_structure(format!(
                "expected a block, found {:?}",
                block.node_kind()
            )));
        };
        check_block_shape(root, "top-level")?;

        let mut unit = SourceCode::new(namespace);
        let mut default_type: Option<TypeDeclId> = None;
        let mut nested_count = 0u32;

        for expr in &root.expressions {
            match &expr.kind {
                ExprKind::Lambda(lambda) => {
                    let type_id = *default_type.get_or_insert_with(|| {
                        unit.add_type(TypeDecl::class(&options.default_type_name))
                    });
                    unit.add_method(type_id, lambda_method(lambda));
                }
                ExprKind::Comment(text) => {
                    let type_id = *default_type.get_or_insert_with(|| {
                        unit.add_type(TypeDecl::class(&options.default_type_name))
                    });
                    if let Some(decl) = unit.type_decl_mut(type_id) {
                        decl.summary.push(text.to_string());
                    }
                }
                ExprKind::Block(nested) => {
                    check_block_shape(nested, "nested")?;
                    nested_count += 1;
                    let name = format!("{}{nested_count}", options.default_type_name);
                    let type_id = unit.add_type(TypeDecl::class(&name));
                    for member in &nested.expressions {
                        match &member.kind {
                            ExprKind::Lambda(lambda) => {
                                unit.add_method(type_id, lambda_method(lambda));
                            }
                            ExprKind::Comment(text) => {
                                if let Some(decl) = unit.type_decl_mut(type_id) {
                                    decl.summary.push(text.to_string());
                                }
                            }
                            ExprKind::Block(_) => {
                                return Err(AnalysisError::invalid_structure(
                                    "blocks may only be nested one level deep",
                                ));
                            }
                            other => {
                                return Err(AnalysisError::invalid_structure(format!(
                                    "nested block may only contain lambdas and comments, found {:?}",
                                    other.node_kind()
                                )));
                            }
                        }
                    }
                }
                other => {
                    return Err(AnalysisError::invalid_structure(format!(
                        "block may only contain lambdas, comments and nested blocks, found {:?}",
                        other.node_kind()
                    )));
                }
            }
        }

        debug!(
            namespace,
            types = unit.types().len(),
            methods = unit.method_count(),
            "built source code from raw block"
        );
        Ok(unit)
    }
}

fn check_block_shape(block: &BlockExpr, position: &str) -> Result<()> {
    if !block.variables.is_empty() {
        return Err(AnalysisError::invalid_structure(format!(
            "{position} block must not declare variables"
        )));
    }
    if block.expressions.is_empty() {
        return Err(AnalysisError::invalid_structure(format!(
            "{position} block is empty"
        )));
    }
    Ok(())
}

fn lambda_method(lambda: &LambdaExpr) -> MethodModel {
    MethodModel::new(
        lambda.name.as_deref(),
        lambda.parameters.clone(),
        lambda.body.ty,
        Some((*lambda.body).clone()),
    )
    .with_flags(MethodFlags::STATIC)
}

#[cfg(test)]
#[path = "../tests/from_block_tests.rs"]
mod tests;
