//! Errors raised while building or analyzing a generation unit.
//!
//! Every error here is terminal for the unit that produced it: analysis
//! mutates method models in place, so a failed unit must not be re-analyzed.

use std::fmt;
use thiserror::Error;

/// A variable that is read or written without a declaration anywhere in the
/// lexical ancestry of the method that uses it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UndefinedVariable {
    /// Variable name as written in the expression tree.
    pub name: String,
    /// Display name of the variable's static type (`int`, `List<string>`).
    pub type_name: String,
}

impl UndefinedVariable {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }
}

impl fmt::Display for UndefinedVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.type_name, self.name)
    }
}

/// Errors produced by the model and the analysis pass.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// A method body references variables that nothing declares.
    #[error(
        "method '{method}' accesses undefined variable(s): {}",
        join_variables(.variables)
    )]
    UndefinedVariables {
        method: String,
        variables: Vec<UndefinedVariable>,
    },

    /// A raw block handed to `SourceCode::from_block` does not have the
    /// "block of lambdas/comments, optionally nested one level" shape.
    #[error("invalid source code structure: {reason}")]
    InvalidStructure { reason: String },

    /// A method id that does not belong to the unit being analyzed.
    #[error("unknown method id {0}")]
    UnknownMethod(u32),

    /// A type handle the resolver cannot describe.
    #[error("unknown type handle {0}")]
    UnknownType(u32),

    /// Analysis options could not be parsed.
    #[error("invalid analysis options: {0}")]
    InvalidOptions(String),
}

impl AnalysisError {
    /// Create an invalid-structure error.
    pub fn invalid_structure(reason: impl Into<String>) -> Self {
        Self::InvalidStructure {
            reason: reason.into(),
        }
    }

    /// Names of the undefined variables, if this is an undefined-variable error.
    pub fn undefined_variable_names(&self) -> Vec<&str> {
        match self {
            Self::UndefinedVariables { variables, .. } => {
                variables.iter().map(|v| v.name.as_str()).collect()
            }
            _ => Vec::new(),
        }
    }
}

fn join_variables(variables: &[UndefinedVariable]) -> String {
    variables
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, AnalysisError>;

#[cfg(test)]
#[path = "../tests/error_tests.rs"]
mod tests;
