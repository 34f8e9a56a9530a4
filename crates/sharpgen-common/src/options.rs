//! Analysis options.
//!
//! Options are plain data with serde support so hosts can keep them next to
//! their other generator settings as JSON:
//!
//! ```json
//! { "collectAssemblies": false, "joinAssignments": true }
//! ```
//!
//! Every field is optional; missing fields take the defaults below.

use crate::error::{AnalysisError, Result};
use crate::limits;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnalysisOptions {
    /// Accumulate required assembly references alongside namespaces.
    pub collect_assemblies: bool,
    /// Namespace of the synthetic placeholder types that stand in for open
    /// generic parameters. Types in it are never written to `using` lists.
    pub generic_placeholder_namespace: String,
    /// Detect first assignments that can be emitted as declarations.
    pub join_assignments: bool,
    /// Type name used when a unit is built from a raw block of lambdas.
    pub default_type_name: String,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        AnalysisOptions {
            collect_assemblies: true,
            generic_placeholder_namespace: limits::GENERIC_PLACEHOLDER_NAMESPACE.to_string(),
            join_assignments: true,
            default_type_name: limits::DEFAULT_TYPE_NAME.to_string(),
        }
    }
}

impl AnalysisOptions {
    /// Parse options from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|err| AnalysisError::InvalidOptions(err.to_string()))
    }

    /// Serialize options to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|err| AnalysisError::InvalidOptions(err.to_string()))
    }

    /// Whether `namespace` is the synthetic generic-placeholder namespace.
    pub fn is_placeholder_namespace(&self, namespace: &str) -> bool {
        namespace == self.generic_placeholder_namespace
    }
}

#[cfg(test)]
#[path = "../tests/options_tests.rs"]
mod tests;
