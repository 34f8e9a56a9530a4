//! sharpgen: analysis and block extraction for expression trees that are
//! about to be written out as C# source.
//!
//! # Architecture
//!
//! ```text
//! sharpgen-common    errors, options, naming constants
//!        │
//! sharpgen-model     type registry, expression trees, SourceCode model
//!        │
//! sharpgen-analysis  scopes, extraction, naming, namespace collection
//!        │
//! sharpgen           facade, batch analysis, tracing setup
//! ```
//!
//! A host builds a [`SourceCode`] (directly or with
//! [`SourceCode::from_block`]), calls [`analyze_source_code`], and then
//! prints each method body knowing that every remaining block sits in a
//! statement position, every hoisted block is a named method on the same
//! type, and the `using` list is complete.

pub use sharpgen_common::{
    AnalysisError, AnalysisOptions, Result, UndefinedVariable, limits,
};
pub use sharpgen_model::*;
pub use sharpgen_analysis::{
    Ancestor, ChildSlot, ExpressionAnalysis, NamespaceCollector, ScopeKind, ScopeTracker,
    analyze_expression, analyze_method, analyze_source_code, compare_namespaces, naming,
    should_extract,
};

pub mod batch;
pub use batch::{analyze_units, try_analyze_units};

pub mod tracing_config;
pub use tracing_config::{LogFormat, init_tracing};
