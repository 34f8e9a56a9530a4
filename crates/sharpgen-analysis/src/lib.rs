//! Expression analysis and method extraction for the sharpgen source
//! generator.
//!
//! # Architecture
//!
//! One recursive walk per method body does everything:
//!
//! ```text
//!                 ┌──────────────┐
//!  method body ──►│   Rewriter   │──► rewritten body
//!                 └──────┬───────┘
//!        ┌───────────────┼────────────────┬──────────────────┐
//!        ▼               ▼                ▼                  ▼
//!  ScopeTracker   should_extract   block-method synthesis   NamespaceCollector
//!  (declare,      (parent kind +   (new MethodModel,        (using directives,
//!   access,        slot)            deferred naming)         assembly refs)
//!   finalize)
//! ```
//!
//! - `scope` - arena of lexical scopes and escaping-variable bookkeeping
//! - `extraction` - which blocks must be hoisted out of their position
//! - `naming` - generated method names and suffix sequences
//! - `rewriter` / `synthesis` - the walk itself and block hoisting
//! - `namespaces` - namespace/assembly collection and ordering
//! - `analyze` - unit, method and expression entry points

pub mod scope;
pub use scope::{ScopeId, ScopeKind, ScopeTracker};

pub mod extraction;
pub use extraction::{Ancestor, ChildSlot, should_extract};

pub mod naming;

pub mod namespaces;
pub use namespaces::{NamespaceCollector, compare_namespaces};

mod rewriter;
mod synthesis;

pub mod analyze;
pub use analyze::{ExpressionAnalysis, analyze_expression, analyze_method, analyze_source_code};
