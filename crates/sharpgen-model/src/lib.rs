//! Data model for the sharpgen source generator.
//!
//! This crate holds everything the analysis pass reads and rewrites:
//! - Type identity (`TypeHandle`, `TypeShape`, `TypeResolver`) and the
//!   concurrent memoizing `TypeRegistry`
//! - The expression tree (`Expr`, `ExprKind`, `NodeKind`, `CustomExpr`)
//! - The Type/Member model of a generation unit (`SourceCode`, `TypeDecl`,
//!   `MethodModel`, properties, fields, attributes)
//!
//! # Architecture
//!
//! ```text
//! TypeRegistry (process-wide, DashMap)
//!        │ TypeHandle
//!        ▼
//! SourceCode ──owns──► TypeDecl[]   (methods: Vec<MethodId>)
//!            ──owns──► MethodModel[] (body: Expr)
//!                                      │ MethodCall { method: MethodId }
//!                                      └────────────► MethodModel
//! ```

pub mod types;
pub use types::{TypeHandle, TypeKey, TypeKind, TypeResolver, TypeShape};

pub mod registry;
pub use registry::{CORE_ASSEMBLY, TypeRegistry};

pub mod expr;
pub use expr::{
    AssignOp, BinaryOp, BlockExpr, CatchBlock, ConstantValue, CustomExpr, DebugMarker, Expr,
    ExprKind, GotoKind, Label, LabelId, LambdaExpr, MemberInfo, MemberKind, MethodInfo, NodeKind,
    SwitchCase, SwitchExpr, TryExpr, UnaryOp, VarId, Variable,
};

// Expr constructors
mod factory;

pub mod model;
pub use model::{
    AccessorKind, AttributeModel, FieldModel, MethodAnalysis, MethodFlags, MethodId, MethodModel,
    MethodOrigin, PropertyModel, SourceCode, TypeDecl, TypeDeclId, TypeDeclKind, TypeReference,
    UnitAnalysis, Visibility,
};

// SourceCode::from_block
mod from_block;
