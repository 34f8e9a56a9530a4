//! Common types and utilities for the sharpgen source generator.
//!
//! This crate provides foundational types used across all sharpgen crates:
//! - The analysis error taxonomy (`AnalysisError`, `UndefinedVariable`)
//! - Analysis options loaded from JSON (`AnalysisOptions`)
//! - Centralized names and capacity limits

// Error taxonomy shared by the model and the analysis pass
pub mod error;
pub use error::{AnalysisError, Result, UndefinedVariable};

// Configuration
pub mod options;
pub use options::AnalysisOptions;

// Centralized constants
pub mod limits;
