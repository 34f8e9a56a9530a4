//! Parallel analysis of independent generation units.
//!
//! Units share nothing but the type resolver, which is `Sync`, so each one
//! is analyzed on its own rayon worker. Results come back in input order.

use rayon::prelude::*;
use sharpgen_analysis::analyze_source_code;
use sharpgen_common::{AnalysisOptions, Result};
use sharpgen_model::{SourceCode, TypeResolver, UnitAnalysis};
use std::sync::Arc;
use tracing::{debug, warn};

/// Analyze every unit in parallel. A failing unit does not stop the others.
#[tracing::instrument(level = "debug", skip_all, fields(units = units.len()))]
pub fn analyze_units(
    units: &mut [SourceCode],
    resolver: &dyn TypeResolver,
    options: &AnalysisOptions,
) -> Vec<Result<Arc<UnitAnalysis>>> {
    let results: Vec<Result<Arc<UnitAnalysis>>> = units
        .par_iter_mut()
        .map(|unit| {
            let result = analyze_source_code(unit, resolver, options);
            if let Err(err) = &result {
                warn!(namespace = %unit.namespace(), error = %err, "unit analysis failed");
            }
            result
        })
        .collect();
    debug!(
        failed = results.iter().filter(|result| result.is_err()).count(),
        "batch analysis complete"
    );
    results
}

/// Like [`analyze_units`] but stops at the first failure, in input order.
pub fn try_analyze_units(
    units: &mut [SourceCode],
    resolver: &dyn TypeResolver,
    options: &AnalysisOptions,
) -> Result<Vec<Arc<UnitAnalysis>>> {
    analyze_units(units, resolver, options).into_iter().collect()
}
