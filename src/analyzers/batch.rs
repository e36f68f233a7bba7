//! Parallel batch analysis
//!
//! Units are embarrassingly parallel: each analysis is a pure function of
//! its unit and the shared immutable configuration. A parse failure in
//! one unit never aborts the others; it simply becomes that unit's
//! CRITICAL report.

use crate::analyzers::analyze;
use crate::config::QualityConfig;
use crate::core::{QualityReport, SourceUnit};
use rayon::prelude::*;

/// Analyze a batch of units on the rayon worker pool, preserving input
/// order in the output.
pub fn analyze_batch(units: &[SourceUnit], config: &QualityConfig) -> Vec<QualityReport> {
    units.par_iter().map(|unit| analyze(unit, config)).collect()
}
