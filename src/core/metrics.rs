//! Metric value objects, derived once per analysis and never mutated

use crate::core::ast::{DeclKind, HalsteadCounts};
use serde::{Deserialize, Serialize};

/// Halstead size/difficulty/effort measures.
///
/// Volume `V = (N1+N2) * log2(n1+n2)`, difficulty `D = (n1/2) * (N2/n2)`,
/// effort `E = D * V`, time `T = E / 18` seconds, bugs `B = V / 3000`.
/// Degenerate counts produce zeros rather than NaN.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct HalsteadMetrics {
    pub distinct_operators: u32,
    pub distinct_operands: u32,
    pub total_operators: u32,
    pub total_operands: u32,
    pub vocabulary: u32,
    pub length: u32,
    pub volume: f64,
    pub difficulty: f64,
    pub effort: f64,
    pub time_seconds: f64,
    pub estimated_bugs: f64,
}

impl HalsteadMetrics {
    pub fn from_counts(counts: HalsteadCounts) -> Self {
        let n1 = counts.distinct_operators;
        let n2 = counts.distinct_operands;
        let big_n1 = counts.total_operators;
        let big_n2 = counts.total_operands;

        let vocabulary = n1 + n2;
        let length = big_n1 + big_n2;

        let volume = if vocabulary == 0 {
            0.0
        } else {
            f64::from(length) * f64::from(vocabulary).log2()
        };
        let difficulty = if n2 == 0 {
            0.0
        } else {
            (f64::from(n1) / 2.0) * (f64::from(big_n2) / f64::from(n2))
        };
        let effort = difficulty * volume;

        Self {
            distinct_operators: n1,
            distinct_operands: n2,
            total_operators: big_n1,
            total_operands: big_n2,
            vocabulary,
            length,
            volume,
            difficulty,
            effort,
            time_seconds: effort / 18.0,
            estimated_bugs: volume / 3000.0,
        }
    }
}

/// Per-declaration metrics row.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FunctionMetrics {
    pub name: String,
    pub kind: DeclKind,
    pub line: usize,
    pub cyclomatic: u32,
    pub cognitive: u32,
    pub nesting: u32,
    pub parameters: usize,
    /// Physical lines covered by the declaration span
    pub length: usize,
    pub halstead_volume: f64,
    /// Normalized 0-100
    pub maintainability_index: f64,
    pub has_docstring: bool,
}

impl FunctionMetrics {
    pub fn is_complex(&self, threshold: u32) -> bool {
        self.cyclomatic > threshold || self.cognitive > threshold
    }
}

/// Module-level metrics snapshot.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ModuleMetrics {
    pub total_lines: usize,
    pub source_lines: usize,
    pub comment_lines: usize,
    pub blank_lines: usize,
    pub num_functions: usize,
    pub num_classes: usize,
    /// Module-wide cyclomatic complexity (all decision points, one base path)
    pub cyclomatic_complexity: u32,
    pub average_cyclomatic: f64,
    pub max_cyclomatic: u32,
    pub cognitive_complexity: u32,
    pub max_nesting: u32,
    pub halstead: HalsteadMetrics,
    /// Normalized 0-100
    pub maintainability_index: f64,
    pub documented: usize,
    pub total_declarations: usize,
    pub docstring_coverage: f64,
    pub comment_ratio: f64,
    pub code_smells: u32,
    pub technical_debt_minutes: u32,
    pub functions: Vec<FunctionMetrics>,
}

pub fn calculate_average_complexity(functions: &[FunctionMetrics]) -> f64 {
    if functions.is_empty() {
        return 0.0;
    }
    let total: u32 = functions.iter().map(|f| f.cyclomatic).sum();
    f64::from(total) / functions.len() as f64
}

pub fn find_max_complexity(functions: &[FunctionMetrics]) -> u32 {
    functions.iter().map(|f| f.cyclomatic).max().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn halstead_from_empty_counts_is_all_zero() {
        let h = HalsteadMetrics::from_counts(HalsteadCounts::default());
        assert_eq!(h.volume, 0.0);
        assert_eq!(h.difficulty, 0.0);
        assert_eq!(h.effort, 0.0);
        assert_eq!(h.time_seconds, 0.0);
        assert_eq!(h.estimated_bugs, 0.0);
    }

    #[test]
    fn halstead_formulas_on_known_counts() {
        // x + y: one distinct operator used once, two operands used once each
        let h = HalsteadMetrics::from_counts(HalsteadCounts {
            distinct_operators: 1,
            distinct_operands: 2,
            total_operators: 1,
            total_operands: 2,
        });
        assert_eq!(h.vocabulary, 3);
        assert_eq!(h.length, 3);
        assert!((h.volume - 3.0 * 3f64.log2()).abs() < 1e-9);
        assert!((h.difficulty - 0.5).abs() < 1e-9);
        assert!((h.effort - h.difficulty * h.volume).abs() < 1e-9);
        assert!((h.time_seconds - h.effort / 18.0).abs() < 1e-9);
        assert!((h.estimated_bugs - h.volume / 3000.0).abs() < 1e-9);
    }

    #[test]
    fn difficulty_zero_when_no_operands() {
        let h = HalsteadMetrics::from_counts(HalsteadCounts {
            distinct_operators: 2,
            distinct_operands: 0,
            total_operators: 4,
            total_operands: 0,
        });
        assert_eq!(h.difficulty, 0.0);
        assert!(h.volume > 0.0);
    }

    #[test]
    fn average_complexity_over_functions() {
        let f = |cyclomatic| FunctionMetrics {
            name: "f".into(),
            kind: DeclKind::Function,
            line: 1,
            cyclomatic,
            cognitive: 0,
            nesting: 0,
            parameters: 0,
            length: 1,
            halstead_volume: 0.0,
            maintainability_index: 100.0,
            has_docstring: false,
        };
        assert_eq!(calculate_average_complexity(&[]), 0.0);
        assert_eq!(calculate_average_complexity(&[f(1), f(3)]), 2.0);
        assert_eq!(find_max_complexity(&[f(1), f(3)]), 3);
    }
}
