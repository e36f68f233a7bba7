//! Metrics engine: pure derivation of numbers from the structural model
//!
//! Everything here is a function of (model, source, config); nothing reads
//! ambient state and nothing is mutated after creation.

pub mod loc_counter;

use crate::config::QualityConfig;
use crate::core::ast::{Declaration, DeclKind, StructuralModel};
use crate::core::metrics::{FunctionMetrics, HalsteadMetrics, ModuleMetrics};
use self::loc_counter::{classify_lines, count_kinds, LineKind};

/// Compute the per-declaration and module-level metrics snapshot.
pub fn compute_metrics(
    model: &StructuralModel,
    source: &str,
    config: &QualityConfig,
) -> ModuleMetrics {
    let kinds = classify_lines(source);
    let loc = count_kinds(&kinds);

    let functions: Vec<FunctionMetrics> = model
        .iter()
        .map(|decl| declaration_metrics(decl, &kinds))
        .collect();

    let module_cyclomatic =
        1 + model.module_facts.decision_points + model.module_facts.bool_ops;
    let halstead = HalsteadMetrics::from_counts(model.module_facts.halstead);
    let maintainability =
        maintainability_index(halstead.volume, module_cyclomatic, loc.code.max(1));

    let total_declarations = model.len();
    let documented = model.iter().filter(|d| d.has_docstring()).count();
    let docstring_coverage = if total_declarations == 0 {
        100.0
    } else {
        documented as f64 / total_declarations as f64 * 100.0
    };

    let comment_ratio = if loc.total == 0 {
        0.0
    } else {
        loc.comment as f64 / loc.total as f64
    };

    let code_smells = count_code_smells(model, config);
    let average_cyclomatic = average(functions.iter().map(|f| f.cyclomatic));
    let max_cyclomatic = functions.iter().map(|f| f.cyclomatic).max().unwrap_or(0);

    ModuleMetrics {
        total_lines: loc.total,
        source_lines: loc.code,
        comment_lines: loc.comment,
        blank_lines: loc.blank,
        num_functions: model.iter().filter(|d| d.is_callable()).count(),
        num_classes: model.iter().filter(|d| d.kind == DeclKind::Class).count(),
        cyclomatic_complexity: module_cyclomatic,
        average_cyclomatic,
        max_cyclomatic,
        cognitive_complexity: model.module_facts.cognitive,
        max_nesting: model.module_facts.max_nesting,
        halstead,
        maintainability_index: maintainability,
        documented,
        total_declarations,
        docstring_coverage,
        comment_ratio,
        code_smells,
        technical_debt_minutes: technical_debt_minutes(
            code_smells,
            module_cyclomatic,
            docstring_coverage,
        ),
        functions,
    }
}

fn declaration_metrics(decl: &Declaration, kinds: &[LineKind]) -> FunctionMetrics {
    let cyclomatic = 1 + decl.facts.decision_points + decl.facts.bool_ops;
    let halstead = HalsteadMetrics::from_counts(decl.facts.halstead);
    let code_lines = code_lines_in(kinds, decl.start_line, decl.end_line);

    FunctionMetrics {
        name: decl.name.clone(),
        kind: decl.kind,
        line: decl.start_line,
        cyclomatic,
        cognitive: decl.facts.cognitive,
        nesting: decl.facts.max_nesting,
        parameters: decl.effective_param_count(),
        length: decl.line_span,
        halstead_volume: halstead.volume,
        maintainability_index: maintainability_index(halstead.volume, cyclomatic, code_lines),
        has_docstring: decl.has_docstring(),
    }
}

fn code_lines_in(kinds: &[LineKind], start_line: usize, end_line: usize) -> usize {
    let start = start_line.saturating_sub(1).min(kinds.len());
    let end = end_line.min(kinds.len());
    kinds[start..end]
        .iter()
        .filter(|k| **k == LineKind::Code)
        .count()
        .max(1)
}

/// Maintainability index, normalized to 0-100.
///
/// `MI = 171 - 5.2*ln(V) - 0.23*G - 16.2*ln(L)`, reported as
/// `clamp(MI * 100 / 171, 0, 100)`. When no Halstead volume is available
/// the volume term is dropped rather than taking `ln(0)`.
pub fn maintainability_index(volume: f64, cyclomatic: u32, source_lines: usize) -> f64 {
    let loc = source_lines.max(1) as f64;
    let complexity = f64::from(cyclomatic);
    let raw = if volume > 0.0 {
        171.0 - 5.2 * volume.ln() - 0.23 * complexity - 16.2 * loc.ln()
    } else {
        171.0 - 0.23 * complexity - 16.2 * loc.ln()
    };
    (raw * 100.0 / 171.0).clamp(0.0, 100.0)
}

/// Smell predicates, shared between the metrics snapshot and the issue
/// detector so both always agree.
pub fn function_too_long(decl: &Declaration, config: &QualityConfig) -> bool {
    decl.is_callable() && decl.line_span > config.max_function_length
}

pub fn too_many_parameters(decl: &Declaration, config: &QualityConfig) -> bool {
    decl.is_callable() && decl.effective_param_count() > config.max_parameters
}

pub fn nesting_too_deep(decl: &Declaration, config: &QualityConfig) -> bool {
    decl.facts.max_nesting > config.max_nesting_depth
}

pub fn count_code_smells(model: &StructuralModel, config: &QualityConfig) -> u32 {
    let mut smells = 0u32;
    for decl in model.iter() {
        smells += u32::from(function_too_long(decl, config));
        smells += u32::from(too_many_parameters(decl, config));
        smells += u32::from(nesting_too_deep(decl, config));
        smells += decl.magic_numbers.len() as u32;
    }
    smells
}

/// `5*smells + 2*max(0, complexity-10) + 3*max(0, (100-coverage)/10)`
pub fn technical_debt_minutes(smells: u32, complexity: u32, doc_coverage: f64) -> u32 {
    let smell_cost = 5.0 * f64::from(smells);
    let complexity_cost = 2.0 * f64::from(complexity.saturating_sub(10));
    let doc_cost = 3.0 * ((100.0 - doc_coverage).max(0.0) / 10.0);
    (smell_cost + complexity_cost + doc_cost).round() as u32
}

fn average(values: impl Iterator<Item = u32>) -> f64 {
    let collected: Vec<u32> = values.collect();
    if collected.is_empty() {
        return 0.0;
    }
    f64::from(collected.iter().sum::<u32>()) / collected.len() as f64
}
