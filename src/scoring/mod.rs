//! Quality aggregation: weighted score, letter grade, batch summary

use crate::config::QualityConfig;
use crate::core::metrics::ModuleMetrics;
use crate::core::{BatchSummary, Grade, Issue, QualityReport, Severity};

/// Points of complexity sub-score lost per unit of average cyclomatic
/// complexity above the configured threshold.
const COMPLEXITY_SLOPE: f64 = 10.0;

/// Penalty points per code smell.
const SMELL_PENALTY: f64 = 10.0;

/// Comment ratio granting full sub-score credit.
const IDEAL_COMMENT_RATIO: f64 = 0.20;

/// Weighted 0-100 quality score.
///
/// `score = 0.30*MI' + 0.20*complexityScore + 0.20*docCoverage
///        + 0.15*(100 - smellPenalty) + 0.15*commentRatioScore`,
/// every sub-score clamped to [0, 100] before weighting.
pub fn quality_score(metrics: &ModuleMetrics, config: &QualityConfig) -> f64 {
    let mi = metrics.maintainability_index.clamp(0.0, 100.0);
    let complexity = complexity_score(metrics.average_cyclomatic, config.max_complexity);
    let doc = metrics.docstring_coverage.clamp(0.0, 100.0);
    let smells = (100.0 - SMELL_PENALTY * f64::from(metrics.code_smells)).clamp(0.0, 100.0);
    let comments = (metrics.comment_ratio / IDEAL_COMMENT_RATIO * 100.0).clamp(0.0, 100.0);

    0.30 * mi + 0.20 * complexity + 0.20 * doc + 0.15 * smells + 0.15 * comments
}

/// Full credit at or below the threshold, then a linear slide to zero.
fn complexity_score(average_cyclomatic: f64, max_complexity: u32) -> f64 {
    let threshold = f64::from(max_complexity);
    if average_cyclomatic <= threshold {
        100.0
    } else {
        (100.0 - (average_cyclomatic - threshold) * COMPLEXITY_SLOPE).clamp(0.0, 100.0)
    }
}

/// Fold metrics and issues into the per-unit report. A unit without
/// metrics (parse failure) scores zero, never a misleading default.
pub fn aggregate(
    unit_id: String,
    metrics: Option<ModuleMetrics>,
    issues: Vec<Issue>,
    config: &QualityConfig,
) -> QualityReport {
    match metrics {
        Some(metrics) => {
            let score = quality_score(&metrics, config);
            QualityReport {
                unit_id,
                score,
                grade: Grade::from_score(score),
                metrics: Some(metrics),
                issues,
            }
        }
        None => QualityReport {
            unit_id,
            score: 0.0,
            grade: Grade::F,
            metrics: None,
            issues,
        },
    }
}

/// Arithmetic mean plus totals over a batch; no state survives the call.
pub fn summarize(reports: &[QualityReport]) -> BatchSummary {
    let files = reports.len();
    let parsed = reports.iter().filter(|r| r.metrics.is_some()).count();
    let average_score = if files == 0 {
        0.0
    } else {
        reports.iter().map(|r| r.score).sum::<f64>() / files as f64
    };

    BatchSummary {
        files,
        parsed,
        average_score,
        grade: Grade::from_score(average_score),
        critical: count_severity(reports, Severity::Critical),
        warnings: count_severity(reports, Severity::Warning),
        info: count_severity(reports, Severity::Info),
        total_debt_minutes: reports
            .iter()
            .filter_map(|r| r.metrics.as_ref())
            .map(|m| m.technical_debt_minutes)
            .sum(),
    }
}

fn count_severity(reports: &[QualityReport], severity: Severity) -> usize {
    reports
        .iter()
        .map(|r| r.count_by_severity(severity))
        .sum()
}
