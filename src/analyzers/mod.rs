//! Analysis pipeline: text → model → (metrics, issues) → report
//!
//! Data flows strictly forward; every stage consumes immutable inputs and
//! returns newly allocated values, so units can be analyzed concurrently
//! with no synchronization.

pub mod batch;
pub mod python;

use crate::config::QualityConfig;
use crate::core::errors::Error;
use crate::core::{FixReport, Issue, IssueCategory, QualityReport, SourceUnit};
use crate::fixer;
use crate::metrics;
use crate::rules;
use crate::scoring;

/// Analyze one unit. A parse failure yields a report with exactly one
/// CRITICAL issue and no metrics; it never propagates as an error.
pub fn analyze(unit: &SourceUnit, config: &QualityConfig) -> QualityReport {
    match python::build_model(unit) {
        Ok(model) => {
            let metrics = metrics::compute_metrics(&model, &unit.text, config);
            let issues = rules::detect(&model, Some(&metrics), &unit.text, config);
            scoring::aggregate(unit.id.clone(), Some(metrics), issues, config)
        }
        Err(err) => {
            scoring::aggregate(unit.id.clone(), None, vec![parse_issue(&err)], config)
        }
    }
}

/// Analyze one unit and, when auto-fix is enabled, apply the eligible
/// fixes to its text.
pub fn analyze_and_fix(
    unit: &SourceUnit,
    config: &QualityConfig,
) -> (QualityReport, Option<FixReport>) {
    let report = analyze(unit, config);
    if !config.autofix_enabled {
        return (report, None);
    }
    let fixes = fixer::apply_fixes(&unit.text, &report.issues, config);
    (report, Some(fixes))
}

fn parse_issue(err: &Error) -> Issue {
    match err {
        Error::Parse {
            line,
            column,
            message,
        } => Issue::new(
            IssueCategory::Syntax,
            format!("Syntax error: {message}"),
            *line,
            *column,
        )
        .with_suggestion("Fix the syntax error before any other analysis can run"),
        other => Issue::new(IssueCategory::Syntax, other.to_string(), 1, 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Grade, Severity};

    #[test]
    fn valid_unit_produces_metrics_and_score() {
        let unit = SourceUnit::new(
            "ok.py",
            "def add(a, b):\n    \"\"\"Add two numbers.\n\n    Args:\n        a: First.\n        b: Second.\n\n    Returns:\n        The sum.\n    \"\"\"\n    return a + b\n",
        );
        let report = analyze(&unit, &QualityConfig::default());
        assert!(report.metrics.is_some());
        assert!(report.score > 60.0);
    }

    #[test]
    fn parse_failure_is_one_critical_issue_without_metrics() {
        let unit = SourceUnit::new("bad.py", "def f(:\n");
        let report = analyze(&unit, &QualityConfig::default());
        assert!(report.metrics.is_none());
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].severity, Severity::Critical);
        assert_eq!(report.grade, Grade::F);
        assert_eq!(report.score, 0.0);
    }

    #[test]
    fn fixes_are_only_applied_when_enabled() {
        let unit = SourceUnit::new("style.py", "def f(x,y):\n    return x+y\n");

        let (_, no_fixes) = analyze_and_fix(&unit, &QualityConfig::default());
        assert!(no_fixes.is_none());

        let config = QualityConfig {
            autofix_enabled: true,
            ..Default::default()
        };
        let (_, fixes) = analyze_and_fix(&unit, &config);
        let report = fixes.expect("autofix enabled");
        assert!(report.changed());
        assert!(report.fixed_text.contains("x + y"));
    }
}
