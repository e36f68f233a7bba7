//! Issue detection rules
//!
//! Each rule is an independent, pure function over the rule context; rules
//! never see each other's output, so detection is deterministic and
//! order-independent. The final ordering is a stable sort by severity
//! descending, then source location ascending.

pub mod best_practice;
pub mod documentation;
pub mod formatting;
pub mod naming;
pub mod security;
pub mod smells;

use crate::config::QualityConfig;
use crate::core::ast::{LineIndex, StructuralModel};
use crate::core::metrics::ModuleMetrics;
use crate::core::{Issue, IssueCategory, Severity};

/// Immutable inputs shared by every rule.
pub struct RuleContext<'a> {
    pub model: &'a StructuralModel,
    pub metrics: Option<&'a ModuleMetrics>,
    pub source: &'a str,
    pub config: &'a QualityConfig,
    pub index: &'a LineIndex,
}

type Rule = fn(&RuleContext) -> Vec<Issue>;

static RULES: &[(&str, Rule)] = &[
    ("naming", naming::check),
    ("documentation", documentation::check),
    ("complexity", smells::check),
    ("formatting", formatting::check),
    ("best-practice", best_practice::check),
    ("security", security::check),
];

/// Run every rule over one analyzed unit and order the findings.
pub fn detect(
    model: &StructuralModel,
    metrics: Option<&ModuleMetrics>,
    source: &str,
    config: &QualityConfig,
) -> Vec<Issue> {
    let index = LineIndex::new(source);
    let ctx = RuleContext {
        model,
        metrics,
        source,
        config,
        index: &index,
    };

    let mut issues = Vec::new();
    for (name, rule) in RULES {
        let found = rule(&ctx);
        log::debug!("rule {name}: {} issue(s)", found.len());
        issues.extend(found);
    }

    for unsupported in &model.unsupported {
        issues.push(
            Issue::new(
                IssueCategory::Syntax,
                format!(
                    "Unsupported construct skipped: {} is not analyzed for complexity",
                    unsupported.construct
                ),
                unsupported.line,
                1,
            )
            .with_severity(Severity::Info),
        );
    }

    sort_issues(&mut issues);
    issues
}

/// Severity descending, then location ascending; the sort is stable so
/// equal keys keep rule order.
pub fn sort_issues(issues: &mut [Issue]) {
    issues.sort_by(|a, b| {
        b.severity
            .cmp(&a.severity)
            .then(a.line.cmp(&b.line))
            .then(a.column.cmp(&b.column))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::python::build_model;
    use crate::core::SourceUnit;

    #[test]
    fn detection_is_deterministic() {
        let code = "def BadName(a,b):\n    return a+b\n";
        let unit = SourceUnit::new("test.py", code);
        let model = build_model(&unit).unwrap();
        let config = QualityConfig::default();

        let first = detect(&model, None, code, &config);
        let second = detect(&model, None, code, &config);
        assert_eq!(first, second);
        assert!(!first.is_empty());
    }

    #[test]
    fn ordering_puts_critical_first_then_by_line() {
        let mut issues = vec![
            Issue::new(IssueCategory::Formatting, "late info", 1, 1),
            Issue::new(IssueCategory::Naming, "warn line 9", 9, 1),
            Issue::new(IssueCategory::Syntax, "critical", 5, 1),
            Issue::new(IssueCategory::Naming, "warn line 2", 2, 1),
        ];
        sort_issues(&mut issues);
        let severities: Vec<Severity> = issues.iter().map(|i| i.severity).collect();
        assert_eq!(
            severities,
            vec![
                Severity::Critical,
                Severity::Warning,
                Severity::Warning,
                Severity::Info
            ]
        );
        assert_eq!(issues[1].line, 2);
        assert_eq!(issues[2].line, 9);
    }
}
