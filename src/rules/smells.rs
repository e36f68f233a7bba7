//! Complexity and structural smell checks
//!
//! Threshold predicates live in the metrics module so the smell count in
//! the metrics snapshot and the issues reported here always agree.

use crate::core::{Issue, IssueCategory};
use crate::metrics::{function_too_long, nesting_too_deep, too_many_parameters};
use crate::rules::RuleContext;

pub fn check(ctx: &RuleContext) -> Vec<Issue> {
    let mut issues = Vec::new();

    for decl in ctx.model.iter() {
        let (line, column) = ctx.index.line_col(decl.name_span.start);
        let cyclomatic = 1 + decl.facts.decision_points + decl.facts.bool_ops;

        if cyclomatic > ctx.config.max_complexity {
            issues.push(
                Issue::new(
                    IssueCategory::Complexity,
                    format!(
                        "Function '{}' has cyclomatic complexity {} (threshold: {})",
                        decl.name, cyclomatic, ctx.config.max_complexity
                    ),
                    line,
                    column,
                )
                .with_suggestion("Extract branches into smaller helper functions"),
            );
        }

        if function_too_long(decl, ctx.config) {
            issues.push(
                Issue::new(
                    IssueCategory::Complexity,
                    format!(
                        "Function '{}' is {} lines long (threshold: {})",
                        decl.name, decl.line_span, ctx.config.max_function_length
                    ),
                    line,
                    column,
                )
                .with_suggestion("Split the function into focused pieces"),
            );
        }

        if too_many_parameters(decl, ctx.config) {
            issues.push(
                Issue::new(
                    IssueCategory::Complexity,
                    format!(
                        "Function '{}' has {} parameters (threshold: {})",
                        decl.name,
                        decl.effective_param_count(),
                        ctx.config.max_parameters
                    ),
                    line,
                    column,
                )
                .with_suggestion("Group related parameters into a dataclass or dict"),
            );
        }

        if nesting_too_deep(decl, ctx.config) {
            issues.push(
                Issue::new(
                    IssueCategory::Complexity,
                    format!(
                        "Function '{}' has nesting depth {} (threshold: {})",
                        decl.name, decl.facts.max_nesting, ctx.config.max_nesting_depth
                    ),
                    line,
                    column,
                )
                .with_suggestion("Flatten with early returns or extracted helpers"),
            );
        }
    }

    issues
}
