//! Best-practice checks: magic numbers, bare excepts, None comparisons

use crate::core::{Issue, IssueCategory};
use crate::rules::RuleContext;

pub fn check(ctx: &RuleContext) -> Vec<Issue> {
    let mut issues = Vec::new();

    for decl in ctx.model.iter() {
        for literal in &decl.magic_numbers {
            issues.push(
                Issue::new(
                    IssueCategory::BestPractice,
                    format!(
                        "Magic number {} in {} '{}'",
                        literal.text,
                        decl.kind,
                        decl.name
                    ),
                    literal.line,
                    1,
                )
                .with_suggestion(format!(
                    "Extract {} into a named constant",
                    literal.text
                )),
            );
        }
    }

    for &line in &ctx.model.bare_except_lines {
        issues.push(
            Issue::new(
                IssueCategory::BestPractice,
                "Bare 'except:' catches every exception, including SystemExit",
                line,
                1,
            )
            .with_suggestion("Catch the specific exception types you can handle"),
        );
    }

    for &line in &ctx.model.none_comparison_lines {
        issues.push(
            Issue::new(
                IssueCategory::BestPractice,
                "Comparison to None uses '=='",
                line,
                1,
            )
            .with_suggestion("Use 'is None' / 'is not None' for identity checks"),
        );
    }

    issues
}
