//! Documentation checks: missing and incomplete docstrings

use crate::core::ast::Declaration;
use crate::core::{FixAction, FixKind, Issue, IssueCategory, Span};
use crate::docstring::{synthesize, validate, DocSignature, DocstringStyle};
use crate::rules::RuleContext;

pub fn check(ctx: &RuleContext) -> Vec<Issue> {
    let mut issues = Vec::new();

    for decl in ctx.model.iter() {
        let (line, column) = ctx.index.line_col(decl.name_span.start);
        let signature = DocSignature::from_declaration(decl);

        if !decl.has_docstring() {
            let mut issue = Issue::new(
                IssueCategory::Documentation,
                format!("{} '{}' is missing a docstring", kind_label(decl), decl.name),
                line,
                column,
            )
            .with_suggestion(format!(
                "Add a {} docstring describing purpose and parameters",
                style_label(ctx.config.docstring_style)
            ));

            if let Some(point) = decl.insert_point {
                let block = docstring_block(
                    &synthesize(&signature, ctx.config.docstring_style),
                    point.indent,
                );
                issue = issue.with_fix(
                    FixAction::new(
                        Span::new(point.offset, point.offset),
                        block,
                        FixKind::InsertDocstring,
                    )
                    .with_description(format!(
                        "Inserted a templated docstring for '{}'",
                        decl.name
                    )),
                );
            }

            issues.push(issue);
            continue;
        }

        if let Some(doc) = &decl.docstring {
            let result = validate(&signature, &doc.text);
            if !result.is_complete() {
                let missing: Vec<String> = result
                    .missing_sections
                    .iter()
                    .map(|s| s.to_string())
                    .collect();
                issues.push(
                    Issue::new(
                        IssueCategory::Documentation,
                        format!(
                            "Docstring for '{}' is missing sections: {}",
                            decl.name,
                            missing.join(", ")
                        ),
                        line,
                        column,
                    )
                    .with_suggestion("Document every parameter, return value, and raised exception"),
                );
            }
        }
    }

    issues
}

fn kind_label(decl: &Declaration) -> &'static str {
    match decl.kind {
        crate::core::ast::DeclKind::Function => "Function",
        crate::core::ast::DeclKind::Method => "Method",
        crate::core::ast::DeclKind::Class => "Class",
    }
}

fn style_label(style: DocstringStyle) -> &'static str {
    match style {
        DocstringStyle::Google => "Google-style",
        DocstringStyle::Numpy => "NumPy-style",
        DocstringStyle::Rest => "reST-style",
    }
}

/// Wrap a rendered docstring body in triple quotes, indented for splicing
/// directly before the first body statement.
fn docstring_block(body: &str, indent: usize) -> String {
    let pad = " ".repeat(indent);
    let lines: Vec<&str> = body.lines().collect();
    let content_lines = lines.iter().filter(|l| !l.trim().is_empty()).count();

    if content_lines <= 1 {
        let summary = lines.first().copied().unwrap_or_default();
        return format!("\"\"\"{summary}\"\"\"\n{pad}");
    }

    let mut block = String::from("\"\"\"");
    let mut first = true;
    for line in &lines {
        if first {
            block.push_str(line);
            first = false;
            continue;
        }
        block.push('\n');
        if !line.trim().is_empty() {
            block.push_str(&pad);
            block.push_str(line);
        }
    }
    block.push('\n');
    block.push_str(&pad);
    block.push_str("\"\"\"\n");
    block.push_str(&pad);
    block
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::python::build_model;
    use crate::config::QualityConfig;
    use crate::core::ast::LineIndex;
    use crate::core::SourceUnit;
    use indoc::indoc;

    fn run_rule(code: &str) -> Vec<Issue> {
        let unit = SourceUnit::new("test.py", code);
        let model = build_model(&unit).unwrap();
        let config = QualityConfig::default();
        let index = LineIndex::new(code);
        check(&RuleContext {
            model: &model,
            metrics: None,
            source: code,
            config: &config,
            index: &index,
        })
    }

    #[test]
    fn missing_docstring_gets_an_insert_fix() {
        let issues = run_rule("def calculate_total(items):\n    return sum(items)\n");
        assert_eq!(issues.len(), 1);
        let fix = issues[0].fix.as_ref().expect("fix attached");
        assert_eq!(fix.kind, FixKind::InsertDocstring);
        assert!(fix.span.is_empty(), "insertion uses a zero-width span");
        assert!(fix.replacement.contains("items"));
        assert!(fix.replacement.contains("Returns:"));
    }

    #[test]
    fn one_line_suite_is_flagged_without_fix() {
        let issues = run_rule("def f(): return 1\n");
        assert_eq!(issues.len(), 1);
        assert!(issues[0].fix.is_none());
    }

    #[test]
    fn complete_docstring_is_silent() {
        let code = indoc! {r#"
            def calculate_total(items):
                """Sum the items.

                Args:
                    items: Values to add.

                Returns:
                    Total of all items.
                """
                return sum(items)
        "#};
        assert!(run_rule(code).is_empty());
    }

    #[test]
    fn incomplete_docstring_lists_missing_sections() {
        let code = indoc! {r#"
            def calculate_total(items):
                """Sum the items."""
                return sum(items)
        "#};
        let issues = run_rule(code);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].fix.is_none());
        assert!(issues[0].message.contains("parameters"));
        assert!(issues[0].message.contains("returns"));
    }

    #[test]
    fn docstring_block_is_properly_indented() {
        let block = docstring_block("Summary.\n\nArgs:\n    x: One.\n", 4);
        assert!(block.starts_with("\"\"\"Summary."));
        assert!(block.contains("\n    Args:\n"));
        assert!(block.ends_with("\"\"\"\n    "));
    }

    #[test]
    fn single_line_summary_stays_on_one_line() {
        let block = docstring_block("User account.\n", 4);
        assert_eq!(block, "\"\"\"User account.\"\"\"\n    ");
    }
}
