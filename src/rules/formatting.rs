//! Formatting checks: spacing, trailing whitespace, blank-line runs
//!
//! All findings are INFO with normalize-whitespace fixes. Spacing checks
//! are skipped on lines carrying string quotes or comments, where a
//! byte-level scan cannot tell code from prose.

use crate::core::{FixAction, FixKind, Issue, IssueCategory, Span};
use crate::metrics::loc_counter::{classify_lines, LineKind};
use crate::rules::RuleContext;

const MAX_CONSECUTIVE_BLANKS: usize = 2;

pub fn check(ctx: &RuleContext) -> Vec<Issue> {
    let mut issues = Vec::new();
    let kinds = classify_lines(ctx.source);

    for (i, line) in ctx.source.lines().enumerate() {
        let line_no = i + 1;
        let Some(line_start) = ctx.index.line_start(line_no) else {
            continue;
        };

        if !line.trim().is_empty() {
            check_trailing_whitespace(line, line_no, line_start, &mut issues);
        }

        let is_code = kinds.get(i).copied() == Some(LineKind::Code);
        if is_code && !line.contains(['"', '\'', '#']) {
            check_spacing(line, line_no, line_start, &mut issues);
        }
    }

    check_blank_runs(ctx, &kinds, &mut issues);
    issues
}

fn check_trailing_whitespace(
    line: &str,
    line_no: usize,
    line_start: usize,
    issues: &mut Vec<Issue>,
) {
    let trimmed_len = line.trim_end().len();
    if trimmed_len == line.len() {
        return;
    }

    let span = Span::new(line_start + trimmed_len, line_start + line.len());
    issues.push(
        Issue::new(
            IssueCategory::Formatting,
            "Trailing whitespace",
            line_no,
            trimmed_len + 1,
        )
        .with_fix(
            FixAction::new(span, "", FixKind::NormalizeWhitespace)
                .with_description(format!("Removed trailing whitespace on line {line_no}")),
        ),
    );
}

/// Byte scan for missing spaces after commas and around binary operators.
/// Each finding patches exactly the operator bytes, so chained operators
/// (`a+b+c`) produce disjoint fixes and one pass settles the line.
fn check_spacing(line: &str, line_no: usize, line_start: usize, issues: &mut Vec<Issue>) {
    let bytes = line.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];

        if b == b',' {
            if let Some(&next) = bytes.get(i + 1) {
                if !next.is_ascii_whitespace() && !matches!(next, b')' | b']' | b'}' | b',') {
                    issues.push(spacing_issue(
                        "Missing space after comma",
                        line_no,
                        line_start,
                        i,
                        1,
                        ", ".to_string(),
                        line,
                    ));
                }
            }
            i += 1;
            continue;
        }

        if let Some(op_len) = two_byte_operator(bytes, i) {
            if operand_before(bytes, i) && operand_after(bytes, i + op_len) {
                let op = &line[i..i + op_len];
                issues.push(spacing_issue(
                    "Missing spaces around operator",
                    line_no,
                    line_start,
                    i,
                    op_len,
                    format!(" {op} "),
                    line,
                ));
            }
            i += op_len;
            continue;
        }

        if is_single_operator(b)
            && operand_before(bytes, i)
            && operand_after(bytes, i + 1)
            && !is_exponent_sign(bytes, i)
        {
            let op = &line[i..i + 1];
            issues.push(spacing_issue(
                "Missing spaces around operator",
                line_no,
                line_start,
                i,
                1,
                format!(" {op} "),
                line,
            ));
        }

        i += 1;
    }
}

fn spacing_issue(
    message: &str,
    line_no: usize,
    line_start: usize,
    col: usize,
    len: usize,
    replacement: String,
    line: &str,
) -> Issue {
    let token = &line[col..col + len];
    let span = Span::new(line_start + col, line_start + col + len);
    Issue::new(
        IssueCategory::Formatting,
        format!("{message}: '{token}'"),
        line_no,
        col + 1,
    )
    .with_fix(
        FixAction::new(span, replacement, FixKind::NormalizeWhitespace).with_description(format!(
            "Normalized spacing around '{token}' on line {line_no}"
        )),
    )
}

fn two_byte_operator(bytes: &[u8], i: usize) -> Option<usize> {
    let pair = bytes.get(i..i + 2)?;
    matches!(pair, b"==" | b"!=" | b"<=" | b">=").then_some(2)
}

fn is_single_operator(b: u8) -> bool {
    matches!(b, b'+' | b'-' | b'*' | b'/' | b'%' | b'<' | b'>')
}

fn operand_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

fn operand_before(bytes: &[u8], i: usize) -> bool {
    i > 0 && operand_byte(bytes[i - 1])
}

fn operand_after(bytes: &[u8], end: usize) -> bool {
    bytes.get(end).copied().map(operand_byte).unwrap_or(false)
}

/// `1e-5` reads as one number, not a subtraction.
fn is_exponent_sign(bytes: &[u8], i: usize) -> bool {
    if !matches!(bytes[i], b'+' | b'-') {
        return false;
    }
    i >= 2
        && matches!(bytes[i - 1], b'e' | b'E')
        && bytes[i - 2].is_ascii_digit()
        && bytes.get(i + 1).map(|b| b.is_ascii_digit()).unwrap_or(false)
}

/// Runs of more than two blank lines collapse down to two. Blank lines
/// inside triple-quoted strings classify as comments and are untouched.
fn check_blank_runs(ctx: &RuleContext, kinds: &[LineKind], issues: &mut Vec<Issue>) {
    let mut run_start: Option<usize> = None;

    for i in 0..=kinds.len() {
        let blank = i < kinds.len() && kinds[i] == LineKind::Blank;
        match (blank, run_start) {
            (true, None) => run_start = Some(i),
            (false, Some(start)) => {
                let run_len = i - start;
                if run_len > MAX_CONSECUTIVE_BLANKS {
                    push_blank_run_issue(ctx, start, i, issues);
                }
                run_start = None;
            }
            _ => {}
        }
    }
}

fn push_blank_run_issue(ctx: &RuleContext, start: usize, end: usize, issues: &mut Vec<Issue>) {
    let keep_until = start + MAX_CONSECUTIVE_BLANKS;
    let (Some(span_start), Some(span_end)) = (
        ctx.index.line_start(keep_until + 1),
        ctx.index.line_start(end + 1),
    ) else {
        return;
    };

    issues.push(
        Issue::new(
            IssueCategory::Formatting,
            format!("{} consecutive blank lines (maximum {MAX_CONSECUTIVE_BLANKS})", end - start),
            keep_until + 1,
            1,
        )
        .with_fix(
            FixAction::new(Span::new(span_start, span_end), "", FixKind::NormalizeWhitespace)
                .with_description(format!(
                    "Collapsed {} blank lines to {MAX_CONSECUTIVE_BLANKS}",
                    end - start
                )),
        ),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::python::build_model;
    use crate::config::QualityConfig;
    use crate::core::ast::LineIndex;
    use crate::core::SourceUnit;

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
    fn comma_and_operator_spacing_both_flagged() {
        let issues = run_rule("def f(x,y): return x+y\n");
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().all(|i| i.category == IssueCategory::Formatting));
        assert!(issues.iter().all(|i| i.fix.is_some()));
    }

    #[test]
    fn chained_operators_get_disjoint_fixes() {
        let issues = run_rule("t = a+b+c\n");
        assert_eq!(issues.len(), 2);
        let spans: Vec<Span> = issues.iter().map(|i| i.fix.as_ref().unwrap().span).collect();
        assert!(!spans[0].intersects(&spans[1]));
    }

    #[test]
    fn well_formatted_code_is_silent() {
        assert!(run_rule("def f(x, y):\n    return x + y\n").is_empty());
    }

    #[test]
    fn strings_and_comments_are_left_alone() {
        assert!(run_rule("s = 'a,b'\n").is_empty());
        assert!(run_rule("t = 1  # x+y stays\n").is_empty());
    }

    #[test]
    fn augmented_assign_and_arrow_are_not_operators_here() {
        assert!(run_rule("x += 1\n").is_empty());
        assert!(run_rule("def f(x) -> int:\n    return x\n").is_empty());
    }

    #[test]
    fn exponent_literals_are_not_subtraction() {
        assert!(run_rule("tiny = 1e-5\n").is_empty());
    }

    #[test]
    fn trailing_whitespace_is_trimmed() {
        let issues = run_rule("x = 1   \n");
        assert_eq!(issues.len(), 1);
        let fix = issues[0].fix.as_ref().unwrap();
        assert_eq!(fix.span.len(), 3);
        assert_eq!(fix.replacement, "");
    }

    #[test]
    fn long_blank_runs_collapse_to_two() {
        let issues = run_rule("a = 1\n\n\n\n\nb = 2\n");
        assert_eq!(issues.len(), 1);
        let fix = issues[0].fix.as_ref().unwrap();
        assert_eq!(fix.replacement, "");
        assert!(fix.span.len() > 0);
    }

    #[test]
    fn keyword_arguments_keep_tight_equals() {
        assert!(run_rule("f(a, key=value)\n").is_empty());
    }
}
