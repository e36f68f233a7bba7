//! Naming convention checks
//!
//! Functions and methods use snake_case, classes use PascalCase. Fixes
//! rename the declaration header only; call sites elsewhere in the unit
//! are left alone.

use crate::core::ast::DeclKind;
use crate::core::{FixAction, FixKind, Issue, IssueCategory};
use crate::rules::RuleContext;

pub fn check(ctx: &RuleContext) -> Vec<Issue> {
    let mut issues = Vec::new();

    for decl in ctx.model.iter() {
        let violation = match decl.kind {
            DeclKind::Function | DeclKind::Method => {
                (!is_snake_case(&decl.name)).then(|| to_snake_case(&decl.name))
            }
            DeclKind::Class => (!is_pascal_case(&decl.name)).then(|| to_pascal_case(&decl.name)),
        };

        let Some(replacement) = violation else {
            continue;
        };
        if replacement == decl.name || replacement.is_empty() {
            continue;
        }
        // a fix must address exactly the identifier in the header
        if ctx.source.get(decl.name_span.start..decl.name_span.end) != Some(decl.name.as_str()) {
            continue;
        }

        let (line, column) = ctx.index.line_col(decl.name_span.start);
        let convention = match decl.kind {
            DeclKind::Class => "PascalCase",
            _ => "snake_case",
        };

        let issue = Issue::new(
            IssueCategory::Naming,
            format!(
                "{} '{}' should use {} naming",
                capitalized_kind(decl.kind),
                decl.name,
                convention
            ),
            line,
            column,
        )
        .with_end_column(column + decl.name.len())
        .with_suggestion(format!(
            "Rename to '{replacement}' (declaration site only; call sites are not updated)"
        ))
        .with_fix(
            FixAction::new(decl.name_span, replacement.clone(), FixKind::RenameIdentifier)
                .with_description(format!("Renamed '{}' to '{replacement}'", decl.name)),
        );

        issues.push(issue);
    }

    issues
}

fn capitalized_kind(kind: DeclKind) -> &'static str {
    match kind {
        DeclKind::Function => "Function",
        DeclKind::Method => "Method",
        DeclKind::Class => "Class",
    }
}

pub fn is_snake_case(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

pub fn is_pascal_case(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_uppercase() => {}
        _ => return false,
    }
    name.chars().all(|c| c.is_ascii_alphanumeric())
}

pub fn to_snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev_lower = false;
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            if prev_lower {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
            prev_lower = false;
        } else {
            prev_lower = c.is_ascii_lowercase() || c.is_ascii_digit();
            out.push(c);
        }
    }
    out
}

pub fn to_pascal_case(name: &str) -> String {
    name.split('_')
        .filter(|chunk| !chunk.is_empty())
        .map(|chunk| {
            let mut chars = chunk.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}
