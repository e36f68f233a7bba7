//! Auto-fix engine: ordered, conflict-resolved text patching
//!
//! Fixes are applied in one linear pass over the original text. A fix
//! whose span starts before the end of the previously applied patch is a
//! conflict: it is skipped and recorded, never silently dropped. Running
//! detect → fix → detect again yields no further fixable issues; that
//! idempotence is covered by the integration tests.

use crate::config::QualityConfig;
use crate::core::{AppliedFix, FixReport, Issue, SkippedFix};
use log::debug;

/// Apply every enabled, non-conflicting fix carried by `issues` to
/// `source`, producing the patched text and an audit trail.
pub fn apply_fixes(source: &str, issues: &[Issue], config: &QualityConfig) -> FixReport {
    let mut candidates: Vec<&Issue> = issues
        .iter()
        .filter(|issue| issue.fix.is_some() && config.category_fixable(issue.category))
        .collect();

    // Earlier spans first; at equal start offsets the higher priority wins.
    candidates.sort_by(|a, b| {
        let fa = a.fix.as_ref().expect("filtered to fixable");
        let fb = b.fix.as_ref().expect("filtered to fixable");
        fa.span
            .start
            .cmp(&fb.span.start)
            .then(fb.priority.cmp(&fa.priority))
    });

    let mut fixed_text = String::with_capacity(source.len() + 128);
    let mut applied = Vec::new();
    let mut skipped = Vec::new();
    let mut cursor = 0usize;
    let mut last_end = 0usize;

    for issue in candidates {
        let fix = issue.fix.as_ref().expect("filtered to fixable");

        if fix.span.end > source.len()
            || fix.span.end < fix.span.start
            || !source.is_char_boundary(fix.span.start)
            || !source.is_char_boundary(fix.span.end)
        {
            debug!("dropping out-of-bounds fix: {}", fix.description);
            skipped.push(SkippedFix {
                kind: fix.kind,
                line: issue.line,
                description: fix.description.clone(),
                reason: "span does not address the original text".to_string(),
            });
            continue;
        }

        if fix.span.start < last_end {
            debug!("fix conflict at offset {}: {}", fix.span.start, fix.description);
            skipped.push(SkippedFix {
                kind: fix.kind,
                line: issue.line,
                description: fix.description.clone(),
                reason: "overlaps a previously applied fix".to_string(),
            });
            continue;
        }

        fixed_text.push_str(&source[cursor..fix.span.start]);
        fixed_text.push_str(&fix.replacement);
        cursor = fix.span.end;
        last_end = fix.span.end;

        applied.push(AppliedFix {
            kind: fix.kind,
            line: issue.line,
            description: fix.description.clone(),
        });
    }

    fixed_text.push_str(&source[cursor..]);

    FixReport {
        fixed_text,
        applied,
        skipped,
    }
}
