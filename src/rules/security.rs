//! Security pattern checks
//!
//! One fixed lookup table maps each pattern to its severity, message, and
//! suggestion; there is no per-call-site branching. Matching runs over
//! code lines only.

use crate::core::{Issue, IssueCategory, Severity};
use crate::metrics::loc_counter::{classify_lines, LineKind};
use crate::rules::RuleContext;
use once_cell::sync::Lazy;
use regex::Regex;

struct SecurityPattern {
    pattern: Regex,
    severity: Severity,
    message: &'static str,
    suggestion: &'static str,
}

static SECURITY_PATTERNS: Lazy<Vec<SecurityPattern>> = Lazy::new(|| {
    let entry = |pattern: &str, severity, message, suggestion| SecurityPattern {
        pattern: Regex::new(pattern).expect("security pattern must compile"),
        severity,
        message,
        suggestion,
    };

    vec![
        entry(
            r"\beval\s*\(",
            Severity::Critical,
            "Use of eval() allows arbitrary code execution",
            "Parse the input explicitly instead of evaluating it",
        ),
        entry(
            r"\bexec\s*\(",
            Severity::Critical,
            "Use of exec() allows arbitrary code execution",
            "Replace dynamic execution with explicit dispatch",
        ),
        entry(
            r"\bos\.system\s*\(",
            Severity::Critical,
            "os.system() is vulnerable to shell injection",
            "Use subprocess.run() with a list of arguments",
        ),
        entry(
            r"\bsubprocess\.\w+\s*\(.*shell\s*=\s*True",
            Severity::Warning,
            "subprocess call with shell=True enables shell injection",
            "Pass the command as a list and drop shell=True",
        ),
        entry(
            r"\bpickle\.loads?\s*\(",
            Severity::Warning,
            "Unpickling untrusted data can execute arbitrary code",
            "Prefer json or another data-only format",
        ),
        entry(
            r"\byaml\.load\s*\(",
            Severity::Warning,
            "yaml.load() without a safe loader can construct arbitrary objects",
            "Use yaml.safe_load()",
        ),
        entry(
            r"\bhashlib\.(md5|sha1)\s*\(",
            Severity::Warning,
            "Weak hash algorithm",
            "Use hashlib.sha256() or stronger",
        ),
        entry(
            r#"(?i)\b(password|passwd|secret|api_key|apikey|token|access_key)\s*=\s*["'][^"']+["']"#,
            Severity::Critical,
            "Hard-coded secret-like literal",
            "Load secrets from the environment or a secret store",
        ),
    ]
});

pub fn check(ctx: &RuleContext) -> Vec<Issue> {
    let mut issues = Vec::new();
    let kinds = classify_lines(ctx.source);

    for (i, line) in ctx.source.lines().enumerate() {
        if kinds.get(i).copied() != Some(LineKind::Code) {
            continue;
        }

        for entry in SECURITY_PATTERNS.iter() {
            if let Some(found) = entry.pattern.find(line) {
                issues.push(
                    Issue::new(IssueCategory::Security, entry.message, i + 1, found.start() + 1)
                        .with_severity(entry.severity)
                        .with_suggestion(entry.suggestion),
                );
            }
        }
    }

    issues
}
