pub mod ast;
pub mod errors;
pub mod metrics;

use serde::{Deserialize, Serialize};

/// A single unit of analysis: raw source text plus an identifier.
///
/// Units are never mutated; every stage of the pipeline is a pure function
/// of the unit and the configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SourceUnit {
    pub id: String,
    pub text: String,
}

impl SourceUnit {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

/// Half-open byte range into the original source text.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    pub fn intersects(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Severity levels for issues, ordered from least to most severe.
#[derive(
    Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let display_str = match self {
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Critical => "CRITICAL",
        };
        write!(f, "{display_str}")
    }
}

/// Closed set of issue categories.
#[derive(
    Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "kebab-case")]
pub enum IssueCategory {
    Syntax,
    Naming,
    Documentation,
    Complexity,
    Formatting,
    BestPractice,
    Security,
}

impl IssueCategory {
    pub fn display_name(&self) -> &'static str {
        match self {
            IssueCategory::Syntax => "syntax",
            IssueCategory::Naming => "naming",
            IssueCategory::Documentation => "documentation",
            IssueCategory::Complexity => "complexity",
            IssueCategory::Formatting => "formatting",
            IssueCategory::BestPractice => "best-practice",
            IssueCategory::Security => "security",
        }
    }
}

impl std::fmt::Display for IssueCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Default severity for each category. Rule-specific overrides (e.g. the
/// security pattern table) are explicit predicates, not string dispatch.
pub fn default_severity(category: IssueCategory) -> Severity {
    static SEVERITY_MAP: &[(IssueCategory, Severity)] = &[
        (IssueCategory::Syntax, Severity::Critical),
        (IssueCategory::Naming, Severity::Warning),
        (IssueCategory::Documentation, Severity::Warning),
        (IssueCategory::Complexity, Severity::Warning),
        (IssueCategory::Formatting, Severity::Info),
        (IssueCategory::BestPractice, Severity::Warning),
        (IssueCategory::Security, Severity::Warning),
    ];

    SEVERITY_MAP
        .iter()
        .find(|(c, _)| *c == category)
        .map(|(_, s)| *s)
        .unwrap_or(Severity::Info)
}

/// Kind tag for a safe, mechanical fix.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum FixKind {
    RenameIdentifier,
    InsertDocstring,
    NormalizeWhitespace,
}

impl FixKind {
    /// Conflict-resolution priority; higher wins at equal start offsets.
    pub fn priority(&self) -> u8 {
        match self {
            FixKind::RenameIdentifier => 3,
            FixKind::InsertDocstring => 2,
            FixKind::NormalizeWhitespace => 1,
        }
    }
}

impl std::fmt::Display for FixKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let display_str = match self {
            FixKind::RenameIdentifier => "rename-identifier",
            FixKind::InsertDocstring => "insert-docstring",
            FixKind::NormalizeWhitespace => "normalize-whitespace",
        };
        write!(f, "{display_str}")
    }
}

/// A minimal, self-contained text edit attached to an issue.
///
/// The span addresses the *original* source text; it never reaches outside
/// the declaration (or line) the owning issue was reported against.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct FixAction {
    pub span: Span,
    pub replacement: String,
    pub kind: FixKind,
    pub priority: u8,
    pub description: String,
}

impl FixAction {
    pub fn new(span: Span, replacement: impl Into<String>, kind: FixKind) -> Self {
        Self {
            span,
            replacement: replacement.into(),
            kind,
            priority: kind.priority(),
            description: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// An immutable fact about one analysis snapshot.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Issue {
    pub severity: Severity,
    pub category: IssueCategory,
    pub message: String,
    pub line: usize,
    pub column: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_column: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fix: Option<FixAction>,
}

impl Issue {
    pub fn new(category: IssueCategory, message: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            severity: default_severity(category),
            category,
            message: message.into(),
            line,
            column,
            end_column: None,
            suggestion: None,
            fix: None,
        }
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn with_fix(mut self, fix: FixAction) -> Self {
        self.fix = Some(fix);
        self
    }

    pub fn with_end_column(mut self, end_column: usize) -> Self {
        self.end_column = Some(end_column);
        self
    }
}

/// One applied patch, described before/after for reporting.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AppliedFix {
    pub kind: FixKind,
    pub line: usize,
    pub description: String,
}

/// A fix dropped during conflict resolution, never silently lost.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SkippedFix {
    pub kind: FixKind,
    pub line: usize,
    pub description: String,
    pub reason: String,
}

/// Result of applying fixes to one source unit.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FixReport {
    pub fixed_text: String,
    pub applied: Vec<AppliedFix>,
    pub skipped: Vec<SkippedFix>,
}

impl FixReport {
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    pub fn changed(&self) -> bool {
        !self.applied.is_empty()
    }
}

/// Letter grade bands: A >= 90, B >= 80, C >= 70, D >= 60, else F.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            Grade::A
        } else if score >= 80.0 {
            Grade::B
        } else if score >= 70.0 {
            Grade::C
        } else if score >= 60.0 {
            Grade::D
        } else {
            Grade::F
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let display_str = match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        };
        write!(f, "{display_str}")
    }
}

/// Per-unit aggregate handed to reporting collaborators.
///
/// `metrics` is `None` when the unit failed to parse: metrics are
/// unavailable, not zero, so an unparseable file cannot score well.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QualityReport {
    pub unit_id: String,
    pub score: f64,
    pub grade: Grade,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<metrics::ModuleMetrics>,
    pub issues: Vec<Issue>,
}

impl QualityReport {
    pub fn count_by_severity(&self, severity: Severity) -> usize {
        self.issues.iter().filter(|i| i.severity == severity).count()
    }

    pub fn has_issue_at_or_above(&self, threshold: Severity) -> bool {
        self.issues.iter().any(|i| i.severity >= threshold)
    }
}

/// Aggregate over a batch of units: arithmetic mean plus totals.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BatchSummary {
    pub files: usize,
    pub parsed: usize,
    pub average_score: f64,
    pub grade: Grade,
    pub critical: usize,
    pub warnings: usize,
    pub info: usize,
    pub total_debt_minutes: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_orders_critical_highest() {
        assert!(Severity::Critical > Severity::Warning);
        assert!(Severity::Warning > Severity::Info);
    }

    #[test]
    fn syntax_category_defaults_to_critical() {
        assert_eq!(default_severity(IssueCategory::Syntax), Severity::Critical);
        assert_eq!(default_severity(IssueCategory::Naming), Severity::Warning);
        assert_eq!(default_severity(IssueCategory::Formatting), Severity::Info);
    }

    #[test]
    fn span_intersection() {
        let a = Span::new(0, 5);
        let b = Span::new(4, 8);
        let c = Span::new(5, 8);
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn zero_width_span_does_not_intersect_adjacent() {
        let insert = Span::new(10, 10);
        let before = Span::new(5, 10);
        let after = Span::new(10, 12);
        assert!(!insert.intersects(&before));
        assert!(!insert.intersects(&after));
    }

    #[test]
    fn grade_bands() {
        assert_eq!(Grade::from_score(95.0), Grade::A);
        assert_eq!(Grade::from_score(90.0), Grade::A);
        assert_eq!(Grade::from_score(85.0), Grade::B);
        assert_eq!(Grade::from_score(70.0), Grade::C);
        assert_eq!(Grade::from_score(60.0), Grade::D);
        assert_eq!(Grade::from_score(59.9), Grade::F);
    }

    #[test]
    fn fix_priorities_rank_rename_first() {
        assert!(FixKind::RenameIdentifier.priority() > FixKind::InsertDocstring.priority());
        assert!(FixKind::InsertDocstring.priority() > FixKind::NormalizeWhitespace.priority());
    }
}
