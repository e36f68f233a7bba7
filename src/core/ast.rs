//! Structural model of a Python source unit
//!
//! The model is a flat, pre-order arena of declarations with parent/child
//! indices rather than an owned tree. Every span is byte-accurate into the
//! original unit text so later stages can slice and patch without
//! re-serializing anything.

use crate::core::Span;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DeclKind {
    Function,
    Method,
    Class,
}

impl std::fmt::Display for DeclKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let display_str = match self {
            DeclKind::Function => "function",
            DeclKind::Method => "method",
            DeclKind::Class => "class",
        };
        write!(f, "{display_str}")
    }
}

/// One declared parameter: name plus raw annotation/default text.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Param {
    pub name: String,
    pub annotation: Option<String>,
    pub default: Option<String>,
}

impl Param {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            annotation: None,
            default: None,
        }
    }
}

/// An existing docstring: its span (the whole string literal, quotes
/// included) and its unquoted text.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocstringInfo {
    pub span: Span,
    pub text: String,
}

/// Where a generated docstring can be spliced in: the byte offset of the
/// first body statement and the indentation column it sits at.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct InsertPoint {
    pub offset: usize,
    pub indent: usize,
}

/// Distinct/total operator and operand tallies for Halstead metrics.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct HalsteadCounts {
    pub distinct_operators: u32,
    pub distinct_operands: u32,
    pub total_operators: u32,
    pub total_operands: u32,
}

/// Raw complexity facts recorded during the build walk.
///
/// The metrics engine derives cyclomatic/cognitive/Halstead numbers from
/// these without ever touching the AST again.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ComplexityFacts {
    /// if/elif/for/while/except clauses, ternaries, comprehension filters
    pub decision_points: u32,
    /// `and`/`or` operator occurrences
    pub bool_ops: u32,
    /// Nesting- and break-sensitive cognitive complexity accumulation
    pub cognitive: u32,
    pub max_nesting: u32,
    pub halstead: HalsteadCounts,
}

/// A numeric literal outside the 0/1/-1 allow-list.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MagicLiteral {
    pub text: String,
    pub line: usize,
}

/// A recognized-but-unmodeled syntax form, skipped with an INFO notice.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct UnsupportedConstruct {
    pub construct: String,
    pub line: usize,
}

/// One declaration (function, method, or class) in the arena.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Declaration {
    pub name: String,
    pub kind: DeclKind,
    pub params: Vec<Param>,
    /// Decorator expressions as raw text, e.g. `staticmethod`, `app.route`
    pub decorators: Vec<String>,
    pub is_async: bool,
    pub is_generator: bool,
    /// Any `return <expr>` statement in the immediate body
    pub returns_value: bool,
    /// Syntactically-literal exception names from `raise` statements
    pub raises: Vec<String>,
    /// Full span: leading decorators through end of body
    pub span: Span,
    /// Span of the name identifier in the `def`/`class` header
    pub name_span: Span,
    pub start_line: usize,
    pub start_column: usize,
    pub end_line: usize,
    pub docstring: Option<DocstringInfo>,
    /// `None` for single-line suites, where textual insertion is unsafe
    pub insert_point: Option<InsertPoint>,
    /// Statements in the immediate body, docstring excluded
    pub body_statements: usize,
    /// Physical lines covered by the span
    pub line_span: usize,
    pub facts: ComplexityFacts,
    pub magic_numbers: Vec<MagicLiteral>,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
}

impl Declaration {
    pub fn is_callable(&self) -> bool {
        matches!(self.kind, DeclKind::Function | DeclKind::Method)
    }

    pub fn has_docstring(&self) -> bool {
        self.docstring
            .as_ref()
            .map(|d| !d.text.trim().is_empty())
            .unwrap_or(false)
    }

    /// Parameter count, `self`/`cls` receivers excluded for methods.
    pub fn effective_param_count(&self) -> usize {
        let skip = if self.kind == DeclKind::Method {
            self.params
                .first()
                .map(|p| p.name == "self" || p.name == "cls")
                .unwrap_or(false) as usize
        } else {
            0
        };
        self.params.len() - skip
    }
}

/// Tree of declarations flattened into a pre-order arena.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StructuralModel {
    pub unit_id: String,
    /// Pre-order: a parent always precedes its children
    pub declarations: Vec<Declaration>,
    /// Facts over the entire module body, all declarations included
    pub module_facts: ComplexityFacts,
    pub module_docstring: Option<Span>,
    pub unsupported: Vec<UnsupportedConstruct>,
    /// Lines holding a bare `except:` clause
    pub bare_except_lines: Vec<usize>,
    /// Lines comparing against `None` with `==`/`!=`
    pub none_comparison_lines: Vec<usize>,
    pub total_lines: usize,
}

impl StructuralModel {
    /// Flattened pre-order sequence for consumers that ignore nesting.
    pub fn iter(&self) -> impl Iterator<Item = &Declaration> {
        self.declarations.iter()
    }

    pub fn children_of(&self, index: usize) -> impl Iterator<Item = &Declaration> {
        self.declarations[index]
            .children
            .iter()
            .map(move |&c| &self.declarations[c])
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}

/// Byte offset → 1-based (line, column) lookup table.
#[derive(Clone, Debug)]
pub struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        for (i, b) in text.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(i + 1);
            }
        }
        Self { line_starts }
    }

    /// 1-based line containing the byte offset.
    pub fn line_of(&self, offset: usize) -> usize {
        match self.line_starts.binary_search(&offset) {
            Ok(i) => i + 1,
            Err(i) => i,
        }
    }

    /// 1-based (line, column) of the byte offset.
    pub fn line_col(&self, offset: usize) -> (usize, usize) {
        let line = self.line_of(offset);
        let col = offset - self.line_starts[line - 1] + 1;
        (line, col)
    }

    /// Byte offset where the given 1-based line starts.
    pub fn line_start(&self, line: usize) -> Option<usize> {
        self.line_starts.get(line - 1).copied()
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_index_maps_offsets() {
        let idx = LineIndex::new("abc\ndef\n\nxy");
        assert_eq!(idx.line_col(0), (1, 1));
        assert_eq!(idx.line_col(2), (1, 3));
        assert_eq!(idx.line_col(4), (2, 1));
        assert_eq!(idx.line_col(8), (3, 1));
        assert_eq!(idx.line_col(9), (4, 1));
        assert_eq!(idx.line_col(10), (4, 2));
    }

    #[test]
    fn line_index_counts_lines() {
        assert_eq!(LineIndex::new("").line_count(), 1);
        assert_eq!(LineIndex::new("a\nb").line_count(), 2);
        assert_eq!(LineIndex::new("a\nb\n").line_count(), 3);
    }

    #[test]
    fn effective_params_skip_self_receiver() {
        let mut decl = Declaration {
            name: "save".into(),
            kind: DeclKind::Method,
            params: vec![Param::new("self"), Param::new("path")],
            decorators: vec![],
            is_async: false,
            is_generator: false,
            returns_value: false,
            raises: vec![],
            span: Span::new(0, 0),
            name_span: Span::new(0, 0),
            start_line: 1,
            start_column: 1,
            end_line: 1,
            docstring: None,
            insert_point: None,
            body_statements: 0,
            line_span: 1,
            facts: ComplexityFacts::default(),
            magic_numbers: vec![],
            parent: None,
            children: vec![],
        };
        assert_eq!(decl.effective_param_count(), 1);

        decl.kind = DeclKind::Function;
        assert_eq!(decl.effective_param_count(), 2);
    }
}
