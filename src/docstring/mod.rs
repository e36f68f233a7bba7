//! Docstring synthesis and validation
//!
//! Section content is derived once from a declaration signature; three
//! small renderers translate the same structured sections into Google,
//! NumPy, or reST layout. Validation compares recognized section headers
//! against the signature-derived expected set and never judges prose.

pub mod styles;

use crate::core::ast::{DeclKind, Declaration};
use serde::{Deserialize, Serialize};
use self::styles::{renderer_for, Section, SectionEntry};

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DocstringStyle {
    #[default]
    Google,
    Numpy,
    Rest,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Summary,
    Params,
    Returns,
    Raises,
    Yields,
}

impl std::fmt::Display for SectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let display_str = match self {
            SectionKind::Summary => "summary",
            SectionKind::Params => "parameters",
            SectionKind::Returns => "returns",
            SectionKind::Raises => "raises",
            SectionKind::Yields => "yields",
        };
        write!(f, "{display_str}")
    }
}

/// Signature summary a docstring is synthesized from; derived solely from
/// the declaration, never from prose or type inference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocSignature {
    pub name: String,
    pub kind: DeclKind,
    pub params: Vec<ParamSig>,
    pub returns_value: bool,
    pub raises: Vec<String>,
    pub is_generator: bool,
    pub is_async: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParamSig {
    pub name: String,
    pub annotation: Option<String>,
}

impl DocSignature {
    pub fn from_declaration(decl: &Declaration) -> Self {
        let params = decl
            .params
            .iter()
            .enumerate()
            .filter(|(i, p)| {
                // receivers carry no documentation value
                !(decl.kind == DeclKind::Method
                    && *i == 0
                    && (p.name == "self" || p.name == "cls"))
            })
            .map(|(_, p)| ParamSig {
                name: p.name.clone(),
                annotation: p.annotation.clone(),
            })
            .collect();

        Self {
            name: decl.name.clone(),
            kind: decl.kind,
            params,
            returns_value: decl.returns_value,
            raises: decl.raises.clone(),
            is_generator: decl.is_generator,
            is_async: decl.is_async,
        }
    }

    /// Sections a complete docstring for this signature must carry.
    pub fn expected_sections(&self) -> Vec<SectionKind> {
        let mut expected = vec![SectionKind::Summary];
        if self.kind == DeclKind::Class {
            return expected;
        }
        if !self.params.is_empty() {
            expected.push(SectionKind::Params);
        }
        if self.is_generator {
            expected.push(SectionKind::Yields);
        } else if self.returns_value {
            expected.push(SectionKind::Returns);
        }
        if !self.raises.is_empty() {
            expected.push(SectionKind::Raises);
        }
        expected
    }
}

/// Render a templated docstring body (no quotes, no indentation).
pub fn synthesize(signature: &DocSignature, style: DocstringStyle) -> String {
    let sections = build_sections(signature);
    renderer_for(style).render(&sections)
}

fn build_sections(signature: &DocSignature) -> Vec<Section> {
    let mut sections = vec![Section {
        kind: SectionKind::Summary,
        entries: vec![SectionEntry::text(summary_line(signature))],
    }];

    for kind in signature.expected_sections() {
        match kind {
            SectionKind::Summary => {}
            SectionKind::Params => sections.push(Section {
                kind,
                entries: signature
                    .params
                    .iter()
                    .map(|p| SectionEntry {
                        name: Some(p.name.clone()),
                        annotation: p.annotation.clone(),
                        text: format!("Description of {}.", p.name.trim_start_matches('*')),
                    })
                    .collect(),
            }),
            SectionKind::Returns => sections.push(Section {
                kind,
                entries: vec![SectionEntry::text("Description of return value.")],
            }),
            SectionKind::Yields => sections.push(Section {
                kind,
                entries: vec![SectionEntry::text("Description of yielded values.")],
            }),
            SectionKind::Raises => sections.push(Section {
                kind,
                entries: signature
                    .raises
                    .iter()
                    .map(|name| SectionEntry {
                        name: Some(name.clone()),
                        annotation: None,
                        text: format!("Description of when {name} is raised."),
                    })
                    .collect(),
            }),
        }
    }

    sections
}

/// Summary placeholder from the declared name: `CalculateTotal` and
/// `calculate_total` both become "Calculate total."
fn summary_line(signature: &DocSignature) -> String {
    let mut words: Vec<String> = Vec::new();
    for chunk in signature.name.split('_').filter(|c| !c.is_empty()) {
        let mut current = String::new();
        for c in chunk.chars() {
            if c.is_uppercase() && !current.is_empty() {
                words.push(current.to_lowercase());
                current = String::new();
            }
            current.push(c);
        }
        if !current.is_empty() {
            words.push(current.to_lowercase());
        }
    }

    if words.is_empty() {
        return format!("{}.", signature.name);
    }

    let mut summary = words.join(" ");
    let mut chars = summary.chars();
    if let Some(first) = chars.next() {
        summary = first.to_uppercase().collect::<String>() + chars.as_str();
    }
    format!("{summary}.")
}

/// Result of validating an existing docstring against a signature.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationResult {
    pub missing_sections: Vec<SectionKind>,
}

impl ValidationResult {
    pub fn is_complete(&self) -> bool {
        self.missing_sections.is_empty()
    }
}

/// Compare recognized section headers in `docstring` against the expected
/// set for `signature`.
pub fn validate(signature: &DocSignature, docstring: &str) -> ValidationResult {
    let missing_sections = signature
        .expected_sections()
        .into_iter()
        .filter(|kind| !section_present(docstring, *kind))
        .collect();
    ValidationResult { missing_sections }
}

fn section_present(docstring: &str, kind: SectionKind) -> bool {
    match kind {
        SectionKind::Summary => docstring
            .lines()
            .any(|line| !line.trim().is_empty()),
        SectionKind::Params => has_header(docstring, &["args", "arguments", "parameters"])
            || has_field(docstring, ":param"),
        SectionKind::Returns => {
            has_header(docstring, &["returns"])
                || has_field(docstring, ":return")
                || has_field(docstring, ":returns")
        }
        SectionKind::Raises => has_header(docstring, &["raises"]) || has_field(docstring, ":raises"),
        SectionKind::Yields => {
            has_header(docstring, &["yields"])
                || has_field(docstring, ":yield")
                || has_field(docstring, ":yields")
        }
    }
}

/// Google headers end in a colon; NumPy headers are underlined with dashes.
fn has_header(docstring: &str, names: &[&str]) -> bool {
    let lines: Vec<&str> = docstring.lines().collect();
    for (i, line) in lines.iter().enumerate() {
        let trimmed = line.trim().to_lowercase();
        for name in names {
            if trimmed == format!("{name}:") {
                return true;
            }
            if trimmed == *name {
                let underlined = lines
                    .get(i + 1)
                    .map(|next| {
                        let next = next.trim();
                        !next.is_empty() && next.chars().all(|c| c == '-')
                    })
                    .unwrap_or(false);
                if underlined {
                    return true;
                }
            }
        }
    }
    false
}

fn has_field(docstring: &str, field: &str) -> bool {
    docstring
        .lines()
        .any(|line| line.trim_start().starts_with(field))
}

/// Classify an existing docstring's layout convention.
pub fn detect_style(docstring: &str) -> DocstringStyle {
    if has_field(docstring, ":param")
        || has_field(docstring, ":return")
        || has_field(docstring, ":raises")
    {
        return DocstringStyle::Rest;
    }

    let lines: Vec<&str> = docstring.lines().collect();
    for (i, line) in lines.iter().enumerate() {
        let trimmed = line.trim();
        if matches!(trimmed.to_lowercase().as_str(), "parameters" | "returns" | "raises" | "yields")
        {
            if let Some(next) = lines.get(i + 1) {
                let next = next.trim();
                if !next.is_empty() && next.chars().all(|c| c == '-') {
                    return DocstringStyle::Numpy;
                }
            }
        }
    }

    DocstringStyle::Google
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain_signature() -> DocSignature {
        DocSignature {
            name: "calculate_total".into(),
            kind: DeclKind::Function,
            params: vec![ParamSig {
                name: "items".into(),
                annotation: None,
            }],
            returns_value: true,
            raises: vec![],
            is_generator: false,
            is_async: false,
        }
    }

    #[test]
    fn summary_humanizes_both_naming_styles() {
        let mut sig = plain_signature();
        assert_eq!(summary_line(&sig), "Calculate total.");
        sig.name = "CalculateTotal".into();
        assert_eq!(summary_line(&sig), "Calculate total.");
    }

    #[test]
    fn expected_sections_follow_the_signature() {
        let mut sig = plain_signature();
        assert_eq!(
            sig.expected_sections(),
            vec![SectionKind::Summary, SectionKind::Params, SectionKind::Returns]
        );

        sig.is_generator = true;
        sig.raises = vec!["ValueError".into()];
        assert_eq!(
            sig.expected_sections(),
            vec![
                SectionKind::Summary,
                SectionKind::Params,
                SectionKind::Yields,
                SectionKind::Raises
            ]
        );
    }

    #[test]
    fn classes_only_expect_a_summary() {
        let sig = DocSignature {
            name: "UserAccount".into(),
            kind: DeclKind::Class,
            params: vec![],
            returns_value: false,
            raises: vec![],
            is_generator: false,
            is_async: false,
        };
        assert_eq!(sig.expected_sections(), vec![SectionKind::Summary]);
    }

    #[test]
    fn validation_spots_missing_returns() {
        let sig = plain_signature();
        let result = validate(&sig, "Sum the items.\n\nArgs:\n    items: Values.\n");
        assert_eq!(result.missing_sections, vec![SectionKind::Returns]);
        assert!(!result.is_complete());
    }

    #[test]
    fn validation_accepts_any_style() {
        let sig = plain_signature();

        let google = "Sum.\n\nArgs:\n    items: Values.\n\nReturns:\n    int: Total.\n";
        assert!(validate(&sig, google).is_complete());

        let numpy =
            "Sum.\n\nParameters\n----------\nitems\n    Values.\n\nReturns\n-------\nint\n";
        assert!(validate(&sig, numpy).is_complete());

        let rest = "Sum.\n\n:param items: Values.\n:returns: Total.\n";
        assert!(validate(&sig, rest).is_complete());
    }

    #[test]
    fn style_detection() {
        assert_eq!(
            detect_style("Sum.\n\nArgs:\n    a: One.\n"),
            DocstringStyle::Google
        );
        assert_eq!(
            detect_style("Sum.\n\nParameters\n----------\na : int\n"),
            DocstringStyle::Numpy
        );
        assert_eq!(detect_style("Sum.\n\n:param a: One.\n"), DocstringStyle::Rest);
    }

    #[test]
    fn synthesized_docstring_validates_against_its_signature() {
        let sig = plain_signature();
        for style in [DocstringStyle::Google, DocstringStyle::Numpy, DocstringStyle::Rest] {
            let text = synthesize(&sig, style);
            assert!(
                validate(&sig, &text).is_complete(),
                "style {style:?} output should satisfy its own signature:\n{text}"
            );
        }
    }
}
