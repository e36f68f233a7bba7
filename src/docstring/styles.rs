//! Per-style docstring renderers
//!
//! One strategy seam: every style receives the same structured sections
//! and only decides punctuation and layout.

use crate::docstring::{DocstringStyle, SectionKind};

#[derive(Clone, Debug)]
pub struct Section {
    pub kind: SectionKind,
    pub entries: Vec<SectionEntry>,
}

#[derive(Clone, Debug)]
pub struct SectionEntry {
    pub name: Option<String>,
    pub annotation: Option<String>,
    pub text: String,
}

impl SectionEntry {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            name: None,
            annotation: None,
            text: text.into(),
        }
    }
}

pub trait StyleRenderer {
    fn render(&self, sections: &[Section]) -> String;
}

pub fn renderer_for(style: DocstringStyle) -> &'static dyn StyleRenderer {
    match style {
        DocstringStyle::Google => &GoogleRenderer,
        DocstringStyle::Numpy => &NumpyRenderer,
        DocstringStyle::Rest => &RestRenderer,
    }
}

struct GoogleRenderer;

impl StyleRenderer for GoogleRenderer {
    fn render(&self, sections: &[Section]) -> String {
        let mut out = String::new();
        for section in sections {
            match section.kind {
                SectionKind::Summary => {
                    for entry in &section.entries {
                        out.push_str(&entry.text);
                        out.push('\n');
                    }
                }
                SectionKind::Params => {
                    out.push_str("\nArgs:\n");
                    for entry in &section.entries {
                        let name = entry.name.as_deref().unwrap_or_default();
                        match &entry.annotation {
                            Some(annotation) => {
                                out.push_str(&format!("    {name} ({annotation}): {}\n", entry.text))
                            }
                            None => out.push_str(&format!("    {name}: {}\n", entry.text)),
                        }
                    }
                }
                SectionKind::Returns | SectionKind::Yields => {
                    let header = if section.kind == SectionKind::Returns {
                        "Returns"
                    } else {
                        "Yields"
                    };
                    out.push_str(&format!("\n{header}:\n"));
                    for entry in &section.entries {
                        out.push_str(&format!("    {}\n", entry.text));
                    }
                }
                SectionKind::Raises => {
                    out.push_str("\nRaises:\n");
                    for entry in &section.entries {
                        let name = entry.name.as_deref().unwrap_or_default();
                        out.push_str(&format!("    {name}: {}\n", entry.text));
                    }
                }
            }
        }
        out
    }
}

struct NumpyRenderer;

impl NumpyRenderer {
    fn underlined(header: &str) -> String {
        format!("\n{header}\n{}\n", "-".repeat(header.len()))
    }
}

impl StyleRenderer for NumpyRenderer {
    fn render(&self, sections: &[Section]) -> String {
        let mut out = String::new();
        for section in sections {
            match section.kind {
                SectionKind::Summary => {
                    for entry in &section.entries {
                        out.push_str(&entry.text);
                        out.push('\n');
                    }
                }
                SectionKind::Params => {
                    out.push_str(&Self::underlined("Parameters"));
                    for entry in &section.entries {
                        let name = entry.name.as_deref().unwrap_or_default();
                        match &entry.annotation {
                            Some(annotation) => {
                                out.push_str(&format!("{name} : {annotation}\n"))
                            }
                            None => out.push_str(&format!("{name}\n")),
                        }
                        out.push_str(&format!("    {}\n", entry.text));
                    }
                }
                SectionKind::Returns | SectionKind::Yields => {
                    let header = if section.kind == SectionKind::Returns {
                        "Returns"
                    } else {
                        "Yields"
                    };
                    out.push_str(&Self::underlined(header));
                    for entry in &section.entries {
                        out.push_str(&format!("    {}\n", entry.text));
                    }
                }
                SectionKind::Raises => {
                    out.push_str(&Self::underlined("Raises"));
                    for entry in &section.entries {
                        let name = entry.name.as_deref().unwrap_or_default();
                        out.push_str(&format!("{name}\n    {}\n", entry.text));
                    }
                }
            }
        }
        out
    }
}

struct RestRenderer;

impl StyleRenderer for RestRenderer {
    fn render(&self, sections: &[Section]) -> String {
        let mut out = String::new();
        let mut fields = String::new();

        for section in sections {
            match section.kind {
                SectionKind::Summary => {
                    for entry in &section.entries {
                        out.push_str(&entry.text);
                        out.push('\n');
                    }
                }
                SectionKind::Params => {
                    for entry in &section.entries {
                        let name = entry.name.as_deref().unwrap_or_default();
                        fields.push_str(&format!(":param {name}: {}\n", entry.text));
                        if let Some(annotation) = &entry.annotation {
                            fields.push_str(&format!(":type {name}: {annotation}\n"));
                        }
                    }
                }
                SectionKind::Returns => {
                    for entry in &section.entries {
                        fields.push_str(&format!(":returns: {}\n", entry.text));
                    }
                }
                SectionKind::Yields => {
                    for entry in &section.entries {
                        fields.push_str(&format!(":yields: {}\n", entry.text));
                    }
                }
                SectionKind::Raises => {
                    for entry in &section.entries {
                        let name = entry.name.as_deref().unwrap_or_default();
                        fields.push_str(&format!(":raises {name}: {}\n", entry.text));
                    }
                }
            }
        }

        if !fields.is_empty() {
            out.push('\n');
            out.push_str(&fields);
        }
        out
    }
}
