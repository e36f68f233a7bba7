//! Lines-of-code classification for Python source
//!
//! One source of truth for source/comment/blank counting. Lines inside
//! triple-quoted strings are counted as comments (the usual docstring
//! simplification), `#` lines as comments, whitespace-only lines as blank,
//! and everything else as code. The invariant
//! `total == code + comment + blank` always holds.
//!
//! Comment markers inside single-quoted string literals are not detected;
//! that would require full lexing and does not move module-level ratios.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineKind {
    Blank,
    Comment,
    Code,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LocCount {
    pub total: usize,
    pub code: usize,
    pub comment: usize,
    pub blank: usize,
}

/// Classify every physical line of the unit.
pub fn classify_lines(content: &str) -> Vec<LineKind> {
    let mut kinds = Vec::new();
    let mut block_delim: Option<&str> = None;

    for line in content.lines() {
        let trimmed = line.trim();

        if let Some(delim) = block_delim {
            kinds.push(LineKind::Comment);
            if closes_block(trimmed, delim) {
                block_delim = None;
            }
            continue;
        }

        if trimmed.is_empty() {
            kinds.push(LineKind::Blank);
        } else if trimmed.starts_with('#') {
            kinds.push(LineKind::Comment);
        } else if let Some(delim) = opens_block(trimmed) {
            kinds.push(LineKind::Comment);
            if !closed_on_same_line(trimmed, delim) {
                block_delim = Some(delim);
            }
        } else {
            kinds.push(LineKind::Code);
        }
    }

    kinds
}

pub fn count_lines(content: &str) -> LocCount {
    count_kinds(&classify_lines(content))
}

pub fn count_kinds(kinds: &[LineKind]) -> LocCount {
    let mut count = LocCount {
        total: kinds.len(),
        ..Default::default()
    };
    for kind in kinds {
        match kind {
            LineKind::Blank => count.blank += 1,
            LineKind::Comment => count.comment += 1,
            LineKind::Code => count.code += 1,
        }
    }
    count
}

fn opens_block(trimmed: &str) -> Option<&'static str> {
    for delim in ["\"\"\"", "'''"] {
        if trimmed.starts_with(delim)
            || trimmed.starts_with(&format!("r{delim}"))
            || trimmed.starts_with(&format!("f{delim}"))
        {
            return Some(delim);
        }
    }
    None
}

fn closed_on_same_line(trimmed: &str, delim: &str) -> bool {
    trimmed.matches(delim).count() >= 2
}

fn closes_block(trimmed: &str, delim: &str) -> bool {
    trimmed.contains(delim)
}
