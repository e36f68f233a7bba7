//! Quality analysis configuration
//!
//! A single immutable value constructed once at the process boundary and
//! threaded explicitly through every call. Validation happens here, before
//! any analysis runs; an invalid configuration is the only fatal failure.

use crate::core::errors::{Error, Result};
use crate::core::{IssueCategory, Severity};
use crate::docstring::DocstringStyle;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QualityConfig {
    /// Minimum acceptable quality score (0-100)
    #[serde(default = "default_min_quality_score")]
    pub min_quality_score: f64,

    /// Cyclomatic complexity threshold per declaration
    #[serde(default = "default_max_complexity")]
    pub max_complexity: u32,

    /// Parameter count threshold (self/cls excluded for methods)
    #[serde(default = "default_max_parameters")]
    pub max_parameters: usize,

    /// Nesting depth threshold
    #[serde(default = "default_max_nesting_depth")]
    pub max_nesting_depth: u32,

    /// Function length threshold in physical lines
    #[serde(default = "default_max_function_length")]
    pub max_function_length: usize,

    /// Docstring coverage threshold (0-100)
    #[serde(default = "default_doc_coverage_threshold")]
    pub doc_coverage_threshold: f64,

    #[serde(default)]
    pub autofix_enabled: bool,

    /// Categories eligible for auto-fixing
    #[serde(default = "default_autofix_categories")]
    pub autofix_categories: BTreeSet<IssueCategory>,

    #[serde(default)]
    pub docstring_style: DocstringStyle,

    /// Lowest severity that fails a review
    #[serde(default = "default_severity_fail_threshold")]
    pub severity_fail_threshold: Severity,
}

fn default_min_quality_score() -> f64 {
    60.0
}

fn default_max_complexity() -> u32 {
    10
}

fn default_max_parameters() -> usize {
    5
}

fn default_max_nesting_depth() -> u32 {
    4
}

fn default_max_function_length() -> usize {
    50
}

fn default_doc_coverage_threshold() -> f64 {
    80.0
}

fn default_autofix_categories() -> BTreeSet<IssueCategory> {
    [
        IssueCategory::Naming,
        IssueCategory::Documentation,
        IssueCategory::Formatting,
    ]
    .into_iter()
    .collect()
}

fn default_severity_fail_threshold() -> Severity {
    Severity::Critical
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            min_quality_score: default_min_quality_score(),
            max_complexity: default_max_complexity(),
            max_parameters: default_max_parameters(),
            max_nesting_depth: default_max_nesting_depth(),
            max_function_length: default_max_function_length(),
            doc_coverage_threshold: default_doc_coverage_threshold(),
            autofix_enabled: false,
            autofix_categories: default_autofix_categories(),
            docstring_style: DocstringStyle::default(),
            severity_fail_threshold: default_severity_fail_threshold(),
        }
    }
}

/// Categories that can carry a mechanical FixAction. Requesting auto-fix
/// for any other category is contradictory and rejected up front.
const FIXABLE_CATEGORIES: &[IssueCategory] = &[
    IssueCategory::Naming,
    IssueCategory::Documentation,
    IssueCategory::Formatting,
];

impl QualityConfig {
    /// Parse a TOML document and validate it at the boundary.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: QualityConfig = toml::from_str(content)
            .map_err(|e| Error::configuration(format!("invalid TOML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        fn in_percent_range(value: f64, name: &str) -> Result<()> {
            if (0.0..=100.0).contains(&value) {
                Ok(())
            } else {
                Err(Error::configuration(format!(
                    "{name} must be between 0 and 100, got {value}"
                )))
            }
        }

        in_percent_range(self.min_quality_score, "min_quality_score")?;
        in_percent_range(self.doc_coverage_threshold, "doc_coverage_threshold")?;

        if self.max_complexity == 0 {
            return Err(Error::configuration("max_complexity must be at least 1"));
        }
        if self.max_parameters == 0 {
            return Err(Error::configuration("max_parameters must be at least 1"));
        }
        if self.max_nesting_depth == 0 {
            return Err(Error::configuration("max_nesting_depth must be at least 1"));
        }
        if self.max_function_length == 0 {
            return Err(Error::configuration(
                "max_function_length must be at least 1",
            ));
        }

        for category in &self.autofix_categories {
            if !FIXABLE_CATEGORIES.contains(category) {
                return Err(Error::configuration(format!(
                    "category '{category}' has no mechanical fixes and cannot be auto-fixed"
                )));
            }
        }

        Ok(())
    }

    pub fn category_fixable(&self, category: IssueCategory) -> bool {
        self.autofix_categories.contains(&category)
    }
}
