// Export modules for library usage
pub mod analyzers;
pub mod cli;
pub mod complexity;
pub mod config;
pub mod core;
pub mod docstring;
pub mod fixer;
pub mod metrics;
pub mod rules;
pub mod scoring;

// Re-export commonly used types
pub use crate::analyzers::{analyze, analyze_and_fix, batch::analyze_batch, python::build_model};

pub use crate::config::QualityConfig;

pub use crate::core::{
    BatchSummary, FixAction, FixKind, FixReport, Grade, Issue, IssueCategory, QualityReport,
    Severity, SourceUnit, Span,
};

pub use crate::core::ast::{DeclKind, Declaration, StructuralModel};

pub use crate::core::errors::{Error, Result};

pub use crate::core::metrics::{FunctionMetrics, HalsteadMetrics, ModuleMetrics};

pub use crate::docstring::{
    detect_style, synthesize, validate, DocSignature, DocstringStyle, ValidationResult,
};

pub use crate::fixer::apply_fixes;

pub use crate::rules::detect;

pub use crate::scoring::{aggregate, quality_score, summarize};
