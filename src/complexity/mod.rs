//! Complexity counting passes over the Python AST
//!
//! Each pass is a pure function over a statement block. Nested
//! declarations are never entered (except where a pass explicitly asks to
//! descend), so each declaration is scored on its own body.

pub mod cognitive;
pub mod cyclomatic;
pub mod halstead;
pub mod nesting;
pub mod walk;

use crate::core::ast::ComplexityFacts;
use rustpython_parser::ast;

/// Record all complexity facts for one statement block.
pub fn collect_facts(body: &[ast::Stmt]) -> ComplexityFacts {
    ComplexityFacts {
        decision_points: cyclomatic::count_decision_points(body),
        bool_ops: cyclomatic::count_bool_ops(body),
        cognitive: cognitive::calculate_cognitive(body),
        max_nesting: nesting::calculate_nesting(body),
        halstead: halstead::collect_counts(body, false),
    }
}

/// Facts over an entire module body, declarations included, with one
/// shared Halstead vocabulary.
pub fn collect_module_facts(body: &[ast::Stmt], decl_facts: &[ComplexityFacts]) -> ComplexityFacts {
    let own = collect_facts(body);
    ComplexityFacts {
        decision_points: own.decision_points
            + decl_facts.iter().map(|f| f.decision_points).sum::<u32>(),
        bool_ops: own.bool_ops + decl_facts.iter().map(|f| f.bool_ops).sum::<u32>(),
        cognitive: own.cognitive + decl_facts.iter().map(|f| f.cognitive).sum::<u32>(),
        max_nesting: decl_facts
            .iter()
            .map(|f| f.max_nesting)
            .fold(own.max_nesting, u32::max),
        halstead: halstead::collect_counts(body, true),
    }
}
