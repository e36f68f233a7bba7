//! Cyclomatic complexity counting over Python statement trees
//!
//! A declaration starts at 1; each `if`/`elif`, `for`, `while`, `except`
//! clause, conditional expression, comprehension filter clause, and
//! short-circuit boolean operator occurrence adds one path.

use crate::complexity::walk::{child_blocks, child_expressions, is_declaration, stmt_expressions};
use rustpython_parser::ast;

/// Cyclomatic complexity of one declaration body: `1 + decision points +
/// boolean operator occurrences`.
pub fn calculate_cyclomatic(body: &[ast::Stmt]) -> u32 {
    1 + count_decision_points(body) + count_bool_ops(body)
}

/// Decision-point clauses in a statement block, nested declarations
/// excluded.
pub fn count_decision_points(body: &[ast::Stmt]) -> u32 {
    body.iter().map(count_stmt_decisions).sum()
}

/// `and`/`or` occurrences in a statement block, nested declarations
/// excluded.
pub fn count_bool_ops(body: &[ast::Stmt]) -> u32 {
    body.iter().map(count_stmt_bool_ops).sum()
}

/// `and`/`or` occurrences within a single expression tree.
pub fn count_expr_bool_ops(expr: &ast::Expr) -> u32 {
    let own = match expr {
        ast::Expr::BoolOp(e) => e.values.len().saturating_sub(1) as u32,
        _ => 0,
    };
    own + child_expressions(expr)
        .into_iter()
        .map(count_expr_bool_ops)
        .sum::<u32>()
}

fn count_stmt_decisions(stmt: &ast::Stmt) -> u32 {
    if is_declaration(stmt) {
        return 0;
    }

    let own = match stmt {
        ast::Stmt::If(_) | ast::Stmt::While(_) => 1,
        ast::Stmt::For(_) | ast::Stmt::AsyncFor(_) => 1,
        ast::Stmt::Try(s) => s.handlers.len() as u32,
        ast::Stmt::TryStar(s) => s.handlers.len() as u32,
        _ => 0,
    };

    let nested: u32 = child_blocks(stmt)
        .into_iter()
        .map(count_decision_points)
        .sum();
    let in_exprs: u32 = stmt_expressions(stmt)
        .into_iter()
        .map(count_expr_decisions)
        .sum();

    own + nested + in_exprs
}

fn count_expr_decisions(expr: &ast::Expr) -> u32 {
    let own = match expr {
        ast::Expr::IfExp(_) => 1,
        ast::Expr::ListComp(e) => comprehension_filters(&e.generators),
        ast::Expr::SetComp(e) => comprehension_filters(&e.generators),
        ast::Expr::GeneratorExp(e) => comprehension_filters(&e.generators),
        ast::Expr::DictComp(e) => comprehension_filters(&e.generators),
        _ => 0,
    };

    own + child_expressions(expr)
        .into_iter()
        .map(count_expr_decisions)
        .sum::<u32>()
}

fn comprehension_filters(generators: &[ast::Comprehension]) -> u32 {
    generators.iter().map(|g| g.ifs.len() as u32).sum()
}

fn count_stmt_bool_ops(stmt: &ast::Stmt) -> u32 {
    if is_declaration(stmt) {
        return 0;
    }

    let nested: u32 = child_blocks(stmt).into_iter().map(count_bool_ops).sum();
    let in_exprs: u32 = stmt_expressions(stmt)
        .into_iter()
        .map(count_expr_bool_ops)
        .sum();

    nested + in_exprs
}
