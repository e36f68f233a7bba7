//! Cognitive complexity: a nesting- and break-sensitive measure
//!
//! Each control-flow structure costs 1 plus one per nesting level it sits
//! at; `break`/`continue` cost 1 each; every boolean operator beyond the
//! first in one logical expression costs 1 (sequence penalty).

use crate::complexity::cyclomatic::count_expr_bool_ops;
use crate::complexity::walk::{child_expressions, is_declaration, stmt_expressions};
use rustpython_parser::ast;

pub fn calculate_cognitive(body: &[ast::Stmt]) -> u32 {
    body.iter().map(|stmt| cognitive_stmt(stmt, 0)).sum()
}

fn cognitive_stmt(stmt: &ast::Stmt, nesting: u32) -> u32 {
    if is_declaration(stmt) {
        return 0;
    }

    match stmt {
        ast::Stmt::If(s) => {
            let mut cognitive = 1 + nesting + sequence_penalty(&s.test);
            cognitive += expr_cost(&s.test, nesting);
            cognitive += block_cost(&s.body, nesting + 1);
            cognitive += block_cost(&s.orelse, nesting + 1);
            cognitive
        }
        ast::Stmt::While(s) => {
            let mut cognitive = 1 + nesting + sequence_penalty(&s.test);
            cognitive += expr_cost(&s.test, nesting);
            cognitive += block_cost(&s.body, nesting + 1);
            cognitive += block_cost(&s.orelse, nesting + 1);
            cognitive
        }
        ast::Stmt::For(s) => {
            1 + nesting
                + expr_cost(&s.iter, nesting)
                + block_cost(&s.body, nesting + 1)
                + block_cost(&s.orelse, nesting + 1)
        }
        ast::Stmt::AsyncFor(s) => {
            1 + nesting
                + expr_cost(&s.iter, nesting)
                + block_cost(&s.body, nesting + 1)
                + block_cost(&s.orelse, nesting + 1)
        }
        ast::Stmt::Try(s) => try_cost(&s.body, &s.handlers, &s.orelse, &s.finalbody, nesting),
        ast::Stmt::TryStar(s) => try_cost(&s.body, &s.handlers, &s.orelse, &s.finalbody, nesting),
        ast::Stmt::With(s) => block_cost(&s.body, nesting) + items_cost(&s.items, nesting),
        ast::Stmt::AsyncWith(s) => block_cost(&s.body, nesting) + items_cost(&s.items, nesting),
        ast::Stmt::Break(_) | ast::Stmt::Continue(_) => 1,
        _ => stmt_expressions(stmt)
            .into_iter()
            .map(|e| sequence_penalty(e) + expr_cost(e, nesting))
            .sum(),
    }
}

fn try_cost(
    body: &[ast::Stmt],
    handlers: &[ast::ExceptHandler],
    orelse: &[ast::Stmt],
    finalbody: &[ast::Stmt],
    nesting: u32,
) -> u32 {
    let mut cognitive = block_cost(body, nesting + 1);
    for handler in handlers {
        let ast::ExceptHandler::ExceptHandler(h) = handler;
        cognitive += 1 + nesting;
        cognitive += block_cost(&h.body, nesting + 1);
    }
    cognitive += block_cost(orelse, nesting + 1);
    cognitive += block_cost(finalbody, nesting + 1);
    cognitive
}

fn items_cost(items: &[ast::WithItem], nesting: u32) -> u32 {
    items
        .iter()
        .map(|item| expr_cost(&item.context_expr, nesting))
        .sum()
}

fn block_cost(body: &[ast::Stmt], nesting: u32) -> u32 {
    body.iter().map(|stmt| cognitive_stmt(stmt, nesting)).sum()
}

/// Conditional expressions nested inside any expression position.
fn expr_cost(expr: &ast::Expr, nesting: u32) -> u32 {
    let own = match expr {
        ast::Expr::IfExp(_) => 1 + nesting,
        _ => 0,
    };
    own + child_expressions(expr)
        .into_iter()
        .map(|e| expr_cost(e, nesting))
        .sum::<u32>()
}

fn sequence_penalty(expr: &ast::Expr) -> u32 {
    count_expr_bool_ops(expr).saturating_sub(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_body(code: &str) -> Vec<ast::Stmt> {
        match rustpython_parser::parse(code, rustpython_parser::Mode::Module, "<test>").unwrap() {
            ast::Mod::Module(m) => m.body,
            _ => panic!("expected module"),
        }
    }

    #[test]
    fn straight_line_code_costs_nothing() {
        let body = parse_body("x = 1\ny = x\n");
        assert_eq!(calculate_cognitive(&body), 0);
    }

    #[test]
    fn flat_branches_cost_one_each() {
        let body = parse_body("if a:\n    pass\nwhile b:\n    pass\n");
        assert_eq!(calculate_cognitive(&body), 2);
    }

    #[test]
    fn nesting_raises_the_price() {
        let body = parse_body("if a:\n    if b:\n        if c:\n            pass\n");
        // 1 + 2 + 3
        assert_eq!(calculate_cognitive(&body), 6);
    }

    #[test]
    fn break_and_continue_cost_one() {
        let body = parse_body("for i in items:\n    if i:\n        break\n    continue\n");
        // for: 1, nested if: 2, break: 1, continue: 1
        assert_eq!(calculate_cognitive(&body), 5);
    }

    #[test]
    fn boolean_sequences_beyond_first_are_penalized() {
        let body = parse_body("if a and b and c:\n    pass\n");
        // if: 1, two operators -> penalty 1
        assert_eq!(calculate_cognitive(&body), 2);

        let body = parse_body("if a and b:\n    pass\n");
        assert_eq!(calculate_cognitive(&body), 1);
    }

    #[test]
    fn nested_declarations_are_excluded() {
        let body = parse_body("def inner():\n    if x:\n        pass\n");
        assert_eq!(calculate_cognitive(&body), 0);
    }
}
