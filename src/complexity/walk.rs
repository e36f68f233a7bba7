//! Shared AST traversal helpers for the counting passes
//!
//! Each counting pass owns its logic but shares one notion of "children":
//! nested `def`/`class` bodies are declaration boundaries and are never
//! entered here, so every declaration is scored on its own.

use rustpython_parser::ast;

/// Child statement blocks of a compound statement. Declaration bodies are
/// excluded; `match` case bodies are included so literal/operand walks see
/// them even though `match` itself is not modeled as a decision.
pub fn child_blocks(stmt: &ast::Stmt) -> Vec<&[ast::Stmt]> {
    match stmt {
        ast::Stmt::For(s) => vec![&s.body, &s.orelse],
        ast::Stmt::AsyncFor(s) => vec![&s.body, &s.orelse],
        ast::Stmt::While(s) => vec![&s.body, &s.orelse],
        ast::Stmt::If(s) => vec![&s.body, &s.orelse],
        ast::Stmt::With(s) => vec![&s.body],
        ast::Stmt::AsyncWith(s) => vec![&s.body],
        ast::Stmt::Try(s) => {
            let mut blocks: Vec<&[ast::Stmt]> = vec![&s.body];
            for handler in &s.handlers {
                let ast::ExceptHandler::ExceptHandler(h) = handler;
                blocks.push(&h.body);
            }
            blocks.push(&s.orelse);
            blocks.push(&s.finalbody);
            blocks
        }
        ast::Stmt::TryStar(s) => {
            let mut blocks: Vec<&[ast::Stmt]> = vec![&s.body];
            for handler in &s.handlers {
                let ast::ExceptHandler::ExceptHandler(h) = handler;
                blocks.push(&h.body);
            }
            blocks.push(&s.orelse);
            blocks.push(&s.finalbody);
            blocks
        }
        ast::Stmt::Match(s) => s.cases.iter().map(|c| c.body.as_slice()).collect(),
        _ => vec![],
    }
}

/// Expressions directly contained in a statement (tests, targets, values).
pub fn stmt_expressions(stmt: &ast::Stmt) -> Vec<&ast::Expr> {
    match stmt {
        ast::Stmt::Return(s) => s.value.iter().map(|v| v.as_ref()).collect(),
        ast::Stmt::Delete(s) => s.targets.iter().collect(),
        ast::Stmt::Assign(s) => {
            let mut exprs: Vec<&ast::Expr> = s.targets.iter().collect();
            exprs.push(&s.value);
            exprs
        }
        ast::Stmt::AugAssign(s) => vec![&s.target, &s.value],
        ast::Stmt::AnnAssign(s) => {
            let mut exprs: Vec<&ast::Expr> = vec![&s.target, &s.annotation];
            if let Some(value) = &s.value {
                exprs.push(value);
            }
            exprs
        }
        ast::Stmt::For(s) => vec![&s.target, &s.iter],
        ast::Stmt::AsyncFor(s) => vec![&s.target, &s.iter],
        ast::Stmt::While(s) => vec![&s.test],
        ast::Stmt::If(s) => vec![&s.test],
        ast::Stmt::With(s) => with_item_expressions(&s.items),
        ast::Stmt::AsyncWith(s) => with_item_expressions(&s.items),
        ast::Stmt::Match(s) => {
            let mut exprs: Vec<&ast::Expr> = vec![&s.subject];
            for case in &s.cases {
                if let Some(guard) = &case.guard {
                    exprs.push(guard.as_ref());
                }
            }
            exprs
        }
        ast::Stmt::Raise(s) => {
            let mut exprs = Vec::new();
            if let Some(exc) = &s.exc {
                exprs.push(exc.as_ref());
            }
            if let Some(cause) = &s.cause {
                exprs.push(cause.as_ref());
            }
            exprs
        }
        ast::Stmt::Try(s) => except_types(&s.handlers),
        ast::Stmt::TryStar(s) => except_types(&s.handlers),
        ast::Stmt::Assert(s) => {
            let mut exprs: Vec<&ast::Expr> = vec![&s.test];
            if let Some(msg) = &s.msg {
                exprs.push(msg.as_ref());
            }
            exprs
        }
        ast::Stmt::Expr(s) => vec![&s.value],
        _ => vec![],
    }
}

fn with_item_expressions(items: &[ast::WithItem]) -> Vec<&ast::Expr> {
    let mut exprs = Vec::new();
    for item in items {
        exprs.push(&item.context_expr);
        if let Some(vars) = &item.optional_vars {
            exprs.push(vars.as_ref());
        }
    }
    exprs
}

fn except_types(handlers: &[ast::ExceptHandler]) -> Vec<&ast::Expr> {
    handlers
        .iter()
        .filter_map(|handler| {
            let ast::ExceptHandler::ExceptHandler(h) = handler;
            h.type_.as_deref()
        })
        .collect()
}

/// Direct child expressions of an expression.
pub fn child_expressions(expr: &ast::Expr) -> Vec<&ast::Expr> {
    match expr {
        ast::Expr::BoolOp(e) => e.values.iter().collect(),
        ast::Expr::NamedExpr(e) => vec![&e.target, &e.value],
        ast::Expr::BinOp(e) => vec![&e.left, &e.right],
        ast::Expr::UnaryOp(e) => vec![&e.operand],
        ast::Expr::Lambda(e) => {
            let mut exprs: Vec<&ast::Expr> = vec![&e.body];
            for arg in &e.args.args {
                if let Some(default) = &arg.default {
                    exprs.push(default.as_ref());
                }
            }
            exprs
        }
        ast::Expr::IfExp(e) => vec![&e.test, &e.body, &e.orelse],
        ast::Expr::Dict(e) => {
            let mut exprs: Vec<&ast::Expr> = e.keys.iter().flatten().collect();
            exprs.extend(e.values.iter());
            exprs
        }
        ast::Expr::Set(e) => e.elts.iter().collect(),
        ast::Expr::ListComp(e) => comprehension_parts(&e.elt, None, &e.generators),
        ast::Expr::SetComp(e) => comprehension_parts(&e.elt, None, &e.generators),
        ast::Expr::GeneratorExp(e) => comprehension_parts(&e.elt, None, &e.generators),
        ast::Expr::DictComp(e) => comprehension_parts(&e.key, Some(&e.value), &e.generators),
        ast::Expr::Await(e) => vec![&e.value],
        ast::Expr::Yield(e) => e.value.iter().map(|v| v.as_ref()).collect(),
        ast::Expr::YieldFrom(e) => vec![&e.value],
        ast::Expr::Compare(e) => {
            let mut exprs: Vec<&ast::Expr> = vec![&e.left];
            exprs.extend(e.comparators.iter());
            exprs
        }
        ast::Expr::Call(e) => {
            let mut exprs: Vec<&ast::Expr> = vec![&e.func];
            exprs.extend(e.args.iter());
            exprs.extend(e.keywords.iter().map(|k| &k.value));
            exprs
        }
        ast::Expr::FormattedValue(e) => {
            let mut exprs: Vec<&ast::Expr> = vec![&e.value];
            if let Some(spec) = &e.format_spec {
                exprs.push(spec.as_ref());
            }
            exprs
        }
        ast::Expr::JoinedStr(e) => e.values.iter().collect(),
        ast::Expr::Attribute(e) => vec![&e.value],
        ast::Expr::Subscript(e) => vec![&e.value, &e.slice],
        ast::Expr::Starred(e) => vec![&e.value],
        ast::Expr::List(e) => e.elts.iter().collect(),
        ast::Expr::Tuple(e) => e.elts.iter().collect(),
        ast::Expr::Slice(e) => {
            let mut exprs = Vec::new();
            for part in [&e.lower, &e.upper, &e.step] {
                if let Some(p) = part {
                    exprs.push(p.as_ref());
                }
            }
            exprs
        }
        _ => vec![],
    }
}

fn comprehension_parts<'a>(
    elt: &'a ast::Expr,
    value: Option<&'a ast::Expr>,
    generators: &'a [ast::Comprehension],
) -> Vec<&'a ast::Expr> {
    let mut exprs: Vec<&ast::Expr> = vec![elt];
    if let Some(v) = value {
        exprs.push(v);
    }
    for generator in generators {
        exprs.push(&generator.target);
        exprs.push(&generator.iter);
        exprs.extend(generator.ifs.iter());
    }
    exprs
}

pub fn is_declaration(stmt: &ast::Stmt) -> bool {
    matches!(
        stmt,
        ast::Stmt::FunctionDef(_) | ast::Stmt::AsyncFunctionDef(_) | ast::Stmt::ClassDef(_)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(code: &str) -> Vec<ast::Stmt> {
        match rustpython_parser::parse(code, rustpython_parser::Mode::Module, "<test>").unwrap() {
            ast::Mod::Module(m) => m.body,
            _ => panic!("expected module"),
        }
    }

    #[test]
    fn if_statement_exposes_both_branches() {
        let stmts = parse("if x:\n    a = 1\nelse:\n    a = 2\n");
        let blocks = child_blocks(&stmts[0]);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].len(), 1);
        assert_eq!(blocks[1].len(), 1);
    }

    #[test]
    fn nested_def_is_a_boundary() {
        let stmts = parse("def outer():\n    def inner():\n        pass\n");
        assert!(is_declaration(&stmts[0]));
        assert!(child_blocks(&stmts[0]).is_empty());
    }

    #[test]
    fn try_exposes_handler_bodies_and_types() {
        let stmts = parse(
            "try:\n    risky()\nexcept ValueError as e:\n    handle(e)\nfinally:\n    done()\n",
        );
        let blocks = child_blocks(&stmts[0]);
        assert_eq!(blocks.len(), 4);
        let exprs = stmt_expressions(&stmts[0]);
        assert_eq!(exprs.len(), 1);
    }

    #[test]
    fn call_children_include_keywords() {
        let stmts = parse("f(a, b, key=c)\n");
        let exprs = stmt_expressions(&stmts[0]);
        let children = child_expressions(exprs[0]);
        assert_eq!(children.len(), 4);
    }
}
