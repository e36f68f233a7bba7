//! Maximum nesting depth of control structures within one declaration

use crate::complexity::walk::is_declaration;
use rustpython_parser::ast;

pub fn calculate_nesting(body: &[ast::Stmt]) -> u32 {
    body.iter()
        .map(|stmt| nesting_stmt(stmt, 0))
        .max()
        .unwrap_or(0)
}

fn nesting_stmt(stmt: &ast::Stmt, depth: u32) -> u32 {
    if is_declaration(stmt) {
        return depth;
    }

    match stmt {
        ast::Stmt::If(s) => {
            deepest(&s.body, depth + 1).max(deepest(&s.orelse, depth + 1))
        }
        ast::Stmt::While(s) => {
            deepest(&s.body, depth + 1).max(deepest(&s.orelse, depth + 1))
        }
        ast::Stmt::For(s) => deepest(&s.body, depth + 1).max(deepest(&s.orelse, depth + 1)),
        ast::Stmt::AsyncFor(s) => deepest(&s.body, depth + 1).max(deepest(&s.orelse, depth + 1)),
        ast::Stmt::With(s) => deepest(&s.body, depth + 1),
        ast::Stmt::AsyncWith(s) => deepest(&s.body, depth + 1),
        ast::Stmt::Try(s) => {
            let mut max = deepest(&s.body, depth + 1);
            for handler in &s.handlers {
                let ast::ExceptHandler::ExceptHandler(h) = handler;
                max = max.max(deepest(&h.body, depth + 1));
            }
            max.max(deepest(&s.orelse, depth + 1))
                .max(deepest(&s.finalbody, depth + 1))
        }
        ast::Stmt::TryStar(s) => {
            let mut max = deepest(&s.body, depth + 1);
            for handler in &s.handlers {
                let ast::ExceptHandler::ExceptHandler(h) = handler;
                max = max.max(deepest(&h.body, depth + 1));
            }
            max.max(deepest(&s.orelse, depth + 1))
                .max(deepest(&s.finalbody, depth + 1))
        }
        _ => depth,
    }
}

fn deepest(body: &[ast::Stmt], depth: u32) -> u32 {
    body.iter()
        .map(|stmt| nesting_stmt(stmt, depth))
        .max()
        .unwrap_or(depth)
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
    fn flat_code_has_zero_nesting() {
        assert_eq!(calculate_nesting(&parse_body("x = 1\n")), 0);
    }

    #[test]
    fn each_control_structure_adds_a_level() {
        let body = parse_body("if a:\n    for i in b:\n        while c:\n            pass\n");
        assert_eq!(calculate_nesting(&body), 3);
    }

    #[test]
    fn siblings_do_not_stack() {
        let body = parse_body("if a:\n    pass\nif b:\n    pass\n");
        assert_eq!(calculate_nesting(&body), 1);
    }

    #[test]
    fn with_and_try_count_as_levels() {
        let body = parse_body("with open(p) as f:\n    try:\n        f.read()\n    except OSError:\n        pass\n");
        assert_eq!(calculate_nesting(&body), 2);
    }
}
