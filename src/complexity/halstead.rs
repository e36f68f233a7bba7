//! Halstead operator/operand tallies
//!
//! Operators are the symbolic and short-circuit forms (arithmetic,
//! comparison, assignment, call/subscript/attribute access, `and`/`or`/
//! `not`, `lambda`, conditional expressions). Operands are names, attribute
//! names, and literal constants. Statement keywords are not treated as
//! operators; the counts feed relative size/difficulty measures, not a
//! token-exact reproduction of the source.

use crate::core::ast::HalsteadCounts;
use crate::complexity::walk::{child_blocks, child_expressions, stmt_expressions};
use rustpython_parser::ast;
use std::collections::HashSet;

/// Tally operators and operands over a statement block. With
/// `descend_into_decls` the walk enters nested `def`/`class` bodies,
/// producing module-wide counts with a shared distinct vocabulary.
pub fn collect_counts(body: &[ast::Stmt], descend_into_decls: bool) -> HalsteadCounts {
    let mut collector = Collector {
        operators: HashSet::new(),
        operands: HashSet::new(),
        total_operators: 0,
        total_operands: 0,
        descend_into_decls,
    };
    for stmt in body {
        collector.visit_stmt(stmt);
    }
    HalsteadCounts {
        distinct_operators: collector.operators.len() as u32,
        distinct_operands: collector.operands.len() as u32,
        total_operators: collector.total_operators,
        total_operands: collector.total_operands,
    }
}

struct Collector {
    operators: HashSet<String>,
    operands: HashSet<String>,
    total_operators: u32,
    total_operands: u32,
    descend_into_decls: bool,
}

impl Collector {
    fn add_operator(&mut self, symbol: &str) {
        self.operators.insert(symbol.to_string());
        self.total_operators += 1;
    }

    fn add_operand(&mut self, token: String) {
        self.operands.insert(token);
        self.total_operands += 1;
    }

    fn visit_stmt(&mut self, stmt: &ast::Stmt) {
        match stmt {
            ast::Stmt::FunctionDef(s) => {
                if self.descend_into_decls {
                    self.visit_block(&s.body);
                }
                return;
            }
            ast::Stmt::AsyncFunctionDef(s) => {
                if self.descend_into_decls {
                    self.visit_block(&s.body);
                }
                return;
            }
            ast::Stmt::ClassDef(s) => {
                if self.descend_into_decls {
                    self.visit_block(&s.body);
                }
                return;
            }
            ast::Stmt::Assign(s) => {
                for _ in &s.targets {
                    self.add_operator("=");
                }
            }
            ast::Stmt::AnnAssign(s) => {
                if s.value.is_some() {
                    self.add_operator("=");
                }
            }
            ast::Stmt::AugAssign(s) => {
                let symbol = format!("{}=", operator_symbol(&s.op));
                self.add_operator(&symbol);
            }
            _ => {}
        }

        for expr in stmt_expressions(stmt) {
            self.visit_expr(expr);
        }
        for block in child_blocks(stmt) {
            self.visit_block(block);
        }
    }

    fn visit_block(&mut self, body: &[ast::Stmt]) {
        for stmt in body {
            self.visit_stmt(stmt);
        }
    }

    fn visit_expr(&mut self, expr: &ast::Expr) {
        match expr {
            ast::Expr::BoolOp(e) => {
                let symbol = match e.op {
                    ast::BoolOp::And => "and",
                    ast::BoolOp::Or => "or",
                };
                for _ in 1..e.values.len() {
                    self.add_operator(symbol);
                }
            }
            ast::Expr::NamedExpr(_) => self.add_operator(":="),
            ast::Expr::BinOp(e) => self.add_operator(operator_symbol(&e.op)),
            ast::Expr::UnaryOp(e) => {
                let symbol = match e.op {
                    ast::UnaryOp::Invert => "~",
                    ast::UnaryOp::Not => "not",
                    ast::UnaryOp::UAdd => "+",
                    ast::UnaryOp::USub => "-",
                };
                self.add_operator(symbol);
            }
            ast::Expr::Lambda(_) => self.add_operator("lambda"),
            ast::Expr::IfExp(_) => self.add_operator("if"),
            ast::Expr::Compare(e) => {
                for op in &e.ops {
                    self.add_operator(comparison_symbol(op));
                }
            }
            ast::Expr::Call(_) => self.add_operator("()"),
            ast::Expr::Subscript(_) => self.add_operator("[]"),
            ast::Expr::Slice(_) => self.add_operator(":"),
            ast::Expr::Starred(_) => self.add_operator("*"),
            ast::Expr::Attribute(e) => {
                self.add_operator(".");
                self.add_operand(e.attr.to_string());
            }
            ast::Expr::Name(e) => self.add_operand(e.id.to_string()),
            ast::Expr::Constant(e) => self.add_operand(constant_repr(&e.value)),
            _ => {}
        }

        for child in child_expressions(expr) {
            self.visit_expr(child);
        }
    }
}

fn operator_symbol(op: &ast::Operator) -> &'static str {
    match op {
        ast::Operator::Add => "+",
        ast::Operator::Sub => "-",
        ast::Operator::Mult => "*",
        ast::Operator::MatMult => "@",
        ast::Operator::Div => "/",
        ast::Operator::Mod => "%",
        ast::Operator::Pow => "**",
        ast::Operator::LShift => "<<",
        ast::Operator::RShift => ">>",
        ast::Operator::BitOr => "|",
        ast::Operator::BitXor => "^",
        ast::Operator::BitAnd => "&",
        ast::Operator::FloorDiv => "//",
    }
}

fn comparison_symbol(op: &ast::CmpOp) -> &'static str {
    match op {
        ast::CmpOp::Eq => "==",
        ast::CmpOp::NotEq => "!=",
        ast::CmpOp::Lt => "<",
        ast::CmpOp::LtE => "<=",
        ast::CmpOp::Gt => ">",
        ast::CmpOp::GtE => ">=",
        ast::CmpOp::Is => "is",
        ast::CmpOp::IsNot => "is not",
        ast::CmpOp::In => "in",
        ast::CmpOp::NotIn => "not in",
    }
}

fn constant_repr(value: &ast::Constant) -> String {
    match value {
        ast::Constant::None => "None".to_string(),
        ast::Constant::Bool(b) => b.to_string(),
        ast::Constant::Str(s) => format!("{s:?}"),
        ast::Constant::Int(i) => i.to_string(),
        ast::Constant::Float(f) => f.to_string(),
        ast::Constant::Complex { real, imag } => format!("({real}+{imag}j)"),
        ast::Constant::Bytes(b) => format!("{b:?}"),
        ast::Constant::Ellipsis => "...".to_string(),
        ast::Constant::Tuple(elems) => {
            let parts: Vec<String> = elems.iter().map(constant_repr).collect();
            format!("({})", parts.join(", "))
        }
    }
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
    fn simple_addition_counts() {
        let counts = collect_counts(&parse_body("x + y\n"), false);
        assert_eq!(counts.distinct_operators, 1);
        assert_eq!(counts.total_operators, 1);
        assert_eq!(counts.distinct_operands, 2);
        assert_eq!(counts.total_operands, 2);
    }

    #[test]
    fn repeated_operands_increase_totals_only() {
        let counts = collect_counts(&parse_body("x = x + x\n"), false);
        assert_eq!(counts.distinct_operands, 1);
        assert_eq!(counts.total_operands, 3);
        // '=' and '+'
        assert_eq!(counts.distinct_operators, 2);
        assert_eq!(counts.total_operators, 2);
    }

    #[test]
    fn comparisons_and_boolops_are_operators() {
        let counts = collect_counts(&parse_body("a == b and c != d\n"), false);
        assert_eq!(counts.distinct_operators, 3);
        assert_eq!(counts.total_operators, 3);
        assert_eq!(counts.total_operands, 4);
    }

    #[test]
    fn declarations_are_boundaries_unless_descending() {
        let code = "def f():\n    return a + b\n";
        let flat = collect_counts(&parse_body(code), false);
        assert_eq!(flat.total_operators + flat.total_operands, 0);

        let module_wide = collect_counts(&parse_body(code), true);
        assert_eq!(module_wide.total_operators, 1);
        assert_eq!(module_wide.total_operands, 2);
    }

    #[test]
    fn string_and_int_literals_are_distinct_operands() {
        let counts = collect_counts(&parse_body("x = \"1\"\ny = 1\n"), false);
        assert_eq!(counts.distinct_operands, 4);
    }
}
