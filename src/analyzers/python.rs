//! Structural model builder for Python source
//!
//! Parses a unit with `rustpython-parser` and flattens every declaration
//! into a pre-order arena. Discovery runs on an explicit work-list stack,
//! so pathologically nested input cannot exhaust the call stack; the
//! statement-level counting passes stay bounded by expression depth.

use crate::complexity;
use crate::complexity::walk::{child_blocks, child_expressions, is_declaration, stmt_expressions};
use crate::core::ast::{
    ComplexityFacts, DeclKind, Declaration, DocstringInfo, InsertPoint, LineIndex, MagicLiteral,
    Param, StructuralModel, UnsupportedConstruct,
};
use crate::core::errors::{Error, Result};
use crate::core::{SourceUnit, Span};
use log::debug;
use rustpython_parser::ast::{self, Ranged};
use rustpython_parser::Mode;

/// Build the structural model for one unit.
///
/// Any syntax error fails the whole unit: no partial declarations are
/// returned, and the caller reports exactly one CRITICAL issue.
pub fn build_model(unit: &SourceUnit) -> Result<StructuralModel> {
    let index = LineIndex::new(&unit.text);
    let parsed = rustpython_parser::parse(&unit.text, Mode::Module, &unit.id).map_err(|e| {
        let offset = e.offset.to_usize().min(unit.text.len());
        let (line, column) = index.line_col(offset);
        Error::parse(line, column, e.error.to_string())
    })?;

    let body = match parsed {
        ast::Mod::Module(module) => module.body,
        _ => Vec::new(),
    };

    let builder = ModelBuilder {
        source: &unit.text,
        index: &index,
    };
    Ok(builder.build(unit.id.clone(), &body))
}

struct ModelBuilder<'a> {
    source: &'a str,
    index: &'a LineIndex,
}

impl<'a> ModelBuilder<'a> {
    fn build(&self, unit_id: String, body: &[ast::Stmt]) -> StructuralModel {
        let mut declarations: Vec<Declaration> = Vec::new();
        let mut unsupported = Vec::new();
        let mut bare_except_lines = Vec::new();
        let mut none_comparison_lines = Vec::new();

        // Explicit work-list; children pushed in reverse so pops preserve
        // source order and the arena stays pre-order.
        let mut stack: Vec<(&ast::Stmt, Option<usize>)> = Vec::new();
        for stmt in body.iter().rev() {
            stack.push((stmt, None));
        }

        while let Some((stmt, parent)) = stack.pop() {
            for expr in stmt_expressions(stmt) {
                record_none_comparisons(expr, self.index, &mut none_comparison_lines);
            }

            match stmt {
                ast::Stmt::FunctionDef(f) => {
                    let decl = self.function_declaration(
                        FunctionParts {
                            name: f.name.as_str(),
                            args: &*f.args,
                            body: &f.body,
                            decorators: &f.decorator_list,
                            range_start: f.range.start().to_usize(),
                            range_end: f.range.end().to_usize(),
                            is_async: false,
                        },
                        parent,
                        &declarations,
                    );
                    let idx = push_declaration(&mut declarations, decl, parent);
                    for child in f.body.iter().rev() {
                        stack.push((child, Some(idx)));
                    }
                }
                ast::Stmt::AsyncFunctionDef(f) => {
                    let decl = self.function_declaration(
                        FunctionParts {
                            name: f.name.as_str(),
                            args: &*f.args,
                            body: &f.body,
                            decorators: &f.decorator_list,
                            range_start: f.range.start().to_usize(),
                            range_end: f.range.end().to_usize(),
                            is_async: true,
                        },
                        parent,
                        &declarations,
                    );
                    let idx = push_declaration(&mut declarations, decl, parent);
                    for child in f.body.iter().rev() {
                        stack.push((child, Some(idx)));
                    }
                }
                ast::Stmt::ClassDef(c) => {
                    let decl = self.class_declaration(c);
                    let idx = push_declaration(&mut declarations, decl, parent);
                    for child in c.body.iter().rev() {
                        stack.push((child, Some(idx)));
                    }
                }
                ast::Stmt::Match(m) => {
                    let line = self.index.line_of(m.range.start().to_usize());
                    unsupported.push(UnsupportedConstruct {
                        construct: "match statement".to_string(),
                        line,
                    });
                    for case in m.cases.iter().rev() {
                        for child in case.body.iter().rev() {
                            stack.push((child, parent));
                        }
                    }
                }
                other => {
                    if let ast::Stmt::Try(t) = other {
                        self.record_bare_excepts(&t.handlers, &mut bare_except_lines);
                    }
                    if let ast::Stmt::TryStar(t) = other {
                        self.record_bare_excepts(&t.handlers, &mut bare_except_lines);
                    }
                    for block in child_blocks(other).into_iter().rev() {
                        for child in block.iter().rev() {
                            stack.push((child, parent));
                        }
                    }
                }
            }
        }

        let decl_facts: Vec<ComplexityFacts> =
            declarations.iter().map(|d| d.facts).collect();
        let module_facts = complexity::collect_module_facts(body, &decl_facts);

        debug!(
            "built model for {}: {} declarations, {} unsupported constructs",
            unit_id,
            declarations.len(),
            unsupported.len()
        );

        StructuralModel {
            unit_id,
            declarations,
            module_facts,
            module_docstring: docstring_of(body).map(|d| d.0),
            unsupported,
            bare_except_lines,
            none_comparison_lines,
            total_lines: self.source.lines().count(),
        }
    }

    fn function_declaration(
        &self,
        parts: FunctionParts<'_>,
        parent: Option<usize>,
        declarations: &[Declaration],
    ) -> Declaration {
        let kind = match parent {
            Some(p) if declarations[p].kind == DeclKind::Class => DeclKind::Method,
            _ => DeclKind::Function,
        };

        let span = self.full_span(parts.decorators, parts.range_start, parts.range_end);
        let name_span = self.locate_name(parts.range_start, "def", parts.name);
        let (start_line, start_column) = self.index.line_col(span.start);
        let end_line = self.index.line_of(span.end.saturating_sub(1).max(span.start));

        let docstring = docstring_of(parts.body).map(|(s, text)| DocstringInfo { span: s, text });

        Declaration {
            name: parts.name.to_string(),
            kind,
            params: self.extract_params(parts.args),
            decorators: self.decorator_text(parts.decorators),
            is_async: parts.is_async,
            is_generator: body_has_yield(parts.body),
            returns_value: body_returns_value(parts.body),
            raises: collect_raises(parts.body),
            span,
            name_span,
            start_line,
            start_column,
            end_line,
            docstring,
            insert_point: self.insert_point(parts.body),
            body_statements: body_statement_count(parts.body),
            line_span: end_line - start_line + 1,
            facts: complexity::collect_facts(parts.body),
            magic_numbers: self.collect_magic_numbers(parts.body),
            parent,
            children: Vec::new(),
        }
    }

    fn class_declaration(&self, c: &ast::StmtClassDef) -> Declaration {
        let range_start = c.range.start().to_usize();
        let span = self.full_span(&c.decorator_list, range_start, c.range.end().to_usize());
        let name_span = self.locate_name(range_start, "class", c.name.as_str());
        let (start_line, start_column) = self.index.line_col(span.start);
        let end_line = self.index.line_of(span.end.saturating_sub(1).max(span.start));

        let docstring = docstring_of(&c.body).map(|(s, text)| DocstringInfo { span: s, text });

        Declaration {
            name: c.name.to_string(),
            kind: DeclKind::Class,
            params: Vec::new(),
            decorators: self.decorator_text(&c.decorator_list),
            is_async: false,
            is_generator: false,
            returns_value: false,
            raises: Vec::new(),
            span,
            name_span,
            start_line,
            start_column,
            end_line,
            docstring,
            insert_point: self.insert_point(&c.body),
            body_statements: body_statement_count(&c.body),
            line_span: end_line - start_line + 1,
            facts: complexity::collect_facts(&c.body),
            magic_numbers: self.collect_magic_numbers(&c.body),
            parent: None,
            children: Vec::new(),
        }
    }

    /// Full span: leading decorators through the end of the body.
    fn full_span(&self, decorators: &[ast::Expr], range_start: usize, range_end: usize) -> Span {
        let start = decorators
            .iter()
            .map(|d| d.range().start().to_usize())
            .min()
            .map(|deco_start| {
                // include the '@' sigil when it directly precedes
                self.source[..deco_start]
                    .rfind('@')
                    .filter(|&at| self.source[at + 1..deco_start].trim().is_empty())
                    .unwrap_or(deco_start)
            })
            .unwrap_or(range_start)
            .min(range_start);
        Span::new(start, range_end)
    }

    /// Locate the declared name in the header text following its keyword.
    fn locate_name(&self, header_start: usize, keyword: &str, name: &str) -> Span {
        let header = &self.source[header_start..];
        let mut search_from = 0;
        while let Some(rel) = header[search_from..].find(keyword) {
            let kw_start = search_from + rel;
            let kw_end = kw_start + keyword.len();
            let boundary_before = kw_start == 0
                || !header[..kw_start]
                    .chars()
                    .next_back()
                    .map(is_identifier_char)
                    .unwrap_or(false);
            let after = &header[kw_end..];
            if boundary_before && after.starts_with(char::is_whitespace) {
                let name_rel = kw_end + (after.len() - after.trim_start().len());
                if header[name_rel..].starts_with(name) {
                    let start = header_start + name_rel;
                    return Span::new(start, start + name.len());
                }
            }
            search_from = kw_end;
        }
        // degenerate header; fall back to a zero-width span at the keyword
        Span::new(header_start, header_start)
    }

    fn decorator_text(&self, decorators: &[ast::Expr]) -> Vec<String> {
        decorators
            .iter()
            .map(|d| self.slice(d).to_string())
            .collect()
    }

    fn extract_params(&self, args: &ast::Arguments) -> Vec<Param> {
        let mut params = Vec::new();

        for arg in args.posonlyargs.iter().chain(&args.args) {
            params.push(Param {
                name: arg.def.arg.to_string(),
                annotation: arg
                    .def
                    .annotation
                    .as_ref()
                    .map(|a| self.slice(a.as_ref()).to_string()),
                default: arg.default.as_ref().map(|d| self.slice(d.as_ref()).to_string()),
            });
        }
        if let Some(vararg) = &args.vararg {
            params.push(Param {
                name: format!("*{}", vararg.arg),
                annotation: vararg
                    .annotation
                    .as_ref()
                    .map(|a| self.slice(a.as_ref()).to_string()),
                default: None,
            });
        }
        for arg in &args.kwonlyargs {
            params.push(Param {
                name: arg.def.arg.to_string(),
                annotation: arg
                    .def
                    .annotation
                    .as_ref()
                    .map(|a| self.slice(a.as_ref()).to_string()),
                default: arg.default.as_ref().map(|d| self.slice(d.as_ref()).to_string()),
            });
        }
        if let Some(kwarg) = &args.kwarg {
            params.push(Param {
                name: format!("**{}", kwarg.arg),
                annotation: kwarg
                    .annotation
                    .as_ref()
                    .map(|a| self.slice(a.as_ref()).to_string()),
                default: None,
            });
        }

        params
    }

    /// A docstring can only be spliced in when the first body statement
    /// starts its own line; one-line suites are left alone.
    fn insert_point(&self, body: &[ast::Stmt]) -> Option<InsertPoint> {
        let first = body.first()?;
        let offset = first.range().start().to_usize();
        let (line, column) = self.index.line_col(offset);
        let line_start = self.index.line_start(line)?;
        let leading = &self.source[line_start..offset];
        if leading.chars().all(|c| c == ' ' || c == '\t') {
            Some(InsertPoint {
                offset,
                indent: column - 1,
            })
        } else {
            None
        }
    }

    fn collect_magic_numbers(&self, body: &[ast::Stmt]) -> Vec<MagicLiteral> {
        let mut literals = Vec::new();
        self.magic_in_block(body, &mut literals);
        literals
    }

    fn magic_in_block(&self, body: &[ast::Stmt], out: &mut Vec<MagicLiteral>) {
        for stmt in body {
            if is_declaration(stmt) {
                continue;
            }
            // `LIMIT = 300` style bindings are named constants, not magic
            let named_constant_value = match stmt {
                ast::Stmt::Assign(a) if a.targets.len() == 1 => match &a.targets[0] {
                    ast::Expr::Name(n) if is_constant_name(n.id.as_str()) => {
                        Some(a.value.as_ref())
                    }
                    _ => None,
                },
                _ => None,
            };

            for expr in stmt_expressions(stmt) {
                if named_constant_value.map(|v| std::ptr::eq(v, expr)).unwrap_or(false) {
                    continue;
                }
                self.magic_in_expr(expr, out);
            }
            for block in child_blocks(stmt) {
                self.magic_in_block(block, out);
            }
        }
    }

    fn magic_in_expr(&self, expr: &ast::Expr, out: &mut Vec<MagicLiteral>) {
        // negated literals read as one token: -1 stays in the allow-list
        if let ast::Expr::UnaryOp(u) = expr {
            if matches!(u.op, ast::UnaryOp::USub) {
                if let ast::Expr::Constant(c) = u.operand.as_ref() {
                    if let Some(text) = numeric_text(&c.value) {
                        if !is_allowed_numeric(&text) {
                            out.push(MagicLiteral {
                                text: format!("-{text}"),
                                line: self.index.line_of(u.range.start().to_usize()),
                            });
                        }
                        return;
                    }
                }
            }
        }

        if let ast::Expr::Constant(c) = expr {
            if let Some(text) = numeric_text(&c.value) {
                if !is_allowed_numeric(&text) {
                    out.push(MagicLiteral {
                        text,
                        line: self.index.line_of(c.range.start().to_usize()),
                    });
                }
            }
            return;
        }

        for child in child_expressions(expr) {
            self.magic_in_expr(child, out);
        }
    }

    fn record_bare_excepts(&self, handlers: &[ast::ExceptHandler], out: &mut Vec<usize>) {
        for handler in handlers {
            let ast::ExceptHandler::ExceptHandler(h) = handler;
            if h.type_.is_none() {
                out.push(self.index.line_of(h.range.start().to_usize()));
            }
        }
    }

    fn slice<N: Ranged>(&self, node: &N) -> &str {
        let range = node.range();
        &self.source[range.start().to_usize()..range.end().to_usize()]
    }
}

struct FunctionParts<'a> {
    name: &'a str,
    args: &'a ast::Arguments,
    body: &'a [ast::Stmt],
    decorators: &'a [ast::Expr],
    range_start: usize,
    range_end: usize,
    is_async: bool,
}

fn push_declaration(
    declarations: &mut Vec<Declaration>,
    mut decl: Declaration,
    parent: Option<usize>,
) -> usize {
    decl.parent = parent;
    let idx = declarations.len();
    declarations.push(decl);
    if let Some(p) = parent {
        declarations[p].children.push(idx);
    }
    idx
}

/// First body statement when it is a string literal expression.
fn docstring_of(body: &[ast::Stmt]) -> Option<(Span, String)> {
    let first = body.first()?;
    if let ast::Stmt::Expr(expr_stmt) = first {
        if let ast::Expr::Constant(c) = expr_stmt.value.as_ref() {
            if let ast::Constant::Str(text) = &c.value {
                let range = c.range;
                return Some((
                    Span::new(range.start().to_usize(), range.end().to_usize()),
                    text.clone(),
                ));
            }
        }
    }
    None
}

fn body_statement_count(body: &[ast::Stmt]) -> usize {
    body.len() - usize::from(docstring_of(body).is_some())
}

fn body_returns_value(body: &[ast::Stmt]) -> bool {
    body.iter().any(|stmt| {
        if is_declaration(stmt) {
            return false;
        }
        if let ast::Stmt::Return(r) = stmt {
            return r.value.is_some();
        }
        child_blocks(stmt)
            .into_iter()
            .any(|block| body_returns_value(block))
    })
}

fn body_has_yield(body: &[ast::Stmt]) -> bool {
    fn expr_has_yield(expr: &ast::Expr) -> bool {
        if matches!(expr, ast::Expr::Yield(_) | ast::Expr::YieldFrom(_)) {
            return true;
        }
        // lambdas are their own scope; a yield cannot appear inside one
        child_expressions(expr).into_iter().any(expr_has_yield)
    }

    body.iter().any(|stmt| {
        if is_declaration(stmt) {
            return false;
        }
        stmt_expressions(stmt).into_iter().any(expr_has_yield)
            || child_blocks(stmt)
                .into_iter()
                .any(|block| body_has_yield(block))
    })
}

/// Syntactically-literal exception names from `raise` statements.
fn collect_raises(body: &[ast::Stmt]) -> Vec<String> {
    fn walk(body: &[ast::Stmt], out: &mut Vec<String>) {
        for stmt in body {
            if is_declaration(stmt) {
                continue;
            }
            if let ast::Stmt::Raise(r) = stmt {
                if let Some(exc) = &r.exc {
                    if let Some(name) = exception_name(exc) {
                        if !out.contains(&name) {
                            out.push(name);
                        }
                    }
                }
            }
            for block in child_blocks(stmt) {
                walk(block, out);
            }
        }
    }

    let mut raises = Vec::new();
    walk(body, &mut raises);
    raises
}

fn exception_name(expr: &ast::Expr) -> Option<String> {
    match expr {
        ast::Expr::Name(n) => Some(n.id.to_string()),
        ast::Expr::Attribute(a) => {
            exception_name(&a.value).map(|base| format!("{base}.{}", a.attr))
        }
        ast::Expr::Call(c) => exception_name(&c.func),
        _ => None,
    }
}

fn record_none_comparisons(expr: &ast::Expr, index: &LineIndex, out: &mut Vec<usize>) {
    if let ast::Expr::Compare(c) = expr {
        let against_none = c
            .comparators
            .iter()
            .any(|e| matches!(e, ast::Expr::Constant(k) if matches!(k.value, ast::Constant::None)));
        let eq_style = c
            .ops
            .iter()
            .any(|op| matches!(op, ast::CmpOp::Eq | ast::CmpOp::NotEq));
        if against_none && eq_style {
            out.push(index.line_of(c.range.start().to_usize()));
        }
    }
    for child in child_expressions(expr) {
        record_none_comparisons(child, index, out);
    }
}

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn is_constant_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

fn numeric_text(value: &ast::Constant) -> Option<String> {
    match value {
        ast::Constant::Int(i) => Some(i.to_string()),
        ast::Constant::Float(f) => Some(f.to_string()),
        _ => None,
    }
}

fn is_allowed_numeric(text: &str) -> bool {
    matches!(text, "0" | "1" | "-1" | "0.0" | "1.0")
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    fn model_of(code: &str) -> StructuralModel {
        build_model(&SourceUnit::new("test.py", code)).expect("code should parse")
    }

    #[test]
    fn flat_function_is_modeled() {
        let code = indoc! {"
            def greet(name, excited=False):
                message = 'hi ' + name
                return message
        "};
        let model = model_of(code);
        assert_eq!(model.len(), 1);

        let decl = &model.declarations[0];
        assert_eq!(decl.name, "greet");
        assert_eq!(decl.kind, DeclKind::Function);
        assert_eq!(decl.params.len(), 2);
        assert_eq!(decl.params[1].default.as_deref(), Some("False"));
        assert!(decl.returns_value);
        assert!(!decl.is_generator);
        assert_eq!(decl.body_statements, 2);
        assert_eq!(decl.start_line, 1);
        assert_eq!(decl.end_line, 3);
    }

    #[test]
    fn name_span_addresses_the_identifier() {
        let code = "def CalculateTotal(items):\n    return items\n";
        let model = model_of(code);
        let span = model.declarations[0].name_span;
        assert_eq!(&code[span.start..span.end], "CalculateTotal");
    }

    #[test]
    fn class_methods_are_children_with_method_kind() {
        let code = indoc! {"
            class Account:
                def deposit(self, amount):
                    self.balance += amount

                def withdraw(self, amount):
                    self.balance -= amount
        "};
        let model = model_of(code);
        assert_eq!(model.len(), 3);
        assert_eq!(model.declarations[0].kind, DeclKind::Class);
        assert_eq!(model.declarations[0].children, vec![1, 2]);
        assert_eq!(model.declarations[1].kind, DeclKind::Method);
        assert_eq!(model.declarations[1].parent, Some(0));

        // method spans lie inside the class span
        let class_span = model.declarations[0].span;
        for method in model.children_of(0) {
            assert!(method.span.start >= class_span.start);
            assert!(method.span.end <= class_span.end);
        }
    }

    #[test]
    fn arena_order_is_pre_order() {
        let code = indoc! {"
            def first():
                def inner():
                    pass
                return inner

            class Second:
                def method(self):
                    pass
        "};
        let model = model_of(code);
        let names: Vec<&str> = model.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["first", "inner", "Second", "method"]);
    }

    #[test]
    fn decorated_function_span_starts_at_decorator() {
        let code = "@app.route('/x')\ndef handler():\n    return 1\n";
        let model = model_of(code);
        let decl = &model.declarations[0];
        assert_eq!(decl.start_line, 1);
        assert_eq!(decl.decorators, vec!["app.route('/x')".to_string()]);
        assert!(code[decl.span.start..].starts_with('@'));
    }

    #[test]
    fn docstring_span_slices_the_literal() {
        let code = "def documented():\n    \"\"\"Say hello.\"\"\"\n    return 1\n";
        let model = model_of(code);
        let doc = model.declarations[0].docstring.as_ref().expect("docstring");
        assert_eq!(doc.text, "Say hello.");
        assert!(code[doc.span.start..doc.span.end].starts_with("\"\"\""));
        assert_eq!(model.declarations[0].body_statements, 1);
    }

    #[test]
    fn one_line_suite_has_no_insert_point() {
        let model = model_of("def f(): return 1\n");
        assert!(model.declarations[0].insert_point.is_none());

        let model = model_of("def f():\n    return 1\n");
        let point = model.declarations[0].insert_point.expect("insert point");
        assert_eq!(point.indent, 4);
    }

    #[test]
    fn generator_and_async_flags() {
        let code = indoc! {"
            async def fetch(url):
                return url

            def numbers():
                yield 1
        "};
        let model = model_of(code);
        assert!(model.declarations[0].is_async);
        assert!(!model.declarations[0].is_generator);
        assert!(model.declarations[1].is_generator);
    }

    #[test]
    fn raises_are_collected_syntactically() {
        let code = indoc! {"
            def load(path):
                if not path:
                    raise ValueError('empty path')
                raise errors.ConfigError(path)
        "};
        let model = model_of(code);
        assert_eq!(
            model.declarations[0].raises,
            vec!["ValueError".to_string(), "errors.ConfigError".to_string()]
        );
    }

    #[test]
    fn magic_numbers_skip_allowed_and_named_constants() {
        let code = indoc! {"
            def price(quantity):
                TAX_RATE = 42
                base = quantity * 17
                offset = -1
                return base + 0
        "};
        let model = model_of(code);
        let magic: Vec<&str> = model.declarations[0]
            .magic_numbers
            .iter()
            .map(|m| m.text.as_str())
            .collect();
        assert_eq!(magic, vec!["17"]);
    }

    #[test]
    fn parse_failure_reports_location() {
        let err = build_model(&SourceUnit::new("bad.py", "def f(:\n")).unwrap_err();
        match err {
            Error::Parse { line, column, .. } => {
                assert_eq!(line, 1);
                assert!(column > 1, "column should point into the header");
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn match_statement_is_an_unsupported_notice() {
        let code = indoc! {"
            def dispatch(cmd):
                match cmd:
                    case 'start':
                        return 1
                    case _:
                        return 2
        "};
        let model = model_of(code);
        assert_eq!(model.unsupported.len(), 1);
        assert_eq!(model.unsupported[0].line, 2);
        // match arms do not count as decision points
        assert_eq!(model.declarations[0].facts.decision_points, 0);
    }

    #[test]
    fn bare_except_and_none_comparison_facts() {
        let code = indoc! {"
            def risky(x):
                try:
                    if x == None:
                        return 1
                except:
                    return 2
        "};
        let model = model_of(code);
        assert_eq!(model.none_comparison_lines, vec![3]);
        assert_eq!(model.bare_except_lines, vec![5]);
    }

    #[test]
    fn module_docstring_is_tracked() {
        let model = model_of("\"\"\"Module things.\"\"\"\nx = 1\n");
        assert!(model.module_docstring.is_some());
    }
}
