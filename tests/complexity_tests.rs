//! Complexity metrics through the public pipeline

use indoc::indoc;
use pyqual::{analyze, build_model, FunctionMetrics, QualityConfig, SourceUnit};

fn function_metrics(code: &str) -> FunctionMetrics {
    let unit = SourceUnit::new("test.py", code);
    let report = analyze(&unit, &QualityConfig::default());
    report
        .metrics
        .expect("metrics available")
        .functions
        .into_iter()
        .next()
        .expect("one function")
}

#[test]
fn function_with_no_branches_has_complexity_one() {
    let metrics = function_metrics(indoc! {"
        def add(a, b):
            total = a + b
            return total
    "});
    assert_eq!(metrics.cyclomatic, 1);
    assert_eq!(metrics.cognitive, 0);
    assert_eq!(metrics.nesting, 0);
}

#[test]
fn one_if_else_raises_complexity_to_two() {
    let metrics = function_metrics(indoc! {"
        def sign(x):
            if x >= 0:
                return 1
            else:
                return 0
    "});
    assert_eq!(metrics.cyclomatic, 2);
}

#[test]
fn every_decision_kind_counts() {
    let metrics = function_metrics(indoc! {"
        def busy(xs):
            out = []
            for x in xs:
                while x:
                    x -= 1
            try:
                out = [v for v in xs if v]
            except ValueError:
                pass
            flag = 1 if xs else 0
            ok = xs and out
            return out
    "});
    // for, while, except, comprehension filter, ternary, boolean operator
    assert_eq!(metrics.cyclomatic, 7);
}

#[test]
fn cognitive_complexity_charges_for_nesting() {
    let flat = function_metrics(indoc! {"
        def flat(a, b):
            if a:
                pass
            if b:
                pass
    "});
    let nested = function_metrics(indoc! {"
        def nested(a, b):
            if a:
                if b:
                    pass
    "});
    assert_eq!(flat.cyclomatic, nested.cyclomatic);
    assert!(
        nested.cognitive > flat.cognitive,
        "same path count, higher cognitive load when nested"
    );
}

#[test]
fn halstead_volume_grows_with_code() {
    let small = function_metrics("def f(x):\n    return x + 1\n");
    let large = function_metrics(indoc! {"
        def f(x, y, z):
            a = x + y * z
            b = a / x - y
            c = a % b + x * z
            return a + b + c
    "});
    assert!(small.halstead_volume > 0.0);
    assert!(large.halstead_volume > small.halstead_volume);
}

#[test]
fn maintainability_degrades_with_complexity() {
    let clean = function_metrics("def f(x):\n    return x\n");
    let messy = function_metrics(indoc! {"
        def f(a, b, c, d):
            r = 0
            for i in a:
                if i and b or c:
                    while d:
                        r = r + i * 2 + 3
                        d = d - 1
                    if r > 100:
                        r = r % 97
            return r
    "});
    assert!(clean.maintainability_index > messy.maintainability_index);
    assert!(messy.maintainability_index >= 0.0);
    assert!(clean.maintainability_index <= 100.0);
}

#[test]
fn methods_are_scored_separately_from_their_class() {
    let code = indoc! {"
        class Router:
            def route(self, request):
                if request:
                    return self.handle(request)
                return None

            def handle(self, request):
                return request
    "};
    let unit = SourceUnit::new("router.py", code);
    let model = build_model(&unit).unwrap();
    let report = analyze(&unit, &QualityConfig::default());
    let metrics = report.metrics.unwrap();

    assert_eq!(model.len(), 3);
    assert_eq!(metrics.functions.len(), 3);

    let route = metrics.functions.iter().find(|f| f.name == "route").unwrap();
    let class = metrics.functions.iter().find(|f| f.name == "Router").unwrap();
    assert_eq!(route.cyclomatic, 2);
    assert_eq!(class.cyclomatic, 1, "class body itself has no branches");
}

#[test]
fn module_cyclomatic_spans_all_declarations() {
    let code = indoc! {"
        def a(x):
            if x:
                return 1
            return 0

        def b(y):
            if y:
                return 1
            return 0
    "};
    let unit = SourceUnit::new("mod.py", code);
    let metrics = analyze(&unit, &QualityConfig::default()).metrics.unwrap();
    assert_eq!(metrics.cyclomatic_complexity, 3);
    assert!((metrics.average_cyclomatic - 2.0).abs() < 1e-9);
    assert_eq!(metrics.max_cyclomatic, 2);
}

#[test]
fn deeply_nested_input_does_not_overflow_discovery() {
    // 200 nested one-statement functions
    let mut code = String::new();
    for depth in 0..200 {
        let indent = "    ".repeat(depth);
        code.push_str(&format!("{indent}def f{depth}():\n"));
    }
    code.push_str(&format!("{}pass\n", "    ".repeat(200)));

    let unit = SourceUnit::new("deep.py", code);
    let model = build_model(&unit).expect("deep nesting parses");
    assert_eq!(model.len(), 200);
    assert_eq!(model.declarations[199].parent, Some(198));
}
