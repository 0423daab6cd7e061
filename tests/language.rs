use std::{cell::Cell, fs};

use readson::{
    access::json::JsonData,
    error::{ParseError, RuntimeError},
    evaluate,
    interpreter::{
        evaluator::core::{Context, EvalResult, Getter},
        value::element_type::ElementType,
    },
    parse, render_json,
};
use serde_json::{Value, json};
use walkdir::WalkDir;

#[test]
fn demo_templates_render() {
    let mut count = 0;

    for entry in WalkDir::new("demos").min_depth(1)
                                      .max_depth(1)
                                      .into_iter()
                                      .filter_map(Result::ok)
                                      .filter(|e| e.file_type().is_dir())
    {
        let dir = entry.path();
        let read = |name: &str| {
            fs::read_to_string(dir.join(name)).unwrap_or_else(|e| {
                                                  panic!("Failed to read {name} in {dir:?}: {e}")
                                              })
        };

        count += 1;
        match render_json(&read("template.md"), &read("data.json")) {
            Ok(out) => assert_eq!(out, read("expected.md"), "demo {dir:?} rendered differently"),
            Err(e) => panic!("Demo {dir:?} failed: {e}"),
        }
    }

    assert!(count > 0, "No demos found in demos/");
}

fn render(template: &str, record: &Value) -> Result<String, Box<dyn std::error::Error>> {
    render_json(template, &record.to_string())
}

fn assert_renders(template: &str, record: &Value, expected: &str) {
    match render(template, record) {
        Ok(out) => assert_eq!(out, expected, "template: {template}"),
        Err(e) => panic!("Template {template:?} failed: {e}"),
    }
}

fn runtime_error(template: &str, record: &Value) -> RuntimeError {
    let template = parse(template).unwrap_or_else(|e| panic!("Template failed to parse: {e}"));
    let data = record.to_string();
    let ctx = Context::new(data.as_bytes(), &JsonData, &JsonData);

    match evaluate(&template, &ctx) {
        Ok(out) => panic!("Template rendered {out:?} but was expected to fail"),
        Err(e) => e,
    }
}

fn parse_error(template: &str) -> ParseError {
    match parse(template) {
        Ok(_) => panic!("Template {template:?} parsed but was expected to fail"),
        Err(e) => e,
    }
}

#[test]
fn text_without_markers_is_unchanged() {
    let text = "# Title\n\nNo expressions here, just 100% text.\n";
    assert_renders(text, &json!({}), text);
    assert_renders(text, &json!({"name": "Alice", "items": [1, 2]}), text);
    assert_renders("", &json!({}), "");
}

struct SingleName;

impl Getter for SingleName {
    fn get(&self, _data: &[u8], pattern: &str) -> EvalResult<(String, ElementType)> {
        if pattern == "name" {
            Ok(("Alice".to_string(), ElementType::String))
        } else {
            Err(RuntimeError::NotExists { pattern: pattern.to_string() })
        }
    }
}

#[test]
fn single_access_uses_the_getter() {
    let template = parse("$name$").unwrap();
    let ctx = Context::new(b"", &SingleName, &JsonData);

    assert_eq!(evaluate(&template, &ctx).unwrap(), "Alice");
}

#[test]
fn access_patterns() {
    let record = json!({
        "user": {"name": "Ann", "address": [{"city": "Lisbon"}, {"city": "Porto"}]},
        "quote": "say \"hi\"",
        "n": 1.25,
        "ok": true,
    });

    assert_renders("$user->name$", &record, "Ann");
    assert_renders("$user.name$", &record, "Ann");
    assert_renders("$user->address[1]->city$", &record, "Porto");
    assert_renders("$quote$", &record, "say \"hi\"");
    assert_renders("$n$ $ok$", &record, "1.25 true");
    assert_renders("$user->address[0]$", &record, r#"{"city":"Lisbon"}"#);
}

#[test]
fn missing_access_is_an_access_error() {
    let record = json!({"user": {"name": "Ann", "email": null}});

    assert_eq!(runtime_error("Hi $user->phone$", &record),
               RuntimeError::InvalidAccess { pattern: "user->phone".to_string() });
    assert_eq!(runtime_error("$user->email$", &record),
               RuntimeError::InvalidAccess { pattern: "user->email".to_string() });
}

#[test]
fn constants_render_as_written() {
    assert_renders(r#"$"hi there"$"#, &json!({}), "hi there");
    assert_renders(r#"$"a\"b"$"#, &json!({}), "a\"b");
    assert_renders("$2.50$|$-3$|$true$", &json!({}), "2.50|-3|true");
}

#[test]
fn literal_marker() {
    assert_renders("Price: $$$price$", &json!({"price": 5}), "Price: $5");
    assert_renders("$$", &json!({}), "$");
}

#[test]
fn arithmetic_keeps_full_precision() {
    let record = json!({"price": 1.25, "qty": 3, "name": "x"});

    assert_renders("$price * 2$", &record, "2.5");
    assert_renders("$price * qty$", &record, "3.75");
    assert_renders("$1 / 3$", &record, "0.3333333333333333");
    assert_renders("$1 + 2 * 3$", &record, "7");
    assert_renders("$(1 + 2) * 3$", &record, "9");
    assert_renders("$10 - 4 - 3$", &record, "3");
    assert_renders("$qty - -1$", &record, "4");
}

#[test]
fn arithmetic_rejects_non_numbers() {
    let record = json!({"name": "x", "qty": 3});

    assert_eq!(runtime_error("$qty + name$", &record),
               RuntimeError::ExpectedNumber { element: "name".to_string(),
                                              found:   ElementType::String, });
    assert_eq!(runtime_error("$true * 2$", &record),
               RuntimeError::ExpectedNumber { element: "true".to_string(),
                                              found:   ElementType::Boolean, });
}

#[test]
fn if_renders_exactly_one_branch() {
    let template = "$if ok$yes$else$no$end$.";

    assert_renders(template, &json!({"ok": true}), "yes.");
    assert_renders(template, &json!({"ok": false}), "no.");

    assert_renders("a$if ok$b$end$c", &json!({"ok": false}), "ac");
    assert_renders("a$if ok$b$end$c", &json!({"ok": true}), "abc");
}

#[test]
fn comparisons() {
    let record = json!({"age": 20, "name": "Ann", "flag": true});

    assert_renders("$if age >= 18$adult$end$", &record, "adult");
    assert_renders("$if age < 18$minor$else$adult$end$", &record, "adult");
    assert_renders("$if age != 20$x$else$y$end$", &record, "y");
    assert_renders("$if age == 20$x$end$", &record, "x");
    assert_renders(r#"$if name = "Ann"$hi$end$"#, &record, "hi");
    assert_renders(r#"$if name < "Bob"$before$end$"#, &record, "before");
    assert_renders("$if flag = true$on$end$", &record, "on");
    assert_renders("$if age * 2 > 39$big$end$", &record, "big");
}

#[test]
fn number_comparisons_follow_ieee() {
    assert_renders("$if 0 * -1 = 0$eq$else$ne$end$", &json!({}), "eq");
    assert_renders("$if d = 0$eq$else$ne$end$", &json!({"d": -0.0}), "eq");
    assert_renders("$if d < 0$lt$else$ge$end$", &json!({"d": -0.0}), "ge");

    for op in ["=", "<", "<=", ">", ">="] {
        assert_renders(&format!("$if 0 / 0 {op} 0 / 0$t$else$f$end$"), &json!({}), "f");
        assert_renders(&format!("$if 0 / 0 {op} 1$t$else$f$end$"), &json!({}), "f");
    }
    assert_renders("$if 0 / 0 != 0 / 0$t$else$f$end$", &json!({}), "t");
}

#[test]
fn comparing_different_types_fails() {
    let record = json!({"age": 20, "name": "Ann", "flag": true});

    for (left, right) in [("age", "name"), ("name", "age"), ("age", r#""20""#), ("flag", "age")] {
        let err = runtime_error(&format!("$if {left} = {right}$x$end$"), &record);
        assert!(matches!(err, RuntimeError::IncomparableTypes { .. }),
                "{left} = {right} gave {err:?}");
    }
}

#[test]
fn booleans_only_support_equality() {
    for a in [true, false] {
        for b in [true, false] {
            let record = json!({"a": a, "b": b});
            for op in ["<", "<=", ">", ">=", "!="] {
                let err = runtime_error(&format!("$if a {op} b$x$end$"), &record);
                assert!(matches!(err, RuntimeError::InvalidBooleanComparison { .. }),
                        "{a} {op} {b} gave {err:?}");
            }
        }
    }
}

#[test]
fn arrays_and_objects_cannot_be_compared() {
    let record = json!({"a": [1], "b": [1]});

    assert_eq!(runtime_error("$if a = b$x$end$", &record),
               RuntimeError::UnsupportedComparison { element_type: ElementType::Array });
}

#[test]
fn single_condition_must_be_boolean() {
    assert_eq!(runtime_error("$if name$x$end$", &json!({"name": "Ann"})),
               RuntimeError::ExpectedBoolean { element: "name".to_string(),
                                               found:   ElementType::String, });
}

#[test]
fn boolean_algebra() {
    let record = json!({"t": true, "f": false});

    assert_renders("$if t and f$x$else$y$end$", &record, "y");
    assert_renders("$if t or f$x$else$y$end$", &record, "x");
    assert_renders("$if not f$x$end$", &record, "x");
    assert_renders("$if !t$x$else$y$end$", &record, "y");
    assert_renders("$if not not t$x$end$", &record, "x");
    assert_renders("$if (f or t) and t$x$end$", &record, "x");
    assert_renders("$if f or t and f$x$else$y$end$", &record, "y");
    assert_renders("$if not (t and f)$x$end$", &record, "x");
}

#[test]
fn and_or_short_circuit() {
    // Both right sides fail when evaluated: `missing` does not exist and no
    // functions are available.
    assert_renders("$if f and missing$x$else$y$end$", &json!({"f": false}), "y");
    assert_renders("$if f and boom()$x$else$y$end$", &json!({"f": false}), "y");
    assert_renders("$if t or boom()$x$end$", &json!({"t": true}), "x");

    assert!(matches!(runtime_error("$if t and boom()$x$end$", &json!({"t": true})),
                     RuntimeError::ScriptEnvironmentNotReady { .. }));
}

struct CountingGetter {
    lookups: Cell<usize>,
}

impl Getter for CountingGetter {
    fn get(&self, _data: &[u8], pattern: &str) -> EvalResult<(String, ElementType)> {
        self.lookups.set(self.lookups.get() + 1);
        match pattern {
            "left" => Ok(("false".to_string(), ElementType::Boolean)),
            _ => Err(RuntimeError::DataAccess { details: "always fails".to_string() }),
        }
    }
}

#[test]
fn and_right_side_is_never_looked_up() {
    let getter = CountingGetter { lookups: Cell::new(0) };
    let template = parse("$if left and right$x$else$y$end$").unwrap();
    let ctx = Context::new(b"", &getter, &JsonData);

    assert_eq!(evaluate(&template, &ctx).unwrap(), "y");
    assert_eq!(getter.lookups.get(), 1);
}

#[test]
fn exists_and_type_checks() {
    let record = json!({"user": {"email": "a@b.c", "phone": null}, "tags": ["x"], "n": 1});

    assert_renders("$if exists user->email$mail$end$", &record, "mail");
    assert_renders("$if exists user->fax$fax$else$none$end$", &record, "none");
    assert_renders("$if exists user->phone$phone$else$none$end$", &record, "none");
    assert_renders("$if not exists nope->deeper[3]$ok$end$", &record, "ok");

    assert_renders("$if tags is array$A$end$", &record, "A");
    assert_renders("$if user is object$O$end$", &record, "O");
    assert_renders("$if n is number$N$end$", &record, "N");
    assert_renders("$if user->email is string$S$end$", &record, "S");
    assert_renders("$if n is bool$B$else$-$end$", &record, "-");
    assert_renders("$if nope is string$S$else$missing$end$", &record, "missing");
}

#[test]
fn array_loop() {
    assert_renders("$for x in items$$x$,$end$", &json!({"items": ["a", "b", "c"]}), "a,b,c,");
    assert_renders("$for x in items$$x$,$end$", &json!({"items": []}), "");
}

#[test]
fn object_loop() {
    // Relies on JsonData iterating objects in document order.
    assert_renders("$for v,k in obj$$k$=$v$;$end$",
                   &json!({"obj": {"p": "1", "q": "2"}}),
                   "p=1;q=2;");
}

#[test]
fn loop_index_is_one_based() {
    assert_renders("$for x, i in items$$i$.$x$ $end$",
                   &json!({"items": ["a", "b"]}),
                   "1.a 2.b ");
    assert_renders("$for x, i in items$$if i = 2$second$end$$end$",
                   &json!({"items": ["a", "b", "c"]}),
                   "second");
}

#[test]
fn loop_item_paths_and_outer_names() {
    let record = json!({
        "title": "Team",
        "xs": "outer",
        "people": [{"name": "Ann", "langs": ["rust", "go"]}, {"name": "Bo", "langs": []}],
    });

    assert_renders("$for x in people$$x->name$ ($title$, $xs$)\n$end$",
                   &record,
                   "Ann (Team, outer)\nBo (Team, outer)\n");
    assert_renders("$for p in people$$p->name$:$for l in p->langs$ $l$$end$;$end$",
                   &record,
                   "Ann: rust go;Bo:;");
    assert_renders("$for p in people$$p->langs[0]$$end$", &json!({"people": [{"langs": ["c"]}]}), "c");
}

#[test]
fn scalar_loop_items_have_no_fields() {
    let record = json!({"items": ["{\"a\":1}"], "nums": [5]});

    assert_eq!(runtime_error("$for x in items$$x->a$$end$", &record),
               RuntimeError::InvalidAccess { pattern: "x->a".to_string() });
    assert_eq!(runtime_error("$for n in nums$$n[0]$$end$", &record),
               RuntimeError::InvalidAccess { pattern: "n[0]".to_string() });
    assert_renders("$for x in items$$if exists x->a$yes$else$no$end$$end$", &record, "no");
    assert_renders("$for x in items$$x$$end$", &record, r#"{"a":1}"#);
}

#[test]
fn keys_outside_the_pattern_alphabet_are_unreachable() {
    assert_eq!(runtime_error("$first-name$", &json!({"first-name": "Ann"})),
               RuntimeError::InvalidAccess { pattern: "first - name".to_string() });
    assert_renders("$first_name$", &json!({"first_name": "Ann"}), "Ann");
}

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn templates_can_be_shared_across_threads() {
    assert_send_sync::<readson::ast::Template>();

    let template = parse("$for x in items$$x$$end$").unwrap();
    std::thread::scope(|scope| {
        for n in 0..3 {
            let template = &template;
            scope.spawn(move || {
                     let data = json!({ "items": [n, n] }).to_string();
                     let ctx = Context::new(data.as_bytes(), &JsonData, &JsonData);
                     assert_eq!(evaluate(template, &ctx).unwrap(), format!("{n}{n}"));
                 });
        }
    });
}

#[test]
fn nested_loops_see_both_items() {
    let record = json!({"rows": [[1, 2], [3]], "sep": "/"});

    assert_renders("$for r, i in rows$$for c, j in r$$i$$j$=$c$$sep$$end$$end$",
                   &record,
                   "11=1/12=2/21=3/");
}

#[test]
fn loop_over_non_iterable_fails() {
    assert_eq!(runtime_error("$for x in name$$x$$end$", &json!({"name": "Ann"})),
               RuntimeError::NotIterable { pattern: "name".to_string(),
                                           found:   ElementType::String, });
    assert!(matches!(runtime_error("$for x in nope$$x$$end$", &json!({})),
                     RuntimeError::NotExists { .. }));
}

#[test]
fn loop_failure_aborts_everything() {
    let record = json!({"people": [{"name": "Ann"}, {"age": 3}]});

    assert_eq!(runtime_error("$for p in people$$p->name$$end$", &record),
               RuntimeError::InvalidAccess { pattern: "p->name".to_string() });
}

#[test]
fn calling_functions_without_a_script_fails() {
    assert_eq!(runtime_error("before $foo()$ after", &json!({})),
               RuntimeError::ScriptEnvironmentNotReady { function: "foo".to_string() });
    // Readiness is checked before the (missing) argument is looked up.
    assert_eq!(runtime_error("$foo(missing)$", &json!({})),
               RuntimeError::ScriptEnvironmentNotReady { function: "foo".to_string() });
}

#[test]
fn unterminated_expression() {
    assert!(matches!(parse_error("Hello $name"), ParseError::UnterminatedExpression { .. }));

    let err = parse_error("line1\nline2 $if x$\n\n$end$ $oops");
    assert_eq!(err,
               ParseError::UnterminatedExpression { text: "oops".to_string(),
                                                    line: 4, });
}

#[test]
fn unbalanced_blocks() {
    assert!(matches!(parse_error("$end$"), ParseError::UnmatchedBlock { .. }));
    assert!(matches!(parse_error("$else$"), ParseError::UnmatchedBlock { .. }));
    assert!(matches!(parse_error("$if ok$yes"), ParseError::UnclosedBlock { .. }));
    assert!(matches!(parse_error("$for x in xs$$x$"), ParseError::UnclosedBlock { .. }));
    assert!(matches!(parse_error("$if ok$a$else$b$else$c$end$"), ParseError::DuplicateElse { .. }));
    assert!(matches!(parse_error("$for x in xs$a$else$b$end$"), ParseError::DuplicateElse { .. }));
    assert!(matches!(parse_error("$if a$$for x in xs$$end$"), ParseError::UnclosedBlock { .. }));
}

#[test]
fn malformed_blocks() {
    assert!(matches!(parse_error("$and$"), ParseError::UnknownKeyword { .. }));
    assert!(matches!(parse_error("$in$"), ParseError::UnknownKeyword { .. }));
    assert!(matches!(parse_error("$a b$"), ParseError::UnexpectedTrailingTokens { .. }));
    assert!(matches!(parse_error("$   $"), ParseError::UnexpectedEndOfInput { .. }));
    assert!(matches!(parse_error("$if$x$end$"), ParseError::UnexpectedEndOfInput { .. }));
    assert!(matches!(parse_error("$if a is date$x$end$"), ParseError::UnknownType { .. }));
    assert!(matches!(parse_error(r#"$"bad \q escape"$"#), ParseError::MalformedConstant { .. }));
    assert!(matches!(parse_error("$user->name()$"), ParseError::InvalidFunctionName { .. }));
    assert!(matches!(parse_error("$(1 + 2$"), ParseError::ExpectedClosingParen { .. }));
    assert!(matches!(parse_error("$for x->y in xs$$end$"), ParseError::UnexpectedToken { .. }));
    assert!(matches!(parse_error("$for x xs$$end$"), ParseError::UnexpectedToken { .. }));
    assert!(matches!(parse_error("$- name$"), ParseError::UnexpectedToken { .. }));
}

#[test]
fn syntax_errors_report_their_line() {
    let err = parse_error("$if a\n and #b$x$end$");
    assert_eq!(err,
               ParseError::InvalidCharacter { text: "#".to_string(),
                                              line: 2, });

    let err = parse_error("one\ntwo\n$x +$");
    assert_eq!(err.line(), 3);
    assert!(err.to_string().starts_with("Syntax error on line 3"));
}
