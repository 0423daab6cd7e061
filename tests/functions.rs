use readson::{
    access::json::JsonData,
    error::RuntimeError,
    evaluate, initialize_functions,
    interpreter::evaluator::{core::Context, function::script::ScriptEnvironment},
    parse,
};
use serde_json::{Value, json};

const SCRIPT: &str = r#"
function shout(s) return s:upper() end
function half(n) return n / 2 end
function len(s) return #s end
function join(a, b) return a .. "+" .. b end
function adult(age) return tonumber(age) >= 18 end
function pair(a, b) return { a, b } end
function nothing() return nil end
function broken() error("no luck") end
answer = 42
"#;

fn environment() -> ScriptEnvironment {
    initialize_functions(SCRIPT).unwrap_or_else(|e| panic!("Script failed to load: {e}"))
}

fn render(env: &ScriptEnvironment, template: &str, record: &Value) -> Result<String, RuntimeError> {
    let template = parse(template).unwrap_or_else(|e| panic!("Template failed to parse: {e}"));
    let data = record.to_string();
    let ctx = Context::new(data.as_bytes(), &JsonData, &JsonData).with_functions(env);

    evaluate(&template, &ctx)
}

fn assert_renders(template: &str, record: &Value, expected: &str) {
    let env = environment();
    match render(&env, template, record) {
        Ok(out) => assert_eq!(out, expected, "template: {template}"),
        Err(e) => panic!("Template {template:?} failed: {e}"),
    }
}

fn assert_fails(template: &str, record: &Value) -> RuntimeError {
    let env = environment();
    match render(&env, template, record) {
        Ok(out) => panic!("Template {template:?} rendered {out:?} but was expected to fail"),
        Err(e) => e,
    }
}

#[test]
fn string_results() {
    let record = json!({"name": "ann", "quote": "a \"b\""});

    assert_renders("$shout(name)$", &record, "ANN");
    assert_renders(r#"$shout("hi")$"#, &record, "HI");
    assert_renders("$shout(quote)$", &record, "A \"B\"");
    assert_renders(r#"$join(name, "bo")$"#, &record, "ann+bo");
    assert_renders("[$nothing()$]", &record, "[]");
}

#[test]
fn number_results_use_two_decimals() {
    let record = json!({"n": 3, "word": "four"});

    assert_renders("$half(n)$", &record, "1.50");
    assert_renders("$len(word)$", &record, "4.00");
    assert_renders("$half(n) * 2$", &record, "3");
}

#[test]
fn arguments_are_passed_as_text() {
    let record = json!({"n": 0.1, "tags": ["x", "y"]});

    assert_renders("$join(n, 2.50)$", &record, "0.1+2.50");
    assert_renders("$join(n * 3, true)$", &record, "0.30000000000000004+true");
    assert_renders(r#"$join(tags, "z")$"#, &record, r#"["x","y"]+z"#);
}

#[test]
fn boolean_results_drive_conditions() {
    assert_renders("$if adult(age)$in$else$out$end$", &json!({"age": 20}), "in");
    assert_renders("$if adult(age)$in$else$out$end$", &json!({"age": 9}), "out");
    assert_renders("$if not adult(age) and half(age) < 5$kid$end$", &json!({"age": 9}), "kid");
}

#[test]
fn table_results_are_json() {
    assert_renders("$pair(a, b)$", &json!({"a": "x", "b": "y"}), r#"["x","y"]"#);
    assert_renders("$if pair(a, b) is array$list$end$", &json!({"a": "x", "b": "y"}), "list");
}

#[test]
fn unknown_functions() {
    assert_eq!(assert_fails("$missing(1)$", &json!({})),
               RuntimeError::UnknownFunction { name: "missing".to_string() });
    assert_eq!(assert_fails("$answer()$", &json!({})),
               RuntimeError::UnknownFunction { name: "answer".to_string() });
}

#[test]
fn script_errors_surface() {
    let err = assert_fails("$broken()$", &json!({}));
    match err {
        RuntimeError::ScriptFailure { function, message } => {
            assert_eq!(function, "broken");
            assert!(message.contains("no luck"), "message was {message}");
        },
        other => panic!("Expected a script failure, got {other:?}"),
    }
}

#[test]
fn argument_errors_surface_before_the_call() {
    assert_eq!(assert_fails("$shout(nope)$", &json!({})),
               RuntimeError::InvalidAccess { pattern: "shout(nope)".to_string() });
}

#[test]
fn script_that_does_not_load() {
    assert!(matches!(initialize_functions("function ("),
                     Err(RuntimeError::ScriptFailure { .. })));
    assert!(matches!(initialize_functions("error('at load')"),
                     Err(RuntimeError::ScriptFailure { .. })));
}

#[test]
fn one_environment_serves_many_renders() {
    let env = environment();
    let template = parse("$shout(name)$").unwrap();

    for (name, expected) in [("a", "A"), ("b", "B"), ("c", "C")] {
        let data = json!({ "name": name }).to_string();
        let ctx = Context::new(data.as_bytes(), &JsonData, &JsonData).with_functions(&env);
        assert_eq!(evaluate(&template, &ctx).unwrap(), expected);
    }
}
