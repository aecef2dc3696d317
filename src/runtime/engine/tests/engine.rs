use crate::runtime::engine::*;
use std::thread;
use std::time::Duration;

#[test]
fn arithmetic() {
    assert_eq!(eval("1 + 2 + 3").unwrap(), "6");
}

#[test]
fn string_concatenation() {
    assert_eq!(
        eval("'Hello from ' + 'Node.js!'").unwrap(),
        "Hello from Node.js!"
    );
}

#[test]
fn compiled_typescript_output() {
    let result = eval(
        r#"
        var greeting = "Hello from compiled TS";
        var add = function(a, b) { return a + b; };
        greeting + " Result: " + add(15, 25)
    "#,
    );
    assert_eq!(result.unwrap(), "Hello from compiled TS Result: 40");
}

#[test]
fn completion_values_use_to_string() {
    assert_eq!(eval("").unwrap(), "undefined");
    assert_eq!(eval("var x = 1").unwrap(), "undefined");
    assert_eq!(eval("null").unwrap(), "null");
    assert_eq!(eval("[1, 2, 3]").unwrap(), "1,2,3");
    assert_eq!(eval("({})").unwrap(), "[object Object]");
    assert_eq!(eval("0.1 + 0.2").unwrap(), "0.30000000000000004");
}

#[test]
fn unicode_round_trip() {
    assert_eq!(eval("'abc😊🈹'").unwrap(), "abc😊🈹");
    assert_eq!(eval("'你好'.length").unwrap(), "2");
}

#[test]
fn typescript_annotations_fail_to_compile() {
    let result = eval(
        r#"
        const greeting: string = "Hello TypeScript";
        greeting
    "#,
    );

    match result {
        Err(JsError::Compile(message)) => assert!(message.starts_with("SyntaxError")),
        _ => panic!("unexpected result: {:?}", result),
    }
}

#[test]
fn compile_error_display() {
    let error = eval("var = ;").unwrap_err();
    assert!(error.to_string().starts_with("Compile error: SyntaxError"));
}

#[test]
fn runtime_errors() {
    assert_eq!(
        eval("undefined_var").unwrap_err(),
        JsError::Runtime("ReferenceError: undefined_var is not defined".to_owned())
    );
    assert_eq!(
        eval("throw new Error('boom')").unwrap_err().to_string(),
        "Runtime error: Error: boom"
    );
    assert_eq!(
        eval("throw 42").unwrap_err(),
        JsError::Runtime("42".to_owned())
    );
}

#[test]
fn failing_to_string_is_a_runtime_error() {
    let result = eval("({ toString() { throw new Error('nope') } })");
    assert_eq!(result.unwrap_err(), JsError::Runtime("Error: nope".to_owned()));

    match eval("Symbol('s')") {
        Err(JsError::Runtime(message)) => assert!(message.starts_with("TypeError")),
        result => panic!("unexpected result: {:?}", result),
    }
}

#[test]
fn runs_are_isolated() {
    assert_eq!(eval("globalThis.leak = 1; leak").unwrap(), "1");
    assert_eq!(eval("typeof leak").unwrap(), "undefined");
}

#[test]
fn no_node_globals() {
    assert_eq!(eval("typeof require").unwrap(), "undefined");
    assert_eq!(eval("typeof process").unwrap(), "undefined");
}

#[test]
fn script_name_in_stack() {
    let result = eval(Script {
        source: "try { MISSING_VAR } catch (e) { e.stack }".to_owned(),
        name: Some("script_name".to_owned()),
        ..Default::default()
    })
    .unwrap();
    let result = result.split_whitespace().collect::<Vec<_>>().join(" ");
    assert_eq!(
        "ReferenceError: MISSING_VAR is not defined at script_name:1:7",
        result
    );
}

#[test]
fn eval_timeout() {
    let result = eval(Script {
        source: "a = 0; while (true) { a++; }".to_owned(),
        timeout: Some(Duration::from_millis(50)),
        ..Default::default()
    });

    match result {
        Err(JsError::Timeout(after)) => assert_eq!(after, Duration::from_millis(50)),
        _ => panic!("unexpected result: {:?}", result),
    }

    // Make sure we can still evaluate again:
    assert_eq!(eval("1 + 1").unwrap(), "2");
}

#[test]
fn timeout_not_reached() {
    let result = eval(Script {
        source: "'fast'".to_owned(),
        timeout: Some(Duration::from_secs(5)),
        ..Default::default()
    });
    assert_eq!(result.unwrap(), "fast");
}

#[test]
fn jni_scripts_are_named() {
    let stack = run_script("new Error('x').stack").unwrap();
    assert!(stack.contains(JNI_SCRIPT_NAME), "stack: {}", stack);
}

#[test]
fn concurrent_runs() {
    let handles = (0..8)
        .map(|i| thread::spawn(move || eval(format!("{} * 2", i))))
        .collect::<Vec<_>>();

    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.join().unwrap().unwrap(), (i * 2).to_string());
    }
}

#[test]
fn engine_version_is_reported() {
    let version = engine_version();
    assert!(version.split('.').count() >= 3, "version: {}", version);
}
