use super::*;
use crate::config::{self, Config};
use crate::node;
use crate::runtime::engine;
use crate::version;
use androidnodejsembed_macros::jni_export;
use jni::objects::JObject;
use log::info;

const GREETING: &str = "Hello from Rust";

#[jni_export(
    class = "com.wuxianggujun.android_nodejs_embed.MainActivity",
    name = "stringFromJNI"
)]
fn string_from_jni<'local>(mut env: JNIEnv<'local>, _this: JObject<'local>) -> jstring {
    string_result(&mut env, |_| {
        info!("{}", GREETING);
        GREETING.to_owned()
    })
}

#[jni_export(
    class = "com.wuxianggujun.android_nodejs_embed.MainActivity",
    name = "getNodeVersion"
)]
fn get_node_version<'local>(mut env: JNIEnv<'local>, _this: JObject<'local>) -> jstring {
    string_result(&mut env, |_| {
        let version = version::node_version();
        info!("Node.js version: {}", version);
        version
    })
}

#[jni_export(
    class = "com.wuxianggujun.android_nodejs_embed.MainActivity",
    name = "runJavaScript"
)]
fn run_javascript<'local>(
    mut env: JNIEnv<'local>,
    _this: JObject<'local>,
    js_code: JString<'local>,
) -> jstring {
    string_result(&mut env, |env| match java_string(env, &js_code) {
        Ok(source) => run_javascript_text(source),
        Err(e) => exception_text(&format!("{:#}", e)),
    })
}

fn run_javascript_text(source: Option<String>) -> String {
    let Some(source) = source else {
        return exception_text("script source is null");
    };
    info!("Running JavaScript: {}", source);

    let result = engine::run_script(&source).unwrap_or_else(|e| e.to_string());
    info!("JavaScript result: {}", result);
    result
}

#[jni_export(
    class = "com.wuxianggujun.android_nodejs_embed.MainActivity",
    name = "runNodeJS"
)]
fn run_node_js<'local>(
    mut env: JNIEnv<'local>,
    _this: JObject<'local>,
    js_code: JString<'local>,
) -> jstring {
    string_result(&mut env, |env| {
        // the source is only logged, so an unreadable argument is not an error here
        let source = java_string(env, &js_code).ok().flatten();
        node::describe(source.as_deref().unwrap_or_default()).to_owned()
    })
}

#[jni_export(
    class = "com.wuxianggujun.android_nodejs_embed.MainActivity",
    name = "getEngineVersion"
)]
fn get_engine_version<'local>(mut env: JNIEnv<'local>, _this: JObject<'local>) -> jstring {
    string_result(&mut env, |_| format!("V8 {}", engine::engine_version()))
}

#[jni_export(
    class = "com.wuxianggujun.android_nodejs_embed.MainActivity",
    name = "configure"
)]
fn configure<'local>(
    mut env: JNIEnv<'local>,
    _this: JObject<'local>,
    json: JString<'local>,
) -> jstring {
    string_result(&mut env, |env| match java_string(env, &json) {
        Ok(json) => configure_text(json),
        Err(e) => format!("Config error: {:#}", e),
    })
}

fn configure_text(json: Option<String>) -> String {
    let Some(json) = json else {
        return "Config error: configuration JSON is null".to_owned();
    };

    match Config::from_json(&json).and_then(config::apply) {
        Ok(()) => "ok".to_owned(),
        Err(e) => format!("Config error: {:#}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::PoisonError;

    #[test]
    fn null_script() {
        assert_eq!(
            run_javascript_text(None),
            "Exception: script source is null"
        );
    }

    #[test]
    fn script_results_and_errors() {
        assert_eq!(run_javascript_text(Some("1 + 2 + 3".to_owned())), "6");
        assert_eq!(
            run_javascript_text(Some("undefined_var".to_owned())),
            "Runtime error: ReferenceError: undefined_var is not defined"
        );
        assert!(run_javascript_text(Some("var = ;".to_owned()))
            .starts_with("Compile error: SyntaxError"));
    }

    #[test]
    fn configure_results() {
        let _lock = config::TEST_LOCK
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        assert_eq!(
            configure_text(None),
            "Config error: configuration JSON is null"
        );
        assert!(configure_text(Some(r#"{"log_level": "loud"}"#.to_owned()))
            .starts_with("Config error: unknown log level 'loud'"));
        assert!(configure_text(Some("not json".to_owned()))
            .starts_with("Config error: invalid configuration JSON"));

        assert_eq!(
            configure_text(Some(r#"{"script_timeout_ms": 30000}"#.to_owned())),
            "ok"
        );
        assert_eq!(
            config::current().script_timeout_ms,
            Some(30000)
        );

        assert_eq!(configure_text(Some("{}".to_owned())), "ok");
        assert_eq!(config::current(), Config::default());
    }
}
