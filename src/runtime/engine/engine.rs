use super::*;
use crate::config;
use log::{debug, trace};
use std::string::String as StdString;
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

/// Resource name given to scripts arriving over JNI.
pub const JNI_SCRIPT_NAME: &str = "<jni>";

/// Compiles and runs `script` in a fresh isolate and context, returning the
/// completion value converted with JavaScript `ToString`.
///
/// Nothing survives between calls: globals defined by one script are gone by
/// the next. Only the V8 platform is shared, and it is initialized on first
/// use.
pub fn eval<S>(script: S) -> JsResult<StdString>
where
    S: Into<Script>,
{
    let script = script.into();
    platform::initialize();

    debug!("creating isolate");
    let isolate = &mut v8::Isolate::new(v8::CreateParams::default());
    // declared after the isolate, so it is disarmed before the isolate is disposed
    let _watchdog = script
        .timeout
        .map(|timeout| Watchdog::arm(timeout, isolate.thread_safe_handle()));

    eval_in_isolate(isolate, &script)
}

/// Runs source received from Java, applying the active configuration.
pub fn run_script(source: &str) -> JsResult<StdString> {
    eval(Script {
        source: source.to_owned(),
        timeout: config::current().script_timeout(),
        name: Some(JNI_SCRIPT_NAME.to_owned()),
    })
}

/// Version of the linked V8 engine.
pub fn engine_version() -> &'static str {
    v8::V8::get_version()
}

fn eval_in_isolate(isolate: &mut v8::Isolate, script: &Script) -> JsResult<StdString> {
    let scope = &mut v8::HandleScope::new(isolate);
    let context = v8::Context::new(scope);
    let scope = &mut v8::ContextScope::new(scope, context);
    let scope = &mut v8::TryCatch::new(scope);

    let source = v8::String::new(scope, &script.source)
        .ok_or(JsError::SourceTooLarge(script.source.len()))?;
    let origin = script.name.as_ref().map(|name| {
        let name = v8::String::new(scope, name)
            .unwrap_or_else(|| v8::String::empty(scope))
            .into();
        let source_map_url = v8::String::empty(scope).into();
        v8::ScriptOrigin::new(
            scope,
            name,
            0,
            0,
            false,
            0,
            source_map_url,
            false,
            false,
            false,
        )
    });

    let compiled = match v8::Script::compile(scope, source, origin.as_ref()) {
        Some(compiled) => compiled,
        None => return Err(failure(scope, script, JsError::Compile)),
    };
    trace!("script compiled");

    let value = match compiled.run(scope) {
        Some(value) => value,
        None => return Err(failure(scope, script, JsError::Runtime)),
    };

    // ToString may itself run user code, e.g. an overridden toString()
    match value.to_string(scope) {
        Some(string) => Ok(string.to_rust_string_lossy(scope)),
        None => Err(failure(scope, script, JsError::Runtime)),
    }
}

fn failure(
    scope: &mut v8::TryCatch<v8::HandleScope>,
    script: &Script,
    stage: fn(StdString) -> JsError,
) -> JsError {
    if scope.has_terminated() {
        return JsError::Timeout(script.timeout.unwrap_or_default());
    }
    stage(exception_message(scope))
}

fn exception_message(scope: &mut v8::TryCatch<v8::HandleScope>) -> StdString {
    let Some(exception) = scope.exception() else {
        return "unknown error".to_owned();
    };

    match exception.to_string(scope) {
        Some(message) => message.to_rust_string_lossy(scope),
        None => "exception could not be converted to a string".to_owned(),
    }
}

/// Source handed to [`eval`].
#[derive(Clone, Debug, Default)]
pub struct Script {
    pub source: StdString,
    /// Terminates execution once exceeded. V8 only notices termination while
    /// running JavaScript, so a long native call delays it.
    pub timeout: Option<Duration>,
    /// Resource name shown in stack traces.
    pub name: Option<StdString>,
}

impl From<StdString> for Script {
    fn from(source: StdString) -> Script {
        Script {
            source,
            ..Default::default()
        }
    }
}

impl<'a> From<&'a str> for Script {
    fn from(source: &'a str) -> Script {
        source.to_owned().into()
    }
}

/// Terminates an isolate that is still running when its deadline passes.
/// Dropping the watchdog disarms it.
struct Watchdog {
    finished: Arc<(Mutex<bool>, Condvar)>,
}

impl Watchdog {
    fn arm(timeout: Duration, isolate: v8::IsolateHandle) -> Watchdog {
        let finished = Arc::new((Mutex::new(false), Condvar::new()));
        let state = finished.clone();

        thread::spawn(move || {
            let (lock, condvar) = &*state;
            let guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
            let (guard, _) = condvar
                .wait_timeout_while(guard, timeout, |finished| !*finished)
                .unwrap_or_else(PoisonError::into_inner);

            if !*guard {
                debug!("script exceeded {}ms, terminating", timeout.as_millis());
                isolate.terminate_execution();
            }
        });

        Watchdog { finished }
    }
}

impl Drop for Watchdog {
    fn drop(&mut self) {
        let (lock, condvar) = &*self.finished;
        *lock.lock().unwrap_or_else(PoisonError::into_inner) = true;
        condvar.notify_one();
    }
}
