//! JNI glue between `MainActivity` and the native side.

mod exports;

use crate::logging::panic_message;
use anyhow::{Context, Result};
use jni::objects::JString;
use jni::sys::jstring;
use jni::JNIEnv;
use log::error;
use std::panic::{self, AssertUnwindSafe};

/// Java class whose `external fun` declarations these exports implement.
pub const ACTIVITY_CLASS: &str = "com.wuxianggujun.android_nodejs_embed.MainActivity";

/// Reads a Java string argument. `None` if Java passed null.
fn java_string(env: &mut JNIEnv, value: &JString) -> Result<Option<String>> {
    if value.is_null() {
        return Ok(None);
    }

    let value = env.get_string(value).context("failed to read Java string")?;
    Ok(Some(value.into()))
}

/// Text returned to Java when native code fails unexpectedly.
fn exception_text(message: &str) -> String {
    format!("Exception: {}", message)
}

/// Runs `body`, reporting a panic the same way as any other native failure.
/// Panics must not unwind into the JVM.
fn catch_panic<F>(body: F) -> String
where
    F: FnOnce() -> String,
{
    match panic::catch_unwind(AssertUnwindSafe(body)) {
        Ok(text) => text,
        Err(payload) => {
            let text = exception_text(panic_message(&*payload));
            error!("{}", text);
            text
        }
    }
}

/// Runs `body` and hands its text back to Java. Returns null, leaving the
/// Java exception pending, if the result string cannot be allocated.
fn string_result<F>(env: &mut JNIEnv, body: F) -> jstring
where
    F: FnOnce(&mut JNIEnv) -> String,
{
    let text = catch_panic(|| body(env));

    match env.new_string(text) {
        Ok(string) => string.into_raw(),
        Err(e) => {
            error!("failed to create Java string: {}", e);
            std::ptr::null_mut()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panics_become_exception_text() {
        assert_eq!(catch_panic(|| panic!("boom")), "Exception: boom");
        assert_eq!(
            catch_panic(|| panic!("index {} out of range", 3)),
            "Exception: index 3 out of range"
        );
        assert_eq!(catch_panic(|| "fine".to_owned()), "fine");
    }

    #[test]
    fn exception_prefix() {
        assert_eq!(
            exception_text("script source is null"),
            "Exception: script source is null"
        );
    }
}
