//! Placeholder for running code inside a complete Node.js environment.
//!
//! Hosting Node proper needs an initialized `node::Environment`, filesystem
//! access for the module loader and a libuv loop pumped from a dedicated
//! thread. None of that is wired up; callers get an explanation instead and
//! should use [`crate::runtime::engine::eval`] for plain scripts.

use log::info;

const FULL_RUNTIME_NOTICE: &str = "\
Embedding the full Node.js environment is more involved.

The bundled libnode.so contains:
\u{2705} V8 engine (available)
\u{2705} libuv event loop
\u{2705} Node.js core API
\u{2705} All built-in modules (fs, http, crypto, ...)

Running full Node.js requires:
1. Initializing a Node.js environment
2. Configuring filesystem access
3. Driving the event loop

Available now: V8 JavaScript execution (runJavaScript)";

/// Returns the notice above. `source` is logged and otherwise ignored.
pub fn describe(source: &str) -> &'static str {
    info!("Running Node.js code: {}", source);
    info!("Node.js info: {}", FULL_RUNTIME_NOTICE);
    FULL_RUNTIME_NOTICE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_is_not_executed() {
        assert_eq!(describe("process.version"), describe("throw new Error()"));
    }

    #[test]
    fn notice_points_at_runjavascript() {
        let notice = describe("");
        assert!(notice.contains("libuv event loop"));
        assert!(notice.contains("3. Driving the event loop"));
        assert!(notice.ends_with("(runJavaScript)"));
    }
}
