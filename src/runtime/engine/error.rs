use std::error::Error as StdError;
use std::fmt;
use std::result::Result as StdResult;
use std::time::Duration;

pub type JsResult<T> = StdResult<T, JsError>;

/// An error originating from running a script.
///
/// The `Display` output is what Java callers receive, so each variant is
/// prefixed with the stage that failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JsError {
    /// The source did not compile. Holds the stringified exception.
    Compile(String),
    /// The script threw while running. Holds the stringified exception.
    Runtime(String),
    /// Execution was terminated after running longer than the given duration.
    Timeout(Duration),
    /// The source is too large to be handed to V8 as a single string.
    SourceTooLarge(usize),
}

impl StdError for JsError {}

impl fmt::Display for JsError {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            JsError::Compile(message) => write!(fmt, "Compile error: {}", message),
            JsError::Runtime(message) => write!(fmt, "Runtime error: {}", message),
            JsError::Timeout(after) => write!(
                fmt,
                "Runtime error: execution timed out after {}ms",
                after.as_millis()
            ),
            JsError::SourceTooLarge(len) => write!(
                fmt,
                "Compile error: source of {} bytes exceeds the maximum string length",
                len
            ),
        }
    }
}
