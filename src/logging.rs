use log::{error, LevelFilter};
use std::sync::Once;
use std::thread;

/// Tag shown in logcat.
pub const LOG_TAG: &str = "NodeJS";

static LOGGING_INIT: Once = Once::new();

/// Installs the logger and the panic hook. Only the first call does anything.
///
/// The logger itself lets everything through; filtering is left to
/// `log::set_max_level` so the level can change at runtime.
pub fn init(level: LevelFilter) {
    LOGGING_INIT.call_once(|| {
        install_logger();
        log::set_max_level(level);
        install_panic_hook();
    });
}

#[cfg(target_os = "android")]
fn install_logger() {
    android_logger::init_once(
        android_logger::Config::default()
            .with_max_level(LevelFilter::Trace)
            .with_tag(LOG_TAG),
    );
}

#[cfg(not(target_os = "android"))]
fn install_logger() {
    // log format should have timestamps, level, tag, and message
    let result = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}] [{}] [{}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                LOG_TAG,
                message
            ))
        })
        .level(LevelFilter::Trace)
        .chain(std::io::stderr())
        .apply();

    // the host may have installed a logger already
    if let Err(e) = result {
        eprintln!("[{}] logger not installed: {}", LOG_TAG, e);
    }
}

fn install_panic_hook() {
    let default_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |info| {
        let backtrace = std::backtrace::Backtrace::force_capture();

        let thread = thread::current();
        let thread = thread.name().unwrap_or("<unnamed>");
        let msg = panic_message(info.payload());

        let formatted = match info.location() {
            Some(location) => format!(
                "thread '{}' panicked at '{}': {}:{}\nbacktrace:\n{:?}",
                thread,
                msg,
                location.file(),
                location.line(),
                backtrace
            ),
            None => format!(
                "thread '{}' panicked at '{}'\nbacktrace:\n{:?}",
                thread, msg, backtrace
            ),
        };

        error!("{}", formatted);
        log::logger().flush();

        default_hook(info);
    }));
}

/// Extracts the message from a panic payload.
pub fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    match payload.downcast_ref::<&'static str>() {
        Some(s) => *s,
        None => match payload.downcast_ref::<String>() {
            Some(s) => &**s,
            None => "Box<Any>",
        },
    }
}
