mod bridge;
mod config;
mod logging;
mod node;
pub mod runtime;
mod version;

use jni::sys::{jint, JNI_VERSION_1_6};
use jni::JavaVM;
use log::info;
use std::ffi::c_void;

/// Called by the JVM when `System.loadLibrary("androidnodejsembed")` runs.
#[no_mangle]
#[allow(non_snake_case)]
pub extern "system" fn JNI_OnLoad(_vm: JavaVM, _reserved: *mut c_void) -> jint {
    let level = config::current()
        .log_level()
        .unwrap_or(log::LevelFilter::Info);
    logging::init(level);

    info!("--------------------------------------------------");
    info!(
        "androidnodejsembed loaded for {} ({})",
        bridge::ACTIVITY_CLASS,
        version::node_version()
    );
    info!("Build time: {}", version::BUILD_TIMESTAMP);
    info!("Git commit: {}", version::GIT_DESCRIBE);

    JNI_VERSION_1_6
}
