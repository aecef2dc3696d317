//! Process-wide V8 platform. V8 allows exactly one, and it must outlive
//! every isolate, so it is created on first use and never torn down.

use crate::config;
use log::info;
use std::sync::{Mutex, PoisonError};

struct PlatformState {
    initialized: bool,
}

static PLATFORM: Mutex<PlatformState> = Mutex::new(PlatformState { initialized: false });

/// Initializes the V8 platform if no one has yet. Safe to call from any thread.
pub fn initialize() {
    let mut state = PLATFORM.lock().unwrap_or_else(PoisonError::into_inner);
    if state.initialized {
        return;
    }

    info!("Initializing V8 platform...");

    if let Some(flags) = config::current().v8_flags {
        info!("V8 flags: {}", flags);
        v8::V8::set_flags_from_string(&flags);
    }

    let platform = v8::new_default_platform(0, false).make_shared();
    v8::V8::initialize_platform(platform);
    v8::V8::initialize();
    state.initialized = true;

    info!(
        "V8 platform initialized successfully (V8 {})",
        v8::V8::get_version()
    );
}

pub fn is_initialized() -> bool {
    PLATFORM
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .initialized
}
