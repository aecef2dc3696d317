use crate::runtime::engine::platform;
use anyhow::{bail, Context, Result};
use log::{info, warn, LevelFilter};
use serde::Deserialize;
use std::str::FromStr;
use std::sync::{OnceLock, PoisonError, RwLock};
use std::time::Duration;

const LOG_ENV_VAR: &str = "NODE_EMBED_LOG";
const TIMEOUT_ENV_VAR: &str = "NODE_EMBED_SCRIPT_TIMEOUT_MS";

static CONFIG: OnceLock<RwLock<Config>> = OnceLock::new();

/// Serializes tests that touch the global configuration or log level.
#[cfg(test)]
pub(crate) static TEST_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

/// Runtime settings for the library. Every field is optional.
///
/// Java callers pass these as JSON through `configure`, e.g.
/// `{"log_level": "debug", "script_timeout_ms": 2000}`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// One of `off`, `error`, `warn`, `info`, `debug`, `trace`.
    pub log_level: Option<String>,
    /// Terminates scripts that run longer than this.
    pub script_timeout_ms: Option<u64>,
    /// Passed to V8 before the platform starts.
    pub v8_flags: Option<String>,
}

impl Config {
    pub fn from_json(json: &str) -> Result<Config> {
        let config: Config = serde_json::from_str(json).context("invalid configuration JSON")?;
        config.validate()?;
        Ok(config)
    }

    /// Reads the defaults from the environment, ignoring malformed values.
    pub fn from_env() -> Config {
        let config = Config {
            log_level: std::env::var(LOG_ENV_VAR).ok(),
            script_timeout_ms: std::env::var(TIMEOUT_ENV_VAR)
                .ok()
                .and_then(|v| v.parse().ok()),
            v8_flags: None,
        };

        match config.validate() {
            Ok(()) => config,
            Err(_) => Config::default(),
        }
    }

    fn validate(&self) -> Result<()> {
        self.log_level()?;
        if self.script_timeout_ms == Some(0) {
            bail!("script_timeout_ms must be greater than zero");
        }
        Ok(())
    }

    pub fn log_level(&self) -> Result<LevelFilter> {
        match &self.log_level {
            Some(level) => LevelFilter::from_str(level)
                .with_context(|| format!("unknown log level '{}'", level)),
            None => Ok(LevelFilter::Info),
        }
    }

    pub fn script_timeout(&self) -> Option<Duration> {
        self.script_timeout_ms.map(Duration::from_millis)
    }

    /// V8 reads its flags once, when the platform starts.
    fn v8_flags_too_late(&self) -> bool {
        self.v8_flags.is_some() && platform::is_initialized()
    }
}

fn config() -> &'static RwLock<Config> {
    CONFIG.get_or_init(|| RwLock::new(Config::from_env()))
}

/// A snapshot of the active configuration.
pub fn current() -> Config {
    config()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// Replaces the active configuration.
pub fn apply(new: Config) -> Result<()> {
    new.validate()?;

    if new.v8_flags_too_late() {
        warn!("V8 platform already initialized, v8_flags will not take effect");
    }

    log::set_max_level(new.log_level()?);
    info!("applying configuration: {:?}", new);

    *config().write().unwrap_or_else(PoisonError::into_inner) = new;
    Ok(())
}
